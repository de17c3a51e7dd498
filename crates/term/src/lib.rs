//! Terminal transport for the panel.
//!
//! Stands in for the wired display: [`TerminalPanel`] accepts the controller
//! byte protocol, keeps a [`PanelRam`](lcd_snake_display::PanelRam), and on
//! every frame sync paints that RAM with half-block characters.
//!
//! - [`fb`]: styled character framebuffer
//! - [`panel_view`]: pure RAM-to-framebuffer mapping plus the status line
//! - [`renderer`]: the sink itself and the diffing crossterm encoder

pub mod fb;
pub mod panel_view;
pub mod renderer;

pub use lcd_snake_display as display;
pub use lcd_snake_types as types;

pub use fb::{CellStyle, Emphasis, FrameBuffer, Rgb, TermCell, PLAIN};
pub use panel_view::{PanelView, Viewport};
pub use renderer::{encode_diff_into, encode_full_into, restore_terminal, TerminalPanel};
