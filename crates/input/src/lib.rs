//! Terminal input: key mapping and the cross-thread control cell.
//!
//! Keys become [`Command`]s; the input thread records them in a
//! [`ControlCell`] that the tick thread polls once per step.

pub mod control;
pub mod map;

pub use lcd_snake_types as types;

pub use control::ControlCell;
pub use map::{handle_key_event, should_quit, Command};
