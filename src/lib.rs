//! LCD snake (workspace facade crate).
//!
//! Re-exports the member crates under short names so binaries, tests and
//! benches can write `lcd_snake::{core, display, input, term, types}`.

pub mod config;

pub use lcd_snake_core as core;
pub use lcd_snake_display as display;
pub use lcd_snake_input as input;
pub use lcd_snake_term as term;
pub use lcd_snake_types as types;

pub use config::GameConfig;
