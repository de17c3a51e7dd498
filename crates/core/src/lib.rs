//! Snake game logic - deterministic and display-agnostic
//!
//! The engine plays on a logical grid and renders through any
//! [`Canvas`](lcd_snake_display::Canvas), so it runs the same against the
//! software framebuffer, a test surface, or anything else that can plot points.
//!
//! # Module Structure
//!
//! - [`grid`]: occupancy map and [`Cell`] coordinates
//! - [`engine`]: the [`SnakeEngine`] state machine
//! - [`rng`]: seeded LCG used for head and food placement
//! - [`snapshot`]: serializable view of a round
//! - [`error`]: [`SnakeError`], the setup failures
//!
//! # Game Rules
//!
//! - The head advances one cell per `step`; a direct reversal request is ignored
//! - Entering the food cell grows the snake by one and scores a point; every
//!   `score_step` points the tick interval shrinks by `score_step` ms
//! - Entering any other occupied cell (the old tail included) ends the round with `Die`
//! - Off-grid moves wrap to the opposite edge, or end the round when wrap is off
//! - No room for new food, or reaching [`SnakeEngine::CAPACITY`], ends it with `Win`
//!
//! # Example
//!
//! ```
//! use lcd_snake_core::SnakeEngine;
//! use lcd_snake_display::Surface;
//! use lcd_snake_types::{Direction, LifeState};
//!
//! let mut surface = Surface::new(128, 64);
//! let mut engine = SnakeEngine::new(128, 64, 4, 12345);
//! engine.init(&mut surface, 3, Direction::Right, 10, 100).unwrap();
//!
//! assert_eq!(engine.length(), 3);
//! assert_eq!(engine.step(&mut surface, Direction::Up), LifeState::Live);
//! ```

pub mod engine;
pub mod error;
pub mod grid;
pub mod rng;
pub mod snapshot;

pub use lcd_snake_display as display;
pub use lcd_snake_types as types;

pub use engine::{Body, SnakeEngine};
pub use error::SnakeError;
pub use grid::{Cell, Grid};
pub use rng::SimpleRng;
pub use snapshot::SnakeSnapshot;
