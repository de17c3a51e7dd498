//! Errors raised by snake setup.
//!
//! Drawing never fails; only engine configuration and placement can.

use std::fmt;

use crate::types::Direction;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SnakeError {
    /// Initial length must be in `1..capacity`
    InvalidLength { length: usize, capacity: usize },
    /// Score step must be positive
    InvalidScoreStep,
    /// No in-bounds straight body of this length fits the grid
    NoLayout { length: usize, direction: Direction },
    /// Random placement found no free cell
    NoSpace,
}

impl fmt::Display for SnakeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SnakeError::InvalidLength { length, capacity } => {
                write!(f, "invalid snake length {length} (must be 1..{capacity})")
            }
            SnakeError::InvalidScoreStep => write!(f, "score step must be positive"),
            SnakeError::NoLayout { length, direction } => write!(
                f,
                "no room for a {length}-cell snake heading {}",
                direction.as_str()
            ),
            SnakeError::NoSpace => write!(f, "no free cell left for placement"),
        }
    }
}

impl std::error::Error for SnakeError {}
