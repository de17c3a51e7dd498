use serde::Serialize;

use crate::grid::Cell;
use crate::types::{Direction, LifeState};

/// Point-in-time view of a round, for status lines and logs.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SnakeSnapshot {
    pub life: LifeState,
    pub score: u32,
    pub speed: u32,
    pub score_step: u32,
    pub length: usize,
    pub direction: Direction,
    pub wrap: bool,
    pub head: Option<Cell>,
    pub food: Option<Cell>,
    pub cols: usize,
    pub rows: usize,
}

impl SnakeSnapshot {
    pub fn is_over(&self) -> bool {
        self.life.is_terminal()
    }

    pub fn status_line(&self) -> String {
        format!(
            "Speed: {} | Life: {} | Score: {} | Dir: {}",
            self.speed,
            self.life.as_str(),
            self.score,
            self.direction.as_str()
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> SnakeSnapshot {
        SnakeSnapshot {
            life: LifeState::Live,
            score: 3,
            speed: 90,
            score_step: 10,
            length: 6,
            direction: Direction::Up,
            wrap: true,
            head: Some(Cell::new(4, 2)),
            food: None,
            cols: 32,
            rows: 16,
        }
    }

    #[test]
    fn test_status_line() {
        assert_eq!(
            sample().status_line(),
            "Speed: 90 | Life: live | Score: 3 | Dir: up"
        );
    }

    #[test]
    fn test_snapshot_json_shape() {
        let value = serde_json::to_value(sample()).unwrap();
        assert_eq!(value["life"], "live");
        assert_eq!(value["direction"], "up");
        assert_eq!(value["head"]["col"], 4);
        assert_eq!(value["head"]["row"], 2);
        assert!(value["food"].is_null());
        assert!(!sample().is_over());
    }
}
