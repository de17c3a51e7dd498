//! Shared types module - enums and constants used by every crate
//!
//! All types here are plain data with no behavior beyond parsing and small
//! conversions, so they can be shared by the display layer, the snake engine,
//! the terminal transport and the input layer.
//!
//! # Display Geometry
//!
//! The panel is a 128x64 monochrome dot matrix organized in pages:
//!
//! - **Width**: 128 columns (indexed 0-127)
//! - **Height**: 64 rows (indexed 0-63)
//! - **Page**: 8 vertical pixels packed into one byte, bit 0 on top
//! - **Pages**: 8 pages, streamed page by page, column by column
//!
//! # Game Timing Constants
//!
//! Speed is the tick interval in milliseconds, so a lower value is a faster game:
//!
//! | Constant | Value | Description |
//! |----------|-------|-------------|
//! | `DEFAULT_SPEED_MS` | 100 | Initial tick interval |
//! | `MAX_SPEED_MS` | 500 | Slowest allowed tick interval |
//! | `DEFAULT_SCORE_STEP` | 10 | Foods per speed-up, also the speed-up amount |
//! | `RESET_PULSE_MS` | 100 | Delay on each side of the reset pulse |
//! | `SPLASH_MS` | 3000 | Welcome screen duration |
//!
//! # Examples
//!
//! ```
//! use lcd_snake_types::{Direction, Orientation, LCD_HEIGHT, LCD_WIDTH};
//!
//! assert_eq!(Direction::from_str("up"), Some(Direction::Up));
//! assert_eq!(Direction::Up.opposite(), Direction::Down);
//! assert!(Direction::Left.is_reverse_of(Direction::Right));
//!
//! assert_eq!(Orientation::from_index(3), Some(Orientation::MirrorBoth));
//!
//! assert_eq!(LCD_WIDTH, 128);
//! assert_eq!(LCD_HEIGHT, 64);
//! ```

use serde::Serialize;

/// Panel width in pixels
pub const LCD_WIDTH: usize = 128;

/// Panel height in pixels
pub const LCD_HEIGHT: usize = 64;

/// Pixels per page (one byte spans 8 vertical pixels)
pub const PAGE_HEIGHT: usize = 8;

/// Number of pages on the panel
pub const LCD_PAGES: usize = LCD_HEIGHT / PAGE_HEIGHT;

/// Built-in glyph cell width in pixels
pub const FONT_WIDTH: usize = 8;

/// Built-in glyph cell height in pixels
pub const FONT_HEIGHT: usize = 8;

/// Side of one snake grid cell in pixels
pub const DEFAULT_POINT_SIZE: usize = 4;

/// Maximum snake length (head included); reaching it wins the round
pub const SNAKE_MAX_LEN: usize = 256;

/// Initial snake length
pub const DEFAULT_LENGTH: usize = 3;

/// Initial tick interval in milliseconds
pub const DEFAULT_SPEED_MS: u32 = 100;

/// Slowest tick interval in milliseconds
pub const MAX_SPEED_MS: u32 = 500;

/// Foods eaten per speed-up step (and the size of that step)
pub const DEFAULT_SCORE_STEP: u32 = 10;

/// Delay before and after toggling the reset line
pub const RESET_PULSE_MS: u64 = 100;

/// Welcome screen duration
pub const SPLASH_MS: u64 = 3000;

/// Binary pixel color.
///
/// `On` lights the dot, `Off` leaves it dark.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Color {
    #[default]
    Off,
    On,
}

impl Color {
    pub fn is_on(self) -> bool {
        self == Color::On
    }

    pub fn invert(self) -> Self {
        match self {
            Color::Off => Color::On,
            Color::On => Color::Off,
        }
    }
}

impl From<bool> for Color {
    fn from(on: bool) -> Self {
        if on {
            Color::On
        } else {
            Color::Off
        }
    }
}

/// Coordinate mirroring applied to every drawing and query call.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum Orientation {
    /// 0,0 is top left
    #[default]
    Normal,
    MirrorX,
    MirrorY,
    MirrorBoth,
}

impl Orientation {
    /// Map the controller-style numeric mode (0-3) to an orientation.
    pub fn from_index(index: u8) -> Option<Self> {
        match index {
            0 => Some(Orientation::Normal),
            1 => Some(Orientation::MirrorX),
            2 => Some(Orientation::MirrorY),
            3 => Some(Orientation::MirrorBoth),
            _ => None,
        }
    }

    /// Parse from a name or a numeric mode (case-insensitive)
    ///
    /// Accepts "normal", "mirrorx" | "x", "mirrory" | "y", "mirrorboth" | "both", or "0".."3".
    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "normal" | "0" => Some(Orientation::Normal),
            "mirrorx" | "x" | "1" => Some(Orientation::MirrorX),
            "mirrory" | "y" | "2" => Some(Orientation::MirrorY),
            "mirrorboth" | "both" | "xy" | "3" => Some(Orientation::MirrorBoth),
            _ => None,
        }
    }

    /// `(mirror_x, mirror_y)` flags
    pub fn mirrors(self) -> (bool, bool) {
        match self {
            Orientation::Normal => (false, false),
            Orientation::MirrorX => (true, false),
            Orientation::MirrorY => (false, true),
            Orientation::MirrorBoth => (true, true),
        }
    }

    pub fn from_mirrors(mirror_x: bool, mirror_y: bool) -> Self {
        match (mirror_x, mirror_y) {
            (false, false) => Orientation::Normal,
            (true, false) => Orientation::MirrorX,
            (false, true) => Orientation::MirrorY,
            (true, true) => Orientation::MirrorBoth,
        }
    }
}

/// Snake heading on the grid.
///
/// Rows grow downwards, so `Up` decreases the row.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    Up,
    Down,
    Left,
    Right,
}

impl Direction {
    pub const ALL: [Direction; 4] = [
        Direction::Up,
        Direction::Down,
        Direction::Left,
        Direction::Right,
    ];

    /// Parse direction from string (case-insensitive)
    ///
    /// Accepts full names or single letters: "up" | "u", "down" | "d", "left" | "l", "right" | "r"
    ///
    /// # Examples
    ///
    /// ```
    /// use lcd_snake_types::Direction;
    ///
    /// assert_eq!(Direction::from_str("LEFT"), Some(Direction::Left));
    /// assert_eq!(Direction::from_str("r"), Some(Direction::Right));
    /// assert_eq!(Direction::from_str("sideways"), None);
    /// ```
    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "up" | "u" => Some(Direction::Up),
            "down" | "d" => Some(Direction::Down),
            "left" | "l" => Some(Direction::Left),
            "right" | "r" => Some(Direction::Right),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Direction::Up => "up",
            Direction::Down => "down",
            Direction::Left => "left",
            Direction::Right => "right",
        }
    }

    /// Compact encoding used for lock-free sharing between threads
    pub fn to_u8(self) -> u8 {
        match self {
            Direction::Up => 0,
            Direction::Down => 1,
            Direction::Left => 2,
            Direction::Right => 3,
        }
    }

    /// Inverse of [`Direction::to_u8`]; any other value is rejected
    pub fn from_u8(value: u8) -> Option<Self> {
        match value {
            0 => Some(Direction::Up),
            1 => Some(Direction::Down),
            2 => Some(Direction::Left),
            3 => Some(Direction::Right),
            _ => None,
        }
    }

    pub fn opposite(self) -> Self {
        match self {
            Direction::Up => Direction::Down,
            Direction::Down => Direction::Up,
            Direction::Left => Direction::Right,
            Direction::Right => Direction::Left,
        }
    }

    pub fn is_reverse_of(self, other: Direction) -> bool {
        self.opposite() == other
    }

    /// Grid delta `(dcol, drow)` for one step
    pub fn delta(self) -> (i32, i32) {
        match self {
            Direction::Up => (0, -1),
            Direction::Down => (0, 1),
            Direction::Left => (-1, 0),
            Direction::Right => (1, 0),
        }
    }
}

/// Round status of the snake game.
///
/// `Win` and `Die` are terminal until the engine is initialized again.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum LifeState {
    #[default]
    Live,
    Win,
    Die,
}

impl LifeState {
    pub fn is_terminal(self) -> bool {
        self != LifeState::Live
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            LifeState::Live => "live",
            LifeState::Win => "win",
            LifeState::Die => "die",
        }
    }
}

/// Role of a grid segment
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum SegmentRole {
    Food,
    Head,
    Body,
}

/// Tag on every byte sent to the display controller
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ByteKind {
    Command,
    Data,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn classic_game_defaults() {
        assert_eq!(DEFAULT_LENGTH, 3);
        assert_eq!(DEFAULT_SPEED_MS, 100);
        assert_eq!(DEFAULT_SCORE_STEP, 10);
        assert_eq!(MAX_SPEED_MS, 500);
        assert_eq!(LCD_PAGES, 8);
    }

    #[test]
    fn direction_u8_encoding_is_reversible() {
        for dir in Direction::ALL {
            assert_eq!(Direction::from_u8(dir.to_u8()), Some(dir));
        }
        assert_eq!(Direction::from_u8(4), None);
        assert_eq!(Direction::from_u8(u8::MAX), None);
    }

    #[test]
    fn direction_reversal_pairs() {
        assert!(Direction::Up.is_reverse_of(Direction::Down));
        assert!(Direction::Right.is_reverse_of(Direction::Left));
        assert!(!Direction::Up.is_reverse_of(Direction::Left));
        assert!(!Direction::Up.is_reverse_of(Direction::Up));
    }

    #[test]
    fn orientation_mirror_flags_round_trip() {
        for idx in 0..4 {
            let o = Orientation::from_index(idx).unwrap();
            let (mx, my) = o.mirrors();
            assert_eq!(Orientation::from_mirrors(mx, my), o);
        }
        assert_eq!(Orientation::from_index(4), None);
        assert_eq!(Orientation::from_str("Both"), Some(Orientation::MirrorBoth));
        assert_eq!(Orientation::from_str("2"), Some(Orientation::MirrorY));
    }

    #[test]
    fn color_helpers() {
        assert_eq!(Color::from(true), Color::On);
        assert_eq!(Color::On.invert(), Color::Off);
        assert!(!Color::default().is_on());
    }
}
