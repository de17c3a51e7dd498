//! Control cell shared by the input and tick threads.
//!
//! The input thread is the only writer and the tick thread the only reader
//! of each slot. Every slot is a single atomic, so a heading is never observed
//! half-written and speed nudges are never lost.

use std::sync::atomic::{AtomicBool, AtomicI32, AtomicU8, Ordering};

use log::debug;

use crate::map::Command;
use crate::types::Direction;

#[derive(Debug)]
pub struct ControlCell {
    direction: AtomicU8,
    /// Net speed-up presses (negative for slow-downs) not yet applied
    speed_nudges: AtomicI32,
    restart: AtomicBool,
    quit: AtomicBool,
}

impl ControlCell {
    pub fn new(direction: Direction) -> Self {
        Self {
            direction: AtomicU8::new(direction.to_u8()),
            speed_nudges: AtomicI32::new(0),
            restart: AtomicBool::new(false),
            quit: AtomicBool::new(false),
        }
    }

    pub fn request_direction(&self, direction: Direction) {
        self.direction.store(direction.to_u8(), Ordering::Release);
    }

    /// Latest requested heading
    pub fn requested_direction(&self) -> Direction {
        // Only `to_u8` values are ever stored.
        Direction::from_u8(self.direction.load(Ordering::Acquire)).unwrap_or(Direction::Right)
    }

    pub fn nudge_speed(&self, delta: i32) {
        self.speed_nudges.fetch_add(delta, Ordering::AcqRel);
    }

    /// Drain pending nudges: positive means speed up that many times.
    pub fn take_speed_nudges(&self) -> i32 {
        self.speed_nudges.swap(0, Ordering::AcqRel)
    }

    pub fn request_restart(&self) {
        self.restart.store(true, Ordering::Release);
    }

    /// True once per restart request
    pub fn take_restart(&self) -> bool {
        self.restart.swap(false, Ordering::AcqRel)
    }

    pub fn request_quit(&self) {
        self.quit.store(true, Ordering::Release);
    }

    pub fn should_quit(&self) -> bool {
        self.quit.load(Ordering::Acquire)
    }

    /// Record a command for the tick thread.
    pub fn apply(&self, command: Command) {
        debug!("command {command:?}");
        match command {
            Command::Turn(direction) => self.request_direction(direction),
            Command::SpeedUp => self.nudge_speed(1),
            Command::SlowDown => self.nudge_speed(-1),
            Command::Restart => self.request_restart(),
            Command::Quit => self.request_quit(),
        }
    }
}

impl Default for ControlCell {
    fn default() -> Self {
        Self::new(Direction::Right)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use std::thread;

    #[test]
    fn test_latest_direction_wins() {
        let cell = ControlCell::new(Direction::Right);
        cell.apply(Command::Turn(Direction::Up));
        cell.apply(Command::Turn(Direction::Left));
        assert_eq!(cell.requested_direction(), Direction::Left);
    }

    #[test]
    fn test_speed_nudges_net_out_and_drain() {
        let cell = ControlCell::default();
        cell.apply(Command::SpeedUp);
        cell.apply(Command::SpeedUp);
        cell.apply(Command::SlowDown);
        assert_eq!(cell.take_speed_nudges(), 1);
        assert_eq!(cell.take_speed_nudges(), 0);
    }

    #[test]
    fn test_restart_is_one_shot() {
        let cell = ControlCell::default();
        assert!(!cell.take_restart());
        cell.apply(Command::Restart);
        assert!(cell.take_restart());
        assert!(!cell.take_restart());
    }

    #[test]
    fn test_writer_thread_is_seen_by_reader() {
        let cell = Arc::new(ControlCell::default());
        let writer = Arc::clone(&cell);
        let handle = thread::spawn(move || {
            for _ in 0..1000 {
                writer.apply(Command::SpeedUp);
            }
            writer.apply(Command::Turn(Direction::Down));
            writer.apply(Command::Quit);
        });

        let mut total = 0;
        while !cell.should_quit() {
            total += cell.take_speed_nudges();
            thread::yield_now();
        }
        handle.join().unwrap();
        total += cell.take_speed_nudges();

        assert_eq!(total, 1000);
        assert_eq!(cell.requested_direction(), Direction::Down);
    }
}
