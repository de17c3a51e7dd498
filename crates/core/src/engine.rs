//! Snake engine - the game state machine
//!
//! One [`SnakeEngine`] owns a round: the body (head first), the food cell,
//! heading, score, speed and the occupancy [`Grid`]. Every drawing side effect
//! goes through the [`Canvas`] passed into `init`/`step`, so the engine never
//! holds on to a display.
//!
//! A round runs `Live` until a `step` ends it with `Win` or `Die`. Terminal
//! states stick until the next successful `init`.

use arrayvec::ArrayVec;
use log::{debug, info};

use crate::display::{Canvas, Rasterizer};
use crate::error::SnakeError;
use crate::grid::{Cell, Grid};
use crate::rng::SimpleRng;
use crate::snapshot::SnakeSnapshot;
use crate::types::{
    Color, Direction, LifeState, SegmentRole, DEFAULT_SCORE_STEP, DEFAULT_SPEED_MS, MAX_SPEED_MS,
    SNAKE_MAX_LEN,
};

/// Snake cells, head first
pub type Body = ArrayVec<Cell, SNAKE_MAX_LEN>;

#[derive(Debug, Clone)]
pub struct SnakeEngine {
    grid: Grid,
    point_size: usize,
    body: Body,
    food: Option<Cell>,
    direction: Direction,
    life: LifeState,
    score: u32,
    /// Tick interval in milliseconds; lower is faster
    speed: u32,
    score_step: u32,
    wrap: bool,
    rng: SimpleRng,
}

impl SnakeEngine {
    /// Longest snake a round can reach; reaching it wins.
    pub const CAPACITY: usize = SNAKE_MAX_LEN;

    /// Engine for a `width x height` pixel display tiled with `point_size` cells.
    ///
    /// A point size of 0 is treated as 1. No snake exists until `init`.
    pub fn new(width: usize, height: usize, point_size: usize, seed: u32) -> Self {
        let point_size = point_size.max(1);
        Self {
            grid: Grid::for_display(width, height, point_size),
            point_size,
            body: ArrayVec::new(),
            food: None,
            direction: Direction::Right,
            life: LifeState::Live,
            score: 0,
            speed: DEFAULT_SPEED_MS,
            score_step: DEFAULT_SCORE_STEP,
            wrap: true,
            rng: SimpleRng::new(seed),
        }
    }

    /// Start a new round.
    ///
    /// The head goes to a random cell from which the straight body, trailing
    /// opposite to `direction`, stays on the grid. Cells of the previous round
    /// are erased from `canvas` first. On error the previous round is left as is,
    /// except for `NoSpace`, which leaves a snake without food.
    pub fn init<C: Canvas + ?Sized>(
        &mut self,
        canvas: &mut C,
        length: usize,
        direction: Direction,
        score_step: u32,
        speed: u32,
    ) -> Result<(), SnakeError> {
        if length == 0 || length >= Self::CAPACITY {
            return Err(SnakeError::InvalidLength {
                length,
                capacity: Self::CAPACITY,
            });
        }
        if score_step == 0 {
            return Err(SnakeError::InvalidScoreStep);
        }
        let head = self
            .pick_head(length, direction)
            .ok_or(SnakeError::NoLayout { length, direction })?;

        self.erase_all(canvas);
        self.grid.clear();
        self.body.clear();
        self.food = None;

        self.life = LifeState::Live;
        self.score = 0;
        self.direction = direction;
        self.score_step = score_step;
        self.speed = speed;

        let back = direction.opposite().delta();
        let mut cell = head;
        for i in 0..length {
            let role = if i == 0 {
                SegmentRole::Head
            } else {
                SegmentRole::Body
            };
            self.grid.set(cell, Some(role));
            self.body.push(cell);
            cell = cell.offset(back);
        }
        debug!(
            "init: {length} cells heading {} from ({}, {})",
            direction.as_str(),
            head.col,
            head.row
        );

        let placed = self.place_food();
        self.draw(canvas);
        placed.map(|_| ()).ok_or(SnakeError::NoSpace)
    }

    /// Advance one tick and return the resulting life state.
    ///
    /// `requested` replaces the heading unless it is a direct reversal.
    /// Once the round is over this is a no-op.
    pub fn step<C: Canvas + ?Sized>(&mut self, canvas: &mut C, requested: Direction) -> LifeState {
        if self.life.is_terminal() {
            return self.life;
        }
        let (Some(&old_head), Some(&tail)) = (self.body.first(), self.body.last()) else {
            return self.life;
        };

        if !requested.is_reverse_of(self.direction) {
            self.direction = requested;
        }

        let mut head = old_head.offset(self.direction.delta());
        if self.grid.is_out_of_bounds(head) {
            if !self.wrap {
                self.finish(LifeState::Die);
                return self.life;
            }
            head = self.grid.wrap(head);
        }

        // Occupancy is tested before the tail moves, so the old tail cell is solid too.
        let eaten = match self.grid.get(head) {
            Some(Some(SegmentRole::Food)) => true,
            Some(Some(_)) => {
                self.finish(LifeState::Die);
                return self.life;
            }
            _ => false,
        };

        self.grid.set(old_head, Some(SegmentRole::Body));
        let mut grow = false;
        if eaten {
            // The head takes the food cell before a new one is searched for.
            self.grid.set(head, Some(SegmentRole::Head));
            self.food = None;
            if self.place_food().is_some() {
                grow = true;
                self.score += 1;
                if self.score % self.score_step == 0 && self.speed > self.score_step {
                    self.speed = (self.speed - self.score_step).max(self.score_step);
                    debug!("score {} -> speed {} ms", self.score, self.speed);
                }
            } else {
                self.finish(LifeState::Win);
            }
        }

        if !grow {
            self.body.pop();
            self.grid.set(tail, None);
        }
        self.grid.set(head, Some(SegmentRole::Head));
        self.body.insert(0, head);

        if self.body.len() >= Self::CAPACITY {
            self.finish(LifeState::Win);
        }

        self.draw(canvas);
        if !grow && !self.grid.is_occupied(tail) {
            self.draw_cell(canvas, tail, Color::Off);
        }
        self.life
    }

    /// Paint every snake cell and the food.
    pub fn draw<C: Canvas + ?Sized>(&self, canvas: &mut C) {
        for &cell in &self.body {
            self.draw_cell(canvas, cell, Color::On);
        }
        if let Some(food) = self.food {
            self.draw_cell(canvas, food, Color::On);
        }
    }

    /// Pixel rectangle `(x0, y0, x1, y1)` covered by a cell, inclusive
    pub fn cell_rect(&self, cell: Cell) -> (i32, i32, i32, i32) {
        let size = self.point_size as i32;
        let (x, y) = (cell.col * size, cell.row * size);
        (x, y, x + size - 1, y + size - 1)
    }

    fn draw_cell<C: Canvas + ?Sized>(&self, canvas: &mut C, cell: Cell, color: Color) {
        if self.grid.is_out_of_bounds(cell) {
            return;
        }
        let (x0, y0, x1, y1) = self.cell_rect(cell);
        if self.point_size == 1 {
            canvas.point(x0, y0, color);
        } else {
            canvas.rectangle(x0, y0, x1, y1, color, true);
        }
    }

    fn erase_all<C: Canvas + ?Sized>(&self, canvas: &mut C) {
        for &cell in &self.body {
            self.draw_cell(canvas, cell, Color::Off);
        }
        if let Some(food) = self.food {
            self.draw_cell(canvas, food, Color::Off);
        }
    }

    /// Random head cell for a straight body of `length`, or `None` if none fits.
    fn pick_head(&mut self, length: usize, direction: Direction) -> Option<Cell> {
        let (cols, rows) = (self.grid.cols(), self.grid.rows());
        let span = length - 1;
        let (col_lo, col_hi, row_lo, row_hi) = match direction {
            Direction::Right => (span, cols, 0, rows),
            Direction::Left => (0, cols.checked_sub(span)?, 0, rows),
            Direction::Down => (0, cols, span, rows),
            Direction::Up => (0, cols, 0, rows.checked_sub(span)?),
        };
        if col_lo >= col_hi || row_lo >= row_hi {
            return None;
        }
        let (w, h) = (col_hi - col_lo, row_hi - row_lo);
        let pick = self.rng.next_range((w * h) as u32) as usize;
        Some(Cell::new((col_lo + pick % w) as i32, (row_lo + pick / w) as i32))
    }

    /// Drop food on a random free cell, trying as many times as there are cells.
    fn place_food(&mut self) -> Option<Cell> {
        let (cols, rows) = (self.grid.cols() as u32, self.grid.rows() as u32);
        for _ in 0..self.grid.area() {
            let cell = Cell::new(
                self.rng.next_range(cols) as i32,
                self.rng.next_range(rows) as i32,
            );
            if self.grid.is_free(cell) {
                self.grid.set(cell, Some(SegmentRole::Food));
                self.food = Some(cell);
                debug!("food at ({}, {})", cell.col, cell.row);
                return Some(cell);
            }
        }
        debug!("no free cell for food after {} tries", self.grid.area());
        None
    }

    /// Enter a terminal state; a round that already ended keeps its outcome.
    fn finish(&mut self, outcome: LifeState) {
        if self.life == LifeState::Live {
            self.life = outcome;
            info!(
                "round over: {} (score {}, length {})",
                outcome.as_str(),
                self.score,
                self.body.len()
            );
        }
    }

    pub fn speed(&self) -> u32 {
        self.speed
    }

    /// Set the tick interval, clamped to `score_step..=500`; returns the stored value.
    pub fn set_speed(&mut self, speed: u32) -> u32 {
        self.speed = speed.min(MAX_SPEED_MS).max(self.score_step);
        self.speed
    }

    /// Shorten the tick interval by one score step, never below the step.
    pub fn speed_up(&mut self) -> u32 {
        if self.speed > self.score_step {
            self.set_speed(self.speed - self.score_step);
        }
        self.speed
    }

    /// Lengthen the tick interval by one score step, never past 500 ms.
    pub fn slow_down(&mut self) -> u32 {
        if self.speed < MAX_SPEED_MS {
            self.set_speed(self.speed.saturating_add(self.score_step));
        }
        self.speed
    }

    pub fn direction(&self) -> Direction {
        self.direction
    }

    /// Force the heading, reversal included.
    pub fn set_direction(&mut self, direction: Direction) {
        self.direction = direction;
    }

    pub fn score(&self) -> u32 {
        self.score
    }

    pub fn life(&self) -> LifeState {
        self.life
    }

    pub fn score_step(&self) -> u32 {
        self.score_step
    }

    pub fn set_score_step(&mut self, step: u32) -> Result<(), SnakeError> {
        if step == 0 {
            return Err(SnakeError::InvalidScoreStep);
        }
        self.score_step = step;
        Ok(())
    }

    pub fn wrap(&self) -> bool {
        self.wrap
    }

    pub fn set_wrap(&mut self, wrap: bool) {
        self.wrap = wrap;
    }

    pub fn length(&self) -> usize {
        self.body.len()
    }

    pub fn body(&self) -> &[Cell] {
        &self.body
    }

    pub fn head(&self) -> Option<Cell> {
        self.body.first().copied()
    }

    pub fn food(&self) -> Option<Cell> {
        self.food
    }

    pub fn grid(&self) -> &Grid {
        &self.grid
    }

    pub fn point_size(&self) -> usize {
        self.point_size
    }

    pub fn snapshot(&self) -> SnakeSnapshot {
        SnakeSnapshot {
            life: self.life,
            score: self.score,
            speed: self.speed,
            score_step: self.score_step,
            length: self.body.len(),
            direction: self.direction,
            wrap: self.wrap,
            head: self.head(),
            food: self.food,
            cols: self.grid.cols(),
            rows: self.grid.rows(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::display::Surface;

    fn setup() -> (SnakeEngine, Surface) {
        (SnakeEngine::new(128, 64, 4, 42), Surface::new(128, 64))
    }

    /// Replace the round with a fixed layout, bypassing random placement.
    fn arrange(
        engine: &mut SnakeEngine,
        canvas: &mut Surface,
        body: &[Cell],
        direction: Direction,
        food: Option<Cell>,
    ) {
        engine.grid.clear();
        engine.body.clear();
        for (i, &cell) in body.iter().enumerate() {
            let role = if i == 0 {
                SegmentRole::Head
            } else {
                SegmentRole::Body
            };
            engine.grid.set(cell, Some(role));
            engine.body.push(cell);
        }
        engine.food = food;
        if let Some(f) = food {
            engine.grid.set(f, Some(SegmentRole::Food));
        }
        engine.direction = direction;
        engine.life = LifeState::Live;
        engine.score = 0;
        canvas.clear(Color::Off);
        engine.draw(canvas);
    }

    fn cell_lit(engine: &SnakeEngine, canvas: &Surface, cell: Cell) -> bool {
        let (x0, y0, x1, y1) = engine.cell_rect(cell);
        (x0..=x1).all(|x| (y0..=y1).all(|y| canvas.get_point(x, y) == Some(Color::On)))
    }

    fn cell_dark(engine: &SnakeEngine, canvas: &Surface, cell: Cell) -> bool {
        let (x0, y0, x1, y1) = engine.cell_rect(cell);
        (x0..=x1).all(|x| (y0..=y1).all(|y| canvas.get_point(x, y) == Some(Color::Off)))
    }

    #[test]
    fn test_init_lays_straight_body_behind_head() {
        for seed in 0..50 {
            let mut engine = SnakeEngine::new(128, 64, 4, seed);
            let mut canvas = Surface::new(128, 64);
            engine
                .init(&mut canvas, 3, Direction::Right, 10, 100)
                .unwrap();

            let body = engine.body();
            assert_eq!(body.len(), 3);
            assert_eq!(body[1], body[0].offset((-1, 0)));
            assert_eq!(body[2], body[0].offset((-2, 0)));

            let food = engine.food().unwrap();
            assert!(!body.contains(&food));
            assert_eq!(engine.grid().occupied_count(), 4);
            assert_eq!(canvas.lit_count(), 4 * 16);
            assert_eq!(engine.life(), LifeState::Live);
            assert_eq!(engine.score(), 0);
        }
    }

    #[test]
    fn test_init_body_stays_on_grid_for_every_heading() {
        for direction in Direction::ALL {
            for seed in 1..20 {
                let mut engine = SnakeEngine::new(32, 32, 4, seed);
                let mut canvas = Surface::new(32, 32);
                engine.init(&mut canvas, 8, direction, 10, 100).unwrap();
                assert!(engine
                    .body()
                    .iter()
                    .all(|c| !engine.grid().is_out_of_bounds(*c)));
            }
        }
    }

    #[test]
    fn test_init_rejects_bad_arguments() {
        let (mut engine, mut canvas) = setup();
        assert_eq!(
            engine.init(&mut canvas, 0, Direction::Up, 10, 100),
            Err(SnakeError::InvalidLength {
                length: 0,
                capacity: 256
            })
        );
        assert!(engine
            .init(&mut canvas, SnakeEngine::CAPACITY, Direction::Up, 10, 100)
            .is_err());
        assert_eq!(
            engine.init(&mut canvas, 3, Direction::Up, 0, 100),
            Err(SnakeError::InvalidScoreStep)
        );
        assert_eq!(engine.length(), 0);
        assert_eq!(canvas.lit_count(), 0);
    }

    #[test]
    fn test_init_without_room_for_body() {
        // 4x4 grid
        let mut engine = SnakeEngine::new(16, 16, 4, 3);
        let mut canvas = Surface::new(16, 16);
        assert_eq!(
            engine.init(&mut canvas, 5, Direction::Left, 10, 100),
            Err(SnakeError::NoLayout {
                length: 5,
                direction: Direction::Left
            })
        );
        assert!(engine.init(&mut canvas, 4, Direction::Left, 10, 100).is_ok());
    }

    #[test]
    fn test_reinit_erases_previous_round() {
        let (mut engine, mut canvas) = setup();
        engine.init(&mut canvas, 5, Direction::Down, 10, 100).unwrap();
        engine.init(&mut canvas, 3, Direction::Up, 10, 100).unwrap();
        assert_eq!(canvas.lit_count(), 4 * 16);
    }

    #[test]
    fn test_step_moves_and_erases_tail() {
        let (mut engine, mut canvas) = setup();
        let body = [Cell::new(5, 5), Cell::new(4, 5), Cell::new(3, 5)];
        arrange(&mut engine, &mut canvas, &body, Direction::Right, Some(Cell::new(20, 10)));

        assert_eq!(engine.step(&mut canvas, Direction::Right), LifeState::Live);
        assert_eq!(
            engine.body(),
            &[Cell::new(6, 5), Cell::new(5, 5), Cell::new(4, 5)]
        );
        assert!(cell_lit(&engine, &canvas, Cell::new(6, 5)));
        assert!(cell_dark(&engine, &canvas, Cell::new(3, 5)));
        assert!(engine.grid().is_free(Cell::new(3, 5)));
        assert_eq!(canvas.lit_count(), 4 * 16);
    }

    #[test]
    fn test_step_ignores_reversal() {
        let (mut engine, mut canvas) = setup();
        let body = [Cell::new(5, 5), Cell::new(4, 5), Cell::new(3, 5)];
        arrange(&mut engine, &mut canvas, &body, Direction::Right, Some(Cell::new(20, 10)));

        engine.step(&mut canvas, Direction::Left);
        assert_eq!(engine.direction(), Direction::Right);
        assert_eq!(engine.head(), Some(Cell::new(6, 5)));

        engine.step(&mut canvas, Direction::Up);
        assert_eq!(engine.head(), Some(Cell::new(6, 4)));
    }

    #[test]
    fn test_eating_grows_and_keeps_tail() {
        let (mut engine, mut canvas) = setup();
        let body = [Cell::new(5, 5), Cell::new(4, 5), Cell::new(3, 5)];
        let food = Cell::new(6, 5);
        arrange(&mut engine, &mut canvas, &body, Direction::Right, Some(food));

        assert_eq!(engine.step(&mut canvas, Direction::Right), LifeState::Live);
        assert_eq!(engine.score(), 1);
        assert_eq!(engine.length(), 4);
        assert_eq!(engine.head(), Some(food));
        assert!(cell_lit(&engine, &canvas, Cell::new(3, 5)));

        let next = engine.food().unwrap();
        assert_ne!(next, food);
        assert!(!engine.body().contains(&next));
        assert_eq!(engine.grid().occupied_count(), 5);
        assert_eq!(canvas.lit_count(), 5 * 16);
    }

    #[test]
    fn test_food_in_same_row_is_not_eaten() {
        let (mut engine, mut canvas) = setup();
        let body = [Cell::new(5, 5), Cell::new(4, 5)];
        arrange(&mut engine, &mut canvas, &body, Direction::Right, Some(Cell::new(9, 5)));

        engine.step(&mut canvas, Direction::Right);
        assert_eq!(engine.score(), 0);
        assert_eq!(engine.length(), 2);
        assert_eq!(engine.food(), Some(Cell::new(9, 5)));
    }

    #[test]
    fn test_speed_drops_on_score_multiple() {
        let (mut engine, mut canvas) = setup();
        engine.score_step = 2;
        engine.speed = 100;
        let body = [Cell::new(5, 5), Cell::new(4, 5)];
        arrange(&mut engine, &mut canvas, &body, Direction::Right, Some(Cell::new(6, 5)));

        engine.step(&mut canvas, Direction::Right);
        assert_eq!(engine.speed(), 100);

        let head = engine.head().unwrap();
        let food = head.offset((1, 0));
        engine.grid.set(engine.food.unwrap(), None);
        engine.grid.set(food, Some(SegmentRole::Food));
        engine.food = Some(food);

        engine.step(&mut canvas, Direction::Right);
        assert_eq!(engine.score(), 2);
        assert_eq!(engine.speed(), 98);
    }

    #[test]
    fn test_self_collision_dies_and_stays_dead() {
        let (mut engine, mut canvas) = setup();
        // Head at (2,2) heading left; turning down runs into (2,3).
        let body = [
            Cell::new(2, 2),
            Cell::new(3, 2),
            Cell::new(3, 3),
            Cell::new(2, 3),
            Cell::new(1, 3),
        ];
        arrange(&mut engine, &mut canvas, &body, Direction::Left, Some(Cell::new(20, 10)));

        assert_eq!(engine.step(&mut canvas, Direction::Down), LifeState::Die);
        let frozen = engine.snapshot();
        let pixels = canvas.buffer().to_vec();

        assert_eq!(engine.step(&mut canvas, Direction::Left), LifeState::Die);
        assert_eq!(engine.snapshot(), frozen);
        assert_eq!(canvas.buffer(), &pixels[..]);
    }

    #[test]
    fn test_moving_into_old_tail_cell_dies() {
        let (mut engine, mut canvas) = setup();
        let body = [
            Cell::new(1, 1),
            Cell::new(1, 2),
            Cell::new(2, 2),
            Cell::new(2, 1),
        ];
        arrange(&mut engine, &mut canvas, &body, Direction::Up, Some(Cell::new(20, 10)));
        assert_eq!(engine.step(&mut canvas, Direction::Right), LifeState::Die);
    }

    #[test]
    fn test_wrap_enters_opposite_edge() {
        let (mut engine, mut canvas) = setup();
        let body = [Cell::new(31, 7), Cell::new(30, 7)];
        arrange(&mut engine, &mut canvas, &body, Direction::Right, Some(Cell::new(10, 10)));

        assert_eq!(engine.step(&mut canvas, Direction::Right), LifeState::Live);
        assert_eq!(engine.head(), Some(Cell::new(0, 7)));

        let body = [Cell::new(4, 0), Cell::new(4, 1)];
        arrange(&mut engine, &mut canvas, &body, Direction::Up, Some(Cell::new(10, 10)));
        engine.step(&mut canvas, Direction::Up);
        assert_eq!(engine.head(), Some(Cell::new(4, 15)));
    }

    #[test]
    fn test_wrap_onto_food_eats_it() {
        let (mut engine, mut canvas) = setup();
        let body = [Cell::new(0, 3), Cell::new(1, 3)];
        arrange(&mut engine, &mut canvas, &body, Direction::Left, Some(Cell::new(31, 3)));

        engine.step(&mut canvas, Direction::Left);
        assert_eq!(engine.head(), Some(Cell::new(31, 3)));
        assert_eq!(engine.score(), 1);
    }

    #[test]
    fn test_wall_kills_without_wrap_exactly_once() {
        let (mut engine, mut canvas) = setup();
        engine.set_wrap(false);
        let body = [Cell::new(31, 7), Cell::new(30, 7)];
        arrange(&mut engine, &mut canvas, &body, Direction::Right, Some(Cell::new(10, 10)));

        assert_eq!(engine.step(&mut canvas, Direction::Right), LifeState::Die);
        let after = engine.snapshot();
        assert_eq!(engine.step(&mut canvas, Direction::Up), LifeState::Die);
        assert_eq!(engine.snapshot(), after);
    }

    #[test]
    fn test_full_board_is_a_win() {
        // 2x1 grid: eating the only food leaves nowhere for the next one.
        let mut engine = SnakeEngine::new(8, 4, 4, 1);
        let mut canvas = Surface::new(8, 4);
        arrange(
            &mut engine,
            &mut canvas,
            &[Cell::new(0, 0)],
            Direction::Right,
            Some(Cell::new(1, 0)),
        );

        assert_eq!(engine.step(&mut canvas, Direction::Right), LifeState::Win);
        assert_eq!(engine.score(), 0);
        assert_eq!(engine.head(), Some(Cell::new(1, 0)));
        assert!(cell_dark(&engine, &canvas, Cell::new(0, 0)));
        assert_eq!(engine.step(&mut canvas, Direction::Right), LifeState::Win);
    }

    #[test]
    fn test_reaching_capacity_is_a_win() {
        let mut engine = SnakeEngine::new(128, 64, 1, 5);
        let mut canvas = Surface::new(128, 64);
        let mut body = vec![Cell::new(0, 10)];
        body.extend((0..SnakeEngine::CAPACITY as i32 - 2).map(|i| Cell::new(i % 128, i / 128)));
        arrange(&mut engine, &mut canvas, &body, Direction::Right, Some(Cell::new(1, 10)));

        assert_eq!(engine.step(&mut canvas, Direction::Right), LifeState::Win);
        assert_eq!(engine.length(), SnakeEngine::CAPACITY);
    }

    #[test]
    fn test_point_size_one_draws_single_pixels() {
        let mut engine = SnakeEngine::new(128, 64, 1, 9);
        let mut canvas = Surface::new(128, 64);
        engine.init(&mut canvas, 3, Direction::Up, 10, 100).unwrap();
        assert_eq!(canvas.lit_count(), 4);
        assert_eq!((engine.grid().cols(), engine.grid().rows()), (128, 64));
    }

    #[test]
    fn test_step_before_init_is_harmless() {
        let (mut engine, mut canvas) = setup();
        assert_eq!(engine.step(&mut canvas, Direction::Down), LifeState::Live);
        assert_eq!(canvas.lit_count(), 0);
    }

    #[test]
    fn test_speed_controls() {
        let (mut engine, mut canvas) = setup();
        engine.init(&mut canvas, 3, Direction::Right, 10, 100).unwrap();

        assert_eq!(engine.set_speed(5), 10);
        assert_eq!(engine.set_speed(900), 500);
        assert_eq!(engine.set_speed(250), 250);

        assert_eq!(engine.slow_down(), 260);
        engine.set_speed(500);
        assert_eq!(engine.slow_down(), 500);

        engine.set_speed(20);
        assert_eq!(engine.speed_up(), 10);
        assert_eq!(engine.speed_up(), 10);
    }

    #[test]
    fn test_speed_nudges_stay_within_bounds() {
        let (mut engine, mut canvas) = setup();
        engine.init(&mut canvas, 3, Direction::Right, 10, 100).unwrap();

        engine.set_speed(495);
        assert_eq!(engine.slow_down(), 500);
        assert_eq!(engine.slow_down(), 500);

        engine.set_speed(15);
        assert_eq!(engine.speed_up(), 10);
    }

    #[test]
    fn test_score_speed_drop_stops_at_step() {
        let (mut engine, mut canvas) = setup();
        engine.score_step = 1;
        engine.speed = 1;
        let body = [Cell::new(5, 5), Cell::new(4, 5)];
        arrange(&mut engine, &mut canvas, &body, Direction::Right, Some(Cell::new(6, 5)));
        engine.step(&mut canvas, Direction::Right);
        assert_eq!(engine.score(), 1);
        assert_eq!(engine.speed(), 1);

        engine.score_step = 10;
        engine.speed = 15;
        engine.score = 9;
        let head = engine.head().unwrap();
        let food = head.offset((1, 0));
        engine.grid.set(engine.food.unwrap(), None);
        engine.grid.set(food, Some(SegmentRole::Food));
        engine.food = Some(food);
        engine.step(&mut canvas, Direction::Right);
        assert_eq!(engine.score(), 10);
        assert_eq!(engine.speed(), 10);
    }

    #[test]
    fn test_mutators() {
        let (mut engine, _) = setup();
        assert_eq!(engine.set_score_step(0), Err(SnakeError::InvalidScoreStep));
        engine.set_score_step(5).unwrap();
        assert_eq!(engine.score_step(), 5);

        engine.set_direction(Direction::Left);
        assert_eq!(engine.direction(), Direction::Left);

        assert!(engine.wrap());
        engine.set_wrap(false);
        assert!(!engine.wrap());
    }
}
