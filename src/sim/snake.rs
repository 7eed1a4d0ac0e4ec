//! The snake entity

use std::collections::VecDeque;

use serde::{Deserialize, Serialize};

use super::grid::{Direction, Grid, Position};

/// Snake body (head first) plus its heading and one buffered turn
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Snake {
    segments: VecDeque<Position>,
    direction: Direction,
    /// Turn requested since the last step, applied at most once per tick
    pending: Option<Direction>,
    /// Segments still to be added, one per step
    #[serde(default)]
    growth: usize,
}

impl Snake {
    /// Build a straight snake with its head at `head`, body trailing behind
    /// `direction`. Length is clamped so the whole body fits on the grid.
    pub fn new(grid: &Grid, head: Position, direction: Direction, length: usize) -> Self {
        let back = direction.opposite().delta();
        let mut segments = VecDeque::with_capacity(length.max(1));
        segments.push_back(head);
        for i in 1..length as i32 {
            let pos = head + back * i;
            if !grid.in_bounds(pos) {
                break;
            }
            segments.push_back(pos);
        }
        Self {
            segments,
            direction,
            pending: None,
            growth: 0,
        }
    }

    /// Snake centered on the grid, heading right
    pub fn centered(grid: &Grid, length: usize) -> Self {
        Self::new(grid, grid.center(), Direction::Right, length)
    }

    pub fn head(&self) -> Position {
        self.segments[0]
    }

    pub fn tail(&self) -> Position {
        self.segments[self.segments.len() - 1]
    }

    pub fn len(&self) -> usize {
        self.segments.len()
    }

    pub fn is_empty(&self) -> bool {
        self.segments.is_empty()
    }

    pub fn direction(&self) -> Direction {
        self.direction
    }

    pub fn pending_direction(&self) -> Option<Direction> {
        self.pending
    }

    pub fn segments(&self) -> impl Iterator<Item = Position> + '_ {
        self.segments.iter().copied()
    }

    pub fn occupies(&self, pos: Position) -> bool {
        self.segments.contains(&pos)
    }

    /// Buffer a turn for the next step.
    ///
    /// Ignored when a turn is already buffered this tick or when it would
    /// reverse the snake onto its own neck. Returns whether it was accepted.
    pub fn queue_direction(&mut self, dir: Direction) -> bool {
        if self.pending.is_some() || dir == self.direction.opposite() {
            return false;
        }
        self.pending = Some(dir);
        true
    }

    /// Apply the buffered turn (if any) and return the new heading
    pub fn take_turn(&mut self) -> Direction {
        if let Some(dir) = self.pending.take() {
            self.direction = dir;
        }
        self.direction
    }

    /// Cell the head would enter moving along the current heading
    pub fn next_head(&self) -> Position {
        self.head() + self.direction.delta()
    }

    /// Would `pos` hit the body? The tail cell is excluded when it moves out
    /// of the way this step (no growth).
    pub fn body_blocks(&self, pos: Position, growing: bool) -> bool {
        let n = if growing {
            self.segments.len()
        } else {
            self.segments.len() - 1
        };
        self.segments.iter().take(n).any(|&s| s == pos)
    }

    /// Queue `segments` of growth, applied one per step
    pub fn add_growth(&mut self, segments: usize) {
        self.growth += segments;
    }

    pub fn is_growing(&self) -> bool {
        self.growth > 0
    }

    /// Commit a step: push the new head, keep the tail when `grow` is set or
    /// queued growth remains
    pub fn advance(&mut self, new_head: Position, grow: bool) {
        self.segments.push_front(new_head);
        if grow {
            return;
        }
        if self.growth > 0 {
            self.growth -= 1;
        } else {
            self.segments.pop_back();
        }
    }

    /// Remove up to `amount` tail segments without going below `floor`
    /// (itself never below one). Returns how many were removed.
    pub fn shrink(&mut self, amount: usize, floor: usize) -> usize {
        let floor = floor.max(1);
        let removable = self.segments.len().saturating_sub(floor).min(amount);
        self.growth = 0;
        for _ in 0..removable {
            self.segments.pop_back();
        }
        removable
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::IVec2;
    use proptest::prelude::*;

    fn grid() -> Grid {
        Grid::new(10, 10)
    }

    #[test]
    fn test_centered_layout() {
        let snake = Snake::centered(&grid(), 4);
        assert_eq!(snake.head(), IVec2::new(5, 5));
        assert_eq!(snake.tail(), IVec2::new(2, 5));
        assert_eq!(snake.len(), 4);
        assert_eq!(snake.direction(), Direction::Right);
    }

    #[test]
    fn test_length_clamped_to_grid() {
        let snake = Snake::new(&grid(), IVec2::new(1, 0), Direction::Right, 6);
        assert_eq!(snake.len(), 2);
    }

    #[test]
    fn test_reverse_is_ignored() {
        let mut snake = Snake::centered(&grid(), 3);
        assert!(!snake.queue_direction(Direction::Left));
        assert_eq!(snake.take_turn(), Direction::Right);
    }

    #[test]
    fn test_one_turn_per_tick() {
        let mut snake = Snake::centered(&grid(), 3);
        assert!(snake.queue_direction(Direction::Up));
        // A second turn in the same tick would allow Up+Left = reversal
        assert!(!snake.queue_direction(Direction::Left));
        assert_eq!(snake.take_turn(), Direction::Up);
        assert!(snake.queue_direction(Direction::Left));
    }

    #[test]
    fn test_advance_and_grow() {
        let mut snake = Snake::centered(&grid(), 3);
        let next = snake.next_head();
        snake.advance(next, false);
        assert_eq!(snake.len(), 3);
        assert_eq!(snake.head(), IVec2::new(6, 5));

        let next = snake.next_head();
        snake.advance(next, true);
        assert_eq!(snake.len(), 4);
        assert_eq!(snake.tail(), IVec2::new(4, 5));
    }

    #[test]
    fn test_tail_cell_is_free_unless_growing() {
        let snake = Snake::centered(&grid(), 4);
        let tail = snake.tail();
        assert!(!snake.body_blocks(tail, false));
        assert!(snake.body_blocks(tail, true));
        assert!(snake.body_blocks(snake.head(), false));
    }

    #[test]
    fn test_shrink_respects_floor() {
        let mut snake = Snake::centered(&grid(), 5);
        assert_eq!(snake.shrink(3, 3), 2);
        assert_eq!(snake.len(), 3);
        assert_eq!(snake.shrink(3, 3), 0);
    }

    proptest! {
        #[test]
        fn shrink_never_below_one(
            length in 1usize..10,
            amount in 0usize..50,
            floor in 0usize..5,
        ) {
            let mut snake = Snake::centered(&grid(), length);
            snake.shrink(amount, floor);
            prop_assert!(snake.len() >= 1);
        }
    }
}
