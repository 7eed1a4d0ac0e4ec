//! Playfield geometry
//!
//! Cells are integer coordinates with the origin in the top-left corner,
//! x growing right and y growing down.

use glam::IVec2;
use rand::Rng;
use serde::{Deserialize, Serialize};

/// A grid cell
pub type Position = IVec2;

/// Cardinal movement direction
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
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

    /// Unit step for this direction
    pub fn delta(self) -> IVec2 {
        match self {
            Direction::Up => IVec2::new(0, -1),
            Direction::Down => IVec2::new(0, 1),
            Direction::Left => IVec2::new(-1, 0),
            Direction::Right => IVec2::new(1, 0),
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
}

/// Manhattan distance between two cells
#[inline]
pub fn manhattan(a: Position, b: Position) -> i32 {
    let d = (a - b).abs();
    d.x + d.y
}

/// Playfield bounds
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Grid {
    pub width: i32,
    pub height: i32,
}

impl Grid {
    pub fn new(width: i32, height: i32) -> Self {
        Self {
            width: width.max(1),
            height: height.max(1),
        }
    }

    /// True if `pos` lies in `[0, width) x [0, height)`
    #[inline]
    pub fn in_bounds(&self, pos: Position) -> bool {
        pos.x >= 0 && pos.y >= 0 && pos.x < self.width && pos.y < self.height
    }

    /// Center cell (rounded down)
    pub fn center(&self) -> Position {
        IVec2::new(self.width / 2, self.height / 2)
    }

    /// All cells in row-major order (stable, so seeded picks are reproducible)
    pub fn cells(&self) -> impl Iterator<Item = Position> + '_ {
        (0..self.height).flat_map(move |y| (0..self.width).map(move |x| IVec2::new(x, y)))
    }

    pub fn cell_count(&self) -> usize {
        (self.width * self.height) as usize
    }

    /// Pick a random cell that is not blocked and sits at least
    /// `min_distance` (Manhattan) away from `head`.
    pub fn random_free_cell<R: Rng>(
        &self,
        rng: &mut R,
        head: Position,
        min_distance: i32,
        is_blocked: impl Fn(Position) -> bool,
    ) -> Option<Position> {
        let candidates: Vec<Position> = self
            .cells()
            .filter(|&pos| manhattan(pos, head) >= min_distance && !is_blocked(pos))
            .collect();
        if candidates.is_empty() {
            return None;
        }
        Some(candidates[rng.random_range(0..candidates.len())])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bounds() {
        let grid = Grid::new(4, 3);
        assert!(grid.in_bounds(IVec2::new(0, 0)));
        assert!(grid.in_bounds(IVec2::new(3, 2)));
        assert!(!grid.in_bounds(IVec2::new(4, 0)));
        assert!(!grid.in_bounds(IVec2::new(0, -1)));
        assert_eq!(grid.cells().count(), grid.cell_count());
    }

    #[test]
    fn test_direction_opposites() {
        for dir in Direction::ALL {
            assert_eq!(dir.opposite().opposite(), dir);
            assert_eq!(dir.delta() + dir.opposite().delta(), IVec2::ZERO);
        }
    }

    #[test]
    fn test_random_free_cell_respects_blocked_and_distance() {
        use rand::SeedableRng;
        use rand_pcg::Pcg32;

        let grid = Grid::new(10, 8);
        let head = IVec2::new(5, 4);
        let blocked = [head, IVec2::new(4, 4), IVec2::new(1, 1), IVec2::new(2, 2)];
        let mut rng = Pcg32::seed_from_u64(123);
        for _ in 0..50 {
            let pos = grid
                .random_free_cell(&mut rng, head, 4, |p| blocked.contains(&p))
                .unwrap();
            assert!(!blocked.contains(&pos));
            assert!(manhattan(pos, head) >= 4);
            assert!(grid.in_bounds(pos));
        }
    }

    #[test]
    fn test_random_free_cell_full_grid() {
        use rand::SeedableRng;
        use rand_pcg::Pcg32;

        let grid = Grid::new(3, 3);
        let mut rng = Pcg32::seed_from_u64(1);
        assert!(grid.random_free_cell(&mut rng, IVec2::ZERO, 0, |_| true).is_none());
    }

    #[test]
    fn test_manhattan() {
        assert_eq!(manhattan(IVec2::new(1, 1), IVec2::new(4, -1)), 5);
    }
}
