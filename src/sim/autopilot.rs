//! Demo-mode steering
//!
//! Greedy and deterministic: head for the food (or pickup when there is no
//! food), never pick an immediately fatal cell, and prefer moves that leave
//! enough open space for the whole body.

use std::collections::{HashSet, VecDeque};

use super::grid::{Direction, Position, manhattan};
use super::state::GameState;

/// Direction to queue for the next tick, or `None` when every option is
/// fatal (or the run is over).
pub fn steer(state: &GameState) -> Option<Direction> {
    if state.is_over() {
        return None;
    }
    let snake = &state.snake;
    let head = snake.head();
    let target = state
        .food
        .or_else(|| state.power_ups.pickup().map(|p| p.pos))
        .unwrap_or_else(|| state.grid.center());

    let mut best: Option<(Direction, (bool, i32, usize))> = None;
    for dir in Direction::ALL {
        if dir == snake.direction().opposite() {
            continue;
        }
        let next = head + dir.delta();
        if !is_safe(state, next) {
            continue;
        }
        let room = open_area(state, next, snake.len() + 1);
        let key = (room <= snake.len(), manhattan(next, target), usize::MAX - room);
        if best.is_none_or(|(_, k)| key < k) {
            best = Some((dir, key));
        }
    }
    best.map(|(dir, _)| dir)
}

fn is_safe(state: &GameState, pos: Position) -> bool {
    let growing = state.snake.is_growing() || state.food == Some(pos);
    state.grid.in_bounds(pos)
        && !state.snake.body_blocks(pos, growing)
        && !state.hazards.is_solid_at(pos)
}

/// Cells reachable from `start`, counting at most `limit`
fn open_area(state: &GameState, start: Position, limit: usize) -> usize {
    let mut seen = HashSet::from([start]);
    let mut queue = VecDeque::from([start]);
    while let Some(pos) = queue.pop_front() {
        if seen.len() >= limit {
            break;
        }
        for dir in Direction::ALL {
            let next = pos + dir.delta();
            if seen.contains(&next)
                || !state.grid.in_bounds(next)
                || state.snake.occupies(next)
                || state.hazards.is_solid_at(next)
            {
                continue;
            }
            seen.insert(next);
            queue.push_back(next);
        }
    }
    seen.len()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::snake::Snake;
    use glam::IVec2;

    #[test]
    fn test_turns_away_from_wall() {
        let mut state = GameState::new(4);
        state.hazards.clear();
        state.snake = Snake::new(&state.grid, IVec2::new(state.grid.width - 1, 10), Direction::Right, 3);
        state.food = Some(IVec2::new(0, 0));
        let dir = steer(&state).unwrap();
        assert_eq!(dir, Direction::Up);
    }

    #[test]
    fn test_heads_for_food() {
        let mut state = GameState::new(4);
        state.hazards.clear();
        let head = state.snake.head();
        state.food = Some(head + IVec2::new(0, 3));
        assert_eq!(steer(&state), Some(Direction::Down));
    }

    #[test]
    fn test_boxed_in_returns_none() {
        let mut state = GameState::new(4);
        state.hazards.clear();
        state.snake = Snake::new(&state.grid, IVec2::new(5, 5), Direction::Right, 3);
        for pos in [IVec2::new(6, 5), IVec2::new(5, 4), IVec2::new(5, 6)] {
            state.hazards.add_block(pos);
        }
        assert_eq!(steer(&state), None);
    }
}
