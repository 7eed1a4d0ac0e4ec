//! Collision and movement resolution
//!
//! `resolve_move` is the authoritative per-tick step for the snake. Checks
//! run in a fixed order: freeze, turn, walls, body, obstacles, food,
//! pickup, then the move is committed.

use serde::{Deserialize, Serialize};

use super::grid::{Grid, Position};
use super::obstacles::Hazards;
use super::powerups::{ActiveEffects, PowerUpKind, PowerUpManager, on_collected};
use super::snake::Snake;
use crate::tuning::Tuning;

/// What the head ran into
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Collision {
    Wall,
    Body,
    Obstacle,
}

/// Result of one movement step
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MoveOutcome {
    /// Freeze is active; the body did not move
    Frozen,
    /// The snake stepped forward
    Moved {
        ate_food: bool,
        collected: Option<PowerUpKind>,
    },
    /// A fatal move was cancelled by the shield charge
    Shielded(Collision),
    /// The run is over
    Fatal(Collision),
}

/// Read-only view of the board the snake moves on
pub struct Board<'a> {
    pub grid: &'a Grid,
    pub hazards: &'a Hazards,
    pub food: Option<Position>,
}

/// Advance the snake by one step and resolve what it hits.
///
/// The buffered turn is applied even when the move is then cancelled by
/// the shield, so the snake faces its new heading next tick.
pub fn resolve_move(
    snake: &mut Snake,
    effects: &mut ActiveEffects,
    power_ups: &mut PowerUpManager,
    board: &Board<'_>,
    tuning: &Tuning,
) -> MoveOutcome {
    if effects.is_frozen() {
        return MoveOutcome::Frozen;
    }

    snake.take_turn();
    let next = snake.next_head();
    let ate_food = board.food == Some(next);
    let growing = snake.is_growing() || (ate_food && tuning.snake.food_growth > 0);

    let hit = if !board.grid.in_bounds(next) {
        Some(Collision::Wall)
    } else if snake.body_blocks(next, growing) {
        Some(Collision::Body)
    } else if board.hazards.is_solid_at(next) {
        Some(Collision::Obstacle)
    } else {
        None
    };

    if let Some(cause) = hit {
        if effects.consume_shield() {
            log::debug!("Shield absorbed {:?} collision at {}", cause, next);
            return MoveOutcome::Shielded(cause);
        }
        return MoveOutcome::Fatal(cause);
    }

    let collected = power_ups.take_at(next);
    if let Some(kind) = collected {
        log::debug!("Collected {} at {}", kind.as_str(), next);
        on_collected(kind, effects, snake, tuning);
    }

    if ate_food {
        snake.add_growth(tuning.snake.food_growth);
    }
    snake.advance(next, false);

    MoveOutcome::Moved {
        ate_food,
        collected,
    }
}
