//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - One step per tick, durations counted in ticks
//! - Seeded RNG only
//! - Stable iteration order (by key or obstacle id)
//! - No rendering, input or file access

pub mod autopilot;
pub mod collision;
pub mod grid;
pub mod level;
pub mod obstacles;
pub mod powerups;
pub mod scoring;
pub mod session;
pub mod snake;
pub mod state;
pub mod tick;
pub mod timers;

pub use collision::{Board, Collision, MoveOutcome, resolve_move};
pub use grid::{Direction, Grid, Position, manhattan};
pub use level::{HazardBudget, LevelProgression, LevelState, compute_level, is_boss_level};
pub use obstacles::{Hazards, Obstacle, ObstacleId, ObstacleKind};
pub use powerups::{ActiveEffects, Pickup, PowerUpKind, PowerUpManager, on_collected};
pub use scoring::{Streak, points_for_food};
pub use session::{PowerUpCounts, RunRecord, RunSession};
pub use snake::Snake;
pub use state::{GamePhase, GameState, Snapshot};
pub use tick::{TickOutcome, tick};
pub use timers::TimerRegistry;
