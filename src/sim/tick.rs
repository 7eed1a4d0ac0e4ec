//! Fixed-order simulation tick
//!
//! One call advances the run by exactly one step:
//! 1. level progression (hazards rebuilt on level-up)
//! 2. every timer: effects, hazards, spawner
//! 3. power-up expiry and spawning
//! 4. movement and collision (skipped while frozen)
//! 5. scoring
//! 6. session counters
//!
//! Timers run before collision, so an effect that ends on this tick is
//! never seen as active by the resolver.

use super::collision::{Board, MoveOutcome, resolve_move};
use super::grid::Direction;
use super::level::LevelState;
use super::scoring::points_for_food;
use super::session::RunRecord;
use super::state::{GamePhase, GameState, Snapshot};

/// Result of a single tick
#[derive(Debug, Clone, PartialEq)]
pub enum TickOutcome {
    /// Run continues
    Continue(Snapshot),
    /// Level went up this tick; show the intro
    LevelUp(LevelState),
    /// Run ended; the record is ready to persist
    Dead(RunRecord),
}

/// Advance the game by one tick with an optional turn
pub fn tick(state: &mut GameState, input: Option<Direction>) -> TickOutcome {
    if let GamePhase::GameOver(record) = &state.phase {
        return TickOutcome::Dead(record.clone());
    }

    if let Some(dir) = input {
        state.queue_direction(dir);
    }

    // Level
    let level_up = state.progression.advance(&state.session, &state.tuning);
    if let Some(level) = level_up {
        state.session.level = level.level;
        state.level_intro_ticks = state.tuning.level.intro_ticks;
        state.rebuild_hazards();
    }

    // Timers
    for kind in state.effects.tick() {
        log::debug!("{} effect ended", kind.as_str());
    }
    let changes = state
        .hazards
        .tick(&state.grid, &state.snake, &state.tuning);
    if !changes.crumbled.is_empty() {
        log::debug!("{} tiles crumbled", changes.crumbled.len());
    }
    state.power_ups.tick_timers();
    state.level_intro_ticks = state.level_intro_ticks.saturating_sub(1);
    if changes.movers_stepped {
        state.clear_covered_items();
    }

    // Spawning. Food may be missing if the board was full when it was last
    // eaten; retry until a cell frees up.
    if state.food.is_none() {
        state.respawn_food();
    }
    state.spawn_power_up();

    // Movement
    let board = Board {
        grid: &state.grid,
        hazards: &state.hazards,
        food: state.food,
    };
    let outcome = resolve_move(
        &mut state.snake,
        &mut state.effects,
        &mut state.power_ups,
        &board,
        &state.tuning,
    );

    // Scoring
    match outcome {
        MoveOutcome::Moved {
            ate_food,
            collected,
        } => {
            if ate_food {
                let window = state.tuning.score.streak_window;
                let streak = state.session.streak.register_eat(state.session.ticks, window);
                let points = points_for_food(
                    streak,
                    state.progression.state(),
                    &state.effects,
                    &state.tuning.score,
                );
                state.session.score += points;
                state.session.foods_eaten += 1;
                state.respawn_food();
            }
            if let Some(kind) = collected {
                state.session.power_ups.increment(kind);
            }
        }
        MoveOutcome::Frozen | MoveOutcome::Shielded(_) | MoveOutcome::Fatal(_) => {}
    }

    // Session
    let rate = f64::from(state.effective_tick_rate().max(f32::EPSILON));
    state.session.ticks += 1;
    state.session.survived_secs += 1.0 / rate;
    state.session.record_length(state.snake.len());

    if let MoveOutcome::Fatal(cause) = outcome {
        let record = state.session.clone().finalize();
        log::info!(
            "Run over ({:?}): score {}, level {}, {:.1}s",
            cause,
            record.score,
            record.level,
            record.duration
        );
        state.phase = GamePhase::GameOver(record.clone());
        return TickOutcome::Dead(record);
    }

    match level_up {
        Some(level) => TickOutcome::LevelUp(level),
        None => TickOutcome::Continue(state.snapshot()),
    }
}
