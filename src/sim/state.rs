//! Engine state and render snapshot
//!
//! `GameState` owns everything one run needs: board, snake, effects,
//! spawner, hazards, level and session counters, plus the seeded RNG. The
//! presentation layer only ever reads a `Snapshot`.

use std::time::{SystemTime, UNIX_EPOCH};

use rand::SeedableRng;
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::grid::{Direction, Grid, Position};
use super::level::{LevelProgression, LevelState};
use super::obstacles::{Hazards, Obstacle};
use super::powerups::{ActiveEffects, Pickup, PowerUpKind, PowerUpManager};
use super::session::{RunRecord, RunSession};
use super::snake::Snake;
use crate::tuning::Tuning;

/// Current phase of a run
#[derive(Debug, Clone, PartialEq)]
pub enum GamePhase {
    Playing,
    /// Run ended; holds the finalized record
    GameOver(RunRecord),
}

/// Read-only view of the engine for rendering and HUD
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Snapshot {
    pub tick: u64,
    pub score: u64,
    pub level: u32,
    pub boss: bool,
    /// Level intro banner should be visible
    pub level_intro: bool,
    /// Steps per second the presentation layer should schedule at
    pub tick_rate: f32,
    pub grid: Grid,
    /// Head first
    pub snake: Vec<Position>,
    pub direction: Direction,
    pub food: Option<Position>,
    pub pickup: Option<Pickup>,
    pub obstacles: Vec<Obstacle>,
    /// Timed effects and their remaining ticks
    pub effects: Vec<(PowerUpKind, u32)>,
    pub shield: bool,
    pub frozen: bool,
    pub streak: u32,
    pub game_over: bool,
}

/// Complete engine state for one run
#[derive(Debug, Clone)]
pub struct GameState {
    pub tuning: Tuning,
    /// Run seed for reproducibility
    pub seed: u64,
    rng: Pcg32,
    pub grid: Grid,
    pub snake: Snake,
    pub food: Option<Position>,
    pub effects: ActiveEffects,
    pub power_ups: PowerUpManager,
    pub hazards: Hazards,
    pub progression: LevelProgression,
    pub session: RunSession,
    pub phase: GamePhase,
    /// Ticks left on the level intro banner
    pub level_intro_ticks: u32,
}

/// Unix time in milliseconds
fn now_ms() -> f64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs_f64() * 1000.0)
        .unwrap_or(0.0)
}

impl GameState {
    /// Fresh run with default tuning
    pub fn new(seed: u64) -> Self {
        Self::with_tuning(Tuning::default(), Some(seed))
    }

    /// Fresh run. Without a seed one is drawn at random and logged so the
    /// run can be replayed.
    pub fn with_tuning(tuning: Tuning, seed: Option<u64>) -> Self {
        let seed = seed.unwrap_or_else(rand::random);
        let mut rng = Pcg32::seed_from_u64(seed);
        let grid = Grid::new(tuning.grid_width, tuning.grid_height);
        let snake = Snake::centered(&grid, tuning.snake.start_length);
        let progression = LevelProgression::new(&tuning);
        let level = *progression.state();

        let mut hazards = Hazards::new();
        hazards.build_for_level(&level, &grid, &snake, &mut rng, &tuning);

        let mut session = RunSession::new(now_ms());
        session.record_length(snake.len());

        log::info!("Starting run with seed {}", seed);

        let mut state = Self {
            power_ups: PowerUpManager::new(&level),
            level_intro_ticks: tuning.level.intro_ticks,
            tuning,
            seed,
            rng,
            grid,
            snake,
            food: None,
            effects: ActiveEffects::default(),
            hazards,
            progression,
            session,
            phase: GamePhase::Playing,
        };
        state.respawn_food();
        state
    }

    /// Throw the current run away and start over. The same seed always
    /// reproduces the same run.
    pub fn reset(&mut self, seed: Option<u64>) {
        *self = Self::with_tuning(self.tuning.clone(), seed);
    }

    pub fn is_over(&self) -> bool {
        matches!(self.phase, GamePhase::GameOver(_))
    }

    pub fn level(&self) -> &LevelState {
        self.progression.state()
    }

    /// Buffer a turn for the next step; reversals are ignored
    pub fn queue_direction(&mut self, dir: Direction) -> bool {
        if self.is_over() {
            return false;
        }
        self.snake.queue_direction(dir)
    }

    /// Base level rate, scaled while SpeedBoost runs
    pub fn effective_tick_rate(&self) -> f32 {
        let base = self.level().tick_rate;
        if self.effects.is_active(PowerUpKind::SpeedBoost) {
            base * self.tuning.power_ups.speed_multiplier
        } else {
            base
        }
    }

    /// Anything that stops food or a pickup from being placed on `pos`
    pub fn is_cell_taken(&self, pos: Position) -> bool {
        self.snake.occupies(pos)
            || self.hazards.occupies(pos)
            || self.food == Some(pos)
            || self.power_ups.pickup().is_some_and(|p| p.pos == pos)
    }

    /// Place a new food item away from the head, falling back to any free
    /// cell when the board is crowded. Leaves no food if the board is full.
    pub fn respawn_food(&mut self) {
        self.food = None;
        let head = self.snake.head();
        let min_distance = self.tuning.snake.min_spawn_distance;
        let snake = &self.snake;
        let hazards = &self.hazards;
        let pickup = self.power_ups.pickup().map(|p| p.pos);
        let taken = |pos: Position| snake.occupies(pos) || hazards.occupies(pos) || pickup == Some(pos);

        self.food = self
            .grid
            .random_free_cell(&mut self.rng, head, min_distance, taken)
            .or_else(|| self.grid.random_free_cell(&mut self.rng, head, 0, taken));
        if self.food.is_none() {
            log::warn!("No free cell left for food");
        }
    }

    /// Drop food or pickup that a hazard now covers, respawning food
    pub fn clear_covered_items(&mut self) {
        let pickup_pos = self.power_ups.pickup().map(|p| p.pos);
        if pickup_pos.is_some_and(|pos| self.hazards.occupies(pos)) {
            self.power_ups.clear_pickup();
        }
        if self.food.is_none_or(|food| self.hazards.occupies(food)) {
            self.respawn_food();
        }
    }

    /// Regenerate hazards after a level change
    pub fn rebuild_hazards(&mut self) {
        let level = *self.progression.state();
        self.hazards
            .build_for_level(&level, &self.grid, &self.snake, &mut self.rng, &self.tuning);
        self.clear_covered_items();
    }

    /// Try to place a power-up if the spawner is due
    pub fn spawn_power_up(&mut self) -> Option<Pickup> {
        let level = *self.progression.state();
        let head = self.snake.head();
        let snake = &self.snake;
        let hazards = &self.hazards;
        let food = self.food;
        let taken = |pos: Position| snake.occupies(pos) || hazards.occupies(pos) || food == Some(pos);
        self.power_ups
            .maybe_spawn(&level, &self.grid, head, taken, &mut self.rng, &self.tuning)
    }

    pub fn snapshot(&self) -> Snapshot {
        Snapshot {
            tick: self.session.ticks,
            score: self.session.score,
            level: self.level().level,
            boss: self.level().boss,
            level_intro: self.level_intro_ticks > 0,
            tick_rate: self.effective_tick_rate(),
            grid: self.grid,
            snake: self.snake.segments().collect(),
            direction: self.snake.direction(),
            food: self.food,
            pickup: self.power_ups.pickup().copied(),
            obstacles: self.hazards.obstacles().to_vec(),
            effects: self.effects.timed().collect(),
            shield: self.effects.has_shield(),
            frozen: self.effects.is_frozen(),
            streak: self.session.streak.count,
            game_over: self.is_over(),
        }
    }
}
