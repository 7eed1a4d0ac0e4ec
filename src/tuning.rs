//! Data-driven game balance
//!
//! Every number that shapes difficulty lives here so a JSON file can
//! rebalance a build without touching the simulation. Durations are in
//! engine ticks (one tick = one snake step attempt).

use serde::{Deserialize, Serialize};

/// Snake size and spawn rules
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SnakeTuning {
    pub start_length: usize,
    /// Shrink never takes the snake below this (clamped to at least 1)
    pub min_length: usize,
    /// Segments gained per food
    pub food_growth: usize,
    /// Minimum Manhattan distance between the head and anything spawned
    pub min_spawn_distance: i32,
}

impl Default for SnakeTuning {
    fn default() -> Self {
        Self {
            start_length: 4,
            min_length: 3,
            food_growth: 1,
            min_spawn_distance: 4,
        }
    }
}

/// Level curve
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LevelTuning {
    pub base_tick_rate: f32,
    pub tick_rate_step: f32,
    pub max_tick_rate: f32,
    pub score_per_level: u64,
    pub seconds_per_level: f64,
    pub max_level: u32,
    /// Every Nth level is a boss level (0 disables bosses)
    pub boss_period: u32,
    pub base_obstacles: u32,
    pub obstacle_step: u32,
    /// Largest side of a square static obstacle cluster
    pub obstacle_cluster_max: i32,
    pub base_power_up_interval: u32,
    pub power_up_interval_step: u32,
    pub min_power_up_interval: u32,
    /// Ticks the "level intro" banner stays up
    pub intro_ticks: u32,
}

impl Default for LevelTuning {
    fn default() -> Self {
        Self {
            base_tick_rate: 8.0,
            tick_rate_step: 0.7,
            max_tick_rate: 18.0,
            score_per_level: 120,
            seconds_per_level: 45.0,
            max_level: 12,
            boss_period: 5,
            base_obstacles: 6,
            obstacle_step: 2,
            obstacle_cluster_max: 3,
            base_power_up_interval: 72,
            power_up_interval_step: 3,
            min_power_up_interval: 28,
            intro_ticks: 12,
        }
    }
}

/// Hazard spawn schedule: first level, one more every N levels, cap
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct HazardSchedule {
    pub start_level: u32,
    pub every: u32,
    pub max: u32,
}

impl HazardSchedule {
    /// Number of hazards of this kind at `level` (before boss bonuses)
    pub fn count_at(&self, level: u32) -> u32 {
        if level < self.start_level {
            return 0;
        }
        let steps = 1 + (level - self.start_level) / self.every.max(1);
        steps.min(self.max)
    }
}

/// Dynamic hazards
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct HazardTuning {
    pub moving: HazardSchedule,
    pub mover_step_ticks: u32,
    pub gates: HazardSchedule,
    pub gate_solid_ticks: u32,
    pub gate_open_ticks: u32,
    /// Delay before retrying to close a gate the snake is standing in
    pub gate_retry_ticks: u32,
    pub crumbling: HazardSchedule,
    pub crumble_lifetime: u32,
    pub boss_obstacle_bonus: u32,
    pub boss_moving_bonus: u32,
    pub boss_gate_bonus: u32,
    pub boss_crumble_bonus: u32,
    pub boss_core_size: i32,
}

impl Default for HazardTuning {
    fn default() -> Self {
        Self {
            moving: HazardSchedule {
                start_level: 3,
                every: 2,
                max: 6,
            },
            mover_step_ticks: 3,
            gates: HazardSchedule {
                start_level: 4,
                every: 3,
                max: 6,
            },
            gate_solid_ticks: 19,
            gate_open_ticks: 16,
            gate_retry_ticks: 2,
            crumbling: HazardSchedule {
                start_level: 5,
                every: 2,
                max: 10,
            },
            crumble_lifetime: 56,
            boss_obstacle_bonus: 5,
            boss_moving_bonus: 2,
            boss_gate_bonus: 2,
            boss_crumble_bonus: 3,
            boss_core_size: 3,
        }
    }
}

/// Spawn weights per power-up kind
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PowerUpWeights {
    pub speed_boost: u32,
    pub shrink: u32,
    pub freeze: u32,
    pub shield: u32,
}

impl Default for PowerUpWeights {
    fn default() -> Self {
        Self {
            speed_boost: 3,
            shrink: 2,
            freeze: 2,
            shield: 1,
        }
    }
}

/// Power-up effects
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PowerUpTuning {
    pub weights: PowerUpWeights,
    pub speed_multiplier: f32,
    pub speed_ticks: u32,
    pub freeze_ticks: u32,
    /// Tail segments removed by Shrink
    pub shrink_segments: usize,
    /// Cosmetic indicator shown after a Shrink
    pub shrink_indicator_ticks: u32,
    /// Unclaimed pickups vanish after this many ticks
    pub pickup_lifetime: u32,
    /// Delay before retrying when no free cell was found
    pub spawn_retry_ticks: u32,
}

impl Default for PowerUpTuning {
    fn default() -> Self {
        Self {
            weights: PowerUpWeights::default(),
            speed_multiplier: 1.6,
            speed_ticks: 48,
            freeze_ticks: 32,
            shrink_segments: 3,
            shrink_indicator_ticks: 40,
            pickup_lifetime: 80,
            spawn_retry_ticks: 8,
        }
    }
}

/// Points
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScoreTuning {
    pub base_food: u64,
    /// Previous food eaten within this many ticks continues the streak
    pub streak_window: u64,
    /// Bonus per streak step after the first food
    pub streak_bonus: u64,
    /// Flat bonus while SpeedBoost is active
    pub speed_bonus: u64,
    /// Extra multiplier on boss levels
    pub boss_multiplier_bonus: u64,
}

impl Default for ScoreTuning {
    fn default() -> Self {
        Self {
            base_food: 10,
            streak_window: 24,
            streak_bonus: 4,
            speed_bonus: 3,
            boss_multiplier_bonus: 1,
        }
    }
}

/// Complete balance sheet
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Tuning {
    pub grid_width: i32,
    pub grid_height: i32,
    pub snake: SnakeTuning,
    pub level: LevelTuning,
    pub hazards: HazardTuning,
    pub power_ups: PowerUpTuning,
    pub score: ScoreTuning,
}

impl Default for Tuning {
    fn default() -> Self {
        Self {
            grid_width: crate::consts::GRID_WIDTH,
            grid_height: crate::consts::GRID_HEIGHT,
            snake: SnakeTuning::default(),
            level: LevelTuning::default(),
            hazards: HazardTuning::default(),
            power_ups: PowerUpTuning::default(),
            score: ScoreTuning::default(),
        }
    }
}

impl Tuning {
    /// Shrink floor, never below one segment
    pub fn shrink_floor(&self) -> usize {
        self.snake.min_length.max(1)
    }
}
