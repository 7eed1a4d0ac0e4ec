//! Food scoring
//!
//! `points_for_food` is pure: the streak counter is updated by the caller
//! first, then passed in.

use serde::{Deserialize, Serialize};

use super::level::LevelState;
use super::powerups::{ActiveEffects, PowerUpKind};
use crate::tuning::ScoreTuning;

/// Consecutive quick eats
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Streak {
    pub count: u32,
    last_eat_tick: Option<u64>,
}

impl Streak {
    /// Record a food eaten at `tick`. The streak continues when the previous
    /// food was eaten at most `window` ticks earlier, otherwise restarts at 1.
    pub fn register_eat(&mut self, tick: u64, window: u64) -> u32 {
        self.count = match self.last_eat_tick {
            Some(last) if tick.saturating_sub(last) <= window => self.count + 1,
            _ => 1,
        };
        self.last_eat_tick = Some(tick);
        self.count
    }
}

/// Points for one food: base x level multiplier, plus a streak bonus for
/// every streak step past the first, plus a flat bonus while SpeedBoost runs.
pub fn points_for_food(
    streak: u32,
    level: &LevelState,
    effects: &ActiveEffects,
    tuning: &ScoreTuning,
) -> u64 {
    let base = tuning.base_food * level.score_multiplier;
    let streak_bonus = streak.saturating_sub(1) as u64 * tuning.streak_bonus;
    let speed_bonus = if effects.is_active(PowerUpKind::SpeedBoost) {
        tuning.speed_bonus
    } else {
        0
    };
    base + streak_bonus + speed_bonus
}
