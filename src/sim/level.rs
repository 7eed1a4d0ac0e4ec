//! Level progression
//!
//! The level is derived from score and survival time and never goes down.
//! Everything a level changes (speed, hazard counts, spawn interval, boss
//! flag) is a pure function of the level number.

use serde::{Deserialize, Serialize};

use super::session::RunSession;
use crate::tuning::Tuning;

/// How many hazards of each kind a level asks for
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct HazardBudget {
    /// Static obstacle cells, boss bonus included
    pub static_cells: u32,
    pub moving: u32,
    pub gates: u32,
    pub crumbling: u32,
    /// Place a solid boss core
    pub boss_core: bool,
}

/// Parameters for one level
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LevelState {
    pub level: u32,
    /// Base snake steps per second (before SpeedBoost)
    pub tick_rate: f32,
    /// Static obstacle target, excluding boss bonus
    pub obstacle_target: u32,
    /// Ticks between power-up spawns
    pub power_up_interval: u32,
    /// Multiplier applied to base food points
    pub score_multiplier: u64,
    pub boss: bool,
    pub hazards: HazardBudget,
}

/// True if `level` is a boss level
pub fn is_boss_level(level: u32, tuning: &Tuning) -> bool {
    let period = tuning.level.boss_period;
    period > 0 && level % period == 0
}

impl LevelState {
    /// Derive all level parameters for `level`
    pub fn for_level(level: u32, tuning: &Tuning) -> Self {
        let level = level.max(1);
        let lt = &tuning.level;
        let ht = &tuning.hazards;
        let steps = level - 1;
        let boss = is_boss_level(level, tuning);

        let tick_rate = (lt.base_tick_rate + steps as f32 * lt.tick_rate_step).min(lt.max_tick_rate);
        let obstacle_target = lt.base_obstacles + steps * lt.obstacle_step;
        let power_up_interval = lt
            .base_power_up_interval
            .saturating_sub(steps * lt.power_up_interval_step)
            .max(lt.min_power_up_interval)
            .max(1);

        let mut score_multiplier = level as u64;
        let mut hazards = HazardBudget {
            static_cells: obstacle_target,
            moving: ht.moving.count_at(level),
            gates: ht.gates.count_at(level),
            crumbling: ht.crumbling.count_at(level),
            boss_core: false,
        };

        if boss {
            score_multiplier += tuning.score.boss_multiplier_bonus;
            hazards.static_cells += ht.boss_obstacle_bonus;
            hazards.moving += ht.boss_moving_bonus;
            hazards.gates += ht.boss_gate_bonus;
            hazards.crumbling += ht.boss_crumble_bonus;
            hazards.boss_core = true;
        }

        Self {
            level,
            tick_rate,
            obstacle_target,
            power_up_interval,
            score_multiplier,
            boss,
            hazards,
        }
    }
}

/// Level implied by score and survival time, clamped to `[1, max_level]`
pub fn compute_level(score: u64, survived_secs: f64, tuning: &Tuning) -> u32 {
    let lt = &tuning.level;
    let score_level = 1 + score / lt.score_per_level.max(1);
    let time_level = if lt.seconds_per_level > 0.0 {
        1 + (survived_secs.max(0.0) / lt.seconds_per_level) as u64
    } else {
        1
    };
    score_level.max(time_level).clamp(1, lt.max_level.max(1) as u64) as u32
}

/// Tracks the current level for one run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LevelProgression {
    state: LevelState,
}

impl LevelProgression {
    pub fn new(tuning: &Tuning) -> Self {
        Self {
            state: LevelState::for_level(1, tuning),
        }
    }

    pub fn state(&self) -> &LevelState {
        &self.state
    }

    pub fn level(&self) -> u32 {
        self.state.level
    }

    /// Recompute the level from the session. Returns the new level state
    /// when the level went up; the level never decreases.
    pub fn advance(&mut self, session: &RunSession, tuning: &Tuning) -> Option<LevelState> {
        let computed = compute_level(session.score, session.survived_secs, tuning);
        if computed <= self.state.level {
            return None;
        }
        self.state = LevelState::for_level(computed, tuning);
        if self.state.boss {
            log::info!("Boss level {} reached", computed);
        } else {
            log::info!("Level {} reached", computed);
        }
        Some(self.state)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_level_from_score_and_time() {
        let tuning = Tuning::default();
        assert_eq!(compute_level(0, 0.0, &tuning), 1);
        assert_eq!(compute_level(119, 0.0, &tuning), 1);
        assert_eq!(compute_level(120, 0.0, &tuning), 2);
        assert_eq!(compute_level(0, 90.0, &tuning), 3);
        assert_eq!(compute_level(1_000_000, 0.0, &tuning), 12);
    }

    #[test]
    fn test_boss_levels() {
        let tuning = Tuning::default();
        assert!(!LevelState::for_level(4, &tuning).boss);
        let boss = LevelState::for_level(5, &tuning);
        assert!(boss.boss);
        assert!(boss.hazards.boss_core);
        assert_eq!(boss.score_multiplier, 6);
        assert_eq!(
            boss.hazards.static_cells,
            boss.obstacle_target + tuning.hazards.boss_obstacle_bonus
        );
        assert!(LevelState::for_level(10, &tuning).boss);
    }

    #[test]
    fn test_power_up_interval_floor() {
        let tuning = Tuning::default();
        let state = LevelState::for_level(500, &tuning);
        assert_eq!(state.power_up_interval, tuning.level.min_power_up_interval);
    }

    #[test]
    fn test_level_one_has_no_dynamic_hazards() {
        let state = LevelState::for_level(1, &Tuning::default());
        assert_eq!(state.hazards.moving, 0);
        assert_eq!(state.hazards.gates, 0);
        assert_eq!(state.hazards.crumbling, 0);
        assert_eq!(state.tick_rate, 8.0);
    }

    #[test]
    fn test_advance_reports_only_increases() {
        let tuning = Tuning::default();
        let mut progression = LevelProgression::new(&tuning);
        let mut session = RunSession::new(0.0);

        assert!(progression.advance(&session, &tuning).is_none());
        session.score = 250;
        let up = progression.advance(&session, &tuning).unwrap();
        assert_eq!(up.level, 3);

        // Score can't drop in practice, but the level must hold even if it did
        session.score = 0;
        assert!(progression.advance(&session, &tuning).is_none());
        assert_eq!(progression.level(), 3);
    }

    proptest! {
        #[test]
        fn level_is_non_decreasing(
            deltas in proptest::collection::vec((0u64..80, 0.0f64..20.0), 1..60)
        ) {
            let tuning = Tuning::default();
            let mut progression = LevelProgression::new(&tuning);
            let mut session = RunSession::new(0.0);
            let mut last = progression.level();
            for (points, secs) in deltas {
                session.score += points;
                session.survived_secs += secs;
                progression.advance(&session, &tuning);
                prop_assert!(progression.level() >= last);
                last = progression.level();
            }
        }

        #[test]
        fn level_parameters_are_pure_and_monotone(level in 1u32..40) {
            let tuning = Tuning::default();
            let a = LevelState::for_level(level, &tuning);
            let b = LevelState::for_level(level, &tuning);
            prop_assert_eq!(a, b);

            let next = LevelState::for_level(level + 1, &tuning);
            prop_assert!(next.tick_rate >= a.tick_rate);
            prop_assert!(next.obstacle_target > a.obstacle_target);
            prop_assert!(next.power_up_interval <= a.power_up_interval);
            prop_assert!(next.power_up_interval >= 1);
            prop_assert_eq!(a.boss, level % tuning.level.boss_period == 0);
        }
    }
}
