//! Power-ups: kinds, active effects and spawn scheduling
//!
//! Timed effects (SpeedBoost, Freeze and the Shrink indicator) live in a
//! `TimerRegistry` keyed by kind, so picking the same kind up again resets
//! its countdown instead of adding to it. Shield is a single charge with no
//! countdown, spent by the next fatal collision.

use rand::Rng;
use serde::{Deserialize, Serialize};

use super::grid::{Grid, Position};
use super::level::LevelState;
use super::snake::Snake;
use super::timers::TimerRegistry;
use crate::tuning::{PowerUpWeights, Tuning};

/// Power-up types
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
pub enum PowerUpKind {
    SpeedBoost,
    Shrink,
    Freeze,
    Shield,
}

impl PowerUpKind {
    pub const ALL: [PowerUpKind; 4] = [
        PowerUpKind::SpeedBoost,
        PowerUpKind::Shrink,
        PowerUpKind::Freeze,
        PowerUpKind::Shield,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            PowerUpKind::SpeedBoost => "speed",
            PowerUpKind::Shrink => "shrink",
            PowerUpKind::Freeze => "freeze",
            PowerUpKind::Shield => "shield",
        }
    }

    fn weight(&self, weights: &PowerUpWeights) -> u32 {
        match self {
            PowerUpKind::SpeedBoost => weights.speed_boost,
            PowerUpKind::Shrink => weights.shrink,
            PowerUpKind::Freeze => weights.freeze,
            PowerUpKind::Shield => weights.shield,
        }
    }

    /// Weighted random kind, `None` if every weight is zero
    pub fn pick<R: Rng>(rng: &mut R, weights: &PowerUpWeights) -> Option<Self> {
        let total: u32 = Self::ALL.iter().map(|k| k.weight(weights)).sum();
        if total == 0 {
            return None;
        }
        let mut roll = rng.random_range(0..total);
        for kind in Self::ALL {
            let w = kind.weight(weights);
            if roll < w {
                return Some(kind);
            }
            roll -= w;
        }
        None
    }
}

/// An uncollected power-up on the board
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Pickup {
    pub kind: PowerUpKind,
    pub pos: Position,
}

/// Currently running effects
#[derive(Debug, Clone, Default)]
pub struct ActiveEffects {
    timers: TimerRegistry<PowerUpKind>,
    shield_charge: bool,
}

impl ActiveEffects {
    /// Start or refresh a timed effect
    pub fn activate(&mut self, kind: PowerUpKind, ticks: u32) {
        self.timers.register(kind, ticks);
    }

    pub fn is_active(&self, kind: PowerUpKind) -> bool {
        match kind {
            PowerUpKind::Shield => self.shield_charge,
            _ => self.timers.is_active(kind),
        }
    }

    pub fn remaining(&self, kind: PowerUpKind) -> Option<u32> {
        self.timers.remaining(kind)
    }

    pub fn is_frozen(&self) -> bool {
        self.timers.is_active(PowerUpKind::Freeze)
    }

    pub fn has_shield(&self) -> bool {
        self.shield_charge
    }

    pub fn arm_shield(&mut self) {
        self.shield_charge = true;
    }

    /// Spend the shield charge. Returns false if there was none.
    pub fn consume_shield(&mut self) -> bool {
        std::mem::replace(&mut self.shield_charge, false)
    }

    /// Count every effect down by one tick; returns the kinds that ended
    pub fn tick(&mut self) -> Vec<PowerUpKind> {
        self.timers.tick()
    }

    /// Timed effects with their remaining ticks, in kind order
    pub fn timed(&self) -> impl Iterator<Item = (PowerUpKind, u32)> + '_ {
        self.timers.iter()
    }
}

/// Timers owned by the spawner
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
enum SpawnTimer {
    /// Counting down to the next spawn attempt
    NextSpawn,
    /// Unclaimed pickup disappears
    PickupExpiry,
}

/// Places power-ups and applies their effects
#[derive(Debug, Clone)]
pub struct PowerUpManager {
    pickup: Option<Pickup>,
    timers: TimerRegistry<SpawnTimer>,
}

impl PowerUpManager {
    pub fn new(level: &LevelState) -> Self {
        let mut timers = TimerRegistry::new();
        timers.register(SpawnTimer::NextSpawn, level.power_up_interval);
        Self {
            pickup: None,
            timers,
        }
    }

    pub fn pickup(&self) -> Option<&Pickup> {
        self.pickup.as_ref()
    }

    /// Place a pickup directly (bypassing the schedule)
    pub fn place(&mut self, pickup: Pickup, lifetime: u32) {
        self.pickup = Some(pickup);
        self.timers.register(SpawnTimer::PickupExpiry, lifetime);
    }

    /// Remove the pickup, e.g. when a hazard now covers it
    pub fn clear_pickup(&mut self) {
        self.pickup = None;
        self.timers.cancel(SpawnTimer::PickupExpiry);
    }

    /// Ticks until the next spawn attempt (0 = due)
    pub fn ticks_until_spawn(&self) -> u32 {
        self.timers.remaining(SpawnTimer::NextSpawn).unwrap_or(0)
    }

    /// Count spawn timers down; expire an unclaimed pickup
    pub fn tick_timers(&mut self) {
        for expired in self.timers.tick() {
            if expired == SpawnTimer::PickupExpiry {
                if let Some(pickup) = self.pickup.take() {
                    log::debug!("{} pickup at {} expired", pickup.kind.as_str(), pickup.pos);
                }
            }
        }
    }

    /// Spawn a pickup if the interval has elapsed and the slot is empty.
    /// The cell must be free (`is_blocked` false) and away from the head.
    #[allow(clippy::too_many_arguments)]
    pub fn maybe_spawn<R: Rng>(
        &mut self,
        level: &LevelState,
        grid: &Grid,
        head: Position,
        is_blocked: impl Fn(Position) -> bool,
        rng: &mut R,
        tuning: &Tuning,
    ) -> Option<Pickup> {
        if self.pickup.is_some() || self.timers.is_active(SpawnTimer::NextSpawn) {
            return None;
        }
        let pt = &tuning.power_ups;

        let mut placed = None;
        if let Some(kind) = PowerUpKind::pick(rng, &pt.weights) {
            if let Some(pos) =
                grid.random_free_cell(rng, head, tuning.snake.min_spawn_distance, is_blocked)
            {
                placed = Some(Pickup { kind, pos });
            }
        }

        match placed {
            Some(pickup) => {
                log::debug!("Spawned {} at {}", pickup.kind.as_str(), pickup.pos);
                self.place(pickup, pt.pickup_lifetime);
                self.timers
                    .register(SpawnTimer::NextSpawn, level.power_up_interval);
                Some(pickup)
            }
            None => {
                self.timers
                    .register(SpawnTimer::NextSpawn, pt.spawn_retry_ticks.max(1));
                None
            }
        }
    }

    /// Take the pickup if it sits at `pos`
    pub fn take_at(&mut self, pos: Position) -> Option<PowerUpKind> {
        match self.pickup {
            Some(pickup) if pickup.pos == pos => {
                self.clear_pickup();
                Some(pickup.kind)
            }
            _ => None,
        }
    }
}

/// Apply a collected power-up.
///
/// SpeedBoost and Freeze start (or restart) their countdown. Shrink cuts
/// the tail right away, clamped to the shrink floor, and shows a short
/// indicator. Shield arms the single charge.
pub fn on_collected(kind: PowerUpKind, effects: &mut ActiveEffects, snake: &mut Snake, tuning: &Tuning) {
    let pt = &tuning.power_ups;
    match kind {
        PowerUpKind::SpeedBoost => effects.activate(kind, pt.speed_ticks),
        PowerUpKind::Freeze => effects.activate(kind, pt.freeze_ticks),
        PowerUpKind::Shrink => {
            let removed = snake.shrink(pt.shrink_segments, tuning.shrink_floor());
            log::debug!("Shrink removed {} segments", removed);
            effects.activate(kind, pt.shrink_indicator_ticks);
        }
        PowerUpKind::Shield => effects.arm_shield(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::IVec2;
    use rand::SeedableRng;
    use rand_pcg::Pcg32;

    #[test]
    fn test_recollect_refreshes_duration() {
        let tuning = Tuning::default();
        let grid = Grid::new(20, 20);
        let mut snake = Snake::centered(&grid, 4);
        let mut effects = ActiveEffects::default();

        on_collected(PowerUpKind::SpeedBoost, &mut effects, &mut snake, &tuning);
        for _ in 0..10 {
            effects.tick();
        }
        assert_eq!(effects.remaining(PowerUpKind::SpeedBoost), Some(tuning.power_ups.speed_ticks - 10));

        on_collected(PowerUpKind::SpeedBoost, &mut effects, &mut snake, &tuning);
        assert_eq!(effects.remaining(PowerUpKind::SpeedBoost), Some(tuning.power_ups.speed_ticks));
    }

    #[test]
    fn test_effects_coexist() {
        let tuning = Tuning::default();
        let grid = Grid::new(20, 20);
        let mut snake = Snake::centered(&grid, 4);
        let mut effects = ActiveEffects::default();

        on_collected(PowerUpKind::SpeedBoost, &mut effects, &mut snake, &tuning);
        on_collected(PowerUpKind::Freeze, &mut effects, &mut snake, &tuning);
        on_collected(PowerUpKind::Shield, &mut effects, &mut snake, &tuning);

        assert!(effects.is_active(PowerUpKind::SpeedBoost));
        assert!(effects.is_frozen());
        assert!(effects.has_shield());

        // Freeze ends first, speed keeps going
        for _ in 0..tuning.power_ups.freeze_ticks {
            effects.tick();
        }
        assert!(!effects.is_frozen());
        assert!(effects.is_active(PowerUpKind::SpeedBoost));
        // Shield has no countdown
        assert!(effects.has_shield());
    }

    #[test]
    fn test_shield_is_single_use() {
        let mut effects = ActiveEffects::default();
        effects.arm_shield();
        effects.arm_shield();
        assert!(effects.consume_shield());
        assert!(!effects.consume_shield());
    }

    #[test]
    fn test_shrink_clamps_and_sets_indicator() {
        let mut tuning = Tuning::default();
        tuning.snake.min_length = 1;
        tuning.power_ups.shrink_segments = 50;
        let grid = Grid::new(20, 20);
        let mut snake = Snake::centered(&grid, 4);
        let mut effects = ActiveEffects::default();

        on_collected(PowerUpKind::Shrink, &mut effects, &mut snake, &tuning);
        assert_eq!(snake.len(), 1);
        assert!(effects.is_active(PowerUpKind::Shrink));
    }

    #[test]
    fn test_pick_respects_zero_weights() {
        let weights = PowerUpWeights {
            speed_boost: 0,
            shrink: 0,
            freeze: 5,
            shield: 0,
        };
        let mut rng = Pcg32::seed_from_u64(7);
        for _ in 0..20 {
            assert_eq!(PowerUpKind::pick(&mut rng, &weights), Some(PowerUpKind::Freeze));
        }
        let none = PowerUpWeights {
            speed_boost: 0,
            shrink: 0,
            freeze: 0,
            shield: 0,
        };
        assert_eq!(PowerUpKind::pick(&mut rng, &none), None);
    }

    #[test]
    fn test_spawn_waits_for_interval_and_empty_slot() {
        let tuning = Tuning::default();
        let level = LevelState::for_level(1, &tuning);
        let grid = Grid::new(12, 12);
        let head = IVec2::new(6, 6);
        let mut rng = Pcg32::seed_from_u64(99);
        let mut manager = PowerUpManager::new(&level);

        for _ in 0..level.power_up_interval - 1 {
            manager.tick_timers();
            assert!(manager
                .maybe_spawn(&level, &grid, head, |_| false, &mut rng, &tuning)
                .is_none());
        }
        manager.tick_timers();
        let pickup = manager
            .maybe_spawn(&level, &grid, head, |_| false, &mut rng, &tuning)
            .unwrap();
        assert!(crate::sim::grid::manhattan(pickup.pos, head) >= tuning.snake.min_spawn_distance);

        // Slot is occupied: nothing else spawns even once the interval passes
        for _ in 0..level.power_up_interval {
            manager.tick_timers();
            if manager.pickup().is_none() {
                break;
            }
            assert!(manager
                .maybe_spawn(&level, &grid, head, |_| false, &mut rng, &tuning)
                .is_none());
        }
    }

    #[test]
    fn test_unclaimed_pickup_expires() {
        let tuning = Tuning::default();
        let level = LevelState::for_level(1, &tuning);
        let mut manager = PowerUpManager::new(&level);
        manager.place(
            Pickup {
                kind: PowerUpKind::Shield,
                pos: IVec2::new(1, 1),
            },
            3,
        );
        manager.tick_timers();
        manager.tick_timers();
        assert!(manager.pickup().is_some());
        manager.tick_timers();
        assert!(manager.pickup().is_none());
    }

    #[test]
    fn test_take_at() {
        let tuning = Tuning::default();
        let level = LevelState::for_level(1, &tuning);
        let mut manager = PowerUpManager::new(&level);
        let pos = IVec2::new(3, 4);
        manager.place(
            Pickup {
                kind: PowerUpKind::Freeze,
                pos,
            },
            10,
        );
        assert_eq!(manager.take_at(IVec2::new(4, 4)), None);
        assert_eq!(manager.take_at(pos), Some(PowerUpKind::Freeze));
        assert!(manager.pickup().is_none());
    }

    #[test]
    fn test_failed_spawn_retries_later() {
        let tuning = Tuning::default();
        let level = LevelState::for_level(1, &tuning);
        let grid = Grid::new(6, 6);
        let mut rng = Pcg32::seed_from_u64(3);
        let mut manager = PowerUpManager::new(&level);
        for _ in 0..level.power_up_interval {
            manager.tick_timers();
        }
        assert!(manager
            .maybe_spawn(&level, &grid, IVec2::ZERO, |_| true, &mut rng, &tuning)
            .is_none());
        assert_eq!(manager.ticks_until_spawn(), tuning.power_ups.spawn_retry_ticks);
    }
}
