//! Tick countdowns
//!
//! A `TimerRegistry` holds independent countdowns keyed by whatever the
//! owning component needs (power-up kind, obstacle id, ...). Registering
//! an existing key overwrites its countdown: durations never add up.
//! Iteration is ordered by key so expiry events come out deterministically.

use std::collections::BTreeMap;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TimerRegistry<K: Ord> {
    timers: BTreeMap<K, u32>,
}

impl<K: Ord> Default for TimerRegistry<K> {
    fn default() -> Self {
        Self {
            timers: BTreeMap::new(),
        }
    }
}

impl<K: Ord + Copy> TimerRegistry<K> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert or refresh `key` with `duration` ticks.
    ///
    /// A zero duration cancels the timer.
    pub fn register(&mut self, key: K, duration: u32) {
        if duration == 0 {
            self.timers.remove(&key);
        } else {
            self.timers.insert(key, duration);
        }
    }

    /// Advance every countdown by one tick. Returns the keys that expired,
    /// already removed from the registry.
    pub fn tick(&mut self) -> Vec<K> {
        let mut expired = Vec::new();
        self.timers.retain(|key, remaining| {
            *remaining = remaining.saturating_sub(1);
            if *remaining == 0 {
                expired.push(*key);
                false
            } else {
                true
            }
        });
        expired
    }

    pub fn remaining(&self, key: K) -> Option<u32> {
        self.timers.get(&key).copied()
    }

    pub fn is_active(&self, key: K) -> bool {
        self.timers.contains_key(&key)
    }

    pub fn cancel(&mut self, key: K) -> Option<u32> {
        self.timers.remove(&key)
    }

    /// Drop every timer matching `pred`
    pub fn cancel_where(&mut self, mut pred: impl FnMut(&K) -> bool) {
        self.timers.retain(|key, _| !pred(key));
    }

    pub fn clear(&mut self) {
        self.timers.clear();
    }

    pub fn len(&self) -> usize {
        self.timers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.timers.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (K, u32)> + '_ {
        self.timers.iter().map(|(k, v)| (*k, *v))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_countdown_and_expiry() {
        let mut timers = TimerRegistry::new();
        timers.register('a', 2);
        timers.register('b', 1);

        assert_eq!(timers.tick(), vec!['b']);
        assert_eq!(timers.remaining('a'), Some(1));
        assert!(!timers.is_active('b'));

        assert_eq!(timers.tick(), vec!['a']);
        assert!(timers.is_empty());
        assert!(timers.tick().is_empty());
    }

    #[test]
    fn test_register_overwrites_instead_of_stacking() {
        let mut timers = TimerRegistry::new();
        timers.register(1u8, 10);
        timers.tick();
        timers.tick();
        timers.register(1u8, 10);
        assert_eq!(timers.remaining(1), Some(10));

        // A shorter refresh also overwrites
        timers.register(1u8, 3);
        assert_eq!(timers.remaining(1), Some(3));
    }

    #[test]
    fn test_zero_duration_cancels() {
        let mut timers = TimerRegistry::new();
        timers.register(7u32, 5);
        timers.register(7u32, 0);
        assert!(!timers.is_active(7));
    }

    #[test]
    fn test_cancel_where() {
        let mut timers = TimerRegistry::new();
        for k in 0u32..6 {
            timers.register(k, 4);
        }
        timers.cancel_where(|k| k % 2 == 0);
        assert_eq!(timers.iter().map(|(k, _)| k).collect::<Vec<_>>(), vec![1, 3, 5]);
    }

    proptest! {
        #[test]
        fn refresh_never_exceeds_full_duration(
            duration in 1u32..200,
            elapsed in 0u32..200,
            refreshes in 1usize..5,
        ) {
            let mut timers = TimerRegistry::new();
            for _ in 0..refreshes {
                timers.register(0u8, duration);
                for _ in 0..elapsed.min(duration - 1) {
                    timers.tick();
                }
            }
            timers.register(0u8, duration);
            prop_assert_eq!(timers.remaining(0), Some(duration));
        }

        #[test]
        fn every_tick_decrements_by_exactly_one(
            durations in proptest::collection::vec(2u32..50, 1..8)
        ) {
            let mut timers = TimerRegistry::new();
            for (i, d) in durations.iter().enumerate() {
                timers.register(i, *d);
            }
            let before: Vec<_> = timers.iter().collect();
            timers.tick();
            for (key, remaining) in before {
                prop_assert_eq!(timers.remaining(key), Some(remaining - 1));
            }
        }
    }
}
