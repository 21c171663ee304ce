//! Virtual clock implementing [`Timer`].
//!
//! Time only moves when the driver asks. [`SimClock::pop_due`] hands out the
//! earliest due timer (ties broken by id, i.e. scheduling order) and
//! reschedules intervals, so a driver loop fires everything in the order a
//! browser event loop would.

use crate::timer::{Timer, TimerId};
use std::collections::BTreeMap;

#[derive(Debug, Clone, Copy)]
struct Scheduled {
    due: u64,
    period: Option<u64>,
}

#[derive(Debug, Clone, Default)]
pub struct SimClock {
    now: u64,
    next_id: u64,
    timers: BTreeMap<TimerId, Scheduled>,
}

impl SimClock {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn now(&self) -> u64 {
        self.now
    }

    /// Number of live timers.
    pub fn pending(&self) -> usize {
        self.timers.len()
    }

    pub fn is_active(&self, id: TimerId) -> bool {
        self.timers.contains_key(&id)
    }

    /// Move time forward without firing anything.
    pub fn advance_by(&mut self, ms: u64) {
        self.now += ms;
    }

    /// Move time to `at` (never backwards) without firing anything.
    pub fn advance_to(&mut self, at: u64) {
        self.now = self.now.max(at);
    }

    /// Take the earliest timer due at or before `until`, moving time to its
    /// deadline. Intervals are rescheduled one period later; one-shots are
    /// removed.
    pub fn pop_due(&mut self, until: u64) -> Option<TimerId> {
        let (&id, &scheduled) = self
            .timers
            .iter()
            .filter(|(_, s)| s.due <= until)
            .min_by_key(|(id, s)| (s.due, **id))?;
        self.now = self.now.max(scheduled.due);
        match scheduled.period {
            Some(period) => {
                self.timers.insert(
                    id,
                    Scheduled {
                        due: scheduled.due + period,
                        period: Some(period),
                    },
                );
            }
            None => {
                self.timers.remove(&id);
            }
        }
        Some(id)
    }

    fn schedule(&mut self, delay: u64, period: Option<u64>) -> TimerId {
        self.next_id += 1;
        let id = TimerId(self.next_id);
        self.timers.insert(
            id,
            Scheduled {
                due: self.now + delay,
                period,
            },
        );
        id
    }
}

impl Timer for SimClock {
    fn set_interval(&mut self, period_ms: u64) -> TimerId {
        // A zero period would never let time advance.
        let period = period_ms.max(1);
        self.schedule(period, Some(period))
    }

    fn set_timeout(&mut self, delay_ms: u64) -> TimerId {
        self.schedule(delay_ms, None)
    }

    fn clear(&mut self, id: TimerId) {
        self.timers.remove(&id);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fire_until(clock: &mut SimClock, until: u64) -> Vec<(TimerId, u64)> {
        let mut fired = Vec::new();
        while let Some(id) = clock.pop_due(until) {
            fired.push((id, clock.now()));
        }
        clock.advance_to(until);
        fired
    }

    #[test]
    fn interval_fires_each_period() {
        let mut clock = SimClock::new();
        let id = clock.set_interval(5000);
        let fired = fire_until(&mut clock, 12_000);
        assert_eq!(fired, vec![(id, 5000), (id, 10_000)]);
        assert_eq!(clock.now(), 12_000);
        assert!(clock.is_active(id));
    }

    #[test]
    fn timeout_fires_once() {
        let mut clock = SimClock::new();
        let id = clock.set_timeout(300);
        assert_eq!(fire_until(&mut clock, 1000), vec![(id, 300)]);
        assert!(!clock.is_active(id));
    }

    #[test]
    fn ties_fire_in_scheduling_order() {
        let mut clock = SimClock::new();
        let a = clock.set_timeout(100);
        let b = clock.set_timeout(100);
        let fired: Vec<TimerId> = fire_until(&mut clock, 100).into_iter().map(|(id, _)| id).collect();
        assert_eq!(fired, vec![a, b]);
    }

    #[test]
    fn cleared_timers_never_fire() {
        let mut clock = SimClock::new();
        let id = clock.set_interval(100);
        clock.clear(id);
        assert!(fire_until(&mut clock, 1000).is_empty());
        assert_eq!(clock.pending(), 0);
    }

    #[test]
    fn delays_are_relative_to_now() {
        let mut clock = SimClock::new();
        clock.advance_by(250);
        let id = clock.set_timeout(100);
        assert_eq!(fire_until(&mut clock, 1000), vec![(id, 350)]);
    }
}
