//! Sync schedule - spaces refresh attempts

use std::time::Duration;

use sunglobe_core::{ClockState, LocalTime};

/// Decides when the driver may start the next sync attempt.
///
/// An attempt is due once `interval` of local time has passed since the last
/// attempt, successful or not, and no other attempt is still in flight.
#[derive(Clone, Debug)]
pub struct SyncSchedule {
    interval: Duration,
    in_flight: bool,
}

impl SyncSchedule {
    pub fn new(interval: Duration) -> Self {
        SyncSchedule {
            interval,
            in_flight: false,
        }
    }

    #[inline]
    pub fn interval(&self) -> Duration {
        self.interval
    }

    #[inline]
    pub fn in_flight(&self) -> bool {
        self.in_flight
    }

    /// Check whether an attempt may start at `now`
    pub fn is_due(&self, state: &ClockState, now: LocalTime) -> bool {
        if self.in_flight {
            return false;
        }
        match state.last_attempt() {
            None => true,
            Some(last) => now.saturating_since(last) >= self.interval,
        }
    }

    /// Claim the next attempt if it is due, recording it in `state`
    pub fn try_begin(&mut self, state: &mut ClockState, now: LocalTime) -> bool {
        if !self.is_due(state, now) {
            return false;
        }
        state.record_attempt(now);
        self.in_flight = true;
        true
    }

    /// Mark the in-flight attempt as finished
    pub fn finish(&mut self) {
        self.in_flight = false;
    }
}

impl Default for SyncSchedule {
    fn default() -> Self {
        Self::new(Duration::from_secs(60))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_first_attempt_is_due_immediately() {
        let mut schedule = SyncSchedule::default();
        let mut state = ClockState::new();

        assert!(schedule.try_begin(&mut state, LocalTime::from_secs(10)));
        assert_eq!(state.last_attempt(), Some(LocalTime::from_secs(10)));
    }

    #[test]
    fn test_in_flight_blocks_next_attempt() {
        let mut schedule = SyncSchedule::default();
        let mut state = ClockState::new();

        assert!(schedule.try_begin(&mut state, LocalTime::from_secs(0)));
        assert!(!schedule.try_begin(&mut state, LocalTime::from_secs(120)));

        schedule.finish();
        assert!(schedule.try_begin(&mut state, LocalTime::from_secs(120)));
    }

    #[test]
    fn test_interval_boundary() {
        let mut schedule = SyncSchedule::default();
        let mut state = ClockState::new();
        schedule.try_begin(&mut state, LocalTime::from_secs(0));
        schedule.finish();

        assert!(!schedule.is_due(&state, LocalTime::from_millis(59_999)));
        assert!(schedule.is_due(&state, LocalTime::from_secs(60)));
    }

    #[test]
    fn test_backwards_local_clock_is_not_due() {
        let mut schedule = SyncSchedule::default();
        let mut state = ClockState::new();
        schedule.try_begin(&mut state, LocalTime::from_secs(1_000));
        schedule.finish();

        assert!(!schedule.is_due(&state, LocalTime::from_secs(10)));
    }

    proptest! {
        #[test]
        fn prop_attempts_spaced_by_interval(steps in prop::collection::vec(1u64..20_000, 1..400)) {
            let mut schedule = SyncSchedule::default();
            let mut state = ClockState::new();
            let mut now = LocalTime::ZERO;
            let mut started = Vec::new();

            for step in steps {
                now = now + Duration::from_millis(step);
                if schedule.try_begin(&mut state, now) {
                    started.push(now);
                    schedule.finish();
                }
            }

            for pair in started.windows(2) {
                prop_assert!(pair[1] - pair[0] >= Duration::from_secs(60));
            }
        }
    }
}
