//! Authoritative readings and the owned clock state

use crate::{LocalTime, ZoneTime};

/// "The zone's wall clock read `zone_wall_clock` when the local clock read
/// `captured_at_local`."
///
/// Immutable once created; replaced wholesale on every successful sync.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct AuthoritativeReading {
    zone_wall_clock: ZoneTime,
    captured_at_local: LocalTime,
}

impl AuthoritativeReading {
    pub fn new(zone_wall_clock: ZoneTime, captured_at_local: LocalTime) -> Self {
        AuthoritativeReading {
            zone_wall_clock,
            captured_at_local,
        }
    }

    #[inline]
    pub fn zone_wall_clock(&self) -> ZoneTime {
        self.zone_wall_clock
    }

    #[inline]
    pub fn captured_at_local(&self) -> LocalTime {
        self.captured_at_local
    }

    /// Extrapolate the zone wall clock to `now_local`.
    /// A local clock that stepped backwards yields the anchor itself.
    pub fn extrapolate(&self, now_local: LocalTime) -> ZoneTime {
        self.zone_wall_clock
            .advance(now_local.saturating_since(self.captured_at_local))
    }
}

/// Clock state shared by the synchronizer (sole writer) and the projector.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ClockState {
    /// Last authoritative reading, if any sync ever succeeded
    reading: Option<AuthoritativeReading>,
    /// Local time of the most recent sync attempt, successful or not
    last_attempt: Option<LocalTime>,
    /// Local time of the most recent successful sync
    last_success: Option<LocalTime>,
}

impl ClockState {
    pub fn new() -> Self {
        Self::default()
    }

    #[inline]
    pub fn reading(&self) -> Option<&AuthoritativeReading> {
        self.reading.as_ref()
    }

    #[inline]
    pub fn last_attempt(&self) -> Option<LocalTime> {
        self.last_attempt
    }

    #[inline]
    pub fn last_success(&self) -> Option<LocalTime> {
        self.last_success
    }

    /// True until the first successful sync
    #[inline]
    pub fn is_fallback(&self) -> bool {
        self.reading.is_none()
    }

    /// Record that a sync attempt started at `at`
    pub fn record_attempt(&mut self, at: LocalTime) {
        self.last_attempt = Some(at);
    }

    /// Replace the reading wholesale, returning the previous one
    pub fn install(&mut self, reading: AuthoritativeReading) -> Option<AuthoritativeReading> {
        self.last_success = Some(reading.captured_at_local());
        self.reading.replace(reading)
    }

    /// How long the current reading has been extrapolated, if there is one
    pub fn staleness(&self, now_local: LocalTime) -> Option<std::time::Duration> {
        self.last_success.map(|at| now_local.saturating_since(at))
    }
}
