//! Time primitives for sunglobe
//!
//! Two notions of time flow through the system:
//! - LocalTime: the observer's own clock, microseconds since the Unix epoch
//! - ZoneTime: wall-clock fields (calendar date and time of day) of the target zone

use std::ops::{Add, Sub};
use std::time::Duration;

use chrono::{DateTime, NaiveDateTime, TimeDelta, Timelike, Utc};

use crate::{GlobeError, GlobeResult};

/// Local clock reading - microseconds since the Unix epoch
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct LocalTime(pub i64);

impl LocalTime {
    pub const ZERO: LocalTime = LocalTime(0);

    #[inline]
    pub fn from_micros(micros: i64) -> Self {
        LocalTime(micros)
    }

    #[inline]
    pub fn from_millis(millis: i64) -> Self {
        LocalTime(millis * 1000)
    }

    #[inline]
    pub fn from_secs(secs: i64) -> Self {
        LocalTime(secs * 1_000_000)
    }

    /// Read the system wall clock
    pub fn now() -> Self {
        Self::from_utc(Utc::now())
    }

    #[inline]
    pub fn from_utc(utc: DateTime<Utc>) -> Self {
        LocalTime(utc.timestamp_micros())
    }

    #[inline]
    pub fn as_micros(self) -> i64 {
        self.0
    }

    #[inline]
    pub fn as_millis(self) -> i64 {
        self.0 / 1000
    }

    #[inline]
    pub fn as_secs_f64(self) -> f64 {
        self.0 as f64 / 1_000_000.0
    }

    /// Convert to a UTC instant
    pub fn to_utc(self) -> DateTime<Utc> {
        let secs = self.0.div_euclid(1_000_000);
        let nanos = (self.0.rem_euclid(1_000_000) * 1000) as u32;
        DateTime::from_timestamp(secs, nanos).unwrap_or_default()
    }

    /// Time elapsed since `earlier`, zero if `earlier` is in the future
    #[inline]
    pub fn saturating_since(self, earlier: LocalTime) -> Duration {
        self - earlier
    }

    #[inline]
    pub fn saturating_add(self, duration: Duration) -> Self {
        LocalTime(self.0.saturating_add(micros_of(duration)))
    }

    #[inline]
    pub fn saturating_sub(self, duration: Duration) -> Self {
        LocalTime(self.0.saturating_sub(micros_of(duration)))
    }
}

/// Whole microseconds in `duration`, clamped to `i64::MAX`
#[inline]
fn micros_of(duration: Duration) -> i64 {
    i64::try_from(duration.as_micros()).unwrap_or(i64::MAX)
}

impl Add<Duration> for LocalTime {
    type Output = LocalTime;

    #[inline]
    fn add(self, rhs: Duration) -> Self::Output {
        self.saturating_add(rhs)
    }
}

impl Sub<Duration> for LocalTime {
    type Output = LocalTime;

    #[inline]
    fn sub(self, rhs: Duration) -> Self::Output {
        self.saturating_sub(rhs)
    }
}

impl Sub<LocalTime> for LocalTime {
    type Output = Duration;

    #[inline]
    fn sub(self, rhs: LocalTime) -> Self::Output {
        match self.0.checked_sub(rhs.0) {
            Some(diff) if diff >= 0 => Duration::from_micros(diff as u64),
            Some(_) => Duration::ZERO,
            // Only overflows when the operands have opposite signs
            None if self.0 > rhs.0 => Duration::from_micros(self.0.abs_diff(rhs.0)),
            None => Duration::ZERO,
        }
    }
}

impl std::fmt::Debug for LocalTime {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "local({})", self.to_utc().format("%Y-%m-%dT%H:%M:%S%.3fZ"))
    }
}

/// Zone wall-clock time
///
/// Holds the calendar and time-of-day fields as they read in the target zone.
/// No offset is attached: the zone is fixed for the whole process.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ZoneTime(NaiveDateTime);

impl ZoneTime {
    #[inline]
    pub fn new(fields: NaiveDateTime) -> Self {
        ZoneTime(fields)
    }

    #[inline]
    pub fn naive(&self) -> NaiveDateTime {
        self.0
    }

    /// Parse an ISO-8601 datetime as sent by the time service.
    ///
    /// With an explicit offset (`2024-01-01T10:00:00.5-03:00`) the fields are
    /// taken as written, which is the zone's wall clock. Without one
    /// (`2024-01-01T10:00:00`) they are taken verbatim as well.
    pub fn parse_iso8601(raw: &str) -> GlobeResult<Self> {
        let trimmed = raw.trim();
        if let Ok(with_offset) = DateTime::parse_from_rfc3339(trimmed) {
            return Ok(ZoneTime(with_offset.naive_local()));
        }
        NaiveDateTime::parse_from_str(trimmed, "%Y-%m-%dT%H:%M:%S%.f")
            .map(ZoneTime)
            .map_err(|_| GlobeError::MalformedDatetime(raw.to_string()))
    }

    /// Advance by an elapsed local duration.
    /// Saturates at the last representable instant instead of overflowing.
    pub fn advance(self, elapsed: Duration) -> Self {
        let delta = TimeDelta::from_std(elapsed).unwrap_or(TimeDelta::MAX);
        match self.0.checked_add_signed(delta) {
            Some(fields) => ZoneTime(fields),
            None => ZoneTime(NaiveDateTime::MAX),
        }
    }

    /// Time of day as `hours + minutes/60 + seconds/3600`, in `[0, 24)`.
    /// Sub-second precision is dropped.
    pub fn fractional_hour(&self) -> f64 {
        let t = self.0.time();
        t.hour() as f64 + t.minute() as f64 / 60.0 + t.second() as f64 / 3600.0
    }
}

impl Sub<ZoneTime> for ZoneTime {
    type Output = TimeDelta;

    #[inline]
    fn sub(self, rhs: ZoneTime) -> Self::Output {
        self.0 - rhs.0
    }
}

impl std::fmt::Debug for ZoneTime {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "zone({})", self.0.format("%Y-%m-%dT%H:%M:%S%.3f"))
    }
}

impl std::fmt::Display for ZoneTime {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0.format("%Y-%m-%dT%H:%M:%S"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn zt(raw: &str) -> ZoneTime {
        ZoneTime::parse_iso8601(raw).unwrap()
    }

    #[test]
    fn test_local_time_sub_saturates() {
        let a = LocalTime::from_millis(1_000);
        let b = LocalTime::from_millis(1_500);

        assert_eq!(b - a, Duration::from_millis(500));
        assert_eq!(a - b, Duration::ZERO);
    }

    #[test]
    fn test_local_time_arithmetic_saturates_at_range_ends() {
        let max = LocalTime::from_micros(i64::MAX);
        let min = LocalTime::from_micros(i64::MIN);

        assert_eq!(max + Duration::from_secs(1), max);
        assert_eq!(min - Duration::from_secs(1), min);
        assert_eq!(LocalTime::ZERO + Duration::MAX, max);
        assert_eq!(max - min, Duration::from_micros(u64::MAX));
        assert_eq!(min - max, Duration::ZERO);
        assert_eq!(
            max.saturating_since(LocalTime::from_micros(-10)),
            Duration::from_micros(i64::MAX as u64 + 10)
        );
    }

    #[test]
    fn test_local_time_utc_roundtrip_keeps_micros() {
        let t = LocalTime::from_micros(1_704_114_000_123_456);
        assert_eq!(LocalTime::from_utc(t.to_utc()), t);

        let before_epoch = LocalTime::from_micros(-1_500_000);
        assert_eq!(LocalTime::from_utc(before_epoch.to_utc()), before_epoch);
    }

    #[test]
    fn test_parse_naive() {
        let t = zt("2024-01-01T10:00:00");
        assert_eq!(t.to_string(), "2024-01-01T10:00:00");
    }

    #[test]
    fn test_parse_with_offset_keeps_wall_clock_fields() {
        let t = zt("2024-01-01T10:00:00.123456-03:00");
        assert_eq!(t.to_string(), "2024-01-01T10:00:00");
        assert_eq!(t.naive().and_utc().timestamp_subsec_micros(), 123_456);
    }

    #[test]
    fn test_parse_rejects_garbage() {
        assert_eq!(
            ZoneTime::parse_iso8601("yesterday"),
            Err(GlobeError::MalformedDatetime("yesterday".into()))
        );
        assert!(ZoneTime::parse_iso8601("").is_err());
        assert!(ZoneTime::parse_iso8601("2024-13-01T10:00:00").is_err());
    }

    #[test]
    fn test_advance_crosses_midnight() {
        let t = zt("2024-01-01T23:59:58").advance(Duration::from_secs(5));
        assert_eq!(t, zt("2024-01-02T00:00:03"));
    }

    #[test]
    fn test_fractional_hour() {
        let t = zt("2024-01-01T10:30:36");
        assert!((t.fractional_hour() - 10.51).abs() < 1e-9);

        let last = zt("2024-01-01T23:59:59.999");
        assert!(last.fractional_hour() < 24.0);
        assert_eq!(zt("2024-01-01T00:00:00").fractional_hour(), 0.0);
    }

    proptest! {
        #[test]
        fn prop_fractional_hour_in_range(secs in 0i64..4_000_000_000i64) {
            let fields = DateTime::from_timestamp(secs, 0).unwrap().naive_utc();
            let h = ZoneTime::new(fields).fractional_hour();
            prop_assert!((0.0..24.0).contains(&h));

            let t = fields.time();
            let back = (h * 3600.0).round() as u32;
            prop_assert_eq!(back, t.hour() * 3600 + t.minute() * 60 + t.second());
        }

        #[test]
        fn prop_advance_is_additive(a in 0u64..1_000_000_000, b in 0u64..1_000_000_000) {
            let base = zt("2024-01-01T10:00:00");
            let once = base.advance(Duration::from_micros(a + b));
            let twice = base.advance(Duration::from_micros(a)).advance(Duration::from_micros(b));
            prop_assert_eq!(once, twice);
        }
    }
}
