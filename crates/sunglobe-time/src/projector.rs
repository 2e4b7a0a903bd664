//! Time projector - derives "now" in the zone on every frame

use sunglobe_core::{ClockState, LocalTime, Locale, Zone, ZoneTime};

/// Where a projected time came from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimeBasis {
    /// Extrapolated from an authoritative reading
    Authoritative,
    /// Local clock reinterpreted as the zone's wall clock
    Fallback,
}

/// One frame's view of the zone clock
#[derive(Debug, Clone, PartialEq)]
pub struct ProjectedTime {
    pub zone_time: ZoneTime,
    pub display: String,
    /// `h + m/60 + s/3600`, in `[0, 24)`
    pub fractional_hour: f64,
    pub basis: TimeBasis,
}

/// Time projector
///
/// Stateless: every tick is a pure function of the local time and the
/// reading held in [`ClockState`]. Fallback results are never written back.
#[derive(Debug, Clone, Default)]
pub struct TimeProjector {
    zone: Zone,
    locale: Locale,
}

impl TimeProjector {
    pub fn new(zone: Zone, locale: Locale) -> Self {
        TimeProjector { zone, locale }
    }

    pub fn zone(&self) -> &Zone {
        &self.zone
    }

    /// Zone time at `now_local`, without formatting
    pub fn zone_time(&self, state: &ClockState, now_local: LocalTime) -> (ZoneTime, TimeBasis) {
        match state.reading() {
            Some(reading) => (reading.extrapolate(now_local), TimeBasis::Authoritative),
            None => (self.zone.reinterpret(now_local), TimeBasis::Fallback),
        }
    }

    /// Project the zone clock for one frame
    pub fn tick(&self, state: &ClockState, now_local: LocalTime) -> ProjectedTime {
        let (zone_time, basis) = self.zone_time(state, now_local);
        ProjectedTime {
            display: self.locale.format(&zone_time),
            fractional_hour: zone_time.fractional_hour(),
            zone_time,
            basis,
        }
    }
}
