//! Target zone model

use chrono::{FixedOffset, NaiveDateTime, Offset, TimeDelta, Utc};

use crate::{LocalTime, ZoneTime};

/// UTC offset of America/Sao_Paulo, which has kept standard time since 2019
pub const SAO_PAULO_OFFSET_SECS: i32 = -3 * 3600;

/// The fixed geographic zone whose wall clock drives the globe
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Zone {
    /// IANA name, as the time service reports it
    pub name: String,
    /// Standard offset used for fallback reinterpretation
    pub offset: FixedOffset,
}

impl Zone {
    /// Create a zone with a fixed offset east of UTC, in seconds.
    /// Out-of-range offsets (beyond ±24h) fall back to UTC.
    pub fn new(name: impl Into<String>, offset_secs: i32) -> Self {
        let offset = FixedOffset::east_opt(offset_secs).unwrap_or_else(|| Utc.fix());
        Zone {
            name: name.into(),
            offset,
        }
    }

    pub fn sao_paulo() -> Self {
        Self::new("America/Sao_Paulo", SAO_PAULO_OFFSET_SECS)
    }

    /// Read a local clock instant as the zone's wall clock.
    ///
    /// This is the fallback used before any authoritative reading exists. It
    /// applies the zone's standard offset and ignores any daylight-saving rule,
    /// so it is an approximation rather than a full timezone conversion.
    /// Saturates at the representable range instead of overflowing.
    pub fn reinterpret(&self, local: LocalTime) -> ZoneTime {
        let offset_secs = self.offset.local_minus_utc() as i64;
        let fields = local
            .to_utc()
            .naive_utc()
            .checked_add_signed(TimeDelta::seconds(offset_secs))
            .unwrap_or(if offset_secs < 0 {
                NaiveDateTime::MIN
            } else {
                NaiveDateTime::MAX
            });
        ZoneTime::new(fields)
    }
}

impl Default for Zone {
    fn default() -> Self {
        Self::sao_paulo()
    }
}
