#![no_main]

use std::time::Duration;

use libfuzzer_sys::fuzz_target;
use sunglobe_core::{AuthoritativeReading, LocalTime};
use sunglobe_time::parse_payload;

// Arbitrary service bodies must never panic, and any accepted datetime must
// extrapolate and yield an hour of day in range.
fuzz_target!(|data: &[u8]| {
    if let Ok(zone_time) = parse_payload(data) {
        let reading = AuthoritativeReading::new(zone_time, LocalTime::ZERO);
        let later = reading.extrapolate(LocalTime::ZERO + Duration::from_secs(86_400));
        let hour = later.fractional_hour();
        assert!((0.0..24.0).contains(&hour));
    }
});
