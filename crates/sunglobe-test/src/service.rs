//! Simulated time service
//!
//! Simulates:
//! - A remote zone clock drifting against the local clock
//! - Request latency with jitter
//! - Lost requests, error statuses and malformed payloads

use std::time::Duration;

use parking_lot::Mutex;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use sunglobe_core::{GlobeError, GlobeResult, LocalTime, ZoneTime};
use sunglobe_time::{parse_payload, LocalClock, ManualClock, TimeSource};

/// Remote zone clock relative to the local clock
#[derive(Clone, Debug)]
pub struct RemoteClockModel {
    anchor_zone: ZoneTime,
    anchor_local: LocalTime,
    /// Remote seconds per local second (1.0 = perfect)
    pub drift_rate: f64,
}

impl RemoteClockModel {
    pub fn new(anchor_zone: ZoneTime, anchor_local: LocalTime, drift_rate: f64) -> Self {
        RemoteClockModel {
            anchor_zone,
            anchor_local,
            drift_rate,
        }
    }

    pub fn perfect(anchor_zone: ZoneTime, anchor_local: LocalTime) -> Self {
        Self::new(anchor_zone, anchor_local, 1.0)
    }

    /// Remote runs 100 ppm fast
    pub fn fast(anchor_zone: ZoneTime, anchor_local: LocalTime) -> Self {
        Self::new(anchor_zone, anchor_local, 1.0001)
    }

    /// Remote runs 100 ppm slow
    pub fn slow(anchor_zone: ZoneTime, anchor_local: LocalTime) -> Self {
        Self::new(anchor_zone, anchor_local, 0.9999)
    }

    /// True zone time at a local instant
    pub fn zone_time_at(&self, local: LocalTime) -> ZoneTime {
        let elapsed = local.saturating_since(self.anchor_local);
        let scaled = Duration::from_secs_f64(elapsed.as_secs_f64() * self.drift_rate.max(0.0));
        self.anchor_zone.advance(scaled)
    }
}

/// Service fault configuration
#[derive(Clone, Debug)]
pub struct ServiceConfig {
    /// Base round-trip latency
    pub base_latency: Duration,
    /// Uniform extra latency, 0..=jitter_ms
    pub jitter_ms: u32,
    /// Requests that never get a reply (transport error)
    pub loss_rate: f64,
    /// Replies with a 5xx status
    pub error_rate: f64,
    /// Replies whose body has no usable datetime
    pub malformed_rate: f64,
}

impl ServiceConfig {
    pub fn reliable() -> Self {
        ServiceConfig {
            base_latency: Duration::from_millis(80),
            jitter_ms: 40,
            loss_rate: 0.0,
            error_rate: 0.0,
            malformed_rate: 0.0,
        }
    }

    pub fn flaky() -> Self {
        ServiceConfig {
            base_latency: Duration::from_millis(150),
            jitter_ms: 400,
            loss_rate: 0.2,
            error_rate: 0.1,
            malformed_rate: 0.1,
        }
    }

    pub fn offline() -> Self {
        ServiceConfig {
            loss_rate: 1.0,
            ..Self::reliable()
        }
    }
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self::reliable()
    }
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ServiceStats {
    pub requests: u64,
    pub lost: u64,
    pub errors: u64,
    pub malformed: u64,
}

/// Time service that answers from a [`RemoteClockModel`].
///
/// Every fetch advances the shared [`ManualClock`] by the sampled latency,
/// so callers observe the reply at a later local time than they asked.
pub struct SimulatedTimeService {
    remote: RemoteClockModel,
    config: ServiceConfig,
    clock: ManualClock,
    rng: Mutex<StdRng>,
    stats: Mutex<ServiceStats>,
}

impl SimulatedTimeService {
    pub fn new(remote: RemoteClockModel, config: ServiceConfig, clock: ManualClock, seed: u64) -> Self {
        SimulatedTimeService {
            remote,
            config,
            clock,
            rng: Mutex::new(StdRng::seed_from_u64(seed)),
            stats: Mutex::new(ServiceStats::default()),
        }
    }

    pub fn remote(&self) -> &RemoteClockModel {
        &self.remote
    }

    pub fn stats(&self) -> ServiceStats {
        self.stats.lock().clone()
    }

    fn respond(&self) -> GlobeResult<ZoneTime> {
        let cfg = &self.config;
        let (latency, roll): (Duration, f64) = {
            let mut rng = self.rng.lock();
            let jitter = rng.gen_range(0..=cfg.jitter_ms) as u64;
            (cfg.base_latency + Duration::from_millis(jitter), rng.gen())
        };

        let sent_at = self.clock.now();
        self.clock.advance(latency);
        let mut stats = self.stats.lock();
        stats.requests += 1;

        // Cumulative thresholds: lost, then status error, then malformed
        let lost = cfg.loss_rate;
        let errored = lost + cfg.error_rate;
        let malformed = errored + cfg.malformed_rate;

        if roll < lost {
            stats.lost += 1;
            Err(GlobeError::Transport("request timed out".into()))
        } else if roll < errored {
            stats.errors += 1;
            Err(GlobeError::HttpStatus(503))
        } else if roll < malformed {
            stats.malformed += 1;
            parse_payload(br#"{"timezone":"America/Sao_Paulo","datetime":""}"#)
        } else {
            // Server stamps the reply halfway through the round trip
            Ok(self.remote.zone_time_at(sent_at + latency / 2))
        }
    }
}

impl TimeSource for SimulatedTimeService {
    async fn fetch(&self) -> GlobeResult<ZoneTime> {
        self.respond()
    }
}
