//! Sync simulator - drives the clock core against a simulated service
//!
//! Runs the same per-frame sequence as the runtime driver, but awaits each
//! sync inline so a run is fully deterministic for a given seed.

use std::time::Duration;

use sunglobe_core::{ClockState, LocalTime, ZoneTime};
use sunglobe_time::{
    ClockSynchronizer, LocalClock, ManualClock, SyncOutcome, SyncSchedule, TimeBasis,
    TimeProjector,
};

use crate::{RemoteClockModel, ServiceConfig, SimulatedTimeService};

/// Simulation parameters
#[derive(Clone, Debug)]
pub struct SimConfig {
    pub frame_dt: Duration,
    pub duration: Duration,
    pub refresh_interval: Duration,
    pub service: ServiceConfig,
    pub seed: u64,
}

impl Default for SimConfig {
    fn default() -> Self {
        SimConfig {
            frame_dt: Duration::from_millis(250),
            duration: Duration::from_secs(30 * 60),
            refresh_interval: Duration::from_secs(60),
            service: ServiceConfig::reliable(),
            seed: 42,
        }
    }
}

/// What happened during a run
#[derive(Clone, Debug, Default)]
pub struct SimReport {
    pub frames: u64,
    pub sync_attempts: u64,
    pub syncs_ok: u64,
    pub syncs_failed: u64,
    pub fallback_frames: u64,
    /// Frames whose zone time went backwards without a sync in between
    pub regressions: u64,
    /// Largest |projected - true| over authoritative frames
    pub max_tracking_error: Duration,
    /// Largest |jump| applied by a sync
    pub max_jump: Duration,
    /// Shortest local-time gap between two sync attempts
    pub min_attempt_gap: Option<Duration>,
}

/// Deterministic sync simulation
pub struct SyncSimulator {
    config: SimConfig,
    clock: ManualClock,
    synchronizer: ClockSynchronizer<SimulatedTimeService, ManualClock>,
    projector: TimeProjector,
    schedule: SyncSchedule,
    state: ClockState,
    remote: RemoteClockModel,
}

impl SyncSimulator {
    pub fn new(config: SimConfig, remote: RemoteClockModel, start: LocalTime) -> Self {
        let clock = ManualClock::new(start);
        let service = SimulatedTimeService::new(
            remote.clone(),
            config.service.clone(),
            clock.clone(),
            config.seed,
        );

        SyncSimulator {
            synchronizer: ClockSynchronizer::new(service, clock.clone()),
            projector: TimeProjector::default(),
            schedule: SyncSchedule::new(config.refresh_interval),
            state: ClockState::new(),
            clock,
            remote,
            config,
        }
    }

    pub fn state(&self) -> &ClockState {
        &self.state
    }

    pub fn service(&self) -> &SimulatedTimeService {
        self.synchronizer.source()
    }

    /// Run the configured duration and report
    pub async fn run(&mut self) -> SimReport {
        let mut report = SimReport::default();
        let end = self.clock.now() + self.config.duration;
        let mut last: Option<ZoneTime> = None;
        let mut last_attempt: Option<LocalTime> = None;

        while self.clock.now() < end {
            let now = self.clock.now();
            report.frames += 1;

            let mut synced = false;
            if self.schedule.try_begin(&mut self.state, now) {
                report.sync_attempts += 1;
                if let Some(prev) = last_attempt {
                    let gap = now - prev;
                    report.min_attempt_gap = Some(report.min_attempt_gap.map_or(gap, |g| g.min(gap)));
                }
                last_attempt = Some(now);

                match self.synchronizer.refresh(&mut self.state).await {
                    SyncOutcome::Synced { jump, .. } => {
                        report.syncs_ok += 1;
                        synced = true;
                        if let Some(jump) = jump.and_then(|j| j.abs().to_std().ok()) {
                            report.max_jump = report.max_jump.max(jump);
                        }
                    }
                    SyncOutcome::Failed(_) => report.syncs_failed += 1,
                }
                self.schedule.finish();
            }

            let now = self.clock.now();
            let projected = self.projector.tick(&self.state, now);
            match projected.basis {
                TimeBasis::Fallback => report.fallback_frames += 1,
                TimeBasis::Authoritative => {
                    let truth = self.remote.zone_time_at(now);
                    let err = (projected.zone_time - truth).abs().to_std().unwrap_or(Duration::MAX);
                    report.max_tracking_error = report.max_tracking_error.max(err);
                }
            }

            if let Some(prev) = last {
                if !synced && projected.zone_time < prev {
                    report.regressions += 1;
                }
            }
            last = Some(projected.zone_time);

            self.clock.advance(self.config.frame_dt);
        }

        report
    }
}
