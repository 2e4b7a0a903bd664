//! Sunglobe driver - frame loop implementation

use std::time::{Duration, Instant};

use sunglobe_core::{ClockState, Locale};
use sunglobe_scene::{Camera, CameraConfig, GlobeLayout, SunConfig, SunLight, SunModel, Viewport};
use sunglobe_time::{
    apply_fetch, ClockSynchronizer, FetchReport, LocalClock, ProjectedTime, SyncConfig,
    SyncOutcome, SyncSchedule, TimeProjector, TimeSource,
};
use tokio::sync::mpsc;
use tokio::task::JoinHandle;

use crate::FrameSink;

/// Driver configuration
#[derive(Clone, Debug)]
pub struct DriverConfig {
    /// Frame interval for [`Driver::run`]
    pub frame_interval: Duration,
    /// Display locale
    pub locale: Locale,
    pub sync: SyncConfig,
    pub sun: SunConfig,
    pub camera: CameraConfig,
    /// Initial viewport
    pub viewport: Viewport,
}

impl Default for DriverConfig {
    fn default() -> Self {
        DriverConfig {
            frame_interval: Duration::from_millis(16),
            locale: Locale::PtBr,
            sync: SyncConfig::default(),
            sun: SunConfig::default(),
            camera: CameraConfig::default(),
            viewport: Viewport::new(1280, 720),
        }
    }
}

#[derive(Clone, Debug, Default, serde::Serialize)]
pub struct DriverStats {
    pub frames: u64,
    pub sync_attempts: u64,
    pub sync_successes: u64,
    pub sync_failures: u64,
    pub resizes: u64,
    /// Local time between the start of the last fetch and its reply
    #[serde(skip)]
    pub last_round_trip: Option<Duration>,
    #[serde(skip)]
    pub last_frame_duration: Duration,
}

/// Everything the renderer and display need for one frame
#[derive(Debug, Clone, PartialEq)]
pub struct FrameOutput {
    pub projected: ProjectedTime,
    pub light: SunLight,
}

/// Sunglobe driver
///
/// Sole owner of the [`ClockState`]. Sync fetches run as background tasks
/// and report back over a channel; their results are applied at the start of
/// the next frame, so a slow or hung request never stalls a frame.
pub struct Driver<S, C> {
    synchronizer: ClockSynchronizer<S, C>,
    projector: TimeProjector,
    schedule: SyncSchedule,
    sun: SunModel,
    camera: Camera,
    layout: GlobeLayout,
    state: ClockState,
    reports_tx: mpsc::UnboundedSender<FetchReport>,
    reports_rx: mpsc::UnboundedReceiver<FetchReport>,
    pending: Option<JoinHandle<()>>,
    frame_interval: Duration,
    stats: DriverStats,
}

impl<S, C> Driver<S, C>
where
    S: TimeSource + 'static,
    C: LocalClock + Clone + 'static,
{
    pub fn new(config: DriverConfig, source: S, clock: C) -> Self {
        let (reports_tx, reports_rx) = mpsc::unbounded_channel();

        Driver {
            synchronizer: ClockSynchronizer::new(source, clock),
            projector: TimeProjector::new(config.sync.zone.clone(), config.locale),
            schedule: SyncSchedule::new(config.sync.refresh_interval),
            sun: SunModel::new(config.sun),
            camera: Camera::new(config.camera, config.viewport),
            layout: GlobeLayout::for_viewport(&config.viewport),
            state: ClockState::new(),
            reports_tx,
            reports_rx,
            pending: None,
            frame_interval: config.frame_interval,
            stats: DriverStats::default(),
        }
    }

    pub fn state(&self) -> &ClockState {
        &self.state
    }

    pub fn stats(&self) -> &DriverStats {
        &self.stats
    }

    pub fn camera(&self) -> &Camera {
        &self.camera
    }

    pub fn layout(&self) -> GlobeLayout {
        self.layout
    }

    /// Produce one frame. Must be called from within a tokio runtime.
    pub fn frame(&mut self) -> FrameOutput {
        let start = Instant::now();
        self.stats.frames += 1;

        // Stage 1: Apply finished syncs
        self.drain_reports();

        let now = self.synchronizer.clock().now();

        // Stage 2: Start a sync if due, without waiting for it
        if self.schedule.try_begin(&mut self.state, now) {
            self.stats.sync_attempts += 1;
            self.pending = Some(self.synchronizer.spawn_fetch(self.reports_tx.clone()));
        }

        // Stage 3: Project the zone clock
        let projected = self.projector.tick(&self.state, now);

        // Stage 4: Sun light for the renderer
        let light = self.sun.light(projected.fractional_hour);

        self.stats.last_frame_duration = start.elapsed();
        FrameOutput { projected, light }
    }

    /// Viewport changed: keep the projection undistorted
    pub fn resize(&mut self, viewport: Viewport) -> bool {
        let changed = self.camera.resize(viewport);
        if changed {
            self.stats.resizes += 1;
            tracing::debug!(
                width = viewport.width,
                height = viewport.height,
                aspect = viewport.aspect(),
                "viewport resized"
            );
        }
        changed
    }

    /// Wait for the in-flight sync, if any, and apply its report
    pub async fn settle(&mut self) {
        if let Some(handle) = self.pending.take() {
            if let Err(e) = handle.await {
                tracing::warn!(error = %e, "sync task ended abnormally");
                self.schedule.finish();
            }
        }
        self.drain_reports();
    }

    /// Drive frames into `sink` until ctrl-c
    pub async fn run<K: FrameSink>(&mut self, sink: &mut K) {
        let started = Instant::now();
        let mut ticker = tokio::time::interval(self.frame_interval);
        ticker.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Skip);

        let shutdown = tokio::signal::ctrl_c();
        tokio::pin!(shutdown);

        tracing::info!(
            zone = %self.projector.zone().name,
            interval = %humantime::format_duration(self.schedule.interval()),
            "frame loop started"
        );

        loop {
            tokio::select! {
                _ = &mut shutdown => break,
                _ = ticker.tick() => {
                    let frame = self.frame();
                    sink.present(&frame);
                }
            }
        }

        sink.finish();
        let uptime = Duration::from_secs(started.elapsed().as_secs());
        tracing::info!(
            uptime = %humantime::format_duration(uptime),
            stats = %serde_json::to_string(&self.stats).unwrap_or_default(),
            "frame loop stopped"
        );
    }

    fn drain_reports(&mut self) {
        while let Ok(report) = self.reports_rx.try_recv() {
            self.schedule.finish();
            self.pending = None;

            let round_trip = report.received_at.saturating_since(report.started_at);
            self.stats.last_round_trip = Some(round_trip);
            tracing::debug!(
                round_trip = %humantime::format_duration(round_trip),
                ok = report.result.is_ok(),
                "sync report received"
            );

            match apply_fetch(&mut self.state, report.result, report.received_at) {
                SyncOutcome::Synced { .. } => self.stats.sync_successes += 1,
                SyncOutcome::Failed(_) => self.stats.sync_failures += 1,
            }
        }

        // A task that died without reporting must not block future syncs
        if self.pending.as_ref().is_some_and(|h| h.is_finished()) {
            self.pending = None;
            self.schedule.finish();
        }
    }
}
