//! Clock synchronizer - sole writer of the authoritative reading

use std::sync::Arc;
use std::time::Duration;

use chrono::TimeDelta;
use sunglobe_core::{
    AuthoritativeReading, ClockState, GlobeError, GlobeResult, LocalTime, Zone, ZoneTime,
};
use tokio::sync::mpsc;
use tokio::task::JoinHandle;

use crate::{LocalClock, TimeSource};

/// Synchronizer configuration
#[derive(Clone, Debug)]
pub struct SyncConfig {
    /// Time service endpoint
    pub endpoint: String,
    /// Target zone
    pub zone: Zone,
    /// Minimum spacing between sync attempts
    pub refresh_interval: Duration,
    /// Upper bound on a single request
    pub request_timeout: Duration,
}

impl Default for SyncConfig {
    fn default() -> Self {
        SyncConfig {
            endpoint: "https://worldtimeapi.org/api/timezone/America/Sao_Paulo".to_string(),
            zone: Zone::sao_paulo(),
            refresh_interval: Duration::from_secs(60),
            request_timeout: Duration::from_secs(10),
        }
    }
}

/// Result of one fetch, stamped with the local time it was received
#[derive(Clone, Debug)]
pub struct FetchReport {
    pub started_at: LocalTime,
    pub received_at: LocalTime,
    pub result: GlobeResult<ZoneTime>,
}

/// What a sync did to the clock state
#[derive(Clone, Debug, PartialEq)]
pub enum SyncOutcome {
    /// A new reading was installed. `jump` is how far the new reading moved
    /// the zone clock relative to extrapolating the old one.
    Synced {
        reading: AuthoritativeReading,
        jump: Option<TimeDelta>,
    },
    /// The state was left untouched
    Failed(GlobeError),
}

impl SyncOutcome {
    pub fn is_synced(&self) -> bool {
        matches!(self, SyncOutcome::Synced { .. })
    }
}

/// Apply a fetch result to the clock state.
///
/// Failures are logged and absorbed; the existing reading stays exactly as
/// it was.
pub fn apply_fetch(
    state: &mut ClockState,
    result: GlobeResult<ZoneTime>,
    received_at: LocalTime,
) -> SyncOutcome {
    match result {
        Ok(zone_time) => {
            let reading = AuthoritativeReading::new(zone_time, received_at);
            let previous = state.install(reading);
            let jump = previous.map(|old| zone_time - old.extrapolate(received_at));

            match jump {
                None => tracing::info!(
                    zone_time = %zone_time,
                    "first authoritative reading, leaving local fallback"
                ),
                Some(jump) => tracing::debug!(
                    zone_time = %zone_time,
                    jump_ms = jump.num_milliseconds(),
                    "authoritative reading refreshed"
                ),
            }

            SyncOutcome::Synced { reading, jump }
        }
        Err(e) => {
            let stale_for = state
                .staleness(received_at)
                .map(|d| humantime::format_duration(Duration::from_secs(d.as_secs())).to_string());
            tracing::warn!(
                error = %e,
                kind = e.kind(),
                stale_for = stale_for.as_deref().unwrap_or("never synced"),
                "time sync failed, keeping previous reading"
            );
            SyncOutcome::Failed(e)
        }
    }
}

/// Clock synchronizer
///
/// Fetches the zone time from a [`TimeSource`] and installs it as the new
/// authoritative reading, captured at the local time of receipt.
pub struct ClockSynchronizer<S, C> {
    source: Arc<S>,
    clock: C,
}

impl<S, C> ClockSynchronizer<S, C>
where
    S: TimeSource + 'static,
    C: LocalClock + Clone + 'static,
{
    pub fn new(source: S, clock: C) -> Self {
        ClockSynchronizer {
            source: Arc::new(source),
            clock,
        }
    }

    pub fn source(&self) -> &S {
        &self.source
    }

    pub fn clock(&self) -> &C {
        &self.clock
    }

    /// Run one sync attempt to completion against `state`.
    ///
    /// Never fails: errors come back as [`SyncOutcome::Failed`] with the
    /// reading untouched.
    pub async fn refresh(&self, state: &mut ClockState) -> SyncOutcome {
        let started_at = self.clock.now();
        state.record_attempt(started_at);

        let result = self.source.fetch().await;
        let received_at = self.clock.now();
        apply_fetch(state, result, received_at)
    }

    /// Start a fetch in the background and deliver its report on `tx`.
    ///
    /// The caller keeps ownership of the clock state and applies the report
    /// with [`apply_fetch`] when it arrives.
    pub fn spawn_fetch(&self, tx: mpsc::UnboundedSender<FetchReport>) -> JoinHandle<()> {
        let source = Arc::clone(&self.source);
        let clock = self.clock.clone();

        tokio::spawn(async move {
            let started_at = clock.now();
            let result = source.fetch().await;
            let received_at = clock.now();
            let report = FetchReport {
                started_at,
                received_at,
                result,
            };
            if tx.send(report).is_err() {
                tracing::debug!("sync report dropped, driver is gone");
            }
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ManualClock;
    use parking_lot::Mutex;
    use std::collections::VecDeque;

    /// Source that replays canned results and advances the clock by a
    /// fixed latency on every fetch.
    struct ScriptedSource {
        results: Mutex<VecDeque<GlobeResult<ZoneTime>>>,
        clock: ManualClock,
        latency: Duration,
    }

    impl ScriptedSource {
        fn new(clock: ManualClock, latency: Duration) -> Self {
            ScriptedSource {
                results: Mutex::new(VecDeque::new()),
                clock,
                latency,
            }
        }

        fn push(&self, result: GlobeResult<ZoneTime>) {
            self.results.lock().push_back(result);
        }
    }

    impl TimeSource for ScriptedSource {
        async fn fetch(&self) -> GlobeResult<ZoneTime> {
            self.clock.advance(self.latency);
            self.results
                .lock()
                .pop_front()
                .unwrap_or(Err(GlobeError::Transport("script exhausted".into())))
        }
    }

    fn zt(raw: &str) -> ZoneTime {
        ZoneTime::parse_iso8601(raw).unwrap()
    }

    #[tokio::test]
    async fn test_refresh_installs_reading_at_receipt() {
        let clock = ManualClock::new(LocalTime::from_secs(1_000));
        let source = ScriptedSource::new(clock.clone(), Duration::from_millis(200));
        source.push(Ok(zt("2024-01-01T10:00:00")));

        let sync = ClockSynchronizer::new(source, clock.clone());
        let mut state = ClockState::new();

        let outcome = sync.refresh(&mut state).await;
        assert!(outcome.is_synced());

        let reading = state.reading().copied().unwrap();
        assert_eq!(reading.zone_wall_clock(), zt("2024-01-01T10:00:00"));
        assert_eq!(reading.captured_at_local(), LocalTime::from_millis(1_000_200));
        assert_eq!(state.last_attempt(), Some(LocalTime::from_secs(1_000)));
    }

    #[tokio::test]
    async fn test_failed_refresh_leaves_reading_untouched() {
        let clock = ManualClock::new(LocalTime::from_secs(1_000));
        let source = ScriptedSource::new(clock.clone(), Duration::ZERO);
        source.push(Ok(zt("2024-01-01T10:00:00")));
        source.push(Err(GlobeError::HttpStatus(503)));
        source.push(Err(GlobeError::MissingDatetime));

        let sync = ClockSynchronizer::new(source, clock.clone());
        let mut state = ClockState::new();
        sync.refresh(&mut state).await;
        let before = state.reading().copied();

        clock.advance(Duration::from_secs(60));
        let outcome = sync.refresh(&mut state).await;
        assert_eq!(outcome, SyncOutcome::Failed(GlobeError::HttpStatus(503)));
        assert_eq!(state.reading().copied(), before);

        clock.advance(Duration::from_secs(60));
        sync.refresh(&mut state).await;
        assert_eq!(state.reading().copied(), before);
        assert_eq!(state.last_attempt(), Some(LocalTime::from_secs(1_120)));
        assert_eq!(state.last_success(), Some(LocalTime::from_secs(1_000)));
    }

    #[tokio::test]
    async fn test_failure_before_first_sync_stays_in_fallback() {
        let clock = ManualClock::new(LocalTime::from_secs(1_000));
        let source = ScriptedSource::new(clock.clone(), Duration::ZERO);
        let sync = ClockSynchronizer::new(source, clock);
        let mut state = ClockState::new();

        let outcome = sync.refresh(&mut state).await;
        assert!(!outcome.is_synced());
        assert!(state.is_fallback());
    }

    #[test]
    fn test_apply_reports_jump() {
        let mut state = ClockState::new();
        apply_fetch(
            &mut state,
            Ok(zt("2024-01-01T10:00:00")),
            LocalTime::from_secs(0),
        );

        // Remote clock is 2s ahead of extrapolation after one minute
        let outcome = apply_fetch(
            &mut state,
            Ok(zt("2024-01-01T10:01:02")),
            LocalTime::from_secs(60),
        );
        match outcome {
            SyncOutcome::Synced { jump, .. } => {
                assert_eq!(jump, Some(TimeDelta::seconds(2)));
            }
            SyncOutcome::Failed(e) => panic!("unexpected failure: {e}"),
        }
    }

    #[tokio::test]
    async fn test_spawn_fetch_delivers_report() {
        let clock = ManualClock::new(LocalTime::from_secs(500));
        let source = ScriptedSource::new(clock.clone(), Duration::from_secs(1));
        source.push(Ok(zt("2024-01-01T10:00:00")));
        let sync = ClockSynchronizer::new(source, clock);

        let (tx, mut rx) = mpsc::unbounded_channel();
        sync.spawn_fetch(tx).await.unwrap();

        let report = rx.recv().await.unwrap();
        assert_eq!(report.started_at, LocalTime::from_secs(500));
        assert_eq!(report.received_at, LocalTime::from_secs(501));
        assert_eq!(report.result, Ok(zt("2024-01-01T10:00:00")));
    }
}
