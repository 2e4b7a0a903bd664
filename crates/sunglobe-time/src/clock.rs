//! Local clock implementations

use std::sync::Arc;
use std::time::Duration;

use parking_lot::Mutex;
use sunglobe_core::LocalTime;

/// Source of local time readings
pub trait LocalClock: Send + Sync {
    fn now(&self) -> LocalTime;
}

/// The operating system wall clock
#[derive(Clone, Copy, Debug, Default)]
pub struct SystemClock;

impl LocalClock for SystemClock {
    #[inline]
    fn now(&self) -> LocalTime {
        LocalTime::now()
    }
}

/// Clock that only moves when told to.
/// Clones share the same reading.
#[derive(Clone, Debug, Default)]
pub struct ManualClock {
    value: Arc<Mutex<LocalTime>>,
}

impl ManualClock {
    pub fn new(start: LocalTime) -> Self {
        ManualClock {
            value: Arc::new(Mutex::new(start)),
        }
    }

    /// Move the clock forward and return the new reading
    pub fn advance(&self, dt: Duration) -> LocalTime {
        let mut value = self.value.lock();
        *value = value.saturating_add(dt);
        *value
    }

    /// Set the clock to any reading, including one in the past
    pub fn set(&self, to: LocalTime) {
        *self.value.lock() = to;
    }
}

impl LocalClock for ManualClock {
    fn now(&self) -> LocalTime {
        *self.value.lock()
    }
}

impl<C: LocalClock + ?Sized> LocalClock for Arc<C> {
    fn now(&self) -> LocalTime {
        (**self).now()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_system_clock_advances() {
        let clock = SystemClock;
        let t1 = clock.now();
        std::thread::sleep(Duration::from_millis(5));
        let t2 = clock.now();

        assert!(t2 >= t1);
    }

    #[test]
    fn test_manual_clock_shared_between_clones() {
        let clock = ManualClock::new(LocalTime::from_secs(100));
        let other = clock.clone();

        clock.advance(Duration::from_secs(5));
        assert_eq!(other.now(), LocalTime::from_secs(105));

        other.set(LocalTime::from_secs(1));
        assert_eq!(clock.now(), LocalTime::from_secs(1));
    }
}
