//! Time source for the gateway.
//!
//! Two readings are needed: a monotonic [`Instant`] for rate windows and latency, and
//! the local wall-clock time of day for the session window. [`ManualClock`] moves both
//! together so tests can step through seconds without sleeping.

use chrono::NaiveTime;
use std::sync::{Mutex, PoisonError};
use std::time::{Duration, Instant};

pub trait Clock: Send + Sync {
    fn now(&self) -> Instant;
    fn time_of_day(&self) -> NaiveTime;
}

/// Process clock: `Instant::now()` and local time.
#[derive(Clone, Copy, Debug, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> Instant {
        Instant::now()
    }

    fn time_of_day(&self) -> NaiveTime {
        chrono::Local::now().time()
    }
}

/// Clock that only moves when told to.
#[derive(Debug)]
pub struct ManualClock {
    state: Mutex<(Instant, NaiveTime)>,
}

impl ManualClock {
    pub fn new(time_of_day: NaiveTime) -> Self {
        Self {
            state: Mutex::new((Instant::now(), time_of_day)),
        }
    }

    /// Advances the monotonic instant and the time of day (wrapping at midnight).
    pub fn advance(&self, by: Duration) {
        let mut state = self.state.lock().unwrap_or_else(PoisonError::into_inner);
        state.0 += by;
        let delta = chrono::Duration::from_std(by).unwrap_or(chrono::Duration::zero());
        state.1 = state.1.overflowing_add_signed(delta).0;
    }

    /// Jumps the time of day without moving the monotonic instant.
    pub fn set_time_of_day(&self, time_of_day: NaiveTime) {
        self.state.lock().unwrap_or_else(PoisonError::into_inner).1 = time_of_day;
    }
}

impl Clock for ManualClock {
    fn now(&self) -> Instant {
        self.state.lock().unwrap_or_else(PoisonError::into_inner).0
    }

    fn time_of_day(&self) -> NaiveTime {
        self.state.lock().unwrap_or_else(PoisonError::into_inner).1
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn manual_clock_advances_both_readings() {
        let clock = ManualClock::new(NaiveTime::from_hms_opt(10, 0, 0).unwrap());
        let t0 = clock.now();
        clock.advance(Duration::from_millis(1500));
        assert_eq!(clock.now() - t0, Duration::from_millis(1500));
        assert_eq!(clock.time_of_day(), NaiveTime::from_hms_milli_opt(10, 0, 1, 500).unwrap());
    }

    #[test]
    fn manual_clock_time_of_day_wraps_at_midnight() {
        let clock = ManualClock::new(NaiveTime::from_hms_opt(23, 59, 59).unwrap());
        clock.advance(Duration::from_secs(2));
        assert_eq!(clock.time_of_day(), NaiveTime::from_hms_opt(0, 0, 1).unwrap());
    }
}
