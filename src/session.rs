//! Session window and logon/logout transition tracking.
//!
//! [`SessionWindow`] answers "is the session open at this time of day". [`SessionGate`]
//! remembers whether we are logged on and reports a [`SessionTransition`] only when the
//! open/closed state actually changes.

use chrono::NaiveTime;

/// Daily time-of-day window, inclusive at both ends.
///
/// When `start > end` the window is always closed unless `wrap_midnight` is set, in
/// which case it runs from `start` through midnight to `end`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SessionWindow {
    pub start: NaiveTime,
    pub end: NaiveTime,
    pub wrap_midnight: bool,
}

impl SessionWindow {
    pub fn new(start: NaiveTime, end: NaiveTime) -> Self {
        Self {
            start,
            end,
            wrap_midnight: false,
        }
    }

    /// Window covering the whole day, last nanosecond included.
    pub fn full_day() -> Self {
        Self::new(NaiveTime::MIN, last_instant_of_day())
    }

    pub fn with_wrap_midnight(mut self, wrap_midnight: bool) -> Self {
        self.wrap_midnight = wrap_midnight;
        self
    }

    pub fn is_open(&self, time_of_day: NaiveTime) -> bool {
        if self.start <= self.end {
            self.start <= time_of_day && time_of_day <= self.end
        } else if self.wrap_midnight {
            time_of_day >= self.start || time_of_day <= self.end
        } else {
            false
        }
    }
}

fn last_instant_of_day() -> NaiveTime {
    NaiveTime::from_hms_nano_opt(23, 59, 59, 999_999_999).unwrap_or(NaiveTime::MIN)
}

/// Logon or logout to send downstream.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SessionTransition {
    Logon,
    Logout,
}

/// Edge detector over [`SessionWindow::is_open`]. Starts logged out.
#[derive(Debug)]
pub struct SessionGate {
    window: SessionWindow,
    logged_on: bool,
}

impl SessionGate {
    pub fn new(window: SessionWindow) -> Self {
        Self {
            window,
            logged_on: false,
        }
    }

    pub fn window(&self) -> SessionWindow {
        self.window
    }

    pub fn is_logged_on(&self) -> bool {
        self.logged_on
    }

    /// Compares `time_of_day` against the window and returns a transition only on a
    /// state change. Repeated polls in the same state return `None`.
    pub fn poll(&mut self, time_of_day: NaiveTime) -> Option<SessionTransition> {
        match (self.window.is_open(time_of_day), self.logged_on) {
            (true, false) => {
                self.logged_on = true;
                Some(SessionTransition::Logon)
            }
            (false, true) => {
                self.logged_on = false;
                Some(SessionTransition::Logout)
            }
            _ => None,
        }
    }

    /// Forces the logged-out state. Returns `Logout` if we were logged on.
    pub fn close(&mut self) -> Option<SessionTransition> {
        if self.logged_on {
            self.logged_on = false;
            Some(SessionTransition::Logout)
        } else {
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn t(h: u32, m: u32, s: u32) -> NaiveTime {
        NaiveTime::from_hms_opt(h, m, s).unwrap()
    }

    #[test]
    fn window_bounds_are_inclusive() {
        let w = SessionWindow::new(t(10, 0, 0), t(13, 0, 0));
        assert!(w.is_open(t(10, 0, 0)));
        assert!(w.is_open(t(13, 0, 0)));
        assert!(w.is_open(t(11, 30, 0)));
        assert!(!w.is_open(t(9, 59, 59)));
        assert!(!w.is_open(t(13, 0, 1)));
    }

    #[test]
    fn inverted_window_without_wrap_is_always_closed() {
        let w = SessionWindow::new(t(22, 0, 0), t(2, 0, 0));
        assert!(!w.is_open(t(23, 0, 0)));
        assert!(!w.is_open(t(1, 0, 0)));
        assert!(!w.is_open(t(12, 0, 0)));
    }

    #[test]
    fn inverted_window_with_wrap_spans_midnight() {
        let w = SessionWindow::new(t(22, 0, 0), t(2, 0, 0)).with_wrap_midnight(true);
        assert!(w.is_open(t(22, 0, 0)));
        assert!(w.is_open(t(23, 59, 59)));
        assert!(w.is_open(t(0, 0, 0)));
        assert!(w.is_open(t(2, 0, 0)));
        assert!(!w.is_open(t(2, 0, 1)));
        assert!(!w.is_open(t(12, 0, 0)));
    }

    #[test]
    fn full_day_covers_midnight_and_last_second() {
        let w = SessionWindow::full_day();
        assert!(w.is_open(t(0, 0, 0)));
        assert!(w.is_open(NaiveTime::from_hms_milli_opt(23, 59, 59, 999).unwrap()));
    }

    #[test]
    fn gate_fires_each_transition_once() {
        let mut gate = SessionGate::new(SessionWindow::new(t(10, 0, 0), t(13, 0, 0)));
        assert_eq!(gate.poll(t(9, 0, 0)), None);
        assert_eq!(gate.poll(t(10, 0, 0)), Some(SessionTransition::Logon));
        assert_eq!(gate.poll(t(10, 0, 1)), None);
        assert_eq!(gate.poll(t(12, 0, 0)), None);
        assert!(gate.is_logged_on());
        assert_eq!(gate.poll(t(13, 0, 1)), Some(SessionTransition::Logout));
        assert_eq!(gate.poll(t(14, 0, 0)), None);
        assert!(!gate.is_logged_on());
    }

    #[test]
    fn close_logs_out_only_when_logged_on() {
        let mut gate = SessionGate::new(SessionWindow::full_day());
        assert_eq!(gate.close(), None);
        gate.poll(t(12, 0, 0));
        assert_eq!(gate.close(), Some(SessionTransition::Logout));
        assert_eq!(gate.close(), None);
    }
}
