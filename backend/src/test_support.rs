//! Shared helpers for unit tests.

use std::sync::Mutex;

use chrono::{DateTime, Local, TimeDelta, Utc};
use mockable::Clock;

/// Clock frozen at a chosen instant that tests can move forward.
pub struct SteppingClock(Mutex<DateTime<Utc>>);

impl SteppingClock {
    pub fn new(now: DateTime<Utc>) -> Self {
        Self(Mutex::new(now))
    }

    /// Clock frozen at 2024-05-01T10:00:00Z.
    pub fn fixed() -> Self {
        Self::new(DateTime::from_timestamp(1_714_557_600, 0).expect("valid timestamp"))
    }

    pub fn advance_seconds(&self, seconds: i64) {
        *self.0.lock().expect("clock mutex") += TimeDelta::seconds(seconds);
    }
}

impl Clock for SteppingClock {
    fn local(&self) -> DateTime<Local> {
        self.utc().with_timezone(&Local)
    }

    fn utc(&self) -> DateTime<Utc> {
        *self.0.lock().expect("clock mutex")
    }
}
