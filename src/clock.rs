use chrono::{DateTime, Utc};
use std::thread;
use std::time::Duration;

/// Wall clock and blocking sleep, swappable in tests.
pub trait Clock {
    fn now(&self) -> DateTime<Utc>;
    fn sleep(&self, dur: Duration);
}

pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }

    fn sleep(&self, dur: Duration) {
        thread::sleep(dur);
    }
}
