use crate::domain::ClockTime;
use chrono::{Local, NaiveDate, NaiveDateTime};

/// Source of local wall-clock time. Injected so tests can drive time by hand.
pub trait Clock {
    fn now(&self) -> NaiveDateTime;

    /// Today's date bucket
    fn today(&self) -> NaiveDate {
        self.now().date()
    }

    /// Current time of day at minute granularity
    fn time_of_day(&self) -> ClockTime {
        ClockTime::from_datetime(self.now())
    }
}

/// The local system clock
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> NaiveDateTime {
        Local::now().naive_local()
    }
}

#[cfg(test)]
pub use manual::ManualClock;
