use chrono::{NaiveDate, NaiveDateTime, Timelike};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Wall-clock time of day, always interpreted as "today"
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "RawClockTime")]
pub struct ClockTime {
    pub hour: u8,
    pub minute: u8,
}

/// Unchecked shape of a stored clock time
#[derive(Deserialize)]
struct RawClockTime {
    hour: u8,
    minute: u8,
}

impl TryFrom<RawClockTime> for ClockTime {
    type Error = String;

    fn try_from(raw: RawClockTime) -> Result<Self, Self::Error> {
        ClockTime::new(raw.hour, raw.minute)
            .ok_or_else(|| format!("invalid time of day {}:{:02}", raw.hour, raw.minute))
    }
}

/// Last minute of the day; timers still open at midnight are closed here
pub const END_OF_DAY: ClockTime = ClockTime { hour: 23, minute: 59 };

impl ClockTime {
    /// Build a clock time, rejecting out-of-range values
    pub fn new(hour: u8, minute: u8) -> Option<Self> {
        if hour < 24 && minute < 60 {
            Some(Self { hour, minute })
        } else {
            None
        }
    }

    /// Take the hour and minute of a local timestamp (seconds are dropped)
    pub fn from_datetime(at: NaiveDateTime) -> Self {
        Self {
            hour: at.hour() as u8,
            minute: at.minute() as u8,
        }
    }

    /// Minutes since midnight
    pub fn total_minutes(&self) -> i64 {
        i64::from(self.hour) * 60 + i64::from(self.minute)
    }

    /// Whole minutes from `self` to `later`, clamped at zero.
    /// Not midnight-aware: an end before the start yields 0.
    pub fn minutes_until(&self, later: ClockTime) -> u32 {
        (later.total_minutes() - self.total_minutes()).max(0) as u32
    }
}

impl fmt::Display for ClockTime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:02}:{:02}", self.hour, self.minute)
    }
}

/// Format a date as the `YYYY-MM-DD` storage key
pub fn date_key(date: NaiveDate) -> String {
    date.format("%Y-%m-%d").to_string()
}

/// Minutes elapsed between a start time and now, at wall-clock-minute granularity
pub fn elapsed_minutes(start: ClockTime, now: ClockTime) -> u32 {
    start.minutes_until(now)
}

/// Format a duration in minutes as "Xh Ym", or "Ym" under an hour
pub fn format_duration(minutes: u32) -> String {
    let hours = minutes / 60;
    let mins = minutes % 60;

    if hours == 0 {
        format!("{}m", mins)
    } else {
        format!("{}h {}m", hours, mins)
    }
}

/// Format a duration in minutes as a "HH:MM:SS" stopwatch reading
pub fn format_elapsed_time(minutes: u32) -> String {
    let total_seconds = u64::from(minutes) * 60;
    let hours = total_seconds / 3600;
    let mins = (total_seconds % 3600) / 60;
    let secs = total_seconds % 60;

    format!("{:02}:{:02}:{:02}", hours, mins, secs)
}
