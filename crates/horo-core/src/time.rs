//! Wall-clock samples and the source trait the tick loop polls.

/// One wall-clock reading in local time.
///
/// Produced by a [`TimeSource`] once per tick and consumed immediately.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimeSample {
    hour: u8,
    minute: u8,
    second: u8,
}

impl TimeSample {
    /// Build a sample, wrapping out-of-range fields into their valid ranges.
    pub const fn new(hour: u8, minute: u8, second: u8) -> Self {
        Self {
            hour: hour % 24,
            minute: minute % 60,
            second: second % 60,
        }
    }

    /// Hour of day, 0..=23.
    pub const fn hour(&self) -> u8 {
        self.hour
    }

    /// Minute of hour, 0..=59.
    pub const fn minute(&self) -> u8 {
        self.minute
    }

    /// Second of minute, 0..=59.
    pub const fn second(&self) -> u8 {
        self.second
    }

    /// Sample at `seconds` past local midnight.
    ///
    /// Accepts any offset; whole days and negative values wrap, so callers
    /// can pass an epoch count with a time-zone offset already applied.
    pub const fn from_day_seconds(seconds: i64) -> Self {
        let day = seconds.rem_euclid(86_400);
        Self {
            hour: (day / 3_600) as u8,
            minute: (day % 3_600 / 60) as u8,
            second: (day % 60) as u8,
        }
    }

    /// Hour-hand unit on the 12-unit dial; 12 and 0 both map to the top.
    pub const fn hour_unit(&self) -> u8 {
        self.hour % 12
    }
}

/// Source of wall-clock samples.
///
/// Returns `None` until time sync has happened; afterwards it keeps
/// returning samples for the process lifetime. Polled non-blockingly once
/// per tick so the tick cadence never waits on sync.
pub trait TimeSource {
    fn sample(&mut self) -> Option<TimeSample>;
}
