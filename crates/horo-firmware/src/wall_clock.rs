//! Wall clock derived from a one-shot SNTP sync plus monotonic uptime.

use embassy_time::Instant;
use horo_core::time::{TimeSample, TimeSource};

/// Epoch fix captured when the SNTP reply arrives: what Unix time it was at
/// which point of local uptime.
#[derive(Debug, Clone, Copy)]
pub struct WallClockSync {
    pub unix_seconds: u64,
    pub at: Instant,
}

/// Local wall clock; unsynced until the network task delivers an epoch fix.
///
/// After sync, samples are the fix plus elapsed uptime, shifted by the
/// build-time UTC offset. Drift over a device's uptime is a few seconds at
/// worst, well under the resolution of a watched second hand.
pub struct WallClock {
    utc_offset_seconds: i64,
    sync: Option<WallClockSync>,
}

impl WallClock {
    pub const fn new(utc_offset_seconds: i64) -> Self {
        Self {
            utc_offset_seconds,
            sync: None,
        }
    }

    pub fn synchronize(&mut self, sync: WallClockSync) {
        self.sync = Some(sync);
    }

    pub fn is_synced(&self) -> bool {
        self.sync.is_some()
    }
}

impl TimeSource for WallClock {
    fn sample(&mut self) -> Option<TimeSample> {
        let sync = self.sync?;
        let elapsed = sync.at.elapsed().as_secs();
        let local = sync.unix_seconds as i64 + elapsed as i64 + self.utc_offset_seconds;
        Some(TimeSample::from_day_seconds(local))
    }
}
