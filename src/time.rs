use core::time::Duration;
use std::time::{SystemTime, UNIX_EPOCH};

/// The fixed epoch that all timestamp fields count from, as a duration since
/// 1970-01-01 UTC.
///
/// Every process sharing an ID space must use the same epoch, and it must
/// never change once an ID has been issued against it: moving it would
/// reintroduce duplicate or smaller-than-previous timestamps.
pub const CUSTOM_EPOCH: Duration = Duration::from_millis(1_577_836_800_000);

/// A source of elapsed milliseconds since a configured epoch.
///
/// The allocator reads time exclusively through this trait, which lets tests
/// substitute fixed, stepped, or regressing clocks.
pub trait TimeSource {
    /// Returns the number of milliseconds elapsed since the epoch.
    fn current_millis(&self) -> u64;
}

/// The production time source: the system wall clock, offset by a configured
/// epoch.
///
/// This deliberately reads `SystemTime` rather than a monotonic timer. A
/// monotonic source can never regress, which sounds attractive but would let
/// an allocator silently drift away from real time after an external clock
/// correction. Observing the wall clock directly means a backward step is
/// *seen* and surfaced as [`Error::ClockRegression`] instead of being papered
/// over.
///
/// [`Error::ClockRegression`]: crate::Error::ClockRegression
#[derive(Clone, Debug)]
pub struct WallClock {
    epoch: Duration,
}

impl Default for WallClock {
    /// Constructs a wall clock aligned to the default [`CUSTOM_EPOCH`].
    fn default() -> Self {
        Self::with_epoch(CUSTOM_EPOCH)
    }
}

impl WallClock {
    /// Constructs a wall clock using a custom epoch as the origin (t = 0),
    /// specified as a duration since the Unix epoch.
    pub const fn with_epoch(epoch: Duration) -> Self {
        Self { epoch }
    }
}

impl TimeSource for WallClock {
    /// Returns milliseconds since the configured epoch, saturating to zero if
    /// the system clock reads earlier than the epoch.
    fn current_millis(&self) -> u64 {
        let since_unix = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .unwrap_or(Duration::ZERO);
        since_unix.saturating_sub(self.epoch).as_millis() as u64
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn wall_clock_tracks_system_time() {
        let clock = WallClock::default();
        let expected = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .unwrap()
            .saturating_sub(CUSTOM_EPOCH)
            .as_millis() as u64;
        let observed = clock.current_millis();
        assert!(observed.abs_diff(expected) <= 50);
    }

    #[test]
    fn future_epoch_saturates_to_zero() {
        // An epoch a thousand years out: the clock reads before it.
        let clock = WallClock::with_epoch(Duration::from_secs(60 * 60 * 24 * 365 * 1000));
        assert_eq!(clock.current_millis(), 0);
    }
}
