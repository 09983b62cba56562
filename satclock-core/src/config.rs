//! Clock Configuration
//!
//! The clock has very few knobs. Defaults reproduce the classic behaviour of
//! a GPS-backed NTP server: a fix older than five seconds drops the clock to
//! unlocked, and a second sentence for the same second is ignored.
//!
//! ```rust
//! use satclock_core::{ClockConfig, DuplicateFixPolicy};
//!
//! let config = ClockConfig::default()
//!     .with_stale_after_ms(2000)
//!     .with_duplicate_policy(DuplicateFixPolicy::RefineForward);
//! assert_eq!(config.stale_after().ticks(), 2000);
//! ```

use fugit::MillisDurationU32;

use crate::constants::ntp::DEFAULT_STALE_AFTER_MS;

/// What to do with a valid fix whose whole second equals the one held
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum DuplicateFixPolicy {
    /// Leave the clock untouched and report no update
    #[default]
    Ignore,
    /// Take the decoded fraction if it is ahead of the held one
    ///
    /// Never moves the clock backwards. Receivers that only report whole
    /// seconds (hundredths always 0) make this equivalent to `Ignore`.
    RefineForward,
}

/// Tunable clock parameters
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct ClockConfig {
    /// Fix age (ms) at or beyond which a decoded time is rejected
    pub stale_after_ms: u32,
    /// Handling of repeated sentences for the same second
    pub duplicate_policy: DuplicateFixPolicy,
}

impl Default for ClockConfig {
    fn default() -> Self {
        Self {
            stale_after_ms: DEFAULT_STALE_AFTER_MS,
            duplicate_policy: DuplicateFixPolicy::Ignore,
        }
    }
}

impl ClockConfig {
    /// Set the staleness threshold in milliseconds.
    pub fn with_stale_after_ms(mut self, ms: u32) -> Self {
        self.stale_after_ms = ms;
        self
    }

    /// Set the duplicate-fix policy.
    pub fn with_duplicate_policy(mut self, policy: DuplicateFixPolicy) -> Self {
        self.duplicate_policy = policy;
        self
    }

    /// Staleness threshold as a duration.
    pub const fn stale_after(&self) -> MillisDurationU32 {
        MillisDurationU32::from_ticks(self.stale_after_ms)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_receiver_behaviour() {
        let config = ClockConfig::default();
        assert_eq!(config.stale_after(), MillisDurationU32::from_ticks(5000));
        assert_eq!(config.duplicate_policy, DuplicateFixPolicy::Ignore);
    }
}
