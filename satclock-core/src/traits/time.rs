//! Time Source Abstractions
//!
//! Two directions:
//!
//! - [`MicrosCounter`] is consumed: a free-running 32-bit microsecond counter
//!   used to interpolate between second boundaries.
//! - [`NtpTimeSource`] is provided: what the outer NTP service reads to fill
//!   the transmit and receive timestamps of a response.

use crate::state::{LockState, NtpTimestamp};

/// Free-running 32-bit microsecond counter
///
/// ## Implementation Requirements
///
/// - Ticks once per microsecond and wraps from `u32::MAX` to 0 (about every
///   71.6 minutes). The clock only ever subtracts two readings with
///   `wrapping_sub`, so the wrap itself is harmless.
/// - Must be callable from interrupt context: the PPS handler captures the
///   edge time with it.
/// - Must not block.
///
/// ## Platform-Specific Considerations
///
/// ### Bare Metal (no_std)
/// - Read a 1 MHz timer peripheral directly, or a 32-bit cycle counter
///   scaled down
///
/// ### Linux/Unix
/// - Truncate a monotonic clock to microseconds, see
///   [`StdMicrosCounter`](crate::time::StdMicrosCounter)
pub trait MicrosCounter {
    /// Current counter value in microseconds
    fn now(&self) -> u32;
}

impl<C: MicrosCounter + ?Sized> MicrosCounter for &C {
    fn now(&self) -> u32 {
        (**self).now()
    }
}

/// Time source interface for an NTP server
///
/// A server answers a request by reading one timestamp when the packet
/// arrives and another just before sending. Both must come from a single
/// consistent read, which [`now`](NtpTimeSource::now) guarantees; the two
/// field accessors are convenience reads for callers that only need one.
pub trait NtpTimeSource {
    /// Seconds since 1900-01-01 UTC, 0 while unlocked
    fn seconds_since_epoch(&self) -> u32;

    /// Sub-second fraction, `2^32` units per second
    fn fractional_seconds(&self) -> u32;

    /// Seconds and fraction from one consistent read
    fn now(&self) -> NtpTimestamp;

    /// Whether the time is currently usable
    ///
    /// The server decides what to do when unlocked, typically answering
    /// with leap indicator 3 ("clock unsynchronized").
    fn lock_state(&self) -> LockState;
}
