//! Disciplined satellite clock for small NTP servers
//!
//! Keeps UTC time from a GPS receiver as an NTP timestamp (seconds since
//! 1900 plus a 32-bit binary fraction). Three inputs feed it:
//! - NMEA fixes read from a serial byte source (coarse, ~1 per second)
//! - the pulse-per-second edge (marks the exact start of each second)
//! - a free-running microsecond counter (fills in between the two)
//!
//! Key constraints:
//! - `no_std`, no heap allocation
//! - interrupt-safe shared state, one short critical section per update
//! - never blocks; the main loop calls [`ClockSource::poll`] as often as it likes
//!
//! ```no_run
//! use satclock_core::{ClockSource, PulseRegistry, SharedClock};
//! use satclock_core::source::MemoryByteSource;
//! use satclock_core::time::StdMicrosCounter;
//! # use satclock_core::{ClockResult, DecodedFix};
//! # use satclock_core::traits::{EdgeInterrupt, SentenceDecoder};
//! # struct Nmea;
//! # impl SentenceDecoder for Nmea {
//! #     fn feed(&mut self, _: u8) -> bool { false }
//! #     fn decoded_fix(&self) -> DecodedFix { unreachable!() }
//! # }
//! # struct PpsPin;
//! # impl EdgeInterrupt for PpsPin {
//! #     fn enable_rising_edge(&mut self) -> ClockResult<()> { Ok(()) }
//! # }
//!
//! static CLOCK: SharedClock = SharedClock::new();
//! static PPS: PulseRegistry = PulseRegistry::new();
//!
//! let mut gps = ClockSource::new(&CLOCK, MemoryByteSource::<512>::new(), Nmea, StdMicrosCounter::new());
//! let _pps = gps.enable_pulse_discipline(&PPS, &mut PpsPin, ()).unwrap();
//!
//! loop {
//!     gps.poll();
//!     let stamp = gps.now();
//!     // answer NTP requests with `stamp.to_be_bytes()`
//! }
//! ```

#![cfg_attr(not(feature = "std"), no_std)]
#![deny(unsafe_code)]
#![warn(missing_docs)]

// Logging goes to `log` on hosts and `defmt` on targets. Format strings stick
// to `{}` with plain integers so both backends accept them.

#[cfg(feature = "log")]
macro_rules! log_debug {
    ($($arg:tt)*) => { log::debug!($($arg)*) };
}

#[cfg(all(feature = "defmt", not(feature = "log")))]
macro_rules! log_debug {
    ($($arg:tt)*) => { defmt::debug!($($arg)*) };
}

#[cfg(not(any(feature = "log", feature = "defmt")))]
macro_rules! log_debug {
    ($fmt:literal $(, $arg:expr)* $(,)?) => {{ $( let _ = &$arg; )* }};
}

#[cfg(feature = "log")]
macro_rules! log_info {
    ($($arg:tt)*) => { log::info!($($arg)*) };
}

#[cfg(all(feature = "defmt", not(feature = "log")))]
macro_rules! log_info {
    ($($arg:tt)*) => { defmt::info!($($arg)*) };
}

#[cfg(not(any(feature = "log", feature = "defmt")))]
macro_rules! log_info {
    ($fmt:literal $(, $arg:expr)* $(,)?) => {{ $( let _ = &$arg; )* }};
}

#[cfg(feature = "log")]
macro_rules! log_warn {
    ($($arg:tt)*) => { log::warn!($($arg)*) };
}

#[cfg(all(feature = "defmt", not(feature = "log")))]
macro_rules! log_warn {
    ($($arg:tt)*) => { defmt::warn!($($arg)*) };
}

#[cfg(not(any(feature = "log", feature = "defmt")))]
macro_rules! log_warn {
    ($fmt:literal $(, $arg:expr)* $(,)?) => {{ $( let _ = &$arg; )* }};
}

pub mod clock;
pub mod config;
pub mod constants;
pub mod epoch;
pub mod errors;
pub mod fix;
pub mod fraction;
pub mod pulse;
pub mod source;
pub mod state;
pub mod time;
pub mod traits;

// Public API
pub use clock::ClockSource;
pub use config::{ClockConfig, DuplicateFixPolicy};
pub use epoch::CalendarDateTime;
pub use errors::{ClockError, ClockResult};
pub use fix::{apply_fix, DecodedFix, FixAge, FixIngestor, FixOutcome};
pub use pulse::{PulseClaim, PulseDiscipline, PulseRegistry};
pub use state::{ClockState, ClockStats, LockState, NtpTimestamp, SharedClock};
pub use traits::{
    ByteSource, EdgeInterrupt, MicrosCounter, NtpTimeSource, SentenceDecoder, StatusIndicator,
};

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
