//! Collaborator Traits
//!
//! The clock core never touches hardware. Everything it needs from the
//! outside world comes in through a small trait, so the same state machine
//! runs on a microcontroller, on a host with a replayed NMEA log, and in
//! tests with a hand-driven counter.
//!
//! ## Module Organization
//!
//! - [`time`] - microsecond counter and the time-source interface the NTP
//!   service consumes
//! - [`source`] - serial byte source and the external NMEA decoder
//! - [`pulse`] - PPS edge interrupt and status indicator
//!
//! ## Usage Example
//!
//! ```rust
//! use satclock_core::traits::MicrosCounter;
//!
//! struct Timer2;
//!
//! impl MicrosCounter for Timer2 {
//!     fn now(&self) -> u32 {
//!         // Read the free-running 1 MHz timer register
//!         0
//!     }
//! }
//! ```

pub mod time;
pub mod source;
pub mod pulse;

pub use time::{MicrosCounter, NtpTimeSource};
pub use source::{ByteSource, SentenceDecoder};
pub use pulse::{EdgeInterrupt, StatusIndicator};
