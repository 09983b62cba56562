//! Serial Input Traits
//!
//! The fix ingestor pulls bytes from a serial port and pushes them into an
//! NMEA decoder. Both sides are external collaborators; this module only fixes
//! their shape.
//!
//! The byte source follows the pull-based, non-blocking `nb` model used by
//! `embedded-hal` serial ports:
//!
//! ```rust
//! use satclock_core::traits::{ByteSource, SentenceDecoder};
//!
//! fn drain<S: ByteSource, D: SentenceDecoder>(source: &mut S, decoder: &mut D) -> usize {
//!     let mut sentences = 0;
//!     while source.bytes_available() > 0 {
//!         match source.read_byte() {
//!             Ok(byte) => {
//!                 if decoder.feed(byte) {
//!                     sentences += 1;
//!                 }
//!             }
//!             // Nothing buffered after all, come back on the next poll
//!             Err(nb::Error::WouldBlock) => break,
//!             Err(nb::Error::Other(_)) => break,
//!         }
//!     }
//!     sentences
//! }
//! ```

use crate::fix::DecodedFix;

/// Non-blocking source of serial bytes
///
/// ## Error Handling
///
/// - `nb::Error::WouldBlock` - no byte ready right now; normal
/// - `nb::Error::Other(E)` - framing/overrun style errors from the UART
///
/// The clock treats both as "stop draining for this poll". Errors are logged
/// and counted, never propagated.
pub trait ByteSource {
    /// Error reported by the underlying port
    type Error: core::fmt::Debug;

    /// Number of bytes that can be read without blocking
    fn bytes_available(&self) -> usize;

    /// Read one byte without blocking
    fn read_byte(&mut self) -> nb::Result<u8, Self::Error>;
}

/// Incremental NMEA sentence decoder
///
/// Sentence parsing is out of scope for this crate; an implementation wraps
/// whatever decoder the firmware already uses.
pub trait SentenceDecoder {
    /// Feed one byte. Returns `true` when the byte completed a sentence
    /// carrying date and time.
    fn feed(&mut self, byte: u8) -> bool;

    /// Date, time and fix age from the most recently completed sentence
    fn decoded_fix(&self) -> DecodedFix;
}
