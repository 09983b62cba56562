//! Memory-backed byte source for testing and replay
//!
//! ## Use Cases
//!
//! 1. **Unit Testing**: feed exact NMEA byte sequences
//! 2. **Replay**: push a recorded receiver log in chunks between polls
//! 3. **Driver glue**: a UART RX interrupt pushes, the poll loop drains
//!
//! ## Example
//!
//! ```rust
//! use satclock_core::source::MemoryByteSource;
//! use satclock_core::traits::ByteSource;
//!
//! let mut source: MemoryByteSource<128> = MemoryByteSource::new();
//! source.extend_from_slice(b"$GPRMC,").unwrap();
//!
//! assert_eq!(source.bytes_available(), 7);
//! assert_eq!(source.read_byte(), Ok(b'$'));
//! ```

use core::convert::Infallible;

use heapless::Deque;

use crate::errors::{ClockError, ClockResult};
use crate::traits::ByteSource;

/// Fixed-capacity FIFO of bytes
///
/// Storage is inline (`N` bytes), no allocation.
#[derive(Debug, Clone)]
pub struct MemoryByteSource<const N: usize> {
    buffer: Deque<u8, N>,
}

impl<const N: usize> MemoryByteSource<N> {
    /// Create an empty source
    pub const fn new() -> Self {
        Self { buffer: Deque::new() }
    }

    /// Append one byte
    pub fn push(&mut self, byte: u8) -> ClockResult<()> {
        self.buffer
            .push_back(byte)
            .map_err(|_| ClockError::SourceFull { capacity: N })
    }

    /// Append all of `bytes`, or none of them if they do not fit
    pub fn extend_from_slice(&mut self, bytes: &[u8]) -> ClockResult<()> {
        if bytes.len() > N - self.buffer.len() {
            return Err(ClockError::SourceFull { capacity: N });
        }
        for &byte in bytes {
            self.push(byte)?;
        }
        Ok(())
    }

    /// Bytes waiting to be read
    pub fn len(&self) -> usize {
        self.buffer.len()
    }

    /// `true` if nothing is buffered
    pub fn is_empty(&self) -> bool {
        self.buffer.is_empty()
    }

    /// Drop everything buffered
    pub fn clear(&mut self) {
        self.buffer.clear();
    }
}

impl<const N: usize> Default for MemoryByteSource<N> {
    fn default() -> Self {
        Self::new()
    }
}

impl<const N: usize> ByteSource for MemoryByteSource<N> {
    type Error = Infallible;

    fn bytes_available(&self) -> usize {
        self.buffer.len()
    }

    fn read_byte(&mut self) -> nb::Result<u8, Self::Error> {
        self.buffer.pop_front().ok_or(nb::Error::WouldBlock)
    }
}
