//! Byte sources
//!
//! Implementations of [`ByteSource`](crate::traits::ByteSource) that do not
//! need hardware:
//! - `memory` - fixed-capacity in-memory buffer for tests, replays and
//!   UART drivers that fill a buffer from their own interrupt

pub mod memory;

pub use memory::MemoryByteSource;
