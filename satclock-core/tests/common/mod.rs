//! Shared fakes for integration tests
//!
//! This module provides:
//! - A scripted sentence decoder that completes a fix on every `\n`
//! - A byte source that can be told to fail mid-stream
//! - Recording fakes for the PPS line and the status indicator

#![allow(dead_code)]

use std::collections::VecDeque;
use std::sync::{mpsc, Mutex};
use std::thread::{self, JoinHandle};
use std::time::Duration;

use satclock_core::{
    traits::{ByteSource, EdgeInterrupt, MicrosCounter, SentenceDecoder, StatusIndicator},
    ClockError, ClockResult, ClockState, DecodedFix, SharedClock,
};

pub mod scenarios;

/// Decoder that hands out queued fixes, one per `\n` byte
///
/// Everything else on the wire is ignored, so tests can push any sentence
/// text they like and control the decoded values directly.
#[derive(Debug, Default)]
pub struct ScriptedDecoder {
    queued: VecDeque<DecodedFix>,
    current: Option<DecodedFix>,
    pub bytes_seen: usize,
}

impl ScriptedDecoder {
    pub fn new(fixes: impl IntoIterator<Item = DecodedFix>) -> Self {
        Self {
            queued: fixes.into_iter().collect(),
            current: None,
            bytes_seen: 0,
        }
    }

    pub fn queue(&mut self, fix: DecodedFix) {
        self.queued.push_back(fix);
    }
}

impl SentenceDecoder for ScriptedDecoder {
    fn feed(&mut self, byte: u8) -> bool {
        self.bytes_seen += 1;
        if byte != b'\n' {
            return false;
        }
        self.current = self.queued.pop_front();
        self.current.is_some()
    }

    fn decoded_fix(&self) -> DecodedFix {
        self.current.expect("decoded_fix called without a completed sentence")
    }
}

/// One scripted read result
#[derive(Debug, Clone, Copy)]
pub enum Read {
    Byte(u8),
    Fail,
}

/// Byte source replaying a script of bytes and failures
#[derive(Debug, Default)]
pub struct ScriptedSource {
    script: VecDeque<Read>,
}

impl ScriptedSource {
    pub fn new(script: impl IntoIterator<Item = Read>) -> Self {
        Self { script: script.into_iter().collect() }
    }

    pub fn from_bytes(bytes: &[u8]) -> Self {
        Self::new(bytes.iter().map(|&b| Read::Byte(b)))
    }

    /// Append more bytes behind whatever is still scripted
    pub fn extend(&mut self, bytes: &[u8]) {
        self.script.extend(bytes.iter().map(|&b| Read::Byte(b)));
    }

    pub fn remaining(&self) -> usize {
        self.script.len()
    }
}

impl ByteSource for ScriptedSource {
    type Error = &'static str;

    fn bytes_available(&self) -> usize {
        self.script.len()
    }

    fn read_byte(&mut self) -> nb::Result<u8, Self::Error> {
        match self.script.pop_front() {
            Some(Read::Byte(byte)) => Ok(byte),
            Some(Read::Fail) => Err(nb::Error::Other("uart overrun")),
            None => Err(nb::Error::WouldBlock),
        }
    }
}

/// PPS line fake counting how often it was armed
#[derive(Debug, Default)]
pub struct FakeLine {
    pub armed: u32,
    pub unavailable: bool,
}

impl EdgeInterrupt for FakeLine {
    fn enable_rising_edge(&mut self) -> ClockResult<()> {
        if self.unavailable {
            return Err(ClockError::LineUnavailable { reason: "no edge detector" });
        }
        self.armed += 1;
        Ok(())
    }
}

/// Indicator that records every toggle
#[derive(Debug, Default)]
pub struct RecordingLed {
    pub lit: bool,
    pub toggles: u32,
}

impl StatusIndicator for RecordingLed {
    fn toggle(&mut self) {
        self.lit = !self.lit;
        self.toggles += 1;
    }
}

/// Counter whose first reading raises a PPS edge on another thread
///
/// The edge handler runs as soon as no critical section is held, the same
/// way a pending interrupt fires once interrupts are unmasked. The reading
/// waits briefly for it, so a caller that reads outside its critical section
/// sees the edge land between the read and the commit.
pub struct EdgeOnRead {
    clock: &'static SharedClock,
    reading: u32,
    edge_at: u32,
    handler: Mutex<Option<JoinHandle<()>>>,
}

impl EdgeOnRead {
    pub fn new(clock: &'static SharedClock, reading: u32, edge_at: u32) -> Self {
        Self { clock, reading, edge_at, handler: Mutex::new(None) }
    }

    /// Wait for the edge handler and return the state it left behind
    pub fn settle(&self) -> ClockState {
        if let Some(handler) = self.handler.lock().unwrap().take() {
            handler.join().unwrap();
        }
        self.clock.snapshot()
    }
}

impl MicrosCounter for EdgeOnRead {
    fn now(&self) -> u32 {
        let mut handler = self.handler.lock().unwrap();
        if handler.is_none() {
            let (done, finished) = mpsc::channel();
            let (clock, edge_at) = (self.clock, self.edge_at);
            *handler = Some(thread::spawn(move || {
                clock.apply_pulse(edge_at);
                let _ = done.send(());
            }));
            // Times out while the caller holds a critical section
            let _ = finished.recv_timeout(Duration::from_millis(50));
        }
        self.reading
    }
}
