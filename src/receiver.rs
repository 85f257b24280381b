//! Symbol-stream receiver.
//!
//! This module recovers payloads from a stream of symbols sampled once per
//! slot, the way a camera or photodiode front end sees the LED after slicing
//! each slot's brightness into a 0 or a 1. It does no clock recovery: the
//! caller is expected to sample near the middle of every slot.
//!
//! The receiver keeps the last [`FRAME_LEN`] symbols in a ring and, whenever
//! the oldest ten match the preamble, tries to decode the window as a frame.
//! Calibration bursts and steady glow between frames simply never match.

use heapless::Deque;

use crate::consts::{FRAME_LEN, HEADER_LEN, PREAMBLE};
use crate::frame::{Frame, Payload};

#[derive(Debug)]
/// Sliding-window frame detector.
pub struct SymbolReceiver {
    window: Deque<u8, FRAME_LEN>,

    /// The number of frames decoded with a valid checksum.
    pub good: u16,

    /// The number of preamble matches that failed to decode.
    pub bad: u16,
}

impl SymbolReceiver {
    /// Creates an empty receiver.
    pub const fn new() -> Self {
        Self {
            window: Deque::new(),
            good: 0,
            bad: 0,
        }
    }

    /// Feeds one sampled symbol. Any non-zero value counts as `1`.
    ///
    /// Returns the payload when the symbol completes a valid frame. The window
    /// is emptied after a successful decode so the same frame is not reported
    /// twice.
    pub fn push(&mut self, symbol: u8) -> Option<Payload> {
        if self.window.is_full() {
            let _ = self.window.pop_front();
        }
        let _ = self.window.push_back(u8::from(symbol != 0));
        if !self.window.is_full() || !self.window.iter().take(HEADER_LEN).eq(PREAMBLE.iter()) {
            return None;
        }

        let mut symbols = [0u8; FRAME_LEN];
        for (dst, src) in symbols.iter_mut().zip(self.window.iter()) {
            *dst = *src;
        }
        match Frame::decode(&symbols) {
            Ok(payload) => {
                self.good = self.good.wrapping_add(1);
                self.window.clear();
                Some(payload)
            }
            Err(_) => {
                self.bad = self.bad.wrapping_add(1);
                debug!("receiver dropped frame ({} bad)", self.bad);
                None
            }
        }
    }

    /// Feeds every symbol of `symbols`, returning the last payload decoded.
    pub fn push_all(&mut self, symbols: &[u8]) -> Option<Payload> {
        symbols.iter().fold(None, |last, &s| self.push(s).or(last))
    }

    /// Drops any partially received frame.
    pub fn reset(&mut self) {
        self.window.clear();
    }
}

impl Default for SymbolReceiver {
    fn default() -> Self {
        Self::new()
    }
}
