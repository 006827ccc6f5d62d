//! Frame scanner
//!
//! Pulls bytes out of the receive ring into a bounded staging window,
//! finds frame boundaries, validates each candidate and hands good frames
//! to a callback. Noise never produces an error; every skipped byte is
//! counted in [`ScanStats`] instead.
//!
//! Each pass scans candidate offsets from the start of the window:
//!
//! 1. Wrong sync bytes or an unknown code: advance one byte.
//! 2. Declared frame larger than the whole window: advance one byte,
//!    since it could never complete.
//! 3. Not enough bytes yet for the declared length: stop and wait.
//! 4. Checksum mismatch: skip the candidate's claimed body (`length + 1`).
//! 5. Otherwise deliver the frame and step past it.
//!
//! The consumed prefix is then removed and any partial tail moves to the
//! front of the window for the next pass.

use heapless::Vec;

use crate::codes::FunctionCode;
use crate::frame::{
    checksum, frame_len, HEADER_LEN, OFFSET_CODE, OFFSET_LENGTH, OFFSET_SYNC_FIRST,
    OFFSET_SYNC_SECOND, SYNC_FIRST, SYNC_SECOND,
};
use crate::ring::RxRing;

/// Cumulative scanner counters
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct ScanStats {
    /// Frames that passed validation
    pub frames: u32,
    /// Offsets skipped because the sync marker did not match
    pub sync_skips: u32,
    /// Offsets skipped because the code was not on the allow-list
    pub unknown_code_skips: u32,
    /// Candidates rejected on checksum
    pub checksum_failures: u32,
    /// Offsets skipped because the declared frame exceeds the window
    pub oversize_skips: u32,
}

impl ScanStats {
    /// All counters at zero
    pub const fn new() -> Self {
        Self {
            frames: 0,
            sync_skips: 0,
            unknown_code_skips: 0,
            checksum_failures: 0,
            oversize_skips: 0,
        }
    }
}

/// Result of one scanner pass
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct ScanSummary {
    /// Bytes moved from the ring into the window
    pub drained: usize,
    /// Frames delivered
    pub frames: usize,
    /// Bytes removed from the front of the window
    pub consumed: usize,
    /// Bytes left in the window for the next pass
    pub pending: usize,
}

/// Staging window plus resynchronizing frame search
///
/// `W` is the window capacity. Frames longer than `W` can never be
/// received through this scanner.
#[derive(Debug, Clone)]
pub struct FrameScanner<const W: usize> {
    window: Vec<u8, W>,
    stats: ScanStats,
}

impl<const W: usize> Default for FrameScanner<W> {
    fn default() -> Self {
        Self::new()
    }
}

impl<const W: usize> FrameScanner<W> {
    /// Create a scanner with an empty window
    pub const fn new() -> Self {
        Self {
            window: Vec::new(),
            stats: ScanStats::new(),
        }
    }

    /// Window capacity
    pub const fn window_capacity(&self) -> usize {
        W
    }

    /// Bytes waiting in the window
    pub fn pending(&self) -> usize {
        self.window.len()
    }

    /// Cumulative counters
    pub fn stats(&self) -> ScanStats {
        self.stats
    }

    /// Drop any buffered bytes and zero the counters
    pub fn reset(&mut self) {
        self.window.clear();
        self.stats = ScanStats::new();
    }

    /// Move bytes into the window until it is full or `bytes` runs dry
    ///
    /// Never pulls more items than there is room for, so a lazy source
    /// such as [`RxRing::drain`] keeps whatever does not fit.
    pub fn fill<I>(&mut self, bytes: I) -> usize
    where
        I: IntoIterator<Item = u8>,
    {
        let room = W - self.window.len();
        let mut moved = 0;
        for byte in bytes.into_iter().take(room) {
            if self.window.push(byte).is_err() {
                break;
            }
            moved += 1;
        }
        moved
    }

    /// Drain the ring into the window and scan it once
    pub fn poll<const N: usize, F>(&mut self, ring: &RxRing<N>, on_frame: F) -> ScanSummary
    where
        F: FnMut(FunctionCode, &[u8]),
    {
        let drained = self.fill(ring.drain());
        let mut summary = self.scan(on_frame);
        summary.drained = drained;
        summary
    }

    /// Scan the window for frames
    ///
    /// `on_frame` receives the code and payload of every frame that passes
    /// validation, in stream order.
    pub fn scan<F>(&mut self, mut on_frame: F) -> ScanSummary
    where
        F: FnMut(FunctionCode, &[u8]),
    {
        let len = self.window.len();
        let mut offset = 0;
        let mut frames = 0;

        while len - offset >= HEADER_LEN {
            let candidate = &self.window[offset..];

            if candidate[OFFSET_SYNC_FIRST] != SYNC_FIRST
                || candidate[OFFSET_SYNC_SECOND] != SYNC_SECOND
            {
                self.stats.sync_skips = self.stats.sync_skips.saturating_add(1);
                offset += 1;
                continue;
            }

            let Some(code) = FunctionCode::new(candidate[OFFSET_CODE]) else {
                self.stats.unknown_code_skips = self.stats.unknown_code_skips.saturating_add(1);
                offset += 1;
                continue;
            };

            let payload_len = candidate[OFFSET_LENGTH] as usize;
            let total = frame_len(payload_len);

            if total > W {
                self.stats.oversize_skips = self.stats.oversize_skips.saturating_add(1);
                offset += 1;
                continue;
            }

            if candidate.len() < total {
                // Partial frame, wait for the rest
                break;
            }

            let body_end = HEADER_LEN + payload_len;
            if checksum(&candidate[..body_end]) != candidate[body_end] {
                self.stats.checksum_failures = self.stats.checksum_failures.saturating_add(1);
                offset += payload_len + 1;
                continue;
            }

            on_frame(code, &candidate[HEADER_LEN..body_end]);
            self.stats.frames = self.stats.frames.saturating_add(1);
            frames += 1;
            offset += total;
        }

        self.compact(offset);

        ScanSummary {
            drained: 0,
            frames,
            consumed: offset,
            pending: self.window.len(),
        }
    }

    /// Remove `consumed` bytes from the front of the window
    fn compact(&mut self, consumed: usize) {
        if consumed == 0 {
            return;
        }
        let len = self.window.len();
        self.window.copy_within(consumed..len, 0);
        self.window.truncate(len - consumed);
    }
}
