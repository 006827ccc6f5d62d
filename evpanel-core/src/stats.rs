//! Link diagnostics
//!
//! Every drop and skip on the receive path is counted here rather than
//! reported as an error.

use evpanel_protocol::ScanStats;

/// Dispatcher outcome counters
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct DispatchStats {
    /// Frames whose handler accepted the payload
    pub applied: u32,
    /// Frames with a recognized code but no handler
    pub unhandled: u32,
    /// Frames whose handler refused the payload
    pub rejected: u32,
}

impl DispatchStats {
    pub const fn new() -> Self {
        Self {
            applied: 0,
            unhandled: 0,
            rejected: 0,
        }
    }
}

/// Snapshot of every receive-side counter
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct LinkStats {
    /// Bytes dropped by the ring on overflow
    pub ring_dropped: u32,
    /// Bytes waiting in the ring
    pub ring_pending: usize,
    /// Bytes waiting in the staging window
    pub window_pending: usize,
    pub scan: ScanStats,
    pub dispatch: DispatchStats,
}

impl LinkStats {
    /// Total skip events caused by line noise
    pub fn noise_events(&self) -> u32 {
        self.scan
            .sync_skips
            .saturating_add(self.scan.unknown_code_skips)
            .saturating_add(self.scan.checksum_failures)
            .saturating_add(self.scan.oversize_skips)
    }

    /// True if nothing has been lost or refused so far
    pub fn is_clean(&self) -> bool {
        self.ring_dropped == 0
            && self.scan.checksum_failures == 0
            && self.scan.oversize_skips == 0
            && self.dispatch.rejected == 0
    }
}
