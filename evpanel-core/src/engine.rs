//! Protocol engine
//!
//! Ties the receive ring, frame scanner, dispatcher and shared state
//! together behind a single `service()` call. The firmware calls it on every
//! pass of its polling loop; it never blocks and has no preconditions.
//!
//! ```text
//! UART IRQ ──push──▶ RxRing ──drain──▶ FrameScanner ──▶ Dispatcher ──▶ SharedState
//!                                                                          │
//!                                          HTTP handlers ◀──snapshot───────┘
//! ```

use evpanel_protocol::{
    FrameScanner, ParamConfig, RunningState, RxRing, ScanSummary, DEFAULT_RX_CAPACITY,
    DEFAULT_WINDOW_CAPACITY,
};

use crate::dispatch::{DispatchOutcome, Dispatcher};
use crate::state::SharedState;
use crate::stats::{DispatchStats, LinkStats};

/// Engine sized with the workspace defaults
pub type DefaultEngine<'a> = ProtocolEngine<'a, DEFAULT_RX_CAPACITY, DEFAULT_WINDOW_CAPACITY>;

/// Result of one `service()` pass
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct ServiceReport {
    pub scan: ScanSummary,
    /// Frames applied to shared state this pass
    pub applied: usize,
    /// Frames with no registered handler this pass
    pub unhandled: usize,
    /// Frames refused by their handler this pass
    pub rejected: usize,
    /// Bytes the ring dropped since the previous pass
    pub newly_dropped: u32,
}

/// Receive-side frame engine (the consumer half of the link)
///
/// Borrows the ring, which the UART interrupt feeds concurrently, and the
/// shared state, which readers snapshot concurrently. Owns everything
/// else.
pub struct ProtocolEngine<'a, const RX: usize, const W: usize> {
    ring: &'a RxRing<RX>,
    state: &'a SharedState,
    scanner: FrameScanner<W>,
    dispatcher: Dispatcher<SharedState>,
    dispatch_stats: DispatchStats,
    /// Ring drop count seen at the end of the previous pass
    seen_dropped: u32,
}

impl<'a, const RX: usize, const W: usize> ProtocolEngine<'a, RX, W> {
    /// Create an engine with the standard handlers
    pub fn new(ring: &'a RxRing<RX>, state: &'a SharedState) -> Self {
        Self::with_dispatcher(ring, state, Dispatcher::with_default_handlers())
    }

    /// Create an engine with a custom dispatch table
    pub fn with_dispatcher(
        ring: &'a RxRing<RX>,
        state: &'a SharedState,
        dispatcher: Dispatcher<SharedState>,
    ) -> Self {
        Self {
            ring,
            state,
            scanner: FrameScanner::new(),
            dispatcher,
            dispatch_stats: DispatchStats::new(),
            seen_dropped: ring.dropped(),
        }
    }

    /// Protocol init: reset ring cursors, the staging window and all counters
    ///
    /// Call before the UART receive interrupt is enabled.
    pub fn reset(&mut self) {
        self.ring.reset();
        self.scanner.reset();
        self.dispatch_stats = DispatchStats::new();
        self.seen_dropped = 0;
    }

    /// Run one drain-and-scan pass
    pub fn service(&mut self) -> ServiceReport {
        let state = self.state;
        let dispatcher = &self.dispatcher;
        let totals = &mut self.dispatch_stats;
        let mut report = ServiceReport::default();

        let scan = self.scanner.poll(self.ring, |code, payload| {
            match dispatcher.dispatch(state, code, payload) {
                DispatchOutcome::Applied => {
                    totals.applied = totals.applied.saturating_add(1);
                    report.applied += 1;
                }
                DispatchOutcome::Unhandled => {
                    totals.unhandled = totals.unhandled.saturating_add(1);
                    report.unhandled += 1;
                }
                DispatchOutcome::Rejected(_e) => {
                    #[cfg(feature = "defmt")]
                    defmt::warn!("Frame {} rejected: {:?}", code, _e);
                    totals.rejected = totals.rejected.saturating_add(1);
                    report.rejected += 1;
                }
            }
        });
        report.scan = scan;

        let dropped = self.ring.dropped();
        report.newly_dropped = dropped.wrapping_sub(self.seen_dropped);
        self.seen_dropped = dropped;
        if report.newly_dropped > 0 {
            #[cfg(feature = "defmt")]
            defmt::warn!("RX ring overflow: {} bytes dropped", report.newly_dropped);
        }

        report
    }

    /// Replace the dispatch table's handler set
    pub fn dispatcher_mut(&mut self) -> &mut Dispatcher<SharedState> {
        &mut self.dispatcher
    }

    /// The receive ring this engine drains
    pub fn ring(&self) -> &'a RxRing<RX> {
        self.ring
    }

    /// Copy of the current running state
    pub fn snapshot_running_state(&self) -> RunningState {
        self.state.snapshot_running_state()
    }

    /// Copy of the current parameter config
    pub fn snapshot_config(&self) -> ParamConfig {
        self.state.snapshot_config()
    }

    /// All receive-side counters
    pub fn stats(&self) -> LinkStats {
        LinkStats {
            ring_dropped: self.ring.dropped(),
            ring_pending: self.ring.len(),
            window_pending: self.scanner.pending(),
            scan: self.scanner.stats(),
            dispatch: self.dispatch_stats,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use evpanel_protocol::{ChargeStatus, Frame, FunctionCode, NetStatus, RecordError};

    fn charging() -> RunningState {
        RunningState {
            charge_status: ChargeStatus::Charging,
            power: 7200.0,
            voltage: 231.0,
            current: 31.2,
            net_status: NetStatus::Connected,
        }
    }

    fn running_frame(state: &RunningState) -> heapless::Vec<u8, 64> {
        let frame = Frame::new(FunctionCode::UPDATE_RUN_INFO_ALL, &state.to_wire()).unwrap();
        let mut out = heapless::Vec::new();
        out.extend_from_slice(&frame.encode_to_vec().unwrap()).unwrap();
        out
    }

    #[test]
    fn test_service_applies_running_state() {
        let ring = RxRing::<128>::new();
        let state = SharedState::new();
        let mut engine = ProtocolEngine::<128, 64>::new(&ring, &state);

        ring.push_many(&running_frame(&charging()));
        let report = engine.service();

        assert_eq!(report.applied, 1);
        assert_eq!(report.scan.frames, 1);
        assert_eq!(engine.snapshot_running_state(), charging());
        assert_eq!(state.running_state_updates(), 1);
    }

    #[test]
    fn test_service_on_empty_ring_is_noop() {
        let ring = RxRing::<16>::new();
        let state = SharedState::new();
        let mut engine = ProtocolEngine::<16, 32>::new(&ring, &state);

        for _ in 0..3 {
            assert_eq!(engine.service(), ServiceReport::default());
        }
        assert_eq!(engine.snapshot_running_state(), RunningState::DEFAULT);
    }

    #[test]
    fn test_split_delivery_dispatches_once() {
        let ring = RxRing::<128>::new();
        let state = SharedState::new();
        let mut engine = ProtocolEngine::<128, 64>::new(&ring, &state);
        let bytes = running_frame(&charging());

        ring.push_many(&bytes[..4]);
        assert_eq!(engine.service().applied, 0);
        assert_eq!(state.running_state_updates(), 0);

        ring.push_many(&bytes[4..]);
        assert_eq!(engine.service().applied, 1);
        assert_eq!(engine.service().applied, 0);
        assert_eq!(state.running_state_updates(), 1);
    }

    #[test]
    fn test_wrong_length_record_rejected() {
        let ring = RxRing::<128>::new();
        let state = SharedState::new();
        let mut engine = ProtocolEngine::<128, 64>::new(&ring, &state);

        // Valid frame, but the payload is one byte longer than the record
        let mut payload = [0u8; RunningState::WIRE_LEN + 1];
        payload[..RunningState::WIRE_LEN].copy_from_slice(&charging().to_wire());
        let frame = Frame::new(FunctionCode::UPDATE_RUN_INFO_ALL, &payload).unwrap();
        ring.push_many(&frame.encode_to_vec().unwrap());

        let report = engine.service();
        assert_eq!(report.scan.frames, 1);
        assert_eq!(report.rejected, 1);
        assert_eq!(engine.snapshot_running_state(), RunningState::DEFAULT);
        assert_eq!(engine.stats().dispatch.rejected, 1);
    }

    #[test]
    fn test_unhandled_code_counted() {
        let ring = RxRing::<64>::new();
        let state = SharedState::new();
        let mut engine = ProtocolEngine::<64, 64>::new(&ring, &state);

        let frame = Frame::new(FunctionCode::UPDATE_ALARM_RECORD, &[1, 2, 3]).unwrap();
        ring.push_many(&frame.encode_to_vec().unwrap());

        let report = engine.service();
        assert_eq!(report.unhandled, 1);
        assert_eq!(engine.stats().dispatch.unhandled, 1);
    }

    #[test]
    fn test_custom_handler_through_engine() {
        fn reject_all(_: &SharedState, payload: &[u8]) -> Result<(), RecordError> {
            Err(RecordError::LengthMismatch {
                expected: 0,
                actual: payload.len(),
            })
        }

        let ring = RxRing::<64>::new();
        let state = SharedState::new();
        let mut engine = ProtocolEngine::<64, 64>::new(&ring, &state);
        engine
            .dispatcher_mut()
            .register(FunctionCode::UPDATE_RFID_CARD, reject_all);

        let frame = Frame::new(FunctionCode::UPDATE_RFID_CARD, &[5]).unwrap();
        ring.push_many(&frame.encode_to_vec().unwrap());
        assert_eq!(engine.service().rejected, 1);
    }

    #[test]
    fn test_overflow_reported_once() {
        let ring = RxRing::<8>::new();
        let state = SharedState::new();
        let mut engine = ProtocolEngine::<8, 16>::new(&ring, &state);

        ring.push_many(&[0u8; 10]);
        let report = engine.service();
        assert_eq!(report.newly_dropped, 3);
        assert_eq!(engine.service().newly_dropped, 0);
        assert_eq!(engine.stats().ring_dropped, 3);
    }

    #[test]
    fn test_reset_clears_everything() {
        let ring = RxRing::<8>::new();
        let state = SharedState::new();
        let mut engine = ProtocolEngine::<8, 16>::new(&ring, &state);

        ring.push_many(&[0xAA, 0x55, 0x10]);
        engine.service();
        assert_eq!(engine.stats().window_pending, 3);

        engine.reset();
        let stats = engine.stats();
        assert_eq!(stats.window_pending, 0);
        assert_eq!(stats.ring_pending, 0);
        assert_eq!(stats, LinkStats::default());
    }
}
