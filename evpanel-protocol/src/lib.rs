//! Main Board Link Protocol
//!
//! This crate defines the UART framing used between the charger main board
//! and the panel controller. The link is point-to-point and fire-and-forget:
//! there are no acknowledgements and no addressing.
//!
//! # Protocol Overview
//!
//! All messages use a simple binary frame format:
//! ```text
//! ┌──────┬──────┬──────┬────────┬─────────────┬──────────┐
//! │ 0xAA │ 0x55 │ CODE │ LENGTH │ PAYLOAD     │ CHECKSUM │
//! │ 1B   │ 1B   │ 1B   │ 1B     │ 0–255B      │ 1B       │
//! └──────┴──────┴──────┴────────┴─────────────┴──────────┘
//! ```
//!
//! The checksum is the low byte of the sum of every preceding byte.
//!
//! Receive path: an interrupt-side producer pushes bytes into an [`RxRing`],
//! and a polling [`FrameScanner`] pulls them into its staging window,
//! resynchronizes on noise and hands validated frames to a callback.
//! Transmit path: a [`FrameBuilder`] assembles checksummed frames.

#![no_std]
#![deny(unsafe_code)]

pub mod codes;
pub mod frame;
pub mod records;
pub mod ring;
pub mod scanner;

pub use codes::{FunctionCode, ALLOW_LIST};
pub use frame::{
    checksum, frame_len, Frame, FrameBuilder, FrameError, HEADER_LEN, MAX_FRAME_SIZE,
    MAX_PAYLOAD_SIZE, SYNC_FIRST, SYNC_SECOND,
};
pub use records::{ChargeStatus, NetStatus, ParamConfig, RecordError, RunningState};
pub use ring::RxRing;
pub use scanner::{FrameScanner, ScanStats, ScanSummary};

/// Default receive ring size in slots (one slot stays reserved)
pub const DEFAULT_RX_CAPACITY: usize = 128;

/// Default staging window size
///
/// Large enough for every record frame the main board sends.
pub const DEFAULT_WINDOW_CAPACITY: usize = 64;

/// Default transmit staging buffer size (any legal frame fits)
pub const DEFAULT_TX_CAPACITY: usize = MAX_FRAME_SIZE;

/// Receive ring with the default capacity
pub type DefaultRing = RxRing<DEFAULT_RX_CAPACITY>;
