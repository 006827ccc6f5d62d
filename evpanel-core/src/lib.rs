//! Board-agnostic core of the EV charger panel
//!
//! This crate holds everything between the UART driver and the rest of
//! the panel firmware that does not depend on specific hardware:
//!
//! - Shared protocol state with copy-out snapshots
//! - Function code dispatch table
//! - The polling protocol engine (`service()`)
//! - Outbound frame transmission
//! - Link diagnostics

#![no_std]
#![deny(unsafe_code)]

pub mod dispatch;
pub mod engine;
pub mod link;
pub mod state;
pub mod stats;

pub use dispatch::{DispatchOutcome, Dispatcher, Handler};
pub use engine::{DefaultEngine, ProtocolEngine, ServiceReport};
pub use link::{SendError, Transmitter};
pub use state::SharedState;
pub use stats::{DispatchStats, LinkStats};
