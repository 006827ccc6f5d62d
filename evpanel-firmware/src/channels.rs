//! Statics shared between tasks
//!
//! The receive ring and the shared state are lock-free or critical-section
//! protected, so both live in plain statics. Outbound config pushes go
//! through an embassy channel.

use embassy_sync::blocking_mutex::raw::CriticalSectionRawMutex;
use embassy_sync::channel::Channel;
use embassy_sync::signal::Signal;

use evpanel_core::{LinkStats, SharedState};
use evpanel_protocol::{DefaultRing, ParamConfig};

/// Queue depth for outbound config pushes
const OUTBOUND_CHANNEL_SIZE: usize = 4;

/// Bytes from the main board, filled by the UART RX task
pub static RX_RING: DefaultRing = DefaultRing::new();

/// Latest running state and config, read by the web layer
pub static SHARED_STATE: SharedState = SharedState::new();

/// Config changes to push to the main board
pub static OUTBOUND: Channel<CriticalSectionRawMutex, ParamConfig, OUTBOUND_CHANNEL_SIZE> =
    Channel::new();

/// Latest link counters, published by the service task
pub static LINK_STATS: Signal<CriticalSectionRawMutex, LinkStats> = Signal::new();
