//! Embassy async tasks
//!
//! Each task runs independently and communicates via the statics in
//! `channels`.

pub mod service;
pub mod stats;
pub mod uart_rx;
pub mod uart_tx;

pub use service::service_task;
pub use stats::stats_task;
pub use uart_rx::uart_rx_task;
pub use uart_tx::uart_tx_task;
