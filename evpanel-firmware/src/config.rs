//! Board configuration
//!
//! Pin assignments and timing for the panel board. The main board link
//! settings are fixed, so everything here is compile-time.

use embassy_rp::uart::{Config, DataBits, Parity, StopBits};
use embassy_time::Duration;
use evpanel_hal::uart as link;

/// Main board link settings (115200 8N1)
pub const LINK: link::UartConfig = link::UartConfig {
    baudrate: 115200,
    data_bits: link::DataBits::Eight,
    parity: link::Parity::None,
    stop_bits: link::StopBits::One,
};

/// Receive ring polling interval
///
/// At 115200 baud roughly 58 bytes arrive in 5 ms, well under the ring's
/// 127 usable slots.
pub const SERVICE_INTERVAL: Duration = Duration::from_millis(5);

/// How often link diagnostics are logged
pub const STATS_INTERVAL: Duration = Duration::from_secs(10);

/// Bytes moved from the UART driver to the ring per read
pub const RX_CHUNK: usize = 32;

/// UART driver buffer sizes
pub const UART_TX_BUF: usize = 128;
pub const UART_RX_BUF: usize = 128;

/// Convert the link settings to the RP2040 driver config
pub fn uart_config(settings: &link::UartConfig) -> Config {
    let mut cfg = Config::default();
    cfg.baudrate = settings.baudrate;
    cfg.data_bits = match settings.data_bits {
        link::DataBits::Seven => DataBits::DataBits7,
        link::DataBits::Eight => DataBits::DataBits8,
    };
    cfg.parity = match settings.parity {
        link::Parity::None => Parity::ParityNone,
        link::Parity::Even => Parity::ParityEven,
        link::Parity::Odd => Parity::ParityOdd,
    };
    cfg.stop_bits = match settings.stop_bits {
        link::StopBits::One => StopBits::STOP1,
        link::StopBits::Two => StopBits::STOP2,
    };
    cfg
}
