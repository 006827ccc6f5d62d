//! Main board UART receive task
//!
//! Producer side of the receive ring. The buffered UART driver collects
//! bytes in its interrupt handler; this task moves them into the ring.

use defmt::*;
use embassy_rp::uart::BufferedUartRx;
use embedded_io_async::Read;

use crate::channels::RX_RING;
use crate::config::RX_CHUNK;

/// UART RX task - feeds the receive ring
#[embassy_executor::task]
pub async fn uart_rx_task(mut rx: BufferedUartRx) {
    info!("UART RX task started");

    let mut buf = [0u8; RX_CHUNK];

    loop {
        match rx.read(&mut buf).await {
            Ok(n) if n > 0 => {
                trace!("RX: {} bytes", n);
                let accepted = RX_RING.push_many(&buf[..n]);
                if accepted < n {
                    // Counted by the ring; the service task reports it
                    trace!("RX ring full, {} bytes dropped", n - accepted);
                }
            }
            Ok(_) => {}
            Err(e) => {
                warn!("UART read error: {:?}", e);
            }
        }
    }
}
