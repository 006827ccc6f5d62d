//! Main board UART transmit task
//!
//! Sends config pushes queued on `OUTBOUND`.

use defmt::*;
use embassy_rp::uart::{BufferedUartTx, Error};
use embedded_io::Write;

use evpanel_core::Transmitter;
use evpanel_hal::UartTx;

use crate::channels::OUTBOUND;

/// Blocking byte sink over the buffered UART
///
/// `Transmitter` is synchronous, so a full driver TX buffer spins here and
/// stalls the executor, including `service_task`. A config frame is 17
/// bytes against a 128 byte buffer and pushes are rare, so the buffer only
/// fills if `OUTBOUND` backs up.
pub struct PanelTx(BufferedUartTx);

impl UartTx for PanelTx {
    type Error = Error;

    fn write_byte(&mut self, byte: u8) -> Result<(), Error> {
        self.0.write_all(&[byte])
    }

    fn flush(&mut self) -> Result<(), Error> {
        Write::flush(&mut self.0)
    }
}

/// UART TX task - frames and sends outbound records
#[embassy_executor::task]
pub async fn uart_tx_task(tx: BufferedUartTx) {
    info!("UART TX task started");

    let mut link: Transmitter<PanelTx> = Transmitter::new(PanelTx(tx));

    loop {
        let config = OUTBOUND.receive().await;
        match link.send_param_config(&config) {
            Ok(n) => debug!("Config pushed ({} bytes)", n),
            Err(e) => warn!("Config push failed: {:?}", e),
        }
    }
}
