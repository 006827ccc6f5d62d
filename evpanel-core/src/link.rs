//! Outbound frames
//!
//! Frames are assembled in a staging buffer and streamed out one byte at a
//! time through the UART sink. There is no retry: a sink failure leaves the
//! frame partially sent and the error says how far it got.

use evpanel_hal::UartTx;
use evpanel_protocol::{
    FrameBuilder, FrameError, FunctionCode, ParamConfig, RunningState, DEFAULT_TX_CAPACITY,
};

/// Errors sending a frame
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum SendError<E> {
    /// Frame could not be built; nothing was sent
    Frame(FrameError),
    /// Sink failed after `sent` bytes
    Sink { sent: usize, error: E },
}

impl<E> From<FrameError> for SendError<E> {
    fn from(e: FrameError) -> Self {
        SendError::Frame(e)
    }
}

/// Frame builder bound to a UART transmitter
pub struct Transmitter<U, const T: usize = DEFAULT_TX_CAPACITY> {
    uart: U,
    builder: FrameBuilder<T>,
    frames_sent: u32,
    send_failures: u32,
}

impl<U: UartTx, const T: usize> Transmitter<U, T> {
    /// Wrap a UART transmitter
    pub fn new(uart: U) -> Self {
        Self {
            uart,
            builder: FrameBuilder::new(),
            frames_sent: 0,
            send_failures: 0,
        }
    }

    /// Build a frame and stream it through the sink
    ///
    /// Returns the number of bytes sent.
    pub fn send_frame(
        &mut self,
        code: FunctionCode,
        payload: &[u8],
    ) -> Result<usize, SendError<U::Error>> {
        let frame = self.builder.build(code, payload)?;

        for (sent, &byte) in frame.iter().enumerate() {
            if let Err(error) = self.uart.write_byte(byte) {
                self.send_failures = self.send_failures.saturating_add(1);
                return Err(SendError::Sink { sent, error });
            }
        }
        if let Err(error) = self.uart.flush() {
            self.send_failures = self.send_failures.saturating_add(1);
            return Err(SendError::Sink {
                sent: frame.len(),
                error,
            });
        }

        self.frames_sent = self.frames_sent.saturating_add(1);
        Ok(frame.len())
    }

    /// Push a parameter config to the main board
    pub fn send_param_config(
        &mut self,
        config: &ParamConfig,
    ) -> Result<usize, SendError<U::Error>> {
        self.send_frame(FunctionCode::UPDATE_PARAM_CONFIG, &config.to_wire())
    }

    /// Send a full running state record
    ///
    /// The panel never originates this in normal operation; board
    /// simulators and loopback tests use it.
    pub fn send_running_state(
        &mut self,
        state: &RunningState,
    ) -> Result<usize, SendError<U::Error>> {
        self.send_frame(FunctionCode::UPDATE_RUN_INFO_ALL, &state.to_wire())
    }

    /// Frames sent completely
    pub fn frames_sent(&self) -> u32 {
        self.frames_sent
    }

    /// Frames cut short by a sink error
    pub fn send_failures(&self) -> u32 {
        self.send_failures
    }

    /// Access the underlying UART
    pub fn uart_mut(&mut self) -> &mut U {
        &mut self.uart
    }

    /// Release the underlying UART
    pub fn into_inner(self) -> U {
        self.uart
    }
}
