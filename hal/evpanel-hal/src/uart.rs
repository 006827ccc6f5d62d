//! UART serial communication abstractions
//!
//! The frame engine only needs a byte-at-a-time transmit sink. Receive is
//! interrupt driven on the firmware side and feeds the ring buffer directly,
//! so there is no receive trait.

/// UART transmitter
///
/// The output sink of the link: one call per outgoing byte.
pub trait UartTx {
    /// Error type for transmit operations
    type Error;

    /// Transmit a single byte
    ///
    /// Blocks until the byte has been accepted by the peripheral.
    fn write_byte(&mut self, byte: u8) -> Result<(), Self::Error>;

    /// Write a block of data, one byte at a time
    ///
    /// Stops at the first failing byte. On error nothing after that byte has
    /// been handed to the peripheral.
    fn write_blocking(&mut self, data: &[u8]) -> Result<(), Self::Error> {
        for &byte in data {
            self.write_byte(byte)?;
        }
        Ok(())
    }

    /// Flush any buffered data
    fn flush(&mut self) -> Result<(), Self::Error> {
        Ok(())
    }
}

/// UART configuration
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct UartConfig {
    /// Baud rate in bits per second
    pub baudrate: u32,
    /// Number of data bits (typically 8)
    pub data_bits: DataBits,
    /// Parity mode
    pub parity: Parity,
    /// Number of stop bits
    pub stop_bits: StopBits,
}

impl Default for UartConfig {
    /// 115200 8N1, the main board's fixed link settings
    fn default() -> Self {
        Self {
            baudrate: 115200,
            data_bits: DataBits::Eight,
            parity: Parity::None,
            stop_bits: StopBits::One,
        }
    }
}

/// Number of data bits per frame
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum DataBits {
    Seven,
    Eight,
}

/// Parity mode
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Parity {
    None,
    Even,
    Odd,
}

/// Number of stop bits
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum StopBits {
    One,
    Two,
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Sink that accepts `limit` bytes and then fails
    struct LimitedSink {
        buf: [u8; 8],
        len: usize,
        limit: usize,
    }

    impl UartTx for LimitedSink {
        type Error = ();

        fn write_byte(&mut self, byte: u8) -> Result<(), ()> {
            if self.len >= self.limit {
                return Err(());
            }
            self.buf[self.len] = byte;
            self.len += 1;
            Ok(())
        }
    }

    #[test]
    fn test_write_blocking_writes_in_order() {
        let mut sink = LimitedSink {
            buf: [0; 8],
            len: 0,
            limit: 8,
        };
        sink.write_blocking(&[1, 2, 3]).unwrap();
        assert_eq!(&sink.buf[..sink.len], &[1, 2, 3]);
        assert!(sink.flush().is_ok());
    }

    #[test]
    fn test_write_blocking_stops_at_first_error() {
        let mut sink = LimitedSink {
            buf: [0; 8],
            len: 0,
            limit: 2,
        };
        assert_eq!(sink.write_blocking(&[9, 8, 7, 6]), Err(()));
        assert_eq!(&sink.buf[..sink.len], &[9, 8]);
    }

    #[test]
    fn test_default_config_is_115200_8n1() {
        let config = UartConfig::default();
        assert_eq!(config.baudrate, 115200);
        assert_eq!(config.data_bits, DataBits::Eight);
        assert_eq!(config.parity, Parity::None);
        assert_eq!(config.stop_bits, StopBits::One);
    }
}
