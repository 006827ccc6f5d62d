//! Frame encoding for the main board link.
//!
//! Frame format:
//! - SYNC (2 bytes): 0xAA 0x55
//! - CODE (1 byte): function code, must be on the allow-list
//! - LENGTH (1 byte): payload length (0-255)
//! - PAYLOAD (0-255 bytes): code-specific data
//! - CHECKSUM (1 byte): low 8 bits of the sum of SYNC, CODE, LENGTH and PAYLOAD

use heapless::Vec;

use crate::codes::FunctionCode;

/// First frame synchronization byte
pub const SYNC_FIRST: u8 = 0xAA;

/// Second frame synchronization byte
pub const SYNC_SECOND: u8 = 0x55;

/// Fixed header size (SYNC + CODE + LENGTH)
pub const HEADER_LEN: usize = 4;

/// Trailing checksum size
pub const CHECKSUM_LEN: usize = 1;

/// Byte offsets inside the header
pub(crate) const OFFSET_SYNC_FIRST: usize = 0;
pub(crate) const OFFSET_SYNC_SECOND: usize = 1;
pub(crate) const OFFSET_CODE: usize = 2;
pub(crate) const OFFSET_LENGTH: usize = 3;

/// Maximum payload size in bytes (the length field is one byte)
pub const MAX_PAYLOAD_SIZE: usize = u8::MAX as usize;

/// Maximum complete frame size
pub const MAX_FRAME_SIZE: usize = HEADER_LEN + MAX_PAYLOAD_SIZE + CHECKSUM_LEN;

/// Total on-wire size of a frame carrying `payload_len` bytes
pub const fn frame_len(payload_len: usize) -> usize {
    HEADER_LEN + payload_len + CHECKSUM_LEN
}

/// Low 8 bits of the arithmetic sum of `bytes`
pub fn checksum(bytes: &[u8]) -> u8 {
    bytes.iter().fold(0u8, |sum, &byte| sum.wrapping_add(byte))
}

/// Errors that can occur while building frames
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum FrameError {
    /// Payload does not fit the one-byte length field
    PayloadTooLarge,
    /// Output buffer too small for the encoded frame
    BufferTooSmall,
    /// Code is not on the allow-list
    UnknownFunctionCode(u8),
}

/// Write a complete frame into `buffer`
///
/// Code and payload land at their fixed offsets first, then the header
/// and the checksum. Returns the number of bytes written.
fn write_frame(buffer: &mut [u8], code: FunctionCode, payload: &[u8]) -> Result<usize, FrameError> {
    if payload.len() > MAX_PAYLOAD_SIZE {
        return Err(FrameError::PayloadTooLarge);
    }
    let len = frame_len(payload.len());
    if buffer.len() < len {
        return Err(FrameError::BufferTooSmall);
    }

    let body_end = HEADER_LEN + payload.len();
    buffer[OFFSET_CODE] = code.to_byte();
    buffer[HEADER_LEN..body_end].copy_from_slice(payload);

    buffer[OFFSET_SYNC_FIRST] = SYNC_FIRST;
    buffer[OFFSET_SYNC_SECOND] = SYNC_SECOND;
    buffer[OFFSET_LENGTH] = payload.len() as u8;

    buffer[body_end] = checksum(&buffer[..body_end]);
    Ok(len)
}

/// An owned frame
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Frame {
    /// Function code
    pub code: FunctionCode,
    /// Payload data
    pub payload: Vec<u8, MAX_PAYLOAD_SIZE>,
}

impl Frame {
    /// Create a new frame with the given code and payload
    pub fn new(code: FunctionCode, payload: &[u8]) -> Result<Self, FrameError> {
        let mut payload_vec = Vec::new();
        payload_vec
            .extend_from_slice(payload)
            .map_err(|_| FrameError::PayloadTooLarge)?;

        Ok(Self {
            code,
            payload: payload_vec,
        })
    }

    /// Create a frame with no payload
    pub fn empty(code: FunctionCode) -> Self {
        Self {
            code,
            payload: Vec::new(),
        }
    }

    /// Encoded size of this frame
    pub fn encoded_len(&self) -> usize {
        frame_len(self.payload.len())
    }

    /// Encode this frame into a byte buffer
    ///
    /// Returns the number of bytes written
    pub fn encode(&self, buffer: &mut [u8]) -> Result<usize, FrameError> {
        write_frame(buffer, self.code, &self.payload)
    }

    /// Encode this frame into a heapless Vec
    pub fn encode_to_vec(&self) -> Result<Vec<u8, MAX_FRAME_SIZE>, FrameError> {
        let mut buffer = [0u8; MAX_FRAME_SIZE];
        let len = self.encode(&mut buffer)?;
        let mut vec = Vec::new();
        vec.extend_from_slice(&buffer[..len])
            .map_err(|_| FrameError::BufferTooSmall)?;
        Ok(vec)
    }
}

/// Transmit staging buffer
///
/// Frames are assembled in place and borrowed out, so one builder can be
/// reused for every outgoing frame without copying.
#[derive(Debug, Clone)]
pub struct FrameBuilder<const N: usize> {
    buf: [u8; N],
}

impl<const N: usize> Default for FrameBuilder<N> {
    fn default() -> Self {
        Self::new()
    }
}

impl<const N: usize> FrameBuilder<N> {
    /// Create a builder with a zeroed staging buffer
    pub const fn new() -> Self {
        Self { buf: [0u8; N] }
    }

    /// Largest payload this builder can frame
    pub const fn max_payload(&self) -> usize {
        let room = N.saturating_sub(HEADER_LEN + CHECKSUM_LEN);
        if room < MAX_PAYLOAD_SIZE {
            room
        } else {
            MAX_PAYLOAD_SIZE
        }
    }

    /// Assemble a checksummed frame and return its bytes
    pub fn build(&mut self, code: FunctionCode, payload: &[u8]) -> Result<&[u8], FrameError> {
        let len = write_frame(&mut self.buf, code, payload)?;
        Ok(&self.buf[..len])
    }
}
