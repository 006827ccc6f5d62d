//! Binary records carried in frame payloads
//!
//! The main board sends its C structs as raw memory, so the layouts here
//! follow that ABI: little-endian, floats on 4-byte boundaries, padding
//! after single-byte fields. Pad bytes are ignored on decode and written as
//! zero on encode.
//!
//! ```text
//! RunningState (20 bytes)
//! ┌────────┬─────┬───────┬─────────┬─────────┬─────┬─────┐
//! │ status │ pad │ power │ voltage │ current │ net │ pad │
//! │ 0      │ 1-3 │ 4-7   │ 8-11    │ 12-15   │ 16  │17-19│
//! └────────┴─────┴───────┴─────────┴─────────┴─────┴─────┘
//!
//! ParamConfig (12 bytes)
//! ┌──────┬──────┬────────┬────────┬───────┬─────┐
//! │ ov   │ uv   │ leakdc │ leakac │ maxcc │ pad │
//! │ 0-3  │ 4-7  │ 8      │ 9      │ 10    │ 11  │
//! └──────┴──────┴────────┴────────┴───────┴─────┘
//! ```

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Errors decoding a record from a payload
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum RecordError {
    /// Payload length differs from the record's wire size
    LengthMismatch { expected: usize, actual: usize },
    /// Charge status byte outside the known range
    InvalidChargeStatus(u8),
    /// Network status byte outside the known range
    InvalidNetStatus(u8),
}

/// Charger state as reported by the main board
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[repr(u8)]
pub enum ChargeStatus {
    /// Just booted
    Reboot = 0,
    /// No plug, no card
    #[default]
    Idle = 1,
    /// Plugged in, waiting for a card swipe
    PlugWaitSwipe = 2,
    /// Card swiped, waiting for the plug
    SwipeWaitPlug = 3,
    /// Plugged in and card swiped
    SwipePlugReady = 4,
    Charging = 5,
    ChargePause = 6,
    ChargeStop = 7,
    ChargeDone = 8,
    Fault = 9,
}

impl ChargeStatus {
    /// Parse from the wire byte
    pub fn from_byte(byte: u8) -> Option<Self> {
        match byte {
            0 => Some(Self::Reboot),
            1 => Some(Self::Idle),
            2 => Some(Self::PlugWaitSwipe),
            3 => Some(Self::SwipeWaitPlug),
            4 => Some(Self::SwipePlugReady),
            5 => Some(Self::Charging),
            6 => Some(Self::ChargePause),
            7 => Some(Self::ChargeStop),
            8 => Some(Self::ChargeDone),
            9 => Some(Self::Fault),
            _ => None,
        }
    }

    /// Convert to the wire byte
    pub fn to_byte(self) -> u8 {
        self as u8
    }

    /// Returns true while energy is being delivered
    pub fn is_charging(&self) -> bool {
        matches!(self, Self::Charging)
    }
}

/// Internet connectivity of the panel
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[repr(u8)]
pub enum NetStatus {
    /// AP mode only
    #[default]
    Disconnected = 0,
    /// AP + STA, upstream reachable
    Connected = 1,
}

impl NetStatus {
    /// Parse from the wire byte
    pub fn from_byte(byte: u8) -> Option<Self> {
        match byte {
            0 => Some(Self::Disconnected),
            1 => Some(Self::Connected),
            _ => None,
        }
    }

    /// Convert to the wire byte
    pub fn to_byte(self) -> u8 {
        self as u8
    }
}

/// Live charger readings, replaced wholesale by `UPDATE_RUN_INFO_ALL`
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct RunningState {
    pub charge_status: ChargeStatus,
    /// Output power (W)
    pub power: f32,
    /// Line voltage (V)
    pub voltage: f32,
    /// Output current (A)
    pub current: f32,
    pub net_status: NetStatus,
}

impl RunningState {
    /// Size of the record on the wire
    pub const WIRE_LEN: usize = 20;

    /// Power-on values shown until the main board reports in
    pub const DEFAULT: Self = Self {
        charge_status: ChargeStatus::Idle,
        power: 3500.0,
        voltage: 220.0,
        current: 16.0,
        net_status: NetStatus::Disconnected,
    };

    /// Decode from a frame payload
    ///
    /// The payload must be exactly [`Self::WIRE_LEN`] bytes.
    pub fn from_wire(payload: &[u8]) -> Result<Self, RecordError> {
        expect_len(payload, Self::WIRE_LEN)?;

        let charge_status = ChargeStatus::from_byte(payload[0])
            .ok_or(RecordError::InvalidChargeStatus(payload[0]))?;
        let net_status =
            NetStatus::from_byte(payload[16]).ok_or(RecordError::InvalidNetStatus(payload[16]))?;

        Ok(Self {
            charge_status,
            power: read_f32(payload, 4),
            voltage: read_f32(payload, 8),
            current: read_f32(payload, 12),
            net_status,
        })
    }

    /// Encode into the wire layout
    pub fn to_wire(&self) -> [u8; Self::WIRE_LEN] {
        let mut out = [0u8; Self::WIRE_LEN];
        out[0] = self.charge_status.to_byte();
        out[4..8].copy_from_slice(&self.power.to_le_bytes());
        out[8..12].copy_from_slice(&self.voltage.to_le_bytes());
        out[12..16].copy_from_slice(&self.current.to_le_bytes());
        out[16] = self.net_status.to_byte();
        out
    }
}

impl Default for RunningState {
    fn default() -> Self {
        Self::DEFAULT
    }
}

/// Protection thresholds configured from the panel
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct ParamConfig {
    /// Over-voltage trip (V)
    pub ov_threshold: f32,
    /// Under-voltage trip (V)
    pub uv_threshold: f32,
    /// DC leakage trip (mA)
    pub leakage_dc: u8,
    /// AC leakage trip (mA)
    pub leakage_ac: u8,
    /// Maximum charge current (A)
    pub max_charge_current: u8,
}

impl ParamConfig {
    /// Size of the record on the wire
    pub const WIRE_LEN: usize = 12;

    /// Placeholder thresholds shown until the main board sends its config
    ///
    /// 230 V +15%/-23%, common RCD trip levels, and a 32 A circuit.
    pub const DEFAULT: Self = Self {
        ov_threshold: 264.0,
        uv_threshold: 176.0,
        leakage_dc: 6,
        leakage_ac: 30,
        max_charge_current: 32,
    };

    /// Decode from a frame payload
    ///
    /// The payload must be exactly [`Self::WIRE_LEN`] bytes.
    pub fn from_wire(payload: &[u8]) -> Result<Self, RecordError> {
        expect_len(payload, Self::WIRE_LEN)?;

        Ok(Self {
            ov_threshold: read_f32(payload, 0),
            uv_threshold: read_f32(payload, 4),
            leakage_dc: payload[8],
            leakage_ac: payload[9],
            max_charge_current: payload[10],
        })
    }

    /// Encode into the wire layout
    pub fn to_wire(&self) -> [u8; Self::WIRE_LEN] {
        let mut out = [0u8; Self::WIRE_LEN];
        out[0..4].copy_from_slice(&self.ov_threshold.to_le_bytes());
        out[4..8].copy_from_slice(&self.uv_threshold.to_le_bytes());
        out[8] = self.leakage_dc;
        out[9] = self.leakage_ac;
        out[10] = self.max_charge_current;
        out
    }
}

impl Default for ParamConfig {
    fn default() -> Self {
        Self::DEFAULT
    }
}

fn expect_len(payload: &[u8], expected: usize) -> Result<(), RecordError> {
    if payload.len() != expected {
        return Err(RecordError::LengthMismatch {
            expected,
            actual: payload.len(),
        });
    }
    Ok(())
}

fn read_f32(bytes: &[u8], at: usize) -> f32 {
    f32::from_le_bytes([bytes[at], bytes[at + 1], bytes[at + 2], bytes[at + 3]])
}
