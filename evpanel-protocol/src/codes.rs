//! Function codes
//!
//! Only codes on the allow-list are ever treated as the start of a frame.
//! The scanner uses the list to reject false sync matches, so a code can be
//! recognized even when nothing handles it.

use crate::frame::FrameError;

// Function code IDs: Main board → Panel
pub const FN_UPDATE_RUN_INFO_ALL: u8 = 0x10;
pub const FN_UPDATE_PARAM_CONFIG: u8 = 0x16;
pub const FN_UPDATE_RFID_CARD: u8 = 0x17;
pub const FN_UPDATE_ALARM_RECORD: u8 = 0x18;

/// Every recognized function code
///
/// 0x11..=0x15 are partial running-info updates and 0x20/0x30 are
/// reserved by the main board firmware. They are accepted on the wire but
/// carry no handler on the panel.
pub const ALLOW_LIST: [u8; 10] = [
    FN_UPDATE_RUN_INFO_ALL,
    0x11,
    0x12,
    0x14,
    0x15,
    FN_UPDATE_PARAM_CONFIG,
    FN_UPDATE_RFID_CARD,
    FN_UPDATE_ALARM_RECORD,
    0x20,
    0x30,
];

/// A function code known to be on the allow-list
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct FunctionCode(u8);

impl FunctionCode {
    /// Replace every field of the running state
    pub const UPDATE_RUN_INFO_ALL: Self = Self(FN_UPDATE_RUN_INFO_ALL);
    /// Replace the parameter configuration
    pub const UPDATE_PARAM_CONFIG: Self = Self(FN_UPDATE_PARAM_CONFIG);
    /// Card list management
    pub const UPDATE_RFID_CARD: Self = Self(FN_UPDATE_RFID_CARD);
    /// Alarm record upload
    pub const UPDATE_ALARM_RECORD: Self = Self(FN_UPDATE_ALARM_RECORD);

    /// Validate a raw code against the allow-list
    pub const fn new(byte: u8) -> Option<Self> {
        if Self::is_recognized(byte) {
            Some(Self(byte))
        } else {
            None
        }
    }

    /// True if `byte` may start a frame
    pub const fn is_recognized(byte: u8) -> bool {
        let mut i = 0;
        while i < ALLOW_LIST.len() {
            if ALLOW_LIST[i] == byte {
                return true;
            }
            i += 1;
        }
        false
    }

    /// Wire value
    pub const fn to_byte(self) -> u8 {
        self.0
    }

    /// Position of this code in [`ALLOW_LIST`]
    ///
    /// Dense index for per-code lookup tables.
    pub const fn index(self) -> usize {
        let mut i = 0;
        while i < ALLOW_LIST.len() {
            if ALLOW_LIST[i] == self.0 {
                return i;
            }
            i += 1;
        }
        // Unreachable: construction goes through the allow-list
        0
    }
}

impl TryFrom<u8> for FunctionCode {
    type Error = FrameError;

    fn try_from(byte: u8) -> Result<Self, Self::Error> {
        Self::new(byte).ok_or(FrameError::UnknownFunctionCode(byte))
    }
}

impl From<FunctionCode> for u8 {
    fn from(code: FunctionCode) -> u8 {
        code.0
    }
}

impl core::fmt::Display for FunctionCode {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "{:#04x}", self.0)
    }
}
