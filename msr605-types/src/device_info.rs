//! Device information structures

use std::fmt;

/// Write coercivity mode of the device
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Coercivity {
    /// Hi-Co (2750-4000 Oe cards)
    High,

    /// Low-Co (300 Oe cards)
    Low,
}

impl Coercivity {
    /// Mode letter reported by the device (`h` / `l`)
    pub fn from_reply(byte: u8) -> Option<Self> {
        match byte {
            b'h' => Some(Self::High),
            b'l' => Some(Self::Low),
            _ => None,
        }
    }

    /// Get mode name
    pub fn name(self) -> &'static str {
        match self {
            Self::High => "HI-CO",
            Self::Low => "LOW-CO",
        }
    }
}

impl fmt::Display for Coercivity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Device information
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeviceInfo {
    /// Device model identifier
    pub model: String,

    /// Firmware version
    pub firmware_version: String,
}

impl DeviceInfo {
    pub fn new(model: String, firmware_version: String) -> Self {
        Self {
            model,
            firmware_version,
        }
    }
}

impl fmt::Display for DeviceInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Device[Model: {}, FW: {}]",
            self.model, self.firmware_version
        )
    }
}
