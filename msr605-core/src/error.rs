//! Error types for msr605-core

use msr605_types::Track;

use crate::status::Status;

/// Result type alias for msr605 protocol operations
pub type Result<T> = std::result::Result<T, Error>;

/// Core protocol errors
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum Error {
    /// Expected control byte not observed
    #[error("Framing error: expected 0x{expected:02X}, got 0x{actual:02X}")]
    UnexpectedByte {
        expected: u8,
        actual: u8,
    },

    /// Device reported a failing status byte
    #[error("Device status {}: {}", .0.code(), .0.description())]
    Status(Status),

    /// Device answered `A`: the operation was not carried out
    #[error("Device answered 'A': operation not completed")]
    Rejected,

    /// Reply byte outside the documented set
    #[error("Unexpected reply byte 0x{0:02X}")]
    UnexpectedReply(u8),

    /// Track data outside the ISO character set
    #[error("Byte 0x{byte:02X} is not valid for {track}")]
    NonConforming {
        track: Track,
        byte: u8,
    },

    /// Unknown command code
    #[error("Unknown command code: 0x{0:02X}")]
    UnknownCommand(u8),
}

impl Error {
    /// Check if this is a structural framing mismatch
    pub fn is_framing(&self) -> bool {
        matches!(self, Self::UnexpectedByte { .. })
    }

    /// Device status carried by this error, if any
    pub fn status(&self) -> Option<Status> {
        match self {
            Self::Status(status) => Some(*status),
            _ => None,
        }
    }
}
