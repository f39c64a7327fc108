//! Status byte decoding
//!
//! Read and write responses end with a single ASCII status digit.

use std::fmt;

use tracing::warn;

use crate::error::{Error, Result};

/// Outcome reported by the trailing status byte
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Status {
    /// `0`
    Ok,

    /// `1`: write or read error
    ReadWriteError,

    /// `2`: command format error
    CommandFormatError,

    /// `4`: invalid command
    InvalidCommand,

    /// `9`: invalid card swipe while in write mode
    InvalidSwipe,

    /// Any other byte, kept raw
    Unrecognized(u8),
}

impl Status {
    /// Decode a status byte
    ///
    /// # Examples
    ///
    /// ```
    /// use msr605_core::Status;
    ///
    /// assert_eq!(Status::decode(b'0'), Status::Ok);
    /// assert_eq!(Status::decode(b'9'), Status::InvalidSwipe);
    /// assert_eq!(Status::decode(b'7'), Status::Unrecognized(b'7'));
    /// ```
    pub fn decode(byte: u8) -> Self {
        match byte {
            b'0' => Self::Ok,
            b'1' => Self::ReadWriteError,
            b'2' => Self::CommandFormatError,
            b'4' => Self::InvalidCommand,
            b'9' => Self::InvalidSwipe,
            other => Self::Unrecognized(other),
        }
    }

    /// Numeric status code
    ///
    /// Documented codes map to their digit value. Unrecognized codes return
    /// the raw byte as received.
    pub fn code(self) -> u8 {
        match self {
            Self::Ok => 0,
            Self::ReadWriteError => 1,
            Self::CommandFormatError => 2,
            Self::InvalidCommand => 4,
            Self::InvalidSwipe => 9,
            Self::Unrecognized(raw) => raw,
        }
    }

    pub fn is_ok(self) -> bool {
        matches!(self, Self::Ok)
    }

    /// Check if this is one of the documented failure codes
    pub fn is_failure(self) -> bool {
        matches!(
            self,
            Self::ReadWriteError
                | Self::CommandFormatError
                | Self::InvalidCommand
                | Self::InvalidSwipe
        )
    }

    pub fn description(self) -> &'static str {
        match self {
            Self::Ok => "OK",
            Self::ReadWriteError => "write or read error",
            Self::CommandFormatError => "command format error",
            Self::InvalidCommand => "invalid command",
            Self::InvalidSwipe => "invalid card swipe when in write mode",
            Self::Unrecognized(_) => "unrecognized status",
        }
    }

    /// Turn the status into a result
    ///
    /// Documented failure codes become [`Error::Status`]. Unrecognized codes
    /// are logged and let through, leaving the decision to the caller.
    pub fn check(self) -> Result<()> {
        match self {
            Self::Ok => Ok(()),
            Self::Unrecognized(raw) => {
                warn!(status = format!("0x{:02X}", raw), "Unrecognized status byte");
                Ok(())
            }
            failure => Err(Error::Status(failure)),
        }
    }
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Unrecognized(raw) => write!(f, "Status(0x{:02X}: {})", raw, self.description()),
            _ => write!(f, "Status({}: {})", self.code(), self.description()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_decode_documented_codes() {
        assert_eq!(Status::decode(b'0'), Status::Ok);
        assert_eq!(Status::decode(b'1'), Status::ReadWriteError);
        assert_eq!(Status::decode(b'2'), Status::CommandFormatError);
        assert_eq!(Status::decode(b'4'), Status::InvalidCommand);
        assert_eq!(Status::decode(b'9'), Status::InvalidSwipe);
    }

    #[test]
    fn test_failure_codes_carry_number() {
        for (byte, code) in [(b'1', 1), (b'2', 2), (b'4', 4), (b'9', 9)] {
            let status = Status::decode(byte);
            assert_eq!(status.code(), code);
            assert_eq!(status.check(), Err(Error::Status(status)));
        }
    }

    #[test]
    fn test_unrecognized_is_not_fatal() {
        let status = Status::decode(b'3');
        assert_eq!(status, Status::Unrecognized(b'3'));
        assert_eq!(status.code(), b'3');
        assert!(status.check().is_ok());
        assert!(!status.is_failure());
    }

    proptest! {
        #[test]
        fn prop_only_zero_passes_as_ok(byte in any::<u8>()) {
            let status = Status::decode(byte);
            prop_assert_eq!(status.is_ok(), byte == b'0');
            prop_assert_eq!(
                status.is_failure(),
                matches!(byte, b'1' | b'2' | b'4' | b'9')
            );
            prop_assert_eq!(status.check().is_err(), status.is_failure());
        }
    }
}
