//! High-level error types

use msr605_core::{Error as ProtocolError, Status};
use msr605_types::{Coercivity, TrackRecord};

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("Transport error: {0}")]
    Transport(#[from] msr605_transport::Error),

    #[error("Invalid argument: {0}")]
    Types(#[from] msr605_types::Error),

    /// Protocol failure not yet attributed to an operation
    #[error("Protocol error: {0}")]
    Protocol(#[from] ProtocolError),

    #[error("Device not connected")]
    NotConnected,

    /// Read failed; `tracks` holds whatever was decoded before the fault
    #[error("Card read error: {source}")]
    Read {
        tracks: TrackRecord,
        source: ProtocolError,
    },

    /// Channel failed mid-read; `tracks` holds whatever was decoded before
    #[error("Card read interrupted: {source}")]
    ReadInterrupted {
        tracks: TrackRecord,
        source: msr605_transport::Error,
    },

    #[error("Card write error: {0}")]
    Write(#[source] ProtocolError),

    #[error("Erase card error: {0}")]
    Erase(#[source] ProtocolError),

    #[error("Communication test error: {0}")]
    CommunicationTest(#[source] ProtocolError),

    #[error("Sensor test error: {0}")]
    SensorTest(#[source] ProtocolError),

    #[error("RAM test error: {0}")]
    RamTest(#[source] ProtocolError),

    #[error("Setting {mode} error: {source}")]
    SetCoercivity {
        mode: Coercivity,
        source: ProtocolError,
    },

    #[error("Getting coercivity error: {0}")]
    GetCoercivity(#[source] ProtocolError),

    #[error("Getting device model error: {0}")]
    DeviceModel(#[source] ProtocolError),

    #[error("Getting firmware version error: {0}")]
    Firmware(#[source] ProtocolError),
}

impl Error {
    /// Attribute an unattributed protocol error to an operation
    ///
    /// Transport and argument errors pass through unchanged.
    pub(crate) fn context(self, wrap: impl FnOnce(ProtocolError) -> Error) -> Error {
        match self {
            Self::Protocol(e) => wrap(e),
            other => other,
        }
    }

    /// Underlying protocol error, if any
    pub fn protocol(&self) -> Option<&ProtocolError> {
        match self {
            Self::Protocol(e)
            | Self::Read { source: e, .. }
            | Self::Write(e)
            | Self::Erase(e)
            | Self::CommunicationTest(e)
            | Self::SensorTest(e)
            | Self::RamTest(e)
            | Self::SetCoercivity { source: e, .. }
            | Self::GetCoercivity(e)
            | Self::DeviceModel(e)
            | Self::Firmware(e) => Some(e),
            _ => None,
        }
    }

    /// Device status byte behind this error, if any
    pub fn status(&self) -> Option<Status> {
        self.protocol().and_then(ProtocolError::status)
    }

    /// Check if an expected control byte was missing
    pub fn is_framing(&self) -> bool {
        self.protocol().is_some_and(ProtocolError::is_framing)
    }

    /// Tracks decoded before a read failed
    pub fn partial_tracks(&self) -> Option<&TrackRecord> {
        match self {
            Self::Read { tracks, .. } | Self::ReadInterrupted { tracks, .. } => Some(tracks),
            _ => None,
        }
    }

    /// Check if the device may be left mid-response and should be reset
    /// before the next command
    pub fn requires_reset(&self) -> bool {
        self.protocol().is_some()
    }

    /// Check if the channel must be reopened
    pub fn requires_reconnect(&self) -> bool {
        matches!(
            self,
            Self::NotConnected | Self::Transport(_) | Self::ReadInterrupted { .. }
        )
    }
}
