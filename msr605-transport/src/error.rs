//! Transport errors

use std::io;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("Channel not open")]
    NotConnected,
    
    #[error("Connection closed by device")]
    ConnectionClosed,
    
    #[error("Serial port error: {0}")]
    Serial(#[from] serialport::Error),
    
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
}

impl Error {
    /// Check if the port is busy or missing (opened elsewhere, unplugged)
    pub fn is_unavailable(&self) -> bool {
        match self {
            Self::Serial(e) => matches!(
                e.kind(),
                serialport::ErrorKind::NoDevice | serialport::ErrorKind::Io(io::ErrorKind::NotFound)
            ),
            Self::Io(e) => matches!(
                e.kind(),
                io::ErrorKind::NotFound | io::ErrorKind::PermissionDenied
            ),
            _ => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unavailable_port() {
        let missing = Error::Serial(serialport::Error::new(
            serialport::ErrorKind::NoDevice,
            "unplugged",
        ));
        assert!(missing.is_unavailable());

        let busy = Error::Io(io::Error::from(io::ErrorKind::PermissionDenied));
        assert!(busy.is_unavailable());

        assert!(!Error::ConnectionClosed.is_unavailable());
        assert!(!Error::Io(io::Error::from(io::ErrorKind::BrokenPipe)).is_unavailable());
    }
}
