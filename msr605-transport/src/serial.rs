//! Serial port transport
//!
//! The MSR605 enumerates as a USB serial adapter running 9600 baud, 8N1,
//! without flow control.

use std::io::{self, Read, Write};
use std::time::Duration;

use serialport::{ClearBuffer, DataBits, FlowControl, Parity, SerialPort, StopBits};
use tracing::{debug, trace, warn};

use crate::{Channel, error::*};

/// Serial port settings
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SerialConfig {
    /// Port name (e.g., "/dev/ttyUSB0" or "COM3")
    pub path: String,

    /// Baud rate
    pub baud_rate: u32,

    /// OS read timeout; reads keep waiting across timeouts
    pub poll_interval: Duration,
}

impl SerialConfig {
    /// Default baud rate of the device
    pub const DEFAULT_BAUD_RATE: u32 = 9600;

    /// Create settings for a port with device defaults
    pub fn new(path: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            baud_rate: Self::DEFAULT_BAUD_RATE,
            poll_interval: Duration::from_millis(100),
        }
    }

    /// Set baud rate
    pub fn with_baud_rate(mut self, baud_rate: u32) -> Self {
        self.baud_rate = baud_rate;
        self
    }

    /// Set OS read timeout
    pub fn with_poll_interval(mut self, interval: Duration) -> Self {
        self.poll_interval = interval;
        self
    }
}

/// Serial channel to an MSR605
///
/// Reads block until a byte arrives. The port's own read timeout only
/// controls how often the wait loop wakes up.
pub struct SerialChannel {
    name: String,
    port: Option<Box<dyn SerialPort>>,
}

impl SerialChannel {
    /// Open a named port
    ///
    /// Fails if the port does not exist or is held by another process.
    pub fn open(config: &SerialConfig) -> Result<Self> {
        debug!("Opening {} at {} baud...", config.path, config.baud_rate);

        let port = serialport::new(config.path.as_str(), config.baud_rate)
            .data_bits(DataBits::Eight)
            .parity(Parity::None)
            .stop_bits(StopBits::One)
            .flow_control(FlowControl::None)
            .timeout(config.poll_interval)
            .open()
            .map_err(|e| {
                let err = Error::from(e);
                if err.is_unavailable() {
                    warn!("{} is missing or held by another process", config.path);
                }
                err
            })?;

        debug!("Opened {}", config.path);

        Ok(Self {
            name: config.path.clone(),
            port: Some(port),
        })
    }

    /// Wrap a port opened by the caller
    pub fn new(port: Box<dyn SerialPort>) -> Self {
        Self {
            name: port.name().unwrap_or_else(|| "serial".to_string()),
            port: Some(port),
        }
    }

    fn port(&mut self) -> Result<&mut Box<dyn SerialPort>> {
        self.port.as_mut().ok_or(Error::NotConnected)
    }
}

impl Channel for SerialChannel {
    fn write(&mut self, data: &[u8]) -> Result<()> {
        let port = self.port()?;

        trace!("Sending {} bytes: {}", data.len(), hex::encode_upper(data));

        port.write_all(data)?;

        Ok(())
    }

    fn read_byte(&mut self) -> Result<u8> {
        let port = self.port()?;
        let mut buf = [0u8; 1];

        loop {
            match port.read(&mut buf) {
                Ok(0) => return Err(Error::ConnectionClosed),
                Ok(_) => {
                    trace!("Received 0x{:02X}", buf[0]);
                    return Ok(buf[0]);
                }
                Err(e)
                    if matches!(
                        e.kind(),
                        io::ErrorKind::TimedOut | io::ErrorKind::Interrupted
                    ) =>
                {
                    continue;
                }
                Err(e) => return Err(e.into()),
            }
        }
    }

    fn flush(&mut self) -> Result<()> {
        self.port()?.flush()?;
        Ok(())
    }

    fn flush_input(&mut self) -> Result<()> {
        self.port()?.clear(ClearBuffer::Input)?;
        Ok(())
    }

    fn flush_output(&mut self) -> Result<()> {
        self.port()?.clear(ClearBuffer::Output)?;
        Ok(())
    }

    fn is_open(&self) -> bool {
        self.port.is_some()
    }

    fn close(&mut self) -> Result<()> {
        if self.port.take().is_some() {
            debug!("Closed {}", self.name);
        }
        Ok(())
    }

    fn name(&self) -> String {
        self.name.clone()
    }
}

impl Drop for SerialChannel {
    fn drop(&mut self) {
        if self.is_open() {
            debug!("Serial channel {} dropped while still open", self.name);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_serial_config_defaults() {
        let config = SerialConfig::new("/dev/ttyUSB0");
        assert_eq!(config.baud_rate, 9600);
        assert_eq!(config.poll_interval, Duration::from_millis(100));
    }

    #[test]
    fn test_serial_config_builder() {
        let config = SerialConfig::new("COM3")
            .with_baud_rate(19200)
            .with_poll_interval(Duration::from_millis(20));

        assert_eq!(config.path, "COM3");
        assert_eq!(config.baud_rate, 19200);
        assert_eq!(config.poll_interval, Duration::from_millis(20));
    }

    #[test]
    fn test_serial_open_missing_port() {
        let config = SerialConfig::new("/dev/msr605-does-not-exist");
        let err = SerialChannel::open(&config).err().unwrap();
        assert!(err.is_unavailable());
    }
}
