//! Transport layer for the MSR605 protocol
//!
//! Provides blocking byte channels to the device.

pub mod error;
pub mod mock;
pub mod serial;

pub use error::{Error, Result};
pub use mock::MockChannel;
pub use serial::{SerialChannel, SerialConfig};

use bytes::{BufMut, BytesMut};

/// Duplex byte channel to a single device
///
/// All calls block until the bytes are transferred or the underlying port
/// fails. Implementations must return [`Error::NotConnected`] once closed.
pub trait Channel: Send {
    /// Write all bytes and push them to the device
    fn write(&mut self, data: &[u8]) -> Result<()>;
    
    /// Receive a single byte, waiting as long as it takes
    fn read_byte(&mut self) -> Result<u8>;
    
    /// Receive exactly `len` bytes
    fn read(&mut self, len: usize) -> Result<BytesMut> {
        let mut buf = BytesMut::with_capacity(len);
        for _ in 0..len {
            buf.put_u8(self.read_byte()?);
        }
        Ok(buf)
    }
    
    /// Wait until written bytes have been transmitted
    fn flush(&mut self) -> Result<()>;
    
    /// Discard bytes received but not yet read
    fn flush_input(&mut self) -> Result<()>;
    
    /// Discard bytes written but not yet transmitted
    fn flush_output(&mut self) -> Result<()>;
    
    /// Check if the channel is open
    fn is_open(&self) -> bool;
    
    /// Close the channel, releasing the port
    fn close(&mut self) -> Result<()>;
    
    /// Port name for diagnostics
    fn name(&self) -> String;
}

impl<C: Channel + ?Sized> Channel for Box<C> {
    fn write(&mut self, data: &[u8]) -> Result<()> {
        (**self).write(data)
    }
    
    fn read_byte(&mut self) -> Result<u8> {
        (**self).read_byte()
    }
    
    fn read(&mut self, len: usize) -> Result<BytesMut> {
        (**self).read(len)
    }
    
    fn flush(&mut self) -> Result<()> {
        (**self).flush()
    }
    
    fn flush_input(&mut self) -> Result<()> {
        (**self).flush_input()
    }
    
    fn flush_output(&mut self) -> Result<()> {
        (**self).flush_output()
    }
    
    fn is_open(&self) -> bool {
        (**self).is_open()
    }
    
    fn close(&mut self) -> Result<()> {
        (**self).close()
    }
    
    fn name(&self) -> String {
        (**self).name()
    }
}
