//! In-memory scripted channel
//!
//! Replays a scripted byte stream as device output and records everything
//! written to it. Clones share state, so a test can keep a handle while the
//! channel itself is owned by a device.

use std::collections::VecDeque;
use std::sync::Arc;

use bytes::{Bytes, BytesMut};
use parking_lot::Mutex;
use tracing::trace;

use crate::{Channel, error::*};

/// Scripted channel
///
/// Scripted bytes stand for replies that arrive after the next command, so
/// [`Channel::flush_input`] counts the flush without discarding them. Reading
/// past the end of the script reports [`Error::ConnectionClosed`].
///
/// # Examples
///
/// ```
/// use msr605_transport::{Channel, MockChannel};
///
/// let probe = MockChannel::with_response(&[0x1B, b'y']);
/// let mut channel = probe.clone();
///
/// channel.write(&[0x1B, 0x65]).unwrap();
/// assert_eq!(channel.read_byte().unwrap(), 0x1B);
/// assert_eq!(probe.written().as_ref(), &[0x1B, 0x65]);
/// ```
#[derive(Debug, Clone, Default)]
pub struct MockChannel {
    inner: Arc<Mutex<MockInner>>,
}

#[derive(Debug, Default)]
struct MockInner {
    /// Bytes the device will "send"
    incoming: VecDeque<u8>,

    /// Everything written so far
    written: BytesMut,

    flushes: usize,
    input_flushes: usize,
    output_flushes: usize,
    closed: bool,
}

impl MockChannel {
    /// Create an open channel with nothing scripted
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an open channel with a scripted reply
    pub fn with_response(bytes: &[u8]) -> Self {
        let channel = Self::new();
        channel.push_response(bytes);
        channel
    }

    /// Append bytes to the scripted reply stream
    pub fn push_response(&self, bytes: &[u8]) {
        self.inner.lock().incoming.extend(bytes.iter().copied());
    }

    /// All bytes written so far
    pub fn written(&self) -> Bytes {
        Bytes::copy_from_slice(&self.inner.lock().written)
    }

    /// Forget recorded writes
    pub fn clear_written(&self) {
        self.inner.lock().written.clear();
    }

    /// Number of scripted bytes not read yet
    pub fn pending(&self) -> usize {
        self.inner.lock().incoming.len()
    }

    pub fn flushes(&self) -> usize {
        self.inner.lock().flushes
    }

    pub fn input_flushes(&self) -> usize {
        self.inner.lock().input_flushes
    }

    pub fn output_flushes(&self) -> usize {
        self.inner.lock().output_flushes
    }

    fn ensure_open(inner: &MockInner) -> Result<()> {
        if inner.closed {
            return Err(Error::NotConnected);
        }
        Ok(())
    }
}

impl Channel for MockChannel {
    fn write(&mut self, data: &[u8]) -> Result<()> {
        let mut inner = self.inner.lock();
        Self::ensure_open(&inner)?;

        trace!("Mock write {} bytes: {}", data.len(), hex::encode_upper(data));

        inner.written.extend_from_slice(data);
        Ok(())
    }

    fn read_byte(&mut self) -> Result<u8> {
        let mut inner = self.inner.lock();
        Self::ensure_open(&inner)?;

        inner.incoming.pop_front().ok_or(Error::ConnectionClosed)
    }

    fn flush(&mut self) -> Result<()> {
        let mut inner = self.inner.lock();
        Self::ensure_open(&inner)?;
        inner.flushes += 1;
        Ok(())
    }

    fn flush_input(&mut self) -> Result<()> {
        let mut inner = self.inner.lock();
        Self::ensure_open(&inner)?;
        inner.input_flushes += 1;
        Ok(())
    }

    fn flush_output(&mut self) -> Result<()> {
        let mut inner = self.inner.lock();
        Self::ensure_open(&inner)?;
        inner.output_flushes += 1;
        Ok(())
    }

    fn is_open(&self) -> bool {
        !self.inner.lock().closed
    }

    fn close(&mut self) -> Result<()> {
        self.inner.lock().closed = true;
        Ok(())
    }

    fn name(&self) -> String {
        "mock".to_string()
    }
}
