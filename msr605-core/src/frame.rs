//! MSR605 command frames and response byte checks

use bytes::{BufMut, Bytes, BytesMut};
use std::fmt;

use msr605_types::TrackRecord;

use crate::{
    command::Command,
    constants::{ESC, ETX, FS, SOH, STX, replies},
    error::{Error, Result},
};

/// Outgoing command frame
///
/// # Frame Structure
///
/// ```text
/// ┌─────────────┬─────────────┬─────────────┐
/// │     ESC     │   Command   │   Payload   │
/// │   1 byte    │   1 byte    │   N bytes   │
/// │   (0x1B)    │             │  (verbatim) │
/// └─────────────┴─────────────┴─────────────┘
/// ```
///
/// The payload is caller-prepared (a data block for writes, a select digit
/// for erase) and is appended without escaping.
///
/// # Examples
///
/// ```
/// use msr605_core::{Command, Frame};
///
/// let frame = Frame::new(Command::Read);
/// assert_eq!(frame.encode().as_ref(), &[0x1B, 0x72]);
/// ```
#[derive(Clone, PartialEq, Eq)]
pub struct Frame {
    /// Command code
    pub command: Command,

    /// Bytes sent after the command code
    pub payload: Bytes,
}

impl Frame {
    /// Size of the `ESC` + command prefix
    pub const HEADER_SIZE: usize = 2;

    /// Create a frame with empty payload
    pub fn new(command: Command) -> Self {
        Self {
            command,
            payload: Bytes::new(),
        }
    }

    /// Create a frame with payload
    ///
    /// # Examples
    ///
    /// ```
    /// use msr605_core::{Command, Frame};
    ///
    /// let frame = Frame::with_payload(Command::Erase, vec![b'7']);
    /// assert_eq!(frame.encode().as_ref(), &[0x1B, 0x63, b'7']);
    /// ```
    pub fn with_payload(command: Command, payload: impl Into<Bytes>) -> Self {
        Self {
            command,
            payload: payload.into(),
        }
    }

    /// Encode frame to bytes
    pub fn encode(&self) -> BytesMut {
        let mut buf = BytesMut::with_capacity(self.size());

        buf.put_u8(ESC);
        buf.put_u8(self.command.into());
        buf.put_slice(&self.payload);

        buf
    }

    /// Decode a frame as the device sees it
    ///
    /// # Errors
    ///
    /// Returns an error if the first byte is not `ESC` or the command code is
    /// unknown. A buffer shorter than the header is reported as a framing
    /// error against the missing byte (`0x00`).
    pub fn decode(buf: &[u8]) -> Result<Self> {
        let escape = buf.first().copied().unwrap_or(0);
        expect(escape, ESC)?;

        let code = buf.get(1).copied().ok_or(Error::UnknownCommand(0))?;
        let command = Command::try_from(code)?;

        Ok(Self::with_payload(
            command,
            Bytes::copy_from_slice(&buf[Self::HEADER_SIZE..]),
        ))
    }

    /// Get total frame size
    pub fn size(&self) -> usize {
        Self::HEADER_SIZE + self.payload.len()
    }
}

impl fmt::Debug for Frame {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Frame")
            .field("command", &self.command)
            .field("payload", &hex::encode_upper(&self.payload))
            .finish()
    }
}

impl fmt::Display for Frame {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Frame[{}](len={})", self.command, self.payload.len())
    }
}

/// Assert that a received byte is the expected control byte
///
/// A mismatch is a framing error, never a status error.
pub fn expect(actual: u8, expected: u8) -> Result<()> {
    if actual == expected {
        Ok(())
    } else {
        Err(Error::UnexpectedByte { expected, actual })
    }
}

/// Build the data block written after the write command
///
/// ```text
/// ESC 's' ESC SOH track1 ESC STX track2 ESC ETX track3 FS
/// ```
///
/// Track 3 always goes out with a trailing `?`, even when the record's field
/// was assigned directly.
pub fn data_block(record: &TrackRecord) -> Bytes {
    let mut buf = BytesMut::with_capacity(
        10 + record.track1.len() + record.track2.len() + record.track3.len(),
    );

    buf.put_slice(&[ESC, replies::DATA_BLOCK, ESC, SOH]);
    buf.put_slice(record.track1.as_bytes());
    buf.put_slice(&[ESC, STX]);
    buf.put_slice(record.track2.as_bytes());
    buf.put_slice(&[ESC, ETX]);
    buf.put_slice(record.track3.as_bytes());
    if !record.track3.ends_with('?') {
        buf.put_u8(b'?');
    }
    buf.put_u8(FS);

    buf.freeze()
}
