//! Track field reader
//!
//! Pulls one track's characters off the channel, one byte at a time, until a
//! terminator or the track's length bound.

use tracing::{debug, trace};

use msr605_core::{
    Error as ProtocolError,
    constants::{is_control, limits},
    iso,
};
use msr605_transport::Channel;
use msr605_types::Track;

use crate::error::Result;

/// How field bytes are checked against the ISO character sets
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Validation {
    /// Accept every byte
    Off,

    /// Drop non-conforming bytes and keep reading
    #[default]
    Lenient,

    /// Fail on the first non-conforming byte
    Strict,
}

impl Validation {
    pub fn is_enabled(self) -> bool {
        !matches!(self, Self::Off)
    }
}

/// Read a field up to `terminator`
///
/// The terminator is consumed but not returned. Control bytes are never
/// accumulated. At most [`limits::max_field_len`] bytes are taken for the
/// track; when the bound is hit the partial field is returned without error.
///
/// With [`Validation::Lenient`], bytes outside the track's character set are
/// discarded and do not count toward the bound. Control bytes always pass
/// validation.
pub fn read_until<C: Channel + ?Sized>(
    channel: &mut C,
    terminator: u8,
    track: Track,
    validation: Validation,
) -> Result<String> {
    let bound = limits::max_field_len(track);
    let mut field = String::with_capacity(bound);
    let mut taken = 0;

    while taken < bound {
        let byte = channel.read_byte()?;
        let control = is_control(byte);

        if validation.is_enabled() && !control && !iso::conforms(track, byte) {
            if validation == Validation::Strict {
                return Err(ProtocolError::NonConforming { track, byte }.into());
            }
            trace!(%track, byte = %format!("0x{:02X}", byte), "Dropped non-conforming byte");
            continue;
        }

        if byte == terminator {
            return Ok(field);
        }

        if !control {
            field.push(char::from(byte));
        }
        taken += 1;
    }

    debug!(%track, bound, "Field bound reached before terminator");
    Ok(field)
}

/// Remove start/end sentinels the device reports around track data
///
/// Tracks 1 and 2 lose a trailing `?` and their start sentinel (`%` or `;`).
/// Track 3 loses its `;` start sentinel and keeps (or gains) the trailing `?`.
pub fn strip_sentinels(track: Track, raw: &str) -> String {
    match track {
        Track::One => strip_pair(raw, '%'),
        Track::Two => strip_pair(raw, ';'),
        Track::Three => {
            let mut data = raw.strip_prefix(';').unwrap_or(raw).to_string();
            if !data.ends_with('?') {
                data.push('?');
            }
            data
        }
    }
}

fn strip_pair(raw: &str, start: char) -> String {
    let data = raw.strip_suffix('?').unwrap_or(raw);
    data.strip_prefix(start).unwrap_or(data).to_string()
}
