//! ISO 7811 track character sets
//!
//! Track 1 uses the 6-bit alphanumeric alphabet (`0x20`-`0x5F`: space,
//! punctuation, digits and upper-case letters). Tracks 2 and 3 use the 4-bit
//! numeric alphabet (`0x30`-`0x3F`: digits and `:;<=>?`).

use std::ops::RangeInclusive;

use msr605_types::{Track, TrackRecord};

use crate::error::{Error, Result};

/// Track 1 character set
pub const ALPHANUMERIC: RangeInclusive<u8> = 0x20..=0x5F;

/// Track 2 and 3 character set
pub const NUMERIC: RangeInclusive<u8> = 0x30..=0x3F;

/// Character set used by a track
pub fn charset(track: Track) -> RangeInclusive<u8> {
    match track {
        Track::One => ALPHANUMERIC,
        Track::Two | Track::Three => NUMERIC,
    }
}

/// Check whether a byte belongs to a track's character set
pub fn conforms(track: Track, byte: u8) -> bool {
    charset(track).contains(&byte)
}

/// Check a whole track's text, reporting the first offending byte
pub fn check(track: Track, data: &str) -> Result<()> {
    match data.bytes().find(|b| !conforms(track, *b)) {
        Some(byte) => Err(Error::NonConforming { track, byte }),
        None => Ok(()),
    }
}

/// Check every track of a record
pub fn check_record(record: &TrackRecord) -> Result<()> {
    Track::ALL
        .iter()
        .try_for_each(|track| check(*track, record.track(*track)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_track1_charset() {
        for byte in b" !\"#$%&'()*+,-./0123456789:;<=>?@ABCDEFGHIJKLMNOPQRSTUVWXYZ[\\]^_" {
            assert!(conforms(Track::One, *byte), "0x{:02X}", byte);
        }
        assert!(!conforms(Track::One, b'a'));
        assert!(!conforms(Track::One, b'`'));
        assert!(!conforms(Track::One, 0x1B));
    }

    #[test]
    fn test_numeric_charset() {
        for track in [Track::Two, Track::Three] {
            for byte in b"0123456789:;<=>?" {
                assert!(conforms(track, *byte));
            }
            assert!(!conforms(track, b'A'));
            assert!(!conforms(track, b' '));
            assert!(!conforms(track, b'/'));
        }
    }

    #[test]
    fn test_check_reports_first_offender() {
        assert!(check(Track::Two, "4111=2512").is_ok());
        assert_eq!(
            check(Track::Two, "41a1b"),
            Err(Error::NonConforming { track: Track::Two, byte: b'a' })
        );
    }

    #[test]
    fn test_check_record() {
        let record = TrackRecord::new("A1234^DOE/J", "01", "");
        assert!(check_record(&record).is_ok());

        let record = TrackRecord::new("lower", "01", "");
        assert!(matches!(
            check_record(&record),
            Err(Error::NonConforming { track: Track::One, byte: b'l' })
        ));
    }
}
