//! Magnetic stripe track data

use std::fmt;

use crate::error::{Error, Result};

/// One of the three parallel tracks on a magnetic stripe
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum Track {
    /// IATA track, alphanumeric
    One = 1,

    /// ABA track, numeric
    Two = 2,

    /// THRIFT track, numeric
    Three = 3,
}

impl Track {
    /// All tracks in the order the device reports them
    pub const ALL: [Track; 3] = [Track::One, Track::Two, Track::Three];

    /// Track number (1-3)
    pub fn number(self) -> u8 {
        self as u8
    }
}

impl TryFrom<u8> for Track {
    type Error = Error;

    fn try_from(value: u8) -> Result<Self> {
        match value {
            1 => Ok(Self::One),
            2 => Ok(Self::Two),
            3 => Ok(Self::Three),
            _ => Err(Error::InvalidTrack(value)),
        }
    }
}

impl fmt::Display for Track {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "track {}", self.number())
    }
}

/// Decoded contents of the three tracks of a card
///
/// Tracks 1 and 2 may be empty strings. Track 3 is never empty: a card without
/// track 3 data is represented by a lone `?`, which is also what the device
/// expects to be written for a blank track 3.
///
/// # Examples
///
/// ```
/// use msr605_types::{Track, TrackRecord};
///
/// let record = TrackRecord::new("B4111111111111111^DOE/JANE^2512", "4111111111111111=2512", "");
/// assert_eq!(record.track(Track::Three), "?");
/// assert!(record.is_blank(Track::Three));
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TrackRecord {
    /// Track 1 data, without the `%` start sentinel or `?` end sentinel
    pub track1: String,

    /// Track 2 data, without the `;` start sentinel or `?` end sentinel
    pub track2: String,

    /// Track 3 data, without the `;` start sentinel, always ending in `?`
    ///
    /// Assign through [`TrackRecord::set`] to keep the trailing `?`.
    pub track3: String,
}

impl TrackRecord {
    /// Marker used for a track 3 that carries no data
    pub const EMPTY_TRACK3: &'static str = "?";

    /// Create a record, normalizing track 3 so that it always ends with `?`
    pub fn new(
        track1: impl Into<String>,
        track2: impl Into<String>,
        track3: impl Into<String>,
    ) -> Self {
        let mut record = Self {
            track1: track1.into(),
            track2: track2.into(),
            track3: String::new(),
        };
        record.set(Track::Three, track3);
        record
    }

    /// Get the data for a track
    pub fn track(&self, track: Track) -> &str {
        match track {
            Track::One => &self.track1,
            Track::Two => &self.track2,
            Track::Three => &self.track3,
        }
    }

    /// Replace the data for a track
    pub fn set(&mut self, track: Track, data: impl Into<String>) {
        let data = data.into();
        match track {
            Track::One => self.track1 = data,
            Track::Two => self.track2 = data,
            Track::Three => {
                self.track3 = data;
                if !self.track3.ends_with('?') {
                    self.track3.push('?');
                }
            }
        }
    }

    /// Check whether a track carries no data
    pub fn is_blank(&self, track: Track) -> bool {
        match track {
            Track::Three => self.track3 == Self::EMPTY_TRACK3,
            other => self.track(other).is_empty(),
        }
    }
}

impl Default for TrackRecord {
    fn default() -> Self {
        Self {
            track1: String::new(),
            track2: String::new(),
            track3: Self::EMPTY_TRACK3.to_string(),
        }
    }
}

impl fmt::Display for TrackRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Tracks[1: {:?}, 2: {:?}, 3: {:?}]",
            self.track1, self.track2, self.track3
        )
    }
}

/// Track selection for the erase command
///
/// The select byte is sent as an ASCII digit. The device uses `0` for track 1
/// alone, so the value `1` has no meaning and is rejected.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum TrackSelect {
    Track1 = 0,
    Track2 = 2,
    Tracks12 = 3,
    Track3 = 4,
    Tracks13 = 5,
    Tracks23 = 6,
    All = 7,
}

impl TrackSelect {
    /// Numeric select value (0, 2-7)
    pub fn value(self) -> u8 {
        self as u8
    }

    /// ASCII digit sent on the wire
    pub fn as_ascii(self) -> u8 {
        b'0' + self.value()
    }

    /// Check whether a track is covered by this selection
    pub fn includes(self, track: Track) -> bool {
        match self {
            Self::Track1 => track == Track::One,
            Self::Track2 => track == Track::Two,
            Self::Track3 => track == Track::Three,
            Self::Tracks12 => track != Track::Three,
            Self::Tracks13 => track != Track::Two,
            Self::Tracks23 => track != Track::One,
            Self::All => true,
        }
    }
}

impl TryFrom<u8> for TrackSelect {
    type Error = Error;

    fn try_from(value: u8) -> Result<Self> {
        match value {
            0 => Ok(Self::Track1),
            2 => Ok(Self::Track2),
            3 => Ok(Self::Tracks12),
            4 => Ok(Self::Track3),
            5 => Ok(Self::Tracks13),
            6 => Ok(Self::Tracks23),
            7 => Ok(Self::All),
            _ => Err(Error::InvalidTrackSelect(value)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_track_conversion() {
        assert_eq!(Track::try_from(2).unwrap(), Track::Two);
        assert_eq!(Track::try_from(4), Err(Error::InvalidTrack(4)));
        assert_eq!(Track::Three.number(), 3);
    }

    #[test]
    fn test_record_default_track3_marker() {
        let record = TrackRecord::default();
        assert_eq!(record.track3, "?");
        assert!(Track::ALL.iter().all(|t| record.is_blank(*t)));
    }

    #[test]
    fn test_record_new_normalizes_track3() {
        let record = TrackRecord::new("A1234", "01", "987");
        assert_eq!(record.track(Track::Three), "987?");

        let record = TrackRecord::new("", "", "987?");
        assert_eq!(record.track3, "987?");
        assert!(record.is_blank(Track::One));
        assert!(!record.is_blank(Track::Three));
    }

    #[test]
    fn test_track_select_values() {
        assert_eq!(TrackSelect::try_from(0).unwrap(), TrackSelect::Track1);
        assert_eq!(TrackSelect::try_from(7).unwrap().as_ascii(), b'7');
        assert_eq!(TrackSelect::try_from(1), Err(Error::InvalidTrackSelect(1)));
        assert_eq!(TrackSelect::try_from(8), Err(Error::InvalidTrackSelect(8)));
    }

    #[test]
    fn test_track_select_includes() {
        assert!(TrackSelect::Tracks13.includes(Track::One));
        assert!(!TrackSelect::Tracks13.includes(Track::Two));
        assert!(TrackSelect::All.includes(Track::Two));
        assert!(!TrackSelect::Track1.includes(Track::Three));
    }
}
