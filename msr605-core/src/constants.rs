//! Protocol constants

use msr605_types::Track;

/// Escape, prefixes every command and most response fields
pub const ESC: u8 = 0x1B;

/// File separator, terminates track 3 in a data block
pub const FS: u8 = 0x1C;

/// Acknowledge
pub const ACK: u8 = 0x79;

/// Start of heading, marks track 1 in a data block
pub const SOH: u8 = 0x01;

/// Start of text, marks track 2 in a data block
pub const STX: u8 = 0x02;

/// End of text, marks track 3 in a data block
pub const ETX: u8 = 0x03;

/// Every byte with a framing role in the protocol
pub const CONTROL_BYTES: [u8; 6] = [ESC, FS, ACK, SOH, STX, ETX];

/// Check whether a byte is one of the protocol control bytes
pub fn is_control(byte: u8) -> bool {
    CONTROL_BYTES.contains(&byte)
}

/// Marker that precedes each track's field in a data block
pub fn track_marker(track: Track) -> u8 {
    match track {
        Track::One => SOH,
        Track::Two => STX,
        Track::Three => ETX,
    }
}

/// Fixed reply bytes
pub mod replies {
    /// Data block opener (`ESC s`)
    pub const DATA_BLOCK: u8 = b's';

    /// Generic success reply
    pub const OK: u8 = b'0';

    /// Generic "not done" reply (erase, RAM test)
    pub const NOT_OK: u8 = b'A';

    /// Communication test reply
    pub const LINK_OK: u8 = b'y';

    /// Trailer after the model byte
    pub const MODEL_TRAILER: u8 = b'S';
}

/// Upper bounds on field reads
pub mod limits {
    use msr605_types::Track;

    /// Maximum bytes accepted for track 1
    pub const TRACK1_MAX_LEN: usize = 79;

    /// Maximum bytes accepted for track 2
    pub const TRACK2_MAX_LEN: usize = 40;

    /// Maximum bytes accepted for track 3
    pub const TRACK3_MAX_LEN: usize = 107;

    /// Field read bound for a track
    pub fn max_field_len(track: Track) -> usize {
        match track {
            Track::One => TRACK1_MAX_LEN,
            Track::Two => TRACK2_MAX_LEN,
            Track::Three => TRACK3_MAX_LEN,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_is_control() {
        for byte in CONTROL_BYTES {
            assert!(is_control(byte));
        }
        assert!(!is_control(b'0'));
        assert!(!is_control(b'Y'));
        assert!(is_control(b'y'));
    }

    #[test]
    fn test_track_markers() {
        assert_eq!(track_marker(Track::One), 0x01);
        assert_eq!(track_marker(Track::Two), 0x02);
        assert_eq!(track_marker(Track::Three), 0x03);
    }

    #[test]
    fn test_limits() {
        assert_eq!(limits::max_field_len(Track::One), 79);
        assert_eq!(limits::max_field_len(Track::Two), 40);
        assert_eq!(limits::max_field_len(Track::Three), 107);
    }
}
