//! Write/read cycles against a simulated reader

use std::collections::VecDeque;

use msr605::{
    Channel, Coercivity, Command, Frame, Msr605, Track, TrackRecord, TrackSelect, Validation,
};
use msr605_core::constants::{ESC, ETX, FS, SOH, STX};
use pretty_assertions::assert_eq;
use proptest::prelude::*;

/// Answers frames the way the hardware does, with a card always present
struct SimulatedReader {
    card: TrackRecord,
    coercivity: Coercivity,
    outgoing: VecDeque<u8>,
    open: bool,
}

impl SimulatedReader {
    fn new() -> Self {
        Self {
            card: TrackRecord::default(),
            coercivity: Coercivity::High,
            outgoing: VecDeque::new(),
            open: true,
        }
    }

    fn reply(&mut self, bytes: &[u8]) {
        self.outgoing.extend(bytes.iter().copied());
    }

    fn handle(&mut self, frame: Frame) {
        match frame.command {
            Command::CommunicationTest => self.reply(&[ESC, b'y']),
            Command::SensorTest | Command::RamTest => self.reply(&[ESC, b'0']),
            Command::Read => {
                let data = self.swipe();
                self.reply(&data);
            }
            Command::Write => {
                self.card = parse_data_block(&frame.payload);
                self.reply(&[ESC, b'0']);
            }
            Command::Erase => {
                let select = TrackSelect::try_from(frame.payload[0] - b'0').unwrap();
                for track in Track::ALL {
                    if select.includes(track) {
                        self.card.set(track, "");
                    }
                }
                self.reply(&[ESC, b'0']);
            }
            Command::SetHiCo => {
                self.coercivity = Coercivity::High;
                self.reply(&[ESC, b'0']);
            }
            Command::SetLowCo => {
                self.coercivity = Coercivity::Low;
                self.reply(&[ESC, b'0']);
            }
            Command::GetCoercivity => match self.coercivity {
                Coercivity::High => self.reply(&[ESC, b'h']),
                Coercivity::Low => self.reply(&[ESC, b'l']),
            },
            Command::DeviceModel => self.reply(&[ESC, b'3', b'S']),
            Command::Firmware => self.reply(&[ESC, b'R']),
            _ => {}
        }
    }

    /// Raw reply to a read, sentinels included
    fn swipe(&self) -> Vec<u8> {
        let mut data = vec![ESC, b's', ESC, SOH];
        data.extend(format!("%{}?", self.card.track1).bytes());
        data.extend([ESC, STX]);
        data.extend(format!(";{}?", self.card.track2).bytes());
        data.extend([ESC, ETX]);
        if !self.card.is_blank(Track::Three) {
            data.extend(format!(";{}", self.card.track3).bytes());
        }
        data.extend([FS, ESC, b'0']);
        data
    }
}

fn parse_data_block(payload: &[u8]) -> TrackRecord {
    let body = payload.strip_prefix(&[ESC, b's', ESC, SOH]).unwrap();
    let body = body.strip_suffix(&[FS]).unwrap();
    let fields: Vec<&[u8]> = body.split(|b| *b == ESC).collect();

    let text = |bytes: &[u8]| String::from_utf8(bytes.to_vec()).unwrap();
    TrackRecord::new(text(fields[0]), text(&fields[1][1..]), text(&fields[2][1..]))
}

impl Channel for SimulatedReader {
    fn write(&mut self, data: &[u8]) -> msr605_transport::Result<()> {
        if !self.open {
            return Err(msr605_transport::Error::NotConnected);
        }
        self.handle(Frame::decode(data).unwrap());
        Ok(())
    }

    fn read_byte(&mut self) -> msr605_transport::Result<u8> {
        self.outgoing
            .pop_front()
            .ok_or(msr605_transport::Error::ConnectionClosed)
    }

    fn flush(&mut self) -> msr605_transport::Result<()> {
        Ok(())
    }

    fn flush_input(&mut self) -> msr605_transport::Result<()> {
        self.outgoing.clear();
        Ok(())
    }

    fn flush_output(&mut self) -> msr605_transport::Result<()> {
        Ok(())
    }

    fn is_open(&self) -> bool {
        self.open
    }

    fn close(&mut self) -> msr605_transport::Result<()> {
        self.open = false;
        Ok(())
    }

    fn name(&self) -> String {
        "simulated".to_string()
    }
}

fn connect() -> Msr605<SimulatedReader> {
    Msr605::connect(SimulatedReader::new()).unwrap()
}

#[test]
fn test_write_then_read() {
    let mut device = connect();
    let card = TrackRecord::new("B4111111111111111^DOE/JOHN^2512", "4111111111111111=2512", "");

    device.write_card(&card, true).unwrap();
    let tracks = device.read_card().unwrap();

    assert_eq!(tracks, card);
    assert_eq!(tracks.track3, "?");
}

#[test]
fn test_write_then_read_track3() {
    let mut device = connect();
    let card = TrackRecord::new("", "", "0123456789=");

    device.write_card(&card, true).unwrap();

    assert_eq!(device.channel().card.track3, "0123456789=?");
    assert_eq!(device.read_card().unwrap(), card);
}

#[test]
fn test_erase_then_read() {
    let mut device = connect().with_validation(Validation::Strict);
    device
        .write_card(&TrackRecord::new("ABC", "123", "456"), true)
        .unwrap();

    device.erase(TrackSelect::Tracks13).unwrap();
    let tracks = device.read_card().unwrap();

    assert_eq!(tracks, TrackRecord::new("", "123", ""));
}

#[test]
fn test_coercivity_and_identity() {
    let mut device = connect();

    device.set_low_co().unwrap();
    assert_eq!(device.get_coercivity().unwrap(), Coercivity::Low);
    device.set_hi_co().unwrap();
    assert_eq!(device.get_coercivity().unwrap(), Coercivity::High);

    let info = device.device_info().unwrap();
    assert_eq!(info.to_string(), "Device[Model: 3, FW: R]");
}

#[test]
fn test_reset_discards_stale_reply() {
    let mut device = connect();
    device.channel_mut().reply(b"stale");

    device.reset().unwrap();
    device.communication_test().unwrap();
}

#[test]
fn test_close_releases_channel() {
    let mut device = connect();
    device.close().unwrap();

    let channel = device.into_inner();
    assert!(!channel.is_open());
}

proptest! {
    #[test]
    fn prop_write_read_round_trip(
        track1 in "[A-Z0-9 /^]{0,60}",
        track2 in "[0-9=]{0,30}",
        track3 in "[0-9=]{0,80}",
    ) {
        let mut device = connect();
        let card = TrackRecord::new(track1, track2, track3);

        device.write_card(&card, true).unwrap();
        let tracks = device.read_card().unwrap();

        prop_assert_eq!(tracks, card);
    }
}
