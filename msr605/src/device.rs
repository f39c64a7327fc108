//! High-level device interface

use tracing::{debug, info, trace, warn};

use msr605_core::{
    Command, Error as ProtocolError, Frame, Status,
    constants::{ESC, FS, replies, track_marker},
    frame, iso,
};
use msr605_transport::Channel;
use msr605_types::{Coercivity, DeviceInfo, Track, TrackRecord, TrackSelect};

use crate::error::{Error, Result};
use crate::field::{self, Validation};

/// MSR605 magnetic stripe reader/writer
///
/// Drives the device over an already-open [`Channel`]. Every operation is a
/// single blocking request/response exchange; operations that need a card
/// swipe block until one happens.
///
/// # Examples
///
/// ```no_run
/// use msr605::{Msr605, SerialChannel, SerialConfig};
///
/// fn main() -> msr605::Result<()> {
///     let channel = SerialChannel::open(&SerialConfig::new("/dev/ttyUSB0"))?;
///     let mut device = Msr605::connect(channel)?;
///
///     let tracks = device.read_card()?;
///     println!("{}", tracks);
///
///     device.close()?;
///     Ok(())
/// }
/// ```
pub struct Msr605<C: Channel> {
    channel: C,
    validation: Validation,
}

impl<C: Channel> Msr605<C> {
    /// Wrap an open channel without touching the device
    pub fn new(channel: C) -> Self {
        Self {
            channel,
            validation: Validation::default(),
        }
    }

    /// Wrap an open channel and run the start-up handshake
    ///
    /// Resets the device, checks the link with a communication test and
    /// resets again.
    pub fn connect(channel: C) -> Result<Self> {
        let mut device = Self::new(channel);
        device.initialize()?;
        Ok(device)
    }

    /// Set how track bytes are checked against the ISO character sets
    ///
    /// Applies to reads, and with [`Validation::Strict`] also to the tracks
    /// passed to [`Msr605::write_card`].
    pub fn with_validation(mut self, validation: Validation) -> Self {
        self.validation = validation;
        self
    }

    pub fn validation(&self) -> Validation {
        self.validation
    }

    /// Check if the channel is open
    pub fn is_open(&self) -> bool {
        self.channel.is_open()
    }

    pub fn channel(&self) -> &C {
        &self.channel
    }

    pub fn channel_mut(&mut self) -> &mut C {
        &mut self.channel
    }

    /// Give the channel back to the caller
    pub fn into_inner(self) -> C {
        self.channel
    }

    /// Close the channel so other applications can use the device
    pub fn close(&mut self) -> Result<()> {
        info!("Closing {}", self.channel.name());
        self.channel.close()?;
        Ok(())
    }

    /// Reset, communication test, reset
    pub fn initialize(&mut self) -> Result<()> {
        info!("Initializing device on {}...", self.channel.name());

        self.reset()?;
        self.communication_test()?;
        self.reset()?;

        info!("Device ready");
        Ok(())
    }

    /// Return the device to its initial state
    ///
    /// Discards pending channel buffers first. The device does not answer.
    pub fn reset(&mut self) -> Result<()> {
        self.ensure_open()?;

        debug!("Resetting device...");

        self.channel.flush_input()?;
        self.channel.flush_output()?;
        self.send(&Frame::new(Command::Reset))
    }

    /// Read the three ISO tracks of a swiped card
    ///
    /// A missing track marker means the card has no data on that track.
    /// On failure, [`Error::Read`] (or [`Error::ReadInterrupted`] when the
    /// channel fails) carries the tracks decoded so far.
    pub fn read_card(&mut self) -> Result<TrackRecord> {
        debug!("Reading card...");

        let validation = self.validation;
        let mut tracks = TrackRecord::default();

        let result = self.exchange(Frame::new(Command::Read), |device| {
            device.expect(ESC)?;
            device.expect(replies::DATA_BLOCK)?;
            device.expect(ESC)?;

            for track in Track::ALL {
                let marker = device.channel.read_byte()?;
                if marker != track_marker(track) {
                    debug!(%track, marker = %format!("0x{:02X}", marker), "No data on track");
                    continue;
                }

                let terminator = if track == Track::Three { FS } else { ESC };
                let raw = field::read_until(&mut device.channel, terminator, track, validation)?;
                trace!(%track, raw = %raw, "Read track field");

                tracks.set(track, field::strip_sentinels(track, &raw));
            }

            device.expect(ESC)?;
            device.check_status()
        });

        match result {
            Ok(status) => {
                debug!(%status, "Card read: {}", tracks);
                Ok(tracks)
            }
            Err(Error::Transport(source)) => Err(Error::ReadInterrupted { tracks, source }),
            Err(e) => Err(e.context(|source| Error::Read { tracks, source })),
        }
    }

    /// Write tracks to a swiped card
    ///
    /// With `check_status` off, the trailing status byte is read but not
    /// interpreted.
    pub fn write_card(&mut self, tracks: &TrackRecord, check_status: bool) -> Result<()> {
        if self.validation == Validation::Strict {
            iso::check_record(tracks).map_err(Error::Write)?;
        }

        debug!("Writing card: {}", tracks);

        let frame = Frame::with_payload(Command::Write, frame::data_block(tracks));

        self.exchange(frame, |device| {
            device.expect(ESC)?;

            if check_status {
                device.check_status()?;
            } else {
                let byte = device.channel.read_byte()?;
                debug!(status = %format!("0x{:02X}", byte), "Status not checked");
            }

            Ok(())
        })
        .map_err(|e| e.context(Error::Write))?;

        debug!("Card written");
        Ok(())
    }

    /// Erase tracks of a swiped card, by raw select value (0, 2-7)
    ///
    /// The select value is checked before anything is sent.
    pub fn erase_card(&mut self, select: u8) -> Result<()> {
        let select = TrackSelect::try_from(select)?;
        self.erase(select)
    }

    /// Erase tracks of a swiped card
    pub fn erase(&mut self, select: TrackSelect) -> Result<()> {
        debug!(?select, "Erasing card...");

        let frame = Frame::with_payload(Command::Erase, vec![select.as_ascii()]);

        self.exchange(frame, |device| {
            device.expect(ESC)?;
            device.confirmation()
        })
        .map_err(|e| e.context(Error::Erase))?;

        debug!("Card erased");
        Ok(())
    }

    /// Turn off all LEDs
    pub fn all_leds_off(&mut self) -> Result<()> {
        self.command(Command::AllLedOff)
    }

    /// Turn on all LEDs
    pub fn all_leds_on(&mut self) -> Result<()> {
        self.command(Command::AllLedOn)
    }

    pub fn green_led_on(&mut self) -> Result<()> {
        self.command(Command::GreenLedOn)
    }

    pub fn yellow_led_on(&mut self) -> Result<()> {
        self.command(Command::YellowLedOn)
    }

    pub fn red_led_on(&mut self) -> Result<()> {
        self.command(Command::RedLedOn)
    }

    /// Check the link between host and device
    pub fn communication_test(&mut self) -> Result<()> {
        self.exchange(Frame::new(Command::CommunicationTest), |device| {
            device.expect(ESC)?;
            device.expect(replies::LINK_OK)
        })
        .map_err(|e| e.context(Error::CommunicationTest))?;

        debug!("Communication link OK");
        Ok(())
    }

    /// Check the card sensing circuit
    ///
    /// The device answers only once a card is sensed (or after a reset from
    /// another handle on the port).
    pub fn sensor_test(&mut self) -> Result<()> {
        self.exchange(Frame::new(Command::SensorTest), |device| {
            device.expect(ESC)?;
            device.expect(replies::OK)
        })
        .map_err(|e| e.context(Error::SensorTest))?;

        debug!("Sensor test OK");
        Ok(())
    }

    /// Run the on-board RAM test
    pub fn ram_test(&mut self) -> Result<()> {
        self.exchange(Frame::new(Command::RamTest), |device| {
            device.expect(ESC)?;
            device.confirmation()
        })
        .map_err(|e| e.context(Error::RamTest))?;

        debug!("RAM test OK");
        Ok(())
    }

    /// Select the write coercivity
    pub fn set_coercivity(&mut self, mode: Coercivity) -> Result<()> {
        let command = match mode {
            Coercivity::High => Command::SetHiCo,
            Coercivity::Low => Command::SetLowCo,
        };

        self.exchange(Frame::new(command), |device| {
            device.expect_escape_after_banner()?;
            device.expect(replies::OK)
        })
        .map_err(|e| e.context(|source| Error::SetCoercivity { mode, source }))?;

        debug!(%mode, "Coercivity set");
        Ok(())
    }

    pub fn set_hi_co(&mut self) -> Result<()> {
        self.set_coercivity(Coercivity::High)
    }

    pub fn set_low_co(&mut self) -> Result<()> {
        self.set_coercivity(Coercivity::Low)
    }

    /// Get the current write coercivity
    pub fn get_coercivity(&mut self) -> Result<Coercivity> {
        let mode = self
            .exchange(Frame::new(Command::GetCoercivity), |device| {
                device.expect_escape_after_banner()?;
                let reply = device.channel.read_byte()?;
                Coercivity::from_reply(reply)
                    .ok_or_else(|| ProtocolError::UnexpectedReply(reply).into())
            })
            .map_err(|e| e.context(Error::GetCoercivity))?;

        debug!(%mode, "Coercivity");
        Ok(mode)
    }

    /// Get the device model identifier
    pub fn device_model(&mut self) -> Result<String> {
        let model = self
            .exchange(Frame::new(Command::DeviceModel), |device| {
                device.expect(ESC)?;
                let model = char::from(device.channel.read_byte()?).to_string();
                device.expect(replies::MODEL_TRAILER)?;
                Ok(model)
            })
            .map_err(|e| e.context(Error::DeviceModel))?;

        debug!(%model, "Device model");
        Ok(model)
    }

    /// Get the firmware version
    pub fn firmware_version(&mut self) -> Result<String> {
        let firmware = self
            .exchange(Frame::new(Command::Firmware), |device| {
                device.expect(ESC)?;
                Ok(char::from(device.channel.read_byte()?).to_string())
            })
            .map_err(|e| e.context(Error::Firmware))?;

        debug!(%firmware, "Firmware version");
        Ok(firmware)
    }

    /// Get model and firmware version
    pub fn device_info(&mut self) -> Result<DeviceInfo> {
        let model = self.device_model()?;
        let firmware = self.firmware_version()?;
        Ok(DeviceInfo::new(model, firmware))
    }

    // Helper methods

    fn ensure_open(&self) -> Result<()> {
        if !self.channel.is_open() {
            return Err(Error::NotConnected);
        }
        Ok(())
    }

    fn send(&mut self, frame: &Frame) -> Result<()> {
        trace!("Sending: {:?}", frame);

        self.channel.write(&frame.encode())?;
        self.channel.flush()?;

        Ok(())
    }

    /// Fire-and-forget command
    fn command(&mut self, command: Command) -> Result<()> {
        debug_assert!(!command.expects_response(), "{} has a reply", command);

        self.ensure_open()?;
        debug!(%command, "Sending command");
        self.send(&Frame::new(command))
    }

    /// Send a frame, then interpret the response
    fn exchange<T>(
        &mut self,
        frame: Frame,
        respond: impl FnOnce(&mut Self) -> Result<T>,
    ) -> Result<T> {
        debug_assert!(frame.command.expects_response(), "{} has no reply", frame.command);

        self.ensure_open()?;
        self.send(&frame)?;

        if frame.command.needs_swipe() {
            info!(command = %frame.command, "Waiting for card swipe");
        }
        respond(self)
    }

    fn expect(&mut self, expected: u8) -> Result<()> {
        let actual = self.channel.read_byte()?;
        frame::expect(actual, expected)?;
        Ok(())
    }

    /// Read and decode the trailing status byte
    fn check_status(&mut self) -> Result<Status> {
        let status = Status::decode(self.channel.read_byte()?);
        trace!(%status, "Status byte");
        status.check()?;
        Ok(status)
    }

    /// `'0'` means done, `'A'` means not done, anything else is unexpected
    fn confirmation(&mut self) -> Result<()> {
        match self.channel.read_byte()? {
            replies::OK => Ok(()),
            replies::NOT_OK => Err(ProtocolError::Rejected.into()),
            other => Err(ProtocolError::UnexpectedReply(other).into()),
        }
    }

    /// Some firmware revisions send a banner before answering coercivity
    /// commands. Anything up to the next `'0'` is discarded before looking
    /// for the escape again.
    fn expect_escape_after_banner(&mut self) -> Result<()> {
        let first = self.channel.read_byte()?;
        if first == ESC {
            return Ok(());
        }

        let banner =
            field::read_until(&mut self.channel, replies::OK, Track::Three, Validation::Off)?;
        warn!(
            banner = %format!("{}{}", char::from(first), banner),
            "Discarded banner before reply"
        );

        self.expect(ESC)
    }
}
