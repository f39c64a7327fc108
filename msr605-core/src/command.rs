//! MSR605 command definitions

use std::fmt;

use crate::error::{Error, Result};

/// Protocol command codes
///
/// Each code is sent after an `ESC` byte. Only the commands needed for
/// ISO track read/write, erase, LEDs, self tests and coercivity are covered.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum Command {
    // Device control
    Reset = 0x61,

    // Card data
    Read = 0x72,
    Write = 0x77,
    Erase = 0x63,

    // LEDs
    AllLedOff = 0x81,
    AllLedOn = 0x82,
    GreenLedOn = 0x83,
    YellowLedOn = 0x84,
    RedLedOn = 0x85,

    // Self tests
    CommunicationTest = 0x65,
    SensorTest = 0x86,
    RamTest = 0x87,

    // Coercivity
    SetHiCo = 0x78,
    SetLowCo = 0x79,
    GetCoercivity = 0x64,

    // Device information
    DeviceModel = 0x74,
    Firmware = 0x76,
}

impl Command {
    /// Check if the device answers this command
    pub fn expects_response(self) -> bool {
        !matches!(
            self,
            Self::Reset
                | Self::AllLedOff
                | Self::AllLedOn
                | Self::GreenLedOn
                | Self::YellowLedOn
                | Self::RedLedOn
        )
    }

    /// Check if the command waits for a card swipe before answering
    pub fn needs_swipe(self) -> bool {
        matches!(self, Self::Read | Self::Write | Self::Erase | Self::SensorTest)
    }

    /// Get command name
    pub fn name(self) -> &'static str {
        match self {
            Self::Reset => "RESET",
            Self::Read => "READ",
            Self::Write => "WRITE",
            Self::Erase => "ERASE",
            Self::AllLedOff => "ALL_LED_OFF",
            Self::AllLedOn => "ALL_LED_ON",
            Self::GreenLedOn => "GREEN_LED_ON",
            Self::YellowLedOn => "YELLOW_LED_ON",
            Self::RedLedOn => "RED_LED_ON",
            Self::CommunicationTest => "COMM_TEST",
            Self::SensorTest => "SENSOR_TEST",
            Self::RamTest => "RAM_TEST",
            Self::SetHiCo => "SET_HI_CO",
            Self::SetLowCo => "SET_LOW_CO",
            Self::GetCoercivity => "GET_HI_LOW_CO",
            Self::DeviceModel => "DEVICE_MODEL",
            Self::Firmware => "FIRMWARE",
        }
    }
}

impl From<Command> for u8 {
    fn from(cmd: Command) -> u8 {
        cmd as u8
    }
}

impl TryFrom<u8> for Command {
    type Error = Error;

    fn try_from(value: u8) -> Result<Self> {
        match value {
            0x61 => Ok(Self::Reset),
            0x72 => Ok(Self::Read),
            0x77 => Ok(Self::Write),
            0x63 => Ok(Self::Erase),
            0x81 => Ok(Self::AllLedOff),
            0x82 => Ok(Self::AllLedOn),
            0x83 => Ok(Self::GreenLedOn),
            0x84 => Ok(Self::YellowLedOn),
            0x85 => Ok(Self::RedLedOn),
            0x65 => Ok(Self::CommunicationTest),
            0x86 => Ok(Self::SensorTest),
            0x87 => Ok(Self::RamTest),
            0x78 => Ok(Self::SetHiCo),
            0x79 => Ok(Self::SetLowCo),
            0x64 => Ok(Self::GetCoercivity),
            0x74 => Ok(Self::DeviceModel),
            0x76 => Ok(Self::Firmware),
            _ => Err(Error::UnknownCommand(value)),
        }
    }
}

impl fmt::Display for Command {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}(0x{:02X})", self.name(), *self as u8)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_command_conversion() {
        assert_eq!(u8::from(Command::Read), 0x72);
        assert_eq!(Command::try_from(0x72).unwrap(), Command::Read);
        assert_eq!(Command::try_from(0x79).unwrap(), Command::SetLowCo);
    }

    #[test]
    fn test_command_expects_response() {
        assert!(!Command::Reset.expects_response());
        assert!(!Command::GreenLedOn.expects_response());
        assert!(Command::Read.expects_response());
        assert!(Command::Firmware.expects_response());
    }

    #[test]
    fn test_command_needs_swipe() {
        assert!(Command::Read.needs_swipe());
        assert!(Command::Erase.needs_swipe());
        assert!(!Command::RamTest.needs_swipe());
        assert!(!Command::GetCoercivity.needs_swipe());
    }

    #[test]
    fn test_command_display() {
        assert_eq!(Command::Erase.to_string(), "ERASE(0x63)");
    }

    #[test]
    fn test_unknown_command() {
        let result = Command::try_from(0x00);
        assert!(matches!(result, Err(Error::UnknownCommand(0x00))));
    }
}
