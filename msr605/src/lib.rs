//! # msr605
//!
//! Host-side driver for MSR605 magnetic stripe card reader/writers.
//!
//! ## Features
//!
//! - Read, write and erase the three ISO tracks
//! - LED control, self tests, coercivity selection, device identification
//! - Blocking request/response over any [`Channel`]
//! - Errors name the failed operation and keep partially read tracks
//!
//! ## Quick Start
//!
//! ```no_run
//! use msr605::{Msr605, SerialChannel, SerialConfig, TrackRecord};
//!
//! fn main() -> msr605::Result<()> {
//!     // Open the port and run the reset/communication-test handshake
//!     let channel = SerialChannel::open(&SerialConfig::new("/dev/ttyUSB0"))?;
//!     let mut device = Msr605::connect(channel)?;
//!
//!     println!("{}", device.device_info()?);
//!
//!     // Swipe a card after each call
//!     device.write_card(&TrackRecord::new("HELLO", "1234", ""), true)?;
//!     let tracks = device.read_card()?;
//!     println!("{}", tracks);
//!
//!     device.close()?;
//!     Ok(())
//! }
//! ```

pub mod device;
pub mod error;
pub mod field;

// Re-exports
pub use device::Msr605;
pub use error::{Error, Result};
pub use field::Validation;

pub use msr605_core::{Command, Frame, Status};
pub use msr605_transport::{Channel, MockChannel, SerialChannel, SerialConfig};
pub use msr605_types::{Coercivity, DeviceInfo, Track, TrackRecord, TrackSelect};
