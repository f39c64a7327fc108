//! Type definitions for msr605

pub mod device_info;
pub mod error;
pub mod track;

pub use device_info::{Coercivity, DeviceInfo};
pub use error::{Error, Result};
pub use track::{Track, TrackRecord, TrackSelect};
