//! # msr605-core
//!
//! Core protocol implementation for MSR605 magnetic stripe reader/writers.
//!
//! This crate provides the low-level protocol primitives:
//! - Control bytes and command codes
//! - Command frame encoding and response byte checks
//! - ISO 7811 track character sets
//! - Status byte decoding

pub mod command;
pub mod constants;
pub mod error;
pub mod frame;
pub mod iso;
pub mod status;

pub use command::Command;
pub use error::{Error, Result};
pub use frame::Frame;
pub use status::Status;
