//! Read a card and print its tracks

use msr605::{Msr605, SerialChannel, SerialConfig};
use tracing_subscriber::EnvFilter;

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive("msr605=info".parse()?))
        .init();

    let path = std::env::var("MSR605_PORT").unwrap_or_else(|_| "/dev/ttyUSB0".to_string());

    let channel = SerialChannel::open(&SerialConfig::new(path))?;
    let mut device = Msr605::connect(channel)?;

    println!("Swipe a card...");

    match device.read_card() {
        Ok(tracks) => {
            println!("Track 1: {}", tracks.track1);
            println!("Track 2: {}", tracks.track2);
            println!("Track 3: {}", tracks.track3);
        }
        Err(e) => {
            if let Some(tracks) = e.partial_tracks() {
                println!("Partial read: {}", tracks);
            }
            if e.requires_reset() {
                device.reset()?;
            }
            return Err(e.into());
        }
    }

    device.close()?;

    Ok(())
}
