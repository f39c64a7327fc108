//! Identify the device and run its self tests

use std::time::Duration;

use msr605::{Coercivity, Msr605, SerialChannel, SerialConfig};
use tracing_subscriber::EnvFilter;

fn main() -> msr605::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let path = std::env::var("MSR605_PORT").unwrap_or_else(|_| "/dev/ttyUSB0".to_string());
    let config = SerialConfig::new(path).with_poll_interval(Duration::from_millis(50));

    let mut device = Msr605::connect(SerialChannel::open(&config)?)?;

    println!("{}", device.device_info()?);

    device.ram_test()?;
    println!("RAM test passed");

    device.set_coercivity(Coercivity::High)?;
    println!("Coercivity: {}", device.get_coercivity()?);

    // Cycle the LEDs
    device.green_led_on()?;
    std::thread::sleep(Duration::from_millis(500));
    device.yellow_led_on()?;
    std::thread::sleep(Duration::from_millis(500));
    device.red_led_on()?;
    std::thread::sleep(Duration::from_millis(500));
    device.all_leds_off()?;

    device.close()?;

    Ok(())
}
