//! Basic color reading demo
//!
//! This demo shows how to:
//! - Initialize the AS7261 sensor
//! - Drive the LED and trigger conversions
//! - Poll for data and print lux, CCT and RGB
//! - Recover from a stalled chip by re-initializing

use as7261::{As7261, Error};
use embedded_hal::delay::DelayNs;
use linux_embedded_hal::{Delay, I2cdev};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let i2c = I2cdev::new("/dev/i2c-1")?;
    let mut delay = Delay;

    let mut sensor = As7261::new(i2c);

    println!("Initializing AS7261 sensor...");
    sensor.init().map_err(|e| format!("init failed: {:?}", e))?;
    sensor
        .led_on(true)
        .map_err(|e| format!("LED failed: {:?}", e))?;
    sensor
        .start_measurement()
        .map_err(|e| format!("trigger failed: {:?}", e))?;

    println!("Sensor configured. Press Ctrl+C to exit\n");

    let mut stalls = 0;
    loop {
        delay.delay_ms(100);

        match sensor.read() {
            Ok(snapshot) => {
                stalls = 0;
                println!(
                    "lux: {:6}  cct: {:5} K  rgb: ({:3}, {:3}, {:3}){}",
                    snapshot.lux,
                    snapshot.cct,
                    snapshot.red,
                    snapshot.green,
                    snapshot.blue,
                    if sensor.is_repeated() { "  (repeated)" } else { "" }
                );
            }
            Err(Error::NotReady) => {}
            Err(e) => {
                stalls += 1;
                println!("Read failed: {:?}", e);

                if stalls > 3 {
                    println!("Too many failures, re-initializing sensor...");
                    if let Err(e) = sensor.init().and_then(|_| sensor.start_measurement()) {
                        println!("Failed to reinitialize: {:?}", e);
                        break;
                    }
                    stalls = 0;
                }
            }
        }
    }

    Ok(())
}
