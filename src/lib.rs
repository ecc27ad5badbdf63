//! # AS7261 XYZ Color and Ambient Light Sensor Driver
//!
//! This is a platform-agnostic Rust driver for the AMS AS7261 color sensor,
//! built using the [`embedded-hal`] traits for I2C communication.
//!
//! The AS7261 exposes only three physical registers on the bus (status,
//! write, read). Configuration and results live in a larger virtual register
//! space that is reached through a handshake on those three registers:
//! - [`ll`]: physical register access
//! - [`protocol`]: the virtual register handshake and multi-byte values
//! - [`register`]: typed register values (control, status, LED)
//! - [`color`]: scaling of color integrals to 8-bit channels
//! - [`encode`]: byte layout of a [`Snapshot`] for a BLE characteristic
//!
//! Every handshake step polls STATUS a bounded number of times. A chip that
//! stops answering makes the operation fail with [`Error::Stalled`] instead of
//! blocking forever.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use as7261::{As7261, Error};
//!
//! # fn main() {
//! # let i2c = embedded_hal_mock::eh1::i2c::Mock::new(&[]);
//! let mut sensor = As7261::new(i2c);
//!
//! // Reset and configure gain/mode
//! sensor.init().unwrap();
//!
//! // Light the target and trigger a conversion
//! sensor.led_on(true).unwrap();
//! sensor.start_measurement().unwrap();
//!
//! loop {
//!     match sensor.read() {
//!         Ok(_snapshot) => {
//!             // println!("{} lux, {} K", _snapshot.lux, _snapshot.cct);
//!             break;
//!         }
//!         Err(Error::NotReady) => continue,
//!         Err(e) => panic!("{:?}", e),
//!     }
//! }
//! # }
//! ```
//!
//! A driver instance owns its bus and every operation takes `&mut self`, so
//! one instance can never interleave two handshakes. Sharing a bus with other
//! devices is left to crates such as `embedded-hal-bus`.
//!
//! [`embedded-hal`]: https://crates.io/crates/embedded-hal

#![no_std]
#![deny(missing_docs)]

use embedded_hal::i2c::I2c;

pub mod color;
pub mod encode;
pub mod ll;
pub mod protocol;
pub mod register;
#[cfg(test)]
mod sim;

pub use color::ColorScaling;
pub use encode::{encode_snapshot, SNAPSHOT_LEN};
pub use ll::DEFAULT_ADDRESS;
pub use protocol::DEFAULT_POLL_BUDGET;
pub use register::{
    ControlReg, Gain, LedControlReg, LedDrive, LedSense, Mode, StatusReg, VirtualRegister,
};

use ll::PhysicalInterface;
use protocol::VirtualInterface;
use register::{COLOR_REG_SIZE, LUXCCT_REG_SIZE};

/// Outcome of a driver operation as reported to consumers
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt-03", derive(defmt::Format))]
pub enum Status {
    /// Operation completed, results are valid
    Ok,
    /// A handshake step did not complete (wedged bus or silent chip)
    Stalled,
    /// No new conversion yet, poll again later
    NotReady,
}

/// All possible errors in this crate
#[derive(Debug)]
#[cfg_attr(feature = "defmt-03", derive(defmt::Format))]
pub enum Error<E> {
    /// I2C communication error
    I2c(E),
    /// A handshake step exceeded its poll budget
    Stalled,
    /// Sensor has no completed conversion yet
    NotReady,
    /// Multi-byte value length outside 1..=4, or running past the end of
    /// the virtual register space
    InvalidLength(usize),
}

impl<E> Error<E> {
    /// Collapse the error into the status reported to consumers.
    ///
    /// A transport error fails the handshake step that issued it, so it is
    /// reported as [`Status::Stalled`].
    pub fn status(&self) -> Status {
        match self {
            Error::NotReady => Status::NotReady,
            Error::I2c(_) | Error::Stalled | Error::InvalidLength(_) => Status::Stalled,
        }
    }
}

/// One complete measurement
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt-03", derive(defmt::Format))]
pub struct Snapshot {
    /// Calibrated illuminance in lux
    pub lux: u32,
    /// Calibrated correlated color temperature in Kelvin
    pub cct: u32,
    /// Red channel, scaled from the X integral
    pub red: u8,
    /// Green channel, scaled from the Y integral
    pub green: u8,
    /// Blue channel, scaled from the Z integral
    pub blue: u8,
}

/// Driver configuration applied by [`As7261::init`] and the LED helpers
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt-03", derive(defmt::Format))]
pub struct Config {
    /// Gain written at init
    pub gain: Gain,
    /// Conversion mode written at init and by every measurement trigger
    pub mode: Mode,
    /// Enable the data-ready interrupt pin
    pub interrupt: bool,
    /// LED drive current used by [`As7261::led_on`]
    pub led_drive: LedDrive,
    /// Indicator current used by [`As7261::led_on`]
    pub led_sense: LedSense,
    /// Integration time in 2.8 ms cycles, written at init
    pub integration_time: u8,
    /// STATUS reads allowed per handshake step
    pub poll_budget: u32,
    /// Mapping of the X/Y/Z integrals to red/green/blue
    pub color_scaling: ColorScaling,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            gain: Gain::Gain16x,
            mode: Mode::Mode2,
            interrupt: false,
            led_drive: LedDrive::Drive50mA,
            led_sense: LedSense::Sense4mA,
            integration_time: 0xFF,
            poll_budget: DEFAULT_POLL_BUDGET,
            color_scaling: ColorScaling::default(),
        }
    }
}

/// High-level AS7261 driver
pub struct As7261<I2C> {
    vif: VirtualInterface<I2C>,
    config: Config,
    // Last control pattern written, without RESET or DATA_RDY
    control: ControlReg,
    // Lux and CCT from the last successful read
    last: Option<(u16, u16)>,
    repeated: bool,
}

impl<I2C, E> As7261<I2C>
where
    I2C: I2c<Error = E>,
{
    /// Create a new driver at the default address with default configuration
    pub fn new(i2c: I2C) -> Self {
        Self::with_config(i2c, DEFAULT_ADDRESS, Config::default())
    }

    /// Create a new driver at `address` with default configuration
    pub fn new_with_address(i2c: I2C, address: u8) -> Self {
        Self::with_config(i2c, address, Config::default())
    }

    /// Create a new driver at `address` with `config`
    pub fn with_config(i2c: I2C, address: u8, config: Config) -> Self {
        Self {
            vif: VirtualInterface::new(PhysicalInterface::new(i2c, address), config.poll_budget),
            config,
            control: ControlReg::new(config.gain, config.mode, config.interrupt),
            last: None,
            repeated: false,
        }
    }

    /// Reset the chip and write the configured gain, mode, interrupt enable
    /// and integration time.
    ///
    /// Any gain change made since the last init is discarded.
    pub fn init(&mut self) -> Result<(), Error<E>> {
        let setup = VirtualRegister::SetupControl.addr();
        self.vif.write_virtual(setup, ControlReg::RESET.bits())?;

        let control = ControlReg::new(self.config.gain, self.config.mode, self.config.interrupt);
        self.vif.write_virtual(setup, control.bits())?;
        self.control = control;

        self.vif
            .write_virtual(VirtualRegister::IntTime.addr(), self.config.integration_time)?;

        #[cfg(feature = "defmt-03")]
        defmt::debug!("AS7261 initialized, control 0x{:02x}", control.bits());
        Ok(())
    }

    /// Switch the LEDs on with the given currents, or off
    pub fn set_led(
        &mut self,
        enabled: bool,
        drive: LedDrive,
        sense: LedSense,
    ) -> Result<(), Error<E>> {
        let led = if enabled {
            LedControlReg::new(drive, sense)
        } else {
            LedControlReg::OFF
        };
        self.vif.write_virtual(VirtualRegister::LedControl.addr(), led.bits())
    }

    /// Switch the LEDs on with the configured currents, or off
    pub fn led_on(&mut self, enabled: bool) -> Result<(), Error<E>> {
        self.set_led(enabled, self.config.led_drive, self.config.led_sense)
    }

    /// Trigger a conversion in the configured mode.
    ///
    /// Only the mode bits change; gain and interrupt enable keep their
    /// current values.
    pub fn start_measurement(&mut self) -> Result<(), Error<E>> {
        let control = self.control.with_mode(self.config.mode);
        self.vif
            .write_virtual(VirtualRegister::SetupControl.addr(), control.bits())?;
        self.control = control;
        Ok(())
    }

    /// Change the gain, keeping mode and interrupt enable
    pub fn set_gain(&mut self, gain: Gain) -> Result<(), Error<E>> {
        let control = self.control.with_gain(gain);
        self.vif
            .write_virtual(VirtualRegister::SetupControl.addr(), control.bits())?;
        self.control = control;
        Ok(())
    }

    /// Set the integration time in 2.8 ms cycles
    pub fn set_integration_time(&mut self, cycles: u8) -> Result<(), Error<E>> {
        self.vif.write_virtual(VirtualRegister::IntTime.addr(), cycles)
    }

    /// Check if a completed conversion is available
    pub fn is_data_ready(&mut self) -> Result<bool, Error<E>> {
        let control = self
            .vif
            .read_virtual(VirtualRegister::SetupControl.addr())
            .map(ControlReg::from_bits)?;
        Ok(control.contains(ControlReg::DATA_RDY))
    }

    /// Read a complete measurement.
    ///
    /// Returns [`Error::NotReady`] without further bus traffic when no
    /// conversion has completed. Session state is only updated once every
    /// value has been read.
    pub fn read(&mut self) -> Result<Snapshot, Error<E>> {
        if !self.is_data_ready()? {
            return Err(Error::NotReady);
        }

        let lux = self.vif.read_value(VirtualRegister::CalLux.addr(), LUXCCT_REG_SIZE)?;
        let cct = self.vif.read_value(VirtualRegister::CalCct.addr(), LUXCCT_REG_SIZE)?;
        let x = self.vif.read_value(VirtualRegister::ColorX.addr(), COLOR_REG_SIZE)?;
        let y = self.vif.read_value(VirtualRegister::ColorY.addr(), COLOR_REG_SIZE)?;
        let z = self.vif.read_value(VirtualRegister::ColorZ.addr(), COLOR_REG_SIZE)?;

        let scaling = self.config.color_scaling;
        let snapshot = Snapshot {
            lux,
            cct,
            red: scaling.scale(x),
            green: scaling.scale(y),
            blue: scaling.scale(z),
        };

        // Two-byte reads always fit
        let (lux, cct) = (lux as u16, cct as u16);
        self.repeated = self.last == Some((lux, cct));
        if self.repeated {
            #[cfg(feature = "defmt-03")]
            defmt::debug!("AS7261 data unchanged: lux {} cct {}", lux, cct);
        }
        self.last = Some((lux, cct));

        Ok(snapshot)
    }

    /// Raw lux and CCT retained from the last successful read, if any
    pub fn last_reading(&self) -> Option<(u16, u16)> {
        self.last
    }

    /// True if the last successful read returned exactly the retained lux
    /// and CCT of the read before it
    pub fn is_repeated(&self) -> bool {
        self.repeated
    }

    /// Control pattern last written to the chip
    pub fn control(&self) -> ControlReg {
        self.control
    }

    /// Active configuration
    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Destroy the driver and return the I2C interface
    pub fn destroy(self) -> I2C {
        self.vif.release()
    }
}
