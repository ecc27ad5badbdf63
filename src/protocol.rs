//! Virtual register handshake over the physical register window
//!
//! The AS7261 answers I2C transactions on three registers only. A virtual
//! register access is tunnelled through them:
//!
//! - write: wait for TX_PENDING clear, send `address | WRITE_FLAG`, wait for
//!   TX_PENDING set, send the data byte, wait for TX_PENDING clear
//! - read: wait for TX_PENDING clear, send `address`, wait for RX_PENDING set,
//!   fetch the byte from READ
//!
//! Every wait is a spin over STATUS reads bounded by the poll budget. Running
//! out of budget yields [`Error::Stalled`].

use embedded_hal::i2c::I2c;

use crate::ll::{PhysicalInterface, PhysicalRegister};
use crate::register::{StatusReg, WRITE_FLAG};
use crate::Error;

/// Default number of STATUS reads allowed for each handshake step
pub const DEFAULT_POLL_BUDGET: u32 = 1000;

/// Virtual register accessor layered on the physical register window
#[derive(Debug)]
pub struct VirtualInterface<I2C> {
    phy: PhysicalInterface<I2C>,
    poll_budget: u32,
}

impl<I2C, E> VirtualInterface<I2C>
where
    I2C: I2c<Error = E>,
{
    /// Create an accessor allowing `poll_budget` STATUS reads per handshake
    /// step. A budget of 0 is treated as 1.
    pub fn new(phy: PhysicalInterface<I2C>, poll_budget: u32) -> Self {
        let poll_budget = if poll_budget == 0 { 1 } else { poll_budget };
        Self { phy, poll_budget }
    }

    /// STATUS reads allowed per handshake step
    pub fn poll_budget(&self) -> u32 {
        self.poll_budget
    }

    /// Release the I2C bus
    pub fn release(self) -> I2C {
        self.phy.i2c
    }

    /// Write `value` to the virtual register at `address`
    pub fn write_virtual(&mut self, address: u8, value: u8) -> Result<(), Error<E>> {
        self.wait_idle()?;
        self.write_phy(address | WRITE_FLAG)?;
        // The address must be latched before the data byte follows it.
        self.wait_for(StatusReg::TX_PENDING, true)?;
        self.write_phy(value)?;
        self.wait_for(StatusReg::TX_PENDING, false)
    }

    /// Read the virtual register at `address`
    pub fn read_virtual(&mut self, address: u8) -> Result<u8, Error<E>> {
        self.wait_idle()?;
        self.write_phy(address & !WRITE_FLAG)?;
        self.wait_for(StatusReg::RX_PENDING, true)?;
        self.phy
            .read_physical(PhysicalRegister::Read)
            .map_err(Error::I2c)
    }

    /// Read `len` consecutive virtual registers starting at `start` as one
    /// big-endian value.
    ///
    /// `len` must be between 1 and 4 and the range must end at or below
    /// address 0x80. The first failing byte aborts the read.
    pub fn read_value(&mut self, start: u8, len: usize) -> Result<u32, Error<E>> {
        if len == 0 || len > 4 || start as usize + len > WRITE_FLAG as usize {
            return Err(Error::InvalidLength(len));
        }

        let mut value = 0u32;
        for offset in 0..len as u8 {
            let byte = self.read_virtual(start + offset)?;
            value = (value << 8) | byte as u32;
        }
        Ok(value)
    }

    fn status(&mut self) -> Result<StatusReg, Error<E>> {
        self.phy
            .read_physical(PhysicalRegister::Status)
            .map(StatusReg::from_bits)
            .map_err(Error::I2c)
    }

    fn write_phy(&mut self, byte: u8) -> Result<(), Error<E>> {
        self.phy
            .write_physical(PhysicalRegister::Write, byte)
            .map_err(Error::I2c)
    }

    /// Wait until the chip can take a new address byte.
    ///
    /// A byte left behind RX_PENDING by an earlier access is discarded so it
    /// cannot be taken as the answer to the next read.
    fn wait_idle(&mut self) -> Result<(), Error<E>> {
        for _ in 0..self.poll_budget {
            let status = self.status()?;
            if status.contains(StatusReg::RX_PENDING) {
                #[cfg(feature = "defmt-03")]
                defmt::debug!("AS7261 discarding stale read byte");
                self.phy
                    .read_physical(PhysicalRegister::Read)
                    .map_err(Error::I2c)?;
                continue;
            }
            if !status.contains(StatusReg::TX_PENDING) {
                return Ok(());
            }
        }
        Err(self.stalled(StatusReg::TX_PENDING, false))
    }

    fn wait_for(&mut self, flag: StatusReg, set: bool) -> Result<(), Error<E>> {
        for _ in 0..self.poll_budget {
            if self.status()?.contains(flag) == set {
                return Ok(());
            }
        }
        Err(self.stalled(flag, set))
    }

    fn stalled(&self, flag: StatusReg, set: bool) -> Error<E> {
        #[cfg(not(feature = "defmt-03"))]
        let _ = (flag, set);
        #[cfg(feature = "defmt-03")]
        defmt::warn!(
            "AS7261 stalled after {} polls waiting for status 0x{:02x} set={}",
            self.poll_budget,
            flag.bits(),
            set
        );
        Error::Stalled
    }
}
