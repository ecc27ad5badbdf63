//! Low-level access to the AS7261 physical register window

use embedded_hal::i2c::I2c;

/// Default I2C address of the AS7261
pub const DEFAULT_ADDRESS: u8 = 0x49;

/// The three registers the chip exposes directly on the bus
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt-03", derive(defmt::Format))]
pub enum PhysicalRegister {
    /// Handshake status flags (`StatusReg`)
    Status = 0x00,
    /// Address and data bytes going to the chip
    Write = 0x01,
    /// Data bytes coming back from the chip
    Read = 0x02,
}

/// Single-byte register transactions at a fixed device address
#[derive(Debug)]
pub struct PhysicalInterface<I2C> {
    /// The I2C interface
    pub i2c: I2C,
    address: u8,
}

impl<I2C: I2c> PhysicalInterface<I2C> {
    /// Bind the accessor to a bus and device address
    pub fn new(i2c: I2C, address: u8) -> Self {
        Self { i2c, address }
    }

    /// Device address used for every transaction
    pub fn address(&self) -> u8 {
        self.address
    }

    /// Read one physical register
    pub fn read_physical(&mut self, reg: PhysicalRegister) -> Result<u8, I2C::Error> {
        let mut buffer = [0u8; 1];
        self.i2c.write_read(self.address, &[reg as u8], &mut buffer)?;
        Ok(buffer[0])
    }

    /// Write one physical register
    pub fn write_physical(&mut self, reg: PhysicalRegister, value: u8) -> Result<(), I2C::Error> {
        self.i2c.write(self.address, &[reg as u8, value])
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use embedded_hal::i2c::ErrorKind;
    use embedded_hal_mock::eh1::i2c::{Mock as I2cMock, Transaction as I2cTransaction};
    extern crate std;
    use std::vec;

    #[test]
    fn reads_and_writes_use_register_index() {
        let expectations = [
            I2cTransaction::write_read(DEFAULT_ADDRESS, vec![0x00], vec![0x02]),
            I2cTransaction::write(DEFAULT_ADDRESS, vec![0x01, 0x84]),
            I2cTransaction::write_read(DEFAULT_ADDRESS, vec![0x02], vec![0x5A]),
        ];
        let mut i2c = I2cMock::new(&expectations);
        let mut phy = PhysicalInterface::new(i2c.clone(), DEFAULT_ADDRESS);

        assert_eq!(phy.read_physical(PhysicalRegister::Status).unwrap(), 0x02);
        phy.write_physical(PhysicalRegister::Write, 0x84).unwrap();
        assert_eq!(phy.read_physical(PhysicalRegister::Read).unwrap(), 0x5A);

        i2c.done();
    }

    #[test]
    fn transport_errors_are_returned_verbatim() {
        let expectations = [
            I2cTransaction::write(0x10, vec![0x01, 0x07]).with_error(ErrorKind::Other),
        ];
        let mut i2c = I2cMock::new(&expectations);
        let mut phy = PhysicalInterface::new(i2c.clone(), 0x10);
        assert_eq!(phy.address(), 0x10);

        assert_eq!(
            phy.write_physical(PhysicalRegister::Write, 0x07),
            Err(ErrorKind::Other)
        );

        i2c.done();
    }
}
