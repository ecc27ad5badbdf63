//! Simulated AS7261 for driver tests
//!
//! Models the physical register window and the handshake flags closely
//! enough to run the driver end to end, and records every virtual register
//! access so tests can check what reached the chip.

extern crate std;

use core::convert::Infallible;
use embedded_hal::i2c::{ErrorType, I2c, Operation};
use std::vec::Vec;

use crate::ll::DEFAULT_ADDRESS;

const STATUS: u8 = 0x00;
const WRITE: u8 = 0x01;
const READ: u8 = 0x02;

const SETUP_CONTROL: usize = 0x04;
const RESET: u8 = 0x80;
const DATA_RDY: u8 = 0x02;

pub struct SimulatedChip {
    vregs: [u8; 0x40],
    latched: Option<u8>,
    rx: Option<u8>,
    /// Virtual register writes as `(address, value)`
    pub writes: Vec<(u8, u8)>,
    /// Virtual register addresses read
    pub reads: Vec<u8>,
    /// SETUP_CONTROL reads still answered without DATA_RDY
    pub ready_after: u32,
    /// Reads of this address never raise RX_PENDING
    pub stall_on: Option<u8>,
    /// Reads of `stall_on` still answered before the stall starts
    pub stall_skip: u32,
    /// Added to the lux value at each completed conversion
    pub lux_step: u16,
}

impl SimulatedChip {
    pub fn new() -> Self {
        Self {
            vregs: [0; 0x40],
            latched: None,
            rx: None,
            writes: Vec::new(),
            reads: Vec::new(),
            ready_after: 0,
            stall_on: None,
            stall_skip: 0,
            lux_step: 0,
        }
    }

    /// Load calibrated lux/CCT and the X, Y, Z integrals
    pub fn set_measurement(&mut self, lux: u16, cct: u16, xyz: [u32; 3]) {
        self.vregs[0x3C..0x3E].copy_from_slice(&lux.to_be_bytes());
        self.vregs[0x3E..0x40].copy_from_slice(&cct.to_be_bytes());
        for (i, value) in xyz.iter().enumerate() {
            let start = 0x14 + 4 * i;
            self.vregs[start..start + 4].copy_from_slice(&value.to_be_bytes());
        }
    }

    /// Writes that reached `address`, in order
    pub fn writes_to(&self, address: u8) -> Vec<u8> {
        self.writes
            .iter()
            .filter(|(a, _)| *a == address)
            .map(|(_, v)| *v)
            .collect()
    }

    fn status(&self) -> u8 {
        let mut status = 0;
        if self.rx.is_some() {
            status |= 0x01;
        }
        if self.latched.is_some() {
            status |= 0x02;
        }
        status
    }

    fn write_byte(&mut self, byte: u8) {
        if let Some(address) = self.latched.take() {
            self.store(address, byte);
        } else if byte & 0x80 != 0 {
            self.latched = Some(byte & 0x7F);
        } else {
            self.reads.push(byte);
            if self.stall_on == Some(byte) {
                if self.stall_skip == 0 {
                    return;
                }
                self.stall_skip -= 1;
            }
            self.rx = Some(self.load(byte));
        }
    }

    fn store(&mut self, address: u8, value: u8) {
        self.writes.push((address, value));
        let address = address as usize;
        if address == SETUP_CONTROL && value & RESET != 0 {
            self.vregs[SETUP_CONTROL] = 0;
        } else {
            self.vregs[address] = value;
        }
    }

    fn load(&mut self, address: u8) -> u8 {
        let address = address as usize;
        if address == SETUP_CONTROL {
            if self.ready_after > 0 {
                self.ready_after -= 1;
                return self.vregs[SETUP_CONTROL] & !DATA_RDY;
            }
            if self.lux_step != 0 {
                let lux = u16::from_be_bytes([self.vregs[0x3C], self.vregs[0x3D]]);
                let lux = lux.wrapping_add(self.lux_step);
                self.vregs[0x3C..0x3E].copy_from_slice(&lux.to_be_bytes());
            }
            return self.vregs[SETUP_CONTROL] | DATA_RDY;
        }
        self.vregs[address]
    }
}

impl ErrorType for SimulatedChip {
    type Error = Infallible;
}

impl I2c for SimulatedChip {
    fn transaction(
        &mut self,
        address: u8,
        operations: &mut [Operation<'_>],
    ) -> Result<(), Self::Error> {
        assert_eq!(address, DEFAULT_ADDRESS);

        let mut register = None;
        for operation in operations {
            match operation {
                Operation::Write(bytes) => {
                    register = Some(bytes[0]);
                    if bytes.len() > 1 {
                        assert_eq!(bytes[0], WRITE, "only WRITE accepts data");
                        self.write_byte(bytes[1]);
                    }
                }
                Operation::Read(buffer) => {
                    buffer[0] = match register {
                        Some(STATUS) => self.status(),
                        Some(READ) => self.rx.take().unwrap_or(0),
                        other => panic!("unexpected read of {:?}", other),
                    };
                }
            }
        }
        Ok(())
    }
}
