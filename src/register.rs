//! Virtual register map and typed register values
//!
//! Each register the driver touches gets its own value type wrapping the raw
//! byte. Conversion to and from `u8` is explicit (`bits()` / `from_bits()`),
//! and bit patterns can only be combined with patterns of the same register.

use core::ops::BitOr;

/// Flag OR'ed into a virtual address to turn the access into a write
pub const WRITE_FLAG: u8 = 0x80;

/// Size in bytes of the calibrated lux and CCT values
pub const LUXCCT_REG_SIZE: usize = 2;

/// Size in bytes of each color channel integral
pub const COLOR_REG_SIZE: usize = 4;

/// Addresses in the chip's virtual register space
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt-03", derive(defmt::Format))]
pub enum VirtualRegister {
    /// Reset, interrupt, gain, mode and data-ready bits (`ControlReg`)
    SetupControl = 0x04,
    /// Integration time, 2.8 ms per count
    IntTime = 0x05,
    /// LED drive and indicator current (`LedControlReg`)
    LedControl = 0x07,
    /// CIE X integral, 4 bytes
    ColorX = 0x14,
    /// CIE Y integral, 4 bytes
    ColorY = 0x18,
    /// CIE Z integral, 4 bytes
    ColorZ = 0x1C,
    /// Calibrated lux, 2 bytes
    CalLux = 0x3C,
    /// Calibrated correlated color temperature, 2 bytes
    CalCct = 0x3E,
}

impl VirtualRegister {
    /// Raw virtual address, write flag clear
    pub const fn addr(self) -> u8 {
        self as u8
    }
}

/// Content of the STATUS physical register
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt-03", derive(defmt::Format))]
pub struct StatusReg(u8);

impl StatusReg {
    /// A data byte is staged in the READ register
    pub const RX_PENDING: Self = Self(0x01);
    /// The WRITE register still holds a byte the chip has not consumed
    pub const TX_PENDING: Self = Self(0x02);

    /// Wrap a raw STATUS byte
    pub const fn from_bits(bits: u8) -> Self {
        Self(bits)
    }

    /// Raw register byte
    pub const fn bits(self) -> u8 {
        self.0
    }

    /// True if every bit of `other` is set
    pub const fn contains(self, other: Self) -> bool {
        self.0 & other.0 == other.0
    }
}

impl BitOr for StatusReg {
    type Output = Self;

    fn bitor(self, rhs: Self) -> Self {
        Self(self.0 | rhs.0)
    }
}

/// Sensor gain
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt-03", derive(defmt::Format))]
pub enum Gain {
    /// 1x gain
    Gain1x = 0x00,
    /// 3.7x gain
    Gain4x = 0x10,
    /// 16x gain
    Gain16x = 0x20,
    /// 64x gain
    Gain64x = 0x30,
}

/// Conversion mode
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt-03", derive(defmt::Format))]
pub enum Mode {
    /// Continuous conversion of X, Y, Z and NIR
    Mode0 = 0x00,
    /// Continuous conversion of X, Y, D and NIR
    Mode1 = 0x04,
    /// Continuous conversion of all channels
    Mode2 = 0x08,
    /// One-shot conversion of all channels
    Mode3 = 0x0C,
}

/// Content of the SETUP_CONTROL virtual register
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt-03", derive(defmt::Format))]
pub struct ControlReg(u8);

impl ControlReg {
    /// Soft reset, self-clearing
    pub const RESET: Self = Self(0x80);
    /// Drive the INT pin when data is ready
    pub const INT_EN: Self = Self(0x40);
    /// A conversion has completed
    pub const DATA_RDY: Self = Self(0x02);

    const GAIN_MASK: u8 = 0x30;
    const MODE_MASK: u8 = 0x0C;

    /// Pack gain, mode and interrupt enable
    pub const fn new(gain: Gain, mode: Mode, interrupt: bool) -> Self {
        let int_en = if interrupt { Self::INT_EN.0 } else { 0 };
        Self(gain as u8 | mode as u8 | int_en)
    }

    /// Wrap a raw SETUP_CONTROL byte
    pub const fn from_bits(bits: u8) -> Self {
        Self(bits)
    }

    /// Raw register byte
    pub const fn bits(self) -> u8 {
        self.0
    }

    /// True if every bit of `other` is set
    pub const fn contains(self, other: Self) -> bool {
        self.0 & other.0 == other.0
    }

    /// Gain bits
    pub const fn gain(self) -> Gain {
        match self.0 & Self::GAIN_MASK {
            0x00 => Gain::Gain1x,
            0x10 => Gain::Gain4x,
            0x20 => Gain::Gain16x,
            _ => Gain::Gain64x,
        }
    }

    /// Mode bits
    pub const fn mode(self) -> Mode {
        match self.0 & Self::MODE_MASK {
            0x00 => Mode::Mode0,
            0x04 => Mode::Mode1,
            0x08 => Mode::Mode2,
            _ => Mode::Mode3,
        }
    }

    /// Same register with the gain bits replaced
    pub const fn with_gain(self, gain: Gain) -> Self {
        Self((self.0 & !Self::GAIN_MASK) | gain as u8)
    }

    /// Same register with the mode bits replaced
    pub const fn with_mode(self, mode: Mode) -> Self {
        Self((self.0 & !Self::MODE_MASK) | mode as u8)
    }
}

impl BitOr for ControlReg {
    type Output = Self;

    fn bitor(self, rhs: Self) -> Self {
        Self(self.0 | rhs.0)
    }
}

/// LED drive current
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt-03", derive(defmt::Format))]
pub enum LedDrive {
    /// 12.5 mA
    Drive12mA = 0x08,
    /// 25 mA
    Drive25mA = 0x18,
    /// 50 mA
    Drive50mA = 0x28,
    /// 100 mA
    Drive100mA = 0x38,
}

/// Indicator (sense) LED current
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt-03", derive(defmt::Format))]
pub enum LedSense {
    /// 1 mA
    Sense1mA = 0x01,
    /// 2 mA
    Sense2mA = 0x03,
    /// 4 mA
    Sense4mA = 0x05,
    /// 8 mA
    Sense8mA = 0x07,
}

/// Content of the LED_CONTROL virtual register
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt-03", derive(defmt::Format))]
pub struct LedControlReg(u8);

impl LedControlReg {
    /// Both LEDs off
    pub const OFF: Self = Self(0x00);

    /// Pack drive and sense currents, both LEDs enabled
    pub const fn new(drive: LedDrive, sense: LedSense) -> Self {
        Self(drive as u8 | sense as u8)
    }

    /// Wrap a raw LED_CONTROL byte
    pub const fn from_bits(bits: u8) -> Self {
        Self(bits)
    }

    /// Raw register byte
    pub const fn bits(self) -> u8 {
        self.0
    }
}
