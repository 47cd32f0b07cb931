//! Register map for the HMC5883L
//!
//! The HMC5883L exposes 13 byte-wide registers. Configuration registers A and
//! B and the mode register are read/write, everything else is read-only.
//!
//! Data output registers are ordered X, Z, Y (not X, Y, Z). The register
//! pointer auto-increments, so a 6-byte burst from [`Register::DataXHigh`]
//! returns `[X_H, X_L, Z_H, Z_L, Y_H, Y_L]`.

use crate::field::BitField;

/// Register addresses
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[repr(u8)]
pub enum Register {
    /// Configuration register A (0x00): averaging, output rate, measurement bias
    ConfigA = 0x00,
    /// Configuration register B (0x01): gain
    ConfigB = 0x01,
    /// Mode register (0x02): operating mode
    Mode = 0x02,
    /// Data output X MSB (0x03)
    DataXHigh = 0x03,
    /// Data output X LSB (0x04)
    DataXLow = 0x04,
    /// Data output Z MSB (0x05)
    DataZHigh = 0x05,
    /// Data output Z LSB (0x06)
    DataZLow = 0x06,
    /// Data output Y MSB (0x07)
    DataYHigh = 0x07,
    /// Data output Y LSB (0x08)
    DataYLow = 0x08,
    /// Status register (0x09): lock and ready bits
    Status = 0x09,
    /// Identification register A (0x0A), reads `'H'`
    IdA = 0x0A,
    /// Identification register B (0x0B), reads `'4'`
    IdB = 0x0B,
    /// Identification register C (0x0C), reads `'3'`
    IdC = 0x0C,
}

impl Register {
    /// Register address on the bus
    #[must_use]
    pub const fn addr(self) -> u8 {
        self as u8
    }
}

impl From<Register> for u8 {
    fn from(register: Register) -> Self {
        register.addr()
    }
}

/// Measurement bias, `MS1..MS0` in configuration register A
pub const MEASUREMENT_BIAS: BitField = BitField::new(1, 2);

/// Data output rate, `DO2..DO0` in configuration register A
pub const OUTPUT_RATE: BitField = BitField::new(4, 3);

/// Samples averaged per output, `MA1..MA0` in configuration register A
pub const AVERAGING: BitField = BitField::new(6, 2);

/// Gain, `GN2..GN0` in configuration register B
pub const GAIN: BitField = BitField::new(7, 3);

/// Operating mode, `MD1..MD0` in the mode register
pub const OPERATING_MODE: BitField = BitField::new(1, 2);

/// Data ready bit in the status register
pub const STATUS_READY_BIT: u8 = 0;

/// Data output lock bit in the status register
pub const STATUS_LOCK_BIT: u8 = 1;

/// Expected contents of the identification registers A, B, C
pub const IDENTIFICATION: [u8; 3] = *b"H43";
