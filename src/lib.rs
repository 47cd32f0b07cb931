#![no_std]
#![doc = include_str!("../README.md")]
#![warn(missing_docs)]

pub mod bus;
pub mod config;
pub mod device;
pub mod field;
pub mod interface;
pub mod measurement;
pub mod registers;

// Re-export main types
pub use bus::RegisterBus;
pub use config::{
    Averaging, DeviceConfig, Gain, MeasurementBias, OperatingMode, OutputRate, Status,
};
pub use device::Hmc5883lDriver;
pub use field::BitField;
pub use interface::I2cInterface;
pub use measurement::{
    AxisTriple, CalibrationOffset, SCALE, SampleReport, ScaledAxisTriple, decode_i16, heading,
};
pub use registers::Register;

/// HMC5883L 7-bit I2C address
pub const I2C_ADDRESS: u8 = 0x1E;

/// Warm-up time after initialization before samples are valid, in milliseconds
pub const WARM_UP_MS: u32 = 700;

/// Driver errors
#[derive(Debug)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Error<E> {
    /// Communication error with the device
    Bus(E),
    /// Bit field does not fit in one register byte (rejected before any bus access)
    InvalidField(BitField),
    /// A configuration field read back a reserved code
    UnknownFieldValue(u8),
    /// Identification registers did not read `"H43"` (contains the bytes read)
    InvalidDevice([u8; 3]),
}

impl<E> From<E> for Error<E> {
    fn from(error: E) -> Self {
        Self::Bus(error)
    }
}
