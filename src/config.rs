//! Magnetometer configuration types
//!
//! Each setting is stored in one bit field of one register (see
//! [`crate::registers`]). The enum discriminants are the raw field codes and
//! each enum's `Default` is the device power-on value.

/// Measurement configuration (bias current), configuration register A
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum MeasurementBias {
    /// Normal measurement, no bias (default)
    #[default]
    Normal = 0x00,
    /// Positive bias current applied to the sensor (self test)
    PositiveBias = 0x01,
    /// Negative bias current applied to the sensor (self test)
    NegativeBias = 0x02,
}

impl MeasurementBias {
    /// Decode a field value read from the device
    ///
    /// Code 3 is reserved and yields `None`.
    #[must_use]
    pub const fn from_bits(bits: u8) -> Option<Self> {
        match bits {
            0x00 => Some(Self::Normal),
            0x01 => Some(Self::PositiveBias),
            0x02 => Some(Self::NegativeBias),
            _ => None,
        }
    }
}

/// Data output rate in continuous measurement mode
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum OutputRate {
    /// 0.75 Hz
    Hz0_75 = 0x00,
    /// 1.5 Hz
    Hz1_5 = 0x01,
    /// 3 Hz
    Hz3 = 0x02,
    /// 7.5 Hz
    Hz7_5 = 0x03,
    /// 15 Hz (default)
    #[default]
    Hz15 = 0x04,
    /// 30 Hz
    Hz30 = 0x05,
    /// 75 Hz
    Hz75 = 0x06,
}

impl OutputRate {
    /// Output rate in Hz
    #[must_use]
    pub const fn hz(self) -> f32 {
        match self {
            Self::Hz0_75 => 0.75,
            Self::Hz1_5 => 1.5,
            Self::Hz3 => 3.0,
            Self::Hz7_5 => 7.5,
            Self::Hz15 => 15.0,
            Self::Hz30 => 30.0,
            Self::Hz75 => 75.0,
        }
    }

    /// Decode a field value read from the device
    ///
    /// Code 7 is reserved and yields `None`.
    #[must_use]
    pub const fn from_bits(bits: u8) -> Option<Self> {
        match bits {
            0x00 => Some(Self::Hz0_75),
            0x01 => Some(Self::Hz1_5),
            0x02 => Some(Self::Hz3),
            0x03 => Some(Self::Hz7_5),
            0x04 => Some(Self::Hz15),
            0x05 => Some(Self::Hz30),
            0x06 => Some(Self::Hz75),
            _ => None,
        }
    }
}

/// Number of samples averaged per measurement output
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Averaging {
    /// 1 sample (power-on default)
    #[default]
    Samples1 = 0x00,
    /// 2 samples
    Samples2 = 0x01,
    /// 4 samples
    Samples4 = 0x02,
    /// 8 samples
    Samples8 = 0x03,
}

impl Averaging {
    /// Number of samples averaged
    #[must_use]
    pub const fn samples(self) -> u8 {
        match self {
            Self::Samples1 => 1,
            Self::Samples2 => 2,
            Self::Samples4 => 4,
            Self::Samples8 => 8,
        }
    }

    /// Decode a field value read from the device
    #[must_use]
    pub const fn from_bits(bits: u8) -> Option<Self> {
        match bits {
            0x00 => Some(Self::Samples1),
            0x01 => Some(Self::Samples2),
            0x02 => Some(Self::Samples4),
            0x03 => Some(Self::Samples8),
            _ => None,
        }
    }
}

/// Gain setting, configuration register B
///
/// Higher gain means finer resolution over a smaller field range.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Gain {
    /// ±0.88 Ga, 1370 LSb/Gauss
    Gain1370 = 0x00,
    /// ±1.3 Ga, 1090 LSb/Gauss (default)
    #[default]
    Gain1090 = 0x01,
    /// ±1.9 Ga, 820 LSb/Gauss
    Gain820 = 0x02,
    /// ±2.5 Ga, 660 LSb/Gauss
    Gain660 = 0x03,
    /// ±4.0 Ga, 440 LSb/Gauss
    Gain440 = 0x04,
    /// ±4.7 Ga, 390 LSb/Gauss
    Gain390 = 0x05,
    /// ±5.6 Ga, 330 LSb/Gauss
    Gain330 = 0x06,
    /// ±8.1 Ga, 230 LSb/Gauss
    Gain230 = 0x07,
}

impl Gain {
    /// Sensitivity in LSb/Gauss
    #[must_use]
    pub const fn lsb_per_gauss(self) -> u16 {
        match self {
            Self::Gain1370 => 1370,
            Self::Gain1090 => 1090,
            Self::Gain820 => 820,
            Self::Gain660 => 660,
            Self::Gain440 => 440,
            Self::Gain390 => 390,
            Self::Gain330 => 330,
            Self::Gain230 => 230,
        }
    }

    /// Recommended sensor field range in Gauss (±)
    #[must_use]
    pub const fn range_gauss(self) -> f32 {
        match self {
            Self::Gain1370 => 0.88,
            Self::Gain1090 => 1.3,
            Self::Gain820 => 1.9,
            Self::Gain660 => 2.5,
            Self::Gain440 => 4.0,
            Self::Gain390 => 4.7,
            Self::Gain330 => 5.6,
            Self::Gain230 => 8.1,
        }
    }

    /// Decode a field value read from the device
    #[must_use]
    pub const fn from_bits(bits: u8) -> Option<Self> {
        match bits {
            0x00 => Some(Self::Gain1370),
            0x01 => Some(Self::Gain1090),
            0x02 => Some(Self::Gain820),
            0x03 => Some(Self::Gain660),
            0x04 => Some(Self::Gain440),
            0x05 => Some(Self::Gain390),
            0x06 => Some(Self::Gain330),
            0x07 => Some(Self::Gain230),
            _ => None,
        }
    }
}

/// Operating mode, mode register
///
/// The device powers up in [`OperatingMode::Single`]. The mode only changes
/// when the driver writes it; releasing the driver leaves it as last set.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum OperatingMode {
    /// Continuous measurement at the configured output rate
    Continuous = 0x00,
    /// One measurement, then the device returns to idle (power-on default)
    #[default]
    Single = 0x01,
    /// Idle, lowest power
    Idle = 0x02,
}

impl OperatingMode {
    /// Decode a field value read from the device
    ///
    /// Both `0b10` and `0b11` select idle mode.
    #[must_use]
    pub const fn from_bits(bits: u8) -> Option<Self> {
        match bits {
            0x00 => Some(Self::Continuous),
            0x01 => Some(Self::Single),
            0x02 | 0x03 => Some(Self::Idle),
            _ => None,
        }
    }
}

/// Complete device configuration
///
/// `Default` is the configuration the driver applies at initialization:
/// 8-sample averaging, 15 Hz, normal bias, 1090 LSb/Gauss, continuous mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct DeviceConfig {
    /// Measurement bias
    pub bias: MeasurementBias,
    /// Data output rate
    pub rate: OutputRate,
    /// Samples averaged per output
    pub averaging: Averaging,
    /// Gain
    pub gain: Gain,
    /// Operating mode
    pub mode: OperatingMode,
}

impl Default for DeviceConfig {
    fn default() -> Self {
        Self {
            bias: MeasurementBias::Normal,
            rate: OutputRate::Hz15,
            averaging: Averaging::Samples8,
            gain: Gain::Gain1090,
            mode: OperatingMode::Continuous,
        }
    }
}

/// Decoded status register
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Status {
    /// New data has been written to all six data output registers
    pub ready: bool,
    /// Data output registers are locked (partially read)
    pub locked: bool,
}

impl Status {
    /// Decode the status register byte
    #[must_use]
    pub const fn from_byte(byte: u8) -> Self {
        Self {
            ready: byte & (1 << crate::registers::STATUS_READY_BIT) != 0,
            locked: byte & (1 << crate::registers::STATUS_LOCK_BIT) != 0,
        }
    }
}
