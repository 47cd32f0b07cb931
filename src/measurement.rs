//! Magnetometer sample types and conversions
//!
//! Decoding of the raw data output registers, per-axis calibration, scaling
//! and heading computation. Everything here is pure; the driver feeds it the
//! 6-byte burst read from the device.

use core::f32::consts::PI;
use core::fmt;

/// Scale applied to calibrated counts to produce scaled axes
///
/// This is the 0.92 mG/LSb resolution of the default 1090 LSb/Gauss gain.
pub const SCALE: f32 = 0.92;

/// Interpret a 16-bit register pair as a two's-complement signed value
///
/// Values at or above `0x8000` are negative: the result is `-(65536 - raw)`.
#[must_use]
pub const fn decode_i16(raw: u16) -> i16 {
    if raw >= 0x8000 {
        (-(0x1_0000 - raw as i32)) as i16
    } else {
        raw as i16
    }
}

/// Compass heading of the vector `(a, b)` in radians, in `[0, 2π)`
///
/// Computed as `atan2(b, a)` shifted into the positive range. Only the
/// horizontal pair is used; no tilt compensation is applied.
#[must_use]
pub fn heading(a: f32, b: f32) -> f32 {
    let bearing = libm::atan2f(b, a);
    let bearing = if bearing < 0.0 {
        bearing + 2.0 * PI
    } else {
        bearing
    };
    // -0.0 and rounding up to exactly 2π both belong at 0
    if bearing >= 2.0 * PI || bearing == 0.0 {
        0.0
    } else {
        bearing
    }
}

/// Convert radians to degrees rounded to two decimal places
#[must_use]
pub fn degrees_2dp(radians: f32) -> f32 {
    libm::roundf(radians.to_degrees() * 100.0) / 100.0
}

/// Per-axis additive calibration offsets (hard-iron correction)
///
/// Added to the decoded counts before scaling. Zero by default.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct CalibrationOffset {
    /// Offset added to X counts
    pub x: i16,
    /// Offset added to Y counts
    pub y: i16,
    /// Offset added to Z counts
    pub z: i16,
}

impl CalibrationOffset {
    /// Create calibration offsets
    #[must_use]
    pub const fn new(x: i16, y: i16, z: i16) -> Self {
        Self { x, y, z }
    }
}

/// Calibrated axis counts for one sample
///
/// Widened to `i32` so that a calibration offset can never overflow.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct AxisTriple {
    /// X axis
    pub x: i32,
    /// Y axis
    pub y: i32,
    /// Z axis
    pub z: i32,
}

impl AxisTriple {
    /// Decode the data output registers and apply calibration
    ///
    /// `data` is the burst starting at X MSB, in device order
    /// `[X_H, X_L, Z_H, Z_L, Y_H, Y_L]`.
    #[must_use]
    pub const fn from_registers(data: [u8; 6], offset: CalibrationOffset) -> Self {
        let x = decode_i16(u16::from_be_bytes([data[0], data[1]]));
        let z = decode_i16(u16::from_be_bytes([data[2], data[3]]));
        let y = decode_i16(u16::from_be_bytes([data[4], data[5]]));

        Self {
            x: x as i32 + offset.x as i32,
            y: y as i32 + offset.y as i32,
            z: z as i32 + offset.z as i32,
        }
    }

    /// Multiply every axis by [`SCALE`]
    #[must_use]
    pub fn scaled(&self) -> ScaledAxisTriple {
        ScaledAxisTriple {
            x: self.x as f32 * SCALE,
            y: self.y as f32 * SCALE,
            z: self.z as f32 * SCALE,
        }
    }

    /// Heading of the `(x, y)` pair in radians
    #[must_use]
    pub fn heading(&self) -> f32 {
        heading(self.x as f32, self.y as f32)
    }
}

/// Calibrated axes multiplied by [`SCALE`]
#[derive(Debug, Clone, Copy, PartialEq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct ScaledAxisTriple {
    /// X axis
    pub x: f32,
    /// Y axis
    pub y: f32,
    /// Z axis
    pub z: f32,
}

impl ScaledAxisTriple {
    /// Heading of the `(x, y)` pair in radians
    #[must_use]
    pub fn heading(&self) -> f32 {
        heading(self.x, self.y)
    }

    /// Magnitude of the field vector
    #[must_use]
    pub fn magnitude(&self) -> f32 {
        libm::sqrtf(self.x * self.x + self.y * self.y + self.z * self.z)
    }
}

/// Everything derived from one sample
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct SampleReport {
    /// Calibrated counts
    pub raw: AxisTriple,
    /// Heading of the raw pair in degrees, two decimals
    pub raw_heading_deg: f32,
    /// Calibrated and scaled axes
    pub scaled: ScaledAxisTriple,
    /// Heading of the scaled pair in degrees, two decimals
    pub scaled_heading_deg: f32,
}

impl SampleReport {
    /// Build the report for one calibrated sample
    #[must_use]
    pub fn from_axes(raw: AxisTriple) -> Self {
        let scaled = raw.scaled();
        Self {
            raw,
            raw_heading_deg: degrees_2dp(raw.heading()),
            scaled,
            scaled_heading_deg: degrees_2dp(scaled.heading()),
        }
    }
}

impl fmt::Display for SampleReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(
            f,
            "Raw\tX:\t{}\tY:\t{}\tZ:\t{}\tHead:\t{}",
            self.raw.x, self.raw.y, self.raw.z, self.raw_heading_deg
        )?;
        write!(
            f,
            "Scaled\tX:\t{}\tY:\t{}\tZ:\t{}\tHead:\t{}",
            self.scaled.x, self.scaled.y, self.scaled.z, self.scaled_heading_deg
        )
    }
}
