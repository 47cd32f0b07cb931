//! High-level driver API for the HMC5883L
//!
//! This module provides the magnetometer driver: initialization, typed
//! configuration accessors, calibrated axis sampling and heading computation.

use crate::bus::RegisterBus;
use crate::config::{
    Averaging, DeviceConfig, Gain, MeasurementBias, OperatingMode, OutputRate, Status,
};
use crate::measurement::{AxisTriple, CalibrationOffset, SampleReport, ScaledAxisTriple};
use crate::registers::{
    self, AVERAGING, GAIN, IDENTIFICATION, MEASUREMENT_BIAS, OPERATING_MODE, OUTPUT_RATE, Register,
};
use crate::{Error, WARM_UP_MS};

#[cfg(not(feature = "async"))]
use device_driver::RegisterInterface;

/// Configuration A value written at initialization, as (field, code) pairs
const INIT_CONFIG_A: [(crate::BitField, u8); 3] = [
    (AVERAGING, Averaging::Samples8 as u8),
    (OUTPUT_RATE, OutputRate::Hz15 as u8),
    (MEASUREMENT_BIAS, MeasurementBias::Normal as u8),
];

/// Wait between samples while calibrating, derived from the output rate
const fn sample_period_ms(rate: OutputRate) -> u32 {
    match rate {
        OutputRate::Hz0_75 => 1334,
        OutputRate::Hz1_5 => 667,
        OutputRate::Hz3 => 334,
        OutputRate::Hz7_5 => 134,
        OutputRate::Hz15 => 67,
        OutputRate::Hz30 => 34,
        OutputRate::Hz75 => 14,
    }
}

/// Running min/max of uncalibrated samples, for hard-iron calibration
struct Extents {
    min: [i32; 3],
    max: [i32; 3],
}

impl Extents {
    const fn new() -> Self {
        Self {
            min: [i32::MAX; 3],
            max: [i32::MIN; 3],
        }
    }

    fn add(&mut self, sample: &AxisTriple) {
        for (i, value) in [sample.x, sample.y, sample.z].into_iter().enumerate() {
            self.min[i] = self.min[i].min(value);
            self.max[i] = self.max[i].max(value);
        }
    }

    /// Offsets that move the midpoint of each axis to zero
    fn offsets(&self) -> CalibrationOffset {
        let centre = |i: usize| -> i16 {
            if self.min[i] > self.max[i] {
                return 0;
            }
            let mid = (self.min[i] + self.max[i]) / 2;
            i16::try_from(-mid).unwrap_or(if mid > 0 { i16::MIN } else { i16::MAX })
        };
        CalibrationOffset::new(centre(0), centre(1), centre(2))
    }
}

/// Decode a configuration field code or report it as unknown
fn decode<T, E>(bits: u8, from_bits: fn(u8) -> Option<T>) -> Result<T, Error<E>> {
    from_bits(bits).ok_or(Error::UnknownFieldValue(bits))
}

/// Main driver for the HMC5883L
///
/// Owns its transport and its calibration offsets; nothing is shared between
/// driver instances. Configuration getters only ever read from the device.
pub struct Hmc5883lDriver<I> {
    bus: RegisterBus<I>,
    calibration: CalibrationOffset,
}

impl<I> Hmc5883lDriver<I> {
    /// Set all calibration offsets
    ///
    /// Applied to every subsequent sample, before scaling.
    pub const fn set_calibration(&mut self, calibration: CalibrationOffset) {
        self.calibration = calibration;
    }

    /// Current calibration offsets
    #[must_use]
    pub const fn calibration(&self) -> CalibrationOffset {
        self.calibration
    }

    /// Set the X axis offset
    pub const fn set_x_offset(&mut self, offset: i16) {
        self.calibration.x = offset;
    }

    /// Set the Y axis offset
    pub const fn set_y_offset(&mut self, offset: i16) {
        self.calibration.y = offset;
    }

    /// Set the Z axis offset
    pub const fn set_z_offset(&mut self, offset: i16) {
        self.calibration.z = offset;
    }

    /// Consume the driver and return the underlying interface
    ///
    /// The device is left in whatever mode was last set.
    pub fn release(self) -> I {
        self.bus.release()
    }
}

#[cfg(not(feature = "async"))]
impl<I> Hmc5883lDriver<I>
where
    I: RegisterInterface<AddressType = u8>,
{
    /// Create a new HMC5883L driver and initialize the device
    ///
    /// Runs [`init()`](Self::init), which blocks for the 700 ms warm-up.
    /// Calibration offsets start at zero.
    ///
    /// # Errors
    ///
    /// Returns an error if communication with the device fails.
    ///
    /// # Example
    ///
    /// ```ignore
    /// let interface = I2cInterface::default(i2c);
    /// let mut compass = Hmc5883lDriver::new(interface, &mut delay)?;
    /// ```
    pub fn new<D>(interface: I, delay: &mut D) -> Result<Self, Error<I::Error>>
    where
        D: embedded_hal::delay::DelayNs,
    {
        let mut driver = Self {
            bus: RegisterBus::new(interface),
            calibration: CalibrationOffset::default(),
        };
        driver.init(delay)?;
        Ok(driver)
    }

    /// Initialize the device with default settings
    ///
    /// 1. Writes 8-sample averaging, 15 Hz output and normal bias to
    ///    configuration A in a single byte write
    /// 2. Sets the gain to 1090 LSb/Gauss
    /// 3. Switches to continuous measurement mode
    /// 4. Waits 700 ms before samples are valid
    ///
    /// No readiness polling is done; use [`is_ready()`](Self::is_ready) if needed.
    ///
    /// # Errors
    ///
    /// Returns an error if communication with the device fails.
    pub fn init<D>(&mut self, delay: &mut D) -> Result<(), Error<I::Error>>
    where
        D: embedded_hal::delay::DelayNs,
    {
        self.bus.write_packed(Register::ConfigA, &INIT_CONFIG_A)?;
        self.set_gain(Gain::Gain1090)?;
        self.set_operating_mode(OperatingMode::Continuous)?;

        #[cfg(feature = "defmt")]
        defmt::debug!("HMC5883L configured, warming up for {} ms", WARM_UP_MS);

        delay.delay_ms(WARM_UP_MS);
        Ok(())
    }

    /// Set the measurement bias
    ///
    /// # Errors
    ///
    /// Returns an error if communication with the device fails.
    pub fn set_measurement_bias(&mut self, bias: MeasurementBias) -> Result<(), Error<I::Error>> {
        self.bus.write_field(Register::ConfigA, MEASUREMENT_BIAS, bias as u8)
    }

    /// Read the measurement bias
    ///
    /// # Errors
    ///
    /// Returns an error if communication fails or the device reports the
    /// reserved code.
    pub fn measurement_bias(&mut self) -> Result<MeasurementBias, Error<I::Error>> {
        let bits = self.bus.read_field(Register::ConfigA, MEASUREMENT_BIAS)?;
        decode(bits, MeasurementBias::from_bits)
    }

    /// Set the data output rate
    ///
    /// # Errors
    ///
    /// Returns an error if communication with the device fails.
    pub fn set_output_rate(&mut self, rate: OutputRate) -> Result<(), Error<I::Error>> {
        self.bus.write_field(Register::ConfigA, OUTPUT_RATE, rate as u8)
    }

    /// Read the data output rate
    ///
    /// # Errors
    ///
    /// Returns an error if communication fails or the device reports the
    /// reserved code.
    pub fn output_rate(&mut self) -> Result<OutputRate, Error<I::Error>> {
        let bits = self.bus.read_field(Register::ConfigA, OUTPUT_RATE)?;
        decode(bits, OutputRate::from_bits)
    }

    /// Set the number of samples averaged per output
    ///
    /// # Errors
    ///
    /// Returns an error if communication with the device fails.
    pub fn set_averaging(&mut self, averaging: Averaging) -> Result<(), Error<I::Error>> {
        self.bus.write_field(Register::ConfigA, AVERAGING, averaging as u8)
    }

    /// Read the number of samples averaged per output
    ///
    /// # Errors
    ///
    /// Returns an error if communication with the device fails.
    pub fn averaging(&mut self) -> Result<Averaging, Error<I::Error>> {
        let bits = self.bus.read_field(Register::ConfigA, AVERAGING)?;
        decode(bits, Averaging::from_bits)
    }

    /// Set the gain
    ///
    /// # Errors
    ///
    /// Returns an error if communication with the device fails.
    pub fn set_gain(&mut self, gain: Gain) -> Result<(), Error<I::Error>> {
        #[cfg(feature = "defmt")]
        defmt::debug!("Setting gain to {} LSb/Gauss", gain.lsb_per_gauss());

        self.bus.write_field(Register::ConfigB, GAIN, gain as u8)
    }

    /// Read the gain
    ///
    /// # Errors
    ///
    /// Returns an error if communication with the device fails.
    pub fn gain(&mut self) -> Result<Gain, Error<I::Error>> {
        let bits = self.bus.read_field(Register::ConfigB, GAIN)?;
        decode(bits, Gain::from_bits)
    }

    /// Set the operating mode
    ///
    /// This is the only way the mode changes; there are no automatic
    /// transitions.
    ///
    /// # Errors
    ///
    /// Returns an error if communication with the device fails.
    pub fn set_operating_mode(&mut self, mode: OperatingMode) -> Result<(), Error<I::Error>> {
        #[cfg(feature = "defmt")]
        defmt::debug!("Setting operating mode to {}", mode);

        self.bus.write_field(Register::Mode, OPERATING_MODE, mode as u8)
    }

    /// Read the operating mode
    ///
    /// # Errors
    ///
    /// Returns an error if communication with the device fails.
    pub fn operating_mode(&mut self) -> Result<OperatingMode, Error<I::Error>> {
        let bits = self.bus.read_field(Register::Mode, OPERATING_MODE)?;
        decode(bits, OperatingMode::from_bits)
    }

    /// Apply a complete configuration, one field write per setting
    ///
    /// # Errors
    ///
    /// Returns an error if communication with the device fails. Settings
    /// written before the failure stay applied.
    pub fn configure(&mut self, config: &DeviceConfig) -> Result<(), Error<I::Error>> {
        self.set_measurement_bias(config.bias)?;
        self.set_output_rate(config.rate)?;
        self.set_averaging(config.averaging)?;
        self.set_gain(config.gain)?;
        self.set_operating_mode(config.mode)
    }

    /// Read back the complete configuration
    ///
    /// # Errors
    ///
    /// Returns an error if communication fails or a field holds a reserved code.
    pub fn read_config(&mut self) -> Result<DeviceConfig, Error<I::Error>> {
        Ok(DeviceConfig {
            bias: self.measurement_bias()?,
            rate: self.output_rate()?,
            averaging: self.averaging()?,
            gain: self.gain()?,
            mode: self.operating_mode()?,
        })
    }

    /// Read the status register
    ///
    /// # Errors
    ///
    /// Returns an error if communication with the device fails.
    pub fn read_status(&mut self) -> Result<Status, Error<I::Error>> {
        let byte = self.bus.read_byte(Register::Status)?;
        Ok(Status::from_byte(byte))
    }

    /// Check the data ready bit
    ///
    /// # Errors
    ///
    /// Returns an error if communication with the device fails.
    pub fn is_ready(&mut self) -> Result<bool, Error<I::Error>> {
        self.bus.read_bit(Register::Status, registers::STATUS_READY_BIT)
    }

    /// Check the data output lock bit
    ///
    /// # Errors
    ///
    /// Returns an error if communication with the device fails.
    pub fn is_locked(&mut self) -> Result<bool, Error<I::Error>> {
        self.bus.read_bit(Register::Status, registers::STATUS_LOCK_BIT)
    }

    /// Read identification register A
    ///
    /// # Errors
    ///
    /// Returns an error if communication with the device fails.
    pub fn read_id_a(&mut self) -> Result<u8, Error<I::Error>> {
        self.bus.read_byte(Register::IdA)
    }

    /// Read identification register B
    ///
    /// # Errors
    ///
    /// Returns an error if communication with the device fails.
    pub fn read_id_b(&mut self) -> Result<u8, Error<I::Error>> {
        self.bus.read_byte(Register::IdB)
    }

    /// Read identification register C
    ///
    /// # Errors
    ///
    /// Returns an error if communication with the device fails.
    pub fn read_id_c(&mut self) -> Result<u8, Error<I::Error>> {
        self.bus.read_byte(Register::IdC)
    }

    /// Read all three identification registers
    ///
    /// # Errors
    ///
    /// Returns an error if communication with the device fails.
    pub fn read_identification(&mut self) -> Result<[u8; 3], Error<I::Error>> {
        Ok([self.read_id_a()?, self.read_id_b()?, self.read_id_c()?])
    }

    /// Check that the identification registers read `"H43"`
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidDevice`] with the bytes read on a mismatch, or
    /// an error if communication fails.
    pub fn verify_identity(&mut self) -> Result<(), Error<I::Error>> {
        let id = self.read_identification()?;
        if id == IDENTIFICATION {
            Ok(())
        } else {
            Err(Error::InvalidDevice(id))
        }
    }

    /// Burst-read the six data output registers
    fn read_data_registers(&mut self) -> Result<[u8; 6], Error<I::Error>> {
        let mut buffer = [0u8; 6];
        self.bus.read_bytes(Register::DataXHigh, &mut buffer)?;
        Ok(buffer)
    }

    /// Read calibrated axis counts
    ///
    /// One 6-byte burst; the calibration offsets are added to the decoded
    /// counts.
    ///
    /// # Errors
    ///
    /// Returns an error if communication with the device fails.
    pub fn read_axes(&mut self) -> Result<AxisTriple, Error<I::Error>> {
        let data = self.read_data_registers()?;
        Ok(AxisTriple::from_registers(data, self.calibration))
    }

    /// Read calibrated axes multiplied by [`SCALE`](crate::SCALE)
    ///
    /// # Errors
    ///
    /// Returns an error if communication with the device fails.
    pub fn read_scaled_axes(&mut self) -> Result<ScaledAxisTriple, Error<I::Error>> {
        Ok(self.read_axes()?.scaled())
    }

    /// Heading of the calibrated X/Y counts, in radians
    ///
    /// # Errors
    ///
    /// Returns an error if communication with the device fails.
    pub fn raw_heading(&mut self) -> Result<f32, Error<I::Error>> {
        Ok(self.read_axes()?.heading())
    }

    /// Heading of the scaled X/Y axes, in radians
    ///
    /// # Errors
    ///
    /// Returns an error if communication with the device fails.
    pub fn scaled_heading(&mut self) -> Result<f32, Error<I::Error>> {
        Ok(self.read_scaled_axes()?.heading())
    }

    /// Read one sample and derive raw and scaled axes and headings from it
    ///
    /// Headings are in degrees, rounded to two decimals.
    ///
    /// # Errors
    ///
    /// Returns an error if communication with the device fails.
    pub fn read_values(&mut self) -> Result<SampleReport, Error<I::Error>> {
        Ok(SampleReport::from_axes(self.read_axes()?))
    }

    /// Estimate and apply hard-iron offsets
    ///
    /// Collects `num_samples` uncalibrated samples, one per output period,
    /// while the device is rotated through all orientations, then sets each
    /// offset so that the midpoint of the observed range maps to zero.
    /// With `num_samples == 0` the offsets are reset to zero.
    ///
    /// # Errors
    ///
    /// Returns an error if communication fails. The previous offsets are kept.
    pub fn calibrate_hard_iron<D>(
        &mut self,
        num_samples: usize,
        delay: &mut D,
    ) -> Result<CalibrationOffset, Error<I::Error>>
    where
        D: embedded_hal::delay::DelayNs,
    {
        let period_ms = sample_period_ms(self.output_rate()?);
        let mut extents = Extents::new();

        for _ in 0..num_samples {
            delay.delay_ms(period_ms);
            let data = self.read_data_registers()?;
            extents.add(&AxisTriple::from_registers(data, CalibrationOffset::default()));
        }

        let calibration = extents.offsets();

        #[cfg(feature = "defmt")]
        defmt::debug!("Hard-iron offsets: {}", calibration);

        self.calibration = calibration;
        Ok(calibration)
    }
}

#[cfg(feature = "async")]
impl<I> Hmc5883lDriver<I>
where
    I: device_driver::AsyncRegisterInterface<AddressType = u8>,
{
    /// Create a new HMC5883L driver and initialize the device
    ///
    /// Runs [`init()`](Self::init), which waits for the 700 ms warm-up.
    /// Calibration offsets start at zero.
    ///
    /// # Errors
    ///
    /// Returns an error if communication with the device fails.
    pub async fn new<D>(interface: I, delay: &mut D) -> Result<Self, Error<I::Error>>
    where
        D: embedded_hal_async::delay::DelayNs,
    {
        let mut driver = Self {
            bus: RegisterBus::new(interface),
            calibration: CalibrationOffset::default(),
        };
        driver.init(delay).await?;
        Ok(driver)
    }

    /// Initialize the device with default settings
    ///
    /// See the blocking variant for the sequence.
    ///
    /// # Errors
    ///
    /// Returns an error if communication with the device fails.
    pub async fn init<D>(&mut self, delay: &mut D) -> Result<(), Error<I::Error>>
    where
        D: embedded_hal_async::delay::DelayNs,
    {
        self.bus
            .write_packed(Register::ConfigA, &INIT_CONFIG_A)
            .await?;
        self.set_gain(Gain::Gain1090).await?;
        self.set_operating_mode(OperatingMode::Continuous).await?;

        #[cfg(feature = "defmt")]
        defmt::debug!("HMC5883L configured, warming up for {} ms", WARM_UP_MS);

        delay.delay_ms(WARM_UP_MS).await;
        Ok(())
    }

    /// Set the measurement bias
    ///
    /// # Errors
    ///
    /// Returns an error if communication with the device fails.
    pub async fn set_measurement_bias(
        &mut self,
        bias: MeasurementBias,
    ) -> Result<(), Error<I::Error>> {
        self.bus
            .write_field(Register::ConfigA, MEASUREMENT_BIAS, bias as u8)
            .await
    }

    /// Read the measurement bias
    ///
    /// # Errors
    ///
    /// Returns an error if communication fails or the device reports the
    /// reserved code.
    pub async fn measurement_bias(&mut self) -> Result<MeasurementBias, Error<I::Error>> {
        let bits = self
            .bus
            .read_field(Register::ConfigA, MEASUREMENT_BIAS)
            .await?;
        decode(bits, MeasurementBias::from_bits)
    }

    /// Set the data output rate
    ///
    /// # Errors
    ///
    /// Returns an error if communication with the device fails.
    pub async fn set_output_rate(&mut self, rate: OutputRate) -> Result<(), Error<I::Error>> {
        self.bus
            .write_field(Register::ConfigA, OUTPUT_RATE, rate as u8)
            .await
    }

    /// Read the data output rate
    ///
    /// # Errors
    ///
    /// Returns an error if communication fails or the device reports the
    /// reserved code.
    pub async fn output_rate(&mut self) -> Result<OutputRate, Error<I::Error>> {
        let bits = self.bus.read_field(Register::ConfigA, OUTPUT_RATE).await?;
        decode(bits, OutputRate::from_bits)
    }

    /// Set the number of samples averaged per output
    ///
    /// # Errors
    ///
    /// Returns an error if communication with the device fails.
    pub async fn set_averaging(&mut self, averaging: Averaging) -> Result<(), Error<I::Error>> {
        self.bus
            .write_field(Register::ConfigA, AVERAGING, averaging as u8)
            .await
    }

    /// Read the number of samples averaged per output
    ///
    /// # Errors
    ///
    /// Returns an error if communication with the device fails.
    pub async fn averaging(&mut self) -> Result<Averaging, Error<I::Error>> {
        let bits = self.bus.read_field(Register::ConfigA, AVERAGING).await?;
        decode(bits, Averaging::from_bits)
    }

    /// Set the gain
    ///
    /// # Errors
    ///
    /// Returns an error if communication with the device fails.
    pub async fn set_gain(&mut self, gain: Gain) -> Result<(), Error<I::Error>> {
        #[cfg(feature = "defmt")]
        defmt::debug!("Setting gain to {} LSb/Gauss", gain.lsb_per_gauss());

        self.bus
            .write_field(Register::ConfigB, GAIN, gain as u8)
            .await
    }

    /// Read the gain
    ///
    /// # Errors
    ///
    /// Returns an error if communication with the device fails.
    pub async fn gain(&mut self) -> Result<Gain, Error<I::Error>> {
        let bits = self.bus.read_field(Register::ConfigB, GAIN).await?;
        decode(bits, Gain::from_bits)
    }

    /// Set the operating mode
    ///
    /// # Errors
    ///
    /// Returns an error if communication with the device fails.
    pub async fn set_operating_mode(
        &mut self,
        mode: OperatingMode,
    ) -> Result<(), Error<I::Error>> {
        #[cfg(feature = "defmt")]
        defmt::debug!("Setting operating mode to {}", mode);

        self.bus
            .write_field(Register::Mode, OPERATING_MODE, mode as u8)
            .await
    }

    /// Read the operating mode
    ///
    /// # Errors
    ///
    /// Returns an error if communication with the device fails.
    pub async fn operating_mode(&mut self) -> Result<OperatingMode, Error<I::Error>> {
        let bits = self
            .bus
            .read_field(Register::Mode, OPERATING_MODE)
            .await?;
        decode(bits, OperatingMode::from_bits)
    }

    /// Apply a complete configuration, one field write per setting
    ///
    /// # Errors
    ///
    /// Returns an error if communication with the device fails.
    pub async fn configure(&mut self, config: &DeviceConfig) -> Result<(), Error<I::Error>> {
        self.set_measurement_bias(config.bias).await?;
        self.set_output_rate(config.rate).await?;
        self.set_averaging(config.averaging).await?;
        self.set_gain(config.gain).await?;
        self.set_operating_mode(config.mode).await
    }

    /// Read back the complete configuration
    ///
    /// # Errors
    ///
    /// Returns an error if communication fails or a field holds a reserved code.
    pub async fn read_config(&mut self) -> Result<DeviceConfig, Error<I::Error>> {
        Ok(DeviceConfig {
            bias: self.measurement_bias().await?,
            rate: self.output_rate().await?,
            averaging: self.averaging().await?,
            gain: self.gain().await?,
            mode: self.operating_mode().await?,
        })
    }

    /// Read the status register
    ///
    /// # Errors
    ///
    /// Returns an error if communication with the device fails.
    pub async fn read_status(&mut self) -> Result<Status, Error<I::Error>> {
        let byte = self.bus.read_byte(Register::Status).await?;
        Ok(Status::from_byte(byte))
    }

    /// Check the data ready bit
    ///
    /// # Errors
    ///
    /// Returns an error if communication with the device fails.
    pub async fn is_ready(&mut self) -> Result<bool, Error<I::Error>> {
        self.bus
            .read_bit(Register::Status, registers::STATUS_READY_BIT)
            .await
    }

    /// Check the data output lock bit
    ///
    /// # Errors
    ///
    /// Returns an error if communication with the device fails.
    pub async fn is_locked(&mut self) -> Result<bool, Error<I::Error>> {
        self.bus
            .read_bit(Register::Status, registers::STATUS_LOCK_BIT)
            .await
    }

    /// Read identification register A
    ///
    /// # Errors
    ///
    /// Returns an error if communication with the device fails.
    pub async fn read_id_a(&mut self) -> Result<u8, Error<I::Error>> {
        self.bus.read_byte(Register::IdA).await
    }

    /// Read identification register B
    ///
    /// # Errors
    ///
    /// Returns an error if communication with the device fails.
    pub async fn read_id_b(&mut self) -> Result<u8, Error<I::Error>> {
        self.bus.read_byte(Register::IdB).await
    }

    /// Read identification register C
    ///
    /// # Errors
    ///
    /// Returns an error if communication with the device fails.
    pub async fn read_id_c(&mut self) -> Result<u8, Error<I::Error>> {
        self.bus.read_byte(Register::IdC).await
    }

    /// Read all three identification registers
    ///
    /// # Errors
    ///
    /// Returns an error if communication with the device fails.
    pub async fn read_identification(&mut self) -> Result<[u8; 3], Error<I::Error>> {
        Ok([
            self.read_id_a().await?,
            self.read_id_b().await?,
            self.read_id_c().await?,
        ])
    }

    /// Check that the identification registers read `"H43"`
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidDevice`] with the bytes read on a mismatch, or
    /// an error if communication fails.
    pub async fn verify_identity(&mut self) -> Result<(), Error<I::Error>> {
        let id = self.read_identification().await?;
        if id == IDENTIFICATION {
            Ok(())
        } else {
            Err(Error::InvalidDevice(id))
        }
    }

    async fn read_data_registers(&mut self) -> Result<[u8; 6], Error<I::Error>> {
        let mut buffer = [0u8; 6];
        self.bus
            .read_bytes(Register::DataXHigh, &mut buffer)
            .await?;
        Ok(buffer)
    }

    /// Read calibrated axis counts
    ///
    /// # Errors
    ///
    /// Returns an error if communication with the device fails.
    pub async fn read_axes(&mut self) -> Result<AxisTriple, Error<I::Error>> {
        let data = self.read_data_registers().await?;
        Ok(AxisTriple::from_registers(data, self.calibration))
    }

    /// Read calibrated axes multiplied by [`SCALE`](crate::SCALE)
    ///
    /// # Errors
    ///
    /// Returns an error if communication with the device fails.
    pub async fn read_scaled_axes(&mut self) -> Result<ScaledAxisTriple, Error<I::Error>> {
        Ok(self.read_axes().await?.scaled())
    }

    /// Heading of the calibrated X/Y counts, in radians
    ///
    /// # Errors
    ///
    /// Returns an error if communication with the device fails.
    pub async fn raw_heading(&mut self) -> Result<f32, Error<I::Error>> {
        Ok(self.read_axes().await?.heading())
    }

    /// Heading of the scaled X/Y axes, in radians
    ///
    /// # Errors
    ///
    /// Returns an error if communication with the device fails.
    pub async fn scaled_heading(&mut self) -> Result<f32, Error<I::Error>> {
        Ok(self.read_scaled_axes().await?.heading())
    }

    /// Read one sample and derive raw and scaled axes and headings from it
    ///
    /// # Errors
    ///
    /// Returns an error if communication with the device fails.
    pub async fn read_values(&mut self) -> Result<SampleReport, Error<I::Error>> {
        Ok(SampleReport::from_axes(self.read_axes().await?))
    }

    /// Estimate and apply hard-iron offsets
    ///
    /// # Errors
    ///
    /// Returns an error if communication fails. The previous offsets are kept.
    pub async fn calibrate_hard_iron<D>(
        &mut self,
        num_samples: usize,
        delay: &mut D,
    ) -> Result<CalibrationOffset, Error<I::Error>>
    where
        D: embedded_hal_async::delay::DelayNs,
    {
        let period_ms = sample_period_ms(self.output_rate().await?);
        let mut extents = Extents::new();

        for _ in 0..num_samples {
            delay.delay_ms(period_ms).await;
            let data = self.read_data_registers().await?;
            extents.add(&AxisTriple::from_registers(data, CalibrationOffset::default()));
        }

        let calibration = extents.offsets();

        #[cfg(feature = "defmt")]
        defmt::debug!("Hard-iron offsets: {}", calibration);

        self.calibration = calibration;
        Ok(calibration)
    }
}
