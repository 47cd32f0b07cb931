//! Register access over the byte transport
//!
//! [`RegisterBus`] wraps a transport implementing the `device-driver`
//! register interface and adds byte, burst and bit-field access on top of it.
//!
//! Field writes are read-modify-write sequences and are **not** atomic: two
//! drivers sharing one physical device must serialize access externally.
//! Invalid [`BitField`]s are rejected before any bus transaction, so a failed
//! call never leaves a partially applied mask in the register.

use crate::field::{self, BitField, CRUMBS};
use crate::registers::Register;
use crate::Error;

#[cfg(not(feature = "async"))]
use device_driver::RegisterInterface;

/// Byte and bit-field access to device registers
pub struct RegisterBus<I> {
    interface: I,
}

impl<I> RegisterBus<I> {
    /// Wrap a transport
    pub const fn new(interface: I) -> Self {
        Self { interface }
    }

    /// Consume the bus and return the transport
    pub fn release(self) -> I {
        self.interface
    }
}

/// Validate a field, yielding the error to report otherwise
fn checked<E>(field: BitField) -> Result<BitField, Error<E>> {
    if field.is_valid() {
        Ok(field)
    } else {
        Err(Error::InvalidField(field))
    }
}

#[cfg(not(feature = "async"))]
impl<I> RegisterBus<I>
where
    I: RegisterInterface<AddressType = u8>,
{
    /// Read one register byte
    ///
    /// # Errors
    ///
    /// Returns an error if communication with the device fails.
    pub fn read_byte(&mut self, register: Register) -> Result<u8, Error<I::Error>> {
        let mut buffer = [0u8; 1];
        self.interface.read_register(register.addr(), 8, &mut buffer)?;
        Ok(buffer[0])
    }

    /// Write one register byte
    ///
    /// # Errors
    ///
    /// Returns an error if communication with the device fails.
    pub fn write_byte(&mut self, register: Register, value: u8) -> Result<(), Error<I::Error>> {
        self.interface.write_register(register.addr(), 8, &[value])?;
        Ok(())
    }

    /// Read consecutive registers in one transaction, starting at `start`
    ///
    /// # Errors
    ///
    /// Returns an error if communication with the device fails.
    pub fn read_bytes(
        &mut self,
        start: Register,
        buffer: &mut [u8],
    ) -> Result<(), Error<I::Error>> {
        let size_bits = u32::try_from(buffer.len() * 8).unwrap_or(u32::MAX);
        self.interface.read_register(start.addr(), size_bits, buffer)?;
        Ok(())
    }

    /// Read a bit field
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidField`] if the field does not fit in one byte
    /// (no bus access is made), or an error if communication fails.
    pub fn read_field(
        &mut self,
        register: Register,
        field: BitField,
    ) -> Result<u8, Error<I::Error>> {
        let field = checked(field)?;
        let byte = self.read_byte(register)?;
        field.extract(byte).ok_or(Error::InvalidField(field))
    }

    /// Read-modify-write a bit field
    ///
    /// Bits of `value` above the field width are dropped; all other bits of
    /// the register are preserved.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidField`] if the field does not fit in one byte
    /// (no bus access is made), or an error if communication fails.
    pub fn write_field(
        &mut self,
        register: Register,
        field: BitField,
        value: u8,
    ) -> Result<(), Error<I::Error>> {
        let field = checked(field)?;
        let current = self.read_byte(register)?;
        let updated = field
            .insert(current, value)
            .ok_or(Error::InvalidField(field))?;

        #[cfg(feature = "defmt")]
        defmt::trace!(
            "write_field {}: {=u8:#x} -> {=u8:#x}",
            register,
            current,
            updated
        );

        self.write_byte(register, updated)
    }

    /// Compose several fields onto a zeroed byte and write it in one transaction
    ///
    /// No read is made: bits not covered by `fields` are written as zero.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidField`] for the first invalid field (no bus
    /// access is made), or an error if communication fails.
    pub fn write_packed(
        &mut self,
        register: Register,
        fields: &[(BitField, u8)],
    ) -> Result<(), Error<I::Error>> {
        let byte = field::pack_fields(fields).map_err(Error::InvalidField)?;
        self.write_byte(register, byte)
    }

    /// Write four 2-bit values as `b0<<6 | b1<<4 | b2<<2 | b3` in one transaction
    ///
    /// # Errors
    ///
    /// Returns an error if communication with the device fails.
    pub fn write_crumbs(
        &mut self,
        register: Register,
        b0: u8,
        b1: u8,
        b2: u8,
        b3: u8,
    ) -> Result<(), Error<I::Error>> {
        self.write_packed(
            register,
            &[(CRUMBS[0], b0), (CRUMBS[1], b1), (CRUMBS[2], b2), (CRUMBS[3], b3)],
        )
    }

    /// Read a single bit
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidField`] if `bit > 7`, or an error if
    /// communication fails.
    pub fn read_bit(&mut self, register: Register, bit: u8) -> Result<bool, Error<I::Error>> {
        Ok(self.read_field(register, BitField::bit(bit))? != 0)
    }
}

#[cfg(feature = "async")]
impl<I> RegisterBus<I>
where
    I: device_driver::AsyncRegisterInterface<AddressType = u8>,
{
    /// Read one register byte
    ///
    /// # Errors
    ///
    /// Returns an error if communication with the device fails.
    pub async fn read_byte(&mut self, register: Register) -> Result<u8, Error<I::Error>> {
        let mut buffer = [0u8; 1];
        self.interface
            .read_register(register.addr(), 8, &mut buffer)
            .await?;
        Ok(buffer[0])
    }

    /// Write one register byte
    ///
    /// # Errors
    ///
    /// Returns an error if communication with the device fails.
    pub async fn write_byte(
        &mut self,
        register: Register,
        value: u8,
    ) -> Result<(), Error<I::Error>> {
        self.interface
            .write_register(register.addr(), 8, &[value])
            .await?;
        Ok(())
    }

    /// Read consecutive registers in one transaction, starting at `start`
    ///
    /// # Errors
    ///
    /// Returns an error if communication with the device fails.
    pub async fn read_bytes(
        &mut self,
        start: Register,
        buffer: &mut [u8],
    ) -> Result<(), Error<I::Error>> {
        let size_bits = u32::try_from(buffer.len() * 8).unwrap_or(u32::MAX);
        self.interface
            .read_register(start.addr(), size_bits, buffer)
            .await?;
        Ok(())
    }

    /// Read a bit field
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidField`] if the field does not fit in one byte
    /// (no bus access is made), or an error if communication fails.
    pub async fn read_field(
        &mut self,
        register: Register,
        field: BitField,
    ) -> Result<u8, Error<I::Error>> {
        let field = checked(field)?;
        let byte = self.read_byte(register).await?;
        field.extract(byte).ok_or(Error::InvalidField(field))
    }

    /// Read-modify-write a bit field
    ///
    /// Bits of `value` above the field width are dropped; all other bits of
    /// the register are preserved.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidField`] if the field does not fit in one byte
    /// (no bus access is made), or an error if communication fails.
    pub async fn write_field(
        &mut self,
        register: Register,
        field: BitField,
        value: u8,
    ) -> Result<(), Error<I::Error>> {
        let field = checked(field)?;
        let current = self.read_byte(register).await?;
        let updated = field
            .insert(current, value)
            .ok_or(Error::InvalidField(field))?;

        #[cfg(feature = "defmt")]
        defmt::trace!(
            "write_field {}: {=u8:#x} -> {=u8:#x}",
            register,
            current,
            updated
        );

        self.write_byte(register, updated).await
    }

    /// Compose several fields onto a zeroed byte and write it in one transaction
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidField`] for the first invalid field (no bus
    /// access is made), or an error if communication fails.
    pub async fn write_packed(
        &mut self,
        register: Register,
        fields: &[(BitField, u8)],
    ) -> Result<(), Error<I::Error>> {
        let byte = field::pack_fields(fields).map_err(Error::InvalidField)?;
        self.write_byte(register, byte).await
    }

    /// Write four 2-bit values as `b0<<6 | b1<<4 | b2<<2 | b3` in one transaction
    ///
    /// # Errors
    ///
    /// Returns an error if communication with the device fails.
    pub async fn write_crumbs(
        &mut self,
        register: Register,
        b0: u8,
        b1: u8,
        b2: u8,
        b3: u8,
    ) -> Result<(), Error<I::Error>> {
        self.write_packed(
            register,
            &[(CRUMBS[0], b0), (CRUMBS[1], b1), (CRUMBS[2], b2), (CRUMBS[3], b3)],
        )
        .await
    }

    /// Read a single bit
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidField`] if `bit > 7`, or an error if
    /// communication fails.
    pub async fn read_bit(
        &mut self,
        register: Register,
        bit: u8,
    ) -> Result<bool, Error<I::Error>> {
        Ok(self.read_field(register, BitField::bit(bit)).await? != 0)
    }
}
