//! Sub-byte register fields
//!
//! HMC5883L configuration lives in bit fields packed into single register
//! bytes. A [`BitField`] names such a field by its highest bit and its width,
//! matching the way the datasheet tables are laid out (e.g. `MA1..MA0` is
//! bits 6..5, so `high_bit = 6`, `length = 2`).
//!
//! The functions here are pure; bus I/O is done by [`crate::bus::RegisterBus`].

/// A contiguous range of bits inside one register byte
///
/// Occupies bits `[high_bit - length + 1, high_bit]`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct BitField {
    /// Index of the most significant bit of the field (0..=7)
    pub high_bit: u8,
    /// Width of the field in bits (1..=8)
    pub length: u8,
}

impl BitField {
    /// Describe a field without validating it
    ///
    /// Validation happens when the field is used; an invalid field is
    /// rejected before any bus transaction is issued.
    #[must_use]
    pub const fn new(high_bit: u8, length: u8) -> Self {
        Self { high_bit, length }
    }

    /// A single-bit field
    #[must_use]
    pub const fn bit(bit: u8) -> Self {
        Self::new(bit, 1)
    }

    /// Check that the field fits in one byte
    #[must_use]
    pub const fn is_valid(self) -> bool {
        self.high_bit <= 7 && self.length >= 1 && self.length <= self.high_bit + 1
    }

    /// Position of the least significant bit of the field
    ///
    /// Returns `None` for an invalid field.
    #[must_use]
    pub const fn shift(self) -> Option<u8> {
        if self.is_valid() {
            Some(self.high_bit + 1 - self.length)
        } else {
            None
        }
    }

    /// Mask selecting the field bits in place
    ///
    /// Returns `None` for an invalid field.
    #[must_use]
    pub const fn mask(self) -> Option<u8> {
        match self.shift() {
            // `length` may be 8, so build the mask in u16
            Some(shift) => Some((((1u16 << self.length) - 1) << shift) as u8),
            None => None,
        }
    }

    /// Largest value the field can hold
    #[must_use]
    pub const fn max_value(self) -> u8 {
        if self.length >= 8 {
            u8::MAX
        } else {
            (1u8 << self.length) - 1
        }
    }

    /// Extract the field value from a register byte
    ///
    /// Returns `None` for an invalid field.
    #[must_use]
    pub const fn extract(self, byte: u8) -> Option<u8> {
        match (self.mask(), self.shift()) {
            (Some(mask), Some(shift)) => Some((byte & mask) >> shift),
            _ => None,
        }
    }

    /// Replace the field bits of `byte` with `value`
    ///
    /// Bits of `value` above the field width are dropped. All bits outside
    /// the field keep their value. Returns `None` for an invalid field.
    #[must_use]
    pub const fn insert(self, byte: u8, value: u8) -> Option<u8> {
        match (self.mask(), self.shift()) {
            (Some(mask), Some(shift)) => {
                let placed = (((value as u16) << shift) as u8) & mask;
                Some((byte & !mask) | placed)
            }
            _ => None,
        }
    }
}

/// The four 2-bit slots of a byte, most significant first
pub const CRUMBS: [BitField; 4] = [
    BitField::new(7, 2),
    BitField::new(5, 2),
    BitField::new(3, 2),
    BitField::new(1, 2),
];

/// Pack four 2-bit values into one byte as `b0<<6 | b1<<4 | b2<<2 | b3`
///
/// Each value is truncated to its low two bits.
#[must_use]
pub const fn pack_crumbs(b0: u8, b1: u8, b2: u8, b3: u8) -> u8 {
    ((b0 & 0b11) << 6) | ((b1 & 0b11) << 4) | ((b2 & 0b11) << 2) | (b3 & 0b11)
}

/// Compose several field values onto a zeroed byte
///
/// Later entries win where fields overlap. Returns the first invalid field
/// as the error.
pub fn pack_fields(fields: &[(BitField, u8)]) -> Result<u8, BitField> {
    fields.iter().try_fold(0u8, |byte, &(field, value)| {
        field.insert(byte, value).ok_or(field)
    })
}
