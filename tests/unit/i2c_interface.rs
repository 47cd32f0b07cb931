//! Unit tests for the I2C transport

use crate::common::MockDelay;
use embedded_hal::i2c::{ErrorKind, ErrorType, I2c, Operation as I2cOperation};
use hmc5883l::{AxisTriple, Hmc5883lDriver, I2C_ADDRESS, I2cInterface};

/// One recorded bus transfer
#[derive(Debug, Clone, PartialEq)]
enum Transfer {
    Write(u8, Vec<u8>),
    WriteRead(u8, Vec<u8>, usize),
}

/// I2C bus with an auto-incrementing register pointer
struct MockI2c {
    registers: [u8; 13],
    pointer: usize,
    transfers: Vec<Transfer>,
    nak: bool,
}

impl MockI2c {
    fn new() -> Self {
        let mut registers = [0u8; 13];
        registers[0x00] = 0x10;
        registers[0x01] = 0x20;
        registers[0x02] = 0x01;
        registers[0x0A..].copy_from_slice(b"H43");
        Self {
            registers,
            pointer: 0,
            transfers: Vec::new(),
            nak: false,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
struct MockI2cError;

impl embedded_hal::i2c::Error for MockI2cError {
    fn kind(&self) -> ErrorKind {
        ErrorKind::Other
    }
}

impl ErrorType for MockI2c {
    type Error = MockI2cError;
}

impl I2c for MockI2c {
    fn transaction(
        &mut self,
        address: u8,
        operations: &mut [I2cOperation<'_>],
    ) -> Result<(), Self::Error> {
        if self.nak {
            return Err(MockI2cError);
        }

        let mut written = Vec::new();
        let mut read_len = None;

        for operation in operations.iter_mut() {
            match operation {
                I2cOperation::Write(bytes) => {
                    written.extend_from_slice(*bytes);
                    if let Some((&register, data)) = bytes.split_first() {
                        self.pointer = usize::from(register);
                        for &byte in data {
                            self.registers[self.pointer % 13] = byte;
                            self.pointer += 1;
                        }
                    }
                }
                I2cOperation::Read(buffer) => {
                    for byte in buffer.iter_mut() {
                        *byte = self.registers[self.pointer % 13];
                        self.pointer += 1;
                    }
                    read_len = Some(buffer.len());
                }
            }
        }

        self.transfers.push(match read_len {
            Some(len) => Transfer::WriteRead(address, written, len),
            None => Transfer::Write(address, written),
        });
        Ok(())
    }
}

#[test]
fn test_default_address() {
    let interface = I2cInterface::default(MockI2c::new());
    assert_eq!(interface.address(), 0x1E);
    assert_eq!(I2C_ADDRESS, 0x1E);

    let interface = I2cInterface::new(MockI2c::new(), 0x1F);
    assert_eq!(interface.address(), 0x1F);
}

#[test]
fn test_init_framing() {
    let interface = I2cInterface::default(MockI2c::new());
    let driver = Hmc5883lDriver::new(interface, &mut MockDelay::default()).unwrap();
    let i2c = driver.release().release();

    assert_eq!(
        i2c.transfers,
        vec![
            Transfer::Write(0x1E, vec![0x00, 0x70]),
            Transfer::WriteRead(0x1E, vec![0x01], 1),
            Transfer::Write(0x1E, vec![0x01, 0x20]),
            Transfer::WriteRead(0x1E, vec![0x02], 1),
            Transfer::Write(0x1E, vec![0x02, 0x00]),
        ]
    );
    assert_eq!(&i2c.registers[..3], &[0x70, 0x20, 0x00]);
}

#[test]
fn test_axes_burst_framing() {
    let mut i2c = MockI2c::new();
    i2c.registers[0x03..0x09].copy_from_slice(&[0x00, 0x0A, 0x00, 0x14, 0x00, 0x1E]);

    let mut driver =
        Hmc5883lDriver::new(I2cInterface::default(i2c), &mut MockDelay::default()).unwrap();
    let raw = driver.read_axes().unwrap();
    assert_eq!(raw, AxisTriple { x: 10, y: 30, z: 20 });

    let i2c = driver.release().release();
    assert_eq!(
        i2c.transfers.last(),
        Some(&Transfer::WriteRead(0x1E, vec![0x03], 6))
    );
}

#[test]
fn test_identification_over_i2c() {
    let mut driver =
        Hmc5883lDriver::new(I2cInterface::default(MockI2c::new()), &mut MockDelay::default())
            .unwrap();
    driver.verify_identity().unwrap();
}

#[test]
fn test_bus_error_surfaces() {
    let mut i2c = MockI2c::new();
    i2c.nak = true;

    let result = Hmc5883lDriver::new(I2cInterface::default(i2c), &mut MockDelay::default());

    assert!(matches!(result, Err(hmc5883l::Error::Bus(MockI2cError))));
}
