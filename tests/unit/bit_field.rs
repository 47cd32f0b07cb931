//! Unit tests for bit-field register access

use crate::common::{MockError, Operation, create_mock_bus, create_mock_driver};
use hmc5883l::registers::{AVERAGING, MEASUREMENT_BIAS, OUTPUT_RATE};
use hmc5883l::{BitField, Error, Register};

#[test]
fn test_write_then_read_preserves_other_bits() {
    let (mut bus, interface) = create_mock_bus();

    for high_bit in 0..8u8 {
        for length in 1..=high_bit + 1 {
            let field = BitField::new(high_bit, length);
            let mask = field.mask().unwrap();

            for initial in [0x00, 0xFF, 0xA5, 0x5A, 0x81] {
                for value in 0..=u8::MAX {
                    interface.set_register(0x00, initial);
                    bus.write_field(Register::ConfigA, field, value).unwrap();

                    let read_back = bus.read_field(Register::ConfigA, field).unwrap();
                    assert_eq!(read_back, value & field.max_value(), "{field:?} {value}");

                    let after = interface.get_register(0x00);
                    assert_eq!(after & !mask, initial & !mask, "{field:?} {initial:#04x}");
                }
            }
            interface.clear_operations();
        }
    }
}

#[test]
fn test_read_field_extracts_shifted_value() {
    let (mut bus, interface) = create_mock_bus();
    interface.set_register(0x00, 0b0111_0001);

    assert_eq!(bus.read_field(Register::ConfigA, AVERAGING).unwrap(), 0b11);
    assert_eq!(bus.read_field(Register::ConfigA, OUTPUT_RATE).unwrap(), 0b100);
    assert_eq!(
        bus.read_field(Register::ConfigA, MEASUREMENT_BIAS).unwrap(),
        0b01
    );
}

#[test]
fn test_write_field_is_read_modify_write() {
    let (mut bus, interface) = create_mock_bus();
    // Bits 4..3 hold 0b00; bits 1 and 5 lie outside the field
    interface.set_register(0x01, 0b1010_0010);
    interface.clear_operations();

    bus.write_field(Register::ConfigB, BitField::new(4, 2), 0b01)
        .unwrap();

    assert_eq!(
        interface.operations(),
        vec![
            Operation::ReadRegister {
                address: 0x01,
                value: 0b1010_0010
            },
            Operation::WriteRegister {
                address: 0x01,
                value: 0b1010_1010
            },
        ]
    );

    // Clearing: writing 0b10 over 0b01 drops bit 3 and sets bit 4
    interface.clear_operations();
    bus.write_field(Register::ConfigB, BitField::new(4, 2), 0b10)
        .unwrap();
    assert_eq!(interface.get_register(0x01), 0b1011_0010);
}

#[test]
fn test_oversized_value_is_truncated() {
    let (mut bus, interface) = create_mock_bus();
    interface.set_register(0x00, 0x00);

    bus.write_field(Register::ConfigA, MEASUREMENT_BIAS, 0xFF)
        .unwrap();

    assert_eq!(interface.get_register(0x00), 0b0000_0011);
}

#[test]
fn test_invalid_field_rejected_before_bus_access() {
    let (mut bus, interface) = create_mock_bus();
    interface.clear_operations();

    let invalid = [
        BitField::new(1, 3),
        BitField::new(4, 0),
        BitField::new(8, 1),
        BitField::new(200, 8),
    ];

    for field in invalid {
        assert!(matches!(
            bus.read_field(Register::ConfigA, field),
            Err(Error::InvalidField(f)) if f == field
        ));
        assert!(matches!(
            bus.write_field(Register::ConfigA, field, 1),
            Err(Error::InvalidField(f)) if f == field
        ));
        assert!(matches!(
            bus.write_packed(Register::ConfigA, &[(AVERAGING, 1), (field, 1)]),
            Err(Error::InvalidField(f)) if f == field
        ));
    }

    assert!(interface.operations().is_empty());
    assert!(interface.read_transactions().is_empty());
}

#[test]
fn test_failed_read_leaves_register_untouched() {
    let (mut bus, interface) = create_mock_bus();
    interface.set_register(0x00, 0x5A);
    interface.clear_operations();
    interface.fail_next_read();

    let result = bus.write_field(Register::ConfigA, OUTPUT_RATE, 0b111);

    assert!(matches!(result, Err(Error::Bus(MockError::Communication))));
    assert_eq!(interface.write_count(), 0);
    assert_eq!(interface.get_register(0x00), 0x5A);
}

#[test]
fn test_packed_write_matches_sequential_field_writes() {
    for averaging in 0..4u8 {
        for rate in 0..8u8 {
            for bias in 0..4u8 {
                let (mut packed_bus, packed) = create_mock_bus();
                let (mut field_bus, fielded) = create_mock_bus();
                fielded.set_register(0x00, 0x00);
                packed.clear_operations();

                packed_bus
                    .write_packed(
                        Register::ConfigA,
                        &[(AVERAGING, averaging), (OUTPUT_RATE, rate), (MEASUREMENT_BIAS, bias)],
                    )
                    .unwrap();

                field_bus
                    .write_field(Register::ConfigA, AVERAGING, averaging)
                    .unwrap();
                field_bus
                    .write_field(Register::ConfigA, OUTPUT_RATE, rate)
                    .unwrap();
                field_bus
                    .write_field(Register::ConfigA, MEASUREMENT_BIAS, bias)
                    .unwrap();

                assert_eq!(packed.get_register(0x00), fielded.get_register(0x00));
                // One transaction, no read
                assert_eq!(packed.operations().len(), 1);
                assert_eq!(packed.write_count(), 1);
            }
        }
    }
}

#[test]
fn test_write_crumbs() {
    let (mut bus, interface) = create_mock_bus();
    interface.clear_operations();

    bus.write_crumbs(Register::ConfigA, 0, 3, 0, 2).unwrap();

    assert_eq!(
        interface.operations(),
        vec![Operation::WriteRegister {
            address: 0x00,
            value: 0b0011_0010
        }]
    );

    // Crumbs are 2-bit fields; packing them equals per-field writes
    let (mut field_bus, fielded) = create_mock_bus();
    fielded.set_register(0x00, 0x00);
    for (field, value) in hmc5883l::field::CRUMBS.into_iter().zip([0, 3, 0, 2]) {
        field_bus.write_field(Register::ConfigA, field, value).unwrap();
    }
    assert_eq!(fielded.get_register(0x00), interface.get_register(0x00));
}

#[test]
fn test_read_bit() {
    let (mut bus, interface) = create_mock_bus();
    interface.set_register(0x09, 0b10);

    assert!(!bus.read_bit(Register::Status, 0).unwrap());
    assert!(bus.read_bit(Register::Status, 1).unwrap());
    assert!(matches!(
        bus.read_bit(Register::Status, 8),
        Err(Error::InvalidField(_))
    ));
}

#[test]
fn test_getters_never_write() {
    let (mut driver, interface) = create_mock_driver();
    interface.fail_all_writes(true);

    driver.measurement_bias().unwrap();
    driver.output_rate().unwrap();
    driver.averaging().unwrap();
    driver.gain().unwrap();
    driver.operating_mode().unwrap();
    driver.read_config().unwrap();
    driver.read_status().unwrap();
    driver.is_ready().unwrap();
    driver.is_locked().unwrap();
    driver.read_id_a().unwrap();
    driver.read_id_b().unwrap();
    driver.read_id_c().unwrap();
    driver.verify_identity().unwrap();
    driver.read_axes().unwrap();
    driver.read_scaled_axes().unwrap();
    driver.raw_heading().unwrap();
    driver.scaled_heading().unwrap();
    driver.read_values().unwrap();

    assert_eq!(interface.write_count(), 0);

    // Sanity check: the bus really is read-only
    assert!(matches!(
        driver.set_gain(hmc5883l::Gain::Gain230),
        Err(Error::Bus(MockError::WriteRejected))
    ));
}
