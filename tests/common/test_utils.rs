//! Test utilities and helper functions

use crate::common::mock_interface::MockInterface;
use hmc5883l::{Hmc5883lDriver, RegisterBus};

/// Mock delay implementation for testing
///
/// Does not sleep; records the total requested delay so tests can check
/// timing requirements.
#[derive(Debug, Clone, Copy, Default)]
pub struct MockDelay {
    /// Total requested delay in nanoseconds
    pub total_ns: u64,
}

impl MockDelay {
    /// Total requested delay in milliseconds
    pub fn total_ms(&self) -> u64 {
        self.total_ns / 1_000_000
    }
}

impl embedded_hal::delay::DelayNs for MockDelay {
    fn delay_ns(&mut self, ns: u32) {
        self.total_ns += u64::from(ns);
    }

    fn delay_us(&mut self, us: u32) {
        self.total_ns += u64::from(us) * 1_000;
    }

    fn delay_ms(&mut self, ms: u32) {
        self.total_ns += u64::from(ms) * 1_000_000;
    }
}

/// Create an initialized mock driver for testing
///
/// Returns (driver, interface) where interface is a clone that shares state
/// with the driver. The operations log is cleared after initialization.
pub fn create_mock_driver() -> (Hmc5883lDriver<MockInterface>, MockInterface) {
    let interface = MockInterface::new();
    let interface_clone = interface.clone();
    let driver = Hmc5883lDriver::new(interface, &mut MockDelay::default())
        .expect("Failed to create mock driver");
    interface_clone.clear_operations();
    (driver, interface_clone)
}

/// Create a register bus over a fresh mock interface
#[allow(dead_code)]
pub fn create_mock_bus() -> (RegisterBus<MockInterface>, MockInterface) {
    let interface = MockInterface::new();
    let interface_clone = interface.clone();
    (RegisterBus::new(interface), interface_clone)
}

/// Assert that two floating point values are approximately equal
#[allow(dead_code)]
pub fn assert_float_eq(a: f32, b: f32, epsilon: f32) {
    let diff = (a - b).abs();
    assert!(
        diff < epsilon,
        "Values not equal within epsilon: {} vs {} (diff: {}, epsilon: {})",
        a,
        b,
        diff,
        epsilon
    );
}
