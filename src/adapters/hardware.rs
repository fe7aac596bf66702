//! Hardware adapter: bridges the dosing motor drivers to the domain.
//!
//! Owns one [`MotorDriver`] per hopper and exposes them through
//! [`MotorPort`].  The drivers are simulated, so this is also the adapter
//! the binary runs with.

use crate::app::ports::MotorPort;
use crate::drivers::motor::{Motor, MotorDriver};

/// Concrete adapter that combines all motors behind the port trait.
pub struct MotorBank {
    corn: MotorDriver,
    alfalfa: MotorDriver,
}

impl Default for MotorBank {
    fn default() -> Self {
        Self::new()
    }
}

impl MotorBank {
    /// Every motor starts stopped.
    pub fn new() -> Self {
        Self {
            corn: MotorDriver::new(Motor::Corn),
            alfalfa: MotorDriver::new(Motor::Alfalfa),
        }
    }

    fn driver(&self, motor: Motor) -> &MotorDriver {
        match motor {
            Motor::Corn => &self.corn,
            Motor::Alfalfa => &self.alfalfa,
        }
    }

    fn driver_mut(&mut self, motor: Motor) -> &mut MotorDriver {
        match motor {
            Motor::Corn => &mut self.corn,
            Motor::Alfalfa => &mut self.alfalfa,
        }
    }
}

// ── MotorPort implementation ──────────────────────────────────

impl MotorPort for MotorBank {
    fn set_motor(&mut self, motor: Motor, on: bool) {
        self.driver_mut(motor).set(on);
    }

    fn is_on(&self, motor: Motor) -> bool {
        self.driver(motor).is_running()
    }
}
