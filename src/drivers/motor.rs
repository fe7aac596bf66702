//! Dosing motor driver (simulated).
//!
//! Each ingredient hopper has one auger motor that is either stopped or
//! running.  There is no real hardware behind this driver; it tracks state
//! in memory and logs every change so a bench operator can follow it.
//!
//! ## Safety contract
//!
//! The driver is a dumb actuator.  Deciding *when* a motor may run is the
//! session engine's job.

use core::fmt;

use log::info;
use serde::{Deserialize, Serialize};

/// Identity of a dosing motor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Motor {
    Corn,
    Alfalfa,
}

impl Motor {
    /// Every motor on the station, in display order.
    pub const ALL: [Motor; 2] = [Motor::Corn, Motor::Alfalfa];

    /// Human-readable label ("Corn", "Alfalfa").
    pub fn label(self) -> &'static str {
        match self {
            Self::Corn => "Corn",
            Self::Alfalfa => "Alfalfa",
        }
    }
}

impl fmt::Display for Motor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MotorState {
    Stopped,
    Running,
}

pub struct MotorDriver {
    motor: Motor,
    state: MotorState,
}

impl MotorDriver {
    pub fn new(motor: Motor) -> Self {
        Self {
            motor,
            state: MotorState::Stopped,
        }
    }

    pub fn start(&mut self) {
        if self.state != MotorState::Running {
            info!("{} motor started", self.motor);
        }
        self.state = MotorState::Running;
    }

    pub fn stop(&mut self) {
        if self.state != MotorState::Stopped {
            info!("{} motor stopped", self.motor);
        }
        self.state = MotorState::Stopped;
    }

    pub fn set(&mut self, on: bool) {
        if on {
            self.start();
        } else {
            self.stop();
        }
    }

    pub fn state(&self) -> MotorState {
        self.state
    }

    pub fn is_running(&self) -> bool {
        matches!(self.state, MotorState::Running)
    }
}
