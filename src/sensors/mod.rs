//! Sensor subsystem.
//!
//! The station has a single sensor, the mixer scale, which is simulated.

pub mod scale;

pub use scale::{WeightReading, WeightSimulator};
