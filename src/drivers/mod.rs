//! Actuator drivers.
//!
//! Only the dosing motors exist on this station; they are simulated.

pub mod motor;
