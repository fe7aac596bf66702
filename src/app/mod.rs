//! Application core: session logic behind port traits.
//!
//! This module contains the business rules for the mixing station: session
//! lifecycle, weight sampling, usage attribution and motor coordination.
//! All interaction with storage, motors and transports happens through
//! **port traits** defined in [`ports`], keeping this layer fully testable
//! with in-memory adapters.

pub mod commands;
pub mod events;
pub mod ports;
pub mod replies;
pub mod service;
pub mod station;
