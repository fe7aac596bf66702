//! Integration test driver for `tests/integration/` submodule.
//!
//! Each `mod` below maps to a file that exercises a specific subsystem
//! against mock adapters.  All tests run on the host with in-memory
//! storage and no real motors.

mod mock_hw;
mod recipe_store_tests;
mod session_flow_tests;
