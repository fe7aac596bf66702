//! FeedMix control backend library.
//!
//! Exposes the session engine, usage ledger, recipe store and adapters for
//! the `feedmix` binary and for integration testing.

#![deny(unused_must_use)]

pub mod adapters;
pub mod app;
pub mod config;
pub mod drivers;
pub mod error;
pub mod fsm;
pub mod ledger;
pub mod recipe;
pub mod sensors;
pub mod units;
