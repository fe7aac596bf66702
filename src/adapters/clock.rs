//! Wall-clock adapter.
//!
//! Provides the UTC timestamps used for session tokens, ledger dates and
//! recipe stamps.  Tests substitute a fixed clock.

use chrono::{DateTime, Utc};

use crate::app::ports::ClockPort;

/// System clock.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl SystemClock {
    pub fn new() -> Self {
        Self
    }
}

impl ClockPort for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}
