//! Fuzz target: console request handling
//!
//! Pushes arbitrary lines through the console against a live in-memory
//! station and verifies:
//! - No panics on any input line
//! - Every non-blank line yields exactly one JSON reply with an `ok` flag
//!
//! cargo fuzz run fuzz_console_request

#![no_main]

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use chrono::{DateTime, TimeZone, Utc};
use feedmix::adapters::console::handle_line;
use feedmix::adapters::hardware::MotorBank;
use feedmix::app::events::AppEvent;
use feedmix::app::ports::{ClockPort, EventSink, StorageError, StoragePort};
use feedmix::app::station::Station;
use feedmix::config::StationConfig;
use libfuzzer_sys::fuzz_target;

#[derive(Clone, Default)]
struct SharedStore(Arc<Mutex<HashMap<String, Vec<u8>>>>);

impl StoragePort for SharedStore {
    fn read(&self, ns: &str, key: &str) -> Result<Vec<u8>, StorageError> {
        self.0
            .lock()
            .unwrap()
            .get(&format!("{ns}::{key}"))
            .cloned()
            .ok_or(StorageError::NotFound)
    }

    fn write(&mut self, ns: &str, key: &str, data: &[u8]) -> Result<(), StorageError> {
        self.0
            .lock()
            .unwrap()
            .insert(format!("{ns}::{key}"), data.to_vec());
        Ok(())
    }

    fn delete(&mut self, ns: &str, key: &str) -> Result<(), StorageError> {
        self.0.lock().unwrap().remove(&format!("{ns}::{key}"));
        Ok(())
    }

    fn exists(&self, ns: &str, key: &str) -> bool {
        self.0.lock().unwrap().contains_key(&format!("{ns}::{key}"))
    }

    fn keys(&self, ns: &str) -> Result<Vec<String>, StorageError> {
        let prefix = format!("{ns}::");
        let mut keys: Vec<String> = self
            .0
            .lock()
            .unwrap()
            .keys()
            .filter_map(|k| k.strip_prefix(&prefix).map(str::to_owned))
            .collect();
        keys.sort();
        Ok(keys)
    }
}

struct NullSink;

impl EventSink for NullSink {
    fn emit(&mut self, _event: &AppEvent) {}
}

struct FixedClock;

impl ClockPort for FixedClock {
    fn now(&self) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 10, 18, 12, 0, 0).unwrap()
    }
}

fuzz_target!(|data: &[u8]| {
    let Ok(text) = core::str::from_utf8(data) else {
        return;
    };

    let config = StationConfig {
        rng_seed: Some(0),
        ..Default::default()
    };
    let station = Station::new(
        config,
        SharedStore::default(),
        MotorBank::new(),
        NullSink,
        FixedClock,
    )
    .expect("default config is valid");

    for line in text.lines() {
        match handle_line(&station, line) {
            None => assert!(line.trim().is_empty()),
            Some(reply) => {
                let value: serde_json::Value =
                    serde_json::from_str(&reply).expect("reply must be JSON");
                assert!(value["ok"].is_boolean());
            }
        }
    }
});
