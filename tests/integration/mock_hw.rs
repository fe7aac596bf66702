//! Mock adapters for integration tests.
//!
//! Records every motor call and every emitted event so tests can assert on
//! the full history, and keeps documents in a shared in-memory map.

use std::collections::BTreeMap;
use std::sync::{Arc, Mutex, PoisonError};

use chrono::{DateTime, TimeZone, Utc};

use feedmix::app::events::AppEvent;
use feedmix::app::ports::{ClockPort, EventSink, MotorPort, StorageError, StoragePort};
use feedmix::app::station::Station;
use feedmix::config::StationConfig;
use feedmix::drivers::motor::Motor;
use feedmix::recipe::Recipe;

// ── Motor call record ─────────────────────────────────────────

#[derive(Debug, Clone, PartialEq)]
pub struct MotorCall {
    pub motor: Motor,
    pub on: bool,
}

// ── MockMotors ────────────────────────────────────────────────

#[derive(Default)]
pub struct MockMotors {
    pub calls: Vec<MotorCall>,
    corn: bool,
    alfalfa: bool,
}

#[allow(dead_code)]
impl MockMotors {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn any_on(&self) -> bool {
        self.corn || self.alfalfa
    }

    pub fn all_running(&self) -> bool {
        self.corn && self.alfalfa
    }
}

impl MotorPort for MockMotors {
    fn set_motor(&mut self, motor: Motor, on: bool) {
        self.calls.push(MotorCall { motor, on });
        match motor {
            Motor::Corn => self.corn = on,
            Motor::Alfalfa => self.alfalfa = on,
        }
    }

    fn is_on(&self, motor: Motor) -> bool {
        match motor {
            Motor::Corn => self.corn,
            Motor::Alfalfa => self.alfalfa,
        }
    }
}

// ── MemoryStore ───────────────────────────────────────────────

/// Shared in-memory document store.  Clones see the same documents.
#[derive(Clone, Default)]
pub struct MemoryStore {
    docs: Arc<Mutex<BTreeMap<(String, String), Vec<u8>>>>,
    fail_writes: Arc<Mutex<bool>>,
}

#[allow(dead_code)]
impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make every subsequent write fail with an I/O error.
    pub fn fail_writes(&self, fail: bool) {
        *self.fail_writes.lock().unwrap_or_else(PoisonError::into_inner) = fail;
    }

    pub fn raw(&self, ns: &str, key: &str) -> Option<Vec<u8>> {
        self.docs
            .lock()
            .unwrap()
            .get(&(ns.to_owned(), key.to_owned()))
            .cloned()
    }

    pub fn put_raw(&self, ns: &str, key: &str, data: &[u8]) {
        self.docs
            .lock()
            .unwrap()
            .insert((ns.to_owned(), key.to_owned()), data.to_vec());
    }
}

impl StoragePort for MemoryStore {
    fn read(&self, ns: &str, key: &str) -> Result<Vec<u8>, StorageError> {
        self.raw(ns, key).ok_or(StorageError::NotFound)
    }

    fn write(&mut self, ns: &str, key: &str, data: &[u8]) -> Result<(), StorageError> {
        if *self.fail_writes.lock().unwrap() {
            return Err(StorageError::Io(std::io::ErrorKind::Other));
        }
        self.put_raw(ns, key, data);
        Ok(())
    }

    fn delete(&mut self, ns: &str, key: &str) -> Result<(), StorageError> {
        self.docs
            .lock()
            .unwrap()
            .remove(&(ns.to_owned(), key.to_owned()));
        Ok(())
    }

    fn exists(&self, ns: &str, key: &str) -> bool {
        self.raw(ns, key).is_some()
    }

    fn keys(&self, ns: &str) -> Result<Vec<String>, StorageError> {
        Ok(self
            .docs
            .lock()
            .unwrap()
            .keys()
            .filter(|(n, _)| n == ns)
            .map(|(_, k)| k.clone())
            .collect())
    }
}

// ── RecordingSink ─────────────────────────────────────────────

#[derive(Default)]
pub struct RecordingSink {
    pub events: Vec<AppEvent>,
}

#[allow(dead_code)]
impl RecordingSink {
    pub fn count(&self, pred: impl Fn(&AppEvent) -> bool) -> usize {
        self.events.iter().filter(|e| pred(e)).count()
    }
}

impl EventSink for RecordingSink {
    fn emit(&mut self, event: &AppEvent) {
        self.events.push(event.clone());
    }
}

// ── FixedClock ────────────────────────────────────────────────

#[derive(Clone, Copy)]
pub struct FixedClock(pub DateTime<Utc>);

impl FixedClock {
    pub fn at(y: i32, m: u32, d: u32) -> Self {
        Self(Utc.with_ymd_and_hms(y, m, d, 9, 0, 0).unwrap())
    }
}

impl ClockPort for FixedClock {
    fn now(&self) -> DateTime<Utc> {
        self.0
    }
}

// ── Helpers ───────────────────────────────────────────────────

pub type TestStation = Station<MemoryStore, MockMotors, RecordingSink, FixedClock>;

/// Scale steps by exactly `step` kg per reading.
#[allow(dead_code)]
pub fn stepping(step: f64) -> StationConfig {
    StationConfig {
        weight_increment_min_kg: step,
        weight_increment_max_kg: step,
        rng_seed: Some(42),
        ..Default::default()
    }
}

#[allow(dead_code)]
pub fn station(config: StationConfig, store: MemoryStore) -> TestStation {
    Station::new(
        config,
        store,
        MockMotors::new(),
        RecordingSink::default(),
        FixedClock::at(2026, 10, 18),
    )
    .unwrap()
}

#[allow(dead_code)]
pub fn mix1() -> Recipe {
    Recipe::new("Mix1", [("corn", 60.0), ("alfalfa", 40.0)])
}
