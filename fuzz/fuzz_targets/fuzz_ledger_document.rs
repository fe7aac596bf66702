//! Fuzz target: ledger document decoding
//!
//! Feeds arbitrary bytes to the ledger as its stored document, then records
//! one session on top and verifies:
//! - No panics on garbage, truncated or hostile JSON
//! - A document that fails to decode is treated as empty
//! - Totals and session counts never decrease across the record
//!
//! cargo fuzz run fuzz_ledger_document

#![no_main]

use std::collections::HashMap;

use chrono::{TimeZone, Utc};
use feedmix::app::ports::{StorageError, StoragePort};
use feedmix::ledger::{LEDGER_KEY, LEDGER_NAMESPACE, LedgerDocument, ResourceUsageLedger};
use feedmix::recipe::Recipe;
use libfuzzer_sys::fuzz_target;

// ── In-memory StoragePort for fuzz testing ────────────────────

#[derive(Default)]
struct MemStore {
    data: HashMap<String, Vec<u8>>,
}

impl StoragePort for MemStore {
    fn read(&self, ns: &str, key: &str) -> Result<Vec<u8>, StorageError> {
        self.data
            .get(&format!("{ns}::{key}"))
            .cloned()
            .ok_or(StorageError::NotFound)
    }

    fn write(&mut self, ns: &str, key: &str, data: &[u8]) -> Result<(), StorageError> {
        self.data.insert(format!("{ns}::{key}"), data.to_vec());
        Ok(())
    }

    fn delete(&mut self, ns: &str, key: &str) -> Result<(), StorageError> {
        self.data.remove(&format!("{ns}::{key}"));
        Ok(())
    }

    fn exists(&self, ns: &str, key: &str) -> bool {
        self.data.contains_key(&format!("{ns}::{key}"))
    }

    fn keys(&self, ns: &str) -> Result<Vec<String>, StorageError> {
        let prefix = format!("{ns}::");
        let mut keys: Vec<String> = self
            .data
            .keys()
            .filter_map(|k| k.strip_prefix(&prefix).map(str::to_owned))
            .collect();
        keys.sort();
        Ok(keys)
    }
}

fuzz_target!(|data: &[u8]| {
    let mut store = MemStore::default();
    let _ = store.write(LEDGER_NAMESPACE, LEDGER_KEY, data);

    let decoded = serde_json::from_slice::<LedgerDocument>(data).ok();
    let ledger = ResourceUsageLedger::new(store);
    let before = ledger.load();
    if decoded.is_none() {
        assert!(before.is_empty(), "undecodable document must load empty");
    }

    let recipe = Recipe::new("Fuzz", [("corn", 60.0), ("alfalfa", 40.0)]);
    let now = Utc.with_ymd_and_hms(2026, 10, 18, 12, 0, 0).unwrap();
    let after = match ledger.record(&recipe, 100.0, 50.0, now) {
        Ok(doc) => doc,
        Err(StorageError::Corrupted) => {
            assert_eq!(ledger.load(), before, "refused record must keep the document");
            return;
        }
        Err(e) => panic!("in-memory write failed: {e}"),
    };

    for (name, totals) in &before.total_usage {
        if !totals.total_kg.is_finite() {
            continue;
        }
        let grown = &after.total_usage[name];
        assert!(
            grown.total_kg + 0.005 >= totals.total_kg,
            "total for {name} shrank: {} -> {}",
            totals.total_kg,
            grown.total_kg
        );
        assert!(grown.total_sessions >= totals.total_sessions);
    }
});
