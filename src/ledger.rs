//! Resource usage ledger.
//!
//! Accumulates ingredient consumption across mixing sessions into two
//! roll-ups: all-time totals per ingredient, and per-calendar-month totals
//! keyed `"YYYY-MM"`.  The ledger is one JSON document stored under the
//! `ledger` namespace.  Every [`record`](ResourceUsageLedger::record) is a
//! read-merge-write of the whole document under a single lock, so two
//! concurrent records can never interleave and drop an update.
//!
//! `total_kg` values only ever grow.  They are rounded to 2 decimals on
//! every write, so small per-session quantities accumulate with rounding
//! applied at each step rather than once at read time.

use std::collections::BTreeMap;
use std::sync::{Mutex, MutexGuard, PoisonError};

use chrono::{DateTime, NaiveDate, Utc};
use log::{info, warn};
use serde::{Deserialize, Serialize};

use crate::app::ports::{StorageError, StoragePort};
use crate::recipe::Recipe;
use crate::units::round_to;

pub const LEDGER_NAMESPACE: &str = "ledger";
pub const LEDGER_KEY: &str = "resource_usage";

/// All-time consumption of one ingredient.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IngredientTotals {
    pub total_kg: f64,
    pub total_sessions: u64,
    pub first_used_date: NaiveDate,
    pub last_used_date: NaiveDate,
}

/// Consumption of one ingredient within one calendar month.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MonthlyEntry {
    pub total_kg: f64,
    pub sessions: u64,
}

/// The persisted ledger document.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LedgerDocument {
    #[serde(default)]
    pub total_usage: BTreeMap<String, IngredientTotals>,
    #[serde(default)]
    pub monthly_usage: BTreeMap<String, BTreeMap<String, MonthlyEntry>>,
}

/// Ledger snapshot handed to readers.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UsageReport {
    pub resource_usage: LedgerDocument,
    pub timestamp: DateTime<Utc>,
}

/// Portion of the target weight attributed as consumed.
pub fn effective_weight(total_weight: f64, completion_percentage: f64) -> f64 {
    total_weight * completion_percentage / 100.0
}

/// Calendar-month bucket key, e.g. `"2026-10"`.
pub fn month_key(date: NaiveDate) -> String {
    date.format("%Y-%m").to_string()
}

impl LedgerDocument {
    pub fn is_empty(&self) -> bool {
        self.total_usage.is_empty() && self.monthly_usage.is_empty()
    }

    /// Add one session's consumption.  Zero-quantity sessions still count.
    pub fn merge_session(
        &mut self,
        recipe: &Recipe,
        total_weight: f64,
        completion_percentage: f64,
        today: NaiveDate,
    ) {
        let effective = effective_weight(total_weight, completion_percentage);
        let month = self.monthly_usage.entry(month_key(today)).or_default();

        for ingredient in &recipe.ingredients {
            let quantity = ingredient.percentage / 100.0 * effective;

            let totals = self
                .total_usage
                .entry(ingredient.name.clone())
                .or_insert_with(|| IngredientTotals {
                    total_kg: 0.0,
                    total_sessions: 0,
                    first_used_date: today,
                    last_used_date: today,
                });
            totals.total_kg += quantity;
            totals.total_sessions = totals.total_sessions.saturating_add(1);
            totals.last_used_date = today;

            let monthly = month.entry(ingredient.name.clone()).or_default();
            monthly.total_kg += quantity;
            monthly.sessions = monthly.sessions.saturating_add(1);
        }
    }

    /// Round every stored `total_kg` to 2 decimals.
    pub fn round_totals(&mut self) {
        for totals in self.total_usage.values_mut() {
            totals.total_kg = round_to(totals.total_kg, 2);
        }
        for entry in self.monthly_usage.values_mut().flat_map(BTreeMap::values_mut) {
            entry.total_kg = round_to(entry.total_kg, 2);
        }
    }

    /// Sum of all-time `total_kg` across ingredients.
    pub fn grand_total_kg(&self) -> f64 {
        self.total_usage.values().map(|t| t.total_kg).sum()
    }

    /// Sum of all-time `total_sessions` across ingredients.
    pub fn total_sessions(&self) -> u64 {
        self.total_usage
            .values()
            .fold(0u64, |acc, t| acc.saturating_add(t.total_sessions))
    }

    /// True when every stored `total_kg` is a finite number.
    pub fn is_finite(&self) -> bool {
        self.total_usage.values().all(|t| t.total_kg.is_finite())
            && self
                .monthly_usage
                .values()
                .flat_map(BTreeMap::values)
                .all(|e| e.total_kg.is_finite())
    }

    /// Per-ingredient entries for one `"YYYY-MM"` month.
    pub fn month(&self, key: &str) -> Option<&BTreeMap<String, MonthlyEntry>> {
        self.monthly_usage.get(key)
    }
}

/// Durable, lock-guarded owner of the ledger document.
pub struct ResourceUsageLedger<S> {
    store: Mutex<S>,
}

impl<S: StoragePort> ResourceUsageLedger<S> {
    pub fn new(store: S) -> Self {
        Self {
            store: Mutex::new(store),
        }
    }

    /// Current document.  Missing, unreadable or corrupt storage yields an
    /// empty document.
    pub fn load(&self) -> LedgerDocument {
        let store = self.lock();
        Self::load_from(&*store)
    }

    /// Attribute a session's consumption to the ledger and persist it.
    ///
    /// Returns the document as written.  On a write failure, or when a total
    /// would no longer be finite, the stored document is left as it was.
    pub fn record(
        &self,
        recipe: &Recipe,
        total_weight: f64,
        completion_percentage: f64,
        now: DateTime<Utc>,
    ) -> Result<LedgerDocument, StorageError> {
        let mut store = self.lock();
        let mut doc = Self::load_from(&*store);

        doc.merge_session(recipe, total_weight, completion_percentage, now.date_naive());
        doc.round_totals();
        if !doc.is_finite() {
            warn!("Ledger: totals overflowed recording '{}', keeping stored document", recipe.name);
            return Err(StorageError::Corrupted);
        }

        let bytes = serde_json::to_vec_pretty(&doc).map_err(|_| StorageError::Corrupted)?;
        store.write(LEDGER_NAMESPACE, LEDGER_KEY, &bytes)?;

        info!(
            "Ledger: recorded '{}' ({:.2} kg effective, {} ingredients)",
            recipe.name,
            effective_weight(total_weight, completion_percentage),
            recipe.ingredients.len()
        );
        Ok(doc)
    }

    /// Ledger document stamped with the read time.
    pub fn report(&self, now: DateTime<Utc>) -> UsageReport {
        UsageReport {
            resource_usage: self.load(),
            timestamp: now,
        }
    }

    fn load_from(store: &S) -> LedgerDocument {
        match store.read(LEDGER_NAMESPACE, LEDGER_KEY) {
            Ok(bytes) => serde_json::from_slice(&bytes).unwrap_or_else(|e| {
                warn!("Ledger: stored document is corrupt ({}), starting fresh", e);
                LedgerDocument::default()
            }),
            Err(StorageError::NotFound) => LedgerDocument::default(),
            Err(e) => {
                warn!("Ledger: read failed ({}), starting fresh", e);
                LedgerDocument::default()
            }
        }
    }

    fn lock(&self) -> MutexGuard<'_, S> {
        self.store.lock().unwrap_or_else(PoisonError::into_inner)
    }
}
