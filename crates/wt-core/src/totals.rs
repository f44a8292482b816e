//! Duration totals per category prefix, overall and per calendar day.

use std::collections::{BTreeMap, HashMap};

use chrono::{NaiveDate, TimeDelta};

use crate::category::Category;

/// Cumulative durations keyed by rendered category prefix.
///
/// Keys keep first-seen order so that sorting by duration is deterministic
/// on ties.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TotalsTable {
    entries: Vec<(String, TimeDelta)>,
    index: HashMap<String, usize>,
}

impl TotalsTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds `duration` to `key`, creating the entry if needed.
    pub fn add(&mut self, key: String, duration: TimeDelta) {
        if let Some(&i) = self.index.get(&key) {
            self.entries[i].1 = self.entries[i].1 + duration;
        } else {
            self.index.insert(key.clone(), self.entries.len());
            self.entries.push((key, duration));
        }
    }

    pub fn get(&self, key: &str) -> Option<TimeDelta> {
        self.index.get(key).map(|&i| self.entries[i].1)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Entries in first-seen order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, TimeDelta)> {
        self.entries.iter().map(|(k, d)| (k.as_str(), *d))
    }

    /// Entries sorted by duration, longest first; ties keep first-seen order.
    pub fn sorted(&self) -> Vec<(&str, TimeDelta)> {
        let mut sorted: Vec<_> = self.iter().collect();
        sorted.sort_by(|a, b| b.1.cmp(&a.1));
        sorted
    }
}

/// The aggregator fed by interval building.
///
/// Each closed interval adds its duration to every prefix of its category,
/// both in the overall table and in the table for the interval's start day.
/// Nothing is ever subtracted.
#[derive(Debug, Clone)]
pub struct Totals {
    overall: TotalsTable,
    by_day: BTreeMap<NaiveDate, TotalsTable>,
    grand_total: TimeDelta,
}

impl Default for Totals {
    fn default() -> Self {
        Self {
            overall: TotalsTable::new(),
            by_day: BTreeMap::new(),
            grand_total: TimeDelta::zero(),
        }
    }
}

impl Totals {
    pub fn new() -> Self {
        Self::default()
    }

    /// Attributes `duration` to every prefix of `category` on `day`.
    ///
    /// An empty category only counts towards [`Totals::grand_total`].
    pub fn add(&mut self, category: &Category, day: NaiveDate, duration: TimeDelta) {
        self.grand_total = self.grand_total + duration;
        if category.is_empty() {
            return;
        }
        let day_table = self.by_day.entry(day).or_default();
        for key in category.prefixes() {
            day_table.add(key.clone(), duration);
            self.overall.add(key, duration);
        }
    }

    pub const fn overall(&self) -> &TotalsTable {
        &self.overall
    }

    pub fn day(&self, day: NaiveDate) -> Option<&TotalsTable> {
        self.by_day.get(&day)
    }

    /// Per-day tables in ascending date order.
    pub fn days(&self) -> impl Iterator<Item = (NaiveDate, &TotalsTable)> {
        self.by_day.iter().map(|(d, t)| (*d, t))
    }

    /// Sum of every added duration, categorized or not.
    pub const fn grand_total(&self) -> TimeDelta {
        self.grand_total
    }
}
