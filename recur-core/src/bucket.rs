//! Aggregate buckets and the insertion-ordered map that owns them.
//!
//! Clustering is greedy and depends on the order keys were first seen, so the
//! map keeps entries in a `Vec` and uses a `HashMap` only as a lookup index.
//! Nothing here ever sorts.

use crate::normalize::GroupKey;
use log::warn;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;

/// Adding a charge would push `count` or `total` past what the bucket can hold.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TotalOverflow;

impl fmt::Display for TotalOverflow {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("bucket count or total overflowed")
    }
}

impl std::error::Error for TotalOverflow {}

/// Statistics for one group key. `count` and `total` only ever move together.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct AggregateBucket {
    count: u32,
    total: Decimal,
    category: Option<String>,
}

impl AggregateBucket {
    pub fn new(count: u32, total: Decimal, category: Option<String>) -> Self {
        let mut bucket = Self {
            count,
            total,
            category: None,
        };
        bucket.adopt_category(category.as_deref());
        bucket
    }

    pub fn count(&self) -> u32 {
        self.count
    }

    pub fn total(&self) -> Decimal {
        self.total
    }

    pub fn category(&self) -> Option<&str> {
        self.category.as_deref()
    }

    /// Recurring means seen more than once after all merging.
    pub fn is_recurring(&self) -> bool {
        self.count > 1
    }

    /// Add one charge. On overflow the bucket is left untouched.
    pub fn record(&mut self, amount: Decimal, category: Option<&str>) -> Result<(), TotalOverflow> {
        let count = self.count.checked_add(1).ok_or(TotalOverflow)?;
        let total = self.total.checked_add(amount).ok_or(TotalOverflow)?;
        self.count = count;
        self.total = total;
        self.adopt_category(category);
        Ok(())
    }

    /// Fold another bucket's statistics into this one.
    ///
    /// On overflow count and total saturate at their maximum.
    pub fn absorb(&mut self, other: &AggregateBucket) {
        let count = self.count.checked_add(other.count);
        let total = self.total.checked_add(other.total);
        if count.is_none() || total.is_none() {
            warn!("bucket total saturated while merging {} charges", other.count);
        }
        self.count = count.unwrap_or(u32::MAX);
        self.total = total.unwrap_or(Decimal::MAX);
        self.adopt_category(other.category.as_deref());
    }

    // first non-empty category wins
    fn adopt_category(&mut self, category: Option<&str>) {
        if self.category.is_some() {
            return;
        }
        if let Some(c) = category.filter(|c| !c.is_empty()) {
            self.category = Some(c.to_string());
        }
    }
}

/// Flattened `(key, category, count, total)` view of one map entry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FlatEntry {
    pub key: GroupKey,
    pub category: Option<String>,
    pub count: u32,
    pub total: Decimal,
}

impl FlatEntry {
    pub fn into_parts(self) -> (GroupKey, AggregateBucket) {
        let bucket = AggregateBucket::new(self.count, self.total, self.category);
        (self.key, bucket)
    }
}

/// Insertion-ordered `GroupKey → AggregateBucket` map.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ChargeMap {
    entries: Vec<(GroupKey, AggregateBucket)>,
    index: HashMap<GroupKey, usize>,
}

impl ChargeMap {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            entries: Vec::with_capacity(capacity),
            index: HashMap::with_capacity(capacity),
        }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn get(&self, key: &str) -> Option<&AggregateBucket> {
        self.index.get(key).map(|&i| &self.entries[i].1)
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.index.contains_key(key)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&GroupKey, &AggregateBucket)> {
        self.entries.iter().map(|(k, b)| (k, b))
    }

    pub fn keys(&self) -> impl Iterator<Item = &GroupKey> {
        self.entries.iter().map(|(k, _)| k)
    }

    /// Sum of every bucket's total, saturating like [`AggregateBucket::absorb`].
    pub fn grand_total(&self) -> Decimal {
        self.entries
            .iter()
            .fold(Decimal::ZERO, |sum, (_, b)| sum.saturating_add(b.total))
    }

    /// Sum of every bucket's count.
    pub fn charge_count(&self) -> u64 {
        self.entries.iter().map(|(_, b)| u64::from(b.count)).sum()
    }

    /// Bucket for `key`, created empty at the end of the order if missing.
    pub(crate) fn bucket_mut(&mut self, key: GroupKey) -> &mut AggregateBucket {
        let existing = self.index.get(&key).copied();
        let i = match existing {
            Some(i) => i,
            None => self.push_new(key, AggregateBucket::default()),
        };
        &mut self.entries[i].1
    }

    /// Exact-key fold: absorb into an existing bucket or append a new entry.
    pub fn fold(&mut self, key: GroupKey, bucket: AggregateBucket) {
        let existing = self.index.get(&key).copied();
        match existing {
            Some(i) => self.entries[i].1.absorb(&bucket),
            None => {
                self.push_new(key, bucket);
            }
        }
    }

    pub(crate) fn absorb_at(&mut self, i: usize, bucket: &AggregateBucket) {
        self.entries[i].1.absorb(bucket);
    }

    pub(crate) fn key_at(&self, i: usize) -> &GroupKey {
        &self.entries[i].0
    }

    pub(crate) fn push_new(&mut self, key: GroupKey, bucket: AggregateBucket) -> usize {
        debug_assert!(!self.index.contains_key(&key));
        let i = self.entries.len();
        self.index.insert(key.clone(), i);
        self.entries.push((key, bucket));
        i
    }

    pub fn flat_entries(&self) -> Vec<FlatEntry> {
        self.entries
            .iter()
            .map(|(key, bucket)| FlatEntry {
                key: key.clone(),
                category: bucket.category.clone(),
                count: bucket.count,
                total: bucket.total,
            })
            .collect()
    }
}

impl IntoIterator for ChargeMap {
    type Item = (GroupKey, AggregateBucket);
    type IntoIter = std::vec::IntoIter<(GroupKey, AggregateBucket)>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.into_iter()
    }
}

impl FromIterator<(GroupKey, AggregateBucket)> for ChargeMap {
    /// Duplicate keys are folded, keeping the first occurrence's position.
    fn from_iter<T: IntoIterator<Item = (GroupKey, AggregateBucket)>>(iter: T) -> Self {
        let mut map = ChargeMap::new();
        for (key, bucket) in iter {
            map.fold(key, bucket);
        }
        map
    }
}
