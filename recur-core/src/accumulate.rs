//! Per-account accumulation: charge records → `ChargeMap`.

use crate::bucket::ChargeMap;
use crate::charge::{ChargeOutcome, ChargeRecord, SkipReason};
use crate::normalize::normalize;
use log::{debug, warn};

/// How many rows were dropped, by reason.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SkipStats {
    pub unparseable: usize,
    pub not_a_charge: usize,
    pub overflow: usize,
}

impl SkipStats {
    pub fn total(&self) -> usize {
        self.unparseable + self.not_a_charge + self.overflow
    }
}

/// Builds one account's map from a stream of row outcomes.
#[derive(Debug, Default)]
pub struct Accumulator {
    map: ChargeMap,
    skipped: SkipStats,
}

impl Accumulator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, outcome: ChargeOutcome) {
        match outcome {
            ChargeOutcome::Parsed(record) => self.add(&record),
            ChargeOutcome::Skipped(reason) => self.skip(reason),
        }
    }

    /// Add one charge; a charge that would overflow its bucket is skipped.
    pub fn add(&mut self, record: &ChargeRecord) {
        let amount = record.amount.abs();
        let recorded = self
            .map
            .bucket_mut(normalize(&record.description))
            .record(amount, record.category.as_deref());
        if recorded.is_err() {
            self.skip(SkipReason::TotalOverflow(amount));
        }
    }

    fn skip(&mut self, reason: SkipReason) {
        match reason {
            SkipReason::UnparseableAmount(raw) => {
                debug!("skipping row with unparseable amount {raw:?}");
                self.skipped.unparseable += 1;
            }
            SkipReason::NotACharge(amount) => {
                debug!("skipping non-charge amount {amount}");
                self.skipped.not_a_charge += 1;
            }
            SkipReason::TotalOverflow(amount) => {
                warn!("skipping charge {amount}: bucket total would overflow");
                self.skipped.overflow += 1;
            }
        }
    }

    pub fn finish(self) -> (ChargeMap, SkipStats) {
        (self.map, self.skipped)
    }
}

impl Extend<ChargeOutcome> for Accumulator {
    fn extend<T: IntoIterator<Item = ChargeOutcome>>(&mut self, iter: T) {
        for outcome in iter {
            self.push(outcome);
        }
    }
}

/// Group charges by normalized description, in input order.
pub fn accumulate<'a, I>(records: I) -> ChargeMap
where
    I: IntoIterator<Item = &'a ChargeRecord>,
{
    let mut acc = Accumulator::new();
    for record in records {
        acc.add(record);
    }
    acc.finish().0
}
