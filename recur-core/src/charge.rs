//! Charge records and the per-row parse outcome.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// A single charge (money leaving the account). `amount` is always positive.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChargeRecord {
    pub description: String,
    pub amount: Decimal,
    pub category: Option<String>,
}

/// Why a row did not become a [`ChargeRecord`].
#[derive(Debug, Clone, PartialEq)]
pub enum SkipReason {
    /// The amount cell held something that is not a number.
    UnparseableAmount(String),
    /// Zero or positive amount: a credit, refund or payment.
    NotACharge(Decimal),
    /// The charge would overflow its bucket's running total.
    TotalOverflow(Decimal),
}

/// Result of turning one raw row into a charge.
#[derive(Debug, Clone, PartialEq)]
pub enum ChargeOutcome {
    Parsed(ChargeRecord),
    Skipped(SkipReason),
}

impl ChargeOutcome {
    pub fn record(&self) -> Option<&ChargeRecord> {
        match self {
            ChargeOutcome::Parsed(record) => Some(record),
            ChargeOutcome::Skipped(_) => None,
        }
    }

    pub fn is_skipped(&self) -> bool {
        matches!(self, ChargeOutcome::Skipped(_))
    }
}

impl ChargeRecord {
    /// Build a charge from raw cell values.
    ///
    /// Only negative amounts are charges; the stored amount is the absolute value.
    /// An empty category is treated the same as a missing one.
    pub fn from_raw(description: &str, amount: &str, category: Option<&str>) -> ChargeOutcome {
        let Some(value) = parse_amount(amount) else {
            return ChargeOutcome::Skipped(SkipReason::UnparseableAmount(amount.to_string()));
        };
        if value >= Decimal::ZERO {
            return ChargeOutcome::Skipped(SkipReason::NotACharge(value));
        }

        let category = category
            .map(str::trim)
            .filter(|c| !c.is_empty())
            .map(str::to_string);

        ChargeOutcome::Parsed(ChargeRecord {
            description: description.trim().to_string(),
            amount: value.abs(),
            category,
        })
    }
}

/// Parse a statement amount, tolerating thousands separators and a `$` prefix.
///
/// `"-1,234.50"`, `"$-15.49"` and `"-$15.49"` all parse; anything else that is
/// not a plain or scientific decimal returns `None`.
pub fn parse_amount(raw: &str) -> Option<Decimal> {
    let cleaned = raw.replace([',', '$'], "");
    let cleaned = cleaned.trim();
    if cleaned.is_empty() {
        return None;
    }
    Decimal::from_str(cleaned)
        .or_else(|_| Decimal::from_scientific(cleaned))
        .ok()
}
