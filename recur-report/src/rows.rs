//! Report rows: recurring buckets only, sorted by description.

use recur_core::ChargeMap;
use rust_decimal::{Decimal, RoundingStrategy};
use serde::Serialize;

/// Monthly average is always `total / 12`, regardless of the statement span.
pub const MONTHS_PER_YEAR: u32 = 12;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ReportRow {
    pub description: String,
    pub category: Option<String>,
    pub count: u32,
    pub total: Decimal,
    pub monthly_average: Decimal,
}

pub fn monthly_average(total: Decimal) -> Decimal {
    (total / Decimal::from(MONTHS_PER_YEAR))
        .round_dp_with_strategy(2, RoundingStrategy::MidpointNearestEven)
}

/// `$1234.50` style, always two decimals.
pub fn format_currency(amount: Decimal) -> String {
    let rounded = amount.round_dp_with_strategy(2, RoundingStrategy::MidpointNearestEven);
    format!("${rounded:.2}")
}

/// Rows for every bucket seen more than once. Singletons stay in the map but
/// never reach the report.
pub fn report_rows(map: &ChargeMap) -> Vec<ReportRow> {
    let mut rows: Vec<ReportRow> = map
        .iter()
        .filter(|(_, bucket)| bucket.is_recurring())
        .map(|(key, bucket)| ReportRow {
            description: key.to_string(),
            category: bucket.category().map(str::to_string),
            count: bucket.count(),
            total: bucket.total(),
            monthly_average: monthly_average(bucket.total()),
        })
        .collect();
    rows.sort_by(|a, b| a.description.cmp(&b.description));
    rows
}
