//! One account's statement turned into per-row charge outcomes.

use anyhow::{Context, Result};
use log::info;
use recur_core::{Accumulator, ChargeMap, ChargeOutcome, ChargeRecord, SkipStats};
use std::path::Path;

use crate::fields::{ColumnHints, FieldMap};
use crate::table::{RawTable, read_table};

/// Every row of one source, parsed or skipped, in file order.
#[derive(Debug, Clone)]
pub struct AccountBatch {
    pub outcomes: Vec<ChargeOutcome>,
}

impl AccountBatch {
    pub fn charges(&self) -> impl Iterator<Item = &ChargeRecord> {
        self.outcomes.iter().filter_map(ChargeOutcome::record)
    }

    /// Accumulate the charges into an unclustered map.
    pub fn accumulate(self) -> (ChargeMap, SkipStats) {
        let mut acc = Accumulator::new();
        acc.extend(self.outcomes);
        acc.finish()
    }
}

/// Turn each row into a charge outcome using the resolved columns.
///
/// With no category column every record has no category; a present but blank
/// cell is treated the same way by `ChargeRecord::from_raw`.
pub fn charge_outcomes(table: &RawTable, fields: &FieldMap) -> Vec<ChargeOutcome> {
    table
        .rows
        .iter()
        .map(|row| {
            let category = fields
                .category
                .as_deref()
                .map(|header| RawTable::cell(row, header));
            ChargeRecord::from_raw(
                RawTable::cell(row, &fields.description),
                RawTable::cell(row, &fields.amount),
                category,
            )
        })
        .collect()
}

/// Read, resolve and extract one statement file.
pub fn load_account(path: impl AsRef<Path>, hints: &ColumnHints) -> Result<AccountBatch> {
    let path = path.as_ref();
    let table = read_table(path)?;
    let fields = FieldMap::resolve_with(&table.headers, hints)
        .with_context(|| format!("resolving columns of {}", path.display()))?;
    info!(
        "{}: {} rows, description={:?} amount={:?} category={:?}",
        path.display(),
        table.len(),
        fields.description,
        fields.amount,
        fields.category
    );
    let outcomes = charge_outcomes(&table, &fields);
    Ok(AccountBatch { outcomes })
}
