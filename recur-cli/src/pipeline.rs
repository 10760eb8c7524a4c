//! Per-account runs and the combined report.

use anyhow::{Context, Result};
use log::{info, warn};
use recur_core::{ChargeMap, SkipStats, cluster, merge_accounts};
use recur_ingest::load_account;
use recur_report::{summary_path, write_report};
use std::path::PathBuf;

use crate::config::{AccountSource, Config};

pub const COMBINED_NAME: &str = "combined";

#[derive(Debug)]
pub struct AccountRun {
    pub name: String,
    /// Clustered map for this account alone.
    pub charges: ChargeMap,
    pub skipped: SkipStats,
    pub report: PathBuf,
}

#[derive(Debug, Default)]
pub struct RunOutcome {
    pub accounts: Vec<AccountRun>,
    pub missing: Vec<String>,
    pub combined: Option<(ChargeMap, PathBuf)>,
}

/// Accumulate and cluster one account.
pub fn process_account(source: &AccountSource, cutoff: f64) -> Result<(ChargeMap, SkipStats)> {
    let batch = load_account(&source.path, &source.columns)?;
    let (grouped, skipped) = batch.accumulate();
    let charges = cluster(&grouped, cutoff);
    info!(
        "{}: {} charges in {} groups ({} after clustering), {} rows skipped",
        source.name,
        grouped.charge_count(),
        grouped.len(),
        charges.len(),
        skipped.total()
    );
    Ok((charges, skipped))
}

/// Process every configured account in order, then the combined view.
///
/// A missing input file only skips that account; a file without the required
/// columns fails the run.
pub fn run(config: &Config) -> Result<RunOutcome> {
    let mut outcome = RunOutcome::default();

    for source in &config.accounts {
        if !source.path.exists() {
            warn!("{} not found, skipping {}", source.path.display(), source.name);
            outcome.missing.push(source.name.clone());
            continue;
        }

        let (charges, skipped) = process_account(source, config.cutoffs.account)
            .with_context(|| format!("account {}", source.name))?;
        let report = summary_path(&config.output_dir, &source.name, config.format);
        write_report(&report, &charges, config.format)?;

        outcome.accounts.push(AccountRun {
            name: source.name.clone(),
            charges,
            skipped,
            report,
        });
    }

    if config.combined && !outcome.accounts.is_empty() {
        if config.accounts.iter().any(|a| a.name == COMBINED_NAME) {
            warn!("an account named {COMBINED_NAME:?} is overwritten by the combined report");
        }
        let combined = merge_accounts(
            outcome.accounts.iter().map(|a| &a.charges),
            config.cutoffs.combined,
        );
        let report = summary_path(&config.output_dir, COMBINED_NAME, config.format);
        write_report(&report, &combined, config.format)?;
        outcome.combined = Some((combined, report));
    }

    Ok(outcome)
}
