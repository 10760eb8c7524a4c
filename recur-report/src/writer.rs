//! Writing report files.

use anyhow::{Context, Result};
use log::info;
use recur_core::ChargeMap;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

use crate::rows::{format_currency, report_rows};

pub const CSV_HEADER: [&str; 5] = ["Description", "Category", "Count", "Total", "Monthly Average"];

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReportFormat {
    #[default]
    Csv,
    Json,
}

impl ReportFormat {
    pub fn extension(&self) -> &'static str {
        match self {
            ReportFormat::Csv => "csv",
            ReportFormat::Json => "json",
        }
    }
}

/// `{output_dir}/{name}_summary.{ext}`
pub fn summary_path(output_dir: &Path, name: &str, format: ReportFormat) -> PathBuf {
    output_dir.join(format!("{name}_summary.{}", format.extension()))
}

pub fn write_report(path: &Path, map: &ChargeMap, format: ReportFormat) -> Result<()> {
    match format {
        ReportFormat::Csv => write_csv(path, map),
        ReportFormat::Json => write_json(path, map),
    }
}

/// Header plus one line per recurring key. No recurring keys → header only.
pub fn write_csv(path: &Path, map: &ChargeMap) -> Result<()> {
    ensure_parent(path)?;
    let mut wtr =
        csv::Writer::from_path(path).with_context(|| format!("creating {}", path.display()))?;
    wtr.write_record(CSV_HEADER)?;

    let rows = report_rows(map);
    for row in &rows {
        wtr.write_record([
            row.description.clone(),
            row.category.clone().unwrap_or_default(),
            row.count.to_string(),
            format_currency(row.total),
            format_currency(row.monthly_average),
        ])?;
    }
    wtr.flush().with_context(|| format!("writing {}", path.display()))?;

    info!("wrote {} ({} recurring)", path.display(), rows.len());
    Ok(())
}

pub fn write_json(path: &Path, map: &ChargeMap) -> Result<()> {
    ensure_parent(path)?;
    let rows = report_rows(map);
    let json = serde_json::to_string_pretty(&rows)?;
    fs::write(path, json).with_context(|| format!("write {}", path.display()))?;

    info!("wrote {} ({} recurring)", path.display(), rows.len());
    Ok(())
}

fn ensure_parent(path: &Path) -> Result<()> {
    if let Some(dir) = path.parent().filter(|d| !d.as_os_str().is_empty()) {
        fs::create_dir_all(dir).with_context(|| format!("create {}", dir.display()))?;
    }
    Ok(())
}
