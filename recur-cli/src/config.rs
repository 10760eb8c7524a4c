use anyhow::{Context, Result, bail};
use recur_core::Cutoffs;
use recur_ingest::ColumnHints;
use recur_report::ReportFormat;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

pub const DEFAULT_CONFIG_FILE: &str = "recur.toml";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub output_dir: PathBuf,
    pub format: ReportFormat,
    /// Also write the merged cross-account report.
    pub combined: bool,
    pub cutoffs: Cutoffs,
    /// Processed in this order; the order decides cluster representatives.
    pub accounts: Vec<AccountSource>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AccountSource {
    pub name: String,
    pub path: PathBuf,
    #[serde(default, skip_serializing_if = "is_default_hints")]
    pub columns: ColumnHints,
}

fn is_default_hints(hints: &ColumnHints) -> bool {
    *hints == ColumnHints::default()
}

impl Default for Config {
    fn default() -> Self {
        Self {
            output_dir: PathBuf::from("./output"),
            format: ReportFormat::Csv,
            combined: true,
            cutoffs: Cutoffs::default(),
            accounts: Vec::new(),
        }
    }
}

impl Config {
    pub fn validate(&self) -> Result<()> {
        for (label, cutoff) in [("account", self.cutoffs.account), ("combined", self.cutoffs.combined)] {
            if !(0.0..=1.0).contains(&cutoff) {
                bail!("{label} cutoff must be within [0, 1], got {cutoff}");
            }
        }
        let mut seen = std::collections::HashSet::new();
        for account in &self.accounts {
            if !seen.insert(account.name.as_str()) {
                bail!("account {:?} is listed twice", account.name);
            }
        }
        Ok(())
    }
}

/// Load `path`, falling back to defaults when the file does not exist.
pub fn load_config(path: &Path) -> Result<Config> {
    if !path.exists() {
        return Ok(Config::default());
    }
    let s = fs::read_to_string(path).with_context(|| format!("read {}", path.display()))?;
    toml::from_str(&s).with_context(|| format!("parse {}", path.display()))
}

pub fn save_config(path: &Path, cfg: &Config) -> Result<()> {
    let s = toml::to_string_pretty(cfg).context("serialize config")?;
    fs::write(path, s).with_context(|| format!("write {}", path.display()))?;
    Ok(())
}

pub fn init_config(path: &Path) -> Result<()> {
    if path.exists() {
        println!("Config already exists: {}", path.display());
        return Ok(());
    }
    let mut cfg = Config::default();
    cfg.accounts.push(AccountSource {
        name: "Checking".to_string(),
        path: PathBuf::from("./input/checking.csv"),
        columns: ColumnHints::default(),
    });
    save_config(path, &cfg)?;
    println!("Wrote {}", path.display());
    Ok(())
}

/// Parse `NAME=PATH` from the command line.
pub fn parse_account_arg(s: &str) -> Result<AccountSource, String> {
    let (name, path) = s
        .split_once('=')
        .ok_or_else(|| format!("expected NAME=PATH, got {s:?}"))?;
    let name = name.trim();
    if name.is_empty() || path.trim().is_empty() {
        return Err(format!("expected NAME=PATH, got {s:?}"));
    }
    Ok(AccountSource {
        name: name.to_string(),
        path: PathBuf::from(path.trim()),
        columns: ColumnHints::default(),
    })
}
