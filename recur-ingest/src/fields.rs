//! Locate the description / amount / category columns in arbitrary bank exports.

use anyhow::{Result, bail};
use serde::{Deserialize, Serialize};

pub const DESCRIPTION_KEYWORDS: &[&str] = &["desc"];
pub const AMOUNT_KEYWORDS: &[&str] = &["amount", "amt"];
pub const CATEGORY_KEYWORDS: &[&str] = &["category"];

/// First header (in header order) whose lowercase form contains any keyword.
pub fn find_column<'a, S: AsRef<str>>(headers: &'a [S], candidates: &[&str]) -> Option<&'a str> {
    headers.iter().map(|h| h.as_ref()).find(|h| {
        let lower = h.to_lowercase();
        candidates.iter().any(|c| lower.contains(c))
    })
}

/// Explicit column names that bypass keyword matching.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ColumnHints {
    pub description: Option<String>,
    pub amount: Option<String>,
    pub category: Option<String>,
}

/// Resolved header names for one source.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldMap {
    pub description: String,
    pub amount: String,
    /// `None` when the source has no category column at all.
    pub category: Option<String>,
}

impl FieldMap {
    /// Resolve by keyword. Description and amount are required.
    pub fn resolve<S: AsRef<str>>(headers: &[S]) -> Result<Self> {
        Self::resolve_with(headers, &ColumnHints::default())
    }

    /// Resolve using explicit hints where given, keywords otherwise.
    pub fn resolve_with<S: AsRef<str>>(headers: &[S], hints: &ColumnHints) -> Result<Self> {
        let description = pick(
            headers,
            hints.description.as_deref(),
            DESCRIPTION_KEYWORDS,
            "description",
        )?;
        let amount = pick(headers, hints.amount.as_deref(), AMOUNT_KEYWORDS, "amount")?;
        let category = match hints.category.as_deref() {
            Some(name) => Some(exact(headers, name, "category")?),
            None => find_column(headers, CATEGORY_KEYWORDS).map(str::to_string),
        };

        Ok(Self {
            description,
            amount,
            category,
        })
    }
}

fn pick<S: AsRef<str>>(
    headers: &[S],
    hint: Option<&str>,
    keywords: &[&str],
    field: &str,
) -> Result<String> {
    if let Some(name) = hint {
        return exact(headers, name, field);
    }
    match find_column(headers, keywords) {
        Some(h) => Ok(h.to_string()),
        None => bail!(
            "no {field} column (looked for {keywords:?}) in headers [{}]",
            joined(headers)
        ),
    }
}

fn exact<S: AsRef<str>>(headers: &[S], name: &str, field: &str) -> Result<String> {
    match headers.iter().map(|h| h.as_ref()).find(|h| *h == name) {
        Some(h) => Ok(h.to_string()),
        None => bail!(
            "configured {field} column {name:?} not in headers [{}]",
            joined(headers)
        ),
    }
}

fn joined<S: AsRef<str>>(headers: &[S]) -> String {
    headers.iter().map(|h| h.as_ref()).collect::<Vec<_>>().join(", ")
}
