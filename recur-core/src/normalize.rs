//! Raw merchant description → stable grouping key.
//!
//! Rules, applied in order:
//! 1. uppercase
//! 2. drop `*codes` that carry at least one digit (`AMAZON*AB12CD` → `AMAZON`);
//!    letter-only codes survive (`AMAZON*PRIME` → `AMAZON PRIME`)
//! 3. every character that is not `A-Z` or whitespace becomes a space
//! 4. collapse whitespace, trim

use regex::Regex;
use serde::{Deserialize, Serialize};
use std::borrow::Borrow;
use std::fmt;
use std::sync::LazyLock;

static NOISE_CODE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\*\w*\d\w*").expect("noise code pattern"));
static NON_LETTER_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[^A-Z\s]").expect("non-letter pattern"));
static WHITESPACE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\s+").expect("whitespace pattern"));

/// A normalized description. Only [`normalize`] produces one.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct GroupKey(String);

impl GroupKey {
    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl fmt::Display for GroupKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl Borrow<str> for GroupKey {
    fn borrow(&self) -> &str {
        &self.0
    }
}

impl AsRef<str> for GroupKey {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// Normalize a raw description into its grouping key.
///
/// Total and idempotent: `normalize(normalize(x).as_str()) == normalize(x)`.
/// Blank input yields the empty key, which is still a valid bucket.
pub fn normalize(raw: &str) -> GroupKey {
    let upper = raw.to_uppercase();
    let without_codes = NOISE_CODE_RE.replace_all(&upper, "");
    let letters_only = NON_LETTER_RE.replace_all(&without_codes, " ");
    let collapsed = WHITESPACE_RE.replace_all(&letters_only, " ");
    GroupKey(collapsed.trim().to_string())
}
