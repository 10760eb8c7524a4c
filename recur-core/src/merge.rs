//! Cross-account merge: exact-key fold, then a second clustering pass.

use crate::bucket::{ChargeMap, FlatEntry};
use crate::cluster::cluster;
use log::debug;

/// Fold flattened entries by exact key, keeping first-seen order.
pub fn fold_entries<I>(entries: I) -> ChargeMap
where
    I: IntoIterator<Item = FlatEntry>,
{
    entries.into_iter().map(FlatEntry::into_parts).collect()
}

/// Combine per-account maps (in the caller's order) into one and re-cluster.
///
/// Identical keys from different accounts are summed first; keys that are
/// only similar are joined by the clustering pass at `cutoff`.
pub fn merge_accounts<'a, I>(accounts: I, cutoff: f64) -> ChargeMap
where
    I: IntoIterator<Item = &'a ChargeMap>,
{
    let mut folded = ChargeMap::new();
    for map in accounts {
        for (key, bucket) in map.iter() {
            folded.fold(key.clone(), bucket.clone());
        }
    }
    debug!("folded {} keys across accounts", folded.len());
    cluster(&folded, cutoff)
}
