//! Greedy fuzzy clustering of near-duplicate group keys.
//!
//! Single pass over the input in insertion order. Each key either merges into
//! the closest key already accepted (score >= cutoff) or becomes a new
//! representative. There is no re-clustering: a key can only merge into one
//! that came before it, and two keys bridged by a third are not joined unless
//! they are close to each other. Which label survives therefore depends on
//! input order.

use crate::bucket::ChargeMap;
use crate::similarity::similarity;
use log::debug;
use serde::{Deserialize, Serialize};

pub const DEFAULT_CUTOFF: f64 = 0.85;

/// Cutoffs for the two clustering passes.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Cutoffs {
    /// Within one account's own keys.
    pub account: f64,
    /// Across the combined accounts.
    pub combined: f64,
}

impl Default for Cutoffs {
    fn default() -> Self {
        Self {
            account: DEFAULT_CUTOFF,
            combined: DEFAULT_CUTOFF,
        }
    }
}

/// Merge keys of `map` whose similarity reaches `cutoff` (inclusive).
///
/// The cutoff is clamped to `[0, 1]`; NaN counts as 1.0, so only identical
/// keys could merge. Never fails; an empty map clusters to an empty map.
pub fn cluster(map: &ChargeMap, cutoff: f64) -> ChargeMap {
    let cutoff = if cutoff.is_nan() { 1.0 } else { cutoff.clamp(0.0, 1.0) };
    let mut merged = ChargeMap::with_capacity(map.len());

    for (key, bucket) in map.iter() {
        match closest(&merged, key.as_str(), cutoff) {
            Some((i, score)) => {
                debug!(
                    "merging {:?} into {:?} (score {score:.3})",
                    key.as_str(),
                    merged.key_at(i).as_str()
                );
                merged.absorb_at(i, bucket);
            }
            None => {
                merged.push_new(key.clone(), bucket.clone());
            }
        }
    }

    merged
}

/// Index and score of the best accepted key at or above `cutoff`.
/// Ties keep the earliest key.
fn closest(accepted: &ChargeMap, candidate: &str, cutoff: f64) -> Option<(usize, f64)> {
    let mut best: Option<(usize, f64)> = None;
    for (i, existing) in accepted.keys().enumerate() {
        let score = similarity(existing.as_str(), candidate);
        if score < cutoff {
            continue;
        }
        if best.is_none_or(|(_, top)| score > top) {
            best = Some((i, score));
        }
    }
    best
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bucket::AggregateBucket;
    use crate::normalize::normalize;
    use rust_decimal::Decimal;

    fn map_of(entries: &[(&str, u32, i64)]) -> ChargeMap {
        entries
            .iter()
            .map(|&(key, count, cents)| {
                (normalize(key), AggregateBucket::new(count, Decimal::new(cents, 2), None))
            })
            .collect()
    }

    fn keys(map: &ChargeMap) -> Vec<&str> {
        map.keys().map(|k| k.as_str()).collect()
    }

    #[test]
    fn merges_close_keys_into_first_seen() {
        let map = map_of(&[("SPOTIFY USA", 3, 3297), ("HULU", 2, 1598), ("SPOTIFY US", 1, 1099)]);
        let out = cluster(&map, DEFAULT_CUTOFF);

        assert_eq!(keys(&out), vec!["SPOTIFY USA", "HULU"]);
        let spotify = out.get("SPOTIFY USA").unwrap();
        assert_eq!(spotify.count(), 4);
        assert_eq!(spotify.total(), Decimal::new(4396, 2));
    }

    #[test]
    fn representative_depends_on_order() {
        let forward = cluster(&map_of(&[("SPOTIFY USA", 1, 100), ("SPOTIFY US", 1, 100)]), 0.85);
        let backward = cluster(&map_of(&[("SPOTIFY US", 1, 100), ("SPOTIFY USA", 1, 100)]), 0.85);
        assert_eq!(keys(&forward), vec!["SPOTIFY USA"]);
        assert_eq!(keys(&backward), vec!["SPOTIFY US"]);
        assert_eq!(forward.get("SPOTIFY USA").unwrap().count(), 2);
        assert_eq!(backward.get("SPOTIFY US").unwrap().count(), 2);
    }

    #[test]
    fn cutoff_is_inclusive() {
        // similarity("ABCD", "ABCE") == 0.75 exactly
        let map = map_of(&[("ABCD", 1, 100), ("ABCE", 1, 100)]);
        assert_eq!(cluster(&map, 0.75).len(), 1);
        assert_eq!(cluster(&map, 0.750_000_1).len(), 2);
    }

    #[test]
    fn picks_highest_score_not_first_match() {
        // "NETFLIX COM" vs "NETFLIX": 14/18; "NETFLIX CO" vs "NETFLIX COM": 20/21
        let map = map_of(&[("NETFLIX", 1, 100), ("NETFLIX COM", 1, 200), ("NETFLIX CO", 1, 400)]);
        let out = cluster(&map, 0.7);
        // "NETFLIX COM" merged into "NETFLIX" (0.78 >= 0.7); "NETFLIX CO" then only sees "NETFLIX"
        assert_eq!(keys(&out), vec!["NETFLIX"]);
        assert_eq!(out.get("NETFLIX").unwrap().total(), Decimal::new(700, 2));

        let out = cluster(&map, 0.8);
        assert_eq!(keys(&out), vec!["NETFLIX", "NETFLIX COM"]);
        // "NETFLIX CO": vs "NETFLIX" 14/17 = 0.82, vs "NETFLIX COM" 20/21 = 0.95
        assert_eq!(out.get("NETFLIX COM").unwrap().total(), Decimal::new(600, 2));
        assert_eq!(out.get("NETFLIX").unwrap().total(), Decimal::new(100, 2));
    }

    #[test]
    fn ties_go_to_earliest_representative() {
        // "ABCDE" scores 8/9 against both "ABCD" and "ABCE"
        let map = map_of(&[("ABCD", 1, 100), ("ABCE", 1, 100), ("ABCDE", 1, 500)]);
        let out = cluster(&map, 0.8);
        assert_eq!(keys(&out), vec!["ABCD", "ABCE"]);
        assert_eq!(out.get("ABCD").unwrap().count(), 2);
        assert_eq!(out.get("ABCE").unwrap().count(), 1);
    }

    #[test]
    fn no_transitive_merge() {
        // B is close to both A and C, but A and C are not close to each other
        let a = "ABCDEFGH";
        let b = "ABCDEFGHIJ";
        let c = "ABCDEFGHIJKLM";
        let out = cluster(&map_of(&[(a, 1, 100), (b, 1, 100), (c, 1, 100)]), 0.8);
        assert_eq!(keys(&out), vec![a, c]);
        assert_eq!(out.get(a).unwrap().count(), 2);
    }

    #[test]
    fn adopts_category_only_when_unset() {
        let mut map = ChargeMap::new();
        map.fold(normalize("SPOTIFY USA"), AggregateBucket::new(1, Decimal::ONE, None));
        map.fold(
            normalize("SPOTIFY US"),
            AggregateBucket::new(1, Decimal::ONE, Some("Streaming".to_string())),
        );
        map.fold(
            normalize("SPOTIFY USAA"),
            AggregateBucket::new(1, Decimal::ONE, Some("Music".to_string())),
        );
        let out = cluster(&map, 0.85);
        assert_eq!(out.len(), 1);
        assert_eq!(out.get("SPOTIFY USA").unwrap().category(), Some("Streaming"));
    }

    #[test]
    fn nan_cutoff_merges_nothing() {
        let map = map_of(&[("SPOTIFY USA", 1, 100), ("SPOTIFY US", 1, 100), ("HULU", 1, 100)]);
        assert_eq!(cluster(&map, f64::NAN), map);
        assert_eq!(cluster(&map, -3.0), cluster(&map, 0.0));
        assert_eq!(cluster(&map, 7.0), map);
    }

    #[test]
    fn empty_map_is_fine() {
        assert!(cluster(&ChargeMap::new(), 0.85).is_empty());
    }

    #[test]
    fn preserves_totals() {
        let map = map_of(&[
            ("AMAZON MKTPL", 3, 4500),
            ("AMAZON PRIME", 2, 2598),
            ("AMAZON MKTP", 1, 1200),
            ("WHOLE FOODS", 4, 21000),
        ]);
        for cutoff in [0.0, 0.5, 0.85, 1.0] {
            let out = cluster(&map, cutoff);
            assert_eq!(out.grand_total(), map.grand_total());
            assert_eq!(out.charge_count(), map.charge_count());
        }
        // cutoff 0 merges everything into the first key
        assert_eq!(keys(&cluster(&map, 0.0)), vec!["AMAZON MKTPL"]);
        // cutoff 1 merges only identical text, and keys are already unique
        assert_eq!(cluster(&map, 1.0), map);
    }
}
