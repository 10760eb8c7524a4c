//! Property tests for normalization, accumulation and clustering.

use proptest::prelude::*;

use recur_core::{
    Accumulator, ChargeMap, ChargeOutcome, ChargeRecord, accumulate, cluster, merge_accounts,
    normalize,
};
use rust_decimal::Decimal;

const MERCHANTS: &[&str] = &[
    "NETFLIX.COM 8887800999",
    "netflix.com",
    "SPOTIFY USA",
    "SPOTIFY US",
    "UBER *7XK2 TRIP",
    "UBER TRIP",
    "AMAZON*AB12CD",
    "AMAZON PRIME",
    "STARBUCKS #12345",
    "",
];

fn record(merchant: usize, cents: i64) -> ChargeRecord {
    ChargeRecord {
        description: MERCHANTS[merchant].to_string(),
        amount: Decimal::new(cents, 2),
        category: None,
    }
}

fn records_strategy() -> impl Strategy<Value = Vec<ChargeRecord>> {
    prop::collection::vec((0..MERCHANTS.len(), 1_i64..1_000_000), 0..40)
        .prop_map(|rows| rows.into_iter().map(|(m, c)| record(m, c)).collect())
}

fn sum(records: &[ChargeRecord]) -> Decimal {
    records.iter().map(|r| r.amount).sum()
}

// =============================================================================
// Normalization
// =============================================================================
proptest! {
    #[test]
    fn normalize_is_idempotent(raw in "\\PC{0,60}") {
        let once = normalize(&raw);
        prop_assert_eq!(normalize(once.as_str()), once);
    }

    #[test]
    fn normalize_is_idempotent_on_statement_text(raw in "[A-Za-z0-9 *#.$/-]{0,60}") {
        let once = normalize(&raw);
        prop_assert_eq!(normalize(once.as_str()), once.clone());
        prop_assert!(once.as_str().chars().all(|c| c.is_ascii_uppercase() || c == ' '));
        prop_assert!(!once.as_str().contains("  "));
    }
}

// =============================================================================
// Accumulation
// =============================================================================
proptest! {
    #[test]
    fn totals_survive_any_permutation(
        (records, shuffled) in records_strategy()
            .prop_flat_map(|v| (Just(v.clone()), Just(v).prop_shuffle()))
    ) {
        let forward = accumulate(&records);
        let permuted = accumulate(&shuffled);

        prop_assert_eq!(forward.len(), permuted.len());
        for (key, bucket) in forward.iter() {
            let other = permuted.get(key.as_str()).unwrap();
            prop_assert_eq!(bucket.count(), other.count());
            prop_assert_eq!(bucket.total(), other.total());
        }
        prop_assert_eq!(forward.grand_total(), sum(&records));
        prop_assert_eq!(forward.charge_count(), records.len() as u64);
    }

    #[test]
    fn extreme_amounts_never_abort(
        amounts in prop::collection::vec(
            (any::<u32>(), any::<u32>(), any::<u32>(), 0_u32..=28),
            0..20,
        )
    ) {
        let mut acc = Accumulator::new();
        acc.extend(amounts.iter().map(|&(lo, mid, hi, scale)| {
            ChargeOutcome::Parsed(ChargeRecord {
                description: "BIG".to_string(),
                amount: Decimal::from_parts(lo, mid, hi, false, scale),
                category: None,
            })
        }));
        let (map, skipped) = acc.finish();
        prop_assert_eq!(map.charge_count() + skipped.overflow as u64, amounts.len() as u64);
    }
}

// =============================================================================
// Clustering and merging
// =============================================================================
proptest! {
    #[test]
    fn cluster_preserves_totals(records in records_strategy(), cutoff in 0.0_f64..=1.0) {
        let map = accumulate(&records);
        let clustered = cluster(&map, cutoff);

        prop_assert!(clustered.len() <= map.len());
        prop_assert_eq!(clustered.grand_total(), map.grand_total());
        prop_assert_eq!(clustered.charge_count(), map.charge_count());
        for key in clustered.keys() {
            prop_assert!(map.contains_key(key.as_str()));
        }
    }

    #[test]
    fn merge_preserves_totals(
        a in records_strategy(),
        b in records_strategy(),
        cutoff in 0.0_f64..=1.0,
    ) {
        let accounts: Vec<ChargeMap> = [a, b].iter().map(|r| accumulate(r)).collect();
        let merged = merge_accounts(&accounts, cutoff);

        let expected: Decimal = accounts.iter().map(ChargeMap::grand_total).sum();
        prop_assert_eq!(merged.grand_total(), expected);
        let count: u64 = accounts.iter().map(ChargeMap::charge_count).sum();
        prop_assert_eq!(merged.charge_count(), count);
    }
}
