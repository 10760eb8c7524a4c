//! recur-core: description normalization and fuzzy aggregation of recurring charges.
//!
//! Pipeline per account: `ChargeRecord`s → [`normalize`] → [`accumulate`] → [`cluster`].
//! Across accounts: [`merge_accounts`] folds the per-account maps by exact key and
//! clusters the result a second time.

pub mod accumulate;
pub mod bucket;
pub mod charge;
pub mod cluster;
pub mod merge;
pub mod normalize;
pub mod similarity;

pub use accumulate::{Accumulator, SkipStats, accumulate};
pub use bucket::{AggregateBucket, ChargeMap, FlatEntry, TotalOverflow};
pub use charge::{ChargeOutcome, ChargeRecord, SkipReason, parse_amount};
pub use cluster::{Cutoffs, DEFAULT_CUTOFF, cluster};
pub use merge::{fold_entries, merge_accounts};
pub use normalize::{GroupKey, normalize};
pub use similarity::similarity;
