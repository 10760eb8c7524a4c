//! recur-ingest: statement CSV reading and column resolution feeding `recur-core`.

pub mod batch;
pub mod fields;
pub mod table;

pub use batch::{AccountBatch, charge_outcomes, load_account};
pub use fields::{ColumnHints, FieldMap, find_column};
pub use table::{RawTable, read_table, read_table_from_reader};
