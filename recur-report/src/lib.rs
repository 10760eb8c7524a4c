//! recur-report: recurring-charge tables written as CSV or JSON.

pub mod rows;
pub mod writer;

pub use rows::{MONTHS_PER_YEAR, ReportRow, format_currency, monthly_average, report_rows};
pub use writer::{ReportFormat, summary_path, write_csv, write_json, write_report};
