//! Export of floor test results.
//!
//! Reports are written with `serde_json` either as one JSON document or as
//! JSON Lines (one verified hop per line), to a file or to stdout.

mod report;
mod types;
mod writer;

pub use report::{FloorTestReport, ReportSummary};
pub use types::ExportFormat;
pub use writer::{write_report, write_to, STDOUT_PATH};
