//! Export types.

use clap::ValueEnum;

/// Report output format.
#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum ExportFormat {
    /// One pretty-printed JSON document with hops and summary
    Json,
    /// One verified hop per line (JSON Lines), for piping to `jq`
    Jsonl,
}
