//! Hop-chain plausibility validation.
//!
//! The validator folds an ordered list of [`HopRecord`](crate::hop::HopRecord)s
//! through a small state machine (`NoAnchor -> Anchored`, optionally `Halted`),
//! comparing every eligible hop with the last accepted one.

mod chain;
mod types;

pub use chain::HopChainValidator;
pub use types::{
    Anchor, ChainOutcome, ExcludedHop, ExclusionReason, ValidatorOptions, VerifiedHop,
};
