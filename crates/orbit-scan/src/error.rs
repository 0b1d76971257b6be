//! Error types for the orbit-scan crate.

use orbit_core::TargetParseError;
use thiserror::Error;

// History failures are deliberately absent here: the store surfaces
// [`HistoryError`](crate::history::HistoryError) to the engine, which logs
// and continues — they never reach `run_scan` callers.
#[derive(Error, Debug)]
pub enum ScanError {
    /// Target rejected before any subprocess work; recoverable by the caller
    /// supplying a corrected target.
    #[error("invalid scan target: {0}")]
    InvalidTarget(#[from] TargetParseError),

    /// The scanner could not be launched or did not finish in time.
    /// Operator-actionable; never retried automatically.
    #[error("scanner invocation failed: {reason}")]
    Invocation { reason: String },

    /// The scanner ran but emitted no recognizable structured payload.
    #[error("scanner produced no usable output: {detail} (output excerpt: {excerpt:?})")]
    MalformedOutput { detail: String, excerpt: String },
}

pub type Result<T> = std::result::Result<T, ScanError>;
