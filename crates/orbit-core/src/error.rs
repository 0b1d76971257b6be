//! Error types for the orbit-core crate.

use thiserror::Error;

/// Rejection reasons for strings that do not satisfy the scan target grammar.
///
/// A valid target is a strict dotted-quad IPv4 address, optionally followed
/// by `/<prefix>` with prefix in 0..=32, or the loopback alias `localhost`.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TargetParseError {
    #[error("empty target")]
    Empty,

    #[error("not a valid IPv4 address: {0:?}")]
    InvalidAddress(String),

    #[error("invalid CIDR prefix length (must be 0-32): {0:?}")]
    InvalidPrefix(String),
}
