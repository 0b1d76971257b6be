//! orbit-scan: Scan orchestration and drift detection engine.
//!
//! Wraps an external port scanner as a subprocess, keeps an append-only
//! history of scan results, and flags newly opened attack surface relative
//! to the previous scan of the same target.

pub mod config;
pub mod drift;
pub mod engine;
pub mod error;
pub mod history;
pub mod invoker;
pub mod netinfo;
pub mod payload;
