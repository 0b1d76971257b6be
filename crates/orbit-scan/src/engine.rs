//! Orchestration facade: validate → look up history → scan → drift → persist.

use serde::Serialize;

use orbit_core::types::{DeviceResult, DriftAlert, ScanRecord, ScanTarget};

use crate::config::EngineConfig;
use crate::drift::detect_drift;
use crate::error::Result;
use crate::history::{HistoryStore, JsonlHistoryStore};
use crate::invoker::ScannerInvoker;

/// What a completed `run_scan` hands back to the boundary layer.
#[derive(Debug, Serialize)]
pub struct ScanOutcome {
    pub results: Vec<DeviceResult>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub drift: Option<DriftAlert>,
}

/// The engine's sole mutating entry point.
///
/// Each `run_scan` call is an independent unit of work; admission control
/// and queueing belong to the boundary layer. Concurrent calls for the
/// same target can race on history order: two concurrent first-time scans
/// may each observe "no previous record" and neither will report drift
/// against the other. Per-target serialization is deliberately not imposed
/// here.
pub struct ScanEngine<H: HistoryStore> {
    invoker: ScannerInvoker,
    history: H,
}

impl ScanEngine<JsonlHistoryStore> {
    pub fn from_config(config: &EngineConfig) -> Self {
        Self::new(
            ScannerInvoker::new(config),
            JsonlHistoryStore::new(&config.history_path),
        )
    }
}

impl<H: HistoryStore> ScanEngine<H> {
    pub fn new(invoker: ScannerInvoker, history: H) -> Self {
        Self { invoker, history }
    }

    /// Run one scan of `target` and compare it against the most recent
    /// recorded scan of the same target.
    ///
    /// Hard failures (invalid target, scanner launch/timeout, unusable
    /// output) are surfaced immediately. History is best-effort in both
    /// directions: a failed lookup degrades to "no previous record" and a
    /// failed append is logged without affecting the response. Every
    /// completed scan appends a fresh record — repeated identical calls
    /// produce independent history entries, this is an audit trail, not a
    /// cache.
    pub async fn run_scan(&self, target: &str, stealth: bool) -> Result<ScanOutcome> {
        let target = ScanTarget::parse(target)?;

        let previous = match self.history.most_recent_for(&target) {
            Ok(p) => p,
            Err(e) => {
                tracing::warn!(target = %target, error = %e, "History lookup failed; treating as first scan");
                None
            }
        };

        let results = self.invoker.invoke(&target, stealth).await?;

        let record = ScanRecord::new(target.clone(), stealth, results);
        let drift = detect_drift(previous.as_ref(), &record);

        if let Err(e) = self.history.append(&record) {
            tracing::warn!(target = %target, error = %e, "Failed to append scan record to history");
        }

        Ok(ScanOutcome {
            results: record.results,
            drift,
        })
    }
}
