//! External scanner process wrapper.
//!
//! Launches the configured scanner as a child process via
//! `tokio::process::Command`, captures its output streams, and parses the
//! structured payload out of stdout.

use std::process::Stdio;
use std::time::{Duration, Instant};

use tokio::process::Command;
use tokio::time::timeout;
use uuid::Uuid;

use orbit_core::types::{DeviceResult, ScanTarget};

use crate::config::EngineConfig;
use crate::error::{Result, ScanError};
use crate::payload;

/// Wrapper around the external scanner executable.
pub struct ScannerInvoker {
    scanner_path: String,
    scanner_args: Vec<String>,
    scan_timeout: Duration,
}

impl ScannerInvoker {
    pub fn new(config: &EngineConfig) -> Self {
        Self {
            scanner_path: config.scanner_path.clone(),
            scanner_args: config.scanner_args.clone(),
            scan_timeout: Duration::from_secs(config.scan_timeout_secs),
        }
    }

    /// Execute one scan of `target`.
    ///
    /// The scanner receives the target and a `"true"`/`"false"` stealth flag
    /// as positional arguments and is awaited until it exits or the timeout
    /// elapses (the process is killed on timeout). A non-zero exit status is
    /// logged but not fatal: the scanner may emit partial-but-usable output
    /// before failing, so stdout is still handed to the payload parser.
    pub async fn invoke(&self, target: &ScanTarget, stealth: bool) -> Result<Vec<DeviceResult>> {
        let scan_id = Uuid::new_v4();
        let start = Instant::now();

        tracing::info!(
            scan_id = %scan_id,
            target = %target,
            stealth,
            scanner = %self.scanner_path,
            "Launching scanner"
        );

        let mut cmd = Command::new(&self.scanner_path);
        cmd.args(&self.scanner_args)
            .arg(target.as_str())
            .arg(if stealth { "true" } else { "false" })
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true);

        let output = match timeout(self.scan_timeout, cmd.output()).await {
            Err(_) => {
                tracing::error!(scan_id = %scan_id, target = %target, "Scanner timed out");
                return Err(ScanError::Invocation {
                    reason: format!(
                        "scanner exceeded {}s timeout and was killed",
                        self.scan_timeout.as_secs()
                    ),
                });
            }
            Ok(Err(e)) => {
                return Err(ScanError::Invocation {
                    reason: format!("failed to launch {}: {e}", self.scanner_path),
                });
            }
            Ok(Ok(out)) => out,
        };

        let duration = start.elapsed();

        // Stderr is diagnostic only and never reaches the returned payload.
        let stderr = String::from_utf8_lossy(&output.stderr);
        if !stderr.trim().is_empty() {
            tracing::debug!(scan_id = %scan_id, stderr = %stderr.trim(), "Scanner stderr");
        }

        if !output.status.success() {
            tracing::warn!(
                scan_id = %scan_id,
                target = %target,
                code = output.status.code().unwrap_or(-1),
                "Scanner exited non-zero; attempting to parse captured output"
            );
        }

        let stdout = String::from_utf8_lossy(&output.stdout);
        let devices = payload::parse_scanner_output(&stdout)?;

        tracing::info!(
            scan_id = %scan_id,
            target = %target,
            devices = devices.len(),
            duration_ms = duration.as_millis(),
            "Scanner completed"
        );

        Ok(devices)
    }
}
