//! Core domain types for the Orbit exposure scanner.
//!
//! These types describe scan targets, scanner findings, historical scan
//! records, and drift alerts. They are the wire shapes shared between the
//! engine, the history store, and the boundary layer.

use std::collections::BTreeSet;
use std::fmt;
use std::net::Ipv4Addr;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::TargetParseError;

// ── Scan Target ───────────────────────────────────────────────────

/// Loopback alias accepted in place of a dotted-quad address.
pub const LOOPBACK_ALIAS: &str = "localhost";

/// A validated scan target: an IPv4 address, an IPv4 CIDR block, or the
/// loopback alias.
///
/// The original input string is preserved verbatim; two targets are equal
/// iff their input strings are equal (no CIDR containment semantics). This
/// is also the representation persisted in history records, so lookups by
/// target are exact string matches.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(try_from = "String", into = "String")]
pub struct ScanTarget(String);

impl ScanTarget {
    /// Validate `input` against the target grammar.
    pub fn parse(input: &str) -> Result<Self, TargetParseError> {
        let trimmed = input.trim();
        if trimmed.is_empty() {
            return Err(TargetParseError::Empty);
        }
        if trimmed == LOOPBACK_ALIAS {
            return Ok(Self(trimmed.to_string()));
        }

        let (addr_part, prefix_part) = match trimmed.split_once('/') {
            Some((a, p)) => (a, Some(p)),
            None => (trimmed, None),
        };

        // std's Ipv4Addr parser enforces strict dotted-quad syntax
        // (four octets, no leading zeros, no shorthand forms).
        if addr_part.parse::<Ipv4Addr>().is_err() {
            return Err(TargetParseError::InvalidAddress(addr_part.to_string()));
        }

        if let Some(prefix) = prefix_part {
            match prefix.parse::<u8>() {
                Ok(n) if n <= 32 => {}
                _ => return Err(TargetParseError::InvalidPrefix(prefix.to_string())),
            }
        }

        Ok(Self(trimmed.to_string()))
    }

    /// The validated target string, as supplied.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl FromStr for ScanTarget {
    type Err = TargetParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl TryFrom<String> for ScanTarget {
    type Error = TargetParseError;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        Self::parse(&s)
    }
}

impl From<ScanTarget> for String {
    fn from(t: ScanTarget) -> String {
        t.0
    }
}

impl fmt::Display for ScanTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

// ── Findings ──────────────────────────────────────────────────────

/// Risk classification assigned to a finding by the scanner.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum RiskLevel {
    Low,
    Medium,
    High,
}

/// A single vulnerability finding on an open port.
///
/// Immutable once produced by the scanner; field order and contents are
/// passed through to the boundary verbatim.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct VulnFinding {
    pub port: u16,
    pub service: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub product: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub version: Option<String>,
    pub risk: RiskLevel,
    pub info: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub remediation: Option<String>,
    /// CVE identifiers in scanner-reported order.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cves: Option<Vec<String>>,
}

/// One discovered device and its findings, in scanner-reported order.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct DeviceResult {
    pub ip: String,
    /// Device classification label (e.g. "Router/Gateway", "Workstation").
    #[serde(rename = "type")]
    pub device_type: String,
    pub vulns: Vec<VulnFinding>,
}

impl DeviceResult {
    /// The set of ports with findings on this device.
    pub fn open_ports(&self) -> BTreeSet<u16> {
        self.vulns.iter().map(|v| v.port).collect()
    }
}

// ── Scan Records ──────────────────────────────────────────────────

/// A completed scan, as appended to the history store.
///
/// Created exactly once per completed invocation and never mutated.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ScanRecord {
    pub timestamp: DateTime<Utc>,
    pub target: ScanTarget,
    pub stealth: bool,
    pub results: Vec<DeviceResult>,
}

impl ScanRecord {
    pub fn new(target: ScanTarget, stealth: bool, results: Vec<DeviceResult>) -> Self {
        Self {
            timestamp: Utc::now(),
            target,
            stealth,
            results,
        }
    }

    /// The primary device of this scan, if any was reported.
    ///
    /// Drift is currently computed at primary-device granularity only; see
    /// [`DriftAlert`].
    pub fn primary_device(&self) -> Option<&DeviceResult> {
        self.results.first()
    }
}

// ── Drift ─────────────────────────────────────────────────────────

/// Alert raised when a scan reports ports open that the previous scan of
/// the same target did not.
///
/// Derived per scan from the two records being compared; never persisted
/// on its own.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct DriftAlert {
    /// Discriminator for the boundary layer; always `"DRIFT_DETECTED"`.
    pub kind: String,
    pub message: String,
    pub newly_opened_ports: BTreeSet<u16>,
}

pub const DRIFT_DETECTED: &str = "DRIFT_DETECTED";

impl DriftAlert {
    pub fn new(newly_opened_ports: BTreeSet<u16>) -> Self {
        let message = format!(
            "{} previously closed port(s) now open: {}",
            newly_opened_ports.len(),
            newly_opened_ports
                .iter()
                .map(|p| p.to_string())
                .collect::<Vec<_>>()
                .join(", ")
        );
        Self {
            kind: DRIFT_DETECTED.to_string(),
            message,
            newly_opened_ports,
        }
    }
}

// ── Network Discovery ─────────────────────────────────────────────

/// A local IPv4 interface, as reported by the OS at call time.
///
/// Never cached: callers re-enumerate to observe live state.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct NetworkInterfaceInfo {
    pub name: String,
    pub addr: Ipv4Addr,
    pub netmask: Ipv4Addr,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub mac: Option<String>,
    /// Network base + prefix length, e.g. `"10.0.0.0/24"`.
    pub cidr: String,
}
