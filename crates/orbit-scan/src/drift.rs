//! Drift detection: newly opened ports relative to the previous scan.

use std::collections::BTreeSet;

use orbit_core::types::{DriftAlert, ScanRecord};

/// Compare the current scan against the most recent record for the same
/// target and report newly opened ports.
///
/// Drift is computed at primary-device granularity: only the first
/// [`DeviceResult`](orbit_core::types::DeviceResult) of each record is
/// compared. For multi-device subnet scans this misses drift on secondary
/// devices; per-device comparison across the full result set is a known
/// candidate generalization, kept out until there is product guidance.
///
/// Pure and deterministic. A missing `previous` (first-ever scan of a
/// target) and ports that closed since the last scan both produce `None` —
/// only newly opened surface is drift.
pub fn detect_drift(previous: Option<&ScanRecord>, current: &ScanRecord) -> Option<DriftAlert> {
    let previous = previous?;

    let previous_ports = previous
        .primary_device()
        .map(|d| d.open_ports())
        .unwrap_or_default();
    let current_ports = current
        .primary_device()
        .map(|d| d.open_ports())
        .unwrap_or_default();

    let newly_opened: BTreeSet<u16> = current_ports
        .difference(&previous_ports)
        .copied()
        .collect();

    if newly_opened.is_empty() {
        return None;
    }

    tracing::info!(
        target = %current.target,
        ports = ?newly_opened,
        "Drift detected against previous scan"
    );

    Some(DriftAlert::new(newly_opened))
}

#[cfg(test)]
mod tests {
    use super::*;
    use orbit_core::types::{DeviceResult, RiskLevel, ScanTarget, VulnFinding};

    fn record(ports_per_device: &[&[u16]]) -> ScanRecord {
        ScanRecord::new(
            ScanTarget::parse("10.0.0.5").unwrap(),
            false,
            ports_per_device
                .iter()
                .enumerate()
                .map(|(i, ports)| DeviceResult {
                    ip: format!("10.0.0.{}", i + 5),
                    device_type: "Workstation".into(),
                    vulns: ports
                        .iter()
                        .map(|&port| VulnFinding {
                            port,
                            service: "svc".into(),
                            product: None,
                            version: None,
                            risk: RiskLevel::Low,
                            info: "test".into(),
                            remediation: None,
                            cves: None,
                        })
                        .collect(),
                })
                .collect(),
        )
    }

    #[test]
    fn first_scan_never_drifts() {
        assert!(detect_drift(None, &record(&[&[22, 80, 443]])).is_none());
        assert!(detect_drift(None, &record(&[])).is_none());
    }

    #[test]
    fn newly_opened_ports_are_reported_closed_ones_are_not() {
        let previous = record(&[&[21, 22, 80]]);
        let current = record(&[&[22, 80, 443]]);

        let alert = detect_drift(Some(&previous), &current).unwrap();
        assert_eq!(
            alert.newly_opened_ports,
            BTreeSet::from([443]),
            "only 443 opened; closed port 21 is not drift"
        );
        assert!(alert.message.contains('1'));
        assert!(!alert.message.contains("21"));
    }

    #[test]
    fn identical_port_sets_produce_no_drift() {
        let previous = record(&[&[22, 80]]);
        let current = record(&[&[80, 22]]);
        assert!(detect_drift(Some(&previous), &current).is_none());
    }

    #[test]
    fn only_primary_device_is_compared() {
        // Port 3389 opens on a secondary device; at primary-device
        // granularity that is not drift.
        let previous = record(&[&[22], &[80]]);
        let current = record(&[&[22], &[80, 3389]]);
        assert!(detect_drift(Some(&previous), &current).is_none());
    }

    #[test]
    fn empty_previous_result_set_counts_all_current_ports() {
        let previous = record(&[]);
        let current = record(&[&[22, 8080]]);
        let alert = detect_drift(Some(&previous), &current).unwrap();
        assert_eq!(alert.newly_opened_ports, BTreeSet::from([22, 8080]));
    }

    #[test]
    fn empty_current_result_set_produces_no_drift() {
        let previous = record(&[&[22]]);
        let current = record(&[]);
        assert!(detect_drift(Some(&previous), &current).is_none());
    }
}
