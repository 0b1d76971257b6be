//! Payload extraction from raw scanner output.
//!
//! The external scanner is expected to emit a single JSON array of device
//! results somewhere in its stdout, possibly surrounded by banner and
//! progress lines. Extraction takes the span from the first `[` to the last
//! `]`; anything outside that span is discarded. This is a heuristic with
//! known failure modes (a stray bracket in a banner line shifts the span),
//! kept as an explicit, separately tested step until the scanner grows a
//! dedicated output channel.

use orbit_core::types::DeviceResult;

use crate::error::{Result, ScanError};

/// Maximum length of the raw-output excerpt attached to parse errors.
const EXCERPT_MAX_CHARS: usize = 240;

/// Extract and parse the device-result array from raw scanner stdout.
///
/// Fails with [`ScanError::MalformedOutput`] when no bracketed span exists
/// or the span is not a structurally valid array of device results. Partial
/// payloads are never accepted.
pub fn parse_scanner_output(raw: &str) -> Result<Vec<DeviceResult>> {
    let token = extract_array_token(raw).ok_or_else(|| ScanError::MalformedOutput {
        detail: "no JSON array found in scanner output".to_string(),
        excerpt: excerpt(raw),
    })?;

    serde_json::from_str(token).map_err(|e| ScanError::MalformedOutput {
        detail: e.to_string(),
        excerpt: excerpt(token),
    })
}

/// The span from the first `[` to the last `]`, if both exist in order.
fn extract_array_token(raw: &str) -> Option<&str> {
    let start = raw.find('[')?;
    let end = raw.rfind(']')?;
    if end < start {
        return None;
    }
    Some(&raw[start..=end])
}

/// Char-boundary-safe truncation for diagnostics.
fn excerpt(raw: &str) -> String {
    let trimmed = raw.trim();
    if trimmed.chars().count() <= EXCERPT_MAX_CHARS {
        return trimmed.to_string();
    }
    let mut out: String = trimmed.chars().take(EXCERPT_MAX_CHARS).collect();
    out.push_str("...");
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use orbit_core::types::RiskLevel;

    const PAYLOAD: &str = r#"[{"ip": "192.168.1.102", "type": "Workstation", "vulns": [
        {"port": 22, "service": "ssh", "risk": "low", "info": "Standard ssh service"}
    ]}]"#;

    #[test]
    fn parses_bare_payload() {
        let devices = parse_scanner_output(PAYLOAD).unwrap();
        assert_eq!(devices.len(), 1);
        assert_eq!(devices[0].ip, "192.168.1.102");
        assert_eq!(devices[0].vulns[0].risk, RiskLevel::Low);
    }

    #[test]
    fn tolerates_banner_and_progress_lines() {
        let raw = format!(
            "Starting probe engine 2.1\nProgress: 45%\n{PAYLOAD}\nScan finished in 3.2s\n"
        );
        let devices = parse_scanner_output(&raw).unwrap();
        assert_eq!(devices.len(), 1);
    }

    #[test]
    fn parses_empty_array() {
        // The scanner prints "[]" when given no usable target.
        let devices = parse_scanner_output("banner\n[]\n").unwrap();
        assert!(devices.is_empty());
    }

    #[test]
    fn rejects_output_without_array() {
        let err = parse_scanner_output("usage: probe <target> <stealth>\n").unwrap_err();
        assert!(matches!(err, ScanError::MalformedOutput { .. }));
    }

    #[test]
    fn rejects_structurally_invalid_array() {
        // A bracketed span that is not a device-result array must not be
        // partially accepted.
        let err = parse_scanner_output("[1, 2, 3]").unwrap_err();
        assert!(matches!(err, ScanError::MalformedOutput { .. }));

        let err = parse_scanner_output("[{\"ip\": \"10.0.0.1\"}]").unwrap_err();
        assert!(matches!(err, ScanError::MalformedOutput { .. }));
    }

    #[test]
    fn rejects_reversed_brackets() {
        let err = parse_scanner_output("] nothing here [").unwrap_err();
        assert!(matches!(err, ScanError::MalformedOutput { .. }));
    }

    #[test]
    fn excerpt_is_truncated() {
        let long = "x".repeat(10_000);
        match parse_scanner_output(&long).unwrap_err() {
            ScanError::MalformedOutput { excerpt, .. } => {
                assert!(excerpt.chars().count() <= EXCERPT_MAX_CHARS + 3);
            }
            other => panic!("unexpected error: {other}"),
        }
    }
}
