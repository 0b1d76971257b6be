//! Local network discovery: interface enumeration and default gateway.
//!
//! Read-only queries against live OS state. Nothing here is cached — every
//! call re-enumerates so callers observe interfaces coming and going.

use std::net::Ipv4Addr;

use ipnet::Ipv4Net;
use pnet::datalink;
use pnet::ipnetwork::IpNetwork;
use tokio::process::Command;

use orbit_core::types::NetworkInterfaceInfo;

/// Enumerate local IPv4 interfaces, excluding loopback.
///
/// Interfaces carrying several IPv4 addresses yield one entry per address.
/// Entries with a non-contiguous netmask (cannot be expressed as a prefix
/// length) are skipped.
pub fn list_interfaces() -> Vec<NetworkInterfaceInfo> {
    datalink::interfaces()
        .into_iter()
        .filter(|iface| !iface.is_loopback())
        .flat_map(|iface| {
            let name = iface.name.clone();
            let mac = iface.mac.map(|m| m.to_string());
            iface
                .ips
                .into_iter()
                .filter_map(move |net| match net {
                    IpNetwork::V4(v4) if !v4.ip().is_loopback() => {
                        let cidr = derive_cidr(v4.ip(), v4.mask())?;
                        Some(NetworkInterfaceInfo {
                            name: name.clone(),
                            addr: v4.ip(),
                            netmask: v4.mask(),
                            mac: mac.clone(),
                            cidr,
                        })
                    }
                    _ => None,
                })
        })
        .collect()
}

/// Network base address + prefix length for an interface address, e.g.
/// `(10.0.0.5, 255.255.255.0)` -> `"10.0.0.0/24"`.
pub fn derive_cidr(addr: Ipv4Addr, netmask: Ipv4Addr) -> Option<String> {
    let net = Ipv4Net::with_netmask(addr, netmask).ok()?;
    Some(net.trunc().to_string())
}

/// The default gateway from the OS routing table, if one exists.
///
/// Platform dispatch is by OS family; an unsupported platform, a failing
/// route query, or the absence of a default route all yield `None` rather
/// than an error.
pub async fn default_gateway() -> Option<Ipv4Addr> {
    let output = if cfg!(target_os = "linux") {
        route_query("ip", &["route", "show", "default"]).await?
    } else if cfg!(target_os = "macos") {
        route_query("route", &["-n", "get", "default"]).await?
    } else {
        tracing::debug!("Default gateway lookup not supported on this platform");
        return None;
    };

    parse_gateway(&output)
}

async fn route_query(cmd: &str, args: &[&str]) -> Option<String> {
    let output = match Command::new(cmd).args(args).output().await {
        Ok(o) => o,
        Err(e) => {
            tracing::debug!(cmd, error = %e, "Route table query failed to launch");
            return None;
        }
    };
    if !output.status.success() {
        tracing::debug!(cmd, code = output.status.code(), "Route table query failed");
        return None;
    }
    Some(String::from_utf8_lossy(&output.stdout).into_owned())
}

/// Pull the gateway address out of route-table text.
///
/// Handles both the Linux `default via 192.168.1.1 dev eth0` form and the
/// BSD/macOS `gateway: 192.168.1.1` form by taking the token following a
/// `via` or `gateway:` marker.
fn parse_gateway(route_output: &str) -> Option<Ipv4Addr> {
    let mut tokens = route_output.split_whitespace();
    while let Some(token) = tokens.next() {
        if token == "via" || token == "gateway:" {
            if let Some(addr) = tokens.next().and_then(|t| t.parse::<Ipv4Addr>().ok()) {
                return Some(addr);
            }
        }
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn derive_cidr_truncates_host_bits() {
        assert_eq!(
            derive_cidr("10.0.0.5".parse().unwrap(), "255.255.255.0".parse().unwrap()),
            Some("10.0.0.0/24".to_string())
        );
        assert_eq!(
            derive_cidr("192.168.1.102".parse().unwrap(), "255.255.0.0".parse().unwrap()),
            Some("192.168.0.0/16".to_string())
        );
        assert_eq!(
            derive_cidr("172.16.3.7".parse().unwrap(), "255.255.255.255".parse().unwrap()),
            Some("172.16.3.7/32".to_string())
        );
    }

    #[test]
    fn derive_cidr_is_idempotent_on_base_addresses() {
        let base: Ipv4Addr = "10.0.0.0".parse().unwrap();
        let mask: Ipv4Addr = "255.255.255.0".parse().unwrap();
        assert_eq!(derive_cidr(base, mask), Some("10.0.0.0/24".to_string()));
    }

    #[test]
    fn derive_cidr_rejects_noncontiguous_mask() {
        assert_eq!(
            derive_cidr("10.0.0.5".parse().unwrap(), "255.0.255.0".parse().unwrap()),
            None
        );
    }

    #[test]
    fn parse_gateway_linux_form() {
        let out = "default via 192.168.1.1 dev wlan0 proto dhcp metric 600\n";
        assert_eq!(parse_gateway(out), Some("192.168.1.1".parse().unwrap()));
    }

    #[test]
    fn parse_gateway_macos_form() {
        let out = "   route to: default\ndestination: default\n       mask: default\n    gateway: 10.0.1.1\n  interface: en0\n";
        assert_eq!(parse_gateway(out), Some("10.0.1.1".parse().unwrap()));
    }

    #[test]
    fn parse_gateway_no_default_route() {
        assert_eq!(parse_gateway(""), None);
        assert_eq!(parse_gateway("10.0.0.0/24 dev eth0 scope link\n"), None);
        // IPv6 gateway is not an IPv4 default.
        assert_eq!(parse_gateway("default via fe80::1 dev en0\n"), None);
    }

    #[test]
    fn list_interfaces_excludes_loopback() {
        for iface in list_interfaces() {
            assert!(!iface.addr.is_loopback(), "loopback leaked: {iface:?}");
            assert!(iface.cidr.contains('/'));
        }
    }
}
