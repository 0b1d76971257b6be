//! orbit-core: Shared types for the Orbit exposure scanner.
//!
//! This crate provides the domain model used across Orbit components:
//! - Scan targets and the strict IPv4/CIDR target grammar
//! - Scan findings (devices, vulnerabilities, risk levels)
//! - Historical scan records and drift alerts
//! - Network interface descriptions for local discovery

pub mod error;
pub mod types;

pub use error::TargetParseError;
