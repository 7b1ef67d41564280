/*
SPDX-FileCopyrightText: Copyright 2026 LG Electronics Inc.
SPDX-License-Identifier: MIT
*/

//! Core data structures shared by the allocator, the registry and the CLI.
//!
//! ```text
//! DeviceRegistry ──(&[Device] snapshot)──► allocate() ──(Vec<Device>)──► AllocationReport
//!   owns + mutates                           pure                          rendered by the CLI
//! ```
//!
//! # Ownership model
//! The registry is the only owner of the live device set.  The allocator
//! borrows a slice and returns a fresh `Vec<Device>`; it never writes through
//! the borrow.  Only `allocated` differs between input and output.

use std::fmt;
use std::str::FromStr;

use serde::Deserialize;

use crate::allocator::AllocationError;

/// Stable device identifier.  Assigned at creation and never reused within a
/// session.
pub type DeviceId = u32;

/// Demand given to freshly created devices, in Mbps.
pub const DEFAULT_DEMAND_MBPS: f64 = 25.0;

// ── Sharing policy ────────────────────────────────────────────────────────────

/// Rule set governing how the link capacity is divided.
///
/// Exactly one policy is active at a time.  `Tdm` and `Fdm` produce the same
/// numbers as `Equal`; they stay distinct variants so the presentation layer
/// can pick the matching visualisation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "snake_case")]
pub enum SharingPolicy {
    /// Capacity split evenly, demand and priority ignored.
    #[default]
    Equal,
    /// Strict priority admission, no backfill.
    Priority,
    /// Demand-proportional sharing when oversubscribed.
    Statistical,
    /// Time-division multiplexing: one device holds the link per slot.
    Tdm,
    /// Frequency-division multiplexing: each device owns a disjoint band.
    Fdm,
}

impl SharingPolicy {
    /// All policies, in display order.
    pub const ALL: [SharingPolicy; 5] = [
        SharingPolicy::Equal,
        SharingPolicy::Priority,
        SharingPolicy::Statistical,
        SharingPolicy::Tdm,
        SharingPolicy::Fdm,
    ];

    /// Short machine name, as accepted by [`FromStr`] and the YAML config.
    pub fn key(self) -> &'static str {
        match self {
            SharingPolicy::Equal => "equal",
            SharingPolicy::Priority => "priority",
            SharingPolicy::Statistical => "statistical",
            SharingPolicy::Tdm => "tdm",
            SharingPolicy::Fdm => "fdm",
        }
    }

    /// Human-readable label.
    pub fn display_name(self) -> &'static str {
        match self {
            SharingPolicy::Equal => "Equal Sharing",
            SharingPolicy::Priority => "Priority-Based",
            SharingPolicy::Statistical => "Statistical Multiplexing",
            SharingPolicy::Tdm => "Time-Division Multiplexing (TDM)",
            SharingPolicy::Fdm => "Frequency-Division Multiplexing (FDM)",
        }
    }
}

impl fmt::Display for SharingPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

impl FromStr for SharingPolicy {
    type Err = AllocationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim();
        SharingPolicy::ALL
            .into_iter()
            .find(|p| p.key().eq_ignore_ascii_case(wanted))
            .ok_or_else(|| AllocationError::UnknownPolicy(s.to_string()))
    }
}

// ── Device ────────────────────────────────────────────────────────────────────

/// One network client in the simulation.
#[derive(Debug, Clone, PartialEq)]
pub struct Device {
    pub id: DeviceId,

    /// Display label only.
    pub name: String,

    /// Requested bandwidth in Mbps.  Never negative.
    pub demand: f64,

    /// Bandwidth granted by the last allocation pass, in Mbps.  `0.0` before
    /// the first pass.
    pub allocated: f64,

    /// 1 is the highest priority.  Ties are allowed.
    pub priority: u32,
}

impl Device {
    /// A fresh device with the default demand, `priority = id` and nothing
    /// allocated.
    pub fn new(id: DeviceId) -> Self {
        Self::with_demand(id, DEFAULT_DEMAND_MBPS)
    }

    pub fn with_demand(id: DeviceId, demand: f64) -> Self {
        Self {
            id,
            name: format!("Device {id}"),
            demand,
            allocated: 0.0,
            priority: id,
        }
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_device_uses_defaults() {
        let d = Device::new(3);
        assert_eq!(d.id, 3);
        assert_eq!(d.name, "Device 3");
        assert_eq!(d.demand, DEFAULT_DEMAND_MBPS);
        assert_eq!(d.allocated, 0.0);
        assert_eq!(d.priority, 3);
    }

    #[test]
    fn policy_parses_keys_case_insensitively() {
        assert_eq!("equal".parse::<SharingPolicy>().unwrap(), SharingPolicy::Equal);
        assert_eq!("PRIORITY".parse::<SharingPolicy>().unwrap(), SharingPolicy::Priority);
        assert_eq!(" Tdm ".parse::<SharingPolicy>().unwrap(), SharingPolicy::Tdm);
    }

    #[test]
    fn unknown_policy_is_rejected() {
        let err = "round_robin".parse::<SharingPolicy>().unwrap_err();
        assert!(matches!(err, AllocationError::UnknownPolicy(ref s) if s == "round_robin"));
    }

    #[test]
    fn every_policy_round_trips_through_its_key() {
        for p in SharingPolicy::ALL {
            assert_eq!(p.key().parse::<SharingPolicy>().unwrap(), p);
            assert_eq!(p.to_string(), p.key());
        }
    }

    #[test]
    fn tdm_and_fdm_are_distinct_from_equal() {
        assert_ne!(SharingPolicy::Tdm, SharingPolicy::Equal);
        assert_ne!(SharingPolicy::Fdm, SharingPolicy::Equal);
        assert_ne!(SharingPolicy::Tdm.display_name(), SharingPolicy::Fdm.display_name());
    }

    #[test]
    fn policy_deserializes_from_snake_case() {
        let p: SharingPolicy = serde_yaml::from_str("statistical").unwrap();
        assert_eq!(p, SharingPolicy::Statistical);
    }
}
