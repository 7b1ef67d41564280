/*
SPDX-FileCopyrightText: Copyright 2026 LG Electronics Inc.
SPDX-License-Identifier: MIT
*/

//! Bandwidth allocation engine.
//!
//! [`allocate()`] distributes a fixed link capacity across a set of
//! [`Device`]s under one [`SharingPolicy`] and returns a new snapshot of the
//! device set with `allocated` filled in.
//!
//! # Policies
//!
//! | Policy | Result per device | `sum(allocated)` |
//! |---|---|---|
//! | `Equal` | `capacity / n` | `== capacity` |
//! | `Priority` | `min(demand, remaining)` in ascending priority order | `<= capacity` (no backfill) |
//! | `Statistical` | `demand` if it all fits, else `demand / total * capacity` | `<= capacity` |
//! | `Tdm` / `Fdm` | `capacity / n` | `== capacity` |
//!
//! # Properties
//! * Stateless: every call works on its own locals, no hidden state.
//! * Deterministic: identical inputs give bit-identical outputs.  The
//!   priority sort is stable so equal priorities keep their input order.
//! * Shape preserving: output has the same length and `id` order as the
//!   input; only `allocated` differs.
//!
//! # Example
//! ```rust
//! use bwshare::allocator::allocate;
//! use bwshare::device::{Device, SharingPolicy};
//!
//! let devices = vec![Device::with_demand(1, 60.0), Device::with_demand(2, 40.0)];
//! let out = allocate(&devices, 80.0, SharingPolicy::Statistical).unwrap();
//! assert!((out[0].allocated - 48.0).abs() < 1e-9);
//! assert!((out[1].allocated - 32.0).abs() < 1e-9);
//! ```

pub mod error;
pub mod metrics;

pub use error::AllocationError;

use tracing::debug;

use crate::device::{Device, SharingPolicy};

// ── Public entry point ────────────────────────────────────────────────────────

/// Compute each device's share of `total_capacity` under `policy`.
///
/// An empty `devices` slice yields an empty result for every policy.
///
/// # Errors
/// [`AllocationError::InvalidCapacity`] if `total_capacity` is not a positive
/// finite number.
pub fn allocate(
    devices: &[Device],
    total_capacity: f64,
    policy: SharingPolicy,
) -> Result<Vec<Device>, AllocationError> {
    // ── Preconditions ─────────────────────────────────────────────────────────
    if !total_capacity.is_finite() || total_capacity <= 0.0 {
        return Err(AllocationError::InvalidCapacity {
            capacity: total_capacity,
        });
    }
    debug_assert!(
        devices.iter().all(|d| d.demand >= 0.0),
        "negative demand must be rejected by the registry before allocation"
    );

    if devices.is_empty() {
        debug!(policy = %policy, "no devices — nothing to allocate");
        return Ok(Vec::new());
    }

    // ── Policy dispatch ───────────────────────────────────────────────────────
    let shares = match policy {
        SharingPolicy::Equal | SharingPolicy::Tdm | SharingPolicy::Fdm => {
            equal_shares(devices.len(), total_capacity)
        }
        SharingPolicy::Priority => priority_shares(devices, total_capacity),
        SharingPolicy::Statistical => statistical_shares(devices, total_capacity),
    };

    // ── Collect results ───────────────────────────────────────────────────────
    let out: Vec<Device> = devices
        .iter()
        .zip(shares)
        .map(|(d, allocated)| Device {
            allocated,
            ..d.clone()
        })
        .collect();

    debug!(
        policy          = %policy,
        device_count    = out.len(),
        capacity_mbps   = total_capacity,
        allocated_mbps  = metrics::total_allocated(&out),
        "allocation pass complete"
    );

    Ok(out)
}

// ─────────────────────────────────────────────────────────────────────────────
// Equal / TDM / FDM
// ─────────────────────────────────────────────────────────────────────────────

/// `capacity / n` for every slot.  Caller guarantees `n > 0`.
fn equal_shares(n: usize, capacity: f64) -> Vec<f64> {
    vec![capacity / n as f64; n]
}

// ─────────────────────────────────────────────────────────────────────────────
// Priority
// ─────────────────────────────────────────────────────────────────────────────

/// Serve devices in ascending priority order until capacity runs out.
///
/// Leftover capacity after every demand is met stays unused.  Shares are
/// written back by input index, which restores the input order.
fn priority_shares(devices: &[Device], capacity: f64) -> Vec<f64> {
    let mut order: Vec<usize> = (0..devices.len()).collect();
    // sort_by_key is stable: equal priorities keep their input order
    order.sort_by_key(|&i| devices[i].priority);

    let mut shares = vec![0.0; devices.len()];
    let mut remaining = capacity;

    for i in order {
        let granted = devices[i].demand.min(remaining).max(0.0);
        shares[i] = granted;
        remaining -= granted;
    }

    if remaining > 0.0 {
        debug!(unused_mbps = remaining, "priority pass left capacity unused");
    }
    shares
}

// ─────────────────────────────────────────────────────────────────────────────
// Statistical
// ─────────────────────────────────────────────────────────────────────────────

/// Demand-driven sharing.
///
/// * zero aggregate demand → equal split
/// * aggregate demand fits (`<=`) → every device gets exactly its demand
/// * oversubscribed → proportional scaling, summing to `capacity`
fn statistical_shares(devices: &[Device], capacity: f64) -> Vec<f64> {
    let total_demand: f64 = devices.iter().map(|d| d.demand).sum();

    if total_demand == 0.0 {
        debug!("statistical: zero aggregate demand, falling back to equal split");
        return equal_shares(devices.len(), capacity);
    }

    if total_demand <= capacity {
        return devices.iter().map(|d| d.demand).collect();
    }

    debug!(
        total_demand_mbps = total_demand,
        capacity_mbps = capacity,
        "statistical: oversubscribed, scaling proportionally"
    );
    if total_demand.is_finite() {
        return devices
            .iter()
            .map(|d| (d.demand / total_demand) * capacity)
            .collect();
    }

    // Finite demands whose sum overflows: normalise by the largest first.
    let max_demand = devices.iter().map(|d| d.demand).fold(0.0, f64::max);
    let scaled_total: f64 = devices.iter().map(|d| d.demand / max_demand).sum();
    devices
        .iter()
        .map(|d| (d.demand / max_demand) / scaled_total * capacity)
        .collect()
}

// ── Tests ─────────────────────────────────────────────────────────────────────
