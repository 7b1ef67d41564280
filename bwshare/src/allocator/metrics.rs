/*
SPDX-FileCopyrightText: Copyright 2026 LG Electronics Inc.
SPDX-License-Identifier: MIT
*/

//! Display metrics derived from an allocation pass.
//!
//! None of these values are engine state.  Each one is a pure function of
//! the devices returned by [`allocate()`](super::allocate) and the capacity
//! they were allocated against, so the presentation layer can recompute
//! them at any time.
//!
//! | Metric | Formula |
//! |---|---|
//! | Link utilisation | `sum(allocated) / capacity × 100` |
//! | Satisfaction | `allocated / demand × 100` (100 when `demand == 0`) |
//! | Capacity share | `allocated / capacity × 100` |

use crate::device::Device;

/// Satisfaction at or above this percentage is [`SatisfactionBand::Good`].
pub const GOOD_SATISFACTION_PCT: f64 = 90.0;

/// Satisfaction at or above this percentage (and below
/// [`GOOD_SATISFACTION_PCT`]) is [`SatisfactionBand::Fair`].
pub const FAIR_SATISFACTION_PCT: f64 = 70.0;

// ── Link-level metrics ────────────────────────────────────────────────────────

/// Sum of `allocated` over `devices`.
pub fn total_allocated(devices: &[Device]) -> f64 {
    devices.iter().map(|d| d.allocated).sum()
}

/// Sum of `demand` over `devices`.
pub fn total_demand(devices: &[Device]) -> f64 {
    devices.iter().map(|d| d.demand).sum()
}

/// Percentage of the link capacity handed out.
///
/// Returns `0.0` for a non-positive capacity rather than dividing by it.
pub fn utilization_pct(devices: &[Device], capacity: f64) -> f64 {
    if capacity <= 0.0 {
        return 0.0;
    }
    total_allocated(devices) / capacity * 100.0
}

/// `true` when aggregate demand exceeds the link capacity.
pub fn is_oversubscribed(devices: &[Device], capacity: f64) -> bool {
    total_demand(devices) > capacity
}

// ── Per-device metrics ────────────────────────────────────────────────────────

/// Fraction of the device's demand that was granted, as a percentage.
///
/// A device asking for nothing is fully satisfied (`100.0`).
pub fn satisfaction_pct(device: &Device) -> f64 {
    if device.demand == 0.0 {
        100.0
    } else {
        device.allocated / device.demand * 100.0
    }
}

/// Share of the whole link held by this device, as a percentage.
pub fn capacity_share_pct(device: &Device, capacity: f64) -> f64 {
    if capacity <= 0.0 {
        return 0.0;
    }
    device.allocated / capacity * 100.0
}

/// Coarse grading of a satisfaction percentage.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SatisfactionBand {
    /// `>= 90 %`
    Good,
    /// `70 % ..< 90 %`
    Fair,
    /// `< 70 %`
    Poor,
}

impl SatisfactionBand {
    pub fn from_pct(pct: f64) -> Self {
        if pct >= GOOD_SATISFACTION_PCT {
            SatisfactionBand::Good
        } else if pct >= FAIR_SATISFACTION_PCT {
            SatisfactionBand::Fair
        } else {
            SatisfactionBand::Poor
        }
    }

    pub fn of(device: &Device) -> Self {
        Self::from_pct(satisfaction_pct(device))
    }

    pub fn label(self) -> &'static str {
        match self {
            SatisfactionBand::Good => "good",
            SatisfactionBand::Fair => "fair",
            SatisfactionBand::Poor => "poor",
        }
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
