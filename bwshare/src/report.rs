/*
SPDX-FileCopyrightText: Copyright 2026 LG Electronics Inc.
SPDX-License-Identifier: MIT
*/

//! The value handed to the presentation layer after every recomputation.
//!
//! An [`AllocationReport`] bundles the allocated device snapshot with the
//! policy and capacity it was computed for.  Keeping the policy alongside the
//! numbers matters for TDM and FDM: their allocations are identical to
//! `Equal`, and only the policy tag tells the renderer which layout to use.

use std::fmt::Write as _;

use crate::allocator::metrics::{self, SatisfactionBand};
use crate::device::{Device, DeviceId, SharingPolicy};

/// Width of the ASCII bar drawn by [`AllocationReport::render_table`].
const BAR_WIDTH: usize = 30;

/// Result of one allocation pass plus the inputs needed to interpret it.
#[derive(Debug, Clone, PartialEq)]
pub struct AllocationReport {
    pub policy: SharingPolicy,
    pub capacity: f64,
    pub devices: Vec<Device>,
}

/// A contiguous slice of the link spectrum owned by one device (FDM view).
///
/// `start` and `end` are fractions of the total capacity in `[0, 1]`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FrequencyBand {
    pub device_id: DeviceId,
    pub start: f64,
    pub end: f64,
}

impl FrequencyBand {
    pub fn width(&self) -> f64 {
        self.end - self.start
    }
}

impl AllocationReport {
    pub fn new(policy: SharingPolicy, capacity: f64, devices: Vec<Device>) -> Self {
        Self {
            policy,
            capacity,
            devices,
        }
    }

    pub fn total_allocated(&self) -> f64 {
        metrics::total_allocated(&self.devices)
    }

    pub fn utilization_pct(&self) -> f64 {
        metrics::utilization_pct(&self.devices, self.capacity)
    }

    /// Capacity left on the table.  Only PRIORITY and under-full STATISTICAL
    /// passes leave any.
    pub fn unused_capacity(&self) -> f64 {
        (self.capacity - self.total_allocated()).max(0.0)
    }

    /// Lay the devices out side by side across the spectrum, in device order,
    /// each band as wide as its share of the capacity.  Empty when the
    /// capacity is not a positive finite number.
    pub fn frequency_bands(&self) -> Vec<FrequencyBand> {
        if !self.capacity.is_finite() || self.capacity <= 0.0 {
            return Vec::new();
        }
        let mut cursor = 0.0;
        self.devices
            .iter()
            .map(|d| {
                let start = cursor;
                cursor += d.allocated / self.capacity;
                FrequencyBand {
                    device_id: d.id,
                    start,
                    end: cursor,
                }
            })
            .collect()
    }

    /// Plain-text table: one row per device with an allocation bar, followed
    /// by a link utilisation summary.
    pub fn render_table(&self) -> String {
        let mut out = String::new();
        let _ = writeln!(
            out,
            "{} — capacity {:.1} Mbps",
            self.policy.display_name(),
            self.capacity
        );

        if self.devices.is_empty() {
            let _ = writeln!(out, "  (no devices)");
            return out;
        }

        let _ = writeln!(
            out,
            "  {:<12} {:>4} {:>9} {:>9} {:>7}  {}",
            "device", "prio", "demand", "alloc", "sat%", "share"
        );
        for d in &self.devices {
            let share = metrics::capacity_share_pct(d, self.capacity);
            let filled = ((share / 100.0) * BAR_WIDTH as f64).round() as usize;
            let filled = filled.min(BAR_WIDTH);
            let _ = writeln!(
                out,
                "  {:<12} {:>4} {:>9.1} {:>9.1} {:>6.0}%  [{}{}] {}",
                d.name,
                d.priority,
                d.demand,
                d.allocated,
                metrics::satisfaction_pct(d),
                "#".repeat(filled),
                " ".repeat(BAR_WIDTH - filled),
                SatisfactionBand::of(d).label(),
            );
        }
        let _ = writeln!(
            out,
            "  total {:.1} / {:.1} Mbps, utilisation {:.1}%",
            self.total_allocated(),
            self.capacity,
            self.utilization_pct()
        );
        out
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
