/*
SPDX-FileCopyrightText: Copyright 2026 LG Electronics Inc.
SPDX-License-Identifier: MIT
*/

//! Structured error types for the device registry.
//!
//! Two layers, mirroring how the registry validates input:
//!
//! * [`DeviceSetReason`] — why a single edit would leave the device set in a
//!   state the allocator must never see (carries the offending values).
//! * [`RegistryError`] — top-level failure returned from every mutating
//!   [`DeviceRegistry`](super::DeviceRegistry) method.

use thiserror::Error;

use crate::allocator::AllocationError;
use crate::device::DeviceId;

// ── Device-set validation ─────────────────────────────────────────────────────

/// Detailed reason why an edit was refused.
#[derive(Debug, Clone, PartialEq)]
pub enum DeviceSetReason {
    /// A device was constructed with a negative demand.
    ///
    /// Interactive demand edits are clamped to zero instead; this variant is
    /// produced for configured default demands.
    NegativeDemand { demand: f64 },

    /// Demand of `+inf` cannot be shared proportionally.
    NonFiniteDemand { demand: f64 },

    /// Priority outside `1..=device_count`.
    PriorityOutOfRange { priority: u32, device_count: usize },
}

impl std::fmt::Display for DeviceSetReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DeviceSetReason::NegativeDemand { demand } => {
                write!(f, "demand {demand} Mbps is negative")
            }

            DeviceSetReason::NonFiniteDemand { demand } => {
                write!(f, "demand {demand} Mbps is not a finite number")
            }

            DeviceSetReason::PriorityOutOfRange {
                priority,
                device_count,
            } => write!(
                f,
                "priority {} is outside the valid range 1..={}",
                priority, device_count
            ),
        }
    }
}

// ── Top-level registry errors ─────────────────────────────────────────────────

#[derive(Debug, Error)]
pub enum RegistryError {
    /// The edit would produce a device set the allocator cannot accept.
    #[error("invalid device set: {reason}")]
    InvalidDeviceSet { reason: DeviceSetReason },

    /// No device with this id exists in the current set.
    #[error("device {id} not found")]
    UnknownDevice { id: DeviceId },

    /// Resize, add or remove would leave the set outside the configured
    /// bounds.
    #[error("device count {requested} is outside the allowed range {min}..={max}")]
    DeviceCountOutOfRange {
        requested: usize,
        min: usize,
        max: usize,
    },

    /// The allocation pass that follows every mutation failed.
    #[error(transparent)]
    Allocation(#[from] AllocationError),
}
