/*
SPDX-FileCopyrightText: Copyright 2026 LG Electronics Inc.
SPDX-License-Identifier: MIT
*/

//! Errors raised by the allocation engine.
//!
//! The engine has almost no failure modes: an empty device set and zero
//! aggregate demand are ordinary states with defined results.  The only
//! rejected input is a capacity that cannot be divided.

use thiserror::Error;

/// Error type returned by [`allocate()`](super::allocate) and by
/// [`SharingPolicy`](crate::device::SharingPolicy) parsing.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum AllocationError {
    /// Total capacity was zero, negative, NaN or infinite.
    ///
    /// This is a caller contract violation.  The value is reported as-is and
    /// never clamped.
    #[error("invalid capacity {capacity} Mbps — total capacity must be a positive, finite number")]
    InvalidCapacity { capacity: f64 },

    /// The policy name is not one of the five supported policies.
    #[error("unknown sharing policy: '{0}' (valid: equal, priority, statistical, tdm, fdm)")]
    UnknownPolicy(String),
}
