/*
SPDX-FileCopyrightText: Copyright 2026 LG Electronics Inc.
SPDX-License-Identifier: MIT
*/

//! bwshare – bandwidth sharing simulator
//!
//! Module layout:
//!
//! ```text
//! lib.rs
//! ├── device       – Device, SharingPolicy
//! ├── allocator/   – pure allocation engine + derived metrics
//! ├── registry/    – owner of the device set, triggers recomputation
//! ├── report       – AllocationReport handed to the presentation layer
//! ├── slot/        – TDM active-slot clock (presentation only)
//! └── config/      – YAML simulation configuration
//! ```

pub mod allocator;
pub mod config;
pub mod device;
pub mod registry;
pub mod report;
pub mod slot;
