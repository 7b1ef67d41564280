/*
SPDX-FileCopyrightText: Copyright 2026 LG Electronics Inc.
SPDX-License-Identifier: MIT
*/

//! Simulation configuration loading.
//!
//! The expected YAML structure is:
//! ```yaml
//! simulation:
//!   total_capacity_mbps: 100
//!   device_count: 4
//!   policy: priority
//!   default_demand_mbps: 25
//!   min_devices: 1
//!   max_devices: 10
//!   tdm_slot_ms: 1000
//! devices:
//!   - id: 1
//!     demand_mbps: 60
//!     priority: 2
//! ```
//!
//! Every key is optional.  Device overrides are applied through the
//! [`DeviceRegistry`] so they go through the same clamping and range checks
//! as interactive edits.

use std::path::Path;
use std::time::Duration;

use anyhow::{bail, Context, Result};
use serde::Deserialize;
use tracing::{debug, info};

use crate::device::{DeviceId, SharingPolicy, DEFAULT_DEMAND_MBPS};
use crate::registry::{
    DeviceRegistry, RegistrySettings, DEFAULT_CAPACITY_MBPS, DEFAULT_DEVICE_COUNT,
    DEFAULT_MAX_DEVICES, DEFAULT_MIN_DEVICES,
};
use crate::slot::DEFAULT_SLOT_INTERVAL;

// ── Private YAML deserialization types ────────────────────────────────────────

/// Top-level wrapper that maps directly onto the YAML file layout.
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct SimulationFile {
    #[serde(default)]
    simulation: SimulationSection,
    #[serde(default)]
    devices: Vec<DeviceOverride>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct SimulationSection {
    total_capacity_mbps: Option<f64>,
    device_count: Option<usize>,
    policy: Option<SharingPolicy>,
    default_demand_mbps: Option<f64>,
    min_devices: Option<usize>,
    max_devices: Option<usize>,
    tdm_slot_ms: Option<u64>,
}

// ── Public data structures ────────────────────────────────────────────────────

/// Per-device edits applied after the initial set is created.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct DeviceOverride {
    pub id: DeviceId,
    #[serde(default)]
    pub demand_mbps: Option<f64>,
    #[serde(default)]
    pub priority: Option<u32>,
}

/// Fully resolved simulation configuration.
#[derive(Debug, Clone, PartialEq)]
pub struct SimulationConfig {
    pub settings: RegistrySettings,
    pub tdm_slot: Duration,
    pub devices: Vec<DeviceOverride>,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            settings: RegistrySettings::default(),
            tdm_slot: DEFAULT_SLOT_INTERVAL,
            devices: Vec::new(),
        }
    }
}

impl SimulationConfig {
    /// Parse `path`, fill in defaults and validate the result.
    ///
    /// # Errors
    /// Returns an error if the file cannot be read, the YAML is malformed or
    /// contains unknown keys, or [`validate`](Self::validate) fails.
    pub fn load_from_file(path: &Path) -> Result<Self> {
        info!("Loading simulation configuration from: {}", path.display());

        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Cannot open configuration file: {}", path.display()))?;

        let config = Self::from_yaml_str(&content)
            .with_context(|| format!("Invalid configuration file: {}", path.display()))?;

        info!(
            capacity_mbps = config.settings.capacity,
            device_count  = config.settings.device_count,
            policy        = %config.settings.policy,
            overrides     = config.devices.len(),
            "simulation configuration loaded"
        );
        Ok(config)
    }

    /// Parse a YAML document.  An empty document yields the defaults.
    pub fn from_yaml_str(content: &str) -> Result<Self> {
        let file: SimulationFile = if content.trim().is_empty() {
            SimulationFile::default()
        } else {
            serde_yaml::from_str(content).context("Failed to parse YAML")?
        };

        let sim = file.simulation;
        let config = Self {
            settings: RegistrySettings {
                capacity: sim.total_capacity_mbps.unwrap_or(DEFAULT_CAPACITY_MBPS),
                device_count: sim.device_count.unwrap_or(DEFAULT_DEVICE_COUNT),
                min_devices: sim.min_devices.unwrap_or(DEFAULT_MIN_DEVICES),
                max_devices: sim.max_devices.unwrap_or(DEFAULT_MAX_DEVICES),
                default_demand: sim.default_demand_mbps.unwrap_or(DEFAULT_DEMAND_MBPS),
                policy: sim.policy.unwrap_or_default(),
            },
            tdm_slot: sim
                .tdm_slot_ms
                .map(Duration::from_millis)
                .unwrap_or(DEFAULT_SLOT_INTERVAL),
            devices: file.devices,
        };

        config.validate()?;
        Ok(config)
    }

    /// Check the ranges the registry relies on.
    pub fn validate(&self) -> Result<()> {
        let s = &self.settings;
        if !s.capacity.is_finite() || s.capacity <= 0.0 {
            bail!("total_capacity_mbps must be positive, got {}", s.capacity);
        }
        if !s.default_demand.is_finite() || s.default_demand < 0.0 {
            bail!(
                "default_demand_mbps must be zero or positive, got {}",
                s.default_demand
            );
        }
        if s.min_devices > s.max_devices {
            bail!(
                "min_devices ({}) is greater than max_devices ({})",
                s.min_devices,
                s.max_devices
            );
        }
        if s.device_count < s.min_devices || s.device_count > s.max_devices {
            bail!(
                "device_count {} is outside {}..={}",
                s.device_count,
                s.min_devices,
                s.max_devices
            );
        }
        if self.tdm_slot.is_zero() {
            bail!("tdm_slot_ms must be greater than zero");
        }
        Ok(())
    }

    /// Create a registry from the settings and apply every device override.
    pub fn build_registry(&self) -> Result<DeviceRegistry> {
        let mut registry =
            DeviceRegistry::new(self.settings.clone()).context("Failed to create device set")?;

        for o in &self.devices {
            if let Some(demand) = o.demand_mbps {
                registry
                    .set_demand(o.id, demand)
                    .with_context(|| format!("Cannot apply demand override for device {}", o.id))?;
            }
            if let Some(priority) = o.priority {
                registry
                    .set_priority(o.id, priority)
                    .with_context(|| format!("Cannot apply priority override for device {}", o.id))?;
            }
            debug!(device = o.id, demand = ?o.demand_mbps, priority = ?o.priority, "override applied");
        }

        Ok(registry)
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
