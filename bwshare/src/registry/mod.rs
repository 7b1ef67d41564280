/*
SPDX-FileCopyrightText: Copyright 2026 LG Electronics Inc.
SPDX-License-Identifier: MIT
*/

//! Device registry: the single owner of the live device set.
//!
//! [`DeviceRegistry`] applies user edits (demand, priority, policy, device
//! count) and then makes an explicit, synchronous call to
//! [`allocate()`](crate::allocator::allocate) over the *entire* set.  There is
//! no incremental update and no memoisation: every mutating method returns
//! the fresh [`AllocationReport`].
//!
//! Validation happens here, at the boundary, so the allocator only ever sees
//! non-negative demands:
//!
//! | Edit | Out-of-range input |
//! |---|---|
//! | `set_demand` | negative / NaN clamped to `0.0`; infinite rejected |
//! | `set_priority` | outside `1..=n` rejected |
//! | `resize` / `add_device` / `remove_device` | count outside `[min, max]` rejected |
//!
//! # Example
//! ```rust
//! use bwshare::device::SharingPolicy;
//! use bwshare::registry::{DeviceRegistry, RegistrySettings};
//!
//! let mut reg = DeviceRegistry::new(RegistrySettings::default()).unwrap();
//! reg.set_policy(SharingPolicy::Priority).unwrap();
//! let report = reg.set_demand(1, 80.0).unwrap();
//! assert_eq!(report.devices[0].allocated, 80.0);
//! ```

pub mod error;

pub use error::{DeviceSetReason, RegistryError};

use tracing::{debug, info};

use crate::allocator::allocate;
use crate::device::{Device, DeviceId, SharingPolicy, DEFAULT_DEMAND_MBPS};
use crate::report::AllocationReport;

// ── Constants ─────────────────────────────────────────────────────────────────

/// Link capacity used when nothing else is configured, in Mbps.
pub const DEFAULT_CAPACITY_MBPS: f64 = 100.0;

/// Device count of a fresh session.
pub const DEFAULT_DEVICE_COUNT: usize = 4;

pub const DEFAULT_MIN_DEVICES: usize = 1;
pub const DEFAULT_MAX_DEVICES: usize = 10;

// ── Settings ──────────────────────────────────────────────────────────────────

/// Fixed parameters of one simulation session.
#[derive(Debug, Clone, PartialEq)]
pub struct RegistrySettings {
    /// Total link capacity in Mbps.
    pub capacity: f64,
    pub device_count: usize,
    pub min_devices: usize,
    pub max_devices: usize,
    /// Demand given to newly created devices, in Mbps.
    pub default_demand: f64,
    pub policy: SharingPolicy,
}

impl Default for RegistrySettings {
    fn default() -> Self {
        Self {
            capacity: DEFAULT_CAPACITY_MBPS,
            device_count: DEFAULT_DEVICE_COUNT,
            min_devices: DEFAULT_MIN_DEVICES,
            max_devices: DEFAULT_MAX_DEVICES,
            default_demand: DEFAULT_DEMAND_MBPS,
            policy: SharingPolicy::default(),
        }
    }
}

/// Generate `count` devices with ids `1..=count`, the default demand,
/// `priority = id` and nothing allocated.
pub fn create_devices(count: usize) -> Vec<Device> {
    create_devices_with_demand(count, DEFAULT_DEMAND_MBPS)
}

fn create_devices_with_demand(count: usize, demand: f64) -> Vec<Device> {
    (1..=count as DeviceId)
        .map(|id| Device::with_demand(id, demand))
        .collect()
}

// ── DeviceRegistry ────────────────────────────────────────────────────────────

/// Owns the device set and the active policy for one session.
///
/// All mutation goes through `&mut self`, which serialises concurrent edits
/// before the allocator runs.
#[derive(Debug)]
pub struct DeviceRegistry {
    settings: RegistrySettings,
    devices: Vec<Device>,
    /// Next id to hand out.  Only ever grows, so ids are never reused.
    next_id: DeviceId,
    report: AllocationReport,
}

impl DeviceRegistry {
    /// Build the initial device set and run the first allocation pass.
    ///
    /// # Errors
    /// * [`RegistryError::DeviceCountOutOfRange`] if `device_count` is not in
    ///   `[min_devices, max_devices]`.
    /// * [`RegistryError::InvalidDeviceSet`] if `default_demand` is negative,
    ///   NaN or infinite.
    /// * [`RegistryError::Allocation`] if the capacity is not positive.
    pub fn new(settings: RegistrySettings) -> Result<Self, RegistryError> {
        let demand = settings.default_demand;
        if !demand.is_finite() {
            return Err(RegistryError::InvalidDeviceSet {
                reason: DeviceSetReason::NonFiniteDemand { demand },
            });
        }
        if demand < 0.0 {
            return Err(RegistryError::InvalidDeviceSet {
                reason: DeviceSetReason::NegativeDemand { demand },
            });
        }
        Self::check_count(&settings, settings.device_count)?;

        let devices = create_devices_with_demand(settings.device_count, settings.default_demand);
        let report = AllocationReport::new(settings.policy, settings.capacity, devices.clone());
        let mut registry = Self {
            next_id: settings.device_count as DeviceId + 1,
            settings,
            devices,
            report,
        };
        registry.recompute()?;

        info!(
            capacity_mbps = registry.settings.capacity,
            device_count  = registry.devices.len(),
            policy        = %registry.settings.policy,
            "device registry initialised"
        );
        Ok(registry)
    }

    // ── Accessors ─────────────────────────────────────────────────────────────

    pub fn devices(&self) -> &[Device] {
        &self.devices
    }

    /// Result of the most recent allocation pass.
    pub fn report(&self) -> &AllocationReport {
        &self.report
    }

    pub fn policy(&self) -> SharingPolicy {
        self.settings.policy
    }

    pub fn capacity(&self) -> f64 {
        self.settings.capacity
    }

    pub fn settings(&self) -> &RegistrySettings {
        &self.settings
    }

    pub fn device(&self, id: DeviceId) -> Option<&Device> {
        self.devices.iter().find(|d| d.id == id)
    }

    // ── Edits ─────────────────────────────────────────────────────────────────

    /// Set a device's demand, clamping negative (and NaN) values to zero.
    pub fn set_demand(
        &mut self,
        id: DeviceId,
        value: f64,
    ) -> Result<&AllocationReport, RegistryError> {
        if value.is_infinite() && value > 0.0 {
            return Err(RegistryError::InvalidDeviceSet {
                reason: DeviceSetReason::NonFiniteDemand { demand: value },
            });
        }
        // f64::max ignores NaN, so NaN lands on 0.0 as well
        let clamped = value.max(0.0);
        if clamped != value {
            debug!(device = id, requested = value, "demand clamped to 0");
        }

        self.device_mut(id)?.demand = clamped;
        debug!(device = id, demand_mbps = clamped, "demand updated");
        self.recompute()
    }

    /// Set a device's priority.  Uniqueness is not required.
    pub fn set_priority(
        &mut self,
        id: DeviceId,
        value: u32,
    ) -> Result<&AllocationReport, RegistryError> {
        let device_count = self.devices.len();
        if value == 0 || value as usize > device_count {
            return Err(RegistryError::InvalidDeviceSet {
                reason: DeviceSetReason::PriorityOutOfRange {
                    priority: value,
                    device_count,
                },
            });
        }

        self.device_mut(id)?.priority = value;
        debug!(device = id, priority = value, "priority updated");
        self.recompute()
    }

    /// Switch the active policy.  Demand and priority edits are kept.
    pub fn set_policy(
        &mut self,
        policy: SharingPolicy,
    ) -> Result<&AllocationReport, RegistryError> {
        if policy != self.settings.policy {
            info!(from = %self.settings.policy, to = %policy, "policy changed");
        }
        self.settings.policy = policy;
        self.recompute()
    }

    /// Re-initialise the set with `count` fresh devices.
    ///
    /// Prior demand and priority edits are discarded and ids restart at 1.
    pub fn resize(&mut self, count: usize) -> Result<&AllocationReport, RegistryError> {
        Self::check_count(&self.settings, count)?;

        self.devices = create_devices_with_demand(count, self.settings.default_demand);
        self.next_id = count as DeviceId + 1;
        self.settings.device_count = count;
        info!(device_count = count, "device set re-initialised");
        self.recompute()
    }

    /// Append one device with the next unused id, the default demand and the
    /// lowest priority (`n + 1`).
    pub fn add_device(&mut self) -> Result<&AllocationReport, RegistryError> {
        let count = self.devices.len() + 1;
        Self::check_count(&self.settings, count)?;

        let id = self.next_id;
        self.next_id += 1;
        let device = Device {
            priority: count as u32,
            ..Device::with_demand(id, self.settings.default_demand)
        };
        self.devices.push(device);
        self.settings.device_count = count;
        info!(device = id, device_count = count, "device added");
        self.recompute()
    }

    pub fn remove_device(&mut self, id: DeviceId) -> Result<&AllocationReport, RegistryError> {
        let pos = self
            .devices
            .iter()
            .position(|d| d.id == id)
            .ok_or(RegistryError::UnknownDevice { id })?;
        let count = self.devices.len() - 1;
        Self::check_count(&self.settings, count)?;

        self.devices.remove(pos);
        self.settings.device_count = count;
        info!(device = id, device_count = count, "device removed");
        self.recompute()
    }

    /// Run a full allocation pass over the current set and store the result.
    pub fn recompute(&mut self) -> Result<&AllocationReport, RegistryError> {
        let (capacity, policy) = (self.settings.capacity, self.settings.policy);
        let allocated = allocate(&self.devices, capacity, policy)?;
        self.devices = allocated.clone();
        self.report = AllocationReport::new(policy, capacity, allocated);
        Ok(&self.report)
    }

    // ── Helpers ───────────────────────────────────────────────────────────────

    fn device_mut(&mut self, id: DeviceId) -> Result<&mut Device, RegistryError> {
        self.devices
            .iter_mut()
            .find(|d| d.id == id)
            .ok_or(RegistryError::UnknownDevice { id })
    }

    fn check_count(settings: &RegistrySettings, requested: usize) -> Result<(), RegistryError> {
        if requested < settings.min_devices || requested > settings.max_devices {
            return Err(RegistryError::DeviceCountOutOfRange {
                requested,
                min: settings.min_devices,
                max: settings.max_devices,
            });
        }
        Ok(())
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use crate::allocator::AllocationError;

    fn registry(policy: SharingPolicy) -> DeviceRegistry {
        DeviceRegistry::new(RegistrySettings {
            policy,
            ..Default::default()
        })
        .unwrap()
    }

    fn allocations(reg: &DeviceRegistry) -> Vec<f64> {
        reg.report().devices.iter().map(|d| d.allocated).collect()
    }

    // ── create_devices ────────────────────────────────────────────────────────

    #[test]
    fn create_devices_uses_sequential_ids_and_defaults() {
        let devices = create_devices(3);
        let ids: Vec<u32> = devices.iter().map(|d| d.id).collect();
        assert_eq!(ids, vec![1, 2, 3]);
        for d in &devices {
            assert_eq!(d.demand, 25.0);
            assert_eq!(d.allocated, 0.0);
            assert_eq!(d.priority, d.id);
        }
    }

    #[test]
    fn create_zero_devices_is_empty() {
        assert!(create_devices(0).is_empty());
    }

    // ── Construction ──────────────────────────────────────────────────────────

    #[test]
    fn new_registry_runs_first_pass() {
        let reg = registry(SharingPolicy::Equal);
        assert_eq!(reg.devices().len(), 4);
        assert_eq!(allocations(&reg), vec![25.0; 4]);
        assert_eq!(reg.report().policy, SharingPolicy::Equal);
    }

    #[test]
    fn new_rejects_invalid_capacity() {
        let err = DeviceRegistry::new(RegistrySettings {
            capacity: 0.0,
            ..Default::default()
        })
        .unwrap_err();
        assert!(matches!(
            err,
            RegistryError::Allocation(AllocationError::InvalidCapacity { .. })
        ));
    }

    #[test]
    fn new_rejects_negative_default_demand() {
        let err = DeviceRegistry::new(RegistrySettings {
            default_demand: -1.0,
            ..Default::default()
        })
        .unwrap_err();
        assert!(matches!(
            err,
            RegistryError::InvalidDeviceSet {
                reason: DeviceSetReason::NegativeDemand { .. }
            }
        ));
    }

    #[test]
    fn new_rejects_count_outside_bounds() {
        let err = DeviceRegistry::new(RegistrySettings {
            device_count: 11,
            ..Default::default()
        })
        .unwrap_err();
        assert!(matches!(
            err,
            RegistryError::DeviceCountOutOfRange { requested: 11, min: 1, max: 10 }
        ));
    }

    // ── set_demand ────────────────────────────────────────────────────────────

    #[test]
    fn set_demand_triggers_recompute() {
        let mut reg = registry(SharingPolicy::Statistical);
        // 4 × 25 = 100 exactly fits
        assert_eq!(allocations(&reg), vec![25.0; 4]);

        reg.set_demand(1, 125.0).unwrap();
        // total 200 > 100 → proportional
        let alloc = allocations(&reg);
        assert!((alloc[0] - 62.5).abs() < 1e-9);
        assert!((alloc[1] - 12.5).abs() < 1e-9);
    }

    #[test]
    fn set_demand_clamps_negative_to_zero() {
        let mut reg = registry(SharingPolicy::Priority);
        reg.set_demand(2, -30.0).unwrap();
        assert_eq!(reg.device(2).unwrap().demand, 0.0);
        reg.set_demand(3, f64::NAN).unwrap();
        assert_eq!(reg.device(3).unwrap().demand, 0.0);
    }

    #[test]
    fn set_demand_rejects_infinite_value() {
        let mut reg = registry(SharingPolicy::Equal);
        let err = reg.set_demand(1, f64::INFINITY).unwrap_err();
        assert!(matches!(err, RegistryError::InvalidDeviceSet { .. }));
        assert_eq!(reg.device(1).unwrap().demand, 25.0);
    }

    #[test]
    fn huge_demands_still_share_the_whole_link() {
        let mut reg = DeviceRegistry::new(RegistrySettings {
            device_count: 2,
            policy: SharingPolicy::Statistical,
            ..Default::default()
        })
        .unwrap();
        reg.set_demand(1, 1e308).unwrap();
        reg.set_demand(2, 1e308).unwrap();

        let alloc = allocations(&reg);
        assert!((alloc[0] - 50.0).abs() < 1e-9);
        assert!((alloc[1] - 50.0).abs() < 1e-9);
        assert!((reg.report().total_allocated() - 100.0).abs() < 1e-9);
    }

    #[test]
    fn set_demand_unknown_device() {
        let mut reg = registry(SharingPolicy::Equal);
        let err = reg.set_demand(42, 10.0).unwrap_err();
        assert!(matches!(err, RegistryError::UnknownDevice { id: 42 }));
    }

    // ── set_priority ──────────────────────────────────────────────────────────

    #[test]
    fn set_priority_reorders_service() {
        let mut reg = registry(SharingPolicy::Priority);
        for id in 1..=4 {
            reg.set_demand(id, 40.0).unwrap();
        }
        // default priorities 1..4: [40, 40, 20, 0]
        assert_eq!(allocations(&reg), vec![40.0, 40.0, 20.0, 0.0]);

        reg.set_priority(4, 1).unwrap();
        // device 1 and 4 tie at priority 1, device 1 first in input order
        assert_eq!(allocations(&reg), vec![40.0, 20.0, 0.0, 40.0]);
    }

    #[test]
    fn set_priority_out_of_range_is_rejected() {
        let mut reg = registry(SharingPolicy::Priority);
        for bad in [0, 5] {
            let err = reg.set_priority(1, bad).unwrap_err();
            assert!(matches!(
                err,
                RegistryError::InvalidDeviceSet {
                    reason: DeviceSetReason::PriorityOutOfRange { .. }
                }
            ));
        }
        assert_eq!(reg.device(1).unwrap().priority, 1);
    }

    // ── set_policy ────────────────────────────────────────────────────────────

    #[test]
    fn set_policy_keeps_edits_and_tags_report() {
        let mut reg = registry(SharingPolicy::Equal);
        reg.set_demand(1, 5.0).unwrap();
        let report = reg.set_policy(SharingPolicy::Tdm).unwrap();
        assert_eq!(report.policy, SharingPolicy::Tdm);
        assert_eq!(reg.device(1).unwrap().demand, 5.0);
        assert_eq!(allocations(&reg), vec![25.0; 4]);

        reg.set_policy(SharingPolicy::Statistical).unwrap();
        assert_eq!(allocations(&reg), vec![5.0, 25.0, 25.0, 25.0]);
    }

    // ── resize / add / remove ─────────────────────────────────────────────────

    #[test]
    fn resize_discards_prior_edits() {
        let mut reg = registry(SharingPolicy::Equal);
        reg.set_demand(1, 90.0).unwrap();
        reg.set_priority(2, 1).unwrap();

        reg.resize(5).unwrap();
        assert_eq!(reg.devices().len(), 5);
        assert_eq!(reg.device(1).unwrap().demand, 25.0);
        assert_eq!(reg.device(2).unwrap().priority, 2);
        assert_eq!(allocations(&reg), vec![20.0; 5]);
    }

    #[test]
    fn resize_outside_bounds_is_rejected() {
        let mut reg = registry(SharingPolicy::Equal);
        assert!(matches!(
            reg.resize(0).unwrap_err(),
            RegistryError::DeviceCountOutOfRange { .. }
        ));
        assert!(matches!(
            reg.resize(11).unwrap_err(),
            RegistryError::DeviceCountOutOfRange { .. }
        ));
        assert_eq!(reg.devices().len(), 4);
    }

    #[test]
    fn removed_ids_are_never_reused() {
        let mut reg = registry(SharingPolicy::Equal);
        reg.remove_device(4).unwrap();
        reg.add_device().unwrap();
        let ids: Vec<u32> = reg.devices().iter().map(|d| d.id).collect();
        assert_eq!(ids, vec![1, 2, 3, 5]);
        assert_eq!(reg.device(5).unwrap().priority, 4);
        assert_eq!(allocations(&reg), vec![25.0; 4]);
    }

    #[test]
    fn remove_last_device_respects_minimum() {
        let mut reg = DeviceRegistry::new(RegistrySettings {
            device_count: 1,
            ..Default::default()
        })
        .unwrap();
        assert!(matches!(
            reg.remove_device(1).unwrap_err(),
            RegistryError::DeviceCountOutOfRange { requested: 0, .. }
        ));
    }

    #[test]
    fn empty_set_allowed_when_minimum_is_zero() {
        let mut reg = DeviceRegistry::new(RegistrySettings {
            device_count: 1,
            min_devices: 0,
            ..Default::default()
        })
        .unwrap();
        let report = reg.remove_device(1).unwrap();
        assert!(report.devices.is_empty());
        assert_eq!(report.total_allocated(), 0.0);
    }

    #[test]
    fn add_device_respects_maximum() {
        let mut reg = DeviceRegistry::new(RegistrySettings {
            device_count: 10,
            ..Default::default()
        })
        .unwrap();
        assert!(matches!(
            reg.add_device().unwrap_err(),
            RegistryError::DeviceCountOutOfRange { requested: 11, .. }
        ));
    }

    #[test]
    fn registry_devices_track_last_allocation() {
        let mut reg = registry(SharingPolicy::Priority);
        reg.set_demand(1, 100.0).unwrap();
        assert_eq!(reg.devices(), reg.report().devices.as_slice());
        assert_eq!(reg.device(1).unwrap().allocated, 100.0);
        assert_eq!(reg.device(2).unwrap().allocated, 0.0);
    }
}
