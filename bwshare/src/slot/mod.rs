/*
SPDX-FileCopyrightText: Copyright 2026 LG Electronics Inc.
SPDX-License-Identifier: MIT
*/

//! Rotating "active time slot" for the TDM view.
//!
//! Under TDM every device gets `capacity / n` on average, but only one of
//! them owns the link at any instant.  [`SlotClock`] tracks which one.  It is
//! presentation state only: it never feeds back into the allocator, and the
//! allocator never resets it.
//!
//! The clock is driven from outside, either one step at a time with
//! [`SlotClock::tick`] or by wall time with [`SlotClock::advance`].

use std::time::Duration;

use tracing::trace;

/// Slot length used when nothing else is configured.
pub const DEFAULT_SLOT_INTERVAL: Duration = Duration::from_secs(1);

#[derive(Debug, Clone)]
pub struct SlotClock {
    interval: Duration,
    active: usize,
    /// Time accumulated by `advance` that has not yet filled a whole slot.
    carry: Duration,
}

impl Default for SlotClock {
    fn default() -> Self {
        Self::new(DEFAULT_SLOT_INTERVAL)
    }
}

impl SlotClock {
    /// A clock starting at slot 0.
    ///
    /// A zero `interval` is bumped to 1 ms so `advance` stays finite.
    pub fn new(interval: Duration) -> Self {
        Self {
            interval: interval.max(Duration::from_millis(1)),
            active: 0,
            carry: Duration::ZERO,
        }
    }

    pub fn interval(&self) -> Duration {
        self.interval
    }

    /// Index of the device holding the current slot, or `None` when there
    /// are no devices.  Wraps if the set shrank since the last tick.
    pub fn active(&self, device_count: usize) -> Option<usize> {
        if device_count == 0 {
            None
        } else {
            Some(self.active % device_count)
        }
    }

    /// Hand the slot to the next device.
    pub fn tick(&mut self, device_count: usize) -> Option<usize> {
        if device_count == 0 {
            self.reset();
            return None;
        }
        self.active = (self.active % device_count + 1) % device_count;
        trace!(active = self.active, device_count, "TDM slot advanced");
        Some(self.active)
    }

    /// Apply one tick per whole `interval` contained in `elapsed` plus any
    /// carried remainder.
    pub fn advance(&mut self, elapsed: Duration, device_count: usize) -> Option<usize> {
        if device_count == 0 {
            self.reset();
            return None;
        }

        let total = self.carry + elapsed;
        let interval_ns = self.interval.as_nanos();
        let steps = total.as_nanos() / interval_ns;
        let rem_ns = total.as_nanos() % interval_ns;
        // rem_ns < interval_ns, which came from a Duration
        self.carry = Duration::from_nanos(rem_ns as u64);

        let steps = (steps % device_count as u128) as usize;
        self.active = (self.active % device_count + steps) % device_count;
        Some(self.active)
    }

    pub fn reset(&mut self) {
        self.active = 0;
        self.carry = Duration::ZERO;
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn starts_at_first_device() {
        let clock = SlotClock::default();
        assert_eq!(clock.active(3), Some(0));
        assert_eq!(clock.interval(), Duration::from_secs(1));
    }

    #[test]
    fn tick_wraps_around_device_count() {
        let mut clock = SlotClock::default();
        let seen: Vec<_> = (0..5).map(|_| clock.tick(3).unwrap()).collect();
        assert_eq!(seen, vec![1, 2, 0, 1, 2]);
    }

    #[test]
    fn no_devices_means_no_active_slot() {
        let mut clock = SlotClock::default();
        clock.tick(4);
        assert_eq!(clock.active(0), None);
        assert_eq!(clock.tick(0), None);
        assert_eq!(clock.active(4), Some(0), "tick with zero devices resets");
    }

    #[test]
    fn shrinking_set_wraps_active_index() {
        let mut clock = SlotClock::default();
        for _ in 0..4 {
            clock.tick(5);
        }
        assert_eq!(clock.active(5), Some(4));
        assert_eq!(clock.active(3), Some(1));
        assert_eq!(clock.tick(3), Some(2));
    }

    #[test]
    fn advance_counts_whole_intervals_and_carries_remainder() {
        let mut clock = SlotClock::new(Duration::from_millis(100));
        assert_eq!(clock.advance(Duration::from_millis(250), 4), Some(2));
        // 50 ms carried + 60 ms = one more slot
        assert_eq!(clock.advance(Duration::from_millis(60), 4), Some(3));
        assert_eq!(clock.advance(Duration::from_millis(90), 4), Some(0));
    }

    #[test]
    fn advance_below_one_interval_keeps_slot() {
        let mut clock = SlotClock::new(Duration::from_millis(100));
        assert_eq!(clock.advance(Duration::from_millis(99), 2), Some(0));
    }

    #[test]
    fn zero_interval_is_clamped() {
        let clock = SlotClock::new(Duration::ZERO);
        assert_eq!(clock.interval(), Duration::from_millis(1));
    }
}
