// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Counters for virtual tap activity.

use std::sync::atomic::{AtomicU64, Ordering};
use std::time::{Duration, Instant};

/// Activity counters of one tap. Shared with its monitor thread.
pub struct TapMetrics {
    frames_injected: AtomicU64,
    frames_delivered: AtomicU64,
    frames_dropped: AtomicU64,
    addresses_added: AtomicU64,
    addresses_removed: AtomicU64,
    multicast_scans: AtomicU64,
    monitor_ticks: AtomicU64,
    created: Instant,
}

impl TapMetrics {
    pub fn new() -> Self {
        Self {
            frames_injected: AtomicU64::new(0),
            frames_delivered: AtomicU64::new(0),
            frames_dropped: AtomicU64::new(0),
            addresses_added: AtomicU64::new(0),
            addresses_removed: AtomicU64::new(0),
            multicast_scans: AtomicU64::new(0),
            monitor_ticks: AtomicU64::new(0),
            created: Instant::now(),
        }
    }

    pub fn record_frame_injected(&self) {
        self.frames_injected.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_frame_delivered(&self) {
        self.frames_delivered.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_frame_dropped(&self) {
        self.frames_dropped.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_address_added(&self) {
        self.addresses_added.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_address_removed(&self) {
        self.addresses_removed.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_multicast_scan(&self) {
        self.multicast_scans.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_monitor_tick(&self) {
        self.monitor_ticks.fetch_add(1, Ordering::Relaxed);
    }

    pub fn monitor_ticks(&self) -> u64 {
        self.monitor_ticks.load(Ordering::Relaxed)
    }

    pub fn uptime(&self) -> Duration {
        self.created.elapsed()
    }

    /// Point-in-time copy of all counters.
    pub fn snapshot(&self) -> TapMetricsSnapshot {
        TapMetricsSnapshot {
            frames_injected: self.frames_injected.load(Ordering::Relaxed),
            frames_delivered: self.frames_delivered.load(Ordering::Relaxed),
            frames_dropped: self.frames_dropped.load(Ordering::Relaxed),
            addresses_added: self.addresses_added.load(Ordering::Relaxed),
            addresses_removed: self.addresses_removed.load(Ordering::Relaxed),
            multicast_scans: self.multicast_scans.load(Ordering::Relaxed),
            monitor_ticks: self.monitor_ticks(),
            uptime: self.uptime(),
        }
    }
}

impl Default for TapMetrics {
    fn default() -> Self {
        Self::new()
    }
}

/// Snapshot of [`TapMetrics`].
#[derive(Clone, Debug, Default)]
pub struct TapMetricsSnapshot {
    pub frames_injected: u64,
    pub frames_delivered: u64,
    pub frames_dropped: u64,
    /// Addresses newly inserted (duplicate adds are not counted).
    pub addresses_added: u64,
    pub addresses_removed: u64,
    pub multicast_scans: u64,
    pub monitor_ticks: u64,
    pub uptime: Duration,
}

impl TapMetricsSnapshot {
    /// Frames that crossed the tap in either direction.
    pub fn total_frames(&self) -> u64 {
        self.frames_injected + self.frames_delivered
    }
}
