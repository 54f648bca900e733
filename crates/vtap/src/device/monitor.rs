// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Background monitor thread of a virtual tap.

use std::io;
use std::sync::Arc;
use std::thread::{self, JoinHandle};
use std::time::Duration;

use super::shutdown::ShutdownListener;
use crate::metrics::TapMetrics;

/// Periodic maintenance hook run by the owning service through
/// [`VirtualTap::housekeeping`](super::VirtualTap::housekeeping).
pub trait Housekeeping: Send {
    fn run(&mut self, device_name: &str);
}

/// Default hook: does nothing.
pub struct NoopHousekeeping;

impl Housekeeping for NoopHousekeeping {
    fn run(&mut self, _device_name: &str) {}
}

/// Timing of the monitor loop.
#[derive(Clone, Copy, Debug)]
pub(crate) struct MonitorTiming {
    /// Bounded wait on the shutdown signal.
    pub poll_interval: Duration,
    /// Sleep after a wait that saw no shutdown.
    pub poll_sleep: Duration,
}

/// Spawn the monitor thread, named after the device.
///
/// The thread returns once `listener` reports shutdown; it is never
/// restarted.
pub(crate) fn spawn_monitor(
    device_name: &str,
    listener: ShutdownListener,
    timing: MonitorTiming,
    metrics: Arc<TapMetrics>,
) -> io::Result<JoinHandle<()>> {
    let name = device_name.to_string();
    thread::Builder::new()
        .name(device_name.to_string())
        .spawn(move || run_monitor(&name, &listener, timing, &metrics))
}

fn run_monitor(
    name: &str,
    listener: &ShutdownListener,
    timing: MonitorTiming,
    metrics: &TapMetrics,
) {
    log::debug!("[vtap] {} monitor started", name);
    loop {
        if listener.wait(timing.poll_interval) {
            break;
        }
        metrics.record_monitor_tick();
        thread::sleep(timing.poll_sleep);
    }
    log::debug!(
        "[vtap] {} monitor stopped after {} ticks",
        name,
        metrics.monitor_ticks()
    );
}
