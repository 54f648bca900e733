// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Virtual tap device.
//!
//! One [`VirtualTap`] exists per joined network. It is registered with the
//! network stack and owns a monitor thread for as long as it lives.
//!
//! # Lifecycle
//!
//! ```text
//!  new() ── register_device ── spawn monitor ── post NetworkUp
//!    │
//!    │   add_ip / remove_ip / scan_multicast_groups / put / ...
//!    ▼
//!  drop ── post NetworkDown ── running=false ── signal ── interrupt
//!          ── dispose_interfaces ── join monitor ── release signal
//! ```
//!
//! The monitor exits only after the signal, and the stack is interrupted
//! before its interfaces for the device are disposed.

mod addresses;
mod monitor;
mod netif_state;
mod shutdown;

pub use addresses::AddressSet;
pub use monitor::{Housekeeping, NoopHousekeeping};
pub use netif_state::{InterfaceStateMonitor, NetifTransition};
pub use shutdown::{shutdown_channel, ShutdownListener, ShutdownTrigger};

use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, AtomicU32, AtomicU64, Ordering};
use std::sync::Arc;
use std::thread::JoinHandle;

use arc_swap::ArcSwap;
use parking_lot::Mutex;

use self::monitor::{spawn_monitor, MonitorTiming};
use crate::address::{InterfaceAddress, IpFamily};
use crate::config::TapConfig;
use crate::error::{Result, TapError};
use crate::event::{EventCode, EventSink};
use crate::mac::Mac;
use crate::metrics::{TapMetrics, TapMetricsSnapshot};
use crate::multicast::{MembershipDiff, MulticastGroup, MulticastMembership};
use crate::socket::SocketEvents;
use crate::stack::{Frame, FrameHandler, NetifHandle, NetworkStack};

/// Node id shown when the owning node has no identity yet.
pub const UNKNOWN_NODE_ID: &str = "----------";

/// A software Ethernet device attached to one virtual network.
pub struct VirtualTap {
    network_id: u64,
    mac: Mac,
    metric: u32,
    home_path: PathBuf,
    device_name: String,
    node_address: Option<u64>,
    friendly_name: ArcSwap<String>,
    mtu: AtomicU32,
    last_config_update: AtomicU64,

    /// Data-plane admission.
    enabled: AtomicBool,
    /// True until teardown starts; never set again.
    running: AtomicBool,
    initialized: AtomicBool,

    addresses: AddressSet,
    multicast: MulticastMembership,
    netif_state: InterfaceStateMonitor,

    stack: Arc<dyn NetworkStack>,
    events: Arc<dyn EventSink>,
    frame_handler: FrameHandler,
    housekeeping: Mutex<Box<dyn Housekeeping>>,

    shutdown: Option<ShutdownTrigger>,
    thread: Option<JoinHandle<()>>,
    metrics: Arc<TapMetrics>,
}

impl VirtualTap {
    /// Create the tap, register it with `stack` and start its monitor thread.
    ///
    /// Posts [`EventCode::NetworkUp`] to `events` on success. On failure
    /// nothing is left registered with the stack.
    pub fn new(
        config: TapConfig,
        stack: Arc<dyn NetworkStack>,
        events: Arc<dyn EventSink>,
        frame_handler: FrameHandler,
    ) -> Result<Self> {
        let device_name = config.device_name();
        let network_id = config.network_id;
        let (trigger, listener) = shutdown_channel();

        stack
            .register_device(network_id, config.mac)
            .map_err(TapError::DeviceRegistration)?;

        let metrics = Arc::new(TapMetrics::new());
        let timing = MonitorTiming {
            poll_interval: config.poll_interval,
            poll_sleep: config.poll_sleep,
        };
        let thread = match spawn_monitor(&device_name, listener, timing, Arc::clone(&metrics)) {
            Ok(handle) => handle,
            Err(e) => {
                log::warn!("[vtap] {} monitor spawn failed: {}", device_name, e);
                stack.dispose_interfaces(network_id);
                return Err(TapError::ThreadSpawn(e));
            }
        };

        let tap = Self {
            network_id,
            mac: config.mac,
            metric: config.metric,
            home_path: config.home_path,
            device_name,
            node_address: config.node_address,
            friendly_name: ArcSwap::from_pointee(config.friendly_name),
            mtu: AtomicU32::new(config.mtu),
            last_config_update: AtomicU64::new(0),
            enabled: AtomicBool::new(true),
            running: AtomicBool::new(true),
            initialized: AtomicBool::new(false),
            addresses: AddressSet::new(Arc::clone(&stack), network_id, config.mac),
            multicast: MulticastMembership::new(),
            netif_state: InterfaceStateMonitor::new(),
            stack,
            events,
            frame_handler,
            housekeeping: Mutex::new(Box::new(NoopHousekeeping)),
            shutdown: Some(trigger),
            thread: Some(thread),
            metrics,
        };

        tap.initialized.store(true, Ordering::Release);
        log::info!(
            "[vtap] {} up (mac={} mtu={})",
            tap.device_name,
            tap.mac,
            tap.mtu()
        );
        tap.events.post(network_id, EventCode::NetworkUp);
        Ok(tap)
    }

    pub fn network_id(&self) -> u64 {
        self.network_id
    }

    pub fn mac(&self) -> Mac {
        self.mac
    }

    pub fn metric(&self) -> u32 {
        self.metric
    }

    pub fn home_path(&self) -> &Path {
        &self.home_path
    }

    /// `libzt<network id in hex>`; also the monitor thread's name.
    pub fn device_name(&self) -> &str {
        &self.device_name
    }

    /// Hex address of the owning node, or [`UNKNOWN_NODE_ID`].
    pub fn node_id(&self) -> String {
        match self.node_address {
            Some(addr) => format!("{:x}", addr),
            None => UNKNOWN_NODE_ID.to_string(),
        }
    }

    pub fn friendly_name(&self) -> Arc<String> {
        self.friendly_name.load_full()
    }

    pub fn set_friendly_name(&self, name: impl Into<String>) {
        let name = name.into();
        log::info!("[vtap] {} friendly name: {}", self.device_name, name);
        self.friendly_name.store(Arc::new(name));
    }

    pub fn mtu(&self) -> u32 {
        self.mtu.load(Ordering::Relaxed)
    }

    /// Last write wins; frames in flight may see either value.
    pub fn set_mtu(&self, mtu: u32) {
        self.mtu.store(mtu, Ordering::Relaxed);
    }

    pub fn last_config_update(&self) -> u64 {
        self.last_config_update.load(Ordering::Relaxed)
    }

    pub fn set_last_config_update(&self, timestamp: u64) {
        self.last_config_update.store(timestamp, Ordering::Relaxed);
    }

    pub fn enabled(&self) -> bool {
        self.enabled.load(Ordering::Acquire)
    }

    pub fn set_enabled(&self, enabled: bool) {
        self.enabled.store(enabled, Ordering::Release);
    }

    /// Advisory: false once teardown has started.
    pub fn is_running(&self) -> bool {
        self.running.load(Ordering::Acquire)
    }

    pub fn is_initialized(&self) -> bool {
        self.initialized.load(Ordering::Acquire)
    }

    /// Assign an address and register it with the stack.
    ///
    /// See [`AddressSet::add`].
    pub fn add_ip(&self, addr: InterfaceAddress) -> Result<bool> {
        let inserted = self.addresses.add(addr)?;
        if inserted {
            self.metrics.record_address_added();
            log::debug!("[vtap] {} added {}", self.device_name, addr);
        }
        Ok(inserted)
    }

    /// Unassign an address. `Ok(false)` if it was not assigned.
    ///
    /// See [`AddressSet::remove`].
    pub fn remove_ip(&self, addr: &InterfaceAddress) -> Result<bool> {
        let removed = self.addresses.remove(addr);
        match &removed {
            Ok(true) | Err(TapError::StackDeregistration { .. }) => {
                self.metrics.record_address_removed();
                log::debug!("[vtap] {} removed {}", self.device_name, addr);
            }
            Ok(false) => {
                log::debug!("[vtap] {} remove of unassigned {}", self.device_name, addr);
            }
            Err(_) => {}
        }
        removed
    }

    /// Copy of the assigned addresses in canonical order.
    pub fn ips(&self) -> Vec<InterfaceAddress> {
        self.addresses.snapshot()
    }

    pub fn addresses(&self) -> &AddressSet {
        &self.addresses
    }

    /// Recompute multicast subscriptions from the assigned addresses.
    pub fn scan_multicast_groups(&self) -> MembershipDiff {
        let diff = self.multicast.scan(&self.addresses);
        self.metrics.record_multicast_scan();
        if !diff.is_empty() {
            log::debug!(
                "[vtap] {} multicast +{} -{}",
                self.device_name,
                diff.added.len(),
                diff.removed.len()
            );
        }
        diff
    }

    /// Groups committed by the last scan.
    pub fn multicast_groups(&self) -> Vec<MulticastGroup> {
        self.multicast.groups()
    }

    /// Hand an inbound frame to the network stack.
    pub fn put(&self, frame: &Frame<'_>) {
        if !self.enabled() {
            self.metrics.record_frame_dropped();
            log::trace!("[vtap] {} disabled, dropping inbound frame", self.device_name);
            return;
        }
        self.stack.inject_frame(self.network_id, frame);
        self.metrics.record_frame_injected();
    }

    /// Deliver a frame produced by the stack to the owning service.
    pub fn deliver_frame(&self, frame: &Frame<'_>) {
        if !self.enabled() {
            self.metrics.record_frame_dropped();
            log::trace!("[vtap] {} disabled, dropping outbound frame", self.device_name);
            return;
        }
        (self.frame_handler)(self.network_id, frame);
        self.metrics.record_frame_delivered();
    }

    /// Bind the stack's interface object for `family`, assumed down.
    pub fn set_netif(&self, family: IpFamily, handle: NetifHandle) {
        self.netif_state.bind(family, handle);
    }

    pub fn set_netif4(&self, handle: NetifHandle) {
        self.set_netif(IpFamily::V4, handle);
    }

    pub fn set_netif6(&self, handle: NetifHandle) {
        self.set_netif(IpFamily::V6, handle);
    }

    pub fn netif_state(&self) -> &InterfaceStateMonitor {
        &self.netif_state
    }

    /// Check `handle` for an up/down edge and post the matching event.
    pub fn poll_interface_state(&self, handle: Option<NetifHandle>) -> NetifTransition {
        let transition = self
            .netif_state
            .check_transition(handle, |h| self.stack.is_netif_up(h));
        if !transition.is_none() {
            log::info!("[vtap] {} {:?}", self.device_name, transition);
            self.events.post(self.network_id, transition.event());
        }
        transition
    }

    /// Replace the housekeeping hook.
    pub fn set_housekeeping(&self, hook: Box<dyn Housekeeping>) {
        *self.housekeeping.lock() = hook;
    }

    /// Run the housekeeping hook on the calling thread.
    pub fn housekeeping(&self) {
        self.housekeeping.lock().run(&self.device_name);
    }

    pub fn metrics(&self) -> TapMetricsSnapshot {
        self.metrics.snapshot()
    }

    /// Tear the tap down now instead of at drop.
    pub fn close(mut self) {
        self.teardown();
    }

    fn teardown(&mut self) {
        if !self.running.load(Ordering::Acquire) {
            return;
        }

        self.events.post(self.network_id, EventCode::NetworkDown);
        self.running.store(false, Ordering::Release);
        if let Some(trigger) = &self.shutdown {
            trigger.signal();
        }
        self.stack.interrupt(self.network_id);
        self.stack.dispose_interfaces(self.network_id);
        if let Some(handle) = self.thread.take() {
            if handle.join().is_err() {
                log::warn!("[vtap] {} monitor thread panicked", self.device_name);
            }
        }
        self.shutdown = None;
        log::info!("[vtap] {} down", self.device_name);
    }
}

impl Drop for VirtualTap {
    fn drop(&mut self) {
        self.teardown();
    }
}

impl SocketEvents for VirtualTap {}

impl std::fmt::Debug for VirtualTap {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("VirtualTap")
            .field("device_name", &self.device_name)
            .field("mac", &self.mac)
            .field("mtu", &self.mtu())
            .field("enabled", &self.enabled())
            .field("running", &self.is_running())
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::event::NoopEventSink;
    use std::io;
    use std::net::{IpAddr, Ipv4Addr};
    use std::sync::atomic::AtomicUsize;
    use std::time::Duration;

    #[derive(Default)]
    struct NullStack {
        injected: AtomicUsize,
        reject_device: AtomicBool,
    }

    impl NetworkStack for NullStack {
        fn register_device(&self, _device: u64, _mac: Mac) -> io::Result<()> {
            if self.reject_device.load(Ordering::SeqCst) {
                return Err(io::Error::other("no driver"));
            }
            Ok(())
        }

        fn init_interface(
            &self,
            _device: u64,
            _mac: Mac,
            _addr: &InterfaceAddress,
        ) -> io::Result<()> {
            Ok(())
        }

        fn inject_frame(&self, _device: u64, _frame: &Frame<'_>) {
            self.injected.fetch_add(1, Ordering::SeqCst);
        }

        fn is_netif_up(&self, _handle: NetifHandle) -> bool {
            true
        }

        fn dispose_interfaces(&self, _device: u64) {}
    }

    fn config() -> TapConfig {
        TapConfig::new(0x8056c2e21c000001, Mac::from_u64(0x329e1a0455f0))
            .with_friendly_name("lab")
            .with_poll_timing(Duration::from_millis(5), Duration::from_millis(1))
    }

    fn make_tap(stack: Arc<NullStack>) -> VirtualTap {
        VirtualTap::new(config(), stack, Arc::new(NoopEventSink), Box::new(|_, _| {}))
            .expect("tap construction")
    }

    #[test]
    fn test_new_sets_initial_flags() {
        let tap = make_tap(Arc::new(NullStack::default()));
        assert!(tap.enabled());
        assert!(tap.is_running());
        assert!(tap.is_initialized());
        assert_eq!(tap.device_name(), "libzt8056c2e21c000001");
        assert_eq!(tap.mtu(), crate::config::DEFAULT_MTU);
        assert_eq!(*tap.friendly_name(), "lab");
    }

    #[test]
    fn test_registration_failure_is_fatal() {
        let stack = Arc::new(NullStack::default());
        stack.reject_device.store(true, Ordering::SeqCst);
        let err = VirtualTap::new(config(), stack, Arc::new(NoopEventSink), Box::new(|_, _| {}))
            .expect_err("construction should fail");
        assert!(matches!(err, TapError::DeviceRegistration(_)));
    }

    #[test]
    fn test_mutable_identity_fields() {
        let tap = make_tap(Arc::new(NullStack::default()));
        tap.set_mtu(1280);
        tap.set_friendly_name("renamed");
        tap.set_last_config_update(1_700_000_000_000);
        assert_eq!(tap.mtu(), 1280);
        assert_eq!(*tap.friendly_name(), "renamed");
        assert_eq!(tap.last_config_update(), 1_700_000_000_000);
    }

    #[test]
    fn test_node_id_placeholder() {
        let tap = make_tap(Arc::new(NullStack::default()));
        assert_eq!(tap.node_id(), UNKNOWN_NODE_ID);

        let tap = VirtualTap::new(
            config().with_node_address(0xefcc1b0947),
            Arc::new(NullStack::default()),
            Arc::new(NoopEventSink),
            Box::new(|_, _| {}),
        )
        .expect("tap construction");
        assert_eq!(tap.node_id(), "efcc1b0947");
    }

    #[test]
    fn test_put_respects_enabled() {
        let stack = Arc::new(NullStack::default());
        let tap = make_tap(Arc::clone(&stack));
        let frame = Frame::new(Mac::from_u64(1), tap.mac(), 0x0800, &[0u8; 20]);

        tap.put(&frame);
        tap.set_enabled(false);
        tap.put(&frame);

        assert_eq!(stack.injected.load(Ordering::SeqCst), 1);
        let m = tap.metrics();
        assert_eq!(m.frames_injected, 1);
        assert_eq!(m.frames_dropped, 1);
    }

    #[test]
    fn test_close_is_final() {
        let tap = make_tap(Arc::new(NullStack::default()));
        tap.add_ip(InterfaceAddress::new(IpAddr::V4(Ipv4Addr::new(10, 147, 0, 2)), 16))
            .expect("add");
        tap.close();
    }

    #[test]
    fn test_housekeeping_hook_runs() {
        struct Counting(Arc<AtomicUsize>);
        impl Housekeeping for Counting {
            fn run(&mut self, device_name: &str) {
                assert!(device_name.starts_with("libzt"));
                self.0.fetch_add(1, Ordering::SeqCst);
            }
        }

        let tap = make_tap(Arc::new(NullStack::default()));
        tap.housekeeping();
        let count = Arc::new(AtomicUsize::new(0));
        tap.set_housekeeping(Box::new(Counting(Arc::clone(&count))));
        tap.housekeeping();
        tap.housekeeping();
        assert_eq!(count.load(Ordering::SeqCst), 2);
    }

    #[test]
    fn test_socket_hooks_default_to_noop() {
        use crate::socket::SocketId;
        let tap = make_tap(Arc::new(NullStack::default()));
        let addr = "127.0.0.1:9993".parse().expect("socket addr");
        tap.on_datagram(SocketId(1), addr, addr, b"ping");
        tap.on_tcp_connect(SocketId(2), true);
        tap.on_tcp_accept(SocketId(2), SocketId(3), addr);
        tap.on_tcp_data(SocketId(3), b"data");
        tap.on_tcp_writable(SocketId(3));
        tap.on_tcp_close(SocketId(3));
    }
}
