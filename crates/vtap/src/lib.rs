// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! # vtap - virtual Ethernet taps for an embedded network stack
//!
//! A [`VirtualTap`] is the per-network software Ethernet device that sits
//! between an overlay network service and a userspace TCP/IP stack. It owns
//! the device's identity, the IP addresses assigned to it, the multicast
//! groups it subscribes to for neighbour/ARP resolution, and a background
//! monitor thread whose lifetime is tied to the device.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use vtap::{ChannelEventSink, InterfaceAddress, Mac, NetworkStack, TapConfig, VirtualTap};
//!
//! # fn stack() -> Arc<dyn NetworkStack> { unimplemented!() }
//! fn main() -> vtap::Result<()> {
//!     let (events, rx) = ChannelEventSink::new();
//!     let config = TapConfig::new(0x8056c2e21c000001, Mac::from_u64(0x329e1a0455f0));
//!
//!     let tap = VirtualTap::new(config, stack(), Arc::new(events), Box::new(|_nwid, _frame| {}))?;
//!     tap.add_ip(InterfaceAddress::new("10.147.17.5".parse().unwrap(), 24))?;
//!     let diff = tap.scan_multicast_groups();
//!     assert_eq!(diff.added.len(), 1);
//!
//!     drop(tap); // posts NetworkDown and joins the monitor thread
//!     while let Ok((nwid, event)) = rx.try_recv() {
//!         println!("{:x}: {:?}", nwid, event);
//!     }
//!     Ok(())
//! }
//! ```
//!
//! ## Architecture
//!
//! ```text
//! +---------------------------------------------------------------+
//! |                  Overlay network service                      |
//! |     put() / FrameHandler       EventSink      Housekeeping    |
//! +---------------------------------------------------------------+
//! |                        VirtualTap                             |
//! |  AddressSet | MulticastMembership | InterfaceStateMonitor     |
//! |  monitor thread <-- ShutdownTrigger                           |
//! +---------------------------------------------------------------+
//! |                 NetworkStack (userspace TCP/IP)               |
//! +---------------------------------------------------------------+
//! ```

pub mod address;
pub mod config;
pub mod device;
pub mod error;
pub mod event;
pub mod mac;
pub mod metrics;
pub mod multicast;
pub mod socket;
pub mod stack;

pub use address::{InterfaceAddress, IpFamily};
pub use config::TapConfig;
pub use device::{
    AddressSet, Housekeeping, InterfaceStateMonitor, NetifTransition, NoopHousekeeping,
    VirtualTap, UNKNOWN_NODE_ID,
};
pub use error::{Result, TapError};
pub use event::{ChannelEventSink, EventCode, EventSink, NoopEventSink};
pub use mac::Mac;
pub use metrics::{TapMetrics, TapMetricsSnapshot};
pub use multicast::{MembershipDiff, MulticastGroup, MulticastMembership};
pub use socket::{SocketEvents, SocketId};
pub use stack::{Frame, FrameHandler, NetifHandle, NetworkStack};
