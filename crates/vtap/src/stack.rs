// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Network stack driver interface.
//!
//! The virtual tap does no Ethernet or IP processing of its own. It hands
//! frames and address assignments to a [`NetworkStack`] implementation and
//! receives outbound frames back through a [`FrameHandler`].
//!
//! ```text
//!   owning service                      network stack
//!        |  put(frame)                        ^
//!        +-------------> VirtualTap ----------+ inject_frame()
//!        ^                   |                |
//!        +-- FrameHandler <--+ deliver_frame <+ (stack output)
//! ```

use std::io;

use crate::address::InterfaceAddress;
use crate::mac::Mac;

/// Opaque handle to a stack-side network interface object.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct NetifHandle(pub u64);

/// One Ethernet frame, borrowed.
#[derive(Clone, Copy, Debug)]
pub struct Frame<'a> {
    pub src: Mac,
    pub dst: Mac,
    pub ether_type: u16,
    pub payload: &'a [u8],
}

impl<'a> Frame<'a> {
    pub fn new(src: Mac, dst: Mac, ether_type: u16, payload: &'a [u8]) -> Self {
        Self {
            src,
            dst,
            ether_type,
            payload,
        }
    }
}

/// Receives frames a tap has to deliver upward, with the network id of the
/// tap that produced them. Context the handler needs is captured by the
/// closure.
pub type FrameHandler = Box<dyn Fn(u64, &Frame<'_>) + Send + Sync>;

/// Driver for the userspace network stack behind a virtual tap.
///
/// Devices are identified by their network id.
pub trait NetworkStack: Send + Sync {
    /// Make `device` known to the stack so frames can be injected for it.
    fn register_device(&self, _device: u64, _mac: Mac) -> io::Result<()> {
        Ok(())
    }

    /// Register `addr` for data-plane use on `device`.
    ///
    /// Called again for an address that is already registered; must be
    /// idempotent.
    fn init_interface(&self, device: u64, mac: Mac, addr: &InterfaceAddress) -> io::Result<()>;

    /// Release `addr` from `device`.
    fn remove_address(&self, _device: u64, _addr: &InterfaceAddress) -> io::Result<()> {
        Ok(())
    }

    /// Hand an inbound frame to the stack.
    fn inject_frame(&self, device: u64, frame: &Frame<'_>);

    /// Whether the stack reports the interface as up.
    fn is_netif_up(&self, handle: NetifHandle) -> bool;

    /// Unblock any stack I/O that is waiting on behalf of `device`.
    fn interrupt(&self, _device: u64) {}

    /// Drop every interface object the stack created for `device`.
    fn dispose_interfaces(&self, device: u64);
}
