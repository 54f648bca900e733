// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Addresses assigned to a virtual tap.

use std::sync::Arc;

use parking_lot::Mutex;

use crate::address::InterfaceAddress;
use crate::error::{Result, TapError};
use crate::mac::Mac;
use crate::stack::NetworkStack;

/// Sorted, duplicate-free set of addresses assigned to one tap.
///
/// Every mutation registers or releases the address with the network stack
/// while holding the set's lock, so the stack sees assignments in the same
/// order as the set does. Readers get copies, never a view into the set.
pub struct AddressSet {
    addrs: Mutex<Vec<InterfaceAddress>>,
    stack: Arc<dyn NetworkStack>,
    device: u64,
    mac: Mac,
}

impl AddressSet {
    /// Empty set for the tap `device` with hardware address `mac`.
    pub fn new(stack: Arc<dyn NetworkStack>, device: u64, mac: Mac) -> Self {
        Self {
            addrs: Mutex::new(Vec::new()),
            stack,
            device,
            mac,
        }
    }

    /// Assign `addr` to the tap.
    ///
    /// The stack registration runs even when `addr` is already present.
    /// Returns `Ok(true)` if the address was inserted, `Ok(false)` if it was
    /// already assigned. A stack failure leaves the set unchanged.
    pub fn add(&self, addr: InterfaceAddress) -> Result<bool> {
        let mut addrs = self.addrs.lock();
        self.stack
            .init_interface(self.device, self.mac, &addr)
            .map_err(|source| TapError::StackRegistration { addr, source })?;

        match addrs.binary_search(&addr) {
            Ok(_) => Ok(false),
            Err(pos) => {
                addrs.insert(pos, addr);
                Ok(true)
            }
        }
    }

    /// Unassign `addr`.
    ///
    /// Returns `Ok(false)` without touching the set or the stack when `addr`
    /// is not assigned. When the stack fails to release the address the
    /// error is returned, but the address stays removed from the set.
    pub fn remove(&self, addr: &InterfaceAddress) -> Result<bool> {
        let mut addrs = self.addrs.lock();
        let pos = match addrs.binary_search(addr) {
            Ok(pos) => pos,
            Err(_) => return Ok(false),
        };
        addrs.remove(pos);

        self.stack
            .remove_address(self.device, addr)
            .map_err(|source| TapError::StackDeregistration {
                addr: *addr,
                source,
            })?;
        Ok(true)
    }

    /// Copy of the assigned addresses in canonical order.
    pub fn snapshot(&self) -> Vec<InterfaceAddress> {
        self.addrs.lock().clone()
    }

    pub fn contains(&self, addr: &InterfaceAddress) -> bool {
        self.addrs.lock().binary_search(addr).is_ok()
    }

    pub fn len(&self) -> usize {
        self.addrs.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.addrs.lock().is_empty()
    }
}

impl std::fmt::Debug for AddressSet {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AddressSet")
            .field("device", &format_args!("{:x}", self.device))
            .field("addrs", &*self.addrs.lock())
            .finish()
    }
}
