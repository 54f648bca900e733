// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Multicast membership derived from the assigned address set.
//!
//! Each scan re-derives the required groups from a snapshot of the
//! addresses and diffs them against the groups committed by the previous
//! scan. The committed set is always sorted and duplicate-free, so both
//! directions of the diff are binary searches.

use parking_lot::Mutex;

use super::group::MulticastGroup;
use crate::address::InterfaceAddress;
use crate::device::AddressSet;

/// Result of one membership scan.
///
/// `added` and `removed` are disjoint and each in ascending group order.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct MembershipDiff {
    /// Groups required now that were not required by the previous scan.
    pub added: Vec<MulticastGroup>,
    /// Groups required by the previous scan that are no longer required.
    pub removed: Vec<MulticastGroup>,
}

impl MembershipDiff {
    pub fn is_empty(&self) -> bool {
        self.added.is_empty() && self.removed.is_empty()
    }
}

/// Committed multicast subscriptions of one virtual tap.
#[derive(Debug, Default)]
pub struct MulticastMembership {
    groups: Mutex<Vec<MulticastGroup>>,
}

impl MulticastMembership {
    pub fn new() -> Self {
        Self::default()
    }

    /// Diff the groups required by `addresses` against the previous scan
    /// and commit the new set.
    pub fn scan(&self, addresses: &AddressSet) -> MembershipDiff {
        let mut committed = self.groups.lock();
        let current = addresses.snapshot();
        Self::commit(&mut committed, &current)
    }

    /// Same as [`scan`](Self::scan) for an address list the caller already
    /// holds. `current` need not be sorted.
    pub fn scan_addresses(&self, current: &[InterfaceAddress]) -> MembershipDiff {
        let mut committed = self.groups.lock();
        Self::commit(&mut committed, current)
    }

    fn commit(committed: &mut Vec<MulticastGroup>, current: &[InterfaceAddress]) -> MembershipDiff {
        let mut required: Vec<MulticastGroup> = current
            .iter()
            .map(MulticastGroup::for_address_resolution)
            .collect();
        required.sort_unstable();
        required.dedup();

        let added = required
            .iter()
            .filter(|g| committed.binary_search(g).is_err())
            .copied()
            .collect();
        let removed = committed
            .iter()
            .filter(|g| required.binary_search(g).is_err())
            .copied()
            .collect();

        *committed = required;
        MembershipDiff { added, removed }
    }

    /// Copy of the committed groups, ascending.
    pub fn groups(&self) -> Vec<MulticastGroup> {
        self.groups.lock().clone()
    }

    pub fn len(&self) -> usize {
        self.groups.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.groups.lock().is_empty()
    }
}
