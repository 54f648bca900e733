// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Edge detection of stack-side interface up/down transitions.

use parking_lot::Mutex;

use crate::address::IpFamily;
use crate::event::EventCode;
use crate::stack::NetifHandle;

/// Result of one transition check.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum NetifTransition {
    #[default]
    None,
    Ipv4Up,
    Ipv4Down,
    Ipv6Up,
    Ipv6Down,
}

impl NetifTransition {
    /// Lifecycle event to post for this transition.
    pub fn event(self) -> EventCode {
        match self {
            Self::None => EventCode::None,
            Self::Ipv4Up => EventCode::NetifUpIp4,
            Self::Ipv4Down => EventCode::NetifDownIp4,
            Self::Ipv6Up => EventCode::NetifUpIp6,
            Self::Ipv6Down => EventCode::NetifDownIp6,
        }
    }

    pub fn is_none(self) -> bool {
        self == Self::None
    }

    fn edge(family: IpFamily, up: bool) -> Self {
        match (family, up) {
            (IpFamily::V4, true) => Self::Ipv4Up,
            (IpFamily::V4, false) => Self::Ipv4Down,
            (IpFamily::V6, true) => Self::Ipv6Up,
            (IpFamily::V6, false) => Self::Ipv6Down,
        }
    }
}

#[derive(Clone, Copy, Debug, Default)]
struct Slot {
    handle: Option<NetifHandle>,
    was_up: bool,
}

#[derive(Debug, Default)]
struct Slots {
    v4: Slot,
    v6: Slot,
}

impl Slots {
    fn get(&self, family: IpFamily) -> &Slot {
        match family {
            IpFamily::V4 => &self.v4,
            IpFamily::V6 => &self.v6,
        }
    }

    fn get_mut(&mut self, family: IpFamily) -> &mut Slot {
        match family {
            IpFamily::V4 => &mut self.v4,
            IpFamily::V6 => &mut self.v6,
        }
    }
}

/// Last observed up/down state of the tap's IPv4 and IPv6 stack interfaces.
#[derive(Debug, Default)]
pub struct InterfaceStateMonitor {
    slots: Mutex<Slots>,
}

impl InterfaceStateMonitor {
    pub fn new() -> Self {
        Self::default()
    }

    /// Bind `handle` to the `family` slot, assumed down.
    pub fn bind(&self, family: IpFamily, handle: NetifHandle) {
        self.bind_with_state(family, handle, false);
    }

    /// Bind `handle` to the `family` slot with a known last state.
    pub fn bind_with_state(&self, family: IpFamily, handle: NetifHandle, was_up: bool) {
        *self.slots.lock().get_mut(family) = Slot {
            handle: Some(handle),
            was_up,
        };
    }

    /// Forget the handle bound to `family`.
    pub fn unbind(&self, family: IpFamily) {
        *self.slots.lock().get_mut(family) = Slot::default();
    }

    pub fn handle(&self, family: IpFamily) -> Option<NetifHandle> {
        self.slots.lock().get(family).handle
    }

    /// Last state recorded for `family`.
    pub fn was_up(&self, family: IpFamily) -> bool {
        self.slots.lock().get(family).was_up
    }

    /// Compare the live state of `handle` against the last recorded state.
    ///
    /// Reports a transition exactly once per flip and records the new state
    /// when it does. A handle bound to neither slot, or `None`, yields
    /// [`NetifTransition::None`] and changes nothing. `is_up` is queried at
    /// most once, and only for a recognised handle.
    ///
    /// A handle bound to both slots is checked against IPv4 first; when
    /// IPv4 has no edge the IPv6 slot is checked in the same call. At most
    /// one transition is reported per call, so the IPv6 edge of a shared
    /// handle surfaces on the next call.
    pub fn check_transition(
        &self,
        handle: Option<NetifHandle>,
        is_up: impl FnOnce(NetifHandle) -> bool,
    ) -> NetifTransition {
        let Some(handle) = handle else {
            return NetifTransition::None;
        };

        let mut slots = self.slots.lock();
        if slots.v4.handle != Some(handle) && slots.v6.handle != Some(handle) {
            return NetifTransition::None;
        }

        let up = is_up(handle);
        for family in [IpFamily::V4, IpFamily::V6] {
            let slot = slots.get_mut(family);
            if slot.handle == Some(handle) && slot.was_up != up {
                slot.was_up = up;
                return NetifTransition::edge(family, up);
            }
        }
        NetifTransition::None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const H4: NetifHandle = NetifHandle(0x1000);
    const H6: NetifHandle = NetifHandle(0x2000);

    #[test]
    fn test_null_and_unknown_handles() {
        let mon = InterfaceStateMonitor::new();
        mon.bind(IpFamily::V4, H4);
        assert_eq!(mon.check_transition(None, |_| true), NetifTransition::None);
        assert_eq!(
            mon.check_transition(Some(NetifHandle(0xdead)), |_| panic!("must not be queried")),
            NetifTransition::None
        );
        assert!(!mon.was_up(IpFamily::V4));
    }

    #[test]
    fn test_edge_sequence_from_up() {
        let mon = InterfaceStateMonitor::new();
        mon.bind_with_state(IpFamily::V4, H4, true);

        let observed: Vec<_> = [true, true, false, false, true]
            .into_iter()
            .map(|live| mon.check_transition(Some(H4), |_| live))
            .collect();

        assert_eq!(
            observed,
            vec![
                NetifTransition::None,
                NetifTransition::None,
                NetifTransition::Ipv4Down,
                NetifTransition::None,
                NetifTransition::Ipv4Up,
            ]
        );
    }

    #[test]
    fn test_v6_slot_independent() {
        let mon = InterfaceStateMonitor::new();
        mon.bind(IpFamily::V4, H4);
        mon.bind(IpFamily::V6, H6);

        assert_eq!(mon.check_transition(Some(H6), |_| true), NetifTransition::Ipv6Up);
        assert!(mon.was_up(IpFamily::V6));
        assert!(!mon.was_up(IpFamily::V4));
        assert_eq!(mon.check_transition(Some(H6), |_| false), NetifTransition::Ipv6Down);
    }

    #[test]
    fn test_shared_handle_reports_both_families() {
        let shared = NetifHandle(7);
        let mon = InterfaceStateMonitor::new();
        mon.bind(IpFamily::V4, shared);
        mon.bind(IpFamily::V6, shared);

        let mut queries = 0;
        let mut poll = |live: bool| {
            mon.check_transition(Some(shared), |_| {
                queries += 1;
                live
            })
        };

        assert_eq!(poll(true), NetifTransition::Ipv4Up);
        assert_eq!(poll(true), NetifTransition::Ipv6Up);
        assert_eq!(poll(true), NetifTransition::None);
        assert_eq!(poll(false), NetifTransition::Ipv4Down);
        assert_eq!(poll(false), NetifTransition::Ipv6Down);
        assert_eq!(poll(false), NetifTransition::None);
        assert_eq!(queries, 6);
        assert!(!mon.was_up(IpFamily::V4));
        assert!(!mon.was_up(IpFamily::V6));
    }

    #[test]
    fn test_unbind_forgets_handle() {
        let mon = InterfaceStateMonitor::new();
        mon.bind(IpFamily::V6, H6);
        assert_eq!(mon.handle(IpFamily::V6), Some(H6));
        mon.unbind(IpFamily::V6);
        assert_eq!(mon.handle(IpFamily::V6), None);
        assert_eq!(mon.check_transition(Some(H6), |_| true), NetifTransition::None);
    }

    #[test]
    fn test_transition_events() {
        assert_eq!(NetifTransition::None.event(), EventCode::None);
        assert_eq!(NetifTransition::Ipv4Up.event(), EventCode::NetifUpIp4);
        assert_eq!(NetifTransition::Ipv4Down.event(), EventCode::NetifDownIp4);
        assert_eq!(NetifTransition::Ipv6Up.event(), EventCode::NetifUpIp6);
        assert_eq!(NetifTransition::Ipv6Down.event(), EventCode::NetifDownIp6);
    }
}
