// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Ethernet multicast groups and address-resolution derivation.

use crate::address::InterfaceAddress;
use crate::mac::Mac;
use std::fmt;
use std::net::IpAddr;

/// An Ethernet multicast group: a group MAC plus a 32-bit additional
/// distinguishing information (ADI) field.
///
/// The ADI lets several logical groups share one MAC. IPv4 ARP uses it to
/// scope broadcast to a single address; everything else leaves it zero.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct MulticastGroup {
    mac: Mac,
    adi: u32,
}

impl MulticastGroup {
    pub const fn new(mac: Mac, adi: u32) -> Self {
        Self { mac, adi }
    }

    pub fn mac(&self) -> Mac {
        self.mac
    }

    pub fn adi(&self) -> u32 {
        self.adi
    }

    /// Group a host must listen on to answer address resolution for `addr`.
    ///
    /// - IPv4: broadcast MAC, ADI = the IPv4 address in host order (ARP).
    /// - IPv6: `33:33:ff` + low 24 bits of the address, ADI = 0
    ///   (solicited-node multicast for NDP).
    pub fn for_address_resolution(addr: &InterfaceAddress) -> Self {
        match addr.ip() {
            IpAddr::V4(v4) => Self::new(Mac::BROADCAST, u32::from(v4)),
            IpAddr::V6(v6) => {
                let o = v6.octets();
                Self::new(Mac::from_bytes([0x33, 0x33, 0xff, o[13], o[14], o[15]]), 0)
            }
        }
    }
}

impl fmt::Display for MulticastGroup {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{:08x}", self.mac, self.adi)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::net::{Ipv4Addr, Ipv6Addr};

    #[test]
    fn test_v4_resolution_group() {
        let addr = InterfaceAddress::new(IpAddr::V4(Ipv4Addr::new(10, 147, 17, 3)), 16);
        let g = MulticastGroup::for_address_resolution(&addr);
        assert_eq!(g.mac(), Mac::BROADCAST);
        assert_eq!(g.adi(), 0x0a93_1103);
    }

    #[test]
    fn test_v4_prefix_does_not_change_group() {
        let ip = IpAddr::V4(Ipv4Addr::new(10, 147, 17, 3));
        assert_eq!(
            MulticastGroup::for_address_resolution(&InterfaceAddress::new(ip, 16)),
            MulticastGroup::for_address_resolution(&InterfaceAddress::new(ip, 24)),
        );
    }

    #[test]
    fn test_v6_solicited_node_group() {
        let ip = Ipv6Addr::new(0xfd80, 0x56c2, 0xe21c, 0, 0x0099, 0x9300, 0x00ab, 0xcdef);
        let g = MulticastGroup::for_address_resolution(&InterfaceAddress::new(IpAddr::V6(ip), 88));
        assert_eq!(g.mac(), Mac::from_bytes([0x33, 0x33, 0xff, 0xab, 0xcd, 0xef]));
        assert_eq!(g.adi(), 0);
    }

    #[test]
    fn test_v6_addresses_sharing_low_bits_collide() {
        let a = InterfaceAddress::new("fd00::1:abcd:ef".parse().expect("valid ipv6"), 64);
        let b = InterfaceAddress::new("fd11::abcd:ef".parse().expect("valid ipv6"), 64);
        assert_eq!(
            MulticastGroup::for_address_resolution(&a),
            MulticastGroup::for_address_resolution(&b)
        );
    }

    #[test]
    fn test_display() {
        let g = MulticastGroup::new(Mac::BROADCAST, 0x0a000001);
        assert_eq!(g.to_string(), "ff:ff:ff:ff:ff:ff/0a000001");
    }
}
