// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Addresses assigned to a virtual tap.

use std::fmt;
use std::net::IpAddr;

/// Address family of an assigned address or interface slot.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum IpFamily {
    V4,
    V6,
}

/// An IP address plus the prefix length the network assigned with it.
///
/// The derived order is the canonical order of an [`AddressSet`]: every IPv4
/// address sorts before every IPv6 address, then by octets, then by prefix
/// length.
///
/// [`AddressSet`]: crate::device::AddressSet
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct InterfaceAddress {
    ip: IpAddr,
    prefix_len: u8,
}

impl InterfaceAddress {
    /// Create an address. `prefix_len` is clamped to the family's width.
    pub fn new(ip: IpAddr, prefix_len: u8) -> Self {
        let max = match ip {
            IpAddr::V4(_) => 32,
            IpAddr::V6(_) => 128,
        };
        Self {
            ip,
            prefix_len: prefix_len.min(max),
        }
    }

    pub fn ip(&self) -> IpAddr {
        self.ip
    }

    pub fn prefix_len(&self) -> u8 {
        self.prefix_len
    }

    pub fn family(&self) -> IpFamily {
        match self.ip {
            IpAddr::V4(_) => IpFamily::V4,
            IpAddr::V6(_) => IpFamily::V6,
        }
    }

    pub fn is_v4(&self) -> bool {
        self.family() == IpFamily::V4
    }

    pub fn is_v6(&self) -> bool {
        self.family() == IpFamily::V6
    }
}

/// Host address (full-length prefix).
impl From<IpAddr> for InterfaceAddress {
    fn from(ip: IpAddr) -> Self {
        Self::new(ip, u8::MAX)
    }
}

impl fmt::Display for InterfaceAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.ip, self.prefix_len)
    }
}
