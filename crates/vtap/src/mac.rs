// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! 48-bit Ethernet hardware address.

use crate::error::TapError;
use std::fmt;
use std::str::FromStr;

/// Ethernet MAC address, stored in the low 48 bits of a `u64`.
///
/// Ordering follows the numeric value, which matches the byte-wise order of
/// the address as transmitted on the wire.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Mac(u64);

impl Mac {
    /// `ff:ff:ff:ff:ff:ff`
    pub const BROADCAST: Mac = Mac(0xffff_ffff_ffff);

    /// Build from the low 48 bits of `value` (upper bits are discarded).
    pub const fn from_u64(value: u64) -> Self {
        Mac(value & 0xffff_ffff_ffff)
    }

    /// Build from six bytes in network order.
    pub const fn from_bytes(b: [u8; 6]) -> Self {
        Mac(((b[0] as u64) << 40)
            | ((b[1] as u64) << 32)
            | ((b[2] as u64) << 24)
            | ((b[3] as u64) << 16)
            | ((b[4] as u64) << 8)
            | (b[5] as u64))
    }

    /// Numeric value.
    pub const fn to_u64(self) -> u64 {
        self.0
    }

    /// Six bytes in network order.
    pub fn octets(self) -> [u8; 6] {
        let b = self.0.to_be_bytes();
        [b[2], b[3], b[4], b[5], b[6], b[7]]
    }

    /// Group bit set (multicast or broadcast).
    pub fn is_multicast(self) -> bool {
        self.octets()[0] & 0x01 != 0
    }

    pub fn is_broadcast(self) -> bool {
        self == Self::BROADCAST
    }
}

impl From<[u8; 6]> for Mac {
    fn from(b: [u8; 6]) -> Self {
        Mac::from_bytes(b)
    }
}

impl fmt::Display for Mac {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let o = self.octets();
        write!(
            f,
            "{:02x}:{:02x}:{:02x}:{:02x}:{:02x}:{:02x}",
            o[0], o[1], o[2], o[3], o[4], o[5]
        )
    }
}

impl FromStr for Mac {
    type Err = TapError;

    /// Accepts `aa:bb:cc:dd:ee:ff` or `aa-bb-cc-dd-ee-ff`, one separator
    /// throughout.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let sep = if s.contains('-') { '-' } else { ':' };
        let mut bytes = [0u8; 6];
        let mut count = 0;
        for part in s.split(sep) {
            if count == 6 || part.len() != 2 {
                return Err(TapError::InvalidMac(s.to_string()));
            }
            bytes[count] =
                u8::from_str_radix(part, 16).map_err(|_| TapError::InvalidMac(s.to_string()))?;
            count += 1;
        }
        if count != 6 {
            return Err(TapError::InvalidMac(s.to_string()));
        }
        Ok(Mac::from_bytes(bytes))
    }
}
