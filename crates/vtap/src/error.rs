// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Error types for virtual tap operations.

use crate::address::InterfaceAddress;
use std::fmt;
use std::io;

/// Result type for virtual tap operations
pub type Result<T> = std::result::Result<T, TapError>;

/// Errors that can occur while building or driving a virtual tap
#[derive(Debug)]
pub enum TapError {
    /// The monitor thread could not be spawned
    ThreadSpawn(io::Error),

    /// The network stack refused to register the device
    DeviceRegistration(io::Error),

    /// The network stack refused to register an address
    StackRegistration {
        addr: InterfaceAddress,
        source: io::Error,
    },

    /// The network stack failed to release an address
    StackDeregistration {
        addr: InterfaceAddress,
        source: io::Error,
    },

    /// A hardware address string could not be parsed
    InvalidMac(String),
}

impl TapError {
    /// Address the error refers to, if any.
    pub fn address(&self) -> Option<&InterfaceAddress> {
        match self {
            Self::StackRegistration { addr, .. } | Self::StackDeregistration { addr, .. } => {
                Some(addr)
            }
            _ => None,
        }
    }
}

impl fmt::Display for TapError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ThreadSpawn(e) => write!(f, "failed to spawn tap monitor thread: {}", e),
            Self::DeviceRegistration(e) => {
                write!(f, "network stack rejected device registration: {}", e)
            }
            Self::StackRegistration { addr, source } => {
                write!(f, "failed to register {} with network stack: {}", addr, source)
            }
            Self::StackDeregistration { addr, source } => {
                write!(f, "failed to release {} from network stack: {}", addr, source)
            }
            Self::InvalidMac(s) => write!(f, "invalid MAC address: {}", s),
        }
    }
}

impl std::error::Error for TapError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::ThreadSpawn(e) | Self::DeviceRegistration(e) => Some(e),
            Self::StackRegistration { source, .. } | Self::StackDeregistration { source, .. } => {
                Some(source)
            }
            Self::InvalidMac(_) => None,
        }
    }
}

impl From<TapError> for io::Error {
    fn from(e: TapError) -> Self {
        match e {
            TapError::ThreadSpawn(inner) | TapError::DeviceRegistration(inner) => inner,
            other => io::Error::other(other.to_string()),
        }
    }
}
