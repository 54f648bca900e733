// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Socket event hooks.
//!
//! Userspace socket support will route readiness events from the socket
//! poller through these hooks. Every method has an empty default, so an
//! implementor only overrides what it handles.

use std::net::SocketAddr;

/// Identifier of a socket owned by the socket poller.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct SocketId(pub u64);

pub trait SocketEvents {
    fn on_datagram(&self, _sock: SocketId, _local: SocketAddr, _from: SocketAddr, _data: &[u8]) {}

    fn on_tcp_connect(&self, _sock: SocketId, _success: bool) {}

    fn on_tcp_accept(&self, _listener: SocketId, _sock: SocketId, _from: SocketAddr) {}

    fn on_tcp_close(&self, _sock: SocketId) {}

    fn on_tcp_data(&self, _sock: SocketId, _data: &[u8]) {}

    fn on_tcp_writable(&self, _sock: SocketId) {}
}
