// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Lifecycle events posted by virtual taps.
//!
//! Taps never surface lifecycle changes as errors. They post
//! `(network id, event)` pairs to an [`EventSink`] handed to them at
//! construction, and the owning service decides what to do with them.

use crossbeam::channel::{self, Receiver, Sender, TrySendError};

/// Event codes a tap can post.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum EventCode {
    /// No event.
    None,
    /// Tap constructed and its monitor thread running.
    NetworkUp,
    /// Tap is being torn down.
    NetworkDown,
    /// Stack-side IPv4 interface came up.
    NetifUpIp4,
    /// Stack-side IPv4 interface went down.
    NetifDownIp4,
    /// Stack-side IPv6 interface came up.
    NetifUpIp6,
    /// Stack-side IPv6 interface went down.
    NetifDownIp6,
}

impl EventCode {
    /// Stable integer value for foreign callers.
    pub fn code(self) -> i32 {
        match self {
            Self::None => 0,
            Self::NetworkUp => 1,
            Self::NetworkDown => 2,
            Self::NetifUpIp4 => 10,
            Self::NetifDownIp4 => 11,
            Self::NetifUpIp6 => 12,
            Self::NetifDownIp6 => 13,
        }
    }

    pub fn from_code(code: i32) -> Option<Self> {
        match code {
            0 => Some(Self::None),
            1 => Some(Self::NetworkUp),
            2 => Some(Self::NetworkDown),
            10 => Some(Self::NetifUpIp4),
            11 => Some(Self::NetifDownIp4),
            12 => Some(Self::NetifUpIp6),
            13 => Some(Self::NetifDownIp6),
            _ => None,
        }
    }
}

/// Destination for tap lifecycle events.
///
/// Posting is fire-and-forget: implementations must not block the tap.
pub trait EventSink: Send + Sync {
    fn post(&self, network_id: u64, event: EventCode);
}

/// Sink that discards every event.
pub struct NoopEventSink;

impl EventSink for NoopEventSink {
    fn post(&self, _network_id: u64, _event: EventCode) {}
}

/// Event capacity of a [`ChannelEventSink`] queue.
pub const EVENT_QUEUE_CAPACITY: usize = 256;

/// Sink backed by a bounded queue the application drains.
///
/// A full or disconnected queue drops the event with a warning rather than
/// stalling the posting thread.
pub struct ChannelEventSink {
    sender: Sender<(u64, EventCode)>,
}

impl ChannelEventSink {
    /// Create a sink and the receiver the application polls.
    pub fn new() -> (Self, Receiver<(u64, EventCode)>) {
        Self::with_capacity(EVENT_QUEUE_CAPACITY)
    }

    pub fn with_capacity(capacity: usize) -> (Self, Receiver<(u64, EventCode)>) {
        let (sender, receiver) = channel::bounded(capacity);
        (Self { sender }, receiver)
    }
}

impl EventSink for ChannelEventSink {
    fn post(&self, network_id: u64, event: EventCode) {
        match self.sender.try_send((network_id, event)) {
            Ok(()) => {}
            Err(TrySendError::Full(_)) => {
                log::warn!(
                    "[vtap] event queue full, dropping {:?} for network {:x}",
                    event,
                    network_id
                );
            }
            Err(TrySendError::Disconnected(_)) => {
                log::debug!(
                    "[vtap] event queue closed, dropping {:?} for network {:x}",
                    event,
                    network_id
                );
            }
        }
    }
}
