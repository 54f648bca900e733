// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! One-shot shutdown signal between a tap and its monitor thread.
//!
//! The channel holds at most one pending token. Signalling never blocks:
//! a second signal, or one sent after the listener has exited, is dropped.
//! Dropping the trigger also wakes the listener, so a trigger that goes
//! away without signalling cannot strand the thread.

use std::time::Duration;

use crossbeam::channel::{self, Receiver, RecvTimeoutError, Sender, TrySendError};

/// Create a connected trigger/listener pair.
pub fn shutdown_channel() -> (ShutdownTrigger, ShutdownListener) {
    let (tx, rx) = channel::bounded(1);
    (ShutdownTrigger { tx }, ShutdownListener { rx })
}

/// Sending half, owned by the tap.
#[derive(Debug)]
pub struct ShutdownTrigger {
    tx: Sender<()>,
}

impl ShutdownTrigger {
    /// Request shutdown.
    ///
    /// Returns `true` if this call queued the token, `false` if a token was
    /// already pending or the listener is gone. Neither case is an error.
    pub fn signal(&self) -> bool {
        match self.tx.try_send(()) {
            Ok(()) => true,
            Err(TrySendError::Full(())) | Err(TrySendError::Disconnected(())) => false,
        }
    }
}

/// Receiving half, moved into the monitor thread.
#[derive(Debug)]
pub struct ShutdownListener {
    rx: Receiver<()>,
}

impl ShutdownListener {
    /// Wait up to `timeout` for shutdown. `true` means stop.
    pub fn wait(&self, timeout: Duration) -> bool {
        match self.rx.recv_timeout(timeout) {
            Ok(()) | Err(RecvTimeoutError::Disconnected) => true,
            Err(RecvTimeoutError::Timeout) => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::thread;
    use std::time::Instant;

    #[test]
    fn test_wait_times_out_without_signal() {
        let (_trigger, listener) = shutdown_channel();
        let start = Instant::now();
        assert!(!listener.wait(Duration::from_millis(20)));
        assert!(start.elapsed() >= Duration::from_millis(20));
    }

    #[test]
    fn test_signal_wakes_listener() {
        let (trigger, listener) = shutdown_channel();
        assert!(trigger.signal());
        assert!(listener.wait(Duration::from_secs(5)));
    }

    #[test]
    fn test_repeat_signal_is_benign() {
        let (trigger, _listener) = shutdown_channel();
        assert!(trigger.signal());
        assert!(!trigger.signal());
    }

    #[test]
    fn test_signal_after_listener_exit_is_benign() {
        let (trigger, listener) = shutdown_channel();
        drop(listener);
        assert!(!trigger.signal());
    }

    #[test]
    fn test_dropped_trigger_wakes_listener() {
        let (trigger, listener) = shutdown_channel();
        drop(trigger);
        assert!(listener.wait(Duration::from_secs(5)));
    }

    #[test]
    fn test_signal_from_other_thread() {
        let (trigger, listener) = shutdown_channel();
        let waiter = thread::spawn(move || {
            let start = Instant::now();
            while !listener.wait(Duration::from_millis(10)) {
                assert!(start.elapsed() < Duration::from_secs(5), "never woke");
            }
        });
        thread::sleep(Duration::from_millis(30));
        trigger.signal();
        waiter.join().expect("waiter thread");
    }
}
