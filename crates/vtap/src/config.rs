// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Construction parameters for a virtual tap.

use std::path::PathBuf;
use std::time::Duration;

use crate::mac::Mac;

/// Default MTU of a virtual network.
pub const DEFAULT_MTU: u32 = 2800;

/// Default routing metric.
pub const DEFAULT_METRIC: u32 = 0;

/// Bounded wait of the monitor thread on its shutdown signal.
pub const TAP_POLL_INTERVAL: Duration = Duration::from_millis(50);

/// Sleep between monitor checks.
pub const TAP_POLL_SLEEP: Duration = Duration::from_millis(25);

/// Prefix of generated device names.
pub const DEVICE_NAME_PREFIX: &str = "libzt";

/// Virtual tap configuration.
#[derive(Clone, Debug)]
pub struct TapConfig {
    /// Home directory of the owning node. Passed through, never read.
    pub home_path: PathBuf,

    /// Hardware address of the tap.
    pub mac: Mac,

    /// Initial MTU.
    pub mtu: u32,

    /// Routing metric.
    pub metric: u32,

    /// Network id this tap is joined to.
    pub network_id: u64,

    /// Human-readable network name.
    pub friendly_name: String,

    /// Address of the owning node, if it has an identity yet.
    pub node_address: Option<u64>,

    /// Bounded wait on the shutdown signal per monitor iteration.
    pub poll_interval: Duration,

    /// Sleep after each monitor iteration that saw no shutdown.
    pub poll_sleep: Duration,
}

impl Default for TapConfig {
    fn default() -> Self {
        Self {
            home_path: PathBuf::new(),
            mac: Mac::default(),
            mtu: DEFAULT_MTU,
            metric: DEFAULT_METRIC,
            network_id: 0,
            friendly_name: String::new(),
            node_address: None,
            poll_interval: TAP_POLL_INTERVAL,
            poll_sleep: TAP_POLL_SLEEP,
        }
    }
}

impl TapConfig {
    /// Config for a tap on `network_id` with hardware address `mac`.
    pub fn new(network_id: u64, mac: Mac) -> Self {
        Self {
            network_id,
            mac,
            ..Default::default()
        }
    }

    pub fn with_home_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.home_path = path.into();
        self
    }

    pub fn with_mtu(mut self, mtu: u32) -> Self {
        self.mtu = mtu;
        self
    }

    pub fn with_metric(mut self, metric: u32) -> Self {
        self.metric = metric;
        self
    }

    pub fn with_friendly_name(mut self, name: impl Into<String>) -> Self {
        self.friendly_name = name.into();
        self
    }

    pub fn with_node_address(mut self, address: u64) -> Self {
        self.node_address = Some(address);
        self
    }

    /// Set monitor timing. Shutdown latency is bounded by `interval + sleep`.
    pub fn with_poll_timing(mut self, interval: Duration, sleep: Duration) -> Self {
        self.poll_interval = interval;
        self.poll_sleep = sleep;
        self
    }

    /// Device name derived from the network id.
    pub fn device_name(&self) -> String {
        device_name(self.network_id)
    }
}

/// `libzt` followed by the network id in lowercase hex, unpadded.
pub fn device_name(network_id: u64) -> String {
    format!("{}{:x}", DEVICE_NAME_PREFIX, network_id)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_default() {
        let cfg = TapConfig::default();
        assert_eq!(cfg.mtu, DEFAULT_MTU);
        assert_eq!(cfg.metric, DEFAULT_METRIC);
        assert!(cfg.node_address.is_none());
        assert_eq!(cfg.poll_interval, TAP_POLL_INTERVAL);
    }

    #[test]
    fn test_config_builder() {
        let cfg = TapConfig::new(0x8056c2e21c000001, Mac::from_u64(0x329e1a0455f0))
            .with_home_path("/var/lib/zt")
            .with_mtu(1400)
            .with_metric(5)
            .with_friendly_name("lab")
            .with_node_address(0xefcc1b0947)
            .with_poll_timing(Duration::from_millis(5), Duration::from_millis(1));

        assert_eq!(cfg.home_path, PathBuf::from("/var/lib/zt"));
        assert_eq!(cfg.mtu, 1400);
        assert_eq!(cfg.metric, 5);
        assert_eq!(cfg.friendly_name, "lab");
        assert_eq!(cfg.node_address, Some(0xefcc1b0947));
        assert_eq!(cfg.poll_sleep, Duration::from_millis(1));
    }

    #[test]
    fn test_device_name() {
        assert_eq!(device_name(0x8056c2e21c000001), "libzt8056c2e21c000001");
        assert_eq!(device_name(0xff), "libztff");
        assert_eq!(TapConfig::new(0, Mac::default()).device_name(), "libzt0");
    }
}
