// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Multicast groups a virtual tap must subscribe to.

pub mod group;
pub mod membership;

pub use group::MulticastGroup;
pub use membership::{MembershipDiff, MulticastMembership};
