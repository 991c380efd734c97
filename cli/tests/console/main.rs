//! Console driver tests against a simulated `rhui-manager`.
//!
//! Each test starts the fake console on an in-memory duplex stream and
//! drives it through the real session, navigator and screen services.

#![allow(clippy::expect_used, clippy::unwrap_used)]

mod entitlements;
mod fake;
