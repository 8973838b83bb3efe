//! Synchronous resource lifecycles.
//!
//! The emulator never provisions anything in the background: a resource
//! settles into its ready state within the Create call that made it. The
//! Create response still reports the initial state, like the real API does.
//! Keeping the transition behind this helper means an async model could be
//! substituted without touching handler logic.

#[derive(Debug, Clone, Copy)]
pub struct Lifecycle {
    initial: &'static str,
    ready: &'static str,
}

impl Lifecycle {
    pub const fn new(initial: &'static str, ready: &'static str) -> Self {
        Self { initial, ready }
    }

    /// State reported in the Create response.
    pub fn reported(&self) -> &'static str {
        self.initial
    }

    /// State the stored record settles into, within the same call.
    pub fn settled(&self) -> &'static str {
        self.ready
    }
}

pub const VPC: Lifecycle = Lifecycle::new("pending", "available");
pub const SUBNET: Lifecycle = Lifecycle::new("pending", "available");
pub const VOLUME: Lifecycle = Lifecycle::new("creating", "available");
pub const NAT_GATEWAY: Lifecycle = Lifecycle::new("pending", "available");
pub const VPC_ENDPOINT: Lifecycle = Lifecycle::new("pending", "available");
pub const NETWORK_INTERFACE: Lifecycle = Lifecycle::new("pending", "available");
pub const ROUTE_SERVER: Lifecycle = Lifecycle::new("pending", "available");
