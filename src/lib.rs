// ============================================================================
// ec2emu Library
// ============================================================================

pub mod api;
pub mod config;
pub mod core;
pub mod filter;
pub mod ident;
pub mod page;
pub mod server;
pub mod store;
pub mod tags;
pub mod web;

// Re-export main types for convenience
pub use api::EmulatorState;
pub use config::EmulatorConfig;
pub use core::{ApiError, ParamMap, Resource, Result, Tag};
pub use filter::{Filter, UnknownFilter};
pub use store::FamilyTable;

use std::sync::RwLock;

use serde_json::{Value, json};

/// One emulator instance: the process-lifetime resource store plus the
/// identity stamped onto created resources.
///
/// All mutations are serialized through a single lock; Describe actions
/// share a read lock. State lives for exactly as long as this value.
///
/// # Examples
///
/// ```
/// use ec2emu::{Emulator, ParamMap};
///
/// let emulator = Emulator::new();
///
/// let mut params = ParamMap::new();
/// params.insert("AvailabilityZone", "us-east-1a");
/// params.insert("Size", "8");
/// let volume = emulator.dispatch("CreateVolume", &params).unwrap();
/// assert!(volume["volumeId"].as_str().unwrap().starts_with("vol-"));
/// assert_eq!(volume["status"], "creating");
/// ```
pub struct Emulator {
    config: EmulatorConfig,
    state: RwLock<EmulatorState>,
}

impl Emulator {
    pub fn new() -> Self {
        Self::with_config(EmulatorConfig::default())
    }

    pub fn with_config(config: EmulatorConfig) -> Self {
        Self {
            config,
            state: RwLock::new(EmulatorState::new()),
        }
    }

    pub fn config(&self) -> &EmulatorConfig {
        &self.config
    }

    /// Route one AWS action to its handler and stamp the response with a
    /// fresh `requestId`. Unknown actions fail with `InvalidAction`.
    pub fn dispatch(&self, action: &str, params: &ParamMap) -> Result<Value> {
        tracing::debug!(action, "dispatching");
        let mut doc = if api::is_describe(action) {
            let state = self.state.read()?;
            api::dispatch_describe(&state, action, params)?
        } else {
            let mut state = self.state.write()?;
            api::dispatch_mutate(&mut state, &self.config, action, params)?
        };
        doc["requestId"] = json!(ident::request_id());
        Ok(doc)
    }
}

impl Default for Emulator {
    fn default() -> Self {
        Self::new()
    }
}
