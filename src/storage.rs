//! In-memory store for the single network state record.

use crate::schema::{Device, DeviceType, NetworkSettings, NetworkState, SimulationState};

/// Holds the one current `NetworkState`. Reads return a snapshot; writes
/// replace the record unconditionally (no merge, no versioning, no
/// history). The store is owned by the single-threaded server loop, so
/// there is no locking.
pub struct MemStorage {
    state: NetworkState,
}

impl MemStorage {
    /// Create a store seeded with the default network: a named WPA3 access
    /// point and two pre-placed devices, simulation running.
    pub fn new() -> Self {
        MemStorage { state: default_state() }
    }

    /// Snapshot of the current state.
    pub fn get(&self) -> NetworkState {
        self.state.clone()
    }

    /// Replace the held state and return the stored value. Last write wins.
    pub fn set(&mut self, state: NetworkState) -> NetworkState {
        self.state = state;
        self.state.clone()
    }
}

impl Default for MemStorage {
    fn default() -> Self {
        Self::new()
    }
}

/// The documented initial state served before any edit.
fn default_state() -> NetworkState {
    NetworkState {
        settings: NetworkSettings::default(),
        devices: vec![
            Device {
                id: "device-initial-1".to_string(),
                name: "MacBook Pro 1".to_string(),
                device_type: DeviceType::Laptop,
                x: 35.0,
                y: 35.0,
                signal_strength: 85,
                connected: true,
            },
            Device {
                id: "device-initial-2".to_string(),
                name: "iPhone 1".to_string(),
                device_type: DeviceType::Phone,
                x: 65.0,
                y: 45.0,
                signal_strength: 75,
                connected: true,
            },
        ],
        simulation: SimulationState::default(),
    }
}
