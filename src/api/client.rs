//! HTTP client and synchronization session for the network state API.
//!
//! `NetworkClient` wraps the two API calls; `SyncSession` implements the
//! consumer contract: fetch the aggregate once on load, then push the
//! entire aggregate after every mutation and adopt the server's echo as
//! the new source of truth. Device drags are the one exception: moves are
//! applied locally and never pushed.

use reqwest::blocking::Client;
use std::time::Duration;

use crate::schema::{Device, DeviceType, NetworkSettings, NetworkState, SimulationState};

/// Client for the `GET`/`PUT /api/network` endpoints.
pub struct NetworkClient {
    client: Client,
    base_url: String,
}

impl NetworkClient {
    /// Create a client for a server at `base_url` (without the `/api`
    /// suffix, e.g. `http://127.0.0.1:8080`).
    pub fn new(base_url: &str) -> Result<Self, String> {
        let client = Client::builder()
            .timeout(Duration::from_secs(30))
            .build()
            .map_err(|e| format!("Failed to create HTTP client: {}", e))?;

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    fn url(&self) -> String {
        format!("{}/api/network", self.base_url)
    }

    /// Fetch the current network state.
    pub fn fetch(&self) -> Result<NetworkState, String> {
        let response = self
            .client
            .get(self.url())
            .send()
            .map_err(|e| format!("Network error: {}", e))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().unwrap_or_default();
            return Err(format!("Failed to fetch network state ({}): {}", status.as_u16(), body));
        }

        response.json().map_err(|e| format!("Invalid response body: {}", e))
    }

    /// Submit the entire aggregate for validation and storage.
    ///
    /// # Returns
    ///
    /// The stored (echoed) state on success; on HTTP 400 the error string
    /// carries the server's validation details.
    pub fn push(&self, state: &NetworkState) -> Result<NetworkState, String> {
        log::debug!("Pushing network state to {}", self.url());

        let response = self
            .client
            .put(self.url())
            .json(state)
            .send()
            .map_err(|e| format!("Network error: {}", e))?;

        let status = response.status();
        if status.is_success() {
            response.json().map_err(|e| format!("Invalid response body: {}", e))
        } else if status.is_client_error() {
            let body = response.text().unwrap_or_default();
            Err(format!("Server rejected network state ({}): {}", status.as_u16(), body))
        } else {
            let body = response.text().unwrap_or_default();
            Err(format!("Server error ({}): {}", status.as_u16(), body))
        }
    }
}

/// A local copy of the aggregate kept consistent with the store.
///
/// Every mutating operation pushes the whole aggregate and replaces the
/// local copy with the echo. Concurrent editors can silently overwrite
/// each other; the store keeps no versions. That is the documented
/// single-user contract, not a defect.
pub struct SyncSession {
    client: NetworkClient,
    state: NetworkState,
}

impl SyncSession {
    /// Fetch-on-load: retrieve the current aggregate and adopt it wholesale.
    pub fn connect(client: NetworkClient) -> Result<Self, String> {
        let state = client.fetch()?;
        log::info!("Synchronized initial state: {} device(s)", state.devices.len());
        Ok(SyncSession { client, state })
    }

    /// The session's current view of the aggregate.
    pub fn state(&self) -> &NetworkState {
        &self.state
    }

    /// Replace the access point settings and push.
    pub fn update_settings(&mut self, settings: NetworkSettings) -> Result<(), String> {
        self.state.settings = settings;
        self.push()
    }

    /// Create a device and push.
    ///
    /// # Returns
    ///
    /// The created device (as echoed back by the store).
    pub fn add_device(&mut self, device_type: DeviceType) -> Result<Device, String> {
        let created = self.state.add_device(device_type);
        self.push()?;
        Ok(created)
    }

    /// Remove a device and push.
    pub fn remove_device(&mut self, id: &str) -> Result<(), String> {
        self.state.remove_device(id);
        self.push()
    }

    /// Toggle a device's connection flag and push.
    pub fn toggle_connection(&mut self, id: &str) -> Result<(), String> {
        self.state.toggle_connection(id);
        self.push()
    }

    /// Move a device locally. Drag moves are not pushed upstream; the next
    /// pushed mutation carries the new position along with the rest of the
    /// aggregate.
    pub fn move_device(&mut self, id: &str, x: f64, y: f64) {
        self.state.move_device(id, x, y);
    }

    /// Replace the simulation controls and push.
    pub fn update_simulation(&mut self, simulation: SimulationState) -> Result<(), String> {
        self.state.simulation = simulation;
        self.push()
    }

    /// Reset to the default empty network and push.
    pub fn reset(&mut self) -> Result<(), String> {
        self.state = NetworkState::reset();
        self.push()
    }

    fn push(&mut self) -> Result<(), String> {
        self.state = self.client.push(&self.state)?;
        Ok(())
    }
}
