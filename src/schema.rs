//! Network state data model and validation logic.
//!
//! Contains the data structures making up the `NetworkState` aggregate
//! (access point settings, client devices, simulation controls) and the
//! structural validation applied to any externally supplied state before
//! it is accepted into the store.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Maximum SSID length in characters (802.11 limit, also the UI limit).
pub const MAX_SSID_LENGTH: usize = 32;
/// Highest legal channel number. Any channel 1-13 is accepted on either
/// band; the model intentionally has no band/channel coupling.
pub const MAX_CHANNEL: u8 = 13;
/// Simulation speed multiplier range.
pub const MAX_SIMULATION_SPEED: u8 = 4;

/// Frequency band of the simulated access point.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Frequency {
    #[serde(rename = "2.4GHz")]
    Band2_4GHz,
    #[serde(rename = "5GHz")]
    Band5GHz,
}

/// Security mode of the simulated access point.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SecurityType {
    Open,
    WEP,
    WPA,
    WPA2,
    WPA3,
}

/// Category of a simulated client device. Determines the name pool used
/// at creation time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DeviceType {
    Laptop,
    Phone,
    Tablet,
    Iot,
}

/// Configuration of the simulated access point.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NetworkSettings {
    pub ssid: String,
    pub frequency: Frequency,
    pub channel: u8,
    pub security_type: SecurityType,
    pub broadcast_enabled: bool,
}

/// A simulated client device placed on the visualization canvas.
///
/// `x` and `y` are percentage offsets in a normalized 0-100 coordinate
/// space. They are not range-checked by validation; all producers clamp
/// to [0, 100] before writing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Device {
    /// Unique within the device set, assigned at creation, never reused.
    pub id: String,
    /// Assigned from a type-specific name pool at creation.
    pub name: String,
    #[serde(rename = "type")]
    pub device_type: DeviceType,
    pub x: f64,
    pub y: f64,
    /// 0-100 synthetic metric derived from distance to the router.
    pub signal_strength: u8,
    pub connected: bool,
}

/// Playback and display configuration for the visualization.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SimulationState {
    pub playing: bool,
    pub speed: u8,
    pub show_signal_strength: bool,
    pub show_channels: bool,
}

/// The aggregate root: the unit of storage and transport. Every mutation
/// submits the entire aggregate; there is no partial-update protocol.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NetworkState {
    pub settings: NetworkSettings,
    pub devices: Vec<Device>,
    pub simulation: SimulationState,
}

/// A single violated constraint, identified by the wire-format field path
/// (e.g. `settings.ssid`, `devices[2].signalStrength`).
#[derive(Debug, Clone, Serialize)]
pub struct FieldError {
    pub field: String,
    pub constraint: String,
    pub value: serde_json::Value,
}

impl std::fmt::Display for FieldError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {} (got {})", self.field, self.constraint, self.value)
    }
}

/// Validation failure carrying every violated field, not just the first.
#[derive(Debug, Clone, Error)]
#[error("invalid network state: {}", format_field_errors(.errors))]
pub struct ValidationError {
    pub errors: Vec<FieldError>,
}

fn format_field_errors(errors: &[FieldError]) -> String {
    errors.iter().map(|e| e.to_string()).collect::<Vec<_>>().join("; ")
}

impl Default for NetworkSettings {
    fn default() -> Self {
        NetworkSettings {
            ssid: "MyWiFiNetwork".to_string(),
            frequency: Frequency::Band5GHz,
            channel: 6,
            security_type: SecurityType::WPA3,
            broadcast_enabled: true,
        }
    }
}

impl Default for SimulationState {
    fn default() -> Self {
        SimulationState {
            playing: true,
            speed: 1,
            show_signal_strength: true,
            show_channels: false,
        }
    }
}

impl NetworkState {
    /// The state the UI's reset action submits: default settings and
    /// simulation controls, no devices.
    pub fn reset() -> Self {
        NetworkState {
            settings: NetworkSettings::default(),
            devices: Vec::new(),
            simulation: SimulationState::default(),
        }
    }

    /// Validate the aggregate against the documented ranges.
    ///
    /// Checks are structural and per-field only; there are no cross-field
    /// rules (in particular no frequency/channel coupling). Enum membership
    /// is already enforced by deserialization.
    ///
    /// # Returns
    ///
    /// `Ok(())` if every field is in range, otherwise a `ValidationError`
    /// listing all violations.
    pub fn validate(&self) -> Result<(), ValidationError> {
        let mut errors = Vec::new();

        let ssid_len = self.settings.ssid.chars().count();
        if ssid_len < 1 || ssid_len > MAX_SSID_LENGTH {
            errors.push(FieldError {
                field: "settings.ssid".to_string(),
                constraint: format!("length must be 1-{} characters", MAX_SSID_LENGTH),
                value: serde_json::Value::String(self.settings.ssid.clone()),
            });
        }
        if self.settings.channel < 1 || self.settings.channel > MAX_CHANNEL {
            errors.push(FieldError {
                field: "settings.channel".to_string(),
                constraint: format!("must be 1-{}", MAX_CHANNEL),
                value: serde_json::json!(self.settings.channel),
            });
        }

        for (idx, device) in self.devices.iter().enumerate() {
            if device.signal_strength > 100 {
                errors.push(FieldError {
                    field: format!("devices[{}].signalStrength", idx),
                    constraint: "must be 0-100".to_string(),
                    value: serde_json::json!(device.signal_strength),
                });
            }
        }

        if self.simulation.speed < 1 || self.simulation.speed > MAX_SIMULATION_SPEED {
            errors.push(FieldError {
                field: "simulation.speed".to_string(),
                constraint: format!("must be 1-{}", MAX_SIMULATION_SPEED),
                value: serde_json::json!(self.simulation.speed),
            });
        }

        if errors.is_empty() { Ok(()) } else { Err(ValidationError { errors }) }
    }
}
