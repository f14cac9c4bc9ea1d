//! Device lifecycle operations on the network state aggregate.
//!
//! Creation, removal, connection toggling and movement of simulated client
//! devices. Every operation mutates the aggregate in place and is total:
//! operations on absent ids are no-ops, never errors.

use chrono::Utc;
use rand::Rng;

use crate::schema::{Device, DeviceType, NetworkState};
use crate::signal_calculations::{clamp_coordinate, compute_signal_strength};

/// New devices are dropped somewhere in the central sub-rectangle of the
/// canvas, `[SPAWN_MIN, SPAWN_MIN + SPAWN_SPAN)` on both axes.
const SPAWN_MIN: f64 = 30.0;
const SPAWN_SPAN: f64 = 40.0;

/// Initial signal strength range for a freshly created device. Randomized
/// rather than derived from the spawn position; only a later move ties
/// signal to geometry.
const INITIAL_SIGNAL_MIN: u8 = 60;
const INITIAL_SIGNAL_MAX: u8 = 99;

const ID_SUFFIX_LENGTH: usize = 9;
const ID_SUFFIX_CHARSET: &[u8] = b"0123456789abcdefghijklmnopqrstuvwxyz";

/// Base names per device type. The created device gets one of these plus a
/// numeric suffix counting devices of the same type.
fn name_pool(device_type: DeviceType) -> &'static [&'static str] {
    match device_type {
        DeviceType::Laptop => &["MacBook Pro", "Dell XPS", "ThinkPad", "Surface Laptop"],
        DeviceType::Phone => &["iPhone", "Galaxy S24", "Pixel 9", "OnePlus"],
        DeviceType::Tablet => &["iPad Air", "Galaxy Tab", "Surface Pro"],
        DeviceType::Iot => &["Smart TV", "Ring Camera", "Nest Thermostat", "Smart Speaker"],
    }
}

/// Generate a device id from the current time plus a random base36 suffix.
/// Uniqueness is probabilistic; collisions are not detected.
fn generate_device_id() -> String {
    let mut rng = rand::thread_rng();
    let suffix: String = (0..ID_SUFFIX_LENGTH)
        .map(|_| ID_SUFFIX_CHARSET[rng.gen_range(0..ID_SUFFIX_CHARSET.len())] as char)
        .collect();
    format!("device-{}-{}", Utc::now().timestamp_millis(), suffix)
}

impl NetworkState {
    /// Create a new device of the given type and append it to the device set.
    ///
    /// The name is drawn at random from the type's pool and suffixed with the
    /// count of existing devices of that type plus one. Position is random
    /// within the central spawn region and the initial signal strength is
    /// random in [60, 99]. New devices start connected.
    ///
    /// # Returns
    ///
    /// A copy of the created device.
    pub fn add_device(&mut self, device_type: DeviceType) -> Device {
        let mut rng = rand::thread_rng();

        let pool = name_pool(device_type);
        let base_name = pool[rng.gen_range(0..pool.len())];
        let same_type_count = self.devices.iter().filter(|d| d.device_type == device_type).count();

        let device = Device {
            id: generate_device_id(),
            name: format!("{} {}", base_name, same_type_count + 1),
            device_type,
            x: SPAWN_MIN + rng.gen_range(0.0..SPAWN_SPAN),
            y: SPAWN_MIN + rng.gen_range(0.0..SPAWN_SPAN),
            signal_strength: rng.gen_range(INITIAL_SIGNAL_MIN..=INITIAL_SIGNAL_MAX),
            connected: true,
        };

        log::debug!("Added device {} ({})", device.name, device.id);
        self.devices.push(device.clone());
        device
    }

    /// Remove the device with the given id. No-op if the id is absent.
    pub fn remove_device(&mut self, id: &str) {
        self.devices.retain(|d| d.id != id);
    }

    /// Flip the connection flag of the device with the given id. No-op if
    /// the id is absent. Connection state is independent of position and
    /// signal strength.
    pub fn toggle_connection(&mut self, id: &str) {
        if let Some(device) = self.devices.iter_mut().find(|d| d.id == id) {
            device.connected = !device.connected;
        }
    }

    /// Move the device to `(x, y)`, clamped to the canvas, and recompute its
    /// signal strength from the new position. This is the only path that
    /// keeps signal strength consistent with geometry. No-op if the id is
    /// absent.
    pub fn move_device(&mut self, id: &str, x: f64, y: f64) {
        if let Some(device) = self.devices.iter_mut().find(|d| d.id == id) {
            device.x = clamp_coordinate(x);
            device.y = clamp_coordinate(y);
            device.signal_strength = compute_signal_strength(device.x, device.y);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::DeviceType;

    fn empty_state() -> NetworkState {
        NetworkState::reset()
    }

    #[test]
    fn added_devices_get_sequential_suffixes_per_type() {
        let mut state = empty_state();
        let first = state.add_device(DeviceType::Phone).name.clone();
        let second = state.add_device(DeviceType::Phone).name.clone();
        assert!(first.ends_with(" 1"), "unexpected name {}", first);
        assert!(second.ends_with(" 2"), "unexpected name {}", second);

        // A different type starts its own count.
        let tablet = state.add_device(DeviceType::Tablet).name.clone();
        assert!(tablet.ends_with(" 1"), "unexpected name {}", tablet);
    }

    #[test]
    fn new_devices_are_connected_with_signal_in_range() {
        let mut state = empty_state();
        for _ in 0..20 {
            let device = state.add_device(DeviceType::Iot);
            assert!(device.connected);
            assert!((60..=99).contains(&device.signal_strength));
        }
    }

    #[test]
    fn new_devices_spawn_in_central_region() {
        let mut state = empty_state();
        for _ in 0..20 {
            let device = state.add_device(DeviceType::Laptop);
            assert!((30.0..70.0).contains(&device.x));
            assert!((30.0..70.0).contains(&device.y));
        }
    }

    #[test]
    fn generated_ids_are_distinct() {
        let mut state = empty_state();
        let a = state.add_device(DeviceType::Phone).id.clone();
        let b = state.add_device(DeviceType::Phone).id.clone();
        assert!(a.starts_with("device-"));
        assert_ne!(a, b);
    }

    #[test]
    fn remove_deletes_only_the_matching_device() {
        let mut state = empty_state();
        let id = state.add_device(DeviceType::Phone).id.clone();
        state.add_device(DeviceType::Laptop);
        state.remove_device(&id);
        assert_eq!(state.devices.len(), 1);
        assert!(state.devices.iter().all(|d| d.id != id));
    }

    #[test]
    fn remove_of_unknown_id_is_a_noop() {
        let mut state = empty_state();
        state.add_device(DeviceType::Phone);
        let before = state.devices.clone();
        state.remove_device("device-does-not-exist");
        assert_eq!(state.devices, before);
    }

    #[test]
    fn toggle_flips_connection_and_nothing_else() {
        let mut state = empty_state();
        let id = state.add_device(DeviceType::Tablet).id.clone();
        let before = state.devices[0].clone();

        state.toggle_connection(&id);
        let after = &state.devices[0];
        assert!(!after.connected);
        assert_eq!(after.x, before.x);
        assert_eq!(after.signal_strength, before.signal_strength);

        state.toggle_connection(&id);
        assert!(state.devices[0].connected);
    }

    #[test]
    fn toggle_of_unknown_id_is_a_noop() {
        let mut state = empty_state();
        state.add_device(DeviceType::Phone);
        let before = state.devices.clone();
        state.toggle_connection("nope");
        assert_eq!(state.devices, before);
    }

    #[test]
    fn move_to_router_center_gives_full_signal() {
        let mut state = empty_state();
        let id = state.add_device(DeviceType::Phone).id.clone();
        state.move_device(&id, 50.0, 50.0);
        assert_eq!(state.devices[0].signal_strength, 100);
    }

    #[test]
    fn move_to_corner_gives_zero_signal() {
        let mut state = empty_state();
        let id = state.add_device(DeviceType::Phone).id.clone();
        state.move_device(&id, 0.0, 0.0);
        assert_eq!(state.devices[0].signal_strength, 0);
    }

    #[test]
    fn move_clamps_coordinates_to_canvas() {
        let mut state = empty_state();
        let id = state.add_device(DeviceType::Phone).id.clone();
        state.move_device(&id, -20.0, 140.0);
        let device = &state.devices[0];
        assert_eq!(device.x, 0.0);
        assert_eq!(device.y, 100.0);
        // Clamped position (0,100) is at distance ~70.7 -> floor.
        assert_eq!(device.signal_strength, 0);
    }

    #[test]
    fn move_of_unknown_id_is_a_noop() {
        let mut state = empty_state();
        state.add_device(DeviceType::Phone);
        let before = state.devices.clone();
        state.move_device("nope", 50.0, 50.0);
        assert_eq!(state.devices, before);
    }
}
