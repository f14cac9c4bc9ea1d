//! Signal strength model for the simulated router.
//!
//! The router sits at the center of a normalized 0-100 canvas and signal
//! strength decays linearly with distance. This is a synthetic metric for
//! visualization, not a physical RF model.

/// Router position in the normalized coordinate space.
pub const ROUTER_X: f64 = 50.0;
pub const ROUTER_Y: f64 = 50.0;

/// Falloff radius: the distance over which the linear decay removes
/// `SIGNAL_FALLOFF` percentage points. Beyond it the formula keeps
/// decaying down to the 0 floor.
pub const MAX_DISTANCE: f64 = 50.0;

/// Percentage points lost over `MAX_DISTANCE`.
pub const SIGNAL_FALLOFF: f64 = 80.0;

/// Compute signal strength for a device at `(x, y)`.
///
/// Strength is 100 at the router, 20 at distance `MAX_DISTANCE`, and keeps
/// falling linearly beyond that until it hits the 0 floor. The raw value is
/// clamped to [0, 100] and then rounded to the nearest integer.
pub fn compute_signal_strength(x: f64, y: f64) -> u8 {
    let distance = ((x - ROUTER_X).powi(2) + (y - ROUTER_Y).powi(2)).sqrt();
    let raw = 100.0 - (distance / MAX_DISTANCE) * SIGNAL_FALLOFF;
    raw.clamp(0.0, 100.0).round() as u8
}

/// Clamp a canvas coordinate into the normalized 0-100 range.
pub fn clamp_coordinate(value: f64) -> f64 {
    value.clamp(0.0, 100.0)
}
