//! Physical constants and numeric tolerances

/// Speed of sound in water under standard conditions (m/s)
pub const SPEED_OF_SOUND_WATER: f64 = 1500.0;

/// Sound-speed gradients below this magnitude (s⁻¹) are treated as zero,
/// selecting the constant-celerity propagation regime for the layer.
pub const GRADIENT_EPSILON: f64 = 0.000001;

/// Degrees to radians
pub const D2R: f64 = std::f64::consts::PI / 180.0;
