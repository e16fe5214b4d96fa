//! Closed-form propagation primitives for a single profile layer.
//!
//! All primitives are parameterised by Snell's constant `k = cos(β₀)/c₀`:
//! in a horizontally layered medium the local depression angle β at sound
//! speed c always satisfies `cos β = k·c`. Propagation through a layer is
//! either a straight chord (constant celerity) or a circular arc (constant
//! gradient); the driver picks the regime from the gradient magnitude.

use crate::core::constants::GRADIENT_EPSILON;
use crate::validation::RayTraceError;

/// Range, depth and time increments contributed by one propagation step
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LayerStep {
    /// Horizontal range increment (meters)
    pub delta_r: f64,
    /// Depth increment (meters)
    pub delta_z: f64,
    /// Travel time spent in the step (seconds)
    pub delta_t: f64,
}

/// Local (cos β, sin β) at sound speed `c` under Snell's constant `k`
fn snell_angles(snell_constant: f64, c: f64) -> (f64, f64) {
    let cos_b = snell_constant * c;
    (cos_b, (1.0 - cos_b * cos_b).sqrt())
}

/// Sound-speed gradient between two depth samples (s⁻¹).
///
/// Equal depths are excluded by profile construction, and the transducer
/// seed guards the zero-thickness case before calling this.
pub fn sound_speed_gradient(z0: f64, c0: f64, z1: f64, c1: f64) -> f64 {
    (c1 - c0) / (z1 - z0)
}

/// Straight-chord propagation through a layer of constant sound speed
fn constant_celerity(z0: f64, z1: f64, c: f64, snell_constant: f64) -> LayerStep {
    let (cos_b, sin_b) = snell_angles(snell_constant, c);
    let delta_z = z1 - z0;
    let delta_t = delta_z / (c * sin_b);
    LayerStep {
        delta_r: cos_b * c * delta_t,
        delta_z,
        delta_t,
    }
}

/// Circular-arc propagation through a layer with a linear sound-speed
/// gradient. The arc radius is `1/(k·g)`.
fn constant_gradient(c0: f64, c1: f64, gradient: f64, snell_constant: f64) -> LayerStep {
    let (cos_b0, sin_b0) = snell_angles(snell_constant, c0);
    let (cos_b1, sin_b1) = snell_angles(snell_constant, c1);
    let radius = 1.0 / (snell_constant * gradient);

    // absolute value keeps upward and downward gradients both positive
    let delta_t =
        ((1.0 / gradient.abs()) * ((c1 / c0) * ((1.0 + sin_b0) / (1.0 + sin_b1))).ln()).abs();

    LayerStep {
        delta_r: radius * (sin_b0 - sin_b1),
        delta_z: radius * (cos_b1 - cos_b0),
        delta_t,
    }
}

/// Unrefracted propagation for a fixed travel time at a fixed sound speed
fn straight_line(travel_time: f64, c: f64, snell_constant: f64) -> LayerStep {
    let (cos_b, sin_b) = snell_angles(snell_constant, c);
    LayerStep {
        delta_r: c * travel_time * cos_b,
        delta_z: c * travel_time * sin_b,
        delta_t: travel_time,
    }
}

/// Propagate across one layer, picking the regime from the gradient
/// magnitude. Near-zero gradients use the layer's top speed as a constant.
///
/// Fails with `HorizontalRay` when `|k·c| ≥ 1` at either layer boundary:
/// past that point `sin β` is no longer real and the beam has refracted
/// horizontal.
pub fn layer_step(
    z0: f64,
    z1: f64,
    c0: f64,
    c1: f64,
    gradient: f64,
    snell_constant: f64,
    layer: usize,
) -> Result<LayerStep, RayTraceError> {
    check_refraction(snell_constant, c0, layer)?;
    check_refraction(snell_constant, c1, layer)?;

    if gradient.abs() < GRADIENT_EPSILON {
        Ok(constant_celerity(z0, z1, c0, snell_constant))
    } else {
        Ok(constant_gradient(c0, c1, gradient, snell_constant))
    }
}

/// Terminal straight-line step that spends the remaining travel budget at
/// the last layer's sound speed.
pub fn tail_step(
    travel_time: f64,
    c: f64,
    snell_constant: f64,
    layer: usize,
) -> Result<LayerStep, RayTraceError> {
    check_refraction(snell_constant, c, layer)?;
    Ok(straight_line(travel_time, c, snell_constant))
}

fn check_refraction(snell_constant: f64, c: f64, layer: usize) -> Result<(), RayTraceError> {
    if (snell_constant * c).abs() >= 1.0 {
        return Err(RayTraceError::HorizontalRay {
            layer,
            sound_speed: c,
        });
    }
    Ok(())
}
