//! Acoustic ray tracing through a layered water column

pub mod integrator;
pub mod layers;

pub use integrator::{planar_ray_trace, ray_trace};
pub use layers::{sound_speed_gradient, LayerStep};
