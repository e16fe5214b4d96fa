//! Beam geometry: sonar-frame conversions and launch-vector resolution

pub mod launch;
pub mod transform;

pub use launch::LaunchVector;
pub use transform::sonar_to_cartesian;
