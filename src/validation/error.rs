//! Error types for profile construction and ray tracing

use std::fmt;

use serde::{Deserialize, Serialize};

/// Errors surfaced while building a sound-velocity profile or tracing a ray
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum RayTraceError {
    /// The sound-velocity profile contains no samples
    EmptyProfile,
    /// Two consecutive profile samples share a depth, which would make the
    /// interval gradient divide by zero
    DuplicateDepth { first: f64, second: f64 },
    /// Profile depths are not ordered from the surface downward
    UnsortedProfile { index: usize },
    /// Snell's constant drives the ray horizontal inside a layer
    /// (total internal reflection; the ping geometry is unphysical)
    HorizontalRay { layer: usize, sound_speed: f64 },
}

impl fmt::Display for RayTraceError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RayTraceError::EmptyProfile => {
                write!(f, "Sound-velocity profile contains no samples")
            }
            RayTraceError::DuplicateDepth { first, second } => {
                write!(
                    f,
                    "Can't calculate gradient for profile samples at same depth: z0={} z1={}",
                    first, second
                )
            }
            RayTraceError::UnsortedProfile { index } => {
                write!(f, "Profile depths out of order at sample {}", index)
            }
            RayTraceError::HorizontalRay { layer, sound_speed } => {
                write!(
                    f,
                    "Ray turns horizontal in layer {} at sound speed {} m/s",
                    layer, sound_speed
                )
            }
        }
    }
}

impl std::error::Error for RayTraceError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_duplicate_depth() {
        let err = RayTraceError::DuplicateDepth {
            first: 50.0,
            second: 50.0,
        };
        let text = err.to_string();
        assert!(text.contains("z0=50"));
        assert!(text.contains("z1=50"));
    }

    #[test]
    fn test_display_horizontal_ray_names_layer() {
        let err = RayTraceError::HorizontalRay {
            layer: 3,
            sound_speed: 1520.0,
        };
        assert!(err.to_string().contains("layer 3"));
    }
}
