//! Depth-ordered sound-velocity profile of the water column

use crate::raytrace::layers::sound_speed_gradient;
use crate::validation::RayTraceError;

/// A validated sound-velocity profile.
///
/// Samples are ordered from the surface downward. The per-interval sound
/// speed gradient is computed once at construction; profiles that would
/// make that computation divide by zero are rejected up front. The profile
/// is read-only during a trace and may be shared across threads by
/// reference.
#[derive(Debug, Clone, PartialEq)]
pub struct SoundVelocityProfile {
    depths: Vec<f64>,
    speeds: Vec<f64>,
    gradients: Vec<f64>,
}

impl SoundVelocityProfile {
    /// Build a profile from (depth, speed) pairs ordered surface-down.
    ///
    /// Fails on an empty sample set, on consecutive samples at the same
    /// depth, and on depths that decrease.
    pub fn from_samples(samples: &[(f64, f64)]) -> Result<Self, RayTraceError> {
        if samples.is_empty() {
            return Err(RayTraceError::EmptyProfile);
        }

        let depths: Vec<f64> = samples.iter().map(|&(depth, _)| depth).collect();
        let speeds: Vec<f64> = samples.iter().map(|&(_, speed)| speed).collect();

        let mut gradients = Vec::with_capacity(samples.len().saturating_sub(1));
        for i in 0..depths.len().saturating_sub(1) {
            let (z0, z1) = (depths[i], depths[i + 1]);
            if z1 == z0 {
                return Err(RayTraceError::DuplicateDepth {
                    first: z0,
                    second: z1,
                });
            }
            if z1 < z0 {
                return Err(RayTraceError::UnsortedProfile { index: i + 1 });
            }
            gradients.push(sound_speed_gradient(z0, speeds[i], z1, speeds[i + 1]));
        }

        Ok(Self {
            depths,
            speeds,
            gradients,
        })
    }

    /// Sample depths, surface-down (meters)
    pub fn depths(&self) -> &[f64] {
        &self.depths
    }

    /// Sample sound speeds (m/s)
    pub fn speeds(&self) -> &[f64] {
        &self.speeds
    }

    /// Per-interval sound-speed gradient, length N−1 (s⁻¹)
    pub fn sound_speed_gradient(&self) -> &[f64] {
        &self.gradients
    }

    /// Number of samples in the profile
    pub fn len(&self) -> usize {
        self.depths.len()
    }

    pub fn is_empty(&self) -> bool {
        self.depths.is_empty()
    }

    /// Smallest sample index whose depth is at or beneath the query depth,
    /// or `len()` when the query is deeper than every sample.
    pub fn layer_index_for_depth(&self, depth: f64) -> usize {
        self.depths.partition_point(|&d| d < depth)
    }
}
