//! Ray integration through the water column.
//!
//! The integrator walks the sound-velocity profile from the transducer
//! depth, committing one closed-form step per layer until the one-way
//! travel budget can no longer absorb a whole layer, then spends the
//! remainder on a straight-line tail. Both entry points share the same
//! integration routine; the planar one additionally records every
//! committed step.

use log::debug;
use nalgebra::{Matrix3, Vector2, Vector3};

use crate::core::{Ping, PlanarRay, RaySegment};
use crate::geometry::LaunchVector;
use crate::profile::SoundVelocityProfile;
use crate::raytrace::layers::{self, LayerStep};
use crate::validation::RayTraceError;

/// Trace a ping through the profile and return the seabed echo position
/// in the local NED navigation frame (meters).
pub fn ray_trace(
    ping: &Ping,
    svp: &SoundVelocityProfile,
    boresight: &Matrix3<f64>,
    imu2nav: &Matrix3<f64>,
) -> Result<Vector3<f64>, RayTraceError> {
    let launch = LaunchVector::resolve(ping, boresight, imu2nav);
    let snell_constant = launch.beta0.cos() / ping.surface_sound_speed;

    let (range, depth) = integrate(ping, svp, snell_constant, |_| {})?;

    // re-orient the vertical-plane ray by the launch azimuth
    Ok(Vector3::new(
        range * launch.sin_az,
        range * launch.cos_az,
        depth,
    ))
}

/// Trace a ping in its vertical plane, keeping the per-layer ray segments
/// and travel times. The caller may orient the fan by azimuth afterwards.
pub fn planar_ray_trace(
    ping: &Ping,
    svp: &SoundVelocityProfile,
    boresight: &Matrix3<f64>,
    imu2nav: &Matrix3<f64>,
) -> Result<PlanarRay, RayTraceError> {
    let launch = LaunchVector::resolve(ping, boresight, imu2nav);
    let snell_constant = launch.beta0.cos() / ping.surface_sound_speed;

    let mut layer_rays = Vec::new();
    let mut layer_travel_times = Vec::new();
    let (range, depth) = integrate(ping, svp, snell_constant, |step| {
        layer_rays.push(RaySegment::new(step.delta_r, step.delta_z));
        layer_travel_times.push(step.delta_t);
    })?;

    Ok(PlanarRay {
        point: Vector2::new(range, depth),
        layer_rays,
        layer_travel_times,
    })
}

/// Walk the profile until the one-way budget is exhausted, feeding every
/// committed step to `emit` and returning the cumulated (range, depth).
fn integrate<F>(
    ping: &Ping,
    svp: &SoundVelocityProfile,
    snell_constant: f64,
    mut emit: F,
) -> Result<(f64, f64), RayTraceError>
where
    F: FnMut(&LayerStep),
{
    let one_way_travel_time = ping.one_way_travel_time();
    if one_way_travel_time <= 0.0 {
        // nothing to traverse: the echo is at the transducer
        return Ok((0.0, 0.0));
    }

    let depths = svp.depths();
    let speeds = svp.speeds();
    let gradients = svp.sound_speed_gradient();
    let size = svp.len();

    let cutoff = svp.layer_index_for_depth(ping.transducer_depth);

    let mut range = 0.0;
    let mut depth = 0.0;
    let mut elapsed = 0.0;
    let mut committed = 0usize;

    let mut tail_speed = ping.surface_sound_speed;
    let mut tail_layer = cutoff;

    if cutoff < size {
        // the transducer sits above the deepest sample; bridge the gap
        // between the transducer and the first profile boundary below it
        // with a virtual layer that starts at the surface sound speed
        let mut reached_profile = true;
        let seed_thickness = depths[cutoff] - ping.transducer_depth;
        if seed_thickness > 0.0 {
            let seed_gradient = layers::sound_speed_gradient(
                ping.transducer_depth,
                ping.surface_sound_speed,
                depths[cutoff],
                speeds[cutoff],
            );
            let step = layers::layer_step(
                ping.transducer_depth,
                depths[cutoff],
                ping.surface_sound_speed,
                speeds[cutoff],
                seed_gradient,
                snell_constant,
                cutoff,
            )?;
            if elapsed + step.delta_t <= one_way_travel_time {
                range += step.delta_r;
                depth += step.delta_z;
                elapsed += step.delta_t;
                committed += 1;
                emit(&step);
            } else {
                // budget runs out before the first boundary: the ray ends
                // inside the virtual layer, still at the surface speed
                reached_profile = false;
            }
        }

        if reached_profile {
            let mut index = cutoff;
            while index + 1 < size {
                let step = layers::layer_step(
                    depths[index],
                    depths[index + 1],
                    speeds[index],
                    speeds[index + 1],
                    gradients[index],
                    snell_constant,
                    index,
                )?;
                if elapsed + step.delta_t > one_way_travel_time {
                    break;
                }
                range += step.delta_r;
                depth += step.delta_z;
                elapsed += step.delta_t;
                committed += 1;
                emit(&step);
                index += 1;
            }
            tail_speed = speeds[index];
            tail_layer = index;
        }
    }

    // spend whatever budget is left on a straight line, closing the ray
    // at exactly the one-way travel time
    let remainder = one_way_travel_time - elapsed;
    let tail = layers::tail_step(remainder, tail_speed, snell_constant, tail_layer)?;
    range += tail.delta_r;
    depth += tail.delta_z;
    emit(&tail);

    debug!(
        "ray trace: {} layer(s) committed, tail {:.6} s at {:.1} m/s, range {:.3} m, depth {:.3} m",
        committed, remainder, tail_speed, range, depth
    );

    Ok((range, depth))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::SPEED_OF_SOUND_WATER;
    use rand::{Rng, SeedableRng};
    use std::f64::consts::{FRAC_PI_3, FRAC_PI_6};

    const POS_TOL: f64 = 1e-4;
    const TIME_TOL: f64 = 1e-7;
    const CLOSURE_TOL: f64 = 1e-9;

    fn identity() -> Matrix3<f64> {
        Matrix3::identity()
    }

    fn yaw_matrix(psi: f64) -> Matrix3<f64> {
        Matrix3::new(
            psi.cos(),
            -psi.sin(),
            0.0,
            psi.sin(),
            psi.cos(),
            0.0,
            0.0,
            0.0,
            1.0,
        )
    }

    fn isovelocity_svp() -> SoundVelocityProfile {
        SoundVelocityProfile::from_samples(&[
            (0.0, SPEED_OF_SOUND_WATER),
            (1000.0, SPEED_OF_SOUND_WATER),
        ])
        .unwrap()
    }

    #[test]
    fn test_isovelocity_nadir_beam() {
        let ping = Ping::new(0.2, 1500.0, 0.0, 0.0, 0.0);
        let point = ray_trace(&ping, &isovelocity_svp(), &identity(), &identity()).unwrap();
        assert!(point.x.abs() < POS_TOL);
        assert!(point.y.abs() < POS_TOL);
        assert!((point.z - 150.0).abs() < POS_TOL);
    }

    #[test]
    fn test_isovelocity_oblique_beam() {
        let ping = Ping::new(0.2, 1500.0, 0.0, 0.0, FRAC_PI_6);
        let planar = planar_ray_trace(&ping, &isovelocity_svp(), &identity(), &identity()).unwrap();
        // straight 150 m ray regardless of how the budget splits across layers
        let (x, z) = (planar.point.x, planar.point.y);
        assert!((x * x + z * z - 22500.0).abs() < 1e-2);
        let total: f64 = planar.layer_travel_times.iter().sum();
        assert!((total - 0.1).abs() < CLOSURE_TOL);
    }

    #[test]
    fn test_two_layer_refraction_preserves_snell_constant() {
        let svp =
            SoundVelocityProfile::from_samples(&[(0.0, 1500.0), (50.0, 1450.0), (200.0, 1450.0)])
                .unwrap();
        // across-track 30° gives a 60° depression angle through identity rotations
        let ping = Ping::new(0.3, 1500.0, 0.0, 0.0, FRAC_PI_6);
        let planar = planar_ray_trace(&ping, &svp, &identity(), &identity()).unwrap();

        let beta0 = FRAC_PI_3;
        let k = beta0.cos() / 1500.0;

        // first layer: circular arc from 1500 to 1450 m/s over 50 m
        let sin_b0 = (1.0 - (k * 1500.0_f64).powi(2)).sqrt();
        let sin_b1 = (1.0 - (k * 1450.0_f64).powi(2)).sqrt();
        let arc_time = ((1450.0_f64 / 1500.0) * (1.0 + sin_b0) / (1.0 + sin_b1)).ln().abs();
        assert!((planar.layer_travel_times[0] - arc_time).abs() < TIME_TOL);
        assert!((planar.layer_rays[0].y - 50.0).abs() < POS_TOL);

        // cos β below the boundary obeys cos β = k·c with the new speed;
        // the second layer overshoots the budget, so the tail finishes at
        // 1450 m/s with that angle
        let tail_time = 0.15 - arc_time;
        let expected_z = 50.0 + 1450.0 * tail_time * sin_b1;
        assert!((planar.point.y - expected_z).abs() < POS_TOL);
        assert_eq!(planar.layer_rays.len(), 2);
        assert!((planar.layer_travel_times[1] - tail_time).abs() < TIME_TOL);
    }

    #[test]
    fn test_transducer_below_deepest_sample() {
        let svp = SoundVelocityProfile::from_samples(&[(0.0, 1500.0), (100.0, 1480.0)]).unwrap();
        let ping = Ping::new(0.08, 1475.0, 150.0, 0.0, FRAC_PI_6);
        let planar = planar_ray_trace(&ping, &svp, &identity(), &identity()).unwrap();

        // whole budget goes to the straight tail at the surface sound speed
        assert_eq!(planar.layer_rays.len(), 1);
        assert!((planar.layer_travel_times[0] - 0.04).abs() < TIME_TOL);
        let sin_b = FRAC_PI_3.sin();
        let cos_b = FRAC_PI_3.cos();
        assert!((planar.point.x - 1475.0 * 0.04 * cos_b).abs() < POS_TOL);
        assert!((planar.point.y - 1475.0 * 0.04 * sin_b).abs() < POS_TOL);
    }

    #[test]
    fn test_constant_gradient_column_vertical_beam() {
        let svp = SoundVelocityProfile::from_samples(&[(0.0, 1500.0), (1000.0, 1520.0)]).unwrap();
        let ping = Ping::new(0.5, 1500.0, 0.0, 0.0, 0.0);
        let planar = planar_ray_trace(&ping, &svp, &identity(), &identity()).unwrap();

        // the whole arc layer would take 50·ln(1520/1500) ≈ 0.662 s, so the
        // 0.25 s budget ends inside it: straight tail at the top speed
        assert_eq!(planar.layer_rays.len(), 1);
        assert!((planar.point.y - 1500.0 * 0.25).abs() < POS_TOL);
        assert!(planar.point.x.abs() < POS_TOL);
        let total: f64 = planar.layer_travel_times.iter().sum();
        assert!((total - 0.25).abs() < CLOSURE_TOL);
    }

    #[test]
    fn test_degenerate_profile_rejected() {
        let result = SoundVelocityProfile::from_samples(&[(50.0, 1500.0), (50.0, 1490.0)]);
        assert_eq!(
            result.unwrap_err(),
            RayTraceError::DuplicateDepth {
                first: 50.0,
                second: 50.0
            }
        );
    }

    #[test]
    fn test_zero_budget_is_degenerate_point() {
        let ping = Ping::new(0.0, 1500.0, 5.0, 0.0, FRAC_PI_6);
        let planar = planar_ray_trace(&ping, &isovelocity_svp(), &identity(), &identity()).unwrap();
        assert_eq!(planar.point, Vector2::new(0.0, 0.0));
        assert!(planar.layer_rays.is_empty());
        assert!(planar.layer_travel_times.is_empty());
    }

    #[test]
    fn test_seed_overshoot_ends_at_surface_speed() {
        // transducer 10 m down, first boundary 990 m below: the seed layer
        // alone exceeds the budget, so no profile layer is committed and
        // the tail runs at the surface sound speed
        let ping = Ping::new(0.2, 1480.0, 10.0, 0.0, 0.0);
        let planar = planar_ray_trace(&ping, &isovelocity_svp(), &identity(), &identity()).unwrap();
        assert_eq!(planar.layer_rays.len(), 1);
        assert!((planar.point.y - 1480.0 * 0.1).abs() < POS_TOL);
    }

    #[test]
    fn test_multi_layer_segment_sums_match_endpoint() {
        let svp = SoundVelocityProfile::from_samples(&[
            (0.0, 1510.0),
            (10.0, 1505.0),
            (30.0, 1490.0),
            (80.0, 1482.0),
            (300.0, 1482.0),
        ])
        .unwrap();
        let ping = Ping::new(0.35, 1510.0, 2.0, 0.1, FRAC_PI_6);
        let planar = planar_ray_trace(&ping, &svp, &identity(), &identity()).unwrap();

        let sum_r: f64 = planar.layer_rays.iter().map(|ray| ray.x).sum();
        let sum_z: f64 = planar.layer_rays.iter().map(|ray| ray.y).sum();
        assert!((sum_r - planar.point.x).abs() < 1e-9);
        assert!((sum_z - planar.point.y).abs() < 1e-9);

        // depth must accumulate monotonically for a downward beam
        for ray in &planar.layer_rays {
            assert!(ray.y >= 0.0);
        }

        let total: f64 = planar.layer_travel_times.iter().sum();
        assert!((total - 0.175).abs() < CLOSURE_TOL);
    }

    #[test]
    fn test_planar_and_nav_frame_traces_agree() {
        let svp = SoundVelocityProfile::from_samples(&[
            (0.0, 1510.0),
            (30.0, 1490.0),
            (200.0, 1485.0),
        ])
        .unwrap();
        let ping = Ping::new(0.25, 1510.0, 1.5, 0.05, FRAC_PI_6);
        let boresight = yaw_matrix(0.02);
        let imu2nav = yaw_matrix(-1.1);

        let point = ray_trace(&ping, &svp, &boresight, &imu2nav).unwrap();
        let planar = planar_ray_trace(&ping, &svp, &boresight, &imu2nav).unwrap();
        let launch = LaunchVector::resolve(&ping, &boresight, &imu2nav);

        assert!((point.x - planar.point.x * launch.sin_az).abs() < 1e-9);
        assert!((point.y - planar.point.x * launch.cos_az).abs() < 1e-9);
        assert!((point.z - planar.point.y).abs() < 1e-9);
    }

    #[test]
    fn test_heading_isotropy() {
        let svp = SoundVelocityProfile::from_samples(&[
            (0.0, 1500.0),
            (40.0, 1488.0),
            (500.0, 1492.0),
        ])
        .unwrap();
        let ping = Ping::new(0.4, 1500.0, 3.0, 0.0, FRAC_PI_6);
        let base = planar_ray_trace(&ping, &svp, &identity(), &identity()).unwrap();
        let base_point = ray_trace(&ping, &svp, &identity(), &identity()).unwrap();

        let mut rng = rand::rngs::StdRng::seed_from_u64(7);
        for _ in 0..10 {
            let psi: f64 = rng.gen_range(0.0..std::f64::consts::TAU);
            let yaw = yaw_matrix(psi);

            // the in-plane geometry must not depend on the heading
            let yawed = planar_ray_trace(&ping, &svp, &identity(), &yaw).unwrap();
            assert!((yawed.point.x - base.point.x).abs() < 1e-9);
            assert!((yawed.point.y - base.point.y).abs() < 1e-9);

            // the 3-D result rotates with the heading
            let rotated = yaw * base_point;
            let point = ray_trace(&ping, &svp, &identity(), &yaw).unwrap();
            assert!((point - rotated).norm() < 1e-9);
        }
    }

    #[test]
    fn test_transducer_on_sample_boundary() {
        // transducer exactly on the second sample: no seed layer, the walk
        // starts at that boundary
        let svp = SoundVelocityProfile::from_samples(&[
            (0.0, 1500.0),
            (20.0, 1495.0),
            (400.0, 1495.0),
        ])
        .unwrap();
        let ping = Ping::new(0.1, 1495.0, 20.0, 0.0, 0.0);
        let planar = planar_ray_trace(&ping, &svp, &identity(), &identity()).unwrap();
        assert!((planar.point.y - 1495.0 * 0.05).abs() < POS_TOL);
        let total: f64 = planar.layer_travel_times.iter().sum();
        assert!((total - 0.05).abs() < CLOSURE_TOL);
    }

    #[test]
    fn test_horizontal_ray_surfaces_error() {
        // near-grazing beam into a strongly upward-refracting profile
        let svp = SoundVelocityProfile::from_samples(&[(0.0, 1480.0), (100.0, 1600.0)]).unwrap();
        let ping = Ping::new(0.4, 1480.0, 0.0, 0.0, 80.0 * crate::core::D2R);
        let result = ray_trace(&ping, &svp, &identity(), &identity());
        assert_eq!(
            result.unwrap_err(),
            RayTraceError::HorizontalRay {
                layer: 0,
                sound_speed: 1600.0
            }
        );
    }
}
