//! Frame conversions shared with the surrounding sonar code

use nalgebra::Vector3;

/// Beam direction in the sonar frame from along- and across-track angles.
///
/// Convention: x along-track, y across-track, z down the boresight, so a
/// zero/zero beam points straight out of the transducer face.
pub fn sonar_to_cartesian(along_track_angle: f64, across_track_angle: f64) -> Vector3<f64> {
    Vector3::new(
        along_track_angle.sin() * across_track_angle.cos(),
        across_track_angle.sin(),
        along_track_angle.cos() * across_track_angle.cos(),
    )
}
