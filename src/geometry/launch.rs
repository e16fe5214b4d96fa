//! Launch-vector resolution from sonar frame into the navigation frame

use nalgebra::Matrix3;

use crate::core::Ping;
use crate::geometry::transform::sonar_to_cartesian;

/// Launch geometry of a beam in the local NED navigation frame
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LaunchVector {
    /// Sine of the launch azimuth
    pub sin_az: f64,
    /// Cosine of the launch azimuth
    pub cos_az: f64,
    /// Depression angle from the horizontal, positive downward (radians)
    pub beta0: f64,
}

impl LaunchVector {
    /// Rotate a ping's beam direction into the navigation frame and
    /// decompose it into horizontal azimuth and vertical depression.
    ///
    /// A nadir-looking ray has no horizontal component; its azimuth
    /// sine/cosine are both reported as zero.
    pub fn resolve(ping: &Ping, boresight: &Matrix3<f64>, imu2nav: &Matrix3<f64>) -> Self {
        let beam =
            sonar_to_cartesian(ping.along_track_angle, ping.across_track_angle).normalize();
        let nav = imu2nav * (boresight * beam);

        let horizontal = (nav.x * nav.x + nav.y * nav.y).sqrt();
        let (sin_az, cos_az) = if horizontal > 0.0 {
            (nav.x / horizontal, nav.y / horizontal)
        } else {
            (0.0, 0.0)
        };

        Self {
            sin_az,
            cos_az,
            beta0: nav.z.asin(),
        }
    }
}
