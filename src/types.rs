use nalgebra as na;

/// One camera's calibration: intrinsics plus world-to-camera pose.
///
/// The position of a model in the loaded list is the canonical view index
/// used everywhere else: frame folder order, annotation `views` order and
/// output numbering.
#[derive(Debug, Clone)]
pub struct CameraModel {
    /// 3x3 upper-triangular camera matrix (fx, skew, cx / fy, cy).
    pub camera_matrix: na::Matrix3<f64>,
    /// Radial/tangential coefficients k1, k2, p1, p2 and optionally k3.
    pub distortion: na::DVector<f64>,
    /// Axis-angle world-to-camera rotation.
    pub rvec: na::Vector3<f64>,
    /// World-to-camera translation.
    pub tvec: na::Vector3<f64>,
}

impl CameraModel {
    pub fn new(
        camera_matrix: na::Matrix3<f64>,
        distortion: na::DVector<f64>,
        rvec: na::Vector3<f64>,
        tvec: na::Vector3<f64>,
    ) -> CameraModel {
        CameraModel {
            camera_matrix,
            distortion,
            rvec,
            tvec,
        }
    }

    /// World-to-camera rotation via the axis-angle exponential map.
    pub fn rotation(&self) -> na::Rotation3<f64> {
        na::Rotation3::from_scaled_axis(self.rvec)
    }
}
