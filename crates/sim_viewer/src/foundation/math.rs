//! Math utilities and types
//!
//! Provides the vector/matrix types and the transform utility used by the
//! scene and render modules. All functions here are pure.

pub use nalgebra::{Matrix3, Matrix4, Vector3, Vector4};

/// 3D vector type
pub type Vec3 = Vector3<f32>;

/// 4D vector type
pub type Vec4 = Vector4<f32>;

/// 3x3 matrix type
pub type Mat3 = Matrix3<f32>;

/// 4x4 matrix type
pub type Mat4 = Matrix4<f32>;

/// 3D point type
pub type Point3 = nalgebra::Point3<f32>;

/// Math constants
pub mod constants {
    /// Pi constant
    pub const PI: f32 = std::f32::consts::PI;

    /// 2 * Pi
    pub const TAU: f32 = 2.0 * PI;

    /// Degrees to radians conversion factor
    pub const DEG_TO_RAD: f32 = PI / 180.0;
}

/// Math utility functions
pub mod utils {
    use super::constants;

    /// Convert degrees to radians
    pub fn deg_to_rad(degrees: f32) -> f32 {
        degrees * constants::DEG_TO_RAD
    }

    /// Map an angle into `(-PI, PI]` with at most one full-turn correction.
    ///
    /// Inputs are expected within one turn of the range (they come from
    /// `atan2`), so no loop is needed.
    pub fn normalize_angle(angle: f32) -> f32 {
        if angle > constants::PI {
            angle - constants::TAU
        } else if angle <= -constants::PI {
            angle + constants::TAU
        } else {
            angle
        }
    }
}

/// Transform utility on 4x4 matrices.
///
/// The `*ed` builders post-multiply, so a chain like
/// `Mat4::identity().translated(p).rotated_y(a).scaled_by(s)` yields `T * Ry * S`
/// and applies the scale to local geometry first.
pub trait Mat4Ext {
    /// Create a rotation matrix around the X axis
    fn rotation_x(angle: f32) -> Mat4;

    /// Create a rotation matrix around the Y axis
    fn rotation_y(angle: f32) -> Mat4;

    /// Create a rotation matrix around the Z axis
    fn rotation_z(angle: f32) -> Mat4;

    /// `self * translation(offset)`
    fn translated(&self, offset: &Vec3) -> Mat4;

    /// `self * rotation_x(angle)`
    fn rotated_x(&self, angle: f32) -> Mat4;

    /// `self * rotation_y(angle)`
    fn rotated_y(&self, angle: f32) -> Mat4;

    /// `self * rotation_z(angle)`
    fn rotated_z(&self, angle: f32) -> Mat4;

    /// `self * scaling(factors)`
    fn scaled_by(&self, factors: &Vec3) -> Mat4;

    /// Inverse of the matrix, `None` when singular
    fn inverted(&self) -> Option<Mat4>;

    /// Right-handed OpenGL-style perspective projection (clip z in [-1, 1])
    fn perspective(fov_y: f32, aspect: f32, near: f32, far: f32) -> Mat4;

    /// Camera matrix placing an observer at `eye` looking at `target`.
    ///
    /// This is the camera's world transform, not the view matrix; invert it
    /// to get the view matrix.
    fn look_at(eye: &Vec3, target: &Vec3, up: &Vec3) -> Mat4;
}

impl Mat4Ext for Mat4 {
    fn rotation_x(angle: f32) -> Mat4 {
        Mat4::from_axis_angle(&Vec3::x_axis(), angle)
    }

    fn rotation_y(angle: f32) -> Mat4 {
        Mat4::from_axis_angle(&Vec3::y_axis(), angle)
    }

    fn rotation_z(angle: f32) -> Mat4 {
        Mat4::from_axis_angle(&Vec3::z_axis(), angle)
    }

    fn translated(&self, offset: &Vec3) -> Mat4 {
        self * Mat4::new_translation(offset)
    }

    fn rotated_x(&self, angle: f32) -> Mat4 {
        self * Mat4::rotation_x(angle)
    }

    fn rotated_y(&self, angle: f32) -> Mat4 {
        self * Mat4::rotation_y(angle)
    }

    fn rotated_z(&self, angle: f32) -> Mat4 {
        self * Mat4::rotation_z(angle)
    }

    fn scaled_by(&self, factors: &Vec3) -> Mat4 {
        self * Mat4::new_nonuniform_scaling(factors)
    }

    fn inverted(&self) -> Option<Mat4> {
        self.try_inverse()
    }

    fn perspective(fov_y: f32, aspect: f32, near: f32, far: f32) -> Mat4 {
        let f = 1.0 / (fov_y * 0.5).tan();
        let range_inv = 1.0 / (near - far);

        let mut result = Mat4::zeros();
        result[(0, 0)] = f / aspect;
        result[(1, 1)] = f;
        result[(2, 2)] = (near + far) * range_inv;
        result[(2, 3)] = near * far * range_inv * 2.0;
        result[(3, 2)] = -1.0;
        result
    }

    fn look_at(eye: &Vec3, target: &Vec3, up: &Vec3) -> Mat4 {
        let z_axis = (eye - target).normalize();
        let mut x_axis = up.cross(&z_axis);
        if x_axis.norm_squared() < f32::EPSILON {
            // Up is parallel to the view direction; any perpendicular axis works.
            let fallback = if z_axis.x.abs() < 0.9 { Vec3::x() } else { Vec3::z() };
            x_axis = fallback.cross(&z_axis);
        }
        let x_axis = x_axis.normalize();
        let y_axis = z_axis.cross(&x_axis).normalize();

        Mat4::new(
            x_axis.x, y_axis.x, z_axis.x, eye.x,
            x_axis.y, y_axis.y, z_axis.y, eye.y,
            x_axis.z, y_axis.z, z_axis.z, eye.z,
            0.0, 0.0, 0.0, 1.0,
        )
    }
}
