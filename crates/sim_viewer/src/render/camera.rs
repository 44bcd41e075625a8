//! Look-at camera and view-projection setup

use serde::{Deserialize, Serialize};

use crate::foundation::math::{utils, Mat4, Mat4Ext, Vec3};
use crate::scene::SceneBounds;

/// Perspective look-at camera.
///
/// The eye sits at `offset` relative to the center of the simulated area and
/// always looks at that center.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Camera {
    /// Eye position relative to the scene center
    pub offset: [f32; 3],

    /// Up direction; need not be vertical
    pub up: [f32; 3],

    /// Vertical field of view in degrees
    pub fov_degrees: f32,

    /// Near clipping plane
    pub near: f32,

    /// Far clipping plane
    pub far: f32,
}

impl Default for Camera {
    fn default() -> Self {
        Self {
            offset: [0.0, 25.0, 25.0],
            up: [0.0, 1.0, 0.0],
            fov_degrees: 45.0,
            near: 1.0,
            far: 200.0,
        }
    }
}

impl Camera {
    /// Eye position in world space
    pub fn eye(&self, bounds: &SceneBounds) -> Vec3 {
        Vec3::from(self.offset) + bounds.center()
    }

    /// Camera-to-world transform, `None` when the eye sits on the scene center
    pub fn camera_matrix(&self, bounds: &SceneBounds) -> Option<Mat4> {
        let eye = self.eye(bounds);
        let target = bounds.center();
        if (eye - target).norm_squared() < f32::EPSILON {
            return None;
        }
        Some(Mat4::look_at(&eye, &target, &Vec3::from(self.up)))
    }

    /// Perspective projection for `viewport`
    pub fn projection(&self, viewport: &Viewport) -> Mat4 {
        Mat4::perspective(
            utils::deg_to_rad(self.fov_degrees),
            viewport.aspect_ratio(),
            self.near,
            self.far,
        )
    }
}

/// Drawable surface size in pixels
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Viewport {
    /// Width in pixels
    pub width: u32,
    /// Height in pixels
    pub height: u32,
}

impl Viewport {
    /// Create a viewport
    pub const fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    /// Width over height; 1.0 for a collapsed surface
    pub fn aspect_ratio(&self) -> f32 {
        if self.width == 0 || self.height == 0 {
            1.0
        } else {
            self.width as f32 / self.height as f32
        }
    }
}

/// `projection * view` for the current camera placement.
///
/// Recomputed every frame since the camera can move at any time. A camera
/// whose eye coincides with the scene center has no view direction; the
/// projection alone is returned and a warning logged.
pub fn setup_world_view(camera: &Camera, bounds: &SceneBounds, viewport: &Viewport) -> Mat4 {
    let projection = camera.projection(viewport);
    match camera.camera_matrix(bounds).and_then(|m| m.inverted()) {
        Some(view) => projection * view,
        None => {
            log::warn!("Camera matrix is singular, drawing without view transform");
            projection
        }
    }
}
