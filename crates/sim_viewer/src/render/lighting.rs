//! Scene lighting

use serde::{Deserialize, Serialize};

use crate::foundation::math::{Vec3, Vec4};

/// The single light illuminating the scene.
///
/// Positioned like a point light; shading uses the direction from each
/// surface towards `position`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DirectionalLight {
    /// World position of the light
    pub position: [f32; 3],
    /// Ambient intensity (RGBA)
    pub ambient: [f32; 4],
    /// Diffuse intensity (RGBA)
    pub diffuse: [f32; 4],
    /// Specular intensity (RGBA)
    pub specular: [f32; 4],
}

impl Default for DirectionalLight {
    fn default() -> Self {
        Self {
            position: [50.0, 50.0, 50.0],
            ambient: [0.3, 0.3, 0.3, 1.0],
            diffuse: [1.0, 1.0, 1.0, 1.0],
            specular: [1.0, 1.0, 1.0, 1.0],
        }
    }
}

impl DirectionalLight {
    /// Light position as a vector
    pub fn position(&self) -> Vec3 {
        Vec3::from(self.position)
    }

    /// Ambient intensity as a vector
    pub fn ambient(&self) -> Vec4 {
        Vec4::from(self.ambient)
    }

    /// Diffuse intensity as a vector
    pub fn diffuse(&self) -> Vec4 {
        Vec4::from(self.diffuse)
    }

    /// Specular intensity as a vector
    pub fn specular(&self) -> Vec4 {
        Vec4::from(self.specular)
    }
}
