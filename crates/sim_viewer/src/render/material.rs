//! Material constants shared by every entity
//!
//! Only the diffuse color varies per entity; it comes from the entity itself.

use serde::{Deserialize, Serialize};

use crate::foundation::math::Vec4;

/// Fixed Phong material terms
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MaterialConstants {
    /// Ambient reflectance (RGBA)
    pub ambient: [f32; 4],
    /// Specular reflectance (RGBA)
    pub specular: [f32; 4],
    /// Specular exponent
    pub shininess: f32,
}

impl Default for MaterialConstants {
    fn default() -> Self {
        Self {
            ambient: [0.5, 0.5, 0.5, 1.0],
            specular: [0.5, 0.5, 0.5, 1.0],
            shininess: 50.0,
        }
    }
}

impl MaterialConstants {
    /// Ambient reflectance as a vector
    pub fn ambient(&self) -> Vec4 {
        Vec4::from(self.ambient)
    }

    /// Specular reflectance as a vector
    pub fn specular(&self) -> Vec4 {
        Vec4::from(self.specular)
    }
}
