//! Per-entity uniform assembly
//!
//! Everything one draw call needs: the entity's transforms plus the shared
//! light and material terms, keyed by the names shader programs bind.

use std::collections::BTreeMap;

use crate::foundation::math::{Mat4, Mat4Ext, Vec3, Vec4};
use crate::render::lighting::DirectionalLight;
use crate::render::material::MaterialConstants;
use crate::scene::Entity;

/// Uniform names as seen by shader programs
pub mod names {
    /// Model matrix
    pub const WORLD: &str = "u_world";
    /// Normal matrix
    pub const WORLD_INVERSE_TRANSPOSE: &str = "u_worldInverseTransform";
    /// Model-view-projection matrix
    pub const WORLD_VIEW_PROJECTION: &str = "u_worldViewProjection";
    /// Light position
    pub const LIGHT_POSITION: &str = "u_lightWorldPosition";
    /// Ambient light intensity
    pub const AMBIENT_LIGHT: &str = "u_ambientLight";
    /// Diffuse light intensity
    pub const DIFFUSE_LIGHT: &str = "u_diffuseLight";
    /// Specular light intensity
    pub const SPECULAR_LIGHT: &str = "u_specularLight";
    /// Ambient material reflectance
    pub const AMBIENT_COLOR: &str = "u_ambientColor";
    /// Diffuse material color
    pub const DIFFUSE_COLOR: &str = "u_diffuseColor";
    /// Specular material reflectance
    pub const SPECULAR_COLOR: &str = "u_specularColor";
    /// Specular exponent
    pub const SHININESS: &str = "u_shininess";
}

/// A single uniform value
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum UniformValue {
    /// Scalar
    Float(f32),
    /// 3-component vector
    Vec3(Vec3),
    /// 4-component vector
    Vec4(Vec4),
    /// 4x4 matrix
    Mat4(Mat4),
}

/// Uniforms for one draw call
#[derive(Debug, Clone, PartialEq)]
pub struct UniformSet {
    /// Model matrix
    pub world: Mat4,
    /// `transpose(inverse(world))`
    pub normal_matrix: Mat4,
    /// `view_projection * world`
    pub world_view_projection: Mat4,
    /// Light position
    pub light_position: Vec3,
    /// Ambient light intensity
    pub ambient_light: Vec4,
    /// Diffuse light intensity
    pub diffuse_light: Vec4,
    /// Specular light intensity
    pub specular_light: Vec4,
    /// Ambient material reflectance
    pub ambient_color: Vec4,
    /// The entity's own color
    pub diffuse_color: Vec4,
    /// Specular material reflectance
    pub specular_color: Vec4,
    /// Specular exponent
    pub shininess: f32,
}

impl UniformSet {
    /// Named map handed to backends that bind uniforms by name
    pub fn to_named(&self) -> BTreeMap<&'static str, UniformValue> {
        BTreeMap::from([
            (names::WORLD, UniformValue::Mat4(self.world)),
            (names::WORLD_INVERSE_TRANSPOSE, UniformValue::Mat4(self.normal_matrix)),
            (names::WORLD_VIEW_PROJECTION, UniformValue::Mat4(self.world_view_projection)),
            (names::LIGHT_POSITION, UniformValue::Vec3(self.light_position)),
            (names::AMBIENT_LIGHT, UniformValue::Vec4(self.ambient_light)),
            (names::DIFFUSE_LIGHT, UniformValue::Vec4(self.diffuse_light)),
            (names::SPECULAR_LIGHT, UniformValue::Vec4(self.specular_light)),
            (names::AMBIENT_COLOR, UniformValue::Vec4(self.ambient_color)),
            (names::DIFFUSE_COLOR, UniformValue::Vec4(self.diffuse_color)),
            (names::SPECULAR_COLOR, UniformValue::Vec4(self.specular_color)),
            (names::SHININESS, UniformValue::Float(self.shininess)),
        ])
    }
}

/// Build the uniforms for drawing `entity` this frame.
///
/// A zero scale makes the model matrix singular; the normal matrix then
/// falls back to identity, since nothing visible is lit in that case anyway.
pub fn build_uniforms(
    entity: &Entity,
    view_projection: &Mat4,
    light: &DirectionalLight,
    material: &MaterialConstants,
) -> UniformSet {
    let world = entity.world_matrix();
    let normal_matrix = world
        .inverted()
        .map_or_else(Mat4::identity, |inverse| inverse.transpose());

    UniformSet {
        world,
        normal_matrix,
        world_view_projection: view_projection * world,
        light_position: light.position(),
        ambient_light: light.ambient(),
        diffuse_light: light.diffuse(),
        specular_light: light.specular(),
        ambient_color: material.ambient(),
        diffuse_color: Vec4::from(entity.color),
        specular_color: material.specular(),
        shininess: material.shininess,
    }
}
