//! Scene entity
//!
//! One simulated object tracked by the viewer. Identity is assigned by the
//! simulation service; pose lives here; the model matrix is derived on demand
//! and never stored.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::foundation::math::{utils, Mat4, Mat4Ext, Vec3};

/// RGBA color with components in `0.0..=1.0`
pub type Rgba = [f32; 4];

/// Opaque white
pub const WHITE: Rgba = [1.0, 1.0, 1.0, 1.0];

/// Remote identity of an entity, unique within its category
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct EntityId(String);

impl EntityId {
    /// Wrap a remote identifier
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Identifier as sent by the service
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for EntityId {
    fn from(id: &str) -> Self {
        Self::new(id)
    }
}

impl fmt::Display for EntityId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// In-memory representation of one simulated object
#[derive(Debug, Clone, PartialEq)]
pub struct Entity {
    id: EntityId,

    /// World space position
    pub position: Vec3,

    previous_position: Vec3,

    /// Euler angles in radians, applied X then Y then Z
    pub rotation: Vec3,

    /// Per-axis scale factors
    pub scale: Vec3,

    /// Diffuse material color
    pub color: Rgba,
}

impl Entity {
    /// Create an entity at `position` with zero rotation, unit scale and white color
    pub fn new(id: EntityId, position: Vec3) -> Self {
        Self {
            id,
            position,
            previous_position: position,
            rotation: Vec3::zeros(),
            scale: Vec3::new(1.0, 1.0, 1.0),
            color: WHITE,
        }
    }

    /// Builder pattern: Set rotation (radians)
    pub fn with_rotation(mut self, rotation: Vec3) -> Self {
        self.rotation = rotation;
        self
    }

    /// Builder pattern: Set scale
    pub fn with_scale(mut self, scale: Vec3) -> Self {
        self.scale = scale;
        self
    }

    /// Builder pattern: Set color
    pub fn with_color(mut self, color: Rgba) -> Self {
        self.color = color;
        self
    }

    /// Remote identity
    pub fn id(&self) -> &EntityId {
        &self.id
    }

    /// Position held immediately before the most recent positional update
    pub fn previous_position(&self) -> Vec3 {
        self.previous_position
    }

    /// Heading around the vertical axis (radians)
    pub fn yaw(&self) -> f32 {
        self.rotation.y
    }

    /// Move to `new_position` and face along the horizontal motion vector.
    ///
    /// A zero horizontal displacement leaves the heading untouched, since
    /// `atan2(0, 0)` carries no direction.
    pub fn apply_motion(&mut self, new_position: Vec3) {
        let dx = new_position.x - self.position.x;
        let dz = new_position.z - self.position.z;
        if dx != 0.0 || dz != 0.0 {
            self.rotation.y = utils::normalize_angle(dz.atan2(dx));
        }
        self.set_position(new_position);
    }

    /// Move to `new_position` without touching orientation
    pub fn set_position(&mut self, new_position: Vec3) {
        self.previous_position = self.position;
        self.position = new_position;
    }

    /// Model matrix: translate, then rotate X, Y, Z, then scale.
    ///
    /// Rotation pivots on the entity's own origin.
    pub fn world_matrix(&self) -> Mat4 {
        Mat4::identity()
            .translated(&self.position)
            .rotated_x(self.rotation.x)
            .rotated_y(self.rotation.y)
            .rotated_z(self.rotation.z)
            .scaled_by(&self.scale)
    }
}
