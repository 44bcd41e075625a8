//! Scene store
//!
//! Session-wide state: one entity collection per category plus the camera,
//! light and material settings shared by every draw call.

use std::collections::HashMap;

use crate::config::ViewerConfig;
use crate::foundation::math::Vec3;
use crate::render::camera::Camera;
use crate::render::lighting::DirectionalLight;
use crate::render::material::MaterialConstants;

use super::category::{Category, CategoryStyles};
use super::entity::{Entity, EntityId};

/// Range of the interactive camera controls on every axis
pub const CAMERA_OFFSET_LIMIT: f32 = 50.0;

/// Entities of one category, in insertion order, indexed by id
#[derive(Debug, Clone, Default)]
pub struct EntityCollection {
    entities: Vec<Entity>,
    index: HashMap<EntityId, usize>,
}

impl EntityCollection {
    /// Create an empty collection
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of resident entities
    pub fn len(&self) -> usize {
        self.entities.len()
    }

    /// Whether the collection holds no entities
    pub fn is_empty(&self) -> bool {
        self.entities.is_empty()
    }

    /// Iterate over resident entities
    pub fn iter(&self) -> impl Iterator<Item = &Entity> {
        self.entities.iter()
    }

    /// Look up an entity by id
    pub fn get(&self, id: &EntityId) -> Option<&Entity> {
        self.index.get(id).map(|&slot| &self.entities[slot])
    }

    /// Look up an entity by id for mutation
    pub fn get_mut(&mut self, id: &EntityId) -> Option<&mut Entity> {
        match self.index.get(id) {
            Some(&slot) => self.entities.get_mut(slot),
            None => None,
        }
    }

    /// Whether an entity with `id` is resident
    pub fn contains(&self, id: &EntityId) -> bool {
        self.index.contains_key(id)
    }

    /// Insert an entity, replacing any resident entity with the same id in place.
    ///
    /// Returns the replaced entity.
    pub fn insert(&mut self, entity: Entity) -> Option<Entity> {
        if let Some(&slot) = self.index.get(entity.id()) {
            return Some(std::mem::replace(&mut self.entities[slot], entity));
        }
        self.index.insert(entity.id().clone(), self.entities.len());
        self.entities.push(entity);
        None
    }

    /// Remove the entity with `id`
    pub fn remove(&mut self, id: &EntityId) -> Option<Entity> {
        let slot = self.index.remove(id)?;
        let removed = self.entities.swap_remove(slot);
        if let Some(moved) = self.entities.get(slot) {
            self.index.insert(moved.id().clone(), slot);
        }
        Some(removed)
    }

    /// Remove every entity
    pub fn clear(&mut self) {
        self.entities.clear();
        self.index.clear();
    }

    /// Ids of resident entities, in storage order
    pub fn ids(&self) -> impl Iterator<Item = &EntityId> {
        self.entities.iter().map(Entity::id)
    }
}

impl<'a> IntoIterator for &'a EntityCollection {
    type Item = &'a Entity;
    type IntoIter = std::slice::Iter<'a, Entity>;

    fn into_iter(self) -> Self::IntoIter {
        self.entities.iter()
    }
}

/// Horizontal extent of the simulated area
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SceneBounds {
    /// Extent along X
    pub width: f32,
    /// Extent along Z
    pub depth: f32,
}

impl SceneBounds {
    /// Center of the area on the ground plane
    pub fn center(&self) -> Vec3 {
        Vec3::new(self.width * 0.5, 0.0, self.depth * 0.5)
    }
}

/// Everything the renderer reads and the poller writes
#[derive(Debug, Clone)]
pub struct SceneStore {
    collections: [EntityCollection; 4],

    /// Look-at camera, offset relative to the scene center
    pub camera: Camera,

    /// Scene light
    pub light: DirectionalLight,

    /// Material constants shared by every entity
    pub material: MaterialConstants,

    /// Per-category presentation and reconciliation settings
    pub styles: CategoryStyles,

    bounds: SceneBounds,
    total_arrived: Option<u64>,
}

impl SceneStore {
    /// Create an empty scene from configuration
    pub fn new(config: &ViewerConfig) -> Self {
        Self {
            collections: Default::default(),
            camera: config.camera.clone(),
            light: config.light.clone(),
            material: config.material.clone(),
            styles: config.categories.clone(),
            bounds: SceneBounds {
                width: config.service.width,
                depth: config.service.height,
            },
            total_arrived: None,
        }
    }

    /// Entities of `category`
    pub fn collection(&self, category: Category) -> &EntityCollection {
        &self.collections[category.index()]
    }

    /// Entities of `category` for mutation
    pub fn collection_mut(&mut self, category: Category) -> &mut EntityCollection {
        &mut self.collections[category.index()]
    }

    /// Total entity count over all categories
    pub fn entity_count(&self) -> usize {
        self.collections.iter().map(EntityCollection::len).sum()
    }

    /// Simulated area extent
    pub fn bounds(&self) -> SceneBounds {
        self.bounds
    }

    /// Replace the simulated area extent, typically with the service's answer to init
    pub fn set_bounds(&mut self, width: f32, depth: f32) {
        self.bounds = SceneBounds { width, depth };
    }

    /// Move the camera, clamping each axis to the control range
    pub fn set_camera_offset(&mut self, offset: Vec3) {
        let clamped = offset.map(|v| v.clamp(-CAMERA_OFFSET_LIMIT, CAMERA_OFFSET_LIMIT));
        self.camera.offset = clamped.into();
    }

    /// Record the service's arrival counter
    pub fn record_arrivals(&mut self, total_arrived: u64) {
        self.total_arrived = Some(total_arrived);
    }

    /// Last arrival counter reported by the service
    pub fn total_arrived(&self) -> Option<u64> {
        self.total_arrived
    }
}
