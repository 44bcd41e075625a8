//! Scene state
//!
//! Entities grouped by category, and the store that owns them for the
//! lifetime of a viewing session.

pub mod category;
pub mod entity;
pub mod store;

pub use category::{Category, CategoryStyle, CategoryStyles, ColorPolicy, ReconcilePolicy};
pub use entity::{Entity, EntityId, Rgba, WHITE};
pub use store::{EntityCollection, SceneBounds, SceneStore};
