//! Snapshot reconciliation
//!
//! Merges one category's snapshot into its resident collection by id. The
//! same routine serves every category; the style decides whether the
//! snapshot is authoritative, how entities are colored and whether motion
//! turns them.

use crate::foundation::math::Vec3;
use crate::scene::{CategoryStyle, Entity, EntityCollection, ReconcilePolicy};

use super::snapshot::EntityRecord;

/// What a reconciliation changed
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ReconcileStats {
    /// Entities seen for the first time
    pub created: usize,
    /// Resident entities moved by the snapshot
    pub updated: usize,
    /// Entities dropped because the snapshot no longer lists them
    pub removed: usize,
}

/// Apply `records` to `collection` under `style`.
///
/// Under [`ReconcilePolicy::Replace`] the result holds exactly the ids in
/// `records`; entities that survive keep their color and heading. Under
/// [`ReconcilePolicy::Merge`] ids absent from `records` are left untouched.
/// A repeated id within one snapshot updates the same entity, so the last
/// record wins.
pub fn reconcile(
    collection: &mut EntityCollection,
    records: &[EntityRecord],
    style: &CategoryStyle,
) -> ReconcileStats {
    let mut stats = ReconcileStats::default();
    let mut retired = match style.reconcile {
        ReconcilePolicy::Merge => EntityCollection::new(),
        ReconcilePolicy::Replace => std::mem::take(collection),
    };

    for record in records {
        if let Some(entity) = collection.get_mut(&record.id) {
            update_entity(entity, record, style);
            stats.updated += 1;
        } else if let Some(mut entity) = retired.remove(&record.id) {
            update_entity(&mut entity, record, style);
            collection.insert(entity);
            stats.updated += 1;
        } else {
            collection.insert(spawn_entity(record, style));
            stats.created += 1;
        }
    }

    stats.removed = retired.len();
    stats
}

fn update_entity(entity: &mut Entity, record: &EntityRecord, style: &CategoryStyle) {
    if style.derive_heading {
        entity.apply_motion(record.position);
    } else {
        entity.set_position(record.position);
    }
    if let Some(color) = style.color.updated_color(record.state) {
        entity.color = color;
    }
}

fn spawn_entity(record: &EntityRecord, style: &CategoryStyle) -> Entity {
    Entity::new(record.id.clone(), record.position)
        .with_rotation(Vec3::from(style.rotation))
        .with_scale(Vec3::from(style.scale))
        .with_color(style.color.initial_color(record.state))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scene::category::{signal_color, ColorPolicy};
    use crate::scene::{Category, CategoryStyles, EntityId};
    use std::collections::HashSet;

    fn style(category: Category) -> CategoryStyle {
        CategoryStyles::default().get(category).clone()
    }

    fn records(ids: &[&str]) -> Vec<EntityRecord> {
        ids.iter()
            .enumerate()
            .map(|(i, id)| EntityRecord::new(*id, i as f32, 0.0, 0.0))
            .collect()
    }

    fn assert_unique_ids(collection: &EntityCollection) {
        let ids: HashSet<_> = collection.ids().collect();
        assert_eq!(ids.len(), collection.len());
    }

    #[test]
    fn test_empty_collection_gets_one_entity_per_record() {
        let mut collection = EntityCollection::new();
        let stats = reconcile(&mut collection, &records(&["a", "b", "c"]), &style(Category::Obstacles));

        assert_eq!(stats, ReconcileStats { created: 3, updated: 0, removed: 0 });
        assert_eq!(collection.len(), 3);
        for id in ["a", "b", "c"] {
            assert!(collection.contains(&EntityId::from(id)));
        }
    }

    #[test]
    fn test_new_id_inserts_exactly_one_entity() {
        let agents = style(Category::Agents);
        let mut collection = EntityCollection::new();
        reconcile(&mut collection, &records(&["a", "b"]), &agents);
        let before: Vec<Entity> = collection.iter().cloned().collect();

        let mut next = records(&["a", "b"]);
        next.push(EntityRecord::new("c", 9.0, 0.0, 9.0));
        let stats = reconcile(&mut collection, &next, &agents);

        assert_eq!(stats.created, 1);
        assert_eq!(collection.len(), 3);
        for old in &before {
            let current = collection.get(old.id()).expect("still resident");
            assert_eq!(current.position, old.position);
            assert_eq!(current.color, old.color);
        }
    }

    #[test]
    fn test_replace_drops_omitted_ids() {
        let signals = style(Category::Signals);
        let mut collection = EntityCollection::new();
        reconcile(&mut collection, &records(&["n", "s", "e"]), &signals);

        let stats = reconcile(&mut collection, &records(&["n", "e"]), &signals);
        assert_eq!(stats.removed, 1);
        assert_eq!(collection.len(), 2);
        assert!(!collection.contains(&EntityId::from("s")));
    }

    #[test]
    fn test_merge_keeps_omitted_ids_unchanged() {
        let agents = style(Category::Agents);
        let mut collection = EntityCollection::new();
        reconcile(&mut collection, &records(&["a", "b"]), &agents);
        let stale = collection.get(&EntityId::from("b")).cloned().expect("resident");

        let stats = reconcile(&mut collection, &[EntityRecord::new("a", 4.0, 0.0, 4.0)], &agents);
        assert_eq!(stats.removed, 0);
        assert_eq!(collection.len(), 2);
        assert_eq!(collection.get(&EntityId::from("b")), Some(&stale));
    }

    #[test]
    fn test_agents_turn_towards_motion() {
        let agents = style(Category::Agents);
        let mut collection = EntityCollection::new();
        reconcile(&mut collection, &[EntityRecord::new("a", 0.0, 0.0, 0.0)], &agents);
        reconcile(&mut collection, &[EntityRecord::new("a", 0.0, 0.0, -3.0)], &agents);

        let agent = collection.get(&EntityId::from("a")).expect("resident");
        approx::assert_relative_eq!(agent.yaw(), -std::f32::consts::FRAC_PI_2, epsilon = 1e-5);
        assert_eq!(agent.previous_position(), Vec3::zeros());
    }

    #[test]
    fn test_static_categories_keep_heading() {
        let obstacles = style(Category::Obstacles);
        let mut collection = EntityCollection::new();
        reconcile(&mut collection, &[EntityRecord::new("o", 0.0, 0.0, 0.0)], &obstacles);
        reconcile(&mut collection, &[EntityRecord::new("o", 3.0, 0.0, 3.0)], &obstacles);

        let obstacle = collection.get(&EntityId::from("o")).expect("resident");
        assert_eq!(obstacle.yaw(), 0.0);
        assert_eq!(obstacle.position, Vec3::new(3.0, 0.0, 3.0));
    }

    #[test]
    fn test_signal_color_follows_state() {
        let signals = style(Category::Signals);
        let mut collection = EntityCollection::new();
        reconcile(&mut collection, &[EntityRecord::new("t", 0.0, 0.0, 0.0).with_state(true)], &signals);
        assert_eq!(collection.get(&EntityId::from("t")).map(|e| e.color), Some(signal_color(Some(true))));

        reconcile(&mut collection, &[EntityRecord::new("t", 0.0, 0.0, 0.0).with_state(false)], &signals);
        assert_eq!(collection.get(&EntityId::from("t")).map(|e| e.color), Some(signal_color(Some(false))));
    }

    #[test]
    fn test_random_color_is_kept_across_updates() {
        let agents = style(Category::Agents);
        assert_eq!(agents.color, ColorPolicy::Random);
        let mut collection = EntityCollection::new();
        reconcile(&mut collection, &[EntityRecord::new("a", 0.0, 0.0, 0.0)], &agents);
        let color = collection.get(&EntityId::from("a")).map(|e| e.color);

        reconcile(&mut collection, &[EntityRecord::new("a", 1.0, 0.0, 0.0)], &agents);
        assert_eq!(collection.get(&EntityId::from("a")).map(|e| e.color), color);
    }

    #[test]
    fn test_duplicate_ids_resolve_to_last_record() {
        for category in Category::ALL {
            let mut collection = EntityCollection::new();
            let snapshot = [
                EntityRecord::new("dup", 1.0, 0.0, 0.0),
                EntityRecord::new("dup", 2.0, 0.0, 0.0),
            ];
            reconcile(&mut collection, &snapshot, &style(category));
            assert_eq!(collection.len(), 1);
            assert_eq!(collection.get(&EntityId::from("dup")).map(|e| e.position.x), Some(2.0));
        }
    }

    #[test]
    fn test_ids_stay_unique_across_reconciliations() {
        let sequence: [&[&str]; 4] = [&["a", "b"], &["b", "c", "c"], &[], &["a", "d", "a"]];
        for category in Category::ALL {
            let style = style(category);
            let mut collection = EntityCollection::new();
            for ids in sequence {
                reconcile(&mut collection, &records(ids), &style);
                assert_unique_ids(&collection);
            }
        }
    }

    #[test]
    fn test_replace_converges_regardless_of_order() {
        let obstacles = style(Category::Obstacles);
        let first = records(&["a", "b"]);
        let second = records(&["b", "c"]);

        let mut forward = EntityCollection::new();
        reconcile(&mut forward, &first, &obstacles);
        reconcile(&mut forward, &second, &obstacles);

        let mut direct = EntityCollection::new();
        reconcile(&mut direct, &second, &obstacles);

        let mut forward_ids: Vec<_> = forward.ids().cloned().collect();
        let mut direct_ids: Vec<_> = direct.ids().cloned().collect();
        forward_ids.sort();
        direct_ids.sort();
        assert_eq!(forward_ids, direct_ids);
    }
}
