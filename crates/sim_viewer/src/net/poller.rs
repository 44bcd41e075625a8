//! One poll-and-reconcile cycle
//!
//! Runs as a local task beside the render loop. The scene is only borrowed
//! between awaits, so a frame never observes a half-applied snapshot.

use std::cell::RefCell;

use crate::scene::{Category, SceneStore};
use crate::sync::{decode_records, reconcile, ReconcileStats};

use super::client::SimulationService;

/// Result of a poll cycle
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PollOutcome {
    /// Whether the advance request failed and the cycle was skipped
    pub skipped: bool,
    /// Categories reconciled, with what changed
    pub reconciled: Vec<(Category, ReconcileStats)>,
    /// Categories whose fetch failed
    pub failed: Vec<Category>,
    /// Records dropped as malformed
    pub rejected_records: usize,
}

/// Optionally advance the simulation, then fetch and reconcile every category.
///
/// A failed advance skips the whole cycle. A failed fetch leaves only that
/// category's collection unchanged.
pub async fn poll_cycle<S>(service: &S, scene: &RefCell<SceneStore>, advance: bool) -> PollOutcome
where
    S: SimulationService + ?Sized,
{
    let mut outcome = PollOutcome::default();

    if advance {
        match service.advance().await {
            Ok(response) => scene.borrow_mut().record_arrivals(response.total_arrived),
            Err(e) => {
                log::warn!("Advance failed, skipping poll cycle: {}", e);
                outcome.skipped = true;
                return outcome;
            }
        }
    }

    for category in Category::ALL {
        let snapshot = match service.fetch_snapshot(category).await {
            Ok(snapshot) => snapshot,
            Err(e) => {
                log::warn!("Fetching {} failed: {}", category, e);
                outcome.failed.push(category);
                continue;
            }
        };

        let (records, errors) = decode_records(snapshot.positions);
        for error in &errors {
            log::warn!("Dropping {} record: {}", category, error);
        }
        outcome.rejected_records += errors.len();

        let mut scene = scene.borrow_mut();
        let style = scene.styles.get(category).clone();
        let stats = reconcile(scene.collection_mut(category), &records, &style);
        log::trace!(
            "Reconciled {}: {} created, {} updated, {} removed",
            category,
            stats.created,
            stats.updated,
            stats.removed
        );
        outcome.reconciled.push((category, stats));
    }

    log::debug!(
        "Poll cycle done: {} categories reconciled, {} failed",
        outcome.reconciled.len(),
        outcome.failed.len()
    );
    outcome
}
