//! Entity categories and their per-category policies
//!
//! Each category carries a style: how its entities look, whether their
//! heading follows motion, and how a fresh snapshot is merged into the
//! resident collection.

use std::fmt;

use rand::Rng;
use serde::{Deserialize, Serialize};

use super::entity::Rgba;

/// Signal color for a truthy state
pub const SIGNAL_GREEN: Rgba = [0.0, 1.0, 0.0, 1.0];

/// Signal color for a falsy or missing state
pub const SIGNAL_RED: Rgba = [1.0, 0.0, 0.0, 1.0];

/// Kind of simulated object
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Category {
    /// Moving vehicles
    Agents,
    /// Buildings and other blocked cells
    Obstacles,
    /// Cells vehicles drive towards
    Destinations,
    /// Traffic signals
    Signals,
}

impl Category {
    /// Every category in draw order
    pub const ALL: [Self; 4] = [Self::Agents, Self::Obstacles, Self::Destinations, Self::Signals];

    /// Lowercase display name
    pub const fn name(self) -> &'static str {
        match self {
            Self::Agents => "agents",
            Self::Obstacles => "obstacles",
            Self::Destinations => "destinations",
            Self::Signals => "signals",
        }
    }

    /// Position of the category within [`Category::ALL`]
    pub const fn index(self) -> usize {
        self as usize
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// How a snapshot is merged into an existing collection
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReconcilePolicy {
    /// Update and insert by id; entities missing from the snapshot stay resident
    Merge,
    /// The snapshot is authoritative; entities missing from it are dropped
    Replace,
}

/// Where an entity's color comes from
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ColorPolicy {
    /// Same color for every entity of the category
    Fixed {
        /// RGBA color
        color: Rgba,
    },
    /// Random opaque color picked once when the entity is created
    Random,
    /// Green for a truthy remote state, red otherwise; refreshed every update
    SignalState,
}

impl ColorPolicy {
    /// Color for a newly created entity
    pub fn initial_color(&self, state: Option<bool>) -> Rgba {
        match self {
            Self::Fixed { color } => *color,
            Self::Random => {
                let mut rng = rand::thread_rng();
                [rng.gen_range(0.0..1.0), rng.gen_range(0.0..1.0), rng.gen_range(0.0..1.0), 1.0]
            }
            Self::SignalState => signal_color(state),
        }
    }

    /// Color after an update, `None` when the current color stays
    pub fn updated_color(&self, state: Option<bool>) -> Option<Rgba> {
        match self {
            Self::SignalState => Some(signal_color(state)),
            Self::Fixed { .. } | Self::Random => None,
        }
    }
}

/// Map a signal state onto its display color
pub fn signal_color(state: Option<bool>) -> Rgba {
    if state.unwrap_or(false) {
        SIGNAL_GREEN
    } else {
        SIGNAL_RED
    }
}

/// Per-category presentation and reconciliation settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CategoryStyle {
    /// Scale applied to every entity of the category
    pub scale: [f32; 3],
    /// Initial Euler rotation (radians)
    pub rotation: [f32; 3],
    /// Color source
    pub color: ColorPolicy,
    /// Merge behaviour for incoming snapshots
    pub reconcile: ReconcilePolicy,
    /// Whether position updates turn the entity to face its motion
    pub derive_heading: bool,
    /// OBJ model for the category's geometry; a unit cube is used when absent
    pub model_path: Option<String>,
}

impl Default for CategoryStyle {
    fn default() -> Self {
        Self {
            scale: [1.0, 1.0, 1.0],
            rotation: [0.0, 0.0, 0.0],
            color: ColorPolicy::Fixed { color: super::entity::WHITE },
            reconcile: ReconcilePolicy::Replace,
            derive_heading: false,
            model_path: None,
        }
    }
}

/// Styles for all four categories
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CategoryStyles {
    /// Vehicle style
    pub agents: CategoryStyle,
    /// Obstacle style
    pub obstacles: CategoryStyle,
    /// Destination style
    pub destinations: CategoryStyle,
    /// Signal style
    pub signals: CategoryStyle,
}

impl CategoryStyles {
    /// Style for `category`
    pub const fn get(&self, category: Category) -> &CategoryStyle {
        match category {
            Category::Agents => &self.agents,
            Category::Obstacles => &self.obstacles,
            Category::Destinations => &self.destinations,
            Category::Signals => &self.signals,
        }
    }
}

impl Default for CategoryStyles {
    fn default() -> Self {
        Self {
            agents: CategoryStyle {
                color: ColorPolicy::Random,
                reconcile: ReconcilePolicy::Merge,
                derive_heading: true,
                model_path: Some("resources/models/car.obj".to_string()),
                ..CategoryStyle::default()
            },
            obstacles: CategoryStyle {
                color: ColorPolicy::Fixed { color: [0.37, 0.62, 0.63, 1.0] },
                model_path: Some("resources/models/building.obj".to_string()),
                ..CategoryStyle::default()
            },
            destinations: CategoryStyle {
                color: ColorPolicy::Fixed { color: [0.56, 0.93, 0.56, 1.0] },
                model_path: Some("resources/models/destination.obj".to_string()),
                ..CategoryStyle::default()
            },
            signals: CategoryStyle {
                scale: [0.8, 0.8, 0.8],
                color: ColorPolicy::SignalState,
                ..CategoryStyle::default()
            },
        }
    }
}
