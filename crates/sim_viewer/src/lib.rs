//! # Sim Viewer
//!
//! Real-time 3D viewer for a remote agent-based traffic simulation.
//!
//! ## Features
//!
//! - **Snapshot Sync**: Entity collections reconciled by id, per-category merge or replace
//! - **Motion Heading**: Vehicles turn to face the direction they move
//! - **Transform Pipeline**: Per-entity model, normal and view-projection matrices with Phong uniforms
//! - **Decoupled Polling**: The render loop starts a poll every N frames and never waits for it
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use sim_viewer::prelude::*;
//!
//! #[tokio::main(flavor = "current_thread")]
//! async fn main() -> Result<(), ViewerError> {
//!     let config = ViewerConfig::default();
//!     let service = HttpSimulationClient::new(config.service.clone());
//!     let backend = HeadlessBackend::new(1280, 720);
//!     let viewer = Viewer::new(config, service, backend)?;
//!     run_viewer(viewer, None).await
//! }
//! ```

#![warn(missing_docs)]
#![warn(clippy::all, clippy::pedantic, clippy::nursery)]
#![allow(clippy::module_name_repetitions, clippy::similar_names, clippy::too_many_arguments)]

pub mod assets;
pub mod config;
pub mod driver;
pub mod foundation;
pub mod net;
pub mod render;
pub mod scene;
pub mod sync;

#[cfg(test)]
mod tests;

/// Common imports for viewer users
pub mod prelude {
    pub use crate::{
        config::{Config, ConfigError, ViewerConfig},
        driver::{run_viewer, FrameReport, PollScheduler, RenderLoop, Viewer, ViewerError},
        foundation::math::{Mat4, Mat4Ext, Vec3, Vec4},
        net::{poll_cycle, HttpSimulationClient, ServiceError, SimulationService},
        render::{
            build_uniforms, setup_world_view, Camera, DirectionalLight, HeadlessBackend,
            MaterialConstants, Mesh, RenderBackend, UniformSet, Viewport,
        },
        scene::{Category, Entity, EntityId, ReconcilePolicy, SceneStore},
        sync::{reconcile, EntityRecord},
    };
}
