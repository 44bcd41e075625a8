//! End-to-end viewer tests
//!
//! A scripted simulation feeds a viewer that draws into a recording backend,
//! covering handshake, initial population, per-frame uniforms and background
//! polling.

use std::cell::Cell;
use std::rc::Rc;

use approx::assert_relative_eq;
use reqwest::StatusCode;
use serde_json::json;
use tokio::task::LocalSet;

use crate::config::ViewerConfig;
use crate::driver::{run_viewer, Viewer};
use crate::foundation::math::{constants::PI, Vec4};
use crate::net::{ServiceError, SimulationService};
use crate::render::{
    setup_world_view, BackendResult, ClearFlags, GeometryHandle, Mesh, RenderBackend, RenderError,
    UniformSet, Viewport,
};
use crate::scene::category::{SIGNAL_GREEN, SIGNAL_RED};
use crate::scene::{Category, EntityId, Rgba, SceneBounds};
use crate::sync::{AdvanceResponse, InitRequest, InitResponse, SnapshotResponse};

const VIEWPORT: Viewport = Viewport::new(800, 600);

/// Simulation where one car drives along +Z and the signal toggles every step
struct ScriptedSimulation {
    step: Rc<Cell<u32>>,
    fail_init: bool,
    failing: Option<Category>,
}

impl ScriptedSimulation {
    fn new(step: Rc<Cell<u32>>) -> Self {
        Self {
            step,
            fail_init: false,
            failing: None,
        }
    }

    fn unavailable(endpoint: &str) -> ServiceError {
        ServiceError::Status {
            endpoint: endpoint.to_string(),
            status: StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl SimulationService for ScriptedSimulation {
    async fn initialize(&self, _request: &InitRequest) -> Result<InitResponse, ServiceError> {
        if self.fail_init {
            return Err(Self::unavailable("init"));
        }
        Ok(InitResponse { width: 40.0, height: 20.0 })
    }

    async fn fetch_snapshot(&self, category: Category) -> Result<SnapshotResponse, ServiceError> {
        if self.failing == Some(category) {
            return Err(Self::unavailable(category.name()));
        }
        let step = self.step.get();
        let positions = match category {
            Category::Agents => vec![json!({"id": "car", "x": 5.0, "y": 0.0, "z": step})],
            Category::Obstacles => vec![
                json!({"id": "o1", "x": 1.0, "y": 0.0, "z": 1.0}),
                json!({"id": "o2", "x": 2.0, "y": 0.0, "z": 2.0}),
            ],
            Category::Destinations => vec![json!({"id": "d", "x": 3.0, "y": 0.0, "z": 3.0})],
            Category::Signals => {
                vec![json!({"id": "t", "x": 4.0, "y": 0.0, "z": 4.0, "state": step % 2 == 0})]
            }
        };
        Ok(SnapshotResponse { positions })
    }

    async fn advance(&self) -> Result<AdvanceResponse, ServiceError> {
        self.step.set(self.step.get() + 1);
        Ok(AdvanceResponse { total_arrived: u64::from(self.step.get()) })
    }
}

/// Backend keeping every draw for inspection
#[derive(Default)]
struct RecordingBackend {
    next_handle: u64,
    bound: Option<GeometryHandle>,
    draws: Vec<(GeometryHandle, UniformSet)>,
    clears: usize,
    presented: usize,
}

impl RenderBackend for RecordingBackend {
    fn resize_to_display(&mut self) -> Viewport {
        VIEWPORT
    }

    fn clear(&mut self, flags: ClearFlags, _color: Rgba) {
        assert!(flags.contains(ClearFlags::COLOR | ClearFlags::DEPTH));
        self.clears += 1;
    }

    fn create_geometry(&mut self, _mesh: &Mesh) -> BackendResult<GeometryHandle> {
        self.next_handle += 1;
        Ok(GeometryHandle(self.next_handle))
    }

    fn bind_geometry(&mut self, handle: GeometryHandle) -> BackendResult<()> {
        self.bound = Some(handle);
        Ok(())
    }

    fn draw(&mut self, uniforms: &UniformSet) -> BackendResult<()> {
        let handle = self
            .bound
            .ok_or_else(|| RenderError::Backend("nothing bound".to_string()))?;
        self.draws.push((handle, uniforms.clone()));
        Ok(())
    }

    fn present(&mut self) -> BackendResult<()> {
        self.presented += 1;
        Ok(())
    }
}

fn config() -> ViewerConfig {
    let mut config = ViewerConfig::default();
    config.engine.target_fps = 1000;
    config.categories.agents.model_path = None;
    config.categories.obstacles.model_path = None;
    config.categories.destinations.model_path = None;
    config.categories.signals.model_path = None;
    config
}

/// Let spawned poll tasks run to completion
async fn settle<S, B>(viewer: &Viewer<S, B>)
where
    S: SimulationService + 'static,
    B: RenderBackend,
{
    for _ in 0..16 {
        if viewer.polls_in_flight() == 0 {
            return;
        }
        tokio::task::yield_now().await;
    }
}

#[tokio::test]
async fn test_frames_draw_resident_scene_and_poll_in_background() {
    let step = Rc::new(Cell::new(0));
    let simulation = ScriptedSimulation::new(Rc::clone(&step));
    let mut viewer = Viewer::new(config(), simulation, RecordingBackend::default()).expect("valid config");
    viewer.load_geometry().expect("geometry uploads");
    let scene = viewer.scene();

    LocalSet::new()
        .run_until(async move {
            viewer.initialize().await;
            {
                let scene = scene.borrow();
                assert_eq!(scene.bounds(), SceneBounds { width: 40.0, depth: 20.0 });
                assert_eq!(scene.entity_count(), 5);
            }

            let first = viewer.frame();
            assert_eq!(first.draw_calls, 5);
            assert_eq!(viewer.backend().clears, 1);
            {
                let scene = scene.borrow();
                let car = scene
                    .collection(Category::Agents)
                    .get(&EntityId::from("car"))
                    .expect("car resident");
                let (_, uniforms) = &viewer.backend().draws[0];
                let view_projection = setup_world_view(&scene.camera, &scene.bounds(), &VIEWPORT);

                assert_eq!(uniforms.world, car.world_matrix());
                assert_eq!(uniforms.diffuse_color, Vec4::from(car.color));
                assert_relative_eq!(
                    uniforms.world_view_projection,
                    view_projection * car.world_matrix(),
                    epsilon = 1e-4
                );
            }

            for _ in 2..30 {
                assert!(!viewer.frame().poll_triggered);
            }
            assert!(viewer.frame().poll_triggered);
            assert_eq!(viewer.polls_in_flight(), 1);
            assert_eq!(step.get(), 0, "frame must not wait for the poll");

            settle(&viewer).await;
            assert_eq!(viewer.polls_in_flight(), 0);
            assert_eq!(step.get(), 1);

            let scene = scene.borrow();
            let car = scene
                .collection(Category::Agents)
                .get(&EntityId::from("car"))
                .expect("car resident");
            assert_eq!(car.position.z, 1.0);
            assert_relative_eq!(car.yaw(), PI / 2.0, epsilon = 1e-5);
            assert_eq!(scene.total_arrived(), Some(1));

            let signal = scene
                .collection(Category::Signals)
                .get(&EntityId::from("t"))
                .expect("signal resident");
            assert_eq!(signal.color, SIGNAL_RED);
        })
        .await;
}

#[tokio::test]
async fn test_failures_degrade_to_stale_state() {
    let simulation = ScriptedSimulation {
        fail_init: true,
        failing: Some(Category::Destinations),
        ..ScriptedSimulation::new(Rc::new(Cell::new(0)))
    };
    let mut viewer = Viewer::new(config(), simulation, RecordingBackend::default()).expect("valid config");
    viewer.load_geometry().expect("geometry uploads");
    let scene = viewer.scene();

    LocalSet::new()
        .run_until(async move {
            viewer.initialize().await;
            {
                let scene = scene.borrow();
                assert_eq!(scene.bounds(), SceneBounds { width: 100.0, depth: 100.0 });
                assert!(scene.collection(Category::Destinations).is_empty());
                assert_eq!(scene.entity_count(), 4);
                let signal = scene
                    .collection(Category::Signals)
                    .get(&EntityId::from("t"))
                    .expect("signal resident");
                assert_eq!(signal.color, SIGNAL_GREEN);
            }

            let report = viewer.frame();
            assert_eq!(report.draw_calls, 4);
            assert_eq!(report.backend_errors, 0);
        })
        .await;
}

#[tokio::test]
async fn test_run_viewer_stops_at_frame_limit() {
    let step = Rc::new(Cell::new(0));
    let simulation = ScriptedSimulation::new(Rc::clone(&step));
    let viewer = Viewer::new(config(), simulation, RecordingBackend::default()).expect("valid config");
    let scene = viewer.scene();

    run_viewer(viewer, Some(31)).await.expect("viewer runs");

    assert!(step.get() >= 1);
    assert_eq!(scene.borrow().entity_count(), 5);
}

#[test]
fn test_invalid_config_is_rejected() {
    let mut config = config();
    config.render.poll_every_frames = 0;
    let result = Viewer::new(config, ScriptedSimulation::new(Rc::new(Cell::new(0))), RecordingBackend::default());
    assert!(result.is_err());
}
