//! Single-threaded viewer runtime
//!
//! The frame ticker and every poll cycle run as tasks on one `LocalSet`. The
//! scene is shared through `Rc<RefCell<_>>`: a frame borrows it for the
//! duration of a synchronous draw pass, a poll borrows it only while applying
//! a decoded snapshot, and neither holds a borrow across an await.

use std::cell::{Cell, RefCell};
use std::rc::Rc;
use std::time::Duration;

use tokio::task::LocalSet;
use tokio::time::MissedTickBehavior;

use crate::assets;
use crate::config::{ConfigError, ViewerConfig};
use crate::net::{poll_cycle, SimulationService};
use crate::render::{RenderBackend, RenderError};
use crate::scene::{Category, SceneStore};
use crate::sync::InitRequest;

use super::render_loop::{FrameReport, PollScheduler, RenderLoop};

/// Seconds between frame-rate log lines
const FPS_LOG_INTERVAL_SECS: u64 = 5;

/// Top-level viewer errors
#[derive(thiserror::Error, Debug)]
pub enum ViewerError {
    /// Configuration could not be loaded or is invalid
    #[error("Config error: {0}")]
    Config(#[from] ConfigError),

    /// Backend rejected setup work
    #[error("Render error: {0}")]
    Render(#[from] RenderError),

    /// Runtime I/O failure
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Spawns unawaited poll cycles on the current `LocalSet`
struct LocalPollScheduler<S> {
    service: Rc<S>,
    scene: Rc<RefCell<SceneStore>>,
    in_flight: Rc<Cell<usize>>,
    advance: bool,
}

impl<S> PollScheduler for LocalPollScheduler<S>
where
    S: SimulationService + 'static,
{
    fn schedule_poll(&mut self) {
        let pending = self.in_flight.get();
        if pending > 0 {
            log::debug!("Starting poll with {} still in flight", pending);
        }
        self.in_flight.set(pending + 1);

        let service = Rc::clone(&self.service);
        let scene = Rc::clone(&self.scene);
        let in_flight = Rc::clone(&self.in_flight);
        let advance = self.advance;
        tokio::task::spawn_local(async move {
            poll_cycle(service.as_ref(), &scene, advance).await;
            in_flight.set(in_flight.get().saturating_sub(1));
        });
    }
}

/// A viewing session: scene, service, backend and render loop
pub struct Viewer<S, B> {
    config: ViewerConfig,
    service: Rc<S>,
    backend: B,
    scene: Rc<RefCell<SceneStore>>,
    render_loop: RenderLoop,
    in_flight: Rc<Cell<usize>>,
}

impl<S, B> Viewer<S, B>
where
    S: SimulationService + 'static,
    B: RenderBackend,
{
    /// Create a session; validates `config`
    pub fn new(config: ViewerConfig, service: S, backend: B) -> Result<Self, ViewerError> {
        config.validate()?;
        let scene = Rc::new(RefCell::new(SceneStore::new(&config)));
        let render_loop = RenderLoop::new(config.render.poll_every_frames, config.render.clear_color);
        Ok(Self {
            config,
            service: Rc::new(service),
            backend,
            scene,
            render_loop,
            in_flight: Rc::new(Cell::new(0)),
        })
    }

    /// Shared handle to the scene
    pub fn scene(&self) -> Rc<RefCell<SceneStore>> {
        Rc::clone(&self.scene)
    }

    /// The render backend
    pub fn backend(&self) -> &B {
        &self.backend
    }

    /// Poll cycles started but not yet finished
    pub fn polls_in_flight(&self) -> usize {
        self.in_flight.get()
    }

    /// Upload each category's model, substituting a cube for missing ones
    pub fn load_geometry(&mut self) -> Result<(), ViewerError> {
        for category in Category::ALL {
            let model_path = self.config.categories.get(category).model_path.clone();
            let mesh = assets::load_mesh_or_cube(model_path.as_deref());
            self.render_loop.upload_geometry(&mut self.backend, category, &mesh)?;
        }
        Ok(())
    }

    /// Run the initialize handshake, then populate the scene before the first frame.
    ///
    /// A failed handshake keeps the configured bounds; failed fetches leave
    /// their categories empty until a later poll succeeds.
    pub async fn initialize(&mut self) {
        let request = InitRequest {
            agent_count: self.config.service.agent_count,
            width: self.config.service.width,
            height: self.config.service.height,
        };
        match self.service.initialize(&request).await {
            Ok(response) => {
                log::info!("Simulation initialized: {} x {}", response.width, response.height);
                self.scene.borrow_mut().set_bounds(response.width, response.height);
            }
            Err(e) => log::warn!("Initialize failed, keeping configured bounds: {}", e),
        }

        let outcome = poll_cycle(self.service.as_ref(), &self.scene, false).await;
        log::info!(
            "Initial scene: {} entities ({} categories failed)",
            self.scene.borrow().entity_count(),
            outcome.failed.len()
        );
    }

    /// Render one frame. Must run inside a `LocalSet`, which hosts scheduled polls.
    pub fn frame(&mut self) -> FrameReport {
        let mut scheduler = LocalPollScheduler {
            service: Rc::clone(&self.service),
            scene: Rc::clone(&self.scene),
            in_flight: Rc::clone(&self.in_flight),
            advance: self.config.service.advance_on_poll,
        };
        let scene = self.scene.borrow();
        self.render_loop.frame(&scene, &mut self.backend, &mut scheduler)
    }

    /// Drive frames at the configured rate.
    ///
    /// Runs until the task is dropped, or for `frame_limit` frames when given.
    pub async fn run(&mut self, frame_limit: Option<u64>) {
        let fps = u64::from(self.config.engine.target_fps.max(1));
        let mut ticker = tokio::time::interval(Duration::from_secs_f64(1.0 / fps as f64));
        ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);
        log::info!("Render loop started at {} fps", fps);

        loop {
            ticker.tick().await;
            let report = self.frame();

            if report.frame % (fps * FPS_LOG_INTERVAL_SECS) == 0 {
                log::debug!(
                    "Frame {}: {:.1} fps average, {} draws, {} polls in flight",
                    report.frame,
                    self.render_loop.timer().average_fps(),
                    report.draw_calls,
                    self.in_flight.get()
                );
            }
            if frame_limit.is_some_and(|limit| report.frame >= limit) {
                break;
            }
        }
    }
}

/// Initialize `viewer` and run it on a fresh `LocalSet`
pub async fn run_viewer<S, B>(mut viewer: Viewer<S, B>, frame_limit: Option<u64>) -> Result<(), ViewerError>
where
    S: SimulationService + 'static,
    B: RenderBackend,
{
    viewer.load_geometry()?;
    let local = LocalSet::new();
    local
        .run_until(async move {
            viewer.initialize().await;
            viewer.run(frame_limit).await;
        })
        .await;
    Ok(())
}
