//! Per-frame orchestration
//!
//! One call to [`RenderLoop::frame`] draws the resident scene and, on the
//! poll cadence, asks the scheduler to start a poll cycle. The frame never
//! waits for that poll.

use crate::foundation::time::Timer;
use crate::render::{
    build_uniforms, setup_world_view, BackendResult, ClearFlags, GeometryHandle, Mesh,
    RenderBackend,
};
use crate::scene::{Category, Rgba, SceneStore};

/// Starts poll cycles without waiting for them
pub trait PollScheduler {
    /// Begin a poll cycle in the background
    fn schedule_poll(&mut self);
}

/// What one frame did
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FrameReport {
    /// Frame number, starting at 1
    pub frame: u64,
    /// Successful draw calls
    pub draw_calls: usize,
    /// Backend operations that failed this frame
    pub backend_errors: usize,
    /// Whether a poll cycle was requested after this frame
    pub poll_triggered: bool,
}

/// Render loop state
pub struct RenderLoop {
    frame_counter: u64,
    poll_every: u64,
    clear_color: Rgba,
    geometry: [Option<GeometryHandle>; 4],
    timer: Timer,
}

impl RenderLoop {
    /// Create a loop polling every `poll_every` frames
    pub fn new(poll_every: u64, clear_color: Rgba) -> Self {
        Self {
            frame_counter: 0,
            poll_every: poll_every.max(1),
            clear_color,
            geometry: [None; 4],
            timer: Timer::new(),
        }
    }

    /// Use `handle` for every entity of `category`
    pub fn set_geometry(&mut self, category: Category, handle: GeometryHandle) {
        self.geometry[category.index()] = Some(handle);
    }

    /// Upload `mesh` and use it for `category`
    pub fn upload_geometry<B>(&mut self, backend: &mut B, category: Category, mesh: &Mesh) -> BackendResult<()>
    where
        B: RenderBackend + ?Sized,
    {
        let handle = backend.create_geometry(mesh)?;
        self.set_geometry(category, handle);
        Ok(())
    }

    /// Frames rendered so far
    pub fn frame_counter(&self) -> u64 {
        self.frame_counter
    }

    /// Frame timing
    pub fn timer(&self) -> &Timer {
        &self.timer
    }

    /// Render one frame of `scene` and advance the poll cadence
    pub fn frame<B, P>(&mut self, scene: &SceneStore, backend: &mut B, scheduler: &mut P) -> FrameReport
    where
        B: RenderBackend + ?Sized,
        P: PollScheduler + ?Sized,
    {
        let mut report = FrameReport::default();

        let viewport = backend.resize_to_display();
        backend.clear(ClearFlags::COLOR | ClearFlags::DEPTH, self.clear_color);
        let view_projection = setup_world_view(&scene.camera, &scene.bounds(), &viewport);

        for category in Category::ALL {
            let collection = scene.collection(category);
            if collection.is_empty() {
                continue;
            }
            let Some(handle) = self.geometry[category.index()] else {
                log::warn!("No geometry for {}, skipping {} entities", category, collection.len());
                report.backend_errors += 1;
                continue;
            };
            if let Err(e) = backend.bind_geometry(handle) {
                log::warn!("Binding {} geometry failed: {}", category, e);
                report.backend_errors += 1;
                continue;
            }

            for entity in collection {
                let uniforms = build_uniforms(entity, &view_projection, &scene.light, &scene.material);
                match backend.draw(&uniforms) {
                    Ok(()) => report.draw_calls += 1,
                    Err(e) => {
                        log::debug!("Drawing {} {} failed: {}", category, entity.id(), e);
                        report.backend_errors += 1;
                    }
                }
            }
        }

        if let Err(e) = backend.present() {
            log::warn!("Present failed: {}", e);
            report.backend_errors += 1;
        }

        self.timer.update();
        self.frame_counter += 1;
        report.frame = self.frame_counter;
        if self.frame_counter % self.poll_every == 0 {
            scheduler.schedule_poll();
            report.poll_triggered = true;
        }

        if report.backend_errors > 0 {
            log::warn!("Frame {}: {} backend errors", report.frame, report.backend_errors);
        }
        log::trace!(
            "Frame {}: {} draws in {:.2} ms",
            report.frame,
            report.draw_calls,
            self.timer.delta_time() * 1000.0
        );
        report
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ViewerConfig;
    use crate::foundation::math::Vec3;
    use crate::render::HeadlessBackend;
    use crate::scene::{Entity, EntityId};

    #[derive(Default)]
    struct CountingScheduler {
        polls: usize,
    }

    impl PollScheduler for CountingScheduler {
        fn schedule_poll(&mut self) {
            self.polls += 1;
        }
    }

    fn run_frames(count: usize) -> usize {
        let scene = SceneStore::new(&ViewerConfig::default());
        let mut backend = HeadlessBackend::new(320, 240);
        let mut scheduler = CountingScheduler::default();
        let mut render_loop = RenderLoop::new(30, [0.0; 4]);
        for _ in 0..count {
            render_loop.frame(&scene, &mut backend, &mut scheduler);
        }
        scheduler.polls
    }

    #[test]
    fn test_poll_cadence() {
        assert_eq!(run_frames(29), 0);
        assert_eq!(run_frames(30), 1);
        assert_eq!(run_frames(59), 1);
        assert_eq!(run_frames(60), 2);
    }

    fn populated_scene() -> SceneStore {
        let mut scene = SceneStore::new(&ViewerConfig::default());
        for i in 0..3 {
            scene
                .collection_mut(Category::Agents)
                .insert(Entity::new(EntityId::new(format!("a{i}")), Vec3::new(i as f32, 0.0, 0.0)));
        }
        scene
            .collection_mut(Category::Obstacles)
            .insert(Entity::new(EntityId::from("o"), Vec3::new(5.0, 0.0, 5.0)));
        scene
    }

    #[test]
    fn test_one_draw_per_entity() {
        let scene = populated_scene();
        let mut backend = HeadlessBackend::new(320, 240);
        let mut scheduler = CountingScheduler::default();
        let mut render_loop = RenderLoop::new(30, [0.0; 4]);
        for category in Category::ALL {
            render_loop
                .upload_geometry(&mut backend, category, &Mesh::cube())
                .expect("cube uploads");
        }

        let report = render_loop.frame(&scene, &mut backend, &mut scheduler);
        assert_eq!(report.draw_calls, 4);
        assert_eq!(report.backend_errors, 0);
        assert_eq!(report.frame, 1);
        assert!(!report.poll_triggered);
        assert_eq!(backend.stats().frames_presented, 1);
    }

    #[test]
    fn test_missing_geometry_is_not_fatal() {
        let scene = populated_scene();
        let mut backend = HeadlessBackend::new(320, 240);
        let mut scheduler = CountingScheduler::default();
        let mut render_loop = RenderLoop::new(2, [0.0; 4]);
        render_loop
            .upload_geometry(&mut backend, Category::Agents, &Mesh::cube())
            .expect("cube uploads");

        let first = render_loop.frame(&scene, &mut backend, &mut scheduler);
        assert_eq!(first.draw_calls, 3);
        assert_eq!(first.backend_errors, 1);

        let second = render_loop.frame(&scene, &mut backend, &mut scheduler);
        assert!(second.poll_triggered);
        assert_eq!(scheduler.polls, 1);
    }
}
