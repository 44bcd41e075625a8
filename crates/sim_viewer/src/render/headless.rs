//! Headless backend
//!
//! Implements the whole draw-call contract without a GPU. Geometry is kept in
//! memory, draws are validated against it and counted.

use std::collections::HashMap;

use crate::render::backend::{BackendResult, ClearFlags, GeometryHandle, RenderBackend, RenderError};
use crate::render::camera::Viewport;
use crate::render::mesh::Mesh;
use crate::render::uniforms::UniformSet;
use crate::scene::Rgba;

/// Counters for the frame in progress and the session
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct HeadlessStats {
    /// Frames presented
    pub frames_presented: u64,
    /// Draw calls in the current frame
    pub draws_this_frame: u64,
    /// Triangles submitted in the current frame
    pub triangles_this_frame: u64,
    /// Draw calls over the session
    pub total_draws: u64,
}

/// Backend that renders nowhere
#[derive(Debug)]
pub struct HeadlessBackend {
    viewport: Viewport,
    geometries: HashMap<GeometryHandle, Mesh>,
    next_handle: u64,
    bound: Option<GeometryHandle>,
    stats: HeadlessStats,
}

impl HeadlessBackend {
    /// Create a backend with a fixed surface size
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            viewport: Viewport::new(width, height),
            geometries: HashMap::new(),
            next_handle: 1,
            bound: None,
            stats: HeadlessStats::default(),
        }
    }

    /// Current counters
    pub fn stats(&self) -> HeadlessStats {
        self.stats
    }

    /// Number of uploaded geometries
    pub fn geometry_count(&self) -> usize {
        self.geometries.len()
    }
}

impl RenderBackend for HeadlessBackend {
    fn resize_to_display(&mut self) -> Viewport {
        self.viewport
    }

    fn clear(&mut self, flags: ClearFlags, _color: Rgba) {
        if flags.contains(ClearFlags::COLOR) {
            self.stats.draws_this_frame = 0;
            self.stats.triangles_this_frame = 0;
        }
    }

    fn create_geometry(&mut self, mesh: &Mesh) -> BackendResult<GeometryHandle> {
        if !mesh.is_valid() {
            return Err(RenderError::Backend("mesh indices out of range".to_string()));
        }
        let handle = GeometryHandle(self.next_handle);
        self.next_handle += 1;
        self.geometries.insert(handle, mesh.clone());
        log::debug!(
            "Created geometry {:?}: {} vertices, {} triangles",
            handle,
            mesh.vertices.len(),
            mesh.triangle_count()
        );
        Ok(handle)
    }

    fn bind_geometry(&mut self, handle: GeometryHandle) -> BackendResult<()> {
        if !self.geometries.contains_key(&handle) {
            return Err(RenderError::UnknownGeometry(handle));
        }
        self.bound = Some(handle);
        Ok(())
    }

    fn draw(&mut self, uniforms: &UniformSet) -> BackendResult<()> {
        let handle = self
            .bound
            .ok_or_else(|| RenderError::Backend("draw without bound geometry".to_string()))?;
        let mesh = self
            .geometries
            .get(&handle)
            .ok_or(RenderError::UnknownGeometry(handle))?;
        if !uniforms.world_view_projection.iter().all(|v| v.is_finite()) {
            return Err(RenderError::Backend("non-finite transform".to_string()));
        }

        self.stats.draws_this_frame += 1;
        self.stats.total_draws += 1;
        self.stats.triangles_this_frame += mesh.triangle_count() as u64;
        Ok(())
    }

    fn present(&mut self) -> BackendResult<()> {
        self.stats.frames_presented += 1;
        log::trace!(
            "Presented frame {}: {} draws, {} triangles",
            self.stats.frames_presented,
            self.stats.draws_this_frame,
            self.stats.triangles_this_frame
        );
        Ok(())
    }
}
