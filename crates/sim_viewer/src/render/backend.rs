//! Backend abstraction for the rendering system
//!
//! The render loop speaks only to this trait: geometry is registered once and
//! referred to by handle, and every draw call carries a full uniform set.

use bitflags::bitflags;

use crate::render::camera::Viewport;
use crate::render::mesh::Mesh;
use crate::render::uniforms::UniformSet;
use crate::scene::Rgba;

/// Result type for backend operations
pub type BackendResult<T> = Result<T, RenderError>;

/// Rendering errors
#[derive(thiserror::Error, Debug)]
pub enum RenderError {
    /// Backend-specific failure
    #[error("Backend error: {0}")]
    Backend(String),

    /// Handle that was never created by this backend
    #[error("Unknown geometry handle: {0:?}")]
    UnknownGeometry(GeometryHandle),
}

bitflags! {
    /// Buffers cleared at the start of a frame
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub struct ClearFlags: u32 {
        /// Color buffer
        const COLOR = 0b01;
        /// Depth buffer
        const DEPTH = 0b10;
    }
}

/// Opaque reference to geometry uploaded to a backend
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct GeometryHandle(pub u64);

/// Retained-mode draw-call backend
pub trait RenderBackend {
    /// Match the drawable surface to the display and return its size
    fn resize_to_display(&mut self) -> Viewport;

    /// Clear the selected buffers
    fn clear(&mut self, flags: ClearFlags, color: Rgba);

    /// Upload geometry, returning a handle for later binds
    fn create_geometry(&mut self, mesh: &Mesh) -> BackendResult<GeometryHandle>;

    /// Make `handle` the geometry used by subsequent draws
    fn bind_geometry(&mut self, handle: GeometryHandle) -> BackendResult<()>;

    /// Draw the bound geometry once with `uniforms`
    fn draw(&mut self, uniforms: &UniformSet) -> BackendResult<()>;

    /// Finish the frame
    fn present(&mut self) -> BackendResult<()>;
}
