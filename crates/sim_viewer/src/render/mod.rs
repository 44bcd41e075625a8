//! Rendering
//!
//! Camera, lighting and per-entity uniforms, plus the backend abstraction the
//! render loop draws through.

pub mod backend;
pub mod camera;
pub mod headless;
pub mod lighting;
pub mod material;
pub mod mesh;
pub mod uniforms;

pub use backend::{BackendResult, ClearFlags, GeometryHandle, RenderBackend, RenderError};
pub use camera::{setup_world_view, Camera, Viewport};
pub use headless::{HeadlessBackend, HeadlessStats};
pub use lighting::DirectionalLight;
pub use material::MaterialConstants;
pub use mesh::{Mesh, Vertex};
pub use uniforms::{build_uniforms, UniformSet, UniformValue};
