//! Asset loading

pub mod obj_loader;

pub use obj_loader::{ObjError, ObjLoader};

use crate::render::Mesh;

/// Load a model, falling back to a unit cube when it is missing or unreadable
pub fn load_mesh_or_cube(path: Option<&str>) -> Mesh {
    let Some(path) = path else {
        return Mesh::cube();
    };
    match ObjLoader::load_obj(path) {
        Ok(mesh) => {
            log::info!("Loaded model {} ({} triangles)", path, mesh.triangle_count());
            mesh
        }
        Err(e) => {
            log::warn!("Failed to load model {}: {}, using cube", path, e);
            Mesh::cube()
        }
    }
}
