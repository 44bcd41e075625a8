//! Wavefront OBJ loader for entity models

use std::path::Path;

use thiserror::Error;

use crate::render::{Mesh, Vertex};

/// OBJ loading errors
#[derive(Error, Debug)]
pub enum ObjError {
    /// File could not be read
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    /// Malformed number or index
    #[error("Parse error on line {line}: {message}")]
    ParseError {
        /// 1-based line number
        line: usize,
        /// What went wrong
        message: String,
    },
    /// Structurally unusable file
    #[error("Invalid format: {0}")]
    InvalidFormat(String),
}

const DEFAULT_NORMAL: [f32; 3] = [0.0, 1.0, 0.0];

/// Loader for the subset of OBJ used by entity models: `v`, `vt`, `vn` and
/// polygonal `f` records. Polygons are fan-triangulated.
pub struct ObjLoader;

impl ObjLoader {
    /// Load an OBJ file and return a mesh
    pub fn load_obj<P: AsRef<Path>>(path: P) -> Result<Mesh, ObjError> {
        let source = std::fs::read_to_string(path)?;
        Self::parse_str(&source)
    }

    /// Parse OBJ text
    pub fn parse_str(source: &str) -> Result<Mesh, ObjError> {
        let mut positions: Vec<[f32; 3]> = Vec::new();
        let mut normals: Vec<[f32; 3]> = Vec::new();
        let mut tex_coords: Vec<[f32; 2]> = Vec::new();
        let mut vertices = Vec::new();
        let mut indices = Vec::new();

        for (line_index, raw_line) in source.lines().enumerate() {
            let line_number = line_index + 1;
            let line = raw_line.trim();
            if line.is_empty() || line.starts_with('#') {
                continue;
            }

            let mut parts = line.split_whitespace();
            let Some(keyword) = parts.next() else {
                continue;
            };
            let args: Vec<&str> = parts.collect();

            match keyword {
                "v" => positions.push(parse_floats::<3>(&args, line_number)?),
                "vn" => normals.push(parse_floats::<3>(&args, line_number)?),
                "vt" => tex_coords.push(parse_floats::<2>(&args, line_number)?),
                "f" => {
                    if args.len() < 3 {
                        return Err(parse_error(line_number, "face needs at least three vertices"));
                    }
                    let first = vertices.len() as u32;
                    for corner in &args {
                        let vertex = resolve_corner(corner, &positions, &tex_coords, &normals, line_number)?;
                        vertices.push(vertex);
                    }
                    for i in 1..(args.len() as u32 - 1) {
                        indices.extend_from_slice(&[first, first + i, first + i + 1]);
                    }
                }
                _ => {}
            }
        }

        if vertices.is_empty() {
            return Err(ObjError::InvalidFormat("No faces found in OBJ file".to_string()));
        }

        Ok(Mesh::new(vertices, indices))
    }
}

fn parse_error(line: usize, message: impl Into<String>) -> ObjError {
    ObjError::ParseError {
        line,
        message: message.into(),
    }
}

fn parse_floats<const N: usize>(args: &[&str], line: usize) -> Result<[f32; N], ObjError> {
    if args.len() < N {
        return Err(parse_error(line, format!("expected {N} components, found {}", args.len())));
    }
    let mut out = [0.0; N];
    for (slot, arg) in out.iter_mut().zip(args) {
        *slot = arg
            .parse()
            .map_err(|_| parse_error(line, format!("invalid number '{arg}'")))?;
    }
    Ok(out)
}

/// Resolve a 1-based (or negative, relative) OBJ index into a 0-based one
fn resolve_index(raw: &str, len: usize, line: usize) -> Result<usize, ObjError> {
    let value: i64 = raw
        .parse()
        .map_err(|_| parse_error(line, format!("invalid index '{raw}'")))?;
    let resolved = match value {
        v if v > 0 => v - 1,
        v if v < 0 => len as i64 + v,
        _ => return Err(parse_error(line, "index 0 is not valid")),
    };
    usize::try_from(resolved)
        .ok()
        .filter(|&i| i < len)
        .ok_or_else(|| parse_error(line, format!("index {value} out of range")))
}

fn resolve_corner(
    corner: &str,
    positions: &[[f32; 3]],
    tex_coords: &[[f32; 2]],
    normals: &[[f32; 3]],
    line: usize,
) -> Result<Vertex, ObjError> {
    let mut fields = corner.split('/');
    let position_field = fields.next().unwrap_or_default();
    let position = positions[resolve_index(position_field, positions.len(), line)?];

    let tex_coord = match fields.next() {
        Some(raw) if !raw.is_empty() => tex_coords[resolve_index(raw, tex_coords.len(), line)?],
        _ => [0.0, 0.0],
    };
    let normal = match fields.next() {
        Some(raw) if !raw.is_empty() => normals[resolve_index(raw, normals.len(), line)?],
        _ => DEFAULT_NORMAL,
    };

    Ok(Vertex::new(position, normal, tex_coord))
}
