use crate::{format::ModelFormat, gltf_source, obj, stl};
use bytemuck::{Pod, Zeroable};
use glam::{Vec3, Vec4};
use lib_geometry::Aabb;
use log::info;
use std::{mem::offset_of, path::Path};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum LoadError {
    #[error("unsupported file format `{extension}` (use .gltf, .glb, .stl or .obj)")]
    UnsupportedFormat { extension: String },
    #[error("failed to read model file")]
    Io(#[from] std::io::Error),
    #[error("failed to parse glTF document")]
    Gltf(#[from] gltf::Error),
    #[error("malformed model data: {reason}")]
    Malformed { reason: String },
    #[error("model contains no mesh data")]
    Empty,
}

#[repr(C)]
#[derive(Clone, Copy, Pod, Zeroable, Default)]
pub struct Vertex {
    pub position: Vec4,
    // ---- 16 byte alignment
    pub normal: Vec4,
}

impl Vertex {
    #[must_use]
    pub fn new(position: Vec3, normal: Vec3) -> Self {
        Self {
            position: (position, 1.0).into(),
            normal: (normal, 0.0).into(),
        }
    }

    pub(crate) fn buffer_layout() -> wgpu::VertexBufferLayout<'static> {
        wgpu::VertexBufferLayout {
            array_stride: size_of::<Vertex>() as wgpu::BufferAddress,
            step_mode: wgpu::VertexStepMode::Vertex,
            attributes: &[
                wgpu::VertexAttribute {
                    format: wgpu::VertexFormat::Float32x4,
                    offset: offset_of!(Vertex, position) as wgpu::BufferAddress,
                    shader_location: 0,
                },
                wgpu::VertexAttribute {
                    format: wgpu::VertexFormat::Float32x4,
                    offset: offset_of!(Vertex, normal) as wgpu::BufferAddress,
                    shader_location: 1,
                },
            ],
        }
    }
}

/// Raw triangle geometry of a single part, in part-local coordinates.
#[derive(Clone, Default)]
pub struct MeshData {
    pub vertices: Vec<Vertex>,
    pub indices: Vec<u32>,
}

impl MeshData {
    #[must_use]
    pub fn bounds(&self) -> Aabb {
        Aabb::from_points(self.vertices.iter().map(|vertex| vertex.position.truncate()))
    }

    /// Translates every vertex by `-offset`.
    pub(crate) fn translate(&mut self, offset: Vec3) {
        let offset: Vec4 = (offset, 0.0).into();
        for vertex in &mut self.vertices {
            vertex.position -= offset;
        }
    }
}

/// One independently positionable mesh node of a loaded model.
pub struct Part {
    name: String,
    mesh: MeshData,
    /// Current position, mutated by animations.
    pub position: Vec3,
    /// Position as authored, captured at load time. Zero point of the
    /// explode animation.
    rest_position: Vec3,
}

impl Part {
    #[must_use]
    pub fn new(name: String, mesh: MeshData, position: Vec3) -> Self {
        Self {
            name,
            mesh,
            position,
            rest_position: position,
        }
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[must_use]
    pub fn mesh(&self) -> &MeshData {
        &self.mesh
    }

    #[must_use]
    pub fn rest_position(&self) -> Vec3 {
        self.rest_position
    }

    /// World-space bounds at the rest position.
    #[must_use]
    pub fn rest_bounds(&self) -> Aabb {
        let bounds = self.mesh.bounds();
        Aabb {
            min: bounds.min + self.rest_position,
            max: bounds.max + self.rest_position,
        }
    }
}

/// Ownership root of a loaded model: an ordered sequence of parts plus the
/// bounds captured at load time. Replaced wholesale on reload.
pub struct Model {
    parts: Vec<Part>,
    bounds: Aabb,
}

impl Model {
    /// Loads a model from `path`, dispatching on the file extension.
    /// STL and OBJ geometry carries no scene transform and is re-centered
    /// at the origin before insertion.
    ///
    /// # Errors
    ///
    /// Returns a [`LoadError`] when the extension is unsupported, the file
    /// cannot be read or the contents are malformed.
    pub fn load(path: &Path) -> Result<Self, LoadError> {
        let format = ModelFormat::from_path(path)?;

        let mut model = match format {
            ModelFormat::Gltf => gltf_source::load(path)?,
            ModelFormat::Stl => {
                let mesh = stl::parse(&std::fs::read(path)?)?;
                let mut model = Self::from_parts(vec![Part::new(
                    path.file_stem()
                        .map(|stem| stem.to_string_lossy().into_owned())
                        .unwrap_or_default(),
                    mesh,
                    Vec3::ZERO,
                )]);
                model.recenter();
                model
            }
            ModelFormat::Obj => {
                let source = std::fs::read_to_string(path)?;
                let mut model = obj::parse(&source)?;
                model.recenter();
                model
            }
        };

        if model.parts.is_empty() {
            return Err(LoadError::Empty);
        }

        model.bounds = model.rest_bounds();
        info!("model loaded: {} parts found", model.parts.len());
        Ok(model)
    }

    #[must_use]
    pub fn from_parts(parts: Vec<Part>) -> Self {
        let bounds = parts
            .iter()
            .map(Part::rest_bounds)
            .fold(Aabb::EMPTY, Aabb::union);
        Self { parts, bounds }
    }

    #[must_use]
    pub fn parts(&self) -> &[Part] {
        &self.parts
    }

    pub fn parts_mut(&mut self) -> &mut [Part] {
        &mut self.parts
    }

    /// Bounds of the whole model with every part at rest.
    #[must_use]
    pub fn bounds(&self) -> Aabb {
        self.bounds
    }

    fn rest_bounds(&self) -> Aabb {
        self.parts
            .iter()
            .map(Part::rest_bounds)
            .fold(Aabb::EMPTY, Aabb::union)
    }

    /// Translates all geometry so the model bounds are centered at the
    /// origin. Rest positions move along with the parts.
    pub fn recenter(&mut self) {
        let center = self.rest_bounds().center();
        if center == Vec3::ZERO {
            return;
        }
        // part origins stay where they are; only the vertex data moves
        for part in &mut self.parts {
            part.mesh.translate(center);
        }
        self.bounds = self.rest_bounds();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn triangle_at(offset: Vec3) -> MeshData {
        let normal = Vec3::Z;
        MeshData {
            vertices: vec![
                Vertex::new(offset, normal),
                Vertex::new(offset + Vec3::X, normal),
                Vertex::new(offset + Vec3::Y, normal),
            ],
            indices: vec![0, 1, 2],
        }
    }

    #[test]
    fn rest_position_is_captured_at_construction() {
        let mut part = Part::new("lid".into(), triangle_at(Vec3::ZERO), Vec3::new(1.0, 2.0, 3.0));
        part.position += Vec3::splat(5.0);
        assert_eq!(part.rest_position(), Vec3::new(1.0, 2.0, 3.0));
    }

    #[test]
    fn model_bounds_span_all_parts() {
        let model = Model::from_parts(vec![
            Part::new("a".into(), triangle_at(Vec3::ZERO), Vec3::ZERO),
            Part::new("b".into(), triangle_at(Vec3::ZERO), Vec3::new(4.0, 0.0, 0.0)),
        ]);
        assert_eq!(model.bounds().min, Vec3::ZERO);
        assert_eq!(model.bounds().max, Vec3::new(5.0, 1.0, 0.0));
    }

    #[test]
    fn recenter_moves_bounds_center_to_origin() {
        let mut model = Model::from_parts(vec![Part::new(
            "a".into(),
            triangle_at(Vec3::new(2.0, 2.0, 0.0)),
            Vec3::ZERO,
        )]);
        model.recenter();
        let center = model.bounds().center();
        assert!(center.length() < 1e-6, "center was {center}");
    }
}
