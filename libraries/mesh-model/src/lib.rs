//! Loads 3D models from disk and renders them with the ordered-dithering
//! shader.
//!
//! A loaded [`Model`] owns an ordered sequence of [`Part`]s, each with a
//! mutable current position and the immutable rest position recorded at
//! load time. The file format is resolved once into a closed
//! [`ModelFormat`] variant; glTF is read via the `gltf` crate, STL and OBJ
//! through small parsers in this crate.

mod format;
mod gltf_source;
mod model;
mod obj;
mod renderer;
mod stl;

pub use format::ModelFormat;
pub use model::{LoadError, MeshData, Model, Part, Vertex};
pub use renderer::{MeshRenderer, Palette};

/// WGSL source of the ordered-dithering shader, compiled by the renderer.
pub const DITHER_SHADER: &str = include_str!("../shaders/dither.wgsl");
