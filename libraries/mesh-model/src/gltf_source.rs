use crate::model::{LoadError, MeshData, Model, Part, Vertex};
use glam::{Mat4, Quat, Vec3};
use gltf::{buffer, Gltf};
use log::{debug, warn};
use std::{fs::File, io::BufReader, path::Path};

/// Loads a `.gltf` or `.glb` document into one [`Part`] per mesh node.
///
/// Node translations become part rest positions; the remaining rotation
/// and scale are baked into the vertex data so every part stays
/// independently positionable.
pub(crate) fn load(path: &Path) -> Result<Model, LoadError> {
    let file = File::open(path)?;
    let gltf = Gltf::from_reader(BufReader::new(file))?;

    let buffer_data = resolve_buffers(&gltf, path)?;

    let mut parts = Vec::new();
    for scene in gltf.scenes() {
        for node in scene.nodes() {
            collect_parts(&node, Mat4::IDENTITY, &buffer_data, &mut parts);
        }
    }
    debug!("glTF scene graph yielded {} mesh nodes", parts.len());

    Ok(Model::from_parts(parts))
}

fn resolve_buffers(gltf: &Gltf, path: &Path) -> Result<Vec<Vec<u8>>, LoadError> {
    let mut buffer_data = Vec::new();
    for buffer in gltf.buffers() {
        match buffer.source() {
            buffer::Source::Bin => {
                let blob = gltf.blob.as_deref().ok_or_else(|| LoadError::Malformed {
                    reason: "binary chunk referenced but missing".into(),
                })?;
                buffer_data.push(blob.to_vec());
            }
            buffer::Source::Uri(uri) => {
                if uri.starts_with("data:") {
                    return Err(LoadError::Malformed {
                        reason: "embedded data URIs are not supported".into(),
                    });
                }
                let sibling = path.with_file_name(uri);
                buffer_data.push(std::fs::read(sibling)?);
            }
        }
    }
    Ok(buffer_data)
}

fn collect_parts(
    node: &gltf::Node<'_>,
    parent: Mat4,
    buffer_data: &[Vec<u8>],
    parts: &mut Vec<Part>,
) {
    let local = Mat4::from_cols_array_2d(&node.transform().matrix());
    let world = parent * local;

    if let Some(mesh) = node.mesh() {
        let (_, rotation, translation) = decompose(world);
        let mut data = MeshData::default();

        for primitive in mesh.primitives() {
            read_primitive(&primitive, buffer_data, rotation, world, translation, &mut data);
        }

        if data.vertices.is_empty() {
            warn!("skipping mesh node without vertex data");
        } else {
            let name = node
                .name()
                .or_else(|| mesh.name())
                .map(str::to_owned)
                .unwrap_or_else(|| format!("part-{}", parts.len()));
            parts.push(Part::new(name, data, translation));
        }
    }

    for child in node.children() {
        collect_parts(&child, world, buffer_data, parts);
    }
}

fn decompose(world: Mat4) -> (Vec3, Quat, Vec3) {
    let (scale, rotation, translation) = world.to_scale_rotation_translation();
    (scale, rotation, translation)
}

fn read_primitive(
    primitive: &gltf::Primitive<'_>,
    buffer_data: &[Vec<u8>],
    rotation: Quat,
    world: Mat4,
    translation: Vec3,
    data: &mut MeshData,
) {
    let reader = primitive.reader(|buffer| buffer_data.get(buffer.index()).map(Vec::as_slice));

    let Some(positions) = reader.read_positions() else {
        return;
    };
    let mut normals = reader.read_normals();

    let base = u32::try_from(data.vertices.len()).unwrap_or(u32::MAX);
    for position in positions {
        let normal = normals
            .as_mut()
            .and_then(Iterator::next)
            .map_or(Vec3::Z, Vec3::from);

        // bake rotation and scale, keep the translation on the part
        let world_position = world.transform_point3(Vec3::from(position)) - translation;
        let world_normal = (rotation * normal).normalize_or(Vec3::Z);
        data.vertices.push(Vertex::new(world_position, world_normal));
    }

    if let Some(indices) = reader.read_indices() {
        data.indices
            .extend(indices.into_u32().map(|index| base + index));
    } else {
        let added = u32::try_from(data.vertices.len()).unwrap_or(u32::MAX) - base;
        data.indices.extend(base..base + added);
    }
}
