//! Minimal STL reader covering the binary and ASCII dialects.

use crate::model::{LoadError, MeshData, Vertex};
use glam::Vec3;

const BINARY_HEADER_LEN: usize = 80;
const BINARY_TRIANGLE_LEN: usize = 50;

/// Parses STL bytes into a single mesh. The dialect is detected from the
/// content, not the header alone: exporters routinely write binary files
/// whose header starts with `solid`.
pub(crate) fn parse(bytes: &[u8]) -> Result<MeshData, LoadError> {
    if looks_ascii(bytes) {
        parse_ascii(std::str::from_utf8(bytes).map_err(|_| LoadError::Malformed {
            reason: "ASCII STL is not valid UTF-8".into(),
        })?)
    } else {
        parse_binary(bytes)
    }
}

fn looks_ascii(bytes: &[u8]) -> bool {
    let head = &bytes[..bytes.len().min(512)];
    head.starts_with(b"solid")
        && std::str::from_utf8(head).is_ok_and(|text| text.contains("facet"))
}

fn parse_binary(bytes: &[u8]) -> Result<MeshData, LoadError> {
    let payload = bytes
        .get(BINARY_HEADER_LEN..)
        .ok_or_else(|| malformed("file shorter than the binary header"))?;
    let (count_bytes, triangles) = payload
        .split_first_chunk::<4>()
        .ok_or_else(|| malformed("missing triangle count"))?;
    let count = u32::from_le_bytes(*count_bytes) as usize;

    if triangles.len() < count * BINARY_TRIANGLE_LEN {
        return Err(malformed("triangle records truncated"));
    }

    let mut mesh = MeshData::default();
    for record in triangles.chunks_exact(BINARY_TRIANGLE_LEN).take(count) {
        let mut fields = record
            .chunks_exact(4)
            .map(|field| f32::from_le_bytes([field[0], field[1], field[2], field[3]]));
        let mut next_vec3 = || {
            Vec3::new(
                fields.next().unwrap_or_default(),
                fields.next().unwrap_or_default(),
                fields.next().unwrap_or_default(),
            )
        };

        let normal = next_vec3();
        let corners = [next_vec3(), next_vec3(), next_vec3()];
        push_triangle(&mut mesh, normal, corners);
    }

    Ok(mesh)
}

fn parse_ascii(text: &str) -> Result<MeshData, LoadError> {
    let mut mesh = MeshData::default();
    let mut normal = Vec3::Z;
    let mut corners: Vec<Vec3> = Vec::with_capacity(3);

    for line in text.lines() {
        let mut words = line.split_whitespace();
        match words.next() {
            Some("facet") => {
                // "facet normal x y z"
                normal = parse_vec3(words.skip(1)).unwrap_or(Vec3::Z);
                corners.clear();
            }
            Some("vertex") => {
                let vertex =
                    parse_vec3(words).ok_or_else(|| malformed("vertex with non-numeric field"))?;
                corners.push(vertex);
            }
            Some("endfacet") => {
                let [a, b, c] = corners.as_slice() else {
                    return Err(malformed("facet without exactly three vertices"));
                };
                push_triangle(&mut mesh, normal, [*a, *b, *c]);
            }
            _ => {}
        }
    }

    Ok(mesh)
}

fn parse_vec3<'line>(mut words: impl Iterator<Item = &'line str>) -> Option<Vec3> {
    let x = words.next()?.parse().ok()?;
    let y = words.next()?.parse().ok()?;
    let z = words.next()?.parse().ok()?;
    Some(Vec3::new(x, y, z))
}

fn push_triangle(mesh: &mut MeshData, normal: Vec3, corners: [Vec3; 3]) {
    let normal = if normal.length_squared() > 0.0 {
        normal.normalize()
    } else {
        // degenerate or omitted normal: derive it from the winding
        let [a, b, c] = corners;
        (b - a).cross(c - a).normalize_or(Vec3::Z)
    };

    let base = u32::try_from(mesh.vertices.len()).unwrap_or(u32::MAX);
    for corner in corners {
        mesh.vertices.push(Vertex::new(corner, normal));
    }
    mesh.indices.extend([base, base + 1, base + 2]);
}

fn malformed(reason: &str) -> LoadError {
    LoadError::Malformed {
        reason: reason.into(),
    }
}
