//! Minimal Wavefront OBJ reader: positions, normals and triangulated
//! faces. Each `o` section becomes its own part.

use crate::model::{LoadError, MeshData, Model, Part, Vertex};
use glam::Vec3;

pub(crate) fn parse(source: &str) -> Result<Model, LoadError> {
    let mut positions: Vec<Vec3> = Vec::new();
    let mut normals: Vec<Vec3> = Vec::new();

    let mut parts: Vec<Part> = Vec::new();
    let mut current_name = String::from("default");
    let mut current = MeshData::default();

    let mut flush = |name: &mut String, mesh: &mut MeshData, parts: &mut Vec<Part>| {
        if !mesh.vertices.is_empty() {
            parts.push(Part::new(
                std::mem::take(name),
                std::mem::take(mesh),
                Vec3::ZERO,
            ));
        }
    };

    for line in source.lines() {
        let mut words = line.split_whitespace();
        match words.next() {
            Some("v") => positions.push(parse_vec3(&mut words)?),
            Some("vn") => normals.push(parse_vec3(&mut words)?),
            Some("o" | "g") => {
                flush(&mut current_name, &mut current, &mut parts);
                current_name = words.next().unwrap_or("default").to_owned();
            }
            Some("f") => {
                let corners = words
                    .map(|word| parse_face_corner(word, &positions, &normals))
                    .collect::<Result<Vec<_>, _>>()?;
                if corners.len() < 3 {
                    return Err(malformed("face with fewer than three vertices"));
                }
                triangulate(&corners, &mut current);
            }
            _ => {}
        }
    }
    flush(&mut current_name, &mut current, &mut parts);

    Ok(Model::from_parts(parts))
}

fn parse_vec3<'line>(
    words: &mut impl Iterator<Item = &'line str>,
) -> Result<Vec3, LoadError> {
    let mut component = || -> Result<f32, LoadError> {
        words
            .next()
            .and_then(|word| word.parse().ok())
            .ok_or_else(|| malformed("non-numeric coordinate"))
    };
    Ok(Vec3::new(component()?, component()?, component()?))
}

/// Resolves one `v`, `v/vt`, `v//vn` or `v/vt/vn` face corner.
fn parse_face_corner(
    word: &str,
    positions: &[Vec3],
    normals: &[Vec3],
) -> Result<(Vec3, Option<Vec3>), LoadError> {
    let mut fields = word.split('/');

    let position = resolve_index(fields.next(), positions.len())?
        .and_then(|index| positions.get(index).copied())
        .ok_or_else(|| malformed("face references a missing vertex"))?;

    let _texture = fields.next();
    let normal = resolve_index(fields.next(), normals.len())?
        .and_then(|index| normals.get(index).copied());

    Ok((position, normal))
}

/// OBJ indices are 1-based; negative values count from the end.
fn resolve_index(field: Option<&str>, len: usize) -> Result<Option<usize>, LoadError> {
    let Some(field) = field.filter(|field| !field.is_empty()) else {
        return Ok(None);
    };
    let index: i64 = field
        .parse()
        .map_err(|_| malformed("non-numeric face index"))?;

    let resolved = if index > 0 {
        usize::try_from(index - 1).ok()
    } else if index < 0 {
        len.checked_sub(usize::try_from(-index).unwrap_or(usize::MAX))
    } else {
        None
    };
    resolved
        .map(Some)
        .ok_or_else(|| malformed("face index out of range"))
}

fn triangulate(corners: &[(Vec3, Option<Vec3>)], mesh: &mut MeshData) {
    let Some((&first, rest)) = corners.split_first() else {
        return;
    };

    for pair in rest.windows(2) {
        let (a, b) = (pair[0], pair[1]);
        let face_normal = (a.0 - first.0).cross(b.0 - first.0).normalize_or(Vec3::Z);

        let base = u32::try_from(mesh.vertices.len()).unwrap_or(u32::MAX);
        for (position, normal) in [first, a, b] {
            mesh.vertices
                .push(Vertex::new(position, normal.unwrap_or(face_normal)));
        }
        mesh.indices.extend([base, base + 1, base + 2]);
    }
}

fn malformed(reason: &str) -> LoadError {
    LoadError::Malformed {
        reason: reason.into(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const QUAD: &str = "\
o plate
v 0 0 0
v 1 0 0
v 1 1 0
v 0 1 0
f 1 2 3 4
";

    #[test]
    fn quad_triangulates_into_two_faces() {
        let model = parse(QUAD).unwrap();
        assert_eq!(model.parts().len(), 1);
        let mesh = model.parts()[0].mesh();
        assert_eq!(mesh.indices.len(), 6);
        // fan triangulation shares the first corner
        assert_eq!(mesh.vertices[0].position, mesh.vertices[3].position);
    }

    #[test]
    fn object_sections_become_parts() {
        let source = "o a\nv 0 0 0\nv 1 0 0\nv 0 1 0\nf 1 2 3\no b\nv 2 0 0\nv 3 0 0\nv 2 1 0\nf 4 5 6\n";
        let model = parse(source).unwrap();
        assert_eq!(model.parts().len(), 2);
        assert_eq!(model.parts()[1].name(), "b");
    }

    #[test]
    fn negative_indices_resolve_from_the_end() {
        let source = "v 0 0 0\nv 1 0 0\nv 0 1 0\nf -3 -2 -1\n";
        let model = parse(source).unwrap();
        assert_eq!(model.parts()[0].mesh().indices.len(), 3);
    }

    #[test]
    fn missing_vertex_reference_is_rejected() {
        assert!(parse("f 1 2 3\n").is_err());
    }

    #[test]
    fn normals_are_taken_from_vn_when_present() {
        let source = "v 0 0 0\nv 1 0 0\nv 0 1 0\nvn 1 0 0\nf 1//1 2//1 3//1\n";
        let model = parse(source).unwrap();
        let normal = model.parts()[0].mesh().vertices[0].normal.truncate();
        assert!((normal - Vec3::X).length() < 1e-6);
    }
}
