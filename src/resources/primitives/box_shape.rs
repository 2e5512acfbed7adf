use glam::Vec3;

use crate::resources::geometry::Geometry;

/// One face of the box: outward normal and the two in-plane axes spanning it
/// (`u` to the right, `v` upward when looking at the face from outside).
struct Face {
    normal: Vec3,
    u: Vec3,
    v: Vec3,
}

const FACES: [Face; 6] = [
    // Front (+Z)
    Face { normal: Vec3::Z, u: Vec3::X, v: Vec3::Y },
    // Back (-Z)
    Face { normal: Vec3::NEG_Z, u: Vec3::NEG_X, v: Vec3::Y },
    // Top (+Y)
    Face { normal: Vec3::Y, u: Vec3::X, v: Vec3::NEG_Z },
    // Bottom (-Y)
    Face { normal: Vec3::NEG_Y, u: Vec3::X, v: Vec3::Z },
    // Right (+X)
    Face { normal: Vec3::X, u: Vec3::NEG_Z, v: Vec3::Y },
    // Left (-X)
    Face { normal: Vec3::NEG_X, u: Vec3::Z, v: Vec3::Y },
];

/// Axis-aligned box centered on the origin, with per-face normals and UVs.
///
/// 24 vertices (4 per face), two CCW triangles per face. The bounding box is
/// computed before returning, so intersection code can read it without
/// touching the vertex data.
#[must_use]
pub fn create_box(width: f32, height: f32, depth: f32) -> Geometry {
    let half = Vec3::new(width, height, depth) * 0.5;

    let mut positions = Vec::with_capacity(24);
    let mut normals = Vec::with_capacity(24);
    let mut uvs = Vec::with_capacity(24);

    // Corner order per face: bottom-left, bottom-right, top-right, top-left
    let corners = [(-1.0, -1.0), (1.0, -1.0), (1.0, 1.0), (-1.0, 1.0)];

    for face in &FACES {
        for (su, sv) in corners {
            let p = (face.normal + face.u * su + face.v * sv) * half;
            positions.push(p.to_array());
            normals.push(face.normal.to_array());
            uvs.push([(su + 1.0) * 0.5, (1.0 - sv) * 0.5]);
        }
    }

    let indices: Vec<u32> = (0..6)
        .flat_map(|face| {
            let base = face * 4;
            [base, base + 1, base + 2, base, base + 2, base + 3]
        })
        .collect();

    let mut geo = Geometry::with_positions(positions);
    geo.normals = normals;
    geo.uvs = uvs;
    geo.indices = indices;

    geo.compute_bounding_box();

    geo
}
