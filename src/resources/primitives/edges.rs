use crate::resources::geometry::{Geometry, PrimitiveTopology};

/// Wireframe of an axis-aligned box centered on the origin: 8 corners,
/// 12 edges, `LineList` topology.
#[must_use]
pub fn create_box_edges(width: f32, height: f32, depth: f32) -> Geometry {
    let w = width / 2.0;
    let h = height / 2.0;
    let d = depth / 2.0;

    let positions = vec![
        // Bottom ring (-Y)
        [-w, -h, -d],
        [w, -h, -d],
        [w, -h, d],
        [-w, -h, d],
        // Top ring (+Y)
        [-w, h, -d],
        [w, h, -d],
        [w, h, d],
        [-w, h, d],
    ];

    let indices = vec![
        // Bottom
        0, 1, 1, 2, 2, 3, 3, 0,
        // Top
        4, 5, 5, 6, 6, 7, 7, 4,
        // Verticals
        0, 4, 1, 5, 2, 6, 3, 7,
    ];

    let mut geo = Geometry::with_positions(positions);
    geo.indices = indices;
    geo.topology = PrimitiveTopology::LineList;
    geo.compute_bounding_box();
    geo
}
