use glam::{Affine3A, Vec3};

/// Axis-aligned bounding box.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BoundingBox {
    pub min: Vec3,
    pub max: Vec3,
}

impl BoundingBox {
    /// An inverted box that contains nothing; expanding it by any point yields
    /// a degenerate box around that point.
    pub const EMPTY: Self = Self {
        min: Vec3::splat(f32::INFINITY),
        max: Vec3::splat(f32::NEG_INFINITY),
    };

    #[must_use]
    pub fn new(min: Vec3, max: Vec3) -> Self {
        Self { min, max }
    }

    /// Box of the given size centered on the origin.
    #[must_use]
    pub fn from_size(size: Vec3) -> Self {
        let half = size * 0.5;
        Self { min: -half, max: half }
    }

    #[must_use]
    pub fn from_points(points: impl IntoIterator<Item = Vec3>) -> Self {
        let mut bbox = Self::EMPTY;
        for p in points {
            bbox.expand_by_point(p);
        }
        bbox
    }

    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.max.x < self.min.x || self.max.y < self.min.y || self.max.z < self.min.z
    }

    #[inline]
    pub fn expand_by_point(&mut self, point: Vec3) {
        self.min = self.min.min(point);
        self.max = self.max.max(point);
    }

    /// Center of the box. An empty box reports the origin.
    #[must_use]
    pub fn center(&self) -> Vec3 {
        if self.is_empty() {
            Vec3::ZERO
        } else {
            (self.min + self.max) * 0.5
        }
    }

    /// Extents of the box. An empty box reports zero size.
    #[must_use]
    pub fn size(&self) -> Vec3 {
        if self.is_empty() {
            Vec3::ZERO
        } else {
            self.max - self.min
        }
    }

    #[must_use]
    pub fn union(&self, other: &BoundingBox) -> BoundingBox {
        BoundingBox {
            min: self.min.min(other.min),
            max: self.max.max(other.max),
        }
    }

    #[must_use]
    pub fn contains_point(&self, point: Vec3) -> bool {
        point.cmpge(self.min).all() && point.cmple(self.max).all()
    }

    #[must_use]
    pub fn transform(&self, matrix: &Affine3A) -> Self {
        if self.is_empty() {
            return *self;
        }

        let corners = [
            Vec3::new(self.min.x, self.min.y, self.min.z),
            Vec3::new(self.min.x, self.min.y, self.max.z),
            Vec3::new(self.min.x, self.max.y, self.min.z),
            Vec3::new(self.min.x, self.max.y, self.max.z),
            Vec3::new(self.max.x, self.min.y, self.min.z),
            Vec3::new(self.max.x, self.min.y, self.max.z),
            Vec3::new(self.max.x, self.max.y, self.min.z),
            Vec3::new(self.max.x, self.max.y, self.max.z),
        ];

        Self::from_points(corners.into_iter().map(|p| matrix.transform_point3(p)))
    }

    /// Slab test. Returns the distance along `dir` to the first hit, or
    /// `None` when the ray misses or the box lies behind the origin.
    #[must_use]
    pub fn ray_intersect(&self, origin: Vec3, dir: Vec3) -> Option<f32> {
        if self.is_empty() {
            return None;
        }

        let mut t_min: f32 = 0.0;
        let mut t_max = f32::INFINITY;

        for axis in 0..3 {
            let o = origin[axis];
            let d = dir[axis];
            if d.abs() < 1e-8 {
                if o < self.min[axis] || o > self.max[axis] {
                    return None;
                }
                continue;
            }
            let inv_d = 1.0 / d;
            let mut t1 = (self.min[axis] - o) * inv_d;
            let mut t2 = (self.max[axis] - o) * inv_d;
            if t1 > t2 {
                std::mem::swap(&mut t1, &mut t2);
            }
            t_min = t_min.max(t1);
            t_max = t_max.min(t2);
            if t_min > t_max {
                return None;
            }
        }

        Some(t_min)
    }
}

impl Default for BoundingBox {
    fn default() -> Self {
        Self::EMPTY
    }
}

/// Primitive assembly mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PrimitiveTopology {
    #[default]
    TriangleList,
    LineList,
}

/// CPU-side vertex data.
///
/// Attributes are stored planar (one `Vec` per attribute). The bounding box
/// is cached and only recomputed through [`Geometry::compute_bounding_box`].
#[derive(Debug, Clone)]
pub struct Geometry {
    pub positions: Vec<[f32; 3]>,
    pub normals: Vec<[f32; 3]>,
    pub uvs: Vec<[f32; 2]>,
    pub indices: Vec<u32>,
    pub topology: PrimitiveTopology,

    bounding_box: Option<BoundingBox>,
}

impl Default for Geometry {
    fn default() -> Self {
        Self::new()
    }
}

impl Geometry {
    #[must_use]
    pub fn new() -> Self {
        Self {
            positions: Vec::new(),
            normals: Vec::new(),
            uvs: Vec::new(),
            indices: Vec::new(),
            topology: PrimitiveTopology::TriangleList,
            bounding_box: None,
        }
    }

    #[must_use]
    pub fn with_positions(positions: Vec<[f32; 3]>) -> Self {
        let mut geo = Self::new();
        geo.positions = positions;
        geo
    }

    #[inline]
    #[must_use]
    pub fn vertex_count(&self) -> usize {
        self.positions.len()
    }

    /// Replaces the vertex positions and drops the cached bounding box.
    pub fn set_positions(&mut self, positions: Vec<[f32; 3]>) {
        self.positions = positions;
        self.bounding_box = None;
    }

    /// Recomputes and caches the bounding box from the position attribute.
    pub fn compute_bounding_box(&mut self) -> BoundingBox {
        let bbox = self.measure_bounds();
        self.bounding_box = Some(bbox);
        bbox
    }

    /// Returns the cached bounding box, if it has been computed.
    #[inline]
    #[must_use]
    pub fn bounding_box(&self) -> Option<BoundingBox> {
        self.bounding_box
    }

    /// Returns the cached bounding box, or measures the positions without
    /// caching when it has not been computed yet.
    #[must_use]
    pub fn local_bounds(&self) -> BoundingBox {
        self.bounding_box.unwrap_or_else(|| self.measure_bounds())
    }

    fn measure_bounds(&self) -> BoundingBox {
        BoundingBox::from_points(self.positions.iter().copied().map(Vec3::from_array))
    }

    /// Appends another geometry's vertices, transformed by `matrix`.
    ///
    /// Attributes missing on either side are dropped from the result so the
    /// planar arrays stay the same length.
    pub fn merge(&mut self, other: &Geometry, matrix: &Affine3A) {
        let base = self.positions.len() as u32;
        let keep_normals = self.normals.len() == self.positions.len()
            && other.normals.len() == other.positions.len();
        let keep_uvs =
            self.uvs.len() == self.positions.len() && other.uvs.len() == other.positions.len();

        self.positions.extend(
            other
                .positions
                .iter()
                .map(|p| matrix.transform_point3(Vec3::from_array(*p)).to_array()),
        );

        if keep_normals {
            self.normals.extend(other.normals.iter().map(|n| {
                matrix
                    .transform_vector3(Vec3::from_array(*n))
                    .normalize_or_zero()
                    .to_array()
            }));
        } else {
            self.normals.clear();
        }

        if keep_uvs {
            self.uvs.extend_from_slice(&other.uvs);
        } else {
            self.uvs.clear();
        }

        self.indices.extend(other.indices.iter().map(|i| i + base));
        self.bounding_box = None;
    }
}
