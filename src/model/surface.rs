use glam::Vec3;
use serde::{Deserialize, Serialize};

/// Where an item is meant to sit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Placement {
    #[default]
    Floor,
    Wall,
    /// Cut into a wall, like doors and windows.
    InWall,
    Ceiling,
}

impl Placement {
    /// Surface kind this placement can snap onto.
    #[must_use]
    pub fn snap_surface(self) -> SurfaceKind {
        match self {
            Placement::Floor => SurfaceKind::Floor,
            Placement::Wall | Placement::InWall => SurfaceKind::Wall,
            Placement::Ceiling => SurfaceKind::Ceiling,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum SurfaceKind {
    Floor,
    Wall,
    Ceiling,
}

/// A surface an item may be dragged along.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct IntersectionPlane {
    pub kind: SurfaceKind,
    pub point: Vec3,
    pub normal: Vec3,
}

impl IntersectionPlane {
    #[must_use]
    pub fn new(kind: SurfaceKind, point: Vec3, normal: Vec3) -> Self {
        Self {
            kind,
            point,
            normal: normal.normalize_or_zero(),
        }
    }

    /// Distance along `dir` from `origin` to the plane, if the ray hits it
    /// in front of the origin.
    #[must_use]
    pub fn ray_intersect(&self, origin: Vec3, dir: Vec3) -> Option<f32> {
        let denom = self.normal.dot(dir);
        if denom.abs() < f32::EPSILON {
            return None;
        }
        let t = (self.point - origin).dot(self.normal) / denom;
        (t >= 0.0).then_some(t)
    }
}
