use std::sync::Arc;

use crate::resources::geometry::{BoundingBox, Geometry};
use crate::resources::material::Material;

/// Geometry + material pair attached to a scene node.
///
/// Geometry is shared: the same `Arc<Geometry>` may back several meshes
/// (e.g. every instance of a streamed asset).
#[derive(Debug, Clone)]
pub struct Mesh {
    pub name: String,
    pub geometry: Arc<Geometry>,
    pub material: Material,
    /// Per-instance visibility, independent of the material's.
    pub visible: bool,
}

impl Mesh {
    #[must_use]
    pub fn new(geometry: Geometry, material: Material) -> Self {
        Self::from_shared(Arc::new(geometry), material)
    }

    #[must_use]
    pub fn from_shared(geometry: Arc<Geometry>, material: Material) -> Self {
        Self {
            name: "Mesh".to_string(),
            geometry,
            material,
            visible: true,
        }
    }

    #[must_use]
    pub fn with_name(mut self, name: &str) -> Self {
        self.name = name.to_string();
        self
    }

    /// Local-space bounds of the geometry.
    #[must_use]
    pub fn local_bounds(&self) -> BoundingBox {
        self.geometry.local_bounds()
    }

    /// Whether the renderer should draw this mesh.
    #[inline]
    #[must_use]
    pub fn is_drawn(&self) -> bool {
        self.visible && self.material.visible
    }
}
