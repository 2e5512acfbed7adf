use glam::Affine3A;

use crate::resources::mesh::Mesh;
use crate::scene::NodeHandle;
use crate::scene::transform::Transform;

/// A scene node.
///
/// # Hierarchy
///
/// Nodes form a tree structure through parent-child relationships:
/// - `parent`: Optional handle to parent node (None for root or detached nodes)
/// - `children`: List of child node handles
///
/// # Redraw hint
///
/// `needs_update` is a cooperative flag: animations raise it on the parent of
/// whatever they move (on the scene itself for root nodes), and the render
/// loop clears it with
/// [`Scene::take_needs_update`](crate::scene::Scene::take_needs_update).
#[derive(Debug, Clone)]
pub struct Node {
    pub name: String,

    // === Core Hierarchy ===
    pub(crate) parent: Option<NodeHandle>,
    pub(crate) children: Vec<NodeHandle>,

    // === Core Spatial Data ===
    pub transform: Transform,

    // === Components ===
    pub mesh: Option<Mesh>,

    // === Core State ===
    pub visible: bool,
    pub needs_update: bool,
}

impl Node {
    #[must_use]
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            parent: None,
            children: Vec::new(),
            transform: Transform::new(),
            mesh: None,
            visible: true,
            needs_update: false,
        }
    }

    #[must_use]
    pub fn with_mesh(name: &str, mesh: Mesh) -> Self {
        Self { mesh: Some(mesh), ..Self::new(name) }
    }

    /// Returns the parent node handle, if any.
    #[inline]
    #[must_use]
    pub fn parent(&self) -> Option<NodeHandle> {
        self.parent
    }

    /// Returns a read-only slice of child node handles.
    #[inline]
    #[must_use]
    pub fn children(&self) -> &[NodeHandle] {
        &self.children
    }

    /// World matrix as of the last [`Scene::update_matrix_world`](crate::scene::Scene::update_matrix_world).
    #[inline]
    #[must_use]
    pub fn world_matrix(&self) -> &Affine3A {
        &self.transform.world_matrix
    }
}

impl Default for Node {
    fn default() -> Self {
        Self::new("Node")
    }
}
