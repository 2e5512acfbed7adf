use glam::Affine3A;

use crate::resources::geometry::BoundingBox;
use crate::resources::mesh::Mesh;
use crate::scene::transform::Transform;

/// One node of a [`VisualSubtree`]. Children are referenced by index.
#[derive(Debug, Clone, Default)]
pub struct SubtreeNode {
    pub name: Option<String>,
    pub transform: Transform,
    pub children_indices: Vec<usize>,
    pub mesh: Option<Mesh>,
}

impl SubtreeNode {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_mesh(name: &str, mesh: Mesh) -> Self {
        Self {
            name: Some(name.to_string()),
            mesh: Some(mesh),
            ..Self::default()
        }
    }
}

/// Renderable node tree produced by an asset streamer or a parametric
/// generator, before it is instantiated into a [`Scene`](crate::scene::Scene).
///
/// Plain data: no handles, no scene references, `Send`, so it can be built on
/// a loader thread and handed to the scene's thread.
#[derive(Debug, Clone, Default)]
pub struct VisualSubtree {
    /// Flattened node storage.
    pub nodes: Vec<SubtreeNode>,
    /// Indices of top-level nodes in `nodes`.
    pub root_indices: Vec<usize>,
}

impl VisualSubtree {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Single-node subtree holding one mesh.
    #[must_use]
    pub fn from_mesh(name: &str, mesh: Mesh) -> Self {
        Self {
            nodes: vec![SubtreeNode::with_mesh(name, mesh)],
            root_indices: vec![0],
        }
    }

    /// Appends a node and returns its index. Linking is up to the caller.
    pub fn push(&mut self, node: SubtreeNode) -> usize {
        self.nodes.push(node);
        self.nodes.len() - 1
    }

    #[must_use]
    pub fn mesh_count(&self) -> usize {
        self.nodes.iter().filter(|n| n.mesh.is_some()).count()
    }

    /// Axis-aligned bounds of every mesh in the tree, in the subtree's own
    /// space (root transforms applied, nothing above them).
    ///
    /// Returns an empty box when the tree has no geometry.
    #[must_use]
    pub fn compute_bounding_box(&self) -> BoundingBox {
        let mut bbox = BoundingBox::EMPTY;
        let mut stack: Vec<(usize, Affine3A)> = self
            .root_indices
            .iter()
            .map(|&i| (i, Affine3A::IDENTITY))
            .collect();

        let mut visited = vec![false; self.nodes.len()];

        while let Some((index, parent_matrix)) = stack.pop() {
            let Some(node) = self.nodes.get(index) else {
                continue;
            };
            // Malformed input may link a node twice
            if std::mem::replace(&mut visited[index], true) {
                continue;
            }

            let matrix = parent_matrix * node.transform.compose();
            if let Some(mesh) = &node.mesh {
                bbox = bbox.union(&mesh.local_bounds().transform(&matrix));
            }
            stack.extend(node.children_indices.iter().map(|&c| (c, matrix)));
        }

        bbox
    }
}
