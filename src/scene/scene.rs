use std::cell::RefCell;
use std::rc::Rc;
use std::sync::atomic::{AtomicU32, Ordering};

use glam::Affine3A;
use slotmap::SlotMap;

use crate::animation::{Ease, TweenChannel, TweenKey, TweenScheduler};
use crate::assets::subtree::VisualSubtree;
use crate::errors::{Error, Result};
use crate::scene::NodeHandle;
use crate::scene::node::Node;

static NEXT_SCENE_ID: AtomicU32 = AtomicU32::new(1);

/// Single-threaded shared handle to a scene.
///
/// Items, their model subscriptions and the render loop all touch the same
/// scene, always from the thread that owns it.
pub type SharedScene = Rc<RefCell<Scene>>;

/// Scene graph.
///
/// Nodes live in a slot map. A node is either a root (listed in
/// `root_nodes`), a child of another node, or detached (neither). Detached
/// nodes keep their data until [`Scene::remove_node`] is called.
pub struct Scene {
    pub id: u32,

    pub nodes: SlotMap<NodeHandle, Node>,
    pub root_nodes: Vec<NodeHandle>,

    /// Running transform animations.
    pub tweens: TweenScheduler,

    /// Redraw hint for changes to root nodes, which have no parent to carry
    /// one.
    pub needs_update: bool,
}

impl Default for Scene {
    fn default() -> Self {
        Self::new()
    }
}

impl Scene {
    #[must_use]
    pub fn new() -> Self {
        Self {
            id: NEXT_SCENE_ID.fetch_add(1, Ordering::Relaxed),
            nodes: SlotMap::with_key(),
            root_nodes: Vec::new(),
            tweens: TweenScheduler::new(),
            needs_update: false,
        }
    }

    #[must_use]
    pub fn into_shared(self) -> SharedScene {
        Rc::new(RefCell::new(self))
    }

    // ========================================================================
    // Node creation & removal
    // ========================================================================

    /// Creates a detached node.
    pub fn create_node(&mut self, name: &str) -> NodeHandle {
        self.nodes.insert(Node::new(name))
    }

    /// Adds a node at the root of the scene.
    pub fn add_node(&mut self, node: Node) -> NodeHandle {
        let handle = self.nodes.insert(node);
        self.root_nodes.push(handle);
        handle
    }

    pub fn add_to_parent(&mut self, child: Node, parent: NodeHandle) -> NodeHandle {
        let handle = self.nodes.insert(child);
        self.attach(handle, parent);
        handle
    }

    /// Removes a node and its whole subtree, along with any tweens on them.
    pub fn remove_node(&mut self, handle: NodeHandle) {
        if !self.nodes.contains_key(handle) {
            return;
        }

        self.detach(handle);

        let mut stack = vec![handle];
        while let Some(current) = stack.pop() {
            if let Some(node) = self.nodes.remove(current) {
                stack.extend(node.children);
            }
            self.tweens.cancel_target(current);
        }
    }

    // ========================================================================
    // Hierarchy
    // ========================================================================

    /// Makes `child` a child of `parent`, detaching it from wherever it was.
    pub fn attach(&mut self, child: NodeHandle, parent: NodeHandle) {
        if child == parent {
            log::warn!("Cannot attach node to itself!");
            return;
        }
        if !self.nodes.contains_key(parent) {
            log::error!("Parent node not found during attach!");
            return;
        }
        if !self.nodes.contains_key(child) {
            log::warn!("Attach called with a stale child handle");
            return;
        }

        self.detach(child);

        if let Some(p) = self.nodes.get_mut(parent) {
            p.children.push(child);
        }
        if let Some(c) = self.nodes.get_mut(child) {
            c.parent = Some(parent);
            c.transform.mark_dirty();
        }
    }

    /// Unlinks a node from its parent (or from the root list). The node and
    /// its subtree stay alive and can be re-attached.
    pub fn detach(&mut self, handle: NodeHandle) {
        let parent = self.nodes.get(handle).and_then(|n| n.parent);

        if let Some(parent) = parent {
            if let Some(p) = self.nodes.get_mut(parent)
                && let Some(i) = p.children.iter().position(|&x| x == handle)
            {
                p.children.remove(i);
            }
        } else if let Some(i) = self.root_nodes.iter().position(|&x| x == handle) {
            self.root_nodes.remove(i);
        }

        if let Some(node) = self.nodes.get_mut(handle) {
            node.parent = None;
            node.transform.mark_dirty();
        }
    }

    #[must_use]
    pub fn get_node(&self, handle: NodeHandle) -> Option<&Node> {
        self.nodes.get(handle)
    }

    pub fn get_node_mut(&mut self, handle: NodeHandle) -> Option<&mut Node> {
        self.nodes.get_mut(handle)
    }

    #[must_use]
    pub fn is_child_of(&self, child: NodeHandle, parent: NodeHandle) -> bool {
        self.nodes
            .get(parent)
            .is_some_and(|p| p.children.contains(&child))
    }

    // ========================================================================
    // Redraw hints
    // ========================================================================

    pub fn mark_needs_update(&mut self, handle: NodeHandle) {
        if let Some(node) = self.nodes.get_mut(handle) {
            node.needs_update = true;
        }
    }

    /// Raises the redraw hint on the parent of `handle`, or on the scene
    /// itself when `handle` is a root.
    pub fn mark_parent_needs_update(&mut self, handle: NodeHandle) {
        match self.nodes.get(handle).map(|n| n.parent) {
            Some(Some(parent)) => self.mark_needs_update(parent),
            Some(None) => self.needs_update = true,
            None => {}
        }
    }

    /// Reads and clears a node's redraw hint.
    pub fn take_needs_update(&mut self, handle: NodeHandle) -> bool {
        self.nodes
            .get_mut(handle)
            .is_some_and(|node| std::mem::take(&mut node.needs_update))
    }

    /// Clears every redraw hint, the scene's own included, and reports
    /// whether any was set.
    pub fn take_any_needs_update(&mut self) -> bool {
        let mut any = std::mem::take(&mut self.needs_update);
        for node in self.nodes.values_mut() {
            any |= std::mem::take(&mut node.needs_update);
        }
        any
    }

    // ========================================================================
    // Animation
    // ========================================================================

    /// Animates one transform channel of `target` from its current value to
    /// `to`. Replaces any tween already running on that channel.
    pub fn animate(
        &mut self,
        target: NodeHandle,
        channel: TweenChannel,
        to: f32,
        duration: f32,
        ease: Ease,
        redraw_parent: bool,
    ) -> bool {
        self.tweens.animate(
            &self.nodes,
            TweenKey { target, channel },
            to,
            duration,
            ease,
            redraw_parent,
        )
    }

    /// Advances running tweens. Called once per render-loop tick.
    /// Returns whether any node moved.
    pub fn update(&mut self, dt: f32) -> bool {
        let step = self.tweens.update(dt, &mut self.nodes);
        self.needs_update |= step.redraw_root;
        step.stepped
    }

    // ========================================================================
    // Matrix update pipeline
    // ========================================================================

    /// Recomputes world matrices for every node reachable from a root.
    ///
    /// Uses an explicit stack to stay safe on deep hierarchies.
    pub fn update_matrix_world(&mut self) {
        let mut stack: Vec<(NodeHandle, Affine3A, bool)> = self
            .root_nodes
            .iter()
            .rev()
            .map(|&h| (h, Affine3A::IDENTITY, false))
            .collect();

        while let Some((handle, parent_world, parent_changed)) = stack.pop() {
            let Some(node) = self.nodes.get_mut(handle) else {
                continue;
            };

            let local_changed = node.transform.update_local_matrix();
            let changed = local_changed || parent_changed;
            if changed {
                let world = parent_world * *node.transform.local_matrix();
                node.transform.set_world_matrix(world);
            }

            let world = node.transform.world_matrix;
            for &child in node.children.iter().rev() {
                stack.push((child, world, changed));
            }
        }
    }

    /// World matrix computed by walking up the parent chain, independent of
    /// the cached matrices.
    pub fn compute_world_matrix(&self, handle: NodeHandle) -> Result<Affine3A> {
        let missing = |h: NodeHandle| Error::NodeNotFound(format!("{h:?}"));
        let mut node = self.nodes.get(handle).ok_or_else(|| missing(handle))?;
        let mut matrix = node.transform.compose();
        while let Some(parent) = node.parent {
            node = self.nodes.get(parent).ok_or_else(|| missing(parent))?;
            matrix = node.transform.compose() * matrix;
        }
        Ok(matrix)
    }

    // ========================================================================
    // Instancing
    // ========================================================================

    /// Creates nodes for every entry of `subtree` under a new detached root
    /// named `name`, and returns that root.
    pub fn instantiate(&mut self, subtree: &VisualSubtree, name: &str) -> NodeHandle {
        let root = self.create_node(name);
        let mut mapping = Vec::with_capacity(subtree.nodes.len());

        for prefab_node in &subtree.nodes {
            let mut node = Node::new(prefab_node.name.as_deref().unwrap_or("Node"));
            node.transform = prefab_node.transform.clone();
            node.transform.mark_dirty();
            node.mesh.clone_from(&prefab_node.mesh);
            mapping.push(self.nodes.insert(node));
        }

        for (index, prefab_node) in subtree.nodes.iter().enumerate() {
            for &child in &prefab_node.children_indices {
                if let Some(&child_handle) = mapping.get(child) {
                    self.attach(child_handle, mapping[index]);
                }
            }
        }

        for &root_index in &subtree.root_indices {
            if let Some(&handle) = mapping.get(root_index) {
                self.attach(handle, root);
            }
        }

        root
    }
}
