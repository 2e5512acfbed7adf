//! Scene Integration Tests
//!
//! Tests for:
//! - Scene: create/remove nodes, attach/detach hierarchy
//! - World matrix propagation
//! - Instancing a VisualSubtree
//! - Redraw hints

use glam::{Affine3A, Vec3};
use myth_items::assets::{SubtreeNode, VisualSubtree};
use myth_items::resources::material::Material;
use myth_items::resources::mesh::Mesh;
use myth_items::resources::primitives::create_box;
use myth_items::Error;
use myth_items::scene::{Node, Scene};

const EPSILON: f32 = 1e-5;

fn approx_vec3(a: Vec3, b: Vec3) -> bool {
    (a - b).abs().max_element() < EPSILON
}

// ============================================================================
// Node Creation & Removal
// ============================================================================

#[test]
fn create_node_is_detached() {
    let mut scene = Scene::new();
    let handle = scene.create_node("Loose");
    assert_eq!(scene.get_node(handle).unwrap().name, "Loose");
    assert!(!scene.root_nodes.contains(&handle));
    assert!(scene.get_node(handle).unwrap().parent().is_none());
}

#[test]
fn add_node_to_root() {
    let mut scene = Scene::new();
    let handle = scene.add_node(Node::new("Root"));
    assert!(scene.root_nodes.contains(&handle));
}

#[test]
fn remove_node_removes_subtree() {
    let mut scene = Scene::new();
    let root = scene.add_node(Node::new("Root"));
    let child = scene.add_to_parent(Node::new("Child"), root);
    let grandchild = scene.add_to_parent(Node::new("Grandchild"), child);

    scene.remove_node(child);

    assert!(scene.get_node(child).is_none());
    assert!(scene.get_node(grandchild).is_none());
    assert!(scene.get_node(root).unwrap().children().is_empty());
}

#[test]
fn remove_node_cancels_its_tweens() {
    let mut scene = Scene::new();
    let node = scene.add_node(Node::new("Moving"));
    scene.animate(node, myth_items::TweenChannel::PositionX, 5.0, 1.0, myth_items::Ease::Linear, false);
    assert_eq!(scene.tweens.len(), 1);

    scene.remove_node(node);
    assert!(scene.tweens.is_empty());
}

// ============================================================================
// Hierarchy
// ============================================================================

#[test]
fn attach_moves_between_parents() {
    let mut scene = Scene::new();
    let a = scene.add_node(Node::new("A"));
    let b = scene.add_node(Node::new("B"));
    let child = scene.add_to_parent(Node::new("Child"), a);

    scene.attach(child, b);

    assert!(!scene.is_child_of(child, a));
    assert!(scene.is_child_of(child, b));
    assert_eq!(scene.get_node(child).unwrap().parent(), Some(b));
}

#[test]
fn attach_root_node_leaves_root_list() {
    let mut scene = Scene::new();
    let parent = scene.add_node(Node::new("Parent"));
    let other = scene.add_node(Node::new("Other"));

    scene.attach(other, parent);

    assert!(!scene.root_nodes.contains(&other));
    assert!(scene.is_child_of(other, parent));
}

#[test]
fn attach_to_self_is_noop() {
    let mut scene = Scene::new();
    let node = scene.add_node(Node::new("Solo"));
    scene.attach(node, node);
    assert!(scene.get_node(node).unwrap().children().is_empty());
    assert!(scene.root_nodes.contains(&node));
}

#[test]
fn detach_keeps_node_alive() {
    let mut scene = Scene::new();
    let parent = scene.add_node(Node::new("Parent"));
    let child = scene.add_to_parent(Node::new("Child"), parent);

    scene.detach(child);

    assert!(scene.get_node(child).is_some());
    assert!(!scene.is_child_of(child, parent));
    assert!(!scene.root_nodes.contains(&child));
}

// ============================================================================
// World Matrices & Bounds
// ============================================================================

#[test]
fn world_matrix_composes_parent_chain() {
    let mut scene = Scene::new();
    let mut parent = Node::new("Parent");
    parent.transform.position = Vec3::new(1.0, 0.0, 0.0);
    let parent = scene.add_node(parent);
    let mut child = Node::new("Child");
    child.transform.position = Vec3::new(0.0, 2.0, 0.0);
    let child = scene.add_to_parent(child, parent);

    scene.update_matrix_world();

    let world = scene.get_node(child).unwrap().world_matrix().translation;
    assert!(approx_vec3(Vec3::from(world), Vec3::new(1.0, 2.0, 0.0)));
    let computed = scene.compute_world_matrix(child).unwrap();
    assert!(approx_vec3(computed.transform_point3(Vec3::ZERO), Vec3::new(1.0, 2.0, 0.0)));
}

#[test]
fn world_matrix_follows_parent_moves() {
    let mut scene = Scene::new();
    let parent = scene.add_node(Node::new("Parent"));
    let child = scene.add_to_parent(Node::new("Child"), parent);
    scene.update_matrix_world();

    scene.get_node_mut(parent).unwrap().transform.position = Vec3::new(0.0, 0.0, 3.0);
    scene.update_matrix_world();

    let world: Affine3A = *scene.get_node(child).unwrap().world_matrix();
    assert!(approx_vec3(world.transform_point3(Vec3::ZERO), Vec3::new(0.0, 0.0, 3.0)));
}

#[test]
fn world_matrix_of_removed_node_is_an_error() {
    let mut scene = Scene::new();
    let parent = scene.add_node(Node::new("Parent"));
    let child = scene.add_to_parent(Node::new("Child"), parent);
    scene.remove_node(parent);

    assert!(matches!(scene.compute_world_matrix(child), Err(Error::NodeNotFound(_))));
}

// ============================================================================
// Instancing
// ============================================================================

#[test]
fn instantiate_rebuilds_hierarchy_under_detached_root() {
    let mut subtree = VisualSubtree::new();
    let body = subtree.push(SubtreeNode::with_mesh(
        "Body",
        Mesh::new(create_box(1.0, 1.0, 1.0), Material::default()),
    ));
    let mut lid = SubtreeNode::new();
    lid.name = Some("Lid".to_string());
    lid.transform.position = Vec3::Y;
    let lid = subtree.push(lid);
    subtree.nodes[body].children_indices.push(lid);
    subtree.root_indices.push(body);

    let mut scene = Scene::new();
    let root = scene.instantiate(&subtree, "Chest");

    assert!(!scene.root_nodes.contains(&root));
    let root_node = scene.get_node(root).unwrap();
    assert_eq!(root_node.children().len(), 1);

    let body_handle = root_node.children()[0];
    let body_node = scene.get_node(body_handle).unwrap();
    assert_eq!(body_node.name, "Body");
    assert!(body_node.mesh.is_some());

    let lid_node = scene.get_node(body_node.children()[0]).unwrap();
    assert_eq!(lid_node.name, "Lid");
    assert_eq!(lid_node.transform.position, Vec3::Y);
}

// ============================================================================
// Redraw Hints
// ============================================================================

#[test]
fn take_needs_update_clears_flag() {
    let mut scene = Scene::new();
    let node = scene.add_node(Node::new("Node"));

    scene.mark_needs_update(node);
    assert!(scene.take_needs_update(node));
    assert!(!scene.take_needs_update(node));
    assert!(!scene.take_any_needs_update());
}

#[test]
fn parent_redraw_hint_falls_back_to_scene_for_roots() {
    let mut scene = Scene::new();
    let root = scene.add_node(Node::new("Root"));
    let child = scene.add_to_parent(Node::new("Child"), root);

    scene.mark_parent_needs_update(child);
    assert!(scene.take_needs_update(root));
    assert!(!scene.needs_update);

    scene.mark_parent_needs_update(root);
    assert!(scene.needs_update);
    assert!(scene.take_any_needs_update());
    assert!(!scene.needs_update);
}
