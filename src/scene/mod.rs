//! Scene graph module
//!
//! Manages the scene hierarchy and its components:
//! - Node: scene node (parent/child links, transform, optional mesh)
//! - Transform: position, Euler rotation, scale
//! - Scene: node arena, hierarchy edits, tween scheduling

pub mod node;
pub mod scene;
pub mod transform;

pub use node::Node;
pub use scene::{Scene, SharedScene};
pub use transform::Transform;

use slotmap::new_key_type;

new_key_type! {
    pub struct NodeHandle;
}
