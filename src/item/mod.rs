//! Scene-side representation of a placed item.

pub mod events;
pub mod visual_item;

pub use events::{AcquisitionState, ItemEvent};
pub use visual_item::{ItemBounds, VisualItem};
