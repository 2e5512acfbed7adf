//! The non-visual item model and its change notifications.

pub mod descriptor;
pub mod item_model;
pub mod surface;

pub use descriptor::ItemDescriptor;
pub use item_model::{ChangeListener, ItemModel, ItemProperty, SharedModel, SubscriptionId};
pub use surface::{IntersectionPlane, Placement, SurfaceKind};
