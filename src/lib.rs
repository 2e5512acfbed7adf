#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::cast_precision_loss)]
#![allow(clippy::cast_possible_truncation)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::missing_panics_doc)]

//! Placed-item visuals for the Myth scene graph.
//!
//! An [`ItemModel`] describes a placed object; a [`VisualItem`] keeps a scene
//! subtree in step with it. Visuals are either streamed through an
//! [`AssetStreamer`] or synthesized by a [`GeometryProvider`], get a
//! placeholder box and a selection highlight sized to their bounds, and
//! follow model changes through short tweens.

pub mod animation;
pub mod assets;
pub mod config;
pub mod errors;
pub mod item;
pub mod model;
pub mod parametric;
pub mod resources;
pub mod scene;
pub mod utils;
pub mod viewer;

pub use animation::{Ease, Tween, TweenChannel, TweenScheduler};
#[cfg(all(feature = "gltf", not(target_arch = "wasm32")))]
pub use assets::GltfStreamer;
pub use assets::{AssetStreamer, LoadProgress, MemoryStreamer, StreamMessage, StreamSink, VisualSubtree};
pub use config::ItemSettings;
pub use errors::{Error, Result};
pub use item::{AcquisitionState, ItemBounds, ItemEvent, VisualItem};
pub use model::{IntersectionPlane, ItemDescriptor, ItemModel, ItemProperty, Placement, SharedModel, SurfaceKind};
pub use parametric::{GeometryProvider, ParametricDescriptor, ParametricRegistry, SubParametricData};
pub use resources::primitives::*;
pub use resources::{BoundingBox, Geometry, Material, Mesh};
pub use scene::{Node, NodeHandle, Scene, SharedScene, Transform};
pub use utils::Timer;
pub use viewer::{ItemKey, PickHit, Viewer};
