//! Asset acquisition: the streamer boundary and the detached subtrees it
//! produces.

#[cfg(not(target_arch = "wasm32"))]
pub mod loaders;
pub mod streamer;
pub mod subtree;

#[cfg(all(feature = "gltf", not(target_arch = "wasm32")))]
pub use loaders::GltfStreamer;
pub use streamer::{AssetStreamer, LoadProgress, LoadTicket, MemoryStreamer, StreamMessage, StreamSink};
pub use subtree::{SubtreeNode, VisualSubtree};
