//! Asset Streaming Tests
//!
//! Tests for:
//! - VisualSubtree bounds across node hierarchies
//! - MemoryStreamer progress/completion/failure messages
//! - StreamSink cancellation
//! - GltfStreamer: chunked progress, hierarchy conversion, missing files

use std::time::Duration;

use glam::Vec3;

use myth_items::assets::{AssetStreamer, MemoryStreamer, StreamMessage, StreamSink, SubtreeNode, VisualSubtree};
use myth_items::errors::Error;
use myth_items::resources::material::Material;
use myth_items::resources::mesh::Mesh;
use myth_items::resources::primitives::create_box;

const EPSILON: f32 = 1e-4;

fn vec3_approx(a: Vec3, b: Vec3) -> bool {
    (a - b).abs().max_element() < EPSILON
}

fn unit_box(name: &str) -> SubtreeNode {
    SubtreeNode::with_mesh(name, Mesh::new(create_box(1.0, 1.0, 1.0), Material::default()))
}

// ============================================================================
// VisualSubtree
// ============================================================================

#[test]
fn subtree_bounds_apply_nested_transforms() {
    let mut subtree = VisualSubtree::new();
    let mut root = SubtreeNode::new();
    root.transform.scale = Vec3::splat(2.0);
    let root = subtree.push(root);
    let mut child = unit_box("Child");
    child.transform.position = Vec3::new(1.0, 0.0, 0.0);
    let child = subtree.push(child);
    subtree.nodes[root].children_indices.push(child);
    subtree.root_indices.push(root);

    let bbox = subtree.compute_bounding_box();
    assert!(vec3_approx(bbox.min, Vec3::new(1.0, -1.0, -1.0)));
    assert!(vec3_approx(bbox.max, Vec3::new(3.0, 1.0, 1.0)));
    assert_eq!(subtree.mesh_count(), 1);
}

#[test]
fn subtree_without_meshes_has_empty_bounds() {
    let mut subtree = VisualSubtree::new();
    let root = subtree.push(SubtreeNode::new());
    subtree.root_indices.push(root);
    assert!(subtree.compute_bounding_box().is_empty());
}

#[test]
fn subtree_tolerates_cyclic_links() {
    let mut subtree = VisualSubtree::new();
    let a = subtree.push(unit_box("A"));
    let b = subtree.push(unit_box("B"));
    subtree.nodes[a].children_indices.push(b);
    subtree.nodes[b].children_indices.push(a);
    subtree.root_indices.push(a);

    assert!(vec3_approx(subtree.compute_bounding_box().size(), Vec3::ONE));
}

// ============================================================================
// MemoryStreamer
// ============================================================================

#[test]
fn memory_streamer_reports_progress_then_completes() {
    let mut streamer = MemoryStreamer::new();
    streamer.insert("box.glb", VisualSubtree::from_mesh("Box", Mesh::new(create_box(1.0, 1.0, 1.0), Material::default())), 1024);

    let (sink, rx) = StreamSink::channel("box.glb");
    streamer.load("box.glb", sink);

    let messages: Vec<_> = rx.try_iter().collect();
    assert_eq!(messages.len(), 2);
    assert!(matches!(messages[0], StreamMessage::Progress(p) if p.loaded == 1024 && p.total == 1024));
    assert!(matches!(&messages[1], StreamMessage::Completed(subtree) if subtree.mesh_count() == 1));
}

#[test]
fn memory_streamer_fails_unknown_reference() {
    let streamer = MemoryStreamer::new();
    let (sink, rx) = StreamSink::channel("missing.glb");
    streamer.load("missing.glb", sink);

    match rx.try_recv().unwrap() {
        StreamMessage::Failed(Error::AssetLoad { reference, .. }) => assert_eq!(reference, "missing.glb"),
        other => panic!("expected failure, got {other:?}"),
    }
}

#[test]
fn memory_streamer_respects_cancelled_ticket() {
    let mut streamer = MemoryStreamer::new();
    streamer.insert("box.glb", VisualSubtree::new(), 10);

    let (sink, rx) = StreamSink::channel("box.glb");
    sink.ticket().cancel();
    streamer.load("box.glb", sink);

    assert!(rx.try_recv().is_err());
}

// ============================================================================
// GltfStreamer
// ============================================================================

#[cfg(feature = "gltf")]
mod gltf_streaming {
    use super::*;
    use myth_items::assets::GltfStreamer;

    /// One triangle (0,0,0) (1,0,0) (0,1,0) under a root translated by +1 on Y.
    const TRIANGLE_GLTF: &str = r#"{
        "asset": { "version": "2.0" },
        "scene": 0,
        "scenes": [{ "nodes": [0] }],
        "nodes": [
            { "name": "Root", "translation": [0.0, 1.0, 0.0], "children": [1] },
            { "name": "Triangle", "mesh": 0 }
        ],
        "meshes": [{
            "name": "Triangle",
            "primitives": [{ "attributes": { "POSITION": 0 }, "indices": 1 }]
        }],
        "buffers": [{
            "byteLength": 44,
            "uri": "data:application/octet-stream;base64,AAAAAAAAAAAAAAAAAACAPwAAAAAAAAAAAAAAAAAAgD8AAAAAAAABAAIAAAA="
        }],
        "bufferViews": [
            { "buffer": 0, "byteOffset": 0, "byteLength": 36 },
            { "buffer": 0, "byteOffset": 36, "byteLength": 6 }
        ],
        "accessors": [
            {
                "bufferView": 0, "componentType": 5126, "count": 3, "type": "VEC3",
                "min": [0.0, 0.0, 0.0], "max": [1.0, 1.0, 0.0]
            },
            { "bufferView": 1, "componentType": 5123, "count": 3, "type": "SCALAR" }
        ]
    }"#;

    fn temp_dir() -> std::path::PathBuf {
        let dir = std::env::temp_dir().join(format!("myth-items-{}", uuid::Uuid::new_v4()));
        std::fs::create_dir_all(&dir).unwrap();
        dir
    }

    fn collect(rx: &flume::Receiver<StreamMessage>) -> Vec<StreamMessage> {
        let mut messages = Vec::new();
        while let Ok(message) = rx.recv_timeout(Duration::from_secs(10)) {
            let done = !matches!(message, StreamMessage::Progress(_));
            messages.push(message);
            if done {
                break;
            }
        }
        messages
    }

    #[test]
    fn gltf_streams_with_progress() -> anyhow::Result<()> {
        let dir = temp_dir();
        std::fs::write(dir.join("triangle.gltf"), TRIANGLE_GLTF)?;

        let streamer = GltfStreamer::new(&dir).with_chunk_size(256);
        let (sink, rx) = StreamSink::channel("triangle.gltf");
        streamer.load("triangle.gltf", sink);

        let messages = collect(&rx);
        let (last, progress) = messages.split_last().expect("no messages");
        assert!(progress.len() > 1, "expected several chunks, got {}", progress.len());

        let total = TRIANGLE_GLTF.len() as u64;
        match progress.last() {
            Some(StreamMessage::Progress(p)) => assert_eq!((p.loaded, p.total), (total, total)),
            other => panic!("expected progress, got {other:?}"),
        }

        let StreamMessage::Completed(subtree) = last else {
            panic!("expected completion, got {last:?}");
        };
        assert_eq!(subtree.root_indices, vec![0]);
        assert_eq!(subtree.mesh_count(), 1);
        assert_eq!(subtree.nodes[1].name.as_deref(), Some("Triangle"));

        let bbox = subtree.compute_bounding_box();
        assert!(vec3_approx(bbox.min, Vec3::new(0.0, 1.0, 0.0)));
        assert!(vec3_approx(bbox.max, Vec3::new(1.0, 2.0, 0.0)));

        std::fs::remove_dir_all(dir)?;
        Ok(())
    }

    #[test]
    fn gltf_missing_file_fails() {
        let dir = temp_dir();
        let streamer = GltfStreamer::new(&dir);
        let (sink, rx) = StreamSink::channel("nope.glb");
        streamer.load("nope.glb", sink);

        let messages = collect(&rx);
        assert!(matches!(
            messages.as_slice(),
            [StreamMessage::Failed(Error::AssetLoad { reference, .. })] if reference == "nope.glb"
        ));
        let _ = std::fs::remove_dir_all(dir);
    }
}
