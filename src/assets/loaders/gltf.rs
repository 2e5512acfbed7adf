//! glTF streaming.
//!
//! [`GltfStreamer`] reads `.gltf`/`.glb` files on a shared background
//! runtime, reporting byte progress per chunk, then converts the default
//! scene into a [`VisualSubtree`]: node hierarchy, TRS transforms, triangle
//! geometry and base-colour materials. Textures, skins and animations are
//! not loaded.

use std::path::{Path, PathBuf};
use std::sync::OnceLock;

use base64::Engine as _;
use glam::{Quat, Vec3, Vec4};
use tokio::io::AsyncReadExt;
use tokio::runtime::Runtime;

use crate::assets::streamer::{AssetStreamer, StreamSink};
use crate::assets::subtree::{SubtreeNode, VisualSubtree};
use crate::errors::{Error, Result};
use crate::resources::geometry::Geometry;
use crate::resources::material::{Material, MaterialType};
use crate::resources::mesh::Mesh;

const DEFAULT_CHUNK_SIZE: usize = 64 * 1024;

fn asset_runtime() -> Option<&'static Runtime> {
    static RUNTIME: OnceLock<Option<Runtime>> = OnceLock::new();
    RUNTIME
        .get_or_init(|| match Runtime::new() {
            Ok(rt) => Some(rt),
            Err(err) => {
                log::error!("Failed to create asset loader runtime: {err}");
                None
            }
        })
        .as_ref()
}

/// Streams glTF assets from a local directory.
#[derive(Debug, Clone)]
pub struct GltfStreamer {
    root_path: PathBuf,
    chunk_size: usize,
}

impl GltfStreamer {
    /// References passed to `load` resolve relative to `root`.
    pub fn new(root: impl AsRef<Path>) -> Self {
        Self {
            root_path: root.as_ref().to_path_buf(),
            chunk_size: DEFAULT_CHUNK_SIZE,
        }
    }

    /// Bytes read between progress ticks.
    #[must_use]
    pub fn with_chunk_size(mut self, chunk_size: usize) -> Self {
        self.chunk_size = chunk_size.max(1);
        self
    }

    #[inline]
    #[must_use]
    pub fn root_path(&self) -> &Path {
        &self.root_path
    }
}

impl AssetStreamer for GltfStreamer {
    fn load(&self, reference: &str, sink: StreamSink) {
        let path = self.root_path.join(reference);
        let chunk_size = self.chunk_size;

        let Some(runtime) = asset_runtime() else {
            sink.fail(Error::AssetLoad {
                reference: reference.to_string(),
                reason: "asset loader runtime unavailable".to_string(),
            });
            return;
        };

        log::debug!("Streaming glTF asset {}", path.display());

        runtime.spawn(async move {
            match load_gltf(&path, chunk_size, &sink).await {
                Ok(Some(subtree)) => {
                    sink.complete(subtree);
                }
                Ok(None) => {
                    log::debug!("glTF load of {} cancelled", path.display());
                }
                Err(err) => {
                    let reference = sink.reference().to_string();
                    sink.fail(Error::AssetLoad {
                        reference,
                        reason: err.to_string(),
                    });
                }
            }
        });
    }
}

/// Returns `Ok(None)` when the request was cancelled mid-way.
async fn load_gltf(path: &Path, chunk_size: usize, sink: &StreamSink) -> Result<Option<VisualSubtree>> {
    let Some(bytes) = read_with_progress(path, chunk_size, sink).await? else {
        return Ok(None);
    };

    let gltf = gltf::Gltf::from_slice(&bytes)?;
    let base_path = path.parent().unwrap_or(Path::new("./"));
    let buffers = load_buffers(&gltf, base_path).await?;

    if sink.is_cancelled() {
        return Ok(None);
    }

    build_subtree(&gltf.document, &buffers).map(Some)
}

async fn read_with_progress(path: &Path, chunk_size: usize, sink: &StreamSink) -> Result<Option<Vec<u8>>> {
    let mut file = tokio::fs::File::open(path).await?;
    let total = file.metadata().await?.len();

    let mut data = Vec::with_capacity(usize::try_from(total).unwrap_or(0));
    let mut chunk = vec![0u8; chunk_size];

    loop {
        if sink.is_cancelled() {
            return Ok(None);
        }
        let n = file.read(&mut chunk).await?;
        if n == 0 {
            break;
        }
        data.extend_from_slice(&chunk[..n]);
        sink.progress(data.len() as u64, total);
    }

    Ok(Some(data))
}

async fn load_buffers(gltf: &gltf::Gltf, base_path: &Path) -> Result<Vec<Vec<u8>>> {
    let mut buffer_data = Vec::new();
    for buffer in gltf.buffers() {
        match buffer.source() {
            gltf::buffer::Source::Bin => {
                let blob = gltf
                    .blob
                    .as_deref()
                    .ok_or_else(|| Error::Gltf("Missing GLB binary chunk".to_string()))?;
                buffer_data.push(blob.to_vec());
            }
            gltf::buffer::Source::Uri(uri) => {
                if let Some(payload) = uri.strip_prefix("data:") {
                    buffer_data.push(decode_data_uri(payload)?);
                } else {
                    let buffer_path = base_path.join(uri);
                    buffer_data.push(tokio::fs::read(&buffer_path).await?);
                }
            }
        }
    }
    Ok(buffer_data)
}

fn decode_data_uri(payload: &str) -> Result<Vec<u8>> {
    let (_, encoded) = payload
        .split_once(";base64,")
        .ok_or_else(|| Error::Gltf("Only base64 data URIs are supported".to_string()))?;
    base64::engine::general_purpose::STANDARD
        .decode(encoded)
        .map_err(|e| Error::Gltf(format!("Invalid base64 buffer: {e}")))
}

/// Converts the default (or first) glTF scene into a subtree.
///
/// Nodes keep their glTF indices; a mesh with several primitives gets one
/// child node per primitive.
pub fn build_subtree(document: &gltf::Document, buffers: &[Vec<u8>]) -> Result<VisualSubtree> {
    let mut subtree = VisualSubtree::new();

    for node in document.nodes() {
        let mut entry = SubtreeNode::new();
        entry.name = Some(
            node.name()
                .map_or_else(|| format!("Node_{}", node.index()), ToString::to_string),
        );

        let (t, r, s) = node.transform().decomposed();
        entry.transform.position = Vec3::from_array(t);
        entry.transform.set_quaternion(Quat::from_array(r));
        entry.transform.scale = Vec3::from_array(s);

        entry.children_indices = node.children().map(|c| c.index()).collect();
        subtree.push(entry);
    }

    for node in document.nodes() {
        let Some(mesh) = node.mesh() else {
            continue;
        };
        let mut meshes = Vec::new();
        for primitive in mesh.primitives() {
            if let Some(m) = build_mesh(&primitive, buffers)? {
                meshes.push(m);
            }
        }

        if meshes.len() == 1 {
            subtree.nodes[node.index()].mesh = meshes.pop();
        } else {
            for (i, m) in meshes.into_iter().enumerate() {
                let name = format!("{}_primitive_{i}", mesh.name().unwrap_or("Mesh"));
                let child = subtree.push(SubtreeNode::with_mesh(&name, m));
                subtree.nodes[node.index()].children_indices.push(child);
            }
        }
    }

    subtree.root_indices = match document.default_scene().or_else(|| document.scenes().next()) {
        Some(scene) => scene.nodes().map(|n| n.index()).collect(),
        None => {
            let mut is_child = vec![false; subtree.nodes.len()];
            for entry in &subtree.nodes {
                for &c in &entry.children_indices {
                    is_child[c] = true;
                }
            }
            (0..document.nodes().count()).filter(|&i| !is_child[i]).collect()
        }
    };

    Ok(subtree)
}

fn build_mesh(primitive: &gltf::Primitive, buffers: &[Vec<u8>]) -> Result<Option<Mesh>> {
    if primitive.mode() != gltf::mesh::Mode::Triangles {
        log::warn!("Skipping non-triangle glTF primitive ({:?})", primitive.mode());
        return Ok(None);
    }

    let reader = primitive.reader(|buffer| buffers.get(buffer.index()).map(Vec::as_slice));

    let positions: Vec<[f32; 3]> = reader
        .read_positions()
        .ok_or_else(|| Error::Gltf("Primitive without POSITION attribute".to_string()))?
        .collect();

    let mut geometry = Geometry::with_positions(positions);
    if let Some(normals) = reader.read_normals() {
        geometry.normals = normals.collect();
    }
    if let Some(uvs) = reader.read_tex_coords(0) {
        geometry.uvs = uvs.into_f32().collect();
    }
    geometry.indices = match reader.read_indices() {
        Some(indices) => indices.into_u32().collect(),
        None => (0..geometry.vertex_count() as u32).collect(),
    };
    geometry.compute_bounding_box();

    let gltf_material = primitive.material();
    let pbr = gltf_material.pbr_metallic_roughness();
    let mut material = Material::new_standard(Vec4::from_array(pbr.base_color_factor()));
    if let MaterialType::Standard(standard) = &mut material.data {
        standard.roughness = pbr.roughness_factor();
        standard.metalness = pbr.metallic_factor();
    }
    if let Some(name) = gltf_material.name() {
        material.name = Some(name.to_string());
    }

    Ok(Some(Mesh::new(geometry, material)))
}
