pub mod geometry;
pub mod material;
pub mod mesh;
pub mod primitives;

pub use geometry::{BoundingBox, Geometry, PrimitiveTopology};
pub use material::{LineBasicMaterial, Material, MaterialType, MeshBasicMaterial, MeshStandardMaterial, color_from_hex};
pub use mesh::Mesh;
