pub mod box_shape;
pub mod edges;

pub use box_shape::create_box;
pub use edges::create_box_edges;
