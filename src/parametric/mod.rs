//! Procedurally generated item visuals.
//!
//! A [`ParametricDescriptor`] names a base type (a family such as doors) and
//! carries family-specific data. The [`ParametricRegistry`] dispatches on the
//! base type; an unknown base or sub type is an error, never a fallback mesh.

pub mod descriptor;
pub mod doors;
pub mod registry;

pub use descriptor::{BaseParametricType, ParametricDescriptor, ParametricMesh, SubParametricData};
pub use doors::{DoorParameters, DoorType};
pub use registry::{GeometryProvider, ParametricFactory, ParametricRegistry};
