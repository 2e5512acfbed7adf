use rustc_hash::FxHashMap;

use crate::errors::{Error, Result};
use crate::parametric::descriptor::{BaseParametricType, ParametricDescriptor, ParametricMesh, SubParametricData};
use crate::parametric::doors;

/// Synchronous geometry synthesis for parametric items.
pub trait GeometryProvider {
    /// Builds the mesh for `descriptor`, or fails with
    /// [`Error::UnsupportedParametricType`] when nothing handles it.
    fn generate(&self, descriptor: &ParametricDescriptor) -> Result<ParametricMesh>;
}

pub type ParametricFactory = Box<dyn Fn(&SubParametricData) -> Result<ParametricMesh>>;

/// Maps base parametric type tags to generator functions.
#[derive(Default)]
pub struct ParametricRegistry {
    factories: FxHashMap<u32, ParametricFactory>,
}

impl ParametricRegistry {
    /// Empty registry: every descriptor is unsupported.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Registry with the built-in families (doors).
    #[must_use]
    pub fn with_defaults() -> Self {
        let mut registry = Self::new();
        registry.register(BaseParametricType::DOOR, doors::create_door);
        registry
    }

    /// Registers (or replaces) the generator for `base_type`.
    pub fn register<F>(&mut self, base_type: u32, factory: F)
    where
        F: Fn(&SubParametricData) -> Result<ParametricMesh> + 'static,
    {
        if self.factories.insert(base_type, Box::new(factory)).is_some() {
            log::debug!("Replaced parametric generator for base type {base_type}");
        }
    }

    #[must_use]
    pub fn supports(&self, base_type: u32) -> bool {
        self.factories.contains_key(&base_type)
    }
}

impl GeometryProvider for ParametricRegistry {
    fn generate(&self, descriptor: &ParametricDescriptor) -> Result<ParametricMesh> {
        let factory = self
            .factories
            .get(&descriptor.base_type)
            .ok_or(Error::UnsupportedParametricType {
                base: descriptor.base_type,
                sub: None,
            })?;
        factory(&descriptor.sub)
    }
}
