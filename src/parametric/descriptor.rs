use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::assets::subtree::VisualSubtree;
use crate::errors::{Error, Result};
use crate::resources::geometry::Geometry;
use crate::resources::material::Material;
use crate::resources::mesh::Mesh;

/// Base parametric type tags.
pub struct BaseParametricType;

impl BaseParametricType {
    pub const DOOR: u32 = 1;
}

/// Family-specific part of a parametric descriptor: a sub type tag plus
/// free-form parameters the family's generator interprets.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct SubParametricData {
    #[serde(rename = "type")]
    pub sub_type: u32,
    #[serde(flatten)]
    pub params: Map<String, Value>,
}

impl SubParametricData {
    #[must_use]
    pub fn new(sub_type: u32) -> Self {
        Self { sub_type, params: Map::new() }
    }

    #[must_use]
    pub fn with_param(mut self, key: &str, value: impl Into<Value>) -> Self {
        self.params.insert(key.to_string(), value.into());
        self
    }

    /// Deserializes the parameters into a family's parameter struct.
    pub fn parse<T: serde::de::DeserializeOwned>(&self) -> Result<T> {
        serde_json::from_value(Value::Object(self.params.clone()))
            .map_err(|e| Error::InvalidParametricData(e.to_string()))
    }
}

/// Everything needed to synthesize a parametric item's visual.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ParametricDescriptor {
    #[serde(rename = "baseParametricType")]
    pub base_type: u32,
    #[serde(rename = "subParametricData")]
    pub sub: SubParametricData,
}

impl ParametricDescriptor {
    #[must_use]
    pub fn new(base_type: u32, sub: SubParametricData) -> Self {
        Self { base_type, sub }
    }
}

/// Output of a parametric generator.
#[derive(Debug, Clone)]
pub struct ParametricMesh {
    pub geometry: Geometry,
    pub material: Material,
}

impl ParametricMesh {
    #[must_use]
    pub fn into_subtree(self, name: &str) -> VisualSubtree {
        VisualSubtree::from_mesh(name, Mesh::new(self.geometry, self.material).with_name(name))
    }
}
