use glam::Vec3;
use serde::{Deserialize, Serialize};

use crate::errors::Result;
use crate::model::item_model::ItemModel;
use crate::model::surface::{IntersectionPlane, Placement};
use crate::parametric::ParametricDescriptor;

/// Serialized form of an item, as stored in a floor plan.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ItemDescriptor {
    #[serde(default)]
    pub item_name: String,
    #[serde(rename = "modelURL", default, skip_serializing_if = "Option::is_none")]
    pub model_url: Option<String>,
    #[serde(default)]
    pub position: Vec3,
    #[serde(default)]
    pub rotation: Vec3,
    #[serde(default = "default_visible")]
    pub visible: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parametric: Option<ParametricDescriptor>,
    #[serde(default)]
    pub placement: Placement,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub intersection_planes: Vec<IntersectionPlane>,
}

fn default_visible() -> bool {
    true
}

impl ItemDescriptor {
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    #[must_use]
    pub fn into_model(self) -> ItemModel {
        let mut model = ItemModel::new(&self.item_name)
            .with_position(self.position)
            .with_rotation(self.rotation)
            .with_placement(self.placement)
            .with_intersection_planes(self.intersection_planes);
        if let Some(url) = &self.model_url {
            model = model.with_model_url(url);
        }
        if let Some(parametric) = self.parametric {
            model = model.with_parametric(parametric);
        }
        if !self.visible {
            model.set_visible(false);
        }
        model
    }
}

impl From<&ItemModel> for ItemDescriptor {
    fn from(model: &ItemModel) -> Self {
        Self {
            item_name: model.name().to_string(),
            model_url: model.model_url().map(ToString::to_string),
            position: model.position(),
            rotation: model.rotation(),
            visible: model.visible(),
            parametric: model.parametric().cloned(),
            placement: model.placement(),
            intersection_planes: model.intersection_planes().to_vec(),
        }
    }
}
