//! Tunables shared by every [`VisualItem`](crate::item::VisualItem).

use serde::{Deserialize, Serialize};

use crate::animation::Ease;
use crate::errors::Result;

/// Settings for item visuals.
///
/// Every field has a default, so a partial JSON document only overrides
/// what it names:
///
/// ```rust,ignore
/// let settings = ItemSettings::from_json(r#"{ "animationDuration": 0.3 }"#)?;
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ItemSettings {
    /// Seconds a model-driven transform change takes to converge.
    pub animation_duration: f32,
    pub ease: Ease,
    /// 0xRRGGBB colour of the selection wireframe.
    pub highlight_color: u32,
    pub highlight_line_width: f32,
    /// Asset reference string that means "no asset".
    pub placeholder_reference: String,
}

impl Default for ItemSettings {
    fn default() -> Self {
        Self {
            animation_duration: 0.15,
            ease: Ease::Power1Out,
            highlight_color: 0x0000_00F0,
            highlight_line_width: 5.0,
            placeholder_reference: "undefined".to_string(),
        }
    }
}

impl ItemSettings {
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn partial_json_keeps_defaults() {
        let settings = ItemSettings::from_json(r#"{ "animationDuration": 0.3, "ease": "none" }"#).unwrap();
        assert!((settings.animation_duration - 0.3).abs() < f32::EPSILON);
        assert_eq!(settings.ease, Ease::Linear);
        assert_eq!(settings.highlight_color, 0x0000_00F0);
        assert_eq!(settings.placeholder_reference, "undefined");
    }
}
