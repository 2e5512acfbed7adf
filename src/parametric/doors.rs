//! Parametric doors.
//!
//! All doors are centered on the origin: width along X, height along Y,
//! thickness along Z.

use glam::{Affine3A, Vec3};
use serde::Deserialize;

use crate::errors::{Error, Result};
use crate::parametric::descriptor::{BaseParametricType, ParametricMesh, SubParametricData};
use crate::resources::geometry::Geometry;
use crate::resources::material::{Material, color_from_hex};
use crate::resources::primitives::create_box;

/// Door sub type tags.
pub struct DoorType;

impl DoorType {
    /// A single slab.
    pub const FLAT: u32 = 1;
    /// A slab inside a three-sided frame.
    pub const FRAMED: u32 = 2;
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct DoorParameters {
    pub width: f32,
    pub height: f32,
    pub thickness: f32,
    pub frame_width: f32,
    pub frame_depth: f32,
    pub color: u32,
}

impl Default for DoorParameters {
    fn default() -> Self {
        Self {
            width: 100.0,
            height: 200.0,
            thickness: 4.0,
            frame_width: 6.0,
            frame_depth: 10.0,
            color: 0x00C8_A27A,
        }
    }
}

impl DoorParameters {
    fn validate(&self, sub_type: u32) -> Result<()> {
        if self.width <= 0.0 || self.height <= 0.0 || self.thickness <= 0.0 {
            return Err(Error::InvalidParametricData(format!(
                "door dimensions must be positive (width {}, height {}, thickness {})",
                self.width, self.height, self.thickness
            )));
        }
        if sub_type == DoorType::FRAMED
            && (self.frame_width <= 0.0 || self.frame_width * 2.0 >= self.width || self.frame_width >= self.height)
        {
            return Err(Error::InvalidParametricData(format!(
                "frame width {} does not fit a {}x{} door",
                self.frame_width, self.width, self.height
            )));
        }
        Ok(())
    }
}

/// Generator registered for [`BaseParametricType::DOOR`].
pub fn create_door(sub: &SubParametricData) -> Result<ParametricMesh> {
    let params: DoorParameters = sub.parse()?;

    let geometry = match sub.sub_type {
        DoorType::FLAT => {
            params.validate(sub.sub_type)?;
            create_box(params.width, params.height, params.thickness)
        }
        DoorType::FRAMED => {
            params.validate(sub.sub_type)?;
            framed_door(&params)
        }
        other => {
            return Err(Error::UnsupportedParametricType {
                base: BaseParametricType::DOOR,
                sub: Some(other),
            });
        }
    };

    Ok(ParametricMesh {
        geometry,
        material: Material::new_standard(color_from_hex(params.color)).with_name("Door"),
    })
}

fn framed_door(p: &DoorParameters) -> Geometry {
    let fw = p.frame_width;
    let depth = p.frame_depth.max(p.thickness);
    let jamb_x = p.width / 2.0 - fw / 2.0;
    let head_y = p.height / 2.0 - fw / 2.0;

    let mut geometry = Geometry::new();

    let left = create_box(fw, p.height, depth);
    geometry.merge(&left, &Affine3A::from_translation(Vec3::new(-jamb_x, 0.0, 0.0)));
    geometry.merge(&left, &Affine3A::from_translation(Vec3::new(jamb_x, 0.0, 0.0)));

    let head = create_box(p.width - 2.0 * fw, fw, depth);
    geometry.merge(&head, &Affine3A::from_translation(Vec3::new(0.0, head_y, 0.0)));

    let slab = create_box(p.width - 2.0 * fw, p.height - fw, p.thickness);
    geometry.merge(&slab, &Affine3A::from_translation(Vec3::new(0.0, -fw / 2.0, 0.0)));

    geometry.compute_bounding_box();
    geometry
}
