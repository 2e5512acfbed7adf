//! Parametric Geometry Tests
//!
//! Tests for:
//! - ParametricRegistry dispatch, custom families and unsupported types
//! - Door family: flat and framed variants, parameter defaults
//! - Descriptor JSON shape

use glam::Vec3;

use myth_items::errors::Error;
use myth_items::parametric::{
    BaseParametricType, DoorParameters, DoorType, GeometryProvider, ParametricDescriptor, ParametricMesh,
    ParametricRegistry, SubParametricData,
};
use myth_items::resources::material::{Material, color_from_hex};
use myth_items::resources::primitives::create_box;

const EPSILON: f32 = 1e-4;

fn vec3_approx(a: Vec3, b: Vec3) -> bool {
    (a - b).abs().max_element() < EPSILON
}

fn door(sub: SubParametricData) -> ParametricDescriptor {
    ParametricDescriptor::new(BaseParametricType::DOOR, sub)
}

// ============================================================================
// Registry
// ============================================================================

#[test]
fn empty_registry_supports_nothing() {
    let registry = ParametricRegistry::new();
    let err = registry.generate(&door(SubParametricData::new(DoorType::FLAT))).unwrap_err();
    assert!(matches!(err, Error::UnsupportedParametricType { base: 1, sub: None }));
    assert_eq!(err.to_string(), "Unsupported parametric type: base 1");
}

#[test]
fn defaults_register_doors() {
    let registry = ParametricRegistry::with_defaults();
    assert!(registry.supports(BaseParametricType::DOOR));
    assert!(!registry.supports(2));
}

#[test]
fn custom_family_can_be_registered() {
    let mut registry = ParametricRegistry::with_defaults();
    registry.register(7, |sub| {
        let side = sub.params.get("side").and_then(serde_json::Value::as_f64).unwrap_or(1.0) as f32;
        Ok(ParametricMesh {
            geometry: create_box(side, side, side),
            material: Material::new_basic(color_from_hex(0xFFFFFF)),
        })
    });

    let descriptor = ParametricDescriptor::new(7, SubParametricData::new(0).with_param("side", 3.0));
    let mesh = registry.generate(&descriptor).unwrap();
    assert!(vec3_approx(mesh.geometry.bounding_box().unwrap().size(), Vec3::splat(3.0)));
}

#[test]
fn unsupported_sub_type_names_both_tags() {
    let registry = ParametricRegistry::with_defaults();
    let err = registry.generate(&door(SubParametricData::new(9))).unwrap_err();
    assert_eq!(err.to_string(), "Unsupported parametric type: base 1, sub 9");
}

// ============================================================================
// Doors
// ============================================================================

#[test]
fn flat_door_defaults() {
    let registry = ParametricRegistry::with_defaults();
    let mesh = registry.generate(&door(SubParametricData::new(DoorType::FLAT))).unwrap();
    let defaults = DoorParameters::default();

    let size = mesh.geometry.bounding_box().unwrap().size();
    assert!(vec3_approx(size, Vec3::new(defaults.width, defaults.height, defaults.thickness)));
    assert_eq!(mesh.material.name.as_deref(), Some("Door"));
}

#[test]
fn framed_door_is_centered() {
    let registry = ParametricRegistry::with_defaults();
    let sub = SubParametricData::new(DoorType::FRAMED)
        .with_param("width", 80.0)
        .with_param("height", 210.0)
        .with_param("frameWidth", 8.0);
    let mesh = registry.generate(&door(sub)).unwrap();

    let bbox = mesh.geometry.bounding_box().unwrap();
    assert!(vec3_approx(bbox.center(), Vec3::ZERO));
    assert!(vec3_approx(bbox.size(), Vec3::new(80.0, 210.0, DoorParameters::default().frame_depth)));
}

#[test]
fn oversized_frame_is_rejected() {
    let registry = ParametricRegistry::with_defaults();
    let sub = SubParametricData::new(DoorType::FRAMED)
        .with_param("width", 10.0)
        .with_param("frameWidth", 6.0);
    assert!(matches!(registry.generate(&door(sub)), Err(Error::InvalidParametricData(_))));
}

#[test]
fn malformed_parameters_are_rejected() {
    let registry = ParametricRegistry::with_defaults();
    let sub = SubParametricData::new(DoorType::FLAT).with_param("width", "wide");
    assert!(matches!(registry.generate(&door(sub)), Err(Error::InvalidParametricData(_))));
}

#[test]
fn synthesized_mesh_becomes_single_node_subtree() {
    let registry = ParametricRegistry::with_defaults();
    let subtree = registry
        .generate(&door(SubParametricData::new(DoorType::FLAT)))
        .unwrap()
        .into_subtree("Door");

    assert_eq!(subtree.nodes.len(), 1);
    assert_eq!(subtree.root_indices, vec![0]);
    assert_eq!(subtree.mesh_count(), 1);
}

// ============================================================================
// Serialization
// ============================================================================

#[test]
fn descriptor_flattens_family_parameters() -> anyhow::Result<()> {
    let descriptor = door(SubParametricData::new(DoorType::FLAT).with_param("width", 70.0));
    let json = serde_json::to_value(&descriptor)?;

    assert_eq!(json["baseParametricType"], 1);
    assert_eq!(json["subParametricData"]["type"], 1);
    assert_eq!(json["subParametricData"]["width"], 70.0);

    let back: ParametricDescriptor = serde_json::from_value(json)?;
    assert_eq!(back, descriptor);
    Ok(())
}
