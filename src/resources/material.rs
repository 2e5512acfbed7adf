use glam::Vec4;

/// Converts a packed `0xRRGGBB` colour into linear RGBA with full opacity.
#[must_use]
pub fn color_from_hex(hex: u32) -> Vec4 {
    let r = ((hex >> 16) & 0xFF) as f32 / 255.0;
    let g = ((hex >> 8) & 0xFF) as f32 / 255.0;
    let b = (hex & 0xFF) as f32 / 255.0;
    Vec4::new(r, g, b, 1.0)
}

// ============================================================================
// Specific Materials
// ============================================================================

/// Unlit surface.
#[derive(Debug, Clone, PartialEq)]
pub struct MeshBasicMaterial {
    pub color: Vec4,
}

/// Metallic-roughness surface.
#[derive(Debug, Clone, PartialEq)]
pub struct MeshStandardMaterial {
    pub color: Vec4,
    pub roughness: f32,
    pub metalness: f32,
}

/// Material for `LineList` geometry (wireframes, helpers).
#[derive(Debug, Clone, PartialEq)]
pub struct LineBasicMaterial {
    pub color: Vec4,
    pub line_width: f32,
}

#[derive(Debug, Clone, PartialEq)]
pub enum MaterialType {
    Basic(MeshBasicMaterial),
    Standard(MeshStandardMaterial),
    Line(LineBasicMaterial),
}

/// A material plus the flags every material shares.
///
/// `visible = false` keeps the owning mesh in the scene graph (for picking
/// and bounds) but excludes it from drawing.
#[derive(Debug, Clone, PartialEq)]
pub struct Material {
    pub name: Option<String>,
    pub data: MaterialType,
    pub visible: bool,
}

impl Material {
    #[must_use]
    pub fn new_basic(color: Vec4) -> Self {
        Self::from_type(MaterialType::Basic(MeshBasicMaterial { color }))
    }

    #[must_use]
    pub fn new_standard(color: Vec4) -> Self {
        Self::from_type(MaterialType::Standard(MeshStandardMaterial {
            color,
            roughness: 1.0,
            metalness: 0.0,
        }))
    }

    #[must_use]
    pub fn new_line(color: Vec4, line_width: f32) -> Self {
        Self::from_type(MaterialType::Line(LineBasicMaterial { color, line_width }))
    }

    fn from_type(data: MaterialType) -> Self {
        Self { name: None, data, visible: true }
    }

    #[must_use]
    pub fn with_name(mut self, name: &str) -> Self {
        self.name = Some(name.to_string());
        self
    }

    #[must_use]
    pub fn color(&self) -> Vec4 {
        match &self.data {
            MaterialType::Basic(m) => m.color,
            MaterialType::Standard(m) => m.color,
            MaterialType::Line(m) => m.color,
        }
    }
}

impl Default for Material {
    fn default() -> Self {
        Self::new_basic(Vec4::ONE)
    }
}
