//! Scene description loaded from TOML.
//!
//! ```toml
//! [camera]
//! eye = [0.0, 0.0, 5.0]
//! screen_center = [0.0, 0.0, 2.5]
//!
//! [[objects]]
//! name = "spinning-cube"
//! shape = "cube"
//! radius = 0.2
//! material = 3
//! rotation_order = "xy"
//! spin = [1.0, 1.0, 0.0]
//! motion.x = { amplitude = 0.6, frequency = 1.0, wave = "cos" }
//! motion.z = { offset = 0.6, amplitude = 0.6, frequency = 1.0 }
//! ```

use std::collections::HashSet;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::numerics::Vector3;
use crate::transform::RotationOrder;

/// Errors raised while loading or validating a scene description.
#[derive(Debug, thiserror::Error)]
pub enum SceneError {
    #[error("Failed to read scene file {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse scene: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Invalid object {name:?}: {reason}")]
    InvalidObject { name: String, reason: String },

    #[error("Duplicate object name {0:?}")]
    DuplicateName(String),

    #[error("Invalid material {index}: {reason}")]
    InvalidMaterial { index: usize, reason: String },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ShapeKind {
    Sphere,
    Ellipsoid,
    Cylinder,
    Cube,
    Octahedron,
}

impl ShapeKind {
    /// Polytopes are intersections of planes; the rest are single quadrics.
    pub fn is_polytope(self) -> bool {
        matches!(self, ShapeKind::Cube | ShapeKind::Octahedron)
    }

    /// Shape type code read by the shader: 0 for quadrics, 1 for polytopes.
    pub fn type_code(self) -> i32 {
        if self.is_polytope() { 1 } else { 0 }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Wave {
    #[default]
    Sin,
    Cos,
}

/// One coordinate over time: `offset + amplitude * wave(frequency * t + phase)`.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AxisMotion {
    pub offset: f64,
    pub amplitude: f64,
    pub frequency: f64,
    pub phase: f64,
    pub wave: Wave,
}

impl AxisMotion {
    pub fn fixed(offset: f64) -> Self {
        Self { offset, ..Default::default() }
    }

    pub fn wave(amplitude: f64, frequency: f64, wave: Wave) -> Self {
        Self { amplitude, frequency, wave, ..Default::default() }
    }

    pub fn with_offset(mut self, offset: f64) -> Self {
        self.offset = offset;
        self
    }

    pub fn value_at(&self, t: f64) -> f64 {
        let angle = self.frequency * t + self.phase;
        let w = match self.wave {
            Wave::Sin => angle.sin(),
            Wave::Cos => angle.cos(),
        };
        self.offset + self.amplitude * w
    }
}

/// Per-axis motion of a position.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Motion {
    pub x: AxisMotion,
    pub y: AxisMotion,
    pub z: AxisMotion,
}

impl Motion {
    pub fn fixed(position: [f64; 3]) -> Self {
        Self {
            x: AxisMotion::fixed(position[0]),
            y: AxisMotion::fixed(position[1]),
            z: AxisMotion::fixed(position[2]),
        }
    }

    pub fn position_at(&self, t: f64) -> Vector3<f64> {
        Vector3::new(self.x.value_at(t), self.y.value_at(t), self.z.value_at(t))
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ObjectConfig {
    pub name: String,
    pub shape: ShapeKind,
    /// Sphere/cylinder radius or polytope plane distance.
    #[serde(default = "default_radius")]
    pub radius: f64,
    /// Radius of the bounding sphere sent to the shader; defaults to
    /// `radius`. Polytopes usually want it larger than the plane distance.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bounding_radius: Option<f64>,
    /// Ellipsoid semi-axes.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub extents: Option<[f64; 3]>,
    #[serde(default)]
    pub material: u32,
    #[serde(default)]
    pub rotation_order: RotationOrder,
    /// Angular rate about each axis, radians per second.
    #[serde(default)]
    pub spin: [f64; 3],
    #[serde(default = "default_scale")]
    pub scale: [f64; 3],
    #[serde(default)]
    pub motion: Motion,
}

fn default_radius() -> f64 {
    1.0
}

fn default_scale() -> [f64; 3] {
    [1.0, 1.0, 1.0]
}

fn default_rgb() -> [f64; 3] {
    [1.0, 1.0, 1.0]
}

impl ObjectConfig {
    pub fn new(name: impl Into<String>, shape: ShapeKind, radius: f64) -> Self {
        Self {
            name: name.into(),
            shape,
            radius,
            bounding_radius: None,
            extents: None,
            material: 0,
            rotation_order: RotationOrder::default(),
            spin: [0.0; 3],
            scale: default_scale(),
            motion: Motion::default(),
        }
    }

    pub fn with_material(mut self, material: u32) -> Self {
        self.material = material;
        self
    }

    pub fn with_spin(mut self, spin: [f64; 3]) -> Self {
        self.spin = spin;
        self
    }

    pub fn with_motion(mut self, motion: Motion) -> Self {
        self.motion = motion;
        self
    }

    pub fn with_bounding_radius(mut self, bounding_radius: f64) -> Self {
        self.bounding_radius = Some(bounding_radius);
        self
    }

    pub fn effective_bounding_radius(&self) -> f64 {
        self.bounding_radius.unwrap_or(self.radius)
    }

    fn invalid(&self, reason: impl Into<String>) -> SceneError {
        SceneError::InvalidObject { name: self.name.clone(), reason: reason.into() }
    }

    pub fn validate(&self) -> Result<(), SceneError> {
        if self.name.trim().is_empty() {
            return Err(self.invalid("name must not be empty"));
        }
        if !(self.radius > 0.0 && self.radius.is_finite()) {
            return Err(self.invalid(format!("radius must be positive, got {}", self.radius)));
        }
        if let Some(b) = self.bounding_radius {
            if !(b > 0.0 && b.is_finite()) {
                return Err(self.invalid(format!("bounding radius must be positive, got {}", b)));
            }
        }
        if self.scale.iter().any(|&s| s == 0.0 || !s.is_finite()) {
            return Err(self.invalid(format!("scale must be finite and non-zero, got {:?}", self.scale)));
        }
        match (self.shape, self.extents) {
            (ShapeKind::Ellipsoid, None) => {
                return Err(self.invalid("ellipsoid requires extents"));
            }
            (_, Some(extents)) if extents.iter().any(|&e| !(e > 0.0 && e.is_finite())) => {
                return Err(self.invalid(format!("extents must be positive, got {:?}", extents)));
            }
            _ => {}
        }
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LightConfig {
    #[serde(default)]
    pub motion: Motion,
    #[serde(default = "default_rgb")]
    pub rgb: [f64; 3],
}

/// Phong-style surface description, indexed by `ObjectConfig::material`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MaterialConfig {
    pub ambient: [f64; 3],
    pub diffuse: [f64; 3],
    pub specular: [f64; 3],
    /// Specular exponent.
    pub power: f64,
    pub reflection: [f64; 3],
    pub transparency: [f64; 3],
    /// Index of refraction.
    pub refraction: f64,
}

impl Default for MaterialConfig {
    fn default() -> Self {
        Self {
            ambient: [0.1, 0.1, 0.1],
            diffuse: [0.5, 0.5, 0.5],
            specular: [1.0, 1.0, 1.0],
            power: 20.0,
            reflection: [0.0, 0.0, 0.0],
            transparency: [0.0, 0.0, 0.0],
            refraction: 1.0,
        }
    }
}

impl MaterialConfig {
    fn validate(&self, index: usize) -> Result<(), SceneError> {
        let invalid = |reason: String| SceneError::InvalidMaterial { index, reason };
        let colours = [self.ambient, self.diffuse, self.specular, self.reflection, self.transparency];
        if colours.iter().flatten().any(|c| !c.is_finite()) {
            return Err(invalid("colour components must be finite".to_string()));
        }
        if !(self.power > 0.0 && self.power.is_finite()) {
            return Err(invalid(format!("power must be positive, got {}", self.power)));
        }
        if !(self.refraction > 0.0 && self.refraction.is_finite()) {
            return Err(invalid(format!("refraction must be positive, got {}", self.refraction)));
        }
        Ok(())
    }
}

fn default_materials() -> Vec<MaterialConfig> {
    vec![MaterialConfig::default()]
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CameraConfig {
    pub eye: [f64; 3],
    pub screen_center: [f64; 3],
}

impl Default for CameraConfig {
    fn default() -> Self {
        Self {
            eye: [0.0, 0.0, 5.0],
            screen_center: [0.0, 0.0, 2.5],
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SceneConfig {
    #[serde(default)]
    pub camera: CameraConfig,
    #[serde(default)]
    pub objects: Vec<ObjectConfig>,
    #[serde(default)]
    pub lights: Vec<LightConfig>,
    /// Without a `[[materials]]` table a single default material is used.
    #[serde(default = "default_materials")]
    pub materials: Vec<MaterialConfig>,
}

impl Default for SceneConfig {
    fn default() -> Self {
        Self {
            camera: CameraConfig::default(),
            objects: Vec::new(),
            lights: Vec::new(),
            materials: default_materials(),
        }
    }
}

impl SceneConfig {
    /// Parse and validate a TOML scene description.
    pub fn from_toml_str(text: &str) -> Result<Self, SceneError> {
        let config: SceneConfig = toml::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self, SceneError> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|source| SceneError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml_str(&text)
    }

    pub fn validate(&self) -> Result<(), SceneError> {
        for (index, material) in self.materials.iter().enumerate() {
            material.validate(index)?;
        }
        let mut seen = HashSet::new();
        for object in &self.objects {
            object.validate()?;
            if object.material as usize >= self.materials.len() {
                return Err(object.invalid(format!(
                    "material {} out of range, {} defined",
                    object.material,
                    self.materials.len()
                )));
            }
            if !seen.insert(object.name.as_str()) {
                return Err(SceneError::DuplicateName(object.name.clone()));
            }
        }
        Ok(())
    }

    /// Two spheres, a tumbling octahedron and a tumbling cube lit by three
    /// orbiting white lights.
    pub fn demo() -> Self {
        let spin = [1.0, 1.0, 0.0];
        let objects = vec![
            ObjectConfig::new("orbiting-sphere", ShapeKind::Sphere, 0.6)
                .with_material(0)
                .with_motion(Motion {
                    x: AxisMotion::wave(1.0, 2.0, Wave::Cos),
                    y: AxisMotion::wave(1.0, 2.0, Wave::Sin),
                    z: AxisMotion::wave(-3.0, 1.0, Wave::Sin),
                }),
            ObjectConfig::new("resting-sphere", ShapeKind::Sphere, 0.7)
                .with_material(1)
                .with_motion(Motion::fixed([-0.5, 1.2, -0.4])),
            ObjectConfig::new("octahedron", ShapeKind::Octahedron, 0.2)
                .with_bounding_radius(0.3)
                .with_material(2)
                .with_spin(spin)
                .with_motion(Motion {
                    x: AxisMotion::wave(-1.0, 2.0, Wave::Sin),
                    y: AxisMotion::wave(-1.0, 2.0, Wave::Cos),
                    z: AxisMotion::fixed(1.0),
                }),
            ObjectConfig::new("cube", ShapeKind::Cube, 0.2)
                .with_bounding_radius(0.3)
                .with_material(3)
                .with_spin(spin)
                .with_motion(Motion {
                    x: AxisMotion::wave(0.6, 1.0, Wave::Cos),
                    y: AxisMotion::fixed(0.0),
                    z: AxisMotion::wave(0.6, 1.0, Wave::Sin).with_offset(0.6),
                }),
        ];
        let white = [1.0, 1.0, 1.0];
        let lights = vec![
            LightConfig {
                motion: Motion {
                    x: AxisMotion::wave(2.0, 1.0, Wave::Sin),
                    y: AxisMotion::wave(2.0, 1.0, Wave::Cos),
                    z: AxisMotion::fixed(-0.5),
                },
                rgb: white,
            },
            LightConfig {
                motion: Motion {
                    x: AxisMotion::wave(-1.5, 1.0, Wave::Cos),
                    y: AxisMotion::fixed(0.0),
                    z: AxisMotion::wave(1.5, 1.0, Wave::Sin),
                },
                rgb: white,
            },
            LightConfig {
                motion: Motion {
                    x: AxisMotion::fixed(0.0),
                    y: AxisMotion::wave(1.0, 1.0, Wave::Cos),
                    z: AxisMotion::wave(1.0, 1.0, Wave::Sin),
                },
                rgb: white,
            },
        ];
        let material = |ambient, diffuse, reflection: f64, refraction| MaterialConfig {
            ambient,
            diffuse,
            specular: [1.0, 1.0, 1.0],
            power: 20.0,
            reflection: [reflection; 3],
            transparency: [reflection; 3],
            refraction,
        };
        let mut cyan = material([0.0, 0.1, 0.1], [0.0, 0.5, 0.5], 0.5, 1.5);
        cyan.specular = [0.0, 1.0, 1.0];
        let materials = vec![
            cyan,
            material([0.0314, 0.098, 0.0], [0.05, 0.25, 0.0], 0.5, 1.5),
            material([0.1, 0.1, 0.0], [0.4, 0.1, 0.3], 0.4, 1.5),
            material([0.0, 0.25, 0.5], [0.098, 0.2549, 0.4], 0.4, 2.0),
        ];
        Self {
            camera: CameraConfig::default(),
            objects,
            lights,
            materials,
        }
    }
}
