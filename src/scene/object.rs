use crate::numerics::{Matrix, MatrixError, Vector3};
use crate::quadric::{self, SurfacePiece, WorldSurfaces};
use crate::transform::{self, RotationOrder};

use super::config::{Motion, ObjectConfig, SceneError, ShapeKind};

/// An animated object: canonical surfaces plus the rules that place them
/// in the world at time `t`.
#[derive(Debug, Clone)]
pub struct SceneObject {
    pub name: String,
    pub shape: ShapeKind,
    pub material: u32,
    pub radius: f64,
    /// Bounding-sphere radius handed to the shader.
    pub bounding_radius: f64,
    canonical: Vec<SurfacePiece<f64>>,
    rotation_order: RotationOrder,
    spin: Vector3<f64>,
    scale: Vector3<f64>,
    motion: Motion,
}

impl SceneObject {
    pub fn from_config(config: &ObjectConfig) -> Result<Self, SceneError> {
        config.validate()?;
        let r = config.radius;
        let canonical: Vec<SurfacePiece<f64>> = match config.shape {
            ShapeKind::Sphere => vec![quadric::sphere(r).into()],
            ShapeKind::Cylinder => vec![quadric::cylinder_z(r).into()],
            ShapeKind::Ellipsoid => {
                let [a, b, c] = config.extents.unwrap_or([r, r, r]);
                vec![quadric::ellipsoid(a, b, c).into()]
            }
            ShapeKind::Cube => quadric::cube(r),
            ShapeKind::Octahedron => quadric::octahedron(r),
        };
        Ok(Self {
            name: config.name.clone(),
            shape: config.shape,
            material: config.material,
            radius: r,
            bounding_radius: config.effective_bounding_radius(),
            canonical,
            rotation_order: config.rotation_order.clone(),
            spin: config.spin.into(),
            scale: config.scale.into(),
            motion: config.motion,
        })
    }

    /// Override the scale factors. Unlike the configuration path this does
    /// not reject zero factors; a degenerate scale surfaces as a singular
    /// model when the object is evaluated.
    pub fn with_scale(mut self, scale: Vector3<f64>) -> Self {
        self.scale = scale;
        self
    }

    pub fn canonical_surfaces(&self) -> &[SurfacePiece<f64>] {
        &self.canonical
    }

    pub fn position_at(&self, t: f64) -> Vector3<f64> {
        self.motion.position_at(t)
    }

    /// Object-to-world transform at time `t`: `translate * (rotate * scale)`.
    pub fn model_at(&self, t: f64) -> Result<Matrix<f64>, MatrixError> {
        let rotation = transform::rotation(&self.rotation_order, self.spin * t)?;
        transform::place(self.position_at(t), &rotation, self.scale)
    }

    /// `M`, `M⁻¹` and every surface piece in world space at time `t`.
    pub fn world_surfaces(&self, t: f64) -> Result<WorldSurfaces<f64>, MatrixError> {
        WorldSurfaces::compute(self.model_at(t)?, &self.canonical)
    }
}
