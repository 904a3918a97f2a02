//! Flat `f32` uniform blocks handed to the rendering collaborator.
//!
//! Every matrix is column-major, exactly as `Matrix::to_flat_list` emits
//! it, so the renderer can upload the arrays with no transposition.

pub mod channel;

use serde::{Deserialize, Serialize};

use crate::numerics::{FloatingPoint, Matrix, MatrixError};
use crate::quadric::{SurfacePiece, WorldSurfaces};
use crate::scene::ShapeKind;

pub use channel::{uniform_channel, ChannelError, UniformChannelConfig, UniformReceiver, UniformSender};

/// Errors from encoding or decoding uniform blocks.
#[derive(Debug, thiserror::Error)]
pub enum UniformError {
    #[error("Failed to encode uniforms: {0}")]
    Encode(#[from] bincode::error::EncodeError),

    #[error("Failed to decode uniforms: {0}")]
    Decode(#[from] bincode::error::DecodeError),
}

fn pack<T: FloatingPoint, const N: usize>(operation: &'static str, m: &Matrix<T>) -> Result<[f32; N], MatrixError> {
    let values = m.to_f32_list();
    let len = values.len();
    values
        .try_into()
        .map_err(|_| MatrixError::mismatch(operation, (len, 1), (N, 1)))
}

/// Everything the shader needs to draw one object.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ObjectUniforms {
    pub name: String,
    pub shape: ShapeKind,
    /// Index into `FrameUniforms::materials`.
    pub material: u32,
    /// Bounding-sphere radius.
    pub radius: f32,
    pub center: [f32; 3],
    pub model: [f32; 16],
    pub inverse_model: [f32; 16],
    pub quadrics: Vec<[f32; 16]>,
    pub planes: Vec<[f32; 4]>,
}

impl ObjectUniforms {
    pub fn new<T: FloatingPoint>(
        name: impl Into<String>,
        shape: ShapeKind,
        material: u32,
        radius: f32,
        center: [f32; 3],
        world: &WorldSurfaces<T>,
    ) -> Result<Self, MatrixError> {
        let mut quadrics: Vec<[f32; 16]> = Vec::new();
        let mut planes: Vec<[f32; 4]> = Vec::new();
        for piece in &world.pieces {
            match piece {
                SurfacePiece::Quadric(q) => quadrics.push(pack("quadric_uniform", q.coefficients())?),
                SurfacePiece::Plane(a) => planes.push(pack("plane_uniform", a.row())?),
            }
        }
        Ok(Self {
            name: name.into(),
            shape,
            material,
            radius,
            center,
            model: pack("model_uniform", &world.model)?,
            inverse_model: pack("inverse_model_uniform", &world.inverse)?,
            quadrics,
            planes,
        })
    }

    /// Shader shape type: 0 for quadrics, 1 for polytopes.
    pub fn type_code(&self) -> i32 {
        self.shape.type_code()
    }

    /// Number of bounding planes (`n_p` in the shader).
    pub fn plane_count(&self) -> usize {
        self.planes.len()
    }
}

/// One entry of the material table.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct MaterialUniforms {
    pub ambient: [f32; 3],
    pub diffuse: [f32; 3],
    pub specular: [f32; 3],
    pub power: f32,
    pub reflection: [f32; 3],
    pub transparency: [f32; 3],
    pub refraction: f32,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LightUniforms {
    pub src: [f32; 3],
    pub rgb: [f32; 3],
}

/// One frame's worth of uniforms.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct FrameUniforms {
    pub frame: u64,
    pub time: f32,
    pub cursor: [f32; 3],
    pub eye: [f32; 3],
    pub screen_center: [f32; 3],
    pub objects: Vec<ObjectUniforms>,
    pub lights: Vec<LightUniforms>,
    pub materials: Vec<MaterialUniforms>,
}

impl FrameUniforms {
    pub fn object(&self, name: &str) -> Option<&ObjectUniforms> {
        self.objects.iter().find(|o| o.name == name)
    }

    pub fn encode(&self) -> Result<Vec<u8>, UniformError> {
        Ok(bincode::serde::encode_to_vec(self, bincode::config::standard())?)
    }

    pub fn decode(bytes: &[u8]) -> Result<Self, UniformError> {
        let (frame, _) = bincode::serde::decode_from_slice(bytes, bincode::config::standard())?;
        Ok(frame)
    }
}
