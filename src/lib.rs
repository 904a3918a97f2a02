//! Homogeneous 4x4 transforms and implicit surfaces for a real-time
//! ray-marched scene.
//!
//! Every frame each object's model matrix `M` is rebuilt, inverted once and
//! used to carry its canonical quadric and plane coefficients into world
//! space. The results are packed as flat `f32` uniforms for the renderer.

pub mod numerics;
pub mod quadric;
pub mod scene;
pub mod transform;
pub mod uniforms;

pub use numerics::{FloatingPoint, Matrix, MatrixError, Point3, Vector3};
pub use scene::{FrameInput, FrameReport, Scene, SceneConfig};
pub use uniforms::{uniform_channel, FrameUniforms, UniformChannelConfig, UniformReceiver, UniformSender};
