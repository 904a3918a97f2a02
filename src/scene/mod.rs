//! Animated scenes: configuration, per-object placement and frame evaluation.

pub mod config;
pub mod frame;
pub mod object;

pub use config::{
    AxisMotion, CameraConfig, LightConfig, MaterialConfig, Motion, ObjectConfig, SceneConfig, SceneError, ShapeKind, Wave,
};
pub use frame::{FrameClock, FrameInput, FrameReport, ObjectFailure, Scene};
pub use object::SceneObject;
