//! Per-frame evaluation of every object in a scene.
//!
//! Each object is independent: its `M`, `M⁻¹` and surfaces are computed
//! once per frame and written by exactly one worker. A failure in one
//! object (singular transform, shape mismatch) drops that object from the
//! frame and is reported; the rest of the frame is still produced.

use crate::numerics::MatrixError;
use crate::uniforms::{FrameUniforms, LightUniforms, MaterialUniforms, ObjectUniforms};

use super::config::{CameraConfig, LightConfig, MaterialConfig, SceneConfig, SceneError};
use super::object::SceneObject;

fn narrow(v: [f64; 3]) -> [f32; 3] {
    [v[0] as f32, v[1] as f32, v[2] as f32]
}

impl From<&MaterialConfig> for MaterialUniforms {
    fn from(m: &MaterialConfig) -> Self {
        Self {
            ambient: narrow(m.ambient),
            diffuse: narrow(m.diffuse),
            specular: narrow(m.specular),
            power: m.power as f32,
            reflection: narrow(m.reflection),
            transparency: narrow(m.transparency),
            refraction: m.refraction as f32,
        }
    }
}

/// Scalars supplied by the host for one frame.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct FrameInput {
    pub frame: u64,
    /// Seconds since the first frame.
    pub time_seconds: f64,
    /// Cursor in normalised device coordinates plus a button/pressure value.
    pub cursor: [f32; 3],
}

impl FrameInput {
    pub fn at(time_seconds: f64) -> Self {
        Self { time_seconds, ..Default::default() }
    }

    /// Map a pixel-space cursor to `[-1, 1]` with +y up.
    ///
    /// A zero-sized (or non-finite) canvas maps the cursor to the centre.
    pub fn cursor_from_pixels(x: f32, y: f32, button: f32, width: f32, height: f32) -> [f32; 3] {
        let axis = |p: f32, extent: f32| {
            if extent > 0.0 && extent.is_finite() {
                p / extent * 2.0 - 1.0
            } else {
                0.0
            }
        };
        [axis(x, width), -axis(y, height), button]
    }
}

/// Turns the host's absolute millisecond timestamps into frame inputs
/// relative to the first frame seen.
#[derive(Debug, Default)]
pub struct FrameClock {
    start_ms: Option<f64>,
    frames: u64,
}

impl FrameClock {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn tick(&mut self, timestamp_ms: f64, cursor: [f32; 3]) -> FrameInput {
        let start = *self.start_ms.get_or_insert(timestamp_ms);
        let input = FrameInput {
            frame: self.frames,
            time_seconds: (timestamp_ms - start) / 1000.0,
            cursor,
        };
        self.frames += 1;
        input
    }

    /// Forget the start time; the next tick becomes time zero.
    pub fn reset(&mut self) {
        self.start_ms = None;
        self.frames = 0;
    }
}

/// An object left out of a frame and why.
#[derive(Debug, Clone, PartialEq)]
pub struct ObjectFailure {
    pub name: String,
    pub error: MatrixError,
}

#[derive(Debug, Clone, PartialEq)]
pub struct FrameReport {
    pub uniforms: FrameUniforms,
    pub failures: Vec<ObjectFailure>,
}

impl FrameReport {
    pub fn is_complete(&self) -> bool {
        self.failures.is_empty()
    }
}

#[derive(Debug, Clone)]
pub struct Scene {
    camera: CameraConfig,
    objects: Vec<SceneObject>,
    lights: Vec<LightConfig>,
    materials: Vec<MaterialUniforms>,
}

impl Scene {
    pub fn from_config(config: &SceneConfig) -> Result<Self, SceneError> {
        config.validate()?;
        let objects = config
            .objects
            .iter()
            .map(SceneObject::from_config)
            .collect::<Result<Vec<_>, _>>()?;
        tracing::debug!(objects = objects.len(), lights = config.lights.len(), "scene loaded");
        Ok(Self {
            camera: config.camera.clone(),
            objects,
            lights: config.lights.clone(),
            materials: config.materials.iter().map(MaterialUniforms::from).collect(),
        })
    }

    pub fn objects(&self) -> &[SceneObject] {
        &self.objects
    }

    pub fn push_object(&mut self, object: SceneObject) {
        self.objects.push(object);
    }

    fn evaluate_object(object: &SceneObject, t: f64) -> Result<ObjectUniforms, ObjectFailure> {
        let fail = |error: MatrixError| ObjectFailure { name: object.name.clone(), error };
        let world = object.world_surfaces(t).map_err(fail)?;
        let center = object.position_at(t);
        let uniforms = ObjectUniforms::new(
            object.name.clone(),
            object.shape,
            object.material,
            object.bounding_radius as f32,
            narrow(center.into()),
            &world,
        )
        .map_err(fail)?;
        tracing::trace!(object = %object.name, pieces = world.pieces.len(), "object evaluated");
        Ok(uniforms)
    }

    fn assemble(&self, input: &FrameInput, results: Vec<Result<ObjectUniforms, ObjectFailure>>) -> FrameReport {
        let t = input.time_seconds;
        let mut objects = Vec::with_capacity(results.len());
        let mut failures = Vec::new();
        for result in results {
            match result {
                Ok(uniforms) => objects.push(uniforms),
                Err(failure) => {
                    tracing::warn!(
                        frame = input.frame,
                        object = %failure.name,
                        error = %failure.error,
                        "object skipped for this frame"
                    );
                    failures.push(failure);
                }
            }
        }
        let lights = self
            .lights
            .iter()
            .map(|light| LightUniforms {
                src: narrow(light.motion.position_at(t).into()),
                rgb: narrow(light.rgb),
            })
            .collect();
        tracing::debug!(
            frame = input.frame,
            time = t,
            objects = objects.len(),
            failures = failures.len(),
            "frame evaluated"
        );
        FrameReport {
            uniforms: FrameUniforms {
                frame: input.frame,
                time: t as f32,
                cursor: input.cursor,
                eye: narrow(self.camera.eye),
                screen_center: narrow(self.camera.screen_center),
                objects,
                lights,
                materials: self.materials.clone(),
            },
            failures,
        }
    }

    /// Evaluate every object on the calling thread, in configuration order.
    pub fn evaluate_frame(&self, input: &FrameInput) -> FrameReport {
        let t = input.time_seconds;
        let results = self.objects.iter().map(|o| Self::evaluate_object(o, t)).collect::<Vec<_>>();
        self.assemble(input, results)
    }

    /// Evaluate objects across up to `workers` scoped threads.
    ///
    /// Objects are split into contiguous chunks, one per thread, so the
    /// output order is the configuration order.
    pub fn evaluate_frame_parallel(&self, input: &FrameInput, workers: usize) -> FrameReport {
        let t = input.time_seconds;
        let workers = workers.clamp(1, self.objects.len().max(1));
        let chunk = self.objects.len().div_ceil(workers).max(1);
        let results = std::thread::scope(|scope| {
            let handles: Vec<_> = self
                .objects
                .chunks(chunk)
                .map(|objects| {
                    scope.spawn(move || {
                        objects
                            .iter()
                            .map(|o| Self::evaluate_object(o, t))
                            .collect::<Vec<_>>()
                    })
                })
                .collect();
            handles
                .into_iter()
                .flat_map(|handle| handle.join().unwrap_or_else(|panic| std::panic::resume_unwind(panic)))
                .collect::<Vec<_>>()
        });
        self.assemble(input, results)
    }

    /// `evaluate_frame_parallel` with one worker per logical CPU.
    pub fn evaluate_frame_on_all_cpus(&self, input: &FrameInput) -> FrameReport {
        self.evaluate_frame_parallel(input, num_cpus::get())
    }
}
