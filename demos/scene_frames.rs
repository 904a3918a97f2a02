//! Evaluate a few seconds of an animated scene and stream the uniforms to a
//! consumer task.
//!
//! Run with an optional TOML scene path:
//!
//! ```text
//! RUST_LOG=debug cargo run --example scene_frames -- scene.toml
//! ```

use quadrix::scene::{FrameClock, Scene, SceneConfig};
use quadrix::{uniform_channel, UniformChannelConfig};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let config = match std::env::args().nth(1) {
        Some(path) => SceneConfig::load(path)?,
        None => SceneConfig::demo(),
    };
    let scene = Scene::from_config(&config)?;
    tracing::info!(objects = scene.objects().len(), "scene ready");

    let (tx, rx) = uniform_channel(UniformChannelConfig::default());

    let renderer = tokio::spawn(async move {
        let mut frames = 0u64;
        while let Some(frame) = rx.next_frame().await {
            frames += 1;
            for object in &frame.objects {
                tracing::debug!(
                    frame = frame.frame,
                    object = %object.name,
                    center = ?object.center,
                    planes = object.plane_count(),
                    "object uniforms"
                );
            }
        }
        frames
    });

    // 60 fps for two seconds of simulated time.
    let mut clock = FrameClock::new();
    for n in 0..120u32 {
        let input = clock.tick(1_000.0 + f64::from(n) * 1000.0 / 60.0, [0.0, 0.0, 0.0]);
        let report = scene.evaluate_frame_on_all_cpus(&input);
        if !report.is_complete() {
            tracing::warn!(frame = input.frame, failures = report.failures.len(), "incomplete frame");
        }
        tx.publish(report.uniforms).await?;
        tokio::task::yield_now().await;
    }
    tx.close();

    let rendered = renderer.await?;
    tracing::info!(
        published = tx.published_count(),
        dropped = tx.dropped_count(),
        rendered,
        "done"
    );
    Ok(())
}
