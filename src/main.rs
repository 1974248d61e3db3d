//! rigcam - RTS camera rig demo
//!
//! Loads settings, builds a small scene and drives the camera rig through a
//! scripted input sequence, logging what the rig does.
//!
//! `rigcam --write-settings` writes the current settings to the config file
//! and exits.

mod demo;
mod settings;

use anyhow::{Context, Result};
use tracing::info;
use tracing_subscriber::{EnvFilter, FmtSubscriber};

use crate::demo::Demo;
use crate::settings::Settings;

fn main() -> Result<()> {
    // Initialize logging, RUST_LOG overrides the default level
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let subscriber = FmtSubscriber::builder()
        .with_env_filter(filter)
        .with_target(false)
        .finish();
    tracing::subscriber::set_global_default(subscriber)
        .context("Failed to set tracing subscriber")?;

    let settings = Settings::load();

    if std::env::args().any(|arg| arg == "--write-settings") {
        let path = settings.save().context("Failed to write settings")?;
        info!("Settings written to {}", path.display());
        return Ok(());
    }

    info!("Starting rigcam demo...");
    let report = Demo::new(settings).context("Failed to build demo scene")?.run();

    info!(
        frames = report.frames,
        target = ?report.final_target,
        zoom = report.final_zoom,
        yaw = report.yaw,
        pitch = report.pitch,
        selections = report.selections.len(),
        cancellations = report.lock_cancellations,
        "Demo finished"
    );
    Ok(())
}
