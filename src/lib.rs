// Copyright © 2026 Lukas Bower
// SPDX-License-Identifier: Apache-2.0
// Purpose: Toroidal telemetry generation, signed frames and looping playback.
// Author: Lukas Bower

//! Toroidal point-cloud telemetry.
//!
//! Generation synthesizes a drive signal, places every entity on a torus,
//! signs each frame with SHA-256 and writes the dataset once. Playback loads
//! that file, derives render bounds and loops a trailing-window animation.
//! The two halves share nothing but the dataset file.

use std::sync::Arc;
use std::time::Duration;

use log::info;

/// Injected smoothing and geometry-encoding collaborators.
pub mod collab;

/// Layered configuration.
pub mod config;

/// Error taxonomy.
pub mod error;

/// Delimited dataset writer.
pub mod exporter;

/// Full generation pass over all target phases.
pub mod generator;

/// Toroidal entity placement.
pub mod geometry;

/// Dataset loading, schema checks and render scale.
pub mod loader;

/// Looping trail playback.
pub mod player;

/// Signed frame recording.
pub mod recorder;

/// Chaotic drive signal synthesis.
pub mod signal;

pub use config::TelemetryConfig;
pub use error::{Result, TelemetryError};

use loader::SignatureReport;
use player::{PlaybackLoop, RenderDriver, TrailAnimator};

/// Load the configured dataset and loop it through `driver` until the
/// playback loop stops. Returns the number of ticks rendered.
pub fn play(cfg: &TelemetryConfig, driver: &mut dyn RenderDriver) -> Result<u64> {
    cfg.playback.validate()?;
    let dataset = Arc::new(loader::load(&cfg.dataset_path)?);
    dataset.verify_signatures();

    let scale = dataset.scale(cfg.playback.z_floor_epsilon);
    info!(
        "geometry: radius {:.2}, height {:.8}, flattening {:.8}",
        scale.max_x, scale.max_z, scale.flattening
    );

    let mut animator = TrailAnimator::new(dataset, scale, cfg.playback.trail_window);
    let looper = PlaybackLoop::new(
        Duration::from_millis(cfg.playback.interval_ms),
        cfg.playback.max_ticks,
    );
    looper.run(&mut animator, driver)
}

/// Recompute every frame signature of the configured dataset.
pub fn verify(cfg: &TelemetryConfig) -> Result<SignatureReport> {
    let dataset = loader::load(&cfg.dataset_path)?;
    Ok(dataset.verify_signatures())
}
