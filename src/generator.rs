// Copyright © 2026 Lukas Bower
// SPDX-License-Identifier: Apache-2.0
// Purpose: Run a full generation pass and persist the dataset.
// Author: Lukas Bower

//! Generation pass.
//!
//! Targets run in list order and ticks in increasing order. The run is
//! all-or-nothing: any failing frame aborts before the file is written.

use std::path::PathBuf;

use log::{debug, info};

use crate::collab::{CircuitLog, CollaboratorRegistry, GateEncoder, Smoothing};
use crate::config::{GeneratorConfig, TelemetryConfig};
use crate::error::Result;
use crate::exporter::{self, FloatFormat};
use crate::geometry::TorusGeometry;
use crate::recorder::{Frame, TelemetryRecorder};

/// Result of a completed generation run.
#[derive(Clone, Debug, PartialEq)]
pub struct GenerationSummary {
    pub path: PathBuf,
    pub frames: usize,
    pub entities: usize,
    /// Mean smoothness gain across all frames, as a percentage.
    pub avg_smoothness_pct: f64,
}

/// Resolve collaborators, record every frame and export the dataset.
pub fn generate(cfg: &TelemetryConfig, registry: &CollaboratorRegistry) -> Result<GenerationSummary> {
    cfg.validate()?;
    let g = &cfg.generator;
    let smoothing = registry.resolve_smoothing(&g.smoothing)?;
    let encoder = registry.resolve_encoder(&g.gate_encoder)?;

    let frames = record_all(g, smoothing.as_ref(), encoder.as_ref())?;

    let format = if g.exact_coordinates {
        FloatFormat::Exact
    } else {
        FloatFormat::Fixed
    };
    exporter::export(&cfg.dataset_path, &frames, format)?;

    let avg = frames.iter().map(|f| f.smoothness_gain).sum::<f64>() / frames.len() as f64;
    let summary = GenerationSummary {
        path: cfg.dataset_path.clone(),
        frames: frames.len(),
        entities: g.entities,
        avg_smoothness_pct: avg * 100.0,
    };
    info!(
        "generation complete: {} frames, avg smoothness {:.2}%",
        summary.frames, summary.avg_smoothness_pct
    );
    Ok(summary)
}

/// Record all target phases in memory.
pub fn record_all(
    g: &GeneratorConfig,
    smoothing: &dyn Smoothing,
    encoder: &dyn GateEncoder,
) -> Result<Vec<Frame>> {
    let geometry = TorusGeometry::new(g.major_radius, g.minor_radius, g.entities);
    let mut recorder = TelemetryRecorder::new(geometry, g.time_step, smoothing, encoder);

    let phases = g.targets.len();
    for (n, &target) in g.targets.iter().enumerate() {
        info!("[{}/{}] target {}", n + 1, phases, target);
        let mut circuit = CircuitLog::new();
        for tick in 0..g.ticks_per_target {
            recorder.record(target, tick, &mut circuit)?;
        }
        debug!("target {target}: circuit holds {} instructions", circuit.len());
    }
    Ok(recorder.into_frames())
}
