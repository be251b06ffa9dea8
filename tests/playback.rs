// Copyright © 2026 Lukas Bower
// SPDX-License-Identifier: Apache-2.0
// Purpose: Validate dataset loading, scale derivation and looping playback.
// Author: Lukas Bower

use std::fs;
use std::path::Path;
use std::sync::Arc;

use tempfile::TempDir;
use torus_telemetry::collab::CollaboratorRegistry;
use torus_telemetry::generator::generate;
use torus_telemetry::player::{RenderDriver, TerminalRenderer, TickOutput, TrailAnimator};
use torus_telemetry::{loader, TelemetryConfig, TelemetryError};

fn generated(dir: &Path, ticks: u64) -> TelemetryConfig {
    let mut cfg = TelemetryConfig::default();
    cfg.dataset_path = dir.join("tape.csv");
    cfg.generator.entities = 5;
    cfg.generator.targets = vec![15, 21];
    cfg.generator.ticks_per_target = ticks;
    cfg.generator.smoothing = "constant:0.5".into();
    cfg.playback.interval_ms = 1;
    generate(&cfg, &CollaboratorRegistry::with_builtins()).expect("generate");
    cfg
}

#[derive(Default)]
struct Recorder {
    ticks: Vec<TickOutput>,
}

impl RenderDriver for Recorder {
    fn draw(&mut self, out: &TickOutput) -> torus_telemetry::Result<()> {
        self.ticks.push(out.clone());
        Ok(())
    }
}

#[test]
fn loop_closes_at_dataset_length() {
    let temp = TempDir::new().expect("tempdir");
    let cfg = generated(temp.path(), 15);
    let dataset = Arc::new(loader::load(&cfg.dataset_path).expect("load"));
    let len = dataset.len() as u64;
    assert_eq!(len, 30);

    let scale = dataset.scale(cfg.playback.z_floor_epsilon);
    let animator = TrailAnimator::new(dataset, scale, 20);
    assert_eq!(animator.render(len), animator.render(0));
    assert_eq!(animator.render(len + 7), animator.render(7));
}

#[test]
fn trail_window_never_exceeds_lookback() {
    let temp = TempDir::new().expect("tempdir");
    let cfg = generated(temp.path(), 20);
    let dataset = Arc::new(loader::load(&cfg.dataset_path).expect("load"));
    let scale = dataset.scale(cfg.playback.z_floor_epsilon);
    let animator = TrailAnimator::new(dataset, scale, 20);

    for tick in 0..40u64 {
        let out = animator.render(tick);
        let expected = (out.idx.min(20)) + 1;
        assert_eq!(out.trail_len(), expected, "tick {tick}");
        assert_eq!(out.trails.len(), 5);
        assert!(out.trails.iter().all(|t| t.xs.len() == expected));
    }
}

#[test]
fn scale_bounds_cover_all_coordinates() {
    let temp = TempDir::new().expect("tempdir");
    let cfg = generated(temp.path(), 10);
    let dataset = loader::load(&cfg.dataset_path).expect("load");
    let scale = dataset.scale(1e-4);

    // Every entity lies on a torus with R = 20, r = 10.
    assert!(scale.max_x <= 30.0 + 1e-6);
    assert!(scale.max_z <= 10.0 + 1e-6);
    assert_eq!(scale.render_floor, scale.max_z * 10.0);
    for f in dataset.frames() {
        for p in &f.entities {
            assert!(p.x.abs() <= scale.max_x && p.y.abs() <= scale.max_x);
            assert!(p.z.abs() <= scale.max_z);
        }
    }
}

#[test]
fn flat_dataset_gets_epsilon_render_floor() {
    let temp = TempDir::new().expect("tempdir");
    let path = temp.path().join("flat.csv");
    fs::write(
        &path,
        "Frame,Target_N,VR_Smoothness,q0_x,q0_y,q0_z,SHA256_Signature\n\
         0,15,0.50000000,30.00000000,0.00000000,0.00000000,00\n\
         1,15,0.50000000,0.00000000,-30.00000000,0.00000000,00\n",
    )
    .expect("write");
    let scale = loader::load(&path).expect("load").scale(1e-4);
    assert_eq!(scale.max_x, 30.0);
    assert_eq!(scale.render_floor, 1e-4);
    assert_eq!(scale.flattening, 0.0);
}

#[test]
fn play_runs_bounded_session() {
    let temp = TempDir::new().expect("tempdir");
    let mut cfg = generated(temp.path(), 3);
    cfg.playback.max_ticks = Some(8);

    let mut driver = Recorder::default();
    let ticks = torus_telemetry::play(&cfg, &mut driver).expect("play");
    assert_eq!(ticks, 8);
    let idx: Vec<usize> = driver.ticks.iter().map(|t| t.idx).collect();
    assert_eq!(idx, vec![0, 1, 2, 3, 4, 5, 0, 1]);
    assert_eq!(driver.ticks[7].title, "FRAME: 1/6");
    assert!(driver.ticks[0].info.contains("Gain: 0.50000000"));
}

#[test]
fn play_renders_to_terminal() {
    let temp = TempDir::new().expect("tempdir");
    let mut cfg = generated(temp.path(), 2);
    cfg.playback.max_ticks = Some(2);

    let mut renderer = TerminalRenderer::new(Vec::new(), 60, 20).without_clear();
    torus_telemetry::play(&cfg, &mut renderer).expect("play");
    let text = String::from_utf8(renderer.into_inner()).expect("utf8");
    assert!(text.contains(">> FRAME: 0/4"));
    assert!(text.contains(">> FRAME: 1/4"));
}

#[test]
fn missing_dataset_is_reported() {
    let temp = TempDir::new().expect("tempdir");
    let mut cfg = TelemetryConfig::default();
    cfg.dataset_path = temp.path().join("absent.csv");
    let err = torus_telemetry::play(&cfg, &mut Recorder::default()).unwrap_err();
    assert!(matches!(err, TelemetryError::MissingInput { .. }));
    assert!(err.to_string().contains("absent.csv"));
}

#[test]
fn play_ignores_generator_section() {
    let temp = TempDir::new().expect("tempdir");
    let mut cfg = generated(temp.path(), 2);
    cfg.generator.targets.clear();
    cfg.generator.entities = 0;
    cfg.playback.max_ticks = Some(3);

    let ticks = torus_telemetry::play(&cfg, &mut Recorder::default()).expect("play");
    assert_eq!(ticks, 3);
}

#[test]
fn play_rejects_bad_playback_section() {
    let temp = TempDir::new().expect("tempdir");
    let mut cfg = generated(temp.path(), 2);
    cfg.playback.interval_ms = 0;
    let err = torus_telemetry::play(&cfg, &mut Recorder::default()).unwrap_err();
    assert!(matches!(err, TelemetryError::InvalidConfig(_)));
}
