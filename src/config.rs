// Copyright © 2026 Lukas Bower
// SPDX-License-Identifier: Apache-2.0
// Purpose: Layered configuration for generation and playback.
// Author: Lukas Bower

//! Configuration defaults, TOML loading and environment overrides.
//!
//! Precedence from lowest to highest: built-in defaults, the optional TOML
//! file, `TORUS_TELEMETRY_DATASET`, then CLI flags applied by the caller.

use std::fs;
use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::error::{Result, TelemetryError};

/// Environment variable overriding the dataset path.
pub const DATASET_ENV: &str = "TORUS_TELEMETRY_DATASET";

pub const DEFAULT_DATASET: &str = "telemetria_biscoito.csv";

#[derive(Clone, Debug, Deserialize, PartialEq)]
#[serde(default)]
pub struct TelemetryConfig {
    pub dataset_path: PathBuf,
    pub generator: GeneratorConfig,
    pub playback: PlaybackConfig,
}

#[derive(Clone, Debug, Deserialize, PartialEq)]
#[serde(default)]
pub struct GeneratorConfig {
    pub entities: usize,
    pub major_radius: f64,
    pub minor_radius: f64,
    pub ticks_per_target: u64,
    pub time_step: f64,
    pub targets: Vec<u64>,
    pub smoothing: String,
    pub gate_encoder: String,
    /// Write coordinates in round-trip form instead of 8 decimals.
    pub exact_coordinates: bool,
}

#[derive(Clone, Debug, Deserialize, PartialEq)]
#[serde(default)]
pub struct PlaybackConfig {
    pub trail_window: usize,
    pub interval_ms: u64,
    pub z_floor_epsilon: f64,
    pub max_ticks: Option<u64>,
}

impl Default for TelemetryConfig {
    fn default() -> Self {
        Self {
            dataset_path: PathBuf::from(DEFAULT_DATASET),
            generator: GeneratorConfig::default(),
            playback: PlaybackConfig::default(),
        }
    }
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self {
            entities: 120,
            major_radius: 20.0,
            minor_radius: 10.0,
            ticks_per_target: 200,
            time_step: 0.05,
            targets: vec![15, 21, 33, 35, 39, 51, 55, 65, 77],
            smoothing: "phase-reversal".into(),
            gate_encoder: "u3".into(),
            exact_coordinates: false,
        }
    }
}

impl Default for PlaybackConfig {
    fn default() -> Self {
        Self {
            trail_window: 20,
            interval_ms: 15,
            z_floor_epsilon: 1e-4,
            max_ticks: None,
        }
    }
}

impl TelemetryConfig {
    /// Defaults with the optional TOML file and environment applied.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let mut cfg = match path {
            Some(p) => Self::from_toml(&fs::read_to_string(p)?)?,
            None => Self::default(),
        };
        if let Ok(dataset) = std::env::var(DATASET_ENV) {
            if !dataset.is_empty() {
                cfg.dataset_path = PathBuf::from(dataset);
            }
        }
        Ok(cfg)
    }

    pub fn from_toml(text: &str) -> Result<Self> {
        Ok(toml::from_str(text)?)
    }

    pub fn validate(&self) -> Result<()> {
        self.generator.validate()?;
        self.playback.validate()
    }
}

impl GeneratorConfig {
    pub fn validate(&self) -> Result<()> {
        if self.entities == 0 {
            return Err(invalid("entities must be at least 1"));
        }
        if !(self.major_radius.is_finite() && self.major_radius > 0.0) {
            return Err(invalid("major_radius must be positive"));
        }
        if !(self.minor_radius.is_finite() && self.minor_radius > 0.0) {
            return Err(invalid("minor_radius must be positive"));
        }
        if !(self.time_step.is_finite() && self.time_step > 0.0) {
            return Err(invalid("time_step must be positive"));
        }
        if self.targets.is_empty() {
            return Err(invalid("targets must not be empty"));
        }
        if self.ticks_per_target == 0 {
            return Err(invalid("ticks_per_target must be at least 1"));
        }
        Ok(())
    }
}

impl PlaybackConfig {
    pub fn validate(&self) -> Result<()> {
        if self.interval_ms == 0 {
            return Err(invalid("interval_ms must be at least 1"));
        }
        if !(self.z_floor_epsilon.is_finite() && self.z_floor_epsilon > 0.0) {
            return Err(invalid("z_floor_epsilon must be positive"));
        }
        Ok(())
    }
}

fn invalid(msg: &str) -> TelemetryError {
    TelemetryError::InvalidConfig(msg.to_owned())
}
