// Copyright © 2026 Lukas Bower
// SPDX-License-Identifier: Apache-2.0
// Purpose: Tick-driven playback state machine with bounded trails.
// Author: Lukas Bower

//! Trail animator.
//!
//! A session moves `Idle -> Playing -> Stopped` and never returns to
//! `Playing`; restarting requires a new animator. Each tick renders the
//! frame at `tick mod len` plus up to `trail_window` frames of history.

use std::fmt;
use std::sync::Arc;

use log::debug;

use crate::error::{Result, TelemetryError};
use crate::loader::{GeometryScale, TelemetryDataset};

const BASE_ELEVATION: f64 = 12.0;
const ELEVATION_SWING: f64 = 4.0;
const ELEVATION_PERIOD: f64 = 100.0;
const AZIMUTH_STEP: f64 = 0.3;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PlaybackState {
    Idle,
    Playing,
    Stopped,
}

impl fmt::Display for PlaybackState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl PlaybackState {
    fn name(self) -> &'static str {
        match self {
            Self::Idle => "idle",
            Self::Playing => "playing",
            Self::Stopped => "stopped",
        }
    }
}

/// Viewpoint in degrees, derived from the frame index alone.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Camera {
    pub elevation: f64,
    pub azimuth: f64,
}

impl Camera {
    pub fn at(idx: usize) -> Self {
        let i = idx as f64;
        Self {
            elevation: BASE_ELEVATION + (i / ELEVATION_PERIOD).sin() * ELEVATION_SWING,
            azimuth: i * AZIMUTH_STEP,
        }
    }
}

/// Line-segment coordinates of one entity over the trail window.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct EntityTrail {
    pub xs: Vec<f64>,
    pub ys: Vec<f64>,
    pub zs: Vec<f64>,
}

/// Everything the rendering driver needs for one tick.
#[derive(Clone, Debug, PartialEq)]
pub struct TickOutput {
    pub idx: usize,
    pub total: usize,
    /// First frame of the trail window.
    pub trail_start: usize,
    pub trails: Vec<EntityTrail>,
    pub camera: Camera,
    pub scale: GeometryScale,
    pub title: String,
    pub info: String,
}

impl TickOutput {
    /// Number of frames in the trail window.
    pub fn trail_len(&self) -> usize {
        self.idx - self.trail_start + 1
    }
}

pub struct TrailAnimator {
    dataset: Arc<TelemetryDataset>,
    scale: GeometryScale,
    trail_window: usize,
    ticks: u64,
    state: PlaybackState,
}

impl TrailAnimator {
    pub fn new(dataset: Arc<TelemetryDataset>, scale: GeometryScale, trail_window: usize) -> Self {
        Self {
            dataset,
            scale,
            trail_window,
            ticks: 0,
            state: PlaybackState::Idle,
        }
    }

    pub fn state(&self) -> PlaybackState {
        self.state
    }

    pub fn ticks(&self) -> u64 {
        self.ticks
    }

    pub fn start(&mut self) -> Result<()> {
        if self.state != PlaybackState::Idle {
            return Err(TelemetryError::InvalidState {
                from: self.state.name(),
                op: "start",
            });
        }
        self.state = PlaybackState::Playing;
        debug!("playback started over {} frames", self.dataset.len());
        Ok(())
    }

    /// Terminal; calling it again is a no-op.
    pub fn stop(&mut self) {
        if self.state != PlaybackState::Stopped {
            debug!("playback stopped after {} ticks", self.ticks);
            self.state = PlaybackState::Stopped;
        }
    }

    /// Advance one tick. Only valid while playing.
    pub fn tick(&mut self) -> Result<TickOutput> {
        if self.state != PlaybackState::Playing {
            return Err(TelemetryError::InvalidState {
                from: self.state.name(),
                op: "tick",
            });
        }
        let out = self.render(self.ticks);
        self.ticks += 1;
        Ok(out)
    }

    /// Render the output for an arbitrary tick without touching state.
    pub fn render(&self, tick: u64) -> TickOutput {
        let frames = self.dataset.frames();
        let total = frames.len();
        let idx = (tick % total as u64) as usize;
        let trail_start = idx.saturating_sub(self.trail_window);
        let window = &frames[trail_start..=idx];

        let trails = (0..self.dataset.entities())
            .map(|e| EntityTrail {
                xs: window.iter().map(|f| f.entities[e].x).collect(),
                ys: window.iter().map(|f| f.entities[e].y).collect(),
                zs: window.iter().map(|f| f.entities[e].z).collect(),
            })
            .collect();

        let current = &frames[idx];
        let z_amplitude = current.entities.first().map_or(0.0, |p| p.z);
        TickOutput {
            idx,
            total,
            trail_start,
            trails,
            camera: Camera::at(idx),
            scale: self.scale,
            title: format!("FRAME: {idx}/{total}"),
            info: format!(
                "Z-Amplitude: {z_amplitude:.8}\nGain: {:.8} | Flattening: {:.8}",
                current.smoothness_gain, self.scale.flattening
            ),
        }
    }
}
