// Copyright © 2026 Lukas Bower
// SPDX-License-Identifier: Apache-2.0
// Purpose: Assemble signed per-frame snapshots across all entities.
// Author: Lukas Bower

//! Frame recording and integrity digests.
//!
//! A frame is only appended once every entity has been placed and the
//! digest computed, so the accumulation never holds a partial frame.

use log::trace;
use sha2::{Digest, Sha256};

use crate::collab::{GateEncoder, InstructionSink, Smoothing};
use crate::error::{Result, TelemetryError};
use crate::geometry::{Point3, TorusGeometry};
use crate::signal::DriveSignalSynthesizer;

/// One simulation tick across all entities.
#[derive(Clone, Debug, PartialEq)]
pub struct Frame {
    pub frame_index: u64,
    pub target_id: u64,
    pub smoothness_gain: f64,
    pub entities: Vec<Point3>,
    pub integrity_digest: String,
}

impl Frame {
    /// Recompute the digest from the recorded coordinates.
    pub fn verify(&self) -> bool {
        signature(&self.entities) == self.integrity_digest
    }
}

/// Concatenate each entity's x, y, z in index order, without separators,
/// using the shortest representation that round-trips exactly.
pub fn coordinate_string(points: &[Point3]) -> String {
    points
        .iter()
        .map(|p| format!("{:?}{:?}{:?}", p.x, p.y, p.z))
        .collect()
}

/// Lowercase hex SHA-256 over [`coordinate_string`].
pub fn signature(points: &[Point3]) -> String {
    let mut hasher = Sha256::new();
    hasher.update(coordinate_string(points).as_bytes());
    hex::encode(hasher.finalize())
}

/// Accumulates frames in generation order.
pub struct TelemetryRecorder<'a> {
    geometry: TorusGeometry,
    time_step: f64,
    synth: DriveSignalSynthesizer<'a>,
    encoder: &'a dyn GateEncoder,
    frames: Vec<Frame>,
}

impl<'a> TelemetryRecorder<'a> {
    pub fn new(
        geometry: TorusGeometry,
        time_step: f64,
        smoothing: &'a dyn Smoothing,
        encoder: &'a dyn GateEncoder,
    ) -> Self {
        Self {
            geometry,
            time_step,
            synth: DriveSignalSynthesizer::new(smoothing),
            encoder,
            frames: Vec::new(),
        }
    }

    /// Record the next frame for `local_tick` of `target`. Encoded
    /// instructions are forwarded to `sink`.
    pub fn record(
        &mut self,
        target: u64,
        local_tick: u64,
        sink: &mut dyn InstructionSink,
    ) -> Result<&Frame> {
        let frame_index = self.frames.len() as u64;
        let t = frame_index as f64 * self.time_step;
        let drive = self.synth.sample(frame_index, target, local_tick, t)?;

        let g = self.geometry;
        let mut entities = Vec::with_capacity(g.entities);
        for i in 0..g.entities {
            let p = g.place(i, t, drive.chaos, drive.torque);
            if !(p.x.is_finite() && p.y.is_finite() && p.z.is_finite()) {
                return Err(TelemetryError::NonFiniteSignal {
                    frame: frame_index,
                    gain: drive.gain,
                });
            }
            sink.append(i, self.encoder.encode(p.x, p.y, p.z, g.major_radius, g.minor_radius));
            entities.push(p);
        }

        let integrity_digest = signature(&entities);
        trace!("frame {frame_index} target {target} gain {} digest {integrity_digest}", drive.gain);
        self.frames.push(Frame {
            frame_index,
            target_id: target,
            smoothness_gain: drive.gain,
            entities,
            integrity_digest,
        });
        Ok(&self.frames[self.frames.len() - 1])
    }

    pub fn frames(&self) -> &[Frame] {
        &self.frames
    }

    pub fn into_frames(self) -> Vec<Frame> {
        self.frames
    }
}
