// Copyright © 2026 Lukas Bower
// SPDX-License-Identifier: Apache-2.0
// Purpose: Synthesize the chaotic drive signal and its correction gain.
// Author: Lukas Bower

use crate::collab::Smoothing;
use crate::error::{Result, TelemetryError};

/// Drive values for a single frame.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct DriveSample {
    /// Raw chaos, bounded in `[0, 8]`.
    pub chaos: f64,
    /// Gain returned by the smoothing collaborator.
    pub gain: f64,
    /// Correction torque `-chaos * gain`.
    pub torque: f64,
}

/// Wraps the smoothing collaborator and produces per-frame drive samples.
pub struct DriveSignalSynthesizer<'a> {
    smoothing: &'a dyn Smoothing,
}

impl<'a> DriveSignalSynthesizer<'a> {
    pub fn new(smoothing: &'a dyn Smoothing) -> Self {
        Self { smoothing }
    }

    /// Compute the drive for `local_tick` of a phase targeting `target_size`
    /// at elapsed time `t`. `frame` is only used for error reporting.
    pub fn sample(&self, frame: u64, target_size: u64, local_tick: u64, t: f64) -> Result<DriveSample> {
        let ideal_period = ideal_period(target_size, local_tick) as f64;
        // Offset keeps the signal non-negative.
        let chaos = (t * ideal_period).sin() * 4.0 + 4.0;

        let tuning = -chaos;
        let gain = self.smoothing.gain(chaos, tuning);
        if !gain.is_finite() {
            return Err(TelemetryError::NonFiniteSignal { frame, gain });
        }

        let torque = tuning * gain;
        if !torque.is_finite() {
            return Err(TelemetryError::NonFiniteSignal { frame, gain });
        }

        Ok(DriveSample {
            chaos,
            gain,
            torque,
        })
    }
}

/// `local_tick mod max(1, target_size / 2)`.
pub fn ideal_period(target_size: u64, local_tick: u64) -> u64 {
    local_tick % (target_size / 2).max(1)
}
