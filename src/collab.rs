// Copyright © 2026 Lukas Bower
// SPDX-License-Identifier: Apache-2.0
// Purpose: Injected collaborators for gain smoothing and geometry encoding.
// Author: Lukas Bower

//! External collaborators used during generation.
//!
//! The smoothing function and the geometry-to-instruction encoder are opaque
//! to the generator. Both are resolved by name from a
//! [`CollaboratorRegistry`] before generation starts, so a missing
//! collaborator fails the run before any frame is produced.

use std::collections::HashMap;

use log::debug;

use crate::error::{Result, TelemetryError};

/// Opaque phase-correction function `f(signal, tuning) -> gain`.
pub trait Smoothing {
    fn gain(&self, signal: f64, tuning: f64) -> f64;
}

impl<F> Smoothing for F
where
    F: Fn(f64, f64) -> f64,
{
    fn gain(&self, signal: f64, tuning: f64) -> f64 {
        self(signal, tuning)
    }
}

/// Opaque geometry-to-instruction conversion `(x, y, z, R, r) -> handle`.
pub trait GateEncoder {
    fn encode(&self, x: f64, y: f64, z: f64, major: f64, minor: f64) -> GateHandle;
}

/// Instruction handle produced by a [`GateEncoder`]. The generator never
/// inspects it; it is only forwarded to an [`InstructionSink`].
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct GateHandle([f64; 3]);

impl GateHandle {
    pub fn from_angles(theta: f64, phi: f64, lambda: f64) -> Self {
        Self([theta, phi, lambda])
    }

    pub fn angles(&self) -> [f64; 3] {
        self.0
    }
}

/// Side-channel receiving encoded instructions.
pub trait InstructionSink {
    fn append(&mut self, entity: usize, handle: GateHandle);
}

/// In-memory instruction log, one per target phase.
#[derive(Debug, Default)]
pub struct CircuitLog {
    ops: Vec<(usize, GateHandle)>,
}

impl CircuitLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.ops.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ops.is_empty()
    }

    pub fn ops(&self) -> &[(usize, GateHandle)] {
        &self.ops
    }
}

impl InstructionSink for CircuitLog {
    fn append(&mut self, entity: usize, handle: GateHandle) {
        self.ops.push((entity, handle));
    }
}

/// Damps the gain with signal energy: `1 / (1 + sqrt(|signal * tuning|))`.
#[derive(Clone, Copy, Debug, Default)]
pub struct PhaseReversal;

impl Smoothing for PhaseReversal {
    fn gain(&self, signal: f64, tuning: f64) -> f64 {
        1.0 / (1.0 + (signal * tuning).abs().sqrt())
    }
}

/// Fixed gain regardless of input.
#[derive(Clone, Copy, Debug)]
pub struct ConstantGain(pub f64);

impl Smoothing for ConstantGain {
    fn gain(&self, _signal: f64, _tuning: f64) -> f64 {
        self.0
    }
}

/// Encodes a torus point as U3 rotation angles: tube angle, azimuth and the
/// normalised radial excess.
#[derive(Clone, Copy, Debug, Default)]
pub struct U3Encoder;

impl GateEncoder for U3Encoder {
    fn encode(&self, x: f64, y: f64, z: f64, major: f64, minor: f64) -> GateHandle {
        let radial = x.hypot(y) - major;
        let theta = z.atan2(radial);
        let phi = y.atan2(x);
        let lambda = if minor != 0.0 { radial / minor } else { 0.0 };
        GateHandle::from_angles(theta, phi, lambda)
    }
}

type SmoothingFactory = fn(&str) -> Option<Box<dyn Smoothing>>;
type EncoderFactory = fn() -> Box<dyn GateEncoder>;

/// Name-based lookup of collaborators.
///
/// Smoothing names may carry an argument after a colon, e.g. `constant:0.5`.
pub struct CollaboratorRegistry {
    smoothing: HashMap<String, SmoothingFactory>,
    encoders: HashMap<String, EncoderFactory>,
}

impl CollaboratorRegistry {
    /// Registry with no collaborators.
    pub fn empty() -> Self {
        Self {
            smoothing: HashMap::new(),
            encoders: HashMap::new(),
        }
    }

    /// Registry preloaded with `phase-reversal`, `constant:<gain>` and `u3`.
    pub fn with_builtins() -> Self {
        let mut registry = Self::empty();
        registry.register_smoothing("phase-reversal", phase_reversal);
        registry.register_smoothing("constant", constant_gain);
        registry.register_encoder("u3", u3_encoder);
        registry
    }

    pub fn register_smoothing(&mut self, name: &str, factory: SmoothingFactory) {
        self.smoothing.insert(name.to_owned(), factory);
    }

    pub fn register_encoder(&mut self, name: &str, factory: EncoderFactory) {
        self.encoders.insert(name.to_owned(), factory);
    }

    pub fn resolve_smoothing(&self, spec: &str) -> Result<Box<dyn Smoothing>> {
        let (name, arg) = spec.split_once(':').unwrap_or((spec, ""));
        let resolved = self.smoothing.get(name.trim()).and_then(|f| f(arg.trim()));
        match resolved {
            Some(s) => {
                debug!("resolved smoothing collaborator {spec}");
                Ok(s)
            }
            None => Err(TelemetryError::CollaboratorUnavailable {
                role: "smoothing",
                name: spec.to_owned(),
            }),
        }
    }

    pub fn resolve_encoder(&self, name: &str) -> Result<Box<dyn GateEncoder>> {
        match self.encoders.get(name.trim()) {
            Some(f) => {
                debug!("resolved gate encoder {name}");
                Ok(f())
            }
            None => Err(TelemetryError::CollaboratorUnavailable {
                role: "geometry encoder",
                name: name.to_owned(),
            }),
        }
    }
}

fn phase_reversal(_arg: &str) -> Option<Box<dyn Smoothing>> {
    Some(Box::new(PhaseReversal))
}

fn constant_gain(arg: &str) -> Option<Box<dyn Smoothing>> {
    let gain = arg.parse::<f64>().ok()?;
    Some(Box::new(ConstantGain(gain)))
}

fn u3_encoder() -> Box<dyn GateEncoder> {
    Box::new(U3Encoder)
}

impl Default for CollaboratorRegistry {
    fn default() -> Self {
        Self::with_builtins()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builtins_resolve() {
        let registry = CollaboratorRegistry::with_builtins();
        let s = registry.resolve_smoothing("constant:0.5").unwrap();
        assert_eq!(s.gain(3.0, -3.0), 0.5);
        let s = registry.resolve_smoothing("phase-reversal").unwrap();
        assert_eq!(s.gain(4.0, -4.0), 0.2);
        assert!(registry.resolve_encoder("u3").is_ok());
    }

    #[test]
    fn unknown_names_are_unavailable() {
        let registry = CollaboratorRegistry::with_builtins();
        let err = registry.resolve_smoothing("hilbert").err().unwrap();
        assert!(matches!(
            err,
            TelemetryError::CollaboratorUnavailable { role: "smoothing", .. }
        ));
        assert!(registry.resolve_smoothing("constant:abc").is_err());
        assert!(registry.resolve_encoder("cx").is_err());
        assert!(CollaboratorRegistry::empty().resolve_encoder("u3").is_err());
    }

    #[test]
    fn closures_act_as_smoothing() {
        let doubled = |signal: f64, _tuning: f64| signal * 2.0;
        assert_eq!(doubled.gain(1.5, 0.0), 3.0);
    }

    #[test]
    fn u3_encodes_outer_equator() {
        let handle = U3Encoder.encode(30.0, 0.0, 0.0, 20.0, 10.0);
        assert_eq!(handle.angles(), [0.0, 0.0, 1.0]);
    }

    #[test]
    fn circuit_log_collects_ops() {
        let mut log = CircuitLog::new();
        assert!(log.is_empty());
        log.append(3, GateHandle::from_angles(0.1, 0.2, 0.3));
        assert_eq!(log.len(), 1);
        assert_eq!(log.ops()[0].0, 3);
    }
}
