// Copyright © 2026 Lukas Bower
// SPDX-License-Identifier: Apache-2.0
// Purpose: Error taxonomy shared by generation and playback.
// Author: Lukas Bower

use std::path::PathBuf;

use thiserror::Error;

/// Errors surfaced by the telemetry generator, loader and player.
///
/// None of these are retried; every variant is reported to the operator.
#[derive(Debug, Error)]
pub enum TelemetryError {
    #[error("dataset not found: {}", path.display())]
    MissingInput { path: PathBuf },
    #[error("{role} collaborator '{name}' is not available")]
    CollaboratorUnavailable { role: &'static str, name: String },
    #[error("smoothing collaborator returned non-finite gain {gain} at frame {frame}")]
    NonFiniteSignal { frame: u64, gain: f64 },
    #[error("dataset schema mismatch: expected {expected}, found {found}")]
    SchemaMismatch { expected: String, found: String },
    #[error("malformed row at line {line}: {reason}")]
    MalformedRow { line: usize, reason: String },
    #[error("dataset contains no frames")]
    EmptyDataset,
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),
    #[error("cannot {op} a session that is {from}")]
    InvalidState { from: &'static str, op: &'static str },
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("config parse error: {0}")]
    Config(#[from] toml::de::Error),
}

pub type Result<T> = std::result::Result<T, TelemetryError>;
