// Copyright © 2026 Lukas Bower
// SPDX-License-Identifier: Apache-2.0
// Purpose: Load a persisted dataset, validate its schema and derive scale.
// Author: Lukas Bower

//! Dataset loading.
//!
//! The entity count is discovered from the `q{i}_x` columns; every entity
//! must carry a full x/y/z triple and indices must be contiguous from 0.

use std::collections::{BTreeSet, HashMap};
use std::fs;
use std::io::ErrorKind;
use std::path::Path;

use log::{info, warn};

use crate::error::{Result, TelemetryError};
use crate::exporter::{entity_column, FRAME_COL, GAIN_COL, SIGNATURE_COL, TARGET_COL};
use crate::geometry::Point3;
use crate::recorder::Frame;

/// Render bounds derived once from the dataset's coordinate extrema.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct GeometryScale {
    /// Largest absolute x or y value.
    pub max_x: f64,
    /// Largest absolute z value.
    pub max_z: f64,
    /// Half-height of the render volume, never below the configured epsilon.
    pub render_floor: f64,
    /// `max_z / max_x`, or 0 for a degenerate horizontal extent.
    pub flattening: f64,
}

/// Outcome of recomputing every frame's digest.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct SignatureReport {
    pub checked: usize,
    pub mismatched: Vec<u64>,
}

impl SignatureReport {
    pub fn is_clean(&self) -> bool {
        self.mismatched.is_empty()
    }
}

/// Immutable, fully loaded dataset.
#[derive(Clone, Debug, PartialEq)]
pub struct TelemetryDataset {
    entities: usize,
    frames: Vec<Frame>,
}

impl TelemetryDataset {
    /// Every frame must carry exactly `entities` points, with `entities >= 1`.
    pub fn new(entities: usize, frames: Vec<Frame>) -> Result<Self> {
        if frames.is_empty() {
            return Err(TelemetryError::EmptyDataset);
        }
        if entities == 0 {
            return Err(TelemetryError::SchemaMismatch {
                expected: "at least one entity".into(),
                found: "0 entities".into(),
            });
        }
        if let Some(f) = frames.iter().find(|f| f.entities.len() != entities) {
            return Err(TelemetryError::SchemaMismatch {
                expected: format!("{entities} entities per frame"),
                found: format!("{} in frame {}", f.entities.len(), f.frame_index),
            });
        }
        Ok(Self { entities, frames })
    }

    pub fn entities(&self) -> usize {
        self.entities
    }

    pub fn len(&self) -> usize {
        self.frames.len()
    }

    pub fn is_empty(&self) -> bool {
        self.frames.is_empty()
    }

    pub fn frames(&self) -> &[Frame] {
        &self.frames
    }

    pub fn scale(&self, z_floor_epsilon: f64) -> GeometryScale {
        let mut max_x = 0.0_f64;
        let mut max_z = 0.0_f64;
        for p in self.frames.iter().flat_map(|f| f.entities.iter()) {
            max_x = max_x.max(p.x.abs()).max(p.y.abs());
            max_z = max_z.max(p.z.abs());
        }
        GeometryScale {
            max_x,
            max_z,
            render_floor: (max_z * 10.0).max(z_floor_epsilon),
            flattening: if max_x > 0.0 { max_z / max_x } else { 0.0 },
        }
    }

    /// Recompute each frame's digest from the loaded coordinates.
    pub fn verify_signatures(&self) -> SignatureReport {
        let mismatched: Vec<u64> = self
            .frames
            .iter()
            .filter(|f| !f.verify())
            .map(|f| f.frame_index)
            .collect();
        if !mismatched.is_empty() {
            warn!(
                "{} of {} frames fail signature verification",
                mismatched.len(),
                self.frames.len()
            );
        }
        SignatureReport {
            checked: self.frames.len(),
            mismatched,
        }
    }
}

/// Read and parse the dataset at `path`.
pub fn load(path: &Path) -> Result<TelemetryDataset> {
    let text = match fs::read_to_string(path) {
        Ok(text) => text,
        Err(e) if e.kind() == ErrorKind::NotFound => {
            return Err(TelemetryError::MissingInput {
                path: path.to_path_buf(),
            })
        }
        Err(e) => return Err(e.into()),
    };
    let dataset = parse(&text)?;
    info!(
        "loaded {}: {} frames, {} entities",
        path.display(),
        dataset.len(),
        dataset.entities()
    );
    Ok(dataset)
}

struct Layout {
    width: usize,
    frame: usize,
    target: usize,
    gain: usize,
    signature: usize,
    axes: Vec<[usize; 3]>,
}

/// Parse dataset text (header plus one row per frame).
pub fn parse(text: &str) -> Result<TelemetryDataset> {
    let mut lines = text.lines().enumerate().filter(|(_, l)| !l.trim().is_empty());
    let header = match lines.next() {
        Some((_, h)) => h,
        None => return Err(TelemetryError::EmptyDataset),
    };
    let layout = layout(header)?;

    let mut frames = Vec::new();
    for (n, line) in lines {
        frames.push(parse_row(&layout, n + 1, line)?);
    }
    TelemetryDataset::new(layout.axes.len(), frames)
}

fn layout(header: &str) -> Result<Layout> {
    let names: Vec<&str> = header.split(',').map(str::trim).collect();
    let index: HashMap<&str, usize> = names.iter().enumerate().map(|(i, n)| (*n, i)).collect();

    let required = |name: &str| {
        index.get(name).copied().ok_or_else(|| TelemetryError::SchemaMismatch {
            expected: format!("column {name}"),
            found: names.join(","),
        })
    };
    let frame = required(FRAME_COL)?;
    let target = required(TARGET_COL)?;
    let gain = required(GAIN_COL)?;
    let signature = required(SIGNATURE_COL)?;

    let discovered: BTreeSet<usize> = names
        .iter()
        .filter_map(|n| n.strip_prefix('q')?.strip_suffix("_x")?.parse().ok())
        .collect();
    if discovered.is_empty() {
        return Err(TelemetryError::SchemaMismatch {
            expected: "at least one q{i}_x/q{i}_y/q{i}_z triple".into(),
            found: "no entity columns".into(),
        });
    }
    let count = discovered.len();
    if discovered.iter().copied().ne(0..count) {
        return Err(TelemetryError::SchemaMismatch {
            expected: format!("entity indices 0..{count}"),
            found: format!("{discovered:?}"),
        });
    }

    let mut axes = Vec::with_capacity(count);
    for i in 0..count {
        let mut triple = [0usize; 3];
        for (slot, axis) in triple.iter_mut().zip(['x', 'y', 'z']) {
            let name = entity_column(i, axis);
            *slot = index.get(name.as_str()).copied().ok_or_else(|| {
                TelemetryError::SchemaMismatch {
                    expected: format!("q{i}_x, q{i}_y, q{i}_z"),
                    found: format!("missing {name}"),
                }
            })?;
        }
        axes.push(triple);
    }

    Ok(Layout {
        width: names.len(),
        frame,
        target,
        gain,
        signature,
        axes,
    })
}

fn parse_row(layout: &Layout, line: usize, row: &str) -> Result<Frame> {
    let fields: Vec<&str> = row.split(',').map(str::trim).collect();
    if fields.len() != layout.width {
        return Err(TelemetryError::MalformedRow {
            line,
            reason: format!("expected {} fields, found {}", layout.width, fields.len()),
        });
    }
    let num = |col: usize| -> Result<f64> {
        fields[col].parse::<f64>().map_err(|_| TelemetryError::MalformedRow {
            line,
            reason: format!("'{}' is not a number", fields[col]),
        })
    };
    let int = |col: usize| -> Result<u64> {
        fields[col].parse::<u64>().map_err(|_| TelemetryError::MalformedRow {
            line,
            reason: format!("'{}' is not an integer", fields[col]),
        })
    };

    let mut entities = Vec::with_capacity(layout.axes.len());
    for [x, y, z] in &layout.axes {
        entities.push(Point3::new(num(*x)?, num(*y)?, num(*z)?));
    }
    Ok(Frame {
        frame_index: int(layout.frame)?,
        target_id: int(layout.target)?,
        smoothness_gain: num(layout.gain)?,
        entities,
        integrity_digest: fields[layout.signature].to_owned(),
    })
}
