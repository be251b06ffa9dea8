// Copyright © 2026 Lukas Bower
// SPDX-License-Identifier: Apache-2.0
// Purpose: Write recorded frames to the delimited dataset file.
// Author: Lukas Bower

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use log::info;

use crate::error::Result;
use crate::recorder::Frame;

pub const FRAME_COL: &str = "Frame";
pub const TARGET_COL: &str = "Target_N";
pub const GAIN_COL: &str = "VR_Smoothness";
pub const SIGNATURE_COL: &str = "SHA256_Signature";

/// Decimal places for float columns in the default format.
pub const FIXED_DECIMALS: usize = 8;

/// How float columns are rendered on disk.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum FloatFormat {
    /// Eight decimal places.
    #[default]
    Fixed,
    /// Shortest exact round-trip form; keeps signatures verifiable on disk.
    Exact,
}

impl FloatFormat {
    fn render(self, v: f64) -> String {
        match self {
            Self::Fixed => format!("{v:.prec$}", prec = FIXED_DECIMALS),
            Self::Exact => format!("{v:?}"),
        }
    }
}

pub fn entity_column(index: usize, axis: char) -> String {
    format!("q{index}_{axis}")
}

/// Header row for a dataset with `entities` entities.
pub fn header(entities: usize) -> Vec<String> {
    let mut cols = vec![FRAME_COL.to_owned(), TARGET_COL.to_owned(), GAIN_COL.to_owned()];
    for i in 0..entities {
        for axis in ['x', 'y', 'z'] {
            cols.push(entity_column(i, axis));
        }
    }
    cols.push(SIGNATURE_COL.to_owned());
    cols
}

/// Write `frames` to `path`, replacing any existing file.
pub fn export(path: &Path, frames: &[Frame], format: FloatFormat) -> Result<()> {
    let entities = frames.first().map_or(0, |f| f.entities.len());
    let mut out = BufWriter::new(File::create(path)?);
    writeln!(out, "{}", header(entities).join(","))?;
    for frame in frames {
        write!(
            out,
            "{},{},{}",
            frame.frame_index,
            frame.target_id,
            format.render(frame.smoothness_gain)
        )?;
        for p in &frame.entities {
            write!(
                out,
                ",{},{},{}",
                format.render(p.x),
                format.render(p.y),
                format.render(p.z)
            )?;
        }
        writeln!(out, ",{}", frame.integrity_digest)?;
    }
    out.flush()?;
    info!("wrote {} frames to {}", frames.len(), path.display());
    Ok(())
}
