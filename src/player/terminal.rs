// Copyright © 2026 Lukas Bower
// SPDX-License-Identifier: Apache-2.0
// Purpose: Character-grid renderer projecting trails through the camera.
// Author: Lukas Bower

use std::io::Write;

use super::animator::TickOutput;
use super::driver::RenderDriver;
use crate::error::Result;

/// Vertical squash of the render volume relative to its width.
const BOX_ASPECT_Z: f64 = 0.4;
const CLEAR: &str = "\x1b[H\x1b[2J";

/// Draws each tick as ASCII art: `.` for trail history, `o` for the head.
pub struct TerminalRenderer<W: Write> {
    out: W,
    cols: usize,
    rows: usize,
    clear: bool,
}

impl<W: Write> TerminalRenderer<W> {
    pub fn new(out: W, cols: usize, rows: usize) -> Self {
        Self {
            out,
            cols: cols.max(8),
            rows: rows.max(4),
            clear: true,
        }
    }

    /// Skip the ANSI clear sequence between frames.
    pub fn without_clear(mut self) -> Self {
        self.clear = false;
        self
    }

    pub fn into_inner(self) -> W {
        self.out
    }

    fn raster(&self, tick: &TickOutput) -> Vec<Vec<u8>> {
        let mut grid = vec![vec![b' '; self.cols]; self.rows];
        let az = tick.camera.azimuth.to_radians();
        let el = tick.camera.elevation.to_radians();
        let (sin_az, cos_az) = az.sin_cos();
        let (sin_el, cos_el) = el.sin_cos();
        let horiz = if tick.scale.max_x > 0.0 { tick.scale.max_x } else { 1.0 };
        let vert = tick.scale.render_floor;

        for trail in &tick.trails {
            let n = trail.xs.len();
            for k in 0..n {
                let nx = trail.xs[k] / horiz;
                let ny = trail.ys[k] / horiz;
                let nz = trail.zs[k] / vert * BOX_ASPECT_Z;
                let h = -nx * sin_az + ny * cos_az;
                let depth = nx * cos_az + ny * sin_az;
                let v = nz * cos_el - depth * sin_el;

                // Both axes span [-1.5, 1.5] after projection.
                let col = ((h / 3.0 + 0.5) * (self.cols - 1) as f64).round();
                let row = ((0.5 - v / 3.0) * (self.rows - 1) as f64).round();
                if col < 0.0 || row < 0.0 {
                    continue;
                }
                let (col, row) = (col as usize, row as usize);
                if col >= self.cols || row >= self.rows {
                    continue;
                }
                let glyph = if k + 1 == n { b'o' } else { b'.' };
                if grid[row][col] != b'o' {
                    grid[row][col] = glyph;
                }
            }
        }
        grid
    }
}

impl<W: Write> RenderDriver for TerminalRenderer<W> {
    fn draw(&mut self, tick: &TickOutput) -> Result<()> {
        let grid = self.raster(tick);
        if self.clear {
            write!(self.out, "{CLEAR}")?;
        }
        writeln!(self.out, ">> {}", tick.title)?;
        writeln!(self.out, "{}", tick.info)?;
        for line in grid {
            self.out.write_all(&line)?;
            self.out.write_all(b"\n")?;
        }
        self.out.flush()?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::player::animator::{Camera, EntityTrail};
    use crate::loader::GeometryScale;

    fn tick() -> TickOutput {
        TickOutput {
            idx: 1,
            total: 2,
            trail_start: 0,
            trails: vec![EntityTrail {
                xs: vec![30.0, 0.0],
                ys: vec![0.0, 30.0],
                zs: vec![0.0, 0.0],
            }],
            camera: Camera::at(0),
            scale: GeometryScale {
                max_x: 30.0,
                max_z: 0.0,
                render_floor: 1e-4,
                flattening: 0.0,
            },
            title: "FRAME: 1/2".into(),
            info: "Z-Amplitude: 0.00000000".into(),
        }
    }

    #[test]
    fn draws_overlay_and_points() {
        let mut r = TerminalRenderer::new(Vec::new(), 40, 12).without_clear();
        r.draw(&tick()).unwrap();
        let text = String::from_utf8(r.into_inner()).unwrap();
        let mut lines = text.lines();
        assert_eq!(lines.next(), Some(">> FRAME: 1/2"));
        assert_eq!(lines.next(), Some("Z-Amplitude: 0.00000000"));
        let grid: Vec<&str> = lines.collect();
        assert_eq!(grid.len(), 12);
        assert_eq!(text.matches('o').count(), 1);
        // One trail dot plus the decimal point in the overlay.
        assert_eq!(text.matches('.').count(), 2);
    }
}
