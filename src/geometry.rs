// Copyright © 2026 Lukas Bower
// SPDX-License-Identifier: Apache-2.0
// Purpose: Map entity phase and drive signal onto a torus surface.
// Author: Lukas Bower

//! Toroidal placement of tracked entities.
//!
//! Each entity sits on a torus with major radius `R` and minor radius `r`.
//! Its azimuth `zeta` fans entities evenly around the axis and is perturbed
//! by the drive signal, while the tube angle `theta` steps by the golden
//! ratio so entity phases never line up.

use std::f64::consts::TAU;

/// Golden ratio.
pub const PHI: f64 = 1.618_033_988_749_895;

/// Azimuthal angular velocity in radians per unit time.
const AZIMUTH_RATE: f64 = 0.8;

/// A single Cartesian coordinate.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Point3 {
    pub x: f64,
    pub y: f64,
    pub z: f64,
}

impl Point3 {
    pub const fn new(x: f64, y: f64, z: f64) -> Self {
        Self { x, y, z }
    }
}

/// Fixed torus dimensions and entity count.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TorusGeometry {
    pub major_radius: f64,
    pub minor_radius: f64,
    pub entities: usize,
}

impl TorusGeometry {
    pub fn new(major_radius: f64, minor_radius: f64, entities: usize) -> Self {
        Self {
            major_radius,
            minor_radius,
            entities,
        }
    }

    /// Place entity `index` at time `t` given chaos `chaos` and correction
    /// torque `torque`. Pure: identical inputs give bit-identical output.
    pub fn place(&self, index: usize, t: f64, chaos: f64, torque: f64) -> Point3 {
        let i = index as f64;
        let spacing = TAU / self.entities.max(1) as f64;
        let zeta = t * AZIMUTH_RATE + i * spacing + (chaos + torque);
        let theta = t * PHI + i * PHI;

        let dist = self.major_radius + self.minor_radius * theta.cos();
        Point3 {
            x: dist * zeta.cos(),
            y: dist * zeta.sin(),
            z: self.minor_radius * theta.sin(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn origin_entity_at_rest() {
        let torus = TorusGeometry::new(20.0, 10.0, 4);
        let p = torus.place(0, 0.0, 0.0, 0.0);
        assert_eq!(p, Point3::new(30.0, 0.0, 0.0));
    }

    #[test]
    fn points_stay_on_torus_surface() {
        let torus = TorusGeometry::new(20.0, 10.0, 8);
        for i in 0..8 {
            let p = torus.place(i, 1.35, 3.2, -1.1);
            let ring = (p.x.hypot(p.y) - 20.0).hypot(p.z);
            assert!((ring - 10.0).abs() < 1e-9, "entity {i} off surface: {ring}");
        }
    }

    #[test]
    fn entities_fan_out_evenly() {
        let torus = TorusGeometry::new(20.0, 10.0, 4);
        let a = torus.place(0, 0.0, 0.0, 0.0);
        let b = torus.place(2, 0.0, 0.0, 0.0);
        // Entity 2 sits half a turn away in azimuth.
        assert!(a.x > 0.0 && b.x < 0.0);
        assert!(b.y.abs() < 1e-9);
    }

    #[test]
    fn placement_is_deterministic() {
        let torus = TorusGeometry::new(20.0, 10.0, 120);
        let a = torus.place(57, 12.3, 6.7, -3.35);
        let b = torus.place(57, 12.3, 6.7, -3.35);
        assert_eq!(a.x.to_bits(), b.x.to_bits());
        assert_eq!(a.y.to_bits(), b.y.to_bits());
        assert_eq!(a.z.to_bits(), b.z.to_bits());
    }
}
