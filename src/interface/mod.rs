// vof_flow - A diffuse-interface VOF two-phase flow solver
// Copyright (C) 2026 The vof_flow developers

// This program is free software: you can redistribute it and/or modify
// it under the terms of the GNU Affero General Public License as
// published by the Free Software Foundation, either version 3 of the
// License, or (at your option) any later version.

// This program is distributed in the hope that it will be useful,
// but WITHOUT ANY WARRANTY; without even the implied warranty of
// MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE.  See the
// GNU Affero General Public License for more details.

// You should have received a copy of the GNU Affero General Public License
// along with this program.  If not, see <https://www.gnu.org/licenses/>.

//! Diffuse-interface representation of the liquid phase
//!
//! The liquid fraction is carried as a cell-centred VOF field. Inside a
//! cell the interface is the zero set of `n . x + d` in cell-local
//! coordinates, and the phase indicator is the logistic profile
//! `H = 1 / (1 + exp(-2 beta (n . x + d)))`; `beta` fixes the (cell-sized)
//! interface thickness.

pub mod curvature;
pub mod flux;
pub mod force;
pub mod gauss;

use crate::array::{Field, SourcePair, VecField};
use crate::config::Config;
use crate::domain::Domain;
use crate::halo;
use gauss::GaussQuad;

/// Interface sharpness of the logistic profile.
pub const VOFBETA: f64 = 2.;
/// Cells with a liquid fraction within this distance of 0 or 1 are treated
/// as single phase.
pub const VOFMIN: f64 = 1e-8;
/// Quadrature points per axis for face fluxes and the intercept.
pub const NGAUSS: usize = 2;

/// VOF field and the per-stage surface reconstruction attached to it.
pub struct Interface {
    /// Liquid volume fraction, two-wide halo
    pub vof: Field,
    /// Unit VOF gradient at cell corners
    pub dvof: VecField,
    /// Cell normal and intercept `(n, d)`
    pub normal: VecField,
    /// Mean curvature
    pub curv: Field,
    /// Surface-tension body force at x faces
    pub ifrcx: Field,
    /// Surface-tension body force at y faces
    pub ifrcy: Field,
    /// Surface-tension body force at z faces (three dimensions)
    pub ifrcz: Option<Field>,
    /// Upwind VOF flux through x faces
    pub flxx: Field,
    pub flxy: Field,
    pub flxz: Option<Field>,
    /// Runge-Kutta sources of the VOF update
    pub src: SourcePair,
    /// Surface tension coefficient
    pub tension: f64,
    /// Quadrature on the cell-local interval `[-1/2, 1/2]`
    pub quad: GaussQuad,
}

impl Interface {
    pub fn new(domain: &Domain, config: &Config) -> Interface {
        let mx = domain.mysizes[0] as i32;
        let my = domain.mysizes[1] as i32;
        let three_d = domain.ndims == 3;
        let mz = domain.mysizes[2] as i32;
        let z = |lo: i32, hi: i32| if three_d { (lo, hi) } else { (0, 0) };
        let cells = domain.mysizes[..domain.ndims].iter().product::<usize>();
        let (zlo, zhi) = z(-1, mz + 2);
        let vof = Field::new([0, -1, zlo], [mx + 1, my + 2, zhi]);
        let (zlo, zhi) = z(0, mz + 2);
        let dvof = VecField::new([1, 0, zlo], [mx + 1, my + 2, zhi], domain.ndims);
        let (zlo, zhi) = z(0, mz + 1);
        let normal = VecField::new([1, 0, zlo], [mx, my + 1, zhi], domain.ndims + 1);
        let curv = Field::new([1, 0, zlo], [mx, my + 1, zhi]);
        let (zlo, zhi) = z(1, mz);
        let ifrcx = Field::new([2, 1, zlo], [mx, my, zhi]);
        let ifrcy = Field::new([1, 1, zlo], [mx, my, zhi]);
        let flxx = Field::new([1, 1, zlo], [mx + 1, my, zhi]);
        let flxy = Field::new([1, 1, zlo], [mx, my + 1, zhi]);
        let (ifrcz, flxz) = if three_d {
            (
                Some(Field::new([1, 1, 1], [mx, my, mz])),
                Some(Field::new([1, 1, 1], [mx, my, mz + 1])),
            )
        } else {
            (None, None)
        };
        Interface {
            vof,
            dvof,
            normal,
            curv,
            ifrcx,
            ifrcy,
            ifrcz,
            flxx,
            flxy,
            flxz,
            src: SourcePair::new(cells),
            tension: config.tension,
            quad: GaussQuad::mapped(NGAUSS, -0.5, 0.5),
        }
    }

    /// Initialise the liquid fraction from a signed distance function
    /// (positive inside the liquid, in physical units). Cell averages of
    /// the diffuse indicator are taken by Gauss quadrature and clamped to
    /// `[0, 1]`; this is the only place a clamp is applied.
    pub fn init_vof<F>(&mut self, domain: &Domain, dist: F)
    where
        F: Fn(f64, f64, f64) -> f64,
    {
        // a denser rule than the flux quadrature: the initial condition is
        // integrated once and sets the conserved liquid volume
        let quad = GaussQuad::mapped(4, -0.5, 0.5);
        let mx = domain.mysizes[0] as i32;
        let my = domain.mysizes[1] as i32;
        let (klo, khi) = if domain.ndims == 3 {
            (1, domain.mysizes[2] as i32)
        } else {
            (0, 0)
        };
        for k in klo..=khi {
            for j in 1..=my {
                for i in 1..=mx {
                    let hx = domain.dxf(i);
                    let width = if domain.ndims == 3 {
                        hx.min(domain.dy).min(domain.dz)
                    } else {
                        hx.min(domain.dy)
                    };
                    let xc = domain.xc(i);
                    let yc = (j as f64 - 0.5) * domain.dy;
                    let zc = if domain.ndims == 3 {
                        (k as f64 - 0.5) * domain.dz
                    } else {
                        0.
                    };
                    let mut vof = 0.;
                    if domain.ndims == 2 {
                        for (gy, wy) in quad.points.iter().zip(quad.weights.iter()) {
                            for (gx, wx) in quad.points.iter().zip(quad.weights.iter()) {
                                let d = dist(xc + gx * hx, yc + gy * domain.dy, 0.) / width;
                                vof += wx * wy / (1. + (-2. * VOFBETA * d).exp());
                            }
                        }
                    } else {
                        for (gz, wz) in quad.points.iter().zip(quad.weights.iter()) {
                            for (gy, wy) in quad.points.iter().zip(quad.weights.iter()) {
                                for (gx, wx) in quad.points.iter().zip(quad.weights.iter()) {
                                    let d = dist(
                                        xc + gx * hx,
                                        yc + gy * domain.dy,
                                        zc + gz * domain.dz,
                                    ) / width;
                                    vof += wx * wy * wz / (1. + (-2. * VOFBETA * d).exp());
                                }
                            }
                        }
                    }
                    self.vof.set(i, j, k, vof.max(0.).min(1.));
                }
            }
        }
        boundary_vof(domain, &mut self.vof);
    }

    /// Liquid volume held by this rank.
    pub fn vof_integral(&self, domain: &Domain) -> f64 {
        let mx = domain.mysizes[0] as i32;
        let my = domain.mysizes[1] as i32;
        let (klo, khi) = if domain.ndims == 3 {
            (1, domain.mysizes[2] as i32)
        } else {
            (0, 0)
        };
        let mut total = 0.;
        for k in klo..=khi {
            for j in 1..=my {
                for i in 1..=mx {
                    total += self.vof.get(i, j, k) * domain.cell_volume(i);
                }
            }
        }
        total
    }
}

/// The diffuse phase indicator at cell-local position `x`, for a cell with
/// reconstruction `(n, d) = normal`.
#[inline(always)]
pub fn indicator(ndims: usize, normal: &[f64], x: &[f64; 3]) -> f64 {
    let mut arg = normal[ndims];
    for dim in 0..ndims {
        arg += normal[dim] * x[dim];
    }
    1. / (1. + (-2. * VOFBETA * arg).exp())
}

/// Halo exchange (two wide) and the impermeable-wall ghosts of the VOF.
pub fn boundary_vof(domain: &Domain, vof: &mut Field) {
    halo::exchange_y(domain, vof, 2);
    if domain.ndims == 3 {
        halo::exchange_z(domain, vof, 2);
    }
    let mx = domain.mysizes[0] as i32;
    let (klo, khi) = if domain.ndims == 3 {
        (vof.lo[2], vof.hi[2])
    } else {
        (0, 0)
    };
    for k in klo..=khi {
        for j in vof.lo[1]..=vof.hi[1] {
            vof.set(0, j, k, 0.);
            vof.set(mx + 1, j, k, 0.);
        }
    }
}
