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

//! Flow field: velocities, pressure, scalar potential and temperature

pub mod boundary;
pub mod correct;
pub mod dt;
pub mod predict;

use crate::array::{Field, SourceTriple};
use crate::config::Config;
use crate::domain::Domain;

/// All flow fields of one simulation plus their Runge-Kutta sources.
///
/// Velocities live on their faces, pressure, potential and temperature at
/// cell centres; every array carries the halo ring its stencils need. The
/// wall-normal velocity keeps its two wall faces inside the array so the
/// no-penetration condition is stored, not implied.
pub struct Fluid {
    /// Wall-normal velocity (x faces)
    pub ux: Field,
    /// Velocity on y faces
    pub uy: Field,
    /// Velocity on z faces (three dimensions)
    pub uz: Option<Field>,
    /// Pressure
    pub p: Field,
    /// Scalar potential of the projection step
    pub psi: Field,
    /// Temperature
    pub temp: Field,
    pub src_ux: SourceTriple,
    pub src_uy: SourceTriple,
    pub src_uz: Option<SourceTriple>,
    pub src_temp: SourceTriple,
    /// Momentum diffusivity `sqrt(Pr / Ra)`
    pub m_dif: f64,
    /// Temperature diffusivity `1 / sqrt(Pr * Ra)`
    pub t_dif: f64,
}

impl Fluid {
    /// Allocate all fields and impose the initial condition: fluid at rest,
    /// the conductive temperature profile with a small deterministic
    /// perturbation to trigger convection.
    pub fn new(domain: &Domain, config: &Config) -> Fluid {
        let mx = domain.mysizes[0] as i32;
        let my = domain.mysizes[1] as i32;
        let (zlo, zhi) = if domain.ndims == 3 {
            (0, domain.mysizes[2] as i32 + 1)
        } else {
            (0, 0)
        };
        let cells = domain.mysizes[..domain.ndims].iter().product::<usize>();
        let faces_x = (domain.mysizes[0] - 1) * cells / domain.mysizes[0];
        let (uz, src_uz) = if domain.ndims == 3 {
            (
                Some(Field::new([0, 0, zlo], [mx + 1, my + 1, zhi])),
                Some(SourceTriple::new(cells)),
            )
        } else {
            (None, None)
        };
        let mut fluid = Fluid {
            ux: Field::new([1, 0, zlo], [mx + 1, my + 1, zhi]),
            uy: Field::new([0, 0, zlo], [mx + 1, my + 1, zhi]),
            uz,
            p: Field::new([0, 0, zlo], [mx + 1, my + 1, zhi]),
            psi: Field::new([0, 0, zlo], [mx + 1, my + 1, zhi]),
            temp: Field::new([0, 0, zlo], [mx + 1, my + 1, zhi]),
            src_ux: SourceTriple::new(faces_x),
            src_uy: SourceTriple::new(cells),
            src_uz,
            src_temp: SourceTriple::new(cells),
            m_dif: config.m_dif(),
            t_dif: config.t_dif(),
        };
        let (klo, khi) = if domain.ndims == 3 {
            (1, domain.mysizes[2] as i32)
        } else {
            (0, 0)
        };
        let lx = domain.lengths[0];
        for k in klo..=khi {
            for j in 1..=my {
                for i in 1..=mx {
                    let x = domain.xc(i) / lx;
                    let y = (j as f64 - 0.5) * domain.dy / domain.lengths[1];
                    let conductive = config.temp_xm + (config.temp_xp - config.temp_xm) * x;
                    let perturb = 1e-2
                        * (std::f64::consts::PI * x).sin()
                        * (2. * std::f64::consts::PI * y).sin();
                    fluid.temp.set(i, j, k, conductive + perturb);
                }
            }
        }
        fluid.impose_all_boundaries(domain, config);
        fluid
    }

    /// Halo exchange plus wall conditions on every flow field.
    pub fn impose_all_boundaries(&mut self, domain: &Domain, config: &Config) {
        boundary::ux(domain, &mut self.ux);
        boundary::uy(domain, &mut self.uy, config.free_slip);
        if let Some(uz) = self.uz.as_mut() {
            boundary::uz(domain, uz, config.free_slip);
        }
        boundary::p(domain, &mut self.p);
        boundary::p(domain, &mut self.psi);
        crate::temperature::boundary(domain, config, &mut self.temp);
    }

    /// Maximum local divergence of the velocity field, the watchdog number
    /// of the periodic log line.
    pub fn max_divergence(&self, domain: &Domain) -> f64 {
        let mx = domain.mysizes[0] as i32;
        let my = domain.mysizes[1] as i32;
        let mz = if domain.ndims == 3 {
            domain.mysizes[2] as i32
        } else {
            1
        };
        let mut max_div: f64 = 0.;
        for k in 1..=mz {
            let k = if domain.ndims == 3 { k } else { 0 };
            for j in 1..=my {
                for i in 1..=mx {
                    let mut div = (self.ux.get(i + 1, j, k) - self.ux.get(i, j, k))
                        / domain.dxf(i)
                        + (self.uy.get(i, j + 1, k) - self.uy.get(i, j, k)) / domain.dy;
                    if let Some(uz) = self.uz.as_ref() {
                        div += (uz.get(i, j, k + 1) - uz.get(i, j, k)) / domain.dz;
                    }
                    max_div = max_div.max(div.abs());
                }
            }
        }
        domain.comm.allreduce_min(-max_div).abs()
    }
}
