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

//! Spatial domain: grid geometry and the process decomposition
//!
//! The x direction is wall-bounded and may be non-uniform (grid points
//! clustered towards the walls); y and, in three dimensions, z are periodic
//! and uniform. Fields are decomposed as `X1` pencils: x stays local, the
//! homogeneous directions are block-partitioned over the process grid.

use crate::config::Config;
use crate::decomp::{self, CartComm};
use crate::error::{Error, Result};

/// Grid geometry and decomposition of one simulation.
pub struct Domain {
    /// Spatial dimension, 2 or 3
    pub ndims: usize,
    /// Global number of cells per direction
    pub glsizes: [usize; 3],
    /// Local (my) number of cells per direction
    pub mysizes: [usize; 3],
    /// Global index offsets of my block
    pub offsets: [usize; 3],
    /// Domain extent per direction
    pub lengths: [f64; 3],
    /// Cell-face x coordinates, `xf(1) ..= xf(glsizes[0] + 1)`
    xf: Vec<f64>,
    /// Cell-centre x coordinates, `xc(1) ..= xc(glsizes[0])`
    xc: Vec<f64>,
    /// Face-to-face x spacings, `dxf(1) ..= dxf(glsizes[0])`
    dxf: Vec<f64>,
    /// Centre-to-centre x spacings, `dxc(1) ..= dxc(glsizes[0] + 1)`
    dxc: Vec<f64>,
    /// Representative x spacing (meaningful on a uniform grid)
    pub dx: f64,
    pub dy: f64,
    pub dz: f64,
    uniform_x: bool,
    /// The Cartesian communicator all collectives run on
    pub comm: CartComm,
}

impl Domain {
    /// Build a domain on the single-rank communicator.
    ///
    /// `stretch` controls tanh clustering of the x grid towards the walls;
    /// zero gives a uniform grid.
    pub fn new(
        ndims: usize,
        glsizes: [usize; 3],
        lengths: [f64; 3],
        stretch: f64,
    ) -> Result<Domain> {
        if ndims != 2 && ndims != 3 {
            return Err(Error::InvalidDomain(format!("ndims = {}", ndims)));
        }
        for dim in 0..ndims {
            if glsizes[dim] < 4 {
                return Err(Error::InvalidDomain(format!(
                    "axis {} needs at least 4 cells, got {}",
                    dim, glsizes[dim]
                )));
            }
            if !(lengths[dim] > 0.) {
                return Err(Error::InvalidDomain(format!(
                    "axis {} has non-positive extent {}",
                    dim, lengths[dim]
                )));
            }
        }
        let comm = CartComm::single();
        let (gx, lx) = (glsizes[0], lengths[0]);
        let mut xf = Vec::with_capacity(gx + 1);
        for i in 0..=gx {
            let r = i as f64 / gx as f64;
            let x = if stretch == 0. {
                lx * r
            } else {
                0.5 * lx * (1. + (stretch * (2. * r - 1.)).tanh() / stretch.tanh())
            };
            xf.push(x);
        }
        let xc: Vec<f64> = (0..gx).map(|i| 0.5 * (xf[i] + xf[i + 1])).collect();
        let dxf: Vec<f64> = (0..gx).map(|i| xf[i + 1] - xf[i]).collect();
        let mut dxc = Vec::with_capacity(gx + 1);
        dxc.push(xc[0] - xf[0]);
        for i in 1..gx {
            dxc.push(xc[i] - xc[i - 1]);
        }
        dxc.push(xf[gx] - xc[gx - 1]);
        let dx = lx / gx as f64;
        let uniform_x = dxf.iter().all(|&d| (d - dx).abs() < 1e-12 * dx);
        let mut mysizes = [1; 3];
        let mut offsets = [0; 3];
        mysizes[0] = gx;
        for dim in 1..ndims {
            let axis = dim - 1;
            mysizes[dim] = decomp::mysize(glsizes[dim], comm.dims[axis], comm.coords[axis]);
            offsets[dim] = decomp::offset(glsizes[dim], comm.dims[axis], comm.coords[axis]);
        }
        let dy = lengths[1] / glsizes[1] as f64;
        let dz = if ndims == 3 {
            lengths[2] / glsizes[2] as f64
        } else {
            0.
        };
        Ok(Domain {
            ndims,
            glsizes,
            mysizes,
            offsets,
            lengths,
            xf,
            xc,
            dxf,
            dxc,
            dx,
            dy,
            dz,
            uniform_x,
            comm,
        })
    }

    pub fn from_config(config: &Config) -> Result<Domain> {
        Domain::new(config.ndims, config.glsizes, config.lengths, config.stretch)
    }

    /// Cell-face x coordinate, `i` in `1 ..= glsizes[0] + 1`.
    #[inline(always)]
    pub fn xf(&self, i: i32) -> f64 {
        self.xf[(i - 1) as usize]
    }

    /// Cell-centre x coordinate, `i` in `1 ..= glsizes[0]`.
    #[inline(always)]
    pub fn xc(&self, i: i32) -> f64 {
        self.xc[(i - 1) as usize]
    }

    /// Face-to-face x spacing (width of cell `i`), `i` in `1 ..= glsizes[0]`.
    #[inline(always)]
    pub fn dxf(&self, i: i32) -> f64 {
        self.dxf[(i - 1) as usize]
    }

    /// Centre-to-centre x spacing at face `i`, `i` in `1 ..= glsizes[0] + 1`;
    /// the wall entries span half a cell.
    #[inline(always)]
    pub fn dxc(&self, i: i32) -> f64 {
        self.dxc[(i - 1) as usize]
    }

    /// Whether the x grid is uniform, which admits the DCT Poisson solver.
    pub fn x_grid_is_uniform(&self) -> bool {
        self.uniform_x
    }

    /// Cell volume (area in 2D) of cell `i`.
    pub fn cell_volume(&self, i: i32) -> f64 {
        if self.ndims == 2 {
            self.dxf(i) * self.dy
        } else {
            self.dxf(i) * self.dy * self.dz
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn uniform_grid_spacings() {
        let domain = Domain::new(2, [16, 8, 1], [2., 1., 0.], 0.).unwrap();
        assert!(domain.x_grid_is_uniform());
        assert!((domain.dxf(1) - 0.125).abs() < 1e-14);
        assert!((domain.dxc(1) - 0.0625).abs() < 1e-14);
        assert!((domain.dxc(17) - 0.0625).abs() < 1e-14);
        assert!((domain.xf(17) - 2.).abs() < 1e-14);
        assert!((domain.dy - 0.125).abs() < 1e-14);
    }

    #[test]
    fn stretched_grid_clusters_at_walls() {
        let domain = Domain::new(2, [32, 8, 1], [1., 1., 0.], 1.5).unwrap();
        assert!(!domain.x_grid_is_uniform());
        // spacings still tile the domain
        let total: f64 = (1..=32).map(|i| domain.dxf(i)).sum();
        assert!((total - 1.).abs() < 1e-12);
        assert!(domain.dxf(1) < domain.dxf(16));
        // dxc sums to the domain length as well
        let total: f64 = (1..=33).map(|i| domain.dxc(i)).sum();
        assert!((total - 1.).abs() < 1e-12);
    }

    #[test]
    fn rejects_degenerate_grids() {
        assert!(Domain::new(2, [2, 8, 1], [1., 1., 0.], 0.).is_err());
        assert!(Domain::new(4, [8, 8, 8], [1., 1., 1.], 0.).is_err());
    }
}
