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

//! Poisson solver for the scalar potential
//!
//! Solves `laplace(psi) = rhs` with Neumann walls in x and periodic
//! conditions in the homogeneous directions. Two pipelines share this
//! state:
//!
//! * the general (DFT) variant transforms the periodic directions to wave
//!   space, leaving one independent tri-diagonal system in x per wavenumber
//!   pair; it handles non-uniform x grids;
//! * the DCT variant additionally diagonalises a uniform x direction with a
//!   type-II cosine transform, so the remaining sweep is a periodic
//!   tri-diagonal solve in the last physical direction.
//!
//! The zero-wavenumber system is singular (Neumann fixes `psi` only up to a
//! constant); the tri-diagonal solver resolves this by zeroing the
//! degenerate row.
//!
//! The solver state (plans, eigenvalues, cached diagonals, pencil buffers)
//! is built once per simulation and reused across calls.

use std::sync::Arc;

use num_complex::Complex64;
use rustfft::{Fft, FftDirection, FftPlanner};

use crate::array::Field;
use crate::dct::Dct;
use crate::decomp::{self, Direction, Pencil, TransposePlan};
use crate::domain::Domain;
use crate::tdm::TdmSolver;

pub struct PoissonSolver {
    use_dct: bool,
    // pencil buffers; a stage never writes into its own input
    x1_r: Vec<f64>,
    y1_r: Vec<f64>,
    y1_c: Vec<Complex64>,
    /// X1 complex pencil (2D DFT) or Z1 complex pencil (3D)
    mid_c: Vec<Complex64>,
    /// X2 complex pencil (3D DFT only)
    x2_c: Vec<Complex64>,
    // transpose plans along the rotation chain
    plan_x1_y1_r: TransposePlan,
    plan_y1_x1_r: TransposePlan,
    plan_fwd_c: Option<TransposePlan>,
    plan_bwd_c: Option<TransposePlan>,
    plan_fwd_c2: Option<TransposePlan>,
    plan_bwd_c2: Option<TransposePlan>,
    // spectral machinery
    fft_y_fwd: Option<Arc<dyn Fft<f64>>>,
    fft_y_bwd: Option<Arc<dyn Fft<f64>>>,
    fft_z_fwd: Option<Arc<dyn Fft<f64>>>,
    fft_z_bwd: Option<Arc<dyn Fft<f64>>>,
    dct_x: Option<Dct>,
    work: Vec<Complex64>,
    scratch: Vec<Complex64>,
    // tri-diagonal sweep
    tdm: TdmSolver,
    tdm_l: Vec<f64>,
    tdm_c: Vec<f64>,
    tdm_u: Vec<f64>,
    // modified wavenumbers, local slices of the owning pencil
    eig_x: Vec<f64>,
    eig_y: Vec<f64>,
    eig_z: Vec<f64>,
    /// folded FFT normalisation
    norm: f64,
}

impl PoissonSolver {
    /// Build the solver state for `domain`; `use_dct` selects the uniform-x
    /// pipeline and requires a uniform x grid.
    pub fn new(domain: &Domain, use_dct: bool) -> PoissonSolver {
        assert!(!use_dct || domain.x_grid_is_uniform());
        let ndims = domain.ndims;
        let comm = &domain.comm;
        let (gx, gy, gz) = (domain.glsizes[0], domain.glsizes[1], domain.glsizes[2]);
        let nc = gy / 2 + 1;
        let mut planner = FftPlanner::new();

        let gsizes_r = [gx, gy, gz];
        let plan_x1_y1_r = TransposePlan::new(Pencil::X1, Direction::Forward, gsizes_r, ndims, comm);
        let plan_y1_x1_r =
            TransposePlan::new(Pencil::Y1, Direction::Backward, gsizes_r, ndims, comm);
        let x1_r = vec![0.; plan_x1_y1_r.from_len()];
        let y1_r = vec![0.; plan_x1_y1_r.to_len()];

        let mut solver = PoissonSolver {
            use_dct,
            x1_r,
            y1_r,
            y1_c: Vec::new(),
            mid_c: Vec::new(),
            x2_c: Vec::new(),
            plan_x1_y1_r,
            plan_y1_x1_r,
            plan_fwd_c: None,
            plan_bwd_c: None,
            plan_fwd_c2: None,
            plan_bwd_c2: None,
            fft_y_fwd: None,
            fft_y_bwd: None,
            fft_z_fwd: None,
            fft_z_bwd: None,
            dct_x: None,
            work: Vec::new(),
            scratch: Vec::new(),
            tdm: TdmSolver::new(),
            tdm_l: Vec::new(),
            tdm_c: Vec::new(),
            tdm_u: Vec::new(),
            eig_x: Vec::new(),
            eig_y: Vec::new(),
            eig_z: Vec::new(),
            norm: 1.,
        };

        if use_dct {
            solver.dct_x = Some(Dct::new(gx));
            // modified wavenumbers of the cosine transform, over the local
            // x block of the sweep pencil (Y1 in 2D, Z1 in 3D; x is split
            // over the first grid axis in both)
            let nx_loc = decomp::mysize(gx, comm.dims[0], comm.coords[0]);
            let x_off = decomp::offset(gx, comm.dims[0], comm.coords[0]);
            let dx = domain.dx;
            solver.eig_x = (0..nx_loc)
                .map(|i| {
                    let theta = std::f64::consts::PI * (x_off + i) as f64 / (2 * gx) as f64;
                    -4. / (dx * dx) * theta.sin().powi(2)
                })
                .collect();
            if ndims == 2 {
                // periodic sweep in y
                solver.tdm_l = vec![1. / (domain.dy * domain.dy); gy];
                solver.tdm_u = vec![1. / (domain.dy * domain.dy); gy];
                solver.tdm_c = vec![0.; gy];
                solver.norm = (2 * gx) as f64;
            } else {
                // DFT in y, periodic sweep in z
                let fft = planner.plan_fft(gy, FftDirection::Forward);
                let ifft = planner.plan_fft(gy, FftDirection::Inverse);
                solver.work = vec![Complex64::new(0., 0.); gy.max(gz)];
                solver.scratch = vec![
                    Complex64::new(0., 0.);
                    fft.get_inplace_scratch_len().max(ifft.get_inplace_scratch_len())
                ];
                solver.fft_y_fwd = Some(fft);
                solver.fft_y_bwd = Some(ifft);
                let gsizes_c = [gx, nc, gz];
                let fwd = TransposePlan::new(Pencil::Y1, Direction::Forward, gsizes_c, ndims, comm);
                let bwd = TransposePlan::new(Pencil::Z1, Direction::Backward, gsizes_c, ndims, comm);
                solver.y1_c = vec![Complex64::new(0., 0.); fwd.from_len()];
                solver.mid_c = vec![Complex64::new(0., 0.); fwd.to_len()];
                solver.plan_fwd_c = Some(fwd);
                solver.plan_bwd_c = Some(bwd);
                let dy = domain.dy;
                let y_off = decomp::offset(nc, comm.dims[1], comm.coords[1]);
                let ny_loc = decomp::mysize(nc, comm.dims[1], comm.coords[1]);
                solver.eig_y = (0..ny_loc)
                    .map(|j| {
                        let theta = std::f64::consts::PI * (y_off + j) as f64 / gy as f64;
                        -4. / (dy * dy) * theta.sin().powi(2)
                    })
                    .collect();
                solver.tdm_l = vec![1. / (domain.dz * domain.dz); gz];
                solver.tdm_u = vec![1. / (domain.dz * domain.dz); gz];
                solver.tdm_c = vec![0.; gz];
                solver.norm = (2 * gx * gy) as f64;
            }
        } else {
            // general variant: DFT in y (and z), tri-diagonal sweep in x
            let fft = planner.plan_fft(gy, FftDirection::Forward);
            let ifft = planner.plan_fft(gy, FftDirection::Inverse);
            let mut scratch_len = fft.get_inplace_scratch_len().max(ifft.get_inplace_scratch_len());
            solver.fft_y_fwd = Some(fft);
            solver.fft_y_bwd = Some(ifft);
            let gsizes_c = [gx, nc, gz];
            if ndims == 2 {
                let fwd = TransposePlan::new(Pencil::X1, Direction::Forward, gsizes_c, ndims, comm);
                let bwd = TransposePlan::new(Pencil::Y1, Direction::Backward, gsizes_c, ndims, comm);
                solver.y1_c = vec![Complex64::new(0., 0.); bwd.from_len()];
                solver.mid_c = vec![Complex64::new(0., 0.); bwd.to_len()];
                solver.plan_fwd_c = Some(fwd);
                solver.plan_bwd_c = Some(bwd);
                let y_off = decomp::offset(nc, comm.dims[0], comm.coords[0]);
                let ny_loc = decomp::mysize(nc, comm.dims[0], comm.coords[0]);
                let dy = domain.dy;
                solver.eig_y = (0..ny_loc)
                    .map(|j| {
                        let theta = std::f64::consts::PI * (y_off + j) as f64 / gy as f64;
                        -4. / (dy * dy) * theta.sin().powi(2)
                    })
                    .collect();
                solver.norm = gy as f64;
            } else {
                let fft_z = planner.plan_fft(gz, FftDirection::Forward);
                let ifft_z = planner.plan_fft(gz, FftDirection::Inverse);
                scratch_len = scratch_len
                    .max(fft_z.get_inplace_scratch_len())
                    .max(ifft_z.get_inplace_scratch_len());
                solver.fft_z_fwd = Some(fft_z);
                solver.fft_z_bwd = Some(ifft_z);
                // y1 -> z1 -> x2 and back
                let fwd = TransposePlan::new(Pencil::Y1, Direction::Forward, gsizes_c, ndims, comm);
                let bwd = TransposePlan::new(Pencil::Z1, Direction::Backward, gsizes_c, ndims, comm);
                let fwd2 = TransposePlan::new(Pencil::Z1, Direction::Forward, gsizes_c, ndims, comm);
                let bwd2 = TransposePlan::new(Pencil::X2, Direction::Backward, gsizes_c, ndims, comm);
                solver.y1_c = vec![Complex64::new(0., 0.); fwd.from_len()];
                solver.mid_c = vec![Complex64::new(0., 0.); fwd.to_len()];
                solver.x2_c = vec![Complex64::new(0., 0.); fwd2.to_len()];
                solver.plan_fwd_c = Some(fwd);
                solver.plan_bwd_c = Some(bwd);
                solver.plan_fwd_c2 = Some(fwd2);
                solver.plan_bwd_c2 = Some(bwd2);
                // in the x2 pencil y is split over the second grid axis and
                // z over the first
                let y_off = decomp::offset(nc, comm.dims[1], comm.coords[1]);
                let ny_loc = decomp::mysize(nc, comm.dims[1], comm.coords[1]);
                let z_off = decomp::offset(gz, comm.dims[0], comm.coords[0]);
                let nz_loc = decomp::mysize(gz, comm.dims[0], comm.coords[0]);
                let (dy, dz) = (domain.dy, domain.dz);
                solver.eig_y = (0..ny_loc)
                    .map(|j| {
                        let theta = std::f64::consts::PI * (y_off + j) as f64 / gy as f64;
                        -4. / (dy * dy) * theta.sin().powi(2)
                    })
                    .collect();
                solver.eig_z = (0..nz_loc)
                    .map(|k| {
                        let theta = std::f64::consts::PI * (z_off + k) as f64 / gz as f64;
                        -4. / (dz * dz) * theta.sin().powi(2)
                    })
                    .collect();
                solver.norm = (gy * gz) as f64;
            }
            solver.work = vec![Complex64::new(0., 0.); gy.max(gz)];
            solver.scratch = vec![Complex64::new(0., 0.); scratch_len];
            // stretched-x diagonals, independent of wavenumber and time
            solver.tdm_l = (1..=gx as i32)
                .map(|i| 1. / domain.dxc(i) / domain.dxf(i))
                .collect();
            solver.tdm_u = (1..=gx as i32)
                .map(|i| 1. / domain.dxc(i + 1) / domain.dxf(i))
                .collect();
            solver.tdm_c = vec![0.; gx];
        }
        solver
    }

    /// Whether this state runs the DCT pipeline.
    pub fn uses_dct(&self) -> bool {
        self.use_dct
    }

    /// Solve `laplace(psi) = rhs` and store the result (interior plus
    /// nothing else; the caller imposes boundary conditions on `psi`).
    ///
    /// `rhs` covers the local interior in X1 layout, x fastest.
    pub fn solve(&mut self, domain: &Domain, rhs: &[f64], psi: &mut Field) {
        assert_eq!(rhs.len(), self.x1_r.len());
        // fold the FFT normalisation into the input
        let norm = self.norm;
        for (dst, src) in self.x1_r.iter_mut().zip(rhs.iter()) {
            *dst = src / norm;
        }
        if self.use_dct {
            self.solve_dct(domain);
        } else {
            self.solve_dft(domain);
        }
        // scatter the X1 pencil back into the halo-padded field
        let mx = domain.mysizes[0] as i32;
        let my = domain.mysizes[1] as i32;
        let (klo, khi) = if domain.ndims == 3 {
            (1, domain.mysizes[2] as i32)
        } else {
            (0, 0)
        };
        let mut cursor = 0;
        for k in klo..=khi {
            for j in 1..=my {
                for i in 1..=mx {
                    psi.set(i, j, k, self.x1_r[cursor]);
                    cursor += 1;
                }
            }
        }
    }

    fn solve_dft(&mut self, domain: &Domain) {
        let comm = &domain.comm;
        let gx = domain.glsizes[0];
        let gy = domain.glsizes[1];
        let nc = gy / 2 + 1;
        // to wave space in y
        self.plan_x1_y1_r.execute(comm, &self.x1_r, &mut self.y1_r);
        dft_r2c(
            self.fft_y_fwd.as_ref().unwrap(),
            &self.y1_r,
            gy,
            nc,
            &mut self.y1_c,
            &mut self.work,
            &mut self.scratch,
        );
        if domain.ndims == 2 {
            // one tri-diagonal system in x per wavenumber
            self.plan_bwd_c
                .as_ref()
                .unwrap()
                .execute(comm, &self.y1_c, &mut self.mid_c);
            let nrows = self.mid_c.len() / gx;
            for row in 0..nrows {
                let eval = self.eig_y[row];
                for i in 0..gx {
                    self.tdm_c[i] = -self.tdm_l[i] - self.tdm_u[i] + eval;
                }
                // one-sided ghosts close the Neumann walls
                self.tdm_c[0] += self.tdm_l[0];
                self.tdm_c[gx - 1] += self.tdm_u[gx - 1];
                self.tdm.solve(
                    gx,
                    1,
                    false,
                    &self.tdm_l,
                    &self.tdm_c,
                    &self.tdm_u,
                    &mut self.mid_c[row * gx..(row + 1) * gx],
                );
            }
            self.plan_fwd_c
                .as_ref()
                .unwrap()
                .execute(comm, &self.mid_c, &mut self.y1_c);
        } else {
            let gz = domain.glsizes[2];
            // rotate to z pencils and transform z
            self.plan_fwd_c
                .as_ref()
                .unwrap()
                .execute(comm, &self.y1_c, &mut self.mid_c);
            dft_c2c(
                self.fft_z_fwd.as_ref().unwrap(),
                &mut self.mid_c,
                gz,
                &mut self.scratch,
            );
            // rotate to x pencils: every (ky, kz) owns a system in x
            self.plan_fwd_c2
                .as_ref()
                .unwrap()
                .execute(comm, &self.mid_c, &mut self.x2_c);
            let ny_loc = self.eig_y.len();
            let nrows = self.x2_c.len() / gx;
            for row in 0..nrows {
                let eval = self.eig_y[row % ny_loc] + self.eig_z[row / ny_loc];
                for i in 0..gx {
                    self.tdm_c[i] = -self.tdm_l[i] - self.tdm_u[i] + eval;
                }
                self.tdm_c[0] += self.tdm_l[0];
                self.tdm_c[gx - 1] += self.tdm_u[gx - 1];
                self.tdm.solve(
                    gx,
                    1,
                    false,
                    &self.tdm_l,
                    &self.tdm_c,
                    &self.tdm_u,
                    &mut self.x2_c[row * gx..(row + 1) * gx],
                );
            }
            // reverse the pipeline
            self.plan_bwd_c2
                .as_ref()
                .unwrap()
                .execute(comm, &self.x2_c, &mut self.mid_c);
            dft_c2c_inv(
                self.fft_z_bwd.as_ref().unwrap(),
                &mut self.mid_c,
                gz,
                &mut self.scratch,
            );
            self.plan_bwd_c
                .as_ref()
                .unwrap()
                .execute(comm, &self.mid_c, &mut self.y1_c);
        }
        dft_c2r(
            self.fft_y_bwd.as_ref().unwrap(),
            &self.y1_c,
            gy,
            nc,
            &mut self.y1_r,
            &mut self.work,
            &mut self.scratch,
        );
        self.plan_y1_x1_r.execute(comm, &self.y1_r, &mut self.x1_r);
    }

    fn solve_dct(&mut self, domain: &Domain) {
        let comm = &domain.comm;
        let gx = domain.glsizes[0];
        let gy = domain.glsizes[1];
        let dct = self.dct_x.as_mut().unwrap();
        // to wave space in x; rows are contiguous in the x1 pencil
        for row in self.x1_r.chunks_exact_mut(gx) {
            dct.forward(row);
        }
        self.plan_x1_y1_r.execute(comm, &self.x1_r, &mut self.y1_r);
        if domain.ndims == 2 {
            // periodic sweep in y per cosine mode
            let nrows = self.y1_r.len() / gy;
            for row in 0..nrows {
                let eval = self.eig_x[row];
                for j in 0..gy {
                    self.tdm_c[j] = -self.tdm_l[j] - self.tdm_u[j] + eval;
                }
                self.tdm.solve(
                    gy,
                    1,
                    true,
                    &self.tdm_l,
                    &self.tdm_c,
                    &self.tdm_u,
                    &mut self.y1_r[row * gy..(row + 1) * gy],
                );
            }
        } else {
            let gz = domain.glsizes[2];
            let nc = gy / 2 + 1;
            // DFT in y, then a periodic sweep in z per (cosine, Fourier) pair
            dft_r2c(
                self.fft_y_fwd.as_ref().unwrap(),
                &self.y1_r,
                gy,
                nc,
                &mut self.y1_c,
                &mut self.work,
                &mut self.scratch,
            );
            self.plan_fwd_c
                .as_ref()
                .unwrap()
                .execute(comm, &self.y1_c, &mut self.mid_c);
            let nx_loc = self.eig_x.len();
            let nrows = self.mid_c.len() / gz;
            for row in 0..nrows {
                let eval = self.eig_x[row % nx_loc] + self.eig_y[row / nx_loc];
                for k in 0..gz {
                    self.tdm_c[k] = -self.tdm_l[k] - self.tdm_u[k] + eval;
                }
                self.tdm.solve(
                    gz,
                    1,
                    true,
                    &self.tdm_l,
                    &self.tdm_c,
                    &self.tdm_u,
                    &mut self.mid_c[row * gz..(row + 1) * gz],
                );
            }
            self.plan_bwd_c
                .as_ref()
                .unwrap()
                .execute(comm, &self.mid_c, &mut self.y1_c);
            dft_c2r(
                self.fft_y_bwd.as_ref().unwrap(),
                &self.y1_c,
                gy,
                nc,
                &mut self.y1_r,
                &mut self.work,
                &mut self.scratch,
            );
        }
        self.plan_y1_x1_r.execute(comm, &self.y1_r, &mut self.x1_r);
        let dct = self.dct_x.as_mut().unwrap();
        for row in self.x1_r.chunks_exact_mut(gx) {
            dct.backward(row);
        }
    }
}

/// Real-to-complex transform of every contiguous row, keeping the Hermitian
/// half spectrum.
fn dft_r2c(
    fft: &Arc<dyn Fft<f64>>,
    input: &[f64],
    n: usize,
    nc: usize,
    output: &mut [Complex64],
    work: &mut [Complex64],
    scratch: &mut [Complex64],
) {
    let nrows = input.len() / n;
    assert_eq!(output.len(), nrows * nc);
    for row in 0..nrows {
        for i in 0..n {
            work[i] = Complex64::new(input[row * n + i], 0.);
        }
        fft.process_with_scratch(&mut work[..n], scratch);
        output[row * nc..(row + 1) * nc].copy_from_slice(&work[..nc]);
    }
}

/// Inverse of [`dft_r2c`], unnormalised (a round trip scales by `n`).
fn dft_c2r(
    fft_inv: &Arc<dyn Fft<f64>>,
    input: &[Complex64],
    n: usize,
    nc: usize,
    output: &mut [f64],
    work: &mut [Complex64],
    scratch: &mut [Complex64],
) {
    let nrows = output.len() / n;
    assert_eq!(input.len(), nrows * nc);
    for row in 0..nrows {
        for k in 0..nc {
            work[k] = input[row * nc + k];
        }
        for k in nc..n {
            work[k] = input[row * nc + (n - k)].conj();
        }
        fft_inv.process_with_scratch(&mut work[..n], scratch);
        for i in 0..n {
            output[row * n + i] = work[i].re;
        }
    }
}

fn dft_c2c(fft: &Arc<dyn Fft<f64>>, data: &mut [Complex64], n: usize, scratch: &mut [Complex64]) {
    for row in data.chunks_exact_mut(n) {
        fft.process_with_scratch(row, scratch);
    }
}

fn dft_c2c_inv(
    fft_inv: &Arc<dyn Fft<f64>>,
    data: &mut [Complex64],
    n: usize,
    scratch: &mut [Complex64],
) {
    for row in data.chunks_exact_mut(n) {
        fft_inv.process_with_scratch(row, scratch);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f64::consts::PI;

    /// Manufacture the discrete Laplacian of `psi` (Neumann x ghosts,
    /// periodic y/z wrap) so the solver must reproduce `psi` exactly.
    fn discrete_laplacian_2d(domain: &Domain, psi: &dyn Fn(i32, i32) -> f64) -> Vec<f64> {
        let mx = domain.mysizes[0] as i32;
        let my = domain.mysizes[1] as i32;
        let dy = domain.dy;
        let mut rhs = vec![0.; (mx * my) as usize];
        let at = |i: i32, j: i32| {
            let i = i.max(1).min(mx); // Neumann mirror
            let j = (j - 1).rem_euclid(my) + 1; // periodic wrap
            psi(i, j)
        };
        for j in 1..=my {
            for i in 1..=mx {
                let l = 1. / domain.dxc(i) / domain.dxf(i);
                let u = 1. / domain.dxc(i + 1) / domain.dxf(i);
                let lap_x = l * (at(i - 1, j) - at(i, j)) + u * (at(i + 1, j) - at(i, j));
                let lap_y = (at(i, j - 1) - 2. * at(i, j) + at(i, j + 1)) / dy / dy;
                rhs[((j - 1) * mx + i - 1) as usize] = lap_x + lap_y;
            }
        }
        rhs
    }

    fn check_2d(domain: &Domain, use_dct: bool) {
        let mx = domain.mysizes[0] as i32;
        let my = domain.mysizes[1] as i32;
        let expected = |i: i32, j: i32| {
            let x = domain.xc(i) / domain.lengths[0];
            let y = (j as f64 - 0.5) * domain.dy / domain.lengths[1];
            (2. * PI * x).cos() * (2. * PI * y).cos()
        };
        let rhs = discrete_laplacian_2d(domain, &expected);
        let mut solver = PoissonSolver::new(domain, use_dct);
        let mut psi = Field::new([0, 0, 0], [mx + 1, my + 1, 0]);
        solver.solve(domain, &rhs, &mut psi);
        // psi is determined up to a constant; compare after centring
        let mut mean = 0.;
        let mut mean_exp = 0.;
        for j in 1..=my {
            for i in 1..=mx {
                mean += psi.get(i, j, 0);
                mean_exp += expected(i, j);
            }
        }
        mean /= (mx * my) as f64;
        mean_exp /= (mx * my) as f64;
        let mut maxdif: f64 = 0.;
        for j in 1..=my {
            for i in 1..=mx {
                maxdif =
                    maxdif.max((psi.get(i, j, 0) - mean - (expected(i, j) - mean_exp)).abs());
            }
        }
        assert!(maxdif < 1e-10, "max error {}", maxdif);
    }

    #[test]
    fn dct_variant_uniform_grid_2d() {
        let domain = Domain::new(2, [64, 64, 1], [1., 1., 0.], 0.).unwrap();
        check_2d(&domain, true);
    }

    #[test]
    fn dft_variant_uniform_grid_2d() {
        let domain = Domain::new(2, [64, 64, 1], [1., 1., 0.], 0.).unwrap();
        check_2d(&domain, false);
    }

    #[test]
    fn dft_variant_stretched_grid_2d() {
        let domain = Domain::new(2, [48, 32, 1], [1., 1., 0.], 1.2).unwrap();
        assert!(!domain.x_grid_is_uniform());
        check_2d(&domain, false);
    }

    fn discrete_laplacian_3d(
        domain: &Domain,
        psi: &dyn Fn(i32, i32, i32) -> f64,
    ) -> Vec<f64> {
        let mx = domain.mysizes[0] as i32;
        let my = domain.mysizes[1] as i32;
        let mz = domain.mysizes[2] as i32;
        let mut rhs = vec![0.; (mx * my * mz) as usize];
        let at = |i: i32, j: i32, k: i32| {
            let i = i.max(1).min(mx);
            let j = (j - 1).rem_euclid(my) + 1;
            let k = (k - 1).rem_euclid(mz) + 1;
            psi(i, j, k)
        };
        for k in 1..=mz {
            for j in 1..=my {
                for i in 1..=mx {
                    let l = 1. / domain.dxc(i) / domain.dxf(i);
                    let u = 1. / domain.dxc(i + 1) / domain.dxf(i);
                    let lap_x =
                        l * (at(i - 1, j, k) - at(i, j, k)) + u * (at(i + 1, j, k) - at(i, j, k));
                    let lap_y = (at(i, j - 1, k) - 2. * at(i, j, k) + at(i, j + 1, k))
                        / domain.dy
                        / domain.dy;
                    let lap_z = (at(i, j, k - 1) - 2. * at(i, j, k) + at(i, j, k + 1))
                        / domain.dz
                        / domain.dz;
                    rhs[(((k - 1) * my + j - 1) * mx + i - 1) as usize] = lap_x + lap_y + lap_z;
                }
            }
        }
        rhs
    }

    fn check_3d(domain: &Domain, use_dct: bool) {
        let mx = domain.mysizes[0] as i32;
        let my = domain.mysizes[1] as i32;
        let mz = domain.mysizes[2] as i32;
        let expected = |i: i32, j: i32, k: i32| {
            let x = domain.xc(i) / domain.lengths[0];
            let y = (j as f64 - 0.5) * domain.dy / domain.lengths[1];
            let z = (k as f64 - 0.5) * domain.dz / domain.lengths[2];
            (2. * PI * x).cos() * (2. * PI * y).cos() * (4. * PI * z).sin()
        };
        let rhs = discrete_laplacian_3d(domain, &expected);
        let mut solver = PoissonSolver::new(domain, use_dct);
        let mut psi = Field::new([0, 0, 0], [mx + 1, my + 1, mz + 1]);
        solver.solve(domain, &rhs, &mut psi);
        let mut mean = 0.;
        let mut mean_exp = 0.;
        for k in 1..=mz {
            for j in 1..=my {
                for i in 1..=mx {
                    mean += psi.get(i, j, k);
                    mean_exp += expected(i, j, k);
                }
            }
        }
        mean /= (mx * my * mz) as f64;
        mean_exp /= (mx * my * mz) as f64;
        let mut maxdif: f64 = 0.;
        for k in 1..=mz {
            for j in 1..=my {
                for i in 1..=mx {
                    maxdif = maxdif
                        .max((psi.get(i, j, k) - mean - (expected(i, j, k) - mean_exp)).abs());
                }
            }
        }
        assert!(maxdif < 1e-10, "max error {}", maxdif);
    }

    #[test]
    fn dft_variant_3d() {
        let domain = Domain::new(3, [16, 16, 8], [1., 1., 1.], 0.8).unwrap();
        check_3d(&domain, false);
    }

    #[test]
    fn dct_variant_3d() {
        let domain = Domain::new(3, [16, 16, 8], [1., 1., 1.], 0.).unwrap();
        check_3d(&domain, true);
    }
}
