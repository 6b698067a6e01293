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

//! Scaffold of one direction-wise implicit sweep
//!
//! Bundles what a per-direction Helmholtz solve needs: the pencil buffers,
//! the transpose plans between them, three diagonal arrays sized to the
//! longest axis, and the batched tri-diagonal solver. Each implicitly
//! diffused field owns one scaffold, built on first use with global sizes
//! matching its staggered layout (the wall-normal velocity drops the two
//! wall faces, so its x size is one less than the cell count).

use crate::decomp::{Direction, Pencil, TransposePlan};
use crate::domain::Domain;
use crate::tdm::TdmSolver;

pub struct LinearSystem {
    /// Global unknown counts per axis of this field
    pub glsizes: [usize; 3],
    ndims: usize,
    /// Increment buffer in X1 orientation (x contiguous)
    pub x1: Vec<f64>,
    /// Same data re-oriented with y contiguous
    pub y1: Vec<f64>,
    /// Same data re-oriented with z contiguous (three dimensions)
    pub z1: Vec<f64>,
    /// Diagonals of the running sweep, sized to the longest axis
    pub tdm_l: Vec<f64>,
    pub tdm_c: Vec<f64>,
    pub tdm_u: Vec<f64>,
    plan_x1_y1: TransposePlan,
    plan_y1_x1: TransposePlan,
    plan_y1_z1: Option<TransposePlan>,
    plan_z1_y1: Option<TransposePlan>,
    tdm: TdmSolver,
}

impl LinearSystem {
    pub fn new(domain: &Domain, glsizes: [usize; 3]) -> LinearSystem {
        let ndims = domain.ndims;
        let comm = &domain.comm;
        let plan_x1_y1 = TransposePlan::new(Pencil::X1, Direction::Forward, glsizes, ndims, comm);
        let plan_y1_x1 = TransposePlan::new(Pencil::Y1, Direction::Backward, glsizes, ndims, comm);
        let x1 = vec![0.; plan_x1_y1.from_len()];
        let y1 = vec![0.; plan_x1_y1.to_len()];
        let (plan_y1_z1, plan_z1_y1, z1) = if ndims == 3 {
            let fwd = TransposePlan::new(Pencil::Y1, Direction::Forward, glsizes, ndims, comm);
            let bwd = TransposePlan::new(Pencil::Z1, Direction::Backward, glsizes, ndims, comm);
            let z1 = vec![0.; fwd.to_len()];
            (Some(fwd), Some(bwd), z1)
        } else {
            (None, None, Vec::new())
        };
        let nmax = glsizes[..ndims].iter().copied().max().unwrap();
        LinearSystem {
            glsizes,
            ndims,
            x1,
            y1,
            z1,
            tdm_l: vec![0.; nmax],
            tdm_c: vec![0.; nmax],
            tdm_u: vec![0.; nmax],
            plan_x1_y1,
            plan_y1_x1,
            plan_y1_z1,
            plan_z1_y1,
            tdm: TdmSolver::new(),
        }
    }

    /// Solve the cached tri-diagonal system along x for every pencil row of
    /// `x1` (non-periodic: x is wall-bounded).
    pub fn solve_x(&mut self) {
        let n = self.glsizes[0];
        let m = self.x1.len() / n;
        self.tdm.solve(
            n,
            m,
            false,
            &self.tdm_l,
            &self.tdm_c,
            &self.tdm_u,
            &mut self.x1,
        );
    }

    /// Solve along y for every row of `y1` (periodic).
    pub fn solve_y(&mut self) {
        let n = self.glsizes[1];
        let m = self.y1.len() / n;
        self.tdm.solve(
            n,
            m,
            true,
            &self.tdm_l,
            &self.tdm_c,
            &self.tdm_u,
            &mut self.y1,
        );
    }

    /// Solve along z for every row of `z1` (periodic, three dimensions).
    pub fn solve_z(&mut self) {
        let n = self.glsizes[2];
        let m = self.z1.len() / n;
        self.tdm.solve(
            n,
            m,
            true,
            &self.tdm_l,
            &self.tdm_c,
            &self.tdm_u,
            &mut self.z1,
        );
    }

    pub fn transpose_x1_to_y1(&mut self, domain: &Domain) {
        self.plan_x1_y1.execute(&domain.comm, &self.x1, &mut self.y1);
    }

    pub fn transpose_y1_to_x1(&mut self, domain: &Domain) {
        self.plan_y1_x1.execute(&domain.comm, &self.y1, &mut self.x1);
    }

    pub fn transpose_y1_to_z1(&mut self, domain: &Domain) {
        debug_assert_eq!(self.ndims, 3);
        self.plan_y1_z1
            .as_ref()
            .unwrap()
            .execute(&domain.comm, &self.y1, &mut self.z1);
    }

    pub fn transpose_z1_to_y1(&mut self, domain: &Domain) {
        debug_assert_eq!(self.ndims, 3);
        self.plan_z1_y1
            .as_ref()
            .unwrap()
            .execute(&domain.comm, &self.z1, &mut self.y1);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn implicit_sweep_in_y_round_trips_through_pencils() {
        // solving (I - 0 * L) q = q must leave the buffer unchanged after a
        // full transpose / solve / transpose cycle
        let domain = Domain::new(2, [6, 8, 1], [1., 1., 0.], 0.).unwrap();
        let mut system = LinearSystem::new(&domain, [6, 8, 1]);
        let data: Vec<f64> = (0..48).map(|n| n as f64).collect();
        system.x1.copy_from_slice(&data);
        for j in 0..8 {
            system.tdm_l[j] = 0.;
            system.tdm_u[j] = 0.;
            system.tdm_c[j] = 1.;
        }
        system.transpose_x1_to_y1(&domain);
        system.solve_y();
        system.transpose_y1_to_x1(&domain);
        assert_eq!(system.x1, data);
    }

    #[test]
    fn staggered_x_size_shrinks_buffers() {
        let domain = Domain::new(2, [8, 4, 1], [1., 1., 0.], 0.).unwrap();
        let system = LinearSystem::new(&domain, [7, 4, 1]);
        assert_eq!(system.x1.len(), 28);
        assert_eq!(system.y1.len(), 28);
    }
}
