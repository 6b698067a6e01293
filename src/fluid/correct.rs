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

//! Projection step: scalar potential, velocity correction, pressure update

use crate::config::Config;
use crate::domain::Domain;
use crate::fluid::{boundary, Fluid};
use crate::poisson::PoissonSolver;
use crate::runge_kutta::RKCOEFS;

fn krange(domain: &Domain) -> (i32, i32) {
    if domain.ndims == 3 {
        (1, domain.mysizes[2] as i32)
    } else {
        (0, 0)
    }
}

/// Solve for the scalar potential of this stage:
/// `laplace(psi) = div(u*) / (gamma dt)`.
pub fn compute_potential(
    domain: &Domain,
    rkstep: usize,
    dt: f64,
    fluid: &mut Fluid,
    solver: &mut PoissonSolver,
) {
    let gamma_dt = RKCOEFS[rkstep].gamma * dt;
    let mx = domain.mysizes[0] as i32;
    let my = domain.mysizes[1] as i32;
    let (klo, khi) = krange(domain);
    let mut rhs =
        Vec::with_capacity((mx * my * (khi - klo + 1)) as usize);
    for k in klo..=khi {
        for j in 1..=my {
            for i in 1..=mx {
                let mut div = (fluid.ux.get(i + 1, j, k) - fluid.ux.get(i, j, k))
                    / domain.dxf(i)
                    + (fluid.uy.get(i, j + 1, k) - fluid.uy.get(i, j, k)) / domain.dy;
                if let Some(uz) = fluid.uz.as_ref() {
                    div += (uz.get(i, j, k + 1) - uz.get(i, j, k)) / domain.dz;
                }
                rhs.push(div / gamma_dt);
            }
        }
    }
    solver.solve(domain, &rhs, &mut fluid.psi);
    boundary::p(domain, &mut fluid.psi);
}

/// Project the provisional velocity onto the divergence-free space by
/// subtracting `gamma dt grad(psi)` at every face.
pub fn correct_velocity(domain: &Domain, config: &Config, rkstep: usize, dt: f64, fluid: &mut Fluid) {
    let prefactor = RKCOEFS[rkstep].gamma * dt;
    let mx = domain.mysizes[0] as i32;
    let my = domain.mysizes[1] as i32;
    let (klo, khi) = krange(domain);
    for k in klo..=khi {
        for j in 1..=my {
            for i in 2..=mx {
                let grad = (fluid.psi.get(i, j, k) - fluid.psi.get(i - 1, j, k)) / domain.dxc(i);
                fluid.ux.add(i, j, k, -prefactor * grad);
            }
        }
    }
    boundary::ux(domain, &mut fluid.ux);
    for k in klo..=khi {
        for j in 1..=my {
            for i in 1..=mx {
                let grad = (fluid.psi.get(i, j, k) - fluid.psi.get(i, j - 1, k)) / domain.dy;
                fluid.uy.add(i, j, k, -prefactor * grad);
            }
        }
    }
    boundary::uy(domain, &mut fluid.uy, config.free_slip);
    if let Some(uz) = fluid.uz.as_mut() {
        let mz = domain.mysizes[2] as i32;
        for k in 1..=mz {
            for j in 1..=my {
                for i in 1..=mx {
                    let grad = (fluid.psi.get(i, j, k) - fluid.psi.get(i, j, k - 1)) / domain.dz;
                    uz.add(i, j, k, -prefactor * grad);
                }
            }
        }
        boundary::uz(domain, uz, config.free_slip);
    }
}

/// Fold the potential into the pressure. Axes integrated implicitly
/// contribute their viscous correction `- gamma dt m_dif / 2 lap(psi)`;
/// with fully explicit diffusion this is a plain `p += psi`.
pub fn update_pressure(domain: &Domain, config: &Config, rkstep: usize, dt: f64, fluid: &mut Fluid) {
    let prefactor = 0.5 * RKCOEFS[rkstep].gamma * dt * fluid.m_dif;
    let mx = domain.mysizes[0] as i32;
    let my = domain.mysizes[1] as i32;
    let (klo, khi) = krange(domain);
    for k in klo..=khi {
        for j in 1..=my {
            for i in 1..=mx {
                let mut dp = fluid.psi.get(i, j, k);
                if config.m_implicit[0] {
                    let l = 1. / domain.dxf(i) / domain.dxc(i);
                    let u = 1. / domain.dxf(i) / domain.dxc(i + 1);
                    dp -= prefactor
                        * (l * (fluid.psi.get(i - 1, j, k) - fluid.psi.get(i, j, k))
                            + u * (fluid.psi.get(i + 1, j, k) - fluid.psi.get(i, j, k)));
                }
                if config.m_implicit[1] {
                    dp -= prefactor
                        * (fluid.psi.get(i, j - 1, k) - 2. * fluid.psi.get(i, j, k)
                            + fluid.psi.get(i, j + 1, k))
                        / domain.dy
                        / domain.dy;
                }
                if domain.ndims == 3 && config.m_implicit[2] {
                    dp -= prefactor
                        * (fluid.psi.get(i, j, k - 1) - 2. * fluid.psi.get(i, j, k)
                            + fluid.psi.get(i, j, k + 1))
                        / domain.dz
                        / domain.dz;
                }
                fluid.p.add(i, j, k, dp);
            }
        }
    }
    boundary::p(domain, &mut fluid.p);
}
