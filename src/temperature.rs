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

//! Temperature integrator
//!
//! Advection-diffusion of the temperature with fixed wall values in x and
//! periodic halos elsewhere. Structured like the velocity predictor, minus
//! pressure and surface tension; the Dirichlet walls enter the implicit
//! x sweep through the increment being zero on the ghosts, so the matrix
//! rows keep their plain Laplacian coefficients.

use itertools::izip;

use crate::array::Field;
use crate::config::Config;
use crate::domain::Domain;
use crate::fluid::Fluid;
use crate::halo;
use crate::linsys::LinearSystem;
use crate::runge_kutta::RKCOEFS;

fn krange(domain: &Domain) -> (i32, i32) {
    if domain.ndims == 3 {
        (1, domain.mysizes[2] as i32)
    } else {
        (0, 0)
    }
}

/// Halo exchange and Dirichlet walls (hot at x = 0, cold at x = lx).
pub fn boundary(domain: &Domain, config: &Config, temp: &mut Field) {
    halo::exchange_y(domain, temp, 1);
    if domain.ndims == 3 {
        halo::exchange_z(domain, temp, 1);
    }
    let mx = domain.mysizes[0] as i32;
    let (klo, khi) = if domain.ndims == 3 {
        (temp.lo[2], temp.hi[2])
    } else {
        (0, 0)
    };
    for k in klo..=khi {
        for j in temp.lo[1]..=temp.hi[1] {
            temp.set(0, j, k, config.temp_xm);
            temp.set(mx + 1, j, k, config.temp_xp);
        }
    }
}

/// Accumulate the Runge-Kutta source of the temperature.
pub fn compute_rhs(domain: &Domain, config: &Config, rkstep: usize, fluid: &mut Fluid) {
    let Fluid {
        ux,
        uy,
        uz,
        temp,
        src_temp,
        t_dif,
        ..
    } = fluid;
    let t_dif = *t_dif;
    src_temp.shift(rkstep);
    let mx = domain.mysizes[0] as i32;
    let my = domain.mysizes[1] as i32;
    let (klo, khi) = krange(domain);
    let dy = domain.dy;
    let dz = domain.dz;
    let mut cnt = 0;
    for k in klo..=khi {
        for j in 1..=my {
            for i in 1..=mx {
                let advx = {
                    let l = 0.5 / domain.dxf(i) * ux.get(i, j, k);
                    let u = -0.5 / domain.dxf(i) * ux.get(i + 1, j, k);
                    let c = -l - u;
                    l * temp.get(i - 1, j, k) + c * temp.get(i, j, k) + u * temp.get(i + 1, j, k)
                };
                let advy = {
                    let l = 0.5 / dy * uy.get(i, j, k);
                    let u = -0.5 / dy * uy.get(i, j + 1, k);
                    let c = -l - u;
                    l * temp.get(i, j - 1, k) + c * temp.get(i, j, k) + u * temp.get(i, j + 1, k)
                };
                let advz = match uz.as_ref() {
                    Some(uz) => {
                        let l = 0.5 / dz * uz.get(i, j, k);
                        let u = -0.5 / dz * uz.get(i, j, k + 1);
                        let c = -l - u;
                        l * temp.get(i, j, k - 1) + c * temp.get(i, j, k)
                            + u * temp.get(i, j, k + 1)
                    }
                    None => 0.,
                };
                let difx = {
                    let l = 1. / domain.dxf(i) / domain.dxc(i);
                    let u = 1. / domain.dxf(i) / domain.dxc(i + 1);
                    let c = -l - u;
                    t_dif
                        * (l * temp.get(i - 1, j, k)
                            + c * temp.get(i, j, k)
                            + u * temp.get(i + 1, j, k))
                };
                let dify = t_dif
                    * (temp.get(i, j - 1, k) - 2. * temp.get(i, j, k) + temp.get(i, j + 1, k))
                    / dy
                    / dy;
                let difz = match uz.as_ref() {
                    Some(_) => {
                        t_dif
                            * (temp.get(i, j, k - 1) - 2. * temp.get(i, j, k)
                                + temp.get(i, j, k + 1))
                            / dz
                            / dz
                    }
                    None => 0.,
                };
                src_temp.a[cnt] += advx + advy + advz;
                src_temp.a[cnt] += if config.t_implicit[0] { 0. } else { difx };
                src_temp.a[cnt] += if config.t_implicit[1] { 0. } else { dify };
                src_temp.a[cnt] += if config.t_implicit[2] { 0. } else { difz };
                src_temp.g[cnt] += if config.t_implicit[0] { difx } else { 0. };
                src_temp.g[cnt] += if config.t_implicit[1] { dify } else { 0. };
                src_temp.g[cnt] += if config.t_implicit[2] { difz } else { 0. };
                cnt += 1;
            }
        }
    }
}

/// Advance the temperature by one Runge-Kutta stage, running the implicit
/// sweeps flagged per axis.
pub fn update(
    domain: &Domain,
    config: &Config,
    rkstep: usize,
    dt: f64,
    fluid: &mut Fluid,
    system: &mut Option<LinearSystem>,
) {
    let system = system.get_or_insert_with(|| {
        let glsizes = [
            domain.glsizes[0],
            domain.glsizes[1],
            if domain.ndims == 3 { domain.glsizes[2] } else { 1 },
        ];
        LinearSystem::new(domain, glsizes)
    });
    let coef = RKCOEFS[rkstep];
    let src = &fluid.src_temp;
    for (dtemp, a, b, g) in izip!(
        system.x1.iter_mut(),
        src.a.iter(),
        src.b.iter(),
        src.g.iter()
    ) {
        *dtemp = coef.alpha * dt * a + coef.beta * dt * b + coef.gamma * dt * g;
    }
    let prefactor = 0.5 * coef.gamma * dt * fluid.t_dif;
    if config.t_implicit[0] {
        for idx in 0..system.glsizes[0] {
            let i = idx as i32 + 1;
            let l = 1. / domain.dxf(i) / domain.dxc(i);
            let u = 1. / domain.dxf(i) / domain.dxc(i + 1);
            system.tdm_l[idx] = -prefactor * l;
            system.tdm_c[idx] = 1. + prefactor * (l + u);
            system.tdm_u[idx] = -prefactor * u;
        }
        system.solve_x();
    }
    let needs_xy = config.t_implicit[1] || (domain.ndims == 3 && config.t_implicit[2]);
    if needs_xy {
        system.transpose_x1_to_y1(domain);
    }
    if config.t_implicit[1] {
        let val = 1. / domain.dy / domain.dy;
        for idx in 0..system.glsizes[1] {
            system.tdm_l[idx] = -prefactor * val;
            system.tdm_c[idx] = 1. + 2. * prefactor * val;
            system.tdm_u[idx] = -prefactor * val;
        }
        system.solve_y();
    }
    if domain.ndims == 3 && config.t_implicit[2] {
        system.transpose_y1_to_z1(domain);
        let val = 1. / domain.dz / domain.dz;
        for idx in 0..system.glsizes[2] {
            system.tdm_l[idx] = -prefactor * val;
            system.tdm_c[idx] = 1. + 2. * prefactor * val;
            system.tdm_u[idx] = -prefactor * val;
        }
        system.solve_z();
        system.transpose_z1_to_y1(domain);
    }
    if needs_xy {
        system.transpose_y1_to_x1(domain);
    }
    let mx = domain.mysizes[0] as i32;
    let my = domain.mysizes[1] as i32;
    let (klo, khi) = krange(domain);
    let mut cnt = 0;
    for k in klo..=khi {
        for j in 1..=my {
            for i in 1..=mx {
                fluid.temp.add(i, j, k, system.x1[cnt]);
                cnt += 1;
            }
        }
    }
    boundary(domain, config, &mut fluid.temp);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fluid::Fluid;

    fn conductive_fluid(domain: &Domain, config: &Config) -> Fluid {
        let mut fluid = Fluid::new(domain, config);
        // strip the convection-triggering perturbation: exact linear profile
        let mx = domain.mysizes[0] as i32;
        let my = domain.mysizes[1] as i32;
        for j in 1..=my {
            for i in 1..=mx {
                let x = domain.xc(i) / domain.lengths[0];
                fluid
                    .temp
                    .set(i, j, 0, config.temp_xm + (config.temp_xp - config.temp_xm) * x);
            }
        }
        boundary(domain, config, &mut fluid.temp);
        fluid
    }

    #[test]
    fn conductive_profile_is_steady_uniform_grid() {
        let config = Config::default();
        let domain = Domain::new(2, [16, 8, 1], [1., 1., 0.], 0.).unwrap();
        let mut fluid = conductive_fluid(&domain, &config);
        compute_rhs(&domain, &config, 0, &mut fluid);
        // zero velocity, linear profile: advection and diffusion both vanish
        for &s in fluid.src_temp.a.iter() {
            assert!(s.abs() < 1e-10, "residual source {}", s);
        }
    }

    #[test]
    fn conductive_profile_is_steady_stretched_grid() {
        // the dxf/dxc Laplacian must be exact for a linear profile also on
        // a non-uniform grid
        let config = Config::default();
        let domain = Domain::new(2, [24, 8, 1], [1., 1., 0.], 1.7).unwrap();
        let mut fluid = conductive_fluid(&domain, &config);
        compute_rhs(&domain, &config, 0, &mut fluid);
        for &s in fluid.src_temp.a.iter() {
            assert!(s.abs() < 1e-9, "residual source {}", s);
        }
    }

    #[test]
    fn implicit_and_explicit_diffusion_agree_for_small_dt() {
        let domain = Domain::new(2, [16, 8, 1], [1., 1., 0.], 0.).unwrap();
        let explicit = Config {
            ra: 1e2,
            pr: 1.,
            ..Config::default()
        };
        let implicit = Config {
            t_implicit: [true, true, false],
            ..explicit.clone()
        };
        let dt = 1e-7;
        let mut fluid_e = Fluid::new(&domain, &explicit);
        let mut fluid_i = Fluid::new(&domain, &implicit);
        let mut sys_e = None;
        let mut sys_i = None;
        compute_rhs(&domain, &explicit, 0, &mut fluid_e);
        update(&domain, &explicit, 0, dt, &mut fluid_e, &mut sys_e);
        compute_rhs(&domain, &implicit, 0, &mut fluid_i);
        update(&domain, &implicit, 0, dt, &mut fluid_i, &mut sys_i);
        let mx = domain.mysizes[0] as i32;
        let my = domain.mysizes[1] as i32;
        for j in 1..=my {
            for i in 1..=mx {
                let d = (fluid_e.temp.get(i, j, 0) - fluid_i.temp.get(i, j, 0)).abs();
                assert!(d < 1e-12, "implicit/explicit mismatch {}", d);
            }
        }
    }
}
