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

//! VOF transport: upwind face fluxes and the Runge-Kutta update
//!
//! Fluxes take the donor cell from the face velocity sign and integrate
//! the donor's diffuse indicator over the face by Gauss quadrature; cells
//! that are effectively single phase short-circuit to a plain upwind
//! product. The cell update is the conservative flux divergence, advanced
//! with the explicit pair of Runge-Kutta coefficients (the VOF has no
//! implicit term).

use super::{boundary_vof, indicator, Interface, NGAUSS, VOFMIN};
use crate::domain::Domain;
use crate::fluid::Fluid;
use crate::runge_kutta::RKCOEFS;

fn compute_flux_x(domain: &Domain, fluid: &Fluid, interface: &mut Interface) {
    let mx = domain.mysizes[0] as i32;
    let my = domain.mysizes[1] as i32;
    let (klo, khi) = if domain.ndims == 3 {
        (1, domain.mysizes[2] as i32)
    } else {
        (0, 0)
    };
    let quad = &interface.quad;
    let vof = &interface.vof;
    let normal = &interface.normal;
    let flxx = &mut interface.flxx;
    for k in klo..=khi {
        for j in 1..=my {
            // wall faces carry no liquid flux and stay zero
            for i in 2..=mx {
                let vel = fluid.ux.get(i, j, k);
                let (ii, x) = if vel < 0. { (i, -0.5) } else { (i - 1, 0.5) };
                let lvof = vof.get(ii, j, k);
                if lvof < VOFMIN || 1. - VOFMIN < lvof {
                    flxx.set(i, j, k, vel * lvof);
                    continue;
                }
                let cell = normal.at(ii, j, k);
                let mut flux = 0.;
                if domain.ndims == 2 {
                    for jj in 0..NGAUSS {
                        flux += quad.weights[jj]
                            * indicator(2, cell, &[x, quad.points[jj], 0.]);
                    }
                } else {
                    for kk in 0..NGAUSS {
                        for jj in 0..NGAUSS {
                            flux += quad.weights[jj]
                                * quad.weights[kk]
                                * indicator(3, cell, &[x, quad.points[jj], quad.points[kk]]);
                        }
                    }
                }
                flxx.set(i, j, k, vel * flux);
            }
        }
    }
}

fn compute_flux_y(domain: &Domain, fluid: &Fluid, interface: &mut Interface) {
    let mx = domain.mysizes[0] as i32;
    let my = domain.mysizes[1] as i32;
    let (klo, khi) = if domain.ndims == 3 {
        (1, domain.mysizes[2] as i32)
    } else {
        (0, 0)
    };
    let quad = &interface.quad;
    let vof = &interface.vof;
    let normal = &interface.normal;
    let flxy = &mut interface.flxy;
    for k in klo..=khi {
        for j in 1..=my + 1 {
            for i in 1..=mx {
                let vel = fluid.uy.get(i, j, k);
                let (jj, y) = if vel < 0. { (j, -0.5) } else { (j - 1, 0.5) };
                let lvof = vof.get(i, jj, k);
                if lvof < VOFMIN || 1. - VOFMIN < lvof {
                    flxy.set(i, j, k, vel * lvof);
                    continue;
                }
                let cell = normal.at(i, jj, k);
                let mut flux = 0.;
                if domain.ndims == 2 {
                    for ii in 0..NGAUSS {
                        flux += quad.weights[ii]
                            * indicator(2, cell, &[quad.points[ii], y, 0.]);
                    }
                } else {
                    for kk in 0..NGAUSS {
                        for ii in 0..NGAUSS {
                            flux += quad.weights[ii]
                                * quad.weights[kk]
                                * indicator(3, cell, &[quad.points[ii], y, quad.points[kk]]);
                        }
                    }
                }
                flxy.set(i, j, k, vel * flux);
            }
        }
    }
}

fn compute_flux_z(domain: &Domain, fluid: &Fluid, interface: &mut Interface) {
    let mx = domain.mysizes[0] as i32;
    let my = domain.mysizes[1] as i32;
    let mz = domain.mysizes[2] as i32;
    let quad = &interface.quad;
    let vof = &interface.vof;
    let normal = &interface.normal;
    let uz = fluid.uz.as_ref().unwrap();
    let flxz = interface.flxz.as_mut().unwrap();
    for k in 1..=mz + 1 {
        for j in 1..=my {
            for i in 1..=mx {
                let vel = uz.get(i, j, k);
                let (kk, z) = if vel < 0. { (k, -0.5) } else { (k - 1, 0.5) };
                let lvof = vof.get(i, j, kk);
                if lvof < VOFMIN || 1. - VOFMIN < lvof {
                    flxz.set(i, j, k, vel * lvof);
                    continue;
                }
                let cell = normal.at(i, j, kk);
                let mut flux = 0.;
                for jj in 0..NGAUSS {
                    for ii in 0..NGAUSS {
                        flux += quad.weights[ii]
                            * quad.weights[jj]
                            * indicator(3, cell, &[quad.points[ii], quad.points[jj], z]);
                    }
                }
                flxz.set(i, j, k, vel * flux);
            }
        }
    }
}

fn compute_rhs(domain: &Domain, interface: &mut Interface) {
    let mx = domain.mysizes[0] as i32;
    let my = domain.mysizes[1] as i32;
    let (klo, khi) = if domain.ndims == 3 {
        (1, domain.mysizes[2] as i32)
    } else {
        (0, 0)
    };
    let dy = domain.dy;
    let dz = domain.dz;
    let flxx = &interface.flxx;
    let flxy = &interface.flxy;
    let flxz = interface.flxz.as_ref();
    let src = &mut interface.src.a;
    let mut cnt = 0;
    for k in klo..=khi {
        for j in 1..=my {
            for i in 1..=mx {
                let mut rhs = (flxx.get(i, j, k) - flxx.get(i + 1, j, k)) / domain.dxf(i);
                rhs += (flxy.get(i, j, k) - flxy.get(i, j + 1, k)) / dy;
                if let Some(flxz) = flxz {
                    rhs += (flxz.get(i, j, k) - flxz.get(i, j, k + 1)) / dz;
                }
                src[cnt] += rhs;
                cnt += 1;
            }
        }
    }
}

fn advect_vof(domain: &Domain, rkstep: usize, dt: f64, interface: &mut Interface) {
    let mx = domain.mysizes[0] as i32;
    let my = domain.mysizes[1] as i32;
    let (klo, khi) = if domain.ndims == 3 {
        (1, domain.mysizes[2] as i32)
    } else {
        (0, 0)
    };
    let coef = RKCOEFS[rkstep];
    let mut cnt = 0;
    for k in klo..=khi {
        for j in 1..=my {
            for i in 1..=mx {
                let mut delta = coef.alpha * interface.src.a[cnt];
                if rkstep != 0 {
                    delta += coef.beta * interface.src.b[cnt];
                }
                interface.vof.add(i, j, k, dt * delta);
                cnt += 1;
            }
        }
    }
}

/// One Runge-Kutta stage of the VOF field: stash the previous source,
/// compute fresh face fluxes, accumulate the conservative divergence and
/// advance.
pub fn update_vof(
    domain: &Domain,
    rkstep: usize,
    dt: f64,
    fluid: &Fluid,
    interface: &mut Interface,
) {
    interface.src.shift(rkstep);
    compute_flux_x(domain, fluid, interface);
    compute_flux_y(domain, fluid, interface);
    if domain.ndims == 3 {
        compute_flux_z(domain, fluid, interface);
    }
    compute_rhs(domain, interface);
    advect_vof(domain, rkstep, dt, interface);
    boundary_vof(domain, &mut interface.vof);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;

    #[test]
    fn quiescent_flow_does_not_move_vof() {
        let config = Config::default();
        let domain = Domain::new(2, [16, 16, 1], [1., 1., 0.], 0.).unwrap();
        let fluid = Fluid::new(&domain, &config);
        let mut interface = Interface::new(&domain, &config);
        interface.init_vof(&domain, |x, y, _| {
            0.2 - ((x - 0.5).powi(2) + (y - 0.5).powi(2)).sqrt()
        });
        crate::interface::curvature::compute_curvature_tensor(&domain, &mut interface);
        let before: Vec<f64> = (1..=16)
            .flat_map(|j| (1..=16).map(move |i| (i, j)))
            .map(|(i, j)| interface.vof.get(i, j, 0))
            .collect();
        update_vof(&domain, 0, 1e-3, &fluid, &mut interface);
        let after: Vec<f64> = (1..=16)
            .flat_map(|j| (1..=16).map(move |i| (i, j)))
            .map(|(i, j)| interface.vof.get(i, j, 0))
            .collect();
        assert_eq!(before, after);
    }

    #[test]
    fn uniform_translation_conserves_mass() {
        let config = Config::default();
        let domain = Domain::new(2, [32, 32, 1], [1., 1., 0.], 0.).unwrap();
        let mut fluid = Fluid::new(&domain, &config);
        fluid.uy.fill(1.);
        let mut interface = Interface::new(&domain, &config);
        // a blob well away from the walls, moving in the periodic direction
        interface.init_vof(&domain, |x, y, _| {
            0.15 - ((x - 0.5).powi(2) + (y - 0.5).powi(2)).sqrt()
        });
        let before = interface.vof_integral(&domain);
        let dt = 0.2 * domain.dy;
        for rkstep in 0..3 {
            crate::interface::curvature::compute_curvature_tensor(&domain, &mut interface);
            update_vof(&domain, rkstep, dt, &fluid, &mut interface);
        }
        let after = interface.vof_integral(&domain);
        assert!(
            (before - after).abs() < 1e-12 * 32. * 32.,
            "mass drift {}",
            before - after
        );
    }
}
