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

//! Surface reconstruction: corner gradients, cell normals, intercepts and
//! mean curvature
//!
//! Runs once per Runge-Kutta stage. Corner gradients of the VOF are
//! normalised into unit directions; cell normals average the surrounding
//! corners; the intercept `d` closing `n . x + d` over the cell is found
//! by a Newton iteration on the quadrature of the logistic profile; the
//! curvature is the negative divergence of the corner directions.

use super::gauss::GaussQuad;
use super::{Interface, NGAUSS, VOFBETA, VOFMIN};
use crate::domain::Domain;

/// Largest Newton step count for the intercept.
const CNTMAX: usize = 8;
/// Residual bound of the intercept iteration.
const RESMAX: f64 = 1e-12;

/// Solve the quadrature closure `sum_q w_q H(n . g_q + d) = vof` for the
/// intercept `d` of one cell.
pub fn compute_intercept(ndims: usize, quad: &GaussQuad, vof: f64, normal: &[f64]) -> f64 {
    // the exponentials are independent of d
    let mut exps = [0.; NGAUSS * NGAUSS * NGAUSS];
    let mut weights = [0.; NGAUSS * NGAUSS * NGAUSS];
    let nq = NGAUSS.pow(ndims as u32);
    for q in 0..nq {
        let ii = q % NGAUSS;
        let jj = (q / NGAUSS) % NGAUSS;
        let kk = q / (NGAUSS * NGAUSS);
        let mut arg = normal[0] * quad.points[ii] + normal[1] * quad.points[jj];
        let mut weight = quad.weights[ii] * quad.weights[jj];
        if ndims == 3 {
            arg += normal[2] * quad.points[kk];
            weight *= quad.weights[kk];
        }
        exps[q] = (-2. * VOFBETA * arg).exp();
        weights[q] = weight;
    }
    // D = exp(-2 beta d); the logistic average is monotone in D
    let mut val = 1. / vof - 1.;
    for _ in 0..CNTMAX {
        let mut f0 = -vof;
        let mut f1 = 0.;
        for q in 0..nq {
            let denom = 1. / (1. + exps[q] * val);
            f0 += weights[q] * denom;
            f1 -= weights[q] * exps[q] * denom * denom;
        }
        val -= f0 / f1;
        if f0.abs() < RESMAX {
            break;
        }
    }
    -0.5 / VOFBETA * val.ln()
}

fn compute_gradient(domain: &Domain, interface: &mut Interface) {
    let mx = domain.mysizes[0] as i32;
    let my = domain.mysizes[1] as i32;
    let dy = domain.dy;
    let vof = &interface.vof;
    let dvof = &mut interface.dvof;
    if domain.ndims == 2 {
        for j in 0..=my + 2 {
            for i in 1..=mx + 1 {
                let dx = domain.dxc(i);
                let dvofdx = 1. / dx
                    * (-vof.get(i - 1, j - 1, 0) + vof.get(i, j - 1, 0) - vof.get(i - 1, j, 0)
                        + vof.get(i, j, 0));
                let dvofdy = 1. / dy
                    * (-vof.get(i - 1, j - 1, 0) - vof.get(i, j - 1, 0)
                        + vof.get(i - 1, j, 0)
                        + vof.get(i, j, 0));
                let norm = (dvofdx * dvofdx + dvofdy * dvofdy).sqrt();
                let norminv = 1. / norm.max(f64::EPSILON);
                let corner = dvof.at_mut(i, j, 0);
                corner[0] = dvofdx * norminv;
                corner[1] = dvofdy * norminv;
            }
        }
    } else {
        let mz = domain.mysizes[2] as i32;
        let dz = domain.dz;
        for k in 0..=mz + 2 {
            for j in 0..=my + 2 {
                for i in 1..=mx + 1 {
                    let dx = domain.dxc(i);
                    let mut sum = [0.; 3];
                    for dk in -1..=0 {
                        for dj in -1..=0 {
                            for di in -1..=0 {
                                let v = vof.get(i + di, j + dj, k + dk);
                                sum[0] += if di == 0 { v } else { -v };
                                sum[1] += if dj == 0 { v } else { -v };
                                sum[2] += if dk == 0 { v } else { -v };
                            }
                        }
                    }
                    let dvofdx = sum[0] / dx;
                    let dvofdy = sum[1] / dy;
                    let dvofdz = sum[2] / dz;
                    let norm =
                        (dvofdx * dvofdx + dvofdy * dvofdy + dvofdz * dvofdz).sqrt();
                    let norminv = 1. / norm.max(f64::EPSILON);
                    let corner = dvof.at_mut(i, j, k);
                    corner[0] = dvofdx * norminv;
                    corner[1] = dvofdy * norminv;
                    corner[2] = dvofdz * norminv;
                }
            }
        }
    }
}

fn compute_normal(domain: &Domain, interface: &mut Interface) {
    let mx = domain.mysizes[0] as i32;
    let my = domain.mysizes[1] as i32;
    let dy = domain.dy;
    let quad = &interface.quad;
    let vof = &interface.vof;
    let dvof = &interface.dvof;
    let normal = &mut interface.normal;
    if domain.ndims == 2 {
        for j in 0..=my + 1 {
            for i in 1..=mx {
                let lvof = vof.get(i, j, 0);
                // single-phase cells carry no reconstruction
                if lvof < VOFMIN || 1. - VOFMIN < lvof {
                    continue;
                }
                let dx = domain.dxf(i);
                let mut nx = dvof.at(i, j, 0)[0]
                    + dvof.at(i + 1, j, 0)[0]
                    + dvof.at(i, j + 1, 0)[0]
                    + dvof.at(i + 1, j + 1, 0)[0];
                let mut ny = dvof.at(i, j, 0)[1]
                    + dvof.at(i + 1, j, 0)[1]
                    + dvof.at(i, j + 1, 0)[1]
                    + dvof.at(i + 1, j + 1, 0)[1];
                nx /= dx;
                ny /= dy;
                let norm = (nx * nx + ny * ny).sqrt();
                let norminv = 1. / norm.max(f64::EPSILON);
                nx *= norminv;
                ny *= norminv;
                let seg = compute_intercept(2, quad, lvof, &[nx, ny]);
                let cell = normal.at_mut(i, j, 0);
                cell[0] = nx;
                cell[1] = ny;
                cell[2] = seg;
            }
        }
    } else {
        let mz = domain.mysizes[2] as i32;
        let dz = domain.dz;
        for k in 0..=mz + 1 {
            for j in 0..=my + 1 {
                for i in 1..=mx {
                    let lvof = vof.get(i, j, k);
                    if lvof < VOFMIN || 1. - VOFMIN < lvof {
                        continue;
                    }
                    let dx = domain.dxf(i);
                    let mut n = [0.; 3];
                    for dk in 0..=1 {
                        for dj in 0..=1 {
                            for di in 0..=1 {
                                let corner = dvof.at(i + di, j + dj, k + dk);
                                n[0] += corner[0];
                                n[1] += corner[1];
                                n[2] += corner[2];
                            }
                        }
                    }
                    n[0] /= dx;
                    n[1] /= dy;
                    n[2] /= dz;
                    let norm = (n[0] * n[0] + n[1] * n[1] + n[2] * n[2]).sqrt();
                    let norminv = 1. / norm.max(f64::EPSILON);
                    n[0] *= norminv;
                    n[1] *= norminv;
                    n[2] *= norminv;
                    let seg = compute_intercept(3, quad, lvof, &n);
                    let cell = normal.at_mut(i, j, k);
                    cell[0] = n[0];
                    cell[1] = n[1];
                    cell[2] = n[2];
                    cell[3] = seg;
                }
            }
        }
    }
}

fn compute_curvature(domain: &Domain, interface: &mut Interface) {
    let mx = domain.mysizes[0] as i32;
    let my = domain.mysizes[1] as i32;
    let dy = domain.dy;
    let dvof = &interface.dvof;
    let curv = &mut interface.curv;
    if domain.ndims == 2 {
        for j in 0..=my + 1 {
            for i in 1..=mx {
                let dx = domain.dxf(i);
                let dnxdx = 1. / dx
                    * (-dvof.at(i, j, 0)[0] + dvof.at(i + 1, j, 0)[0] - dvof.at(i, j + 1, 0)[0]
                        + dvof.at(i + 1, j + 1, 0)[0]);
                let dnydy = 1. / dy
                    * (-dvof.at(i, j, 0)[1] - dvof.at(i + 1, j, 0)[1]
                        + dvof.at(i, j + 1, 0)[1]
                        + dvof.at(i + 1, j + 1, 0)[1]);
                curv.set(i, j, 0, 0.5 * (-dnxdx - dnydy));
            }
        }
    } else {
        let mz = domain.mysizes[2] as i32;
        let dz = domain.dz;
        for k in 0..=mz + 1 {
            for j in 0..=my + 1 {
                for i in 1..=mx {
                    let dx = domain.dxf(i);
                    let mut div = [0.; 3];
                    for dk in 0..=1 {
                        for dj in 0..=1 {
                            for di in 0..=1 {
                                let corner = dvof.at(i + di, j + dj, k + dk);
                                div[0] += if di == 1 { corner[0] } else { -corner[0] };
                                div[1] += if dj == 1 { corner[1] } else { -corner[1] };
                                div[2] += if dk == 1 { corner[2] } else { -corner[2] };
                            }
                        }
                    }
                    let kappa = 0.25 * (-div[0] / dx - div[1] / dy - div[2] / dz);
                    curv.set(i, j, k, kappa);
                }
            }
        }
    }
}

/// Rebuild the full reconstruction (gradients, normals, intercepts,
/// curvature) from the current VOF field.
pub fn compute_curvature_tensor(domain: &Domain, interface: &mut Interface) {
    compute_gradient(domain, interface);
    compute_normal(domain, interface);
    compute_curvature(domain, interface);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;
    use crate::interface::{indicator, Interface};

    #[test]
    fn intercept_closes_the_quadrature() {
        // the Newton result must reproduce the target fraction through
        // the same quadrature it was fitted with
        let quad = GaussQuad::mapped(NGAUSS, -0.5, 0.5);
        let normals = [[1., 0.], [0.6, 0.8], [-0.28, 0.96], [0.7071, -0.7071]];
        let fractions = [0.1, 0.3, 0.5, 0.77, 0.999];
        for normal in normals.iter() {
            for &vof in fractions.iter() {
                let seg = compute_intercept(2, &quad, vof, normal);
                let full = [normal[0], normal[1], seg];
                let mut recovered = 0.;
                for jj in 0..NGAUSS {
                    for ii in 0..NGAUSS {
                        recovered += quad.weights[ii]
                            * quad.weights[jj]
                            * indicator(
                                2,
                                &full,
                                &[quad.points[ii], quad.points[jj], 0.],
                            );
                    }
                }
                assert!(
                    (recovered - vof).abs() < 1e-11,
                    "n = {:?}, vof = {}: recovered {}",
                    normal,
                    vof,
                    recovered
                );
            }
        }
    }

    #[test]
    fn flat_interface_has_zero_curvature() {
        let config = Config::default();
        let domain = Domain::new(2, [32, 32, 1], [1., 1., 0.], 0.).unwrap();
        let mut interface = Interface::new(&domain, &config);
        interface.init_vof(&domain, |x, _, _| 0.5 - x);
        compute_curvature_tensor(&domain, &mut interface);
        // around the transition the reconstruction is exactly planar
        for j in 1..=32 {
            for i in 11..=24 {
                let kappa = interface.curv.get(i, j, 0);
                assert!(kappa.abs() < 1e-8, "kappa({}, {}) = {}", i, j, kappa);
            }
        }
        // the plane's normal points out of the liquid (negative x side holds
        // the liquid, so the gradient of vof points to -x)
        let cell = interface.normal.at(16, 16, 0);
        assert!(cell[0] < -0.99);
        assert!(cell[1].abs() < 1e-8);
    }
}
