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

//! Velocity predictor: right-hand sides and the provisional update
//!
//! Per velocity component the source gathers advection (second-order
//! central with width-weighted transporting velocities on the stretched
//! axis), diffusion routed to the explicit or implicit buffer per axis, the
//! implicit pressure gradient, buoyancy on the wall-normal component, and
//! the surface-tension body force. The stage increment
//! `alpha dt src_a + beta dt src_b + gamma dt src_g` is then filtered by
//! one Helmholtz sweep per implicit axis and added to the velocity.

use itertools::izip;

use crate::array::{Field, SourceTriple};
use crate::config::Config;
use crate::domain::Domain;
use crate::fluid::{boundary, Fluid};
use crate::interface::Interface;
use crate::linsys::LinearSystem;
use crate::runge_kutta::RKCOEFS;

fn krange(domain: &Domain) -> (i32, i32) {
    if domain.ndims == 3 {
        (1, domain.mysizes[2] as i32)
    } else {
        (0, 0)
    }
}

/// Accumulate the Runge-Kutta sources of every velocity component.
pub fn compute_rhs(
    domain: &Domain,
    config: &Config,
    rkstep: usize,
    fluid: &mut Fluid,
    interface: &Interface,
) {
    let Fluid {
        ux,
        uy,
        uz,
        p,
        temp,
        src_ux,
        src_uy,
        src_uz,
        m_dif,
        ..
    } = fluid;
    src_ux.shift(rkstep);
    src_uy.shift(rkstep);
    if let Some(src_uz) = src_uz.as_mut() {
        src_uz.shift(rkstep);
    }
    rhs_ux(
        domain,
        config,
        ux,
        uy,
        uz.as_ref(),
        p,
        temp,
        &interface.ifrcx,
        src_ux,
        *m_dif,
    );
    rhs_uy(
        domain,
        config,
        ux,
        uy,
        uz.as_ref(),
        p,
        &interface.ifrcy,
        src_uy,
        *m_dif,
    );
    if domain.ndims == 3 {
        rhs_uz(
            domain,
            config,
            ux,
            uy,
            uz.as_ref().unwrap(),
            p,
            interface.ifrcz.as_ref().unwrap(),
            src_uz.as_mut().unwrap(),
            *m_dif,
        );
    }
}

#[allow(clippy::too_many_arguments)]
fn rhs_ux(
    domain: &Domain,
    config: &Config,
    ux: &Field,
    uy: &Field,
    uz: Option<&Field>,
    p: &Field,
    temp: &Field,
    ifrcx: &Field,
    src: &mut SourceTriple,
    m_dif: f64,
) {
    let mx = domain.mysizes[0] as i32;
    let my = domain.mysizes[1] as i32;
    let (klo, khi) = krange(domain);
    let dy = domain.dy;
    let dz = domain.dz;
    let mut cnt = 0;
    for k in klo..=khi {
        for j in 1..=my {
            for i in 2..=mx {
                // transported by ux
                let advx = {
                    let ux_l = 0.5 * ux.get(i - 1, j, k) + 0.5 * ux.get(i, j, k);
                    let ux_u = 0.5 * ux.get(i, j, k) + 0.5 * ux.get(i + 1, j, k);
                    let l = 0.5 / domain.dxc(i) * ux_l;
                    let u = -0.5 / domain.dxc(i) * ux_u;
                    let c = -l - u;
                    l * ux.get(i - 1, j, k) + c * ux.get(i, j, k) + u * ux.get(i + 1, j, k)
                };
                // transported by uy; the transporting velocity is width-
                // weighted onto the x face
                let w_xm = 0.5 * domain.dxf(i - 1) / domain.dxc(i);
                let w_xp = 0.5 * domain.dxf(i) / domain.dxc(i);
                let advy = {
                    let uy_l = w_xm * uy.get(i - 1, j, k) + w_xp * uy.get(i, j, k);
                    let uy_u = w_xm * uy.get(i - 1, j + 1, k) + w_xp * uy.get(i, j + 1, k);
                    let l = 0.5 / dy * uy_l;
                    let u = -0.5 / dy * uy_u;
                    let c = -l - u;
                    l * ux.get(i, j - 1, k) + c * ux.get(i, j, k) + u * ux.get(i, j + 1, k)
                };
                let advz = match uz {
                    Some(uz) => {
                        let uz_l = w_xm * uz.get(i - 1, j, k) + w_xp * uz.get(i, j, k);
                        let uz_u = w_xm * uz.get(i - 1, j, k + 1) + w_xp * uz.get(i, j, k + 1);
                        let l = 0.5 / dz * uz_l;
                        let u = -0.5 / dz * uz_u;
                        let c = -l - u;
                        l * ux.get(i, j, k - 1) + c * ux.get(i, j, k) + u * ux.get(i, j, k + 1)
                    }
                    None => 0.,
                };
                // diffusion, face-centred x Laplacian on the stretched axis
                let difx = {
                    let l = 1. / domain.dxf(i - 1) / domain.dxc(i);
                    let u = 1. / domain.dxf(i) / domain.dxc(i);
                    let c = -l - u;
                    m_dif
                        * (l * ux.get(i - 1, j, k) + c * ux.get(i, j, k) + u * ux.get(i + 1, j, k))
                };
                let dify = m_dif
                    * (ux.get(i, j - 1, k) - 2. * ux.get(i, j, k) + ux.get(i, j + 1, k))
                    / dy
                    / dy;
                let difz = match uz {
                    Some(_) => {
                        m_dif
                            * (ux.get(i, j, k - 1) - 2. * ux.get(i, j, k) + ux.get(i, j, k + 1))
                            / dz
                            / dz
                    }
                    None => 0.,
                };
                let pre = -(p.get(i, j, k) - p.get(i - 1, j, k)) / domain.dxc(i);
                // arithmetic average keeps the discrete energy balance
                let buo = if config.add_buoyancy {
                    0.5 * temp.get(i - 1, j, k) + 0.5 * temp.get(i, j, k)
                } else {
                    0.
                };
                let sur = ifrcx.get(i, j, k);
                src.a[cnt] += advx + advy + advz + buo + sur;
                src.a[cnt] += if config.m_implicit[0] { 0. } else { difx };
                src.a[cnt] += if config.m_implicit[1] { 0. } else { dify };
                src.a[cnt] += if config.m_implicit[2] { 0. } else { difz };
                src.g[cnt] += pre;
                src.g[cnt] += if config.m_implicit[0] { difx } else { 0. };
                src.g[cnt] += if config.m_implicit[1] { dify } else { 0. };
                src.g[cnt] += if config.m_implicit[2] { difz } else { 0. };
                cnt += 1;
            }
        }
    }
}

#[allow(clippy::too_many_arguments)]
fn rhs_uy(
    domain: &Domain,
    config: &Config,
    ux: &Field,
    uy: &Field,
    uz: Option<&Field>,
    p: &Field,
    ifrcy: &Field,
    src: &mut SourceTriple,
    m_dif: f64,
) {
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
                    let ux_l = 0.5 * ux.get(i, j - 1, k) + 0.5 * ux.get(i, j, k);
                    let ux_u = 0.5 * ux.get(i + 1, j - 1, k) + 0.5 * ux.get(i + 1, j, k);
                    let l = 0.5 / domain.dxf(i) * ux_l;
                    let u = -0.5 / domain.dxf(i) * ux_u;
                    let c = -l - u;
                    l * uy.get(i - 1, j, k) + c * uy.get(i, j, k) + u * uy.get(i + 1, j, k)
                };
                let advy = {
                    let uy_l = 0.5 * uy.get(i, j - 1, k) + 0.5 * uy.get(i, j, k);
                    let uy_u = 0.5 * uy.get(i, j, k) + 0.5 * uy.get(i, j + 1, k);
                    let l = 0.5 / dy * uy_l;
                    let u = -0.5 / dy * uy_u;
                    let c = -l - u;
                    l * uy.get(i, j - 1, k) + c * uy.get(i, j, k) + u * uy.get(i, j + 1, k)
                };
                let advz = match uz {
                    Some(uz) => {
                        let uz_l = 0.5 * uz.get(i, j - 1, k) + 0.5 * uz.get(i, j, k);
                        let uz_u = 0.5 * uz.get(i, j - 1, k + 1) + 0.5 * uz.get(i, j, k + 1);
                        let l = 0.5 / dz * uz_l;
                        let u = -0.5 / dz * uz_u;
                        let c = -l - u;
                        l * uy.get(i, j, k - 1) + c * uy.get(i, j, k) + u * uy.get(i, j, k + 1)
                    }
                    None => 0.,
                };
                let difx = {
                    let l = 1. / domain.dxf(i) / domain.dxc(i);
                    let u = 1. / domain.dxf(i) / domain.dxc(i + 1);
                    let c = -l - u;
                    m_dif
                        * (l * uy.get(i - 1, j, k) + c * uy.get(i, j, k) + u * uy.get(i + 1, j, k))
                };
                let dify = m_dif
                    * (uy.get(i, j - 1, k) - 2. * uy.get(i, j, k) + uy.get(i, j + 1, k))
                    / dy
                    / dy;
                let difz = match uz {
                    Some(_) => {
                        m_dif
                            * (uy.get(i, j, k - 1) - 2. * uy.get(i, j, k) + uy.get(i, j, k + 1))
                            / dz
                            / dz
                    }
                    None => 0.,
                };
                let pre = -(p.get(i, j, k) - p.get(i, j - 1, k)) / dy;
                let sur = ifrcy.get(i, j, k);
                src.a[cnt] += advx + advy + advz + sur;
                src.a[cnt] += if config.m_implicit[0] { 0. } else { difx };
                src.a[cnt] += if config.m_implicit[1] { 0. } else { dify };
                src.a[cnt] += if config.m_implicit[2] { 0. } else { difz };
                src.g[cnt] += pre;
                src.g[cnt] += if config.m_implicit[0] { difx } else { 0. };
                src.g[cnt] += if config.m_implicit[1] { dify } else { 0. };
                src.g[cnt] += if config.m_implicit[2] { difz } else { 0. };
                cnt += 1;
            }
        }
    }
}

#[allow(clippy::too_many_arguments)]
fn rhs_uz(
    domain: &Domain,
    config: &Config,
    ux: &Field,
    uy: &Field,
    uz: &Field,
    p: &Field,
    ifrcz: &Field,
    src: &mut SourceTriple,
    m_dif: f64,
) {
    let mx = domain.mysizes[0] as i32;
    let my = domain.mysizes[1] as i32;
    let mz = domain.mysizes[2] as i32;
    let dy = domain.dy;
    let dz = domain.dz;
    let mut cnt = 0;
    for k in 1..=mz {
        for j in 1..=my {
            for i in 1..=mx {
                let advx = {
                    let ux_l = 0.5 * ux.get(i, j, k - 1) + 0.5 * ux.get(i, j, k);
                    let ux_u = 0.5 * ux.get(i + 1, j, k - 1) + 0.5 * ux.get(i + 1, j, k);
                    let l = 0.5 / domain.dxf(i) * ux_l;
                    let u = -0.5 / domain.dxf(i) * ux_u;
                    let c = -l - u;
                    l * uz.get(i - 1, j, k) + c * uz.get(i, j, k) + u * uz.get(i + 1, j, k)
                };
                let advy = {
                    let uy_l = 0.5 * uy.get(i, j, k - 1) + 0.5 * uy.get(i, j, k);
                    let uy_u = 0.5 * uy.get(i, j + 1, k - 1) + 0.5 * uy.get(i, j + 1, k);
                    let l = 0.5 / dy * uy_l;
                    let u = -0.5 / dy * uy_u;
                    let c = -l - u;
                    l * uz.get(i, j - 1, k) + c * uz.get(i, j, k) + u * uz.get(i, j + 1, k)
                };
                let advz = {
                    let uz_l = 0.5 * uz.get(i, j, k - 1) + 0.5 * uz.get(i, j, k);
                    let uz_u = 0.5 * uz.get(i, j, k) + 0.5 * uz.get(i, j, k + 1);
                    let l = 0.5 / dz * uz_l;
                    let u = -0.5 / dz * uz_u;
                    let c = -l - u;
                    l * uz.get(i, j, k - 1) + c * uz.get(i, j, k) + u * uz.get(i, j, k + 1)
                };
                let difx = {
                    let l = 1. / domain.dxf(i) / domain.dxc(i);
                    let u = 1. / domain.dxf(i) / domain.dxc(i + 1);
                    let c = -l - u;
                    m_dif
                        * (l * uz.get(i - 1, j, k) + c * uz.get(i, j, k) + u * uz.get(i + 1, j, k))
                };
                let dify = m_dif
                    * (uz.get(i, j - 1, k) - 2. * uz.get(i, j, k) + uz.get(i, j + 1, k))
                    / dy
                    / dy;
                let difz = m_dif
                    * (uz.get(i, j, k - 1) - 2. * uz.get(i, j, k) + uz.get(i, j, k + 1))
                    / dz
                    / dz;
                let pre = -(p.get(i, j, k) - p.get(i, j, k - 1)) / dz;
                let sur = ifrcz.get(i, j, k);
                src.a[cnt] += advx + advy + advz + sur;
                src.a[cnt] += if config.m_implicit[0] { 0. } else { difx };
                src.a[cnt] += if config.m_implicit[1] { 0. } else { dify };
                src.a[cnt] += if config.m_implicit[2] { 0. } else { difz };
                src.g[cnt] += pre;
                src.g[cnt] += if config.m_implicit[0] { difx } else { 0. };
                src.g[cnt] += if config.m_implicit[1] { dify } else { 0. };
                src.g[cnt] += if config.m_implicit[2] { difz } else { 0. };
                cnt += 1;
            }
        }
    }
}

/// Fill the stage increment of one field into the scaffold's X1 buffer.
fn stage_increment(rkstep: usize, dt: f64, src: &SourceTriple, du: &mut [f64]) {
    let coef = RKCOEFS[rkstep];
    for (du, a, b, g) in izip!(du.iter_mut(), src.a.iter(), src.b.iter(), src.g.iter()) {
        *du = coef.alpha * dt * a + coef.beta * dt * b + coef.gamma * dt * g;
    }
}

/// Run the implicit sweeps flagged for this field over the increment held
/// in the scaffold; `lapx` yields the (l, c, u) x Laplacian of the field at
/// unknown index `idx`.
fn implicit_sweeps(
    domain: &Domain,
    implicit: [bool; 3],
    prefactor: f64,
    system: &mut LinearSystem,
    lapx: &dyn Fn(usize) -> (f64, f64, f64),
) {
    if implicit[0] {
        for idx in 0..system.glsizes[0] {
            let (l, c, u) = lapx(idx);
            system.tdm_l[idx] = -prefactor * l;
            system.tdm_c[idx] = 1. - prefactor * c;
            system.tdm_u[idx] = -prefactor * u;
        }
        system.solve_x();
    }
    let needs_xy = implicit[1] || (domain.ndims == 3 && implicit[2]);
    if needs_xy {
        system.transpose_x1_to_y1(domain);
    }
    if implicit[1] {
        let val = 1. / domain.dy / domain.dy;
        for idx in 0..system.glsizes[1] {
            system.tdm_l[idx] = -prefactor * val;
            system.tdm_c[idx] = 1. + 2. * prefactor * val;
            system.tdm_u[idx] = -prefactor * val;
        }
        system.solve_y();
    }
    if domain.ndims == 3 && implicit[2] {
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
}

/// Predict the wall-normal velocity.
pub fn predict_ux(
    domain: &Domain,
    config: &Config,
    rkstep: usize,
    dt: f64,
    fluid: &mut Fluid,
    system: &mut Option<LinearSystem>,
) {
    let system = system.get_or_insert_with(|| {
        // one unknown per interior x face
        let glsizes = [
            domain.glsizes[0] - 1,
            domain.glsizes[1],
            if domain.ndims == 3 { domain.glsizes[2] } else { 1 },
        ];
        LinearSystem::new(domain, glsizes)
    });
    stage_increment(rkstep, dt, &fluid.src_ux, &mut system.x1);
    let prefactor = 0.5 * RKCOEFS[rkstep].gamma * dt * fluid.m_dif;
    let lapx = |idx: usize| {
        let i = idx as i32 + 2;
        let l = 1. / domain.dxf(i - 1) / domain.dxc(i);
        let u = 1. / domain.dxf(i) / domain.dxc(i);
        (l, -l - u, u)
    };
    implicit_sweeps(domain, config.m_implicit, prefactor, system, &lapx);
    let mx = domain.mysizes[0] as i32;
    let my = domain.mysizes[1] as i32;
    let (klo, khi) = krange(domain);
    let mut cnt = 0;
    for k in klo..=khi {
        for j in 1..=my {
            for i in 2..=mx {
                fluid.ux.add(i, j, k, system.x1[cnt]);
                cnt += 1;
            }
        }
    }
    boundary::ux(domain, &mut fluid.ux);
}

/// Predict the velocity on y faces.
pub fn predict_uy(
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
    stage_increment(rkstep, dt, &fluid.src_uy, &mut system.x1);
    let prefactor = 0.5 * RKCOEFS[rkstep].gamma * dt * fluid.m_dif;
    let lapx = |idx: usize| {
        let i = idx as i32 + 1;
        let l = 1. / domain.dxf(i) / domain.dxc(i);
        let u = 1. / domain.dxf(i) / domain.dxc(i + 1);
        (l, -l - u, u)
    };
    implicit_sweeps(domain, config.m_implicit, prefactor, system, &lapx);
    let mx = domain.mysizes[0] as i32;
    let my = domain.mysizes[1] as i32;
    let (klo, khi) = krange(domain);
    let mut cnt = 0;
    for k in klo..=khi {
        for j in 1..=my {
            for i in 1..=mx {
                fluid.uy.add(i, j, k, system.x1[cnt]);
                cnt += 1;
            }
        }
    }
    boundary::uy(domain, &mut fluid.uy, config.free_slip);
}

/// Predict the velocity on z faces (three dimensions).
pub fn predict_uz(
    domain: &Domain,
    config: &Config,
    rkstep: usize,
    dt: f64,
    fluid: &mut Fluid,
    system: &mut Option<LinearSystem>,
) {
    let system = system.get_or_insert_with(|| {
        LinearSystem::new(domain, domain.glsizes)
    });
    stage_increment(rkstep, dt, fluid.src_uz.as_ref().unwrap(), &mut system.x1);
    let prefactor = 0.5 * RKCOEFS[rkstep].gamma * dt * fluid.m_dif;
    let lapx = |idx: usize| {
        let i = idx as i32 + 1;
        let l = 1. / domain.dxf(i) / domain.dxc(i);
        let u = 1. / domain.dxf(i) / domain.dxc(i + 1);
        (l, -l - u, u)
    };
    implicit_sweeps(domain, config.m_implicit, prefactor, system, &lapx);
    let mx = domain.mysizes[0] as i32;
    let my = domain.mysizes[1] as i32;
    let mz = domain.mysizes[2] as i32;
    let uz = fluid.uz.as_mut().unwrap();
    let mut cnt = 0;
    for k in 1..=mz {
        for j in 1..=my {
            for i in 1..=mx {
                uz.add(i, j, k, system.x1[cnt]);
                cnt += 1;
            }
        }
    }
    boundary::uz(domain, uz, config.free_slip);
}
