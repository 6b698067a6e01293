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

//! Time-step selection
//!
//! The advective bound scans every velocity face; the diffusive bounds are
//! pure grid numbers and only constrain the axes whose diffusion stays
//! explicit. The advective candidate is reduced over the whole process
//! grid before the safety factor is applied.

use crate::config::Config;
use crate::domain::Domain;
use crate::fluid::Fluid;

/// Guard against division by a vanishing velocity.
const SMALL: f64 = 1e-8;

fn decide_dt_adv(domain: &Domain, fluid: &Fluid) -> f64 {
    let mx = domain.mysizes[0] as i32;
    let my = domain.mysizes[1] as i32;
    let (klo, khi) = if domain.ndims == 3 {
        (1, domain.mysizes[2] as i32)
    } else {
        (0, 0)
    };
    // largest admissible step
    let mut dt: f64 = 1.;
    for k in klo..=khi {
        for j in 1..=my {
            for i in 2..=mx {
                let vel = fluid.ux.get(i, j, k).abs() + SMALL;
                dt = dt.min(domain.dxc(i) / vel);
            }
        }
    }
    for k in klo..=khi {
        for j in 1..=my {
            for i in 1..=mx {
                let vel = fluid.uy.get(i, j, k).abs() + SMALL;
                dt = dt.min(domain.dy / vel);
            }
        }
    }
    if let Some(uz) = fluid.uz.as_ref() {
        let mz = domain.mysizes[2] as i32;
        for k in 1..=mz {
            for j in 1..=my {
                for i in 1..=mx {
                    let vel = uz.get(i, j, k).abs() + SMALL;
                    dt = dt.min(domain.dz / vel);
                }
            }
        }
    }
    domain.comm.allreduce_min(dt)
}

/// Per-axis diffusive bounds for a given diffusivity.
fn decide_dt_dif(domain: &Domain, config: &Config, diffusivity: f64) -> [f64; 3] {
    let mx = domain.mysizes[0] as i32;
    let mut grid_sizes = [f64::MAX; 3];
    for i in 2..=mx {
        grid_sizes[0] = grid_sizes[0].min(domain.dxc(i));
    }
    grid_sizes[1] = domain.dy;
    if domain.ndims == 3 {
        grid_sizes[2] = domain.dz;
    }
    let mut dt = [f64::MAX; 3];
    for dim in 0..domain.ndims {
        dt[dim] = config.coef_dt_dif / diffusivity * 0.5 / domain.ndims as f64
            * grid_sizes[dim].powi(2);
    }
    dt
}

/// The stable step of the next Runge-Kutta round: the global minimum of the
/// advective bound and the explicit-axis diffusive bounds.
pub fn decide_dt(domain: &Domain, config: &Config, fluid: &Fluid) -> f64 {
    let mut dt = config.coef_dt_adv * decide_dt_adv(domain, fluid);
    let dt_dif_m = decide_dt_dif(domain, config, fluid.m_dif);
    for dim in 0..domain.ndims {
        if !config.m_implicit[dim] {
            dt = dt.min(dt_dif_m[dim]);
        }
    }
    if config.solve_temp {
        let dt_dif_t = decide_dt_dif(domain, config, fluid.t_dif);
        for dim in 0..domain.ndims {
            if !config.t_implicit[dim] {
                dt = dt.min(dt_dif_t[dim]);
            }
        }
    }
    dt
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn advective_bound_scales_with_grid() {
        let config = Config {
            coef_dt_adv: 1.,
            coef_dt_dif: 1e10, // park the diffusive bound out of the way
            solve_temp: false,
            ..Config::default()
        };
        let coarse_domain = Domain::new(2, [16, 16, 1], [1., 1., 0.], 0.).unwrap();
        let fine_domain = Domain::new(2, [32, 32, 1], [1., 1., 0.], 0.).unwrap();
        let mut coarse = Fluid::new(&coarse_domain, &config);
        let mut fine = Fluid::new(&fine_domain, &config);
        coarse.uy.fill(2.);
        fine.uy.fill(2.);
        let dt_coarse = decide_dt(&coarse_domain, &config, &coarse);
        let dt_fine = decide_dt(&fine_domain, &config, &fine);
        assert!((dt_coarse / dt_fine - 2.).abs() < 1e-6);
    }

    #[test]
    fn diffusive_bound_scales_quadratically() {
        let config = Config {
            coef_dt_adv: 1e10,
            coef_dt_dif: 1.,
            ra: 1.,
            pr: 1., // unit diffusivities: diffusion limited
            solve_temp: true,
            ..Config::default()
        };
        let coarse_domain = Domain::new(2, [16, 16, 1], [1., 1., 0.], 0.).unwrap();
        let fine_domain = Domain::new(2, [32, 32, 1], [1., 1., 0.], 0.).unwrap();
        let coarse = Fluid::new(&coarse_domain, &config);
        let fine = Fluid::new(&fine_domain, &config);
        let dt_coarse = decide_dt(&coarse_domain, &config, &coarse);
        let dt_fine = decide_dt(&fine_domain, &config, &fine);
        assert!((dt_coarse / dt_fine - 4.).abs() < 1e-6);
    }

    #[test]
    fn implicit_axes_do_not_constrain() {
        let config = Config {
            coef_dt_adv: 1e10,
            coef_dt_dif: 1.,
            ra: 1.,
            pr: 1.,
            solve_temp: false,
            ..Config::default()
        };
        let domain = Domain::new(2, [16, 16, 1], [1., 1., 0.], 0.).unwrap();
        let fluid = Fluid::new(&domain, &config);
        let explicit_dt = decide_dt(&domain, &config, &fluid);
        let config = Config {
            m_implicit: [true, true, true],
            ..config
        };
        let implicit_dt = decide_dt(&domain, &config, &fluid);
        assert!(implicit_dt > 100. * explicit_dt);
    }
}
