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

//! Per-step driver: the three-stage Runge-Kutta loop
//!
//! One call advances the whole state by one time step. Every stage
//! rebuilds the interface reconstruction and its body force, transports
//! the VOF, predicts the velocity, projects it onto the divergence-free
//! space through the scalar potential, and advances the temperature.

use crate::config::Config;
use crate::domain::Domain;
use crate::error::Result;
use crate::fluid::{self, Fluid};
use crate::interface::{self, Interface};
use crate::linsys::LinearSystem;
use crate::poisson::PoissonSolver;
use crate::runge_kutta::RKSTEP_MAX;
use crate::temperature;

/// Long-lived solver states, created lazily on first use and cached for
/// the simulation lifetime (at most one per field and grid layout).
pub struct Solvers {
    pub poisson: Option<PoissonSolver>,
    pub ux: Option<LinearSystem>,
    pub uy: Option<LinearSystem>,
    pub uz: Option<LinearSystem>,
    pub temp: Option<LinearSystem>,
}

impl Solvers {
    pub fn new() -> Solvers {
        Solvers {
            poisson: None,
            ux: None,
            uy: None,
            uz: None,
            temp: None,
        }
    }
}

impl Default for Solvers {
    fn default() -> Self {
        Solvers::new()
    }
}

/// Advance all fields by one time step; returns the step size taken.
pub fn integrate(
    domain: &Domain,
    config: &Config,
    fluid: &mut Fluid,
    interface: &mut Interface,
    solvers: &mut Solvers,
) -> Result<f64> {
    // the uniform-x fast path may be disabled by configuration
    let use_dct = domain.x_grid_is_uniform() && !config.use_stretched_grid;
    let dt = fluid::dt::decide_dt(domain, config, fluid);
    for rkstep in 0..RKSTEP_MAX {
        if config.solve_interface {
            interface::curvature::compute_curvature_tensor(domain, interface);
            interface::force::compute_surface_force(domain, interface);
            interface::flux::update_vof(domain, rkstep, dt, fluid, interface);
        }
        fluid::predict::compute_rhs(domain, config, rkstep, fluid, interface);
        fluid::predict::predict_ux(domain, config, rkstep, dt, fluid, &mut solvers.ux);
        fluid::predict::predict_uy(domain, config, rkstep, dt, fluid, &mut solvers.uy);
        if domain.ndims == 3 {
            fluid::predict::predict_uz(domain, config, rkstep, dt, fluid, &mut solvers.uz);
        }
        let poisson = solvers
            .poisson
            .get_or_insert_with(|| PoissonSolver::new(domain, use_dct));
        fluid::correct::compute_potential(domain, rkstep, dt, fluid, poisson);
        fluid::correct::correct_velocity(domain, config, rkstep, dt, fluid);
        fluid::correct::update_pressure(domain, config, rkstep, dt, fluid);
        if config.solve_temp {
            temperature::compute_rhs(domain, config, rkstep, fluid);
            temperature::update(domain, config, rkstep, dt, fluid, &mut solvers.temp);
        }
    }
    Ok(dt)
}

#[cfg(test)]
mod tests {
    use super::*;

    /// After the projection of every stage the velocity must be discretely
    /// divergence free.
    #[test]
    fn projection_enforces_divergence_free_velocity() {
        let config = Config {
            ra: 1e4,
            pr: 1.,
            solve_interface: false,
            ..Config::default()
        };
        let domain = Domain::new(2, [32, 32, 1], [1., 1., 0.], 0.).unwrap();
        let mut fluid = Fluid::new(&domain, &config);
        let mut interface = Interface::new(&domain, &config);
        let mut solvers = Solvers::new();
        for _ in 0..3 {
            integrate(&domain, &config, &mut fluid, &mut interface, &mut solvers).unwrap();
        }
        // buoyancy has stirred the fluid by now
        let mut max_u: f64 = 0.;
        for j in 1..=32 {
            for i in 1..=32 {
                max_u = max_u.max(fluid.uy.get(i, j, 0).abs());
            }
        }
        assert!(max_u > 0., "buoyancy should drive a flow");
        let max_div = fluid.max_divergence(&domain);
        assert!(max_div < 1e-10, "divergence {}", max_div);
    }

    #[test]
    fn stretched_grid_runs_the_dft_variant() {
        let config = Config {
            ra: 1e4,
            pr: 1.,
            solve_interface: false,
            ..Config::default()
        };
        let domain = Domain::new(2, [24, 16, 1], [1., 1., 0.], 1.1).unwrap();
        let mut fluid = Fluid::new(&domain, &config);
        let mut interface = Interface::new(&domain, &config);
        let mut solvers = Solvers::new();
        integrate(&domain, &config, &mut fluid, &mut interface, &mut solvers).unwrap();
        assert!(!solvers.poisson.as_ref().unwrap().uses_dct());
        let max_div = fluid.max_divergence(&domain);
        assert!(max_div < 1e-10, "divergence {}", max_div);
    }

    #[test]
    fn implicit_diffusion_stays_divergence_free() {
        let config = Config {
            ra: 1e4,
            pr: 1.,
            solve_interface: false,
            m_implicit: [true, true, false],
            t_implicit: [true, true, false],
            ..Config::default()
        };
        let domain = Domain::new(2, [16, 16, 1], [1., 1., 0.], 0.).unwrap();
        let mut fluid = Fluid::new(&domain, &config);
        let mut interface = Interface::new(&domain, &config);
        let mut solvers = Solvers::new();
        for _ in 0..2 {
            integrate(&domain, &config, &mut fluid, &mut interface, &mut solvers).unwrap();
        }
        let max_div = fluid.max_divergence(&domain);
        assert!(max_div < 1e-10, "divergence {}", max_div);
    }

    #[test]
    fn three_dimensional_step_runs() {
        let config = Config {
            ndims: 3,
            ra: 1e4,
            pr: 1.,
            glsizes: [8, 8, 8],
            lengths: [1., 1., 1.],
            solve_interface: true,
            tension: 0.1,
            ..Config::default()
        };
        let domain = Domain::from_config(&config).unwrap();
        let mut fluid = Fluid::new(&domain, &config);
        let mut interface = Interface::new(&domain, &config);
        interface.init_vof(&domain, |x, y, z| {
            0.25 - ((x - 0.5).powi(2) + (y - 0.5).powi(2) + (z - 0.5).powi(2)).sqrt()
        });
        let mut solvers = Solvers::new();
        let before = interface.vof_integral(&domain);
        integrate(&domain, &config, &mut fluid, &mut interface, &mut solvers).unwrap();
        let after = interface.vof_integral(&domain);
        assert!((before - after).abs() < 1e-11, "mass drift {}", before - after);
        let max_div = fluid.max_divergence(&domain);
        assert!(max_div < 1e-9, "divergence {}", max_div);
    }
}
