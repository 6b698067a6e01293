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

//! A surface-tension-bearing drop stirred by thermal convection: tracks
//! the liquid volume over time, which the conservative VOF transport keeps
//! constant to round-off.

use vof_flow::{integrate, Config, Domain, Fluid, Interface, Solvers};

fn main() {
    let config = Config {
        ndims: 2,
        glsizes: [96, 96, 1],
        lengths: [1., 1., 0.],
        ra: 1e6,
        pr: 10.,
        tension: 0.02,
        solve_interface: true,
        solve_temp: true,
        add_buoyancy: true,
        timemax: 5.,
        ..Config::default()
    };
    let domain = Domain::from_config(&config).unwrap();
    let mut fluid = Fluid::new(&domain, &config);
    let mut interface = Interface::new(&domain, &config);
    interface.init_vof(&domain, |x, y, _| {
        0.15 - ((x - 0.35f64).powi(2) + (y - 0.5f64).powi(2)).sqrt()
    });
    let volume0 = interface.vof_integral(&domain);
    println!("initial liquid volume {:.12e}", volume0);
    let mut solvers = Solvers::new();
    let mut time = 0.;
    let mut step = 0;
    while time < config.timemax {
        time += integrate(&domain, &config, &mut fluid, &mut interface, &mut solvers).unwrap();
        step += 1;
        if step % 100 == 0 {
            let volume = interface.vof_integral(&domain);
            println!(
                "step {:6} time {:8.4} volume drift {:+.3e}",
                step,
                time,
                volume - volume0
            );
        }
    }
}
