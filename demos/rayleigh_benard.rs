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

//! Single-phase Rayleigh-Bénard convection between a hot and a cold wall:
//! runs a short transient and prints the Nusselt number estimated from the
//! wall heat flux.

use vof_flow::{integrate, Config, Domain, Fluid, Interface, Solvers};

fn wall_nusselt(domain: &Domain, fluid: &Fluid) -> f64 {
    // conductive flux through the hot wall, normalised by the conductive
    // reference (unit temperature drop over the domain height)
    let my = domain.mysizes[1] as i32;
    let mut flux = 0.;
    for j in 1..=my {
        let dtdx = (fluid.temp.get(0, j, 0) - fluid.temp.get(1, j, 0)) / domain.dxc(1);
        flux += dtdx * domain.dy;
    }
    flux * domain.lengths[0] / domain.lengths[1]
}

fn main() {
    let config = Config {
        ndims: 2,
        glsizes: [64, 64, 1],
        lengths: [1., 1., 0.],
        ra: 1e5,
        pr: 1.,
        solve_interface: false,
        add_buoyancy: true,
        timemax: 20.,
        ..Config::default()
    };
    let domain = Domain::from_config(&config).unwrap();
    let mut fluid = Fluid::new(&domain, &config);
    let mut interface = Interface::new(&domain, &config);
    let mut solvers = Solvers::new();
    let mut time = 0.;
    let mut step = 0;
    while time < config.timemax {
        time += integrate(&domain, &config, &mut fluid, &mut interface, &mut solvers).unwrap();
        step += 1;
        if step % 200 == 0 {
            println!(
                "step {:6} time {:8.3} Nu {:7.4} max|div| {:.3e}",
                step,
                time,
                wall_nusselt(&domain, &fluid),
                fluid.max_divergence(&domain)
            );
        }
    }
    println!("final Nu: {:.4}", wall_nusselt(&domain, &fluid));
}
