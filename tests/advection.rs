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

//! Planar advection of the diffuse interface by a uniform velocity:
//! the profile must translate without losing mass or diffusing.

use vof_flow::interface::{curvature, flux};
use vof_flow::{Config, Domain, Fluid, Interface};

/// Position where the centre-row VOF profile first crosses `level`,
/// linearly interpolated between cell centres.
fn crossing(domain: &Domain, interface: &Interface, level: f64) -> f64 {
    let mx = domain.mysizes[0] as i32;
    let j = domain.mysizes[1] as i32 / 2;
    for i in 2..=mx {
        let lo = interface.vof.get(i - 1, j, 0);
        let hi = interface.vof.get(i, j, 0);
        if lo <= level && hi > level {
            let frac = (level - lo) / (hi - lo);
            return domain.xc(i - 1) + frac * (domain.xc(i) - domain.xc(i - 1));
        }
    }
    f64::NAN
}

/// Width of the 0.01 - 0.99 transition band on the rising edge.
fn transition_width(domain: &Domain, interface: &Interface) -> f64 {
    crossing(domain, interface, 0.99) - crossing(domain, interface, 0.01)
}

/// Centroid of the liquid along x on the centre row.
fn centroid(domain: &Domain, interface: &Interface) -> f64 {
    let mx = domain.mysizes[0] as i32;
    let j = domain.mysizes[1] as i32 / 2;
    let mut mass = 0.;
    let mut moment = 0.;
    for i in 1..=mx {
        let v = interface.vof.get(i, j, 0);
        mass += v * domain.dxf(i);
        moment += v * domain.dxf(i) * domain.xc(i);
    }
    moment / mass
}

#[test]
fn planar_profile_translates_without_diffusing() {
    let config = Config {
        solve_temp: false,
        ..Config::default()
    };
    // long periodic-free lane in x; the slab stays away from the walls
    let domain = Domain::new(2, [128, 8, 1], [2., 0.125, 0.], 0.).unwrap();
    let mut fluid = Fluid::new(&domain, &config);
    // uniform unit velocity everywhere, wall faces included: the test
    // drives the transport kernel directly, not the full projection
    fluid.ux.fill(1.);
    let mut interface = Interface::new(&domain, &config);
    // liquid slab between x = 0.4 and x = 0.8
    interface.init_vof(&domain, |x, _, _| 0.2 - (x - 0.6).abs());
    let mass_before = interface.vof_integral(&domain);
    let width_before = transition_width(&domain, &interface);
    let centroid_before = centroid(&domain, &interface);

    // advance to t = 0.25 at a CFL of one quarter
    let dt = 0.25 * domain.dx;
    let nsteps = (0.25 / dt).round() as usize;
    for _ in 0..nsteps {
        for rkstep in 0..3 {
            curvature::compute_curvature_tensor(&domain, &mut interface);
            flux::update_vof(&domain, rkstep, dt, &fluid, &mut interface);
        }
    }

    let mass_after = interface.vof_integral(&domain);
    let width_after = transition_width(&domain, &interface);
    let centroid_after = centroid(&domain, &interface);

    // mass conservation to round-off
    assert!(
        (mass_after - mass_before).abs() < 1e-12 * (128. * 8.),
        "mass drift {}",
        mass_after - mass_before
    );
    // the slab travelled with the flow
    assert!(
        (centroid_after - centroid_before - 0.25).abs() < 0.5 * domain.dx,
        "centroid moved {}",
        centroid_after - centroid_before
    );
    // sharpness must not degrade by more than ten percent
    assert!(
        width_after <= 1.1 * width_before + 1e-12,
        "transition widened from {} to {}",
        width_before,
        width_after
    );
    // the interior stays inside the physical bounds
    let mut min_vof = f64::MAX;
    let mut max_vof = f64::MIN;
    for j in 1..=8 {
        for i in 1..=128 {
            let v = interface.vof.get(i, j, 0);
            min_vof = min_vof.min(v);
            max_vof = max_vof.max(v);
        }
    }
    assert!(min_vof > -1e-8 && max_vof < 1. + 1e-8);
}
