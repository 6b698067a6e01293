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

//! Curvature of a diffuse circular drop: interface cells must recover the
//! inverse radius with the convex-liquid sign convention.

use vof_flow::interface::curvature;
use vof_flow::{Config, Domain, Interface};

#[test]
fn diffuse_circle_recovers_inverse_radius() {
    let config = Config::default();
    let domain = Domain::new(2, [128, 128, 1], [1., 1., 0.], 0.).unwrap();
    let mut interface = Interface::new(&domain, &config);
    let radius = 0.25;
    interface.init_vof(&domain, |x, y, _| {
        radius - ((x - 0.5).powi(2) + (y - 0.5).powi(2)).sqrt()
    });
    curvature::compute_curvature_tensor(&domain, &mut interface);

    // convex liquid of radius 0.25: kappa = 1 / R = 4
    let expected = 1. / radius;
    let mut err2 = 0.;
    let mut ref2 = 0.;
    let mut cells = 0;
    for j in 1..=128 {
        for i in 1..=128 {
            let vof = interface.vof.get(i, j, 0);
            if vof <= 0.1 || vof >= 0.9 {
                continue;
            }
            let kappa = interface.curv.get(i, j, 0);
            err2 += (kappa - expected).powi(2);
            ref2 += expected * expected;
            cells += 1;
        }
    }
    assert!(cells > 50, "too few interface cells: {}", cells);
    let l2 = (err2 / ref2).sqrt();
    assert!(l2 < 0.02, "relative curvature error {}", l2);

    // the normals follow the VOF gradient into the liquid
    let (i, j) = (96, 64); // on the +x side of the circle
    let cell = interface.normal.at(i, j, 0);
    assert!(
        cell[0] < -0.9,
        "normal should align with -x on the +x rim, got {:?}",
        &cell[..2]
    );
}
