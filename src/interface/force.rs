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

//! Continuum-surface-force model of surface tension
//!
//! The body force at a velocity face is `sigma kappa grad(vof)` with the
//! curvature averaged from the two adjacent cells; it vanishes away from
//! the interface together with the VOF gradient.

use super::Interface;
use crate::domain::Domain;

/// Rebuild the face-centred surface-tension force from the current VOF and
/// curvature fields.
pub fn compute_surface_force(domain: &Domain, interface: &mut Interface) {
    let mx = domain.mysizes[0] as i32;
    let my = domain.mysizes[1] as i32;
    let (klo, khi) = if domain.ndims == 3 {
        (1, domain.mysizes[2] as i32)
    } else {
        (0, 0)
    };
    let tension = interface.tension;
    let dy = domain.dy;
    let vof = &interface.vof;
    let curv = &interface.curv;
    let ifrcx = &mut interface.ifrcx;
    for k in klo..=khi {
        for j in 1..=my {
            for i in 2..=mx {
                let grad = (vof.get(i, j, k) - vof.get(i - 1, j, k)) / domain.dxc(i);
                let kappa = 0.5 * (curv.get(i - 1, j, k) + curv.get(i, j, k));
                ifrcx.set(i, j, k, tension * grad * kappa);
            }
        }
    }
    let ifrcy = &mut interface.ifrcy;
    for k in klo..=khi {
        for j in 1..=my {
            for i in 1..=mx {
                let grad = (vof.get(i, j, k) - vof.get(i, j - 1, k)) / dy;
                let kappa = 0.5 * (curv.get(i, j - 1, k) + curv.get(i, j, k));
                ifrcy.set(i, j, k, tension * grad * kappa);
            }
        }
    }
    if domain.ndims == 3 {
        let dz = domain.dz;
        let mz = domain.mysizes[2] as i32;
        let ifrcz = interface.ifrcz.as_mut().unwrap();
        for k in 1..=mz {
            for j in 1..=my {
                for i in 1..=mx {
                    let grad = (vof.get(i, j, k) - vof.get(i, j, k - 1)) / dz;
                    let kappa = 0.5 * (curv.get(i, j, k - 1) + curv.get(i, j, k));
                    ifrcz.set(i, j, k, tension * grad * kappa);
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;
    use crate::interface::curvature::compute_curvature_tensor;
    use crate::interface::Interface;

    #[test]
    fn force_vanishes_away_from_interface_and_without_tension() {
        let config = Config {
            tension: 1.,
            ..Config::default()
        };
        let domain = Domain::new(2, [32, 32, 1], [1., 1., 0.], 0.).unwrap();
        let mut interface = Interface::new(&domain, &config);
        interface.init_vof(&domain, |x, y, _| {
            0.2 - ((x - 0.5).powi(2) + (y - 0.5).powi(2)).sqrt()
        });
        compute_curvature_tensor(&domain, &mut interface);
        compute_surface_force(&domain, &mut interface);
        // near the domain corner the VOF gradient is negligible
        assert!(interface.ifrcx.get(2, 2, 0).abs() < 1e-12);
        // on the circle the force is finite
        let mut max_force: f64 = 0.;
        for j in 1..=32 {
            for i in 2..=32 {
                max_force = max_force.max(interface.ifrcx.get(i, j, 0).abs());
            }
        }
        assert!(max_force > 1., "expected a finite capillary force");

        let config = Config {
            tension: 0.,
            ..config
        };
        let mut no_tension = Interface::new(&domain, &config);
        no_tension.init_vof(&domain, |x, y, _| {
            0.2 - ((x - 0.5).powi(2) + (y - 0.5).powi(2)).sqrt()
        });
        compute_curvature_tensor(&domain, &mut no_tension);
        compute_surface_force(&domain, &mut no_tension);
        for j in 1..=32 {
            for i in 2..=32 {
                assert_eq!(no_tension.ifrcx.get(i, j, 0), 0.);
            }
        }
    }
}
