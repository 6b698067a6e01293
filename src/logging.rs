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

//! Periodic log line: integration state and sanity numbers
//!
//! Emits the extrema the solver itself never checks (a NaN or a runaway
//! velocity shows up here first), the VOF bounds and integral, and the
//! maximum divergence left by the projection.

use log::{info, warn};

use crate::config::Config;
use crate::domain::Domain;
use crate::fluid::Fluid;
use crate::interface::Interface;

struct Extrema {
    min: f64,
    max: f64,
}

fn scan(domain: &Domain, field: &crate::array::Field) -> Extrema {
    let mx = domain.mysizes[0] as i32;
    let my = domain.mysizes[1] as i32;
    let (klo, khi) = if domain.ndims == 3 {
        (1, domain.mysizes[2] as i32)
    } else {
        (0, 0)
    };
    let mut extrema = Extrema {
        min: f64::MAX,
        max: f64::MIN,
    };
    for k in klo..=khi {
        for j in 1..=my {
            for i in 1..=mx {
                let v = field.get(i, j, k);
                extrema.min = extrema.min.min(v);
                extrema.max = extrema.max.max(v);
            }
        }
    }
    extrema
}

/// Emit one log line for the finished step.
pub fn emit(
    domain: &Domain,
    config: &Config,
    fluid: &Fluid,
    interface: &Interface,
    step: i32,
    time: f64,
    dt: f64,
) {
    let ux = scan(domain, &fluid.ux);
    let uy = scan(domain, &fluid.uy);
    let temp = scan(domain, &fluid.temp);
    let max_div = fluid.max_divergence(domain);
    info!(
        "step {:8} time {:.6e} dt {:.3e} ux [{:+.3e}, {:+.3e}] uy [{:+.3e}, {:+.3e}] temp [{:+.3e}, {:+.3e}] div {:.3e}",
        step, time, dt, ux.min, ux.max, uy.min, uy.max, temp.min, temp.max, max_div
    );
    if config.solve_interface {
        let vof = scan(domain, &interface.vof);
        info!(
            "          vof [{:.6e}, {:.6e}] volume {:.12e}",
            vof.min,
            vof.max,
            interface.vof_integral(domain)
        );
        if vof.min < -1e-12 || vof.max > 1. + 1e-12 {
            warn!("vof leaves [0, 1]: [{:e}, {:e}]", vof.min, vof.max);
        }
    }
    if !(ux.max.is_finite() && uy.max.is_finite() && temp.max.is_finite()) {
        warn!("non-finite field values at step {}", step);
    }
}
