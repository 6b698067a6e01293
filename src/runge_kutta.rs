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

//! Coefficients of the three-stage low-storage Runge-Kutta scheme

/// Coefficients of one Runge-Kutta stage.
///
/// `alpha` weighs the source of the current stage, `beta` the stashed
/// source of the previous stage, and `gamma = alpha + beta` multiplies the
/// terms treated implicitly (pressure gradient, implicit diffusion).
#[derive(Clone, Copy)]
pub struct RkCoef {
    pub alpha: f64,
    pub beta: f64,
    pub gamma: f64,
}

/// Number of sub-stages per time step.
pub const RKSTEP_MAX: usize = 3;

/// The stage coefficients; the `alpha + beta` sum over all stages is unity.
pub const RKCOEFS: [RkCoef; RKSTEP_MAX] = [
    RkCoef {
        alpha: 32. / 60.,
        beta: 0. / 60.,
        gamma: 32. / 60.,
    },
    RkCoef {
        alpha: 25. / 60.,
        beta: -17. / 60.,
        gamma: 8. / 60.,
    },
    RkCoef {
        alpha: 45. / 60.,
        beta: -25. / 60.,
        gamma: 20. / 60.,
    },
];

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn stages_advance_one_unit() {
        let total: f64 = RKCOEFS.iter().map(|c| c.alpha + c.beta).sum();
        assert!((total - 1.).abs() < 1e-15);
        for c in RKCOEFS.iter() {
            assert!((c.gamma - c.alpha - c.beta).abs() < 1e-15);
        }
    }
}
