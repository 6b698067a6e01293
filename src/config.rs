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

//! Run-time configuration, loaded from an environment-style key/value store

use std::env;
use std::str::FromStr;

use crate::error::{Error, Result};

/// All run-time parameters of a simulation.
///
/// Loaded once at start-up by [`Config::from_env`]; the physical and
/// numerical keys follow the normalisation of the governing equations
/// (momentum diffusivity `sqrt(Pr / Ra)`, temperature diffusivity
/// `1 / sqrt(Pr * Ra)`, unit temperature drop between the walls).
#[derive(Clone, Debug)]
pub struct Config {
    /// Spatial dimension, 2 or 3
    pub ndims: usize,
    /// Global number of cells in each direction
    pub glsizes: [usize; 3],
    /// Domain extent in each direction
    pub lengths: [f64; 3],
    /// Wall-normal grid clustering factor (0 gives a uniform x grid)
    pub stretch: f64,
    /// Restart from a stored snapshot instead of generating initial fields
    pub restart_sim: bool,
    /// Directory holding / receiving restart artifacts
    pub restart_dir: String,
    /// Rayleigh number
    pub ra: f64,
    /// Prandtl number
    pub pr: f64,
    /// Surface tension coefficient sigma
    pub tension: f64,
    /// Safety factor of the advective time-step bound
    pub coef_dt_adv: f64,
    /// Safety factor of the diffusive time-step bound
    pub coef_dt_dif: f64,
    /// Implicit treatment of momentum diffusion, per axis
    pub m_implicit: [bool; 3],
    /// Implicit treatment of temperature diffusion, per axis
    pub t_implicit: [bool; 3],
    /// Integrate the temperature field
    pub solve_temp: bool,
    /// Integrate the VOF field and apply surface tension
    pub solve_interface: bool,
    /// Include the Boussinesq body force in the wall-normal momentum source
    pub add_buoyancy: bool,
    /// Force the general (DFT) Poisson solver even on a uniform x grid
    pub use_stretched_grid: bool,
    /// Impose free-slip instead of no-slip walls on the tangential velocities
    pub free_slip: bool,
    /// Temperature imposed on the x=0 wall
    pub temp_xm: f64,
    /// Temperature imposed on the x=lx wall; `temp_xm - temp_xp` must be 1
    pub temp_xp: f64,
    /// Simulation time at which the run terminates
    pub timemax: f64,
    /// Wall-clock seconds after which the run terminates
    pub wtimemax: f64,
    /// Interval between statistics collections
    pub stat_rate: f64,
    /// Simulation time after which statistics collection starts
    pub stat_after: f64,
    /// Interval between snapshot saves
    pub save_rate: f64,
    /// Interval between log emissions
    pub log_rate: f64,
}

fn get_req<T: FromStr>(key: &'static str) -> Result<T> {
    let value = env::var(key).map_err(|_| Error::MissingConfig(key))?;
    value
        .parse()
        .map_err(|_| Error::InvalidConfig { key, value })
}

fn get_opt<T: FromStr>(key: &'static str, default: T) -> Result<T> {
    match env::var(key) {
        Ok(value) => value
            .parse()
            .map_err(|_| Error::InvalidConfig { key, value }),
        Err(_) => Ok(default),
    }
}

impl Config {
    /// Load the configuration from the process environment.
    ///
    /// Physical and domain keys are required; the remaining keys fall back
    /// to the defaults of [`Config::default`]. `We` is accepted as an
    /// alias for the surface tension (`sigma = 1 / We`).
    pub fn from_env() -> Result<Config> {
        let def = Config::default();
        let ndims: usize = get_opt("ndims", 2)?;
        if ndims != 2 && ndims != 3 {
            return Err(Error::InvalidConfig {
                key: "ndims",
                value: ndims.to_string(),
            });
        }
        let glksize = if ndims == 3 { get_req("glksize")? } else { 1 };
        let lz = if ndims == 3 { get_req("lz")? } else { 0. };
        let tension = match env::var("tension") {
            Ok(value) => value.parse().map_err(|_| Error::InvalidConfig {
                key: "tension",
                value,
            })?,
            Err(_) => {
                let we: f64 = get_opt("We", f64::INFINITY)?;
                if we.is_finite() {
                    1. / we
                } else {
                    0.
                }
            }
        };
        let config = Config {
            ndims,
            glsizes: [get_req("glisize")?, get_req("gljsize")?, glksize],
            lengths: [get_req("lx")?, get_req("ly")?, lz],
            stretch: get_opt("stretch", def.stretch)?,
            restart_sim: get_opt("restart_sim", def.restart_sim)?,
            restart_dir: get_opt("restart_dir", def.restart_dir)?,
            ra: get_req("Ra")?,
            pr: get_req("Pr")?,
            tension,
            coef_dt_adv: get_req("coef_dt_adv")?,
            coef_dt_dif: get_req("coef_dt_dif")?,
            m_implicit: [
                get_opt("implicitx", false)?,
                get_opt("implicity", false)?,
                get_opt("implicitz", false)?,
            ],
            t_implicit: [
                get_opt("t_implicit_x", false)?,
                get_opt("t_implicit_y", false)?,
                get_opt("t_implicit_z", false)?,
            ],
            solve_temp: get_opt("solve_temp", def.solve_temp)?,
            solve_interface: get_opt("solve_interface", def.solve_interface)?,
            add_buoyancy: get_opt("add_buoyancy", def.add_buoyancy)?,
            use_stretched_grid: get_opt("use_stretched_grid", def.use_stretched_grid)?,
            free_slip: get_opt("free_slip", def.free_slip)?,
            temp_xm: get_opt("temp_xm", def.temp_xm)?,
            temp_xp: get_opt("temp_xp", def.temp_xp)?,
            timemax: get_req("timemax")?,
            wtimemax: get_req("wtimemax")?,
            stat_rate: get_opt("stat_rate", def.stat_rate)?,
            stat_after: get_opt("stat_after", def.stat_after)?,
            save_rate: get_opt("save_rate", def.save_rate)?,
            log_rate: get_opt("log_rate", def.log_rate)?,
        };
        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> Result<()> {
        if (self.temp_xm - self.temp_xp - 1.).abs() > 1e-12 {
            return Err(Error::InvalidConfig {
                key: "temp_xm",
                value: format!(
                    "temp_xm - temp_xp = {} but the equations assume a unit drop",
                    self.temp_xm - self.temp_xp
                ),
            });
        }
        Ok(())
    }

    /// Momentum diffusivity `sqrt(Pr / Ra)`.
    pub fn m_dif(&self) -> f64 {
        self.pr.sqrt() / self.ra.sqrt()
    }

    /// Temperature diffusivity `1 / sqrt(Pr * Ra)`.
    pub fn t_dif(&self) -> f64 {
        1. / (self.pr.sqrt() * self.ra.sqrt())
    }
}

impl Default for Config {
    fn default() -> Self {
        Config {
            ndims: 2,
            glsizes: [32, 32, 1],
            lengths: [1., 1., 0.],
            stretch: 0.,
            restart_sim: false,
            restart_dir: "restart".to_string(),
            ra: 1e6,
            pr: 1.,
            tension: 0.,
            coef_dt_adv: 0.95,
            coef_dt_dif: 0.95,
            m_implicit: [false; 3],
            t_implicit: [false; 3],
            solve_temp: true,
            solve_interface: true,
            add_buoyancy: true,
            use_stretched_grid: false,
            free_slip: false,
            temp_xm: 0.5,
            temp_xp: -0.5,
            timemax: 1.,
            wtimemax: 600.,
            stat_rate: 1e2,
            stat_after: 0.,
            save_rate: 1e2,
            log_rate: 1e-1,
        }
    }
}
