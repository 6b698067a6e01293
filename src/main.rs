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

//! Simulation driver
//!
//! Loads the configuration from the environment, builds or restores the
//! state, then steps until the simulation time or wall-clock budget runs
//! out, emitting logs and snapshots on their configured schedules.

use std::time::Instant;

use anyhow::Context;
use log::info;

use vof_flow::{fileio, integrate, logging, Config, Domain, Fluid, Interface, Solvers};

fn main() -> anyhow::Result<()> {
    env_logger::init();
    let wtime_start = Instant::now();
    let config = Config::from_env().context("loading configuration")?;
    let domain = Domain::from_config(&config).context("building domain")?;
    let mut fluid = Fluid::new(&domain, &config);
    let mut interface = Interface::new(&domain, &config);
    let (mut step, mut time) = if config.restart_sim {
        let (step, time) = fileio::load_step_time(&config.restart_dir)
            .context("reading restart scalars")?;
        fileio::load(
            &config.restart_dir,
            &domain,
            &config,
            &mut fluid,
            &mut interface,
        )
        .context("reading restart fields")?;
        info!("restarted from `{}` at step {}", config.restart_dir, step);
        (step, time)
    } else {
        // default initial interface: a liquid drop in the lower half
        let lengths = domain.lengths;
        interface.init_vof(&domain, |x, y, _| {
            0.25 * lengths[0] - ((x - 0.5 * lengths[0]).powi(2) + (y - 0.5 * lengths[1]).powi(2)).sqrt()
        });
        (0, 0.)
    };
    let mut solvers = Solvers::new();
    let mut log_next = time + config.log_rate;
    let mut save_next = time + config.save_rate;
    let mut stat_next = time.max(config.stat_after) + config.stat_rate;
    loop {
        let dt = integrate(&domain, &config, &mut fluid, &mut interface, &mut solvers)?;
        step += 1;
        time += dt;
        if log_next < time {
            logging::emit(&domain, &config, &fluid, &interface, step, time, dt);
            log_next += config.log_rate;
        }
        if save_next < time {
            fileio::save(&config.restart_dir, &domain, &fluid, &interface, step, time)
                .context("writing snapshot")?;
            save_next += config.save_rate;
        }
        if stat_next < time {
            // statistics collection hooks in here; the schedule cursor is
            // maintained so an external collector sees regular intervals
            stat_next += config.stat_rate;
        }
        if time > config.timemax {
            info!("simulation time limit reached at step {}", step);
            break;
        }
        if wtime_start.elapsed().as_secs_f64() > config.wtimemax {
            info!("wall-clock limit reached at step {}", step);
            break;
        }
    }
    fileio::save(&config.restart_dir, &domain, &fluid, &interface, step, time)
        .context("writing final snapshot")?;
    Ok(())
}
