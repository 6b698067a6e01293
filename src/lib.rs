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

//! This crate simulates incompressible, thermally buoyant two-phase flow
//! on a staggered Cartesian mesh (2D or 3D). The phase interface is
//! carried as a diffuse volume-of-fluid field; momentum, temperature and
//! VOF advance together through a three-stage low-storage Runge-Kutta
//! projection scheme with an FFT-accelerated Poisson solve for the scalar
//! potential.
//!
//! Usage
//! -----
//! Build the domain and fields, then step the integrator:
//!
//! ```no_run
//! use vof_flow::{integrate, Config, Domain, Fluid, Interface, Solvers};
//!
//! let config = Config::default();
//! let domain = Domain::from_config(&config).unwrap();
//! let mut fluid = Fluid::new(&domain, &config);
//! let mut interface = Interface::new(&domain, &config);
//! interface.init_vof(&domain, |x, y, _| {
//!     0.2 - ((x - 0.5f64).powi(2) + (y - 0.5f64).powi(2)).sqrt()
//! });
//! let mut solvers = Solvers::new();
//! let mut time = 0.;
//! while time < config.timemax {
//!     time += integrate(&domain, &config, &mut fluid, &mut interface, &mut solvers).unwrap();
//! }
//! ```

pub mod array;
pub mod config;
pub mod dct;
pub mod decomp;
pub mod domain;
pub mod error;
pub mod fileio;
pub mod fluid;
pub mod halo;
pub mod integrate;
pub mod interface;
pub mod linsys;
pub mod logging;
pub mod poisson;
pub mod runge_kutta;
pub mod tdm;
pub mod temperature;

pub use config::Config;
pub use domain::Domain;
pub use error::{Error, Result};
pub use fluid::Fluid;
pub use integrate::{integrate, Solvers};
pub use interface::Interface;
pub use poisson::PoissonSolver;
