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

//! Error taxonomy of the solver
//!
//! Initialisation failures (configuration, decomposition, spectral plan
//! construction) are fatal and bubble up to the driver; solver degeneracies
//! (singular tri-diagonal rows) are by policy not errors and are handled
//! inside the tri-diagonal solver itself.

use std::io;

use thiserror::Error;

/// All fallible operations in this crate return this error type.
#[derive(Error, Debug)]
pub enum Error {
    /// A required configuration key is absent from the environment
    #[error("missing configuration key `{0}`")]
    MissingConfig(&'static str),
    /// A configuration key exists but cannot be parsed into its target type
    #[error("configuration key `{key}` has invalid value `{value}`")]
    InvalidConfig { key: &'static str, value: String },
    /// Domain or decomposition parameters are inconsistent
    #[error("invalid domain: {0}")]
    InvalidDomain(String),
    /// Restart I/O failure (missing snapshot, malformed NPY payload)
    #[error("restart i/o: {0}")]
    RestartIo(String),
    #[error(transparent)]
    Io(#[from] io::Error),
}

pub type Result<T> = std::result::Result<T, Error>;
