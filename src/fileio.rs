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

//! Restart snapshots in the NPY array format
//!
//! A snapshot is a directory with one file per dataset: the scalars `step`
//! (int32) and `time` (float64), and one float64 array per field, stored
//! globally in row-major order with x innermost. Cell-centred fields and
//! the tangential velocities keep their two x-wall ghost columns so wall
//! values survive a restart; the wall-normal velocity stores its faces.

use std::path::Path;

use ndarray::{Array0, Array2, Array3, ArrayD};
use ndarray_npy::{read_npy, write_npy};

use crate::array::Field;
use crate::config::Config;
use crate::domain::Domain;
use crate::error::{Error, Result};
use crate::fluid::Fluid;
use crate::interface::{self, Interface};

fn io_err<E: std::fmt::Display>(err: E) -> Error {
    Error::RestartIo(err.to_string())
}

/// Gather one field into a dense global array over `ilo..=ihi` in x and
/// the full interior in y (and z).
fn field_to_array(domain: &Domain, field: &Field, ilo: i32, ihi: i32) -> ArrayD<f64> {
    let nx = (ihi - ilo + 1) as usize;
    let my = domain.mysizes[1];
    if domain.ndims == 2 {
        let mut out = Array2::<f64>::zeros((my, nx));
        for j in 0..my {
            for i in 0..nx {
                out[[j, i]] = field.get(ilo + i as i32, j as i32 + 1, 0);
            }
        }
        out.into_dyn()
    } else {
        let mz = domain.mysizes[2];
        let mut out = Array3::<f64>::zeros((mz, my, nx));
        for k in 0..mz {
            for j in 0..my {
                for i in 0..nx {
                    out[[k, j, i]] = field.get(ilo + i as i32, j as i32 + 1, k as i32 + 1);
                }
            }
        }
        out.into_dyn()
    }
}

fn array_to_field(domain: &Domain, data: &ArrayD<f64>, field: &mut Field, ilo: i32, ihi: i32) {
    let nx = (ihi - ilo + 1) as usize;
    let my = domain.mysizes[1];
    if domain.ndims == 2 {
        for j in 0..my {
            for i in 0..nx {
                field.set(ilo + i as i32, j as i32 + 1, 0, data[[j, i]]);
            }
        }
    } else {
        let mz = domain.mysizes[2];
        for k in 0..mz {
            for j in 0..my {
                for i in 0..nx {
                    field.set(
                        ilo + i as i32,
                        j as i32 + 1,
                        k as i32 + 1,
                        data[[k, j, i]],
                    );
                }
            }
        }
    }
}

/// Write a snapshot of the whole state into `dirname`.
pub fn save(
    dirname: &str,
    domain: &Domain,
    fluid: &Fluid,
    interface: &Interface,
    step: i32,
    time: f64,
) -> Result<()> {
    std::fs::create_dir_all(dirname)?;
    let dir = Path::new(dirname);
    let mx = domain.mysizes[0] as i32;
    write_npy(dir.join("step.npy"), &Array0::from_elem((), step)).map_err(io_err)?;
    write_npy(dir.join("time.npy"), &Array0::from_elem((), time)).map_err(io_err)?;
    let datasets: Vec<(&str, &Field, i32, i32)> = vec![
        ("ux", &fluid.ux, 1, mx + 1),
        ("uy", &fluid.uy, 0, mx + 1),
        ("p", &fluid.p, 0, mx + 1),
        ("t", &fluid.temp, 0, mx + 1),
        ("vof", &interface.vof, 0, mx + 1),
    ];
    for (name, field, ilo, ihi) in datasets {
        let array = field_to_array(domain, field, ilo, ihi);
        write_npy(dir.join(format!("{}.npy", name)), &array).map_err(io_err)?;
    }
    if let Some(uz) = fluid.uz.as_ref() {
        let array = field_to_array(domain, uz, 0, mx + 1);
        write_npy(dir.join("uz.npy"), &array).map_err(io_err)?;
    }
    Ok(())
}

/// Read the scalars of a snapshot.
pub fn load_step_time(dirname: &str) -> Result<(i32, f64)> {
    let dir = Path::new(dirname);
    let step: Array0<i32> = read_npy(dir.join("step.npy")).map_err(io_err)?;
    let time: Array0<f64> = read_npy(dir.join("time.npy")).map_err(io_err)?;
    Ok((step.into_scalar(), time.into_scalar()))
}

/// Restore all fields from a snapshot and re-impose boundary conditions.
pub fn load(
    dirname: &str,
    domain: &Domain,
    config: &Config,
    fluid: &mut Fluid,
    interface: &mut Interface,
) -> Result<()> {
    let dir = Path::new(dirname);
    let mx = domain.mysizes[0] as i32;
    let mut datasets: Vec<(&str, &mut Field, i32, i32)> = vec![
        ("ux", &mut fluid.ux, 1, mx + 1),
        ("uy", &mut fluid.uy, 0, mx + 1),
        ("p", &mut fluid.p, 0, mx + 1),
        ("t", &mut fluid.temp, 0, mx + 1),
        ("vof", &mut interface.vof, 0, mx + 1),
    ];
    for (name, field, ilo, ihi) in datasets.iter_mut() {
        let array: ArrayD<f64> = read_npy(dir.join(format!("{}.npy", name))).map_err(io_err)?;
        array_to_field(domain, &array, field, *ilo, *ihi);
    }
    if let Some(uz) = fluid.uz.as_mut() {
        let array: ArrayD<f64> = read_npy(dir.join("uz.npy")).map_err(io_err)?;
        array_to_field(domain, &array, uz, 0, mx + 1);
    }
    fluid.impose_all_boundaries(domain, config);
    interface::boundary_vof(domain, &mut interface.vof);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn snapshot_round_trip() {
        let config = Config::default();
        let domain = Domain::new(2, [16, 8, 1], [1., 1., 0.], 0.).unwrap();
        let mut fluid = Fluid::new(&domain, &config);
        let mut interface = Interface::new(&domain, &config);
        interface.init_vof(&domain, |x, _, _| 0.3 - (x - 0.4).abs());
        for j in 1..=8 {
            for i in 2..=16 {
                fluid.ux.set(i, j, 0, (i * j) as f64 * 1e-3);
            }
        }
        crate::fluid::boundary::ux(&domain, &mut fluid.ux);
        let tmp = std::env::temp_dir().join(format!("vof_flow_io_{}", std::process::id()));
        let dirname = tmp.to_str().unwrap();
        save(dirname, &domain, &fluid, &interface, 42, 1.25).unwrap();
        let (step, time) = load_step_time(dirname).unwrap();
        assert_eq!(step, 42);
        assert!((time - 1.25).abs() < 1e-15);
        let mut fluid2 = Fluid::new(&domain, &config);
        let mut interface2 = Interface::new(&domain, &config);
        load(dirname, &domain, &config, &mut fluid2, &mut interface2).unwrap();
        for j in 1..=8 {
            for i in 1..=17 {
                assert_eq!(fluid.ux.get(i, j, 0), fluid2.ux.get(i, j, 0));
            }
            for i in 1..=16 {
                assert_eq!(interface.vof.get(i, j, 0), interface2.vof.get(i, j, 0));
                assert_eq!(fluid.temp.get(i, j, 0), fluid2.temp.get(i, j, 0));
            }
        }
        std::fs::remove_dir_all(&tmp).unwrap();
    }
}
