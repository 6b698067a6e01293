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

//! Halo exchange and wall conditions of the flow fields
//!
//! Every mutation of a flow field ends here before downstream readers see
//! it: periodic halos are exchanged along the decomposed directions, then
//! the x-wall ghosts are written. The wall-normal velocity is pinned to
//! zero on both walls; the tangential velocities reflect oddly (no-slip)
//! or evenly (free-slip); pressure-like fields copy their first interior
//! value (homogeneous Neumann).

use crate::array::Field;
use crate::domain::Domain;
use crate::halo;

fn zrange(domain: &Domain, field: &Field) -> (i32, i32) {
    if domain.ndims == 3 {
        (field.lo[2], field.hi[2])
    } else {
        (0, 0)
    }
}

/// Wall-normal velocity: halos plus the no-penetration walls.
pub fn ux(domain: &Domain, ux: &mut Field) {
    halo::exchange_y(domain, ux, 1);
    if domain.ndims == 3 {
        halo::exchange_z(domain, ux, 1);
    }
    let mx = domain.mysizes[0] as i32;
    let (klo, khi) = zrange(domain, ux);
    for k in klo..=khi {
        for j in ux.lo[1]..=ux.hi[1] {
            ux.set(1, j, k, 0.);
            ux.set(mx + 1, j, k, 0.);
        }
    }
}

/// Tangential velocity on y faces: halos plus reflected wall ghosts.
pub fn uy(domain: &Domain, uy: &mut Field, free_slip: bool) {
    halo::exchange_y(domain, uy, 1);
    if domain.ndims == 3 {
        halo::exchange_z(domain, uy, 1);
    }
    let sign = if free_slip { 1. } else { -1. };
    let mx = domain.mysizes[0] as i32;
    let (klo, khi) = zrange(domain, uy);
    for k in klo..=khi {
        for j in uy.lo[1]..=uy.hi[1] {
            let inner = uy.get(1, j, k);
            uy.set(0, j, k, sign * inner);
            let inner = uy.get(mx, j, k);
            uy.set(mx + 1, j, k, sign * inner);
        }
    }
}

/// Tangential velocity on z faces; same wall rule as [`uy`].
pub fn uz(domain: &Domain, uz: &mut Field, free_slip: bool) {
    halo::exchange_y(domain, uz, 1);
    halo::exchange_z(domain, uz, 1);
    let sign = if free_slip { 1. } else { -1. };
    let mx = domain.mysizes[0] as i32;
    for k in uz.lo[2]..=uz.hi[2] {
        for j in uz.lo[1]..=uz.hi[1] {
            let inner = uz.get(1, j, k);
            uz.set(0, j, k, sign * inner);
            let inner = uz.get(mx, j, k);
            uz.set(mx + 1, j, k, sign * inner);
        }
    }
}

/// Pressure-like fields (pressure and scalar potential): halos plus
/// homogeneous Neumann walls.
pub fn p(domain: &Domain, p: &mut Field) {
    halo::exchange_y(domain, p, 1);
    if domain.ndims == 3 {
        halo::exchange_z(domain, p, 1);
    }
    let mx = domain.mysizes[0] as i32;
    let (klo, khi) = zrange(domain, p);
    for k in klo..=khi {
        for j in p.lo[1]..=p.hi[1] {
            let inner = p.get(1, j, k);
            p.set(0, j, k, inner);
            let inner = p.get(mx, j, k);
            p.set(mx + 1, j, k, inner);
        }
    }
}
