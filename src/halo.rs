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

//! Halo exchange along the decomposed (periodic) directions
//!
//! Each exchange sends a slab of the requested width to the positive and
//! negative neighbours of one axis. The y slab spans the full x extent of
//! the field (wall columns included), the z slab additionally spans the y
//! halos, so corner ghosts are complete once both axes have run. Physical
//! wall conditions on the x ghosts are imposed afterwards by the per-field
//! boundary routines of the owning modules.

use crate::array::Field;
use crate::domain::Domain;

/// Exchange the y halos of `field`, `width` layers deep.
pub fn exchange_y(domain: &Domain, field: &mut Field, width: i32) {
    let jsize = domain.mysizes[1] as i32;
    let (klo, khi) = if domain.ndims == 3 {
        (1, domain.mysizes[2] as i32)
    } else {
        (0, 0)
    };
    let (ilo, ihi) = (field.lo[0], field.hi[0]);
    let count = ((ihi - ilo + 1) * (khi - klo + 1) * width) as usize;
    // slab towards the positive neighbour fills its negative ghosts
    let mut to_pos = Vec::with_capacity(count);
    let mut to_neg = Vec::with_capacity(count);
    for g in 1..=width {
        for k in klo..=khi {
            for i in ilo..=ihi {
                to_pos.push(field.get(i, jsize - width + g, k));
                to_neg.push(field.get(i, g, k));
            }
        }
    }
    let from_neg = domain.comm.sendrecv(0, true, to_pos);
    let from_pos = domain.comm.sendrecv(0, false, to_neg);
    let mut cursor = 0;
    for g in 1..=width {
        for k in klo..=khi {
            for i in ilo..=ihi {
                field.set(i, g - width, k, from_neg[cursor]);
                field.set(i, jsize + g, k, from_pos[cursor]);
                cursor += 1;
            }
        }
    }
}

/// Exchange the z halos of `field` (three dimensions only); the slab spans
/// the y ghosts filled by [`exchange_y`] so corners are completed here.
pub fn exchange_z(domain: &Domain, field: &mut Field, width: i32) {
    debug_assert_eq!(domain.ndims, 3);
    let ksize = domain.mysizes[2] as i32;
    let (ilo, ihi) = (field.lo[0], field.hi[0]);
    let (jlo, jhi) = (field.lo[1], field.hi[1]);
    let count = ((ihi - ilo + 1) * (jhi - jlo + 1) * width) as usize;
    let mut to_pos = Vec::with_capacity(count);
    let mut to_neg = Vec::with_capacity(count);
    for g in 1..=width {
        for j in jlo..=jhi {
            for i in ilo..=ihi {
                to_pos.push(field.get(i, j, ksize - width + g));
                to_neg.push(field.get(i, j, g));
            }
        }
    }
    let from_neg = domain.comm.sendrecv(1, true, to_pos);
    let from_pos = domain.comm.sendrecv(1, false, to_neg);
    let mut cursor = 0;
    for g in 1..=width {
        for j in jlo..=jhi {
            for i in ilo..=ihi {
                field.set(i, j, g - width, from_neg[cursor]);
                field.set(i, j, ksize + g, from_pos[cursor]);
                cursor += 1;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn periodic_wrap_fills_ghosts_2d() {
        let domain = Domain::new(2, [4, 6, 1], [1., 1., 0.], 0.).unwrap();
        let mut field = Field::new([0, -1, 0], [5, 8, 0]);
        for j in 1..=6 {
            for i in 0..=5 {
                field.set(i, j, 0, (10 * j + i) as f64);
            }
        }
        exchange_y(&domain, &mut field, 2);
        for i in 0..=5 {
            assert_eq!(field.get(i, 0, 0), field.get(i, 6, 0));
            assert_eq!(field.get(i, -1, 0), field.get(i, 5, 0));
            assert_eq!(field.get(i, 7, 0), field.get(i, 1, 0));
            assert_eq!(field.get(i, 8, 0), field.get(i, 2, 0));
        }
    }

    #[test]
    fn corner_ghosts_complete_after_both_axes_3d() {
        let domain = Domain::new(3, [4, 4, 4], [1., 1., 1.], 0.).unwrap();
        let mut field = Field::new([0, 0, 0], [5, 5, 5]);
        for k in 1..=4 {
            for j in 1..=4 {
                for i in 0..=5 {
                    field.set(i, j, k, (100 * k + 10 * j + i) as f64);
                }
            }
        }
        exchange_y(&domain, &mut field, 1);
        exchange_z(&domain, &mut field, 1);
        // edge ghost in both y and z picks up the doubly wrapped interior
        assert_eq!(field.get(2, 0, 0), field.get(2, 4, 4));
        assert_eq!(field.get(2, 5, 5), field.get(2, 1, 1));
        assert_eq!(field.get(2, 0, 5), field.get(2, 4, 1));
    }
}
