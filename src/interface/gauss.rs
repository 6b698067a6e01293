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

//! Gauss-Legendre quadrature generator
//!
//! Nodes are the roots of the N-th Legendre polynomial, built from the
//! recurrence `n L_n = (2n-1) x L_{n-1} - (n-1) L_{n-2}`, bracketed by a
//! fine scan from -1 and polished by Newton iterations with deflation of
//! the roots already found. Weights follow from
//! `w_i = 2 / ((1 - x_i^2) L_N'(x_i)^2)`.

/// Quadrature rule on an interval.
#[derive(Clone)]
pub struct GaussQuad {
    pub points: Vec<f64>,
    pub weights: Vec<f64>,
}

/// Coefficients of the n-th Legendre polynomial, constant term first.
fn legendre(n: usize) -> Vec<f64> {
    match n {
        0 => vec![1.],
        1 => vec![0., 1.],
        _ => {
            let f1 = legendre(n - 1);
            let f2 = legendre(n - 2);
            let mut f0 = vec![0.; n + 1];
            for (i, &c) in f1.iter().enumerate() {
                f0[i + 1] += (2. * n as f64 - 1.) / n as f64 * c;
            }
            for (i, &c) in f2.iter().enumerate() {
                f0[i] -= (n as f64 - 1.) / n as f64 * c;
            }
            f0
        }
    }
}

fn derivative(f: &[f64]) -> Vec<f64> {
    (1..f.len()).map(|i| i as f64 * f[i]).collect()
}

fn eval(f: &[f64], x: f64) -> f64 {
    f.iter().rev().fold(0., |acc, &c| acc * x + c)
}

fn find_roots(n: usize, f: &[f64], fp: &[f64]) -> Vec<f64> {
    // bracket each root by scanning for sign changes; the step is fine
    // enough that consecutive roots land in distinct brackets
    let dx = 2. / (100. * n as f64).powi(2);
    let mut roots = Vec::with_capacity(n);
    let mut lx = -1.;
    let mut lval = eval(f, lx);
    while roots.len() < n {
        let rx = lx + dx;
        let rval = eval(f, rx);
        if lval * rval < 0. {
            roots.push(0.5 * (lx + rx));
        }
        lx = rx;
        lval = rval;
    }
    // Newton with deflation of the roots found so far
    for i in 0..n {
        for _ in 0..10_000 {
            let root = roots[i];
            let local_f = eval(f, root);
            let local_fp = eval(fp, root);
            let defl: f64 = roots[..i].iter().map(|&r| 1. / (root - r)).sum();
            let next = root - local_f / (local_fp - local_f * defl);
            let residual = (next - roots[i]).abs();
            roots[i] = next;
            if residual < f64::EPSILON {
                break;
            }
        }
    }
    roots
}

impl GaussQuad {
    /// The n-point rule on `[-1, 1]`.
    pub fn new(n: usize) -> GaussQuad {
        assert!(n >= 1);
        let f = legendre(n);
        let fp = derivative(&f);
        let points = find_roots(n, &f, &fp);
        let weights = points
            .iter()
            .map(|&x| 2. / (1. - x * x) / eval(&fp, x).powi(2))
            .collect();
        GaussQuad { points, weights }
    }

    /// Affine map of the rule onto `[xm, xp]`.
    pub fn mapped(n: usize, xm: f64, xp: f64) -> GaussQuad {
        let base = GaussQuad::new(n);
        GaussQuad {
            points: base
                .points
                .iter()
                .map(|&x| 0.5 * (xp - xm) * x + 0.5 * (xp + xm))
                .collect(),
            weights: base.weights.iter().map(|&w| 0.5 * (xp - xm) * w).collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn two_point_rule_is_exact() {
        let quad = GaussQuad::new(2);
        let expected = 1. / 3f64.sqrt();
        assert!((quad.points[0] + expected).abs() < 1e-12);
        assert!((quad.points[1] - expected).abs() < 1e-12);
        assert!((quad.weights[0] - 1.).abs() < 1e-12);
        assert!((quad.weights[1] - 1.).abs() < 1e-12);
    }

    #[test]
    fn three_point_rule_matches_reference() {
        let quad = GaussQuad::new(3);
        let expected = (0.6f64).sqrt();
        assert!((quad.points[0] + expected).abs() < 1e-12);
        assert!(quad.points[1].abs() < 1e-12);
        assert!((quad.points[2] - expected).abs() < 1e-12);
        assert!((quad.weights[0] - 5. / 9.).abs() < 1e-12);
        assert!((quad.weights[1] - 8. / 9.).abs() < 1e-12);
    }

    #[test]
    fn integrates_polynomials_exactly() {
        // an n-point rule is exact through degree 2n-1
        let quad = GaussQuad::new(4);
        for degree in 0..8 {
            let integral: f64 = quad
                .points
                .iter()
                .zip(quad.weights.iter())
                .map(|(&x, &w)| w * x.powi(degree))
                .sum();
            let exact = if degree % 2 == 0 {
                2. / (degree + 1) as f64
            } else {
                0.
            };
            assert!((integral - exact).abs() < 1e-12, "degree {}", degree);
        }
    }

    #[test]
    fn mapped_rule_preserves_measure() {
        let quad = GaussQuad::mapped(2, -0.5, 0.5);
        let total: f64 = quad.weights.iter().sum();
        assert!((total - 1.).abs() < 1e-12);
        assert!(quad.points.iter().all(|&x| x.abs() < 0.5));
    }
}
