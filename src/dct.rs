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

//! Type-II / type-III discrete cosine transforms on top of `rustfft`
//!
//! Conventions match FFTW's unnormalised `REDFT10` (forward) and `REDFT01`
//! (backward): a forward-backward round trip scales the input by `2 n`.
//! Internally the length-`n` transform maps onto one length-`n` complex
//! FFT through the even/odd reordering and a quarter-sample phase shift.

use std::sync::Arc;

use num_complex::Complex64;
use rustfft::{Fft, FftDirection, FftPlanner};

pub struct Dct {
    n: usize,
    fft: Arc<dyn Fft<f64>>,
    ifft: Arc<dyn Fft<f64>>,
    /// `exp(-i pi k / (2 n))`
    twiddle: Vec<Complex64>,
    work: Vec<Complex64>,
    scratch: Vec<Complex64>,
}

impl Dct {
    pub fn new(n: usize) -> Dct {
        assert!(n >= 2);
        let mut planner = FftPlanner::new();
        let fft = planner.plan_fft(n, FftDirection::Forward);
        let ifft = planner.plan_fft(n, FftDirection::Inverse);
        let twiddle = (0..n)
            .map(|k| Complex64::from_polar(1., -std::f64::consts::PI * k as f64 / (2 * n) as f64))
            .collect();
        let scratch_len = fft
            .get_inplace_scratch_len()
            .max(ifft.get_inplace_scratch_len());
        Dct {
            n,
            fft,
            ifft,
            twiddle,
            work: vec![Complex64::new(0., 0.); n],
            scratch: vec![Complex64::new(0., 0.); scratch_len],
        }
    }

    pub fn len(&self) -> usize {
        self.n
    }

    /// In-place DCT-II (`REDFT10`): `X_k = 2 sum_j x_j cos(pi (2j+1) k / (2n))`.
    pub fn forward(&mut self, x: &mut [f64]) {
        let n = self.n;
        assert_eq!(x.len(), n);
        // even entries ascending, odd entries descending
        for i in 0..n {
            let v = if i < (n + 1) / 2 { x[2 * i] } else { x[2 * (n - 1 - i) + 1] };
            self.work[i] = Complex64::new(v, 0.);
        }
        self.fft.process_with_scratch(&mut self.work, &mut self.scratch);
        for k in 0..n {
            x[k] = 2. * (self.work[k] * self.twiddle[k]).re;
        }
    }

    /// In-place DCT-III (`REDFT01`): the unnormalised inverse of
    /// [`Dct::forward`], so `backward(forward(x)) = 2 n x`.
    pub fn backward(&mut self, x: &mut [f64]) {
        let n = self.n;
        assert_eq!(x.len(), n);
        // rebuild the complex half-shifted spectrum
        self.work[0] = Complex64::new(x[0] * 0.5, 0.);
        for k in 1..n {
            self.work[k] = Complex64::new(0.5 * x[k], -0.5 * x[n - k]) * self.twiddle[k].conj();
        }
        self.ifft.process_with_scratch(&mut self.work, &mut self.scratch);
        // undo the even/odd reordering
        for i in 0..(n + 1) / 2 {
            x[2 * i] = 2. * self.work[i].re;
        }
        for i in (n + 1) / 2..n {
            x[2 * (n - 1 - i) + 1] = 2. * self.work[i].re;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f64::consts::PI;

    fn naive_redft10(x: &[f64]) -> Vec<f64> {
        let n = x.len();
        (0..n)
            .map(|k| {
                2. * (0..n)
                    .map(|j| x[j] * (PI * (2 * j + 1) as f64 * k as f64 / (2 * n) as f64).cos())
                    .sum::<f64>()
            })
            .collect()
    }

    fn naive_redft01(x: &[f64]) -> Vec<f64> {
        let n = x.len();
        (0..n)
            .map(|k| {
                x[0]
                    + 2. * (1..n)
                        .map(|j| {
                            x[j] * (PI * j as f64 * (2 * k + 1) as f64 / (2 * n) as f64).cos()
                        })
                        .sum::<f64>()
            })
            .collect()
    }

    #[test]
    fn forward_matches_fftw_semantics() {
        for &n in &[4usize, 7, 16, 31] {
            let x: Vec<f64> = (0..n).map(|i| ((i * i + 3) % 11) as f64 - 5.).collect();
            let expected = naive_redft10(&x);
            let mut got = x.clone();
            Dct::new(n).forward(&mut got);
            for (a, b) in got.iter().zip(expected.iter()) {
                assert!((a - b).abs() < 1e-10 * n as f64, "n={}: {} vs {}", n, a, b);
            }
        }
    }

    #[test]
    fn backward_matches_fftw_semantics() {
        for &n in &[4usize, 7, 16, 31] {
            let x: Vec<f64> = (0..n).map(|i| ((3 * i + 1) % 7) as f64 - 2.).collect();
            let expected = naive_redft01(&x);
            let mut got = x.clone();
            Dct::new(n).backward(&mut got);
            for (a, b) in got.iter().zip(expected.iter()) {
                assert!((a - b).abs() < 1e-10 * n as f64, "n={}: {} vs {}", n, a, b);
            }
        }
    }

    #[test]
    fn round_trip_scales_by_two_n() {
        let n = 24;
        let x: Vec<f64> = (0..n).map(|i| (i as f64 * 0.37).sin()).collect();
        let mut y = x.clone();
        let mut dct = Dct::new(n);
        dct.forward(&mut y);
        dct.backward(&mut y);
        for (a, b) in y.iter().zip(x.iter()) {
            assert!((a - 2. * n as f64 * b).abs() < 1e-10);
        }
    }
}
