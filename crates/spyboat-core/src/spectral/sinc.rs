use std::f64::consts::{PI, TAU};

use ndarray::{Array1, ArrayView1};

use crate::consts::MIN_SINC_LENGTH;
use crate::error::{Result, SpyboatError};

/// Low-pass trend of `signal` using a Blackman-windowed sinc filter with
/// cutoff period `cutoff`.
///
/// The filter is as long as the signal allows (order `N - 1` rounded down to
/// even) for the sharpest roll-off. The signal is mirror-padded by half the
/// filter order on both sides, so the output has the input's length.
pub fn sinc_trend(signal: ArrayView1<'_, f64>, cutoff: f64, dt: f64) -> Result<Array1<f64>> {
    if !(dt.is_finite() && dt > 0.0) {
        return Err(SpyboatError::InvalidSamplingInterval(dt));
    }
    if !(cutoff.is_finite() && cutoff > 0.0) {
        return Err(SpyboatError::InvalidParameter {
            name: "cutoff",
            value: cutoff,
            reason: "detrending cutoff period must be positive",
        });
    }
    let n = signal.len();
    if n < MIN_SINC_LENGTH {
        return Err(SpyboatError::SeriesTooShort {
            len: n,
            min: MIN_SINC_LENGTH,
        });
    }

    let order = (n - 1) & !1;
    let half = order / 2;
    let kernel = sinc_kernel(order, dt / cutoff);

    let mut padded = Vec::with_capacity(n + order);
    padded.extend((1..=half).rev().map(|i| signal[i]));
    padded.extend(signal.iter().copied());
    padded.extend((0..half).map(|i| signal[n - 2 - i]));

    // Kernel is symmetric, correlation and convolution coincide.
    let trend = (0..n)
        .map(|t| {
            padded[t..t + order + 1]
                .iter()
                .zip(&kernel)
                .map(|(x, k)| x * k)
                .sum::<f64>()
        })
        .collect::<Vec<_>>();

    Ok(Array1::from(trend))
}

/// Blackman-windowed sinc low-pass kernel of length `order + 1`, normalized
/// to unit gain at zero frequency. `cutoff_frequency` is in cycles per sample.
pub fn sinc_kernel(order: usize, cutoff_frequency: f64) -> Vec<f64> {
    if order == 0 {
        return vec![1.0];
    }
    let m = order as f64;
    let center = m / 2.0;
    let two_fc = 2.0 * cutoff_frequency;

    let mut kernel: Vec<f64> = (0..=order)
        .map(|i| {
            let n = i as f64;
            let x = two_fc * (n - center);
            let sinc = if x == 0.0 { 1.0 } else { (PI * x).sin() / (PI * x) };
            let blackman = 0.42 - 0.5 * (TAU * n / m).cos() + 0.08 * (2.0 * TAU * n / m).cos();
            two_fc * sinc * blackman
        })
        .collect();

    let sum: f64 = kernel.iter().sum();
    if sum.abs() > f64::EPSILON {
        for k in &mut kernel {
            *k /= sum;
        }
    }
    kernel
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn kernel_has_unit_gain_and_is_symmetric() {
        let kernel = sinc_kernel(40, 0.05);
        assert_eq!(kernel.len(), 41);
        let sum: f64 = kernel.iter().sum();
        assert!((sum - 1.0).abs() < 1e-12);
        for i in 0..kernel.len() {
            assert!((kernel[i] - kernel[kernel.len() - 1 - i]).abs() < 1e-15);
        }
    }

    #[test]
    fn zero_order_kernel_is_identity() {
        assert_eq!(sinc_kernel(0, 0.1), vec![1.0]);
    }
}
