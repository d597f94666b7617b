use std::f64::consts::{PI, SQRT_2, TAU};

use ndarray::{Array1, Array2, ArrayView1, ArrayView2};
use num_complex::Complex64;
use rustfft::FftPlanner;

use crate::consts::{DEFAULT_OMEGA0, DEFAULT_RIDGE_PENALTY, EPSILON, MORLET_SUPPORT};
use crate::error::{Result, SpyboatError};

use super::envelope::normalize_with_envelope;
use super::ridge::trace_ridge;
use super::sinc::sinc_trend;
use super::{RidgeTrace, SpectralBackend, SpectralField};

/// Morlet wavelet backend with sinc detrending and a continuity-favoring
/// ridge tracer.
#[derive(Clone, Debug)]
pub struct MorletBackend {
    omega0: f64,
    ridge_penalty: f64,
}

impl Default for MorletBackend {
    fn default() -> Self {
        Self {
            omega0: DEFAULT_OMEGA0,
            ridge_penalty: DEFAULT_RIDGE_PENALTY,
        }
    }
}

impl MorletBackend {
    pub fn new(omega0: f64, ridge_penalty: f64) -> Result<Self> {
        if !(omega0.is_finite() && omega0 > 0.0) {
            return Err(SpyboatError::InvalidParameter {
                name: "omega0",
                value: omega0,
                reason: "must be positive",
            });
        }
        if !(ridge_penalty.is_finite() && ridge_penalty >= 0.0) {
            return Err(SpyboatError::InvalidParameter {
                name: "ridge_penalty",
                value: ridge_penalty,
                reason: "must be non-negative",
            });
        }
        Ok(Self {
            omega0,
            ridge_penalty,
        })
    }

    pub fn omega0(&self) -> f64 {
        self.omega0
    }

    pub fn ridge_penalty(&self) -> f64 {
        self.ridge_penalty
    }
}

impl SpectralBackend for MorletBackend {
    fn name(&self) -> &str {
        "Morlet"
    }

    fn trend(&self, signal: ArrayView1<'_, f64>, cutoff: f64, dt: f64) -> Result<Array1<f64>> {
        sinc_trend(signal, cutoff, dt)
    }

    fn normalize_envelope(
        &self,
        signal: ArrayView1<'_, f64>,
        window: f64,
        dt: f64,
    ) -> Result<Array1<f64>> {
        normalize_with_envelope(signal, window, dt)
    }

    fn spectrum(
        &self,
        signal: ArrayView1<'_, f64>,
        dt: f64,
        periods: &[f64],
    ) -> Result<SpectralField> {
        if !(dt.is_finite() && dt > 0.0) {
            return Err(SpyboatError::InvalidSamplingInterval(dt));
        }
        if signal.is_empty() {
            return Err(SpyboatError::SeriesTooShort { len: 0, min: 1 });
        }
        if periods.is_empty() {
            return Err(SpyboatError::InvalidParameter {
                name: "periods",
                value: 0.0,
                reason: "period grid is empty",
            });
        }

        let scales = scales_from_periods(periods, dt, self.omega0);
        let coefficients = morlet_cwt(signal, &scales, self.omega0);

        let variance = signal.var(0.0);
        let norm = if variance > EPSILON { variance } else { 1.0 };
        let modulus = coefficients.mapv(|w| w.norm_sqr() / norm);

        Ok(SpectralField {
            coefficients,
            modulus,
        })
    }

    fn ridge(&self, modulus: ArrayView2<'_, f64>) -> Result<RidgeTrace> {
        if modulus.is_empty() {
            return Err(SpyboatError::SeriesTooShort { len: 0, min: 1 });
        }
        Ok(trace_ridge(modulus, self.ridge_penalty))
    }

    fn power_to_amplitude(
        &self,
        periods: &[f64],
        powers: &[f64],
        signal_std: f64,
        dt: f64,
    ) -> Vec<f64> {
        let scales = scales_from_periods(periods, dt, self.omega0);
        // Inverse of the CWT response |W|^2 = A^2 sqrt(pi) s / 2 to a cosine of amplitude A.
        let kappa = SQRT_2 / PI.powf(0.25);
        scales
            .iter()
            .zip(powers)
            .map(|(&s, &p)| kappa * p.max(0.0).sqrt() * signal_std / s.sqrt())
            .collect()
    }
}

/// Morlet scales (in samples) whose Fourier period equals each period.
pub fn scales_from_periods(periods: &[f64], dt: f64, omega0: f64) -> Vec<f64> {
    let factor = (omega0 + (2.0 + omega0 * omega0).sqrt()) / (4.0 * PI);
    periods.iter().map(|&p| p * factor / dt).collect()
}

/// Continuous Morlet wavelet transform, one row per scale.
///
/// The convolution is done in the frequency domain on a zero-padded copy of
/// the signal, long enough that the wavelet support never wraps around.
/// Support wider than the signal is truncated to the signal length.
/// The time-domain kernel is `pi^-1/4 / sqrt(s) * exp(i w0 t/s) * exp(-t^2 / 2s^2)`,
/// multiplied here by its analytic Fourier transform.
pub fn morlet_cwt(signal: ArrayView1<'_, f64>, scales: &[f64], omega0: f64) -> Array2<Complex64> {
    let n = signal.len();
    let mut coefficients = Array2::<Complex64>::zeros((scales.len(), n));
    if n == 0 || scales.is_empty() {
        return coefficients;
    }

    let s_max = scales.iter().copied().fold(0.0f64, f64::max);
    let len = padded_len(n, s_max);

    let mut planner = FftPlanner::<f64>::new();
    let fft = planner.plan_fft_forward(len);
    let ifft = planner.plan_fft_inverse(len);

    let mut spectrum: Vec<Complex64> = signal
        .iter()
        .map(|&v| Complex64::new(v, 0.0))
        .chain(std::iter::repeat(Complex64::new(0.0, 0.0)).take(len - n))
        .collect();
    fft.process(&mut spectrum);

    let omegas: Vec<f64> = (0..len)
        .map(|k| {
            let k = if k <= len / 2 {
                k as f64
            } else {
                k as f64 - len as f64
            };
            TAU * k / len as f64
        })
        .collect();

    let norm = PI.powf(-0.25);
    let inv_len = 1.0 / len as f64;
    let mut buffer = vec![Complex64::new(0.0, 0.0); len];

    for (row, &s) in scales.iter().enumerate() {
        let gain = norm * (TAU * s).sqrt();
        for ((b, &x), &w) in buffer.iter_mut().zip(&spectrum).zip(&omegas) {
            let d = s * w - omega0;
            *b = x * (gain * (-0.5 * d * d).exp());
        }
        ifft.process(&mut buffer);
        for (t, v) in buffer.iter().take(n).enumerate() {
            coefficients[[row, t]] = *v * inv_len;
        }
    }

    coefficients
}

/// FFT length for a series of `n` samples convolved with wavelets up to
/// scale `s_max`: at most the next power of two above `3n`.
pub(crate) fn padded_len(n: usize, s_max: f64) -> usize {
    let support = (MORLET_SUPPORT * s_max).ceil();
    let per_side = if support < n as f64 {
        support.max(0.0) as usize
    } else {
        n
    };
    (n + 2 * per_side).next_power_of_two()
}
