//! Time-frequency primitives applied to single pixel time series.
//!
//! The transform pipeline only talks to the [`SpectralBackend`] trait, so the
//! wavelet family, the detrending filter and the ridge policy can be swapped
//! without touching the pixel loop or the parallel manager.

mod envelope;
mod morlet;
mod ridge;
mod sinc;

use std::sync::Arc;

use ndarray::{Array1, Array2, ArrayView1, ArrayView2};
use num_complex::Complex64;

use crate::error::Result;

pub use envelope::{normalize_with_envelope, sliding_window_amplitude};
pub use morlet::{morlet_cwt, scales_from_periods, MorletBackend};
pub use ridge::trace_ridge;
pub use sinc::{sinc_kernel, sinc_trend};

/// Wavelet coefficients of one time series, rows aligned with the period
/// grid and columns with time.
#[derive(Clone, Debug)]
pub struct SpectralField {
    pub coefficients: Array2<Complex64>,
    /// Wavelet power normalized by the series variance.
    pub modulus: Array2<f64>,
}

/// A path through the modulus matrix: one period-grid index per time step.
#[derive(Clone, Debug, PartialEq)]
pub struct RidgeTrace {
    pub indices: Vec<usize>,
    /// Objective value of the path (summed power minus jump penalties).
    pub score: f64,
}

/// The spectral-analysis operations the per-pixel pipeline depends on.
pub trait SpectralBackend: Send + Sync {
    fn name(&self) -> &str;

    /// Low-frequency trend of `signal` with cutoff period `cutoff`.
    fn trend(&self, signal: ArrayView1<'_, f64>, cutoff: f64, dt: f64) -> Result<Array1<f64>>;

    /// Rescale `signal` by its sliding-window amplitude envelope.
    fn normalize_envelope(
        &self,
        signal: ArrayView1<'_, f64>,
        window: f64,
        dt: f64,
    ) -> Result<Array1<f64>>;

    /// Continuous wavelet transform over the given periods.
    fn spectrum(&self, signal: ArrayView1<'_, f64>, dt: f64, periods: &[f64])
        -> Result<SpectralField>;

    /// Select one period index per time step from the full modulus matrix.
    fn ridge(&self, modulus: ArrayView2<'_, f64>) -> Result<RidgeTrace>;

    /// Convert ridge powers back to signal amplitudes.
    fn power_to_amplitude(
        &self,
        periods: &[f64],
        powers: &[f64],
        signal_std: f64,
        dt: f64,
    ) -> Vec<f64>;
}

/// The backend used when the caller does not supply one.
pub fn default_backend() -> Arc<dyn SpectralBackend> {
    Arc::new(MorletBackend::default())
}
