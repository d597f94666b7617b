use ndarray::ArrayView1;

use crate::error::Result;
use crate::spectral::{SpectralBackend, SpectralField};

use super::params::{PeriodGrid, TransformParams};
use super::preprocess::preprocess_series;
use super::ridge::{extract_ridge, PixelRidge};

/// Wavelet spectrum of a processed series over the run's period grid.
pub fn compute_spectrum(
    backend: &dyn SpectralBackend,
    signal: ArrayView1<'_, f64>,
    dt: f64,
    grid: &PeriodGrid,
) -> Result<SpectralField> {
    backend.spectrum(signal, dt, grid.as_slice())
}

/// Full per-pixel pipeline: preprocess, transform, extract the ridge.
///
/// Holds no state between calls, so identical input gives identical output.
pub fn transform_series(
    backend: &dyn SpectralBackend,
    series: ArrayView1<'_, f64>,
    params: &TransformParams,
    grid: &PeriodGrid,
) -> Result<PixelRidge> {
    let signal = preprocess_series(
        backend,
        series,
        params.dt,
        params.detrend,
        params.normalization,
    )?;
    let signal_std = signal.std(0.0);

    let field = compute_spectrum(backend, signal.view(), params.dt, grid)?;
    extract_ridge(backend, &field, grid, signal_std, params.dt)
}
