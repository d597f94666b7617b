use ndarray::{Array1, ArrayView1};

use crate::error::Result;
use crate::spectral::SpectralBackend;

use super::params::{Detrending, Normalization};

/// Detrend and optionally amplitude-normalize one pixel time series.
///
/// Pure: the input view is never modified and the result has the same
/// length. Backend failures (e.g. a normalization window longer than the
/// series) are returned as-is.
pub fn preprocess_series(
    backend: &dyn SpectralBackend,
    series: ArrayView1<'_, f64>,
    dt: f64,
    detrend: Detrending,
    normalization: Normalization,
) -> Result<Array1<f64>> {
    let detrended = match detrend {
        Detrending::Disabled => series.to_owned(),
        Detrending::Sinc { cutoff } => {
            let trend = backend.trend(series, cutoff, dt)?;
            &series - &trend
        }
    };

    match normalization {
        Normalization::Disabled => Ok(detrended),
        Normalization::Envelope { window } => {
            backend.normalize_envelope(detrended.view(), window, dt)
        }
    }
}
