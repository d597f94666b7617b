use crate::error::{Result, SpyboatError};
use crate::spectral::{SpectralBackend, SpectralField};

use super::params::PeriodGrid;

/// Dominant oscillation of one pixel: one value per frame for each quantity.
#[derive(Clone, Debug, PartialEq)]
pub struct PixelRidge {
    pub periods: Vec<f64>,
    pub phases: Vec<f64>,
    pub powers: Vec<f64>,
    pub amplitudes: Vec<f64>,
}

impl PixelRidge {
    pub fn len(&self) -> usize {
        self.periods.len()
    }

    pub fn is_empty(&self) -> bool {
        self.periods.is_empty()
    }
}

/// Read period, phase, power and amplitude along the backend's ridge.
///
/// The full modulus matrix goes to the backend in one call so the ridge
/// policy can trade power against continuity over time.
pub fn extract_ridge(
    backend: &dyn SpectralBackend,
    field: &SpectralField,
    grid: &PeriodGrid,
    signal_std: f64,
    dt: f64,
) -> Result<PixelRidge> {
    let (n_periods, n_times) = field.modulus.dim();
    if n_periods != grid.len() || field.coefficients.dim() != field.modulus.dim() {
        return Err(SpyboatError::ShapeMismatch {
            expected: vec![grid.len(), n_times],
            actual: vec![n_periods, field.coefficients.ncols()],
        });
    }

    let trace = backend.ridge(field.modulus.view())?;
    if trace.indices.len() != n_times {
        return Err(SpyboatError::ShapeMismatch {
            expected: vec![n_times],
            actual: vec![trace.indices.len()],
        });
    }

    let mut periods = Vec::with_capacity(n_times);
    let mut phases = Vec::with_capacity(n_times);
    let mut powers = Vec::with_capacity(n_times);
    for (t, &index) in trace.indices.iter().enumerate() {
        let period = grid.get(index).ok_or_else(|| SpyboatError::ShapeMismatch {
            expected: vec![grid.len()],
            actual: vec![index + 1],
        })?;
        periods.push(period);
        powers.push(field.modulus[[index, t]]);
        phases.push(field.coefficients[[index, t]].arg());
    }

    let amplitudes = backend.power_to_amplitude(&periods, &powers, signal_std, dt);

    Ok(PixelRidge {
        periods,
        phases,
        powers,
        amplitudes,
    })
}
