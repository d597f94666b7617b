use std::f64::consts::TAU;

use ndarray::{Array1, Array3};
use spyboat_core::transform::{Detrending, Normalization, PeriodRange, TransformParams};

/// Write bytes to a temporary file with the given extension.
///
/// The file stays alive as long as the returned `NamedTempFile` is not dropped.
pub fn write_temp_file(data: &[u8], suffix: &str) -> tempfile::NamedTempFile {
    use std::io::Write;
    let mut f = tempfile::Builder::new()
        .suffix(suffix)
        .tempfile()
        .expect("create temp file");
    f.write_all(data).expect("write data");
    f.flush().expect("flush");
    f
}

/// `amplitude * cos(2 pi t / period) + offset` sampled at `n` frames.
pub fn cosine(n: usize, period: f64, amplitude: f64, offset: f64) -> Array1<f64> {
    Array1::from_shape_fn(n, |t| amplitude * (TAU * t as f64 / period).cos() + offset)
}

/// Movie whose every pixel oscillates with `period`; the phase shifts with
/// the column so pixels are distinguishable.
pub fn oscillating_movie(frames: usize, height: usize, width: usize, period: f64) -> Array3<f64> {
    Array3::from_shape_fn((frames, height, width), |(t, row, col)| {
        let shift = (row * width + col) as f64 * 0.3;
        (TAU * t as f64 / period + shift).cos() + 0.01 * row as f64
    })
}

/// Transform parameters scanning periods 10..30 with no preprocessing.
pub fn plain_params() -> TransformParams {
    TransformParams {
        dt: 1.0,
        periods: PeriodRange {
            t_min: 10.0,
            t_max: 30.0,
            n_periods: 21,
        },
        detrend: Detrending::Disabled,
        normalization: Normalization::Disabled,
    }
}

/// Like [`plain_params`] with sinc detrending at cutoff 60.
pub fn detrended_params() -> TransformParams {
    TransformParams {
        detrend: Detrending::Sinc { cutoff: 60.0 },
        ..plain_params()
    }
}
