use ndarray::{s, ArrayView3};
use tracing::{info, warn};

use crate::consts::PROGRESS_STEPS;
use crate::error::{Result, SpyboatError};
use crate::movie::{validate_movie, WaveletMovies};
use crate::spectral::SpectralBackend;

use super::params::{Detrending, PeriodGrid, TransformParams};
use super::pixel::transform_series;
use super::ridge::PixelRidge;

/// Wavelet-transform every pixel of a (frames, rows, cols) movie along the
/// frame axis.
///
/// Returns the phase, period, power and amplitude movies, each with the
/// input's shape. This is the single-worker path; see
/// [`run_parallel`](super::parallel::run_parallel) for large movies.
pub fn transform_stack(
    movie: ArrayView3<'_, f64>,
    params: &TransformParams,
    backend: &dyn SpectralBackend,
) -> Result<WaveletMovies> {
    transform_stack_with_progress(movie, params, backend, |_done| {})
}

/// Like [`transform_stack`], calling `on_progress` with the number of
/// finished pixels roughly every tenth of the movie.
pub fn transform_stack_with_progress<F>(
    movie: ArrayView3<'_, f64>,
    params: &TransformParams,
    backend: &dyn SpectralBackend,
    on_progress: F,
) -> Result<WaveletMovies>
where
    F: FnMut(usize),
{
    validate_movie(&movie)?;
    let grid = params.period_grid()?;
    warn_if_not_detrended(params);
    info!(
        pixels = movie.dim().1 * movie.dim().2,
        frames = movie.dim().0,
        backend = backend.name(),
        "Computing the transforms"
    );
    transform_chunk(movie, params, &grid, backend, 0, on_progress)
}

pub(super) fn warn_if_not_detrended(params: &TransformParams) {
    if params.detrend == Detrending::Disabled {
        warn!("Sinc detrending is disabled, slow trends will bias the amplitude estimates");
    }
}

/// Pixel loop over one movie chunk. `row_offset` only locates errors and log
/// lines in the full movie. Any pixel failure aborts the chunk.
pub(super) fn transform_chunk<F>(
    chunk: ArrayView3<'_, f64>,
    params: &TransformParams,
    grid: &PeriodGrid,
    backend: &dyn SpectralBackend,
    row_offset: usize,
    mut on_progress: F,
) -> Result<WaveletMovies>
where
    F: FnMut(usize),
{
    let shape = validate_movie(&chunk)?;
    let total = shape.pixel_count();
    let step = (total / PROGRESS_STEPS).max(1);
    let mut movies = WaveletMovies::zeros(shape);

    let mut done = 0usize;
    for row in 0..shape.height {
        for col in 0..shape.width {
            let series = chunk.slice(s![.., row, col]);
            let ridge = transform_series(backend, series, params, grid).map_err(|e| {
                SpyboatError::Pixel {
                    row: row + row_offset,
                    col,
                    source: Box::new(e),
                }
            })?;
            write_pixel(&mut movies, row, col, &ridge);

            done += 1;
            if done % step == 0 || done == total {
                info!(
                    row_offset,
                    percent = format!("{:.1}", done as f64 / total as f64 * 100.0),
                    "Processed pixels"
                );
                on_progress(done);
            }
        }
    }

    Ok(movies)
}

fn write_pixel(movies: &mut WaveletMovies, row: usize, col: usize, ridge: &PixelRidge) {
    let columns = [
        (&mut movies.phase, &ridge.phases),
        (&mut movies.period, &ridge.periods),
        (&mut movies.power, &ridge.powers),
        (&mut movies.amplitude, &ridge.amplitudes),
    ];
    for (movie, values) in columns {
        for (dst, &v) in movie.slice_mut(s![.., row, col]).iter_mut().zip(values) {
            *dst = v as f32;
        }
    }
}
