use std::ops::Range;
use std::sync::atomic::{AtomicUsize, Ordering};

use ndarray::{s, ArrayView3};
use rayon::prelude::*;
use tracing::{debug, info, warn};

use crate::error::{Result, SpyboatError};
use crate::movie::{validate_movie, WaveletMovies};
use crate::spectral::SpectralBackend;

use super::params::TransformParams;
use super::stack::{transform_chunk, warn_if_not_detrended};

/// Source of the number of workers the machine can run concurrently.
pub trait WorkerCapacity: Send + Sync {
    fn available(&self) -> usize;
}

/// Capacity reported by the operating system.
#[derive(Clone, Copy, Debug, Default)]
pub struct HardwareCapacity;

impl WorkerCapacity for HardwareCapacity {
    fn available(&self) -> usize {
        std::thread::available_parallelism()
            .map(|n| n.get())
            .unwrap_or(1)
    }
}

/// A fixed capacity, for tests and for pinning a run to a CPU budget.
#[derive(Clone, Copy, Debug)]
pub struct FixedCapacity(pub usize);

impl WorkerCapacity for FixedCapacity {
    fn available(&self) -> usize {
        self.0
    }
}

/// Contiguous block of rows handled by one worker.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct RowRange {
    pub offset: usize,
    pub len: usize,
}

impl RowRange {
    pub fn range(&self) -> Range<usize> {
        self.offset..self.offset + self.len
    }
}

/// Split `height` rows into `parts` contiguous, gap-free slices whose sizes
/// differ by at most one. The first `height % parts` slices get the extra row.
pub fn partition_rows(height: usize, parts: usize) -> Vec<RowRange> {
    if parts == 0 {
        return Vec::new();
    }
    let base = height / parts;
    let extra = height % parts;

    let mut offset = 0;
    (0..parts)
        .map(|i| {
            let len = base + usize::from(i < extra);
            let slice = RowRange { offset, len };
            offset += len;
            slice
        })
        .collect()
}

/// Clamp a requested worker count to the available capacity.
///
/// Over-requesting is not an error: it logs a warning and uses everything
/// available. Requesting zero workers is.
pub fn resolve_worker_count(requested: usize, capacity: &dyn WorkerCapacity) -> Result<usize> {
    if requested == 0 {
        return Err(SpyboatError::NoWorkers);
    }
    let available = capacity.available().max(1);
    info!(available, "CPUs available");

    if requested > available {
        warn!(
            requested,
            available, "Requested more workers than available, clamping"
        );
        return Ok(available);
    }
    Ok(requested)
}

/// Transform a full movie on a pool of `workers` threads.
///
/// The movie is split row-wise into one slice per worker; every worker gets a
/// read-only view of its rows and fills a private set of output movies, which
/// are copied into their row offset of the full result once all workers
/// have returned. The output is identical to [`transform_stack`] on the whole
/// movie. The first failing worker fails the run and no partial result is
/// returned.
///
/// [`transform_stack`]: super::stack::transform_stack
pub fn run_parallel(
    movie: ArrayView3<'_, f64>,
    workers: usize,
    params: &TransformParams,
    backend: &dyn SpectralBackend,
    capacity: &dyn WorkerCapacity,
) -> Result<WaveletMovies> {
    run_parallel_with_progress(movie, workers, params, backend, capacity, |_done| {})
}

/// Like [`run_parallel`], calling `on_progress` with the number of pixels
/// finished across all workers.
pub fn run_parallel_with_progress<F>(
    movie: ArrayView3<'_, f64>,
    workers: usize,
    params: &TransformParams,
    backend: &dyn SpectralBackend,
    capacity: &dyn WorkerCapacity,
    on_progress: F,
) -> Result<WaveletMovies>
where
    F: Fn(usize) + Sync,
{
    let shape = validate_movie(&movie)?;
    let grid = params.period_grid()?;
    warn_if_not_detrended(params);

    let mut workers = resolve_worker_count(workers, capacity)?;
    if workers > shape.height {
        debug!(
            workers,
            rows = shape.height,
            "More workers than rows, using one worker per row"
        );
        workers = shape.height;
    }

    let slices = partition_rows(shape.height, workers);
    info!(
        workers,
        pixels = shape.pixel_count(),
        frames = shape.frames,
        "Starting worker pool"
    );

    let pool = rayon::ThreadPoolBuilder::new()
        .num_threads(workers)
        .thread_name(|i| format!("spyboat-worker-{i}"))
        .build()?;

    let finished = AtomicUsize::new(0);
    let parts: Vec<WaveletMovies> = pool.install(|| {
        slices
            .par_iter()
            .map(|slice| {
                let chunk = movie.slice(s![.., slice.range(), ..]);
                debug!(offset = slice.offset, rows = slice.len, "Worker started");
                let mut reported = 0usize;
                transform_chunk(chunk, params, &grid, backend, slice.offset, |done| {
                    let delta = done - reported;
                    reported = done;
                    on_progress(finished.fetch_add(delta, Ordering::Relaxed) + delta);
                })
            })
            .collect::<Result<Vec<_>>>()
    })?;

    let mut movies = WaveletMovies::zeros(shape);
    for (slice, part) in slices.iter().zip(&parts) {
        movies.assign_rows(slice.offset, part);
    }

    info!("Done with all transformations");
    Ok(movies)
}
