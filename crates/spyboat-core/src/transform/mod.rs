//! Per-pixel wavelet analysis of movies.
//!
//! Bottom-up: [`preprocess`] detrends and normalizes one pixel series,
//! [`pixel`] runs it through the spectral backend, [`ridge`] reads the
//! dominant period, phase, power and amplitude off the spectrum, [`stack`]
//! loops over every pixel of a movie and [`parallel`] splits a movie into
//! row slices processed on a worker pool.

pub mod parallel;
pub mod params;
pub mod pixel;
pub mod preprocess;
pub mod ridge;
pub mod stack;

pub use parallel::{
    partition_rows, resolve_worker_count, run_parallel, run_parallel_with_progress,
    FixedCapacity, HardwareCapacity, RowRange, WorkerCapacity,
};
pub use params::{Detrending, Normalization, PeriodGrid, PeriodRange, TransformParams};
pub use pixel::{compute_spectrum, transform_series};
pub use preprocess::preprocess_series;
pub use ridge::{extract_ridge, PixelRidge};
pub use stack::{transform_stack, transform_stack_with_progress};
