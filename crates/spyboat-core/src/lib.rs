//! Per-pixel wavelet analysis of oscillating time-lapse movies.
//!
//! Every pixel's time series is detrended, wavelet-transformed and reduced to
//! its dominant ridge, yielding phase, period, power and amplitude movies with
//! the input's shape. Large movies are split row-wise across a worker pool
//! (see [`transform::run_parallel`]).

pub mod consts;
pub mod error;
pub mod filters;
pub mod io;
pub mod movie;
pub mod pipeline;
pub mod spectral;
pub mod transform;
