use thiserror::Error;

#[derive(Error, Debug)]
pub enum SpyboatError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid NPY file: {0}")]
    InvalidNpy(String),

    #[error("Image format error: {0}")]
    ImageError(#[from] image::ImageError),

    #[error("TIFF error: {0}")]
    Tiff(#[from] tiff::TiffError),

    #[error("Unsupported color mode: {0}")]
    UnsupportedColorMode(String),

    #[error("Unsupported movie source: {0}")]
    UnsupportedSource(String),

    #[error("Invalid movie dimensions: {frames} frames of {height}x{width}")]
    InvalidDimensions {
        frames: usize,
        height: usize,
        width: usize,
    },

    #[error("Shape mismatch: expected {expected:?}, got {actual:?}")]
    ShapeMismatch {
        expected: Vec<usize>,
        actual: Vec<usize>,
    },

    #[error("Empty movie: no frames found")]
    EmptyMovie,

    #[error("Upscaling is not supported: scale factor {0} must be in (0, 1]")]
    InvalidScaleFactor(f64),

    #[error("Invalid period range: Tmin={t_min}, Tmax={t_max}, nT={n_periods}")]
    InvalidPeriodRange {
        t_min: f64,
        t_max: f64,
        n_periods: usize,
    },

    #[error("Sampling interval must be positive, got dt={0}")]
    InvalidSamplingInterval(f64),

    #[error("Invalid parameter {name}={value}: {reason}")]
    InvalidParameter {
        name: &'static str,
        value: f64,
        reason: &'static str,
    },

    #[error("Window of {window} samples exceeds series length {len}")]
    WindowTooLong { window: usize, len: usize },

    #[error("Series of length {len} is too short (need at least {min})")]
    SeriesTooShort { len: usize, min: usize },

    #[error("Worker count must be at least 1")]
    NoWorkers,

    #[error("Worker pool error: {0}")]
    WorkerPool(#[from] rayon::ThreadPoolBuildError),

    #[error("Transform failed at pixel (row {row}, col {col}): {source}")]
    Pixel {
        row: usize,
        col: usize,
        #[source]
        source: Box<SpyboatError>,
    },
}

pub type Result<T> = std::result::Result<T, SpyboatError>;
