/// Minimum pixel count (h*w) to use row-level Rayon parallelism in frame filters.
pub const PARALLEL_PIXEL_THRESHOLD: usize = 65_536;

/// Minimum frame count to use frame-level Rayon parallelism.
pub const PARALLEL_FRAME_THRESHOLD: usize = 4;

/// Small epsilon to avoid division by zero in floating-point comparisons.
pub const EPSILON: f64 = 1e-12;

/// Default Morlet central frequency (rad per unit scale).
pub const DEFAULT_OMEGA0: f64 = std::f64::consts::TAU;

/// Half-width of the Morlet envelope in units of scale. Sets the zero padding
/// used by the FFT convolution so the wavelet tail does not wrap around.
pub const MORLET_SUPPORT: f64 = 5.0;

/// Default penalty per period-grid index jumped between consecutive frames
/// when tracing the ridge. Power is normalized by the signal variance, so
/// this is in units of "variances".
pub const DEFAULT_RIDGE_PENALTY: f64 = 0.5;

/// Gaussian kernel radius in units of sigma.
pub const GAUSSIAN_TRUNCATE: f64 = 4.0;

/// Number of progress notifications emitted over a pixel loop.
pub const PROGRESS_STEPS: usize = 10;

/// Smallest usable envelope window, in samples.
pub const MIN_ENVELOPE_WINDOW: usize = 3;

/// Smallest series length the sinc low-pass can handle.
pub const MIN_SINC_LENGTH: usize = 3;
