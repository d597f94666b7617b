use std::path::PathBuf;

use crate::movie::{MovieInfo, MovieShape, WaveletMovies};

/// Pipeline processing stage, used for progress reporting.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PipelineStage {
    Reading,
    Downsampling,
    Blurring,
    Transforming,
    Writing,
}

impl std::fmt::Display for PipelineStage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Reading => write!(f, "Reading movie"),
            Self::Downsampling => write!(f, "Downsampling"),
            Self::Blurring => write!(f, "Blurring"),
            Self::Transforming => write!(f, "Wavelet transforms"),
            Self::Writing => write!(f, "Writing output"),
        }
    }
}

/// Result of a pipeline run.
#[derive(Clone, Debug)]
pub struct PipelineOutput {
    /// The movie as loaded from disk.
    pub info: MovieInfo,
    /// Shape after downsampling; equals the output movies' shape.
    pub preprocessed_shape: MovieShape,
    pub movies: WaveletMovies,
    /// Files written, in the order phase, period, power, amplitude
    /// (plus the preprocessed input when requested).
    pub written: Vec<PathBuf>,
}

/// Thread-safe progress reporting for the pipeline.
///
/// Implementors can use this to drive progress bars, logging, or any other
/// UI feedback. All methods have default no-op implementations.
pub trait ProgressReporter: Send + Sync {
    /// A new pipeline stage has started. `total_items` is the number of
    /// work items in this stage (e.g., pixel count), if known.
    fn begin_stage(&self, _stage: PipelineStage, _total_items: Option<usize>) {}

    /// Work items completed so far within the current stage.
    fn advance(&self, _items_done: usize) {}

    /// The current stage is finished.
    fn finish_stage(&self) {}
}

/// No-op progress reporter, used when `run_pipeline` delegates.
pub struct NoOpReporter;
impl ProgressReporter for NoOpReporter {}
