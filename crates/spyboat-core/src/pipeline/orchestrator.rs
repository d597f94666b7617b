use std::sync::Arc;

use tracing::info;

use crate::error::Result;
use crate::filters::gaussian_blur::gaussian_blur;
use crate::filters::rescale::down_sample;
use crate::io::{load_movie, named_output_path, save_wavelet_movies, write_movie};
use crate::movie::{validate_movie, Movie};
use crate::spectral::{default_backend, SpectralBackend};
use crate::transform::{run_parallel_with_progress, HardwareCapacity, WorkerCapacity};

use super::config::{PipelineConfig, PreprocessConfig};
use super::types::{NoOpReporter, PipelineOutput, PipelineStage, ProgressReporter};

/// Downsample and blur a movie according to `config`. Either step is
/// skipped when unset.
pub fn preprocess_movie(movie: Movie, config: &PreprocessConfig) -> Result<Movie> {
    preprocess_reported(movie, config, &NoOpReporter)
}

fn preprocess_reported(
    movie: Movie,
    config: &PreprocessConfig,
    reporter: &dyn ProgressReporter,
) -> Result<Movie> {
    let mut movie = movie;

    if let Some(scale) = config.scale_factor {
        reporter.begin_stage(PipelineStage::Downsampling, Some(movie.dim().0));
        movie = down_sample(movie.view(), scale)?;
        let (_, height, width) = movie.dim();
        info!(scale, height, width, "Downsampled movie");
        reporter.finish_stage();
    }

    if let Some(sigma) = config.blur_sigma {
        reporter.begin_stage(PipelineStage::Blurring, Some(movie.dim().0));
        movie = gaussian_blur(movie.view(), sigma)?;
        info!(sigma, "Blurred movie");
        reporter.finish_stage();
    }

    Ok(movie)
}

/// Run the full processing pipeline with explicit collaborators.
pub fn run_pipeline_reported(
    config: &PipelineConfig,
    backend: Arc<dyn SpectralBackend>,
    capacity: Arc<dyn WorkerCapacity>,
    reporter: Arc<dyn ProgressReporter>,
) -> Result<PipelineOutput> {
    config.validate()?;

    reporter.begin_stage(PipelineStage::Reading, None);
    let (movie, info) = load_movie(&config.input)?;
    info!(
        source = %info.source.display(),
        format = %info.format,
        frames = info.shape.frames,
        height = info.shape.height,
        width = info.shape.width,
        "Loaded movie"
    );
    reporter.finish_stage();

    let movie = preprocess_reported(movie, &config.preprocess, reporter.as_ref())?;
    let shape = validate_movie(&movie.view())?;

    reporter.begin_stage(PipelineStage::Transforming, Some(shape.pixel_count()));
    let r = reporter.clone();
    let movies = run_parallel_with_progress(
        movie.view(),
        config.workers,
        &config.transform,
        backend.as_ref(),
        capacity.as_ref(),
        move |done| r.advance(done),
    )?;
    reporter.finish_stage();

    reporter.begin_stage(PipelineStage::Writing, None);
    let stem = config.output_stem();
    let format = config.output_format;
    let mut written = save_wavelet_movies(&config.output_dir, &stem, &movies, format)?;
    if config.save_preprocessed && !config.preprocess.is_noop() {
        let path = named_output_path(&config.output_dir, &stem, "preprocessed", format);
        write_movie(&path, movie.mapv(|v| v as f32).view(), format)?;
        written.push(path);
    }
    info!(
        files = written.len(),
        %format,
        output_dir = %config.output_dir.display(),
        "Wrote output movies"
    );
    reporter.finish_stage();

    Ok(PipelineOutput {
        info,
        preprocessed_shape: shape,
        movies,
        written,
    })
}

/// Run the full processing pipeline with the default Morlet backend, the
/// machine's CPU count as worker capacity and no progress reporting.
pub fn run_pipeline(config: &PipelineConfig) -> Result<PipelineOutput> {
    run_pipeline_reported(
        config,
        default_backend(),
        Arc::new(HardwareCapacity),
        Arc::new(NoOpReporter),
    )
}
