use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{bail, Context, Result};
use clap::{Args, ValueEnum};
use indicatif::{ProgressBar, ProgressStyle};
use spyboat_core::movie::OutputFormat;
use spyboat_core::pipeline::config::{PipelineConfig, PreprocessConfig};
use spyboat_core::pipeline::{run_pipeline_reported, PipelineStage, ProgressReporter};
use spyboat_core::spectral::default_backend;
use spyboat_core::transform::{
    Detrending, HardwareCapacity, Normalization, PeriodRange, TransformParams,
};
use tracing::debug;

use crate::summary::{print_outputs, print_run_summary};

#[derive(Clone, Debug, PartialEq, ValueEnum)]
pub enum FormatChoice {
    /// Multi-page 32-bit float TIFF
    Tiff,
    /// NumPy arrays
    Npy,
}

impl From<FormatChoice> for OutputFormat {
    fn from(choice: FormatChoice) -> Self {
        match choice {
            FormatChoice::Tiff => OutputFormat::Tiff,
            FormatChoice::Npy => OutputFormat::Npy,
        }
    }
}

#[derive(Args)]
pub struct RunArgs {
    /// Input movie (TIFF stack, NPY array or directory of frames)
    pub file: PathBuf,

    /// Pipeline config file (TOML); overrides all other options except the
    /// input movie
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Sampling interval between frames
    #[arg(long, default_value = "1.0")]
    pub dt: f64,

    /// Smallest period to scan
    #[arg(long, required_unless_present = "config")]
    pub tmin: Option<f64>,

    /// Largest period to scan
    #[arg(long, required_unless_present = "config")]
    pub tmax: Option<f64>,

    /// Number of periods between tmin and tmax
    #[arg(long, default_value = "100")]
    pub n_periods: usize,

    /// Sinc detrending cutoff period (omit to disable, not recommended)
    #[arg(long)]
    pub cutoff: Option<f64>,

    /// Amplitude normalization window (omit to disable)
    #[arg(long)]
    pub window: Option<f64>,

    /// Number of parallel workers
    #[arg(short = 'j', long, default_value = "1")]
    pub workers: usize,

    /// Spatial downsampling factor in (0, 1]
    #[arg(long)]
    pub scale: Option<f64>,

    /// Gaussian blur sigma in pixels
    #[arg(long)]
    pub blur: Option<f64>,

    /// Also write the downsampled/blurred input movie
    #[arg(long)]
    pub save_preprocessed: bool,

    /// Output directory
    #[arg(short, long, default_value = "spyboat_output")]
    pub output_dir: PathBuf,

    /// Output file format
    #[arg(long, value_enum, default_value = "tiff")]
    pub format: FormatChoice,
}

/// Drives an indicatif bar from pipeline progress events.
struct BarReporter {
    bar: ProgressBar,
}

impl ProgressReporter for BarReporter {
    fn begin_stage(&self, stage: PipelineStage, total_items: Option<usize>) {
        self.bar.set_message(stage.to_string());
        self.bar.set_length(total_items.unwrap_or(1) as u64);
        self.bar.set_position(0);
    }

    fn advance(&self, items_done: usize) {
        self.bar.set_position(items_done as u64);
    }

    fn finish_stage(&self) {
        if let Some(len) = self.bar.length() {
            self.bar.set_position(len);
        }
    }
}

pub fn run(args: &RunArgs) -> Result<()> {
    let config = resolve_config(args)?;
    if !config.input.exists() {
        bail!("Input movie {} does not exist", config.input.display());
    }
    config.validate().context("Invalid parameters")?;
    debug!(?config, "Resolved pipeline config");

    print_run_summary(&config);

    let bar = ProgressBar::new(1);
    bar.set_style(
        ProgressStyle::default_bar()
            .template("{msg:20} [{bar:40}] {pos}/{len} ({eta})")?
            .progress_chars("=> "),
    );
    let reporter = Arc::new(BarReporter { bar: bar.clone() });

    let output = run_pipeline_reported(
        &config,
        default_backend(),
        Arc::new(HardwareCapacity),
        reporter,
    )
    .with_context(|| format!("Analysis of {} failed", config.input.display()))?;

    bar.finish_with_message("Done");
    print_outputs(&output);

    Ok(())
}

/// Load `--config` if given, otherwise build a config from the flags. The
/// positional movie path always wins over the config file's `input`.
fn resolve_config(args: &RunArgs) -> Result<PipelineConfig> {
    let Some(ref config_path) = args.config else {
        return Ok(build_config_from_args(args));
    };
    let contents = std::fs::read_to_string(config_path)
        .with_context(|| format!("Failed to read config {}", config_path.display()))?;
    let mut config: PipelineConfig =
        toml::from_str(&contents).context("Invalid pipeline config")?;
    if config.input != args.file {
        debug!(
            config_input = %config.input.display(),
            input = %args.file.display(),
            "Movie path given on the command line replaces the config input"
        );
        config.input = args.file.clone();
    }
    Ok(config)
}

fn build_config_from_args(args: &RunArgs) -> PipelineConfig {
    let defaults = PeriodRange::default();
    let detrend = match args.cutoff {
        Some(cutoff) => Detrending::Sinc { cutoff },
        None => Detrending::Disabled,
    };
    let normalization = match args.window {
        Some(window) => Normalization::Envelope { window },
        None => Normalization::Disabled,
    };

    PipelineConfig {
        input: args.file.clone(),
        output_dir: args.output_dir.clone(),
        output_format: args.format.clone().into(),
        workers: args.workers,
        save_preprocessed: args.save_preprocessed,
        preprocess: PreprocessConfig {
            scale_factor: args.scale,
            blur_sigma: args.blur,
        },
        transform: TransformParams {
            dt: args.dt,
            periods: PeriodRange {
                t_min: args.tmin.unwrap_or(defaults.t_min),
                t_max: args.tmax.unwrap_or(defaults.t_max),
                n_periods: args.n_periods,
            },
            detrend,
            normalization,
        },
    }
}
