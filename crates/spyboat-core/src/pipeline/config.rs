use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::error::{Result, SpyboatError};
use crate::movie::OutputFormat;
use crate::transform::TransformParams;

fn default_workers() -> usize {
    1
}

fn default_output_dir() -> PathBuf {
    PathBuf::from("spyboat_output")
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct PipelineConfig {
    /// Movie to analyse: a TIFF stack, an NPY array or a directory of frames.
    pub input: PathBuf,
    #[serde(default = "default_output_dir")]
    pub output_dir: PathBuf,
    #[serde(default)]
    pub output_format: OutputFormat,
    /// Requested number of parallel workers, clamped to the CPU count.
    #[serde(default = "default_workers")]
    pub workers: usize,
    /// Also write the downsampled/blurred input movie.
    #[serde(default)]
    pub save_preprocessed: bool,
    #[serde(default)]
    pub preprocess: PreprocessConfig,
    #[serde(default)]
    pub transform: TransformParams,
}

impl PipelineConfig {
    pub fn new(input: PathBuf) -> Self {
        Self {
            input,
            output_dir: default_output_dir(),
            output_format: OutputFormat::default(),
            workers: default_workers(),
            save_preprocessed: false,
            preprocess: PreprocessConfig::default(),
            transform: TransformParams::default(),
        }
    }

    /// Check every numeric parameter before any data is loaded.
    pub fn validate(&self) -> Result<()> {
        if self.workers == 0 {
            return Err(SpyboatError::NoWorkers);
        }
        self.preprocess.validate()?;
        self.transform.validate()
    }

    /// Base name for output files, taken from the input file or directory.
    pub fn output_stem(&self) -> String {
        self.input
            .file_stem()
            .and_then(|s| s.to_str())
            .filter(|s| !s.is_empty())
            .unwrap_or("spyboat")
            .to_string()
    }
}

/// Spatial pre-processing applied to every frame before the transform.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct PreprocessConfig {
    /// Downsampling factor in (0, 1]. `None` keeps the full resolution.
    pub scale_factor: Option<f64>,
    /// Gaussian blur sigma in pixels. `None` disables smoothing.
    pub blur_sigma: Option<f64>,
}

impl PreprocessConfig {
    pub fn validate(&self) -> Result<()> {
        if let Some(scale) = self.scale_factor {
            if !(scale.is_finite() && scale > 0.0 && scale <= 1.0) {
                return Err(SpyboatError::InvalidScaleFactor(scale));
            }
        }
        if let Some(sigma) = self.blur_sigma {
            if !(sigma.is_finite() && sigma > 0.0) {
                return Err(SpyboatError::InvalidParameter {
                    name: "sigma",
                    value: sigma,
                    reason: "Gaussian kernel width must be positive",
                });
            }
        }
        Ok(())
    }

    pub fn is_noop(&self) -> bool {
        self.scale_factor.is_none() && self.blur_sigma.is_none()
    }
}
