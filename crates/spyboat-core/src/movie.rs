use std::path::PathBuf;

use ndarray::{s, Array3, ArrayView3};
use serde::{Deserialize, Serialize};

use crate::error::{Result, SpyboatError};

/// A time-lapse image stack, axes ordered (frame, row, column).
pub type Movie = Array3<f64>;

/// Dimensions of a movie: frame count and spatial shape.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct MovieShape {
    pub frames: usize,
    pub height: usize,
    pub width: usize,
}

impl MovieShape {
    pub fn of<T>(movie: &ArrayView3<'_, T>) -> Self {
        let (frames, height, width) = movie.dim();
        Self {
            frames,
            height,
            width,
        }
    }

    pub fn pixel_count(&self) -> usize {
        self.height * self.width
    }

    pub fn dim(&self) -> (usize, usize, usize) {
        (self.frames, self.height, self.width)
    }
}

impl std::fmt::Display for MovieShape {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} frames of {}x{}", self.frames, self.height, self.width)
    }
}

/// Check the movie invariants: at least one frame, at least one pixel.
pub fn validate_movie<T>(movie: &ArrayView3<'_, T>) -> Result<MovieShape> {
    let shape = MovieShape::of(movie);
    if shape.frames == 0 || shape.height == 0 || shape.width == 0 {
        return Err(SpyboatError::InvalidDimensions {
            frames: shape.frames,
            height: shape.height,
            width: shape.width,
        });
    }
    Ok(shape)
}

/// One of the four per-pixel quantities produced by the transform.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum WaveletQuantity {
    Phase,
    Period,
    Power,
    Amplitude,
}

impl WaveletQuantity {
    pub const ALL: [WaveletQuantity; 4] = [
        WaveletQuantity::Phase,
        WaveletQuantity::Period,
        WaveletQuantity::Power,
        WaveletQuantity::Amplitude,
    ];

    /// File name suffix used when persisting this quantity.
    pub fn suffix(&self) -> &'static str {
        match self {
            Self::Phase => "phase",
            Self::Period => "period",
            Self::Power => "power",
            Self::Amplitude => "amplitude",
        }
    }
}

impl std::fmt::Display for WaveletQuantity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Phase => write!(f, "Phase"),
            Self::Period => write!(f, "Period"),
            Self::Power => write!(f, "Power"),
            Self::Amplitude => write!(f, "Amplitude"),
        }
    }
}

/// The four output movies of a wavelet transform, stored as f32 because the
/// downstream viewers only handle single-precision float stacks.
#[derive(Clone, Debug, PartialEq)]
pub struct WaveletMovies {
    pub phase: Array3<f32>,
    pub period: Array3<f32>,
    pub power: Array3<f32>,
    pub amplitude: Array3<f32>,
}

impl WaveletMovies {
    pub fn zeros(shape: MovieShape) -> Self {
        Self {
            phase: Array3::zeros(shape.dim()),
            period: Array3::zeros(shape.dim()),
            power: Array3::zeros(shape.dim()),
            amplitude: Array3::zeros(shape.dim()),
        }
    }

    pub fn shape(&self) -> MovieShape {
        MovieShape::of(&self.phase.view())
    }

    pub fn get(&self, quantity: WaveletQuantity) -> &Array3<f32> {
        match quantity {
            WaveletQuantity::Phase => &self.phase,
            WaveletQuantity::Period => &self.period,
            WaveletQuantity::Power => &self.power,
            WaveletQuantity::Amplitude => &self.amplitude,
        }
    }

    /// Copy `part` into rows `row_offset..row_offset + part.height`.
    pub(crate) fn assign_rows(&mut self, row_offset: usize, part: &WaveletMovies) {
        let rows = row_offset..row_offset + part.shape().height;
        self.phase
            .slice_mut(s![.., rows.clone(), ..])
            .assign(&part.phase);
        self.period
            .slice_mut(s![.., rows.clone(), ..])
            .assign(&part.period);
        self.power
            .slice_mut(s![.., rows.clone(), ..])
            .assign(&part.power);
        self.amplitude
            .slice_mut(s![.., rows, ..])
            .assign(&part.amplitude);
    }
}

/// Where a movie was loaded from.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SourceFormat {
    TiffStack,
    Npy,
    ImageSequence,
}

impl std::fmt::Display for SourceFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::TiffStack => write!(f, "TIFF stack"),
            Self::Npy => write!(f, "NumPy array"),
            Self::ImageSequence => write!(f, "Image sequence"),
        }
    }
}

/// File format for output movies.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// Multi-page 32-bit float TIFF.
    #[default]
    Tiff,
    /// NumPy `<f4` array.
    Npy,
}

impl OutputFormat {
    pub fn extension(&self) -> &'static str {
        match self {
            Self::Tiff => "tif",
            Self::Npy => "npy",
        }
    }
}

impl std::fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Tiff => write!(f, "TIFF (32-bit float)"),
            Self::Npy => write!(f, "NumPy (<f4)"),
        }
    }
}

/// Metadata about a loaded movie.
#[derive(Clone, Debug)]
pub struct MovieInfo {
    pub source: PathBuf,
    pub format: SourceFormat,
    pub shape: MovieShape,
}
