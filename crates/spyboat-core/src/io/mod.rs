pub mod image_io;
pub mod npy;
pub mod tiff_stack;

use std::path::{Path, PathBuf};

use ndarray::ArrayView3;

use crate::error::{Result, SpyboatError};
use crate::movie::{
    validate_movie, Movie, MovieInfo, OutputFormat, SourceFormat, WaveletMovies, WaveletQuantity,
};

/// Guess the movie format from the path: a directory is an image sequence,
/// otherwise the file extension decides.
pub fn detect_format(path: &Path) -> Result<SourceFormat> {
    if path.is_dir() {
        return Ok(SourceFormat::ImageSequence);
    }
    match path
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_ascii_lowercase())
        .as_deref()
    {
        Some("tif" | "tiff") => Ok(SourceFormat::TiffStack),
        Some("npy") => Ok(SourceFormat::Npy),
        _ => Err(SpyboatError::UnsupportedSource(path.display().to_string())),
    }
}

/// Load a movie from a TIFF stack, an NPY array or a directory of frames.
pub fn load_movie(path: &Path) -> Result<(Movie, MovieInfo)> {
    let format = detect_format(path)?;
    let movie = match format {
        SourceFormat::TiffStack => tiff_stack::read_tiff_stack(path)?,
        SourceFormat::Npy => npy::read_npy(path)?,
        SourceFormat::ImageSequence => image_io::load_image_sequence(path)?,
    };
    let shape = validate_movie(&movie.view())?;
    let info = MovieInfo {
        source: path.to_path_buf(),
        format,
        shape,
    };
    Ok((movie, info))
}

/// Write one single-precision movie in `format`.
pub fn write_movie(path: &Path, movie: ArrayView3<'_, f32>, format: OutputFormat) -> Result<()> {
    match format {
        OutputFormat::Tiff => tiff_stack::write_tiff_stack(path, movie),
        OutputFormat::Npy => npy::write_npy(path, movie),
    }
}

/// `{dir}/{stem}_{name}.{ext}` for an output movie.
pub fn named_output_path(dir: &Path, stem: &str, name: &str, format: OutputFormat) -> PathBuf {
    dir.join(format!("{stem}_{name}.{}", format.extension()))
}

/// Path of the file holding `quantity` for outputs named `stem`.
pub fn output_path(
    dir: &Path,
    stem: &str,
    quantity: WaveletQuantity,
    format: OutputFormat,
) -> PathBuf {
    named_output_path(dir, stem, quantity.suffix(), format)
}

/// Write the four output movies as `{stem}_{phase,period,power,amplitude}`
/// files in `format`.
pub fn save_wavelet_movies(
    dir: &Path,
    stem: &str,
    movies: &WaveletMovies,
    format: OutputFormat,
) -> Result<Vec<PathBuf>> {
    std::fs::create_dir_all(dir)?;
    WaveletQuantity::ALL
        .iter()
        .map(|&quantity| {
            let path = output_path(dir, stem, quantity, format);
            write_movie(&path, movies.get(quantity).view(), format)?;
            Ok(path)
        })
        .collect()
}
