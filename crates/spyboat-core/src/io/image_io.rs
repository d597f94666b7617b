use std::path::{Path, PathBuf};

use image::DynamicImage;
use ndarray::{Array2, Array3, Axis};

use crate::error::{Result, SpyboatError};
use crate::movie::Movie;

const IMAGE_EXTENSIONS: [&str; 5] = ["tif", "tiff", "png", "jpg", "jpeg"];

/// Sorted list of image files in `dir`; one file per movie frame.
pub fn list_frame_files(dir: &Path) -> Result<Vec<PathBuf>> {
    let mut files: Vec<PathBuf> = std::fs::read_dir(dir)?
        .filter_map(|entry| entry.ok().map(|e| e.path()))
        .filter(|path| {
            path.is_file()
                && path
                    .extension()
                    .and_then(|e| e.to_str())
                    .map(|e| IMAGE_EXTENSIONS.contains(&e.to_ascii_lowercase().as_str()))
                    .unwrap_or(false)
        })
        .collect();
    files.sort();
    Ok(files)
}

/// Load a single grayscale frame with its raw intensity values.
pub fn load_frame(path: &Path) -> Result<Array2<f64>> {
    let img = image::open(path)?;
    let data = match img {
        DynamicImage::ImageLuma8(gray) => {
            let (w, h) = gray.dimensions();
            Array2::from_shape_fn((h as usize, w as usize), |(row, col)| {
                gray.get_pixel(col as u32, row as u32).0[0] as f64
            })
        }
        other => {
            let gray = other.to_luma16();
            let (w, h) = gray.dimensions();
            Array2::from_shape_fn((h as usize, w as usize), |(row, col)| {
                gray.get_pixel(col as u32, row as u32).0[0] as f64
            })
        }
    };
    Ok(data)
}

/// Load a directory of same-sized images, sorted by file name, as a movie.
pub fn load_image_sequence(dir: &Path) -> Result<Movie> {
    let files = list_frame_files(dir)?;
    let first = files.first().ok_or(SpyboatError::EmptyMovie)?;
    let first_frame = load_frame(first)?;
    let (h, w) = first_frame.dim();

    let mut movie = Array3::<f64>::zeros((files.len(), h, w));
    movie.index_axis_mut(Axis(0), 0).assign(&first_frame);

    for (index, path) in files.iter().enumerate().skip(1) {
        let frame = load_frame(path)?;
        if frame.dim() != (h, w) {
            return Err(SpyboatError::ShapeMismatch {
                expected: vec![h, w],
                actual: vec![frame.nrows(), frame.ncols()],
            });
        }
        movie.index_axis_mut(Axis(0), index).assign(&frame);
    }

    Ok(movie)
}
