use ndarray::{Array2, ArrayView2, ArrayView3, Axis};
use rayon::prelude::*;

use crate::consts::{GAUSSIAN_TRUNCATE, PARALLEL_PIXEL_THRESHOLD};
use crate::error::{Result, SpyboatError};
use crate::movie::{validate_movie, Movie};

use super::map_frames;

/// Gaussian-blur every frame of a (frames, rows, cols) movie.
pub fn gaussian_blur(movie: ArrayView3<'_, f64>, sigma: f64) -> Result<Movie> {
    validate_sigma(sigma)?;
    validate_movie(&movie)?;
    Ok(map_frames(movie, |frame| gaussian_blur_array(frame, sigma)))
}

/// Gaussian-blur a single frame. The output has the input's shape.
pub fn gaussian_blur_frame(frame: ArrayView2<'_, f64>, sigma: f64) -> Result<Array2<f64>> {
    validate_sigma(sigma)?;
    Ok(gaussian_blur_array(frame, sigma))
}

fn validate_sigma(sigma: f64) -> Result<()> {
    if !(sigma.is_finite() && sigma > 0.0) {
        return Err(SpyboatError::InvalidParameter {
            name: "sigma",
            value: sigma,
            reason: "Gaussian kernel width must be positive",
        });
    }
    Ok(())
}

/// Separable Gaussian blur with edge clamping; `sigma` must already be valid.
pub(crate) fn gaussian_blur_array(data: ArrayView2<'_, f64>, sigma: f64) -> Array2<f64> {
    let kernel = make_gaussian_kernel(sigma);
    let row_pass = convolve(data, &kernel, Axis(1));
    convolve(row_pass.view(), &kernel, Axis(0))
}

fn make_gaussian_kernel(sigma: f64) -> Vec<f64> {
    let radius = (sigma * GAUSSIAN_TRUNCATE).ceil() as usize;
    let size = 2 * radius + 1;
    let mut kernel = vec![0.0f64; size];
    let s2 = 2.0 * sigma * sigma;
    let mut sum = 0.0f64;

    for (i, k) in kernel.iter_mut().enumerate() {
        let x = i as f64 - radius as f64;
        *k = (-x * x / s2).exp();
        sum += *k;
    }

    for v in &mut kernel {
        *v /= sum;
    }

    kernel
}

/// 1-D convolution along `axis` (1 = within rows, 0 = within columns).
fn convolve(data: ArrayView2<'_, f64>, kernel: &[f64], axis: Axis) -> Array2<f64> {
    let (h, w) = data.dim();
    let radius = kernel.len() / 2;
    let along_rows = axis == Axis(1);

    let sample = |row: usize, col: usize| -> f64 {
        let mut sum = 0.0f64;
        for (ki, &kv) in kernel.iter().enumerate() {
            let offset = ki as isize - radius as isize;
            let v = if along_rows {
                let src_col = (col as isize + offset).clamp(0, w as isize - 1) as usize;
                data[[row, src_col]]
            } else {
                let src_row = (row as isize + offset).clamp(0, h as isize - 1) as usize;
                data[[src_row, col]]
            };
            sum += v * kv;
        }
        sum
    };

    let mut result = Array2::<f64>::zeros((h, w));
    if h * w >= PARALLEL_PIXEL_THRESHOLD {
        result
            .axis_iter_mut(Axis(0))
            .into_par_iter()
            .enumerate()
            .for_each(|(row, mut out)| {
                for col in 0..w {
                    out[col] = sample(row, col);
                }
            });
    } else {
        for row in 0..h {
            for col in 0..w {
                result[[row, col]] = sample(row, col);
            }
        }
    }
    result
}
