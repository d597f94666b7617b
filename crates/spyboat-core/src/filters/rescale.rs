use ndarray::{Array2, ArrayView2, ArrayView3};

use crate::error::{Result, SpyboatError};
use crate::movie::{validate_movie, Movie};

use super::gaussian_blur::gaussian_blur_array;
use super::map_frames;

/// Spatially downsample every frame of a (frames, rows, cols) movie.
///
/// Only downsampling is supported: `scale` must lie in (0, 1]. The frame
/// count is preserved.
pub fn down_sample(movie: ArrayView3<'_, f64>, scale: f64) -> Result<Movie> {
    validate_scale(scale)?;
    validate_movie(&movie)?;
    Ok(map_frames(movie, |frame| rescale_array(frame, scale)))
}

/// Resize a single frame by `scale` in (0, 1].
///
/// Values stay within the input's range: the anti-aliasing blur and the
/// bilinear interpolation are both convex combinations of input pixels.
pub fn rescale_frame(frame: ArrayView2<'_, f64>, scale: f64) -> Result<Array2<f64>> {
    validate_scale(scale)?;
    let (height, width) = frame.dim();
    if height == 0 || width == 0 {
        return Err(SpyboatError::InvalidDimensions {
            frames: 1,
            height,
            width,
        });
    }
    Ok(rescale_array(frame, scale))
}

/// Output shape of a frame of `(height, width)` rescaled by `scale`.
pub fn rescaled_dim(height: usize, width: usize, scale: f64) -> (usize, usize) {
    let dim = |n: usize| ((n as f64 * scale).round() as usize).max(1);
    (dim(height), dim(width))
}

fn validate_scale(scale: f64) -> Result<()> {
    if !(scale.is_finite() && scale > 0.0 && scale <= 1.0) {
        return Err(SpyboatError::InvalidScaleFactor(scale));
    }
    Ok(())
}

fn rescale_array(frame: ArrayView2<'_, f64>, scale: f64) -> Array2<f64> {
    if scale == 1.0 {
        return frame.to_owned();
    }

    let (h, w) = frame.dim();
    let (out_h, out_w) = rescaled_dim(h, w, scale);

    // Anti-aliasing prefilter, same width as skimage's rescale uses.
    let sigma = (1.0 / scale - 1.0) / 2.0;
    let source = if sigma > 0.0 {
        gaussian_blur_array(frame, sigma)
    } else {
        frame.to_owned()
    };

    let ratio_y = h as f64 / out_h as f64;
    let ratio_x = w as f64 / out_w as f64;

    Array2::from_shape_fn((out_h, out_w), |(row, col)| {
        // Map output pixel centres onto input pixel centres.
        let y = ((row as f64 + 0.5) * ratio_y - 0.5).clamp(0.0, (h - 1) as f64);
        let x = ((col as f64 + 0.5) * ratio_x - 0.5).clamp(0.0, (w - 1) as f64);
        bilinear(&source, y, x)
    })
}

fn bilinear(data: &Array2<f64>, y: f64, x: f64) -> f64 {
    let (h, w) = data.dim();
    let y0 = y.floor() as usize;
    let x0 = x.floor() as usize;
    let y1 = (y0 + 1).min(h - 1);
    let x1 = (x0 + 1).min(w - 1);
    let fy = y - y0 as f64;
    let fx = x - x0 as f64;

    let top = data[[y0, x0]] * (1.0 - fx) + data[[y0, x1]] * fx;
    let bottom = data[[y1, x0]] * (1.0 - fx) + data[[y1, x1]] * fx;
    top * (1.0 - fy) + bottom * fy
}
