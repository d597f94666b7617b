//! Spatial filters applied frame by frame to movies.

pub mod gaussian_blur;
pub mod rescale;

use ndarray::{Array2, Array3, ArrayView3, Axis};
use rayon::prelude::*;

use crate::consts::PARALLEL_FRAME_THRESHOLD;
use crate::movie::Movie;

/// Apply `op` to every frame of `movie` and stack the results back along the
/// frame axis. All frames must map to the same output shape.
pub(crate) fn map_frames<F>(movie: ArrayView3<'_, f64>, op: F) -> Movie
where
    F: Fn(ndarray::ArrayView2<'_, f64>) -> Array2<f64> + Sync,
{
    let frames: Vec<Array2<f64>> = if movie.len_of(Axis(0)) >= PARALLEL_FRAME_THRESHOLD {
        movie
            .axis_iter(Axis(0))
            .into_par_iter()
            .map(|frame| op(frame))
            .collect()
    } else {
        movie.axis_iter(Axis(0)).map(|frame| op(frame)).collect()
    };

    let (h, w) = frames.first().map(|f| f.dim()).unwrap_or((0, 0));
    let mut result = Array3::<f64>::zeros((frames.len(), h, w));
    for (mut dst, frame) in result.axis_iter_mut(Axis(0)).zip(&frames) {
        dst.assign(frame);
    }
    result
}
