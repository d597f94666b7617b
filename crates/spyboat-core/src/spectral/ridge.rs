use ndarray::{Array2, ArrayView2};

use super::RidgeTrace;

/// Trace the maximum-power ridge through a (periods x time) modulus matrix.
///
/// Finds the path `y_0..y_{N-1}` maximizing
/// `sum_t modulus[y_t, t] - penalty * sum_t |y_t - y_{t-1}|`
/// by dynamic programming. The inner maximization over the previous index is
/// an L1 distance transform, done in two linear sweeps, so each time step
/// costs O(nT). Ties always resolve to the lower period index. A penalty of
/// zero reduces to the per-column arg-max.
pub fn trace_ridge(modulus: ArrayView2<'_, f64>, penalty: f64) -> RidgeTrace {
    let (n_periods, n_times) = modulus.dim();
    if n_periods == 0 || n_times == 0 {
        return RidgeTrace {
            indices: Vec::new(),
            score: 0.0,
        };
    }

    let mut score: Vec<f64> = modulus.column(0).to_vec();
    let mut next = vec![0.0f64; n_periods];
    let mut forward = vec![(0.0f64, 0usize); n_periods];
    let mut backward = vec![(0.0f64, 0usize); n_periods];
    // predecessor[[t, i]]: best index at t-1 given index i at t
    let mut predecessor = Array2::<usize>::zeros((n_times, n_periods));

    for t in 1..n_times {
        // Best predecessor among j <= i.
        forward[0] = (score[0], 0);
        for i in 1..n_periods {
            let (carried, j) = forward[i - 1];
            let carried = carried - penalty;
            forward[i] = if carried >= score[i] {
                (carried, j)
            } else {
                (score[i], i)
            };
        }
        // Best predecessor among j >= i.
        backward[n_periods - 1] = (score[n_periods - 1], n_periods - 1);
        for i in (0..n_periods - 1).rev() {
            let (carried, j) = backward[i + 1];
            let carried = carried - penalty;
            backward[i] = if score[i] >= carried {
                (score[i], i)
            } else {
                (carried, j)
            };
        }

        for i in 0..n_periods {
            let (best, j) = if forward[i].0 >= backward[i].0 {
                forward[i]
            } else {
                backward[i]
            };
            next[i] = best + modulus[[i, t]];
            predecessor[[t, i]] = j;
        }
        std::mem::swap(&mut score, &mut next);
    }

    let (mut index, best) = score
        .iter()
        .enumerate()
        .fold((0usize, f64::NEG_INFINITY), |(bi, bv), (i, &v)| {
            if v > bv {
                (i, v)
            } else {
                (bi, bv)
            }
        });

    let mut indices = vec![0usize; n_times];
    indices[n_times - 1] = index;
    for t in (1..n_times).rev() {
        index = predecessor[[t, index]];
        indices[t - 1] = index;
    }

    RidgeTrace {
        indices,
        score: best,
    }
}
