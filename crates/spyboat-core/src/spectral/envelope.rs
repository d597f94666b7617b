use ndarray::{s, Array1, ArrayView1};

use crate::consts::{EPSILON, MIN_ENVELOPE_WINDOW};
use crate::error::{Result, SpyboatError};

/// Amplitude envelope from a centred sliding window of length `window`
/// (in time units).
///
/// The envelope at each interior point is half the peak-to-peak range inside
/// the window. Points closer than half a window to either end reuse the
/// nearest interior value.
pub fn sliding_window_amplitude(
    signal: ArrayView1<'_, f64>,
    window: f64,
    dt: f64,
) -> Result<Array1<f64>> {
    if !(dt.is_finite() && dt > 0.0) {
        return Err(SpyboatError::InvalidSamplingInterval(dt));
    }
    if !(window.is_finite() && window > 0.0) {
        return Err(SpyboatError::InvalidParameter {
            name: "window",
            value: window,
            reason: "normalization window must be positive",
        });
    }

    let mut size = (window / dt) as usize;
    if size % 2 == 0 {
        size += 1;
    }
    if size < MIN_ENVELOPE_WINDOW {
        return Err(SpyboatError::InvalidParameter {
            name: "window",
            value: window,
            reason: "normalization window spans fewer than three samples",
        });
    }
    let n = signal.len();
    if size > n {
        return Err(SpyboatError::WindowTooLong { window: size, len: n });
    }

    let half = size / 2;
    let mut envelope = Array1::<f64>::zeros(n);
    for center in half..n - half {
        let (lo, hi) = signal
            .slice(s![center - half..=center + half])
            .iter()
            .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), &v| {
                (lo.min(v), hi.max(v))
            });
        envelope[center] = (hi - lo) / 2.0;
    }

    let first = envelope[half];
    let last = envelope[n - half - 1];
    envelope.slice_mut(s![..half]).fill(first);
    envelope.slice_mut(s![n - half..]).fill(last);

    Ok(envelope)
}

/// Divide `signal` by its sliding-window amplitude envelope. Samples where
/// the envelope vanishes are set to zero.
pub fn normalize_with_envelope(
    signal: ArrayView1<'_, f64>,
    window: f64,
    dt: f64,
) -> Result<Array1<f64>> {
    let envelope = sliding_window_amplitude(signal, window, dt)?;
    let normalized = signal
        .iter()
        .zip(envelope.iter())
        .map(|(&x, &a)| if a > EPSILON { x / a } else { 0.0 })
        .collect::<Vec<_>>();
    Ok(Array1::from(normalized))
}
