use serde::{Deserialize, Serialize};

use crate::error::{Result, SpyboatError};

/// Range of candidate periods scanned by the wavelet transform.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct PeriodRange {
    pub t_min: f64,
    pub t_max: f64,
    pub n_periods: usize,
}

impl Default for PeriodRange {
    fn default() -> Self {
        Self {
            t_min: 20.0,
            t_max: 40.0,
            n_periods: 100,
        }
    }
}

impl PeriodRange {
    pub fn validate(&self) -> Result<()> {
        let invalid = || SpyboatError::InvalidPeriodRange {
            t_min: self.t_min,
            t_max: self.t_max,
            n_periods: self.n_periods,
        };
        if !(self.t_min.is_finite() && self.t_max.is_finite()) {
            return Err(invalid());
        }
        if self.t_min <= 0.0 || self.t_min > self.t_max || self.n_periods == 0 {
            return Err(invalid());
        }
        if self.n_periods == 1 && self.t_min != self.t_max {
            return Err(invalid());
        }
        Ok(())
    }

    /// Spacing between neighbouring grid periods (zero for a single period).
    pub fn step(&self) -> f64 {
        if self.n_periods > 1 {
            (self.t_max - self.t_min) / (self.n_periods - 1) as f64
        } else {
            0.0
        }
    }
}

/// The linearly spaced periods scanned for every pixel. Built once per run
/// and shared read-only by all pixels and workers.
#[derive(Clone, Debug, PartialEq)]
pub struct PeriodGrid {
    periods: Vec<f64>,
}

impl PeriodGrid {
    pub fn new(range: &PeriodRange) -> Result<Self> {
        range.validate()?;
        let step = range.step();
        let mut periods: Vec<f64> = (0..range.n_periods)
            .map(|i| range.t_min + i as f64 * step)
            .collect();
        // Pin the end point so it is exactly Tmax despite rounding.
        if let Some(last) = periods.last_mut() {
            *last = range.t_max;
        }
        Ok(Self { periods })
    }

    pub fn as_slice(&self) -> &[f64] {
        &self.periods
    }

    pub fn len(&self) -> usize {
        self.periods.len()
    }

    pub fn is_empty(&self) -> bool {
        self.periods.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<f64> {
        self.periods.get(index).copied()
    }
}

/// Sinc detrending of each pixel series before the transform.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Detrending {
    /// Use the raw series. Slow drifts then bias the amplitude estimates.
    #[default]
    Disabled,
    /// Subtract the low-pass trend with the given cutoff period.
    Sinc { cutoff: f64 },
}

/// Sliding-window amplitude normalization of each pixel series.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Normalization {
    #[default]
    Disabled,
    /// Divide by the amplitude envelope over a window of the given length.
    Envelope { window: f64 },
}

/// Parameters shared by every pixel transform of a run.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct TransformParams {
    /// Sampling interval between frames.
    pub dt: f64,
    pub periods: PeriodRange,
    #[serde(default)]
    pub detrend: Detrending,
    #[serde(default)]
    pub normalization: Normalization,
}

impl Default for TransformParams {
    fn default() -> Self {
        Self {
            dt: 1.0,
            periods: PeriodRange::default(),
            detrend: Detrending::Sinc { cutoff: 60.0 },
            normalization: Normalization::Disabled,
        }
    }
}

impl TransformParams {
    pub fn validate(&self) -> Result<()> {
        if !(self.dt.is_finite() && self.dt > 0.0) {
            return Err(SpyboatError::InvalidSamplingInterval(self.dt));
        }
        self.periods.validate()?;
        if let Detrending::Sinc { cutoff } = self.detrend {
            if !(cutoff.is_finite() && cutoff > 0.0) {
                return Err(SpyboatError::InvalidParameter {
                    name: "cutoff",
                    value: cutoff,
                    reason: "detrending cutoff period must be positive",
                });
            }
        }
        if let Normalization::Envelope { window } = self.normalization {
            if !(window.is_finite() && window > 0.0) {
                return Err(SpyboatError::InvalidParameter {
                    name: "window",
                    value: window,
                    reason: "normalization window must be positive",
                });
            }
        }
        Ok(())
    }

    /// Validate and build the period grid for this run.
    pub fn period_grid(&self) -> Result<PeriodGrid> {
        self.validate()?;
        PeriodGrid::new(&self.periods)
    }
}
