use spyboat_core::error::SpyboatError;
use spyboat_core::transform::{
    Detrending, Normalization, PeriodGrid, PeriodRange, TransformParams,
};

fn range(t_min: f64, t_max: f64, n_periods: usize) -> PeriodRange {
    PeriodRange {
        t_min,
        t_max,
        n_periods,
    }
}

// ---------------------------------------------------------------------------
// PeriodGrid
// ---------------------------------------------------------------------------

#[test]
fn test_grid_is_linear_and_inclusive() {
    let grid = PeriodGrid::new(&range(10.0, 30.0, 21)).unwrap();
    assert_eq!(grid.len(), 21);
    assert_eq!(grid.get(0), Some(10.0));
    assert_eq!(grid.get(20), Some(30.0));
    for (i, &p) in grid.as_slice().iter().enumerate() {
        assert!((p - (10.0 + i as f64)).abs() < 1e-12);
    }
}

#[test]
fn test_grid_end_point_is_exact() {
    let grid = PeriodGrid::new(&range(0.1, 0.7, 7)).unwrap();
    assert_eq!(*grid.as_slice().last().unwrap(), 0.7);
    assert_eq!(grid.as_slice()[0], 0.1);
}

#[test]
fn test_grid_single_period() {
    let grid = PeriodGrid::new(&range(24.0, 24.0, 1)).unwrap();
    assert_eq!(grid.as_slice(), &[24.0]);
    assert_eq!(range(24.0, 24.0, 1).step(), 0.0);
}

#[test]
fn test_single_period_needs_equal_bounds() {
    let err = PeriodGrid::new(&range(20.0, 30.0, 1)).unwrap_err();
    assert!(matches!(err, SpyboatError::InvalidPeriodRange { .. }));
}

#[test]
fn test_rejects_inverted_range() {
    assert!(matches!(
        range(40.0, 20.0, 10).validate(),
        Err(SpyboatError::InvalidPeriodRange { .. })
    ));
}

#[test]
fn test_rejects_non_positive_tmin() {
    assert!(range(0.0, 20.0, 10).validate().is_err());
    assert!(range(-5.0, 20.0, 10).validate().is_err());
}

#[test]
fn test_rejects_zero_periods() {
    assert!(range(10.0, 20.0, 0).validate().is_err());
}

#[test]
fn test_rejects_nan_bounds() {
    assert!(range(f64::NAN, 20.0, 10).validate().is_err());
    assert!(range(10.0, f64::INFINITY, 10).validate().is_err());
}

// ---------------------------------------------------------------------------
// TransformParams
// ---------------------------------------------------------------------------

#[test]
fn test_default_params_are_valid_and_detrended() {
    let params = TransformParams::default();
    params.validate().unwrap();
    assert_eq!(params.detrend, Detrending::Sinc { cutoff: 60.0 });
    assert_eq!(params.normalization, Normalization::Disabled);
    assert_eq!(params.period_grid().unwrap().len(), 100);
}

#[test]
fn test_rejects_non_positive_dt() {
    for dt in [0.0, -1.0, f64::NAN] {
        let params = TransformParams {
            dt,
            ..TransformParams::default()
        };
        assert!(matches!(
            params.validate(),
            Err(SpyboatError::InvalidSamplingInterval(_))
        ));
    }
}

#[test]
fn test_rejects_non_positive_cutoff() {
    let params = TransformParams {
        detrend: Detrending::Sinc { cutoff: 0.0 },
        ..TransformParams::default()
    };
    assert!(matches!(
        params.validate(),
        Err(SpyboatError::InvalidParameter { name: "cutoff", .. })
    ));
}

#[test]
fn test_rejects_non_positive_window() {
    let params = TransformParams {
        normalization: Normalization::Envelope { window: -3.0 },
        ..TransformParams::default()
    };
    assert!(matches!(
        params.validate(),
        Err(SpyboatError::InvalidParameter { name: "window", .. })
    ));
}

#[test]
fn test_params_toml_roundtrip() {
    let params = TransformParams {
        dt: 0.5,
        periods: range(12.0, 36.0, 25),
        detrend: Detrending::Sinc { cutoff: 48.0 },
        normalization: Normalization::Envelope { window: 30.0 },
    };
    let text = toml::to_string(&params).unwrap();
    let back: TransformParams = toml::from_str(&text).unwrap();
    assert_eq!(back, params);
}

#[test]
fn test_params_preprocessing_defaults_to_disabled() {
    let text = r#"
dt = 2.0

[periods]
t_min = 10.0
t_max = 20.0
n_periods = 11
"#;
    let params: TransformParams = toml::from_str(text).unwrap();
    assert_eq!(params.detrend, Detrending::Disabled);
    assert_eq!(params.normalization, Normalization::Disabled);
    assert_eq!(params.periods.step(), 1.0);
}
