//! Dispatch Tests
//!
//! Heterogeneous filters driven through one call-site.
//! Run with: cargo test --features std

use flight_filters::filter::dyn_notch::DynamicNotchConfig;
use flight_filters::{
    null_filter_apply, BiquadCascade, BiquadFilter, DynamicNotch, FastKalman, Filter, FilterApply, FilterError,
    FirFilter, LaggedMovingAverage, LowpassConfig, LowpassType, Pt1Filter, SlewFilter,
};

const LOOP_RATE: f32 = 1000.0;

// =============================================================================
// Uniform Call-site
// =============================================================================

#[test]
fn test_filter_bank_single_call_site() {
    let mut fir_buf = [0.0; 2];
    let fir_coeffs = [0.5, 0.5];

    let mut bank: [Filter<'_>; 8] = [
        Filter::Null,
        Pt1Filter::new(1.0).into(),
        BiquadFilter::passthrough().into(),
        BiquadCascade::passthrough().into(),
        FastKalman::new(1.0).into(),
        LaggedMovingAverage::new(1, 1.0).unwrap().into(),
        SlewFilter::new(1.0, 100.0).into(),
        FirFilter::new(&mut fir_buf, &fir_coeffs).into(),
    ];

    let outputs: Vec<f32> = bank.iter_mut().map(|f| f.apply(4.0)).collect();
    // FIR averages with the empty slot; everything else passes 4.0 through
    assert_eq!(outputs, vec![4.0, 4.0, 4.0, 4.0, 4.0, 4.0, 4.0, 2.0]);
}

#[test]
fn test_trait_object_dispatch() {
    let mut pt1 = Pt1Filter::new(0.5);
    let mut slew = SlewFilter::new(1.0, 0.5);
    let filters: [&mut dyn FilterApply; 2] = [&mut pt1, &mut slew];
    let outputs: Vec<f32> = filters.into_iter().map(|f| f.apply(2.0)).collect();
    assert_eq!(outputs, vec![1.0, 1.0]);
}

#[test]
fn test_enum_matches_direct_call() {
    let mut direct = BiquadFilter::init_lpf(40.0, LOOP_RATE);
    let mut dispatched = Filter::Biquad(direct);
    let mut df1 = Filter::BiquadDf1(direct);
    let mut direct_df1 = direct;
    for n in 0..100 {
        let x = if n % 7 == 0 { 1.0 } else { -0.25 };
        assert_eq!(dispatched.apply(x), direct.apply(x));
        assert_eq!(df1.apply(x), direct_df1.apply_df1(x));
    }
}

#[test]
fn test_null_filter() {
    for x in [0.0, -1.0, 1e9, f32::MIN_POSITIVE] {
        assert_eq!(null_filter_apply(x), x);
        assert_eq!(Filter::Null.apply(x), x);
    }
}

// =============================================================================
// Configuration-time Selection
// =============================================================================

#[test]
fn test_lowpass_from_config() {
    let cases = [
        (LowpassType::Pt1, "pt1"),
        (LowpassType::Biquad, "biquad"),
        (LowpassType::Butterworth, "cascade"),
        (LowpassType::BiquadRcFir2, "biquad"),
        (LowpassType::FastKalman, "kalman"),
    ];
    for (kind, expected) in cases {
        let filter = Filter::lowpass(&LowpassConfig::new(kind, 100.0).with_order(4), LOOP_RATE);
        let got = match filter {
            Filter::Pt1(_) => "pt1",
            Filter::Biquad(_) => "biquad",
            Filter::Cascade(_) => "cascade",
            Filter::FastKalman(_) => "kalman",
            _ => "other",
        };
        assert_eq!(got, expected, "{:?}", kind);
    }
}

#[test]
fn test_every_lowpass_has_unity_dc_gain() {
    for kind in [
        LowpassType::Pt1,
        LowpassType::Biquad,
        LowpassType::Butterworth,
        LowpassType::BiquadRcFir2,
        LowpassType::FastKalman,
    ] {
        let mut filter = Filter::lowpass(&LowpassConfig::new(kind, 80.0).with_order(6), LOOP_RATE);
        let mut output = 0.0;
        for _ in 0..3000 {
            output = filter.apply(3.0);
        }
        assert!((output - 3.0).abs() < 1e-3, "{:?}: {}", kind, output);
    }
}

#[test]
fn test_lowpass_rejections_fall_back_to_null() {
    let too_high = LowpassConfig::new(LowpassType::Biquad, 500.0);
    assert_eq!(Filter::try_lowpass(&too_high, LOOP_RATE).err(), Some(FilterError::InvalidFrequency));
    assert!(Filter::lowpass(&too_high, LOOP_RATE).is_null());

    let odd_order = LowpassConfig::new(LowpassType::Butterworth, 100.0).with_order(5);
    assert_eq!(Filter::try_lowpass(&odd_order, LOOP_RATE).err(), Some(FilterError::InvalidOrder(5)));
    assert!(Filter::lowpass(&odd_order, LOOP_RATE).is_null());

    let disabled = LowpassConfig::default();
    assert!(Filter::try_lowpass(&disabled, LOOP_RATE).unwrap().is_null());
}

#[test]
fn test_dynamic_notch_through_dispatch() {
    let fs = 8000.0;
    let notch = DynamicNotch::try_new(DynamicNotchConfig::default(), fs, 1000.0).unwrap();
    let mut filter: Filter<'static> = notch.into();
    let center = notch.center_hz();
    let mut peak: f32 = 0.0;
    for n in 0..8000 {
        let x = (2.0 * core::f32::consts::PI * center * n as f32 / fs).sin();
        let y = filter.apply(x);
        if n > 4000 {
            peak = peak.max(y.abs());
        }
    }
    assert!(peak < 0.01, "residual: {}", peak);
}
