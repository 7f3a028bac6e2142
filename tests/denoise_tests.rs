//! FIR Denoiser Tests
//!
//! Run with: cargo test --features std,fir-denoise

use flight_filters::config::MAX_FIR_DENOISE_WINDOW_SIZE;
use flight_filters::{Filter, FilterApply, FilterError, FirDenoise, LowpassConfig, LowpassType};

fn approx_eq(a: f32, b: f32, tol: f32) -> bool {
    (a - b).abs() < tol
}

// =============================================================================
// Window Sizing
// =============================================================================

#[test]
#[cfg(not(feature = "constrained-target"))]
fn test_window_from_cutoff_and_looptime() {
    // 1 kHz loop
    assert_eq!(FirDenoise::window_for(100, 1000), 10);
    assert_eq!(FirDenoise::window_for(300, 1000), 3);
    // 8 kHz loop
    assert_eq!(FirDenoise::new(200, 125).target_count(), 40);
}

#[test]
fn test_window_clamped_to_capacity() {
    assert_eq!(FirDenoise::window_for(1, 125), MAX_FIR_DENOISE_WINDOW_SIZE);
    assert_eq!(FirDenoise::window_for(0, 125), 1);
    assert_eq!(
        FirDenoise::try_with_window(MAX_FIR_DENOISE_WINDOW_SIZE + 1).err(),
        Some(FilterError::WindowTooLarge {
            requested: MAX_FIR_DENOISE_WINDOW_SIZE + 1,
            max: MAX_FIR_DENOISE_WINDOW_SIZE,
        })
    );
    assert_eq!(FirDenoise::try_with_window(0).err(), Some(FilterError::EmptyWindow));
}

// =============================================================================
// Averaging
// =============================================================================

#[test]
#[cfg(not(feature = "constrained-target"))]
fn test_ramp_up_averages_samples_seen() {
    let mut denoise = FirDenoise::try_with_window(4).unwrap();
    assert_eq!(denoise.update(4.0), 4.0);
    assert_eq!(denoise.update(8.0), 6.0);
    assert_eq!(denoise.update(0.0), 4.0);
    assert_eq!(denoise.filled_count(), 3);
    assert_eq!(denoise.update(4.0), 4.0);
    assert_eq!(denoise.filled_count(), 4);
}

#[test]
#[cfg(not(feature = "constrained-target"))]
fn test_full_window_slides() {
    let mut denoise = FirDenoise::try_with_window(3).unwrap();
    for x in [3.0, 6.0, 9.0] {
        denoise.update(x);
    }
    // 3.0 leaves, 12.0 enters
    assert!(approx_eq(denoise.update(12.0), 9.0, 1e-6));
    assert!(approx_eq(denoise.update(12.0), 11.0, 1e-6));
    assert_eq!(denoise.filled_count(), 3);
}

#[test]
fn test_single_sample_window_is_passthrough() {
    let mut denoise = FirDenoise::try_with_window(1).unwrap();
    for x in [1.0, -7.5, 2.25] {
        assert_eq!(denoise.update(x), x);
    }
}

#[test]
#[cfg(not(feature = "constrained-target"))]
fn test_reset_restarts_ramp() {
    let mut denoise = FirDenoise::try_with_window(5).unwrap();
    for _ in 0..10 {
        denoise.update(2.0);
    }
    denoise.reset();
    assert_eq!(denoise.filled_count(), 0);
    assert_eq!(denoise.update(-1.0), -1.0);
}

#[test]
#[cfg(not(feature = "constrained-target"))]
fn test_denoise_through_dispatch() {
    let mut filter: Filter<'static> = FirDenoise::try_with_window(2).unwrap().into();
    assert_eq!(filter.apply(2.0), 2.0);
    assert_eq!(filter.apply(4.0), 3.0);
    assert_eq!(filter.apply(6.0), 5.0);
}

#[test]
#[cfg(not(feature = "constrained-target"))]
fn test_fir_lowpass_selects_denoiser() {
    // 1 kHz loop, 100 Hz cutoff: 10 sample window
    let config = LowpassConfig::new(LowpassType::Fir, 100.0);
    let mut filter = Filter::lowpass(&config, 1000.0);
    match &filter {
        Filter::Denoise(denoise) => assert_eq!(denoise.target_count(), 10),
        other => panic!("expected denoiser, got {:?}", other),
    }
    let mut output = 0.0;
    for _ in 0..10 {
        output = filter.apply(2.0);
    }
    assert_eq!(output, 2.0);
}
