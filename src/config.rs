//! Capacity limits and tuning defaults
//!
//! Window capacities are fixed at build time per target memory budget.
//! Constructors that take a window size check it against these limits.

/// Maximum FIR denoiser window in samples.
///
/// Memory-constrained targets keep a single sample, which turns the
/// denoiser into a passthrough.
#[cfg(feature = "constrained-target")]
pub const MAX_FIR_DENOISE_WINDOW_SIZE: usize = 1;

/// Maximum FIR denoiser window in samples.
#[cfg(not(feature = "constrained-target"))]
pub const MAX_FIR_DENOISE_WINDOW_SIZE: usize = 120;

/// Maximum lagged moving average window in samples
pub const MAX_LMA_WINDOW_SIZE: usize = 12;

/// Highest Butterworth low-pass order a biquad cascade can realize
pub const BIQUAD_LPF_ORDER_MAX: usize = 12;

/// Number of 2nd-order sections needed for [`BIQUAD_LPF_ORDER_MAX`]
pub const BIQUAD_CASCADE_MAX_SECTIONS: usize = BIQUAD_LPF_ORDER_MAX / 2;

/// Q of a single 2nd-order Butterworth section (1/√2)
pub const BIQUAD_BUTTERWORTH_Q: f32 = core::f32::consts::FRAC_1_SQRT_2;

/// Microseconds per second, for loop time conversions
pub const MICROS_PER_SECOND: f32 = 1_000_000.0;

/// Dynamic notch defaults
pub mod dyn_notch {
    //! Tuning used when tracking a moving noise peak with a notch

    /// Distance between the notch center and its -3 dB cutoff (Hz)
    pub const WIDTH_HZ: f32 = 100.0;

    /// Low-pass cutoff applied to center-frequency estimates (Hz)
    pub const CHANGE_RATE_HZ: f32 = 60.0;

    /// Lowest allowed notch cutoff (Hz)
    pub const MIN_CUTOFF_HZ: f32 = 120.0;

    /// Highest allowed notch cutoff (Hz)
    pub const MAX_CUTOFF_HZ: f32 = 200.0;

    /// Highest allowed notch center (Hz)
    pub const MAX_CENTER_HZ: f32 = 500.0;

    /// Margin kept between the lowest center and the lowest cutoff (Hz)
    pub const CENTER_MARGIN_HZ: f32 = 10.0;

    /// Center used before the first estimate arrives (Hz)
    pub const INITIAL_CENTER_HZ: f32 = 200.0;
}
