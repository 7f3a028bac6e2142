//! Shared types used across the filter library
//!
//! Configuration errors, low-pass selection and unit conversions.

use core::fmt;

use crate::config::MICROS_PER_SECOND;

/// Filter configuration error.
///
/// Only constructors return this. Per-sample operations are infallible.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum FilterError {
    /// Cascade order is zero, odd, or above the supported maximum
    InvalidOrder(usize),
    /// Requested window exceeds the platform capacity
    WindowTooLarge {
        /// Requested window in samples
        requested: usize,
        /// Capacity for this build
        max: usize,
    },
    /// Window of zero samples
    EmptyWindow,
    /// More coefficients than buffered samples
    CoefficientsTooLong {
        /// Number of coefficients requested
        coeffs: usize,
        /// Buffer length
        buffer: usize,
    },
    /// FIR buffer has no storage
    EmptyBuffer,
    /// Notch center not above its cutoff
    DegenerateNotch,
    /// Frequency not inside (0, Nyquist)
    InvalidFrequency,
}

impl fmt::Display for FilterError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidOrder(order) => {
                write!(f, "unsupported cascade order {order}")
            }
            Self::WindowTooLarge { requested, max } => {
                write!(f, "window of {requested} samples exceeds capacity {max}")
            }
            Self::EmptyWindow => f.write_str("window must hold at least one sample"),
            Self::CoefficientsTooLong { coeffs, buffer } => {
                write!(f, "{coeffs} coefficients do not fit a {buffer} sample buffer")
            }
            Self::EmptyBuffer => f.write_str("buffer has no storage"),
            Self::DegenerateNotch => f.write_str("notch center must be above cutoff"),
            Self::InvalidFrequency => f.write_str("frequency outside (0, Nyquist)"),
        }
    }
}

/// Low-pass filter family selectable at configuration time
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum LowpassType {
    /// First-order lag
    #[default]
    Pt1,
    /// Single 2nd-order Butterworth biquad
    Biquad,
    /// Butterworth cascade of configurable order
    Butterworth,
    /// Biquad configured as an RC + 2-tap FIR hybrid
    BiquadRcFir2,
    /// Fixed-gain exponential smoother
    FastKalman,
    /// Moving-sum FIR denoiser with a window matched to the cutoff
    #[cfg(feature = "fir-denoise")]
    Fir,
}

/// Low-pass selection and tuning
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct LowpassConfig {
    /// Filter family
    pub kind: LowpassType,
    /// Cutoff frequency in Hz; zero disables filtering
    pub cutoff_hz: f32,
    /// Cascade order, used by [`LowpassType::Butterworth`] only
    pub order: usize,
}

impl LowpassConfig {
    /// Create a configuration for a filter family and cutoff
    #[must_use]
    pub const fn new(kind: LowpassType, cutoff_hz: f32) -> Self {
        Self {
            kind,
            cutoff_hz,
            order: 2,
        }
    }

    /// Set the cascade order
    #[must_use]
    pub const fn with_order(mut self, order: usize) -> Self {
        self.order = order;
        self
    }

    /// Whether this configuration filters anything
    #[must_use]
    pub fn is_enabled(&self) -> bool {
        self.cutoff_hz > 0.0
    }
}

impl Default for LowpassConfig {
    fn default() -> Self {
        Self::new(LowpassType::Pt1, 0.0)
    }
}

/// Convert a loop period in microseconds to a sample rate in Hz
#[must_use]
pub fn looptime_us_to_sample_rate(looptime_us: u32) -> f32 {
    MICROS_PER_SECOND / looptime_us as f32
}

/// Convert a loop period in microseconds to seconds
#[must_use]
pub fn looptime_us_to_seconds(looptime_us: u32) -> f32 {
    looptime_us as f32 / MICROS_PER_SECOND
}

/// Check that `freq_hz` lies strictly between zero and Nyquist
///
/// # Errors
///
/// [`FilterError::InvalidFrequency`] when it does not.
pub fn check_frequency(freq_hz: f32, sample_rate_hz: f32) -> Result<(), FilterError> {
    if freq_hz > 0.0 && freq_hz < sample_rate_hz / 2.0 {
        Ok(())
    } else {
        Err(FilterError::InvalidFrequency)
    }
}
