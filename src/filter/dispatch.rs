//! Uniform filter dispatch
//!
//! [`FilterApply`] is the common "one sample in, one sample out" contract.
//! [`Filter`] closes over every filter kind so a control loop can hold a
//! configured filter per axis and drive it from one call-site. The variant is
//! chosen when the filter is configured, never per sample.

use crate::filter::biquad::{BiquadCascade, BiquadFilter};
#[cfg(feature = "fir-denoise")]
use crate::filter::denoise::FirDenoise;
use crate::filter::dyn_notch::DynamicNotch;
use crate::filter::fir::FirFilter;
use crate::filter::kalman::FastKalman;
use crate::filter::lma::LaggedMovingAverage;
use crate::filter::pt1::Pt1Filter;
use crate::filter::slew::SlewFilter;
use crate::types::{check_frequency, FilterError, LowpassConfig, LowpassType};

/// Process one sample through a filter
pub trait FilterApply {
    /// Push `input` and return the filtered output
    fn apply(&mut self, input: f32) -> f32;
}

/// Disabled filter: returns the input unchanged
#[must_use]
pub fn null_filter_apply(input: f32) -> f32 {
    input
}

impl FilterApply for Pt1Filter {
    fn apply(&mut self, input: f32) -> f32 {
        Pt1Filter::apply(self, input)
    }
}

impl FilterApply for BiquadFilter {
    fn apply(&mut self, input: f32) -> f32 {
        BiquadFilter::apply(self, input)
    }
}

impl FilterApply for BiquadCascade {
    fn apply(&mut self, input: f32) -> f32 {
        BiquadCascade::apply(self, input)
    }
}

impl FilterApply for FastKalman {
    fn apply(&mut self, input: f32) -> f32 {
        self.update(input)
    }
}

impl FilterApply for LaggedMovingAverage {
    fn apply(&mut self, input: f32) -> f32 {
        self.update(input)
    }
}

impl FilterApply for SlewFilter {
    fn apply(&mut self, input: f32) -> f32 {
        SlewFilter::apply(self, input)
    }
}

impl FilterApply for FirFilter<'_> {
    fn apply(&mut self, input: f32) -> f32 {
        self.update_and_apply(input)
    }
}

#[cfg(feature = "fir-denoise")]
impl FilterApply for FirDenoise {
    fn apply(&mut self, input: f32) -> f32 {
        self.update(input)
    }
}

impl FilterApply for DynamicNotch {
    fn apply(&mut self, input: f32) -> f32 {
        DynamicNotch::apply(self, input)
    }
}

/// Any filter kind, selected at configuration time
///
/// The lifetime belongs to [`Filter::Fir`], which borrows its storage.
/// Buffer-free filters are `Filter<'static>`.
#[derive(Debug, Default)]
#[allow(clippy::large_enum_variant)]
pub enum Filter<'a> {
    /// Passthrough
    #[default]
    Null,
    /// First-order lag
    Pt1(Pt1Filter),
    /// Single biquad section, direct form 2 transposed
    Biquad(BiquadFilter),
    /// Single biquad section, direct form 1
    BiquadDf1(BiquadFilter),
    /// Butterworth cascade
    Cascade(BiquadCascade),
    /// Fixed-gain exponential smoother
    FastKalman(FastKalman),
    /// Lagged moving average
    Lma(LaggedMovingAverage),
    /// Slew-rate limiter
    Slew(SlewFilter),
    /// FIR convolution over borrowed storage
    Fir(FirFilter<'a>),
    /// Moving-sum denoiser
    #[cfg(feature = "fir-denoise")]
    Denoise(FirDenoise),
    /// Notch that follows a moving noise peak
    DynamicNotch(DynamicNotch),
}

impl Filter<'static> {
    /// Build a low-pass filter from configuration.
    ///
    /// A disabled configuration (zero cutoff) gives [`Filter::Null`], and so
    /// does any configuration [`try_lowpass`](Self::try_lowpass) rejects.
    #[must_use]
    pub fn lowpass(config: &LowpassConfig, sample_rate_hz: f32) -> Self {
        match Self::try_lowpass(config, sample_rate_hz) {
            Ok(filter) => filter,
            Err(_err) => {
                #[cfg(feature = "defmt")]
                defmt::warn!("lowpass {} disabled: {}", config.kind, _err);
                Self::Null
            }
        }
    }

    /// Checked [`lowpass`](Self::lowpass)
    ///
    /// # Errors
    ///
    /// - [`FilterError::InvalidFrequency`] when the cutoff is at or above
    ///   Nyquist
    /// - [`FilterError::InvalidOrder`] for an unsupported Butterworth order
    pub fn try_lowpass(config: &LowpassConfig, sample_rate_hz: f32) -> Result<Self, FilterError> {
        if !config.is_enabled() {
            return Ok(Self::Null);
        }
        let cutoff_hz = config.cutoff_hz;
        check_frequency(cutoff_hz, sample_rate_hz)?;
        let dt = 1.0 / sample_rate_hz;

        #[cfg(feature = "defmt")]
        defmt::debug!("lowpass {} at {} Hz", config.kind, cutoff_hz);

        let filter = match config.kind {
            LowpassType::Pt1 => Self::Pt1(Pt1Filter::with_cutoff(cutoff_hz, dt)),
            LowpassType::Biquad => Self::Biquad(BiquadFilter::init_lpf(cutoff_hz, sample_rate_hz)),
            LowpassType::Butterworth => {
                Self::Cascade(BiquadCascade::try_lowpass(config.order, cutoff_hz, sample_rate_hz)?)
            }
            LowpassType::BiquadRcFir2 => {
                Self::Biquad(BiquadFilter::init_rc_fir2(Pt1Filter::gain(cutoff_hz, dt)))
            }
            LowpassType::FastKalman => Self::FastKalman(FastKalman::new(Pt1Filter::gain(cutoff_hz, dt))),
            #[cfg(feature = "fir-denoise")]
            LowpassType::Fir => Self::Denoise(FirDenoise::with_sample_rate(cutoff_hz, sample_rate_hz)),
        };
        Ok(filter)
    }
}

impl Filter<'_> {
    /// Whether this is the passthrough variant
    #[must_use]
    pub fn is_null(&self) -> bool {
        matches!(self, Self::Null)
    }
}

impl FilterApply for Filter<'_> {
    fn apply(&mut self, input: f32) -> f32 {
        match self {
            Self::Null => null_filter_apply(input),
            Self::Pt1(f) => f.apply(input),
            Self::Biquad(f) => f.apply(input),
            Self::BiquadDf1(f) => f.apply_df1(input),
            Self::Cascade(f) => f.apply(input),
            Self::FastKalman(f) => f.update(input),
            Self::Lma(f) => f.update(input),
            Self::Slew(f) => f.apply(input),
            Self::Fir(f) => f.update_and_apply(input),
            #[cfg(feature = "fir-denoise")]
            Self::Denoise(f) => f.update(input),
            Self::DynamicNotch(f) => f.apply(input),
        }
    }
}

impl From<Pt1Filter> for Filter<'_> {
    fn from(filter: Pt1Filter) -> Self {
        Self::Pt1(filter)
    }
}

impl From<BiquadFilter> for Filter<'_> {
    fn from(filter: BiquadFilter) -> Self {
        Self::Biquad(filter)
    }
}

impl From<BiquadCascade> for Filter<'_> {
    fn from(filter: BiquadCascade) -> Self {
        Self::Cascade(filter)
    }
}

impl From<FastKalman> for Filter<'_> {
    fn from(filter: FastKalman) -> Self {
        Self::FastKalman(filter)
    }
}

impl From<LaggedMovingAverage> for Filter<'_> {
    fn from(filter: LaggedMovingAverage) -> Self {
        Self::Lma(filter)
    }
}

impl From<SlewFilter> for Filter<'_> {
    fn from(filter: SlewFilter) -> Self {
        Self::Slew(filter)
    }
}

impl<'a> From<FirFilter<'a>> for Filter<'a> {
    fn from(filter: FirFilter<'a>) -> Self {
        Self::Fir(filter)
    }
}

#[cfg(feature = "fir-denoise")]
impl From<FirDenoise> for Filter<'_> {
    fn from(filter: FirDenoise) -> Self {
        Self::Denoise(filter)
    }
}

impl From<DynamicNotch> for Filter<'_> {
    fn from(filter: DynamicNotch) -> Self {
        Self::DynamicNotch(filter)
    }
}
