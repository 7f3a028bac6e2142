//! Dynamic notch
//!
//! A notch that follows a moving noise peak (motor/prop vibration). An
//! external analyser supplies center-frequency estimates at its own rate;
//! each estimate is clamped, smoothed by a low-pass biquad and turned into
//! new notch coefficients. The notch runs in direct form 1 because its
//! coefficients change while samples flow.

use crate::config::dyn_notch::{
    CENTER_MARGIN_HZ, CHANGE_RATE_HZ, INITIAL_CENTER_HZ, MAX_CENTER_HZ, MAX_CUTOFF_HZ, MIN_CUTOFF_HZ, WIDTH_HZ,
};
use crate::filter::biquad::{notch_q, BiquadFilter, BiquadType};
use crate::types::{check_frequency, FilterError};

/// Dynamic notch tuning
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct DynamicNotchConfig {
    /// Distance from center to the -3 dB cutoff (Hz)
    pub width_hz: f32,
    /// Cutoff of the low-pass smoothing center estimates (Hz)
    pub change_rate_hz: f32,
    /// Lowest cutoff (Hz)
    pub min_cutoff_hz: f32,
    /// Highest cutoff (Hz)
    pub max_cutoff_hz: f32,
    /// Highest center (Hz)
    pub max_center_hz: f32,
}

impl Default for DynamicNotchConfig {
    fn default() -> Self {
        Self {
            width_hz: WIDTH_HZ,
            change_rate_hz: CHANGE_RATE_HZ,
            min_cutoff_hz: MIN_CUTOFF_HZ,
            max_cutoff_hz: MAX_CUTOFF_HZ,
            max_center_hz: MAX_CENTER_HZ,
        }
    }
}

impl DynamicNotchConfig {
    /// Lowest center the notch may sit at
    #[must_use]
    pub fn min_center_hz(&self) -> f32 {
        self.min_cutoff_hz + CENTER_MARGIN_HZ
    }

    fn clamp_center(&self, center_hz: f32) -> f32 {
        center_hz.clamp(self.min_center_hz(), self.max_center_hz)
    }

    /// Check the tuning against the sample and estimate rates
    ///
    /// # Errors
    ///
    /// - [`FilterError::DegenerateNotch`] for a non-positive width or a cutoff
    ///   range that is empty or not above zero
    /// - [`FilterError::InvalidFrequency`] when the highest center is not
    ///   below Nyquist or the smoothing cutoff does not fit the estimate rate
    pub fn validate(&self, sample_rate_hz: f32, estimate_rate_hz: f32) -> Result<(), FilterError> {
        if self.width_hz <= 0.0 || self.min_cutoff_hz <= 0.0 || self.min_cutoff_hz > self.max_cutoff_hz {
            return Err(FilterError::DegenerateNotch);
        }
        if self.min_center_hz() > self.max_center_hz {
            return Err(FilterError::DegenerateNotch);
        }
        check_frequency(self.max_center_hz, sample_rate_hz)?;
        check_frequency(self.change_rate_hz, estimate_rate_hz)
    }
}

/// Notch filter retuned from center-frequency estimates
#[derive(Clone, Copy, Debug)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct DynamicNotch {
    notch: BiquadFilter,
    center_smoother: BiquadFilter,
    center_hz: f32,
    sample_rate_hz: f32,
    config: DynamicNotchConfig,
}

impl DynamicNotch {
    /// Create a notch for a loop running at `sample_rate_hz` whose center
    /// estimates arrive at `estimate_rate_hz`.
    #[must_use]
    pub fn new(config: DynamicNotchConfig, sample_rate_hz: f32, estimate_rate_hz: f32) -> Self {
        let center_hz = config.clamp_center(INITIAL_CENTER_HZ);
        let mut filter = Self {
            notch: BiquadFilter::passthrough(),
            center_smoother: BiquadFilter::init_lpf(config.change_rate_hz, estimate_rate_hz),
            center_hz,
            sample_rate_hz,
            config,
        };
        filter.retune();
        filter
    }

    /// Checked [`new`](Self::new)
    ///
    /// # Errors
    ///
    /// Whatever [`DynamicNotchConfig::validate`] reports.
    pub fn try_new(config: DynamicNotchConfig, sample_rate_hz: f32, estimate_rate_hz: f32) -> Result<Self, FilterError> {
        config.validate(sample_rate_hz, estimate_rate_hz)?;
        Ok(Self::new(config, sample_rate_hz, estimate_rate_hz))
    }

    /// Current notch center (Hz)
    #[must_use]
    pub fn center_hz(&self) -> f32 {
        self.center_hz
    }

    /// Current -3 dB cutoff below the center (Hz)
    #[must_use]
    pub fn cutoff_hz(&self) -> f32 {
        (self.center_hz - self.config.width_hz).clamp(self.config.min_cutoff_hz, self.config.max_cutoff_hz)
    }

    /// Notch section in use
    #[must_use]
    pub fn notch(&self) -> &BiquadFilter {
        &self.notch
    }

    /// Feed a new center estimate and retune the notch.
    ///
    /// Returns the smoothed center actually applied.
    pub fn update_center(&mut self, estimate_hz: f32) -> f32 {
        let estimate_hz = self.config.clamp_center(estimate_hz);
        let smoothed = self.center_smoother.apply(estimate_hz);
        self.center_hz = self.config.clamp_center(smoothed);
        self.retune();
        self.center_hz
    }

    fn retune(&mut self) {
        let q = notch_q(self.center_hz, self.cutoff_hz());
        self.notch.update(self.center_hz, self.sample_rate_hz, q, BiquadType::Notch);
    }

    /// Process a single sample
    pub fn apply(&mut self, input: f32) -> f32 {
        self.notch.apply_df1(input)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const LOOP_RATE: f32 = 8000.0;
    const ESTIMATE_RATE: f32 = 1000.0;

    #[test]
    fn starts_at_initial_center() {
        let notch = DynamicNotch::new(DynamicNotchConfig::default(), LOOP_RATE, ESTIMATE_RATE);
        assert_eq!(notch.center_hz(), INITIAL_CENTER_HZ);
        assert_eq!(notch.cutoff_hz(), MIN_CUTOFF_HZ);
        let mag = notch.notch().coeffs().magnitude_at(INITIAL_CENTER_HZ, LOOP_RATE);
        assert!(mag < 0.01, "center magnitude: {}", mag);
    }

    #[test]
    fn low_estimates_clamped() {
        let mut notch = DynamicNotch::new(DynamicNotchConfig::default(), LOOP_RATE, ESTIMATE_RATE);
        for _ in 0..200 {
            notch.update_center(20.0);
        }
        assert!((notch.center_hz() - 130.0).abs() < 0.5, "center: {}", notch.center_hz());
        assert!(notch.cutoff_hz() < notch.center_hz());
    }

    #[test]
    fn follows_steady_estimate() {
        let mut notch = DynamicNotch::new(DynamicNotchConfig::default(), LOOP_RATE, ESTIMATE_RATE);
        for _ in 0..500 {
            notch.update_center(320.0);
        }
        assert!((notch.center_hz() - 320.0).abs() < 0.5, "center: {}", notch.center_hz());
        assert_eq!(notch.cutoff_hz(), MAX_CUTOFF_HZ);
        let mag = notch.notch().coeffs().magnitude_at(notch.center_hz(), LOOP_RATE);
        assert!(mag < 0.01, "center magnitude: {}", mag);
    }

    #[test]
    fn validate_rejects_bad_tuning() {
        let config = DynamicNotchConfig {
            min_cutoff_hz: 300.0,
            ..DynamicNotchConfig::default()
        };
        assert_eq!(config.validate(LOOP_RATE, ESTIMATE_RATE), Err(FilterError::DegenerateNotch));
        assert_eq!(
            DynamicNotchConfig::default().validate(800.0, ESTIMATE_RATE),
            Err(FilterError::InvalidFrequency)
        );
        assert!(DynamicNotchConfig::default().validate(LOOP_RATE, ESTIMATE_RATE).is_ok());
    }
}
