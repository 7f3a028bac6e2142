//! Biquad Engine
//!
//! Second-order IIR sections derived from center frequency, sample rate and
//! Q, plus Butterworth low-pass cascades of up to six sections.
//!
//! Transfer function of one section:
//!
//! ```text
//! H(z) = (b0 + b1*z^-1 + b2*z^-2) / (1 + a1*z^-1 + a2*z^-2)
//! ```
//!
//! Two recurrences compute it. [`BiquadFilter::apply_df1`] keeps the last two
//! inputs and outputs and tolerates coefficient changes between samples.
//! [`BiquadFilter::apply`] is direct form 2 transposed: the same response with
//! two delay states and different rounding. Pick one form per instance;
//! cascades always use [`BiquadFilter::apply`].
//!
//! Without `std`, `sin`/`cos`/`tan` come from `micromath`, whose
//! approximations are off by up to about 1% at small angles. That shifts the
//! effective Q and cutoff of a designed section by a similar amount. DC gain
//! is unaffected.

use core::f32::consts::PI;

use heapless::Vec;
#[allow(unused_imports)]
use micromath::F32Ext;

use crate::config::{BIQUAD_BUTTERWORTH_Q, BIQUAD_CASCADE_MAX_SECTIONS, BIQUAD_LPF_ORDER_MAX};
use crate::types::FilterError;

/// Biquad response type
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum BiquadType {
    /// 2nd-order low-pass section
    #[default]
    Lpf,
    /// Band-reject
    Notch,
    /// Band-pass (constant skirt gain)
    Bpf,
    /// 1st-order low-pass section (Q ignored)
    Lpf1,
}

/// Published per-section Q of Butterworth low-pass cascades.
///
/// Row `n` holds the sections of order `2 * (n + 1)`, lowest Q first.
/// Each value is `1 / (2 cos((2k + 1) π / 2N))`.
const BUTTERWORTH_Q: [&[f32]; BIQUAD_CASCADE_MAX_SECTIONS] = [
    &[0.707_106_8],
    &[0.541_196_1, 1.306_563],
    &[0.517_638_1, 0.707_106_8, 1.931_851_7],
    &[0.509_795_6, 0.601_344_9, 0.899_976_2, 2.562_915_4],
    &[0.506_232_6, 0.561_163_1, 0.707_106_8, 1.101_344_6, 3.196_226_6],
    &[0.504_314_5, 0.541_196_1, 0.630_236_2, 0.821_339_8, 1.306_563, 3.830_648_8],
];

/// Per-section Q values for an even Butterworth order in `2..=12`
#[must_use]
pub fn butterworth_q(order: usize) -> Option<&'static [f32]> {
    if order == 0 || order % 2 != 0 || order > BIQUAD_LPF_ORDER_MAX {
        return None;
    }
    BUTTERWORTH_Q.get(order / 2 - 1).copied()
}

/// Q that places a notch's -3 dB edge at `cutoff_hz`.
///
/// Only meaningful for `center_hz > cutoff_hz`; otherwise the result is
/// negative or infinite. Use [`try_notch_q`] to reject such input.
#[must_use]
pub fn notch_q(center_hz: f32, cutoff_hz: f32) -> f32 {
    center_hz * cutoff_hz / (center_hz * center_hz - cutoff_hz * cutoff_hz)
}

/// Checked [`notch_q`]
///
/// # Errors
///
/// [`FilterError::DegenerateNotch`] unless `center_hz > cutoff_hz > 0`.
pub fn try_notch_q(center_hz: f32, cutoff_hz: f32) -> Result<f32, FilterError> {
    if cutoff_hz > 0.0 && center_hz > cutoff_hz {
        Ok(notch_q(center_hz, cutoff_hz))
    } else {
        Err(FilterError::DegenerateNotch)
    }
}

/// Biquad coefficients, normalized so that `a0 = 1`
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct BiquadCoeffs {
    /// Numerator coefficient b0
    pub b0: f32,
    /// Numerator coefficient b1
    pub b1: f32,
    /// Numerator coefficient b2
    pub b2: f32,
    /// Denominator coefficient a1
    pub a1: f32,
    /// Denominator coefficient a2
    pub a2: f32,
}

impl BiquadCoeffs {
    /// Unity (pass-through) coefficients
    pub const UNITY: Self = Self {
        b0: 1.0,
        b1: 0.0,
        b2: 0.0,
        a1: 0.0,
        a2: 0.0,
    };

    /// Design coefficients of the given type
    ///
    /// # Arguments
    /// * `freq` - Cutoff or center frequency in Hz
    /// * `sample_rate` - Sample rate in Hz
    /// * `q` - Quality factor (ignored by [`BiquadType::Lpf1`])
    /// * `kind` - Response type
    #[must_use]
    pub fn design(freq: f32, sample_rate: f32, q: f32, kind: BiquadType) -> Self {
        match kind {
            BiquadType::Lpf => Self::lowpass(freq, sample_rate, q),
            BiquadType::Notch => Self::notch(freq, sample_rate, q),
            BiquadType::Bpf => Self::bandpass(freq, sample_rate, q),
            BiquadType::Lpf1 => Self::first_order_lowpass(freq, sample_rate),
        }
    }

    /// Design a 2nd-order low-pass section
    #[must_use]
    pub fn lowpass(freq: f32, sample_rate: f32, q: f32) -> Self {
        let (sin_omega, cos_omega) = Self::omega(freq, sample_rate);
        let alpha = sin_omega / (2.0 * q);

        let b0 = (1.0 - cos_omega) / 2.0;
        let b1 = 1.0 - cos_omega;
        let b2 = (1.0 - cos_omega) / 2.0;
        let a0 = 1.0 + alpha;
        let a1 = -2.0 * cos_omega;
        let a2 = 1.0 - alpha;

        Self::normalize(b0, b1, b2, a0, a1, a2)
    }

    /// Design a notch (band-reject) section
    #[must_use]
    pub fn notch(freq: f32, sample_rate: f32, q: f32) -> Self {
        let (sin_omega, cos_omega) = Self::omega(freq, sample_rate);
        let alpha = sin_omega / (2.0 * q);

        let b0 = 1.0;
        let b1 = -2.0 * cos_omega;
        let b2 = 1.0;
        let a0 = 1.0 + alpha;
        let a1 = -2.0 * cos_omega;
        let a2 = 1.0 - alpha;

        Self::normalize(b0, b1, b2, a0, a1, a2)
    }

    /// Design a band-pass section (constant skirt gain, peak gain = Q)
    #[must_use]
    pub fn bandpass(freq: f32, sample_rate: f32, q: f32) -> Self {
        let (sin_omega, cos_omega) = Self::omega(freq, sample_rate);
        let alpha = sin_omega / (2.0 * q);

        let b0 = alpha;
        let b1 = 0.0;
        let b2 = -alpha;
        let a0 = 1.0 + alpha;
        let a1 = -2.0 * cos_omega;
        let a2 = 1.0 - alpha;

        Self::normalize(b0, b1, b2, a0, a1, a2)
    }

    /// Design a 1st-order Butterworth low-pass (bilinear transform)
    #[must_use]
    pub fn first_order_lowpass(freq: f32, sample_rate: f32) -> Self {
        let k = (PI * freq / sample_rate).tan();

        Self::normalize(k, k, 0.0, k + 1.0, k - 1.0, 0.0)
    }

    /// RC low-pass followed by a 2-tap averaging FIR, with gain `k`
    ///
    /// `k` is typically a PT1 gain; DC gain is 1 for any `k` in (0, 1].
    #[must_use]
    pub fn rc_fir2(k: f32) -> Self {
        Self {
            b0: k / 2.0,
            b1: k / 2.0,
            b2: 0.0,
            a1: -(1.0 - k),
            a2: 0.0,
        }
    }

    fn omega(freq: f32, sample_rate: f32) -> (f32, f32) {
        let omega = 2.0 * PI * freq / sample_rate;
        (omega.sin(), omega.cos())
    }

    /// Normalize coefficients by a0
    fn normalize(b0: f32, b1: f32, b2: f32, a0: f32, a1: f32, a2: f32) -> Self {
        Self {
            b0: b0 / a0,
            b1: b1 / a0,
            b2: b2 / a0,
            a1: a1 / a0,
            a2: a2 / a0,
        }
    }

    /// Calculate magnitude response at a given frequency
    #[must_use]
    pub fn magnitude_at(&self, freq: f32, sample_rate: f32) -> f32 {
        let omega = 2.0 * PI * freq / sample_rate;
        let (sin_omega, cos_omega) = (omega.sin(), omega.cos());
        let (sin_2omega, cos_2omega) = ((2.0 * omega).sin(), (2.0 * omega).cos());

        // |H(e^jw)| = |B(e^jw)| / |A(e^jw)|, both evaluated on the unit circle
        let b_re = self.b0 + self.b1 * cos_omega + self.b2 * cos_2omega;
        let b_im = self.b1 * sin_omega + self.b2 * sin_2omega;
        let a_re = 1.0 + self.a1 * cos_omega + self.a2 * cos_2omega;
        let a_im = self.a1 * sin_omega + self.a2 * sin_2omega;

        let den = a_re * a_re + a_im * a_im;
        if den > 0.0 {
            ((b_re * b_re + b_im * b_im) / den).sqrt()
        } else {
            0.0
        }
    }

    /// Calculate magnitude response in dB at a given frequency
    #[must_use]
    pub fn magnitude_db_at(&self, freq: f32, sample_rate: f32) -> f32 {
        let mag = self.magnitude_at(freq, sample_rate);
        if mag > 0.0 {
            20.0 * mag.log10()
        } else {
            -120.0
        }
    }
}

impl Default for BiquadCoeffs {
    fn default() -> Self {
        Self::UNITY
    }
}

/// One biquad section with its delay line
///
/// `x1`/`x2` hold the previous inputs and `y1`/`y2` the previous outputs for
/// [`apply_df1`](Self::apply_df1). [`apply`](Self::apply) reuses `x1`/`x2` as
/// its two transposed delay states.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct BiquadFilter {
    coeffs: BiquadCoeffs,
    x1: f32,
    x2: f32,
    y1: f32,
    y2: f32,
}

impl BiquadFilter {
    /// Create a filter with given coefficients and a cleared delay line
    #[must_use]
    pub const fn new(coeffs: BiquadCoeffs) -> Self {
        Self {
            coeffs,
            x1: 0.0,
            x2: 0.0,
            y1: 0.0,
            y2: 0.0,
        }
    }

    /// Pass-through section
    #[must_use]
    pub const fn passthrough() -> Self {
        Self::new(BiquadCoeffs::UNITY)
    }

    /// 2nd-order Butterworth low-pass (Q = 1/√2)
    #[must_use]
    pub fn init_lpf(freq: f32, sample_rate: f32) -> Self {
        Self::init(freq, sample_rate, BIQUAD_BUTTERWORTH_Q, BiquadType::Lpf)
    }

    /// Section of the given type with a cleared delay line
    #[must_use]
    pub fn init(freq: f32, sample_rate: f32, q: f32, kind: BiquadType) -> Self {
        Self::new(BiquadCoeffs::design(freq, sample_rate, q, kind))
    }

    /// RC + FIR-2 hybrid smoother with gain `k`
    #[must_use]
    pub fn init_rc_fir2(k: f32) -> Self {
        Self::new(BiquadCoeffs::rc_fir2(k))
    }

    /// Re-derive coefficients, keeping the delay line.
    ///
    /// Used for live re-tuning. The output shows a transient but no reset.
    pub fn update(&mut self, freq: f32, sample_rate: f32, q: f32, kind: BiquadType) {
        self.coeffs = BiquadCoeffs::design(freq, sample_rate, q, kind);
    }

    /// Replace coefficients, keeping the delay line
    pub fn set_coeffs(&mut self, coeffs: BiquadCoeffs) {
        self.coeffs = coeffs;
    }

    /// Get current coefficients
    #[must_use]
    pub fn coeffs(&self) -> BiquadCoeffs {
        self.coeffs
    }

    /// Process a sample in direct form 1
    pub fn apply_df1(&mut self, input: f32) -> f32 {
        let c = &self.coeffs;
        let output = c.b0 * input + c.b1 * self.x1 + c.b2 * self.x2 - c.a1 * self.y1 - c.a2 * self.y2;

        self.x2 = self.x1;
        self.x1 = input;
        self.y2 = self.y1;
        self.y1 = output;

        output
    }

    /// Process a sample in direct form 2 transposed
    pub fn apply(&mut self, input: f32) -> f32 {
        let c = &self.coeffs;
        let output = c.b0 * input + self.x1;
        self.x1 = c.b1 * input - c.a1 * output + self.x2;
        self.x2 = c.b2 * input - c.a2 * output;
        output
    }

    /// Clear the delay line
    pub fn reset(&mut self) {
        self.x1 = 0.0;
        self.x2 = 0.0;
        self.y1 = 0.0;
        self.y2 = 0.0;
    }
}

impl Default for BiquadFilter {
    fn default() -> Self {
        Self::passthrough()
    }
}

/// Butterworth low-pass built from cascaded biquad sections
///
/// Section `i` feeds section `i + 1`. The section count is fixed once built;
/// an empty cascade passes samples through unchanged.
#[derive(Clone, Debug, Default)]
pub struct BiquadCascade {
    sections: Vec<BiquadFilter, BIQUAD_CASCADE_MAX_SECTIONS>,
}

impl BiquadCascade {
    /// Cascade with no sections
    #[must_use]
    pub const fn passthrough() -> Self {
        Self {
            sections: Vec::new(),
        }
    }

    /// Butterworth low-pass of the given order.
    ///
    /// `order` must be even and in `2..=12`. Any other order yields a cascade
    /// with zero sections, which passes input through unchanged.
    #[must_use]
    pub fn lowpass(order: usize, freq: f32, sample_rate: f32) -> Self {
        match Self::try_lowpass(order, freq, sample_rate) {
            Ok(cascade) => cascade,
            Err(_err) => {
                #[cfg(feature = "defmt")]
                defmt::warn!("cascade disabled: {}", _err);
                Self::passthrough()
            }
        }
    }

    /// Checked [`lowpass`](Self::lowpass)
    ///
    /// # Errors
    ///
    /// [`FilterError::InvalidOrder`] for zero, odd or too large orders.
    pub fn try_lowpass(order: usize, freq: f32, sample_rate: f32) -> Result<Self, FilterError> {
        let qs = butterworth_q(order).ok_or(FilterError::InvalidOrder(order))?;
        let sections = qs
            .iter()
            .map(|&q| BiquadFilter::init(freq, sample_rate, q, BiquadType::Lpf))
            .collect();

        #[cfg(feature = "defmt")]
        defmt::debug!("butterworth cascade: order {}, {} Hz", order, freq);

        Ok(Self { sections })
    }

    /// Number of configured sections
    #[must_use]
    pub fn sections(&self) -> usize {
        self.sections.len()
    }

    /// Section at `index`
    #[must_use]
    pub fn section(&self, index: usize) -> Option<&BiquadFilter> {
        self.sections.get(index)
    }

    /// Process a sample through every section in order
    pub fn apply(&mut self, input: f32) -> f32 {
        self.sections
            .iter_mut()
            .fold(input, |sample, section| section.apply(sample))
    }

    /// Clear every section's delay line
    pub fn reset(&mut self) {
        for section in &mut self.sections {
            section.reset();
        }
    }
}
