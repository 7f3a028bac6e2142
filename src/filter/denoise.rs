//! FIR denoiser
//!
//! Moving average over a window sized so that it roughly matches a low-pass
//! of the requested cutoff at the given loop rate. Intended for gyro noise.
//!
//! While the window is filling the output is the mean of the samples seen so
//! far, not a zero-padded mean.

#[allow(unused_imports)]
use micromath::F32Ext;

use crate::config::MAX_FIR_DENOISE_WINDOW_SIZE;
use crate::types::{looptime_us_to_sample_rate, FilterError};

/// Moving-sum smoother with a frequency-derived window
#[derive(Clone, Debug)]
pub struct FirDenoise {
    filled_count: usize,
    target_count: usize,
    index: usize,
    moving_sum: f32,
    state: [f32; MAX_FIR_DENOISE_WINDOW_SIZE],
}

impl FirDenoise {
    /// Window length in samples for a cutoff and loop period.
    ///
    /// `round(sample_rate / cutoff)`, clamped to
    /// `1..=MAX_FIR_DENOISE_WINDOW_SIZE`. A zero cutoff gives a single-sample
    /// window.
    #[must_use]
    pub fn window_for(lpf_hz: u16, looptime_us: u32) -> usize {
        if lpf_hz == 0 || looptime_us == 0 {
            return 1;
        }
        Self::window_for_rate(f32::from(lpf_hz), looptime_us_to_sample_rate(looptime_us))
    }

    /// [`window_for`](Self::window_for) with the cutoff and sample rate in Hz
    #[must_use]
    pub fn window_for_rate(cutoff_hz: f32, sample_rate_hz: f32) -> usize {
        if cutoff_hz <= 0.0 || sample_rate_hz <= 0.0 {
            return 1;
        }
        let samples = (sample_rate_hz / cutoff_hz).round();
        #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
        let samples = samples as usize;
        samples.clamp(1, MAX_FIR_DENOISE_WINDOW_SIZE)
    }

    /// Create a denoiser for a cutoff in Hz and a loop period in microseconds.
    ///
    /// Windows above the platform capacity are clamped.
    #[must_use]
    pub fn new(lpf_hz: u16, looptime_us: u32) -> Self {
        Self::with_window(Self::window_for(lpf_hz, looptime_us))
    }

    /// Create a denoiser for a cutoff and sample rate in Hz
    #[must_use]
    pub fn with_sample_rate(cutoff_hz: f32, sample_rate_hz: f32) -> Self {
        Self::with_window(Self::window_for_rate(cutoff_hz, sample_rate_hz))
    }

    /// Checked constructor taking an explicit window length
    ///
    /// # Errors
    ///
    /// [`FilterError::EmptyWindow`] for zero and
    /// [`FilterError::WindowTooLarge`] above `MAX_FIR_DENOISE_WINDOW_SIZE`.
    pub fn try_with_window(window: usize) -> Result<Self, FilterError> {
        if window == 0 {
            return Err(FilterError::EmptyWindow);
        }
        if window > MAX_FIR_DENOISE_WINDOW_SIZE {
            return Err(FilterError::WindowTooLarge {
                requested: window,
                max: MAX_FIR_DENOISE_WINDOW_SIZE,
            });
        }
        Ok(Self::with_window(window))
    }

    fn with_window(target_count: usize) -> Self {
        #[cfg(feature = "defmt")]
        defmt::debug!("fir denoise window: {} samples", target_count);

        Self {
            filled_count: 0,
            target_count,
            index: 0,
            moving_sum: 0.0,
            state: [0.0; MAX_FIR_DENOISE_WINDOW_SIZE],
        }
    }

    /// Window length in samples
    #[must_use]
    pub fn target_count(&self) -> usize {
        self.target_count
    }

    /// Samples currently in the window
    #[must_use]
    pub fn filled_count(&self) -> usize {
        self.filled_count
    }

    /// Push a sample and return the mean of the current window
    pub fn update(&mut self, input: f32) -> f32 {
        let slot = &mut self.state[self.index];
        self.moving_sum += input - *slot;
        *slot = input;

        self.index += 1;
        if self.index == self.target_count {
            self.index = 0;
        }

        if self.filled_count < self.target_count {
            self.filled_count += 1;
        }
        self.moving_sum / self.filled_count as f32
    }

    /// Empty the window
    pub fn reset(&mut self) {
        self.state = [0.0; MAX_FIR_DENOISE_WINDOW_SIZE];
        self.moving_sum = 0.0;
        self.index = 0;
        self.filled_count = 0;
    }
}
