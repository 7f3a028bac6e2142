//! FIR filter over caller-owned storage
//!
//! The filter borrows both its sample buffer and its coefficient table, so
//! the caller decides where they live (static tables, stack arrays, ...).
//! Samples are written into the buffer as a circular delay line.
//!
//! Two usage patterns exist per instance:
//! - [`FirFilter::update`] + [`FirFilter::apply`] for full convolution
//! - [`FirFilter::update_average`] + [`FirFilter::calc_moving_average`] for an
//!   O(1) running mean
//!
//! Mixing `update` and `update_average` on one instance leaves the running
//! sum stale. This is not checked.

use crate::types::FilterError;

/// FIR filter state bound to a borrowed buffer and coefficient table
#[derive(Debug)]
pub struct FirFilter<'a> {
    /// Delay line (circular buffer)
    buf: &'a mut [f32],
    /// Coefficients, `coeffs[0]` weights the newest sample
    coeffs: &'a [f32],
    /// Sum of buffered samples, maintained by `update_average`
    moving_sum: f32,
    /// Next write position
    index: usize,
    /// Samples pushed, saturating at the buffer length
    count: usize,
    /// Taps used by `apply`
    coeffs_length: usize,
}

impl<'a> FirFilter<'a> {
    /// Bind a buffer and coefficients, using one tap per buffered sample.
    ///
    /// The buffer is cleared. If `coeffs` is shorter than `buf`, only
    /// `coeffs.len()` taps are used.
    pub fn new(buf: &'a mut [f32], coeffs: &'a [f32]) -> Self {
        let coeffs_length = buf.len();
        Self::with_coeffs_length(buf, coeffs, coeffs_length)
    }

    /// Bind a buffer and the first `coeffs_length` coefficients.
    ///
    /// `coeffs_length` is clamped to both the buffer and the table length.
    pub fn with_coeffs_length(buf: &'a mut [f32], coeffs: &'a [f32], coeffs_length: usize) -> Self {
        buf.fill(0.0);
        let coeffs_length = coeffs_length.min(buf.len()).min(coeffs.len());
        Self {
            buf,
            coeffs,
            moving_sum: 0.0,
            index: 0,
            count: 0,
            coeffs_length,
        }
    }

    /// Checked [`with_coeffs_length`](Self::with_coeffs_length)
    ///
    /// # Errors
    ///
    /// - [`FilterError::EmptyBuffer`] for a zero-length buffer
    /// - [`FilterError::CoefficientsTooLong`] when `coeffs_length` exceeds the
    ///   buffer or the coefficient table
    pub fn try_new(buf: &'a mut [f32], coeffs: &'a [f32], coeffs_length: usize) -> Result<Self, FilterError> {
        if buf.is_empty() {
            return Err(FilterError::EmptyBuffer);
        }
        if coeffs_length > buf.len() || coeffs_length > coeffs.len() {
            return Err(FilterError::CoefficientsTooLong {
                coeffs: coeffs_length,
                buffer: buf.len(),
            });
        }
        Ok(Self::with_coeffs_length(buf, coeffs, coeffs_length))
    }

    /// Buffer length in samples
    #[must_use]
    pub fn len(&self) -> usize {
        self.buf.len()
    }

    /// Whether the buffer has no storage
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.buf.is_empty()
    }

    /// Samples pushed so far, capped at the buffer length
    #[must_use]
    pub fn count(&self) -> usize {
        self.count
    }

    /// Taps used by [`apply`](Self::apply)
    #[must_use]
    pub fn coeffs_length(&self) -> usize {
        self.coeffs_length
    }

    /// Store a sample in the delay line
    pub fn update(&mut self, input: f32) {
        if let Some(slot) = self.buf.get_mut(self.index) {
            *slot = input;
            self.advance();
        }
    }

    /// Store a sample and keep the running sum current
    pub fn update_average(&mut self, input: f32) {
        if let Some(slot) = self.buf.get_mut(self.index) {
            // subtract the sample that drops out of the window
            self.moving_sum += input - *slot;
            *slot = input;
            self.advance();
        }
    }

    fn advance(&mut self) {
        self.index += 1;
        if self.index >= self.buf.len() {
            self.index = 0;
        }
        if self.count < self.buf.len() {
            self.count += 1;
        }
    }

    /// Buffered samples, newest first
    fn newest_first(&self) -> impl Iterator<Item = &f32> + '_ {
        let (older, newer) = self.buf.split_at(self.index);
        older.iter().rev().chain(newer.iter().rev())
    }

    /// Convolve the newest `coeffs_length` samples with the coefficients
    #[must_use]
    pub fn apply(&self) -> f32 {
        self.coeffs[..self.coeffs_length]
            .iter()
            .zip(self.newest_first())
            .map(|(c, x)| c * x)
            .sum()
    }

    /// Store a sample, then convolve
    pub fn update_and_apply(&mut self, input: f32) -> f32 {
        self.update(input);
        self.apply()
    }

    /// Mean of the newest `count` samples, `count` clamped to the buffer length
    #[must_use]
    pub fn calc_partial_average(&self, count: usize) -> f32 {
        let count = count.min(self.buf.len());
        if count == 0 {
            return 0.0;
        }
        let sum: f32 = self.newest_first().take(count).sum();
        sum / count as f32
    }

    /// Running sum divided by the buffer length.
    ///
    /// Only valid when every sample went through
    /// [`update_average`](Self::update_average).
    #[must_use]
    pub fn calc_moving_average(&self) -> f32 {
        if self.buf.is_empty() {
            return 0.0;
        }
        self.moving_sum / self.buf.len() as f32
    }

    /// Most recently stored sample
    #[must_use]
    pub fn last_input(&self) -> f32 {
        self.newest_first().next().copied().unwrap_or(0.0)
    }

    /// Clear the delay line and running sum
    pub fn reset(&mut self) {
        self.buf.fill(0.0);
        self.moving_sum = 0.0;
        self.index = 0;
        self.count = 0;
    }
}
