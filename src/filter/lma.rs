//! Lagged moving average
//!
//! Circular-buffer running mean in which each incoming sample contributes
//! `weight * input`. A weight of 1 gives a plain moving average.

use crate::config::MAX_LMA_WINDOW_SIZE;
use crate::types::FilterError;

/// Weighted circular-buffer running average
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct LaggedMovingAverage {
    moving_window_index: usize,
    window_size: usize,
    weight: f32,
    moving_sum: f32,
    /// Weighted contributions currently in the window
    buf: [f32; MAX_LMA_WINDOW_SIZE],
}

impl LaggedMovingAverage {
    /// Create an average over `window_size` samples.
    ///
    /// # Errors
    ///
    /// [`FilterError::EmptyWindow`] for zero and
    /// [`FilterError::WindowTooLarge`] above `MAX_LMA_WINDOW_SIZE`.
    pub fn new(window_size: usize, weight: f32) -> Result<Self, FilterError> {
        if window_size == 0 {
            return Err(FilterError::EmptyWindow);
        }
        if window_size > MAX_LMA_WINDOW_SIZE {
            #[cfg(feature = "defmt")]
            defmt::warn!("lma window {} exceeds {}", window_size, MAX_LMA_WINDOW_SIZE);
            return Err(FilterError::WindowTooLarge {
                requested: window_size,
                max: MAX_LMA_WINDOW_SIZE,
            });
        }
        Ok(Self {
            moving_window_index: 0,
            window_size,
            weight,
            moving_sum: 0.0,
            buf: [0.0; MAX_LMA_WINDOW_SIZE],
        })
    }

    /// Window length in samples
    #[must_use]
    pub fn window_size(&self) -> usize {
        self.window_size
    }

    /// Weight applied to each incoming sample
    #[must_use]
    pub fn weight(&self) -> f32 {
        self.weight
    }

    /// Push a sample and return the windowed mean
    pub fn update(&mut self, input: f32) -> f32 {
        let contribution = self.weight * input;
        let slot = &mut self.buf[self.moving_window_index];
        self.moving_sum += contribution - *slot;
        *slot = contribution;

        self.moving_window_index += 1;
        if self.moving_window_index == self.window_size {
            self.moving_window_index = 0;
        }

        self.moving_sum / self.window_size as f32
    }

    /// Empty the window
    pub fn reset(&mut self) {
        self.buf = [0.0; MAX_LMA_WINDOW_SIZE];
        self.moving_sum = 0.0;
        self.moving_window_index = 0;
    }
}
