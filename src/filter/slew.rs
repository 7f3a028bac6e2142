//! Slew-rate limiter
//!
//! Steps larger than `threshold` are clamped to `slew_limit` per sample.
//! Smaller steps pass unchanged.

#[allow(unused_imports)]
use micromath::F32Ext;

/// Per-sample rate-of-change limiter
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct SlewFilter {
    /// Last output
    state: f32,
    slew_limit: f32,
    threshold: f32,
}

impl SlewFilter {
    /// Create a limiter starting from zero
    #[must_use]
    pub const fn new(slew_limit: f32, threshold: f32) -> Self {
        Self {
            state: 0.0,
            slew_limit,
            threshold,
        }
    }

    /// Last output
    #[must_use]
    pub fn state(&self) -> f32 {
        self.state
    }

    /// Process a single sample
    pub fn apply(&mut self, input: f32) -> f32 {
        let step = input - self.state;
        if step.abs() > self.threshold {
            self.state += step.max(-self.slew_limit).min(self.slew_limit);
        } else {
            self.state = input;
        }
        self.state
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn small_steps_pass() {
        let mut filter = SlewFilter::new(1.0, 5.0);
        assert_eq!(filter.apply(4.0), 4.0);
        assert_eq!(filter.apply(0.5), 0.5);
    }

    #[test]
    fn large_steps_limited_both_ways() {
        let mut filter = SlewFilter::new(1.0, 5.0);
        assert_eq!(filter.apply(100.0), 1.0);
        assert_eq!(filter.apply(100.0), 2.0);
        assert_eq!(filter.apply(-100.0), 1.0);
    }

    #[test]
    fn limit_wider_than_step_lands_on_input() {
        let mut filter = SlewFilter::new(10.0, 5.0);
        assert_eq!(filter.apply(6.0), 6.0);
        assert_eq!(filter.apply(-1.0), -1.0);
    }
}
