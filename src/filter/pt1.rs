//! PT1 first-order lag filter

use core::f32::consts::PI;

/// Single-pole exponential smoother: `state += k * (input - state)`
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Pt1Filter {
    state: f32,
    k: f32,
}

impl Pt1Filter {
    /// Gain for a cutoff frequency and sample period.
    ///
    /// `k = dt / (dt + RC)` with `RC = 1 / (2π fc)`. A non-positive cutoff
    /// returns 1.0, which disables filtering.
    ///
    /// # Arguments
    /// * `cutoff_hz` - Cutoff frequency in Hz
    /// * `dt` - Sample period in seconds
    #[must_use]
    pub fn gain(cutoff_hz: f32, dt: f32) -> f32 {
        if cutoff_hz <= 0.0 {
            return 1.0;
        }
        let rc = 1.0 / (2.0 * PI * cutoff_hz);
        dt / (rc + dt)
    }

    /// Create a filter with a pre-derived gain and zero state.
    ///
    /// `k` outside [0, 1] is accepted; the output then oscillates or diverges.
    #[must_use]
    pub const fn new(k: f32) -> Self {
        Self { state: 0.0, k }
    }

    /// Create a filter from cutoff frequency and sample period
    #[must_use]
    pub fn with_cutoff(cutoff_hz: f32, dt: f32) -> Self {
        Self::new(Self::gain(cutoff_hz, dt))
    }

    /// Re-derive the gain, keeping state
    pub fn set_cutoff(&mut self, cutoff_hz: f32, dt: f32) {
        self.k = Self::gain(cutoff_hz, dt);
    }

    /// Smoothing gain
    #[must_use]
    pub fn k(&self) -> f32 {
        self.k
    }

    /// Last output
    #[must_use]
    pub fn state(&self) -> f32 {
        self.state
    }

    /// Overwrite the state, e.g. to start settled on a known value
    pub fn set_state(&mut self, state: f32) {
        self.state = state;
    }

    /// Process a single sample
    pub fn apply(&mut self, input: f32) -> f32 {
        self.state += self.k * (input - self.state);
        self.state
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn gain_formula() {
        // 100 Hz at 1 kHz: dt = 1ms, RC = 1.5915ms
        let k = Pt1Filter::gain(100.0, 0.001);
        assert!((k - 0.385_869).abs() < 1e-4, "gain: {}", k);
    }

    #[test]
    fn gain_disabled_cutoff() {
        assert_eq!(Pt1Filter::gain(0.0, 0.001), 1.0);
        assert_eq!(Pt1Filter::gain(-5.0, 0.001), 1.0);
    }

    #[test]
    fn converges_to_step() {
        let mut filter = Pt1Filter::with_cutoff(20.0, 0.001);
        let mut output = 0.0;
        for _ in 0..1000 {
            output = filter.apply(2.0);
        }
        assert!((output - 2.0).abs() < 1e-3, "output: {}", output);
    }

    #[test]
    fn first_sample_scaled_by_gain() {
        let mut filter = Pt1Filter::new(0.25);
        assert!((filter.apply(4.0) - 1.0).abs() < 1e-6);
        assert!((filter.apply(4.0) - 1.75).abs() < 1e-6);
    }
}
