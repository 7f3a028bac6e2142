//! Fixed-gain exponential smoother ("fast kalman")
//!
//! Historically named after the Kalman filter, but there is no covariance or
//! innovation update: the gain never changes. It behaves like a PT1 that also
//! remembers its previous state for derivative estimates.

/// Single-state recursive smoother with fixed gain
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct FastKalman {
    /// Gain
    k: f32,
    /// Current state
    x: f32,
    /// State before the last update
    last_x: f32,
}

impl FastKalman {
    /// Create a smoother with gain `k` and zero state
    #[must_use]
    pub const fn new(k: f32) -> Self {
        Self {
            k,
            x: 0.0,
            last_x: 0.0,
        }
    }

    /// Push a sample: `x += k * (input - x)`
    pub fn update(&mut self, input: f32) -> f32 {
        self.last_x = self.x;
        self.x += self.k * (input - self.x);
        self.x
    }

    /// Current state
    #[must_use]
    pub fn x(&self) -> f32 {
        self.x
    }

    /// State before the most recent update
    #[must_use]
    pub fn last_x(&self) -> f32 {
        self.last_x
    }

    /// Change of state over the most recent update
    #[must_use]
    pub fn delta(&self) -> f32 {
        self.x - self.last_x
    }

    /// Gain
    #[must_use]
    pub fn k(&self) -> f32 {
        self.k
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn keeps_previous_state() {
        let mut filter = FastKalman::new(0.5);
        assert_eq!(filter.update(2.0), 1.0);
        assert_eq!(filter.last_x(), 0.0);
        assert_eq!(filter.update(2.0), 1.5);
        assert_eq!(filter.last_x(), 1.0);
        assert_eq!(filter.delta(), 0.5);
    }

    #[test]
    fn unity_gain_tracks() {
        let mut filter = FastKalman::new(1.0);
        for x in [0.3, -7.0, 12.5] {
            assert_eq!(filter.update(x), x);
        }
    }
}
