//! Digital Filters
//!
//! Provides the filter primitives applied once per control-loop tick:
//! - Biquad IIR sections and Butterworth cascades
//! - PT1 first-order lag
//! - FIR convolution and moving averages over borrowed buffers
//! - Moving-sum gyro denoiser (feature `fir-denoise`)
//! - Fixed-gain exponential smoother, lagged moving average, slew limiter
//! - Uniform dispatch over all of the above

pub mod biquad;
#[cfg(feature = "fir-denoise")]
pub mod denoise;
pub mod dispatch;
pub mod dyn_notch;
pub mod fir;
pub mod kalman;
pub mod lma;
pub mod pt1;
pub mod slew;
