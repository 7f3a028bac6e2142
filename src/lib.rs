//! Flight-Control Filter Library
//!
//! Sample-by-sample digital filters for a fixed-rate flight-control loop.
//! Every filter is a plain value type: construct it once with its tuning,
//! then push one scalar sample per control-loop tick.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                      DISPATCH LAYER                          │
//! │  Filter (enum)  │  LowpassConfig  │  DynamicNotch            │
//! ├─────────────────────────────────────────────────────────────┤
//! │                     FILTER PRIMITIVES                        │
//! │  Biquad / Cascade  │  PT1  │  FIR  │  Denoise                │
//! │  FastKalman  │  Lagged moving average  │  Slew limiter       │
//! ├─────────────────────────────────────────────────────────────┤
//! │                   CONFIG / TYPES                             │
//! │  capacity constants  │  FilterError  │  unit conversions     │
//! └─────────────────────────────────────────────────────────────┘
//! ```
//!
//! # Design Principles
//!
//! - **No allocation**: buffers are fixed-size arrays or borrowed slices
//! - **Bounded cost**: every `apply`/`update` runs in data-independent time
//! - **Infallible sample path**: configuration may fail, filtering never does
//! - **Explicit degradation**: invalid tuning yields a documented passthrough

#![cfg_attr(not(any(test, feature = "std")), no_std)]
#![deny(unsafe_code)]
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::cast_precision_loss)]

/// Filter primitives and the dispatch layer
pub mod filter;

/// Shared types: errors, low-pass configuration, unit conversions
pub mod types;

/// Compile-time capacity limits and tuning defaults
pub mod config;

pub use filter::biquad::{BiquadCascade, BiquadCoeffs, BiquadFilter, BiquadType};
#[cfg(feature = "fir-denoise")]
pub use filter::denoise::FirDenoise;
pub use filter::dispatch::{null_filter_apply, Filter, FilterApply};
pub use filter::dyn_notch::DynamicNotch;
pub use filter::fir::FirFilter;
pub use filter::kalman::FastKalman;
pub use filter::lma::LaggedMovingAverage;
pub use filter::pt1::Pt1Filter;
pub use filter::slew::SlewFilter;
pub use types::{FilterError, LowpassConfig, LowpassType};
