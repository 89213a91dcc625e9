//! Treble - real-time treble shelf equalizer
//!
//! A single-band high shelf built from dry signal plus a mixed 2nd-order
//! high-pass, with slow analog-style cutoff drift and soft saturation on
//! boost.
//!
//! # Architecture
//!
//! - [`dsp`]: the per-block signal chain and the [`dsp::TrebleMaker`] processor
//! - [`params`]: parameter schema and the lock-free shared registry
//! - [`response`]: analytic frequency response for display
//! - [`engine`]: offline buffers, WAV I/O, rendering and analysis

pub mod cli;
pub mod dsp;
pub mod engine;
pub mod error;
pub mod params;
pub mod response;

pub use dsp::{ProcessSpec, TrebleMaker};
pub use error::{Result, TrebleError};
pub use params::{Mode, ParameterSnapshot, TrebleParams};
pub use response::{evaluate_response_curve, ResponseCurve, ResponseEvaluator};
