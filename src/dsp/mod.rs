//! DSP
//!
//! The treble shelf signal chain, stage by stage, and the processor that
//! runs it per block.

pub mod drift;
mod effect;
pub mod filter;
pub mod mix;
pub mod saturation;
mod treble;

pub use drift::DriftOscillator;
pub use effect::Effect;
pub use filter::{FilterBank, FilterDesign, HighPassState, MAX_CHANNELS};
pub use saturation::Saturator;
pub use treble::{ProcessSpec, TrebleMaker};
