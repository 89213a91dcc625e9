//! Offline Audio Engine
//!
//! Everything needed to run the processor outside a plugin host:
//! - Planar audio buffers
//! - WAV file I/O
//! - Block-dispatch rendering
//! - Signal analysis for verification

pub mod analysis;
pub mod buffer;
pub mod io;
pub mod render;

pub use analysis::AudioAnalysis;
pub use buffer::AudioBuffer;
pub use io::{load_wav, save_wav, save_wav_with_depth};
pub use render::{render, render_automated, RenderReport};
