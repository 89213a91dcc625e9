//! CLI Module
//!
//! Command-line interface for rendering, inspecting and analysing the
//! treble shelf offline.

pub mod commands;

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

use crate::error::{Result, TrebleError};
use crate::params::{Mode, ParameterSnapshot};

/// Treble - treble shelf equalizer with analog drift and soft saturation
#[derive(Parser, Debug)]
#[command(name = "treble")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Process a WAV file through the shelf
    #[command(name = "render")]
    Render {
        /// Input WAV file
        input: PathBuf,

        /// Output WAV file
        output: PathBuf,

        #[command(flatten)]
        params: ParamArgs,

        /// Host block size in samples
        #[arg(short, long, default_value_t = 512)]
        block_size: usize,

        /// Output bit depth (16, 24 or 32 float)
        #[arg(long, default_value_t = 32)]
        bit_depth: u16,
    },

    /// Print the magnitude response curve
    #[command(name = "response")]
    Response {
        #[command(flatten)]
        params: ParamArgs,

        /// Sample rate to evaluate at
        #[arg(long, default_value_t = 44100.0)]
        sample_rate: f64,

        /// Number of log-spaced points
        #[arg(long, default_value_t = 200)]
        points: usize,

        /// Print JSON instead of a table
        #[arg(long)]
        json: bool,
    },

    /// Measure level, peaks and brightness of a WAV file
    #[command(name = "analyze")]
    Analyze {
        /// WAV file to analyse
        input: PathBuf,

        /// Print JSON instead of a summary
        #[arg(long)]
        json: bool,
    },
}

/// Shelf parameters: an optional JSON file, overridden by flags
#[derive(Args, Debug, Clone, Default)]
pub struct ParamArgs {
    /// JSON file with raw parameter state
    #[arg(long = "params")]
    pub params_file: Option<PathBuf>,

    /// Cutoff frequency in Hz (2000-20000)
    #[arg(long)]
    pub freq: Option<f32>,

    /// Gain in dB (0-8)
    #[arg(long)]
    pub gain: Option<f32>,

    /// Resonance / Q (0.1-1.5)
    #[arg(long)]
    pub q: Option<f32>,

    /// boost or cut
    #[arg(long)]
    pub mode: Option<String>,
}

impl ParamArgs {
    /// Build and validate the snapshot these arguments describe
    pub fn resolve(&self) -> Result<ParameterSnapshot> {
        let mut snapshot = match &self.params_file {
            Some(path) => ParameterSnapshot::from_json(&std::fs::read_to_string(path)?)?,
            None => ParameterSnapshot::default(),
        };

        if let Some(freq) = self.freq {
            snapshot.cutoff_hz = freq;
        }
        if let Some(gain) = self.gain {
            snapshot.gain_db = gain;
        }
        if let Some(q) = self.q {
            snapshot.resonance = q;
        }
        if let Some(mode) = &self.mode {
            snapshot.mode = Mode::from_str(mode).ok_or_else(|| TrebleError::InvalidParameter {
                param: "mode".to_string(),
                value: mode.clone(),
                expected: "boost or cut".to_string(),
            })?;
        }

        snapshot.validate()?;
        Ok(snapshot)
    }
}
