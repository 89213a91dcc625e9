//! Error handling for Treble
//!
//! Configuration and offline tooling errors. The audio path itself never
//! returns an error: out-of-range values are clamped where they are read.

use thiserror::Error;

/// Result type alias for Treble operations
pub type Result<T> = std::result::Result<T, TrebleError>;

/// Main error type for Treble operations
#[derive(Error, Debug)]
pub enum TrebleError {
    // Configuration Errors
    #[error("Invalid sample rate: {sample_rate} Hz (must be positive and finite)")]
    InvalidSampleRate { sample_rate: f64 },

    #[error("Invalid block size: {block_size} (must be at least 1 sample)")]
    InvalidBlockSize { block_size: usize },

    #[error("Unsupported channel count: {requested} (supported: 1..={max})")]
    UnsupportedChannelCount { requested: usize, max: usize },

    #[error("Invalid channel layout: {inputs} inputs, {outputs} outputs")]
    InvalidChannelLayout { inputs: usize, outputs: usize },

    // Parameter Errors
    #[error("Invalid parameter: {param} = {value} (expected {expected})")]
    InvalidParameter {
        param: String,
        value: String,
        expected: String,
    },

    // Audio File Errors
    #[error("Failed to read audio file: {path}")]
    AudioRead {
        path: String,
        #[source]
        source: hound::Error,
    },

    #[error("Failed to write audio file: {path}")]
    AudioWrite {
        path: String,
        #[source]
        source: hound::Error,
    },

    #[error("Unsupported audio format: {format}")]
    UnsupportedFormat { format: String },

    #[error("Audio contains no samples")]
    EmptyBuffer,

    // I/O Errors
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    // Serialization Errors
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl TrebleError {
    /// Get the error code for this error type
    pub fn error_code(&self) -> &'static str {
        match self {
            TrebleError::InvalidSampleRate { .. } => "INVALID_SAMPLE_RATE",
            TrebleError::InvalidBlockSize { .. } => "INVALID_BLOCK_SIZE",
            TrebleError::UnsupportedChannelCount { .. } => "UNSUPPORTED_CHANNEL_COUNT",
            TrebleError::InvalidChannelLayout { .. } => "INVALID_CHANNEL_LAYOUT",
            TrebleError::InvalidParameter { .. } => "INVALID_PARAMETER",
            TrebleError::AudioRead { .. } => "AUDIO_READ",
            TrebleError::AudioWrite { .. } => "AUDIO_WRITE",
            TrebleError::UnsupportedFormat { .. } => "UNSUPPORTED_FORMAT",
            TrebleError::EmptyBuffer => "EMPTY_BUFFER",
            TrebleError::Io(_) => "IO_ERROR",
            TrebleError::Serialization(_) => "SERIALIZATION_ERROR",
        }
    }

    /// Check if this error came from a rejected processor configuration
    pub fn is_configuration_error(&self) -> bool {
        matches!(
            self,
            TrebleError::InvalidSampleRate { .. }
                | TrebleError::InvalidBlockSize { .. }
                | TrebleError::UnsupportedChannelCount { .. }
                | TrebleError::InvalidChannelLayout { .. }
        )
    }

    /// Returns a suggested recovery action for this error
    pub fn recovery_hint(&self) -> &'static str {
        match self {
            TrebleError::InvalidSampleRate { .. } => {
                "Prepare the processor with the host's actual sample rate (e.g. 44100 or 48000)"
            }
            TrebleError::InvalidBlockSize { .. } => "Use a maximum block size of at least 1 sample",
            TrebleError::UnsupportedChannelCount { .. } => "Use a mono or stereo channel layout",
            TrebleError::InvalidChannelLayout { .. } => {
                "Output channel count must be at least the input channel count"
            }
            TrebleError::InvalidParameter { .. } => "Adjust the parameter to be within its range",
            TrebleError::AudioRead { .. } => "Check that the file exists and is a valid WAV file",
            TrebleError::UnsupportedFormat { .. } => "Convert to a mono or stereo WAV file",
            TrebleError::EmptyBuffer => "Load audio before processing",
            _ => "Check the error details and try again",
        }
    }
}
