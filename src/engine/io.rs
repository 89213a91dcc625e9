//! WAV file I/O
//!
//! Loads mono or stereo WAV files of any integer depth or 32-bit float into
//! an [`AudioBuffer`], and writes 16/24-bit integer or 32-bit float files.

use std::path::Path;

use hound::{SampleFormat, WavReader, WavSpec, WavWriter};
use log::debug;

use crate::dsp::filter::MAX_CHANNELS;
use crate::engine::buffer::AudioBuffer;
use crate::error::{Result, TrebleError};

/// Load a WAV file into an AudioBuffer
pub fn load_wav<P: AsRef<Path>>(path: P) -> Result<AudioBuffer> {
    let path = path.as_ref();
    let read_error = |source| TrebleError::AudioRead {
        path: path.display().to_string(),
        source,
    };

    let reader = WavReader::open(path).map_err(read_error)?;
    let spec = reader.spec();
    let channels = spec.channels as usize;

    if channels == 0 || channels > MAX_CHANNELS {
        return Err(TrebleError::UnsupportedFormat {
            format: format!("{}-channel audio (only mono/stereo supported)", channels),
        });
    }

    let samples: Vec<f32> = match spec.sample_format {
        SampleFormat::Float => reader
            .into_samples::<f32>()
            .collect::<std::result::Result<Vec<f32>, _>>()
            .map_err(read_error)?,
        SampleFormat::Int => {
            if spec.bits_per_sample == 0 || spec.bits_per_sample > 32 {
                return Err(TrebleError::UnsupportedFormat {
                    format: format!("{}-bit integer audio", spec.bits_per_sample),
                });
            }
            let max_val = (1u64 << (spec.bits_per_sample - 1)) as f32;
            reader
                .into_samples::<i32>()
                .map(|s| s.map(|v| v as f32 / max_val))
                .collect::<std::result::Result<Vec<f32>, _>>()
                .map_err(read_error)?
        }
    };

    if samples.is_empty() {
        return Err(TrebleError::EmptyBuffer);
    }

    debug!(
        "Loaded {}: {} ch, {} Hz, {}-bit {:?}",
        path.display(),
        channels,
        spec.sample_rate,
        spec.bits_per_sample,
        spec.sample_format
    );

    AudioBuffer::from_interleaved(&samples, channels, spec.sample_rate)
}

/// Save an AudioBuffer to a WAV file (32-bit float)
pub fn save_wav<P: AsRef<Path>>(buffer: &AudioBuffer, path: P) -> Result<()> {
    save_wav_with_depth(buffer, path, 32)
}

/// Save an AudioBuffer to a WAV file with a specific bit depth.
///
/// 32 writes float samples; 16 and 24 write clamped integers.
pub fn save_wav_with_depth<P: AsRef<Path>>(buffer: &AudioBuffer, path: P, bits: u16) -> Result<()> {
    let path = path.as_ref();
    let write_error = |source| TrebleError::AudioWrite {
        path: path.display().to_string(),
        source,
    };

    let sample_format = match bits {
        32 => SampleFormat::Float,
        16 | 24 => SampleFormat::Int,
        _ => {
            return Err(TrebleError::UnsupportedFormat {
                format: format!("{}-bit output (only 16, 24, 32 supported)", bits),
            })
        }
    };

    let spec = WavSpec {
        channels: buffer.channels() as u16,
        sample_rate: buffer.sample_rate,
        bits_per_sample: bits,
        sample_format,
    };

    let mut writer = WavWriter::create(path, spec).map_err(write_error)?;
    let max_val = ((1u32 << (bits.min(31) - 1)) - 1) as f32;

    for sample in buffer.to_interleaved() {
        let written = match sample_format {
            SampleFormat::Float => writer.write_sample(sample),
            SampleFormat::Int => writer.write_sample((sample.clamp(-1.0, 1.0) * max_val) as i32),
        };
        written.map_err(write_error)?;
    }

    writer.finalize().map_err(write_error)?;
    debug!("Wrote {} ({}-bit)", path.display(), bits);
    Ok(())
}
