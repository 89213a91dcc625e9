//! Audio Buffer
//!
//! Planar 32-bit float buffer used by the offline tools. Each channel is a
//! separate `Vec<f32>`, which is also the layout the processor takes.

use std::f32::consts::TAU;

use crate::error::{Result, TrebleError};

/// Non-interleaved audio with a sample rate
///
/// # Example
/// ```
/// use treble::engine::AudioBuffer;
///
/// let buffer = AudioBuffer::silence(2, 48000, 48000);
/// assert_eq!(buffer.channels(), 2);
/// assert_eq!(buffer.len(), 48000);
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct AudioBuffer {
    /// Sample data: outer Vec is channels, inner Vec is samples
    pub samples: Vec<Vec<f32>>,
    /// Sample rate in Hz
    pub sample_rate: u32,
}

impl AudioBuffer {
    /// Zero-filled buffer
    pub fn silence(channels: usize, num_samples: usize, sample_rate: u32) -> Self {
        Self {
            samples: vec![vec![0.0; num_samples]; channels],
            sample_rate,
        }
    }

    /// Build from per-channel vectors, which must all have the same length
    pub fn from_channels(samples: Vec<Vec<f32>>, sample_rate: u32) -> Result<Self> {
        if let Some(first) = samples.first() {
            let len = first.len();
            if samples.iter().any(|ch| ch.len() != len) {
                return Err(TrebleError::UnsupportedFormat {
                    format: "channels of unequal length".to_string(),
                });
            }
        }
        Ok(Self {
            samples,
            sample_rate,
        })
    }

    /// Create an audio buffer from interleaved sample data
    pub fn from_interleaved(interleaved: &[f32], channels: usize, sample_rate: u32) -> Result<Self> {
        if channels == 0 || interleaved.len() % channels != 0 {
            return Err(TrebleError::UnsupportedFormat {
                format: format!(
                    "{} interleaved samples for {} channels",
                    interleaved.len(),
                    channels
                ),
            });
        }

        let num_samples = interleaved.len() / channels;
        let mut samples = vec![Vec::with_capacity(num_samples); channels];
        for frame in interleaved.chunks_exact(channels) {
            for (ch, &sample) in frame.iter().enumerate() {
                samples[ch].push(sample);
            }
        }

        Ok(Self {
            samples,
            sample_rate,
        })
    }

    /// Convert the buffer to interleaved format (L, R, L, R, ...)
    pub fn to_interleaved(&self) -> Vec<f32> {
        let mut interleaved = Vec::with_capacity(self.channels() * self.len());
        for i in 0..self.len() {
            for channel in &self.samples {
                interleaved.push(channel[i]);
            }
        }
        interleaved
    }

    /// Sine tone on every channel
    pub fn sine_wave(
        frequency: f32,
        amplitude: f32,
        num_samples: usize,
        channels: usize,
        sample_rate: u32,
    ) -> Self {
        let tone: Vec<f32> = (0..num_samples)
            .map(|i| amplitude * (TAU * frequency * i as f32 / sample_rate as f32).sin())
            .collect();
        Self {
            samples: vec![tone; channels],
            sample_rate,
        }
    }

    /// Unit impulse at sample 0 of `channel`, silence elsewhere
    pub fn impulse(channels: usize, num_samples: usize, channel: usize, sample_rate: u32) -> Self {
        let mut buffer = Self::silence(channels, num_samples, sample_rate);
        if let Some(first) = buffer.samples.get_mut(channel).and_then(|ch| ch.first_mut()) {
            *first = 1.0;
        }
        buffer
    }

    #[inline]
    pub fn channels(&self) -> usize {
        self.samples.len()
    }

    /// Number of samples per channel
    #[inline]
    pub fn len(&self) -> usize {
        self.samples.first().map(|ch| ch.len()).unwrap_or(0)
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn duration_secs(&self) -> f64 {
        if self.sample_rate == 0 {
            return 0.0;
        }
        self.len() as f64 / self.sample_rate as f64
    }

    /// # Panics
    /// Panics if the channel index is out of bounds
    #[inline]
    pub fn channel(&self, index: usize) -> &[f32] {
        &self.samples[index]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_silence() {
        let buffer = AudioBuffer::silence(2, 100, 44100);
        assert_eq!(buffer.channels(), 2);
        assert_eq!(buffer.len(), 100);
        assert!(buffer.samples.iter().flatten().all(|&s| s == 0.0));
    }

    #[test]
    fn test_interleave_round_trip() {
        let interleaved = vec![0.1, -0.1, 0.2, -0.2, 0.3, -0.3];
        let buffer = AudioBuffer::from_interleaved(&interleaved, 2, 48000).unwrap();
        assert_eq!(buffer.channel(0), &[0.1, 0.2, 0.3]);
        assert_eq!(buffer.channel(1), &[-0.1, -0.2, -0.3]);
        assert_eq!(buffer.to_interleaved(), interleaved);
    }

    #[test]
    fn test_from_interleaved_rejects_partial_frame() {
        assert!(AudioBuffer::from_interleaved(&[0.0; 5], 2, 48000).is_err());
        assert!(AudioBuffer::from_interleaved(&[0.0; 4], 0, 48000).is_err());
    }

    #[test]
    fn test_from_channels_rejects_ragged() {
        assert!(AudioBuffer::from_channels(vec![vec![0.0; 4], vec![0.0; 3]], 48000).is_err());
        assert!(AudioBuffer::from_channels(vec![vec![0.0; 4]; 2], 48000).is_ok());
    }

    #[test]
    fn test_impulse() {
        let buffer = AudioBuffer::impulse(2, 8, 1, 44100);
        assert_eq!(buffer.channel(0), &[0.0; 8]);
        assert_eq!(buffer.channel(1)[0], 1.0);
        assert_eq!(buffer.samples[1].iter().sum::<f32>(), 1.0);
    }

    #[test]
    fn test_sine_wave() {
        let buffer = AudioBuffer::sine_wave(1000.0, 0.5, 4800, 1, 48000);
        let peak = buffer.channel(0).iter().fold(0.0_f32, |m, s| m.max(s.abs()));
        assert!((peak - 0.5).abs() < 1e-3);
        assert!((buffer.duration_secs() - 0.1).abs() < 1e-9);
    }
}
