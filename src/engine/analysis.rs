//! Signal analysis
//!
//! Objective measurements used to verify processed audio without listening:
//! level, peak, DC offset, non-finite samples, step discontinuities and
//! FFT spectra.

use rustfft::{num_complex::Complex, FftPlanner};
use serde::Serialize;

use crate::dsp::mix::{db_to_linear, linear_to_db};
use crate::engine::buffer::AudioBuffer;

/// Samples at or above this magnitude count as clipped
const CLIP_THRESHOLD: f32 = 0.9999;

/// Linear level in dBFS, `-inf` for silence
fn level_db(level: f32) -> f32 {
    linear_to_db(level as f64) as f32
}

/// Calculate RMS (Root Mean Square) of samples
pub fn calculate_rms(samples: &[f32]) -> f32 {
    if samples.is_empty() {
        return 0.0;
    }
    let sum_squares: f64 = samples.iter().map(|&s| (s as f64) * (s as f64)).sum();
    (sum_squares / samples.len() as f64).sqrt() as f32
}

/// Calculate peak (maximum absolute value) of samples
pub fn calculate_peak(samples: &[f32]) -> f32 {
    samples.iter().map(|s| s.abs()).fold(0.0_f32, f32::max)
}

/// Calculate DC offset (mean of samples)
pub fn calculate_dc_offset(samples: &[f32]) -> f32 {
    if samples.is_empty() {
        return 0.0;
    }
    let sum: f64 = samples.iter().map(|&s| s as f64).sum();
    (sum / samples.len() as f64) as f32
}

pub fn count_clipped_samples(samples: &[f32]) -> usize {
    samples.iter().filter(|s| s.abs() >= CLIP_THRESHOLD).count()
}

pub fn count_non_finite(samples: &[f32]) -> usize {
    samples.iter().filter(|s| !s.is_finite()).count()
}

/// Largest absolute difference between consecutive samples
pub fn max_sample_jump(samples: &[f32]) -> f32 {
    samples
        .windows(2)
        .map(|w| (w[1] - w[0]).abs())
        .fold(0.0_f32, f32::max)
}

/// Ratio of output to input RMS in dB
pub fn gain_db(input: &[f32], output: &[f32]) -> f32 {
    level_db(calculate_rms(output)) - level_db(calculate_rms(input))
}

/// Complete analysis of a buffer
#[derive(Debug, Clone, Serialize)]
pub struct AudioAnalysis {
    pub channels: usize,
    pub sample_rate: u32,
    pub duration_secs: f64,
    pub rms_db: f32,
    pub peak_db: f32,
    pub dc_offset: f32,
    pub clipped_samples: usize,
    pub non_finite_samples: usize,
    pub max_sample_jump: f32,
    /// Amplitude-weighted mean frequency of the first channel, in Hz
    pub spectral_centroid_hz: f32,
}

impl AudioAnalysis {
    /// FFT size used for the centroid
    pub const FFT_SIZE: usize = 4096;

    /// Analyze an audio buffer across all channels
    pub fn analyze(buffer: &AudioBuffer) -> Self {
        let all: Vec<f32> = buffer.samples.iter().flatten().copied().collect();
        let max_sample_jump = buffer
            .samples
            .iter()
            .map(|ch| max_sample_jump(ch))
            .fold(0.0_f32, f32::max);
        let spectral_centroid_hz = buffer
            .samples
            .first()
            .map(|ch| spectral_centroid(ch, buffer.sample_rate, Self::FFT_SIZE))
            .unwrap_or(0.0);

        Self {
            channels: buffer.channels(),
            sample_rate: buffer.sample_rate,
            duration_secs: buffer.duration_secs(),
            rms_db: level_db(calculate_rms(&all)),
            peak_db: level_db(calculate_peak(&all)),
            dc_offset: calculate_dc_offset(&all),
            clipped_samples: count_clipped_samples(&all),
            non_finite_samples: count_non_finite(&all),
            max_sample_jump,
            spectral_centroid_hz,
        }
    }

    /// Generate a summary string for display
    pub fn summary(&self) -> String {
        let mut s = format!(
            "Duration: {:.2}s | {} ch @ {} Hz\n\
             RMS: {:.1} dBFS | Peak: {:.1} dBFS | DC Offset: {:.4}\n\
             Max step: {:.4} | Spectral centroid: {:.0} Hz",
            self.duration_secs,
            self.channels,
            self.sample_rate,
            self.rms_db,
            self.peak_db,
            self.dc_offset,
            self.max_sample_jump,
            self.spectral_centroid_hz
        );

        if self.clipped_samples > 0 {
            s.push_str(&format!("\nClipping: {} samples", self.clipped_samples));
        }
        if self.non_finite_samples > 0 {
            s.push_str(&format!("\nNon-finite: {} samples", self.non_finite_samples));
        }

        s
    }
}

/// One FFT bin
#[derive(Debug, Clone, Copy)]
pub struct SpectralBin {
    pub frequency: f32,
    pub magnitude_db: f32,
}

/// Hann-windowed magnitude spectrum of the first `fft_size` samples.
///
/// Returns an empty spectrum when there are fewer samples than `fft_size`.
pub fn analyze_spectrum(samples: &[f32], sample_rate: u32, fft_size: usize) -> Vec<SpectralBin> {
    if fft_size == 0 || samples.len() < fft_size {
        return Vec::new();
    }

    let mut planner = FftPlanner::new();
    let fft = planner.plan_fft_forward(fft_size);

    let mut bins: Vec<Complex<f32>> = samples
        .iter()
        .take(fft_size)
        .enumerate()
        .map(|(i, &s)| {
            let window =
                0.5 * (1.0 - (2.0 * std::f32::consts::PI * i as f32 / fft_size as f32).cos());
            Complex::new(s * window, 0.0)
        })
        .collect();

    fft.process(&mut bins);

    let bin_hz = sample_rate as f32 / fft_size as f32;
    // Hann window coherent gain is 0.5
    let scale = fft_size as f32 / 4.0;

    bins.iter()
        .take(fft_size / 2)
        .enumerate()
        .map(|(i, c)| SpectralBin {
            frequency: i as f32 * bin_hz,
            magnitude_db: level_db(c.norm() / scale),
        })
        .collect()
}

/// Magnitude in dB at the bin nearest `frequency`
pub fn magnitude_at_frequency(samples: &[f32], sample_rate: u32, frequency: f32, fft_size: usize) -> f32 {
    let spectrum = analyze_spectrum(samples, sample_rate, fft_size);
    let bin_hz = sample_rate as f32 / fft_size as f32;
    let target_bin = (frequency / bin_hz).round() as usize;

    spectrum
        .get(target_bin)
        .map(|b| b.magnitude_db)
        .unwrap_or(f32::NEG_INFINITY)
}

/// Spectral centroid (brightness indicator) in Hz
pub fn spectral_centroid(samples: &[f32], sample_rate: u32, fft_size: usize) -> f32 {
    let spectrum = analyze_spectrum(samples, sample_rate, fft_size);

    let mut weighted_sum = 0.0;
    let mut magnitude_sum = 0.0;
    for bin in &spectrum {
        let linear = db_to_linear(bin.magnitude_db as f64) as f32;
        weighted_sum += bin.frequency * linear;
        magnitude_sum += linear;
    }

    if magnitude_sum > 0.0 {
        weighted_sum / magnitude_sum
    } else {
        0.0
    }
}
