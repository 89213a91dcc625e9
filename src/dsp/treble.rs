//! Treble shelf processor
//!
//! Per block: advance drift, redesign the high-pass, keep a dry copy,
//! filter in place, mix wet against dry, saturate (boost only) and guard
//! the output.
//!
//! Nothing on the block path allocates, locks or logs. Gain and mode
//! changes ramp across one block so parameter jumps do not click.

use std::sync::Arc;

use log::{debug, info, warn};

use crate::dsp::drift::DriftOscillator;
use crate::dsp::effect::Effect;
use crate::dsp::filter::{FilterBank, FilterDesign, MAX_CHANNELS};
use crate::dsp::mix::{db_to_linear, mix_ramped, wet_coefficient};
use crate::dsp::saturation::Saturator;
use crate::engine::AudioBuffer;
use crate::error::{Result, TrebleError};
use crate::params::{ParameterSnapshot, ParameterSource, TrebleParams};

/// Output samples below this magnitude are flushed to zero
const OUTPUT_DENORMAL_THRESHOLD: f32 = 1e-20;

/// Stream configuration handed to [`TrebleMaker::prepare_spec`]
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ProcessSpec {
    pub sample_rate: f64,
    pub max_block_size: usize,
    pub input_channels: usize,
    pub output_channels: usize,
}

impl ProcessSpec {
    /// Same channel count in and out
    pub fn new(sample_rate: f64, max_block_size: usize, channels: usize) -> Self {
        Self {
            sample_rate,
            max_block_size,
            input_channels: channels,
            output_channels: channels,
        }
    }

    /// Check the configuration the processor can be prepared with
    pub fn validate(&self) -> Result<()> {
        if !self.sample_rate.is_finite() || self.sample_rate <= 0.0 {
            return Err(TrebleError::InvalidSampleRate {
                sample_rate: self.sample_rate,
            });
        }
        if self.max_block_size == 0 {
            return Err(TrebleError::InvalidBlockSize {
                block_size: self.max_block_size,
            });
        }
        if self.output_channels == 0 || self.output_channels > MAX_CHANNELS {
            return Err(TrebleError::UnsupportedChannelCount {
                requested: self.output_channels,
                max: MAX_CHANNELS,
            });
        }
        if self.input_channels == 0 || self.input_channels > self.output_channels {
            return Err(TrebleError::InvalidChannelLayout {
                inputs: self.input_channels,
                outputs: self.output_channels,
            });
        }
        Ok(())
    }
}

/// Real-time treble shelf equalizer
#[derive(Debug)]
pub struct TrebleMaker {
    id: String,
    params: Arc<TrebleParams>,
    spec: Option<ProcessSpec>,
    drift: DriftOscillator,
    filters: FilterBank,
    saturator: Saturator,
    /// Planar dry copy, `output_channels × max_block_size`
    dry: Vec<Vec<f32>>,
    /// Wet coefficient reached at the end of the previous block
    wet_coeff: f32,
    /// False until the first block after prepare/reset, which starts unramped
    primed: bool,
}

impl Default for TrebleMaker {
    fn default() -> Self {
        Self::new()
    }
}

impl TrebleMaker {
    /// Create an unprepared processor with its own parameter registry
    pub fn new() -> Self {
        Self::with_params(Arc::new(TrebleParams::new()))
    }

    /// Create an unprepared processor reading from a shared registry
    pub fn with_params(params: Arc<TrebleParams>) -> Self {
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            params,
            spec: None,
            drift: DriftOscillator::new(),
            filters: FilterBank::default(),
            saturator: Saturator::new(),
            dry: Vec::new(),
            wet_coeff: 0.0,
            primed: false,
        }
    }

    /// Shared parameter registry
    pub fn params(&self) -> &Arc<TrebleParams> {
        &self.params
    }

    /// Current configuration, `None` while unprepared
    pub fn spec(&self) -> Option<&ProcessSpec> {
        self.spec.as_ref()
    }

    pub fn is_prepared(&self) -> bool {
        self.spec.is_some()
    }

    pub fn drift_phase(&self) -> f64 {
        self.drift.phase()
    }

    pub fn saturation_drive(&self) -> f32 {
        self.saturator.drive()
    }

    pub fn filters(&self) -> &FilterBank {
        &self.filters
    }

    // ========================================================================
    // Lifecycle
    // ========================================================================

    /// Prepare with the same channel count in and out
    pub fn prepare(&mut self, sample_rate: f64, max_block_size: usize, channels: usize) -> Result<()> {
        self.prepare_spec(ProcessSpec::new(sample_rate, max_block_size, channels))
    }

    /// (Re)initialise filters, scratch buffers and modulation for `spec`.
    ///
    /// A rejected configuration leaves the processor unprepared.
    pub fn prepare_spec(&mut self, spec: ProcessSpec) -> Result<()> {
        self.spec = None;

        if let Err(e) = spec.validate() {
            warn!("Treble {} rejected configuration {:?}: {}", self.id, spec, e);
            return Err(e);
        }

        self.filters = FilterBank::new(spec.output_channels);
        self.dry = vec![vec![0.0; spec.max_block_size]; spec.output_channels];
        self.drift.reset();
        self.saturator.reset();
        self.wet_coeff = 0.0;
        self.primed = false;
        self.spec = Some(spec);

        info!(
            "Treble {} prepared: {} Hz, block {}, {} in / {} out",
            self.id, spec.sample_rate, spec.max_block_size, spec.input_channels, spec.output_channels
        );
        Ok(())
    }

    /// Clear filter history, drift phase and drive smoothing
    pub fn reset(&mut self) {
        self.filters.reset();
        self.drift.reset();
        self.saturator.reset();
        self.wet_coeff = 0.0;
        self.primed = false;
        debug!("Treble {} reset", self.id);
    }

    /// Free scratch state. Blocks are ignored until the next prepare.
    pub fn release(&mut self) {
        self.spec = None;
        self.filters = FilterBank::default();
        self.dry = Vec::new();
        self.drift.reset();
        self.saturator.reset();
        self.primed = false;
        debug!("Treble {} released", self.id);
    }

    // ========================================================================
    // Processing
    // ========================================================================

    /// Process one block in place using the registry's current values
    pub fn process_block<C: AsMut<[f32]>>(&mut self, channels: &mut [C]) {
        let snapshot = self.params.snapshot();
        self.process_block_with(channels, &snapshot);
    }

    /// Process one block in place using an explicit parameter snapshot.
    ///
    /// Output channels beyond the input count are cleared first. Channels
    /// beyond the prepared output count are not touched. Blocks longer than
    /// the prepared maximum are processed in consecutive chunks.
    pub fn process_block_with<C: AsMut<[f32]>>(
        &mut self,
        channels: &mut [C],
        params: &ParameterSnapshot,
    ) {
        let Some(spec) = self.spec else {
            return;
        };

        let active = channels.len().min(spec.output_channels);
        let num_samples = channels[..active]
            .iter_mut()
            .map(|c| c.as_mut().len())
            .min()
            .unwrap_or(0);
        if num_samples == 0 {
            return;
        }

        for channel in channels
            .iter_mut()
            .take(active)
            .skip(spec.input_channels)
        {
            channel.as_mut().fill(0.0);
        }

        let params = params.clamped();
        let mut start = 0;
        while start < num_samples {
            let end = (start + spec.max_block_size).min(num_samples);
            self.process_chunk(&mut channels[..active], start, end, &params, &spec);
            start = end;
        }
    }

    fn process_chunk<C: AsMut<[f32]>>(
        &mut self,
        channels: &mut [C],
        start: usize,
        end: usize,
        params: &ParameterSnapshot,
        spec: &ProcessSpec,
    ) {
        let len = end - start;

        let drift = self.drift.advance(len, spec.sample_rate);
        let design = FilterDesign::derive(
            params.cutoff_hz,
            params.resonance,
            params.gain_db,
            drift,
            spec.sample_rate,
        );
        self.filters.set_design(&design);

        let target = wet_coefficient(params.mode, db_to_linear(params.gain_db as f64) as f32);
        let from = if self.primed { self.wet_coeff } else { target };
        let shape = self.saturator.begin_block(params.gain_db, params.mode);

        for (ch, channel) in channels.iter_mut().enumerate() {
            let samples = &mut channel.as_mut()[start..end];
            let dry = &mut self.dry[ch][..len];
            dry.copy_from_slice(samples);

            self.filters.process_channel(ch, samples);
            mix_ramped(samples, dry, from, target);

            if ch < spec.input_channels {
                if let Some(shape) = &shape {
                    shape.apply(samples);
                }
            }

            guard_output(samples);
        }

        self.wet_coeff = target;
        self.primed = true;
    }
}

/// Replace non-finite samples with silence, bound to [-1, 1], flush denormals
#[inline]
fn guard_output(samples: &mut [f32]) {
    for sample in samples.iter_mut() {
        let s = *sample;
        *sample = if !s.is_finite() || s.abs() < OUTPUT_DENORMAL_THRESHOLD {
            0.0
        } else {
            s.clamp(-1.0, 1.0)
        };
    }
}

impl Effect for TrebleMaker {
    fn prepare(&mut self, sample_rate: u32, max_block_size: usize, channels: usize) -> Result<()> {
        TrebleMaker::prepare(self, sample_rate as f64, max_block_size, channels)
    }

    fn process(&mut self, buffer: &mut AudioBuffer) {
        self.process_block(&mut buffer.samples);
    }

    fn reset(&mut self) {
        TrebleMaker::reset(self);
    }

    fn release(&mut self) {
        TrebleMaker::release(self);
    }

    fn is_prepared(&self) -> bool {
        TrebleMaker::is_prepared(self)
    }

    fn effect_type(&self) -> &'static str {
        "treble"
    }

    fn display_name(&self) -> &str {
        "Treble Maker"
    }

    fn id(&self) -> &str {
        &self.id
    }
}
