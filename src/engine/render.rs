//! Offline rendering
//!
//! Feeds a whole buffer through a processor in fixed-size blocks, the way a
//! host would during playback.

use log::{debug, info};

use crate::dsp::{Effect, TrebleMaker};
use crate::engine::buffer::AudioBuffer;
use crate::error::{Result, TrebleError};
use crate::params::ParameterSnapshot;

/// Summary of a finished render
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RenderReport {
    pub blocks: usize,
    pub frames: usize,
}

/// Prepare `effect` for `buffer` and process it block by block in place
pub fn render(effect: &mut dyn Effect, buffer: &mut AudioBuffer, block_size: usize) -> Result<RenderReport> {
    if buffer.is_empty() {
        return Err(TrebleError::EmptyBuffer);
    }
    effect.prepare(buffer.sample_rate, block_size, buffer.channels())?;

    info!(
        "Rendering {} frames through {} ({}) in blocks of {}",
        buffer.len(),
        effect.display_name(),
        effect.id(),
        block_size
    );

    let frames = buffer.len();
    let mut scratch = AudioBuffer::silence(buffer.channels(), block_size, buffer.sample_rate);
    let mut blocks = 0;
    let mut start = 0;

    while start < frames {
        let end = (start + block_size).min(frames);
        for (dst, src) in scratch.samples.iter_mut().zip(&buffer.samples) {
            dst.clear();
            dst.extend_from_slice(&src[start..end]);
        }

        effect.process(&mut scratch);

        for (dst, src) in buffer.samples.iter_mut().zip(&scratch.samples) {
            dst[start..end].copy_from_slice(src);
        }

        blocks += 1;
        start = end;
    }

    debug!("Rendered {} blocks", blocks);
    Ok(RenderReport { blocks, frames })
}

/// Like [`render`], with parameters supplied per block.
///
/// `automation` receives the first frame index of each block.
pub fn render_automated<F>(
    processor: &mut TrebleMaker,
    buffer: &mut AudioBuffer,
    block_size: usize,
    mut automation: F,
) -> Result<RenderReport>
where
    F: FnMut(usize) -> ParameterSnapshot,
{
    if buffer.is_empty() {
        return Err(TrebleError::EmptyBuffer);
    }
    processor.prepare(buffer.sample_rate as f64, block_size, buffer.channels())?;

    let frames = buffer.len();
    let mut blocks = 0;
    let mut start = 0;

    while start < frames {
        let end = (start + block_size).min(frames);
        let params = automation(start);
        let mut block: Vec<&mut [f32]> = buffer
            .samples
            .iter_mut()
            .map(|ch| &mut ch[start..end])
            .collect();
        processor.process_block_with(&mut block, &params);

        blocks += 1;
        start = end;
    }

    Ok(RenderReport { blocks, frames })
}
