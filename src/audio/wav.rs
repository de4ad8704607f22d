use crate::{CuelineError, Result};
use hound::{SampleFormat, WavReader, WavSpec, WavWriter};
use std::path::Path;
use tracing::debug;

/// Write mono audio samples to a WAV file
///
/// # Arguments
/// * `path` - Path to the output WAV file
/// * `samples` - Audio samples (f32, range -1.0 to 1.0)
/// * `sample_rate` - Sample rate in Hz
pub fn write_wav<P: AsRef<Path>>(path: P, samples: &[f32], sample_rate: u32) -> Result<()> {
    let spec = WavSpec {
        channels: 1,
        sample_rate,
        bits_per_sample: 16,
        sample_format: SampleFormat::Int,
    };

    let mut writer = WavWriter::create(path.as_ref(), spec)
        .map_err(|e| CuelineError::StorageError(format!("Failed to create WAV writer: {}", e)))?;

    // Convert f32 samples to i16
    for &sample in samples {
        let sample_i16 = (sample.clamp(-1.0, 1.0) * i16::MAX as f32) as i16;
        writer
            .write_sample(sample_i16)
            .map_err(|e| CuelineError::StorageError(format!("Failed to write sample: {}", e)))?;
    }

    writer
        .finalize()
        .map_err(|e| CuelineError::StorageError(format!("Failed to finalize WAV file: {}", e)))?;

    debug!("Wrote {} samples to {:?}", samples.len(), path.as_ref());
    Ok(())
}

/// Read audio samples from a WAV file, folding multi-channel audio to mono
///
/// # Returns
/// * Tuple of (mono samples, sample_rate)
pub fn read_wav<P: AsRef<Path>>(path: P) -> Result<(Vec<f32>, u32)> {
    let mut reader = WavReader::open(path.as_ref())
        .map_err(|e| CuelineError::StorageError(format!("Failed to open WAV file: {}", e)))?;

    let spec = reader.spec();

    let samples: Result<Vec<f32>> = match spec.sample_format {
        SampleFormat::Float => reader
            .samples::<f32>()
            .map(|s| {
                s.map_err(|e| CuelineError::StorageError(format!("Failed to read sample: {}", e)))
            })
            .collect(),
        SampleFormat::Int => {
            let max = (1i64 << (spec.bits_per_sample - 1)) as f32;
            reader
                .samples::<i32>()
                .map(|s| {
                    s.map(|sample| sample as f32 / max).map_err(|e| {
                        CuelineError::StorageError(format!("Failed to read sample: {}", e))
                    })
                })
                .collect()
        }
    };
    let samples = samples?;

    let mono = if spec.channels <= 1 {
        samples
    } else {
        let channels = spec.channels as usize;
        samples
            .chunks(channels)
            .map(|frame| frame.iter().sum::<f32>() / channels as f32)
            .collect()
    };

    debug!(
        "Read {} mono samples at {} Hz from {:?}",
        mono.len(),
        spec.sample_rate,
        path.as_ref()
    );
    Ok((mono, spec.sample_rate))
}
