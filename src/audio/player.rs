//! Single shared playback channel
//!
//! One long-lived output stream is fed from a shared clip slot. `play`
//! replaces the slot, so starting a new playback always supersedes the
//! current one; nothing is ever mixed or queued.

use crate::audio::wav::read_wav;
use crate::{CuelineError, Result};
use cpal::traits::{DeviceTrait, HostTrait, StreamTrait};
use cpal::{Device, Stream, StreamConfig};
use parking_lot::Mutex;
use std::path::Path;
use std::sync::Arc;
use tracing::{debug, error, info};

struct ActiveClip {
    samples: Vec<f32>,
    position: usize,
}

pub struct PlaybackChannel {
    device: Device,
    config: StreamConfig,
    stream: Option<Stream>,
    slot: Arc<Mutex<Option<ActiveClip>>>,
}

impl PlaybackChannel {
    /// Create a playback channel over the default output device
    pub fn new() -> Result<Self> {
        let host = cpal::default_host();

        let device = host
            .default_output_device()
            .ok_or_else(|| CuelineError::AudioDeviceError("No output device available".into()))?;

        info!(
            "Using output device: {}",
            device.name().unwrap_or_else(|_| "Unknown".to_string())
        );

        let config = device
            .default_output_config()
            .map_err(|e| {
                CuelineError::AudioDeviceError(format!("Failed to get output config: {}", e))
            })?
            .into();

        let mut channel = Self {
            device,
            config,
            stream: None,
            slot: Arc::new(Mutex::new(None)),
        };
        channel.open_stream()?;
        Ok(channel)
    }

    pub fn sample_rate(&self) -> u32 {
        self.config.sample_rate.0
    }

    /// Play a WAV clip, superseding whatever is currently playing
    pub fn play(&self, path: &Path) -> Result<()> {
        let (samples, clip_rate) = read_wav(path)?;
        let samples = resample_linear(&samples, clip_rate, self.sample_rate());

        debug!("Playing clip {:?} ({} samples)", path, samples.len());
        *self.slot.lock() = Some(ActiveClip {
            samples,
            position: 0,
        });
        Ok(())
    }

    /// Stop playback immediately
    pub fn stop(&self) {
        *self.slot.lock() = None;
    }

    pub fn is_playing(&self) -> bool {
        self.slot.lock().is_some()
    }

    fn open_stream(&mut self) -> Result<()> {
        let channels = self.config.channels as usize;
        let slot = Arc::clone(&self.slot);

        let err_fn = |err| {
            error!("Audio output stream error: {}", err);
        };

        let stream = self
            .device
            .build_output_stream(
                &self.config,
                move |data: &mut [f32], _: &cpal::OutputCallbackInfo| {
                    let mut guard = slot.lock();
                    let Some(clip) = guard.as_mut() else {
                        data.fill(0.0);
                        return;
                    };

                    let frames = data.len() / channels;
                    let available = (clip.samples.len() - clip.position).min(frames);

                    for i in 0..available {
                        let sample = clip.samples[clip.position + i];
                        for c in 0..channels {
                            data[i * channels + c] = sample;
                        }
                    }
                    data[available * channels..].fill(0.0);

                    clip.position += available;
                    if clip.position >= clip.samples.len() {
                        *guard = None;
                    }
                },
                err_fn,
                None,
            )
            .map_err(|e| {
                CuelineError::AudioDeviceError(format!("Failed to build output stream: {}", e))
            })?;

        stream.play().map_err(|e| {
            CuelineError::AudioDeviceError(format!("Failed to start output stream: {}", e))
        })?;

        self.stream = Some(stream);
        Ok(())
    }
}

/// Linear-interpolation resampling from `from_rate` to `to_rate`.
///
/// Plenty for playing voice memos back; anything fancier would be wasted
/// here.
fn resample_linear(samples: &[f32], from_rate: u32, to_rate: u32) -> Vec<f32> {
    if from_rate == to_rate || samples.is_empty() {
        return samples.to_vec();
    }

    let ratio = from_rate as f64 / to_rate as f64;
    let out_len = ((samples.len() as f64) / ratio).round() as usize;

    (0..out_len)
        .map(|i| {
            let src = i as f64 * ratio;
            let idx = src as usize;
            let frac = (src - idx as f64) as f32;
            let a = samples[idx.min(samples.len() - 1)];
            let b = samples[(idx + 1).min(samples.len() - 1)];
            a + (b - a) * frac
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resample_identity() {
        let samples = vec![0.0, 0.5, 1.0];
        assert_eq!(resample_linear(&samples, 48_000, 48_000), samples);
    }

    #[test]
    fn test_resample_halves_length() {
        let samples: Vec<f32> = (0..100).map(|i| i as f32).collect();
        let out = resample_linear(&samples, 48_000, 24_000);
        assert_eq!(out.len(), 50);
        // Still monotonic
        assert!(out.windows(2).all(|w| w[0] <= w[1]));
    }

    #[test]
    fn test_resample_doubles_length() {
        let samples: Vec<f32> = (0..50).map(|i| i as f32).collect();
        let out = resample_linear(&samples, 24_000, 48_000);
        assert_eq!(out.len(), 100);
        assert_eq!(out[0], 0.0);
    }

    #[test]
    fn test_resample_empty() {
        assert!(resample_linear(&[], 24_000, 48_000).is_empty());
    }
}
