//! Microphone capture for a single line at a time
//!
//! At most one line in the whole application may be recording; the recorder
//! tracks the active line id and rejects a second `start`. Stopping drains
//! the buffered samples into a timestamped WAV clip for that line.

use crate::audio::wav::write_wav;
use crate::scene::LineId;
use crate::{CuelineError, Result};
use chrono::Utc;
use cpal::traits::{DeviceTrait, HostTrait, StreamTrait};
use cpal::{Device, Stream, StreamConfig};
use parking_lot::Mutex;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::{error, info, warn};

/// A finalized recording, ready to be attached to its line
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordedClip {
    pub line: LineId,
    pub path: PathBuf,
}

pub struct Recorder {
    device: Device,
    config: StreamConfig,
    clip_dir: PathBuf,
    stream: Option<Stream>,
    buffer: Arc<Mutex<Vec<f32>>>,
    active: Option<LineId>,
}

impl Recorder {
    /// Create a recorder over the default input device, storing clips under
    /// `clip_dir`
    pub fn new(clip_dir: PathBuf) -> Result<Self> {
        let host = cpal::default_host();

        let device = host
            .default_input_device()
            .ok_or_else(|| CuelineError::AudioDeviceError("No input device available".into()))?;

        info!(
            "Using input device: {}",
            device.name().unwrap_or_else(|_| "Unknown".to_string())
        );

        let config = device
            .default_input_config()
            .map_err(|e| {
                CuelineError::AudioDeviceError(format!("Failed to get input config: {}", e))
            })?
            .into();

        Ok(Self {
            device,
            config,
            clip_dir,
            stream: None,
            buffer: Arc::new(Mutex::new(Vec::new())),
            active: None,
        })
    }

    pub fn sample_rate(&self) -> u32 {
        self.config.sample_rate.0
    }

    /// The line currently being recorded, if any
    pub fn active_line(&self) -> Option<LineId> {
        self.active
    }

    pub fn is_recording(&self) -> bool {
        self.active.is_some()
    }

    /// Start buffering microphone audio for the given line.
    ///
    /// Fails with a busy error while another line is recording; the caller is
    /// expected to `stop` first.
    pub fn start(&mut self, line: LineId) -> Result<()> {
        if let Some(active) = self.active {
            warn!("Rejecting start for {}: {} is still recording", line, active);
            return Err(CuelineError::RecorderBusyError(active.to_string()));
        }

        let channels = self.config.channels as usize;
        let buffer = Arc::clone(&self.buffer);
        buffer.lock().clear();

        let err_fn = |err| {
            error!("Audio input stream error: {}", err);
        };

        let stream = self
            .device
            .build_input_stream(
                &self.config,
                move |data: &[f32], _: &cpal::InputCallbackInfo| {
                    let mut buf = buffer.lock();
                    if channels == 1 {
                        buf.extend_from_slice(data);
                    } else {
                        // Average all channels to create mono
                        buf.extend(
                            data.chunks(channels)
                                .map(|frame| frame.iter().sum::<f32>() / channels as f32),
                        );
                    }
                },
                err_fn,
                None,
            )
            .map_err(|e| {
                CuelineError::AudioDeviceError(format!("Failed to build input stream: {}", e))
            })?;

        stream.play().map_err(|e| {
            CuelineError::AudioDeviceError(format!("Failed to start input stream: {}", e))
        })?;

        self.stream = Some(stream);
        self.active = Some(line);

        info!("Started recording line {}", line);
        Ok(())
    }

    /// Stop the active recording and finalize it into a WAV clip.
    ///
    /// Returns `None` when nothing was recording.
    pub fn stop(&mut self) -> Result<Option<RecordedClip>> {
        let Some(line) = self.active.take() else {
            return Ok(None);
        };

        if let Some(stream) = self.stream.take() {
            drop(stream);
        }

        let samples = std::mem::take(&mut *self.buffer.lock());
        info!("Stopped recording line {} ({} samples)", line, samples.len());

        finalize_clip(&self.clip_dir, line, &samples, self.sample_rate())
    }
}

/// Write buffered samples out as a timestamped clip for `line`.
///
/// An empty buffer means the stream never delivered audio (stopped right
/// after starting); no file is written and the line stays unrecorded.
fn finalize_clip(
    clip_dir: &Path,
    line: LineId,
    samples: &[f32],
    sample_rate: u32,
) -> Result<Option<RecordedClip>> {
    if samples.is_empty() {
        info!("Discarding empty recording for line {}", line);
        return Ok(None);
    }

    fs::create_dir_all(clip_dir)?;
    let path = clip_dir.join(format!("{}-{}.wav", line, Utc::now().timestamp_millis()));
    write_wav(&path, samples, sample_rate)?;

    Ok(Some(RecordedClip { line, path }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn empty_buffer_finalizes_to_no_clip() {
        let dir = TempDir::new().unwrap();
        let line = LineId::new();

        let clip = finalize_clip(dir.path(), line, &[], 16_000).unwrap();

        assert!(clip.is_none());
        assert_eq!(fs::read_dir(dir.path()).unwrap().count(), 0);
    }

    #[test]
    fn buffered_samples_finalize_to_a_wav_clip() {
        let dir = TempDir::new().unwrap();
        let line = LineId::new();
        let samples = vec![0.25_f32; 800];

        let clip = finalize_clip(dir.path(), line, &samples, 16_000)
            .unwrap()
            .unwrap();

        assert_eq!(clip.line, line);
        assert!(clip.path.exists());
    }

    // Needs a microphone; machines without one skip the body.
    #[test]
    fn second_start_is_rejected_while_a_line_records() {
        let dir = TempDir::new().unwrap();
        let Ok(mut recorder) = Recorder::new(dir.path().to_path_buf()) else {
            return;
        };

        let first = LineId::new();
        let second = LineId::new();

        recorder.start(first).unwrap();
        assert_eq!(recorder.active_line(), Some(first));

        match recorder.start(second) {
            Err(CuelineError::RecorderBusyError(busy)) => assert_eq!(busy, first.to_string()),
            other => panic!("Expected busy error, got {:?}", other),
        }

        // The first recording is untouched by the rejected start.
        assert_eq!(recorder.active_line(), Some(first));
        recorder.stop().unwrap();
        assert!(recorder.active_line().is_none());
    }
}
