pub mod player;
pub mod recorder;
pub mod wav;

pub use player::PlaybackChannel;
pub use recorder::{RecordedClip, Recorder};

use crate::Result;
use std::path::PathBuf;

/// Capture and playback, bundled so the UI can treat "audio is available" as
/// a single capability. Construction fails when no devices are present; the
/// rest of the app keeps working without it.
pub struct AudioEngine {
    pub recorder: Recorder,
    pub player: PlaybackChannel,
}

impl AudioEngine {
    pub fn new(clip_dir: PathBuf) -> Result<Self> {
        Ok(Self {
            recorder: Recorder::new(clip_dir)?,
            player: PlaybackChannel::new()?,
        })
    }
}
