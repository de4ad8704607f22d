pub mod audio;
pub mod prompter;
pub mod scene;
pub mod segment;
pub mod ui;

use thiserror::Error;

#[derive(Error, Debug, Clone)]
pub enum CuelineError {
    #[error("Audio device error: {0}")]
    AudioDeviceError(String),

    #[error("Segmentation error: {0}")]
    SegmentationError(String),

    #[error("Storage error: {0}")]
    StorageError(String),

    #[error("Unknown scene: {0}")]
    UnknownSceneError(String),

    #[error("Recorder busy: line {0} is still recording")]
    RecorderBusyError(String),

    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("Channel error: {0}")]
    ChannelError(String),
}

impl From<std::io::Error> for CuelineError {
    fn from(e: std::io::Error) -> Self {
        CuelineError::StorageError(e.to_string())
    }
}

impl CuelineError {
    /// Check if this error is recoverable by a new explicit user action
    pub fn is_recoverable(&self) -> bool {
        match self {
            // Device errors are per-attempt; the rest of the session keeps working
            CuelineError::AudioDeviceError(_) => true,
            // The user may resubmit the script
            CuelineError::SegmentationError(_) => true,
            CuelineError::StorageError(_) => false,
            // Scene ids are assigned by the store, so a miss is an invariant violation
            CuelineError::UnknownSceneError(_) => false,
            CuelineError::RecorderBusyError(_) => true,
            CuelineError::ConfigError(_) => false,
            CuelineError::ChannelError(_) => false,
        }
    }

    /// Get a user-friendly description
    pub fn user_message(&self) -> String {
        match self {
            CuelineError::AudioDeviceError(_) => {
                "Microphone unavailable. Please check your audio permissions.".to_string()
            }
            CuelineError::SegmentationError(_) => {
                "Couldn't parse the script. Try a different format.".to_string()
            }
            CuelineError::StorageError(_) => {
                "Failed to save your scenes to disk.".to_string()
            }
            CuelineError::UnknownSceneError(_) => {
                "Internal error: scene not found. Please restart the application.".to_string()
            }
            CuelineError::RecorderBusyError(_) => {
                "Another line is still recording. Stop it first.".to_string()
            }
            CuelineError::ConfigError(_) => {
                "Configuration error. Is GEMINI_API_KEY set?".to_string()
            }
            CuelineError::ChannelError(_) => {
                "Internal communication error. Please restart the application.".to_string()
            }
        }
    }
}

pub type Result<T> = std::result::Result<T, CuelineError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn per_attempt_failures_are_recoverable() {
        assert!(CuelineError::AudioDeviceError("no mic".into()).is_recoverable());
        assert!(CuelineError::SegmentationError("bad response".into()).is_recoverable());
        assert!(CuelineError::RecorderBusyError("line".into()).is_recoverable());
    }

    #[test]
    fn session_level_failures_are_not_recoverable() {
        assert!(!CuelineError::StorageError("disk".into()).is_recoverable());
        assert!(!CuelineError::UnknownSceneError("id".into()).is_recoverable());
        assert!(!CuelineError::ChannelError("closed".into()).is_recoverable());
    }
}
