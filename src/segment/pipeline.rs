//! Segmentation pipeline
//!
//! Provides a channel-based interface between the UI thread and the
//! segmentation worker. Exactly one request is expected to be in flight at a
//! time (the UI disables submission while one is pending); request ids exist
//! so the UI can discard results that arrive after the user abandoned the
//! input.

use crate::segment::client::{GeminiSegmenter, SegmentConfig, Turn};
use crate::Result;
use crossbeam_channel::{bounded, Receiver, Sender};
use tokio::runtime::Runtime;
use uuid::Uuid;
use tracing::{debug, error, info};

/// Commands that can be sent to the segmentation pipeline
#[derive(Debug, Clone)]
pub enum SegmentCommand {
    /// Segment the given raw script
    Segment {
        /// The pasted script text
        script: String,
        /// Unique request ID for tracking
        request_id: Uuid,
    },

    /// Shutdown the pipeline
    Shutdown,
}

/// Events emitted by the segmentation pipeline
#[derive(Debug, Clone)]
pub enum SegmentEvent {
    /// Segmentation succeeded
    Completed {
        /// Ordered character/text turns
        turns: Vec<Turn>,
        /// Request ID this result belongs to
        request_id: Uuid,
    },

    /// Segmentation failed (transport error or malformed response)
    Failed {
        /// Error message
        error: String,
        /// Request ID this failure belongs to
        request_id: Uuid,
    },

    /// Pipeline has shut down
    Shutdown,
}

/// Segmentation pipeline with channel-based communication
pub struct SegmentPipeline {
    config: SegmentConfig,
    command_tx: Sender<SegmentCommand>,
    command_rx: Receiver<SegmentCommand>,
    event_tx: Sender<SegmentEvent>,
    event_rx: Receiver<SegmentEvent>,
}

impl SegmentPipeline {
    /// Create a new segmentation pipeline
    pub fn new(config: SegmentConfig) -> Self {
        let (command_tx, command_rx) = bounded(16);
        let (event_tx, event_rx) = bounded(16);

        Self {
            config,
            command_tx,
            command_rx,
            event_tx,
            event_rx,
        }
    }

    /// Get a sender for commands
    pub fn command_sender(&self) -> Sender<SegmentCommand> {
        self.command_tx.clone()
    }

    /// Get a receiver for events
    pub fn event_receiver(&self) -> Receiver<SegmentEvent> {
        self.event_rx.clone()
    }

    /// Start the pipeline worker thread
    ///
    /// The worker owns a tokio runtime for the HTTP call and processes
    /// commands until the channel closes or a shutdown command arrives.
    pub fn start_worker(self) -> Result<()> {
        let config = self.config.clone();
        let command_rx = self.command_rx.clone();
        let event_tx = self.event_tx.clone();

        std::thread::spawn(move || {
            info!("Segmentation worker starting");

            let runtime = match Runtime::new() {
                Ok(rt) => rt,
                Err(e) => {
                    error!("Failed to create tokio runtime: {}", e);
                    let _ = event_tx.send(SegmentEvent::Shutdown);
                    return;
                }
            };

            let segmenter = GeminiSegmenter::new(config);

            loop {
                match command_rx.recv() {
                    Ok(SegmentCommand::Segment { script, request_id }) => {
                        debug!("Processing segmentation request {}", request_id);

                        let event = match runtime.block_on(segmenter.segment(&script)) {
                            Ok(turns) => SegmentEvent::Completed { turns, request_id },
                            Err(e) => {
                                error!("Segmentation request {} failed: {}", request_id, e);
                                SegmentEvent::Failed {
                                    error: e.user_message(),
                                    request_id,
                                }
                            }
                        };

                        if event_tx.send(event).is_err() {
                            break;
                        }
                    }
                    Ok(SegmentCommand::Shutdown) | Err(_) => {
                        break;
                    }
                }
            }

            info!("Segmentation worker shutting down");
            let _ = event_tx.send(SegmentEvent::Shutdown);
        });

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[test]
    fn test_worker_reports_failure_for_unconfigured_key() {
        let config = SegmentConfig {
            api_key: String::new(),
            ..SegmentConfig::default()
        };
        let pipeline = SegmentPipeline::new(config);
        let tx = pipeline.command_sender();
        let rx = pipeline.event_receiver();
        pipeline.start_worker().unwrap();

        let request_id = Uuid::new_v4();
        tx.send(SegmentCommand::Segment {
            script: "ANA: Hello".into(),
            request_id,
        })
        .unwrap();

        match rx.recv_timeout(Duration::from_secs(5)).unwrap() {
            SegmentEvent::Failed {
                request_id: id, ..
            } => assert_eq!(id, request_id),
            other => panic!("expected failure event, got {:?}", other),
        }

        tx.send(SegmentCommand::Shutdown).unwrap();
    }

    #[test]
    fn test_worker_shuts_down_on_command() {
        let pipeline = SegmentPipeline::new(SegmentConfig {
            api_key: String::new(),
            ..SegmentConfig::default()
        });
        let tx = pipeline.command_sender();
        let rx = pipeline.event_receiver();
        pipeline.start_worker().unwrap();

        tx.send(SegmentCommand::Shutdown).unwrap();
        match rx.recv_timeout(Duration::from_secs(5)).unwrap() {
            SegmentEvent::Shutdown => {}
            other => panic!("expected shutdown event, got {:?}", other),
        }
    }
}
