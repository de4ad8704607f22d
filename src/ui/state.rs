//! Application state management
//!
//! `AppState` is the view controller: it owns the scene store, the active
//! view, the rehearsal prompter, and the bookkeeping for the one outstanding
//! segmentation request and the one recording line. Every scene mutation is
//! read-modify-update through the store, so the "current scene" is only ever
//! a `SceneId` pointer and never a divergent copy.

use crate::audio::AudioEngine;
use crate::prompter::{Cue, Prompter, Step};
use crate::scene::{LineId, Scene, SceneId, SceneStore};
use crate::segment::{SegmentCommand, SegmentEvent};
use crate::CuelineError;
use crossbeam_channel::{Receiver, Sender};
use std::path::PathBuf;
use tracing::{debug, error, info, warn};
use uuid::Uuid;

/// The single active view; transitions are triggered only by user actions
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppView {
    Home,
    NewScene,
    EditRoles,
    Rehearsal,
    Help,
    DonateConfirm,
}

/// A segmentation request the UI is still waiting for. The submitted script
/// is kept so the scene title can be derived from it on completion.
#[derive(Debug, Clone)]
struct PendingSegmentation {
    request_id: Uuid,
    script: String,
}

/// Central application state
pub struct AppState {
    /// The active view
    pub view: AppView,

    /// Sole owner of all scenes
    pub store: SceneStore,

    /// The scene being edited or rehearsed
    current: Option<SceneId>,

    /// Script input on the new-scene view
    pub input_text: String,

    /// The one outstanding segmentation request, if any
    pending: Option<PendingSegmentation>,

    /// Rehearsal cursor
    pub prompter: Prompter,

    /// Scene awaiting delete confirmation
    pub pending_delete: Option<SceneId>,

    /// Last user-visible error
    pub last_error: Option<String>,

    /// Title edit buffer (EDIT_ROLES header)
    pub editing_title: bool,
    pub title_buffer: String,

    /// Line text edit buffer
    pub editing_line: Option<LineId>,
    pub line_buffer: String,

    /// Capture/playback capability; absent when no devices are available
    pub audio: Option<AudioEngine>,
    clip_dir: PathBuf,

    /// Channel to send segmentation commands
    segment_tx: Option<Sender<SegmentCommand>>,
    /// Channel to receive segmentation events
    segment_rx: Option<Receiver<SegmentEvent>>,
}

impl AppState {
    /// Create a new application state over the given store
    pub fn new(store: SceneStore, clip_dir: PathBuf) -> Self {
        Self {
            view: AppView::Home,
            store,
            current: None,
            input_text: String::new(),
            pending: None,
            prompter: Prompter::new(),
            pending_delete: None,
            last_error: None,
            editing_title: false,
            title_buffer: String::new(),
            editing_line: None,
            line_buffer: String::new(),
            audio: None,
            clip_dir,
            segment_tx: None,
            segment_rx: None,
        }
    }

    /// Wire up the segmentation pipeline channels
    pub fn connect_pipeline(
        &mut self,
        tx: Sender<SegmentCommand>,
        rx: Receiver<SegmentEvent>,
    ) {
        self.segment_tx = Some(tx);
        self.segment_rx = Some(rx);
    }

    pub fn current_scene(&self) -> Option<&Scene> {
        self.store.get(self.current?)
    }

    pub fn current_scene_id(&self) -> Option<SceneId> {
        self.current
    }

    /// Whether a segmentation request is outstanding (submission is disabled
    /// while one is)
    pub fn is_segmenting(&self) -> bool {
        self.pending.is_some()
    }

    pub fn dismiss_error(&mut self) {
        self.last_error = None;
    }

    // ---- View transitions ----

    pub fn open_new_scene(&mut self) {
        self.view = AppView::NewScene;
    }

    pub fn open_help(&mut self) {
        self.view = AppView::Help;
    }

    pub fn open_donate(&mut self) {
        self.view = AppView::DonateConfirm;
    }

    /// Return to the home view. Leaving the new-scene view abandons any
    /// outstanding segmentation request; its result, if it ever arrives, is
    /// dropped.
    pub fn go_home(&mut self) {
        if self.view == AppView::NewScene {
            if let Some(pending) = self.pending.take() {
                debug!("Abandoning segmentation request {}", pending.request_id);
            }
        }
        self.stop_recording();
        if let Some(engine) = &self.audio {
            engine.player.stop();
        }
        self.editing_title = false;
        self.editing_line = None;
        self.view = AppView::Home;
    }

    /// Open the role/recording editor for an existing scene (the gear action)
    pub fn open_scene_settings(&mut self, id: SceneId) {
        self.current = Some(id);
        self.editing_title = false;
        self.editing_line = None;
        self.view = AppView::EditRoles;
    }

    /// Enter rehearsal at the first line; the first cue fires immediately
    pub fn start_rehearsal(&mut self, id: SceneId) {
        self.stop_recording();
        self.current = Some(id);
        self.prompter.reset();
        self.view = AppView::Rehearsal;
        info!("Starting rehearsal of scene {}", id);
        self.trigger_cue();
    }

    /// Back from rehearsal into the role editor (the settings action)
    pub fn rehearsal_settings(&mut self) {
        if let Some(engine) = &self.audio {
            engine.player.stop();
        }
        self.view = AppView::EditRoles;
    }

    // ---- Segmentation ----

    /// Submit the pasted script for segmentation. No-op while a request is
    /// already outstanding or when the input is blank.
    pub fn submit_script(&mut self) {
        let script = self.input_text.trim().to_string();
        if script.is_empty() || self.pending.is_some() {
            return;
        }

        let Some(tx) = &self.segment_tx else {
            self.last_error = Some("Segmentation service is not available".to_string());
            return;
        };

        let request_id = Uuid::new_v4();
        if tx
            .send(SegmentCommand::Segment {
                script: script.clone(),
                request_id,
            })
            .is_err()
        {
            self.last_error = Some("Segmentation service is not available".to_string());
            return;
        }

        self.last_error = None;
        self.pending = Some(PendingSegmentation { request_id, script });
        debug!("Submitted segmentation request {}", request_id);
    }

    /// Drain pipeline events; called once per frame
    pub fn poll_events(&mut self) {
        let events: Vec<SegmentEvent> = match &self.segment_rx {
            Some(rx) => rx.try_iter().collect(),
            None => Vec::new(),
        };
        for event in events {
            self.apply_segment_event(event);
        }
    }

    /// Apply one segmentation event. Results whose request id does not match
    /// the outstanding request are stale and silently dropped.
    pub fn apply_segment_event(&mut self, event: SegmentEvent) {
        match event {
            SegmentEvent::Completed { turns, request_id } => {
                let Some(pending) = &self.pending else {
                    debug!("Dropping stale segmentation result {}", request_id);
                    return;
                };
                if pending.request_id != request_id {
                    debug!("Dropping stale segmentation result {}", request_id);
                    return;
                }

                let script = self.pending.take().map(|p| p.script).unwrap_or_default();
                match self.store.create_from_turns(&script, turns) {
                    Ok(id) => {
                        self.current = Some(id);
                        self.input_text.clear();
                        self.view = AppView::EditRoles;
                    }
                    Err(e) => self.report_error("Failed to store segmented scene", &e),
                }
            }
            SegmentEvent::Failed { error, request_id } => {
                match &self.pending {
                    Some(pending) if pending.request_id == request_id => {
                        // Input is kept so the user can edit and resubmit
                        self.pending = None;
                        self.last_error = Some(error);
                    }
                    _ => debug!("Dropping stale segmentation failure {}", request_id),
                }
            }
            SegmentEvent::Shutdown => {
                debug!("Segmentation pipeline shut down");
            }
        }
    }

    /// Surface an error in the banner. Recoverable errors are a warning; the
    /// rest mean some part of the session is broken and log at error level.
    fn report_error(&mut self, context: &str, e: &CuelineError) {
        if e.is_recoverable() {
            warn!("{}: {}", context, e);
        } else {
            error!("{}: {}", context, e);
        }
        self.last_error = Some(e.user_message());
    }

    // ---- Scene editing ----

    /// Run an edit against the current scene and persist it through the store
    fn mutate_current(&mut self, f: impl FnOnce(&mut Scene)) {
        let Some(id) = self.current else { return };
        let Some(mut scene) = self.store.get(id).cloned() else {
            return;
        };
        f(&mut scene);
        if let Err(e) = self.store.update(scene) {
            self.report_error("Failed to persist scene edit", &e);
        }
    }

    pub fn begin_title_edit(&mut self) {
        let Some(title) = self.current_scene().map(|s| s.title.clone()) else {
            return;
        };
        self.title_buffer = title;
        self.editing_title = true;
    }

    pub fn commit_title_edit(&mut self) {
        let title = std::mem::take(&mut self.title_buffer);
        self.mutate_current(|scene| scene.set_title(&title));
        self.editing_title = false;
    }

    pub fn begin_line_edit(&mut self, line: LineId) {
        if let Some(text) = self
            .current_scene()
            .and_then(|s| s.line(line))
            .map(|l| l.text.clone())
        {
            self.line_buffer = text;
            self.editing_line = Some(line);
        }
    }

    pub fn commit_line_edit(&mut self) {
        let Some(line) = self.editing_line.take() else {
            return;
        };
        let text = std::mem::take(&mut self.line_buffer);
        self.mutate_current(|scene| {
            if let Some(l) = scene.line_mut(line) {
                l.text = text;
            }
        });
    }

    pub fn cancel_line_edit(&mut self) {
        self.editing_line = None;
        self.line_buffer.clear();
    }

    pub fn assign_line_to_me(&mut self, line: LineId) {
        self.mutate_current(|scene| {
            if let Some(l) = scene.line_mut(line) {
                l.assign_to_me();
            }
        });
    }

    pub fn assign_line_to_partner(&mut self, line: LineId) {
        self.mutate_current(|scene| {
            if let Some(l) = scene.line_mut(line) {
                l.assign_to_partner();
            }
        });
    }

    // ---- Deletion ----

    /// Ask for confirmation before deleting; deletion is irreversible
    pub fn request_delete(&mut self, id: SceneId) {
        self.pending_delete = Some(id);
    }

    /// Abandon the delete prompt; nothing changes
    pub fn cancel_delete(&mut self) {
        self.pending_delete = None;
    }

    /// Confirm the pending deletion
    pub fn confirm_delete(&mut self) {
        let Some(id) = self.pending_delete.take() else {
            return;
        };
        if let Err(e) = self.store.delete(id) {
            self.report_error("Failed to delete scene", &e);
            return;
        }
        if self.current == Some(id) {
            self.current = None;
        }
    }

    // ---- Recording ----

    /// The line currently being recorded, if any
    pub fn recording_line(&self) -> Option<LineId> {
        self.audio.as_ref().and_then(|a| a.recorder.active_line())
    }

    /// Lazily (re)try audio device setup; failure is surfaced per attempt
    fn ensure_audio(&mut self) {
        if self.audio.is_some() {
            return;
        }
        match AudioEngine::new(self.clip_dir.clone()) {
            Ok(engine) => self.audio = Some(engine),
            Err(e) => self.report_error("Audio setup failed", &e),
        }
    }

    /// Start recording a line. If another line is recording, it is stopped
    /// and its clip attached first; at most one line records at any instant.
    pub fn start_recording(&mut self, line: LineId) {
        self.ensure_audio();

        if self.recording_line().is_some() {
            self.stop_recording();
        }

        let Some(engine) = self.audio.as_mut() else {
            return;
        };
        if let Err(e) = engine.recorder.start(line) {
            self.report_error("Failed to start recording", &e);
        }
    }

    /// Stop the active recording and attach the clip to its line
    pub fn stop_recording(&mut self) {
        let result = match self.audio.as_mut() {
            Some(engine) => engine.recorder.stop(),
            None => return,
        };
        match result {
            Ok(Some(clip)) => self.attach_clip(clip.line, clip.path),
            Ok(None) => {}
            Err(e) => self.report_error("Failed to finalize recording", &e),
        }
    }

    /// Attach a clip to a line, replacing (and removing) any previous clip
    pub fn attach_clip(&mut self, line: LineId, path: PathBuf) {
        let mut replaced = None;
        self.mutate_current(|scene| {
            if let Some(l) = scene.line_mut(line) {
                replaced = l.attach_clip(path);
            }
        });
        if let Some(old) = replaced {
            if let Err(e) = std::fs::remove_file(&old) {
                debug!("Could not remove replaced clip {:?}: {}", old, e);
            }
        }
    }

    /// Preview a recorded line from the role editor
    pub fn play_line(&mut self, line: LineId) {
        let Some(path) = self
            .current_scene()
            .and_then(|s| s.line(line))
            .and_then(|l| l.role.audio())
            .map(|p| p.to_path_buf())
        else {
            return;
        };
        self.ensure_audio();
        let result = match &self.audio {
            Some(engine) => engine.player.play(&path),
            None => return,
        };
        if let Err(e) = result {
            self.report_error("Playback failed", &e);
        }
    }

    // ---- Rehearsal ----

    /// Move to the next line; at the last line the session ends and the view
    /// returns home
    pub fn rehearsal_advance(&mut self) {
        let Some(id) = self.current else { return };
        let Some(scene) = self.store.get(id) else {
            return;
        };
        match self.prompter.advance(scene) {
            Step::Moved => self.trigger_cue(),
            Step::Finished => {
                info!("Rehearsal of scene {} finished", id);
                if let Some(engine) = &self.audio {
                    engine.player.stop();
                }
                self.view = AppView::Home;
            }
        }
    }

    /// Move to the previous line; a no-op at the first line
    pub fn rehearsal_retreat(&mut self) {
        if self.prompter.retreat() {
            self.trigger_cue();
        }
    }

    /// Restart the session from the first line
    pub fn rehearsal_restart(&mut self) {
        self.prompter.reset();
        self.trigger_cue();
    }

    /// The cue side effect: entering a recorded partner line plays its clip
    /// through the shared channel (superseding anything already playing).
    /// Self lines and unrecorded partner lines never trigger playback.
    fn trigger_cue(&mut self) {
        let Some(id) = self.current else { return };
        let Some(scene) = self.store.get(id) else {
            return;
        };
        let clip = match self.prompter.cue(scene) {
            Some(Cue::Play(path)) => Some(path.to_path_buf()),
            _ => None,
        };
        if let Some(path) = clip {
            self.ensure_audio();
            let result = match &self.audio {
                Some(engine) => engine.player.play(&path),
                None => return,
            };
            if let Err(e) = result {
                self.report_error("Cue playback failed", &e);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::segment::Turn;
    use crossbeam_channel::bounded;

    fn state() -> (AppState, tempfile::TempDir) {
        let dir = tempfile::tempdir().unwrap();
        let store = SceneStore::open(dir.path().join("scenes.json"));
        let state = AppState::new(store, dir.path().join("clips"));
        (state, dir)
    }

    fn turns() -> Vec<Turn> {
        vec![
            Turn {
                character: "ANA".into(),
                text: "Hello".into(),
            },
            Turn {
                character: "BOB".into(),
                text: "Hi there".into(),
            },
        ]
    }

    #[test]
    fn test_errors_surface_a_user_message_banner() {
        let (mut state, _dir) = state();

        state.report_error("mic gone", &CuelineError::AudioDeviceError("gone".into()));
        assert_eq!(
            state.last_error.as_deref(),
            Some("Microphone unavailable. Please check your audio permissions.")
        );

        state.report_error("snapshot write", &CuelineError::StorageError("disk full".into()));
        assert_eq!(
            state.last_error.as_deref(),
            Some("Failed to save your scenes to disk.")
        );
    }

    #[test]
    fn test_view_transitions() {
        let (mut state, _dir) = state();
        assert_eq!(state.view, AppView::Home);

        state.open_new_scene();
        assert_eq!(state.view, AppView::NewScene);
        state.go_home();

        state.open_help();
        assert_eq!(state.view, AppView::Help);
        state.open_donate();
        assert_eq!(state.view, AppView::DonateConfirm);
        state.go_home();
        assert_eq!(state.view, AppView::Home);
    }

    #[test]
    fn test_successful_segmentation_creates_scene() {
        let (mut state, _dir) = state();
        let (tx, _cmd_rx) = bounded(4);
        let (_event_tx, rx) = bounded(4);
        state.connect_pipeline(tx, rx);

        state.open_new_scene();
        state.input_text = "ANA: Hello\nBOB: Hi there".into();
        state.submit_script();
        assert!(state.is_segmenting());

        let request_id = state.pending.as_ref().unwrap().request_id;
        state.apply_segment_event(SegmentEvent::Completed {
            turns: turns(),
            request_id,
        });

        assert_eq!(state.view, AppView::EditRoles);
        assert!(!state.is_segmenting());
        assert!(state.input_text.is_empty());

        let scene = state.current_scene().unwrap();
        assert_eq!(scene.title, "ANA: Hello");
        assert_eq!(scene.lines.len(), 2);
        assert!(scene.lines.iter().all(|l| l.role.is_unrecorded()));
    }

    #[test]
    fn test_submit_is_disabled_while_pending() {
        let (mut state, _dir) = state();
        let (tx, cmd_rx) = bounded(4);
        let (_event_tx, rx) = bounded(4);
        state.connect_pipeline(tx, rx);

        state.input_text = "ANA: Hello".into();
        state.submit_script();
        state.submit_script();

        assert_eq!(cmd_rx.try_iter().count(), 1);
    }

    #[test]
    fn test_failed_segmentation_keeps_input_and_creates_nothing() {
        let (mut state, _dir) = state();
        let (tx, _cmd_rx) = bounded(4);
        let (_event_tx, rx) = bounded(4);
        state.connect_pipeline(tx, rx);

        state.open_new_scene();
        state.input_text = "garbled".into();
        state.submit_script();
        let request_id = state.pending.as_ref().unwrap().request_id;

        state.apply_segment_event(SegmentEvent::Failed {
            error: "Couldn't parse the script. Try a different format.".into(),
            request_id,
        });

        assert_eq!(state.view, AppView::NewScene);
        assert!(state.store.is_empty());
        assert_eq!(state.input_text, "garbled");
        assert!(state.last_error.is_some());
        assert!(!state.is_segmenting());
    }

    #[test]
    fn test_stale_result_after_navigation_is_dropped() {
        let (mut state, _dir) = state();
        let (tx, _cmd_rx) = bounded(4);
        let (_event_tx, rx) = bounded(4);
        state.connect_pipeline(tx, rx);

        state.open_new_scene();
        state.input_text = "ANA: Hello".into();
        state.submit_script();
        let request_id = state.pending.as_ref().unwrap().request_id;

        // The user leaves before the result arrives
        state.go_home();
        state.apply_segment_event(SegmentEvent::Completed {
            turns: turns(),
            request_id,
        });

        assert_eq!(state.view, AppView::Home);
        assert!(state.store.is_empty());
    }

    #[test]
    fn test_result_with_mismatched_id_is_dropped() {
        let (mut state, _dir) = state();
        let (tx, _cmd_rx) = bounded(4);
        let (_event_tx, rx) = bounded(4);
        state.connect_pipeline(tx, rx);

        state.input_text = "ANA: Hello".into();
        state.submit_script();

        state.apply_segment_event(SegmentEvent::Completed {
            turns: turns(),
            request_id: Uuid::new_v4(),
        });

        assert!(state.store.is_empty());
        // The real request is still outstanding
        assert!(state.is_segmenting());
    }

    #[test]
    fn test_delete_requires_confirmation() {
        let (mut state, _dir) = state();
        let id = state
            .store
            .create_from_turns("ANA: Hello", turns())
            .unwrap();

        state.request_delete(id);
        state.cancel_delete();
        assert_eq!(state.store.len(), 1);

        state.request_delete(id);
        state.confirm_delete();
        assert!(state.store.is_empty());
    }

    #[test]
    fn test_role_assignment_round_trip() {
        let (mut state, _dir) = state();
        let id = state
            .store
            .create_from_turns("ANA: Hello", turns())
            .unwrap();
        state.open_scene_settings(id);

        let line = state.current_scene().unwrap().lines[0].id;
        state.assign_line_to_me(line);
        assert!(state.current_scene().unwrap().lines[0].role.is_me());

        state.assign_line_to_partner(line);
        assert!(state.current_scene().unwrap().lines[0].role.is_unrecorded());

        // The edit went through the store, not a detached copy
        let reloaded = SceneStore::open(state.store.path().to_path_buf());
        assert!(reloaded.get(id).unwrap().lines[0].role.is_unrecorded());
    }

    #[test]
    fn test_attach_clip_replaces_and_removes_old_file() {
        let (mut state, dir) = state();
        let id = state
            .store
            .create_from_turns("ANA: Hello", turns())
            .unwrap();
        state.open_scene_settings(id);
        let line = state.current_scene().unwrap().lines[0].id;

        let first = dir.path().join("take1.wav");
        let second = dir.path().join("take2.wav");
        std::fs::write(&first, b"riff").unwrap();
        std::fs::write(&second, b"riff").unwrap();

        state.attach_clip(line, first.clone());
        state.attach_clip(line, second.clone());

        let scene = state.current_scene().unwrap();
        assert_eq!(scene.lines[0].role.audio(), Some(second.as_path()));
        assert!(!first.exists());
        assert!(second.exists());
    }

    #[test]
    fn test_title_and_line_edits_persist() {
        let (mut state, _dir) = state();
        let id = state
            .store
            .create_from_turns("ANA: Hello", turns())
            .unwrap();
        state.open_scene_settings(id);

        state.begin_title_edit();
        state.title_buffer = "Act I".into();
        state.commit_title_edit();
        assert_eq!(state.current_scene().unwrap().title, "Act I");

        let line = state.current_scene().unwrap().lines[1].id;
        state.begin_line_edit(line);
        state.line_buffer = "Hi again".into();
        state.commit_line_edit();
        assert_eq!(
            state.current_scene().unwrap().line(line).unwrap().text,
            "Hi again"
        );
    }

    #[test]
    fn test_advance_past_last_line_ends_session() {
        let (mut state, _dir) = state();
        let id = state
            .store
            .create_from_turns("ANA: Hello", turns())
            .unwrap();

        state.start_rehearsal(id);
        assert_eq!(state.view, AppView::Rehearsal);
        assert_eq!(state.prompter.cursor(), 0);

        state.rehearsal_advance();
        assert_eq!(state.prompter.cursor(), 1);
        assert_eq!(state.view, AppView::Rehearsal);

        state.rehearsal_advance();
        assert_eq!(state.view, AppView::Home);
    }

    #[test]
    fn test_retreat_at_first_line_stays_in_session() {
        let (mut state, _dir) = state();
        let id = state
            .store
            .create_from_turns("ANA: Hello", turns())
            .unwrap();

        state.start_rehearsal(id);
        state.rehearsal_retreat();
        assert_eq!(state.view, AppView::Rehearsal);
        assert_eq!(state.prompter.cursor(), 0);
    }

    #[test]
    fn test_rehearsal_settings_returns_to_editor() {
        let (mut state, _dir) = state();
        let id = state
            .store
            .create_from_turns("ANA: Hello", turns())
            .unwrap();

        state.start_rehearsal(id);
        state.rehearsal_settings();
        assert_eq!(state.view, AppView::EditRoles);
        assert_eq!(state.current_scene_id(), Some(id));
    }
}
