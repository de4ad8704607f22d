//! Rehearsal cursor machine
//!
//! A `Prompter` walks a scene's lines one at a time. The cursor is always
//! clamped to a valid index; advancing past the last line is a terminal
//! transition, not a wraparound.

use crate::scene::Scene;
use std::path::Path;

/// Result of an `advance` step
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Step {
    /// The cursor moved to the next line
    Moved,
    /// The cursor was on the last line; the session is over
    Finished,
}

/// What entering the current line should do
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Cue<'a> {
    /// A self line: display it, never play anything
    Speak,
    /// A recorded partner line: play this clip immediately
    Play(&'a Path),
    /// A partner line without a recording: flag it instead of playing
    Unrecorded,
}

#[derive(Debug, Clone, Copy, Default)]
pub struct Prompter {
    cursor: usize,
}

impl Prompter {
    pub fn new() -> Self {
        Self { cursor: 0 }
    }

    pub fn cursor(&self) -> usize {
        self.cursor
    }

    /// Move forward one line, or finish at the last line
    pub fn advance(&mut self, scene: &Scene) -> Step {
        if self.cursor + 1 >= scene.lines.len() {
            Step::Finished
        } else {
            self.cursor += 1;
            Step::Moved
        }
    }

    /// Move back one line, clamped at the first. Returns whether the cursor
    /// moved; retreating never exits the session.
    pub fn retreat(&mut self) -> bool {
        if self.cursor == 0 {
            false
        } else {
            self.cursor -= 1;
            true
        }
    }

    /// Restart from the first line without leaving the session
    pub fn reset(&mut self) {
        self.cursor = 0;
    }

    pub fn is_first(&self) -> bool {
        self.cursor == 0
    }

    pub fn is_last(&self, scene: &Scene) -> bool {
        self.cursor + 1 >= scene.lines.len()
    }

    /// Completed fraction of the session, for the progress header
    pub fn progress(&self, scene: &Scene) -> f32 {
        if scene.lines.is_empty() {
            0.0
        } else {
            (self.cursor + 1) as f32 / scene.lines.len() as f32
        }
    }

    /// The cue for the line under the cursor
    pub fn cue<'a>(&self, scene: &'a Scene) -> Option<Cue<'a>> {
        let line = scene.lines.get(self.cursor)?;
        Some(if line.role.is_me() {
            Cue::Speak
        } else if let Some(path) = line.role.audio() {
            Cue::Play(path)
        } else {
            Cue::Unrecorded
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scene::Line;
    use std::path::PathBuf;

    fn scene() -> Scene {
        Scene::new(
            "ANA: Hello",
            vec![
                Line::new("ANA", "Hello"),
                Line::new("BOB", "Hi there"),
                Line::new("ANA", "How are you?"),
            ],
        )
    }

    #[test]
    fn test_advance_stops_at_last_line() {
        let scene = scene();
        let mut prompter = Prompter::new();

        assert_eq!(prompter.advance(&scene), Step::Moved);
        assert_eq!(prompter.advance(&scene), Step::Moved);
        assert_eq!(prompter.cursor(), 2);

        // Terminal, never wraps
        assert_eq!(prompter.advance(&scene), Step::Finished);
        assert_eq!(prompter.cursor(), 2);
    }

    #[test]
    fn test_retreat_clamps_at_first_line() {
        let scene = scene();
        let mut prompter = Prompter::new();

        assert!(!prompter.retreat());
        assert_eq!(prompter.cursor(), 0);

        prompter.advance(&scene);
        assert!(prompter.retreat());
        assert_eq!(prompter.cursor(), 0);
    }

    #[test]
    fn test_reset_rewinds_without_exit() {
        let scene = scene();
        let mut prompter = Prompter::new();
        prompter.advance(&scene);
        prompter.advance(&scene);

        prompter.reset();
        assert_eq!(prompter.cursor(), 0);
        assert!(prompter.is_first());
    }

    #[test]
    fn test_cursor_stays_in_bounds() {
        let scene = scene();
        let mut prompter = Prompter::new();
        for _ in 0..10 {
            prompter.advance(&scene);
        }
        assert!(prompter.cursor() < scene.lines.len());
        for _ in 0..10 {
            prompter.retreat();
        }
        assert_eq!(prompter.cursor(), 0);
    }

    #[test]
    fn test_cue_for_each_role() {
        let mut scene = scene();
        scene.lines[0].assign_to_me();
        scene.lines[1].attach_clip(PathBuf::from("/tmp/bob.wav"));

        let mut prompter = Prompter::new();
        assert_eq!(prompter.cue(&scene), Some(Cue::Speak));

        prompter.advance(&scene);
        assert_eq!(prompter.cue(&scene), Some(Cue::Play(Path::new("/tmp/bob.wav"))));

        prompter.advance(&scene);
        assert_eq!(prompter.cue(&scene), Some(Cue::Unrecorded));
    }

    #[test]
    fn test_self_line_never_cues_playback() {
        // Even a self line has no representable clip, so the cue is Speak
        let mut scene = scene();
        scene.lines[0].attach_clip(PathBuf::from("/tmp/stray.wav"));
        scene.lines[0].assign_to_me();

        let prompter = Prompter::new();
        assert_eq!(prompter.cue(&scene), Some(Cue::Speak));
    }

    #[test]
    fn test_empty_scene_finishes_immediately() {
        let scene = Scene::new("", vec![]);
        let mut prompter = Prompter::new();
        assert_eq!(prompter.advance(&scene), Step::Finished);
        assert_eq!(prompter.cue(&scene), None);
    }
}
