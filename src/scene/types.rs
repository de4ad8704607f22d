use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::{Path, PathBuf};
use uuid::Uuid;

/// Maximum length (in characters) of a title derived from pasted input
pub const TITLE_MAX_CHARS: usize = 30;

/// Fallback label when a title would otherwise be empty
pub const DEFAULT_TITLE: &str = "Untitled scene";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SceneId(Uuid);

impl SceneId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for SceneId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for SceneId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct LineId(Uuid);

impl LineId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for LineId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for LineId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// Who speaks a line.
///
/// A recorded clip only exists on partner lines; "me with audio" is not a
/// representable state.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "role", rename_all = "snake_case")]
pub enum LineRole {
    /// Spoken by the user; displayed during rehearsal, never played back
    Me,
    /// Spoken by the rehearsal partner; optionally backed by a recorded clip
    Partner {
        #[serde(default, skip_serializing_if = "Option::is_none")]
        audio: Option<PathBuf>,
    },
}

impl LineRole {
    /// The default role for freshly segmented lines
    pub fn partner() -> Self {
        Self::Partner { audio: None }
    }

    pub fn is_me(&self) -> bool {
        matches!(self, Self::Me)
    }

    pub fn is_partner(&self) -> bool {
        matches!(self, Self::Partner { .. })
    }

    /// The recorded clip for a partner line, if any
    pub fn audio(&self) -> Option<&Path> {
        match self {
            Self::Partner { audio: Some(path) } => Some(path),
            _ => None,
        }
    }

    /// A partner line that has not been recorded yet
    pub fn is_unrecorded(&self) -> bool {
        matches!(self, Self::Partner { audio: None })
    }
}

/// One spoken turn of a scene
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Line {
    pub id: LineId,
    pub character: String,
    pub text: String,
    #[serde(flatten)]
    pub role: LineRole,
}

impl Line {
    /// Create a new line; segmented lines always start as unrecorded partner lines
    pub fn new(character: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            id: LineId::new(),
            character: character.into(),
            text: text.into(),
            role: LineRole::partner(),
        }
    }

    /// Assign the line to the user. Any recorded clip reference is dropped.
    pub fn assign_to_me(&mut self) {
        self.role = LineRole::Me;
    }

    /// Assign the line to the partner, keeping an existing clip if the line
    /// already was a partner line.
    pub fn assign_to_partner(&mut self) {
        if !self.role.is_partner() {
            self.role = LineRole::partner();
        }
    }

    /// Attach a recorded clip, returning the replaced clip path if there was one.
    ///
    /// Attaching also makes the line a partner line; self lines never carry audio.
    pub fn attach_clip(&mut self, path: PathBuf) -> Option<PathBuf> {
        let previous = match &mut self.role {
            LineRole::Partner { audio } => audio.take(),
            LineRole::Me => None,
        };
        self.role = LineRole::Partner { audio: Some(path) };
        previous
    }
}

/// A saved script project: an ordered list of lines
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Scene {
    pub id: SceneId,
    pub title: String,
    pub created_at: DateTime<Utc>,
    pub lines: Vec<Line>,
}

impl Scene {
    /// Build a scene from segmented turns. Line order follows the turns and
    /// is never changed afterwards.
    pub fn new(raw_text: &str, lines: Vec<Line>) -> Self {
        Self {
            id: SceneId::new(),
            title: derive_title(raw_text),
            created_at: Utc::now(),
            lines,
        }
    }

    pub fn line(&self, id: LineId) -> Option<&Line> {
        self.lines.iter().find(|l| l.id == id)
    }

    pub fn line_mut(&mut self, id: LineId) -> Option<&mut Line> {
        self.lines.iter_mut().find(|l| l.id == id)
    }

    /// Rename the scene, falling back to the default label when cleared
    pub fn set_title(&mut self, title: &str) {
        let trimmed = title.trim();
        self.title = if trimmed.is_empty() {
            DEFAULT_TITLE.to_string()
        } else {
            trimmed.to_string()
        };
    }
}

/// Derive a scene title from the first line of pasted input, truncated to
/// [`TITLE_MAX_CHARS`]
pub fn derive_title(raw_text: &str) -> String {
    let first_line = raw_text.lines().next().unwrap_or("");
    let title: String = first_line.chars().take(TITLE_MAX_CHARS).collect();
    let title = title.trim();
    if title.is_empty() {
        DEFAULT_TITLE.to_string()
    } else {
        title.to_string()
    }
}
