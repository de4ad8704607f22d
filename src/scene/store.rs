//! Durable scene collection
//!
//! The store is the sole owner of all scenes. It is loaded once at startup
//! and the full collection is rewritten as a JSON snapshot after every
//! mutation; there is no log and no partial-write recovery.

use crate::scene::types::{Line, Scene, SceneId};
use crate::segment::Turn;
use crate::{CuelineError, Result};
use directories::ProjectDirs;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{info, warn};

/// File name of the scene snapshot inside the data directory
const SNAPSHOT_FILE: &str = "scenes.json";

pub struct SceneStore {
    path: PathBuf,
    scenes: Vec<Scene>,
}

impl SceneStore {
    /// Open a store backed by the given snapshot file.
    ///
    /// A missing, unreadable, or corrupt snapshot is logged and treated as an
    /// empty collection; it never surfaces to the user.
    pub fn open(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let scenes = match fs::read_to_string(&path) {
            Ok(raw) => match serde_json::from_str::<Vec<Scene>>(&raw) {
                Ok(scenes) => {
                    info!("Loaded {} scenes from {:?}", scenes.len(), path);
                    scenes
                }
                Err(e) => {
                    warn!("Discarding corrupt scene snapshot {:?}: {}", path, e);
                    Vec::new()
                }
            },
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Vec::new(),
            Err(e) => {
                warn!("Failed to read scene snapshot {:?}: {}", path, e);
                Vec::new()
            }
        };

        Self { path, scenes }
    }

    /// The platform-specific default snapshot path
    pub fn default_path() -> Result<PathBuf> {
        let dirs = ProjectDirs::from("", "", "cueline").ok_or_else(|| {
            CuelineError::ConfigError("No home directory for scene storage".into())
        })?;
        Ok(dirs.data_dir().join(SNAPSHOT_FILE))
    }

    pub fn scenes(&self) -> &[Scene] {
        &self.scenes
    }

    pub fn len(&self) -> usize {
        self.scenes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.scenes.is_empty()
    }

    pub fn get(&self, id: SceneId) -> Option<&Scene> {
        self.scenes.iter().find(|s| s.id == id)
    }

    /// Create a scene from segmented turns and append it to the collection.
    ///
    /// Every new line starts as an unrecorded partner line; the title is
    /// derived from the first line of the pasted input.
    pub fn create_from_turns(&mut self, raw_text: &str, turns: Vec<Turn>) -> Result<SceneId> {
        let lines: Vec<Line> = turns
            .into_iter()
            .map(|turn| Line::new(turn.character, turn.text))
            .collect();
        let scene = Scene::new(raw_text, lines);
        let id = scene.id;
        let line_count = scene.lines.len();

        self.scenes.push(scene);
        self.save()?;

        info!("Created scene {} ({} lines)", id, line_count);
        Ok(id)
    }

    /// Replace the stored scene with the same id.
    ///
    /// Ids are assigned only by this store, so a missing id means a caller
    /// bug rather than a recoverable runtime condition.
    pub fn update(&mut self, scene: Scene) -> Result<()> {
        match self.scenes.iter_mut().find(|s| s.id == scene.id) {
            Some(slot) => {
                *slot = scene;
                self.save()
            }
            None => Err(CuelineError::UnknownSceneError(scene.id.to_string())),
        }
    }

    /// Remove a scene. Confirmation is the caller's responsibility; this is
    /// irreversible.
    pub fn delete(&mut self, id: SceneId) -> Result<()> {
        let before = self.scenes.len();
        self.scenes.retain(|s| s.id != id);
        if self.scenes.len() == before {
            return Err(CuelineError::UnknownSceneError(id.to_string()));
        }
        self.save()?;
        info!("Deleted scene {}", id);
        Ok(())
    }

    /// Write the full collection as a JSON snapshot
    fn save(&self) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }
        let raw = serde_json::to_string_pretty(&self.scenes)
            .map_err(|e| CuelineError::StorageError(format!("Failed to serialize scenes: {}", e)))?;
        fs::write(&self.path, raw)?;
        Ok(())
    }

    /// The snapshot path this store writes to
    pub fn path(&self) -> &Path {
        &self.path
    }
}
