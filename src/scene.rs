//! YAML scene files
//!
//! A scene is a snapshot of one location plus the player's input, used by
//! the command-line tool, the integration tests and the benches.
//!
//! ```yaml
//! bounds: { width: 20, height: 12 }
//! buildings:
//!   - { kind: Junimo Hut, tile: { x: 2, y: 2 }, width: 2, height: 2 }
//! items:
//!   - { name: Sprinkler, tile: { x: 10, y: 5 } }
//! ticking_bombs: []
//! coverage:
//!   - tile: { x: 15, y: 5 }
//!     rows: [".#.", "#.#", ".#."]
//! input:
//!   pressed: [R]
//!   held_item: Quality Sprinkler
//!   cursor: { x: 12, y: 8 }
//! ```

use std::collections::HashSet;
use std::fmt;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::activation::ActivationState;
use crate::keymap::{parse_key_code, KeyCode, KeymapError};
use crate::shape::{Mask, ShapeError};
use crate::world::{Building, GridBounds, PlacedItem, TilePos, WorldQuery};

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Scene {
    pub bounds: Option<GridBounds>,
    pub buildings: Vec<Building>,
    pub items: Vec<PlacedItem>,
    pub ticking_bombs: Vec<PlacedItem>,
    /// Object-supplied sprinkler coverage, keyed by tile
    pub coverage: Vec<CoverageEntry>,
    pub input: SceneInput,
}

/// Hand-drawn coverage for the object at `tile`; `#` marks a covered cell
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CoverageEntry {
    pub tile: TilePos,
    pub rows: Vec<String>,
}

impl CoverageEntry {
    pub fn mask(&self) -> Result<Mask, ShapeError> {
        let rows: Vec<Vec<bool>> = self
            .rows
            .iter()
            .map(|row| row.chars().map(|c| c == '#').collect())
            .collect();
        Mask::from_rows(&rows)
    }
}

/// Player input at the time of the snapshot
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct SceneInput {
    /// Held buttons, by name ("R", "LeftShift", ...)
    pub pressed: Vec<String>,
    pub held_item: Option<String>,
    pub cursor: Option<TilePos>,
    pub action_tile: Option<TilePos>,
    pub mouse_hidden: bool,
    pub player_moving: bool,
}

impl SceneInput {
    pub fn pressed_keys(&self) -> Result<HashSet<KeyCode>, KeymapError> {
        self.pressed.iter().map(|name| parse_key_code(name)).collect()
    }

    /// Fill the non-hotkey parts of `state` from this snapshot
    pub fn apply(&self, mut state: ActivationState) -> ActivationState {
        state.held_item = self.held_item.clone();
        state.cursor_tile = self.cursor;
        state.action_tile = self.action_tile;
        state.mouse_hidden = self.mouse_hidden;
        state.player_moving = self.player_moving;
        state
    }
}

impl Scene {
    /// Parse and validate a scene
    pub fn from_yaml(yaml: &str) -> Result<Self, SceneError> {
        let scene: Scene = serde_yaml::from_str(yaml).map_err(|e| SceneError::Parse(e.to_string()))?;
        scene.validate()?;
        Ok(scene)
    }

    pub fn load(path: &Path) -> Result<Self, SceneError> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| SceneError::Io(format!("{}: {}", path.display(), e)))?;
        let scene = Self::from_yaml(&content)?;
        tracing::info!(
            "Loaded scene {} ({} buildings, {} items, {} ticking bombs)",
            path.display(),
            scene.buildings.len(),
            scene.items.len(),
            scene.ticking_bombs.len()
        );
        Ok(scene)
    }

    fn validate(&self) -> Result<(), SceneError> {
        self.input.pressed_keys()?;
        for entry in &self.coverage {
            entry.mask()?;
        }
        Ok(())
    }
}

impl WorldQuery for Scene {
    fn bounds(&self) -> Option<GridBounds> {
        self.bounds
    }

    fn buildings(&self) -> Vec<Building> {
        self.buildings.clone()
    }

    fn placed_items(&self) -> Vec<PlacedItem> {
        self.items.clone()
    }

    fn ticking_bombs(&self) -> Vec<PlacedItem> {
        self.ticking_bombs.clone()
    }

    fn sprinkler_coverage(&self, item: &PlacedItem) -> Option<Mask> {
        self.coverage
            .iter()
            .find(|entry| entry.tile == item.tile)
            .and_then(|entry| entry.mask().ok())
    }
}

/// Errors that can occur when loading a scene
#[derive(Debug, Clone)]
pub enum SceneError {
    Io(String),
    Parse(String),
    InvalidKey(KeymapError),
    Coverage(ShapeError),
}

impl fmt::Display for SceneError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SceneError::Io(e) => write!(f, "IO error: {}", e),
            SceneError::Parse(e) => write!(f, "Parse error: {}", e),
            SceneError::InvalidKey(e) => write!(f, "{}", e),
            SceneError::Coverage(e) => write!(f, "Bad coverage: {}", e),
        }
    }
}

impl std::error::Error for SceneError {}

impl From<KeymapError> for SceneError {
    fn from(e: KeymapError) -> Self {
        SceneError::InvalidKey(e)
    }
}

impl From<ShapeError> for SceneError {
    fn from(e: ShapeError) -> Self {
        SceneError::Coverage(e)
    }
}
