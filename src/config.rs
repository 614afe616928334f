//! Highlight configuration
//!
//! Configuration is read from YAML. Every field is optional in the file;
//! missing values take the defaults below. Raw file data (`ConfigData`)
//! is resolved into a [`HighlightConfig`] with clamped and defaulted values.

use std::fmt;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::category::Category;
use crate::color::Color;
use crate::keymap::{KeyCode, KeybindList};

pub const MIN_REFRESH_INTERVAL: u32 = 1;
pub const MAX_REFRESH_INTERVAL: u32 = 60;
/// Roughly once every 0.1s at 60 ticks per second
pub const DEFAULT_REFRESH_INTERVAL: u32 = 6;

/// Where a held item's range is shown besides the mouse cursor
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum ActionLocationStyle {
    /// Only at the cursor
    Never,
    /// At the tile in front of the player while the mouse is hidden
    WhenMouseHidden,
    /// Always at the tile in front of the player as well
    #[default]
    Always,
}

impl ActionLocationStyle {
    pub fn as_str(&self) -> &'static str {
        match self {
            ActionLocationStyle::Never => "never",
            ActionLocationStyle::WhenMouseHidden => "when_mouse_hidden",
            ActionLocationStyle::Always => "always",
        }
    }
}

impl From<String> for ActionLocationStyle {
    fn from(value: String) -> Self {
        match normalize_option(&value).as_str() {
            "never" => ActionLocationStyle::Never,
            "whenmousehidden" => ActionLocationStyle::WhenMouseHidden,
            "always" => ActionLocationStyle::Always,
            _ => {
                let fallback = ActionLocationStyle::default();
                tracing::warn!(
                    "Unknown action location style '{}', using '{}'",
                    value,
                    fallback.as_str()
                );
                fallback
            }
        }
    }
}

impl From<ActionLocationStyle> for String {
    fn from(style: ActionLocationStyle) -> Self {
        style.as_str().to_string()
    }
}

/// How sprinkler coverage is determined
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum SprinklerModCompatibility {
    /// Use the built-in table of sprinkler shapes
    Faster,
    /// Ask the world for object-supplied coverage first
    #[default]
    MoreCompatible,
}

impl SprinklerModCompatibility {
    pub fn as_str(&self) -> &'static str {
        match self {
            SprinklerModCompatibility::Faster => "faster",
            SprinklerModCompatibility::MoreCompatible => "more_compatible",
        }
    }
}

impl From<String> for SprinklerModCompatibility {
    fn from(value: String) -> Self {
        match normalize_option(&value).as_str() {
            "faster" => SprinklerModCompatibility::Faster,
            "morecompatible" => SprinklerModCompatibility::MoreCompatible,
            _ => {
                let fallback = SprinklerModCompatibility::default();
                tracing::warn!(
                    "Unknown sprinkler compatibility option '{}', using '{}'",
                    value,
                    fallback.as_str()
                );
                fallback
            }
        }
    }
}

impl From<SprinklerModCompatibility> for String {
    fn from(option: SprinklerModCompatibility) -> Self {
        option.as_str().to_string()
    }
}

/// Lowercase and strip separators so "WhenMouseHidden" == "when_mouse_hidden"
fn normalize_option(value: &str) -> String {
    value
        .chars()
        .filter(|c| !matches!(c, '_' | '-' | ' '))
        .map(|c| c.to_ascii_lowercase())
        .collect()
}

/// Settings shared by the built-in categories
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CategoryConfig {
    pub enabled: bool,
    pub hotkey: KeybindList,
    pub tint: Color,
    /// Show placed instances while holding one. Ignored for buildings.
    pub show_others_when_holding: bool,
    /// Overrides the global `highlight_action_location`
    #[serde(skip_serializing_if = "Option::is_none")]
    pub action_location: Option<ActionLocationStyle>,
}

impl CategoryConfig {
    fn new(hotkey: KeybindList, tint: Color, show_others_when_holding: bool) -> Self {
        Self {
            enabled: true,
            hotkey,
            tint,
            show_others_when_holding,
            action_location: None,
        }
    }

    fn merged(mut self, raw: Option<CategoryData>) -> Self {
        let Some(raw) = raw else {
            return self;
        };
        if let Some(v) = raw.enabled {
            self.enabled = v;
        }
        if let Some(v) = raw.hotkey {
            self.hotkey = v;
        }
        if let Some(v) = raw.tint {
            self.tint = v;
        }
        if let Some(v) = raw.show_others_when_holding {
            self.show_others_when_holding = v;
        }
        if raw.action_location.is_some() {
            self.action_location = raw.action_location;
        }
        self
    }
}

/// Bomb-specific settings
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BombConfig {
    pub enabled: bool,
    pub tint: Color,
    pub show_held: bool,
    pub show_placed: bool,
    pub hide_held_when_placed_ticking: bool,
    pub show_inner: bool,
    pub inner_tint: Color,
    pub show_outer: bool,
    pub outer_tint: Color,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub action_location: Option<ActionLocationStyle>,
}

impl Default for BombConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            tint: Color::from_f32(1.0, 0.5, 0.5, 0.6),
            show_held: true,
            show_placed: true,
            hide_held_when_placed_ticking: true,
            show_inner: false,
            inner_tint: Color::from_f32(8.0, 0.7, 0.5, 0.1),
            show_outer: true,
            outer_tint: Color::from_f32(9.0, 0.7, 0.5, 0.8),
            action_location: None,
        }
    }
}

impl BombConfig {
    fn merged(mut self, raw: Option<BombData>) -> Self {
        let Some(raw) = raw else {
            return self;
        };
        self.enabled = raw.enabled.unwrap_or(self.enabled);
        self.tint = raw.tint.unwrap_or(self.tint);
        self.show_held = raw.show_held.unwrap_or(self.show_held);
        self.show_placed = raw.show_placed.unwrap_or(self.show_placed);
        self.hide_held_when_placed_ticking = raw
            .hide_held_when_placed_ticking
            .unwrap_or(self.hide_held_when_placed_ticking);
        self.show_inner = raw.show_inner.unwrap_or(self.show_inner);
        self.inner_tint = raw.inner_tint.unwrap_or(self.inner_tint);
        self.show_outer = raw.show_outer.unwrap_or(self.show_outer);
        self.outer_tint = raw.outer_tint.unwrap_or(self.outer_tint);
        if raw.action_location.is_some() {
            self.action_location = raw.action_location;
        }
        self
    }
}

/// Resolved highlight configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(from = "ConfigData")]
pub struct HighlightConfig {
    refresh_interval: u32,
    pub show_overlaps: bool,
    /// Drawn where two or more ranges cover the same tile
    pub overlap_tint: Color,
    /// Hotkeys flip a category on and off instead of acting while held
    pub hotkeys_toggle: bool,
    pub show_all_key: KeybindList,
    pub highlight_buildings_on_mouseover: bool,
    pub highlight_action_location: ActionLocationStyle,
    pub hide_at_mouse_on_movement: bool,
    pub sprinkler_mod_compatibility: SprinklerModCompatibility,
    pub junimo: CategoryConfig,
    pub sprinkler: CategoryConfig,
    pub scarecrow: CategoryConfig,
    pub beehouse: CategoryConfig,
    pub mushroom_log: CategoryConfig,
    pub bomb: BombConfig,
}

impl Default for HighlightConfig {
    fn default() -> Self {
        Self {
            refresh_interval: DEFAULT_REFRESH_INTERVAL,
            show_overlaps: true,
            overlap_tint: Color::rgba(255, 64, 64, 178),
            hotkeys_toggle: false,
            show_all_key: KeybindList::single(KeyCode::LeftShift),
            highlight_buildings_on_mouseover: true,
            highlight_action_location: ActionLocationStyle::Always,
            hide_at_mouse_on_movement: true,
            sprinkler_mod_compatibility: SprinklerModCompatibility::MoreCompatible,
            junimo: CategoryConfig::new(
                KeybindList::single(KeyCode::char('j')),
                Color::WHITE.scaled(0.7),
                false,
            ),
            sprinkler: CategoryConfig::new(
                KeybindList::single(KeyCode::char('r')),
                Color::from_f32(0.6, 0.6, 0.9, 0.7),
                true,
            ),
            scarecrow: CategoryConfig::new(
                KeybindList::single(KeyCode::char('o')),
                Color::from_f32(0.6, 1.0, 0.6, 0.7),
                true,
            ),
            beehouse: CategoryConfig::new(
                KeybindList::single(KeyCode::char('h')),
                Color::from_f32(1.0, 1.0, 0.6, 0.7),
                false,
            ),
            mushroom_log: CategoryConfig::new(
                KeybindList::none(),
                Color::rgba(32, 93, 150, 178),
                false,
            ),
            bomb: BombConfig::default(),
        }
    }
}

impl HighlightConfig {
    /// Parse config from a YAML string; missing fields take defaults
    pub fn from_yaml(yaml: &str) -> Result<Self, ConfigError> {
        if yaml.trim().is_empty() {
            return Ok(Self::default());
        }
        serde_yaml::from_str(yaml).map_err(|e| ConfigError::Parse(e.to_string()))
    }

    /// Serialize to YAML
    pub fn to_yaml(&self) -> Result<String, ConfigError> {
        serde_yaml::to_string(self).map_err(|e| ConfigError::Parse(e.to_string()))
    }

    /// Load config from a file, or return defaults if it is missing or invalid
    pub fn load(path: &Path) -> Self {
        if !path.exists() {
            tracing::debug!(
                "Config file not found at {}, using defaults",
                path.display()
            );
            return Self::default();
        }

        match std::fs::read_to_string(path) {
            Ok(content) => match Self::from_yaml(&content) {
                Ok(config) => {
                    tracing::info!("Loaded config from {}", path.display());
                    config
                }
                Err(e) => {
                    tracing::warn!("Failed to parse config at {}: {}", path.display(), e);
                    Self::default()
                }
            },
            Err(e) => {
                tracing::warn!("Failed to read config at {}: {}", path.display(), e);
                Self::default()
            }
        }
    }

    /// Ticks between refreshes, always within `1..=60`
    pub fn refresh_interval(&self) -> u32 {
        self.refresh_interval
            .clamp(MIN_REFRESH_INTERVAL, MAX_REFRESH_INTERVAL)
    }

    pub fn set_refresh_interval(&mut self, ticks: u32) {
        self.refresh_interval = ticks.clamp(MIN_REFRESH_INTERVAL, MAX_REFRESH_INTERVAL);
    }

    /// Settings for a built-in, non-bomb category
    pub fn category(&self, category: &Category) -> Option<&CategoryConfig> {
        match category {
            Category::Junimo => Some(&self.junimo),
            Category::Sprinkler => Some(&self.sprinkler),
            Category::Scarecrow => Some(&self.scarecrow),
            Category::Beehouse => Some(&self.beehouse),
            Category::MushroomLog => Some(&self.mushroom_log),
            Category::Bomb | Category::External(_) => None,
        }
    }

    /// External categories are always enabled
    pub fn is_enabled(&self, category: &Category) -> bool {
        match category {
            Category::Bomb => self.bomb.enabled,
            Category::External(_) => true,
            other => self.category(other).map_or(true, |c| c.enabled),
        }
    }

    pub fn tint(&self, category: &Category) -> Option<Color> {
        match category {
            Category::Bomb => Some(self.bomb.tint),
            other => self.category(other).map(|c| c.tint),
        }
    }

    /// External categories always show other placed instances
    pub fn show_others_when_holding(&self, category: &Category) -> bool {
        self.category(category)
            .map_or(true, |c| c.show_others_when_holding)
    }

    pub fn action_location(&self, category: &Category) -> ActionLocationStyle {
        let overridden = match category {
            Category::Bomb => self.bomb.action_location,
            other => self.category(other).and_then(|c| c.action_location),
        };
        overridden.unwrap_or(self.highlight_action_location)
    }
}

/// Raw config data as parsed from YAML
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
struct ConfigData {
    refresh_interval: Option<i64>,
    show_overlaps: Option<bool>,
    overlap_tint: Option<Color>,
    hotkeys_toggle: Option<bool>,
    show_all_key: Option<KeybindList>,
    highlight_buildings_on_mouseover: Option<bool>,
    highlight_action_location: Option<ActionLocationStyle>,
    hide_at_mouse_on_movement: Option<bool>,
    sprinkler_mod_compatibility: Option<SprinklerModCompatibility>,
    junimo: Option<CategoryData>,
    sprinkler: Option<CategoryData>,
    scarecrow: Option<CategoryData>,
    beehouse: Option<CategoryData>,
    mushroom_log: Option<CategoryData>,
    bomb: Option<BombData>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
struct CategoryData {
    enabled: Option<bool>,
    hotkey: Option<KeybindList>,
    tint: Option<Color>,
    show_others_when_holding: Option<bool>,
    action_location: Option<ActionLocationStyle>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
struct BombData {
    enabled: Option<bool>,
    tint: Option<Color>,
    show_held: Option<bool>,
    show_placed: Option<bool>,
    hide_held_when_placed_ticking: Option<bool>,
    show_inner: Option<bool>,
    inner_tint: Option<Color>,
    show_outer: Option<bool>,
    outer_tint: Option<Color>,
    action_location: Option<ActionLocationStyle>,
}

impl From<ConfigData> for HighlightConfig {
    fn from(raw: ConfigData) -> Self {
        let d = HighlightConfig::default();
        let refresh_interval = match raw.refresh_interval {
            Some(ticks) => {
                let clamped = ticks.clamp(MIN_REFRESH_INTERVAL as i64, MAX_REFRESH_INTERVAL as i64);
                if clamped != ticks {
                    tracing::warn!(
                        "refresh_interval {} out of range, clamped to {}",
                        ticks,
                        clamped
                    );
                }
                clamped as u32
            }
            None => d.refresh_interval,
        };

        Self {
            refresh_interval,
            show_overlaps: raw.show_overlaps.unwrap_or(d.show_overlaps),
            overlap_tint: raw.overlap_tint.unwrap_or(d.overlap_tint),
            hotkeys_toggle: raw.hotkeys_toggle.unwrap_or(d.hotkeys_toggle),
            show_all_key: raw.show_all_key.unwrap_or(d.show_all_key),
            highlight_buildings_on_mouseover: raw
                .highlight_buildings_on_mouseover
                .unwrap_or(d.highlight_buildings_on_mouseover),
            highlight_action_location: raw
                .highlight_action_location
                .unwrap_or(d.highlight_action_location),
            hide_at_mouse_on_movement: raw
                .hide_at_mouse_on_movement
                .unwrap_or(d.hide_at_mouse_on_movement),
            sprinkler_mod_compatibility: raw
                .sprinkler_mod_compatibility
                .unwrap_or(d.sprinkler_mod_compatibility),
            junimo: d.junimo.merged(raw.junimo),
            sprinkler: d.sprinkler.merged(raw.sprinkler),
            scarecrow: d.scarecrow.merged(raw.scarecrow),
            beehouse: d.beehouse.merged(raw.beehouse),
            mushroom_log: d.mushroom_log.merged(raw.mushroom_log),
            bomb: d.bomb.merged(raw.bomb),
        }
    }
}

/// Errors that can occur when reading configuration
#[derive(Debug, Clone)]
pub enum ConfigError {
    Parse(String),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::Parse(e) => write!(f, "Parse error: {}", e),
        }
    }
}

impl std::error::Error for ConfigError {}
