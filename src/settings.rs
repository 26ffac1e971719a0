//! Game settings and preferences
//!
//! Persisted separately from session history in LocalStorage.

use serde::{Deserialize, Serialize};

use crate::consts::{MAX_TILE_SIZE, MIN_TILE_SIZE, TILE_SIZE};
use crate::platform;
use crate::sim::Direction;

/// Which keys move the player
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum KeyScheme {
    /// Arrow keys and WASD
    #[default]
    Both,
    Arrows,
    Wasd,
}

impl KeyScheme {
    pub fn as_str(&self) -> &'static str {
        match self {
            KeyScheme::Both => "Both",
            KeyScheme::Arrows => "Arrows",
            KeyScheme::Wasd => "WASD",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "both" | "all" => Some(KeyScheme::Both),
            "arrows" | "arrow" => Some(KeyScheme::Arrows),
            "wasd" => Some(KeyScheme::Wasd),
            _ => None,
        }
    }

    /// Direction bound to `key` under this scheme
    pub fn direction_for(&self, key: &str) -> Option<Direction> {
        match self {
            KeyScheme::Both => Direction::from_key(key),
            KeyScheme::Arrows => Direction::from_arrow_key(key),
            KeyScheme::Wasd => Direction::from_letter_key(key),
        }
    }

    /// Hint line shown under the board
    pub fn hint(&self) -> &'static str {
        match self {
            KeyScheme::Both => "Use arrow keys or WASD to move",
            KeyScheme::Arrows => "Use arrow keys to move",
            KeyScheme::Wasd => "Use WASD to move",
        }
    }
}

/// Player preferences
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Movement key bindings
    pub keys: KeyScheme,

    // === Board ===
    /// Tile edge length in CSS pixels
    pub tile_size: u32,
    /// Show the live timer in the HUD
    pub show_timer: bool,

    // === Accessibility ===
    /// High contrast palette
    pub high_contrast: bool,

    // === Level source ===
    /// Adaptive generation endpoint; local generator only when unset
    pub generator_url: Option<String>,
    /// Bearer token sent to the generation endpoint
    pub generator_token: Option<String>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            keys: KeyScheme::Both,
            tile_size: TILE_SIZE,
            show_timer: true,
            high_contrast: false,
            generator_url: None,
            generator_token: None,
        }
    }
}

impl Settings {
    /// Tile size limited to what the board layout supports
    pub fn effective_tile_size(&self) -> u32 {
        self.tile_size.clamp(MIN_TILE_SIZE, MAX_TILE_SIZE)
    }

    pub fn direction_for_key(&self, key: &str) -> Option<Direction> {
        self.keys.direction_for(key)
    }

    /// LocalStorage key
    const STORAGE_KEY: &'static str = "tile_quest_settings";

    /// Load settings from LocalStorage, falling back to defaults
    pub fn load() -> Self {
        if let Some(json) = platform::storage_get(Self::STORAGE_KEY) {
            match serde_json::from_str(&json) {
                Ok(settings) => {
                    log::info!("Loaded settings from LocalStorage");
                    return settings;
                }
                Err(e) => log::warn!("Ignoring stored settings: {}", e),
            }
        }

        log::info!("Using default settings");
        Self::default()
    }

    pub fn save(&self) {
        if let Ok(json) = serde_json::to_string(self) {
            if platform::storage_set(Self::STORAGE_KEY, &json) {
                log::info!("Settings saved");
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_key_scheme_parse() {
        assert_eq!(KeyScheme::from_str("WASD"), Some(KeyScheme::Wasd));
        assert_eq!(KeyScheme::from_str("arrows"), Some(KeyScheme::Arrows));
        assert_eq!(KeyScheme::from_str("Both"), Some(KeyScheme::Both));
        assert_eq!(KeyScheme::from_str("mouse"), None);
        assert_eq!(KeyScheme::from_str(KeyScheme::Wasd.as_str()), Some(KeyScheme::Wasd));
    }

    #[test]
    fn test_key_scheme_filters_bindings() {
        assert_eq!(KeyScheme::Both.direction_for("w"), Some(Direction::Up));
        assert_eq!(KeyScheme::Both.direction_for("ArrowUp"), Some(Direction::Up));
        assert_eq!(KeyScheme::Arrows.direction_for("w"), None);
        assert_eq!(KeyScheme::Arrows.direction_for("ArrowLeft"), Some(Direction::Left));
        assert_eq!(KeyScheme::Wasd.direction_for("ArrowLeft"), None);
        assert_eq!(KeyScheme::Wasd.direction_for("d"), Some(Direction::Right));
    }

    #[test]
    fn test_tile_size_clamped() {
        let mut settings = Settings::default();
        assert_eq!(settings.effective_tile_size(), TILE_SIZE);
        settings.tile_size = 1;
        assert_eq!(settings.effective_tile_size(), MIN_TILE_SIZE);
        settings.tile_size = 10_000;
        assert_eq!(settings.effective_tile_size(), MAX_TILE_SIZE);
    }

    #[test]
    fn test_partial_json_uses_defaults() {
        let settings: Settings = serde_json::from_str(r#"{"keys":"Wasd"}"#).unwrap();
        assert_eq!(settings.keys, KeyScheme::Wasd);
        assert_eq!(settings.tile_size, TILE_SIZE);
        assert!(settings.show_timer);
        assert!(settings.generator_url.is_none());
        assert!(settings.generator_token.is_none());
    }

    #[test]
    fn test_generator_token_round_trip() {
        let settings: Settings = serde_json::from_str(
            r#"{"generator_url":"https://levels.example/generate","generator_token":"abc123"}"#,
        )
        .unwrap();
        assert_eq!(settings.generator_token.as_deref(), Some("abc123"));

        let json = serde_json::to_string(&settings).unwrap();
        let back: Settings = serde_json::from_str(&json).unwrap();
        assert_eq!(back.generator_url, settings.generator_url);
        assert_eq!(back.generator_token.as_deref(), Some("abc123"));
    }

    #[test]
    fn test_load_without_storage_is_default() {
        let settings = Settings::load();
        assert_eq!(settings.keys, KeyScheme::Both);
    }
}
