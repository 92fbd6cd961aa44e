//! Game settings and key bindings
//!
//! Persisted in LocalStorage on the web; native builds use the defaults.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::consts::*;
use crate::sim::Key;
use crate::{grid_bottom_edge, grid_right_edge};

/// Reasons a settings document is rejected
#[derive(Debug, Error)]
pub enum SettingsError {
    #[error("settings are not valid JSON: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("brick grid must have at least one column and one row (got {columns}x{rows})")]
    EmptyGrid { columns: usize, rows: usize },
    #[error("{columns} brick columns end at x={right_edge}, past the right edge of the field")]
    GridTooWide { columns: usize, right_edge: f32 },
    #[error("{rows} brick rows end at y={bottom_edge}, overlapping the serve position")]
    GridTooTall { rows: usize, bottom_edge: f32 },
    #[error("starting lives must be at least 1")]
    NoLives,
    #[error("no key is bound to {0:?}")]
    UnboundKey(Key),
    #[error("key {key:?} is bound to both {first:?} and {second:?}")]
    ConflictingBinding { key: String, first: Key, second: Key },
}

/// Key identifiers (as reported by the browser's `KeyboardEvent.key`)
/// mapped to game keys
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct KeyBindings {
    pub move_left: Vec<String>,
    pub move_right: Vec<String>,
    pub toggle_pause: Vec<String>,
}

impl Default for KeyBindings {
    fn default() -> Self {
        Self {
            move_left: vec!["ArrowLeft".into(), "Left".into()],
            move_right: vec!["ArrowRight".into(), "Right".into()],
            toggle_pause: vec![" ".into(), "Spacebar".into()],
        }
    }
}

impl KeyBindings {
    /// Map a raw key identifier to a game key
    pub fn resolve(&self, key: &str) -> Option<Key> {
        self.groups()
            .into_iter()
            .find(|(_, names)| names.iter().any(|n| n == key))
            .map(|(k, _)| k)
    }

    fn groups(&self) -> [(Key, &[String]); 3] {
        [
            (Key::Left, self.move_left.as_slice()),
            (Key::Right, self.move_right.as_slice()),
            (Key::Pause, self.toggle_pause.as_slice()),
        ]
    }

    fn validate(&self) -> Result<(), SettingsError> {
        let groups = self.groups();
        for (key, names) in &groups {
            if names.is_empty() {
                return Err(SettingsError::UnboundKey(*key));
            }
        }
        for (i, (first, names)) in groups.iter().enumerate() {
            for (second, others) in &groups[i + 1..] {
                if let Some(name) = names.iter().find(|n| others.contains(*n)) {
                    return Err(SettingsError::ConflictingBinding {
                        key: name.clone(),
                        first: *first,
                        second: *second,
                    });
                }
            }
        }
        Ok(())
    }
}

/// Game settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Brick grid columns
    pub columns: usize,
    /// Brick grid rows
    pub rows: usize,
    /// Lives at the start of a session
    pub starting_lives: u32,
    pub keys: KeyBindings,
    /// Default log filter (`error`, `warn`, `info`, `debug`, `trace`)
    pub log_level: String,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            columns: BRICK_COLUMNS,
            rows: BRICK_ROWS,
            starting_lives: STARTING_LIVES,
            keys: KeyBindings::default(),
            log_level: "info".into(),
        }
    }
}

impl Settings {
    /// LocalStorage key
    #[allow(dead_code)]
    const STORAGE_KEY: &'static str = "brick_breaker_settings";

    /// Parse and validate a JSON settings document
    pub fn from_json(json: &str) -> Result<Self, SettingsError> {
        let settings: Self = serde_json::from_str(json)?;
        settings.validate()?;
        Ok(settings)
    }

    pub fn to_json(&self) -> Result<String, SettingsError> {
        Ok(serde_json::to_string(self)?)
    }

    /// Check the grid fits the field and every game key is bound once
    pub fn validate(&self) -> Result<(), SettingsError> {
        if self.columns == 0 || self.rows == 0 {
            return Err(SettingsError::EmptyGrid {
                columns: self.columns,
                rows: self.rows,
            });
        }
        let right_edge = grid_right_edge(self.columns);
        if right_edge > FIELD_WIDTH {
            return Err(SettingsError::GridTooWide {
                columns: self.columns,
                right_edge,
            });
        }
        let bottom_edge = grid_bottom_edge(self.rows);
        if bottom_edge >= FIELD_HEIGHT - BALL_SERVE_OFFSET - BALL_RADIUS {
            return Err(SettingsError::GridTooTall {
                rows: self.rows,
                bottom_edge,
            });
        }
        if self.starting_lives == 0 {
            return Err(SettingsError::NoLives);
        }
        self.keys.validate()
    }

    /// Total bricks in a full grid
    pub fn brick_count(&self) -> usize {
        self.columns * self.rows
    }

    /// Parse the configured log level, falling back to `Info`
    pub fn log_level(&self) -> log::LevelFilter {
        self.log_level.parse().unwrap_or(log::LevelFilter::Info)
    }

    /// Load settings from LocalStorage (WASM only)
    #[cfg(target_arch = "wasm32")]
    pub fn load() -> Self {
        let storage = web_sys::window()
            .and_then(|w| w.local_storage().ok())
            .flatten();

        if let Some(storage) = storage {
            if let Ok(Some(json)) = storage.get_item(Self::STORAGE_KEY) {
                match Self::from_json(&json) {
                    Ok(settings) => {
                        log::info!("Loaded settings from LocalStorage");
                        return settings;
                    }
                    Err(e) => log::warn!("Ignoring stored settings: {e}"),
                }
            }
        }

        log::info!("Using default settings");
        Self::default()
    }

    /// Save settings to LocalStorage (WASM only)
    #[cfg(target_arch = "wasm32")]
    pub fn save(&self) {
        let storage = web_sys::window()
            .and_then(|w| w.local_storage().ok())
            .flatten();

        if let Some(storage) = storage {
            match self.to_json() {
                Ok(json) => {
                    let _ = storage.set_item(Self::STORAGE_KEY, &json);
                    log::info!("Settings saved");
                }
                Err(e) => log::warn!("Could not save settings: {e}"),
            }
        }
    }

    /// Native stubs
    #[cfg(not(target_arch = "wasm32"))]
    pub fn load() -> Self {
        Self::default()
    }

    #[cfg(not(target_arch = "wasm32"))]
    pub fn save(&self) {
        // No-op for native
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_are_valid() {
        let settings = Settings::default();
        assert!(settings.validate().is_ok());
        assert_eq!(settings.brick_count(), 45);
        assert_eq!(settings.log_level(), log::LevelFilter::Info);
    }

    #[test]
    fn test_partial_json_fills_defaults() {
        let settings = Settings::from_json(r#"{ "rows": 3, "starting_lives": 2 }"#).unwrap();
        assert_eq!(settings.rows, 3);
        assert_eq!(settings.starting_lives, 2);
        assert_eq!(settings.columns, BRICK_COLUMNS);
        assert_eq!(settings.keys, KeyBindings::default());
    }

    #[test]
    fn test_json_round_trip() {
        let mut settings = Settings::default();
        settings.keys.toggle_pause = vec!["p".into()];
        settings.log_level = "debug".into();
        let json = settings.to_json().unwrap();
        assert_eq!(Settings::from_json(&json).unwrap(), settings);
    }

    #[test]
    fn test_rejects_bad_json() {
        assert!(matches!(
            Settings::from_json("{ columns: "),
            Err(SettingsError::Parse(_))
        ));
    }

    #[test]
    fn test_rejects_invalid_grids() {
        let empty = Settings {
            columns: 0,
            ..Default::default()
        };
        assert!(matches!(
            empty.validate(),
            Err(SettingsError::EmptyGrid { .. })
        ));

        // 10 columns end at x=870
        let wide = Settings {
            columns: 10,
            ..Default::default()
        };
        assert!(matches!(
            wide.validate(),
            Err(SettingsError::GridTooWide { columns: 10, .. })
        ));

        let tall = Settings {
            rows: 17,
            ..Default::default()
        };
        assert!(matches!(
            tall.validate(),
            Err(SettingsError::GridTooTall { rows: 17, .. })
        ));

        let no_lives = Settings {
            starting_lives: 0,
            ..Default::default()
        };
        assert!(matches!(no_lives.validate(), Err(SettingsError::NoLives)));
    }

    #[test]
    fn test_rejects_bad_bindings() {
        let mut settings = Settings::default();
        settings.keys.move_left.clear();
        assert!(matches!(
            settings.validate(),
            Err(SettingsError::UnboundKey(Key::Left))
        ));

        let mut settings = Settings::default();
        settings.keys.toggle_pause.push("ArrowRight".into());
        match settings.validate() {
            Err(SettingsError::ConflictingBinding { key, first, second }) => {
                assert_eq!(key, "ArrowRight");
                assert_eq!(first, Key::Right);
                assert_eq!(second, Key::Pause);
            }
            other => panic!("expected conflict, got {other:?}"),
        }
    }

    #[test]
    fn test_resolve_keys() {
        let keys = KeyBindings::default();
        assert_eq!(keys.resolve("ArrowLeft"), Some(Key::Left));
        assert_eq!(keys.resolve("Left"), Some(Key::Left));
        assert_eq!(keys.resolve("Right"), Some(Key::Right));
        assert_eq!(keys.resolve(" "), Some(Key::Pause));
        assert_eq!(keys.resolve("Spacebar"), Some(Key::Pause));
        assert_eq!(keys.resolve("Enter"), None);
    }
}
