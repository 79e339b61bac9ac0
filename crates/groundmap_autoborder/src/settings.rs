//! Runtime feature flags that steer bordering

use crate::error::SettingsError;
use groundmap_core::BorderPlacement;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Automagic bordering settings, owned by the editor and read by the engine
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct BorderSettings {
    /// Editing operations re-border touched tiles
    pub use_automagic: bool,
    /// Preserve mode: only borders of the recomputed rule sets are replaced,
    /// new pieces go on top of the stack
    pub same_ground_type_border: bool,
    /// Neighbors holding a wall are ignored when bordering
    pub walls_repel_borders: bool,
    /// Carpets stack instead of replacing each other
    pub layer_carpets: bool,
    /// Erasing ground re-borders the surrounding tiles
    pub borderize_delete: bool,
    /// Use a single configured rule set instead of material rules
    pub custom_border_enabled: bool,
    /// Rule set id for custom border mode, 0 = unset
    pub custom_border_id: u16,
}

impl Default for BorderSettings {
    fn default() -> Self {
        Self {
            use_automagic: true,
            same_ground_type_border: false,
            walls_repel_borders: false,
            layer_carpets: false,
            borderize_delete: false,
            custom_border_enabled: false,
            custom_border_id: 0,
        }
    }
}

impl BorderSettings {
    pub fn new() -> Self {
        Self::default()
    }

    /// Where freshly computed borders are inserted
    pub fn placement(&self) -> BorderPlacement {
        if self.same_ground_type_border {
            BorderPlacement::Top
        } else {
            BorderPlacement::Bottom
        }
    }

    /// Parse settings from TOML; missing keys keep their defaults
    pub fn from_toml_str(content: &str) -> Result<Self, SettingsError> {
        toml::from_str(content).map_err(|e| SettingsError::ParseError(e.to_string()))
    }

    pub fn to_toml_string(&self) -> Result<String, SettingsError> {
        toml::to_string_pretty(self).map_err(|e| SettingsError::ParseError(e.to_string()))
    }

    /// Load settings from a TOML file
    pub fn load(path: &Path) -> Result<Self, SettingsError> {
        let content =
            std::fs::read_to_string(path).map_err(|e| SettingsError::IoError(e.to_string()))?;
        Self::from_toml_str(&content)
    }

    /// Save settings to a TOML file
    pub fn save(&self, path: &Path) -> Result<(), SettingsError> {
        let content = self.to_toml_string()?;
        std::fs::write(path, content).map_err(|e| SettingsError::IoError(e.to_string()))
    }
}
