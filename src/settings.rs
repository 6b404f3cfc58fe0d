//! Runtime configuration: volume, scale, and effect mixes.
//!
//! Loaded once from an optional TOML file and adjustable live from the UI.
//! There is no formal schema beyond this struct; unknown scale names are
//! the only thing that can actually be *wrong*, and they are rejected
//! rather than guessed at.

use std::fmt;
use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::theory::Scale;

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Master volume, 0-1.
    pub volume: f32,
    /// Scale name from the registry ("major", "pentatonic", ...).
    pub scale: String,
    /// Reverb wet mix, 0-1.
    pub reverb: f32,
    /// Delay wet mix, 0-1.
    pub delay: f32,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            volume: 0.7,
            scale: Scale::Major.name().to_string(),
            reverb: 0.25,
            delay: 0.2,
        }
    }
}

impl Settings {
    /// Load settings from a TOML file.
    pub fn load(path: &Path) -> Result<Settings, SettingsError> {
        let text = fs::read_to_string(path).map_err(SettingsError::Io)?;
        let settings: Settings = toml::from_str(&text).map_err(SettingsError::Parse)?;
        settings.validate()?;
        Ok(settings)
    }

    /// Check the scale name against the registry.
    pub fn validate(&self) -> Result<(), SettingsError> {
        if Scale::from_name(&self.scale).is_none() {
            return Err(SettingsError::UnknownScale(self.scale.clone()));
        }
        Ok(())
    }

    /// Copy with volume and effect mixes clamped into 0-1.
    pub fn clamped(&self) -> Settings {
        Settings {
            volume: self.volume.clamp(0.0, 1.0),
            scale: self.scale.clone(),
            reverb: self.reverb.clamp(0.0, 1.0),
            delay: self.delay.clamp(0.0, 1.0),
        }
    }
}

#[derive(Debug)]
pub enum SettingsError {
    /// The requested scale is not in the registry.
    UnknownScale(String),
    Io(std::io::Error),
    Parse(toml::de::Error),
}

impl fmt::Display for SettingsError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SettingsError::UnknownScale(name) => {
                write!(f, "unknown scale {name:?} (expected one of: ")?;
                for (i, scale) in Scale::ALL.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{}", scale.name())?;
                }
                write!(f, ")")
            }
            SettingsError::Io(err) => write!(f, "failed to read settings: {err}"),
            SettingsError::Parse(err) => write!(f, "failed to parse settings: {err}"),
        }
    }
}

impl std::error::Error for SettingsError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            SettingsError::UnknownScale(_) => None,
            SettingsError::Io(err) => Some(err),
            SettingsError::Parse(err) => Some(err),
        }
    }
}
