//! Controller tuning, loaded from `assets/controller.ron` under the asset root.
//!
//! A missing, unreadable or invalid file never stops the game: it is logged as a
//! warning and the built-in defaults are used instead.

use std::path::{Path, PathBuf};

use bevy::prelude::*;
use controller::{ControllerSettings, SettingsError};

/// Relative to the asset root.
const CONFIG_PATH: &str = "assets/controller.ron";

#[derive(Resource, Clone, Debug, Default, PartialEq)]
pub struct ControllerConfig(pub ControllerSettings);

#[derive(Debug)]
pub enum ConfigError {
    Read(std::io::Error),
    Parse(ron::error::SpannedError),
    Invalid(SettingsError),
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Read(e) => write!(f, "failed to read: {e}"),
            Self::Parse(e) => write!(f, "failed to parse: {e}"),
            Self::Invalid(e) => write!(f, "invalid settings: {e}"),
        }
    }
}

impl std::error::Error for ConfigError {}

pub(super) fn plugin(app: &mut App) {
    app.insert_resource(ControllerConfig::load_or_default());
}

impl ControllerConfig {
    /// `assets/controller.ron` under the same root Bevy's file asset reader uses.
    pub fn file_path() -> PathBuf {
        asset_root(
            std::env::var_os("BEVY_ASSET_ROOT").map(PathBuf::from),
            std::env::var_os("CARGO_MANIFEST_DIR").map(PathBuf::from),
        )
        .join(CONFIG_PATH)
    }

    /// Load from file, or fall back to defaults if it is missing or bad.
    pub fn load_or_default() -> Self {
        let path = Self::file_path();
        if !path.exists() {
            warn!("{} not found, using default controller settings", path.display());
            return Self::default();
        }

        match Self::load(&path) {
            Ok(config) => {
                info!("loaded controller settings from {}", path.display());
                config
            }
            Err(e) => {
                warn!("{}: {e}, using defaults", path.display());
                Self::default()
            }
        }
    }

    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path).map_err(ConfigError::Read)?;
        Self::parse(&contents)
    }

    pub fn parse(contents: &str) -> Result<Self, ConfigError> {
        let settings: ControllerSettings = ron::from_str(contents).map_err(ConfigError::Parse)?;
        settings.validate().map_err(ConfigError::Invalid)?;
        Ok(Self(settings))
    }
}

/// `BEVY_ASSET_ROOT`, else the package directory under `cargo run`, else the
/// directory of the executable.
fn asset_root(bevy_root: Option<PathBuf>, manifest_dir: Option<PathBuf>) -> PathBuf {
    bevy_root.or(manifest_dir).unwrap_or_else(|| {
        std::env::current_exe()
            .ok()
            .and_then(|exe| exe.parent().map(Path::to_path_buf))
            .unwrap_or_default()
    })
}
