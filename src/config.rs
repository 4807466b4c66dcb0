//! Loading tuning values from RON files under `assets/settings/`.
use bevy::prelude::*;
use serde::de::DeserializeOwned;
use std::fs::read_to_string;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Errors raised while loading or validating settings. These only happen at startup;
/// the simulation itself never fails.
#[derive(Debug, Error)]
pub enum SettingsError {
    #[error("could not read {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("could not parse {}: {source}", .path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: ron::error::SpannedError,
    },
    #[error("invalid setting `{field}`: {reason}")]
    Invalid {
        field: &'static str,
        reason: &'static str,
    },
}

/// Settings that can check themselves once after loading.
pub trait Validate {
    fn validate(&self) -> Result<(), SettingsError>;
}

/// Reads and validates `T` from a RON file.
pub fn load_ron<T: DeserializeOwned + Validate>(path: impl AsRef<Path>) -> Result<T, SettingsError> {
    let path = path.as_ref();
    let text = read_to_string(path).map_err(|source| SettingsError::Io {
        path: path.to_owned(),
        source,
    })?;
    let settings = parse_ron::<T>(&text).map_err(|source| SettingsError::Parse {
        path: path.to_owned(),
        source,
    })?;
    settings.validate()?;
    Ok(settings)
}

fn parse_ron<T: DeserializeOwned>(text: &str) -> Result<T, ron::error::SpannedError> {
    ron::de::from_str::<T>(text)
}

/// Like [`load_ron`], but logs the failure and falls back to the defaults.
pub fn load_ron_or_default<T: DeserializeOwned + Validate + Default>(path: impl AsRef<Path>) -> T {
    let path = path.as_ref();
    info!("loading settings from {}", path.display());
    load_ron(path)
        .map_err(|e| warn!("{e}, using defaults"))
        .unwrap_or_default()
}
