//! Persisted player preferences.
//!
//! Stored as a flat JSON object of numbers in the platform config directory,
//! e.g. `{ "SOUND": 0 }`.

use bevy::log::{info, warn};
use directories::ProjectDirs;
use std::collections::BTreeMap;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

/// Key of the sound on/off flag.
pub const SOUND_KEY: &str = "SOUND";

/// Music volume on the 0-255 scale when sound is on.
pub const SOUND_ON_VOLUME: u8 = 150;

const SETTINGS_FILE: &str = "settings.json";

#[derive(Debug, thiserror::Error)]
pub enum PreferenceError {
    #[error("could not determine a config directory")]
    NoConfigDir,

    #[error("preference file I/O failed: {0}")]
    Io(#[from] io::Error),

    #[error("preference file is not valid JSON: {0}")]
    Json(#[from] serde_json::Error),
}

/// A key to number store that survives restarts.
pub trait PreferenceStore: Send + Sync {
    fn read_number(&self, key: &str) -> Result<Option<i64>, PreferenceError>;

    fn write_number(&mut self, key: &str, value: i64) -> Result<(), PreferenceError>;
}

/// Store kept in memory only; used when no config directory is available.
#[derive(Debug, Default, Clone)]
pub struct MemoryStore {
    values: BTreeMap<String, i64>,
}

impl PreferenceStore for MemoryStore {
    fn read_number(&self, key: &str) -> Result<Option<i64>, PreferenceError> {
        Ok(self.values.get(key).copied())
    }

    fn write_number(&mut self, key: &str, value: i64) -> Result<(), PreferenceError> {
        self.values.insert(key.to_string(), value);
        Ok(())
    }
}

/// Store backed by a JSON file, re-read on every access.
#[derive(Debug, Clone)]
pub struct JsonFileStore {
    path: PathBuf,
}

impl JsonFileStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        JsonFileStore { path: path.into() }
    }

    /// Opens `settings.json` in the platform config directory, creating the directory.
    pub fn in_config_dir() -> Result<Self, PreferenceError> {
        let dirs =
            ProjectDirs::from("", "", "frapi-duck").ok_or(PreferenceError::NoConfigDir)?;
        let dir = dirs.config_dir();
        fs::create_dir_all(dir)?;
        Ok(JsonFileStore::new(dir.join(SETTINGS_FILE)))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn load(&self) -> Result<BTreeMap<String, i64>, PreferenceError> {
        match fs::read_to_string(&self.path) {
            Ok(json) => Ok(serde_json::from_str(&json)?),
            Err(err) if err.kind() == io::ErrorKind::NotFound => Ok(BTreeMap::new()),
            Err(err) => Err(err.into()),
        }
    }
}

impl PreferenceStore for JsonFileStore {
    fn read_number(&self, key: &str) -> Result<Option<i64>, PreferenceError> {
        Ok(self.load()?.get(key).copied())
    }

    fn write_number(&mut self, key: &str, value: i64) -> Result<(), PreferenceError> {
        let mut values = self.load().unwrap_or_default();
        values.insert(key.to_string(), value);
        let json = serde_json::to_string_pretty(&values)?;
        fs::write(&self.path, json)?;
        Ok(())
    }
}

/// The sound flag, stored as `0` for on and `1` for off.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SoundSetting {
    On,
    Off,
}

impl SoundSetting {
    pub fn from_answer(wants_sound: bool) -> Self {
        if wants_sound {
            SoundSetting::On
        } else {
            SoundSetting::Off
        }
    }

    /// Any value other than the "on" code counts as off.
    pub fn from_stored(value: i64) -> Self {
        if value == 0 {
            SoundSetting::On
        } else {
            SoundSetting::Off
        }
    }

    pub fn stored_value(self) -> i64 {
        match self {
            SoundSetting::On => 0,
            SoundSetting::Off => 1,
        }
    }

    /// Volume on the 0-255 scale.
    pub fn volume(self) -> u8 {
        match self {
            SoundSetting::On => SOUND_ON_VOLUME,
            SoundSetting::Off => 0,
        }
    }
}

/// Reads the stored sound flag; `None` means the player has never been asked.
///
/// A store that cannot be read is treated like a first run.
pub fn load_sound_setting(store: &dyn PreferenceStore) -> Option<SoundSetting> {
    match store.read_number(SOUND_KEY) {
        Ok(Some(value)) => Some(SoundSetting::from_stored(value)),
        Ok(None) => {
            info!("sound preference is unset");
            None
        }
        Err(err) => {
            warn!("Could not read sound preference: {err}");
            None
        }
    }
}

/// Records the answer to the first-run prompt and returns the resulting setting.
pub fn choose_sound_setting(store: &mut dyn PreferenceStore, wants_sound: bool) -> SoundSetting {
    let setting = SoundSetting::from_answer(wants_sound);
    match store.write_number(SOUND_KEY, setting.stored_value()) {
        Ok(()) => info!(
            "sound preference is newly set to: {}",
            setting.stored_value()
        ),
        Err(err) => warn!("Could not save sound preference: {err}"),
    }
    setting
}
