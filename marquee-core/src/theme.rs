//! Light/dark theme preference.
//!
//! The only process-wide mutable state in Marquee. A single owner holds a
//! [`ThemeState`] and hands references to whatever renders output; the
//! state writes through to a [`PreferenceStore`] on every toggle.

use std::collections::BTreeMap;
use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use crate::{MarqueeError, Result};

/// Storage key holding the theme preference.
pub const THEME_KEY: &str = "theme";

/// Display theme.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Theme {
    #[default]
    Light,
    Dark,
}

impl Theme {
    /// Stored representation.
    pub fn as_str(self) -> &'static str {
        match self {
            Theme::Light => "light",
            Theme::Dark => "dark",
        }
    }

    /// The opposite theme.
    pub fn flipped(self) -> Self {
        match self {
            Theme::Light => Theme::Dark,
            Theme::Dark => Theme::Light,
        }
    }

    /// Derives a hint from the `COLORFGBG` terminal convention (`"fg;bg"`).
    ///
    /// Background colors 0-6 and 8 are the dark half of the ANSI palette.
    pub fn from_colorfgbg(value: &str) -> Option<Self> {
        let background: u8 = value.rsplit(';').next()?.trim().parse().ok()?;
        match background {
            0..=6 | 8 => Some(Theme::Dark),
            _ => Some(Theme::Light),
        }
    }

    /// Reads the operating environment's color scheme hint, if any.
    pub fn system_hint() -> Option<Self> {
        std::env::var("COLORFGBG")
            .ok()
            .and_then(|value| Self::from_colorfgbg(&value))
    }
}

impl fmt::Display for Theme {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Theme {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s {
            "light" => Ok(Theme::Light),
            "dark" => Ok(Theme::Dark),
            _ => Err(format!("Invalid theme: {s}")),
        }
    }
}

/// Key-value storage for user preferences.
pub trait PreferenceStore {
    /// Reads the value stored under `key`.
    ///
    /// # Errors
    /// - `MarqueeError::Storage` - Backing storage could not be read
    fn load(&self, key: &str) -> Result<Option<String>>;

    /// Writes `value` under `key`, replacing any previous value.
    ///
    /// # Errors
    /// - `MarqueeError::Storage` - Backing storage could not be written
    fn save(&mut self, key: &str, value: &str) -> Result<()>;
}

/// In-memory store, used in tests and when no preference file is wanted.
#[derive(Debug, Default, Clone)]
pub struct MemoryPreferenceStore {
    values: BTreeMap<String, String>,
}

impl MemoryPreferenceStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a store already holding one entry.
    pub fn with_entry(key: &str, value: &str) -> Self {
        let mut values = BTreeMap::new();
        values.insert(key.to_string(), value.to_string());
        Self { values }
    }
}

impl PreferenceStore for MemoryPreferenceStore {
    fn load(&self, key: &str) -> Result<Option<String>> {
        Ok(self.values.get(key).cloned())
    }

    fn save(&mut self, key: &str, value: &str) -> Result<()> {
        self.values.insert(key.to_string(), value.to_string());
        Ok(())
    }
}

/// JSON object on disk, one string value per key.
#[derive(Debug, Clone)]
pub struct FilePreferenceStore {
    path: PathBuf,
}

impl FilePreferenceStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn read_all(&self) -> Result<BTreeMap<String, String>> {
        match std::fs::read_to_string(&self.path) {
            Ok(contents) if contents.trim().is_empty() => Ok(BTreeMap::new()),
            Ok(contents) => Ok(serde_json::from_str(&contents)?),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(BTreeMap::new()),
            Err(e) => Err(MarqueeError::Storage {
                reason: format!("failed to read {}: {e}", self.path.display()),
            }),
        }
    }
}

impl PreferenceStore for FilePreferenceStore {
    fn load(&self, key: &str) -> Result<Option<String>> {
        Ok(self.read_all()?.remove(key))
    }

    fn save(&mut self, key: &str, value: &str) -> Result<()> {
        // A corrupted file is replaced rather than blocking the write
        let mut values = self.read_all().unwrap_or_default();
        values.insert(key.to_string(), value.to_string());

        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }

        let contents = serde_json::to_string_pretty(&values)?;
        std::fs::write(&self.path, contents).map_err(|e| MarqueeError::Storage {
            reason: format!("failed to write {}: {e}", self.path.display()),
        })
    }
}

/// Owned theme cell with write-through persistence.
#[derive(Debug)]
pub struct ThemeState<S: PreferenceStore> {
    theme: Theme,
    store: S,
}

impl<S: PreferenceStore> ThemeState<S> {
    /// Resolves the starting theme: stored value, then `os_hint`, then light.
    ///
    /// Unreadable storage or an unrecognised stored value is logged and
    /// treated as absent.
    pub fn initialize(store: S, os_hint: Option<Theme>) -> Self {
        let stored = match store.load(THEME_KEY) {
            Ok(value) => value.and_then(|raw| match raw.parse::<Theme>() {
                Ok(theme) => Some(theme),
                Err(e) => {
                    tracing::warn!("Ignoring stored theme: {e}");
                    None
                }
            }),
            Err(e) => {
                tracing::warn!("Could not read theme preference: {e}");
                None
            }
        };

        let theme = stored.or(os_hint).unwrap_or_default();
        tracing::debug!(%theme, from_storage = stored.is_some(), "Theme initialized");

        Self { theme, store }
    }

    pub fn current(&self) -> Theme {
        self.theme
    }

    /// Flips the theme and persists the new value.
    ///
    /// The in-memory value flips even when persistence fails.
    ///
    /// # Errors
    /// - `MarqueeError::Storage` - New value could not be persisted
    pub fn toggle(&mut self) -> Result<Theme> {
        self.theme = self.theme.flipped();
        self.store.save(THEME_KEY, self.theme.as_str())?;
        tracing::info!(theme = %self.theme, "Theme changed");
        Ok(self.theme)
    }

    pub fn store(&self) -> &S {
        &self.store
    }
}
