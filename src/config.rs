use crate::checker::HighlightStrategy;
use anyhow::{Context, Result};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

pub const LOCAL_CONFIG: &str = ".spellmark.toml";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub language: String,
    pub personal_dictionary: Option<PathBuf>,
    pub dictionary_dir: Option<PathBuf>,
    pub max_suggestions: usize,
    pub highlight: HighlightStrategy,
}

fn default_max_suggestions() -> usize {
    5
}

impl Default for Config {
    fn default() -> Self {
        Self {
            language: "en_US".to_string(),
            personal_dictionary: None,
            dictionary_dir: None,
            max_suggestions: default_max_suggestions(),
            highlight: HighlightStrategy::default(),
        }
    }
}

/// Values given on the command line; `None` leaves the file value alone.
#[derive(Debug, Clone, Default)]
pub struct Overrides {
    pub language: Option<String>,
    pub personal_dictionary: Option<PathBuf>,
    pub dictionary_dir: Option<PathBuf>,
    pub highlight: Option<HighlightStrategy>,
}

impl Config {
    /// Load configuration with priority: CLI args > local config > global config > defaults
    pub fn load(overrides: Overrides) -> Result<Self> {
        let mut config = Self::default();

        if let Some(global_path) = Self::global_config_path() {
            if global_path.exists() {
                config = config.merge(Self::from_file(&global_path)?);
            }
        }

        let local_path = PathBuf::from(LOCAL_CONFIG);
        if local_path.exists() {
            config = config.merge(Self::from_file(&local_path)?);
        }

        config.apply(overrides);

        if config.personal_dictionary.is_none() {
            config.personal_dictionary = Self::default_personal_dict_path();
        }
        if config.dictionary_dir.is_none() {
            config.dictionary_dir = Self::data_dir();
        }

        // The user dictionary must exist for a session to enable.
        if let Some(path) = &config.personal_dictionary {
            ensure_file(path)?;
        }

        Ok(config)
    }

    fn from_file(path: &Path) -> Result<Self> {
        let contents = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;
        toml::from_str(&contents)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))
    }

    /// Values in `other` that differ from the defaults win.
    fn merge(mut self, other: Self) -> Self {
        let defaults = Self::default();
        if other.language != defaults.language {
            self.language = other.language;
        }
        if other.personal_dictionary.is_some() {
            self.personal_dictionary = other.personal_dictionary;
        }
        if other.dictionary_dir.is_some() {
            self.dictionary_dir = other.dictionary_dir;
        }
        if other.max_suggestions != defaults.max_suggestions {
            self.max_suggestions = other.max_suggestions;
        }
        if other.highlight != defaults.highlight {
            self.highlight = other.highlight;
        }
        self
    }

    fn apply(&mut self, overrides: Overrides) {
        if let Some(language) = overrides.language {
            self.language = language;
        }
        if let Some(path) = overrides.personal_dictionary {
            self.personal_dictionary = Some(path);
        }
        if let Some(dir) = overrides.dictionary_dir {
            self.dictionary_dir = Some(dir);
        }
        if let Some(highlight) = overrides.highlight {
            self.highlight = highlight;
        }
    }

    pub fn global_config_path() -> Option<PathBuf> {
        ProjectDirs::from("", "", "spellmark").map(|dirs| dirs.config_dir().join("config.toml"))
    }

    pub fn default_personal_dict_path() -> Option<PathBuf> {
        ProjectDirs::from("", "", "spellmark").map(|dirs| dirs.config_dir().join("personal.txt"))
    }

    pub fn data_dir() -> Option<PathBuf> {
        ProjectDirs::from("", "", "spellmark").map(|dirs| dirs.data_dir().to_path_buf())
    }
}

fn ensure_file(path: &Path) -> Result<()> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)
                .context("Failed to create personal dictionary directory")?;
        }
    }
    if !path.exists() {
        fs::write(path, "").context("Failed to create personal dictionary file")?;
    }
    Ok(())
}
