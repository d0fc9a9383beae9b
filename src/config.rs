//! Configuration file support
//!
//! Loads settings from ~/.phrasemark.toml (or %USERPROFILE%\.phrasemark.toml
//! on Windows) unless another path is given on the command line.
//!
//! Lists are tried in file order; the first list has the highest priority.
//!
//! Example:
//! ```text
//! # phrasemark configuration
//! refresh_delay_ms = 100
//!
//! [[lists]]
//! path = "names.txt"
//! color = "rgba(255, 0, 0, 0.3)"
//!
//! [[lists]]
//! path = "/usr/share/wordlists/jargon.txt"
//! enabled = false
//! ```

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{HighlightError, Result};
use crate::highlight::Color;

/// Debounce applied to document edits when the file does not say
pub const DEFAULT_REFRESH_DELAY_MS: u64 = 100;

/// One configured word list source
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ListConfig {
    /// Path to the list source, absolute or relative to the config file
    pub path: PathBuf,
    /// Highlight colour; generated from the list index when omitted
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
    /// Disabled lists keep their priority slot but never match
    #[serde(default = "default_enabled")]
    pub enabled: bool,
}

impl ListConfig {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            color: None,
            enabled: true,
        }
    }

    /// Colour for this list when it sits at `index`
    pub fn resolved_color(&self, index: usize) -> Result<Color> {
        match &self.color {
            Some(color) => color.parse(),
            None => Ok(Color::generated(index)),
        }
    }

    /// Source path, with relative paths taken from `base_dir`
    pub fn resolved_path(&self, base_dir: &Path) -> PathBuf {
        if self.path.is_absolute() {
            self.path.clone()
        } else {
            base_dir.join(&self.path)
        }
    }
}

/// Configuration settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Config {
    /// Quiet period before a document edit triggers re-highlighting
    #[serde(default = "default_refresh_delay")]
    pub refresh_delay_ms: u64,
    /// Word lists in priority order
    #[serde(default)]
    pub lists: Vec<ListConfig>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            refresh_delay_ms: DEFAULT_REFRESH_DELAY_MS,
            lists: Vec::new(),
        }
    }
}

fn default_enabled() -> bool {
    true
}

fn default_refresh_delay() -> u64 {
    DEFAULT_REFRESH_DELAY_MS
}

impl Config {
    /// Get the default config file path
    pub fn config_path() -> Option<PathBuf> {
        #[cfg(windows)]
        {
            std::env::var("USERPROFILE")
                .ok()
                .map(|home| PathBuf::from(home).join(".phrasemark.toml"))
        }

        #[cfg(not(windows))]
        {
            std::env::var("HOME")
                .ok()
                .map(|home| PathBuf::from(home).join(".phrasemark.toml"))
        }
    }

    /// Load configuration from file
    ///
    /// A missing file is an empty configuration; a malformed one is an error.
    pub fn load(path: &Path) -> Result<Self> {
        match fs::read_to_string(path) {
            Ok(contents) => Self::parse(&contents).map_err(|source| HighlightError::Config {
                path: path.to_path_buf(),
                source,
            }),
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                tracing::debug!("No config at {}, using defaults", path.display());
                Ok(Self::default())
            }
            Err(e) => Err(e.into()),
        }
    }

    /// Parse config file contents
    pub fn parse(contents: &str) -> std::result::Result<Self, toml::de::Error> {
        let mut config: Config = toml::from_str(contents)?;
        config.refresh_delay_ms = config.refresh_delay_ms.clamp(10, 5000);
        Ok(config)
    }

    /// Directory relative list paths are resolved against
    pub fn base_dir(path: &Path) -> PathBuf {
        match path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
            _ => PathBuf::from("."),
        }
    }

    /// Append a list at the lowest priority
    ///
    /// Without an explicit colour, the colour generated for the new slot is
    /// written out so it stays put if lists are later reordered.
    pub fn add_list(&mut self, path: PathBuf, color: Option<String>, enabled: bool) -> Result<()> {
        let color = match color {
            Some(color) => {
                color.parse::<Color>()?;
                color
            }
            None => Color::generated(self.lists.len()).to_string(),
        };
        self.lists.push(ListConfig {
            path,
            color: Some(color),
            enabled,
        });
        Ok(())
    }

    /// Save current configuration to file
    pub fn save(&self, path: &Path) -> Result<()> {
        let body = toml::to_string_pretty(self)?;
        let contents = format!("# phrasemark configuration\n\n{}", body);
        fs::write(path, contents)?;
        Ok(())
    }
}
