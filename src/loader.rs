//! List loading
//!
//! Reads list sources named by the configuration and builds an immutable
//! snapshot the resolver and renderers share. Loading never fails as a
//! whole: a list that cannot be read becomes an empty list in the same
//! slot, and the problem is reported as a warning.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use crate::config::Config;
use crate::highlight::{Color, Style, WordList};

/// One list as loaded, together with where it came from
#[derive(Debug, Clone)]
pub struct LoadedList {
    /// Source file, after resolving relative paths
    pub source: PathBuf,
    /// Colour the list is rendered with
    pub color: Color,
    /// The compiled list
    pub list: WordList,
}

/// Every configured list, in priority order
///
/// Snapshots are never modified; a reload builds a new one.
#[derive(Debug, Clone, Default)]
pub struct ListSnapshot {
    loaded: Vec<LoadedList>,
    lists: Vec<WordList>,
    /// Problems met while loading, for display to the user
    pub warnings: Vec<String>,
}

impl ListSnapshot {
    fn new(loaded: Vec<LoadedList>, warnings: Vec<String>) -> Self {
        let lists = loaded.iter().map(|l| l.list.clone()).collect();
        Self {
            loaded,
            lists,
            warnings,
        }
    }

    /// Word lists, index-aligned with the configuration
    pub fn lists(&self) -> &[WordList] {
        &self.lists
    }

    /// Loaded lists with their sources and colours
    pub fn loaded(&self) -> &[LoadedList] {
        &self.loaded
    }

    pub fn len(&self) -> usize {
        self.lists.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lists.is_empty()
    }

    /// Sources of enabled lists, for watching
    pub fn sources(&self) -> Vec<PathBuf> {
        self.loaded
            .iter()
            .filter(|l| l.list.enabled)
            .map(|l| l.source.clone())
            .collect()
    }
}

/// Parse the list source format
///
/// One entry per line. Blank lines and lines starting with `#` (after
/// trimming) are skipped.
pub fn parse_entries(contents: &str) -> Vec<&str> {
    contents
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty() && !line.starts_with('#'))
        .collect()
}

/// Read a text file, replacing invalid UTF-8 with U+FFFD
///
/// Lists and documents are often saved in a legacy encoding. A stray
/// Latin-1 byte costs one entry, not the whole file.
pub fn read_text(path: &Path) -> io::Result<String> {
    let bytes = fs::read(path)?;
    Ok(match String::from_utf8(bytes) {
        Ok(text) => text,
        Err(e) => {
            tracing::debug!("{} is not valid UTF-8, decoding lossily", path.display());
            String::from_utf8_lossy(e.as_bytes()).into_owned()
        }
    })
}

/// Load every configured list
///
/// Relative list paths are resolved against `base_dir`.
pub fn load_snapshot(config: &Config, base_dir: &Path) -> Arc<ListSnapshot> {
    let mut loaded = Vec::with_capacity(config.lists.len());
    let mut warnings = Vec::new();

    for (index, entry) in config.lists.iter().enumerate() {
        let source = entry.resolved_path(base_dir);

        let color = match entry.resolved_color(index) {
            Ok(color) => color,
            Err(e) => {
                let msg = format!("List {} ({}): {}", index, entry.path.display(), e);
                tracing::warn!("{}", msg);
                warnings.push(msg);
                Color::generated(index)
            }
        };

        if !entry.enabled {
            loaded.push(LoadedList {
                source,
                color,
                list: WordList::disabled(),
            });
            continue;
        }

        let style = Style::overlay(color);
        let list = match read_text(&source) {
            Ok(contents) => {
                let list = WordList::new(parse_entries(&contents), style);
                tracing::debug!("Loaded {} entries from {}", list.len(), source.display());
                list
            }
            Err(e) => {
                let msg = format!("Failed to load word list {}: {}", source.display(), e);
                tracing::warn!("{}", msg);
                warnings.push(msg);
                WordList::empty(style)
            }
        };

        loaded.push(LoadedList {
            source,
            color,
            list,
        });
    }

    Arc::new(ListSnapshot::new(loaded, warnings))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ListConfig;
    use crate::highlight::resolve;

    #[test]
    fn test_parse_entries() {
        let contents = "  fox  \n\n# comment\n   # indented comment\nquick brown\r\n\t\n";
        assert_eq!(parse_entries(contents), vec!["fox", "quick brown"]);
    }

    #[test]
    fn test_missing_source_keeps_slot() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("b.txt"), "fox\n").unwrap();

        let config = Config {
            lists: vec![ListConfig::new("missing.txt"), ListConfig::new("b.txt")],
            ..Config::default()
        };
        let snapshot = load_snapshot(&config, dir.path());

        assert_eq!(snapshot.len(), 2);
        assert!(snapshot.lists()[0].enabled);
        assert!(snapshot.lists()[0].is_empty());
        assert_eq!(snapshot.lists()[1].len(), 1);
        assert_eq!(snapshot.warnings.len(), 1);
        assert!(snapshot.warnings[0].contains("missing.txt"));
    }

    #[test]
    fn test_non_utf8_source_keeps_valid_entries() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("latin1.txt"), b"caf\xe9\nfox\n").unwrap();

        let config = Config {
            lists: vec![ListConfig::new("latin1.txt")],
            ..Config::default()
        };
        let snapshot = load_snapshot(&config, dir.path());

        assert!(snapshot.warnings.is_empty());
        assert_eq!(snapshot.lists()[0].len(), 2);
        let spans = resolve("the fox", snapshot.lists());
        assert_eq!(spans[0].len(), 1);
        assert_eq!((spans[0][0].start, spans[0][0].end), (4, 7));
    }

    #[test]
    fn test_read_text_replaces_invalid_bytes() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("doc.txt");
        fs::write(&path, b"na\xefve fox").unwrap();

        assert_eq!(read_text(&path).unwrap(), "na\u{fffd}ve fox");
        assert!(read_text(&dir.path().join("missing.txt")).is_err());
    }

    #[test]
    fn test_disabled_list_not_read() {
        let dir = tempfile::tempdir().unwrap();
        let mut disabled = ListConfig::new("absent.txt");
        disabled.enabled = false;

        let config = Config {
            lists: vec![disabled],
            ..Config::default()
        };
        let snapshot = load_snapshot(&config, dir.path());

        assert_eq!(snapshot.len(), 1);
        assert!(!snapshot.lists()[0].enabled);
        assert!(snapshot.warnings.is_empty());
        assert!(snapshot.sources().is_empty());
    }

    #[test]
    fn test_bad_color_falls_back_to_generated() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("a.txt"), "fox\n").unwrap();
        let mut list = ListConfig::new("a.txt");
        list.color = Some("sparkly".to_string());

        let config = Config {
            lists: vec![list],
            ..Config::default()
        };
        let snapshot = load_snapshot(&config, dir.path());

        assert_eq!(snapshot.loaded()[0].color, Color::generated(0));
        assert_eq!(snapshot.warnings.len(), 1);
        assert_eq!(snapshot.lists()[0].len(), 1);
    }

    #[test]
    fn test_reload_is_idempotent() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("a.txt"), "# people\nada lovelace\nada\n").unwrap();
        fs::write(dir.path().join("b.txt"), "love\nlace\n").unwrap();

        let config = Config {
            lists: vec![ListConfig::new("a.txt"), ListConfig::new("b.txt")],
            ..Config::default()
        };
        let text = "Ada Lovelace loved lace. Ada!";

        let first = load_snapshot(&config, dir.path());
        let second = load_snapshot(&config, dir.path());

        assert_eq!(
            first.loaded().iter().map(|l| l.color).collect::<Vec<_>>(),
            second.loaded().iter().map(|l| l.color).collect::<Vec<_>>()
        );
        assert_eq!(resolve(text, first.lists()), resolve(text, second.lists()));
    }
}
