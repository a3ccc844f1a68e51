//! Named map storage
//!
//! The engine loads maps by name through a [`MapSource`]. Two sources are
//! provided: a directory on disk and an in-memory table.

use std::collections::BTreeMap;
use std::fmt;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

/// Errors raised while looking up or reading a map.
#[derive(Debug)]
pub enum MapSourceError {
    /// No map with this name
    NotFound(String),
    /// The map exists but could not be read
    Io { name: String, source: io::Error },
}

impl fmt::Display for MapSourceError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NotFound(name) => write!(f, "map {name:?} not found"),
            Self::Io { name, source } => write!(f, "failed to read map {name:?}: {source}"),
        }
    }
}

impl std::error::Error for MapSourceError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::NotFound(_) => None,
            Self::Io { source, .. } => Some(source),
        }
    }
}

/// Read-only collection of named map texts.
pub trait MapSource {
    /// Available map names, sorted.
    fn list(&self) -> Vec<String>;

    /// Raw text of the named map.
    ///
    /// # Errors
    /// Returns [`MapSourceError::NotFound`] for an unknown name and
    /// [`MapSourceError::Io`] when the backing storage fails.
    fn read(&self, name: &str) -> Result<String, MapSourceError>;
}

/// Maps stored as files in a single directory.
#[derive(Debug, Clone)]
pub struct DirectorySource {
    dir: PathBuf,
}

impl DirectorySource {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn is_plain_name(name: &str) -> bool {
        !name.is_empty()
            && name != "."
            && name != ".."
            && !name.contains(['/', '\\'])
    }
}

impl MapSource for DirectorySource {
    fn list(&self) -> Vec<String> {
        let Ok(entries) = fs::read_dir(&self.dir) else {
            tracing::warn!("Cannot list map directory {}", self.dir.display());
            return Vec::new();
        };

        let mut names: Vec<String> = entries
            .filter_map(Result::ok)
            .filter(|entry| entry.file_type().is_ok_and(|t| t.is_file()))
            .filter_map(|entry| entry.file_name().into_string().ok())
            .collect();
        names.sort();
        names
    }

    fn read(&self, name: &str) -> Result<String, MapSourceError> {
        if !Self::is_plain_name(name) {
            return Err(MapSourceError::NotFound(name.to_string()));
        }
        let path = self.dir.join(name);
        fs::read_to_string(&path).map_err(|source| {
            if source.kind() == io::ErrorKind::NotFound {
                MapSourceError::NotFound(name.to_string())
            } else {
                MapSourceError::Io {
                    name: name.to_string(),
                    source,
                }
            }
        })
    }
}

/// Maps held in memory, keyed by name.
#[derive(Debug, Clone, Default)]
pub struct MemorySource {
    maps: BTreeMap<String, String>,
}

impl MemorySource {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_map(mut self, name: impl Into<String>, text: impl Into<String>) -> Self {
        self.insert(name, text);
        self
    }

    pub fn insert(&mut self, name: impl Into<String>, text: impl Into<String>) {
        self.maps.insert(name.into(), text.into());
    }
}

impl MapSource for MemorySource {
    fn list(&self) -> Vec<String> {
        self.maps.keys().cloned().collect()
    }

    fn read(&self, name: &str) -> Result<String, MapSourceError> {
        self.maps
            .get(name)
            .cloned()
            .ok_or_else(|| MapSourceError::NotFound(name.to_string()))
    }
}
