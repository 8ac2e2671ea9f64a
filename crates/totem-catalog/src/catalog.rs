//! Content catalog
//!
//! Indexes every recognised file under the images root by its lower-cased
//! stem, and remembers the root's immediate subdirectories as cycle targets.

use std::collections::{BTreeMap, BTreeSet};
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{debug, info};

/// Catalog errors
#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("Catalog root not found: {0}")]
    RootNotFound(PathBuf),

    #[error("Unknown directory: {0}")]
    UnknownDirectory(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// What a catalog file contains
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ContentKind {
    /// png, jpg, jpeg, bmp
    Still,
    /// gif
    Animated,
    /// txt, first line is scrolled
    Text,
}

impl ContentKind {
    /// Classify a path by its extension
    pub fn from_path(path: &Path) -> Option<Self> {
        let ext = path.extension()?.to_str()?.to_lowercase();
        match ext.as_str() {
            "png" | "jpg" | "jpeg" | "bmp" => Some(Self::Still),
            "gif" => Some(Self::Animated),
            "txt" => Some(Self::Text),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Still => "still",
            Self::Animated => "animated",
            Self::Text => "text",
        }
    }
}

/// A named piece of content
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CatalogEntry {
    /// Lower-cased stem
    pub name: String,
    /// Path on disk
    pub path: PathBuf,
    /// Content kind
    pub kind: ContentKind,
}

impl CatalogEntry {
    /// Build an entry from a path, `None` for unrecognised files
    pub fn from_path(path: impl Into<PathBuf>) -> Option<Self> {
        let path = path.into();
        let kind = ContentKind::from_path(&path)?;
        let name = content_name(&path)?;
        Some(Self { name, path, kind })
    }
}

/// Catalog key for a path: the file name up to its first dot, lower-cased
pub fn content_name(path: &Path) -> Option<String> {
    let file_name = path.file_name()?.to_str()?;
    let stem = file_name.split('.').next().unwrap_or_default();
    if stem.is_empty() {
        return None;
    }
    Some(stem.to_lowercase())
}

/// Name-indexed content plus cycle directories
#[derive(Debug, Clone, Default)]
pub struct ContentCatalog {
    root: PathBuf,
    entries: BTreeMap<String, CatalogEntry>,
    directories: BTreeSet<String>,
}

impl ContentCatalog {
    /// Create an empty catalog rooted at `root`
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            entries: BTreeMap::new(),
            directories: BTreeSet::new(),
        }
    }

    /// Build a catalog from the filesystem
    ///
    /// Files are visited in sorted order, so when two files share a stem the
    /// one visited last wins.
    pub fn scan(root: impl AsRef<Path>) -> Result<Self, CatalogError> {
        let root = root.as_ref();
        if !root.is_dir() {
            return Err(CatalogError::RootNotFound(root.to_path_buf()));
        }

        let mut catalog = Self::new(root);

        for dir in sorted_children(root)? {
            if dir.is_dir() {
                if let Some(name) = dir.file_name().and_then(|n| n.to_str()) {
                    catalog.directories.insert(name.to_lowercase());
                }
            }
        }

        let mut files = Vec::new();
        walk(root, &mut files)?;
        for path in files {
            match CatalogEntry::from_path(&path) {
                Some(entry) => catalog.insert(entry),
                None => debug!(path = %path.display(), "Skipping unrecognised file"),
            }
        }

        info!(
            entries = catalog.len(),
            directories = catalog.directories.len(),
            root = %root.display(),
            "Scanned content catalog"
        );

        Ok(catalog)
    }

    /// Catalog root
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Register an entry, replacing any entry with the same name
    pub fn insert(&mut self, entry: CatalogEntry) {
        self.entries.insert(entry.name.clone(), entry);
    }

    /// Register a cycle directory
    pub fn insert_directory(&mut self, name: &str) {
        self.directories.insert(name.to_lowercase());
    }

    /// Look up an entry, case-insensitively
    pub fn get(&self, name: &str) -> Option<&CatalogEntry> {
        self.entries.get(&name.to_lowercase())
    }

    /// Check if a name is registered
    pub fn contains(&self, name: &str) -> bool {
        self.get(name).is_some()
    }

    /// Entry names in sorted order
    pub fn names(&self) -> Vec<&str> {
        self.entries.keys().map(String::as_str).collect()
    }

    /// All entries in name order
    pub fn entries(&self) -> impl Iterator<Item = &CatalogEntry> {
        self.entries.values()
    }

    /// Entries of one kind in name order
    pub fn entries_of(&self, kind: ContentKind) -> impl Iterator<Item = &CatalogEntry> {
        self.entries.values().filter(move |e| e.kind == kind)
    }

    /// Cycle directory names in sorted order
    pub fn directories(&self) -> impl Iterator<Item = &str> {
        self.directories.iter().map(String::as_str)
    }

    /// Whether `name` is a cycle directory
    pub fn is_directory(&self, name: &str) -> bool {
        self.directories.contains(&name.to_lowercase())
    }

    /// Recognised files directly inside a cycle directory, sorted by path
    pub fn directory_files(&self, name: &str) -> Result<Vec<CatalogEntry>, CatalogError> {
        if !self.is_directory(name) {
            return Err(CatalogError::UnknownDirectory(name.to_string()));
        }

        let dir = self.directory_path(name)?;
        Ok(sorted_children(&dir)?
            .into_iter()
            .filter(|p| p.is_file())
            .filter_map(CatalogEntry::from_path)
            .collect())
    }

    /// Whether a cycle directory holds at least one animated file
    pub fn directory_has_animation(&self, name: &str) -> bool {
        self.directory_files(name)
            .map(|files| files.iter().any(|e| e.kind == ContentKind::Animated))
            .unwrap_or(false)
    }

    /// Number of entries
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Check if the catalog has no entries
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Directory names are stored lower-cased; find the on-disk spelling
    fn directory_path(&self, name: &str) -> Result<PathBuf, CatalogError> {
        let wanted = name.to_lowercase();
        sorted_children(&self.root)?
            .into_iter()
            .find(|p| {
                p.is_dir()
                    && p.file_name()
                        .and_then(|n| n.to_str())
                        .is_some_and(|n| n.to_lowercase() == wanted)
            })
            .ok_or(CatalogError::UnknownDirectory(wanted))
    }
}

fn sorted_children(dir: &Path) -> Result<Vec<PathBuf>, CatalogError> {
    let mut children = std::fs::read_dir(dir)?
        .flatten()
        .map(|entry| entry.path())
        .collect::<Vec<_>>();
    children.sort();
    Ok(children)
}

fn walk(dir: &Path, files: &mut Vec<PathBuf>) -> Result<(), CatalogError> {
    let mut subdirs = Vec::new();
    for path in sorted_children(dir)? {
        if path.is_dir() {
            subdirs.push(path);
        } else {
            files.push(path);
        }
    }
    for subdir in subdirs {
        walk(&subdir, files)?;
    }
    Ok(())
}
