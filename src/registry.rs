//! Project Registry
//!
//! Scans the projects directory once at startup. Every immediate subfolder is
//! one project; files at the root level are ignored. Listing order is whatever
//! the filesystem returns unless sorting is requested.

use crate::error::{LauncherError, Result};
use once_cell::unsync::OnceCell;
use std::fs;
use std::path::{Path, PathBuf};

/// Sidecar file whose contents replace the folder name as display text
pub const INFO_FILE: &str = "info.txt";
/// Sidecar image used as the project icon
pub const ICON_FILE: &str = "icon.png";

/// One launchable project folder
#[derive(Debug)]
pub struct ProjectEntry {
    folder_path: PathBuf,
    name: String,
    display_text: OnceCell<String>,
    icon_path: OnceCell<Option<PathBuf>>,
}

impl ProjectEntry {
    pub fn new(folder_path: impl Into<PathBuf>) -> Self {
        let folder_path = folder_path.into();
        let name = folder_path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();

        Self {
            folder_path,
            name,
            display_text: OnceCell::new(),
            icon_path: OnceCell::new(),
        }
    }

    pub fn folder_path(&self) -> &Path {
        &self.folder_path
    }

    /// Folder base name
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn info_path(&self) -> PathBuf {
        self.folder_path.join(INFO_FILE)
    }

    /// Display text, resolved on first use and cached for the launcher's lifetime
    pub fn display_text_with(&self, resolve: impl FnOnce(&Self) -> String) -> &str {
        self.display_text.get_or_init(|| resolve(self))
    }

    /// Path of `icon.png` if the folder has one (checked once)
    pub fn icon_path(&self) -> Option<&Path> {
        self.icon_path
            .get_or_init(|| {
                let path = self.folder_path.join(ICON_FILE);
                path.is_file().then_some(path)
            })
            .as_deref()
    }
}

/// Ordered, immutable list of projects
#[derive(Debug, Default)]
pub struct ProjectRegistry {
    root: PathBuf,
    entries: Vec<ProjectEntry>,
}

impl ProjectRegistry {
    /// List the immediate subdirectories of `root`
    ///
    /// A missing root is not an error here: it yields an empty registry and the
    /// caller decides how loudly to report it.
    pub fn load(root: &Path, sort: bool) -> Result<Self> {
        if !root.is_dir() {
            tracing::warn!("Projects directory does not exist: {:?}", root);
            return Ok(Self {
                root: root.to_path_buf(),
                entries: Vec::new(),
            });
        }

        let read_dir = fs::read_dir(root).map_err(|source| LauncherError::Io {
            path: root.to_path_buf(),
            source,
        })?;

        let mut entries = Vec::new();
        for dir_entry in read_dir {
            let dir_entry = match dir_entry {
                Ok(e) => e,
                Err(e) => {
                    tracing::warn!("Skipping unreadable entry in {:?}: {}", root, e);
                    continue;
                }
            };

            // Follows symlinks so linked project folders still count
            match fs::metadata(dir_entry.path()) {
                Ok(meta) if meta.is_dir() => entries.push(ProjectEntry::new(dir_entry.path())),
                Ok(_) => {}
                Err(e) => {
                    tracing::warn!("Skipping {:?}: {}", dir_entry.path(), e);
                }
            }
        }

        if sort {
            entries.sort_by_key(|e| e.name().to_lowercase());
        }

        tracing::info!("Found {} projects in {:?}", entries.len(), root);

        Ok(Self {
            root: root.to_path_buf(),
            entries,
        })
    }

    /// Same as [`load`](Self::load) but reports an empty result as `EmptyRegistry`
    pub fn load_non_empty(root: &Path, sort: bool) -> Result<Self> {
        let registry = Self::load(root, sort)?;
        if registry.is_empty() {
            return Err(LauncherError::EmptyRegistry(root.to_path_buf()));
        }
        Ok(registry)
    }

    pub fn from_entries(root: impl Into<PathBuf>, entries: Vec<ProjectEntry>) -> Self {
        Self {
            root: root.into(),
            entries,
        }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn get(&self, index: usize) -> Option<&ProjectEntry> {
        self.entries.get(index)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &ProjectEntry> {
        self.entries.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn names(registry: &ProjectRegistry) -> Vec<String> {
        registry.iter().map(|e| e.name().to_string()).collect()
    }

    #[test]
    fn test_lists_only_directories() {
        let root = tempfile::tempdir().unwrap();
        fs::create_dir(root.path().join("Pong")).unwrap();
        fs::create_dir(root.path().join("Tetris")).unwrap();
        fs::write(root.path().join("readme.txt"), "not a project").unwrap();

        let registry = ProjectRegistry::load(root.path(), false).unwrap();
        let mut found = names(&registry);
        found.sort();
        assert_eq!(found, vec!["Pong", "Tetris"]);
    }

    #[test]
    fn test_missing_root_is_empty() {
        let root = tempfile::tempdir().unwrap();
        let registry = ProjectRegistry::load(&root.path().join("Jogos"), false).unwrap();
        assert!(registry.is_empty());
    }

    #[test]
    fn test_empty_root_reports_empty_registry() {
        let root = tempfile::tempdir().unwrap();
        let err = ProjectRegistry::load_non_empty(root.path(), false).unwrap_err();
        assert!(matches!(err, LauncherError::EmptyRegistry(_)));
    }

    #[test]
    fn test_sorted_case_insensitive() {
        let root = tempfile::tempdir().unwrap();
        for name in ["zeta", "Alpha", "beta"] {
            fs::create_dir(root.path().join(name)).unwrap();
        }

        let registry = ProjectRegistry::load(root.path(), true).unwrap();
        assert_eq!(names(&registry), vec!["Alpha", "beta", "zeta"]);
    }

    #[test]
    fn test_entry_name_is_folder_base_name() {
        let entry = ProjectEntry::new("/srv/Jogos/Space Race");
        assert_eq!(entry.name(), "Space Race");
        assert_eq!(entry.info_path(), PathBuf::from("/srv/Jogos/Space Race/info.txt"));
    }

    #[test]
    fn test_display_text_resolved_once() {
        let entry = ProjectEntry::new("/srv/Jogos/Pong");
        let mut calls = 0;
        assert_eq!(
            entry.display_text_with(|e| {
                calls += 1;
                e.name().to_uppercase()
            }),
            "PONG"
        );
        assert_eq!(entry.display_text_with(|_| unreachable!()), "PONG");
        assert_eq!(calls, 1);
    }

    #[test]
    fn test_icon_path_detection() {
        let root = tempfile::tempdir().unwrap();
        let with_icon = root.path().join("A");
        let without_icon = root.path().join("B");
        fs::create_dir(&with_icon).unwrap();
        fs::create_dir(&without_icon).unwrap();
        fs::write(with_icon.join(ICON_FILE), b"png").unwrap();

        assert_eq!(
            ProjectEntry::new(&with_icon).icon_path(),
            Some(with_icon.join(ICON_FILE).as_path())
        );
        assert_eq!(ProjectEntry::new(&without_icon).icon_path(), None);
    }
}
