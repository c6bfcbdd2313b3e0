use std::collections::BTreeMap;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use tracing::{error, warn};

use crate::platform;

/// One entry of a directory listing, as much of it as retention needs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CatalogEntry {
    pub name: String,
    pub directory: PathBuf,
    /// Set while the file has not yet been copied off-host.
    pub needs_archiving: bool,
    pub is_dir: bool,
}

impl CatalogEntry {
    pub fn file(directory: impl Into<PathBuf>, name: impl Into<String>, needs_archiving: bool) -> Self {
        Self {
            name: name.into(),
            directory: directory.into(),
            needs_archiving,
            is_dir: false,
        }
    }

    pub fn path(&self) -> PathBuf {
        self.directory.join(&self.name)
    }
}

/// Listings of every readable configured directory. Directories that could
/// not be read are remembered in `skipped` and have no listing at all.
#[derive(Debug, Default)]
pub struct Catalog {
    listings: BTreeMap<PathBuf, Vec<CatalogEntry>>,
    skipped: Vec<PathBuf>,
}

impl Catalog {
    pub fn insert(&mut self, dir: PathBuf, entries: Vec<CatalogEntry>) {
        self.listings.insert(dir, entries);
    }

    pub fn iter(&self) -> impl Iterator<Item = (&Path, &[CatalogEntry])> {
        self.listings
            .iter()
            .map(|(dir, entries)| (dir.as_path(), entries.as_slice()))
    }

    pub fn entries(&self, dir: &Path) -> Option<&[CatalogEntry]> {
        self.listings.get(dir).map(Vec::as_slice)
    }

    pub fn skipped(&self) -> &[PathBuf] {
        &self.skipped
    }

    pub fn directory_count(&self) -> usize {
        self.listings.len()
    }

    pub fn entry_count(&self) -> usize {
        self.listings.values().map(Vec::len).sum()
    }
}

/// List each directory once. An unreadable directory is logged and skipped;
/// the others are still listed.
pub fn read_directories<'a>(dirs: impl IntoIterator<Item = &'a Path>) -> Catalog {
    let mut catalog = Catalog::default();

    for dir in dirs {
        match read_directory(dir) {
            Ok(entries) => catalog.insert(dir.to_path_buf(), entries),
            Err(err) => {
                error!("Error reading directory {}: {}", dir.display(), err);
                catalog.skipped.push(dir.to_path_buf());
            }
        }
    }

    catalog
}

/// Non-recursive listing of `dir`. Symlinks and names that are not valid
/// UTF-8 are left out, which means they are never planned for deletion.
pub fn read_directory(dir: &Path) -> io::Result<Vec<CatalogEntry>> {
    let mut entries = Vec::new();

    for entry_result in fs::read_dir(dir)? {
        let entry = entry_result?;
        let path = entry.path();

        let metadata = match entry.metadata() {
            Ok(metadata) => metadata,
            Err(err) => {
                warn!("Error getting metadata for {}: {}", path.display(), err);
                continue;
            }
        };

        if metadata.file_type().is_symlink() {
            continue;
        }

        let name = match entry.file_name().into_string() {
            Ok(name) => name,
            Err(raw) => {
                warn!("Skipping non UTF-8 name {:?} in {}", raw, dir.display());
                continue;
            }
        };

        entries.push(CatalogEntry {
            name,
            directory: dir.to_path_buf(),
            needs_archiving: platform::needs_archiving(&metadata),
            is_dir: metadata.is_dir(),
        });
    }

    Ok(entries)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_read_directory_lists_files_and_subdirs() {
        let tmp = tempdir().unwrap();
        fs::write(tmp.path().join("db_2021-08-01T17-37-00-FULL.bak"), b"x").unwrap();
        fs::create_dir(tmp.path().join("nested")).unwrap();
        fs::write(tmp.path().join("nested").join("inner.bak"), b"x").unwrap();

        let mut entries = read_directory(tmp.path()).unwrap();
        entries.sort_by(|a, b| a.name.cmp(&b.name));

        assert_eq!(entries.len(), 2);
        assert_eq!(entries[0].name, "db_2021-08-01T17-37-00-FULL.bak");
        assert!(!entries[0].is_dir);
        assert_eq!(entries[0].directory, tmp.path());
        assert_eq!(entries[1].name, "nested");
        assert!(entries[1].is_dir);
    }

    #[test]
    fn test_unreadable_directory_is_skipped() {
        let tmp = tempdir().unwrap();
        let missing = tmp.path().join("missing");
        fs::write(tmp.path().join("a.bak"), b"x").unwrap();

        let catalog = read_directories([missing.as_path(), tmp.path()]);

        assert_eq!(catalog.directory_count(), 1);
        assert_eq!(catalog.skipped(), [missing.clone()]);
        assert!(catalog.entries(&missing).is_none());
        assert_eq!(catalog.entries(tmp.path()).unwrap().len(), 1);
        assert_eq!(catalog.entry_count(), 1);
    }
}
