//! File discovery module for measurement directories
//!
//! Finds candidate input files under an import root by file name suffix,
//! either among the root's direct children or across the whole subtree.
//! Results are sorted by full path so batches run in a reproducible order.

use std::path::{Path, PathBuf};
use tracing::{debug, warn};
use walkdir::WalkDir;

/// File discovery component for an import directory
#[derive(Debug, Clone)]
pub struct PathCatalog {
    root: PathBuf,
    extension: String,
    recursive: bool,
}

impl PathCatalog {
    /// Create a catalog for `root` matching names ending in `extension`
    pub fn new(root: impl Into<PathBuf>, extension: impl Into<String>, recursive: bool) -> Self {
        Self {
            root: root.into(),
            extension: extension.into(),
            recursive,
        }
    }

    /// Discover matching paths, sorted by full path.
    ///
    /// Recursive discovery matches any entry below the root whose name ends
    /// with the extension. Flat discovery only considers regular files that
    /// are direct children of the root. Unreadable entries are skipped.
    pub fn discover(&self) -> Vec<PathBuf> {
        let walker = WalkDir::new(&self.root).min_depth(1);
        let walker = if self.recursive {
            walker
        } else {
            walker.max_depth(1)
        };

        let mut files: Vec<PathBuf> = walker
            .into_iter()
            .filter_map(|entry| match entry {
                Ok(entry) => Some(entry.into_path()),
                Err(e) => {
                    warn!("Skipping unreadable entry under {}: {}", self.root.display(), e);
                    None
                }
            })
            .filter(|path| self.recursive || path.is_file())
            .filter(|path| matches_extension(path, &self.extension))
            .collect();

        files.sort_by(|a, b| a.as_os_str().cmp(b.as_os_str()));

        debug!(
            "Found {} {} files in {} ({})",
            files.len(),
            self.extension,
            self.root.display(),
            if self.recursive { "recursive" } else { "top level" }
        );

        files
    }
}

/// Check if the file name ends with `extension` (case sensitive).
///
/// Compares raw name bytes, so names that are not valid UTF-8 still match.
pub fn matches_extension(path: &Path, extension: &str) -> bool {
    path.file_name()
        .is_some_and(|name| name.as_encoded_bytes().ends_with(extension.as_bytes()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    /// Helper to create a nested import tree
    fn create_test_tree(temp_dir: &TempDir) -> PathBuf {
        let root = temp_dir.path().join("import");
        let nested = root.join("day1").join("maps");
        fs::create_dir_all(&nested).unwrap();

        fs::write(root.join("b.wdf"), "x").unwrap();
        fs::write(root.join("a.wdf"), "x").unwrap();
        fs::write(root.join("notes.txt"), "x").unwrap();
        fs::write(root.join("upper.WDF"), "x").unwrap();
        fs::write(root.join("day1").join("c.wdf"), "x").unwrap();
        fs::write(nested.join("d.wdf"), "x").unwrap();

        root
    }

    fn names(files: &[PathBuf], root: &Path) -> Vec<String> {
        files
            .iter()
            .map(|p| p.strip_prefix(root).unwrap().to_string_lossy().replace('\\', "/"))
            .collect()
    }

    #[test]
    fn test_flat_discovery_ignores_subdirectories() {
        let temp_dir = TempDir::new().unwrap();
        let root = create_test_tree(&temp_dir);

        let files = PathCatalog::new(&root, ".wdf", false).discover();

        assert_eq!(names(&files, &root), vec!["a.wdf", "b.wdf"]);
    }

    #[test]
    fn test_recursive_discovery_reaches_all_depths() {
        let temp_dir = TempDir::new().unwrap();
        let root = create_test_tree(&temp_dir);

        let files = PathCatalog::new(&root, ".wdf", true).discover();

        assert_eq!(
            names(&files, &root),
            vec!["a.wdf", "b.wdf", "day1/c.wdf", "day1/maps/d.wdf"]
        );
    }

    #[test]
    fn test_discovery_is_deterministic() {
        let temp_dir = TempDir::new().unwrap();
        let root = create_test_tree(&temp_dir);
        let catalog = PathCatalog::new(&root, ".wdf", true);

        let first = catalog.discover();
        let second = catalog.discover();

        assert_eq!(first, second);
        let mut sorted = first.clone();
        sorted.sort_by_key(|p| p.to_string_lossy().into_owned());
        assert_eq!(first, sorted);
    }

    #[test]
    fn test_flat_discovery_skips_matching_directories() {
        let temp_dir = TempDir::new().unwrap();
        let root = temp_dir.path().join("import");
        fs::create_dir_all(root.join("folder.wdf")).unwrap();
        fs::write(root.join("real.wdf"), "x").unwrap();

        let files = PathCatalog::new(&root, ".wdf", false).discover();

        assert_eq!(names(&files, &root), vec!["real.wdf"]);
    }

    #[test]
    fn test_empty_directory() {
        let temp_dir = TempDir::new().unwrap();
        let files = PathCatalog::new(temp_dir.path(), ".wdf", true).discover();
        assert!(files.is_empty());
    }

    #[test]
    fn test_matches_extension() {
        assert!(matches_extension(Path::new("scan.wdf"), ".wdf"));
        assert!(matches_extension(Path::new("/path/to/map.wdf"), ".wdf"));
        assert!(!matches_extension(Path::new("scan.txt"), ".wdf"));
        assert!(!matches_extension(Path::new("scan"), ".wdf"));
        assert!(!matches_extension(Path::new("scan.WDF"), ".wdf")); // Case sensitive
    }

    #[cfg(target_os = "linux")]
    #[test]
    fn test_non_utf8_names_are_discovered() {
        use std::ffi::OsStr;
        use std::os::unix::ffi::OsStrExt;

        let temp_dir = TempDir::new().unwrap();
        let root = temp_dir.path();
        fs::write(root.join(OsStr::from_bytes(b"caf\xe9.wdf")), "x").unwrap();
        fs::write(root.join(OsStr::from_bytes(b"caf\xe9.txt")), "x").unwrap();
        fs::write(root.join("b.wdf"), "x").unwrap();

        let files = PathCatalog::new(root, ".wdf", false).discover();

        assert_eq!(files.len(), 2);
        assert!(files.contains(&root.join(OsStr::from_bytes(b"caf\xe9.wdf"))));
    }
}
