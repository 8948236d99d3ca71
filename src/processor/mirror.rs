//! Directory tree mirroring
//!
//! Reproduces the directory skeleton of the import tree under the export
//! root. Only directories are created; nothing is copied or removed.

use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};
use walkdir::WalkDir;

/// Create every directory of `source_root` under `dest_root`.
///
/// Idempotent and best effort: individual failures are logged as warnings
/// and the remaining directories are still attempted. Returns the number of
/// directories ensured.
pub fn mirror_directory_tree(source_root: &Path, dest_root: &Path) -> usize {
    // Collect first so directories created below a nested export root are
    // never walked themselves.
    let directories: Vec<PathBuf> = WalkDir::new(source_root)
        .into_iter()
        .filter_map(|entry| match entry {
            Ok(entry) if entry.file_type().is_dir() => Some(entry.into_path()),
            Ok(_) => None,
            Err(e) => {
                warn!("Could not fully mirror directory tree: {}", e);
                None
            }
        })
        .collect();

    let mut ensured = 0;
    for directory in directories {
        let Ok(relative) = directory.strip_prefix(source_root) else {
            continue;
        };
        let target = dest_root.join(relative);

        match fs::create_dir_all(&target) {
            Ok(()) => ensured += 1,
            Err(e) => warn!("Could not create mirrored directory {}: {}", target.display(), e),
        }
    }

    debug!(
        "Mirrored {} directories from {} to {}",
        ensured,
        source_root.display(),
        dest_root.display()
    );
    ensured
}
