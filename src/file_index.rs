//! Filename index over the exported sample files.
//!
//! The exercise csv refers to sample files by bare file name only, while the
//! export scatters them over numbered sub folders. Walking the tree once and
//! keeping a name -> path map turns every later lookup into a hash lookup.

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};
use walkdir::WalkDir;

#[derive(Debug, Default, Clone)]
pub struct FileIndex {
    entries: HashMap<String, PathBuf>,
}

impl FileIndex {
    pub fn get(&self, filename: &str) -> Option<&Path> {
        self.entries.get(filename).map(PathBuf::as_path)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn insert(&mut self, filename: String, path: PathBuf) -> Option<PathBuf> {
        self.entries.insert(filename, path)
    }
}

/// Walk `root` recursively and map every file's base name to its path.
///
/// When two files share a name the one visited last wins.
pub fn build_index(root: &Path) -> Result<FileIndex, walkdir::Error> {
    let mut index = FileIndex::default();
    let mut walker = WalkDir::new(root).into_iter();

    // The root itself must be readable, anything below it is best effort
    if let Some(first) = walker.next() {
        first?;
    }

    for entry in walker {
        let entry = match entry {
            Ok(entry) => entry,
            Err(e) => {
                warn!("Skipping unreadable entry below {}: {}", root.display(), e);
                continue;
            }
        };

        // links are not followed, but a link that points at a file is still a sample
        let is_file = entry.file_type().is_file() || (entry.path_is_symlink() && entry.path().is_file());
        if !is_file {
            continue;
        }

        let filename = entry.file_name().to_string_lossy().into_owned();
        if let Some(previous) = index.insert(filename.clone(), entry.into_path()) {
            debug!("Duplicate sample file name {} (replacing {})", filename, previous.display());
        }
    }

    debug!("Indexed {} sample files below {}", index.len(), root.display());
    Ok(index)
}
