use std::fs;
use std::path::Path;
use std::time::SystemTime;

/// One entry of a directory listing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DirEntry {
    pub name: String,
    pub is_dir: bool,
    pub size: u64,
    pub modified: Option<SystemTime>,
}

/// List the immediate entries of `path`, ordered by filename.
///
/// Any OS error (missing path, permission denied, not a directory) yields an
/// empty listing. Entries whose metadata cannot be read are skipped.
/// Symlinks are reported as non-directories, like `readdir` file types.
pub fn list_directory(path: &Path) -> Vec<DirEntry> {
    let entries = match fs::read_dir(path) {
        Ok(entries) => entries,
        Err(e) => {
            tracing::debug!(path = %path.display(), error = %e, "directory listing failed");
            return Vec::new();
        }
    };

    let mut listing: Vec<DirEntry> = entries
        .filter_map(|entry| entry.ok())
        .filter_map(|entry| {
            let meta = entry.metadata().ok()?;
            Some(DirEntry {
                name: entry.file_name().to_string_lossy().to_string(),
                is_dir: meta.is_dir(),
                size: meta.len(),
                modified: meta.modified().ok(),
            })
        })
        .collect();

    listing.sort_by(|a, b| a.name.cmp(&b.name));
    listing
}
