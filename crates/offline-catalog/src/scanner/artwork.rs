//! Folder-based album art lookup.
//!
//! Art is never decoded here; the locator only answers where the cached
//! image for an entry would live.

use std::fs;
use std::path::{Path, PathBuf};

use offline_core::CatalogEntry;

/// Reserved album-art filename written next to cached tracks
pub const ALBUM_ART_FILE: &str = "cover.jpg";

/// Other folder artwork names, checked case-insensitively
pub const ARTWORK_FILENAMES: &[&str] = &[
    "cover.jpeg",
    "cover.png",
    "folder.jpg",
    "folder.jpeg",
    "folder.png",
    "front.jpg",
    "front.png",
];

/// Finds the album-art file for an entry
pub trait ArtLocator: Send + Sync {
    /// Candidate path; it may not exist
    fn locate(&self, entry: &CatalogEntry) -> PathBuf;
}

/// Looks for art in the entry's own folder (directories) or its parent (files)
#[derive(Debug, Clone, Copy, Default)]
pub struct FolderArtLocator;

impl ArtLocator for FolderArtLocator {
    fn locate(&self, entry: &CatalogEntry) -> PathBuf {
        let id = Path::new(&entry.id);
        let folder = if entry.is_directory {
            id
        } else {
            id.parent().unwrap_or(id)
        };

        let reserved = folder.join(ALBUM_ART_FILE);
        if reserved.exists() {
            return reserved;
        }

        find_folder_artwork(folder).unwrap_or(reserved)
    }
}

fn find_folder_artwork(folder: &Path) -> Option<PathBuf> {
    let entries = fs::read_dir(folder).ok()?;

    entries.filter_map(|e| e.ok()).find_map(|entry| {
        let name = entry.file_name().to_string_lossy().to_lowercase();
        (name == ALBUM_ART_FILE || ARTWORK_FILENAMES.contains(&name.as_str()))
            .then(|| entry.path())
    })
}
