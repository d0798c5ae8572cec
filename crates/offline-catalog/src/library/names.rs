//! Display names and download markers for cached files.
//!
//! The cache encodes download state in the filename: `song.complete.mp3` is a
//! finished cache download, `song.partial.mp3` (or `song.mp3.partial`) is still
//! in progress, and a plain `song.mp3` was saved permanently.

use std::path::{Path, PathBuf};

use offline_core::DownloadState;

use crate::scanner::artwork::ALBUM_ART_FILE;

pub const COMPLETE_MARKER: &str = ".complete";
pub const PARTIAL_MARKER: &str = ".partial";

/// Download state encoded in a filename
pub fn download_state(file_name: &str) -> DownloadState {
    if file_name.contains(PARTIAL_MARKER) {
        DownloadState::Partial
    } else if file_name.contains(COMPLETE_MARKER) {
        DownloadState::Complete
    } else {
        DownloadState::Pinned
    }
}

/// Remove every `.complete` marker
pub fn strip_complete_marker(file_name: &str) -> String {
    file_name.replace(COMPLETE_MARKER, "")
}

/// Remove both download markers
pub fn strip_markers(file_name: &str) -> String {
    file_name.replace(COMPLETE_MARKER, "").replace(PARTIAL_MARKER, "")
}

/// Name without its final extension
pub fn base_name(file_name: &str) -> &str {
    match file_name.rfind('.') {
        Some(idx) => &file_name[..idx],
        None => file_name,
    }
}

/// Final extension, if any
pub fn extension(file_name: &str) -> Option<&str> {
    file_name
        .rfind('.')
        .map(|idx| &file_name[idx + 1..])
        .filter(|ext| !ext.is_empty())
}

/// Resolve the catalog display name for a directory child.
///
/// Directories keep their name. Files that are still downloading, and the
/// album-art file, resolve to `None` and are left out of the catalog.
/// Otherwise the `.complete` marker is removed first and then the extension.
pub fn resolve_name(file_name: &str, is_dir: bool) -> Option<String> {
    if is_dir {
        return Some(file_name.to_string());
    }

    if file_name.contains(PARTIAL_MARKER) || file_name == ALBUM_ART_FILE {
        return None;
    }

    let unmarked = strip_complete_marker(file_name);
    Some(base_name(&unmarked).to_string())
}

/// Same file with a `.complete` marker inserted before its extension
pub fn complete_variant(path: &Path) -> Option<PathBuf> {
    let file_name = path.file_name()?.to_str()?;
    let variant = match extension(file_name) {
        Some(ext) => format!("{}{}.{}", base_name(file_name), COMPLETE_MARKER, ext),
        None => format!("{}{}", file_name, COMPLETE_MARKER),
    };
    Some(path.with_file_name(variant))
}
