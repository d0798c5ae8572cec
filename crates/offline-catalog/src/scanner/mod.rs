//! Local media discovery.
//!
//! Classifies cached files by extension and lists the media children of a
//! directory in a stable order. Metadata loading and album-art lookup live in
//! the submodules.

pub mod artwork;
pub mod metadata;

use log::debug;
use std::path::{Path, PathBuf};
use thiserror::Error;

use crate::library::names::strip_markers;

/// Supported audio file extensions
pub const AUDIO_EXTENSIONS: &[&str] = &[
    "mp3", "m4a", "flac", "ogg", "oga", "wav", "aac", "wma", "opus", "ape", "aiff",
];

/// Supported video file extensions
pub const VIDEO_EXTENSIONS: &[&str] = &[
    "mp4", "m4v", "mkv", "avi", "mov", "webm", "flv", "wmv", "3gp", "mpg", "mpeg", "ts",
];

/// Scanner error types
#[derive(Error, Debug)]
pub enum ScanError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Metadata extraction error: {0}")]
    Metadata(String),

    #[error("Path not found: {0}")]
    PathNotFound(String),
}

pub type ScanResult<T> = Result<T, ScanError>;

/// Extension of a file name after download markers are removed, lower-cased
pub fn media_extension(file_name: &str) -> Option<String> {
    let stripped = strip_markers(file_name);
    Path::new(&stripped)
        .extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| ext.to_lowercase())
}

/// Check if a path has a supported audio extension
pub fn is_audio_file(path: &Path) -> bool {
    has_extension_in(path, AUDIO_EXTENSIONS)
}

/// Check if a path has a supported video extension
pub fn is_video_file(path: &Path) -> bool {
    has_extension_in(path, VIDEO_EXTENSIONS)
}

fn has_extension_in(path: &Path, extensions: &[&str]) -> bool {
    path.file_name()
        .and_then(|name| name.to_str())
        .and_then(media_extension)
        .map(|ext| extensions.contains(&ext.as_str()))
        .unwrap_or(false)
}

/// A directory child that is worth showing in the catalog
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MediaFile {
    pub path: PathBuf,
    pub file_name: String,
    pub is_dir: bool,
}

/// List subdirectories and audio/video files directly under `dir`, sorted by name.
///
/// A missing or unreadable directory yields an empty list.
pub fn list_media_files(dir: &Path) -> Vec<MediaFile> {
    list_children(dir)
        .into_iter()
        .filter(|child| child.is_dir || is_audio_file(&child.path) || is_video_file(&child.path))
        .collect()
}

/// List every child directly under `dir`, sorted by name.
pub fn list_children(dir: &Path) -> Vec<MediaFile> {
    let entries = match std::fs::read_dir(dir) {
        Ok(entries) => entries,
        Err(err) => {
            debug!("Failed to read directory {}: {}", dir.display(), err);
            return Vec::new();
        }
    };

    let mut children = Vec::new();
    for entry in entries {
        let entry = match entry {
            Ok(entry) => entry,
            Err(err) => {
                debug!("Failed to read a directory entry in {}: {}", dir.display(), err);
                continue;
            }
        };

        let path = entry.path();
        // Follow symlinks so linked album folders browse like real ones
        let is_dir = path.is_dir();
        let Some(file_name) = entry.file_name().to_str().map(str::to_string) else {
            debug!("Skipping non UTF-8 file name in {}", dir.display());
            continue;
        };

        children.push(MediaFile {
            path,
            file_name,
            is_dir,
        });
    }

    children.sort_by(|a, b| a.file_name.cmp(&b.file_name));
    children
}

/// Convert a path to the string form used for catalog ids
pub fn path_id(path: &Path) -> String {
    path.to_string_lossy().to_string()
}
