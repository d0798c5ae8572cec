//! Recursive walk over the cached library.

use log::debug;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

use crate::scanner::{is_audio_file, is_video_file};

/// One directory or media file found below the library root
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LibraryNode {
    pub path: PathBuf,
    pub file_name: String,
    pub is_dir: bool,
    /// Folder names between the library root and this node, outermost first
    pub ancestors: Vec<String>,
}

impl LibraryNode {
    /// Depth below the library root, 1 for its direct children
    pub fn depth(&self) -> usize {
        self.ancestors.len() + 1
    }
}

/// Walk every directory and audio/video file below `root` in name order.
///
/// Unreadable entries are logged and skipped. A missing root yields nothing.
pub fn walk_library(root: &Path) -> impl Iterator<Item = LibraryNode> + '_ {
    WalkDir::new(root)
        .min_depth(1)
        .follow_links(true)
        .sort_by_file_name()
        .into_iter()
        .filter_map(move |entry| match entry {
            Ok(entry) => Some(entry),
            Err(e) => {
                debug!("Skipping unreadable entry under {}: {}", root.display(), e);
                None
            }
        })
        .filter_map(move |entry| {
            let is_dir = entry.file_type().is_dir();
            let path = entry.into_path();
            if !is_dir && !is_audio_file(&path) && !is_video_file(&path) {
                return None;
            }

            let file_name = path.file_name()?.to_str()?.to_string();
            let ancestors = path
                .parent()?
                .strip_prefix(root)
                .ok()?
                .components()
                .filter_map(|c| c.as_os_str().to_str().map(str::to_string))
                .collect();

            Some(LibraryNode {
                path,
                file_name,
                is_dir,
                ancestors,
            })
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs::{self, File};
    use tempfile::tempdir;

    #[test]
    fn test_walk_library_order_and_ancestors() {
        let root = tempdir().unwrap();
        let album = root.path().join("Beatles").join("Abbey Road");
        fs::create_dir_all(&album).unwrap();
        File::create(album.join("01-Come Together.mp3")).unwrap();
        File::create(album.join("cover.jpg")).unwrap();

        let nodes: Vec<LibraryNode> = walk_library(root.path()).collect();
        let names: Vec<&str> = nodes.iter().map(|n| n.file_name.as_str()).collect();
        assert_eq!(names, vec!["Beatles", "Abbey Road", "01-Come Together.mp3"]);

        assert_eq!(nodes[0].depth(), 1);
        assert!(nodes[0].ancestors.is_empty());
        assert_eq!(nodes[2].ancestors, vec!["Beatles", "Abbey Road"]);
        assert!(!nodes[2].is_dir);
    }

    #[test]
    fn test_walk_missing_root() {
        let root = tempdir().unwrap();
        assert_eq!(walk_library(&root.path().join("missing")).count(), 0);
    }
}
