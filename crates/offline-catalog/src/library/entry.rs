//! Catalog entry construction.
//!
//! Entries are derived from the path alone; metadata loading and album-art
//! lookup only fill in extra fields and never decide whether an entry exists.

use log::debug;
use std::fs;
use std::path::{Component, Path, PathBuf};
use std::sync::Arc;

use offline_core::CatalogEntry;

use crate::library::names::{download_state, extension, strip_complete_marker};
use crate::scanner::artwork::ArtLocator;
use crate::scanner::metadata::MetadataLoader;
use crate::scanner::{is_video_file, path_id};

/// Status reported for every locally cached podcast episode
pub const EPISODE_STATUS_COMPLETED: &str = "completed";

/// Which kind of entry to build
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntryVariant {
    Music,
    Podcast,
}

/// Where a file sits relative to the library root
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FolderLayout<'a> {
    /// Loose file in the library root
    AtRoot,
    /// `<root>/<album>/file`: no artist level, the album doubles as artist
    RootAdjacent { album: &'a str },
    /// `<root>/.../<artist>/<album>/file`
    Nested { artist: &'a str, album: &'a str },
}

impl<'a> FolderLayout<'a> {
    /// Classify the folders containing a file, outermost first
    pub fn from_folders(folders: &[&'a str]) -> Self {
        match *folders {
            [] => FolderLayout::AtRoot,
            [album] => FolderLayout::RootAdjacent { album },
            [.., artist, album] => FolderLayout::Nested { artist, album },
        }
    }

    pub fn artist(&self) -> Option<&'a str> {
        match *self {
            FolderLayout::AtRoot => None,
            FolderLayout::RootAdjacent { album } => Some(album),
            FolderLayout::Nested { artist, .. } => Some(artist),
        }
    }

    pub fn album(&self) -> Option<&'a str> {
        match *self {
            FolderLayout::AtRoot => None,
            FolderLayout::RootAdjacent { album } | FolderLayout::Nested { album, .. } => {
                Some(album)
            }
        }
    }
}

/// Names of the folders containing `path`, relative to `root` when it lies
/// under it and absolute otherwise
pub fn containing_folders<'p>(path: &'p Path, root: &Path) -> Vec<&'p str> {
    let Some(parent) = path.parent() else {
        return Vec::new();
    };
    let relative = parent.strip_prefix(root).unwrap_or(parent);

    relative
        .components()
        .filter_map(|c| match c {
            Component::Normal(name) => name.to_str(),
            _ => None,
        })
        .collect()
}

/// Split a leading `<digits>-` track number off a name.
///
/// Anything that does not parse leaves the name untouched.
pub fn parse_track(name: &str) -> (Option<u32>, &str) {
    if let Some((digits, rest)) = name.split_once('-') {
        if !digits.is_empty() && digits.bytes().all(|b| b.is_ascii_digit()) {
            if let Ok(track) = digits.parse::<u32>() {
                return (Some(track), rest);
            }
        }
    }
    (None, name)
}

/// Builds catalog entries for files under the library root
#[derive(Clone)]
pub struct EntryFactory {
    library_root: PathBuf,
    metadata: Arc<dyn MetadataLoader>,
    art: Arc<dyn ArtLocator>,
}

impl EntryFactory {
    pub fn new(
        library_root: impl Into<PathBuf>,
        metadata: Arc<dyn MetadataLoader>,
        art: Arc<dyn ArtLocator>,
    ) -> Self {
        Self {
            library_root: library_root.into(),
            metadata,
            art,
        }
    }

    pub fn library_root(&self) -> &Path {
        &self.library_root
    }

    pub fn metadata_loader(&self) -> &dyn MetadataLoader {
        self.metadata.as_ref()
    }

    /// Build the entry for `path` using an already resolved display name
    pub fn create(&self, path: &Path, name: &str, load: bool, variant: EntryVariant) -> CatalogEntry {
        let root = self.library_root.as_path();
        let is_directory = path.is_dir();
        let file_name = path
            .file_name()
            .map(|n| n.to_string_lossy().to_string())
            .unwrap_or_default();

        let mut entry = CatalogEntry {
            id: path_id(path),
            title: name.to_string(),
            parent: path.parent().map(path_id),
            grandparent: path
                .parent()
                .and_then(Path::parent)
                .filter(|gp| *gp != root && gp.starts_with(root))
                .map(path_id),
            path: path
                .strip_prefix(root)
                .map(path_id)
                .unwrap_or_else(|_| path_id(path)),
            is_directory,
            size: if is_directory {
                0
            } else {
                fs::metadata(path).map(|m| m.len()).unwrap_or(0)
            },
            ..Default::default()
        };

        if !is_directory {
            let folders = containing_folders(path, root);
            let layout = FolderLayout::from_folders(&folders);
            entry.artist = layout.artist().map(str::to_string);
            entry.album = layout.album().map(str::to_string);

            let (track, title) = parse_track(name);
            entry.track = track;
            entry.title = title.to_string();

            entry.suffix = extension(&strip_complete_marker(&file_name)).map(str::to_string);
            entry.download_state = Some(download_state(&file_name));
            entry.is_video = is_video_file(path);

            if load {
                match self.metadata.load(path) {
                    Ok(metadata) => metadata.apply_to(&mut entry),
                    Err(e) => debug!("Metadata unavailable for {}: {}", path.display(), e),
                }
            }
        }

        let art = self.art.locate(&entry);
        if art.is_file() {
            entry.cover_art = Some(path_id(&art));
        }

        if variant == EntryVariant::Podcast {
            entry.status = Some(EPISODE_STATUS_COMPLETED.to_string());
        }

        entry
    }
}
