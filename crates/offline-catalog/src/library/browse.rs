//! Artist and directory listings over the cached library.

use log::debug;
use rand::Rng;
use std::collections::HashSet;
use std::path::{Path, PathBuf};

use offline_core::{Artist, CatalogEntry, Directory, DownloadState, Indexes};

use crate::library::entry::{EntryFactory, EntryVariant};
use crate::library::names::{download_state, resolve_name};
use crate::library::sort::{sort_artists, sort_entries, SortMode};
use crate::scanner::{list_children, list_media_files, path_id};
use crate::search::traverse::walk_library;

/// Lists the library root and its directories
#[derive(Clone)]
pub struct CatalogBrowser {
    library_root: PathBuf,
    factory: EntryFactory,
}

impl CatalogBrowser {
    pub fn new(factory: EntryFactory) -> Self {
        Self {
            library_root: factory.library_root().to_path_buf(),
            factory,
        }
    }

    /// Every directory in the library root is an artist
    pub fn list_indexes(&self, mode: SortMode) -> Indexes {
        let mut artists: Vec<Artist> = list_children(&self.library_root)
            .into_iter()
            .filter(|child| child.is_dir)
            .map(|child| Artist::new(path_id(&child.path), child.file_name))
            .collect();

        sort_artists(&mut artists, mode);
        Indexes { artists }
    }

    /// Entries directly under `dir`, one per resolved display name
    pub fn list_directory(&self, dir: &Path, mode: SortMode, variant: EntryVariant) -> Directory {
        let mut candidates: Vec<(String, DownloadState, PathBuf)> = list_media_files(dir)
            .into_iter()
            .filter_map(|child| {
                let name = resolve_name(&child.file_name, child.is_dir)?;
                let state = if child.is_dir {
                    DownloadState::Pinned
                } else {
                    download_state(&child.file_name)
                };
                Some((name, state, child.path))
            })
            .collect();

        // Pin which duplicate wins: an unmarked file beats its `.complete` twin
        candidates.sort_by(|a, b| a.1.cmp(&b.1).then_with(|| a.2.cmp(&b.2)));

        let mut seen = HashSet::new();
        let mut children: Vec<CatalogEntry> = candidates
            .into_iter()
            .filter(|(name, _, _)| seen.insert(name.clone()))
            .map(|(name, _, path)| self.factory.create(&path, &name, true, variant))
            .collect();

        sort_entries(&mut children, mode);

        Directory {
            id: path_id(dir),
            name: dir
                .file_name()
                .map(|n| n.to_string_lossy().to_string())
                .unwrap_or_default(),
            children,
        }
    }

    /// `size` songs drawn with replacement from every file in the library
    pub fn random_songs(&self, size: usize) -> Directory {
        let candidates: Vec<(PathBuf, String)> = walk_library(&self.library_root)
            .filter(|node| !node.is_dir)
            .filter_map(|node| {
                let name = resolve_name(&node.file_name, false)?;
                Some((node.path, name))
            })
            .collect();

        let mut directory = Directory {
            id: path_id(&self.library_root),
            name: "Random".to_string(),
            children: Vec::with_capacity(size.min(candidates.len())),
        };

        if candidates.is_empty() {
            debug!("No cached songs under {}", self.library_root.display());
            return directory;
        }

        let mut rng = rand::rng();
        for _ in 0..size {
            let (path, name) = &candidates[rng.random_range(0..candidates.len())];
            directory
                .children
                .push(self.factory.create(path, name, true, EntryVariant::Music));
        }

        directory
    }
}
