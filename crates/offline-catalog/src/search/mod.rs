//! Offline search over the cached library.
//!
//! Every artist, album and song name below the library root is scored by
//! token overlap with the query. Nothing is indexed: each search walks the
//! tree again.

pub mod score;
pub mod traverse;

use log::debug;
use std::path::PathBuf;

use offline_core::{Artist, SearchResult};

use crate::library::entry::{EntryFactory, EntryVariant};
use crate::scanner::path_id;
use crate::search::score::{classify, match_criteria, Candidate};
use crate::search::traverse::walk_library;

pub use score::tokenize;

/// Token overlap search over the library tree
#[derive(Clone)]
pub struct SearchEngine {
    library_root: PathBuf,
    factory: EntryFactory,
}

impl SearchEngine {
    pub fn new(factory: EntryFactory) -> Self {
        Self {
            library_root: factory.library_root().to_path_buf(),
            factory,
        }
    }

    pub fn search(&self, query: &str) -> SearchResult {
        let mut result = SearchResult::default();

        if tokenize(query).is_empty() {
            debug!("Empty search query");
            return result;
        }

        for node in walk_library(&self.library_root) {
            let Some(candidate) = classify(&node) else {
                continue;
            };

            let closeness = match_criteria(query, candidate.name());
            if closeness == 0 {
                continue;
            }

            match candidate {
                Candidate::Artist { name } => {
                    let mut artist = Artist::new(path_id(&node.path), name);
                    artist.closeness = Some(closeness);
                    result.artists.push(artist);
                }
                Candidate::Album { artist, name } => {
                    let mut album = self.factory.create(&node.path, &name, true, EntryVariant::Music);
                    album.artist = Some(artist);
                    album.closeness = Some(closeness);
                    result.albums.push(album);
                }
                Candidate::Song {
                    artist,
                    album,
                    name,
                } => {
                    let mut song = self.factory.create(&node.path, &name, true, EntryVariant::Music);
                    song.artist = Some(artist);
                    song.album = Some(album);
                    song.closeness = Some(closeness);
                    result.songs.push(song);
                }
            }
        }

        // Stable sorts keep walk order among equal scores
        result.artists.sort_by(|a, b| b.closeness.cmp(&a.closeness));
        result.albums.sort_by(|a, b| b.closeness.cmp(&a.closeness));
        result.songs.sort_by(|a, b| b.closeness.cmp(&a.closeness));

        debug!(
            "Search {:?}: {} artists, {} albums, {} songs",
            query,
            result.artists.len(),
            result.albums.len(),
            result.songs.len()
        );

        result
    }
}
