//! Operations the offline catalog implements in full.
//!
//! Remote-only operations are not part of this interface; see
//! [`crate::remote::RemoteCatalog`].

use crate::error::CatalogResult;
use crate::model::{
    Directory, EventKind, Indexes, PendingSyncEvent, Playlist, PodcastChannel, SearchResult,
};

/// Browsing, search, playlists and offline event recording against the local cache
pub trait OfflineCatalog: Send + Sync {
    /// Always succeeds; there is no server to reach.
    fn ping(&self) -> CatalogResult<()> {
        Ok(())
    }

    fn is_license_valid(&self) -> bool {
        true
    }

    /// Top-level artists. `folder` is accepted for interface parity and ignored.
    fn list_indexes(&self, folder: Option<&str>) -> CatalogResult<Indexes>;

    /// Entries directly under the directory `id`; empty when it does not exist.
    fn list_directory(&self, id: &str) -> CatalogResult<Directory>;

    fn search(&self, query: &str) -> CatalogResult<SearchResult>;

    /// `size` songs drawn at random from the whole library.
    fn random_songs(&self, size: usize) -> CatalogResult<Directory>;

    fn list_playlists(&self) -> CatalogResult<Vec<Playlist>>;

    fn read_playlist(&self, id: &str, name: &str) -> CatalogResult<Playlist>;

    fn list_podcast_channels(&self) -> CatalogResult<Vec<PodcastChannel>>;

    fn list_podcast_episodes(&self, channel_id: &str) -> CatalogResult<Directory>;

    fn record_scrobble(&self, id: &str) -> CatalogResult<()>;

    /// Records one star event; the first id is the subject.
    fn record_star(&self, ids: &[&str], starred: bool) -> CatalogResult<()>;

    fn pending_events(&self, kind: EventKind) -> CatalogResult<Vec<PendingSyncEvent>>;
}
