//! The offline music service.
//!
//! Wires the browser, search engine, playlist and podcast resolvers and the
//! event queue to one set of cache roots and exposes them as
//! [`OfflineCatalog`].

use log::{debug, warn};
use std::path::Path;
use std::sync::Arc;

use offline_core::{
    CatalogResult, Directory, EventKind, Indexes, OfflineCatalog, PendingSyncEvent, Playlist,
    PodcastChannel, SearchResult,
};

use crate::config::CatalogConfig;
use crate::db::settings::CUSTOM_SORT_ENABLED;
use crate::db::{Namespace, SettingsStore};
use crate::library::{CatalogBrowser, EntryFactory, EntryVariant, SortMode};
use crate::playlists::PlaylistResolver;
use crate::podcasts::PodcastResolver;
use crate::scanner::artwork::{ArtLocator, FolderArtLocator};
use crate::scanner::metadata::{LoftyMetadataLoader, MetadataLoader};
use crate::search::SearchEngine;
use crate::sync_queue::OfflineEventQueue;

pub struct OfflineMusicService {
    config: CatalogConfig,
    settings: SettingsStore,
    browser: CatalogBrowser,
    search: SearchEngine,
    playlists: PlaylistResolver,
    podcasts: PodcastResolver,
    events: OfflineEventQueue,
}

impl OfflineMusicService {
    /// Service using lofty for metadata and `cover.jpg` folder art
    pub fn new(config: CatalogConfig, settings: SettingsStore) -> Self {
        Self::with_components(
            config,
            settings,
            Arc::new(LoftyMetadataLoader),
            Arc::new(FolderArtLocator),
        )
    }

    pub fn with_components(
        config: CatalogConfig,
        settings: SettingsStore,
        metadata: Arc<dyn MetadataLoader>,
        art: Arc<dyn ArtLocator>,
    ) -> Self {
        let factory = EntryFactory::new(&config.library_root, metadata.clone(), art);
        let browser = CatalogBrowser::new(factory.clone());

        Self {
            search: SearchEngine::new(factory.clone()),
            playlists: PlaylistResolver::new(&config.playlist_root, factory),
            podcasts: PodcastResolver::new(&config.podcast_root, &config.library_root, browser.clone()),
            events: OfflineEventQueue::new(
                settings.clone(),
                &config.cache_root,
                &config.library_root,
                metadata,
            ),
            browser,
            settings,
            config,
        }
    }

    pub fn config(&self) -> &CatalogConfig {
        &self.config
    }

    pub fn settings(&self) -> &SettingsStore {
        &self.settings
    }

    /// Sort order from the preferences, read on every call
    pub fn sort_mode(&self) -> SortMode {
        match self
            .settings
            .get_bool(Namespace::Preferences, CUSTOM_SORT_ENABLED, true)
        {
            Ok(enabled) => SortMode::from_custom_sort(enabled),
            Err(e) => {
                warn!("Failed to read sort preference, using smart order: {}", e);
                SortMode::Smart
            }
        }
    }
}

impl OfflineCatalog for OfflineMusicService {
    fn list_indexes(&self, _folder: Option<&str>) -> CatalogResult<Indexes> {
        Ok(self.browser.list_indexes(self.sort_mode()))
    }

    fn list_directory(&self, id: &str) -> CatalogResult<Directory> {
        Ok(self
            .browser
            .list_directory(Path::new(id), self.sort_mode(), EntryVariant::Music))
    }

    fn search(&self, query: &str) -> CatalogResult<SearchResult> {
        Ok(self.search.search(query))
    }

    fn random_songs(&self, size: usize) -> CatalogResult<Directory> {
        Ok(self.browser.random_songs(size))
    }

    fn list_playlists(&self) -> CatalogResult<Vec<Playlist>> {
        Ok(self.playlists.list_playlists())
    }

    fn read_playlist(&self, id: &str, name: &str) -> CatalogResult<Playlist> {
        self.playlists.read_playlist(id, name)
    }

    fn list_podcast_channels(&self) -> CatalogResult<Vec<PodcastChannel>> {
        self.podcasts.list_channels()
    }

    fn list_podcast_episodes(&self, channel_id: &str) -> CatalogResult<Directory> {
        Ok(self.podcasts.list_episodes(channel_id, self.sort_mode()))
    }

    fn record_scrobble(&self, id: &str) -> CatalogResult<()> {
        self.events.record_scrobble(id).map(|_| ())
    }

    fn record_star(&self, ids: &[&str], starred: bool) -> CatalogResult<()> {
        let Some(id) = ids.first() else {
            debug!("Star requested without ids");
            return Ok(());
        };
        self.events.record_star(id, starred).map(|_| ())
    }

    fn pending_events(&self, kind: EventKind) -> CatalogResult<Vec<PendingSyncEvent>> {
        self.events.pending_events(kind)
    }
}
