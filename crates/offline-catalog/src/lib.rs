//! offline-catalog: filesystem-backed offline media catalog
//!
//! Browses, searches and resolves playlists against a local cache of a
//! remote music library, and queues scrobbles and stars for a later online
//! sync. Nothing is kept in memory between calls; every operation reads the
//! cache directories again.
//!
//! # Usage
//!
//! ```ignore
//! use offline_catalog::{CatalogConfig, OfflineMusicService, SettingsStore};
//! use offline_core::OfflineCatalog;
//!
//! let settings = SettingsStore::open("settings.db")?;
//! let service = OfflineMusicService::new(CatalogConfig::load(&settings)?, settings);
//! let artists = service.list_indexes(None)?;
//! ```

pub mod config;
pub mod db;
pub mod gate;
pub mod library;
pub mod playlists;
pub mod podcasts;
pub mod scanner;
pub mod search;
pub mod service;
pub mod sync_queue;


pub use config::CatalogConfig;
pub use db::{Database, DbError, DbResult, Namespace, SettingsEditor, SettingsStore};
pub use gate::OfflineGate;
pub use library::{CatalogBrowser, EntryFactory, EntryVariant, SortMode};
pub use playlists::PlaylistResolver;
pub use podcasts::PodcastResolver;
pub use scanner::artwork::{ArtLocator, FolderArtLocator};
pub use scanner::metadata::{LoftyMetadataLoader, MetadataLoader, TrackMetadata};
pub use search::SearchEngine;
pub use service::OfflineMusicService;
pub use sync_queue::{OfflineEventQueue, OfflineQuery};
