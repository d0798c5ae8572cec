//! offline-core: Domain types for the offline media catalog
//!
//! This crate contains the types and interfaces that are shared between the
//! catalog implementation and the host application.
//!
//! # Architecture
//!
//! The crate is organized as follows:
//! - `model`: catalog entries, artists, playlists, pending sync events
//! - `error`: the catalog error type
//! - `service`: the offline operations the catalog fully implements
//! - `remote`: the remote-only operations, modelled as typed requests
//!
//! # Usage
//!
//! ```ignore
//! use offline_core::{OfflineCatalog, RemoteCatalog, RemoteRequest};
//!
//! let directory = catalog.list_directory("/cache/music/Beatles")?;
//!
//! // Remote-only operations go through a separate interface
//! let err = gate.execute(RemoteRequest::GetLyrics { artist, title }).unwrap_err();
//! assert!(err.is_offline_unsupported());
//! ```

pub mod error;
pub mod model;
pub mod remote;
pub mod service;

// Re-export commonly used types at crate root for convenience
pub use error::{CatalogError, CatalogResult, OFFLINE_UNSUPPORTED_MESSAGE};
pub use model::{
    // Catalog types
    Artist,
    CatalogEntry,
    Directory,
    DownloadState,
    Indexes,
    Playlist,
    PodcastChannel,
    SearchResult,

    // Offline sync queue
    EventKind,
    EventSubject,
    PendingSyncEvent,
};
pub use remote::{JukeboxCommand, RemoteCatalog, RemoteRequest, RemoteResponse};
pub use service::OfflineCatalog;
