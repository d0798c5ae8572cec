//! Catalog models.
//!
//! These structs are rebuilt from the filesystem on every call and are
//! serializable for the host application. Nothing here is cached.

use serde::{Deserialize, Serialize};

/// Download lifecycle of a cached file, as encoded by its filename marker
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DownloadState {
    /// No marker: the file was saved permanently
    Pinned,
    /// `.complete` marker: a finished cache download
    Complete,
    /// `.partial` marker: still downloading, never surfaced
    Partial,
}

/// One browsable file or directory
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CatalogEntry {
    /// Absolute path, unique per file
    pub id: String,
    pub title: String,
    pub parent: Option<String>,
    /// Omitted when the parent's parent is the library root
    pub grandparent: Option<String>,
    /// Path relative to the library root
    pub path: String,
    pub is_directory: bool,
    pub size: u64,
    pub artist: Option<String>,
    pub album: Option<String>,
    pub track: Option<u32>,
    pub suffix: Option<String>,
    pub cover_art: Option<String>,
    pub is_video: bool,
    /// Duration in seconds
    pub duration: Option<u32>,
    /// Bit rate in kbps
    pub bit_rate: Option<u32>,
    pub download_state: Option<DownloadState>,
    /// Podcast episodes only
    pub status: Option<String>,
    /// Search relevance, set by search only
    #[serde(skip_serializing_if = "Option::is_none")]
    pub closeness: Option<u32>,
}

/// Top-level artist directory
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Artist {
    pub id: String,
    pub name: String,
    /// First character of the name
    pub index: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub closeness: Option<u32>,
}

impl Artist {
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        let name = name.into();
        let index = name.chars().next().map(String::from).unwrap_or_default();
        Self {
            id: id.into(),
            name,
            index,
            closeness: None,
        }
    }
}

/// Artist listing for the library root
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Indexes {
    pub artists: Vec<Artist>,
}

/// Children of one directory
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Directory {
    pub id: String,
    pub name: String,
    pub children: Vec<CatalogEntry>,
}

/// Playlist read from the local playlist cache
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Playlist {
    /// Source label (the playlist subdirectory it came from)
    pub id: String,
    pub name: String,
    pub entries: Vec<CatalogEntry>,
}

/// Podcast channel with locally cached episodes
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PodcastChannel {
    pub id: String,
    pub name: String,
    pub status: String,
}

/// Search results, each list sorted by descending closeness
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SearchResult {
    pub artists: Vec<Artist>,
    pub albums: Vec<CatalogEntry>,
    pub songs: Vec<CatalogEntry>,
}

/// Kind of offline action waiting to be replayed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EventKind {
    Scrobble,
    Star,
}

impl EventKind {
    /// Key prefix used in the offline sync namespace
    pub fn as_str(&self) -> &'static str {
        match self {
            EventKind::Scrobble => "scrobble",
            EventKind::Star => "star",
        }
    }
}

/// What a pending event refers to
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EventSubject {
    /// Presumed-stable server id
    RemoteId(String),
    /// Search query that re-finds a cache-rooted track
    Query(String),
}

/// Durable record of an offline scrobble or star
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PendingSyncEvent {
    pub kind: EventKind,
    pub subject: EventSubject,
    /// Star setting; always true for scrobbles
    pub value: bool,
    /// Milliseconds since the Unix epoch
    pub timestamp: i64,
    /// Per-kind sequence number, starting at 1
    pub sequence: i32,
}
