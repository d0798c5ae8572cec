//! Offline scrobble and star queue.
//!
//! Events are stored in the `offline_sync` settings namespace under numbered
//! keys so a later online pass can replay them:
//!
//! | key                  | value                                   |
//! |----------------------|-----------------------------------------|
//! | `{kind}_count`       | last sequence number used for the kind  |
//! | `{kind}_id_{n}`      | remote id subject                       |
//! | `{kind}_search_{n}`  | search query subject                    |
//! | `{kind}_time_{n}`    | milliseconds since the epoch            |
//! | `star_setting_{n}`   | starred or unstarred                    |
//!
//! Sequence numbers are never reused, including across restarts.

use log::{debug, info};
use std::path::{Path, PathBuf};
use std::sync::Arc;

use offline_core::{CatalogResult, EventKind, EventSubject, PendingSyncEvent};

use crate::db::settings::CACHE_LOCATION;
use crate::db::{Namespace, SettingsStore};
use crate::library::entry::{containing_folders, parse_track, FolderLayout};
use crate::library::names::{base_name, strip_markers};
use crate::scanner::metadata::MetadataLoader;

fn count_key(kind: EventKind) -> String {
    format!("{}_count", kind.as_str())
}

fn id_key(kind: EventKind, n: i32) -> String {
    format!("{}_id_{}", kind.as_str(), n)
}

fn search_key(kind: EventKind, n: i32) -> String {
    format!("{}_search_{}", kind.as_str(), n)
}

fn time_key(kind: EventKind, n: i32) -> String {
    format!("{}_time_{}", kind.as_str(), n)
}

fn star_setting_key(n: i32) -> String {
    format!("star_setting_{}", n)
}

/// Artist/album/title tuple that lets an online pass find a track again
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct OfflineQuery {
    pub artist: Option<String>,
    pub album: Option<String>,
    pub title: Option<String>,
}

impl OfflineQuery {
    /// Derive the tuple from where a cached file sits below `library_root`
    pub fn from_path(path: &Path, library_root: &Path) -> Self {
        let file_name = path
            .file_name()
            .map(|n| n.to_string_lossy().to_string())
            .unwrap_or_default();
        let unmarked = strip_markers(&file_name);
        let (_, title) = parse_track(base_name(&unmarked));

        let folders = containing_folders(path, library_root);
        let layout = FolderLayout::from_folders(&folders);

        Self {
            artist: layout.artist().map(str::to_string),
            album: layout.album().map(str::to_string),
            title: Some(title.to_string()).filter(|t| !t.is_empty()),
        }
    }

    /// `artist:"A" AND album:"B" AND title:"T"`, absent parts left out
    pub fn encode(&self) -> String {
        [
            ("artist", &self.artist),
            ("album", &self.album),
            ("title", &self.title),
        ]
        .into_iter()
        .filter_map(|(field, value)| {
            value
                .as_ref()
                .map(|v| format!("{}:\"{}\"", field, v.replace('"', "\\\"")))
        })
        .collect::<Vec<_>>()
        .join(" AND ")
    }
}

/// Durable queue of offline scrobbles and stars
pub struct OfflineEventQueue {
    settings: SettingsStore,
    default_cache_root: PathBuf,
    library_root: PathBuf,
    metadata: Arc<dyn MetadataLoader>,
}

impl OfflineEventQueue {
    pub fn new(
        settings: SettingsStore,
        default_cache_root: impl Into<PathBuf>,
        library_root: impl Into<PathBuf>,
        metadata: Arc<dyn MetadataLoader>,
    ) -> Self {
        Self {
            settings,
            default_cache_root: default_cache_root.into(),
            library_root: library_root.into(),
            metadata,
        }
    }

    /// Cache root currently configured in preferences
    pub fn cache_root(&self) -> CatalogResult<PathBuf> {
        let configured = self
            .settings
            .get_string(Namespace::Preferences, CACHE_LOCATION)?
            .filter(|location| !location.is_empty());

        Ok(configured
            .map(PathBuf::from)
            .unwrap_or_else(|| self.default_cache_root.clone()))
    }

    /// Cache-rooted ids become a search query; anything else is kept as a remote id
    pub fn resolve_subject(&self, id: &str) -> CatalogResult<EventSubject> {
        let path = Path::new(id);
        if !path.starts_with(self.cache_root()?) {
            return Ok(EventSubject::RemoteId(id.to_string()));
        }

        let query = match self.metadata.load(path) {
            Ok(tags) if tags.title.is_some() => OfflineQuery {
                artist: tags.artist,
                album: tags.album,
                title: tags.title,
            },
            Ok(_) => OfflineQuery::from_path(path, &self.library_root),
            Err(e) => {
                debug!("Deriving offline query from path for {}: {}", id, e);
                OfflineQuery::from_path(path, &self.library_root)
            }
        };

        Ok(EventSubject::Query(query.encode()))
    }

    pub fn record_scrobble(&self, id: &str) -> CatalogResult<PendingSyncEvent> {
        self.record(EventKind::Scrobble, id, true)
    }

    pub fn record_star(&self, id: &str, starred: bool) -> CatalogResult<PendingSyncEvent> {
        self.record(EventKind::Star, id, starred)
    }

    fn record(&self, kind: EventKind, id: &str, value: bool) -> CatalogResult<PendingSyncEvent> {
        let subject = self.resolve_subject(id)?;
        let timestamp = chrono::Utc::now().timestamp_millis();

        let sequence = self.settings.commit_sequenced(
            Namespace::OfflineSync,
            &count_key(kind),
            |sequence, editor| {
                match &subject {
                    EventSubject::RemoteId(remote_id) => {
                        editor
                            .put_string(&id_key(kind, sequence), remote_id)
                            .remove(&search_key(kind, sequence));
                    }
                    EventSubject::Query(query) => {
                        editor
                            .put_string(&search_key(kind, sequence), query)
                            .remove(&id_key(kind, sequence));
                    }
                }
                editor.put_i64(&time_key(kind, sequence), timestamp);
                if kind == EventKind::Star {
                    editor.put_bool(&star_setting_key(sequence), value);
                }
            },
        )?;

        info!("Queued offline {} #{} for {:?}", kind.as_str(), sequence, subject);

        Ok(PendingSyncEvent {
            kind,
            subject,
            value,
            timestamp,
            sequence,
        })
    }

    /// Every queued event of one kind in sequence order
    pub fn pending_events(&self, kind: EventKind) -> CatalogResult<Vec<PendingSyncEvent>> {
        let ns = Namespace::OfflineSync;
        let count = self.settings.get_counter(ns, &count_key(kind))?;
        let mut events = Vec::new();

        for sequence in 1..=count {
            let subject = match (
                self.settings.get_string(ns, &id_key(kind, sequence))?,
                self.settings.get_string(ns, &search_key(kind, sequence))?,
            ) {
                (Some(id), _) => EventSubject::RemoteId(id),
                (None, Some(query)) => EventSubject::Query(query),
                (None, None) => {
                    debug!("No subject stored for {} #{}", kind.as_str(), sequence);
                    continue;
                }
            };

            let value = match kind {
                EventKind::Star => self.settings.get_bool(ns, &star_setting_key(sequence), true)?,
                EventKind::Scrobble => true,
            };

            events.push(PendingSyncEvent {
                kind,
                subject,
                value,
                timestamp: self.settings.get_i64(ns, &time_key(kind, sequence), 0)?,
                sequence,
            });
        }

        Ok(events)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scanner::metadata::{LoftyMetadataLoader, TrackMetadata};
    use crate::scanner::ScanResult;

    struct TaggedLoader;

    impl MetadataLoader for TaggedLoader {
        fn load(&self, _path: &Path) -> ScanResult<TrackMetadata> {
            Ok(TrackMetadata {
                artist: Some("Tag Artist".to_string()),
                album: Some("Tag Album".to_string()),
                title: Some("Tag \"Title\"".to_string()),
                ..Default::default()
            })
        }
    }

    fn queue(loader: Arc<dyn MetadataLoader>) -> OfflineEventQueue {
        OfflineEventQueue::new(
            SettingsStore::open_in_memory().unwrap(),
            "/cache",
            "/cache/music",
            loader,
        )
    }

    #[test]
    fn test_query_encoding() {
        let query = OfflineQuery {
            artist: Some("Beatles".to_string()),
            album: None,
            title: Some("Come Together".to_string()),
        };
        assert_eq!(query.encode(), r#"artist:"Beatles" AND title:"Come Together""#);
        assert_eq!(OfflineQuery::default().encode(), "");
    }

    #[test]
    fn test_query_from_path() {
        let query = OfflineQuery::from_path(
            Path::new("/cache/music/Beatles/Abbey Road/01-Come Together.complete.mp3"),
            Path::new("/cache/music"),
        );
        assert_eq!(query.artist.as_deref(), Some("Beatles"));
        assert_eq!(query.album.as_deref(), Some("Abbey Road"));
        assert_eq!(query.title.as_deref(), Some("Come Together"));
    }

    #[test]
    fn test_remote_id_kept_verbatim() {
        let q = queue(Arc::new(LoftyMetadataLoader));
        let event = q.record_scrobble("12345").unwrap();

        assert_eq!(event.subject, EventSubject::RemoteId("12345".to_string()));
        assert_eq!(event.sequence, 1);
        assert!(event.value);
    }

    #[test]
    fn test_cache_rooted_id_becomes_query() {
        let q = queue(Arc::new(LoftyMetadataLoader));
        let event = q
            .record_scrobble("/cache/music/Beatles/Abbey Road/01-Come Together.mp3")
            .unwrap();

        assert_eq!(
            event.subject,
            EventSubject::Query(
                r#"artist:"Beatles" AND album:"Abbey Road" AND title:"Come Together""#.to_string()
            )
        );
    }

    #[test]
    fn test_tags_preferred_over_path() {
        let q = queue(Arc::new(TaggedLoader));
        let event = q.record_star("/cache/music/x/y/z.mp3", false).unwrap();

        assert_eq!(
            event.subject,
            EventSubject::Query(
                r#"artist:"Tag Artist" AND album:"Tag Album" AND title:"Tag \"Title\"""#.to_string()
            )
        );
        assert!(!event.value);
    }

    #[test]
    fn test_configured_cache_location_wins() {
        let q = queue(Arc::new(LoftyMetadataLoader));
        let mut editor = q.settings.edit(Namespace::Preferences);
        editor.put_string(CACHE_LOCATION, "/sdcard/cache");
        editor.commit().unwrap();

        let moved = q.record_scrobble("/sdcard/cache/music/A/B/01-x.mp3").unwrap();
        assert!(matches!(moved.subject, EventSubject::Query(_)));

        let old = q.record_scrobble("/cache/music/A/B/01-x.mp3").unwrap();
        assert!(matches!(old.subject, EventSubject::RemoteId(_)));
    }

    #[test]
    fn test_sequences_per_kind_and_read_back() {
        let q = queue(Arc::new(LoftyMetadataLoader));
        q.record_scrobble("1").unwrap();
        q.record_star("2", true).unwrap();
        q.record_scrobble("3").unwrap();
        q.record_star("4", false).unwrap();

        let scrobbles = q.pending_events(EventKind::Scrobble).unwrap();
        let stars = q.pending_events(EventKind::Star).unwrap();

        assert_eq!(scrobbles.iter().map(|e| e.sequence).collect::<Vec<_>>(), vec![1, 2]);
        assert_eq!(stars.iter().map(|e| e.value).collect::<Vec<_>>(), vec![true, false]);
        assert_eq!(stars[1].subject, EventSubject::RemoteId("4".to_string()));
        assert!(scrobbles[0].timestamp > 0);
    }

    #[test]
    fn test_corrupt_counter_is_not_reset() {
        let q = queue(Arc::new(LoftyMetadataLoader));
        q.record_scrobble("1").unwrap();
        let mut editor = q.settings.edit(Namespace::OfflineSync);
        editor.put_string(&count_key(EventKind::Scrobble), "garbage");
        editor.commit().unwrap();

        let err = q.record_scrobble("2").unwrap_err();
        assert!(matches!(err, offline_core::CatalogError::Settings(_)));
        assert!(q.pending_events(EventKind::Scrobble).is_err());
        assert_eq!(
            q.settings.get_string(Namespace::OfflineSync, &id_key(EventKind::Scrobble, 1)).unwrap(),
            Some("1".to_string())
        );
    }

    #[test]
    fn test_empty_queue() {
        let q = queue(Arc::new(LoftyMetadataLoader));
        assert!(q.pending_events(EventKind::Star).unwrap().is_empty());
    }
}
