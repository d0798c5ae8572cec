//! Extended-M3U playlists saved in the playlist cache.
//!
//! Layout is `<playlist root>/<source>/<name>.m3u`, one subdirectory per
//! source. Each playlist line is an absolute path into the media cache.

use log::{debug, warn};
use std::collections::HashSet;
use std::fs::{self, File};
use std::io::{self, BufRead, BufReader};
use std::path::{Path, PathBuf};

use offline_core::{CatalogResult, Playlist};

use crate::library::entry::{EntryFactory, EntryVariant};
use crate::library::names::{base_name, complete_variant, extension, resolve_name, strip_complete_marker};
use crate::scanner::list_children;

/// Required first line of every playlist file
pub const EXTM3U_HEADER: &str = "#EXTM3U";

pub const PLAYLIST_EXTENSION: &str = "m3u";

/// Display name for a playlist from a given source
pub fn display_name(source: &str, base: &str) -> String {
    format!("{}: {}", source, base)
}

fn is_playlist_file(file_name: &str) -> bool {
    extension(file_name)
        .map(|ext| ext.eq_ignore_ascii_case(PLAYLIST_EXTENSION))
        .unwrap_or(false)
}

/// Lists and reads cached playlists
#[derive(Clone)]
pub struct PlaylistResolver {
    playlist_root: PathBuf,
    factory: EntryFactory,
}

impl PlaylistResolver {
    pub fn new(playlist_root: impl Into<PathBuf>, factory: EntryFactory) -> Self {
        Self {
            playlist_root: playlist_root.into(),
            factory,
        }
    }

    pub fn playlist_root(&self) -> &Path {
        &self.playlist_root
    }

    /// Every playlist in every source directory.
    ///
    /// Loose files in the playlist root are left over from an older layout
    /// and are deleted on the way.
    pub fn list_playlists(&self) -> Vec<Playlist> {
        let mut playlists = Vec::new();
        let mut sources = HashSet::new();

        for child in list_children(&self.playlist_root) {
            if !child.is_dir {
                remove_legacy_file(&child.path);
                continue;
            }

            let source = child.file_name;
            for file in list_children(&child.path) {
                if file.is_dir || !is_playlist_file(&file.file_name) {
                    continue;
                }
                sources.insert(source.clone());
                playlists.push(Playlist {
                    id: source.clone(),
                    name: display_name(&source, base_name(&file.file_name)),
                    entries: Vec::new(),
                });
            }
        }

        if sources.len() <= 1 {
            for playlist in &mut playlists {
                let prefix_len = playlist.id.len() + 2;
                playlist.name = playlist.name[prefix_len..].to_string();
            }
        }

        playlists
    }

    /// File backing the playlist `name` from source `id`.
    ///
    /// Listing matches the extension in any case, so the source directory is
    /// searched for the stored spelling when `<name>.m3u` is absent.
    pub fn playlist_path(&self, id: &str, name: &str) -> PathBuf {
        let prefix = format!("{}: ", id);
        let name = name.strip_prefix(&prefix).unwrap_or(name);
        let source_dir = self.playlist_root.join(id);
        let canonical = source_dir.join(format!("{}.{}", name, PLAYLIST_EXTENSION));
        if canonical.exists() {
            return canonical;
        }

        list_children(&source_dir)
            .into_iter()
            .find(|file| {
                !file.is_dir && is_playlist_file(&file.file_name) && base_name(&file.file_name) == name
            })
            .map(|file| file.path)
            .unwrap_or(canonical)
    }

    /// Entries of one playlist that are fully cached.
    ///
    /// A file without the `#EXTM3U` header reads as empty. Lines pointing at
    /// files that are missing or still downloading are skipped.
    pub fn read_playlist(&self, id: &str, name: &str) -> CatalogResult<Playlist> {
        let path = self.playlist_path(id, name);
        let file = File::open(&path)?;
        let mut lines = BufReader::new(file).split(b'\n');

        let mut playlist = Playlist {
            id: id.to_string(),
            name: name.to_string(),
            entries: Vec::new(),
        };

        let header = match lines.next() {
            Some(Ok(line)) => decode_line(&line),
            Some(Err(e)) => return Err(e.into()),
            None => String::new(),
        };
        if header != EXTM3U_HEADER {
            debug!("{} is not an extended M3U playlist", path.display());
            return Ok(playlist);
        }

        for line in lines {
            let line = match line {
                Ok(line) => decode_line(&line),
                Err(e) => {
                    warn!("Stopped reading {}: {}", path.display(), e);
                    break;
                }
            };
            if line.is_empty() || line.starts_with('#') {
                continue;
            }

            let entry_path = PathBuf::from(strip_complete_marker(&line));
            let Some(existing) = existing_variant(&entry_path) else {
                debug!("Skipping uncached playlist entry {}", entry_path.display());
                continue;
            };

            let Some(file_name) = entry_path.file_name().and_then(|n| n.to_str()) else {
                continue;
            };
            let Some(entry_name) = resolve_name(file_name, false) else {
                continue;
            };

            playlist
                .entries
                .push(self.factory.create(&existing, &entry_name, false, EntryVariant::Music));
        }

        Ok(playlist)
    }
}

fn decode_line(raw: &[u8]) -> String {
    String::from_utf8_lossy(raw).trim_end_matches('\r').to_string()
}

/// The path itself if cached, else its `.complete` twin
fn existing_variant(path: &Path) -> Option<PathBuf> {
    if path.exists() {
        return Some(path.to_path_buf());
    }
    complete_variant(path).filter(|variant| variant.exists())
}

fn remove_legacy_file(path: &Path) {
    match fs::remove_file(path) {
        Ok(()) => debug!("Removed legacy playlist file {}", path.display()),
        Err(e) if e.kind() == io::ErrorKind::NotFound => {}
        Err(e) => warn!("Failed to delete old playlist file {}: {}", path.display(), e),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scanner::artwork::FolderArtLocator;
    use crate::scanner::metadata::LoftyMetadataLoader;
    use offline_core::CatalogError;
    use std::io::Write;
    use std::sync::Arc;
    use tempfile::{tempdir, TempDir};

    struct Fixture {
        _dir: TempDir,
        music: PathBuf,
        playlists: PathBuf,
    }

    impl Fixture {
        fn new() -> Self {
            let dir = tempdir().unwrap();
            let music = dir.path().join("music");
            let playlists = dir.path().join("playlists");
            fs::create_dir_all(&music).unwrap();
            fs::create_dir_all(&playlists).unwrap();
            Self {
                _dir: dir,
                music,
                playlists,
            }
        }

        fn resolver(&self) -> PlaylistResolver {
            let factory = EntryFactory::new(
                &self.music,
                Arc::new(LoftyMetadataLoader),
                Arc::new(FolderArtLocator),
            );
            PlaylistResolver::new(&self.playlists, factory)
        }

        fn song(&self, relative: &str) -> PathBuf {
            let path = self.music.join(relative);
            fs::create_dir_all(path.parent().unwrap()).unwrap();
            File::create(&path).unwrap();
            path
        }

        fn playlist(&self, source: &str, name: &str, body: &str) {
            let dir = self.playlists.join(source);
            fs::create_dir_all(&dir).unwrap();
            let mut file = File::create(dir.join(format!("{}.m3u", name))).unwrap();
            file.write_all(body.as_bytes()).unwrap();
        }
    }

    #[test]
    fn test_single_source_names_are_plain() {
        let fx = Fixture::new();
        fx.playlist("home", "Road Trip", "#EXTM3U\n");
        fx.playlist("home", "Chill", "#EXTM3U\n");

        let playlists = fx.resolver().list_playlists();
        let names: Vec<&str> = playlists.iter().map(|p| p.name.as_str()).collect();
        assert_eq!(names, vec!["Chill", "Road Trip"]);
        assert!(playlists.iter().all(|p| p.id == "home"));
    }

    #[test]
    fn test_multiple_sources_keep_prefix() {
        let fx = Fixture::new();
        fx.playlist("home", "Chill", "#EXTM3U\n");
        fx.playlist("work", "Focus", "#EXTM3U\n");
        fs::create_dir_all(fx.playlists.join("empty")).unwrap();

        let names: Vec<String> = fx.resolver().list_playlists().into_iter().map(|p| p.name).collect();
        assert_eq!(names, vec!["home: Chill", "work: Focus"]);
    }

    #[test]
    fn test_legacy_files_deleted() {
        let fx = Fixture::new();
        let legacy = fx.playlists.join("old.m3u");
        File::create(&legacy).unwrap();

        assert!(fx.resolver().list_playlists().is_empty());
        assert!(!legacy.exists());
    }

    #[test]
    fn test_missing_root_lists_nothing() {
        let dir = tempdir().unwrap();
        let factory = EntryFactory::new(
            dir.path(),
            Arc::new(LoftyMetadataLoader),
            Arc::new(FolderArtLocator),
        );
        let resolver = PlaylistResolver::new(dir.path().join("nope"), factory);
        assert!(resolver.list_playlists().is_empty());
    }

    #[test]
    fn test_read_playlist_skips_missing_entries() {
        let fx = Fixture::new();
        let a = fx.song("A/B/01-a.mp3");
        let b = fx.song("A/B/02-b.complete.mp3");
        let missing = fx.music.join("A/B/03-c.mp3");
        fx.playlist(
            "home",
            "Mix",
            &format!(
                "#EXTM3U\n{}\n{}\n{}\n",
                a.display(),
                fx.music.join("A/B/02-b.mp3").display(),
                missing.display()
            ),
        );

        let playlist = fx.resolver().read_playlist("home", "home: Mix").unwrap();
        assert_eq!(playlist.entries.len(), 2);
        assert_eq!(playlist.entries[0].title, "a");
        assert_eq!(playlist.entries[1].title, "b");
        assert_eq!(playlist.entries[1].id, b.to_string_lossy());
    }

    #[test]
    fn test_read_playlist_marker_in_line_is_stripped() {
        let fx = Fixture::new();
        let a = fx.song("A/B/01-a.mp3");
        fx.playlist(
            "home",
            "Mix",
            &format!("#EXTM3U\r\n{}\r\n", fx.music.join("A/B/01-a.complete.mp3").display()),
        );

        let playlist = fx.resolver().read_playlist("home", "Mix").unwrap();
        assert_eq!(playlist.entries.len(), 1);
        assert_eq!(playlist.entries[0].id, a.to_string_lossy());
    }

    #[test]
    fn test_read_playlist_skips_partial() {
        let fx = Fixture::new();
        let partial = fx.song("A/B/01-a.mp3.partial");
        fx.playlist("home", "Mix", &format!("#EXTM3U\n{}\n", partial.display()));

        assert!(fx.resolver().read_playlist("home", "Mix").unwrap().entries.is_empty());
    }

    #[test]
    fn test_read_playlist_without_header() {
        let fx = Fixture::new();
        let a = fx.song("A/B/01-a.mp3");
        fx.playlist("home", "Plain", &format!("{}\n", a.display()));

        let playlist = fx.resolver().read_playlist("home", "Plain").unwrap();
        assert!(playlist.entries.is_empty());

        fx.playlist("home", "Blank", "");
        assert!(fx.resolver().read_playlist("home", "Blank").unwrap().entries.is_empty());
    }

    #[test]
    fn test_uppercase_extension_listed_and_readable() {
        let fx = Fixture::new();
        let a = fx.song("A/B/01-a.mp3");
        let dir = fx.playlists.join("home");
        fs::create_dir_all(&dir).unwrap();
        fs::write(dir.join("Mix.M3U"), format!("#EXTM3U\n{}\n", a.display())).unwrap();

        let resolver = fx.resolver();
        let playlists = resolver.list_playlists();
        assert_eq!(playlists.len(), 1);
        assert_eq!(playlists[0].name, "Mix");

        let playlist = resolver.read_playlist(&playlists[0].id, &playlists[0].name).unwrap();
        assert_eq!(playlist.entries.len(), 1);
        assert_eq!(playlist.entries[0].id, a.to_string_lossy());
    }

    #[test]
    fn test_read_missing_playlist_is_io_error() {
        let fx = Fixture::new();
        let err = fx.resolver().read_playlist("home", "Nope").unwrap_err();
        assert!(matches!(err, CatalogError::Io(_)));
    }
}
