use std::env;
use std::path::{Path, PathBuf};

use offline_core::{CatalogError, CatalogResult};

use crate::db::settings::CACHE_LOCATION;
use crate::db::{Namespace, SettingsStore};

/// Environment variable that overrides the configured cache location
pub const CACHE_DIR_ENV: &str = "OFFLINE_CACHE_DIR";

pub const MUSIC_DIR: &str = "music";
pub const PLAYLISTS_DIR: &str = "playlists";
pub const PODCASTS_DIR: &str = "podcasts";

/// Filesystem roots of the offline cache
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CatalogConfig {
    pub cache_root: PathBuf,
    pub library_root: PathBuf,
    pub playlist_root: PathBuf,
    pub podcast_root: PathBuf,
}

impl CatalogConfig {
    /// Standard layout below one cache directory
    pub fn from_cache_root(cache_root: impl Into<PathBuf>) -> Self {
        let cache_root = cache_root.into();
        Self {
            library_root: cache_root.join(MUSIC_DIR),
            playlist_root: cache_root.join(PLAYLISTS_DIR),
            podcast_root: cache_root.join(PODCASTS_DIR),
            cache_root,
        }
    }

    /// Load the cache location
    ///
    /// `OFFLINE_CACHE_DIR` wins over the `cache_location` preference.
    pub fn load(settings: &SettingsStore) -> CatalogResult<Self> {
        Self::load_with(settings, env::var(CACHE_DIR_ENV).ok())
    }

    fn load_with(settings: &SettingsStore, env_override: Option<String>) -> CatalogResult<Self> {
        let location = match env_override.filter(|dir| !dir.is_empty()) {
            Some(dir) => dir,
            None => settings
                .get_string(Namespace::Preferences, CACHE_LOCATION)?
                .filter(|dir| !dir.is_empty())
                .ok_or_else(|| CatalogError::Config("no cache location configured".to_string()))?,
        };

        Ok(Self::from_cache_root(location))
    }

    pub fn with_library_root(mut self, root: impl AsRef<Path>) -> Self {
        self.library_root = root.as_ref().to_path_buf();
        self
    }

    pub fn with_playlist_root(mut self, root: impl AsRef<Path>) -> Self {
        self.playlist_root = root.as_ref().to_path_buf();
        self
    }

    pub fn with_podcast_root(mut self, root: impl AsRef<Path>) -> Self {
        self.podcast_root = root.as_ref().to_path_buf();
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_cache_root() {
        let config = CatalogConfig::from_cache_root("/cache");
        assert_eq!(config.library_root, PathBuf::from("/cache/music"));
        assert_eq!(config.playlist_root, PathBuf::from("/cache/playlists"));
        assert_eq!(config.podcast_root, PathBuf::from("/cache/podcasts"));
    }

    #[test]
    fn test_overrides() {
        let config = CatalogConfig::from_cache_root("/cache").with_library_root("/media/music");
        assert_eq!(config.library_root, PathBuf::from("/media/music"));
        assert_eq!(config.cache_root, PathBuf::from("/cache"));
    }

    #[test]
    fn test_load_from_preferences() {
        let settings = SettingsStore::open_in_memory().unwrap();
        let err = CatalogConfig::load_with(&settings, None).unwrap_err();
        assert!(matches!(err, CatalogError::Config(_)));

        let mut editor = settings.edit(Namespace::Preferences);
        editor.put_string(CACHE_LOCATION, "/sdcard/cache");
        editor.commit().unwrap();

        let config = CatalogConfig::load_with(&settings, None).unwrap();
        assert_eq!(config.cache_root, PathBuf::from("/sdcard/cache"));
    }

    #[test]
    fn test_env_override_wins() {
        let settings = SettingsStore::open_in_memory().unwrap();
        let mut editor = settings.edit(Namespace::Preferences);
        editor.put_string(CACHE_LOCATION, "/sdcard/cache");
        editor.commit().unwrap();

        let config = CatalogConfig::load_with(&settings, Some("/tmp/cache".to_string())).unwrap();
        assert_eq!(config.library_root, PathBuf::from("/tmp/cache/music"));

        let config = CatalogConfig::load_with(&settings, Some(String::new())).unwrap();
        assert_eq!(config.cache_root, PathBuf::from("/sdcard/cache"));
    }
}
