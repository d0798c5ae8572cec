//! Best-effort audio metadata loading using lofty.
//!
//! Loading never decides whether an entry exists: callers log and ignore
//! failures and keep the fields derived from the path.

use lofty::prelude::*;
use lofty::probe::Probe;
use std::path::Path;

use offline_core::CatalogEntry;

use crate::scanner::{ScanError, ScanResult};

/// Fields read from a file's audio properties and tags
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TrackMetadata {
    /// Duration in whole seconds
    pub duration: Option<u32>,
    /// Audio bit rate in kbps
    pub bit_rate: Option<u32>,
    pub artist: Option<String>,
    pub album: Option<String>,
    pub title: Option<String>,
}

impl TrackMetadata {
    /// Copy the playback properties onto an entry, leaving path-derived fields alone
    pub fn apply_to(&self, entry: &mut CatalogEntry) {
        if self.duration.is_some() {
            entry.duration = self.duration;
        }
        if self.bit_rate.is_some() {
            entry.bit_rate = self.bit_rate;
        }
    }
}

/// Reads metadata from a cached media file
pub trait MetadataLoader: Send + Sync {
    fn load(&self, path: &Path) -> ScanResult<TrackMetadata>;
}

/// Default loader backed by lofty
#[derive(Debug, Clone, Copy, Default)]
pub struct LoftyMetadataLoader;

impl MetadataLoader for LoftyMetadataLoader {
    fn load(&self, path: &Path) -> ScanResult<TrackMetadata> {
        if !path.exists() {
            return Err(ScanError::PathNotFound(path.display().to_string()));
        }

        let tagged_file = Probe::open(path)
            .map_err(|e| ScanError::Metadata(format!("Failed to open file: {}", e)))?
            .read()
            .map_err(|e| ScanError::Metadata(format!("Failed to read file: {}", e)))?;

        let properties = tagged_file.properties();
        let mut metadata = TrackMetadata {
            duration: u32::try_from(properties.duration().as_secs()).ok(),
            bit_rate: properties.audio_bitrate(),
            ..Default::default()
        };

        // Primary tag or first available
        if let Some(tag) = tagged_file
            .primary_tag()
            .or_else(|| tagged_file.first_tag())
        {
            metadata.artist = tag.artist().map(|s| s.to_string());
            metadata.album = tag.album().map(|s| s.to_string());
            metadata.title = tag.title().map(|s| s.to_string());
        }

        Ok(metadata)
    }
}
