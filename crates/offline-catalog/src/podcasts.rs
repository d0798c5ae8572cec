//! Podcast channels with locally cached episodes.
//!
//! The podcast root holds channel lists: plain text files naming one channel
//! per line. Episodes live in `<library root>/<channel>`.

use log::debug;
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::{Path, PathBuf};

use offline_core::{CatalogResult, Directory, PodcastChannel};

use crate::library::browse::CatalogBrowser;
use crate::library::entry::{EntryVariant, EPISODE_STATUS_COMPLETED};
use crate::library::sort::SortMode;
use crate::scanner::list_children;

#[derive(Clone)]
pub struct PodcastResolver {
    podcast_root: PathBuf,
    library_root: PathBuf,
    browser: CatalogBrowser,
}

impl PodcastResolver {
    pub fn new(podcast_root: impl Into<PathBuf>, library_root: impl Into<PathBuf>, browser: CatalogBrowser) -> Self {
        Self {
            podcast_root: podcast_root.into(),
            library_root: library_root.into(),
            browser,
        }
    }

    /// Folder holding the cached episodes of a channel
    pub fn channel_dir(&self, channel_id: &str) -> PathBuf {
        self.library_root.join(channel_id)
    }

    /// Channels named in any channel list whose episode folder exists
    pub fn list_channels(&self) -> CatalogResult<Vec<PodcastChannel>> {
        let mut channels: Vec<PodcastChannel> = Vec::new();

        for list in list_children(&self.podcast_root) {
            if list.is_dir {
                continue;
            }

            for name in read_channel_list(&list.path)? {
                if channels.iter().any(|c| c.id == name) {
                    continue;
                }
                if !self.channel_dir(&name).exists() {
                    debug!("No cached episodes for podcast channel {}", name);
                    continue;
                }
                channels.push(PodcastChannel {
                    id: name.clone(),
                    name,
                    status: EPISODE_STATUS_COMPLETED.to_string(),
                });
            }
        }

        Ok(channels)
    }

    pub fn list_episodes(&self, channel_id: &str, mode: SortMode) -> Directory {
        self.browser
            .list_directory(&self.channel_dir(channel_id), mode, EntryVariant::Podcast)
    }
}

/// Channel names up to the end of the file or the first empty line
fn read_channel_list(path: &Path) -> CatalogResult<Vec<String>> {
    let reader = BufReader::new(File::open(path)?);
    let mut names = Vec::new();

    for line in reader.lines() {
        let line = line?;
        let name = line.trim_end_matches('\r');
        if name.is_empty() {
            break;
        }
        names.push(name.to_string());
    }

    Ok(names)
}
