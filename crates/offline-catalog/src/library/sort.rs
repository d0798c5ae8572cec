//! Sort orders for artist and directory listings.

use std::cmp::Ordering;

use offline_core::{Artist, CatalogEntry};

/// Leading words ignored by the smart order
pub const IGNORED_ARTICLES: &[&str] = &["the", "a", "an", "el", "la", "los", "las", "le", "les"];

/// Listing order selected by the `custom_sort_enabled` preference
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortMode {
    /// Case-insensitive by name
    Alphabetical,
    /// Leading articles and punctuation ignored; names without a letter go last;
    /// songs ordered by track number
    #[default]
    Smart,
}

impl SortMode {
    pub fn from_custom_sort(enabled: bool) -> Self {
        if enabled {
            SortMode::Smart
        } else {
            SortMode::Alphabetical
        }
    }
}

/// Smart comparison key: (group, name without punctuation and leading article)
pub fn smart_key(name: &str) -> (u8, String) {
    let lower = name.to_lowercase();
    let mut key = lower.trim_start_matches(|c: char| !c.is_alphanumeric());

    for article in IGNORED_ARTICLES {
        if let Some(rest) = key.strip_prefix(article) {
            if rest.starts_with(' ') {
                key = rest.trim_start();
                break;
            }
        }
    }

    let group = if key.starts_with(char::is_alphabetic) { 0 } else { 1 };
    (group, key.to_string())
}

fn compare_names(a: &str, b: &str, mode: SortMode) -> Ordering {
    match mode {
        SortMode::Alphabetical => a.to_lowercase().cmp(&b.to_lowercase()),
        SortMode::Smart => smart_key(a).cmp(&smart_key(b)),
    }
}

pub fn sort_artists(artists: &mut [Artist], mode: SortMode) {
    artists.sort_by(|a, b| compare_names(&a.name, &b.name, mode));
}

/// Directories first, then files
pub fn sort_entries(entries: &mut [CatalogEntry], mode: SortMode) {
    entries.sort_by(|a, b| {
        b.is_directory
            .cmp(&a.is_directory)
            .then_with(|| match mode {
                SortMode::Smart if !a.is_directory => a
                    .track
                    .unwrap_or(u32::MAX)
                    .cmp(&b.track.unwrap_or(u32::MAX)),
                _ => Ordering::Equal,
            })
            .then_with(|| compare_names(&a.title, &b.title, mode))
    });
}
