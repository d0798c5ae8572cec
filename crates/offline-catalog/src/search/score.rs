//! Token overlap scoring and candidate classification.

use crate::library::entry::parse_track;
use crate::library::names::resolve_name;
use crate::search::traverse::LibraryNode;

/// Lower-cased whitespace tokens
pub fn tokenize(text: &str) -> Vec<String> {
    text.split_whitespace().map(str::to_lowercase).collect()
}

/// Number of query tokens that equal some token of `name`.
///
/// Repeated query tokens count once each. Zero means no match.
pub fn match_criteria(query: &str, name: &str) -> u32 {
    let name_tokens = tokenize(name);
    tokenize(query)
        .iter()
        .filter(|q| name_tokens.contains(*q))
        .count() as u32
}

/// What a library node can be returned as
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Candidate {
    /// Top-level folder
    Artist { name: String },
    /// Any folder below an artist
    Album { artist: String, name: String },
    /// A file below an artist; `album` is the song's own name when it sits
    /// directly in the artist folder
    Song {
        artist: String,
        album: String,
        name: String,
    },
}

impl Candidate {
    /// Name the query is scored against; songs drop their track prefix
    pub fn name(&self) -> &str {
        match self {
            Candidate::Artist { name } | Candidate::Album { name, .. } => name.as_str(),
            Candidate::Song { name, .. } => parse_track(name).1,
        }
    }
}

/// Classify a node by its depth below the library root.
///
/// Loose files in the root and files that resolve to no display name are
/// not searchable.
pub fn classify(node: &LibraryNode) -> Option<Candidate> {
    let name = resolve_name(&node.file_name, node.is_dir)?;

    match (node.ancestors.as_slice(), node.is_dir) {
        ([], true) => Some(Candidate::Artist { name }),
        ([], false) => None,
        ([artist, ..], true) => Some(Candidate::Album {
            artist: artist.clone(),
            name,
        }),
        ([artist], false) => Some(Candidate::Song {
            artist: artist.clone(),
            album: name.clone(),
            name,
        }),
        ([artist, .., album], false) => Some(Candidate::Song {
            artist: artist.clone(),
            album: album.clone(),
            name,
        }),
    }
}
