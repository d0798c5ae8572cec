//! Library browsing.
//!
//! Turns the cached music folder into artists, directories and entries.

pub mod browse;
pub mod entry;
pub mod names;
pub mod sort;

pub use browse::CatalogBrowser;
pub use entry::{EntryFactory, EntryVariant};
pub use sort::SortMode;
