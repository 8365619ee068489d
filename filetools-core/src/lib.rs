use std::path::PathBuf;

pub mod classify;
pub mod matcher;
pub mod normalize;
pub mod resolve;
pub mod rules;
pub mod show_index;

pub use classify::{is_canonical, Classifier, MovieMedia, ParsedMedia, QualityFlags, ShowMedia};
pub use normalize::{sanitize_title, SeasonEpisode};
pub use resolve::{Resolution, Resolver};
pub use rules::{Library, LibraryCategory, LibraryConfig, NamingRules, RulesError, YearRange};
pub use show_index::ShowIndex;

/// A directory listing entry, independent of how the listing was produced.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DirEntry {
    pub name: String,
    pub path: PathBuf,
    pub is_file: bool,
}

/// Split a file name into stem and extension.
///
/// Dotfiles such as `.hidden` have no extension, and neither does a name
/// ending in a bare dot.
pub fn split_extension(file_name: &str) -> (&str, Option<&str>) {
    match file_name.rsplit_once('.') {
        Some((stem, ext)) if !stem.is_empty() && !ext.is_empty() => (stem, Some(ext)),
        _ => (file_name, None),
    }
}
