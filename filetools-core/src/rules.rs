use std::{
    collections::BTreeSet,
    fmt,
    path::{Path, PathBuf},
};

use serde::{Deserialize, Serialize};

use crate::split_extension;

pub const DEFAULT_YEAR_MIN: u16 = 1900;
pub const DEFAULT_YEAR_MAX: u16 = 2030;

#[derive(Debug, thiserror::Error)]
pub enum RulesError {
    #[error("year range is inverted: min {min} > max {max}")]
    InvertedYearRange { min: u16, max: u16 },
    #[error("library {name:?} has an empty path")]
    EmptyLibraryPath { name: String },
}

/// Inclusive range of years accepted when looking for a release year.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct YearRange {
    min: u16,
    max: u16,
}

impl YearRange {
    pub fn new(min: u16, max: u16) -> Result<YearRange, RulesError> {
        if min > max {
            return Err(RulesError::InvertedYearRange { min, max });
        }
        Ok(YearRange { min, max })
    }

    pub fn min(&self) -> u16 {
        self.min
    }

    pub fn max(&self) -> u16 {
        self.max
    }

    pub fn contains(&self, year: u16) -> bool {
        self.min <= year && year <= self.max
    }
}

impl Default for YearRange {
    fn default() -> Self {
        YearRange {
            min: DEFAULT_YEAR_MIN,
            max: DEFAULT_YEAR_MAX,
        }
    }
}

/// Normalize a configured extension: lowercase, no leading dot.
fn normalize_extension(ext: &str) -> String {
    ext.trim().trim_start_matches('.').to_lowercase()
}

fn extension_set<I, S>(extensions: I) -> BTreeSet<String>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    extensions
        .into_iter()
        .map(|e| normalize_extension(e.as_ref()))
        .filter(|e| !e.is_empty())
        .collect()
}

fn keyword_list<I, S>(keywords: I) -> Vec<String>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    keywords
        .into_iter()
        .map(|k| k.as_ref().to_lowercase())
        .filter(|k| !k.is_empty())
        .collect()
}

/// File handling and naming rules.
///
/// Built once from settings and then shared read-only by every component.
/// Extensions are stored lowercase without the leading dot. Keywords and
/// cleanup tokens are stored lowercase.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NamingRules {
    valid_extensions: BTreeSet<String>,
    excluded_extensions: BTreeSet<String>,
    deletable_extensions: BTreeSet<String>,
    downloading_indicators: Vec<String>,
    ignore_keywords: Vec<String>,
    cleanup_tokens: Vec<String>,
    year_range: YearRange,
}

impl NamingRules {
    pub fn valid_extensions<I, S>(mut self, extensions: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.valid_extensions = extension_set(extensions);
        self
    }

    pub fn excluded_extensions<I, S>(mut self, extensions: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.excluded_extensions = extension_set(extensions);
        self
    }

    pub fn deletable_extensions<I, S>(mut self, extensions: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.deletable_extensions = extension_set(extensions);
        self
    }

    pub fn downloading_indicators<I, S>(mut self, indicators: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.downloading_indicators = keyword_list(indicators);
        self
    }

    pub fn ignore_keywords<I, S>(mut self, keywords: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.ignore_keywords = keyword_list(keywords);
        self
    }

    /// Tokens are stored lowercased, since titles are lowercased before
    /// cleanup.
    pub fn cleanup_tokens<I, S>(mut self, tokens: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.cleanup_tokens = keyword_list(tokens);
        self
    }

    pub fn year_range(mut self, year_range: YearRange) -> Self {
        self.year_range = year_range;
        self
    }

    pub fn years(&self) -> YearRange {
        self.year_range
    }

    pub fn tokens(&self) -> &[String] {
        &self.cleanup_tokens
    }

    fn extension_of(file_name: &str) -> Option<String> {
        split_extension(file_name).1.map(|e| e.to_lowercase())
    }

    /// A video file we are willing to rename and move.
    pub fn is_video(&self, file_name: &str) -> bool {
        Self::extension_of(file_name)
            .map(|ext| {
                self.valid_extensions.contains(&ext) && !self.excluded_extensions.contains(&ext)
            })
            .unwrap_or(false)
    }

    pub fn is_deletable(&self, file_name: &str) -> bool {
        Self::extension_of(file_name)
            .map(|ext| self.deletable_extensions.contains(&ext))
            .unwrap_or(false)
    }

    /// Does this file name show that its release is still being downloaded?
    pub fn is_downloading(&self, file_name: &str) -> bool {
        let lower = file_name.to_lowercase();
        self.downloading_indicators
            .iter()
            .any(|indicator| lower.contains(indicator.as_str()))
    }

    /// Samples, trailers and the like.
    ///
    /// A keyword must appear as a whole token, where tokens are separated by
    /// `.`, `-` or whitespace. Underscores do not separate tokens, so a
    /// canonical title such as `the_sample_(2020)` is never mistaken for junk.
    pub fn is_ignored(&self, file_name: &str) -> bool {
        let lower = file_name.to_lowercase();
        lower
            .split(|c: char| c == '.' || c == '-' || c.is_whitespace())
            .any(|token| self.ignore_keywords.iter().any(|k| k == token))
    }

    pub fn is_junk(&self, file_name: &str) -> bool {
        self.is_deletable(file_name) || self.is_ignored(file_name)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LibraryCategory {
    Shows,
    Movies,
    Music,
}

impl fmt::Display for LibraryCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LibraryCategory::Shows => write!(f, "shows"),
            LibraryCategory::Movies => write!(f, "movies"),
            LibraryCategory::Music => write!(f, "music"),
        }
    }
}

/// A labelled library root directory.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Library {
    pub name: String,
    pub path: PathBuf,
}

impl Library {
    pub fn new<S: Into<String>, P: Into<PathBuf>>(name: S, path: P) -> Library {
        Library {
            name: name.into(),
            path: path.into(),
        }
    }

    pub fn path(&self) -> &Path {
        self.path.as_path()
    }
}

/// Library roots per category, in configuration order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LibraryConfig {
    shows: Vec<Library>,
    movies: Vec<Library>,
    music: Vec<Library>,
}

impl LibraryConfig {
    pub fn new(
        shows: Vec<Library>,
        movies: Vec<Library>,
        music: Vec<Library>,
    ) -> Result<LibraryConfig, RulesError> {
        for lib in shows.iter().chain(movies.iter()).chain(music.iter()) {
            if lib.path.as_os_str().is_empty() {
                return Err(RulesError::EmptyLibraryPath {
                    name: lib.name.clone(),
                });
            }
        }
        Ok(LibraryConfig {
            shows,
            movies,
            music,
        })
    }

    pub fn libraries(&self, category: LibraryCategory) -> &[Library] {
        match category {
            LibraryCategory::Shows => &self.shows,
            LibraryCategory::Movies => &self.movies,
            LibraryCategory::Music => &self.music,
        }
    }

    pub fn shows(&self) -> &[Library] {
        &self.shows
    }

    pub fn movies(&self) -> &[Library] {
        &self.movies
    }

    pub fn get(&self, category: LibraryCategory, name: &str) -> Option<&Library> {
        self.libraries(category).iter().find(|l| l.name == name)
    }
}
