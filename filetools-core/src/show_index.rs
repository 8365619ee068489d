//! Show title -> library folder index.
//!
//! Persisted as a flat sectioned text file:
//!
//! ```text
//! [Shows]
//! the_mandalorian = /media/tv/disney/the_mandalorian
//! ```
//!
//! Keys are case-folded on the way in, so lookups with a sanitized (already
//! lowercase) title always hit. In the file, `\` and `=` in a key, and a
//! leading `[`, `#` or `;`, are escaped with a backslash. Values are written
//! as-is.

use std::{
    collections::BTreeMap,
    path::{Path, PathBuf},
};

pub const SHOWS_SECTION: &str = "Shows";

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ShowIndex {
    shows: BTreeMap<String, PathBuf>,
}

impl ShowIndex {
    pub fn new() -> ShowIndex {
        ShowIndex::default()
    }

    pub fn insert<S: AsRef<str>, P: Into<PathBuf>>(&mut self, title: S, path: P) {
        self.shows
            .insert(title.as_ref().trim().to_lowercase(), path.into());
    }

    pub fn get(&self, title: &str) -> Option<&Path> {
        self.shows.get(title).map(|p| p.as_path())
    }

    pub fn contains(&self, title: &str) -> bool {
        self.shows.contains_key(title)
    }

    pub fn len(&self) -> usize {
        self.shows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.shows.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Path)> {
        self.shows.iter().map(|(k, v)| (k.as_str(), v.as_path()))
    }

    /// Read the index text format.
    ///
    /// Parsing never fails: comment lines, lines outside the `[Shows]`
    /// section and lines without a `key = value` shape are skipped.
    pub fn parse(text: &str) -> ShowIndex {
        let mut index = ShowIndex::new();
        let mut in_shows = false;
        for (lineno, line) in text.lines().enumerate() {
            let line = line.trim();
            if line.is_empty() || line.starts_with('#') || line.starts_with(';') {
                continue;
            }
            if let Some(section) = line.strip_prefix('[').and_then(|l| l.strip_suffix(']')) {
                in_shows = section.trim() == SHOWS_SECTION;
                continue;
            }
            if !in_shows {
                continue;
            }
            match split_entry(line) {
                Some((key, value)) if !key.trim().is_empty() && !value.trim().is_empty() => {
                    index.insert(key, value.trim());
                }
                _ => log::warn!("ignoring malformed show index line {}: {:?}", lineno + 1, line),
            }
        }
        index
    }

    /// Write the index text format.
    pub fn render(&self) -> String {
        let mut out = format!("[{}]\n", SHOWS_SECTION);
        for (title, path) in &self.shows {
            out.push_str(&format!("{} = {}\n", escape_key(title), path.display()));
        }
        out.push('\n');
        out
    }
}

fn escape_key(key: &str) -> String {
    let mut out = String::with_capacity(key.len());
    for (i, c) in key.chars().enumerate() {
        if matches!(c, '\\' | '=') || (i == 0 && matches!(c, '[' | '#' | ';')) {
            out.push('\\');
        }
        out.push(c);
    }
    out
}

/// Split a `key = value` line at the first unescaped `=`.
fn split_entry(line: &str) -> Option<(String, &str)> {
    let mut key = String::new();
    let mut chars = line.char_indices();
    while let Some((i, c)) = chars.next() {
        match c {
            '\\' => key.push(chars.next().map_or('\\', |(_, escaped)| escaped)),
            '=' => return Some((key, &line[i + 1..])),
            _ => key.push(c),
        }
    }
    None
}

impl<S: AsRef<str>, P: Into<PathBuf>> FromIterator<(S, P)> for ShowIndex {
    fn from_iter<T: IntoIterator<Item = (S, P)>>(iter: T) -> Self {
        let mut index = ShowIndex::new();
        for (title, path) in iter {
            index.insert(title, path);
        }
        index
    }
}
