use std::fmt;

use once_cell_regex::regex;

use crate::{
    matcher::{find_season_episode, find_year},
    normalize::{sanitize_title, SeasonEpisode},
    rules::NamingRules,
    split_extension,
};

const HDR_MARKERS: &[&str] = &["hdr", "hdr10", "hdr10plus"];
const UHD_MARKERS: &[&str] = &["2160p", "[4k", "-4k"];

/// Quality markers carried over into the canonical name.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct QualityFlags {
    pub uhd: bool,
    pub hdr: bool,
}

impl QualityFlags {
    /// Look for quality markers anywhere in a file name.
    ///
    /// Besides release markers like `2160p`, the markers written into
    /// canonical names (`[4k`, `-4K`) are recognized too, so a canonical
    /// name classifies to the same flags it was built from.
    pub fn detect(name: &str) -> QualityFlags {
        let lower = name.to_lowercase();
        QualityFlags {
            uhd: UHD_MARKERS.iter().any(|m| lower.contains(m)),
            hdr: HDR_MARKERS.iter().any(|m| lower.contains(m)),
        }
    }

    pub fn is_empty(&self) -> bool {
        !self.uhd && !self.hdr
    }

    pub fn labels(&self) -> Vec<&'static str> {
        let mut labels = Vec::new();
        if self.uhd {
            labels.push("4K");
        }
        if self.hdr {
            labels.push("hdr");
        }
        labels
    }

    /// `_[4k_hdr]` style suffix for episode names.
    pub fn show_suffix(&self) -> String {
        if self.is_empty() {
            return String::new();
        }
        format!("_[{}]", self.labels().join("_").to_lowercase())
    }

    /// `-4K-hdr` style suffix for movie names.
    pub fn movie_suffix(&self) -> String {
        self.labels().iter().map(|l| format!("-{}", l)).collect()
    }
}

impl fmt::Display for QualityFlags {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{{{}}}", self.labels().join(", "))
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShowMedia {
    /// Text in front of the season/episode marker, as found.
    pub raw_title: String,
    /// `raw_title` after [`sanitize_title`]; the show index key.
    pub title: String,
    pub season_episode: SeasonEpisode,
    pub alternate_numbering: bool,
    pub flags: QualityFlags,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MovieMedia {
    /// Text in front of the year, as found.
    pub raw_title: String,
    pub title: String,
    pub year: u16,
    pub flags: QualityFlags,
}

/// What a file name turned out to describe.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParsedMedia {
    Show(ShowMedia),
    Movie(MovieMedia),
    Unparsed,
}

impl ParsedMedia {
    pub fn title(&self) -> Option<&str> {
        match self {
            ParsedMedia::Show(s) => Some(s.title.as_str()),
            ParsedMedia::Movie(m) => Some(m.title.as_str()),
            ParsedMedia::Unparsed => None,
        }
    }

    /// Canonical name without extension, if there is a usable title.
    pub fn canonical_stem(&self) -> Option<String> {
        match self {
            ParsedMedia::Show(s) if !s.title.is_empty() => Some(
                format!("{}_{}{}", s.title, s.season_episode, s.flags.show_suffix()).to_lowercase(),
            ),
            ParsedMedia::Movie(m) if !m.title.is_empty() => Some(format!(
                "{}_({}){}",
                m.title,
                m.year,
                m.flags.movie_suffix()
            )),
            _ => None,
        }
    }

    pub fn canonical_filename(&self, extension: Option<&str>) -> Option<String> {
        let stem = self.canonical_stem()?;
        Some(match extension {
            Some(ext) => format!("{}.{}", stem, ext.to_lowercase()),
            None => stem,
        })
    }
}

/// Is this file name already in the target naming scheme?
///
/// Episodes look like `title_words_s01e02.ext`, optionally with a
/// `_[4k_hdr]` flag block before the extension. Movies look like
/// `title_words_(1999).ext`, optionally with `-4K` and then `-hdr` after the
/// year. The check is case-sensitive.
pub fn is_canonical(file_name: &str) -> bool {
    let show = regex!(
        r"^[a-z0-9]+(?:_[a-z0-9]+)*_s[0-9]{2,4}e[0-9]{2,3}(?:_\[[A-Za-z0-9_]+\])?\.[a-z0-9]+$"
    );
    let movie = regex!(r"^[a-z0-9]+(?:_[a-z0-9]+)*_\([0-9]{4}\)(?:-4K)?(?:-hdr)?\.[a-z0-9]+$");
    show.is_match(file_name) || movie.is_match(file_name)
}

/// Turn separators and brackets into underscores so the year splits cleanly
/// from the title.
fn clean_movie_name(lower: &str) -> String {
    lower
        .chars()
        .filter(|c| *c != '\'')
        .map(|c| match c {
            '.' | ' ' | '(' | ')' | '[' | ']' => '_',
            c => c,
        })
        .collect()
}

/// Decides whether a file name is an episode or a movie and pulls out the
/// pieces needed to name it.
#[derive(Debug, Clone, Default)]
pub struct Classifier {
    rules: NamingRules,
}

impl Classifier {
    pub fn new(rules: NamingRules) -> Classifier {
        Classifier { rules }
    }

    pub fn rules(&self) -> &NamingRules {
        &self.rules
    }

    /// Classify a file name with its extension already removed.
    ///
    /// Season/episode markers are always looked for before a year, so a name
    /// carrying both is an episode.
    pub fn classify(&self, stem: &str) -> ParsedMedia {
        let lower = stem.to_lowercase();
        let flags = QualityFlags::detect(&lower);

        if let Some(m) = find_season_episode(&lower) {
            let raw_title = lower[..m.start].trim().to_string();
            let title = sanitize_title(&raw_title, self.rules.tokens());
            return ParsedMedia::Show(ShowMedia {
                raw_title,
                title,
                season_episode: m.season_episode,
                alternate_numbering: m.is_alternate(),
                flags,
            });
        }

        let cleaned = clean_movie_name(&lower);
        if let Some(year) = find_year(&cleaned, self.rules.years()) {
            let year_text = year.to_string();
            let raw_title = cleaned
                .find(year_text.as_str())
                .map(|idx| cleaned[..idx].to_string())
                .unwrap_or_default();
            let title = sanitize_title(&raw_title, self.rules.tokens());
            return ParsedMedia::Movie(MovieMedia {
                raw_title,
                title,
                year,
                flags,
            });
        }

        log::debug!("no season/episode or year in {:?}", stem);
        ParsedMedia::Unparsed
    }

    /// Classify a full file name, extension included.
    pub fn classify_file(&self, file_name: &str) -> ParsedMedia {
        self.classify(split_extension(file_name).0)
    }

    /// The name `file_name` should be renamed to, if it can be classified.
    pub fn canonical_filename(&self, file_name: &str) -> Option<String> {
        let (stem, ext) = split_extension(file_name);
        self.classify(stem).canonical_filename(ext)
    }
}
