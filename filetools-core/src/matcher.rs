//! Locate season/episode designators and release years in noisy file names.
//!
//! Season/episode detection is an ordered list of [`EpisodeRule`]s. The first
//! rule that matches anywhere in the text wins and later rules are never
//! consulted, even if they would have matched further to the left.

use once_cell_regex::regex;

use crate::{normalize::SeasonEpisode, rules::YearRange};

/// One way of writing a season/episode designator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EpisodeRule {
    /// `1of4`, `2 of 10`: episode N of a single-season series.
    Alternate,
    /// `S01E02`, `s2024.e01`, `S01_E02`.
    Canonical,
    /// `1x02`.
    Compact,
    /// `Season 01 Episode 02`, `season.01.episode.02`.
    Verbose,
    /// `Season01Episode02`.
    VerboseJoined,
}

impl EpisodeRule {
    /// Precedence order used by [`find_season_episode`].
    pub const ORDER: [EpisodeRule; 5] = [
        EpisodeRule::Alternate,
        EpisodeRule::Canonical,
        EpisodeRule::Compact,
        EpisodeRule::Verbose,
        EpisodeRule::VerboseJoined,
    ];

    /// Try this rule alone against `text`.
    pub fn find(self, text: &str) -> Option<SeasonEpisodeMatch> {
        let caps = match self {
            EpisodeRule::Alternate => {
                regex!(r"(?i)\b([0-9]{1,2})\s*of\s*([0-9]{1,2})\b").captures(text)
            }
            EpisodeRule::Canonical => {
                regex!(r"(?i)(?:^|[\W_])s([0-9]{2,4})[\W_]*e([0-9]{2,3})(?:$|[\W_])")
                    .captures(text)
            }
            EpisodeRule::Compact => {
                regex!(r"(?i)(?:^|[\W_])([0-9]{1,2})x([0-9]{2})(?:$|[\W_])").captures(text)
            }
            EpisodeRule::Verbose => regex!(
                r"(?i)(?:^|[\W_])season[\W_]*?([0-9]{2,4})[\W_]*?episode[\W_]*?([0-9]{2,3})(?:$|[\W_])"
            )
            .captures(text),
            EpisodeRule::VerboseJoined => {
                regex!(r"(?i)(?:^|[\W_])season([0-9]{2,4})episode([0-9]{2,3})(?:$|[\W_])")
                    .captures(text)
            }
        }?;

        let whole = caps.get(0)?;
        let first: u32 = caps.get(1)?.as_str().parse().ok()?;
        let second: u32 = caps.get(2)?.as_str().parse().ok()?;

        // "N of M" only ever describes a single season, and M is not kept
        let season_episode = match self {
            EpisodeRule::Alternate => SeasonEpisode::new(1, first),
            _ => SeasonEpisode::new(first, second),
        };

        Some(SeasonEpisodeMatch {
            raw: whole.as_str().to_string(),
            start: whole.start(),
            season_episode,
            rule: self,
        })
    }

    pub fn is_alternate(self) -> bool {
        self == EpisodeRule::Alternate
    }
}

/// A season/episode designator found inside a larger string.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SeasonEpisodeMatch {
    /// The matched text, including any boundary characters consumed around it.
    pub raw: String,
    /// Byte offset of `raw` in the searched text.
    pub start: usize,
    pub season_episode: SeasonEpisode,
    pub rule: EpisodeRule,
}

impl SeasonEpisodeMatch {
    pub fn is_alternate(&self) -> bool {
        self.rule.is_alternate()
    }
}

/// Find a season/episode designator using the first rule in
/// [`EpisodeRule::ORDER`] that matches.
pub fn find_season_episode(text: &str) -> Option<SeasonEpisodeMatch> {
    let found = EpisodeRule::ORDER
        .iter()
        .find_map(|rule| rule.find(text));
    log::trace!("season/episode in {:?}: {:?}", text, found);
    found
}

/// Find the release year in `text`.
///
/// Candidates are runs of exactly four digits. Runs outside `years` are
/// dropped (this is what removes `2160` from `2160p`), and the rightmost
/// surviving candidate is returned.
pub fn find_year(text: &str, years: YearRange) -> Option<u16> {
    regex!(r"[0-9]+")
        .find_iter(text)
        .filter(|m| m.as_str().len() == 4)
        .filter_map(|m| m.as_str().parse::<u16>().ok())
        .filter(|y| years.contains(*y))
        .last()
}
