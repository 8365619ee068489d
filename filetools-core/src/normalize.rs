use std::fmt;

use serde::{Deserialize, Serialize};

/// A season/episode pair, compared by value.
///
/// Renders as `s##e##`; wider numbers are never truncated, so season 2024
/// renders as `s2024e01`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct SeasonEpisode {
    pub season: u32,
    pub episode: u32,
}

impl SeasonEpisode {
    pub fn new(season: u32, episode: u32) -> SeasonEpisode {
        SeasonEpisode { season, episode }
    }

    pub fn is_special(&self) -> bool {
        self.season == 0
    }
}

impl fmt::Display for SeasonEpisode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "s{:02}e{:02}", self.season, self.episode)
    }
}

pub fn canonicalize_season_episode(season: u32, episode: u32) -> String {
    SeasonEpisode::new(season, episode).to_string()
}

/// "N of M" numbering always lands in season one.
pub fn fix_alternate_numbering(episode: u32) -> String {
    canonicalize_season_episode(1, episode)
}

/// One pass of the title cleanup pipeline.
fn sanitize_once(raw: &str, cleanup_tokens: &[String]) -> String {
    let mut title = raw.to_string();
    for token in cleanup_tokens {
        title = title.replace(token.as_str(), "");
    }

    let title = title.trim().trim_matches('.');

    let mut out = String::with_capacity(title.len());
    for c in title.chars() {
        match c {
            ' ' | '.' => out.push('_'),
            '\'' | ',' | '!' | '?' => {}
            _ => out.push(c),
        }
    }

    // "Title - Subtitle" has become "Title_-_Subtitle" by now
    let mut out = out.replace("_-_", "_").replace('-', "_");

    loop {
        let collapsed = out.replace("__", "_");
        let collapsed = collapsed.trim_matches('_');
        if collapsed == out {
            break;
        }
        out = collapsed.to_string();
    }

    out.to_lowercase()
}

/// Turn a free-text show or movie title into its canonical token form.
///
/// Cleanup tokens are removed verbatim (case-sensitive), the result is
/// trimmed of whitespace and dots, separators become underscores,
/// punctuation is dropped, underscore runs are collapsed and the whole thing
/// is lowercased. The pipeline is re-applied until its output stops
/// changing, so `sanitize_title(&sanitize_title(x)) == sanitize_title(x)`.
pub fn sanitize_title(raw: &str, cleanup_tokens: &[String]) -> String {
    let mut current = sanitize_once(raw, cleanup_tokens);
    loop {
        let next = sanitize_once(&current, cleanup_tokens);
        if next == current {
            return current;
        }
        current = next;
    }
}
