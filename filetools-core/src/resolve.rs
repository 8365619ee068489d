//! Work out where a file belongs in the library.
//!
//! Resolution never prompts. Where a human has to decide (adding an unknown
//! show, picking between several movie libraries) a [`Resolution`] variant
//! carrying everything needed to finish the job is handed back instead.

use std::{
    collections::BTreeSet,
    path::{Path, PathBuf},
};

use crate::{
    classify::{Classifier, ParsedMedia},
    rules::{LibraryCategory, LibraryConfig},
    show_index::ShowIndex,
    split_extension,
};

const SPECIALS_FOLDER: &str = "specials";
const QUALITY_SUFFIXES: &[&str] = &["-4k", "-hdr"];

/// Per-season folder name under a show folder.
pub fn season_folder(season: u32) -> String {
    if season == 0 {
        SPECIALS_FOLDER.to_string()
    } else {
        format!("season_{:02}", season)
    }
}

/// Drop trailing `-4K` / `-hdr` tokens so every release of a movie shares a
/// folder.
pub fn strip_quality_suffix(stem: &str) -> &str {
    let mut stem = stem;
    loop {
        let lower = stem.to_lowercase();
        match QUALITY_SUFFIXES.iter().find(|s| lower.ends_with(*s)) {
            Some(suffix) => stem = &stem[..stem.len() - suffix.len()],
            None => return stem,
        }
    }
}

/// A movie that could go into any of several libraries.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MoviePlacement {
    pub folder: String,
    pub file_name: String,
}

impl MoviePlacement {
    pub fn destination(&self, library_root: &Path) -> PathBuf {
        library_root.join(&self.folder).join(&self.file_name)
    }
}

/// An episode of a show that is not in the index yet.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewShow {
    pub title: String,
    pub season_folder: String,
    pub file_name: String,
}

impl NewShow {
    /// `<library>/<network>/<title>`
    pub fn show_dir(&self, library_root: &Path, network: &str) -> PathBuf {
        library_root.join(network).join(&self.title)
    }

    pub fn destination(&self, library_root: &Path, network: &str) -> PathBuf {
        self.show_dir(library_root, network)
            .join(&self.season_folder)
            .join(&self.file_name)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Resolution {
    /// Episode of an indexed show.
    Show(PathBuf),
    /// Movie, with exactly one movie library configured.
    Movie(PathBuf),
    /// Movie, with a library still to be picked.
    ChooseMovieLibrary(MoviePlacement),
    /// Episode of a show that has to be added first.
    NewShow(NewShow),
    /// Episode of a show that was already turned down during this run.
    Rejected(String),
    /// No library of the needed kind is configured.
    NoLibrary(LibraryCategory),
    Unparseable,
}

/// Resolves destinations for one orchestration run.
///
/// Holds the show index and remembers the titles turned down during the run,
/// so a batch of episodes only asks about a new show once.
#[derive(Debug, Clone)]
pub struct Resolver {
    classifier: Classifier,
    libraries: LibraryConfig,
    index: ShowIndex,
    rejected: BTreeSet<String>,
}

impl Resolver {
    pub fn new(classifier: Classifier, libraries: LibraryConfig, index: ShowIndex) -> Resolver {
        Resolver {
            classifier,
            libraries,
            index,
            rejected: BTreeSet::new(),
        }
    }

    pub fn classifier(&self) -> &Classifier {
        &self.classifier
    }

    pub fn libraries(&self) -> &LibraryConfig {
        &self.libraries
    }

    pub fn index(&self) -> &ShowIndex {
        &self.index
    }

    /// Swap in a freshly rebuilt index.
    pub fn replace_index(&mut self, index: ShowIndex) {
        self.index = index;
    }

    pub fn reject<S: Into<String>>(&mut self, title: S) {
        self.rejected.insert(title.into());
    }

    pub fn is_rejected(&self, title: &str) -> bool {
        self.rejected.contains(title)
    }

    pub fn resolve(&self, file_name: &str) -> Resolution {
        let parsed = self.classifier.classify_file(file_name);
        self.resolve_parsed(&parsed, file_name)
    }

    pub fn resolve_parsed(&self, parsed: &ParsedMedia, file_name: &str) -> Resolution {
        let ext = split_extension(file_name).1;
        let canonical = match parsed.canonical_filename(ext) {
            Some(c) => c,
            None => return Resolution::Unparseable,
        };

        match parsed {
            ParsedMedia::Show(show) => {
                if self.is_rejected(&show.title) {
                    return Resolution::Rejected(show.title.clone());
                }
                let season = season_folder(show.season_episode.season);
                if let Some(show_dir) = self.index.get(&show.title) {
                    return Resolution::Show(show_dir.join(season).join(canonical));
                }
                if self.libraries.shows().is_empty() {
                    return Resolution::NoLibrary(LibraryCategory::Shows);
                }
                Resolution::NewShow(NewShow {
                    title: show.title.clone(),
                    season_folder: season,
                    file_name: canonical,
                })
            }
            ParsedMedia::Movie(_) => {
                let stem = split_extension(&canonical).0;
                let placement = MoviePlacement {
                    folder: strip_quality_suffix(stem).to_string(),
                    file_name: file_name.to_string(),
                };
                match self.libraries.movies() {
                    [] => Resolution::NoLibrary(LibraryCategory::Movies),
                    [only] => Resolution::Movie(placement.destination(only.path())),
                    _ => Resolution::ChooseMovieLibrary(placement),
                }
            }
            ParsedMedia::Unparsed => Resolution::Unparseable,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rules::{Library, NamingRules};

    fn libraries(movie_roots: usize) -> LibraryConfig {
        let movies = (0..movie_roots)
            .map(|i| Library::new(format!("movies{}", i), format!("/media/movies{}", i)))
            .collect();
        LibraryConfig::new(
            vec![
                Library::new("Television", "/media/tv"),
                Library::new("Documentaries", "/media/docs"),
            ],
            movies,
            vec![],
        )
        .unwrap()
    }

    fn resolver(movie_roots: usize) -> Resolver {
        let index: ShowIndex = [("the_mandalorian", "/media/tv/disney/the_mandalorian")]
            .into_iter()
            .collect();
        Resolver::new(
            Classifier::new(NamingRules::default()),
            libraries(movie_roots),
            index,
        )
    }

    #[test]
    fn season_folders() {
        assert_eq!(season_folder(0), "specials");
        assert_eq!(season_folder(1), "season_01");
        assert_eq!(season_folder(12), "season_12");
        assert_eq!(season_folder(2024), "season_2024");
    }

    #[test]
    fn quality_suffixes_are_stripped() {
        assert_eq!(strip_quality_suffix("dune_(2021)-4K-hdr"), "dune_(2021)");
        assert_eq!(strip_quality_suffix("dune_(2021)-hdr"), "dune_(2021)");
        assert_eq!(strip_quality_suffix("dune_(2021)-4k"), "dune_(2021)");
        assert_eq!(strip_quality_suffix("dune_(2021)"), "dune_(2021)");
    }

    #[test]
    fn indexed_show_resolves() {
        let r = resolver(1);
        assert_eq!(
            r.resolve("The.Mandalorian.S01E01.Chapter.1.2160p.WEBRip.mkv"),
            Resolution::Show(PathBuf::from(
                "/media/tv/disney/the_mandalorian/season_01/the_mandalorian_s01e01_[4k].mkv"
            ))
        );
    }

    #[test]
    fn specials_go_to_specials_folder() {
        let r = resolver(1);
        assert_eq!(
            r.resolve("the_mandalorian_s00e02.mkv"),
            Resolution::Show(PathBuf::from(
                "/media/tv/disney/the_mandalorian/specials/the_mandalorian_s00e02.mkv"
            ))
        );
    }

    #[test]
    fn unknown_show_needs_a_decision() {
        let r = resolver(1);
        match r.resolve("Andor.S01E03.mkv") {
            Resolution::NewShow(new) => {
                assert_eq!(new.title, "andor");
                assert_eq!(new.season_folder, "season_01");
                assert_eq!(new.file_name, "andor_s01e03.mkv");
                assert_eq!(
                    new.destination(Path::new("/media/tv"), "disney"),
                    PathBuf::from("/media/tv/disney/andor/season_01/andor_s01e03.mkv")
                );
            }
            other => panic!("expected new show, got {:?}", other),
        }
    }

    #[test]
    fn rejected_show_is_not_asked_again() {
        let mut r = resolver(1);
        assert!(matches!(r.resolve("andor_s01e01.mkv"), Resolution::NewShow(_)));
        r.reject("andor");
        assert_eq!(
            r.resolve("andor_s01e02.mkv"),
            Resolution::Rejected("andor".to_string())
        );
    }

    #[test]
    fn rebuilt_index_is_used() {
        let mut r = resolver(1);
        let mut index = r.index().clone();
        index.insert("andor", "/media/tv/disney/andor");
        r.replace_index(index);
        assert_eq!(
            r.resolve("andor_s01e02.mkv"),
            Resolution::Show(PathBuf::from(
                "/media/tv/disney/andor/season_01/andor_s01e02.mkv"
            ))
        );
    }

    #[test]
    fn single_movie_library_needs_no_choice() {
        let r = resolver(1);
        assert_eq!(
            r.resolve("dune_(2021)-4K-hdr.mkv"),
            Resolution::Movie(PathBuf::from(
                "/media/movies0/dune_(2021)/dune_(2021)-4K-hdr.mkv"
            ))
        );
    }

    #[test]
    fn several_movie_libraries_need_a_choice() {
        let r = resolver(2);
        match r.resolve("alice_doesnt_live_here_anymore_(1974).mp4") {
            Resolution::ChooseMovieLibrary(p) => {
                assert_eq!(p.folder, "alice_doesnt_live_here_anymore_(1974)");
                assert_eq!(
                    p.destination(Path::new("/media/movies1")),
                    PathBuf::from(
                        "/media/movies1/alice_doesnt_live_here_anymore_(1974)/alice_doesnt_live_here_anymore_(1974).mp4"
                    )
                );
            }
            other => panic!("expected library choice, got {:?}", other),
        }
    }

    #[test]
    fn missing_libraries() {
        let r = resolver(0);
        assert_eq!(
            r.resolve("dune_(2021).mkv"),
            Resolution::NoLibrary(LibraryCategory::Movies)
        );

        let r = Resolver::new(
            Classifier::default(),
            LibraryConfig::default(),
            ShowIndex::new(),
        );
        assert_eq!(
            r.resolve("andor_s01e01.mkv"),
            Resolution::NoLibrary(LibraryCategory::Shows)
        );
    }

    #[test]
    fn unparseable_files() {
        let r = resolver(1);
        assert_eq!(r.resolve("random_file_no_markers.mkv"), Resolution::Unparseable);
        assert_eq!(r.resolve("S01E01.mkv"), Resolution::Unparseable);
    }
}
