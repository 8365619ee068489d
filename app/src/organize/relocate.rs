use std::{
    fs,
    path::{Path, PathBuf},
};

use filetools_core::{resolve::NewShow, sanitize_title, LibraryCategory, Resolution, Resolver};

use crate::{
    app::FiletoolsApp,
    mover::move_file,
    prompt::{Prompt, PromptError},
    scan, FiletoolsAppError,
};

#[derive(Debug, Default)]
pub struct MoveReport {
    pub moved: Vec<(PathBuf, PathBuf)>,
    pub already_present: Vec<PathBuf>,
    /// Show titles the user chose not to add.
    pub rejected: Vec<String>,
    pub unparsed: Vec<PathBuf>,
    /// Files with no library of the needed kind configured.
    pub unplaced: Vec<PathBuf>,
    /// Categories whose planned moves were not confirmed.
    pub declined: Vec<LibraryCategory>,
    pub failed: usize,
}

#[derive(Debug, Default)]
struct MovePlan {
    shows: Vec<(PathBuf, PathBuf)>,
    movies: Vec<(PathBuf, PathBuf)>,
}

/// Send every video file in `work_dir` to its library.
///
/// Unknown shows and the choice between several movie libraries are put to
/// the user. The planned moves are listed per category and only carried out
/// once confirmed.
pub fn move_to_libraries(
    app: &FiletoolsApp,
    work_dir: &Path,
    dry_run: bool,
    prompt: &mut dyn Prompt,
) -> Result<MoveReport, FiletoolsAppError> {
    let mut resolver = app.resolver(dry_run)?;
    let mut report = MoveReport::default();
    let mut plan = MovePlan::default();

    for file in scan::list_files(work_dir) {
        if !app.rules.is_video(&file.name) {
            continue;
        }
        if app.rules.is_ignored(&file.name) {
            log::debug!("skipping {}, ignored", file.name);
            continue;
        }
        log::debug!("processing {}", file.name);
        match resolver.resolve(&file.name) {
            Resolution::Show(dst) => plan.shows.push((file.path, dst)),
            Resolution::Movie(dst) => plan.movies.push((file.path, dst)),
            Resolution::ChooseMovieLibrary(placement) => {
                let libraries = resolver.libraries().movies();
                let names: Vec<String> = libraries.iter().map(|l| l.name.clone()).collect();
                let idx = prompt.ask_choice(
                    &format!("Select a movie library for {}:", file.name),
                    &names,
                )?;
                let root = libraries
                    .get(idx)
                    .ok_or_else(|| PromptError::NoOptions(file.name.clone()))?
                    .path();
                plan.movies.push((file.path, placement.destination(root)));
            }
            Resolution::NewShow(new_show) => {
                match add_show(app, &mut resolver, &new_show, dry_run, prompt) {
                    Ok(Some(dst)) => plan.shows.push((file.path, dst)),
                    Ok(None) => report.rejected.push(new_show.title),
                    Err(e) => {
                        log::warn!("unable to add show '{}': {}", new_show.title, e);
                        resolver.reject(new_show.title.as_str());
                        report.rejected.push(new_show.title);
                        report.failed += 1;
                    }
                }
            }
            Resolution::Rejected(title) => {
                log::debug!("skipping {}, {} was not added", file.name, title);
            }
            Resolution::NoLibrary(category) => {
                log::warn!("no {} library configured, leaving {}", category, file.name);
                report.unplaced.push(file.path);
            }
            Resolution::Unparseable => {
                log::warn!("unable to parse {:?}, leaving it in place", file.path);
                report.unparsed.push(file.path);
            }
        }
    }

    for (category, moves) in [
        (LibraryCategory::Shows, plan.shows),
        (LibraryCategory::Movies, plan.movies),
    ] {
        perform_moves(category, moves, dry_run, prompt, &mut report)?;
    }

    log::info!("moved {} files", report.moved.len());
    Ok(report)
}

/// Ask whether an unknown show should be added, and where.
///
/// Returns the episode's destination, or `None` when the user declines. A
/// declined title is remembered by the resolver for the rest of the run.
/// An error leaves the title unresolved; the caller rejects it.
fn add_show(
    app: &FiletoolsApp,
    resolver: &mut Resolver,
    new_show: &NewShow,
    dry_run: bool,
    prompt: &mut dyn Prompt,
) -> Result<Option<PathBuf>, FiletoolsAppError> {
    log::warn!("show '{}' does not exist", new_show.title);
    if !prompt.ask_yes_no(&format!("Do you want to add '{}'?", new_show.title), None)? {
        resolver.reject(new_show.title.as_str());
        return Ok(None);
    }

    let libraries = resolver.libraries().shows();
    let names: Vec<String> = libraries.iter().map(|l| l.name.clone()).collect();
    let idx = prompt.ask_choice(&format!("Which library is '{}' in?", new_show.title), &names)?;
    let root = libraries
        .get(idx)
        .ok_or_else(|| PromptError::NoOptions(new_show.title.clone()))?
        .path()
        .to_path_buf();

    let network = loop {
        let answer = prompt.ask_text("Please enter the network the show is on (e.g. HBO, BBC)")?;
        let network = normalize_network(&answer);
        if !network.is_empty() {
            break network;
        }
        log::warn!("a network is required");
    };

    let show_dir = new_show.show_dir(&root, &network);
    let season_dir = show_dir.join(&new_show.season_folder);
    if dry_run {
        log::info!("[dry run] making new show directory {:?}", season_dir);
        let mut index = resolver.index().clone();
        index.insert(&new_show.title, show_dir);
        resolver.replace_index(index);
    } else {
        log::info!("making new show directory {:?}", season_dir);
        fs::create_dir_all(&season_dir)?;
        resolver.replace_index(app.rebuild_index()?);
    }

    Ok(Some(season_dir.join(&new_show.file_name)))
}

/// A network name becomes a single directory level.
fn normalize_network(answer: &str) -> String {
    sanitize_title(&answer.replace(['/', '\\'], " "), &[])
}

fn perform_moves(
    category: LibraryCategory,
    moves: Vec<(PathBuf, PathBuf)>,
    dry_run: bool,
    prompt: &mut dyn Prompt,
    report: &mut MoveReport,
) -> Result<(), PromptError> {
    if moves.is_empty() {
        return Ok(());
    }

    log::info!("the following {} will be moved:", category);
    for (_, dst) in &moves {
        log::info!("{}", dst.display());
    }
    if !prompt.ask_yes_no(&format!("Do you want to move these {}?", category), None)? {
        log::info!("not moving {}", category);
        report.declined.push(category);
        return Ok(());
    }

    for (src, dst) in moves {
        if dst.exists() {
            log::info!("already present: {:?}", dst);
            report.already_present.push(dst);
            continue;
        }
        if dry_run {
            log::info!("[dry run] moving {:?} -> {:?}", src, dst);
            report.moved.push((src, dst));
            continue;
        }

        log::info!("moving {:?} -> {:?}", src, dst);
        let result = match dst.parent() {
            Some(parent) => fs::create_dir_all(parent).map_err(FiletoolsAppError::from),
            None => Ok(()),
        }
        .and_then(|_| move_file(&src, &dst).map_err(FiletoolsAppError::from));

        match result {
            Ok(_) => report.moved.push((src, dst)),
            Err(e) => {
                log::error!("failed to move {:?}: {}", src, e);
                report.failed += 1;
            }
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        app::tests::filetools_test_app,
        prompt::{
            scripted::{Answer, ScriptedPrompt},
            AssumeYes,
        },
    };

    fn touch(path: &Path) {
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(path, path.to_string_lossy().as_bytes()).unwrap();
    }

    #[test]
    fn indexed_show_is_moved() {
        let t = filetools_test_app(&["movies"]);
        fs::create_dir_all(t.path("tv/disney/the_mandalorian")).unwrap();
        touch(&t.work_dir().join("the_mandalorian_s01e01_[4k].mkv"));

        let mut prompt = ScriptedPrompt::new(vec![Answer::YesNo(true)]);
        let report = move_to_libraries(&t.app, &t.work_dir(), false, &mut prompt).unwrap();

        let dst = t.path("tv/disney/the_mandalorian/season_01/the_mandalorian_s01e01_[4k].mkv");
        assert_eq!(report.moved.len(), 1);
        assert!(dst.exists());
        assert!(!t.work_dir().join("the_mandalorian_s01e01_[4k].mkv").exists());
    }

    #[test]
    fn rejected_show_is_asked_once() {
        let t = filetools_test_app(&["movies"]);
        for ep in 1..=3 {
            touch(&t.work_dir().join(format!("andor_s01e0{}.mkv", ep)));
        }

        let mut prompt = ScriptedPrompt::new(vec![Answer::YesNo(false)]);
        let report = move_to_libraries(&t.app, &t.work_dir(), false, &mut prompt).unwrap();

        assert_eq!(prompt.asked().len(), 1);
        assert_eq!(report.rejected, vec!["andor".to_string()]);
        assert!(report.moved.is_empty());
        assert_eq!(fs::read_dir(t.work_dir()).unwrap().count(), 3);
    }

    #[test]
    fn new_show_is_added_once() {
        let t = filetools_test_app(&["movies"]);
        touch(&t.work_dir().join("andor_s01e01.mkv"));
        touch(&t.work_dir().join("andor_s01e02.mkv"));
        touch(&t.work_dir().join("andor_s00e01.mkv"));

        let mut prompt = ScriptedPrompt::new(vec![
            Answer::YesNo(true),
            Answer::Choice(0),
            Answer::Text("Disney Plus".to_string()),
            Answer::YesNo(true),
        ]);
        let report = move_to_libraries(&t.app, &t.work_dir(), false, &mut prompt).unwrap();

        assert_eq!(report.moved.len(), 3);
        assert_eq!(prompt.remaining(), 0);
        let show = t.path("tv/disney_plus/andor");
        assert!(show.join("season_01/andor_s01e01.mkv").exists());
        assert!(show.join("season_01/andor_s01e02.mkv").exists());
        assert!(show.join("specials/andor_s00e01.mkv").exists());

        let index = t.app.index_store.load().unwrap();
        assert_eq!(index.get("andor"), Some(show.as_path()));
    }

    #[test]
    fn movie_library_is_chosen() {
        let t = filetools_test_app(&["movies", "kids"]);
        touch(&t.work_dir().join("dune_(2021)-4K-hdr.mkv"));
        touch(&t.work_dir().join("dune_(2021).mkv"));

        let mut prompt = ScriptedPrompt::new(vec![
            Answer::Choice(1),
            Answer::Choice(1),
            Answer::YesNo(true),
        ]);
        let report = move_to_libraries(&t.app, &t.work_dir(), false, &mut prompt).unwrap();

        assert_eq!(report.moved.len(), 2);
        assert!(t.path("kids/dune_(2021)/dune_(2021)-4K-hdr.mkv").exists());
        assert!(t.path("kids/dune_(2021)/dune_(2021).mkv").exists());
    }

    #[test]
    fn declined_moves_stay() {
        let t = filetools_test_app(&["movies"]);
        touch(&t.work_dir().join("heat_(1995).mkv"));

        let mut prompt = ScriptedPrompt::new(vec![Answer::YesNo(false)]);
        let report = move_to_libraries(&t.app, &t.work_dir(), false, &mut prompt).unwrap();

        assert_eq!(report.declined, vec![LibraryCategory::Movies]);
        assert!(t.work_dir().join("heat_(1995).mkv").exists());
    }

    #[test]
    fn existing_destination_is_already_present() {
        let t = filetools_test_app(&["movies"]);
        touch(&t.work_dir().join("heat_(1995).mkv"));
        fs::create_dir_all(t.path("movies/heat_(1995)")).unwrap();
        fs::write(t.path("movies/heat_(1995)/heat_(1995).mkv"), b"keep").unwrap();

        let mut prompt = ScriptedPrompt::new(vec![Answer::YesNo(true)]);
        let report = move_to_libraries(&t.app, &t.work_dir(), false, &mut prompt).unwrap();

        assert_eq!(report.already_present.len(), 1);
        assert_eq!(report.failed, 0);
        assert!(t.work_dir().join("heat_(1995).mkv").exists());
        assert_eq!(
            fs::read(t.path("movies/heat_(1995)/heat_(1995).mkv")).unwrap(),
            b"keep"
        );
    }

    #[test]
    fn unparsed_and_unplaced_files_stay() {
        let t = filetools_test_app(&[]);
        touch(&t.work_dir().join("random_file_no_markers.mkv"));
        touch(&t.work_dir().join("heat_(1995).mkv"));
        touch(&t.work_dir().join("notes.txt"));

        let mut prompt = ScriptedPrompt::new(vec![]);
        let report = move_to_libraries(&t.app, &t.work_dir(), false, &mut prompt).unwrap();

        assert_eq!(report.unparsed.len(), 1);
        assert_eq!(report.unplaced.len(), 1);
        assert!(prompt.asked().is_empty());
        assert_eq!(fs::read_dir(t.work_dir()).unwrap().count(), 3);
    }

    #[test]
    fn normalize_network_names() {
        assert_eq!(normalize_network("  BBC Two "), "bbc_two");
        assert_eq!(normalize_network("HBO"), "hbo");
        assert_eq!(normalize_network("   "), "");
        assert_eq!(normalize_network("Disney/Plus"), "disney_plus");
        assert_eq!(normalize_network("..\\hbo"), "hbo");
        assert_eq!(normalize_network("../.."), "");
    }

    #[test]
    fn network_with_separator_stays_one_level() {
        let t = filetools_test_app(&["movies"]);
        touch(&t.work_dir().join("andor_s01e01.mkv"));

        let mut prompt = ScriptedPrompt::new(vec![
            Answer::YesNo(true),
            Answer::Choice(0),
            Answer::Text("Disney/Plus".to_string()),
            Answer::YesNo(true),
        ]);
        let report = move_to_libraries(&t.app, &t.work_dir(), false, &mut prompt).unwrap();

        assert_eq!(report.moved.len(), 1);
        let show = t.path("tv/disney_plus/andor");
        assert!(show.join("season_01/andor_s01e01.mkv").exists());
        let index = t.app.index_store.load().unwrap();
        assert_eq!(index.get("andor"), Some(show.as_path()));
    }

    #[test]
    fn assume_yes_keeps_going_past_unknown_shows() {
        let t = filetools_test_app(&["movies"]);
        fs::create_dir_all(t.path("tv/disney/the_mandalorian")).unwrap();
        touch(&t.work_dir().join("andor_s01e01.mkv"));
        touch(&t.work_dir().join("andor_s01e02.mkv"));
        touch(&t.work_dir().join("the_mandalorian_s01e01.mkv"));
        touch(&t.work_dir().join("heat_(1995).mkv"));

        let report = move_to_libraries(&t.app, &t.work_dir(), false, &mut AssumeYes).unwrap();

        assert_eq!(report.rejected, vec!["andor".to_string()]);
        assert_eq!(report.failed, 1);
        assert_eq!(report.moved.len(), 2);
        assert!(t
            .path("tv/disney/the_mandalorian/season_01/the_mandalorian_s01e01.mkv")
            .exists());
        assert!(t.path("movies/heat_(1995)/heat_(1995).mkv").exists());
        assert!(t.work_dir().join("andor_s01e01.mkv").exists());
        assert!(t.work_dir().join("andor_s01e02.mkv").exists());
    }

    #[test]
    fn samples_are_not_moved() {
        let t = filetools_test_app(&["movies"]);
        fs::create_dir_all(t.path("tv/disney/the_mandalorian")).unwrap();
        touch(&t.work_dir().join("the_mandalorian_s01e01.sample.mkv"));

        let mut prompt = ScriptedPrompt::new(vec![]);
        let report = move_to_libraries(&t.app, &t.work_dir(), false, &mut prompt).unwrap();

        assert!(report.moved.is_empty());
        assert!(prompt.asked().is_empty());
        assert!(t.work_dir().join("the_mandalorian_s01e01.sample.mkv").exists());
    }
}
