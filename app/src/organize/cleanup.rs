use std::{
    fs,
    path::{Path, PathBuf},
};

use filetools_core::NamingRules;

use crate::{
    prompt::{Prompt, PromptError},
    scan,
};

#[derive(Debug, Default)]
pub struct CleanReport {
    /// Directories found to hold nothing worth keeping.
    pub empty: Vec<PathBuf>,
    pub removed: Vec<PathBuf>,
    pub failed: usize,
}

/// Does this directory still hold something worth keeping?
///
/// Anything still downloading, or any video that is not a sample or trailer,
/// counts. Nested directories are searched too, since removal is recursive.
fn holds_content(rules: &NamingRules, dir: &Path) -> bool {
    for entry in walkdir::WalkDir::new(dir).min_depth(1) {
        let entry = match entry {
            Ok(e) => e,
            Err(e) => {
                log::warn!("unable to scan {:?}: {}", dir, e);
                // unreadable means unknown, keep it
                return true;
            }
        };
        if !entry.file_type().is_file() {
            continue;
        }
        let name = entry.file_name().to_string_lossy();
        if rules.is_downloading(&name) {
            return true;
        }
        if rules.is_video(&name) && !rules.is_ignored(&name) {
            return true;
        }
    }
    false
}

pub fn find_empty_dirs(rules: &NamingRules, work_dir: &Path) -> Vec<PathBuf> {
    scan::list_dirs(work_dir)
        .into_iter()
        .filter(|d| !holds_content(rules, &d.path))
        .map(|d| d.path)
        .collect()
}

/// Remove directories under `work_dir` that hold nothing worth keeping,
/// after confirmation.
pub fn clean_empty_dirs(
    rules: &NamingRules,
    work_dir: &Path,
    dry_run: bool,
    prompt: &mut dyn Prompt,
) -> Result<CleanReport, PromptError> {
    let mut report = CleanReport {
        empty: find_empty_dirs(rules, work_dir),
        ..Default::default()
    };
    if report.empty.is_empty() {
        log::info!("no directories to delete");
        return Ok(report);
    }

    log::info!("empty directories found:");
    for dir in &report.empty {
        log::info!("{}", dir.display());
    }
    if !prompt.ask_yes_no("Delete directories?", None)? {
        return Ok(report);
    }

    for dir in &report.empty {
        if dry_run {
            log::info!("[dry run] deleting directory {:?}", dir);
            continue;
        }
        log::info!("deleting directory {:?}", dir);
        match fs::remove_dir_all(dir) {
            Ok(()) => report.removed.push(dir.clone()),
            Err(e) => {
                log::error!("error deleting {:?}: {}", dir, e);
                report.failed += 1;
            }
        }
    }
    Ok(report)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::prompt::scripted::{Answer, ScriptedPrompt};

    fn rules() -> NamingRules {
        NamingRules::default()
            .valid_extensions([".mkv", ".mp4"])
            .downloading_indicators([".!qb"])
            .ignore_keywords(["sample", "trailer"])
    }

    fn touch(path: &Path) {
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(path, b"").unwrap();
    }

    fn layout(work: &Path) {
        touch(&work.join("done/release.nfo"));
        touch(&work.join("done/sample.mkv"));
        fs::create_dir_all(work.join("bare")).unwrap();
        touch(&work.join("keep/movie.mp4"));
        touch(&work.join("busy/movie.mp4.!qB"));
        touch(&work.join("nested/Subs/english.srt"));
        touch(&work.join("nested/extras/feature.mkv"));
    }

    #[test]
    fn only_dirs_without_content_are_empty() {
        let dir = tempfile::tempdir().unwrap();
        layout(dir.path());
        assert_eq!(
            find_empty_dirs(&rules(), dir.path()),
            vec![dir.path().join("bare"), dir.path().join("done")]
        );
    }

    #[test]
    fn confirmed_dirs_are_removed() {
        let dir = tempfile::tempdir().unwrap();
        layout(dir.path());

        let mut prompt = ScriptedPrompt::new(vec![Answer::YesNo(true)]);
        let report = clean_empty_dirs(&rules(), dir.path(), false, &mut prompt).unwrap();
        assert_eq!(report.removed.len(), 2);
        assert!(!dir.path().join("done").exists());
        assert!(!dir.path().join("bare").exists());
        assert!(dir.path().join("keep").exists());
        assert!(dir.path().join("busy").exists());
        assert!(dir.path().join("nested").exists());
    }

    #[test]
    fn declined_or_dry_run_removes_nothing() {
        let dir = tempfile::tempdir().unwrap();
        layout(dir.path());

        let mut prompt = ScriptedPrompt::new(vec![Answer::YesNo(false)]);
        let report = clean_empty_dirs(&rules(), dir.path(), false, &mut prompt).unwrap();
        assert_eq!(report.empty.len(), 2);
        assert!(report.removed.is_empty());

        let mut prompt = ScriptedPrompt::new(vec![Answer::YesNo(true)]);
        let report = clean_empty_dirs(&rules(), dir.path(), true, &mut prompt).unwrap();
        assert!(report.removed.is_empty());
        assert!(dir.path().join("done").exists());
    }

    #[test]
    fn nothing_to_clean_asks_nothing() {
        let dir = tempfile::tempdir().unwrap();
        touch(&dir.path().join("keep/movie.mp4"));

        let mut prompt = ScriptedPrompt::new(vec![]);
        let report = clean_empty_dirs(&rules(), dir.path(), false, &mut prompt).unwrap();
        assert!(report.empty.is_empty());
        assert!(prompt.asked().is_empty());
    }
}
