use std::path::{Path, PathBuf};

use filetools_core::NamingRules;

use crate::{mover::move_file, scan};

/// Directory name for releases that are still being assembled by hand.
const IN_PROGRESS_DIR: &str = "_in-progress";

#[derive(Debug, Default)]
pub struct ExtractReport {
    /// `(from, to)` for every file pulled up into the work dir.
    pub moved: Vec<(PathBuf, PathBuf)>,
    /// Directories left alone because a download is still running.
    pub downloading: Vec<PathBuf>,
    pub already_present: Vec<PathBuf>,
    pub failed: usize,
}

/// Pull video files out of each release directory directly under
/// `work_dir`.
///
/// A directory holding any file that is still downloading is skipped as a
/// whole. Samples and trailers stay where they are.
pub fn extract_from_subdirs(rules: &NamingRules, work_dir: &Path, dry_run: bool) -> ExtractReport {
    let mut report = ExtractReport::default();

    for dir in scan::list_dirs(work_dir) {
        if dir.name == IN_PROGRESS_DIR {
            log::debug!("skipping {:?}", dir.path);
            continue;
        }

        let files = scan::list_files(&dir.path);
        if files.iter().any(|f| rules.is_downloading(&f.name)) {
            log::info!("still downloading, skipping {:?}", dir.path);
            report.downloading.push(dir.path);
            continue;
        }

        for file in files {
            if !rules.is_video(&file.name) || rules.is_ignored(&file.name) {
                continue;
            }
            let dst = work_dir.join(&file.name);
            if dst.exists() {
                log::info!("already present: {:?}", dst);
                report.already_present.push(dst);
                continue;
            }
            if dry_run {
                log::info!("[dry run] extracting {:?}", file.path);
            } else {
                log::info!("extracting {:?}", file.path);
                if let Err(e) = move_file(&file.path, &dst) {
                    log::error!("{}", e);
                    report.failed += 1;
                    continue;
                }
            }
            report.moved.push((file.path, dst));
        }
    }

    log::info!("extracted {} files", report.moved.len());
    report
}
