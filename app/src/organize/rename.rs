use std::{fs, path::Path, path::PathBuf};

use filetools_core::{is_canonical, Classifier};

use crate::scan;

#[derive(Debug, Default)]
pub struct RenameReport {
    pub renamed: Vec<(PathBuf, PathBuf)>,
    pub deleted: Vec<PathBuf>,
    /// Files that already carry their canonical name.
    pub canonical: usize,
    pub unparsed: Vec<PathBuf>,
    /// Samples and trailers kept because junk was not being deleted.
    pub ignored: Vec<PathBuf>,
    pub already_present: Vec<PathBuf>,
    pub failed: usize,
}

/// Give every video file in `work_dir` its canonical name, optionally
/// deleting junk (samples, trailers, deletable extensions) on the way.
pub fn rename_files(
    classifier: &Classifier,
    work_dir: &Path,
    delete_junk: bool,
    dry_run: bool,
) -> RenameReport {
    let rules = classifier.rules();
    let mut report = RenameReport::default();

    for file in scan::list_files(work_dir) {
        if delete_junk && rules.is_junk(&file.name) {
            if dry_run {
                log::info!("[dry run] deleting {:?}", file.path);
            } else {
                log::info!("deleting {:?}", file.path);
                if let Err(e) = fs::remove_file(&file.path) {
                    log::error!("unable to delete {:?}: {}", file.path, e);
                    report.failed += 1;
                    continue;
                }
            }
            report.deleted.push(file.path);
            continue;
        }

        if !rules.is_video(&file.name) {
            continue;
        }
        if rules.is_ignored(&file.name) {
            log::debug!("skipping {}, ignored", file.name);
            report.ignored.push(file.path);
            continue;
        }
        if is_canonical(&file.name) {
            log::debug!("skipping {}, already canonical", file.name);
            report.canonical += 1;
            continue;
        }

        let new_name = match classifier.canonical_filename(&file.name) {
            Some(n) => n,
            None => {
                log::warn!("unable to parse {:?}, leaving it in place", file.path);
                report.unparsed.push(file.path);
                continue;
            }
        };
        if new_name == file.name {
            report.canonical += 1;
            continue;
        }

        let dst = work_dir.join(&new_name);
        if dst.exists() {
            log::info!("already present: {:?}", dst);
            report.already_present.push(dst);
            continue;
        }
        if dry_run {
            log::info!("[dry run] renaming {} -> {}", file.name, new_name);
        } else {
            log::info!("renaming {} -> {}", file.name, new_name);
            if let Err(e) = fs::rename(&file.path, &dst) {
                log::error!("unable to rename {:?}: {}", file.path, e);
                report.failed += 1;
                continue;
            }
        }
        report.renamed.push((file.path, dst));
    }

    log::info!("renamed {} files", report.renamed.len());
    report
}
