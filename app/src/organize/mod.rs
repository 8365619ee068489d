//! The organizer steps run against a download directory.
//!
//! Every step honors `dry_run`: decisions, prompts and logging all happen,
//! but nothing on disk is touched. Failures on a single file are logged and
//! counted in the step's report, they never stop the batch.

use std::path::Path;

use crate::{app::FiletoolsApp, prompt::Prompt, FiletoolsAppError};

pub mod cleanup;
pub mod extract;
pub mod relocate;
pub mod rename;

pub use cleanup::{clean_empty_dirs, CleanReport};
pub use extract::{extract_from_subdirs, ExtractReport};
pub use relocate::{move_to_libraries, MoveReport};
pub use rename::{rename_files, RenameReport};

/// Which steps a full run performs.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RunOptions {
    pub extract: bool,
    pub rename: bool,
    pub delete_junk: bool,
    pub move_files: bool,
    pub clean: bool,
    pub dry_run: bool,
}

#[derive(Debug, Default)]
pub struct RunReport {
    pub extract: Option<ExtractReport>,
    pub rename: Option<RenameReport>,
    pub moved: Option<MoveReport>,
    pub clean: Option<CleanReport>,
}

impl RunReport {
    /// Total per-file failures across all steps.
    pub fn failures(&self) -> usize {
        self.extract.as_ref().map(|r| r.failed).unwrap_or(0)
            + self.rename.as_ref().map(|r| r.failed).unwrap_or(0)
            + self.moved.as_ref().map(|r| r.failed).unwrap_or(0)
            + self.clean.as_ref().map(|r| r.failed).unwrap_or(0)
    }
}

/// Extract, rename, move and clean, in that order.
pub fn run(
    app: &FiletoolsApp,
    work_dir: &Path,
    opts: RunOptions,
    prompt: &mut dyn Prompt,
) -> Result<RunReport, FiletoolsAppError> {
    let mut report = RunReport::default();
    if opts.extract {
        log::info!("extracting files in {:?}", work_dir);
        report.extract = Some(extract_from_subdirs(&app.rules, work_dir, opts.dry_run));
    }
    if opts.rename {
        log::info!("renaming files in {:?}", work_dir);
        report.rename = Some(rename_files(
            &app.classifier(),
            work_dir,
            opts.delete_junk,
            opts.dry_run,
        ));
    }
    if opts.move_files {
        log::info!("moving files from {:?}", work_dir);
        report.moved = Some(move_to_libraries(app, work_dir, opts.dry_run, prompt)?);
    }
    if opts.clean {
        log::info!("cleaning directories in {:?}", work_dir);
        report.clean = Some(clean_empty_dirs(&app.rules, work_dir, opts.dry_run, prompt)?);
    }
    Ok(report)
}
