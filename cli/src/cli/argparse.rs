use std::path::{Path, PathBuf};

use clap::Parser;

pub fn get_args() -> CliOpts {
    CliOpts::parse()
}

#[derive(Parser, Debug)]
#[clap(version = clap::crate_version!(), about = "Rename and file downloaded shows and movies")]
pub struct CliOpts {
    #[clap(short, long, global = true, action = clap::ArgAction::Count)]
    pub verbose: u8,

    #[clap(flatten)]
    pub config: ConfigOpts,

    #[clap(subcommand)]
    pub subcmd: SubCommand,
}

#[derive(Parser, Debug)]
pub enum SubCommand {
    /// Run several organizer steps in order: extract, rename, move, clean
    Run(RunOpts),

    /// Pull video files out of release directories
    Extract(StepOpts),

    /// Rename video files to their canonical names
    Rename(RenameOpts),

    /// Move renamed files into the libraries
    Move(StepOpts),

    /// Delete directories that hold nothing worth keeping
    Clean(StepOpts),

    /// Work with the show index
    #[clap(subcommand)]
    Index(IndexCommand),

    /// Debugging Utilities
    #[clap(subcommand)]
    Debug(DebugCommand),
}

#[derive(Parser, Debug)]
pub struct ConfigOpts {
    /// Path to the JSON settings file.
    ///
    /// If not provided, will attempt to read `FILETOOLS_SETTINGS` env var, then user dirs.
    #[clap(long, global = true)]
    pub settings: Option<PathBuf>,

    /// Path to the show index file.
    ///
    /// If not provided, `shows_map.ini` next to the settings file is used.
    #[clap(long, global = true)]
    pub index_file: Option<PathBuf>,
}

impl ConfigOpts {
    pub fn settings(&self) -> Option<&Path> {
        self.settings.as_deref()
    }

    pub fn index_file(&self) -> Option<&Path> {
        self.index_file.as_deref()
    }
}

#[derive(Parser, Debug)]
pub struct StepOpts {
    /// Directory to work on, defaults to the configured source or the current directory
    pub dir: Option<PathBuf>,

    /// Log what would happen without touching any files
    #[clap(short, long)]
    pub dry_run: bool,

    /// Answer yes to every confirmation
    #[clap(short, long)]
    pub yes: bool,
}

#[derive(Parser, Debug)]
pub struct RenameOpts {
    #[clap(flatten)]
    pub step: StepOpts,

    /// Delete junk files (samples, trailers, deletable extensions)
    #[clap(long)]
    pub delete_junk: bool,
}

#[derive(Parser, Debug)]
pub struct RunOpts {
    #[clap(flatten)]
    pub step: StepOpts,

    /// Extract video files from subdirectories
    #[clap(short, long)]
    pub extract: bool,

    /// Rename files to canonical names
    #[clap(short, long)]
    pub rename: bool,

    /// Delete junk files while renaming
    #[clap(long)]
    pub delete_junk: bool,

    /// Move renamed files to the libraries
    #[clap(short, long = "move")]
    pub move_files: bool,

    /// Delete directories that no longer hold a video file
    #[clap(short, long)]
    pub clean: bool,

    /// Run every step
    #[clap(short, long)]
    pub all: bool,

    /// Rebuild the show index before starting
    #[clap(long)]
    pub rebuild_index: bool,
}

#[derive(Parser, Debug)]
pub enum IndexCommand {
    /// Regenerate the show index from the show libraries
    Rebuild,

    /// Print every indexed show
    List,
}

#[derive(Parser, Debug)]
pub enum DebugCommand {
    /// Show how file names are classified and what they would be renamed to
    Parse(ParseOpts),

    /// Show the effective settings and file locations
    ShowConfig,
}

#[derive(Parser, Debug)]
pub struct ParseOpts {
    /// File names to classify
    #[clap(required = true)]
    pub names: Vec<String>,
}
