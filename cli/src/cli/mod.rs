pub mod argparse;
mod helpers;
mod prompt;

pub use argparse::get_args;

mod organize {
    use anyhow::Context;
    use app::organize::{self, RunOptions};

    use super::{argparse, helpers};

    pub(crate) fn run(
        args: &argparse::RunOpts,
        config: &argparse::ConfigOpts,
    ) -> anyhow::Result<()> {
        let app = helpers::get_app(config)?;
        let work_dir = app.work_dir(args.step.dir.as_deref())?;
        log::info!("path to work on: {:?}", work_dir);

        let opts = RunOptions {
            extract: args.extract || args.all,
            rename: args.rename || args.all,
            delete_junk: args.delete_junk,
            move_files: args.move_files || args.all,
            clean: args.clean || args.all,
            dry_run: args.step.dry_run,
        };
        if !(opts.extract || opts.rename || opts.move_files || opts.clean) {
            log::warn!("no steps selected, see --help");
            return Ok(());
        }

        if args.rebuild_index && !opts.dry_run {
            app.rebuild_index().context("could not rebuild show index")?;
        }

        let mut prompt = helpers::prompt(args.step.yes);
        let report = organize::run(&app, &work_dir, opts, prompt.as_mut())?;
        helpers::check_failures(report.failures())
    }

    pub(crate) fn extract(
        args: &argparse::StepOpts,
        config: &argparse::ConfigOpts,
    ) -> anyhow::Result<()> {
        let app = helpers::get_app(config)?;
        let work_dir = app.work_dir(args.dir.as_deref())?;
        let report = organize::extract_from_subdirs(&app.rules, &work_dir, args.dry_run);
        helpers::check_failures(report.failed)
    }

    pub(crate) fn rename(
        args: &argparse::RenameOpts,
        config: &argparse::ConfigOpts,
    ) -> anyhow::Result<()> {
        let app = helpers::get_app(config)?;
        let work_dir = app.work_dir(args.step.dir.as_deref())?;
        let report = organize::rename_files(
            &app.classifier(),
            &work_dir,
            args.delete_junk,
            args.step.dry_run,
        );
        for path in &report.unparsed {
            println!("unparsed: {}", path.display());
        }
        helpers::check_failures(report.failed)
    }

    pub(crate) fn relocate(
        args: &argparse::StepOpts,
        config: &argparse::ConfigOpts,
    ) -> anyhow::Result<()> {
        let app = helpers::get_app(config)?;
        let work_dir = app.work_dir(args.dir.as_deref())?;
        let mut prompt = helpers::prompt(args.yes);
        let report = organize::move_to_libraries(&app, &work_dir, args.dry_run, prompt.as_mut())?;
        helpers::check_failures(report.failed)
    }

    pub(crate) fn clean(
        args: &argparse::StepOpts,
        config: &argparse::ConfigOpts,
    ) -> anyhow::Result<()> {
        let app = helpers::get_app(config)?;
        let work_dir = app.work_dir(args.dir.as_deref())?;
        let mut prompt = helpers::prompt(args.yes);
        let report =
            organize::clean_empty_dirs(&app.rules, &work_dir, args.dry_run, prompt.as_mut())?;
        helpers::check_failures(report.failed)
    }
}

mod index {
    use anyhow::Context;

    use super::{argparse, helpers};

    pub(crate) fn rebuild(config: &argparse::ConfigOpts) -> anyhow::Result<()> {
        let app = helpers::get_app(config)?;
        let index = app.rebuild_index().context("could not rebuild show index")?;
        println!(
            "indexed {} shows into {}",
            index.len(),
            app.index_store.path().display()
        );
        Ok(())
    }

    pub(crate) fn list(config: &argparse::ConfigOpts) -> anyhow::Result<()> {
        let app = helpers::get_app(config)?;
        let index = app.load_index().context("could not load show index")?;
        for (title, path) in index.iter() {
            println!("{} = {}", title, path.display());
        }
        Ok(())
    }
}

mod debug_utils {
    use anyhow::Context;
    use filetools_core::ParsedMedia;

    use super::{argparse, helpers};

    pub(crate) fn parse(
        args: &argparse::ParseOpts,
        config: &argparse::ConfigOpts,
    ) -> anyhow::Result<()> {
        let app = helpers::get_app(config)?;
        let classifier = app.classifier();
        for name in &args.names {
            let parsed = classifier.classify_file(name);
            let canonical = classifier
                .canonical_filename(name)
                .unwrap_or_else(|| "-".to_string());
            match &parsed {
                ParsedMedia::Show(show) => println!(
                    "{}\n  show: {} {} flags=[{}]\n  => {}",
                    name, show.title, show.season_episode, show.flags, canonical
                ),
                ParsedMedia::Movie(movie) => println!(
                    "{}\n  movie: {} ({}) flags=[{}]\n  => {}",
                    name, movie.title, movie.year, movie.flags, canonical
                ),
                ParsedMedia::Unparsed => println!("{}\n  unparsed", name),
            }
            log::debug!("{:#?}", parsed);
        }
        Ok(())
    }

    pub(crate) fn show_config(config: &argparse::ConfigOpts) -> anyhow::Result<()> {
        let app = helpers::get_app(config)?;
        println!("settings file: {}", app.config.settings_path().display());
        println!("show index: {}", app.config.index_path().display());
        println!(
            "{}",
            serde_json::to_string_pretty(app.config.settings())
                .context("could not render settings")?
        );
        Ok(())
    }
}

impl argparse::CliOpts {
    pub fn run(&self) -> anyhow::Result<()> {
        use argparse::{DebugCommand, IndexCommand, SubCommand};
        let config = &self.config;
        match &self.subcmd {
            SubCommand::Run(opts) => organize::run(opts, config),
            SubCommand::Extract(opts) => organize::extract(opts, config),
            SubCommand::Rename(opts) => organize::rename(opts, config),
            SubCommand::Move(opts) => organize::relocate(opts, config),
            SubCommand::Clean(opts) => organize::clean(opts, config),
            SubCommand::Index(sub) => match sub {
                IndexCommand::Rebuild => index::rebuild(config),
                IndexCommand::List => index::list(config),
            },
            SubCommand::Debug(sub) => match sub {
                DebugCommand::Parse(opts) => debug_utils::parse(opts, config),
                DebugCommand::ShowConfig => debug_utils::show_config(config),
            },
        }
    }
}
