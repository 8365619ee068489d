use anyhow::Context;
use app::{app::FiletoolsApp, prompt::AssumeYes, prompt::Prompt};

use super::{argparse, prompt::StdinPrompt};

pub fn get_app(config: &argparse::ConfigOpts) -> anyhow::Result<FiletoolsApp> {
    app::app::FiletoolsBuilder::new()
        .context("could not create app builder")?
        .update(|c| c.settings_file(config.settings()))
        .context("could not set settings file")?
        .update(|c| c.index_file(config.index_file()))
        .context("could not set show index file")?
        .build()
        .context("could not build app config")
}

pub fn prompt(assume_yes: bool) -> Box<dyn Prompt> {
    if assume_yes {
        Box::new(AssumeYes)
    } else {
        Box::new(StdinPrompt::default())
    }
}

pub fn check_failures(failed: usize) -> anyhow::Result<()> {
    if failed != 0 {
        anyhow::bail!("encountered {} errors, see log for details", failed);
    }
    Ok(())
}
