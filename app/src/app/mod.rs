use std::path::{Path, PathBuf};

use filetools_core::{Classifier, LibraryConfig, NamingRules, Resolver, ShowIndex};

use crate::{
    show_map::{IndexError, ShowIndexStore},
    FiletoolsAppError,
};

mod filetools_config;

pub use filetools_config::{
    ConfigBuilder, ConfigError, Extensions, FileProcessing, FiletoolsConfig, Keywords, Libraries,
    Metadata, NameCleanup, Paths, Settings, YearRangeSettings, SETTINGS_ENV_VAR,
};

#[derive(Debug)]
pub struct FiletoolsBuilder {
    pub config: filetools_config::ConfigBuilder,
}

impl FiletoolsBuilder {
    pub fn new() -> Result<Self, ConfigError> {
        Ok(FiletoolsBuilder {
            config: filetools_config::ConfigBuilder::new()?.load_environment(true),
        })
    }

    pub fn update(
        self,
        f: impl FnOnce(
            filetools_config::ConfigBuilder,
        ) -> Result<filetools_config::ConfigBuilder, ConfigError>,
    ) -> Result<Self, ConfigError> {
        let FiletoolsBuilder {
            config: config_builder,
        } = self;
        let config_builder = f(config_builder)?;
        Ok(Self {
            config: config_builder,
        })
    }

    pub fn build(self) -> Result<FiletoolsApp, FiletoolsAppError> {
        let Self {
            config: config_builder,
        } = self;
        let config = config_builder.build()?;
        let app = FiletoolsApp::from_config(config)?;
        log::trace!("{:#?}", app);
        Ok(app)
    }
}

/// Settings resolved into the values every organizer step runs against.
#[derive(Debug)]
pub struct FiletoolsApp {
    pub config: FiletoolsConfig,
    pub rules: NamingRules,
    pub libraries: LibraryConfig,
    pub index_store: ShowIndexStore,
}

impl FiletoolsApp {
    pub fn from_config(config: FiletoolsConfig) -> Result<FiletoolsApp, FiletoolsAppError> {
        let rules = config.naming_rules()?;
        let libraries = config.libraries()?;
        let index_store = ShowIndexStore::new(config.index_path());
        Ok(FiletoolsApp {
            config,
            rules,
            libraries,
            index_store,
        })
    }

    pub fn classifier(&self) -> Classifier {
        Classifier::new(self.rules.clone())
    }

    pub fn load_index(&self) -> Result<ShowIndex, IndexError> {
        self.index_store.load_or_create(self.libraries.shows())
    }

    pub fn rebuild_index(&self) -> Result<ShowIndex, IndexError> {
        self.index_store.rebuild(self.libraries.shows())
    }

    /// A resolver for one organizer run, with the current show index.
    ///
    /// On a dry run a missing index file is scanned for but not written.
    pub fn resolver(&self, dry_run: bool) -> Result<Resolver, FiletoolsAppError> {
        let index = if dry_run {
            self.index_store.load_or_scan(self.libraries.shows())?
        } else {
            self.load_index()?
        };
        Ok(Resolver::new(
            self.classifier(),
            self.libraries.clone(),
            index,
        ))
    }

    /// The directory to organize: an explicit one, else the configured
    /// default source, else the current directory.
    pub fn work_dir(&self, explicit: Option<&Path>) -> Result<PathBuf, FiletoolsAppError> {
        if let Some(p) = explicit {
            return Ok(p.to_path_buf());
        }
        if let Some(p) = self.config.default_source() {
            return Ok(p.to_path_buf());
        }
        Ok(std::env::current_dir()?)
    }
}
