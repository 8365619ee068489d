use std::path::{Path, PathBuf};

use camino::{Utf8Path, Utf8PathBuf};
use filetools_core::{Library, LibraryConfig, NamingRules, RulesError, YearRange};
use serde::{Deserialize, Serialize};

const QUALIFIER: &str = "io";
const ORGANIZATION: &str = "filetools";
const APP: &str = "filetools";
const APP_CAPS: &str = "FILETOOLS";

pub const SETTINGS_ENV_VAR: &str = "FILETOOLS_SETTINGS";

const YEAR_MIN_KEY: &str = "metadata.year_range.min";
const YEAR_MAX_KEY: &str = "metadata.year_range.max";

const DEFAULT_SETTINGS_FILE: &str = "settings.json";
const DEFAULT_INDEX_FILE: &str = "shows_map.ini";

type ExtConfigBuilder = config::ConfigBuilder<config::builder::DefaultState>;

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error(transparent)]
    ConfigError(#[from] config::ConfigError),
    #[error("unable to get user home directory")]
    NoUserHome,
    #[error("path is not utf8: {:?}", _0)]
    NonUtf8Path(PathBuf),
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub file_processing: FileProcessing,
    pub metadata: Metadata,
    pub libraries: Libraries,
    pub paths: Paths,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileProcessing {
    pub extensions: Extensions,
    pub keywords: Keywords,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Extensions {
    pub valid: Vec<String>,
    pub excluded: Vec<String>,
    pub deletable: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Keywords {
    pub downloading: Vec<String>,
    pub ignore: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Metadata {
    pub year_range: YearRangeSettings,
    pub name_cleanup: NameCleanup,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct YearRangeSettings {
    pub min: u16,
    pub max: u16,
}

impl Default for YearRangeSettings {
    fn default() -> Self {
        let years = YearRange::default();
        YearRangeSettings {
            min: years.min(),
            max: years.max(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct NameCleanup {
    pub flags: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Libraries {
    pub shows: Vec<Library>,
    pub movies: Vec<Library>,
    pub music: Vec<Library>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Paths {
    pub default_source: Option<PathBuf>,
}

#[derive(Debug, Clone)]
pub struct ConfigBuilder {
    config_dir: Utf8PathBuf,
    settings_path: Option<Utf8PathBuf>,
    index_path: Option<Utf8PathBuf>,
    load_environment: bool,
    config_builder: ExtConfigBuilder,
}

fn camino_path(std_path: &Path) -> Result<&Utf8Path, ConfigError> {
    Utf8Path::from_path(std_path).ok_or_else(|| ConfigError::NonUtf8Path(std_path.to_path_buf()))
}

fn new_config_builder() -> ExtConfigBuilder {
    let years = YearRange::default();
    // unwraps are if our KEYs are not strings. These are statics, so its safe.
    config::Config::builder()
        .set_default(YEAR_MIN_KEY, years.min() as i64)
        .unwrap()
        .set_default(YEAR_MAX_KEY, years.max() as i64)
        .unwrap()
}

impl ConfigBuilder {
    #[cfg(test)]
    pub fn new_test_config(root: &Path, settings: &Settings) -> Result<FiletoolsConfig, ConfigError> {
        let root = camino_path(root)?;
        Ok(FiletoolsConfig {
            settings: settings.clone(),
            settings_path: root.join(DEFAULT_SETTINGS_FILE),
            index_path: root.join(DEFAULT_INDEX_FILE),
        })
    }

    pub fn new() -> Result<Self, ConfigError> {
        let dirs = directories::ProjectDirs::from(QUALIFIER, ORGANIZATION, APP)
            .ok_or(ConfigError::NoUserHome)?;
        let config_dir = camino_path(dirs.config_dir())?.to_path_buf();
        Ok(Self::in_dir(config_dir))
    }

    fn in_dir(config_dir: Utf8PathBuf) -> Self {
        Self {
            load_environment: false,
            settings_path: None,
            index_path: None,
            config_dir,
            config_builder: new_config_builder(),
        }
    }

    /// Should we load configuration from the environment?
    pub fn load_environment(mut self, load_environment: bool) -> Self {
        self.load_environment = load_environment;
        self
    }

    pub fn settings_file(mut self, settings_file: Option<&Path>) -> Result<Self, ConfigError> {
        self.settings_path = settings_file
            .map(|p| camino_path(p).map(|p| p.to_path_buf()))
            .transpose()?;
        Ok(self)
    }

    pub fn index_file(mut self, index_file: Option<&Path>) -> Result<Self, ConfigError> {
        self.index_path = index_file
            .map(|p| camino_path(p).map(|p| p.to_path_buf()))
            .transpose()?;
        Ok(self)
    }

    fn resolve_settings_path(&self) -> Result<Utf8PathBuf, ConfigError> {
        if let Some(p) = &self.settings_path {
            return Ok(p.clone());
        }
        if self.load_environment {
            if let Some(p) = std::env::var_os(SETTINGS_ENV_VAR) {
                return Ok(camino_path(Path::new(&p))?.to_path_buf());
            }
        }
        Ok(self.config_dir.join(DEFAULT_SETTINGS_FILE))
    }

    fn with_environment(&self, builder: ExtConfigBuilder) -> ExtConfigBuilder {
        if !self.load_environment {
            return builder;
        }
        builder.add_source(
            config::Environment::with_prefix(APP_CAPS)
                .prefix_separator("_")
                .separator("__")
                .try_parsing(true),
        )
    }

    /// Layer defaults, the settings file and the environment.
    ///
    /// A settings file that is missing, unreadable or does not describe valid
    /// settings is logged and ignored.
    pub fn build(self) -> Result<FiletoolsConfig, ConfigError> {
        let settings_path = self.resolve_settings_path()?;
        let index_path = self.index_path.clone().unwrap_or_else(|| {
            settings_path
                .parent()
                .map(|p| p.join(DEFAULT_INDEX_FILE))
                .unwrap_or_else(|| Utf8PathBuf::from(DEFAULT_INDEX_FILE))
        });

        let settings = if settings_path.exists() {
            let with_file = self.config_builder.clone().add_source(
                config::File::from(settings_path.as_std_path()).format(config::FileFormat::Json),
            );
            match self.with_environment(with_file).build() {
                Ok(c) => c.try_deserialize::<Settings>(),
                Err(e) => Err(e),
            }
        } else {
            log::warn!("no settings found at {}, using defaults", settings_path);
            self.with_environment(self.config_builder.clone())
                .build()
                .and_then(|c| c.try_deserialize::<Settings>())
        };

        let settings = match settings {
            Ok(s) => s,
            Err(e) => {
                log::warn!(
                    "unable to load valid settings from {}, using defaults: {}",
                    settings_path,
                    e
                );
                self.with_environment(self.config_builder.clone())
                    .build()?
                    .try_deserialize::<Settings>()?
            }
        };

        let filetools_cfg = FiletoolsConfig {
            settings,
            settings_path,
            index_path,
        };
        log::trace!("{:#?}", filetools_cfg);
        Ok(filetools_cfg)
    }
}

#[derive(Debug, Clone)]
pub struct FiletoolsConfig {
    settings: Settings,
    settings_path: Utf8PathBuf,
    index_path: Utf8PathBuf,
}

impl FiletoolsConfig {
    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    pub fn settings_path(&self) -> &Path {
        self.settings_path.as_std_path()
    }

    pub fn index_path(&self) -> &Path {
        self.index_path.as_std_path()
    }

    /// Where to look for new downloads when no directory is given.
    pub fn default_source(&self) -> Option<&Path> {
        self.settings.paths.default_source.as_deref()
    }

    pub fn naming_rules(&self) -> Result<NamingRules, RulesError> {
        let fp = &self.settings.file_processing;
        let md = &self.settings.metadata;
        let years = YearRange::new(md.year_range.min, md.year_range.max)?;
        Ok(NamingRules::default()
            .valid_extensions(&fp.extensions.valid)
            .excluded_extensions(&fp.extensions.excluded)
            .deletable_extensions(&fp.extensions.deletable)
            .downloading_indicators(&fp.keywords.downloading)
            .ignore_keywords(&fp.keywords.ignore)
            .cleanup_tokens(&md.name_cleanup.flags)
            .year_range(years))
    }

    pub fn libraries(&self) -> Result<LibraryConfig, RulesError> {
        let libs = &self.settings.libraries;
        LibraryConfig::new(libs.shows.clone(), libs.movies.clone(), libs.music.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    const SETTINGS_JSON: &str = r#"{
        "file_processing": {
            "extensions": {
                "valid": [".mkv", "MP4"],
                "excluded": [".part"],
                "deletable": [".nfo", ".txt"]
            },
            "keywords": {
                "downloading": [".!qB"],
                "ignore": ["sample", "trailer"]
            }
        },
        "metadata": {
            "year_range": {"min": 1920, "max": 2040},
            "name_cleanup": {"flags": ["REPACK"]}
        },
        "libraries": {
            "shows": [{"name": "Television", "path": "/media/tv"}],
            "movies": [
                {"name": "Movies", "path": "/media/movies"},
                {"name": "Kids", "path": "/media/kids"}
            ]
        },
        "paths": {"default_source": "/downloads"}
    }"#;

    fn builder_in(dir: &Path) -> ConfigBuilder {
        ConfigBuilder::in_dir(camino_path(dir).unwrap().to_path_buf())
    }

    #[test]
    fn load_settings_file() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("settings.json"), SETTINGS_JSON).unwrap();

        let cfg = builder_in(dir.path()).build().unwrap();
        assert_eq!(cfg.settings_path(), dir.path().join("settings.json"));
        assert_eq!(cfg.index_path(), dir.path().join("shows_map.ini"));
        assert_eq!(cfg.default_source(), Some(Path::new("/downloads")));

        let rules = cfg.naming_rules().unwrap();
        assert!(rules.is_video("show_s01e01.MKV"));
        assert!(rules.is_video("movie_(2020).mp4"));
        assert!(rules.is_deletable("info.NFO"));
        assert!(rules.is_downloading("movie.mkv.!qB"));
        assert_eq!(rules.years().max(), 2040);
        assert_eq!(rules.tokens(), &["repack".to_string()]);

        let libs = cfg.libraries().unwrap();
        assert_eq!(libs.shows().len(), 1);
        assert_eq!(libs.movies()[1].path(), Path::new("/media/kids"));
        assert!(libs.libraries(filetools_core::LibraryCategory::Music).is_empty());
    }

    #[test]
    fn explicit_paths_win() {
        let dir = tempfile::tempdir().unwrap();
        let settings = dir.path().join("elsewhere.json");
        fs::write(&settings, SETTINGS_JSON).unwrap();
        let index = dir.path().join("index").join("shows.ini");

        let cfg = builder_in(&dir.path().join("unused"))
            .settings_file(Some(&settings))
            .unwrap()
            .index_file(Some(&index))
            .unwrap()
            .build()
            .unwrap();
        assert_eq!(cfg.settings_path(), settings);
        assert_eq!(cfg.index_path(), index);
        assert_eq!(cfg.settings().metadata.year_range.min, 1920);
    }

    #[test]
    fn missing_settings_use_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let cfg = builder_in(dir.path()).build().unwrap();
        assert_eq!(cfg.settings(), &Settings::default());
        assert_eq!(cfg.naming_rules().unwrap(), NamingRules::default());
        assert_eq!(cfg.libraries().unwrap(), LibraryConfig::default());
        assert_eq!(cfg.default_source(), None);
    }

    #[test]
    fn corrupt_settings_use_defaults() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("settings.json"), "{ not json").unwrap();
        let cfg = builder_in(dir.path()).build().unwrap();
        assert_eq!(cfg.settings(), &Settings::default());

        fs::write(
            dir.path().join("settings.json"),
            r#"{"metadata": {"year_range": {"min": "soon"}}}"#,
        )
        .unwrap();
        let cfg = builder_in(dir.path()).build().unwrap();
        assert_eq!(cfg.settings(), &Settings::default());
    }

    #[test]
    fn inverted_year_range_is_rejected() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(
            dir.path().join("settings.json"),
            r#"{"metadata": {"year_range": {"min": 2030, "max": 1900}}}"#,
        )
        .unwrap();
        let cfg = builder_in(dir.path()).build().unwrap();
        assert!(matches!(
            cfg.naming_rules(),
            Err(RulesError::InvertedYearRange { .. })
        ));
    }
}
