use std::{env, path::PathBuf, time::Duration};

use directories::{BaseDirs, ProjectDirs};
use lazy_static::lazy_static;
use serde::Deserialize;

use crate::core::HeaderMode;

const CONFIG: &str = include_str!("../.config/config.json5");

#[derive(Clone, Debug, Deserialize)]
pub struct ServiceConfig {
    pub base_url: String,
    #[serde(default)]
    pub timeout_secs: Option<u64>,
}

impl ServiceConfig {
    pub fn timeout(&self) -> Option<Duration> {
        self.timeout_secs.map(Duration::from_secs)
    }
}

#[derive(Clone, Debug, Default, Deserialize)]
pub struct HistogramConfig {
    #[serde(default)]
    pub bins: Option<u32>,
}

#[derive(Clone, Debug, Default, Deserialize)]
pub struct TableConfig {
    #[serde(default)]
    pub header_mode: HeaderMode,
}

#[derive(Clone, Debug, Deserialize)]
pub struct Config {
    pub service: ServiceConfig,
    #[serde(default)]
    pub histogram: HistogramConfig,
    #[serde(default)]
    pub table: TableConfig,
    /// JSON keybindings file replacing the defaults
    #[serde(default)]
    pub keybindings: Option<PathBuf>,
}

lazy_static! {
    pub static ref PROJECT_NAME: String = env!("CARGO_CRATE_NAME").to_uppercase().to_string();
    pub static ref DATA_FOLDER: Option<PathBuf> =
        env::var(format!("{}_DATA", PROJECT_NAME.clone()))
            .ok()
            .map(PathBuf::from);
    pub static ref CONFIG_FOLDER: Option<PathBuf> =
        env::var(format!("{}_CONFIG", PROJECT_NAME.clone()))
            .ok()
            .map(PathBuf::from);
}

impl Config {
    /// Layer, lowest first: embedded defaults, the user config file, then
    /// `DSVIEW__SECTION__KEY` environment variables.
    ///
    /// An explicit `config_path` must exist; the default location is optional.
    pub fn from_path(config_path: Option<&PathBuf>) -> Result<Self, config::ConfigError> {
        let user_file = match config_path {
            Some(path) => config::File::from(expand_tilde(path))
                .format(config::FileFormat::Json5)
                .required(true),
            None => config::File::from(get_config_dir().join("config.json5"))
                .format(config::FileFormat::Json5)
                .required(false),
        };

        let mut cfg: Self = config::Config::builder()
            .add_source(config::File::from_str(CONFIG, config::FileFormat::Json5))
            .add_source(user_file)
            .add_source(
                config::Environment::with_prefix(&PROJECT_NAME)
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?
            .try_deserialize()?;

        cfg.keybindings = cfg.keybindings.as_ref().map(expand_tilde);
        Ok(cfg)
    }
}

fn expand_tilde(path: &PathBuf) -> PathBuf {
    if let (Ok(rest), Some(base)) = (path.strip_prefix("~"), BaseDirs::new()) {
        return base.home_dir().join(rest);
    }
    path.clone()
}

fn project_directory() -> Option<ProjectDirs> {
    ProjectDirs::from("", "", env!("CARGO_PKG_NAME"))
}

pub fn get_data_dir() -> PathBuf {
    if let Some(s) = DATA_FOLDER.clone() {
        s
    } else if let Some(proj_dirs) = project_directory() {
        proj_dirs.data_local_dir().to_path_buf()
    } else {
        PathBuf::from(".").join(".data")
    }
}

pub fn get_config_dir() -> PathBuf {
    if let Some(s) = CONFIG_FOLDER.clone() {
        s
    } else if let Some(proj_dirs) = project_directory() {
        proj_dirs.config_local_dir().to_path_buf()
    } else {
        PathBuf::from(".").join(".config")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn write_config(contents: &str) -> NamedTempFile {
        let mut file = tempfile::Builder::new().suffix(".json5").tempfile().unwrap();
        write!(file, "{contents}").unwrap();
        file
    }

    #[test]
    fn test_embedded_defaults_parse() {
        let cfg: Config = json5::from_str(CONFIG).unwrap();
        assert_eq!(cfg.service.base_url, "http://127.0.0.1:8000");
        assert_eq!(cfg.service.timeout(), None);
        assert_eq!(cfg.histogram.bins, None);
        assert_eq!(cfg.table.header_mode, HeaderMode::Union);
    }

    #[test]
    fn test_user_file_overrides_defaults() {
        let file = write_config(
            r#"{
                service: { base_url: "http://data.internal:9000", timeout_secs: 15 },
                histogram: { bins: 12 },
                table: { header_mode: "first_row" },
            }"#,
        );
        let cfg = Config::from_path(Some(&file.path().to_path_buf())).unwrap();

        assert_eq!(cfg.service.base_url, "http://data.internal:9000");
        assert_eq!(cfg.service.timeout(), Some(Duration::from_secs(15)));
        assert_eq!(cfg.histogram.bins, Some(12));
        assert_eq!(cfg.table.header_mode, HeaderMode::FirstRow);
    }

    #[test]
    fn test_partial_user_file_keeps_other_defaults() {
        let file = write_config(r#"{ histogram: { bins: 50 } }"#);
        let cfg = Config::from_path(Some(&file.path().to_path_buf())).unwrap();

        assert_eq!(cfg.histogram.bins, Some(50));
        assert_eq!(cfg.service.base_url, "http://127.0.0.1:8000");
        assert_eq!(cfg.table.header_mode, HeaderMode::Union);
    }

    #[test]
    fn test_missing_explicit_config_is_an_error() {
        let missing = PathBuf::from("/definitely/not/here/dsview.json5");
        assert!(Config::from_path(Some(&missing)).is_err());
    }
}
