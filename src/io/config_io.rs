use std::fs;
use std::path::{Path, PathBuf};

use crate::model::config::Config;

/// Directory name under $HOME holding tasks and config
pub const DATA_DIR_NAME: &str = ".iimq";
pub const CONFIG_FILE_NAME: &str = "config.toml";

/// Error type for locating and reading configuration
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("could not determine home directory: HOME is not set")]
    NoHome,
    #[error("could not read {path}: {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("could not parse {path}: {source}")]
    Parse {
        path: PathBuf,
        source: toml::de::Error,
    },
}

/// The data directory: an explicit override, else `$HOME/.iimq`.
pub fn resolve_data_dir(override_dir: Option<&Path>) -> Result<PathBuf, ConfigError> {
    if let Some(dir) = override_dir {
        return Ok(dir.to_path_buf());
    }
    let home = std::env::var_os("HOME")
        .filter(|h| !h.is_empty())
        .ok_or(ConfigError::NoHome)?;
    Ok(PathBuf::from(home).join(DATA_DIR_NAME))
}

/// Read config.toml from the data directory. A missing file yields defaults.
pub fn read_config(data_dir: &Path) -> Result<Config, ConfigError> {
    let path = data_dir.join(CONFIG_FILE_NAME);
    let text = match fs::read_to_string(&path) {
        Ok(text) => text,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Config::default()),
        Err(source) => return Err(ConfigError::Read { path, source }),
    };
    toml::from_str(&text).map_err(|source| ConfigError::Parse { path, source })
}
