use camino::{Utf8Path, Utf8PathBuf};

use crate::error::{ConfigError, BUG_MSG};

/// The name of the config file inside the data directory.
pub const CONFIG_FILE_NAME: &str = "pantry.toml";

#[non_exhaustive]
#[derive(Clone, Debug, PartialEq, PartialOrd, serde::Serialize, serde::Deserialize)]
pub struct Config {
    /// Path to the app's data directory.
    pub data_dir: Utf8PathBuf,

    /// Root directory for uploaded files. Upload paths are stored relative to
    /// this folder.
    pub media_dir: Utf8PathBuf,

    /// File name of the SQLite database, relative to `data_dir`.
    #[serde(default = "Config::default_database_file")]
    pub database_file: String,
}

impl Config {
    pub fn new(data_dir: Utf8PathBuf, media_dir: Utf8PathBuf) -> Self {
        Self {
            data_dir,
            media_dir,
            database_file: Self::default_database_file(),
        }
    }

    /// Attempts to read a previous `Config` from disk.
    ///
    /// Note that this may fail across versions, requiring new configs.
    #[tracing::instrument]
    pub async fn from_disk(data_dir: &Utf8Path) -> Result<Self, ConfigError> {
        // read the config from disk
        let s = tokio::fs::read_to_string(data_dir.join(CONFIG_FILE_NAME))
            .await
            .inspect_err(|e| tracing::warn!("Couldn't read the config file. err: {e}"))?;

        // parse with `toml` crate
        let s: Self = toml::from_str(s.as_str())
            .inspect_err(|e| tracing::warn!("Config file wasn't valid TOML. err: {e}"))?;

        // ensure paths are equal
        if s.data_dir.as_path() != data_dir {
            tracing::error!("loaded config from disk, but it had some weird paths. {BUG_MSG}");
            return Err(ConfigError::PathMismatch);
        }

        Ok(s)
    }

    /// Where the SQLite database lives.
    pub fn database_path(&self) -> Utf8PathBuf {
        self.data_dir.join(&self.database_file)
    }

    fn default_database_file() -> String {
        String::from("pantry.sqlite")
    }
}
