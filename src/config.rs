//! Configuration file handling for cash-audit.
//!
//! The configuration file is optional. It is read from the path given with `--config` (or
//! `CASH_AUDIT_CONFIG`), otherwise from `<config dir>/cash-audit/config.json` when that file exists.
//! Without a file, the defaults are used and sources must be given on the command line.

use crate::model::UnitCleaner;
use crate::parser::RecordParser;
use crate::Result;
use anyhow::{bail, Context};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::debug;
use url::Url;

const APP_NAME: &str = "cash-audit";
const CONFIG_VERSION: u8 = 1;
const CONFIG_JSON: &str = "config.json";

/// The `Config` object represents the configuration of the app: where the sheet is published and
/// how its unit names are cleaned.
#[derive(Debug, Clone, Default)]
pub struct Config {
    /// The file this configuration was loaded from, if any.
    path: Option<PathBuf>,
    config_file: ConfigFile,
}

impl Config {
    /// Writes a new configuration file at `path`, creating its parent directory if needed.
    ///
    /// # Errors
    /// - Returns an error if a file already exists at `path` or if any file operation fails.
    pub async fn create(
        path: &Path,
        sources: Vec<Url>,
        mirror_prefix: Option<String>,
        brand_affixes: Vec<String>,
    ) -> Result<Self> {
        if path.exists() {
            bail!("A config file already exists at '{}'", path.display());
        }
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            tokio::fs::create_dir_all(parent).await.with_context(|| {
                format!("Unable to create the config directory {}", parent.display())
            })?;
        }
        let config_file = ConfigFile {
            sources,
            mirror_prefix,
            brand_affixes,
            ..ConfigFile::default()
        };
        let config = Self {
            path: Some(path.to_path_buf()),
            config_file,
        };
        // Fail before writing anything that could not be loaded back.
        let _ = config.candidate_urls()?;
        let _ = config.unit_cleaner()?;
        config.config_file.save(path).await?;
        Ok(config)
    }

    /// Loads the configuration.
    ///
    /// - When `path` is given, the file must exist.
    /// - Otherwise the default location is used if a file exists there.
    /// - Otherwise the built-in defaults are returned.
    pub async fn load(path: Option<&Path>) -> Result<Self> {
        let path = match path {
            Some(p) => {
                if !p.is_file() {
                    bail!("The config file is missing '{}'", p.display())
                }
                p.to_path_buf()
            }
            None => match default_path().filter(|p| p.is_file()) {
                Some(p) => p,
                None => {
                    debug!("No config file found, using defaults");
                    return Ok(Self::default());
                }
            },
        };
        debug!("Loading config from {}", path.display());
        let config_file = ConfigFile::load(&path).await?;
        let config = Self {
            path: Some(path),
            config_file,
        };
        let _ = config
            .candidate_urls()
            .context("The config file contains an invalid mirror_prefix")?;
        Ok(config)
    }

    /// Replaces the configured sources, e.g. with those given on the command line. An empty list
    /// keeps the configured sources.
    pub fn with_sources(mut self, sources: Vec<Url>) -> Self {
        if !sources.is_empty() {
            self.config_file.sources = sources;
        }
        self
    }

    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    pub fn sources(&self) -> &[Url] {
        &self.config_file.sources
    }

    pub fn mirror_prefix(&self) -> Option<&str> {
        self.config_file.mirror_prefix.as_deref()
    }

    pub fn brand_affixes(&self) -> &[String] {
        &self.config_file.brand_affixes
    }

    /// The ordered list of URLs to try: every source, then every source through the mirror.
    pub fn candidate_urls(&self) -> Result<Vec<Url>> {
        let mut urls = self.config_file.sources.clone();
        if let Some(prefix) = self.mirror_prefix() {
            for source in &self.config_file.sources {
                let mirrored = format!("{prefix}{source}");
                urls.push(
                    Url::parse(&mirrored)
                        .with_context(|| format!("Invalid mirror URL '{mirrored}'"))?,
                );
            }
        }
        Ok(urls)
    }

    pub fn unit_cleaner(&self) -> Result<UnitCleaner> {
        UnitCleaner::new(self.brand_affixes())
    }

    /// A `RecordParser` that cleans unit names with the configured brand affixes.
    pub fn parser(&self) -> Result<RecordParser> {
        Ok(RecordParser::new(self.unit_cleaner()?))
    }
}

/// The default config file location, `<config dir>/cash-audit/config.json`.
pub fn default_path() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join(APP_NAME).join(CONFIG_JSON))
}

/// Represents the serialization and deserialization format of the configuration file.
///
/// Example configuration:
/// ```json
/// {
///   "app_name": "cash-audit",
///   "config_version": 1,
///   "sources": ["https://docs.google.com/spreadsheets/d/e/2PACX-1vQ3x/pub?output=csv"],
///   "mirror_prefix": "https://cors.isomorphic-git.org/",
///   "brand_affixes": ["Padaria Sol"]
/// }
/// ```
#[derive(Debug, Clone, Serialize, Deserialize, Eq, PartialEq)]
struct ConfigFile {
    /// Application name, should always be "cash-audit"
    app_name: String,

    /// Configuration file version
    config_version: u8,

    /// URLs of the published CSV export, primary first
    #[serde(default)]
    sources: Vec<Url>,

    /// When set, each source is also tried as `{mirror_prefix}{source}` after all direct sources
    #[serde(default, skip_serializing_if = "Option::is_none")]
    mirror_prefix: Option<String>,

    /// Brand names to remove from unit names, matched without regard to case
    #[serde(default)]
    brand_affixes: Vec<String>,
}

impl Default for ConfigFile {
    fn default() -> Self {
        Self {
            app_name: APP_NAME.to_string(),
            config_version: CONFIG_VERSION,
            sources: Vec::new(),
            mirror_prefix: None,
            brand_affixes: Vec::new(),
        }
    }
}

impl ConfigFile {
    /// Loads a ConfigFile asynchronously from the specified path.
    ///
    /// # Errors
    /// Returns an error if the file cannot be read or parsed
    async fn load(path: &Path) -> Result<Self> {
        let text = tokio::fs::read_to_string(path)
            .await
            .with_context(|| format!("Unable to read the config file {}", path.display()))?;
        let config: ConfigFile = serde_json::from_str(&text)
            .with_context(|| format!("The config file {} is not valid", path.display()))?;

        anyhow::ensure!(
            config.app_name == APP_NAME,
            "Invalid app_name in config file: expected '{}', got '{}'",
            APP_NAME,
            config.app_name
        );

        Ok(config)
    }

    /// Saves the ConfigFile to the specified path.
    async fn save(&self, path: &Path) -> Result<()> {
        let data = serde_json::to_string_pretty(self).context("Unable to serialize config")?;
        tokio::fs::write(path, data)
            .await
            .with_context(|| format!("Unable to write the config file {}", path.display()))
    }
}
