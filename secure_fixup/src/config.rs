//! Configuration file handling.

use std::error::Error as StdError;
use std::fmt::{self, Display, Formatter};
use std::path::{Path, PathBuf};
use std::{fs, io};

use log::{LevelFilter, debug};
use serde::Deserialize;

use crate::fixup::FixupFlags;
use crate::normalizer::DefaultNormalizer;
use crate::upgrade::UpgradePolicy;

/// Name of the configuration file inside the configuration directory.
pub const CONFIG_FILE_NAME: &str = "secure_fixup.toml";

/// Errors occurring while loading the configuration file.
#[derive(Debug)]
pub enum Error {
    /// io error reading file.
    Io(io::Error),

    /// Invalid toml.
    Toml(toml::de::Error),
}

impl StdError for Error {
    fn source(&self) -> Option<&(dyn StdError + 'static)> {
        match self {
            Error::Io(err) => err.source(),
            Error::Toml(err) => err.source(),
        }
    }
}

impl Display for Error {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            Error::Io(err) => write!(f, "Error reading config file: {err}"),
            Error::Toml(err) => write!(f, "Config error: {err}"),
        }
    }
}

impl From<io::Error> for Error {
    fn from(val: io::Error) -> Self {
        Error::Io(val)
    }
}

impl From<toml::de::Error> for Error {
    fn from(val: toml::de::Error) -> Self {
        Error::Toml(val)
    }
}

#[derive(Deserialize, Debug, Default, Clone, PartialEq, Eq)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    pub upgrade: UpgradeConfig,
    pub fixup: FixupConfig,
    pub debug: DebugConfig,
}

#[derive(Deserialize, Debug, Clone, PartialEq, Eq)]
#[serde(default, deny_unknown_fields)]
pub struct UpgradeConfig {
    /// Wrap the normalizer with the https upgrade.
    pub enabled: bool,

    pub exempt_local_hosts: bool,
}

impl Default for UpgradeConfig {
    fn default() -> Self {
        Self { enabled: true, exempt_local_hosts: false }
    }
}

impl UpgradeConfig {
    pub fn policy(&self) -> UpgradePolicy {
        UpgradePolicy { exempt_local_hosts: self.exempt_local_hosts }
    }
}

#[derive(Deserialize, Debug, Clone, PartialEq, Eq)]
#[serde(default, deny_unknown_fields)]
pub struct FixupConfig {
    pub require_whitelisted_host: bool,
    pub whitelisted_hosts: Vec<String>,
}

impl Default for FixupConfig {
    fn default() -> Self {
        Self { require_whitelisted_host: false, whitelisted_hosts: vec![String::from("localhost")] }
    }
}

impl FixupConfig {
    pub fn flags(&self) -> FixupFlags {
        let mut flags = FixupFlags::empty();
        flags.set(FixupFlags::REQUIRE_WHITELISTED_HOST, self.require_whitelisted_host);
        flags
    }

    pub fn normalizer(&self) -> DefaultNormalizer {
        DefaultNormalizer::with_whitelisted_hosts(self.whitelisted_hosts.iter().cloned())
    }
}

#[derive(Deserialize, Debug, Clone, PartialEq, Eq)]
#[serde(default, deny_unknown_fields)]
pub struct DebugConfig {
    pub log_level: LevelFilter,
}

impl Default for DebugConfig {
    fn default() -> Self {
        Self { log_level: LevelFilter::Warn }
    }
}

/// Load the configuration.
///
/// An explicitly passed path must exist, while a missing default file falls back to defaults.
pub fn load(config_file: Option<&Path>) -> Result<Config, Error> {
    match config_file.map(Path::to_path_buf).or_else(installed_config) {
        Some(path) => {
            debug!("Loading configuration from {path:?}");
            read(&path)
        },
        None => {
            debug!("No configuration file found, using defaults");
            Ok(Config::default())
        },
    }
}

/// Deserialize a configuration file.
pub fn read(path: &Path) -> Result<Config, Error> {
    let contents = fs::read_to_string(path)?;
    Ok(toml::from_str(&contents)?)
}

/// Location of the user's configuration file, if it exists.
#[cfg(not(windows))]
pub fn installed_config() -> Option<PathBuf> {
    xdg::BaseDirectories::with_prefix("secure_fixup").find_config_file(CONFIG_FILE_NAME)
}

/// Location of the user's configuration file, if it exists.
#[cfg(windows)]
pub fn installed_config() -> Option<PathBuf> {
    dirs::config_dir()
        .map(|path| path.join("secure_fixup").join(CONFIG_FILE_NAME))
        .filter(|path| path.exists())
}
