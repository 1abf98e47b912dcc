//! Handles the configuration of the daemon.
//!
//! this module is responsible for parsing the Aurca.toml file, and layering environment
//! variables and cli arguments on top of it.

use config::{Config, ConfigError, Environment, File};
use serde::Deserialize;

use std::{
    net::{IpAddr, Ipv4Addr, SocketAddr},
    path::{Path, PathBuf},
    str::FromStr,
};

use aurca_storage::db::{DatabaseLocation, StoreInfo};

pub static DEFAULT_CONFIG: &str = include_str!("../Aurca.toml");

pub const CONFIG_FILE_NAME: &str = "Aurca.toml";

/// Environment variable that overrides `server.port`, for hosting platforms that assign one.
pub const PORT_ENV_VAR: &str = "PORT";

#[derive(Clone, Debug, Deserialize, Default, PartialEq, Eq)]
pub struct Settings {
    /// HTTP server settings
    #[serde(default)]
    pub server: ServerSettings,
    /// Document store settings
    #[serde(default)]
    pub database: DatabaseSettings,
}

impl Settings {
    /// Load settings from the config file, environment variables, and CLI arguments.
    ///
    /// Later sources win:
    /// 1. the config file at `config`
    /// 2. environment variables prefixed with `AURCA_`, nested with `__` (e.g. `AURCA_SERVER__HOST`)
    /// 3. the `PORT` environment variable
    /// 4. the `port` and `log_level` arguments (CLI flags)
    ///
    /// # Errors
    ///
    /// This function will return an error if the config file is not found or if the config file is
    /// invalid.
    #[inline]
    pub fn init(
        config: PathBuf,
        port: Option<u16>,
        log_level: Option<log::LevelFilter>,
    ) -> Result<Self, ConfigError> {
        let s = Config::builder()
            .add_source(File::from(config))
            .add_source(
                Environment::with_prefix("AURCA")
                    .prefix_separator("_")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        let mut settings: Self = s.try_deserialize()?;

        if let Some(path) = &mut settings.database.path {
            *path = shellexpand::tilde(path.as_str()).into_owned();
        }

        settings.apply_port_env(std::env::var(PORT_ENV_VAR).ok().as_deref());

        if let Some(port) = port {
            settings.server.port = port;
        }

        if let Some(log_level) = log_level {
            settings.server.log_level = log_level;
        }

        Ok(settings)
    }

    /// Override the port with the value of the `PORT` environment variable, if it is a valid port.
    pub fn apply_port_env(&mut self, value: Option<&str>) {
        match value.map(|v| v.trim().parse::<u16>()) {
            Some(Ok(port)) => self.server.port = port,
            Some(Err(e)) => log::warn!("Ignoring {PORT_ENV_VAR}: {e}"),
            None => {}
        }
    }

    /// Get the (default) path to the config file.
    /// If the config file does not exist at this path, it will be created with the default config.
    ///
    /// See [`crate::get_config_dir`] for more information about where this default path is located.
    ///
    /// # Errors
    ///
    /// This function will return an error if the system config directory (e.g., `~/.config` on linux) could not be found, or if the config file was missing and could not be created.
    #[inline]
    pub fn get_config_path() -> Result<PathBuf, std::io::Error> {
        match crate::get_config_dir() {
            Ok(config_dir) => Self::config_path_in(&config_dir),
            Err(e) => {
                eprintln!("Error: {e}");
                Err(std::io::Error::new(std::io::ErrorKind::NotFound, e))
            }
        }
    }

    /// The config file inside `config_dir`, written from [`DEFAULT_CONFIG`] if it is missing.
    ///
    /// # Errors
    ///
    /// Fails if the directory or the file can't be created.
    pub fn config_path_in(config_dir: &Path) -> Result<PathBuf, std::io::Error> {
        if !config_dir.exists() {
            std::fs::create_dir_all(config_dir)?;
        }
        let config_file = config_dir.join(CONFIG_FILE_NAME);

        if !config_file.exists() {
            std::fs::write(&config_file, DEFAULT_CONFIG)?;
        }

        Ok(config_file)
    }
}

#[derive(Clone, Debug, Deserialize, PartialEq, Eq)]
pub struct ServerSettings {
    /// The address to listen on.
    /// Default is 0.0.0.0
    #[serde(default = "default_host")]
    pub host: IpAddr,
    /// The port to listen on.
    /// Default is 8000.
    #[serde(default = "default_port")]
    pub port: u16,
    /// What level of logging to use.
    /// Default is "info".
    #[serde(default = "default_log_level")]
    #[serde(deserialize_with = "de_log_level")]
    pub log_level: log::LevelFilter,
}

impl ServerSettings {
    #[must_use]
    pub const fn socket_addr(&self) -> SocketAddr {
        SocketAddr::new(self.host, self.port)
    }
}

fn de_log_level<'de, D>(deserializer: D) -> Result<log::LevelFilter, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let s = String::deserialize(deserializer)?;
    Ok(log::LevelFilter::from_str(&s).unwrap_or_else(|_| default_log_level()))
}

const fn default_host() -> IpAddr {
    IpAddr::V4(Ipv4Addr::UNSPECIFIED)
}

const fn default_port() -> u16 {
    8000
}

const fn default_log_level() -> log::LevelFilter {
    log::LevelFilter::Info
}

impl Default for ServerSettings {
    #[inline]
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            log_level: default_log_level(),
        }
    }
}

#[derive(Clone, Debug, Deserialize, PartialEq, Eq)]
pub struct DatabaseSettings {
    /// `"memory"`, or the directory the database lives in.
    /// When unset (or empty) the daemon runs without a database.
    #[serde(default)]
    pub path: Option<String>,
    #[serde(default = "default_namespace")]
    pub namespace: String,
    #[serde(default = "default_database_name")]
    pub name: String,
}

impl DatabaseSettings {
    /// Where the configured database lives, if one is configured.
    #[must_use]
    pub fn location(&self) -> Option<DatabaseLocation> {
        self.path
            .as_deref()
            .map(str::trim)
            .filter(|path| !path.is_empty())
            .map(DatabaseLocation::from_setting)
    }

    #[must_use]
    pub fn store_info(&self) -> StoreInfo {
        StoreInfo {
            location: self.location(),
            namespace: self.namespace.clone(),
            name: self.name.clone(),
        }
    }
}

fn default_namespace() -> String {
    "aurca".to_owned()
}

fn default_database_name() -> String {
    "sound".to_owned()
}

impl Default for DatabaseSettings {
    #[inline]
    fn default() -> Self {
        Self {
            path: None,
            namespace: default_namespace(),
            name: default_database_name(),
        }
    }
}
