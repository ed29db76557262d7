//! WeDo configuration.
//!
//! Settings live in `config.toml` inside the WeDo config directory
//! (`~/.config/wedo` unless `WEDO_HOME` points elsewhere). Every key can be
//! overridden from the environment, e.g. `WEDO_API__ENDPOINT` or
//! `WEDO_AUTH__CLIENT_ID`.

use std::path::{Path, PathBuf};

use config::{Environment, File};
use serde::Deserialize;

use crate::error::{WeDoError, WeDoResult};

const DEFAULT_CALLBACK_URL: &str = "http://localhost:3000/callback";

fn default_callback_url() -> String {
    DEFAULT_CALLBACK_URL.to_string()
}

#[derive(Deserialize, Clone, Debug, Default)]
pub struct Config {
    #[serde(default)]
    pub api: ApiConfig,

    #[serde(default)]
    pub auth: AuthConfig,
}

/// Where the invites API lives and the static key sent with every request.
#[derive(Deserialize, Clone, Debug, Default)]
pub struct ApiConfig {
    #[serde(default)]
    pub endpoint: String,

    #[serde(default)]
    pub key: String,
}

/// Auth0-style identity provider used by `wedo login`.
#[derive(Deserialize, Clone, Debug)]
pub struct AuthConfig {
    #[serde(default)]
    pub domain: String,

    #[serde(default)]
    pub client_id: String,

    #[serde(default = "default_callback_url")]
    pub callback_url: String,
}

impl Default for AuthConfig {
    fn default() -> Self {
        AuthConfig {
            domain: String::new(),
            client_id: String::new(),
            callback_url: default_callback_url(),
        }
    }
}

/// The WeDo config directory: `$WEDO_HOME`, or `<platform config dir>/wedo`.
pub fn config_dir() -> WeDoResult<PathBuf> {
    if let Some(home) = std::env::var_os("WEDO_HOME") {
        return Ok(PathBuf::from(home));
    }

    Ok(dirs::config_dir()
        .ok_or_else(|| WeDoError::Config("Could not determine config directory".into()))?
        .join("wedo"))
}

impl Config {
    pub fn config_path() -> WeDoResult<PathBuf> {
        Ok(config_dir()?.join("config.toml"))
    }

    /// Load config from the config directory, writing a commented default on first run.
    pub fn load() -> WeDoResult<Self> {
        Self::load_from(&Self::config_path()?)
    }

    pub fn load_from(path: &Path) -> WeDoResult<Self> {
        if !path.exists() {
            Self::create_default_config(path)?;
        }

        let config: Config = config::Config::builder()
            .add_source(File::from(path.to_path_buf()).required(false))
            .add_source(
                Environment::with_prefix("WEDO")
                    .prefix_separator("_")
                    .separator("__"),
            )
            .build()
            .map_err(|e| WeDoError::Config(e.to_string()))?
            .try_deserialize()
            .map_err(|e| WeDoError::Config(e.to_string()))?;

        log::debug!("Loaded config from {}", path.display());

        Ok(config)
    }

    /// Create a default config file with all options commented out.
    pub fn create_default_config(path: &Path) -> WeDoResult<()> {
        let contents = format!(
            "\
# wedo configuration

[api]
# Base URL of the invites API:
# endpoint = \"https://<api-id>.execute-api.us-east-1.amazonaws.com/dev\"
# key = \"<api key>\"

[auth]
# Auth0 domain and client id used by `wedo login`:
# domain = \"<tenant>.auth0.com\"
# client_id = \"<client id>\"
# callback_url = \"{}\"
",
            DEFAULT_CALLBACK_URL
        );

        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).map_err(|e| {
                WeDoError::Config(format!("Could not create config directory: {e}"))
            })?;
        }

        std::fs::write(path, contents)
            .map_err(|e| WeDoError::Config(format!("Could not write config file: {e}")))?;

        Ok(())
    }
}

impl AuthConfig {
    /// Fail early with a pointer to the config file when login settings are missing.
    pub fn ensure_configured(&self) -> WeDoResult<()> {
        if self.domain.trim().is_empty() || self.client_id.trim().is_empty() {
            return Err(WeDoError::Config(
                "auth.domain and auth.client_id must be set to log in".into(),
            ));
        }
        Ok(())
    }
}
