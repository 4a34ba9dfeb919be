//! TOML-based configuration for hops.
//!
//! Settings come from `~/.hops/config.toml` (or the file named by
//! `HOPS_CONFIG`), with environment variable expansion in values.
//!
//! Example configuration:
//! ```toml
//! host = "https://c.app.hopsworks.ai"
//! api_key = "${HOPSWORKS_API_KEY}"
//! project = "fraud"
//! project_id = 119
//! feature_store_id = 67
//!
//! verify_tls = false
//! timeout_secs = 30
//! poll_interval_secs = 10
//! ```
//!
//! Inside the platform, environment variables take precedence over the file:
//! `REST_ENDPOINT`, `HOPSWORKS_API_KEY`, `PROJECT_NAME`, `HOPSWORKS_PROJECT_ID`,
//! and `SECRETS_DIR/token.jwt` for a JWT.

use serde::{Deserialize, Serialize};
use std::env;
use std::fs;
use std::path::{Path, PathBuf};

/// Error type for settings.
#[derive(Debug, thiserror::Error)]
pub enum SettingsError {
    #[error("Config file not found: {0}")]
    FileNotFound(PathBuf),

    #[error("Failed to read config file: {0}")]
    ReadError(#[from] std::io::Error),

    #[error("Failed to parse config file: {0}")]
    ParseError(#[from] toml::de::Error),

    #[error("Failed to write config file: {0}")]
    WriteError(#[from] toml::ser::Error),

    #[error("Missing environment variable: {0}")]
    MissingEnvVar(String),

    #[error("Could not determine home directory")]
    NoHomeDir,

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),
}

/// Root configuration structure.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct Settings {
    /// Hopsworks host, with or without scheme.
    pub host: String,

    /// API key (supports ${ENV_VAR} expansion).
    pub api_key: String,

    /// Active project name.
    pub project: String,

    /// Active project id (0 = none selected).
    pub project_id: i64,

    /// Feature store id (0 = resolve from the project).
    pub feature_store_id: i64,

    /// Verify the server certificate. Clusters commonly use self-signed ones.
    pub verify_tls: bool,

    /// Per-request timeout.
    pub timeout_secs: u64,

    /// Default interval between job status polls.
    pub poll_interval_secs: u64,

    /// JWT from the platform secrets directory. Never persisted.
    #[serde(skip)]
    pub jwt_token: Option<String>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            host: String::new(),
            api_key: String::new(),
            project: String::new(),
            project_id: 0,
            feature_store_id: 0,
            verify_tls: false,
            timeout_secs: 30,
            poll_interval_secs: 10,
            jwt_token: None,
        }
    }
}

impl Settings {
    /// Load settings from a TOML file, expanding environment variables.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, SettingsError> {
        let path = path.as_ref();
        if !path.exists() {
            return Err(SettingsError::FileNotFound(path.to_path_buf()));
        }

        let content = fs::read_to_string(path)?;
        let mut settings: Settings = toml::from_str(&content)?;
        settings.host = expand_env_vars(&settings.host)?;
        settings.api_key = expand_env_vars(&settings.api_key)?;
        settings.project = expand_env_vars(&settings.project)?;
        Ok(settings)
    }

    /// Default config file location.
    ///
    /// `HOPS_CONFIG` wins; otherwise `~/.hops/config.toml`.
    pub fn default_path() -> Result<PathBuf, SettingsError> {
        if let Ok(path) = env::var("HOPS_CONFIG") {
            return Ok(PathBuf::from(path));
        }
        dirs::home_dir()
            .map(|home| home.join(".hops").join("config.toml"))
            .ok_or(SettingsError::NoHomeDir)
    }

    /// Load settings from the default file (if any) plus the environment.
    pub fn load() -> Result<Self, SettingsError> {
        let path = Self::default_path()?;
        let mut settings = if path.exists() {
            Self::from_file(&path)?
        } else {
            Settings::default()
        };

        settings.apply_env(|key| env::var(key).ok());
        Ok(settings)
    }

    /// Apply platform environment overrides.
    ///
    /// Values found through `lookup` replace whatever the file provided.
    pub fn apply_env<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        let non_empty = |key: &str| lookup(key).filter(|v| !v.is_empty());

        if let Some(host) = non_empty("REST_ENDPOINT") {
            self.host = host;
        }
        if let Some(api_key) = non_empty("HOPSWORKS_API_KEY") {
            self.api_key = api_key;
        }
        if let Some(project) = non_empty("PROJECT_NAME") {
            self.project = project;
        }
        if let Some(id) = non_empty("HOPSWORKS_PROJECT_ID").and_then(|v| v.parse().ok()) {
            self.project_id = id;
        }
        if let Some(dir) = non_empty("SECRETS_DIR") {
            let token_path = Path::new(&dir).join("token.jwt");
            if let Ok(token) = fs::read_to_string(token_path) {
                let token = token.trim();
                if !token.is_empty() {
                    self.jwt_token = Some(token.to_string());
                }
            }
        }
    }

    /// Apply command-line overrides; `None` keeps the current value.
    pub fn apply_overrides(
        &mut self,
        host: Option<String>,
        api_key: Option<String>,
        project: Option<String>,
    ) {
        if let Some(host) = host {
            self.host = host;
        }
        if let Some(api_key) = api_key {
            self.api_key = api_key;
        }
        if let Some(project) = project {
            self.project = project;
        }
    }

    /// Check that requests can be authenticated.
    pub fn validate(&self) -> Result<(), SettingsError> {
        if self.host.trim().is_empty() {
            return Err(SettingsError::InvalidConfig(
                "no host configured. Set `host` in the config file or REST_ENDPOINT".to_string(),
            ));
        }
        if self.api_key.is_empty() && self.jwt_token.is_none() {
            return Err(SettingsError::InvalidConfig(
                "no API key or JWT token configured. Set `api_key` or HOPSWORKS_API_KEY"
                    .to_string(),
            ));
        }
        Ok(())
    }

    /// Base URL with scheme and without a trailing slash.
    pub fn base_url(&self) -> String {
        let host = self.host.trim().trim_end_matches('/');
        if host.starts_with("http://") || host.starts_with("https://") {
            host.to_string()
        } else {
            format!("https://{}", host)
        }
    }

    /// Persist the project selection into the config file at `path`.
    ///
    /// Only `project`, `project_id` and `feature_store_id` are written; other
    /// keys in the file are left untouched and unexpanded.
    pub fn save_selection<P: AsRef<Path>>(&self, path: P) -> Result<(), SettingsError> {
        update_file(path.as_ref(), |doc| self.write_selection(doc))
    }

    /// Persist credentials and the project selection, as `hops login` does.
    ///
    /// A stored `host` or `api_key` that already expands to the value in use
    /// is kept verbatim, so `${VAR}` references survive a login.
    pub fn save_login<P: AsRef<Path>>(&self, path: P) -> Result<(), SettingsError> {
        update_file(path.as_ref(), |doc| {
            for (key, value) in [("host", &self.host), ("api_key", &self.api_key)] {
                let unchanged = doc
                    .get(key)
                    .and_then(toml::Value::as_str)
                    .and_then(|stored| expand_env_vars(stored).ok())
                    .is_some_and(|expanded| expanded == *value);
                if !unchanged {
                    doc.insert(key.into(), toml::Value::String(value.clone()));
                }
            }
            self.write_selection(doc);
        })
    }

    fn write_selection(&self, doc: &mut toml::Table) {
        doc.insert("project".into(), toml::Value::String(self.project.clone()));
        doc.insert("project_id".into(), toml::Value::Integer(self.project_id));
        doc.insert(
            "feature_store_id".into(),
            toml::Value::Integer(self.feature_store_id),
        );
    }
}

/// Read the TOML table at `path` (empty if missing), apply `edit`, write back.
fn update_file<F>(path: &Path, edit: F) -> Result<(), SettingsError>
where
    F: FnOnce(&mut toml::Table),
{
    let mut doc: toml::Table = if path.exists() {
        toml::from_str(&fs::read_to_string(path)?)?
    } else {
        toml::Table::new()
    };
    edit(&mut doc);

    if let Some(dir) = path.parent() {
        fs::create_dir_all(dir)?;
    }
    fs::write(path, toml::to_string(&doc)?)?;
    Ok(())
}

/// Expand environment variables in a string.
///
/// Supports `${VAR}` and `$VAR` syntax.
pub fn expand_env_vars(s: &str) -> Result<String, SettingsError> {
    let mut result = String::with_capacity(s.len());
    let mut chars = s.chars().peekable();

    while let Some(c) = chars.next() {
        if c != '$' {
            result.push(c);
            continue;
        }

        let var_name: String = if chars.next_if_eq(&'{').is_some() {
            chars.by_ref().take_while(|&ch| ch != '}').collect()
        } else {
            let mut name = String::new();
            while let Some(ch) = chars.next_if(|ch| ch.is_alphanumeric() || *ch == '_') {
                name.push(ch);
            }
            if name.is_empty() {
                // Lone `$`
                result.push('$');
                continue;
            }
            name
        };

        let value =
            env::var(&var_name).map_err(|_| SettingsError::MissingEnvVar(var_name.clone()))?;
        result.push_str(&value);
    }

    Ok(result)
}
