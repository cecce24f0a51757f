//! Durable client configuration and the signed-in session.
//!
//! Everything lives in one JSON file under the user config dir. Saves go
//! through [`ConfigStore`] so the location is injectable; nothing in the
//! library reads the session ambiently.

use std::env;
use std::fmt;
use std::fs;
use std::io::ErrorKind;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};

const API_BASE_ENV: &str = "STORIQ_API_URL";
const DEFAULT_API_BASE: &str = "http://localhost:3000";

#[derive(Debug)]
pub enum ConfigError {
    /// No config file exists yet at the given path.
    Missing(PathBuf),
    Io(std::io::Error),
    Parse(String),
    InvalidToken(String),
    NoConfigDir,
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::Missing(path) => {
                write!(
                    f,
                    "Missing STORIQ config at {}. Run `storiq login <token> <user-id>` first.",
                    path.display()
                )
            }
            ConfigError::Io(err) => write!(f, "Filesystem error: {err}"),
            ConfigError::Parse(err) => write!(f, "{err}"),
            ConfigError::InvalidToken(err) => write!(f, "{err}"),
            ConfigError::NoConfigDir => {
                write!(f, "Could not determine the user configuration directory")
            }
        }
    }
}

impl std::error::Error for ConfigError {}

impl From<std::io::Error> for ConfigError {
    fn from(value: std::io::Error) -> Self {
        ConfigError::Io(value)
    }
}

/// The signed-in user as the backend identifies them.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    pub id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
}

/// Bearer token plus the user it belongs to.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Session {
    pub token: String,
    pub user: User,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// API base URL. Falls back to STORIQ_API_URL, then localhost.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub session: Option<Session>,
}

/// Loads and saves the config file at a fixed path.
#[derive(Debug, Clone)]
pub struct ConfigStore {
    path: PathBuf,
}

impl ConfigStore {
    pub fn new(path: PathBuf) -> Self {
        Self { path }
    }

    /// The standard location: `<config_dir>/storiq/config.json`.
    pub fn default_location() -> Result<Self, ConfigError> {
        let mut path = dirs::config_dir().ok_or(ConfigError::NoConfigDir)?;
        path.push("storiq");
        path.push("config.json");
        Ok(Self { path })
    }

    pub fn path(&self) -> &PathBuf {
        &self.path
    }

    pub fn load(&self) -> Result<Config, ConfigError> {
        let contents = match fs::read_to_string(&self.path) {
            Ok(contents) => contents,
            Err(err) if err.kind() == ErrorKind::NotFound => {
                return Err(ConfigError::Missing(self.path.clone()));
            }
            Err(err) => return Err(ConfigError::from(err)),
        };

        serde_json::from_str(&contents).map_err(|err| {
            ConfigError::Parse(format!(
                "Failed to parse STORIQ config {}: {err}",
                self.path.display()
            ))
        })
    }

    /// Loads the config, treating a missing file as empty.
    pub fn load_or_default(&self) -> Result<Config, ConfigError> {
        match self.load() {
            Ok(config) => Ok(config),
            Err(ConfigError::Missing(_)) => Ok(Config::default()),
            Err(err) => Err(err),
        }
    }

    pub fn save(&self, config: &Config) -> Result<(), ConfigError> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }
        let payload = serde_json::to_string_pretty(config).map_err(|err| {
            ConfigError::Parse(format!(
                "Failed to serialize STORIQ config at {}: {err}",
                self.path.display()
            ))
        })?;
        fs::write(&self.path, payload).map_err(ConfigError::from)
    }

    /// Stores a session, preserving the rest of the config. The token is
    /// validated before anything is written.
    pub fn store_session(&self, session: Session) -> Result<(), ConfigError> {
        let token = validate_token(&session.token, "Login")?;
        let mut config = self.load_or_default()?;
        config.session = Some(Session { token, ..session });
        self.save(&config)
    }

    /// Discards the stored session, keeping everything else.
    pub fn clear_session(&self) -> Result<(), ConfigError> {
        let mut config = self.load_or_default()?;
        config.session = None;
        self.save(&config)
    }
}

/// Resolve API base URL: config file, then env var, then default.
pub fn resolve_api_base(config: &Config) -> String {
    if let Some(url) = &config.api_url {
        if !url.is_empty() {
            return url.clone();
        }
    }
    env::var(API_BASE_ENV).unwrap_or_else(|_| DEFAULT_API_BASE.to_string())
}

pub fn validate_token(token: &str, context: &str) -> Result<String, ConfigError> {
    let trimmed = token.trim();
    if trimmed.is_empty() {
        Err(ConfigError::InvalidToken(format!(
            "{context} must provide a non-empty API token"
        )))
    } else {
        Ok(trimmed.to_owned())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn store_in(dir: &tempfile::TempDir) -> ConfigStore {
        ConfigStore::new(dir.path().join("storiq").join("config.json"))
    }

    #[test]
    fn missing_file_is_a_distinct_error() {
        let dir = tempfile::tempdir().expect("tempdir");
        let store = store_in(&dir);
        assert!(matches!(store.load(), Err(ConfigError::Missing(_))));
        assert!(store.load_or_default().expect("default").session.is_none());
    }

    #[test]
    fn store_session_round_trips() {
        let dir = tempfile::tempdir().expect("tempdir");
        let store = store_in(&dir);
        store
            .store_session(Session {
                token: "  tok_123  ".into(),
                user: User {
                    id: "u1".into(),
                    email: Some("a@b.c".into()),
                    name: None,
                },
            })
            .expect("store");

        let config = store.load().expect("load");
        let session = config.session.expect("session");
        assert_eq!(session.token, "tok_123");
        assert_eq!(session.user.id, "u1");
    }

    #[test]
    fn store_session_preserves_api_url() {
        let dir = tempfile::tempdir().expect("tempdir");
        let store = store_in(&dir);
        store
            .save(&Config {
                api_url: Some("https://api.storiq.app".into()),
                session: None,
            })
            .expect("save");
        store
            .store_session(Session {
                token: "tok".into(),
                user: User {
                    id: "u1".into(),
                    email: None,
                    name: None,
                },
            })
            .expect("store");

        let config = store.load().expect("load");
        assert_eq!(config.api_url.as_deref(), Some("https://api.storiq.app"));
        assert!(config.session.is_some());
    }

    #[test]
    fn empty_token_is_rejected_before_writing() {
        let dir = tempfile::tempdir().expect("tempdir");
        let store = store_in(&dir);
        let result = store.store_session(Session {
            token: "   ".into(),
            user: User {
                id: "u1".into(),
                email: None,
                name: None,
            },
        });
        assert!(matches!(result, Err(ConfigError::InvalidToken(_))));
        assert!(matches!(store.load(), Err(ConfigError::Missing(_))));
    }

    #[test]
    fn config_file_base_url_wins() {
        let config = Config {
            api_url: Some("https://api.storiq.app".into()),
            session: None,
        };
        assert_eq!(resolve_api_base(&config), "https://api.storiq.app");
    }
}
