use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::error::SearchError;

/// Default GraphQL endpoint for the Hardcover API.
pub const DEFAULT_ENDPOINT: &str = "https://api.hardcover.app/v1/graphql";

/// Default per-request timeout.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(60);

const ENV_ENDPOINT: &str = "HARDCOVER_API_URL";
const ENV_AUTHORIZATION: &str = "HARDCOVER_AUTHORIZATION";
const ENV_TIMEOUT: &str = "HARDCOVER_TIMEOUT_SECS";

/// Connection settings for the Hardcover API.
///
/// Loaded once at startup and handed to [`crate::HardcoverClient::new`].
#[derive(Debug, Clone)]
pub struct ApiConfig {
    pub endpoint: String,
    /// Full value of the `authorization` header (e.g. `Bearer ...`).
    pub authorization: Option<String>,
    pub timeout: Duration,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            endpoint: DEFAULT_ENDPOINT.to_string(),
            authorization: None,
            timeout: DEFAULT_TIMEOUT,
        }
    }
}

/// Where a config field's value came from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigSource {
    /// Loaded from an environment variable.
    EnvVar(&'static str),
    /// Loaded from the config file.
    ConfigFile,
    /// Hard-coded default value.
    Default,
    /// Not set anywhere.
    Missing,
}

impl std::fmt::Display for ConfigSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::EnvVar(var) => write!(f, "env ${}", var),
            Self::ConfigFile => write!(f, "config file"),
            Self::Default => write!(f, "default"),
            Self::Missing => write!(f, "not set"),
        }
    }
}

/// Provenance of each API config field.
#[derive(Debug)]
pub struct ConfigSources {
    pub endpoint: ConfigSource,
    pub authorization: ConfigSource,
    pub timeout: ConfigSource,
}

/// The `[hardcover]` table of the config file.
#[derive(Debug, Default, Clone, serde::Deserialize, serde::Serialize)]
pub struct HardcoverSection {
    pub endpoint: Option<String>,
    pub authorization: Option<String>,
    pub timeout_secs: Option<u64>,
}

#[derive(Debug, serde::Deserialize)]
struct ConfigFile {
    hardcover: Option<HardcoverSection>,
}

impl ApiConfig {
    /// Load the API config from environment variables, the config file, or defaults.
    ///
    /// Priority: env vars > config file > defaults. A missing authorization
    /// header is not an error here; the API will reject the request instead.
    /// An explicit `config_file` must exist; the default location may not.
    pub fn load(config_file: Option<&Path>) -> Result<Self, SearchError> {
        let section = match config_file {
            Some(path) => read_section(path, true)?,
            None => match config_path() {
                Some(path) => read_section(&path, false)?,
                None => None,
            },
        };
        Self::resolve(section.as_ref(), |var| std::env::var(var).ok())
    }

    /// Merge a config file section with environment lookups.
    ///
    /// Split out from [`ApiConfig::load`] so the priority rules can be tested
    /// without touching the process environment.
    pub fn resolve(
        section: Option<&HardcoverSection>,
        env: impl Fn(&str) -> Option<String>,
    ) -> Result<Self, SearchError> {
        let endpoint = env(ENV_ENDPOINT)
            .or_else(|| section.and_then(|s| s.endpoint.clone()))
            .unwrap_or_else(|| DEFAULT_ENDPOINT.to_string());

        if !endpoint.starts_with("http://") && !endpoint.starts_with("https://") {
            return Err(SearchError::config(format!(
                "Endpoint must be an http(s) URL, got '{}'",
                endpoint
            )));
        }

        let authorization = env(ENV_AUTHORIZATION)
            .or_else(|| section.and_then(|s| s.authorization.clone()))
            .filter(|v| !v.trim().is_empty());

        let timeout = match env(ENV_TIMEOUT) {
            Some(raw) => {
                let secs = raw.trim().parse::<u64>().map_err(|_| {
                    SearchError::config(format!("{} must be a whole number, got '{}'", ENV_TIMEOUT, raw))
                })?;
                Duration::from_secs(secs)
            }
            None => section
                .and_then(|s| s.timeout_secs)
                .map(Duration::from_secs)
                .unwrap_or(DEFAULT_TIMEOUT),
        };

        Ok(Self {
            endpoint,
            authorization,
            timeout,
        })
    }
}

/// Return the path to the default config file.
pub fn config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|d| d.join("bookharvest").join("config.toml"))
}

/// Determine where each API config field is coming from.
pub fn config_sources(config_file: Option<&Path>) -> ConfigSources {
    let section = match config_file {
        Some(path) => read_section(path, false).ok().flatten(),
        None => config_path().and_then(|p| read_section(&p, false).ok().flatten()),
    };

    let endpoint = if std::env::var(ENV_ENDPOINT).is_ok() {
        ConfigSource::EnvVar(ENV_ENDPOINT)
    } else if section.as_ref().and_then(|s| s.endpoint.as_ref()).is_some() {
        ConfigSource::ConfigFile
    } else {
        ConfigSource::Default
    };

    let authorization = if std::env::var(ENV_AUTHORIZATION).is_ok() {
        ConfigSource::EnvVar(ENV_AUTHORIZATION)
    } else if section
        .as_ref()
        .and_then(|s| s.authorization.as_ref())
        .is_some()
    {
        ConfigSource::ConfigFile
    } else {
        ConfigSource::Missing
    };

    let timeout = if std::env::var(ENV_TIMEOUT).is_ok() {
        ConfigSource::EnvVar(ENV_TIMEOUT)
    } else if section.as_ref().and_then(|s| s.timeout_secs).is_some() {
        ConfigSource::ConfigFile
    } else {
        ConfigSource::Default
    };

    ConfigSources {
        endpoint,
        authorization,
        timeout,
    }
}

/// Read the `[hardcover]` table. A missing file yields `Ok(None)` unless
/// `required` is set.
fn read_section(path: &Path, required: bool) -> Result<Option<HardcoverSection>, SearchError> {
    let content = match std::fs::read_to_string(path) {
        Ok(c) => c,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound && !required => return Ok(None),
        Err(e) => {
            return Err(SearchError::config(format!(
                "Failed to read {}: {}",
                path.display(),
                e
            )));
        }
    };
    let config: ConfigFile = toml::from_str(&content).map_err(|e| {
        SearchError::config(format!("Failed to parse {}: {}", path.display(), e))
    })?;
    Ok(config.hardcover)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn no_env(_: &str) -> Option<String> {
        None
    }

    #[test]
    fn defaults_when_nothing_is_set() {
        let config = ApiConfig::resolve(None, no_env).unwrap();
        assert_eq!(config.endpoint, DEFAULT_ENDPOINT);
        assert_eq!(config.authorization, None);
        assert_eq!(config.timeout, DEFAULT_TIMEOUT);
    }

    #[test]
    fn env_overrides_config_file() {
        let section = HardcoverSection {
            endpoint: Some("https://file.example/graphql".to_string()),
            authorization: Some("Bearer from-file".to_string()),
            timeout_secs: Some(10),
        };
        let env = |var: &str| match var {
            "HARDCOVER_AUTHORIZATION" => Some("Bearer from-env".to_string()),
            _ => None,
        };
        let config = ApiConfig::resolve(Some(&section), env).unwrap();
        assert_eq!(config.endpoint, "https://file.example/graphql");
        assert_eq!(config.authorization.as_deref(), Some("Bearer from-env"));
        assert_eq!(config.timeout, Duration::from_secs(10));
    }

    #[test]
    fn blank_authorization_is_treated_as_missing() {
        let section = HardcoverSection {
            authorization: Some("   ".to_string()),
            ..Default::default()
        };
        let config = ApiConfig::resolve(Some(&section), no_env).unwrap();
        assert_eq!(config.authorization, None);
    }

    #[test]
    fn rejects_non_http_endpoint() {
        let env = |var: &str| (var == "HARDCOVER_API_URL").then(|| "ftp://nope".to_string());
        assert!(matches!(
            ApiConfig::resolve(None, env),
            Err(SearchError::Config(_))
        ));
    }

    #[test]
    fn rejects_bad_timeout() {
        let env = |var: &str| (var == "HARDCOVER_TIMEOUT_SECS").then(|| "soon".to_string());
        assert!(ApiConfig::resolve(None, env).is_err());
    }

    #[test]
    fn reads_section_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(
            &path,
            "[hardcover]\nendpoint = \"https://example.test/v1/graphql\"\ntimeout_secs = 5\n",
        )
        .unwrap();
        let section = read_section(&path, true).unwrap().unwrap();
        assert_eq!(
            section.endpoint.as_deref(),
            Some("https://example.test/v1/graphql")
        );
        assert_eq!(section.timeout_secs, Some(5));
    }

    #[test]
    fn missing_file_is_not_an_error() {
        let dir = tempfile::tempdir().unwrap();
        assert!(read_section(&dir.path().join("absent.toml"), false).unwrap().is_none());
    }

    #[test]
    fn explicit_config_file_must_exist() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("typo.toml");
        assert!(matches!(
            ApiConfig::load(Some(&missing)),
            Err(SearchError::Config(_))
        ));
    }
}
