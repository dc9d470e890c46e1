use crate::common::constants::{
    DEFAULT_BACKOFF_BASE_MS, DEFAULT_DIRECTORY_URL, DEFAULT_LINK_TEMPLATE, DEFAULT_MAX_RETRIES,
    DEFAULT_PORT, DEFAULT_TIMEOUT_SECONDS, DEFAULT_USER_AGENT,
};
use crate::common::error::{CatalogError, Result};
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};

pub const CONFIG_PATH_VAR: &str = "CATALOG_CONFIG";
pub const PORT_VAR: &str = "CATALOG_PORT";
pub const DIRECTORY_URL_VAR: &str = "CATALOG_DIRECTORY_URL";

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    pub fetch: FetchConfig,
    pub server: ServerConfig,
    pub directory: DirectoryConfig,
    pub extraction: ExtractionConfig,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct FetchConfig {
    pub timeout_seconds: u64,
    pub max_retries: u32,
    /// Retry n waits `backoff_base_ms * 2^n` milliseconds.
    pub backoff_base_ms: u64,
    /// The catalog host serves a broken certificate chain.
    pub accept_invalid_certs: bool,
    pub user_agent: String,
}

impl Default for FetchConfig {
    fn default() -> Self {
        Self {
            timeout_seconds: DEFAULT_TIMEOUT_SECONDS,
            max_retries: DEFAULT_MAX_RETRIES,
            backoff_base_ms: DEFAULT_BACKOFF_BASE_MS,
            accept_invalid_certs: true,
            user_agent: DEFAULT_USER_AGENT.to_string(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self { port: DEFAULT_PORT }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct DirectoryConfig {
    pub url: String,
}

impl Default for DirectoryConfig {
    fn default() -> Self {
        Self {
            url: DEFAULT_DIRECTORY_URL.to_string(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ExtractionConfig {
    /// Course detail link with `{course}` and `{year}` placeholders.
    pub link_template: String,
}

impl Default for ExtractionConfig {
    fn default() -> Self {
        Self {
            link_template: DEFAULT_LINK_TEMPLATE.to_string(),
        }
    }
}

impl Config {
    /// Load from `$CATALOG_CONFIG` (default `config.toml`) and apply
    /// environment overrides. A missing file yields the defaults.
    pub fn load() -> Result<Self> {
        let path = std::env::var(CONFIG_PATH_VAR)
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from("config.toml"));
        let mut config = Self::load_from(&path)?;
        config.apply_overrides(|name| std::env::var(name).ok())?;
        Ok(config)
    }

    pub fn load_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            tracing::debug!("No config file at {}, using defaults", path.display());
            return Ok(Self::default());
        }
        let content = fs::read_to_string(path).map_err(|e| {
            CatalogError::Config(format!("Failed to read config file '{}': {}", path.display(), e))
        })?;
        let config: Config = toml::from_str(&content)?;
        Ok(config)
    }

    pub fn apply_overrides<F>(&mut self, var: F) -> Result<()>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(port) = var(PORT_VAR) {
            self.server.port = port
                .trim()
                .parse()
                .map_err(|e| CatalogError::Config(format!("{PORT_VAR}='{port}': {e}")))?;
        }
        if let Some(url) = var(DIRECTORY_URL_VAR) {
            self.directory.url = url;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn missing_file_uses_defaults() {
        let config = Config::load_from(Path::new("/nonexistent/catalog.toml")).unwrap();
        assert_eq!(config.fetch.timeout_seconds, 15);
        assert_eq!(config.fetch.max_retries, 3);
        assert!(config.fetch.accept_invalid_certs);
        assert_eq!(config.server.port, DEFAULT_PORT);
    }

    #[test]
    fn partial_file_keeps_other_defaults() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "[fetch]\nmax_retries = 5\n\n[server]\nport = 9000").unwrap();

        let config = Config::load_from(file.path()).unwrap();
        assert_eq!(config.fetch.max_retries, 5);
        assert_eq!(config.fetch.backoff_base_ms, DEFAULT_BACKOFF_BASE_MS);
        assert_eq!(config.server.port, 9000);
        assert_eq!(config.directory.url, DEFAULT_DIRECTORY_URL);
    }

    #[test]
    fn malformed_file_is_an_error() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "[fetch\nmax_retries = ").unwrap();

        assert!(matches!(Config::load_from(file.path()), Err(CatalogError::Toml(_))));
    }

    #[test]
    fn overrides_replace_port_and_directory() {
        let mut config = Config::default();
        config
            .apply_overrides(|name| match name {
                PORT_VAR => Some("3001".to_string()),
                DIRECTORY_URL_VAR => Some("http://localhost/faculties.json".to_string()),
                _ => None,
            })
            .unwrap();

        assert_eq!(config.server.port, 3001);
        assert_eq!(config.directory.url, "http://localhost/faculties.json");
    }

    #[test]
    fn bad_port_override_is_rejected() {
        let mut config = Config::default();
        let result = config.apply_overrides(|name| (name == PORT_VAR).then(|| "http".to_string()));
        assert!(matches!(result, Err(CatalogError::Config(_))));
    }
}
