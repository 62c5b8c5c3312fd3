use serde::{Deserialize, Serialize};
use std::net::IpAddr;

use crate::catalog::TmdbConfig;
use crate::row_store::AppwriteConfig;
use crate::search::SearchConfig;
use crate::trending::DEFAULT_TRENDING_LIMIT;

/// Root configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Config {
    pub catalog: TmdbConfig,
    pub trend_store: TrendStoreConfig,
    #[serde(default)]
    pub search: SearchConfig,
    #[serde(default)]
    pub server: ServerConfig,
}

/// Server configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: IpAddr,
    #[serde(default = "default_port")]
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
        }
    }
}

fn default_host() -> IpAddr {
    IpAddr::from([0, 0, 0, 0])
}

fn default_port() -> u16 {
    8080
}

/// Trend store configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct TrendStoreConfig {
    /// Row store backend type
    #[serde(default)]
    pub backend: TrendStoreBackend,
    /// Appwrite-specific configuration (required when backend = "appwrite")
    #[serde(default)]
    pub appwrite: Option<AppwriteConfig>,
    /// Database holding the search term table
    #[serde(default)]
    pub database_id: String,
    /// Search term table
    #[serde(default)]
    pub table_id: String,
    /// Rows in the trending list (default: 5)
    #[serde(default = "default_trending_limit")]
    pub trending_limit: u32,
}

fn default_trending_limit() -> u32 {
    DEFAULT_TRENDING_LIMIT
}

/// Available row store backends
#[derive(Debug, Clone, Default, Deserialize, Serialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum TrendStoreBackend {
    #[default]
    Appwrite,
    /// Process-local, lost on restart
    Memory,
}

/// Sanitized config for API responses (secrets redacted)
#[derive(Debug, Clone, Serialize)]
pub struct SanitizedConfig {
    pub catalog: SanitizedCatalogConfig,
    pub trend_store: SanitizedTrendStoreConfig,
    pub search: SearchConfig,
    pub server: ServerConfig,
}

/// Sanitized catalog config (API key hidden)
#[derive(Debug, Clone, Serialize)]
pub struct SanitizedCatalogConfig {
    pub base_url: String,
    pub image_base_url: String,
    pub api_key_configured: bool,
    pub timeout_secs: u32,
}

/// Sanitized trend store config (API key hidden)
#[derive(Debug, Clone, Serialize)]
pub struct SanitizedTrendStoreConfig {
    pub backend: String,
    pub database_id: String,
    pub table_id: String,
    pub trending_limit: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub appwrite: Option<SanitizedAppwriteConfig>,
}

#[derive(Debug, Clone, Serialize)]
pub struct SanitizedAppwriteConfig {
    pub endpoint: String,
    pub project_id: String,
    pub api_key_configured: bool,
}

impl From<&Config> for SanitizedConfig {
    fn from(config: &Config) -> Self {
        let trend_store = &config.trend_store;
        Self {
            catalog: SanitizedCatalogConfig {
                base_url: config.catalog.base_url().to_string(),
                image_base_url: config.catalog.image_base_url().to_string(),
                api_key_configured: !config.catalog.api_key.is_empty(),
                timeout_secs: config.catalog.timeout_secs,
            },
            trend_store: SanitizedTrendStoreConfig {
                backend: match trend_store.backend {
                    TrendStoreBackend::Appwrite => "appwrite".to_string(),
                    TrendStoreBackend::Memory => "memory".to_string(),
                },
                database_id: trend_store.database_id.clone(),
                table_id: trend_store.table_id.clone(),
                trending_limit: trend_store.trending_limit,
                appwrite: trend_store
                    .appwrite
                    .as_ref()
                    .map(|a| SanitizedAppwriteConfig {
                        endpoint: a.endpoint.clone(),
                        project_id: a.project_id.clone(),
                        api_key_configured: a.api_key.as_ref().is_some_and(|k| !k.is_empty()),
                    }),
            },
            search: config.search.clone(),
            server: config.server.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const MINIMAL: &str = r#"
[catalog]
api_key = "tmdb-token"

[trend_store]
database_id = "db"
table_id = "metrics"

[trend_store.appwrite]
project_id = "proj"
"#;

    #[test]
    fn test_deserialize_minimal_config() {
        let config: Config = toml::from_str(MINIMAL).unwrap();
        assert_eq!(config.catalog.api_key, "tmdb-token");
        assert_eq!(config.catalog.timeout_secs, 30);
        assert_eq!(config.trend_store.backend, TrendStoreBackend::Appwrite);
        assert_eq!(config.trend_store.trending_limit, 5);
        assert_eq!(config.search.debounce_ms, 500);
        assert_eq!(config.server.port, 8080);
        assert_eq!(config.server.host.to_string(), "0.0.0.0");

        let appwrite = config.trend_store.appwrite.as_ref().unwrap();
        assert_eq!(appwrite.endpoint, "https://fra.cloud.appwrite.io/v1");
        assert!(appwrite.api_key.is_none());
    }

    #[test]
    fn test_deserialize_memory_backend() {
        let toml = r#"
[catalog]
api_key = "k"
base_url = "http://localhost:9999/3"

[trend_store]
backend = "memory"

[search]
debounce_ms = 250

[server]
host = "127.0.0.1"
port = 9000
"#;
        let config: Config = toml::from_str(toml).unwrap();
        assert_eq!(config.trend_store.backend, TrendStoreBackend::Memory);
        assert!(config.trend_store.appwrite.is_none());
        assert_eq!(config.catalog.base_url(), "http://localhost:9999/3");
        assert_eq!(config.search.debounce_ms, 250);
        assert_eq!(config.server.port, 9000);
    }

    #[test]
    fn test_deserialize_missing_catalog_fails() {
        let toml = r#"
[trend_store]
backend = "memory"
"#;
        let result: Result<Config, _> = toml::from_str(toml);
        assert!(result.is_err());
    }

    #[test]
    fn test_sanitized_config_hides_keys() {
        let mut config: Config = toml::from_str(MINIMAL).unwrap();
        config.trend_store.appwrite.as_mut().unwrap().api_key = Some("secret-key".to_string());

        let sanitized = SanitizedConfig::from(&config);
        assert!(sanitized.catalog.api_key_configured);
        assert_eq!(sanitized.trend_store.backend, "appwrite");
        assert!(sanitized.trend_store.appwrite.as_ref().unwrap().api_key_configured);

        let json = serde_json::to_string(&sanitized).unwrap();
        assert!(!json.contains("tmdb-token"));
        assert!(!json.contains("secret-key"));
    }
}
