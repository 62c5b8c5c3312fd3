use super::{types::Config, ConfigError, TrendStoreBackend};

/// Validate configuration
/// Currently validates:
/// - Server port is not 0
/// - Catalog API key is set
/// - Debounce period and trending limit are positive
/// - Appwrite backend has project, database and table IDs
pub fn validate_config(config: &Config) -> Result<(), ConfigError> {
    if config.server.port == 0 {
        return Err(ConfigError::ValidationError(
            "server.port cannot be 0".to_string(),
        ));
    }

    if config.catalog.api_key.is_empty() {
        return Err(ConfigError::ValidationError(
            "catalog.api_key must be set".to_string(),
        ));
    }

    if config.search.debounce_ms == 0 {
        return Err(ConfigError::ValidationError(
            "search.debounce_ms cannot be 0".to_string(),
        ));
    }

    let trend_store = &config.trend_store;
    if trend_store.trending_limit == 0 {
        return Err(ConfigError::ValidationError(
            "trend_store.trending_limit cannot be 0".to_string(),
        ));
    }

    if trend_store.backend == TrendStoreBackend::Appwrite {
        let appwrite = trend_store.appwrite.as_ref().ok_or_else(|| {
            ConfigError::ValidationError(
                "trend_store.appwrite must be set when backend = \"appwrite\"".to_string(),
            )
        })?;

        for (name, value) in [
            ("trend_store.appwrite.project_id", &appwrite.project_id),
            ("trend_store.database_id", &trend_store.database_id),
            ("trend_store.table_id", &trend_store.table_id),
        ] {
            if value.is_empty() {
                return Err(ConfigError::ValidationError(format!(
                    "{} must be set",
                    name
                )));
            }
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::load_config_from_str;

    fn appwrite_config() -> Config {
        load_config_from_str(
            r#"
[catalog]
api_key = "k"

[trend_store]
database_id = "db"
table_id = "metrics"

[trend_store.appwrite]
project_id = "proj"
"#,
        )
        .unwrap()
    }

    fn assert_invalid(config: &Config) {
        let result = validate_config(config);
        assert!(matches!(result, Err(ConfigError::ValidationError(_))));
    }

    #[test]
    fn test_validate_valid_config() {
        assert!(validate_config(&appwrite_config()).is_ok());
    }

    #[test]
    fn test_validate_port_zero_fails() {
        let mut config = appwrite_config();
        config.server.port = 0;
        assert_invalid(&config);
    }

    #[test]
    fn test_validate_empty_api_key_fails() {
        let mut config = appwrite_config();
        config.catalog.api_key.clear();
        assert_invalid(&config);
    }

    #[test]
    fn test_validate_zero_debounce_fails() {
        let mut config = appwrite_config();
        config.search.debounce_ms = 0;
        assert_invalid(&config);
    }

    #[test]
    fn test_validate_zero_trending_limit_fails() {
        let mut config = appwrite_config();
        config.trend_store.trending_limit = 0;
        assert_invalid(&config);
    }

    #[test]
    fn test_validate_appwrite_requires_table() {
        let mut config = appwrite_config();
        config.trend_store.table_id.clear();
        assert_invalid(&config);

        let mut config = appwrite_config();
        config.trend_store.appwrite = None;
        assert_invalid(&config);
    }

    #[test]
    fn test_validate_memory_backend_needs_no_ids() {
        let mut config = appwrite_config();
        config.trend_store.backend = TrendStoreBackend::Memory;
        config.trend_store.appwrite = None;
        config.trend_store.table_id.clear();
        assert!(validate_config(&config).is_ok());
    }
}
