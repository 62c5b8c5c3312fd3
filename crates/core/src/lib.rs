pub mod catalog;
pub mod config;
pub mod metrics;
pub mod row_store;
pub mod search;
pub mod testing;
pub mod trending;

pub use catalog::{CatalogEndpoint, CatalogError, Movie, MovieCatalog, TmdbClient, TmdbConfig};
pub use config::{
    load_config, load_config_from_str, validate_config, Config, ConfigError, SanitizedConfig,
    ServerConfig, TrendStoreBackend, TrendStoreConfig,
};
pub use row_store::{
    create_row_store, AppwriteConfig, AppwriteRowStore, InMemoryRowStore, Row, RowQuery,
    RowStore, RowStoreError,
};
pub use search::{SearchConfig, SearchCoordinator, SearchState, FETCH_ERROR_MESSAGE};
pub use trending::{RecordOutcome, SearchTermRow, TrendError, TrendStore};
