//! End-to-end search page lifecycle with mock collaborators.
//!
//! Time is paused so debounce windows elapse instantly and deterministically.

use std::sync::Arc;
use std::time::Duration;

use reelscout_core::testing::{fixtures, MockMovieCatalog, MockRowStore};
use reelscout_core::{
    RecordOutcome, RowStore, SearchConfig, SearchCoordinator, SearchTermRow, TrendStore,
};

const DB: &str = "db";
const TABLE: &str = "metrics";
const IMAGE_BASE: &str = "https://image.tmdb.org/t/p/w500";

struct Page {
    catalog: MockMovieCatalog,
    store: MockRowStore,
    coordinator: SearchCoordinator,
}

async fn page() -> Page {
    let catalog = MockMovieCatalog::new();
    catalog
        .set_movies(vec![
            fixtures::movie(438631, "Dune", Some("/dune.jpg")),
            fixtures::movie(348, "Alien", Some("/alien.jpg")),
            fixtures::movie(11, "Star Wars", None),
        ])
        .await;

    let store = MockRowStore::new();
    let trends = TrendStore::new(
        Arc::new(store.clone()) as Arc<dyn RowStore>,
        DB,
        TABLE,
        IMAGE_BASE,
    );

    let coordinator = SearchCoordinator::new(
        Arc::new(catalog.clone()),
        Arc::new(trends),
        SearchConfig::default(),
    );

    Page {
        catalog,
        store,
        coordinator,
    }
}

async fn type_text(coordinator: &SearchCoordinator, text: &str, gap: Duration) {
    for end in 1..=text.len() {
        coordinator.on_query_change(&text[..end]);
        tokio::time::sleep(gap).await;
    }
}

fn titles(coordinator: &SearchCoordinator) -> Vec<String> {
    coordinator
        .snapshot()
        .movies
        .into_iter()
        .map(|m| m.title)
        .collect()
}

#[tokio::test(start_paused = true)]
async fn test_start_discovers_popular_and_loads_trending() {
    let page = page().await;
    page.store
        .inner()
        .seed(DB, TABLE, vec![fixtures::search_term_row("r1", "dune", 4)])
        .await;

    page.coordinator.start().await;

    assert_eq!(page.catalog.recorded_queries().await, vec![String::new()]);
    let state = page.coordinator.snapshot();
    assert_eq!(state.movies.len(), 3);
    assert_eq!(state.trending.len(), 1);
    assert_eq!(state.trending[0].search_term, "dune");

    page.coordinator.stop();
}

#[tokio::test(start_paused = true)]
async fn test_typing_fetches_once_with_final_text() {
    let page = page().await;
    page.coordinator.start().await;

    type_text(&page.coordinator, "dune", Duration::from_millis(120)).await;
    assert_eq!(page.coordinator.snapshot().query, "dune");
    assert_eq!(page.catalog.query_count().await, 1);

    tokio::time::sleep(Duration::from_millis(600)).await;

    assert_eq!(
        page.catalog.recorded_queries().await,
        vec![String::new(), "dune".to_string()]
    );
    let state = page.coordinator.snapshot();
    assert_eq!(state.debounced_query, "dune");
    assert_eq!(titles(&page.coordinator), vec!["Dune"]);

    let rows: Vec<SearchTermRow> = page
        .store
        .inner()
        .rows(DB, TABLE)
        .await
        .into_iter()
        .map(|r| SearchTermRow::from_row(r).unwrap())
        .collect();
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0].search_term, "dune");
    assert_eq!(rows[0].poster_url, format!("{}/dune.jpg", IMAGE_BASE));

    page.coordinator.stop();
}

#[tokio::test(start_paused = true)]
async fn test_pauses_between_words_fetch_each_settled_text() {
    let page = page().await;
    page.coordinator.start().await;

    page.coordinator.on_query_change("alien");
    tokio::time::sleep(Duration::from_millis(600)).await;
    page.coordinator.on_query_change("star");
    tokio::time::sleep(Duration::from_millis(600)).await;

    assert_eq!(
        page.catalog.recorded_queries().await,
        vec![String::new(), "alien".to_string(), "star".to_string()]
    );
    assert_eq!(titles(&page.coordinator), vec!["Star Wars"]);

    page.coordinator.stop();
}

#[tokio::test(start_paused = true)]
async fn test_settling_on_same_text_does_not_refetch() {
    let page = page().await;
    page.coordinator.start().await;

    page.coordinator.on_query_change("dune");
    tokio::time::sleep(Duration::from_millis(600)).await;

    page.coordinator.on_query_change("dun");
    tokio::time::sleep(Duration::from_millis(100)).await;
    page.coordinator.on_query_change("dune");
    tokio::time::sleep(Duration::from_millis(600)).await;

    assert_eq!(page.catalog.query_count().await, 2);
    assert_eq!(page.store.create_count().await, 1);

    page.coordinator.stop();
}

#[tokio::test(start_paused = true)]
async fn test_clearing_search_returns_to_discover() {
    let page = page().await;
    page.coordinator.start().await;

    page.coordinator.on_query_change("dune");
    tokio::time::sleep(Duration::from_millis(600)).await;
    page.coordinator.on_query_change("");
    tokio::time::sleep(Duration::from_millis(600)).await;

    assert_eq!(
        page.catalog.recorded_queries().await,
        vec![String::new(), "dune".to_string(), String::new()]
    );
    assert_eq!(page.coordinator.snapshot().movies.len(), 3);
    assert_eq!(page.store.create_count().await, 1);

    page.coordinator.stop();
}

#[tokio::test(start_paused = true)]
async fn test_slow_stale_response_overwrites_newer_results() {
    let page = page().await;
    page.catalog
        .set_delay("alien", Duration::from_secs(2))
        .await;
    page.coordinator.start().await;

    page.coordinator.on_query_change("alien");
    tokio::time::sleep(Duration::from_millis(600)).await;
    assert!(page.coordinator.snapshot().is_loading);

    page.coordinator.on_query_change("dune");
    tokio::time::sleep(Duration::from_millis(600)).await;
    assert_eq!(titles(&page.coordinator), vec!["Dune"]);

    tokio::time::sleep(Duration::from_secs(2)).await;

    let state = page.coordinator.snapshot();
    assert_eq!(state.debounced_query, "dune");
    assert_eq!(titles(&page.coordinator), vec!["Alien"]);
    assert!(!state.is_loading);

    page.coordinator.stop();
}

#[tokio::test(start_paused = true)]
async fn test_stop_discards_pending_input() {
    let page = page().await;
    page.coordinator.start().await;

    page.coordinator.on_query_change("dune");
    tokio::time::sleep(Duration::from_millis(200)).await;
    page.coordinator.stop();
    tokio::time::sleep(Duration::from_secs(1)).await;

    assert_eq!(page.catalog.query_count().await, 1);
    assert_eq!(page.coordinator.snapshot().query, "dune");
}

#[tokio::test(start_paused = true)]
async fn test_concurrent_first_records_can_duplicate_term() {
    let store = MockRowStore::new();
    store.set_list_delay(Duration::from_millis(50)).await;
    let trends = TrendStore::new(
        Arc::new(store.clone()) as Arc<dyn RowStore>,
        DB,
        TABLE,
        IMAGE_BASE,
    );
    let dune = fixtures::movie(438631, "Dune", Some("/dune.jpg"));

    let (a, b) = tokio::join!(
        trends.record_search("dune", &dune),
        trends.record_search("dune", &dune)
    );

    assert!(matches!(a, Some(RecordOutcome::Created(_))));
    assert!(matches!(b, Some(RecordOutcome::Created(_))));

    let rows = store.inner().rows(DB, TABLE).await;
    assert_eq!(rows.len(), 2);
    assert!(rows
        .iter()
        .all(|r| r.get("searchTerm") == Some(&serde_json::json!("dune"))));
}
