//! Search page coordination: debounced input, catalog fetches, trending list.

mod config;
mod coordinator;
mod debounce;
mod state;

pub use config::SearchConfig;
pub use coordinator::SearchCoordinator;
pub use debounce::Debouncer;
pub use state::{SearchState, FETCH_ERROR_MESSAGE};
