pub mod client;
pub mod config;
pub mod errors;
pub mod models;
pub mod routes;
pub mod services;
pub mod store;

use std::sync::Arc;

use store::IssueRepository;

/// Shared application state passed to all Axum handlers.
#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn IssueRepository>,
    pub config: config::AppConfig,
}

impl AppState {
    pub fn new(store: Arc<dyn IssueRepository>, config: config::AppConfig) -> Self {
        Self { store, config }
    }
}
