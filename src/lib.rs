//! Confluence - composite technical signal scoring service

pub mod api;
pub mod config;
pub mod error;
pub mod services;
pub mod types;

use std::sync::Arc;

pub use config::Config;
pub use error::{AppError, ScoreError};
pub use services::SignalStore;

/// Application state shared across handlers.
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
    pub signal_store: Arc<SignalStore>,
}

impl AppState {
    pub fn new(config: Config) -> Self {
        let signal_store = SignalStore::new(&config);
        Self {
            config: Arc::new(config),
            signal_store,
        }
    }
}
