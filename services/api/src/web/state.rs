//! services/api/src/web/state.rs
//!
//! Defines the application's shared state.

use crate::config::Config;
use fuelsplit_core::ports::HistoryStore;
use std::sync::Arc;

/// The shared application state, created once at startup and passed to
/// all handlers. The history store is held behind its port trait so the
/// handlers never see the database directly.
#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn HistoryStore>,
    pub config: Arc<Config>,
}
