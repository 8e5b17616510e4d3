//! Shared application state for all routes.

use crate::store::Store;
use std::sync::Arc;

/// The one long-lived persistence handle, passed explicitly to every handler.
#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn Store>,
}

impl AppState {
    pub fn new(store: impl Store + 'static) -> Self {
        AppState {
            store: Arc::new(store),
        }
    }
}
