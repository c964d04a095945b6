/// Shared application state
use crate::services::UserQueryService;
use roster_core::UserStore;
use std::sync::Arc;

/// Application state shared across all handlers
#[derive(Clone)]
pub struct AppState {
    pub users: Arc<UserQueryService>,
}

impl AppState {
    pub fn new(users: Arc<UserQueryService>) -> Self {
        Self { users }
    }

    /// State over any Record Store implementation
    pub fn from_store(store: Arc<dyn UserStore>) -> Self {
        Self::new(Arc::new(UserQueryService::new(store)))
    }
}
