/// API route modules
pub mod health;
pub mod records;
pub mod users;

use crate::state::AppState;
use axum::{
    routing::{get, post},
    Router,
};

/// Index view that successful writes redirect to
pub const USERS_INDEX: &str = "/api/users";

/// All `/api` routes, without outer layers
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/health", get(health::health))
        // Query operations
        .route("/users", get(users::list_active_users))
        .route("/users/active", get(users::list_active_users_alt))
        .route(
            "/users/registered-today",
            get(users::find_active_males_registered_today),
        )
        .route(
            "/users/external/:user_id",
            get(users::find_user_by_external_id),
        )
        .route("/users/bulk", post(users::create_users))
        // Form-driven record operations
        .route("/users/create", post(records::create))
        .route("/users/:id", get(records::details))
        .route("/users/:id/edit", post(records::edit))
        .route("/users/:id/delete", post(records::delete))
}

/// Complete application router
pub fn router(app_state: AppState) -> Router {
    Router::new().nest("/api", routes()).with_state(app_state)
}
