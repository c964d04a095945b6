/// User query API routes
use crate::{api::USERS_INDEX, error::Result, error::ServerError, state::AppState};
use axum::{
    extract::{Path, State},
    response::Redirect,
    Json,
};
use roster_core::types::{NewUser, User, UserContact};

/// GET /api/users
/// Name and mail of every active user
pub async fn list_active_users(
    State(app_state): State<AppState>,
) -> Result<Json<Vec<UserContact>>> {
    let contacts = app_state.users.list_active_users().await?;
    Ok(Json(contacts))
}

/// GET /api/users/active
/// Full records of every active user
pub async fn list_active_users_alt(State(app_state): State<AppState>) -> Result<Json<Vec<User>>> {
    let users = app_state.users.list_active_users_alt().await?;
    Ok(Json(users))
}

/// GET /api/users/registered-today
/// Active male users registered since local midnight
pub async fn find_active_males_registered_today(
    State(app_state): State<AppState>,
) -> Result<Json<Vec<User>>> {
    let users = app_state.users.find_active_males_registered_today().await?;
    Ok(Json(users))
}

/// GET /api/users/external/:user_id
/// Look up a user by external id
pub async fn find_user_by_external_id(
    Path(user_id): Path<i64>,
    State(app_state): State<AppState>,
) -> Result<Json<User>> {
    let user = app_state
        .users
        .find_user_by_external_id(user_id)
        .await?
        .ok_or_else(|| ServerError::NotFound(format!("No user with external id {user_id}")))?;

    Ok(Json(user))
}

/// POST /api/users/bulk
/// Create every user in the body in one batch, then redirect to the index
pub async fn create_users(
    State(app_state): State<AppState>,
    Json(users): Json<Vec<NewUser>>,
) -> Result<Redirect> {
    app_state.users.create_users(users).await?;
    Ok(Redirect::to(USERS_INDEX))
}
