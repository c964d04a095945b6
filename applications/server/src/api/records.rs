/// Form-driven record API routes
///
/// Create, edit and delete single records from form-encoded input. A
/// successful write redirects to the users index; any failure re-displays
/// the submitted input together with the error.
use crate::{api::USERS_INDEX, error::Result, error::ServerError, state::AppState};
use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Redirect, Response},
    Form, Json,
};
use chrono::{Local, NaiveDateTime};
use roster_core::types::{GenderCode, NewUser, RecordId, User};
use serde::{Deserialize, Serialize};

const DATETIME_FORMATS: [&str; 3] = ["%Y-%m-%dT%H:%M:%S", "%Y-%m-%dT%H:%M", "%Y-%m-%d %H:%M:%S"];

/// Raw user form as submitted
///
/// Every field stays a string so a rejected form can be echoed back
/// exactly as it was entered.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
pub struct UserForm {
    #[serde(default)]
    pub user_id: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub mail: String,
    #[serde(default)]
    pub city: String,
    #[serde(default)]
    pub gender: String,
    /// Checkbox; present ("on"/"true") when ticked
    #[serde(default)]
    pub is_active: Option<String>,
    /// `datetime-local` value; defaults to now when blank
    #[serde(default)]
    pub registered_at: String,
}

impl UserForm {
    /// Parse the form into a record
    pub fn parse(&self) -> std::result::Result<NewUser, String> {
        let user_id = self
            .user_id
            .trim()
            .parse::<i64>()
            .map_err(|_| format!("user_id must be an integer, got {:?}", self.user_id))?;

        let name = self.name.trim();
        if name.is_empty() {
            return Err("name is required".to_string());
        }

        let mail = self.mail.trim();
        if !mail.contains('@') {
            return Err(format!("mail must be an address, got {:?}", self.mail));
        }

        let gender = self
            .gender
            .trim()
            .parse::<GenderCode>()
            .map_err(|_| format!("gender must be a small integer, got {:?}", self.gender))?;

        let is_active = matches!(
            self.is_active.as_deref().map(str::trim),
            Some("on" | "true" | "1")
        );

        let registered_at = match self.registered_at.trim() {
            "" => Local::now().naive_local(),
            raw => parse_datetime(raw)
                .ok_or_else(|| format!("registered_at is not a date/time: {raw:?}"))?,
        };

        Ok(NewUser {
            user_id,
            name: name.to_string(),
            mail: mail.to_string(),
            city: self.city.trim().to_string(),
            gender,
            is_active,
            registered_at,
        })
    }
}

fn parse_datetime(raw: &str) -> Option<NaiveDateTime> {
    DATETIME_FORMATS
        .iter()
        .find_map(|format| NaiveDateTime::parse_from_str(raw, format).ok())
}

/// The input being re-displayed with the reason it was rejected
#[derive(Debug, Serialize)]
pub struct FormView<T> {
    pub input: T,
    pub error: String,
}

/// Result of a form submission
#[derive(Debug)]
pub enum FormOutcome<T> {
    /// Redirect to the index view
    Saved,
    /// Show the input again
    Redisplay(FormView<T>),
}

impl<T> FormOutcome<T> {
    fn redisplay(input: T, error: impl ToString) -> Self {
        Self::Redisplay(FormView {
            input,
            error: error.to_string(),
        })
    }
}

impl<T: Serialize> IntoResponse for FormOutcome<T> {
    fn into_response(self) -> Response {
        match self {
            FormOutcome::Saved => Redirect::to(USERS_INDEX).into_response(),
            FormOutcome::Redisplay(view) => {
                (StatusCode::UNPROCESSABLE_ENTITY, Json(view)).into_response()
            }
        }
    }
}

/// GET /api/users/:id
/// Record details by internal id
pub async fn details(
    Path(id): Path<RecordId>,
    State(app_state): State<AppState>,
) -> Result<Json<User>> {
    let user = app_state
        .users
        .get_user(id)
        .await?
        .ok_or_else(|| ServerError::NotFound(format!("No user with id {id}")))?;

    Ok(Json(user))
}

/// POST /api/users/create
pub async fn create(
    State(app_state): State<AppState>,
    Form(form): Form<UserForm>,
) -> FormOutcome<UserForm> {
    let user = match form.parse() {
        Ok(user) => user,
        Err(reason) => return FormOutcome::redisplay(form, reason),
    };

    match app_state.users.create_user(user).await {
        Ok(_) => FormOutcome::Saved,
        Err(e) => {
            tracing::warn!("create failed: {}", e);
            FormOutcome::redisplay(form, e)
        }
    }
}

fn parse_record_id(raw: &str) -> std::result::Result<RecordId, String> {
    raw.trim()
        .parse()
        .map_err(|_| format!("record id must be an integer, got {raw:?}"))
}

/// POST /api/users/:id/edit
pub async fn edit(
    Path(raw_id): Path<String>,
    State(app_state): State<AppState>,
    Form(form): Form<UserForm>,
) -> FormOutcome<UserForm> {
    let id = match parse_record_id(&raw_id) {
        Ok(id) => id,
        Err(reason) => return FormOutcome::redisplay(form, reason),
    };

    let user = match form.parse() {
        Ok(user) => user,
        Err(reason) => return FormOutcome::redisplay(form, reason),
    };

    match app_state.users.edit_user(id, user).await {
        Ok(_) => FormOutcome::Saved,
        Err(e) => {
            tracing::warn!(%id, "edit failed: {}", e);
            FormOutcome::redisplay(form, e)
        }
    }
}

/// POST /api/users/:id/delete
pub async fn delete(
    Path(raw_id): Path<String>,
    State(app_state): State<AppState>,
) -> FormOutcome<String> {
    let id = match parse_record_id(&raw_id) {
        Ok(id) => id,
        Err(reason) => return FormOutcome::redisplay(raw_id, reason),
    };

    match app_state.users.delete_user(id).await {
        Ok(()) => FormOutcome::Saved,
        Err(e) => {
            tracing::warn!(%id, "delete failed: {}", e);
            FormOutcome::redisplay(raw_id, e)
        }
    }
}
