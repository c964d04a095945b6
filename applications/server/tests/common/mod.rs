/// Common test utilities and fixtures
use async_trait::async_trait;
use chrono::{Duration, NaiveDateTime};
use roster_core::{
    filter::predicates::start_of_today,
    query::UserQuery,
    types::{GenderCode, NewUser, RecordId, User, UserContact},
    RosterError, UserStore,
};
use roster_server::{services::UserQueryService, state::AppState};
use roster_storage::LocalStorageContext;
use std::sync::Arc;
use tempfile::TempDir;

/// File-backed test database with migrations applied
///
/// Keep the value alive for the duration of the test; dropping it removes
/// the database directory.
pub struct TestStore {
    pub storage: Arc<LocalStorageContext>,
    _temp_dir: TempDir,
}

impl TestStore {
    pub async fn new() -> Self {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        let db_url = format!("sqlite://{}", temp_dir.path().join("roster.db").display());

        let pool = roster_storage::create_pool(&db_url)
            .await
            .expect("Failed to create pool");
        roster_storage::run_migrations(&pool)
            .await
            .expect("Failed to run migrations");

        Self {
            storage: Arc::new(LocalStorageContext::new(pool)),
            _temp_dir: temp_dir,
        }
    }

    pub fn service(&self) -> UserQueryService {
        UserQueryService::new(self.storage.clone())
    }

    pub fn app_state(&self) -> AppState {
        AppState::from_store(self.storage.clone())
    }
}

/// Test fixture: a user registered at `registered_at`
pub fn new_user(
    user_id: i64,
    is_active: bool,
    gender: GenderCode,
    registered_at: NaiveDateTime,
) -> NewUser {
    NewUser {
        user_id,
        name: format!("User {user_id}"),
        mail: format!("user{user_id}@example.com"),
        city: "Madrid".to_string(),
        gender,
        is_active,
        registered_at,
    }
}

/// Test fixture: an active, non-male user registered at local midnight
pub fn active_user(user_id: i64) -> NewUser {
    new_user(user_id, true, 2, start_of_today())
}

/// One hour before `today` (a local midnight)
pub fn evening_before(today: NaiveDateTime) -> NaiveDateTime {
    today - Duration::hours(1)
}

/// Store whose every call fails as if the database were unreachable
pub struct UnavailableStore;

fn unreachable_store<T>() -> roster_core::Result<T> {
    Err(RosterError::unavailable("pool timed out while waiting for an open connection"))
}

#[async_trait]
impl UserStore for UnavailableStore {
    async fn load_users(&self, _query: &UserQuery) -> roster_core::Result<Vec<User>> {
        unreachable_store()
    }

    async fn load_contacts(&self, _query: &UserQuery) -> roster_core::Result<Vec<UserContact>> {
        unreachable_store()
    }

    async fn find_first(&self, _query: &UserQuery) -> roster_core::Result<Option<User>> {
        unreachable_store()
    }

    async fn get_user(&self, _id: RecordId) -> roster_core::Result<Option<User>> {
        unreachable_store()
    }

    async fn add_users(&self, _users: &[NewUser]) -> roster_core::Result<u64> {
        unreachable_store()
    }

    async fn add_user(&self, _user: NewUser) -> roster_core::Result<User> {
        unreachable_store()
    }

    async fn update_user(&self, _id: RecordId, _user: NewUser) -> roster_core::Result<User> {
        unreachable_store()
    }

    async fn delete_user(&self, _id: RecordId) -> roster_core::Result<()> {
        unreachable_store()
    }
}
