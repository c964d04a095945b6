use crate::users;
use async_trait::async_trait;
use roster_core::{error::Result, query::UserQuery, storage::UserStore, types::*};
use sqlx::SqlitePool;

/// Local storage context using `SQLite`
#[derive(Clone)]
pub struct LocalStorageContext {
    pool: SqlitePool,
}

impl LocalStorageContext {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }
}

#[async_trait]
impl UserStore for LocalStorageContext {
    // Reads
    async fn load_users(&self, query: &UserQuery) -> Result<Vec<User>> {
        users::get_matching(&self.pool, query).await
    }

    async fn load_contacts(&self, query: &UserQuery) -> Result<Vec<UserContact>> {
        users::get_contacts(&self.pool, query).await
    }

    async fn find_first(&self, query: &UserQuery) -> Result<Option<User>> {
        users::find_first(&self.pool, query).await
    }

    async fn get_user(&self, id: RecordId) -> Result<Option<User>> {
        users::get_by_id(&self.pool, id).await
    }

    // Writes
    async fn add_users(&self, new_users: &[NewUser]) -> Result<u64> {
        users::create_many(&self.pool, new_users).await
    }

    async fn add_user(&self, user: NewUser) -> Result<User> {
        users::create(&self.pool, user).await
    }

    async fn update_user(&self, id: RecordId, user: NewUser) -> Result<User> {
        users::update(&self.pool, id, user).await
    }

    async fn delete_user(&self, id: RecordId) -> Result<()> {
        users::delete(&self.pool, id).await
    }
}
