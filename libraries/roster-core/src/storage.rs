//! Storage trait for the Record Store

use crate::error::Result;
use crate::query::UserQuery;
use crate::types::{NewUser, RecordId, User, UserContact};
use async_trait::async_trait;

/// Record Store holding user records
///
/// Reads hand back owned, detached values: nothing returned here is tracked
/// for write-back, and callers mutate the store only through the explicit
/// write methods.
#[async_trait]
pub trait UserStore: Send + Sync {
    // ========================================================================
    // Reads
    // ========================================================================

    /// Materialize every record matching the query
    async fn load_users(&self, query: &UserQuery) -> Result<Vec<User>>;

    /// Materialize the name/mail projection of every matching record
    async fn load_contacts(&self, query: &UserQuery) -> Result<Vec<UserContact>>;

    /// First matching record; stops at the first hit
    async fn find_first(&self, query: &UserQuery) -> Result<Option<User>>;

    /// Get a record by primary key
    async fn get_user(&self, id: RecordId) -> Result<Option<User>>;

    // ========================================================================
    // Writes
    // ========================================================================

    /// Insert all records in one batch with a single commit
    ///
    /// Either every record is persisted or none is.
    async fn add_users(&self, users: &[NewUser]) -> Result<u64>;

    /// Insert one record
    async fn add_user(&self, user: NewUser) -> Result<User>;

    /// Replace every column of an existing record
    async fn update_user(&self, id: RecordId, user: NewUser) -> Result<User>;

    /// Delete a record
    async fn delete_user(&self, id: RecordId) -> Result<()>;
}
