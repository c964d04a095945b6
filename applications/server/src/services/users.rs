/// User query service
use chrono::NaiveDateTime;
use roster_core::{
    filter::predicates,
    query::UserQuery,
    types::{NewUser, RecordId, User, UserContact},
    Result, UserStore,
};
use std::sync::Arc;

/// Read and write operations over user records
///
/// Each operation builds one query and issues it against the store. Store
/// failures are returned unchanged; "not found" on lookups is `None`.
#[derive(Clone)]
pub struct UserQueryService {
    store: Arc<dyn UserStore>,
}

impl UserQueryService {
    pub fn new(store: Arc<dyn UserStore>) -> Self {
        Self { store }
    }

    /// Name and mail of every active user
    ///
    /// The projection is applied in the query, so only those two columns are
    /// read from the store.
    pub async fn list_active_users(&self) -> Result<Vec<UserContact>> {
        UserQuery::all()
            .filter(predicates::active_users())
            .select_contacts()
            .fetch_all(self.store.as_ref())
            .await
    }

    /// Add every user in one batch with a single commit
    ///
    /// All-or-nothing: if the store rejects any record, none are kept.
    pub async fn create_users(&self, users: Vec<NewUser>) -> Result<u64> {
        let created = self.store.add_users(&users).await?;
        tracing::info!(created, "users created");
        Ok(created)
    }

    /// Active male users registered since local midnight
    pub async fn find_active_males_registered_today(&self) -> Result<Vec<User>> {
        UserQuery::all()
            .filter(predicates::active_male_users_registered_today())
            .fetch_all(self.store.as_ref())
            .await
    }

    /// Active male users registered at or after `since`
    pub async fn find_active_males_registered_since(
        &self,
        since: NaiveDateTime,
    ) -> Result<Vec<User>> {
        UserQuery::all()
            .filter(predicates::active_male_users_registered_since(since))
            .fetch_all(self.store.as_ref())
            .await
    }

    /// The user with the given external id, if any
    pub async fn find_user_by_external_id(&self, user_id: i64) -> Result<Option<User>> {
        UserQuery::all()
            .filter(predicates::with_external_id(user_id))
            .fetch_first(self.store.as_ref())
            .await
    }

    /// Full records of every active user
    ///
    /// Same result as filtering in one expression; the query is assembled
    /// first and only evaluated on `fetch_all`.
    pub async fn list_active_users_alt(&self) -> Result<Vec<User>> {
        let mut query = UserQuery::all();
        query = query.filter(predicates::active_users());

        query.fetch_all(self.store.as_ref()).await
    }

    // Single-record operations behind the form endpoints

    pub async fn get_user(&self, id: RecordId) -> Result<Option<User>> {
        self.store.get_user(id).await
    }

    pub async fn create_user(&self, user: NewUser) -> Result<User> {
        let user = self.store.add_user(user).await?;
        tracing::info!(id = %user.id, user_id = user.user_id, "user created");
        Ok(user)
    }

    pub async fn edit_user(&self, id: RecordId, user: NewUser) -> Result<User> {
        let user = self.store.update_user(id, user).await?;
        tracing::info!(%id, "user updated");
        Ok(user)
    }

    pub async fn delete_user(&self, id: RecordId) -> Result<()> {
        self.store.delete_user(id).await?;
        tracing::info!(%id, "user deleted");
        Ok(())
    }
}
