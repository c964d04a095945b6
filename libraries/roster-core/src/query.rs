//! Deferred user queries
//!
//! A [`UserQuery`] only describes what to load. Nothing touches the store
//! until one of the `fetch_*` methods is awaited, so a query can be built in
//! one expression or assembled step by step with the same result.
//!
//! ```rust
//! use roster_core::filter::predicates;
//! use roster_core::query::UserQuery;
//!
//! let eager = UserQuery::all().filter(predicates::active_users());
//!
//! let mut incremental = UserQuery::all();
//! incremental = incremental.filter(predicates::active_users());
//!
//! assert_eq!(eager, incremental);
//! ```

use crate::error::Result;
use crate::filter::UserFilter;
use crate::storage::UserStore;
use crate::types::{User, UserContact};

/// Unevaluated query over user records
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UserQuery {
    filters: Vec<UserFilter>,
}

impl UserQuery {
    /// Every record (unconditional scan)
    pub fn all() -> Self {
        Self::default()
    }

    /// Add a conjunct to the query
    #[must_use]
    pub fn filter(mut self, filter: UserFilter) -> Self {
        self.filters.push(filter);
        self
    }

    /// Project the query down to name and mail
    ///
    /// The projection is part of the query, so the store reads only those
    /// columns.
    #[must_use]
    pub fn select_contacts(self) -> ContactQuery {
        ContactQuery { source: self }
    }

    /// The accumulated conjuncts, in the order they were added
    pub fn filters(&self) -> &[UserFilter] {
        &self.filters
    }

    /// The whole query as a single predicate
    pub fn predicate(&self) -> UserFilter {
        UserFilter::All(self.filters.clone())
    }

    /// Evaluate the query's predicate in memory
    pub fn matches(&self, user: &User) -> bool {
        self.filters.iter().all(|filter| filter.matches(user))
    }

    /// Materialize every matching record
    pub async fn fetch_all(&self, store: &dyn UserStore) -> Result<Vec<User>> {
        store.load_users(self).await
    }

    /// The first matching record, stopping at the first hit
    pub async fn fetch_first(&self, store: &dyn UserStore) -> Result<Option<User>> {
        store.find_first(self).await
    }
}

/// A [`UserQuery`] projected to [`UserContact`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContactQuery {
    source: UserQuery,
}

impl ContactQuery {
    /// The underlying filtered query
    pub fn source(&self) -> &UserQuery {
        &self.source
    }

    /// Materialize the projected rows
    pub async fn fetch_all(&self, store: &dyn UserStore) -> Result<Vec<UserContact>> {
        store.load_contacts(&self.source).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::filter::predicates;
    use crate::types::MALE;

    #[test]
    fn filters_accumulate_in_order() {
        let query = UserQuery::all()
            .filter(UserFilter::Active)
            .filter(UserFilter::Gender(MALE));

        assert_eq!(
            query.filters(),
            &[UserFilter::Active, UserFilter::Gender(MALE)]
        );
        assert_eq!(
            query.predicate(),
            UserFilter::All(vec![UserFilter::Active, UserFilter::Gender(MALE)])
        );
    }

    #[test]
    fn unfiltered_query_is_a_full_scan() {
        let query = UserQuery::all();
        assert!(query.filters().is_empty());
        assert!(query.predicate().is_trivial());
    }

    #[test]
    fn incremental_and_eager_construction_agree() {
        let eager = UserQuery::all().filter(predicates::active_users());

        let mut incremental = UserQuery::all();
        incremental = incremental.filter(predicates::active_users());

        assert_eq!(eager, incremental);
    }

    #[test]
    fn projection_keeps_the_source_filters() {
        let contacts = UserQuery::all()
            .filter(predicates::active_users())
            .select_contacts();
        assert_eq!(contacts.source().filters(), &[UserFilter::Active]);
    }
}
