//! Filter predicates over user records
//!
//! A [`UserFilter`] is a plain value: it can be stored, composed, evaluated
//! in memory with [`UserFilter::matches`], or rendered to SQL by a store.
//! Multi-term conditions get a name in [`predicates`] instead of being
//! written inline at the call site.

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use crate::types::{GenderCode, User};

/// A predicate over `User` records
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "value", rename_all = "snake_case")]
pub enum UserFilter {
    /// `is_active = true`
    Active,

    /// `gender = code`
    Gender(GenderCode),

    /// `registered_at >= timestamp` (inclusive)
    RegisteredSince(NaiveDateTime),

    /// `user_id = id` (external business key)
    ExternalId(i64),

    /// Conjunction; the empty conjunction matches every record
    All(Vec<UserFilter>),
}

impl UserFilter {
    /// Evaluate the predicate against a record in memory
    pub fn matches(&self, user: &User) -> bool {
        match self {
            Self::Active => user.is_active,
            Self::Gender(code) => user.gender == *code,
            Self::RegisteredSince(since) => user.registered_at >= *since,
            Self::ExternalId(id) => user.user_id == *id,
            Self::All(terms) => terms.iter().all(|term| term.matches(user)),
        }
    }

    /// Conjoin two predicates, flattening nested conjunctions
    #[must_use]
    pub fn and(self, other: UserFilter) -> UserFilter {
        let mut terms = match self {
            Self::All(terms) => terms,
            single => vec![single],
        };
        match other {
            Self::All(more) => terms.extend(more),
            single => terms.push(single),
        }
        Self::All(terms)
    }

    /// Whether the predicate accepts every record
    pub fn is_trivial(&self) -> bool {
        match self {
            Self::All(terms) => terms.iter().all(Self::is_trivial),
            _ => false,
        }
    }
}

/// Named, reusable predicates
pub mod predicates {
    use chrono::{Local, NaiveDateTime, NaiveTime};

    use super::UserFilter;
    use crate::types::MALE;

    /// Users with the active flag set
    pub fn active_users() -> UserFilter {
        UserFilter::Active
    }

    /// The user with the given external id
    pub fn with_external_id(user_id: i64) -> UserFilter {
        UserFilter::ExternalId(user_id)
    }

    /// Active male users registered at or after `since`
    pub fn active_male_users_registered_since(since: NaiveDateTime) -> UserFilter {
        UserFilter::All(vec![
            UserFilter::Active,
            UserFilter::Gender(MALE),
            UserFilter::RegisteredSince(since),
        ])
    }

    /// Active male users registered since local midnight
    pub fn active_male_users_registered_today() -> UserFilter {
        active_male_users_registered_since(start_of_today())
    }

    /// Local midnight of the current calendar day
    pub fn start_of_today() -> NaiveDateTime {
        Local::now().date_naive().and_time(NaiveTime::MIN)
    }
}
