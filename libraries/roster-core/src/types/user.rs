/// User domain types
use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use super::ids::RecordId;

/// Gender code as stored by the Record Store
///
/// Opaque small integer; only [`MALE`] is given a name.
pub type GenderCode = i16;

/// The gender code compared against by the "active males" predicates
pub const MALE: GenderCode = 1;

/// A persisted user record
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    /// Store-assigned primary key
    pub id: RecordId,

    /// External business key, unique per record
    pub user_id: i64,

    /// Display name
    pub name: String,

    /// Mail address
    pub mail: String,

    /// City
    pub city: String,

    /// Gender code
    pub gender: GenderCode,

    /// Whether the account is active
    pub is_active: bool,

    /// Registration timestamp (no timezone)
    pub registered_at: NaiveDateTime,
}

/// Input for creating a user (everything but the primary key)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewUser {
    /// External business key; the store rejects duplicates
    pub user_id: i64,
    /// Display name
    pub name: String,
    /// Mail address
    pub mail: String,
    /// City
    pub city: String,
    /// Gender code
    pub gender: GenderCode,
    /// Whether the account is active
    pub is_active: bool,
    /// Registration timestamp
    pub registered_at: NaiveDateTime,
}

impl NewUser {
    /// Attach a primary key, producing the persisted shape
    pub fn into_user(self, id: RecordId) -> User {
        User {
            id,
            user_id: self.user_id,
            name: self.name,
            mail: self.mail,
            city: self.city,
            gender: self.gender,
            is_active: self.is_active,
            registered_at: self.registered_at,
        }
    }
}

/// Name-and-mail projection of a user
///
/// Returned by projected queries; only these two columns are read.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserContact {
    /// Display name
    pub name: String,
    /// Mail address
    pub mail: String,
}

impl From<&User> for UserContact {
    fn from(user: &User) -> Self {
        Self {
            name: user.name.clone(),
            mail: user.mail.clone(),
        }
    }
}
