//! Roster Core
//!
//! Storage-agnostic domain types, filter predicates and query descriptions
//! for the Roster user query service.
//!
//! # Architecture
//!
//! The core crate defines:
//! - **Domain Types**: `User`, `NewUser`, `UserContact`, `RecordId`
//! - **Predicates**: `UserFilter` values and the named predicates built from them
//! - **Deferred Queries**: `UserQuery` / `ContactQuery`, evaluated only on `fetch_*`
//! - **Storage Trait**: `UserStore`, the Record Store seam
//! - **Error Handling**: Unified `RosterError` and `Result` types
//!
//! # Example
//!
//! ```rust
//! use roster_core::filter::predicates;
//! use roster_core::query::UserQuery;
//!
//! // Nothing is evaluated here; the query is only a description.
//! let query = UserQuery::all().filter(predicates::active_users());
//! let contacts = query.select_contacts();
//! # let _ = contacts;
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod error;
pub mod filter;
pub mod query;
pub mod storage;
pub mod types;

// Re-export commonly used types
pub use error::{Result, RosterError};
pub use filter::UserFilter;
pub use query::{ContactQuery, UserQuery};
pub use storage::UserStore;

pub use types::{GenderCode, NewUser, RecordId, User, UserContact, MALE};
