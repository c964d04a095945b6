//! Domain types for Roster

mod ids;
mod user;

pub use ids::RecordId;
pub use user::{GenderCode, NewUser, User, UserContact, MALE};
