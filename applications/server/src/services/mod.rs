/// Server services
pub mod users;

pub use users::UserQueryService;
