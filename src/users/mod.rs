pub mod backend;
pub mod models;
pub mod service;

pub use backend::UserSqlService;
pub use models::{RegisteredUser, User, UserDocument, UserSummary};
pub use service::{UserError, UserOrderField, UserQuery, UserQueryOptions, UserService};
