pub mod backend;
pub mod models;
pub mod service;

pub use backend::EngagementSqlService;
pub use models::{
    LikeDocument, LikeRemoval, LikeToggle, ProductEngagement, Review, ReviewDocument,
};
pub use service::{
    EngagementError, EngagementService, ReviewOrderField, ReviewQuery, ReviewQueryOptions,
};
