use serde::{Deserialize, Serialize};
use sqlx::types::chrono::NaiveDateTime;

use crate::users::models::UserSummary;
use crate::Id;

/// Review payload as submitted. The author is never part of the payload;
/// it is the authenticated caller, passed explicitly to the engine.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct Review {
    pub product_id: Id,
    pub rating: i64,
    pub body: String,
}

#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct ReviewDocument {
    pub id: Id,
    pub product_id: Id,
    pub user_id: Id,
    pub rating: i64,
    pub body: String,
    pub user: UserSummary,
    pub created_at: NaiveDateTime,
}

#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct LikeDocument {
    pub id: Id,
    pub product_id: Id,
    pub user_id: Id,
    pub user: UserSummary,
    pub created_at: NaiveDateTime,
}

/// Which branch a like toggle took. A redundant toggle is an outcome,
/// not an error.
#[derive(Debug)]
pub enum LikeToggle {
    Created(LikeDocument),
    AlreadyExists,
}

#[derive(Debug, PartialEq, Eq)]
pub enum LikeRemoval {
    Removed,
    NotFound,
}

/// Derived read-only counters for a product, computed from the current
/// relation sets on every read. `average_rating` is `None` when the product
/// has no reviews; zero reviews never read as a zero-star average.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct ProductEngagement {
    pub review_count: i64,
    pub like_count: i64,
    pub average_rating: Option<f64>,
}
