use std::fmt::Display;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_with::{serde_as, DisplayFromStr};

use super::models::{LikeDocument, LikeRemoval, LikeToggle, ProductEngagement, Review, ReviewDocument};
use crate::utils::query::Query;
use crate::Id;

pub const RATING_MIN: i64 = 1;
pub const RATING_MAX: i64 = 5;

#[serde_as]
#[derive(Serialize, Deserialize, Debug, Default)]
pub struct ReviewQueryOptions {
    #[serde_as(as = "Option<DisplayFromStr>")]
    #[serde(default)]
    pub product_id: Option<Id>,
    #[serde_as(as = "Option<DisplayFromStr>")]
    #[serde(default)]
    pub user_id: Option<Id>,
    #[serde_as(as = "Option<DisplayFromStr>")]
    #[serde(default)]
    pub rating: Option<i64>,
}

#[derive(Serialize, Deserialize, Debug, Clone, Copy)]
pub enum ReviewOrderField {
    CreatedAt,
    Rating,
}

pub type ReviewQuery = Query<ReviewQueryOptions, ReviewOrderField>;

/// Likes and reviews for products, plus the derived counters. All writes
/// take the acting identity explicitly; there is no ambient caller state.
#[async_trait]
pub trait EngagementService {
    /// Toggle-on. Atomic insert-or-detect: concurrent toggles on one
    /// (product, user) pair leave exactly one like behind, and the loser
    /// observes `AlreadyExists` rather than a constraint error.
    async fn toggle_like(&self, product_id: Id, user_id: Id)
        -> Result<LikeToggle, EngagementError>;

    /// Toggle-off. Removing an absent like reports `NotFound`, it does
    /// not fail.
    async fn remove_like(
        &self,
        product_id: Id,
        user_id: Id,
    ) -> Result<LikeRemoval, EngagementError>;

    /// Records a review. Reviews are append-only events: the same user may
    /// review the same product any number of times.
    async fn add_review(&self, user_id: Id, review: &Review)
        -> Result<ReviewDocument, EngagementError>;

    async fn read_review(&self, id: Id) -> Result<ReviewDocument, EngagementError>;

    /// All reviews of a product, newest first.
    async fn list_reviews(&self, product_id: Id) -> Result<Vec<ReviewDocument>, EngagementError>;

    async fn query_reviews(&self, query: &ReviewQuery)
        -> Result<Vec<ReviewDocument>, EngagementError>;

    /// All likes of a product, newest first.
    async fn likes_for(&self, product_id: Id) -> Result<Vec<LikeDocument>, EngagementError>;

    async fn aggregate(&self, product_id: Id) -> Result<ProductEngagement, EngagementError>;
}

#[derive(Debug, PartialEq, Eq)]
pub enum EngagementError {
    StorageError,
    ProductNotFound(String),
    ReviewNotFound(String),
    RatingOutOfRange(i64),
    MappingError,
}

impl Display for EngagementError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            EngagementError::StorageError => write!(f, "storage error"),
            EngagementError::ProductNotFound(id) => write!(f, "product {} not found", id),
            EngagementError::ReviewNotFound(id) => write!(f, "review {} not found", id),
            EngagementError::RatingOutOfRange(rating) => {
                write!(
                    f,
                    "rating {} outside {}..={}",
                    rating, RATING_MIN, RATING_MAX
                )
            }
            EngagementError::MappingError => write!(f, "corrupted engagement row"),
        }
    }
}

impl std::error::Error for EngagementError {}
