use serde::{Deserialize, Serialize};
use sqlx::types::chrono::NaiveDateTime;

use crate::Id;

/// Account payload as submitted by a caller. The stored row additionally
/// carries the id, the api token and the creation timestamp.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct User {
    pub first_name: String,
    pub last_name: String,
    pub phone: String,
    pub email: String,
    pub image: Option<String>,
}

#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct UserDocument {
    pub id: Id,
    pub first_name: String,
    pub last_name: String,
    pub phone: String,
    pub email: String,
    pub image: Option<String>,
    pub created_at: NaiveDateTime,
}

/// Returned once, on registration. The token is never part of any other
/// representation.
#[derive(Serialize, Deserialize, Debug)]
pub struct RegisteredUser {
    #[serde(flatten)]
    pub user: UserDocument,
    pub token: String,
}

/// Short form embedded in shop, review and like documents.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct UserSummary {
    pub id: Id,
    pub first_name: String,
    pub last_name: String,
    pub phone: String,
    pub image: Option<String>,
}
