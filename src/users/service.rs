use std::fmt::Display;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use super::models::{RegisteredUser, User, UserDocument};
use crate::utils::query::Query;
use crate::Id;

#[derive(Serialize, Deserialize, Debug, Default)]
pub struct UserQueryOptions {
    /// Case-insensitive substring over first name, last name, phone, email.
    pub search: Option<String>,
}

#[derive(Serialize, Deserialize, Debug, Clone, Copy)]
pub enum UserOrderField {
    CreatedAt,
    FirstName,
}

pub type UserQuery = Query<UserQueryOptions, UserOrderField>;

#[async_trait]
pub trait UserService {
    /// Registers an account and issues its api token.
    async fn create(&self, user: &User) -> Result<RegisteredUser, UserError>;

    async fn read(&self, id: Id) -> Result<UserDocument, UserError>;

    async fn update(&self, id: Id, user: &User) -> Result<UserDocument, UserError>;

    async fn delete(&self, id: Id) -> Result<(), UserError>;

    async fn list(&self, query: &UserQuery) -> Result<Vec<UserDocument>, UserError>;

    /// Resolves a bearer token to the account it was issued to.
    async fn find_by_token(&self, token: &str) -> Result<Option<UserDocument>, UserError>;
}

#[derive(Debug, PartialEq, Eq)]
pub enum UserError {
    StorageError,
    UserNotFound(String),
    /// Phone or email already registered.
    DuplicateIdentity(String),
    MappingError,
}

impl Display for UserError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            UserError::StorageError => write!(f, "storage error"),
            UserError::UserNotFound(id) => write!(f, "user {} not found", id),
            UserError::DuplicateIdentity(what) => write!(f, "{} already registered", what),
            UserError::MappingError => write!(f, "corrupted user row"),
        }
    }
}

impl std::error::Error for UserError {}
