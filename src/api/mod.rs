pub mod auth;
pub mod catalog;
pub mod products;
pub mod reviews;
pub mod users;

use serde::Serialize;
use serde_json::json;
use tide::{Body, Request, Response, Server};

use crate::catalog::{CatalogError, CatalogSqlService};
use crate::engagement::{EngagementError, EngagementSqlService};
use crate::users::{UserError, UserSqlService};
use crate::Id;

#[derive(Clone)]
pub struct State {
    pub users: UserSqlService,
    pub catalog: CatalogSqlService,
    pub engagement: EngagementSqlService,
}

impl State {
    pub fn new(pool: sqlx::SqlitePool) -> Self {
        Self {
            users: UserSqlService::new(pool.clone()),
            catalog: CatalogSqlService::new(pool.clone()),
            engagement: EngagementSqlService::new(pool),
        }
    }
}

/// The resolved identity of the request, attached by the auth middleware.
#[derive(Clone, Copy, Debug)]
pub struct Caller(pub Id);

pub fn app(state: State) -> Server<State> {
    let mut app = tide::with_state(state);
    app.with(auth::identity_middleware);

    app.at("/").get(version);

    app.at("/users").post(users::create).get(users::list);
    app.at("/users/me").get(users::me);
    app.at("/users/:id")
        .get(users::read)
        .put(users::update)
        .delete(users::delete);
    app.at("/users/:id/shops").get(users::shops);

    app.at("/categories")
        .get(catalog::list_categories)
        .post(catalog::create_category);
    app.at("/categories/:id")
        .get(catalog::read_category)
        .put(catalog::update_category)
        .delete(catalog::delete_category);
    app.at("/categories/:id/subcategories")
        .get(catalog::category_subcategories);
    app.at("/categories/:id/products")
        .get(catalog::category_products);

    app.at("/subcategories")
        .get(catalog::list_subcategories)
        .post(catalog::create_subcategory);
    app.at("/subcategories/:id")
        .get(catalog::read_subcategory)
        .put(catalog::update_subcategory)
        .delete(catalog::delete_subcategory);
    app.at("/subcategories/:id/products")
        .get(catalog::subcategory_products);

    app.at("/shops")
        .get(catalog::list_shops)
        .post(catalog::create_shop);
    app.at("/shops/:id")
        .get(catalog::read_shop)
        .put(catalog::update_shop)
        .delete(catalog::delete_shop);
    app.at("/shops/:id/products").get(catalog::shop_products);

    app.at("/products")
        .get(products::list)
        .post(products::create);
    app.at("/products/discounted").get(products::discounted);
    app.at("/products/:id")
        .get(products::read)
        .put(products::update)
        .delete(products::delete);
    app.at("/products/:id/like")
        .post(products::like)
        .delete(products::unlike);
    app.at("/products/:id/reviews").get(products::product_reviews);

    app.at("/advertisements")
        .get(catalog::list_advertisements)
        .post(catalog::create_advertisement);
    app.at("/advertisements/:id")
        .get(catalog::read_advertisement)
        .put(catalog::update_advertisement)
        .delete(catalog::delete_advertisement);

    app.at("/reviews").post(reviews::create).get(reviews::list);
    app.at("/reviews/:id").get(reviews::read);

    app
}

async fn version(_request: Request<State>) -> tide::Result {
    let mut res = Response::new(200);
    res.set_body(json!({ "version": "1" }));
    Ok(res)
}

pub(crate) fn failure(status: u16, code: &str, message: String) -> Response {
    let mut res = Response::new(status);
    res.set_body(json!({
        "success": false,
        "error": code,
        "error_message": message,
    }));
    res
}

pub(crate) fn unauthorized() -> Response {
    failure(401, "E_UNAUTHORIZED", "authentication required".into())
}

pub(crate) fn ok_json<T: Serialize>(value: &T) -> tide::Result {
    let mut res = Response::new(200);
    res.set_body(Body::from_json(value)?);
    Ok(res)
}

pub(crate) fn respond<T, E>(result: Result<T, E>) -> tide::Result
where
    T: Serialize,
    E: ErrorResponse,
{
    match result {
        Ok(value) => ok_json(&value),
        Err(err) => Ok(err.response()),
    }
}

/// Caller identity, if the auth middleware resolved one.
pub(crate) fn caller(request: &Request<State>) -> Option<Id> {
    request.ext::<Caller>().map(|caller| caller.0)
}

/// Writes are rejected up front when no identity is attached.
pub(crate) fn require_caller(request: &Request<State>) -> Result<Id, Response> {
    caller(request).ok_or_else(unauthorized)
}

pub(crate) fn param_id(request: &Request<State>, name: &str) -> Result<Id, Response> {
    request
        .param(name)
        .ok()
        .and_then(|raw| raw.parse().ok())
        .ok_or_else(|| failure(400, "E_VALIDATION", format!("invalid {} parameter", name)))
}

/// Maps a domain error onto its user-visible response. Every variant keeps
/// a distinct code; nothing collapses into a generic failure.
pub(crate) trait ErrorResponse {
    fn response(&self) -> Response;
}

impl ErrorResponse for CatalogError {
    fn response(&self) -> Response {
        match self {
            CatalogError::EntryNotFound(id) => {
                failure(404, "E_NOT_FOUND", format!("not found the entry {}", id))
            }
            CatalogError::Validation(reason) => failure(400, "E_VALIDATION", reason.clone()),
            CatalogError::StorageError => failure(500, "E_DATABASE", "storage unavailable".into()),
            CatalogError::MappingError => failure(500, "E_MAPPING", "corrupted data".into()),
        }
    }
}

impl ErrorResponse for UserError {
    fn response(&self) -> Response {
        match self {
            UserError::UserNotFound(id) => {
                failure(404, "E_NOT_FOUND", format!("not found the user {}", id))
            }
            UserError::DuplicateIdentity(field) => {
                failure(409, "E_DUPLICATE", format!("{} already registered", field))
            }
            UserError::StorageError => failure(500, "E_DATABASE", "storage unavailable".into()),
            UserError::MappingError => failure(500, "E_MAPPING", "corrupted data".into()),
        }
    }
}

impl ErrorResponse for EngagementError {
    fn response(&self) -> Response {
        match self {
            EngagementError::ProductNotFound(id) => {
                failure(404, "E_NOT_FOUND", format!("not found the product {}", id))
            }
            EngagementError::ReviewNotFound(id) => {
                failure(404, "E_NOT_FOUND", format!("not found the review {}", id))
            }
            EngagementError::RatingOutOfRange(rating) => failure(
                400,
                "E_VALIDATION",
                format!("rating {} outside the 1..=5 range", rating),
            ),
            EngagementError::StorageError => {
                failure(500, "E_DATABASE", "storage unavailable".into())
            }
            EngagementError::MappingError => failure(500, "E_MAPPING", "corrupted data".into()),
        }
    }
}
