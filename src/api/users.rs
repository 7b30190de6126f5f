use tide::Request;

use super::{ok_json, param_id, require_caller, respond, ErrorResponse, State};
use crate::catalog::service::{CatalogService, ShopQuery};
use crate::users::models::User;
use crate::users::service::{UserQuery, UserService};

pub async fn create(mut request: Request<State>) -> tide::Result {
    let user: User = request.body_json().await?;
    let state = request.state().clone();
    respond(state.users.create(&user).await)
}

pub async fn list(request: Request<State>) -> tide::Result {
    let query: UserQuery = request.query()?;
    let state = request.state().clone();
    respond(state.users.list(&query).await)
}

pub async fn read(request: Request<State>) -> tide::Result {
    let id = match param_id(&request, "id") {
        Ok(id) => id,
        Err(res) => return Ok(res),
    };
    let state = request.state().clone();
    respond(state.users.read(id).await)
}

pub async fn me(request: Request<State>) -> tide::Result {
    let user_id = match require_caller(&request) {
        Ok(id) => id,
        Err(res) => return Ok(res),
    };
    let state = request.state().clone();
    respond(state.users.read(user_id).await)
}

pub async fn update(mut request: Request<State>) -> tide::Result {
    if let Err(res) = require_caller(&request) {
        return Ok(res);
    }
    let user: User = request.body_json().await?;
    let id = match param_id(&request, "id") {
        Ok(id) => id,
        Err(res) => return Ok(res),
    };
    let state = request.state().clone();
    respond(state.users.update(id, &user).await)
}

pub async fn delete(request: Request<State>) -> tide::Result {
    if let Err(res) = require_caller(&request) {
        return Ok(res);
    }
    let id = match param_id(&request, "id") {
        Ok(id) => id,
        Err(res) => return Ok(res),
    };
    let state = request.state().clone();
    match state.users.delete(id).await {
        Ok(()) => ok_json(&serde_json::json!({ "success": true })),
        Err(err) => Ok(err.response()),
    }
}

pub async fn shops(request: Request<State>) -> tide::Result {
    let id = match param_id(&request, "id") {
        Ok(id) => id,
        Err(res) => return Ok(res),
    };
    let mut query: ShopQuery = request.query()?;
    query.options.owner_id = Some(id);
    let state = request.state().clone();
    respond(state.catalog.list_shops(&query).await)
}
