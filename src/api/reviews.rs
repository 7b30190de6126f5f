use tide::{Request, Response};

use super::{param_id, require_caller, respond, ErrorResponse, State};
use crate::engagement::models::Review;
use crate::engagement::service::{EngagementService, ReviewQuery};

/// Reviews are append-only: the collection takes POST and GET only, and the
/// author is always the authenticated caller, never a payload field.
pub async fn create(mut request: Request<State>) -> tide::Result {
    let user_id = match require_caller(&request) {
        Ok(id) => id,
        Err(res) => return Ok(res),
    };
    let review: Review = request.body_json().await?;
    let state = request.state().clone();
    match state.engagement.add_review(user_id, &review).await {
        Ok(document) => {
            let mut res = Response::new(201);
            res.set_body(tide::Body::from_json(&document)?);
            Ok(res)
        }
        Err(err) => Ok(err.response()),
    }
}

pub async fn list(request: Request<State>) -> tide::Result {
    let query: ReviewQuery = request.query()?;
    let state = request.state().clone();
    respond(state.engagement.query_reviews(&query).await)
}

pub async fn read(request: Request<State>) -> tide::Result {
    let id = match param_id(&request, "id") {
        Ok(id) => id,
        Err(res) => return Ok(res),
    };
    let state = request.state().clone();
    respond(state.engagement.read_review(id).await)
}
