use serde::Serialize;
use serde_json::json;
use tide::{Request, Response};

use super::{ok_json, param_id, require_caller, respond, ErrorResponse, State};
use crate::catalog::models::{Product, ProductDocument};
use crate::catalog::service::{CatalogService, ProductQuery};
use crate::engagement::models::{LikeDocument, LikeRemoval, LikeToggle, ProductEngagement, ReviewDocument};
use crate::engagement::service::{EngagementError, EngagementService};

/// Product representation: the catalog document plus the derived engagement
/// counters, flattened into one object.
#[derive(Serialize, Debug)]
pub struct ProductView {
    #[serde(flatten)]
    pub product: ProductDocument,
    #[serde(flatten)]
    pub engagement: ProductEngagement,
}

#[derive(Serialize, Debug)]
pub struct ProductDetailView {
    #[serde(flatten)]
    pub view: ProductView,
    pub reviews: Vec<ReviewDocument>,
    pub likes: Vec<LikeDocument>,
}

pub(crate) async fn with_engagement(
    state: &State,
    products: Vec<ProductDocument>,
) -> Result<Vec<ProductView>, EngagementError> {
    let mut views = Vec::with_capacity(products.len());
    for product in products {
        let engagement = state.engagement.aggregate(product.id).await?;
        views.push(ProductView {
            product,
            engagement,
        });
    }
    Ok(views)
}

pub async fn list(request: Request<State>) -> tide::Result {
    let query: ProductQuery = request.query()?;
    let state = request.state().clone();
    match state.catalog.list_products(&query).await {
        Ok(products) => match with_engagement(&state, products).await {
            Ok(views) => ok_json(&views),
            Err(err) => Ok(err.response()),
        },
        Err(err) => Ok(err.response()),
    }
}

pub async fn discounted(request: Request<State>) -> tide::Result {
    let mut query: ProductQuery = request.query()?;
    query.options.has_discount = Some(true);
    let state = request.state().clone();
    match state.catalog.list_products(&query).await {
        Ok(products) => match with_engagement(&state, products).await {
            Ok(views) => ok_json(&views),
            Err(err) => Ok(err.response()),
        },
        Err(err) => Ok(err.response()),
    }
}

pub async fn create(mut request: Request<State>) -> tide::Result {
    if let Err(res) = require_caller(&request) {
        return Ok(res);
    }
    let product: Product = request.body_json().await?;
    let state = request.state().clone();
    match state.catalog.create_product(&product).await {
        Ok(document) => match state.engagement.aggregate(document.id).await {
            Ok(engagement) => ok_json(&ProductView {
                product: document,
                engagement,
            }),
            Err(err) => Ok(err.response()),
        },
        Err(err) => Ok(err.response()),
    }
}

pub async fn read(request: Request<State>) -> tide::Result {
    let id = match param_id(&request, "id") {
        Ok(id) => id,
        Err(res) => return Ok(res),
    };
    let state = request.state().clone();

    let document = match state.catalog.read_product(id).await {
        Ok(document) => document,
        Err(err) => return Ok(err.response()),
    };
    let engagement = match state.engagement.aggregate(id).await {
        Ok(engagement) => engagement,
        Err(err) => return Ok(err.response()),
    };
    let reviews = match state.engagement.list_reviews(id).await {
        Ok(reviews) => reviews,
        Err(err) => return Ok(err.response()),
    };
    let likes = match state.engagement.likes_for(id).await {
        Ok(likes) => likes,
        Err(err) => return Ok(err.response()),
    };

    ok_json(&ProductDetailView {
        view: ProductView {
            product: document,
            engagement,
        },
        reviews,
        likes,
    })
}

pub async fn update(mut request: Request<State>) -> tide::Result {
    if let Err(res) = require_caller(&request) {
        return Ok(res);
    }
    let product: Product = request.body_json().await?;
    let id = match param_id(&request, "id") {
        Ok(id) => id,
        Err(res) => return Ok(res),
    };
    let state = request.state().clone();
    match state.catalog.update_product(id, &product).await {
        Ok(document) => match state.engagement.aggregate(document.id).await {
            Ok(engagement) => ok_json(&ProductView {
                product: document,
                engagement,
            }),
            Err(err) => Ok(err.response()),
        },
        Err(err) => Ok(err.response()),
    }
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
    match state.catalog.delete_product(id).await {
        Ok(()) => ok_json(&json!({ "success": true })),
        Err(err) => Ok(err.response()),
    }
}

pub async fn like(request: Request<State>) -> tide::Result {
    let user_id = match require_caller(&request) {
        Ok(id) => id,
        Err(res) => return Ok(res),
    };
    let product_id = match param_id(&request, "id") {
        Ok(id) => id,
        Err(res) => return Ok(res),
    };
    let state = request.state().clone();
    match state.engagement.toggle_like(product_id, user_id).await {
        Ok(LikeToggle::Created(like)) => {
            let mut res = Response::new(201);
            res.set_body(json!({ "status": "created", "like": like }));
            Ok(res)
        }
        Ok(LikeToggle::AlreadyExists) => {
            let mut res = Response::new(200);
            res.set_body(json!({ "status": "already_exists" }));
            Ok(res)
        }
        Err(err) => Ok(err.response()),
    }
}

pub async fn unlike(request: Request<State>) -> tide::Result {
    let user_id = match require_caller(&request) {
        Ok(id) => id,
        Err(res) => return Ok(res),
    };
    let product_id = match param_id(&request, "id") {
        Ok(id) => id,
        Err(res) => return Ok(res),
    };
    let state = request.state().clone();
    match state.engagement.remove_like(product_id, user_id).await {
        Ok(LikeRemoval::Removed) => {
            let mut res = Response::new(200);
            res.set_body(json!({ "status": "removed" }));
            Ok(res)
        }
        Ok(LikeRemoval::NotFound) => {
            let mut res = Response::new(404);
            res.set_body(json!({ "status": "not_found" }));
            Ok(res)
        }
        Err(err) => Ok(err.response()),
    }
}

pub async fn product_reviews(request: Request<State>) -> tide::Result {
    let id = match param_id(&request, "id") {
        Ok(id) => id,
        Err(res) => return Ok(res),
    };
    let state = request.state().clone();
    if let Err(err) = state.catalog.read_product(id).await {
        return Ok(err.response());
    }
    respond(state.engagement.list_reviews(id).await)
}
