use tide::Request;

use super::products::with_engagement;
use super::{ok_json, param_id, require_caller, respond, ErrorResponse, State};
use crate::catalog::models::{Advertisement, Category, Shop, SubCategory};
use crate::catalog::service::{
    AdvertisementQuery, CatalogService, CategoryQuery, ProductQuery, ShopQuery, SubCategoryQuery,
};

pub async fn list_categories(request: Request<State>) -> tide::Result {
    let query: CategoryQuery = request.query()?;
    let state = request.state().clone();
    respond(state.catalog.list_categories(&query).await)
}

pub async fn create_category(mut request: Request<State>) -> tide::Result {
    if let Err(res) = require_caller(&request) {
        return Ok(res);
    }
    let category: Category = request.body_json().await?;
    let state = request.state().clone();
    respond(state.catalog.create_category(&category).await)
}

pub async fn read_category(request: Request<State>) -> tide::Result {
    let id = match param_id(&request, "id") {
        Ok(id) => id,
        Err(res) => return Ok(res),
    };
    let state = request.state().clone();
    respond(state.catalog.read_category(id).await)
}

pub async fn update_category(mut request: Request<State>) -> tide::Result {
    if let Err(res) = require_caller(&request) {
        return Ok(res);
    }
    let category: Category = request.body_json().await?;
    let id = match param_id(&request, "id") {
        Ok(id) => id,
        Err(res) => return Ok(res),
    };
    let state = request.state().clone();
    respond(state.catalog.update_category(id, &category).await)
}

pub async fn delete_category(request: Request<State>) -> tide::Result {
    if let Err(res) = require_caller(&request) {
        return Ok(res);
    }
    let id = match param_id(&request, "id") {
        Ok(id) => id,
        Err(res) => return Ok(res),
    };
    let state = request.state().clone();
    match state.catalog.delete_category(id).await {
        Ok(()) => ok_json(&serde_json::json!({ "success": true })),
        Err(err) => Ok(err.response()),
    }
}

pub async fn category_subcategories(request: Request<State>) -> tide::Result {
    let id = match param_id(&request, "id") {
        Ok(id) => id,
        Err(res) => return Ok(res),
    };
    let state = request.state().clone();
    if let Err(err) = state.catalog.read_category(id).await {
        return Ok(err.response());
    }
    let mut query: SubCategoryQuery = request.query()?;
    query.options.category_id = Some(id);
    respond(state.catalog.list_subcategories(&query).await)
}

pub async fn category_products(request: Request<State>) -> tide::Result {
    let id = match param_id(&request, "id") {
        Ok(id) => id,
        Err(res) => return Ok(res),
    };
    let state = request.state().clone();
    if let Err(err) = state.catalog.read_category(id).await {
        return Ok(err.response());
    }
    let mut query: ProductQuery = request.query()?;
    query.options.category_id = Some(id);
    match state.catalog.list_products(&query).await {
        Ok(products) => match with_engagement(&state, products).await {
            Ok(views) => ok_json(&views),
            Err(err) => Ok(err.response()),
        },
        Err(err) => Ok(err.response()),
    }
}

pub async fn list_subcategories(request: Request<State>) -> tide::Result {
    let query: SubCategoryQuery = request.query()?;
    let state = request.state().clone();
    respond(state.catalog.list_subcategories(&query).await)
}

pub async fn create_subcategory(mut request: Request<State>) -> tide::Result {
    if let Err(res) = require_caller(&request) {
        return Ok(res);
    }
    let subcategory: SubCategory = request.body_json().await?;
    let state = request.state().clone();
    respond(state.catalog.create_subcategory(&subcategory).await)
}

pub async fn read_subcategory(request: Request<State>) -> tide::Result {
    let id = match param_id(&request, "id") {
        Ok(id) => id,
        Err(res) => return Ok(res),
    };
    let state = request.state().clone();
    respond(state.catalog.read_subcategory(id).await)
}

pub async fn update_subcategory(mut request: Request<State>) -> tide::Result {
    if let Err(res) = require_caller(&request) {
        return Ok(res);
    }
    let subcategory: SubCategory = request.body_json().await?;
    let id = match param_id(&request, "id") {
        Ok(id) => id,
        Err(res) => return Ok(res),
    };
    let state = request.state().clone();
    respond(state.catalog.update_subcategory(id, &subcategory).await)
}

pub async fn delete_subcategory(request: Request<State>) -> tide::Result {
    if let Err(res) = require_caller(&request) {
        return Ok(res);
    }
    let id = match param_id(&request, "id") {
        Ok(id) => id,
        Err(res) => return Ok(res),
    };
    let state = request.state().clone();
    match state.catalog.delete_subcategory(id).await {
        Ok(()) => ok_json(&serde_json::json!({ "success": true })),
        Err(err) => Ok(err.response()),
    }
}

pub async fn subcategory_products(request: Request<State>) -> tide::Result {
    let id = match param_id(&request, "id") {
        Ok(id) => id,
        Err(res) => return Ok(res),
    };
    let state = request.state().clone();
    if let Err(err) = state.catalog.read_subcategory(id).await {
        return Ok(err.response());
    }
    let mut query: ProductQuery = request.query()?;
    query.options.subcategory_id = Some(id);
    match state.catalog.list_products(&query).await {
        Ok(products) => match with_engagement(&state, products).await {
            Ok(views) => ok_json(&views),
            Err(err) => Ok(err.response()),
        },
        Err(err) => Ok(err.response()),
    }
}

pub async fn list_shops(request: Request<State>) -> tide::Result {
    let query: ShopQuery = request.query()?;
    let state = request.state().clone();
    respond(state.catalog.list_shops(&query).await)
}

pub async fn create_shop(mut request: Request<State>) -> tide::Result {
    if let Err(res) = require_caller(&request) {
        return Ok(res);
    }
    let shop: Shop = request.body_json().await?;
    let state = request.state().clone();
    respond(state.catalog.create_shop(&shop).await)
}

pub async fn read_shop(request: Request<State>) -> tide::Result {
    let id = match param_id(&request, "id") {
        Ok(id) => id,
        Err(res) => return Ok(res),
    };
    let state = request.state().clone();
    respond(state.catalog.read_shop(id).await)
}

pub async fn update_shop(mut request: Request<State>) -> tide::Result {
    if let Err(res) = require_caller(&request) {
        return Ok(res);
    }
    let shop: Shop = request.body_json().await?;
    let id = match param_id(&request, "id") {
        Ok(id) => id,
        Err(res) => return Ok(res),
    };
    let state = request.state().clone();
    respond(state.catalog.update_shop(id, &shop).await)
}

pub async fn delete_shop(request: Request<State>) -> tide::Result {
    if let Err(res) = require_caller(&request) {
        return Ok(res);
    }
    let id = match param_id(&request, "id") {
        Ok(id) => id,
        Err(res) => return Ok(res),
    };
    let state = request.state().clone();
    match state.catalog.delete_shop(id).await {
        Ok(()) => ok_json(&serde_json::json!({ "success": true })),
        Err(err) => Ok(err.response()),
    }
}

pub async fn shop_products(request: Request<State>) -> tide::Result {
    let id = match param_id(&request, "id") {
        Ok(id) => id,
        Err(res) => return Ok(res),
    };
    let state = request.state().clone();
    if let Err(err) = state.catalog.read_shop(id).await {
        return Ok(err.response());
    }
    let mut query: ProductQuery = request.query()?;
    query.options.shop_id = Some(id);
    match state.catalog.list_products(&query).await {
        Ok(products) => match with_engagement(&state, products).await {
            Ok(views) => ok_json(&views),
            Err(err) => Ok(err.response()),
        },
        Err(err) => Ok(err.response()),
    }
}

pub async fn list_advertisements(request: Request<State>) -> tide::Result {
    let query: AdvertisementQuery = request.query()?;
    let state = request.state().clone();
    respond(state.catalog.list_advertisements(&query).await)
}

pub async fn create_advertisement(mut request: Request<State>) -> tide::Result {
    if let Err(res) = require_caller(&request) {
        return Ok(res);
    }
    let advertisement: Advertisement = request.body_json().await?;
    let state = request.state().clone();
    respond(state.catalog.create_advertisement(&advertisement).await)
}

pub async fn read_advertisement(request: Request<State>) -> tide::Result {
    let id = match param_id(&request, "id") {
        Ok(id) => id,
        Err(res) => return Ok(res),
    };
    let state = request.state().clone();
    respond(state.catalog.read_advertisement(id).await)
}

pub async fn update_advertisement(mut request: Request<State>) -> tide::Result {
    if let Err(res) = require_caller(&request) {
        return Ok(res);
    }
    let advertisement: Advertisement = request.body_json().await?;
    let id = match param_id(&request, "id") {
        Ok(id) => id,
        Err(res) => return Ok(res),
    };
    let state = request.state().clone();
    respond(state.catalog.update_advertisement(id, &advertisement).await)
}

pub async fn delete_advertisement(request: Request<State>) -> tide::Result {
    if let Err(res) = require_caller(&request) {
        return Ok(res);
    }
    let id = match param_id(&request, "id") {
        Ok(id) => id,
        Err(res) => return Ok(res),
    };
    let state = request.state().clone();
    match state.catalog.delete_advertisement(id).await {
        Ok(()) => ok_json(&serde_json::json!({ "success": true })),
        Err(err) => Ok(err.response()),
    }
}
