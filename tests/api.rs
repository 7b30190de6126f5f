mod fixtures;
mod utils;

use fixtures::{fake_discounted_product, fake_product, fake_shop, fake_user};
use utils::AnyHow;

use serde_json::{json, Value};
use tide::http::{Body, Method, Request, Response, Url};
use tide::Server;

use marketplace::api::{app, State};
use marketplace::catalog::service::CatalogService;
use marketplace::users::service::UserService;

fn url(path: &str) -> Url {
    Url::parse(&format!("http://marketplace.test{}", path)).unwrap()
}

fn get(path: &str) -> Request {
    Request::new(Method::Get, url(path))
}

fn json_body<T: serde::Serialize>(value: &T) -> Body {
    Body::from_json(value).expect("serializable payload")
}

fn with_token(mut request: Request, token: &str) -> Request {
    request.insert_header("Authorization", format!("Bearer {}", token));
    request
}

async fn send(app: &Server<State>, request: Request) -> Result<Response, AnyHow> {
    app.respond(request)
        .await
        .map_err(|err| AnyHow::from(err.to_string()))
}

async fn body(response: &mut Response) -> Result<Value, AnyHow> {
    response
        .body_json()
        .await
        .map_err(|err| AnyHow::from(err.to_string()))
}

#[async_std::test]
async fn version_document() -> Result<(), AnyHow> {
    let app = app(utils::state().await?);

    let mut res = send(&app, get("/")).await?;
    assert_eq!(u16::from(res.status()), 200);
    assert_eq!(body(&mut res).await?["version"], "1");
    Ok(())
}

#[async_std::test]
async fn registration_and_me() -> Result<(), AnyHow> {
    let app = app(utils::state().await?);

    let mut register = Request::new(Method::Post, url("/users"));
    register.set_body(json_body(&fake_user()));
    let mut res = send(&app, register).await?;
    assert_eq!(u16::from(res.status()), 200);
    let registered = body(&mut res).await?;
    let token = registered["token"].as_str().unwrap().to_string();

    let mut res = send(&app, with_token(get("/users/me"), &token)).await?;
    assert_eq!(u16::from(res.status()), 200);
    assert_eq!(body(&mut res).await?["id"], registered["id"]);

    let mut res = send(&app, get("/users/me")).await?;
    assert_eq!(u16::from(res.status()), 401);
    assert_eq!(body(&mut res).await?["error"], "E_UNAUTHORIZED");
    Ok(())
}

#[async_std::test]
async fn unknown_token_is_rejected() -> Result<(), AnyHow> {
    let app = app(utils::state().await?);

    let res = send(&app, with_token(get("/users/me"), "not-a-real-token")).await?;
    assert_eq!(u16::from(res.status()), 401);
    Ok(())
}

#[async_std::test]
async fn writes_require_identity() -> Result<(), AnyHow> {
    let app = app(utils::state().await?);

    let mut create = Request::new(Method::Post, url("/categories"));
    create.set_body(json_body(&json!({
        "name": "tools",
        "description": ""
    })));
    let mut res = send(&app, create).await?;
    assert_eq!(u16::from(res.status()), 401);
    assert_eq!(body(&mut res).await?["error"], "E_UNAUTHORIZED");
    Ok(())
}

#[async_std::test]
async fn like_toggle_flow() -> Result<(), AnyHow> {
    let state = utils::state().await?;
    let app = app(state.clone());

    let registered = state.users.create(&fake_user()).await?;
    let shop = state
        .catalog
        .create_shop(&fake_shop(registered.user.id))
        .await?;
    let product = state
        .catalog
        .create_product(&fake_product(shop.id, None, None))
        .await?;

    let like_path = format!("/products/{}/like", product.id);

    // Anonymous toggles are rejected before the engine is reached.
    let res = send(&app, Request::new(Method::Post, url(&like_path))).await?;
    assert_eq!(u16::from(res.status()), 401);

    let mut res = send(
        &app,
        with_token(Request::new(Method::Post, url(&like_path)), &registered.token),
    )
    .await?;
    assert_eq!(u16::from(res.status()), 201);
    assert_eq!(body(&mut res).await?["status"], "created");

    let mut res = send(
        &app,
        with_token(Request::new(Method::Post, url(&like_path)), &registered.token),
    )
    .await?;
    assert_eq!(u16::from(res.status()), 200);
    assert_eq!(body(&mut res).await?["status"], "already_exists");

    let mut res = send(
        &app,
        with_token(
            Request::new(Method::Delete, url(&like_path)),
            &registered.token,
        ),
    )
    .await?;
    assert_eq!(u16::from(res.status()), 200);
    assert_eq!(body(&mut res).await?["status"], "removed");

    let mut res = send(
        &app,
        with_token(
            Request::new(Method::Delete, url(&like_path)),
            &registered.token,
        ),
    )
    .await?;
    assert_eq!(u16::from(res.status()), 404);
    assert_eq!(body(&mut res).await?["status"], "not_found");
    Ok(())
}

#[async_std::test]
async fn review_flow_and_aggregates() -> Result<(), AnyHow> {
    let state = utils::state().await?;
    let app = app(state.clone());

    let registered = state.users.create(&fake_user()).await?;
    let shop = state
        .catalog
        .create_shop(&fake_shop(registered.user.id))
        .await?;
    let product = state
        .catalog
        .create_product(&fake_product(shop.id, None, None))
        .await?;

    // Out-of-range rating dies at validation, before persistence.
    let mut bad = Request::new(Method::Post, url("/reviews"));
    bad.set_body(json_body(&json!({
        "product_id": product.id,
        "rating": 6,
        "body": "x"
    })));
    let mut res = send(&app, with_token(bad, &registered.token)).await?;
    assert_eq!(u16::from(res.status()), 400);
    assert_eq!(body(&mut res).await?["error"], "E_VALIDATION");

    for rating in [5, 3, 4] {
        let mut submit = Request::new(Method::Post, url("/reviews"));
        submit.set_body(json_body(&json!({
            "product_id": product.id,
            "rating": rating,
            "body": "solid"
        })));
        let res = send(&app, with_token(submit, &registered.token)).await?;
        assert_eq!(u16::from(res.status()), 201);
    }

    // Reviews read without authentication, newest first.
    let mut res = send(&app, get(&format!("/products/{}/reviews", product.id))).await?;
    assert_eq!(u16::from(res.status()), 200);
    let reviews = body(&mut res).await?;
    let ratings: Vec<i64> = reviews
        .as_array()
        .unwrap()
        .iter()
        .map(|r| r["rating"].as_i64().unwrap())
        .collect();
    assert_eq!(ratings, vec![4, 3, 5]);

    // The product representation carries the derived counters.
    let mut res = send(&app, get(&format!("/products/{}", product.id))).await?;
    assert_eq!(u16::from(res.status()), 200);
    let detail = body(&mut res).await?;
    assert_eq!(detail["review_count"], 3);
    assert_eq!(detail["like_count"], 0);
    assert_eq!(detail["average_rating"], 4.0);
    assert_eq!(detail["reviews"].as_array().unwrap().len(), 3);
    assert!(detail["likes"].as_array().unwrap().is_empty());
    Ok(())
}

#[async_std::test]
async fn product_listing_filters_through_query_string() -> Result<(), AnyHow> {
    let state = utils::state().await?;
    let app = app(state.clone());

    let registered = state.users.create(&fake_user()).await?;
    let shop = state
        .catalog
        .create_shop(&fake_shop(registered.user.id))
        .await?;
    state
        .catalog
        .create_product(&fake_product(shop.id, None, None))
        .await?;
    state
        .catalog
        .create_product(&fake_discounted_product(shop.id, None))
        .await?;

    let mut res = send(&app, get("/products?has_discount=true")).await?;
    assert_eq!(u16::from(res.status()), 200);
    let listed = body(&mut res).await?;
    assert_eq!(listed.as_array().unwrap().len(), 1);
    assert_eq!(listed[0]["has_discount"], true);

    let mut res = send(&app, get("/products/discounted")).await?;
    let listed = body(&mut res).await?;
    assert_eq!(listed.as_array().unwrap().len(), 1);

    let mut res = send(
        &app,
        get("/products?order_by_field=Price&order_by_direction=Asc&limit=1"),
    )
    .await?;
    assert_eq!(u16::from(res.status()), 200);
    let listed = body(&mut res).await?;
    assert_eq!(listed.as_array().unwrap().len(), 1);
    Ok(())
}

#[async_std::test]
async fn missing_product_maps_to_not_found() -> Result<(), AnyHow> {
    let app = app(utils::state().await?);

    let mut res = send(&app, get("/products/12345")).await?;
    assert_eq!(u16::from(res.status()), 404);
    assert_eq!(body(&mut res).await?["error"], "E_NOT_FOUND");
    Ok(())
}
