use axum::{
    Json, Router,
    extract::{Path, State},
    routing::{delete, get, post, put},
};
use uuid::Uuid;

use crate::{
    dto::cart::{AddToCartRequest, CartSummary, UpdateQuantityRequest},
    error::AppResult,
    services::cart_service,
    state::AppState,
};

// Cart routes are keyed by an application-level user string and carry no
// authentication, matching the public storefront surface.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/{user_id}", get(get_cart))
        .route("/{user_id}/add", post(add_to_cart))
        .route("/{user_id}/update/{clothes_id}", put(update_quantity))
        .route("/{user_id}/remove/{clothes_id}", delete(remove_from_cart))
        .route("/{user_id}/clear", post(clear_cart))
}

#[utoipa::path(
    get,
    path = "/api/cart/{user_id}",
    params(("user_id" = String, Path, description = "Cart owner key")),
    responses(
        (status = 200, description = "Cart with derived totals", body = CartSummary)
    ),
    tag = "Cart"
)]
pub async fn get_cart(
    State(state): State<AppState>,
    Path(user_id): Path<String>,
) -> AppResult<Json<CartSummary>> {
    let summary = cart_service::get_cart(&state, &user_id).await?;
    Ok(Json(summary))
}

#[utoipa::path(
    post,
    path = "/api/cart/{user_id}/add",
    params(("user_id" = String, Path, description = "Cart owner key")),
    request_body = AddToCartRequest,
    responses(
        (status = 200, description = "Line merged or appended", body = CartSummary),
        (status = 400, description = "Quantity below 1"),
        (status = 404, description = "Clothing item not found"),
    ),
    tag = "Cart"
)]
pub async fn add_to_cart(
    State(state): State<AppState>,
    Path(user_id): Path<String>,
    Json(payload): Json<AddToCartRequest>,
) -> AppResult<Json<CartSummary>> {
    let summary = cart_service::add_item(&state, &user_id, payload).await?;
    Ok(Json(summary))
}

#[utoipa::path(
    put,
    path = "/api/cart/{user_id}/update/{clothes_id}",
    params(
        ("user_id" = String, Path, description = "Cart owner key"),
        ("clothes_id" = Uuid, Path, description = "Referenced clothing item"),
    ),
    request_body = UpdateQuantityRequest,
    responses(
        (status = 200, description = "Quantity overwritten", body = CartSummary),
        (status = 400, description = "Quantity below 1"),
        (status = 404, description = "Cart or line not found"),
    ),
    tag = "Cart"
)]
pub async fn update_quantity(
    State(state): State<AppState>,
    Path((user_id, clothes_id)): Path<(String, Uuid)>,
    Json(payload): Json<UpdateQuantityRequest>,
) -> AppResult<Json<CartSummary>> {
    let summary = cart_service::set_quantity(&state, &user_id, clothes_id, payload).await?;
    Ok(Json(summary))
}

#[utoipa::path(
    delete,
    path = "/api/cart/{user_id}/remove/{clothes_id}",
    params(
        ("user_id" = String, Path, description = "Cart owner key"),
        ("clothes_id" = Uuid, Path, description = "Referenced clothing item"),
    ),
    responses(
        (status = 200, description = "Line removed (idempotent)", body = CartSummary),
        (status = 404, description = "Cart not found"),
    ),
    tag = "Cart"
)]
pub async fn remove_from_cart(
    State(state): State<AppState>,
    Path((user_id, clothes_id)): Path<(String, Uuid)>,
) -> AppResult<Json<CartSummary>> {
    let summary = cart_service::remove_item(&state, &user_id, clothes_id).await?;
    Ok(Json(summary))
}

#[utoipa::path(
    post,
    path = "/api/cart/{user_id}/clear",
    params(("user_id" = String, Path, description = "Cart owner key")),
    responses(
        (status = 200, description = "Cart emptied, totals zeroed", body = CartSummary)
    ),
    tag = "Cart"
)]
pub async fn clear_cart(
    State(state): State<AppState>,
    Path(user_id): Path<String>,
) -> AppResult<Json<CartSummary>> {
    let summary = cart_service::clear_cart(&state, &user_id).await?;
    Ok(Json(summary))
}
