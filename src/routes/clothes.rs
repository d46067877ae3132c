use axum::{
    Json, Router,
    extract::{Path, State},
    http::StatusCode,
    routing::get,
};
use uuid::Uuid;

use crate::{
    dto::clothes::{CreateClothesRequest, DeleteResponse, UpdateClothesRequest},
    error::AppResult,
    middleware::auth::AdminUser,
    models::ClothingItem,
    services::clothes_service,
    state::AppState,
};

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(list_clothes).post(create_clothes))
        .route(
            "/{id}",
            get(get_clothes).put(update_clothes).delete(delete_clothes),
        )
}

#[utoipa::path(
    get,
    path = "/api/clothes",
    responses(
        (status = 200, description = "Every catalog item", body = Vec<ClothingItem>)
    ),
    tag = "Clothes"
)]
pub async fn list_clothes(State(state): State<AppState>) -> AppResult<Json<Vec<ClothingItem>>> {
    let items = clothes_service::list_all(&state).await?;
    Ok(Json(items))
}

#[utoipa::path(
    get,
    path = "/api/clothes/{id}",
    params(("id" = Uuid, Path, description = "Clothing item ID")),
    responses(
        (status = 200, description = "Catalog item", body = ClothingItem),
        (status = 404, description = "Item not found"),
    ),
    tag = "Clothes"
)]
pub async fn get_clothes(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> AppResult<Json<ClothingItem>> {
    let item = clothes_service::get_by_id(&state, id).await?;
    Ok(Json(item))
}

#[utoipa::path(
    post,
    path = "/api/clothes",
    request_body = CreateClothesRequest,
    responses(
        (status = 201, description = "Item created", body = ClothingItem),
        (status = 400, description = "Missing name or price"),
        (status = 401, description = "Missing or invalid token"),
        (status = 403, description = "Admin only"),
    ),
    security(("bearer_auth" = [])),
    tag = "Clothes"
)]
pub async fn create_clothes(
    State(state): State<AppState>,
    _admin: AdminUser,
    Json(payload): Json<CreateClothesRequest>,
) -> AppResult<(StatusCode, Json<ClothingItem>)> {
    let item = clothes_service::create(&state, payload).await?;
    Ok((StatusCode::CREATED, Json(item)))
}

#[utoipa::path(
    put,
    path = "/api/clothes/{id}",
    params(("id" = Uuid, Path, description = "Clothing item ID")),
    request_body = UpdateClothesRequest,
    responses(
        (status = 200, description = "Item updated", body = ClothingItem),
        (status = 400, description = "Invalid patch field"),
        (status = 404, description = "Item not found"),
    ),
    security(("bearer_auth" = [])),
    tag = "Clothes"
)]
pub async fn update_clothes(
    State(state): State<AppState>,
    _admin: AdminUser,
    Path(id): Path<Uuid>,
    Json(payload): Json<UpdateClothesRequest>,
) -> AppResult<Json<ClothingItem>> {
    let item = clothes_service::update(&state, id, payload).await?;
    Ok(Json(item))
}

#[utoipa::path(
    delete,
    path = "/api/clothes/{id}",
    params(("id" = Uuid, Path, description = "Clothing item ID")),
    responses(
        (status = 200, description = "Item deleted", body = DeleteResponse),
        (status = 404, description = "Item not found"),
    ),
    security(("bearer_auth" = [])),
    tag = "Clothes"
)]
pub async fn delete_clothes(
    State(state): State<AppState>,
    _admin: AdminUser,
    Path(id): Path<Uuid>,
) -> AppResult<Json<DeleteResponse>> {
    clothes_service::delete(&state, id).await?;
    Ok(Json(DeleteResponse {
        message: "item deleted".to_string(),
    }))
}
