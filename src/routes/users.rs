use axum::{Json, Router, extract::State, routing::get};

use crate::{
    dto::users::UserCount,
    error::AppResult,
    middleware::auth::AdminUser,
    models::UserProfile,
    services::user_service,
    state::AppState,
};

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(list_users))
        .route("/count", get(users_count))
}

#[utoipa::path(
    get,
    path = "/api/users",
    responses(
        (status = 200, description = "All users, passwords stripped", body = Vec<UserProfile>),
        (status = 401, description = "Missing or invalid token"),
        (status = 403, description = "Admin only"),
    ),
    security(("bearer_auth" = [])),
    tag = "Users"
)]
pub async fn list_users(
    State(state): State<AppState>,
    _admin: AdminUser,
) -> AppResult<Json<Vec<UserProfile>>> {
    let users = user_service::list_users(&state).await?;
    Ok(Json(users))
}

#[utoipa::path(
    get,
    path = "/api/users/count",
    responses(
        (status = 200, description = "Registered user count", body = UserCount),
        (status = 401, description = "Missing or invalid token"),
        (status = 403, description = "Admin only"),
    ),
    security(("bearer_auth" = [])),
    tag = "Users"
)]
pub async fn users_count(
    State(state): State<AppState>,
    _admin: AdminUser,
) -> AppResult<Json<UserCount>> {
    let count = user_service::count_users(&state).await?;
    Ok(Json(count))
}
