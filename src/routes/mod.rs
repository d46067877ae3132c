use axum::Router;

use crate::state::AppState;

pub mod auth;
pub mod cart;
pub mod clothes;
pub mod doc;
pub mod health;
pub mod users;

// Build the API router without binding state; it is provided at the top level.
pub fn create_api_router() -> Router<AppState> {
    Router::new()
        .nest("/auth", auth::router())
        .nest("/clothes", clothes::router())
        .nest("/cart", cart::router())
        .nest("/users", users::router())
}
