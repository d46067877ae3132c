use sea_orm::{EntityTrait, PaginatorTrait, QueryOrder};

use crate::{
    dto::users::UserCount,
    entity::{Users, users},
    error::AppResult,
    models::UserProfile,
    state::AppState,
};

/// Every registered user, oldest first, with password hashes stripped by the
/// [`UserProfile`] projection.
pub async fn list_users(state: &AppState) -> AppResult<Vec<UserProfile>> {
    let users = Users::find()
        .order_by_asc(users::Column::CreatedAt)
        .all(&state.orm)
        .await?
        .into_iter()
        .map(UserProfile::from)
        .collect();
    Ok(users)
}

pub async fn count_users(state: &AppState) -> AppResult<UserCount> {
    let count = Users::find().count(&state.orm).await?;
    Ok(UserCount { count })
}
