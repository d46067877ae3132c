use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::entity;

/// Catalog entry as served over HTTP. Field names follow the wire convention
/// (`imageUrl`, `createdAt`), the storage layer stays snake_case.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ClothingItem {
    pub id: Uuid,
    pub name: String,
    pub brand: Option<String>,
    pub price: i64,
    pub description: Option<String>,
    pub image_url: Option<String>,
    pub category: Option<String>,
    pub sizes: Vec<String>,
    pub colors: Vec<String>,
    pub created_at: DateTime<Utc>,
}

impl From<entity::clothes::Model> for ClothingItem {
    fn from(model: entity::clothes::Model) -> Self {
        Self {
            id: model.id,
            name: model.name,
            brand: model.brand,
            price: model.price,
            description: model.description,
            image_url: model.image_url,
            category: model.category,
            sizes: model.sizes.0,
            colors: model.colors.0,
            created_at: model.created_at.with_timezone(&Utc),
        }
    }
}

/// Public projection of a user record. The password hash never leaves the
/// service layer.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UserProfile {
    pub id: Uuid,
    pub name: String,
    pub username: String,
    pub email: String,
    pub address: Option<String>,
    pub phone: Option<String>,
    pub role: String,
    pub created_at: DateTime<Utc>,
}

impl From<entity::users::Model> for UserProfile {
    fn from(model: entity::users::Model) -> Self {
        Self {
            id: model.id,
            name: model.name,
            username: model.username,
            email: model.email,
            address: model.address,
            phone: model.phone,
            role: model.role,
            created_at: model.created_at.with_timezone(&Utc),
        }
    }
}
