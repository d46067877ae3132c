use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Creation payload. `name` and `price` are required but modeled as `Option`
/// so a missing field reports the 400 validation error of the API contract
/// instead of a deserialization rejection.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateClothesRequest {
    pub name: Option<String>,
    pub brand: Option<String>,
    pub price: Option<i64>,
    pub description: Option<String>,
    pub image_url: Option<String>,
    pub category: Option<String>,
    pub sizes: Option<Vec<String>>,
    pub colors: Option<Vec<String>>,
}

/// Explicit patch: only fields the caller intends to change are present.
/// An absent field keeps the stored value; there is no "set to null" form.
#[derive(Debug, Default, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateClothesRequest {
    pub name: Option<String>,
    pub brand: Option<String>,
    pub price: Option<i64>,
    pub description: Option<String>,
    pub image_url: Option<String>,
    pub category: Option<String>,
    pub sizes: Option<Vec<String>>,
    pub colors: Option<Vec<String>>,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct DeleteResponse {
    pub message: String,
}
