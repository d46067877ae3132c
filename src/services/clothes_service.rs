use sea_orm::ActiveValue::{NotSet, Set};
use sea_orm::{ActiveModelTrait, EntityTrait, QueryOrder};
use uuid::Uuid;

use crate::{
    dto::clothes::{CreateClothesRequest, UpdateClothesRequest},
    entity::{Clothes, clothes, clothes::LabelList},
    error::{AppError, AppResult},
    models::ClothingItem,
    state::AppState,
};

pub async fn list_all(state: &AppState) -> AppResult<Vec<ClothingItem>> {
    let items = Clothes::find()
        .order_by_asc(clothes::Column::CreatedAt)
        .all(&state.orm)
        .await?
        .into_iter()
        .map(ClothingItem::from)
        .collect();
    Ok(items)
}

pub async fn get_by_id(state: &AppState, id: Uuid) -> AppResult<ClothingItem> {
    let item = Clothes::find_by_id(id)
        .one(&state.orm)
        .await?
        .ok_or_else(|| AppError::NotFound("clothing item not found".into()))?;
    Ok(item.into())
}

pub async fn create(state: &AppState, payload: CreateClothesRequest) -> AppResult<ClothingItem> {
    let (name, price) = validate_new(&payload)?;

    let item = clothes::ActiveModel {
        id: Set(Uuid::new_v4()),
        name: Set(name),
        brand: Set(payload.brand),
        price: Set(price),
        description: Set(payload.description),
        image_url: Set(payload.image_url),
        category: Set(payload.category),
        sizes: Set(LabelList(payload.sizes.unwrap_or_default())),
        colors: Set(LabelList(payload.colors.unwrap_or_default())),
        created_at: NotSet,
    }
    .insert(&state.orm)
    .await?;

    Ok(item.into())
}

/// Apply an explicit patch over the stored row. Only fields present in the
/// request are written; `created_at` is never touched.
pub async fn update(
    state: &AppState,
    id: Uuid,
    patch: UpdateClothesRequest,
) -> AppResult<ClothingItem> {
    validate_patch(&patch)?;

    let existing = Clothes::find_by_id(id)
        .one(&state.orm)
        .await?
        .ok_or_else(|| AppError::NotFound("clothing item not found".into()))?;

    let mut active: clothes::ActiveModel = existing.into();
    if let Some(name) = patch.name {
        active.name = Set(name.trim().to_string());
    }
    if let Some(brand) = patch.brand {
        active.brand = Set(Some(brand));
    }
    if let Some(price) = patch.price {
        active.price = Set(price);
    }
    if let Some(description) = patch.description {
        active.description = Set(Some(description));
    }
    if let Some(image_url) = patch.image_url {
        active.image_url = Set(Some(image_url));
    }
    if let Some(category) = patch.category {
        active.category = Set(Some(category));
    }
    if let Some(sizes) = patch.sizes {
        active.sizes = Set(LabelList(sizes));
    }
    if let Some(colors) = patch.colors {
        active.colors = Set(LabelList(colors));
    }

    let updated = active.update(&state.orm).await?;
    Ok(updated.into())
}

/// Delete the catalog row. Carts referencing it keep their lines; readers
/// resolve those to a missing item priced at 0.
pub async fn delete(state: &AppState, id: Uuid) -> AppResult<()> {
    let result = Clothes::delete_by_id(id).exec(&state.orm).await?;
    if result.rows_affected == 0 {
        return Err(AppError::NotFound("clothing item not found".into()));
    }
    Ok(())
}

fn validate_new(payload: &CreateClothesRequest) -> Result<(String, i64), AppError> {
    let name = payload
        .name
        .as_deref()
        .map(str::trim)
        .filter(|name| !name.is_empty())
        .ok_or_else(|| AppError::BadRequest("name is required".into()))?;
    let price = payload
        .price
        .ok_or_else(|| AppError::BadRequest("price is required".into()))?;
    if price < 0 {
        return Err(AppError::BadRequest("price must not be negative".into()));
    }
    Ok((name.to_string(), price))
}

fn validate_patch(patch: &UpdateClothesRequest) -> Result<(), AppError> {
    if let Some(name) = &patch.name {
        if name.trim().is_empty() {
            return Err(AppError::BadRequest("name must not be empty".into()));
        }
    }
    if let Some(price) = patch.price {
        if price < 0 {
            return Err(AppError::BadRequest("price must not be negative".into()));
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn creation(name: Option<&str>, price: Option<i64>) -> CreateClothesRequest {
        CreateClothesRequest {
            name: name.map(String::from),
            brand: None,
            price,
            description: None,
            image_url: None,
            category: None,
            sizes: None,
            colors: None,
        }
    }

    #[test]
    fn creation_requires_name_and_price() {
        assert!(validate_new(&creation(Some("Denim Jacket"), Some(4500))).is_ok());
        assert!(validate_new(&creation(None, Some(4500))).is_err());
        assert!(validate_new(&creation(Some("   "), Some(4500))).is_err());
        assert!(validate_new(&creation(Some("Denim Jacket"), None)).is_err());
        assert!(validate_new(&creation(Some("Denim Jacket"), Some(-1))).is_err());
    }

    #[test]
    fn zero_price_is_a_valid_price() {
        let (_, price) = validate_new(&creation(Some("Promo Tote"), Some(0))).unwrap();
        assert_eq!(price, 0);
    }

    #[test]
    fn patch_is_validated_field_by_field() {
        assert!(validate_patch(&UpdateClothesRequest::default()).is_ok());
        assert!(
            validate_patch(&UpdateClothesRequest {
                price: Some(100),
                ..Default::default()
            })
            .is_ok()
        );
        assert!(
            validate_patch(&UpdateClothesRequest {
                name: Some("".into()),
                ..Default::default()
            })
            .is_err()
        );
        assert!(
            validate_patch(&UpdateClothesRequest {
                price: Some(-5),
                ..Default::default()
            })
            .is_err()
        );
    }
}
