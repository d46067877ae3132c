use sea_orm::FromJsonQueryResult;
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// One (catalog reference, quantity) pair inside a cart document.
///
/// The reference is lookup-only: deleting the clothes row leaves the line in
/// place and readers resolve it to a missing item with price 0.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct CartLine {
    pub clothes_id: Uuid,
    pub quantity: i32,
}

/// The cart's ordered line list, persisted as a single JSON document column.
/// Every mutation writes the whole list back; there is no per-line update.
#[derive(
    Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize, FromJsonQueryResult,
)]
pub struct CartLines(pub Vec<CartLine>);

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "carts")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: Uuid,
    /// Application-level owner key. One cart per user string, enforced by a
    /// unique index.
    #[sea_orm(unique)]
    pub user_id: String,
    #[sea_orm(column_type = "JsonBinary")]
    pub items: CartLines,
    pub created_at: DateTimeWithTimeZone,
    pub updated_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
