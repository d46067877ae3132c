use sea_orm::FromJsonQueryResult;
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// JSON column holding an ordered list of labels (sizes, colors).
#[derive(
    Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize, FromJsonQueryResult,
)]
pub struct LabelList(pub Vec<String>);

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "clothes")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: Uuid,
    pub name: String,
    pub brand: Option<String>,
    /// Price in minor currency units; never negative.
    pub price: i64,
    pub description: Option<String>,
    pub image_url: Option<String>,
    pub category: Option<String>,
    #[sea_orm(column_type = "JsonBinary")]
    pub sizes: LabelList,
    #[sea_orm(column_type = "JsonBinary")]
    pub colors: LabelList,
    pub created_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
