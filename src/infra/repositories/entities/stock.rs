use sea_orm::entity::prelude::*;

use crate::domain::StockLevel;

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "stock")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub product_id: Uuid,
    pub quantity: i32,
    pub min_level: i32,
    pub location: Option<String>,
    pub last_updated: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::product::Entity",
        from = "Column::ProductId",
        to = "super::product::Column::Id"
    )]
    Product,
}

impl Related<super::product::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Product.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl From<Model> for StockLevel {
    fn from(model: Model) -> Self {
        StockLevel {
            product_id: model.product_id,
            quantity: model.quantity,
            min_level: model.min_level,
            location: model.location,
            last_updated: model.last_updated,
        }
    }
}
