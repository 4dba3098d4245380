use sea_orm::entity::prelude::*;

use crate::domain::StockHistoryEntry;
use crate::errors::AppError;

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "stock_history")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub product_id: Uuid,
    pub quantity_change: i32,
    pub movement_type: String,
    pub reason: Option<String>,
    pub previous_quantity: i32,
    pub new_quantity: i32,
    pub created_by: Option<Uuid>,
    pub created_at: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

impl TryFrom<Model> for StockHistoryEntry {
    type Error = AppError;

    fn try_from(model: Model) -> Result<Self, Self::Error> {
        Ok(StockHistoryEntry {
            id: model.id,
            product_id: model.product_id,
            movement_type: model.movement_type.parse()?,
            quantity_change: model.quantity_change,
            reason: model.reason,
            previous_quantity: model.previous_quantity,
            new_quantity: model.new_quantity,
            created_by: model.created_by,
            created_at: model.created_at,
        })
    }
}
