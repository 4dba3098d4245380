use sea_orm::entity::prelude::*;
use sea_orm::Set;

use crate::domain::Charge;

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "charges")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub title: String,
    pub category: String,
    #[sea_orm(column_type = "Decimal(Some((12, 2)))")]
    pub amount: Decimal,
    pub charge_date: Date,
    #[sea_orm(column_type = "Text", nullable)]
    pub notes: Option<String>,
    pub created_by: Option<Uuid>,
    pub created_at: DateTimeUtc,
    pub updated_at: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

impl From<Model> for Charge {
    fn from(model: Model) -> Self {
        Charge {
            id: model.id,
            title: model.title,
            category: model.category,
            amount: model.amount,
            charge_date: model.charge_date,
            notes: model.notes,
            created_by: model.created_by,
            created_at: model.created_at,
            updated_at: model.updated_at,
        }
    }
}

impl From<Charge> for ActiveModel {
    fn from(charge: Charge) -> Self {
        ActiveModel {
            id: Set(charge.id),
            title: Set(charge.title),
            category: Set(charge.category),
            amount: Set(charge.amount),
            charge_date: Set(charge.charge_date),
            notes: Set(charge.notes),
            created_by: Set(charge.created_by),
            created_at: Set(charge.created_at),
            updated_at: Set(charge.updated_at),
        }
    }
}
