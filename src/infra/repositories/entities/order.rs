use sea_orm::entity::prelude::*;

use crate::domain::Order;
use crate::errors::AppError;

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "orders")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    #[sea_orm(unique)]
    pub order_number: String,
    pub customer_name: String,
    pub customer_phone: String,
    pub customer_address: String,
    pub customer_city: Option<String>,
    #[sea_orm(column_type = "Text", nullable)]
    pub notes: Option<String>,
    #[sea_orm(column_type = "Decimal(Some((12, 2)))")]
    pub delivery_price: Decimal,
    #[sea_orm(column_type = "Decimal(Some((12, 2)))")]
    pub total_amount: Decimal,
    pub status: String,
    pub payment_status: String,
    pub created_by: Option<Uuid>,
    pub created_at: DateTimeUtc,
    pub updated_at: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::order_item::Entity")]
    Items,
}

impl Related<super::order_item::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Items.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl TryFrom<Model> for Order {
    type Error = AppError;

    fn try_from(model: Model) -> Result<Self, Self::Error> {
        Ok(Order {
            id: model.id,
            order_number: model.order_number,
            customer_name: model.customer_name,
            customer_phone: model.customer_phone,
            customer_address: model.customer_address,
            customer_city: model.customer_city,
            notes: model.notes,
            delivery_price: model.delivery_price,
            total_amount: model.total_amount,
            status: model.status.parse()?,
            payment_status: model.payment_status.parse()?,
            created_by: model.created_by,
            created_at: model.created_at,
            updated_at: model.updated_at,
        })
    }
}
