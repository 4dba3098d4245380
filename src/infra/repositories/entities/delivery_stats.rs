use sea_orm::entity::prelude::*;

use crate::domain::ProductDeliveryStats;

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "product_delivery_stats")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub product_id: Uuid,
    pub total_orders: i32,
    pub delivered_orders: i32,
    pub cancelled_orders: i32,
    pub returned_orders: i32,
    pub in_transit_orders: i32,
    pub updated_at: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

impl From<Model> for ProductDeliveryStats {
    fn from(model: Model) -> Self {
        ProductDeliveryStats {
            product_id: model.product_id,
            total_orders: model.total_orders,
            delivered_orders: model.delivered_orders,
            cancelled_orders: model.cancelled_orders,
            returned_orders: model.returned_orders,
            in_transit_orders: model.in_transit_orders,
            updated_at: model.updated_at,
        }
    }
}
