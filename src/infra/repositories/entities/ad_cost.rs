use sea_orm::entity::prelude::*;
use sea_orm::Set;

use crate::domain::AdCost;

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "ad_costs")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub campaign_name: String,
    pub platform: String,
    #[sea_orm(column_type = "Decimal(Some((12, 2)))")]
    pub amount_spent: Decimal,
    pub results: i32,
    #[sea_orm(column_type = "Decimal(Some((12, 2)))")]
    pub cost_per_result: Decimal,
    pub spend_date: Date,
    #[sea_orm(column_type = "Text", nullable)]
    pub notes: Option<String>,
    pub created_by: Option<Uuid>,
    pub created_at: DateTimeUtc,
    pub updated_at: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

impl From<Model> for AdCost {
    fn from(model: Model) -> Self {
        AdCost {
            id: model.id,
            campaign_name: model.campaign_name,
            platform: model.platform,
            amount_spent: model.amount_spent,
            results: model.results,
            cost_per_result: model.cost_per_result,
            spend_date: model.spend_date,
            notes: model.notes,
            created_by: model.created_by,
            created_at: model.created_at,
            updated_at: model.updated_at,
        }
    }
}

impl From<AdCost> for ActiveModel {
    fn from(ad: AdCost) -> Self {
        ActiveModel {
            id: Set(ad.id),
            campaign_name: Set(ad.campaign_name),
            platform: Set(ad.platform),
            amount_spent: Set(ad.amount_spent),
            results: Set(ad.results),
            cost_per_result: Set(ad.cost_per_result),
            spend_date: Set(ad.spend_date),
            notes: Set(ad.notes),
            created_by: Set(ad.created_by),
            created_at: Set(ad.created_at),
            updated_at: Set(ad.updated_at),
        }
    }
}
