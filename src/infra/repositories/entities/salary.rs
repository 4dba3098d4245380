use sea_orm::entity::prelude::*;
use sea_orm::Set;

use crate::domain::Salary;

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "salaries")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub employee_name: String,
    pub period_start: Date,
    pub period_end: Date,
    #[sea_orm(column_type = "Decimal(Some((12, 2)))")]
    pub base_amount: Decimal,
    #[sea_orm(column_type = "Decimal(Some((12, 2)))")]
    pub bonus: Decimal,
    #[sea_orm(column_type = "Decimal(Some((12, 2)))")]
    pub deductions: Decimal,
    #[sea_orm(column_type = "Decimal(Some((12, 2)))")]
    pub net_salary: Decimal,
    pub paid: bool,
    #[sea_orm(column_type = "Text", nullable)]
    pub notes: Option<String>,
    pub created_by: Option<Uuid>,
    pub created_at: DateTimeUtc,
    pub updated_at: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

impl From<Model> for Salary {
    fn from(model: Model) -> Self {
        Salary {
            id: model.id,
            employee_name: model.employee_name,
            period_start: model.period_start,
            period_end: model.period_end,
            base_amount: model.base_amount,
            bonus: model.bonus,
            deductions: model.deductions,
            net_salary: model.net_salary,
            paid: model.paid,
            notes: model.notes,
            created_by: model.created_by,
            created_at: model.created_at,
            updated_at: model.updated_at,
        }
    }
}

impl From<Salary> for ActiveModel {
    fn from(salary: Salary) -> Self {
        ActiveModel {
            id: Set(salary.id),
            employee_name: Set(salary.employee_name),
            period_start: Set(salary.period_start),
            period_end: Set(salary.period_end),
            base_amount: Set(salary.base_amount),
            bonus: Set(salary.bonus),
            deductions: Set(salary.deductions),
            net_salary: Set(salary.net_salary),
            paid: Set(salary.paid),
            notes: Set(salary.notes),
            created_by: Set(salary.created_by),
            created_at: Set(salary.created_at),
            updated_at: Set(salary.updated_at),
        }
    }
}
