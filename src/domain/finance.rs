//! Salaries, business charges and ad spend.
//!
//! Each record carries a derived amount (`net_salary`, `cost_per_result`)
//! that is recomputed whenever the record is created or changed.

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::{Decimal, RoundingStrategy};
use serde::Serialize;
use utoipa::ToSchema;
use uuid::Uuid;

use crate::errors::{AppError, AppResult};

/// base + bonus - deductions
pub fn net_salary(base: Decimal, bonus: Decimal, deductions: Decimal) -> Decimal {
    base + bonus - deductions
}

/// Spend per result rounded half-up to cents; zero when there were no results.
pub fn cost_per_result(amount_spent: Decimal, results: i32) -> Decimal {
    if results <= 0 {
        return Decimal::ZERO;
    }
    (amount_spent / Decimal::from(results))
        .round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero)
}

/// Inclusive date window; open ends are unbounded
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DateRange {
    pub from: Option<NaiveDate>,
    pub to: Option<NaiveDate>,
}

impl DateRange {
    pub fn new(from: Option<NaiveDate>, to: Option<NaiveDate>) -> AppResult<Self> {
        if let (Some(from), Some(to)) = (from, to) {
            if from > to {
                return Err(AppError::validation("'from' must not be after 'to'"));
            }
        }
        Ok(Self { from, to })
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Salary {
    pub id: Uuid,
    pub employee_name: String,
    pub period_start: NaiveDate,
    pub period_end: NaiveDate,
    #[schema(value_type = String)]
    pub base_amount: Decimal,
    #[schema(value_type = String)]
    pub bonus: Decimal,
    #[schema(value_type = String)]
    pub deductions: Decimal,
    #[schema(value_type = String)]
    pub net_salary: Decimal,
    pub paid: bool,
    pub notes: Option<String>,
    pub created_by: Option<Uuid>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone)]
pub struct SalaryInput {
    pub employee_name: String,
    pub period_start: NaiveDate,
    pub period_end: NaiveDate,
    pub base_amount: Decimal,
    pub bonus: Decimal,
    pub deductions: Decimal,
    pub paid: bool,
    pub notes: Option<String>,
}

#[derive(Debug, Clone, Default)]
pub struct SalaryChanges {
    pub employee_name: Option<String>,
    pub period_start: Option<NaiveDate>,
    pub period_end: Option<NaiveDate>,
    pub base_amount: Option<Decimal>,
    pub bonus: Option<Decimal>,
    pub deductions: Option<Decimal>,
    pub paid: Option<bool>,
    pub notes: Option<String>,
}

impl Salary {
    pub fn create(input: SalaryInput, created_by: Uuid) -> AppResult<Self> {
        let now = Utc::now();
        let mut salary = Self {
            id: Uuid::new_v4(),
            employee_name: input.employee_name,
            period_start: input.period_start,
            period_end: input.period_end,
            base_amount: input.base_amount,
            bonus: input.bonus,
            deductions: input.deductions,
            net_salary: Decimal::ZERO,
            paid: input.paid,
            notes: input.notes,
            created_by: Some(created_by),
            created_at: now,
            updated_at: now,
        };
        salary.recompute()?;
        Ok(salary)
    }

    pub fn apply(&mut self, changes: SalaryChanges) -> AppResult<()> {
        if let Some(v) = changes.employee_name {
            self.employee_name = v;
        }
        if let Some(v) = changes.period_start {
            self.period_start = v;
        }
        if let Some(v) = changes.period_end {
            self.period_end = v;
        }
        if let Some(v) = changes.base_amount {
            self.base_amount = v;
        }
        if let Some(v) = changes.bonus {
            self.bonus = v;
        }
        if let Some(v) = changes.deductions {
            self.deductions = v;
        }
        if let Some(v) = changes.paid {
            self.paid = v;
        }
        if let Some(v) = changes.notes {
            self.notes = Some(v).filter(|n| !n.trim().is_empty());
        }
        self.updated_at = Utc::now();
        self.recompute()
    }

    fn recompute(&mut self) -> AppResult<()> {
        if self.period_start > self.period_end {
            return Err(AppError::validation("Period start must not be after period end"));
        }
        self.net_salary = net_salary(self.base_amount, self.bonus, self.deductions);
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Charge {
    pub id: Uuid,
    pub title: String,
    #[schema(example = "Rent")]
    pub category: String,
    #[schema(value_type = String)]
    pub amount: Decimal,
    pub charge_date: NaiveDate,
    pub notes: Option<String>,
    pub created_by: Option<Uuid>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone)]
pub struct ChargeInput {
    pub title: String,
    pub category: String,
    pub amount: Decimal,
    pub charge_date: NaiveDate,
    pub notes: Option<String>,
}

#[derive(Debug, Clone, Default)]
pub struct ChargeChanges {
    pub title: Option<String>,
    pub category: Option<String>,
    pub amount: Option<Decimal>,
    pub charge_date: Option<NaiveDate>,
    pub notes: Option<String>,
}

impl Charge {
    pub fn create(input: ChargeInput, created_by: Uuid) -> AppResult<Self> {
        let now = Utc::now();
        let charge = Self {
            id: Uuid::new_v4(),
            title: input.title,
            category: input.category,
            amount: input.amount,
            charge_date: input.charge_date,
            notes: input.notes,
            created_by: Some(created_by),
            created_at: now,
            updated_at: now,
        };
        charge.check()?;
        Ok(charge)
    }

    pub fn apply(&mut self, changes: ChargeChanges) -> AppResult<()> {
        if let Some(v) = changes.title {
            self.title = v;
        }
        if let Some(v) = changes.category {
            self.category = v;
        }
        if let Some(v) = changes.amount {
            self.amount = v;
        }
        if let Some(v) = changes.charge_date {
            self.charge_date = v;
        }
        if let Some(v) = changes.notes {
            self.notes = Some(v).filter(|n| !n.trim().is_empty());
        }
        self.updated_at = Utc::now();
        self.check()
    }

    fn check(&self) -> AppResult<()> {
        if self.amount <= Decimal::ZERO {
            return Err(AppError::validation("Amount must be greater than 0"));
        }
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct AdCost {
    pub id: Uuid,
    pub campaign_name: String,
    #[schema(example = "Facebook")]
    pub platform: String,
    #[schema(value_type = String)]
    pub amount_spent: Decimal,
    pub results: i32,
    #[schema(value_type = String)]
    pub cost_per_result: Decimal,
    pub spend_date: NaiveDate,
    pub notes: Option<String>,
    pub created_by: Option<Uuid>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone)]
pub struct AdCostInput {
    pub campaign_name: String,
    pub platform: String,
    pub amount_spent: Decimal,
    pub results: i32,
    pub spend_date: NaiveDate,
    pub notes: Option<String>,
}

#[derive(Debug, Clone, Default)]
pub struct AdCostChanges {
    pub campaign_name: Option<String>,
    pub platform: Option<String>,
    pub amount_spent: Option<Decimal>,
    pub results: Option<i32>,
    pub spend_date: Option<NaiveDate>,
    pub notes: Option<String>,
}

impl AdCost {
    pub fn create(input: AdCostInput, created_by: Uuid) -> AppResult<Self> {
        let now = Utc::now();
        let mut ad = Self {
            id: Uuid::new_v4(),
            campaign_name: input.campaign_name,
            platform: input.platform,
            amount_spent: input.amount_spent,
            results: input.results,
            cost_per_result: Decimal::ZERO,
            spend_date: input.spend_date,
            notes: input.notes,
            created_by: Some(created_by),
            created_at: now,
            updated_at: now,
        };
        ad.recompute()?;
        Ok(ad)
    }

    pub fn apply(&mut self, changes: AdCostChanges) -> AppResult<()> {
        if let Some(v) = changes.campaign_name {
            self.campaign_name = v;
        }
        if let Some(v) = changes.platform {
            self.platform = v;
        }
        if let Some(v) = changes.amount_spent {
            self.amount_spent = v;
        }
        if let Some(v) = changes.results {
            self.results = v;
        }
        if let Some(v) = changes.spend_date {
            self.spend_date = v;
        }
        if let Some(v) = changes.notes {
            self.notes = Some(v).filter(|n| !n.trim().is_empty());
        }
        self.updated_at = Utc::now();
        self.recompute()
    }

    fn recompute(&mut self) -> AppResult<()> {
        if self.amount_spent < Decimal::ZERO {
            return Err(AppError::validation("Amount spent cannot be negative"));
        }
        if self.results < 0 {
            return Err(AppError::validation("Results cannot be negative"));
        }
        self.cost_per_result = cost_per_result(self.amount_spent, self.results);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_cost_per_result_rounds_to_cents() {
        assert_eq!(cost_per_result(dec!(100), 3), dec!(33.33));
        assert_eq!(cost_per_result(dec!(0.05), 2), dec!(0.03));
        assert_eq!(cost_per_result(dec!(50), 0), Decimal::ZERO);
    }

    #[test]
    fn test_salary_net_recomputed_on_change() {
        let mut salary = Salary::create(
            SalaryInput {
                employee_name: "Karim".into(),
                period_start: date(2024, 1, 1),
                period_end: date(2024, 1, 31),
                base_amount: dec!(40000),
                bonus: dec!(5000),
                deductions: dec!(2000),
                paid: false,
                notes: None,
            },
            Uuid::new_v4(),
        )
        .unwrap();
        assert_eq!(salary.net_salary, dec!(43000));

        salary
            .apply(SalaryChanges {
                bonus: Some(dec!(0)),
                ..Default::default()
            })
            .unwrap();
        assert_eq!(salary.net_salary, dec!(38000));
    }

    #[test]
    fn test_salary_period_must_be_ordered() {
        let result = Salary::create(
            SalaryInput {
                employee_name: "Karim".into(),
                period_start: date(2024, 2, 1),
                period_end: date(2024, 1, 1),
                base_amount: dec!(1),
                bonus: dec!(0),
                deductions: dec!(0),
                paid: false,
                notes: None,
            },
            Uuid::new_v4(),
        );
        assert!(result.is_err());
    }

    #[test]
    fn test_charge_amount_must_be_positive() {
        let input = ChargeInput {
            title: "Rent".into(),
            category: "Office".into(),
            amount: dec!(0),
            charge_date: date(2024, 1, 1),
            notes: None,
        };
        assert!(Charge::create(input, Uuid::new_v4()).is_err());
    }

    #[test]
    fn test_ad_cost_recomputed_on_change() {
        let mut ad = AdCost::create(
            AdCostInput {
                campaign_name: "Winter".into(),
                platform: "Facebook".into(),
                amount_spent: dec!(90),
                results: 0,
                spend_date: date(2024, 1, 5),
                notes: None,
            },
            Uuid::new_v4(),
        )
        .unwrap();
        assert_eq!(ad.cost_per_result, Decimal::ZERO);

        ad.apply(AdCostChanges {
            results: Some(4),
            ..Default::default()
        })
        .unwrap();
        assert_eq!(ad.cost_per_result, dec!(22.50));
    }

    #[test]
    fn test_date_range_rejects_reversed_bounds() {
        assert!(DateRange::new(Some(date(2024, 2, 1)), Some(date(2024, 1, 1))).is_err());
        assert!(DateRange::new(None, Some(date(2024, 1, 1))).is_ok());
    }
}
