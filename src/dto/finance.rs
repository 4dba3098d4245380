use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::Deserialize;
use utoipa::{IntoParams, ToSchema};
use validator::Validate;

use super::{
    default_limit, default_page, non_negative, optional, trimmed, validate_non_negative,
    validate_positive,
};
use crate::domain::{
    AdCostChanges, AdCostInput, ChargeChanges, ChargeInput, DateRange, SalaryChanges, SalaryInput,
};
use crate::errors::{AppError, AppResult};
use crate::types::PaginationParams;

#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateSalaryRequest {
    #[validate(length(min = 1, max = 150, message = "Employee name must be 1-150 characters"))]
    pub employee_name: String,
    #[schema(value_type = String, format = Date, example = "2024-01-01")]
    pub period_start: NaiveDate,
    #[schema(value_type = String, format = Date, example = "2024-01-31")]
    pub period_end: NaiveDate,
    #[validate(custom(function = "validate_non_negative"))]
    #[schema(value_type = String, example = "40000.00")]
    pub base_amount: Decimal,
    #[serde(default)]
    #[validate(custom(function = "validate_non_negative"))]
    #[schema(value_type = String, example = "5000.00")]
    pub bonus: Decimal,
    #[serde(default)]
    #[validate(custom(function = "validate_non_negative"))]
    #[schema(value_type = String, example = "0.00")]
    pub deductions: Decimal,
    #[serde(default)]
    pub paid: bool,
    #[validate(length(max = 1000, message = "Notes are too long"))]
    pub notes: Option<String>,
}

impl From<CreateSalaryRequest> for SalaryInput {
    fn from(request: CreateSalaryRequest) -> Self {
        SalaryInput {
            employee_name: trimmed(request.employee_name),
            period_start: request.period_start,
            period_end: request.period_end,
            base_amount: request.base_amount,
            bonus: request.bonus,
            deductions: request.deductions,
            paid: request.paid,
            notes: optional(request.notes),
        }
    }
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateSalaryRequest {
    #[validate(length(min = 1, max = 150, message = "Employee name must be 1-150 characters"))]
    pub employee_name: Option<String>,
    #[schema(value_type = Option<String>, format = Date)]
    pub period_start: Option<NaiveDate>,
    #[schema(value_type = Option<String>, format = Date)]
    pub period_end: Option<NaiveDate>,
    #[schema(value_type = Option<String>)]
    pub base_amount: Option<Decimal>,
    #[schema(value_type = Option<String>)]
    pub bonus: Option<Decimal>,
    #[schema(value_type = Option<String>)]
    pub deductions: Option<Decimal>,
    pub paid: Option<bool>,
    #[validate(length(max = 1000, message = "Notes are too long"))]
    pub notes: Option<String>,
}

impl UpdateSalaryRequest {
    pub fn into_changes(self) -> AppResult<SalaryChanges> {
        Ok(SalaryChanges {
            employee_name: self.employee_name.map(trimmed),
            period_start: self.period_start,
            period_end: self.period_end,
            base_amount: non_negative("baseAmount", self.base_amount)?,
            bonus: non_negative("bonus", self.bonus)?,
            deductions: non_negative("deductions", self.deductions)?,
            paid: self.paid,
            notes: self.notes,
        })
    }
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateChargeRequest {
    #[validate(length(min = 1, max = 200, message = "Title must be 1-200 characters"))]
    #[schema(example = "Warehouse rent")]
    pub title: String,
    #[validate(length(min = 1, max = 100, message = "Category must be 1-100 characters"))]
    #[schema(example = "Rent")]
    pub category: String,
    #[validate(custom(function = "validate_positive"))]
    #[schema(value_type = String, example = "25000.00")]
    pub amount: Decimal,
    #[schema(value_type = String, format = Date, example = "2024-01-05")]
    pub charge_date: NaiveDate,
    #[validate(length(max = 1000, message = "Notes are too long"))]
    pub notes: Option<String>,
}

impl From<CreateChargeRequest> for ChargeInput {
    fn from(request: CreateChargeRequest) -> Self {
        ChargeInput {
            title: trimmed(request.title),
            category: trimmed(request.category),
            amount: request.amount,
            charge_date: request.charge_date,
            notes: optional(request.notes),
        }
    }
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateChargeRequest {
    #[validate(length(min = 1, max = 200, message = "Title must be 1-200 characters"))]
    pub title: Option<String>,
    #[validate(length(min = 1, max = 100, message = "Category must be 1-100 characters"))]
    pub category: Option<String>,
    #[schema(value_type = Option<String>)]
    pub amount: Option<Decimal>,
    #[schema(value_type = Option<String>, format = Date)]
    pub charge_date: Option<NaiveDate>,
    #[validate(length(max = 1000, message = "Notes are too long"))]
    pub notes: Option<String>,
}

impl UpdateChargeRequest {
    pub fn into_changes(self) -> AppResult<ChargeChanges> {
        if matches!(self.amount, Some(amount) if amount <= Decimal::ZERO) {
            return Err(AppError::validation("amount must be greater than 0"));
        }
        Ok(ChargeChanges {
            title: self.title.map(trimmed),
            category: self.category.map(trimmed),
            amount: self.amount,
            charge_date: self.charge_date,
            notes: self.notes,
        })
    }
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateAdCostRequest {
    #[validate(length(min = 1, max = 200, message = "Campaign name must be 1-200 characters"))]
    #[schema(example = "Winter sale")]
    pub campaign_name: String,
    #[validate(length(min = 1, max = 100, message = "Platform must be 1-100 characters"))]
    #[schema(example = "Facebook")]
    pub platform: String,
    #[validate(custom(function = "validate_non_negative"))]
    #[schema(value_type = String, example = "90.00")]
    pub amount_spent: Decimal,
    #[serde(default)]
    #[validate(range(min = 0, message = "Results cannot be negative"))]
    pub results: i32,
    #[schema(value_type = String, format = Date, example = "2024-01-05")]
    pub spend_date: NaiveDate,
    #[validate(length(max = 1000, message = "Notes are too long"))]
    pub notes: Option<String>,
}

impl From<CreateAdCostRequest> for AdCostInput {
    fn from(request: CreateAdCostRequest) -> Self {
        AdCostInput {
            campaign_name: trimmed(request.campaign_name),
            platform: trimmed(request.platform),
            amount_spent: request.amount_spent,
            results: request.results,
            spend_date: request.spend_date,
            notes: optional(request.notes),
        }
    }
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateAdCostRequest {
    #[validate(length(min = 1, max = 200, message = "Campaign name must be 1-200 characters"))]
    pub campaign_name: Option<String>,
    #[validate(length(min = 1, max = 100, message = "Platform must be 1-100 characters"))]
    pub platform: Option<String>,
    #[schema(value_type = Option<String>)]
    pub amount_spent: Option<Decimal>,
    #[validate(range(min = 0, message = "Results cannot be negative"))]
    pub results: Option<i32>,
    #[schema(value_type = Option<String>, format = Date)]
    pub spend_date: Option<NaiveDate>,
    #[validate(length(max = 1000, message = "Notes are too long"))]
    pub notes: Option<String>,
}

impl UpdateAdCostRequest {
    pub fn into_changes(self) -> AppResult<AdCostChanges> {
        Ok(AdCostChanges {
            campaign_name: self.campaign_name.map(trimmed),
            platform: self.platform.map(trimmed),
            amount_spent: non_negative("amountSpent", self.amount_spent)?,
            results: self.results,
            spend_date: self.spend_date,
            notes: self.notes,
        })
    }
}

/// Listing filters shared by salaries, charges and ad costs
#[derive(Debug, Clone, Deserialize, IntoParams)]
#[serde(rename_all = "camelCase")]
#[into_params(parameter_in = Query)]
pub struct FinanceListQuery {
    #[serde(default = "default_page")]
    pub page: u64,
    #[serde(default = "default_limit")]
    pub limit: u64,
    /// Matches employee name, charge title/category or campaign/platform
    pub search: Option<String>,
    pub from: Option<NaiveDate>,
    pub to: Option<NaiveDate>,
}

impl FinanceListQuery {
    pub fn pagination(&self) -> PaginationParams {
        PaginationParams::new(self.page, self.limit)
    }

    pub fn range(&self) -> AppResult<DateRange> {
        DateRange::new(self.from, self.to)
    }

    pub fn search(&self) -> Option<String> {
        optional(self.search.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_charge_amount_must_be_positive() {
        let request: CreateChargeRequest = serde_json::from_str(
            r#"{"title":"Rent","category":"Office","amount":"0","chargeDate":"2024-01-05"}"#,
        )
        .unwrap();
        assert!(request.validate().is_err());
    }

    #[test]
    fn test_salary_defaults() {
        let request: CreateSalaryRequest = serde_json::from_str(
            r#"{"employeeName":"Karim","periodStart":"2024-01-01","periodEnd":"2024-01-31","baseAmount":"40000"}"#,
        )
        .unwrap();
        assert!(request.validate().is_ok());
        let input = SalaryInput::from(request);
        assert_eq!(input.bonus, dec!(0));
        assert!(!input.paid);
    }

    #[test]
    fn test_update_charge_rejects_zero_amount() {
        let request = UpdateChargeRequest {
            title: None,
            category: None,
            amount: Some(dec!(0)),
            charge_date: None,
            notes: None,
        };
        assert!(request.into_changes().is_err());
    }
}
