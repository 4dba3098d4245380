use chrono::NaiveDate;
use serde::Deserialize;
use utoipa::IntoParams;
use validator::Validate;

use crate::config::{DEFAULT_SALES_DAYS, DEFAULT_TOP_PRODUCTS};
use crate::domain::DateRange;
use crate::errors::AppResult;

#[derive(Debug, Clone, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct SummaryQuery {
    pub from: Option<NaiveDate>,
    pub to: Option<NaiveDate>,
}

impl SummaryQuery {
    pub fn range(&self) -> AppResult<DateRange> {
        DateRange::new(self.from, self.to)
    }
}

#[derive(Debug, Clone, Deserialize, Validate, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct TopProductsQuery {
    #[validate(range(min = 1, max = 50, message = "Limit must be between 1 and 50"))]
    pub limit: Option<u64>,
}

impl TopProductsQuery {
    pub fn limit(&self) -> u64 {
        self.limit.unwrap_or(DEFAULT_TOP_PRODUCTS)
    }
}

#[derive(Debug, Clone, Deserialize, Validate, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct SalesQuery {
    #[validate(range(min = 1, max = 366, message = "Days must be between 1 and 366"))]
    pub days: Option<u32>,
}

impl SalesQuery {
    pub fn days(&self) -> u32 {
        self.days.unwrap_or(DEFAULT_SALES_DAYS)
    }
}
