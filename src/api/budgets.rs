use super::ApiClient;
use crate::error::ApiError;
use crate::models::{Budget, BudgetRow, SetBudget};

pub async fn get_budgets(client: &ApiClient, year: u16, month: u8) -> Result<Vec<BudgetRow>, ApiError> {
    client
        .get_json("/budgets", &[("year", year.to_string()), ("month", month.to_string())])
        .await
}

/// `PUT /budgets` is an upsert keyed by category and month.
pub async fn set_budget(client: &ApiClient, data: &SetBudget) -> Result<Budget, ApiError> {
    client.put_json("/budgets", &[], data).await
}
