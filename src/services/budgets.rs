use super::logged;
use crate::api::{budgets, ApiClient};
use crate::error::ApiError;
use crate::models::{Budget, BudgetRow, SetBudget};

/// Budgets are read per month and written by upsert; there is no update or delete.
pub struct BudgetsService;

impl BudgetsService {
    pub async fn fetch_by_period(client: &ApiClient, year: u16, month: u8) -> Result<Vec<BudgetRow>, ApiError> {
        logged(budgets::get_budgets(client, year, month).await, "fetching budgets")
    }

    pub async fn create(client: &ApiClient, data: &SetBudget) -> Result<Budget, ApiError> {
        logged(budgets::set_budget(client, data).await, "setting budget")
    }
}
