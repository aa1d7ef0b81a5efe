use std::sync::{Mutex, MutexGuard};

use super::collection::{Collection, Outcome, Snapshot};
use crate::api::ApiClient;
use crate::error::{StoreError, ValidationError};
use crate::models::{Budget, BudgetGroupSummary, BudgetRow, SetBudget};
use crate::services::budgets::BudgetsService;

#[derive(Debug, Default)]
struct BudgetsState {
    rows: Collection<BudgetRow>,
    period: Option<(u16, u8)>,
}

/// One month of budget rows, already joined with group and category names.
pub struct BudgetsStore {
    client: ApiClient,
    state: Mutex<BudgetsState>,
}

impl BudgetsStore {
    pub fn new(client: ApiClient) -> Self {
        BudgetsStore {
            client,
            state: Mutex::new(BudgetsState::default()),
        }
    }

    fn lock(&self) -> Result<MutexGuard<'_, BudgetsState>, StoreError> {
        self.state.lock().map_err(|_| StoreError::Lock)
    }

    pub fn snapshot(&self) -> Snapshot<BudgetRow> {
        match self.lock() {
            Ok(state) => state.rows.snapshot(),
            Err(err) => Snapshot {
                items: Vec::new(),
                loading: false,
                error: Some(err),
            },
        }
    }

    pub fn rows(&self) -> Vec<BudgetRow> {
        self.lock()
            .map(|state| state.rows.items().to_vec())
            .unwrap_or_default()
    }

    /// The year and month currently loaded.
    pub fn period(&self) -> Option<(u16, u8)> {
        self.lock().ok().and_then(|state| state.period)
    }

    pub async fn get_by_period(&self, year: u16, month: u8) -> Result<Outcome, StoreError> {
        if !(1..=12).contains(&month) {
            return Err(ValidationError::InvalidPeriod { year, month }.into());
        }

        let generation = {
            let mut state = self.lock()?;
            state.period = Some((year, month));
            state.rows.begin_fetch()
        };
        let result = BudgetsService::fetch_by_period(&self.client, year, month)
            .await
            .map_err(StoreError::from);
        self.lock()?.rows.finish_fetch(generation, result)
    }

    /// Set a category's allocation for a month.
    ///
    /// The loaded row for that category and month is updated in place. Rows
    /// for categories without an allocation yet only appear after the next
    /// [`BudgetsStore::get_by_period`], since the group names come from the server.
    pub async fn create(&self, data: &SetBudget) -> Result<Budget, StoreError> {
        match BudgetsService::create(&self.client, data).await {
            Ok(budget) => {
                let mut state = self.lock()?;
                let row = state.rows.items_mut().iter_mut().find(|row| {
                    row.category_id == Some(budget.category_id)
                        && row.year == budget.year
                        && row.month == budget.month
                });
                if let Some(row) = row {
                    row.budgeted = budget.budgeted;
                }
                state.rows.succeed();
                Ok(budget)
            }
            Err(err) => Err(self.lock()?.rows.fail(err.into())),
        }
    }

    /// Fold the loaded rows into per-group totals, in the order groups first appear.
    pub fn grouped(&self) -> Vec<BudgetGroupSummary> {
        group_rows(&self.rows())
    }

    pub fn clear(&self) {
        if let Ok(mut state) = self.lock() {
            state.rows.reset();
            state.period = None;
        }
    }
}

fn group_rows(rows: &[BudgetRow]) -> Vec<BudgetGroupSummary> {
    let mut groups: Vec<BudgetGroupSummary> = Vec::new();
    for row in rows {
        let index = match groups.iter().position(|group| group.group_id == row.group_id) {
            Some(index) => index,
            None => {
                groups.push(BudgetGroupSummary {
                    group_id: row.group_id,
                    group_name: row.group_name.clone(),
                    budgeted: 0.0,
                    spent: 0.0,
                    rows: Vec::new(),
                });
                groups.len() - 1
            }
        };

        let group = &mut groups[index];
        group.budgeted += row.budgeted;
        group.spent += row.spent;
        group.rows.push(row.clone());
    }
    groups
}

#[cfg(test)]
mod tests {
    use super::*;
    use uuid::Uuid;

    fn row(group_id: Uuid, group_name: &str, budgeted: f64, spent: f64) -> BudgetRow {
        BudgetRow {
            budgeted,
            spent,
            year: 2024,
            month: 5,
            category_id: Some(Uuid::new_v4()),
            category_name: Some("Category".to_string()),
            category_notes: None,
            group_id,
            group_name: group_name.to_string(),
            group_notes: String::new(),
        }
    }

    #[test]
    fn groups_rows_in_first_seen_order() {
        let bills = Uuid::new_v4();
        let fun = Uuid::new_v4();
        let rows = vec![
            row(bills, "Bills", 100.0, 80.0),
            row(fun, "Fun", 50.0, 60.0),
            row(bills, "Bills", 25.0, 5.0),
        ];

        let groups = group_rows(&rows);

        assert_eq!(groups.len(), 2);
        assert_eq!(groups[0].group_name, "Bills");
        assert_eq!(groups[0].budgeted, 125.0);
        assert_eq!(groups[0].spent, 85.0);
        assert_eq!(groups[0].rows.len(), 2);
        assert_eq!(groups[1].group_name, "Fun");
        assert_eq!(groups[1].spent, 60.0);
    }

    #[test]
    fn no_rows_means_no_groups() {
        assert!(group_rows(&[]).is_empty());
    }
}
