use uuid::Uuid;

use super::logged;
use crate::api::transactions::{self, ImportFile, ImportPayload, TransactionQuery, TransactionsPayload};
use crate::api::ApiClient;
use crate::error::ApiError;
use crate::models::{ImportResult, NewTransaction, Transaction, TransactionPage, TransactionPatch};

/// Transactions are scoped to an account, so every call takes its id.
pub struct TransactionsService;

impl TransactionsService {
    pub async fn fetch_page(
        client: &ApiClient,
        account_id: Uuid,
        query: &TransactionQuery,
    ) -> Result<TransactionPage, ApiError> {
        let payload = logged(
            transactions::get_transactions(client, account_id, query).await,
            "fetching transactions",
        )?;
        Ok(normalize_page(payload))
    }

    pub async fn create(
        client: &ApiClient,
        account_id: Uuid,
        data: &NewTransaction,
    ) -> Result<Transaction, ApiError> {
        logged(
            transactions::create_transaction(client, account_id, data).await,
            "creating transaction",
        )
    }

    pub async fn import(
        client: &ApiClient,
        account_id: Uuid,
        file: ImportFile,
        adapter: Option<&str>,
    ) -> Result<ImportResult, ApiError> {
        let file_name = file.file_name.clone();
        let payload = logged(
            transactions::import_transactions(client, account_id, file, adapter).await,
            "importing transactions",
        )?;
        let result = normalize_import(payload);
        tracing::info!(
            "imported {} of {} rows from {}",
            result.imported_count,
            result.total,
            file_name
        );
        Ok(result)
    }

    pub async fn update(
        client: &ApiClient,
        account_id: Uuid,
        transaction_id: Uuid,
        patch: &TransactionPatch,
    ) -> Result<(), ApiError> {
        logged(
            transactions::update_transaction(client, account_id, transaction_id, patch).await,
            "updating transaction",
        )
    }

    pub async fn delete(client: &ApiClient, account_id: Uuid, transaction_id: Uuid) -> Result<(), ApiError> {
        logged(
            transactions::delete_transaction(client, account_id, transaction_id).await,
            "deleting transaction",
        )
    }
}

fn normalize_page(payload: TransactionsPayload) -> TransactionPage {
    match payload {
        TransactionsPayload::Page { transactions, total } => TransactionPage { transactions, total },
        TransactionsPayload::Rows(transactions) => TransactionPage {
            total: transactions.len() as u64,
            transactions,
        },
    }
}

fn normalize_import(payload: ImportPayload) -> ImportResult {
    match payload {
        ImportPayload::Counters {
            total,
            imported,
            transactions,
        } => ImportResult {
            total: total.max(imported),
            imported_count: imported,
            created: transactions,
        },
        ImportPayload::Rows(created) => ImportResult {
            total: created.len() as u64,
            imported_count: created.len() as u64,
            created,
        },
    }
}
