use reqwest::multipart::{Form, Part};
use serde::Deserialize;
use std::path::Path;
use uuid::Uuid;

use super::ApiClient;
use crate::error::ApiError;
use crate::models::{NewTransaction, Transaction, TransactionPatch};

/// Filter and window for `GET /accounts/{id}/transactions`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransactionQuery {
    pub search: String,
    pub page: u64,
    pub limit: u64,
}

/// The list endpoint answers either a page envelope or a bare array.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub enum TransactionsPayload {
    Page {
        transactions: Vec<Transaction>,
        total: u64,
    },
    Rows(Vec<Transaction>),
}

/// The import endpoint reports counters, echoes rows, or both.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub enum ImportPayload {
    Counters {
        #[serde(default)]
        total: u64,
        imported: u64,
        #[serde(default)]
        transactions: Vec<Transaction>,
    },
    Rows(Vec<Transaction>),
}

/// A bank export ready to be uploaded as the `file` form field.
#[derive(Debug, Clone, PartialEq)]
pub struct ImportFile {
    pub file_name: String,
    pub bytes: Vec<u8>,
}

impl ImportFile {
    pub async fn read(path: &Path) -> Result<Self, ApiError> {
        let bytes = tokio::fs::read(path)
            .await
            .map_err(|e| ApiError::Io(format!("{}: {}", path.display(), e)))?;
        let file_name = path
            .file_name()
            .map(|name| name.to_string_lossy().to_string())
            .unwrap_or_else(|| "import.csv".to_string());
        Ok(ImportFile { file_name, bytes })
    }
}

fn collection_path(account_id: Uuid) -> String {
    format!("/accounts/{}/transactions", account_id)
}

fn item_path(account_id: Uuid, transaction_id: Uuid) -> String {
    format!("/accounts/{}/transactions/{}", account_id, transaction_id)
}

pub async fn get_transactions(
    client: &ApiClient,
    account_id: Uuid,
    query: &TransactionQuery,
) -> Result<TransactionsPayload, ApiError> {
    let params = [
        ("q", query.search.clone()),
        ("page", query.page.to_string()),
        ("limit", query.limit.to_string()),
    ];
    client.get_json(&collection_path(account_id), &params).await
}

pub async fn create_transaction(
    client: &ApiClient,
    account_id: Uuid,
    data: &NewTransaction,
) -> Result<Transaction, ApiError> {
    client.post_json(&collection_path(account_id), &[], data).await
}

pub async fn import_transactions(
    client: &ApiClient,
    account_id: Uuid,
    file: ImportFile,
    adapter: Option<&str>,
) -> Result<ImportPayload, ApiError> {
    let part = Part::bytes(file.bytes).file_name(file.file_name);
    let form = Form::new().part("file", part);
    let params: Vec<(&str, String)> = adapter
        .map(|name| vec![("adapter", name.to_string())])
        .unwrap_or_default();
    client
        .put_multipart(&collection_path(account_id), &params, form)
        .await
}

pub async fn update_transaction(
    client: &ApiClient,
    account_id: Uuid,
    transaction_id: Uuid,
    patch: &TransactionPatch,
) -> Result<(), ApiError> {
    client
        .patch_json(&item_path(account_id, transaction_id), &[], patch)
        .await?;
    Ok(())
}

pub async fn delete_transaction(
    client: &ApiClient,
    account_id: Uuid,
    transaction_id: Uuid,
) -> Result<(), ApiError> {
    client.delete(&item_path(account_id, transaction_id)).await?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decodes_page_envelope() {
        let payload: TransactionsPayload =
            serde_json::from_str(r#"{"transactions":[],"total":25}"#).unwrap();

        assert!(matches!(payload, TransactionsPayload::Page { total: 25, .. }));
    }

    #[test]
    fn decodes_bare_rows() {
        let payload: TransactionsPayload = serde_json::from_str("[]").unwrap();

        assert!(matches!(payload, TransactionsPayload::Rows(rows) if rows.is_empty()));
    }

    #[test]
    fn decodes_import_counters() {
        let payload: ImportPayload = serde_json::from_str(r#"{"total":12,"imported":10}"#).unwrap();

        match payload {
            ImportPayload::Counters {
                total,
                imported,
                transactions,
            } => {
                assert_eq!(total, 12);
                assert_eq!(imported, 10);
                assert!(transactions.is_empty());
            }
            ImportPayload::Rows(_) => panic!("expected counters"),
        }
    }

    #[tokio::test]
    async fn reads_import_file_name_from_path() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("statement.CSV");
        std::fs::write(&path, "date,amount\n").unwrap();

        let file = ImportFile::read(&path).await.unwrap();

        assert_eq!(file.file_name, "statement.CSV");
        assert_eq!(file.bytes, b"date,amount\n".to_vec());
    }

    #[tokio::test]
    async fn missing_import_file_is_an_io_error() {
        let error = ImportFile::read(Path::new("/definitely/not/here.csv"))
            .await
            .unwrap_err();

        assert!(matches!(error, ApiError::Io(_)));
    }
}
