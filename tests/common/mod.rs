#![allow(dead_code)]

//! In-process stand-in for the Vitta API, served by axum on a random local port.

use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use axum::extract::{Multipart, Path, Query, Request, State};
use axum::http::{header, StatusCode};
use axum::middleware::{self, Next};
use axum::response::{IntoResponse, Response};
use axum::routing::get;
use axum::{Json, Router};
use serde_json::{json, Map, Value};
use tokio::net::TcpListener;
use uuid::Uuid;

use vitta::{AppState, Settings};

pub const USERNAME: &str = "admin";
pub const PASSWORD: &str = "secret";
const EXPECTED_AUTH: &str = "Basic YWRtaW46c2VjcmV0";

#[derive(Default)]
pub struct Backend {
    pub accounts: Vec<Value>,
    pub payees: Vec<Value>,
    pub groups: Vec<Value>,
    pub categories: Vec<Value>,
    pub adapters: Vec<Value>,
    pub budgets: Vec<Value>,
    pub transactions: HashMap<Uuid, Vec<Value>>,
    /// Every request that reached the server, authorised or not.
    pub requests: usize,
    pub fail_with: Option<StatusCode>,
    /// PATCH bodies whose `name` is listed here are answered after the delay.
    pub slow_names: HashMap<String, u64>,
    /// Transaction searches for these queries are answered after the delay.
    pub slow_queries: HashMap<String, u64>,
    /// Answer imports with the created rows instead of counters.
    pub import_echo: bool,
    /// Answer transaction lists with a bare array.
    pub bare_transactions: bool,
    pub last_query: HashMap<String, String>,
    pub last_patch: Option<Value>,
    pub last_upload: Option<(String, Vec<u8>)>,
    pub last_import_adapter: Option<String>,
}

#[derive(Clone, Default)]
pub struct MockServer {
    inner: Arc<Mutex<Backend>>,
}

impl MockServer {
    pub fn with<R>(&self, f: impl FnOnce(&mut Backend) -> R) -> R {
        f(&mut self.inner.lock().unwrap())
    }

    pub fn requests(&self) -> usize {
        self.with(|b| b.requests)
    }

    pub fn fail_with(&self, status: Option<StatusCode>) {
        self.with(|b| b.fail_with = status);
    }

    pub fn last_query(&self, key: &str) -> Option<String> {
        self.with(|b| b.last_query.get(key).cloned())
    }

    pub fn seed_account(&self, name: &str, adapter: &str) -> Uuid {
        let id = Uuid::new_v4();
        self.with(|b| {
            b.accounts.push(json!({
                "id": id,
                "name": name,
                "category": "bank",
                "adapter": adapter,
                "offBudget": null,
                "balance": 0,
            }))
        });
        id
    }

    pub fn set_balance(&self, account_id: Uuid, balance: f64) {
        self.with(|b| {
            if let Some(account) = find_mut(&mut b.accounts, account_id) {
                account["balance"] = json!(balance);
            }
        });
    }

    pub fn seed_payee(&self, name: &str) -> Uuid {
        let id = Uuid::new_v4();
        self.with(|b| b.payees.push(json!({ "id": id, "name": name })));
        id
    }

    pub fn seed_group(&self, name: &str) -> Uuid {
        let id = Uuid::new_v4();
        self.with(|b| b.groups.push(json!({ "id": id, "name": name, "notes": null })));
        id
    }

    pub fn seed_category(&self, group_id: Uuid, name: &str) -> Uuid {
        let id = Uuid::new_v4();
        self.with(|b| {
            b.categories
                .push(json!({ "id": id, "groupId": group_id, "name": name, "notes": null }))
        });
        id
    }

    pub fn seed_adapter(&self, name: &str, category: &str) {
        self.with(|b| b.adapters.push(json!({ "name": name, "category": category })));
    }

    pub fn seed_transactions(&self, account_id: Uuid, names: &[&str]) -> Vec<Uuid> {
        names
            .iter()
            .map(|name| {
                let id = Uuid::new_v4();
                let row = transaction_row(id, account_id, name, 0.0, 100.0);
                self.with(|b| b.transactions.entry(account_id).or_default().push(row));
                id
            })
            .collect()
    }

    #[allow(clippy::too_many_arguments)]
    pub fn seed_budget_row(
        &self,
        group_id: Uuid,
        group_name: &str,
        category_id: Uuid,
        category_name: &str,
        year: u16,
        month: u8,
        budgeted: f64,
        spent: f64,
    ) {
        self.with(|b| {
            b.budgets.push(json!({
                "budgeted": budgeted,
                "spent": spent,
                "year": year,
                "month": month,
                "categoryId": category_id,
                "categoryName": category_name,
                "categoryNotes": null,
                "groupId": group_id,
                "groupName": group_name,
                "groupNotes": "",
            }))
        });
    }
}

fn transaction_row(id: Uuid, account_id: Uuid, name: &str, credit: f64, debit: f64) -> Value {
    json!({
        "id": id,
        "accountId": account_id,
        "name": name,
        "payeeId": null,
        "categoryId": null,
        "credit": credit,
        "debit": debit,
        "notes": null,
        "clearedAt": null,
    })
}

fn find_mut(items: &mut [Value], id: Uuid) -> Option<&mut Value> {
    let id = id.to_string();
    items.iter_mut().find(|item| item["id"] == Value::String(id.clone()))
}

const ACCOUNT_FIELDS: &[&str] = &["name", "offBudget", "category", "adapter"];
const PAYEE_FIELDS: &[&str] = &["name", "rules", "autoCategoryId"];
const GROUP_FIELDS: &[&str] = &["name", "notes"];
const CATEGORY_FIELDS: &[&str] = &["name", "notes", "groupId"];
const TRANSACTION_FIELDS: &[&str] = &["categoryId", "payeeId", "credit", "debit", "name", "notes", "clearedAt"];

/// What the server stores for a writable column the body left out.
fn zero(field: &str) -> Value {
    match field {
        "name" | "category" | "adapter" => json!(""),
        "credit" | "debit" => json!(0.0),
        "offBudget" => json!(false),
        _ => Value::Null,
    }
}

/// Full-row update: every writable column takes the body's value or its zero value.
fn overwrite(target: &mut Value, patch: &Value, fields: &[&str]) {
    for field in fields {
        target[*field] = patch.get(*field).cloned().unwrap_or_else(|| zero(field));
    }
}

fn merge(target: &mut Value, patch: &Value) {
    if let (Some(target), Some(patch)) = (target.as_object_mut(), patch.as_object()) {
        for (key, value) in patch {
            target.insert(key.clone(), value.clone());
        }
    }
}

fn not_found() -> Response {
    (StatusCode::NOT_FOUND, Json(json!({ "error": "not found" }))).into_response()
}

async fn guard(State(server): State<MockServer>, request: Request, next: Next) -> Response {
    server.with(|b| b.requests += 1);

    let authorized = request
        .headers()
        .get(header::AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        == Some(EXPECTED_AUTH);
    if !authorized {
        return (StatusCode::UNAUTHORIZED, Json(json!({ "error": "unauthorized" }))).into_response();
    }

    if let Some(status) = server.with(|b| b.fail_with) {
        return (status, Json(json!({ "error": "injected failure" }))).into_response();
    }

    next.run(request).await
}

async fn delay_for_name(server: &MockServer, patch: &Value) {
    let delay = patch["name"]
        .as_str()
        .and_then(|name| server.with(|b| b.slow_names.get(name).copied()));
    if let Some(ms) = delay {
        tokio::time::sleep(Duration::from_millis(ms)).await;
    }
}

type Pick = fn(&mut Backend) -> &mut Vec<Value>;

/// List, create, fetch, patch and delete for one flat collection.
fn collection(path: &str, pick: Pick, writable: &'static [&'static str]) -> Router<MockServer> {
    Router::new()
        .route(
            path,
            get(move |State(server): State<MockServer>| async move {
                Json(Value::Array(server.with(|b| pick(b).clone())))
            })
            .post(
                move |State(server): State<MockServer>,
                      Query(query): Query<HashMap<String, String>>,
                      Json(mut body): Json<Value>| async move {
                    body["id"] = json!(Uuid::new_v4());
                    server.with(|b| {
                        b.last_query = query;
                        pick(b).push(body.clone());
                    });
                    (StatusCode::CREATED, Json(body))
                },
            ),
        )
        .route(
            &format!("{}/{{id}}", path),
            get(move |State(server): State<MockServer>, Path(id): Path<Uuid>| async move {
                match server.with(|b| find_mut(pick(b), id).cloned()) {
                    Some(item) => Json(item).into_response(),
                    None => not_found(),
                }
            })
            .patch(
                move |State(server): State<MockServer>,
                      Path(id): Path<Uuid>,
                      Query(query): Query<HashMap<String, String>>,
                      Json(patch): Json<Value>| async move {
                    delay_for_name(&server, &patch).await;
                    server.with(|b| {
                        b.last_query = query;
                        b.last_patch = Some(patch.clone());
                        match find_mut(pick(b), id) {
                            Some(item) => {
                                overwrite(item, &patch, writable);
                                StatusCode::NO_CONTENT.into_response()
                            }
                            None => not_found(),
                        }
                    })
                },
            )
            .delete(move |State(server): State<MockServer>, Path(id): Path<Uuid>| async move {
                server.with(|b| {
                    let items = pick(b);
                    let before = items.len();
                    items.retain(|item| item["id"] != Value::String(id.to_string()));
                    if items.len() == before {
                        not_found()
                    } else {
                        StatusCode::NO_CONTENT.into_response()
                    }
                })
            }),
        )
}

async fn list_transactions(
    State(server): State<MockServer>,
    Path(account_id): Path<Uuid>,
    Query(query): Query<HashMap<String, String>>,
) -> Response {
    let search = query.get("q").cloned().unwrap_or_default();
    let page: usize = query.get("page").and_then(|p| p.parse().ok()).unwrap_or(1);
    let limit: usize = query.get("limit").and_then(|l| l.parse().ok()).unwrap_or(50);

    let delay = server.with(|b| b.slow_queries.get(&search).copied());
    if let Some(ms) = delay {
        tokio::time::sleep(Duration::from_millis(ms)).await;
    }

    server.with(|b| {
        b.last_query = query.clone();
        let needle = search.to_lowercase();
        let matching: Vec<Value> = b
            .transactions
            .get(&account_id)
            .cloned()
            .unwrap_or_default()
            .into_iter()
            .filter(|row| {
                row["name"]
                    .as_str()
                    .map(|name| name.to_lowercase().contains(&needle))
                    .unwrap_or(false)
            })
            .collect();

        let rows: Vec<Value> = matching
            .iter()
            .skip(page.saturating_sub(1) * limit)
            .take(limit)
            .cloned()
            .collect();

        if b.bare_transactions {
            Json(Value::Array(rows)).into_response()
        } else {
            Json(json!({ "transactions": rows, "total": matching.len() })).into_response()
        }
    })
}

async fn create_transaction(
    State(server): State<MockServer>,
    Path(account_id): Path<Uuid>,
    Json(body): Json<Value>,
) -> Response {
    let mut row = transaction_row(Uuid::new_v4(), account_id, "", 0.0, 0.0);
    merge(&mut row, &body);
    server.with(|b| b.transactions.entry(account_id).or_default().push(row.clone()));
    (StatusCode::CREATED, Json(row)).into_response()
}

/// Each non-empty line after the header is `name,credit,debit`.
async fn import_transactions(
    State(server): State<MockServer>,
    Path(account_id): Path<Uuid>,
    Query(query): Query<HashMap<String, String>>,
    mut multipart: Multipart,
) -> Response {
    let mut upload = None;
    while let Ok(Some(field)) = multipart.next_field().await {
        if field.name() != Some("file") {
            continue;
        }
        let file_name = field.file_name().unwrap_or_default().to_string();
        if let Ok(bytes) = field.bytes().await {
            upload = Some((file_name, bytes.to_vec()));
        }
    }
    let Some((file_name, bytes)) = upload else {
        return (StatusCode::BAD_REQUEST, Json(json!({ "error": "file is required" }))).into_response();
    };

    let text = String::from_utf8_lossy(&bytes).to_string();
    let created: Vec<Value> = text
        .lines()
        .skip(1)
        .filter(|line| !line.trim().is_empty())
        .map(|line| {
            let fields: Vec<&str> = line.split(',').collect();
            let amount = |index: usize| fields.get(index).and_then(|v| v.trim().parse().ok()).unwrap_or(0.0);
            transaction_row(Uuid::new_v4(), account_id, fields[0].trim(), amount(1), amount(2))
        })
        .collect();

    server.with(|b| {
        b.last_import_adapter = query.get("adapter").cloned();
        b.last_query = query;
        b.last_upload = Some((file_name, bytes));
        b.transactions
            .entry(account_id)
            .or_default()
            .extend(created.iter().cloned());
        if b.import_echo {
            Json(Value::Array(created.clone())).into_response()
        } else {
            Json(json!({ "total": created.len(), "imported": created.len() })).into_response()
        }
    })
}

async fn patch_transaction(
    State(server): State<MockServer>,
    Path((account_id, transaction_id)): Path<(Uuid, Uuid)>,
    Json(patch): Json<Value>,
) -> Response {
    delay_for_name(&server, &patch).await;
    server.with(|b| {
        b.last_patch = Some(patch.clone());
        let rows = b.transactions.entry(account_id).or_default();
        match find_mut(rows, transaction_id) {
            Some(row) => {
                overwrite(row, &patch, TRANSACTION_FIELDS);
                StatusCode::NO_CONTENT.into_response()
            }
            None => not_found(),
        }
    })
}

async fn delete_transaction(
    State(server): State<MockServer>,
    Path((account_id, transaction_id)): Path<(Uuid, Uuid)>,
) -> Response {
    server.with(|b| {
        let rows = b.transactions.entry(account_id).or_default();
        let before = rows.len();
        rows.retain(|row| row["id"] != Value::String(transaction_id.to_string()));
        if rows.len() == before {
            not_found()
        } else {
            StatusCode::NO_CONTENT.into_response()
        }
    })
}

async fn list_budgets(State(server): State<MockServer>, Query(query): Query<HashMap<String, String>>) -> Response {
    let year: u64 = query.get("year").and_then(|y| y.parse().ok()).unwrap_or(0);
    let month: u64 = query.get("month").and_then(|m| m.parse().ok()).unwrap_or(0);
    server.with(|b| {
        b.last_query = query.clone();
        let rows: Vec<Value> = b
            .budgets
            .iter()
            .filter(|row| row["year"].as_u64() == Some(year) && row["month"].as_u64() == Some(month))
            .cloned()
            .collect();
        Json(Value::Array(rows)).into_response()
    })
}

async fn set_budget(State(server): State<MockServer>, Json(body): Json<Value>) -> Response {
    server.with(|b| {
        for row in b.budgets.iter_mut() {
            if row["categoryId"] == body["categoryId"]
                && row["year"] == body["year"]
                && row["month"] == body["month"]
            {
                row["budgeted"] = body["budgeted"].clone();
            }
        }
    });

    let mut budget = Map::new();
    budget.insert("id".to_string(), json!(Uuid::new_v4()));
    if let Some(fields) = body.as_object() {
        budget.extend(fields.clone());
    }
    Json(Value::Object(budget)).into_response()
}

fn router(server: MockServer) -> Router {
    let api = Router::new()
        .merge(collection("/accounts", |b| &mut b.accounts, ACCOUNT_FIELDS))
        .merge(collection("/payees", |b| &mut b.payees, PAYEE_FIELDS))
        .merge(collection("/groups", |b| &mut b.groups, GROUP_FIELDS))
        .merge(collection("/categories", |b| &mut b.categories, CATEGORY_FIELDS))
        .route(
            "/adapters",
            get(|State(server): State<MockServer>| async move {
                Json(Value::Array(server.with(|b| b.adapters.clone())))
            }),
        )
        .route(
            "/accounts/{id}/transactions",
            get(list_transactions)
                .post(create_transaction)
                .put(import_transactions),
        )
        .route(
            "/accounts/{id}/transactions/{transaction_id}",
            axum::routing::patch(patch_transaction).delete(delete_transaction),
        )
        .route("/budgets", get(list_budgets).put(set_budget))
        .layer(middleware::from_fn_with_state(server.clone(), guard));

    Router::new().nest("/v1", api).with_state(server)
}

/// Start a mock server and return its base URL.
pub async fn spawn() -> (String, MockServer) {
    let server = MockServer::default();
    let app = router(server.clone());
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    (format!("http://{}/v1", addr), server)
}

pub fn settings(base_url: &str, page_size: u64, search_debounce_ms: u64) -> Settings {
    Settings {
        base_url: base_url.to_string(),
        username: USERNAME.to_string(),
        password: PASSWORD.to_string(),
        page_size,
        search_debounce_ms,
        session_path: PathBuf::from("/nonexistent/vitta-session"),
        log_level: "debug".to_string(),
    }
}

/// A running mock plus an `AppState` pointed at it.
pub async fn app(page_size: u64) -> (AppState, MockServer) {
    let (base_url, server) = spawn().await;
    let state = AppState::init(&settings(&base_url, page_size, 100)).unwrap();
    (state, server)
}
