use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use uuid::Uuid;

/// A server-owned record held in a client-side store.
pub trait Entity: Clone + Send + Sync + 'static {
    /// Partial update sent with `PATCH`; `None` fields are left untouched.
    type Patch: Serialize + Clone + Send + Sync + 'static;

    fn id(&self) -> Uuid;

    fn name(&self) -> &str;

    /// Shallow merge of a patch into the entity.
    fn merge(&mut self, patch: &Self::Patch);

    /// Every writable field of the entity, as a patch.
    fn to_patch(&self) -> Self::Patch;

    /// The complete row to send for `edit`.
    ///
    /// The API overwrites every writable column on `PATCH`, so an edit is
    /// widened with the loaded values before it goes out.
    fn full_patch(&self, edit: &Self::Patch) -> Self::Patch {
        let mut merged = self.clone();
        merged.merge(edit);
        merged.to_patch()
    }
}

fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Account {
    pub id: Uuid,
    pub name: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub category: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub adapter: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub off_budget: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub balance: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewAccount {
    pub name: String,
    pub category: String,
    pub adapter: String,
    pub off_budget: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AccountPatch {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub adapter: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub off_budget: Option<bool>,
}

impl AccountPatch {
    /// True when applying the patch to `account` would change nothing.
    pub fn is_noop_for(&self, account: &Account) -> bool {
        let mut merged = account.clone();
        merged.merge(self);
        &merged == account
    }
}

impl Entity for Account {
    type Patch = AccountPatch;

    fn id(&self) -> Uuid {
        self.id
    }

    fn name(&self) -> &str {
        &self.name
    }

    fn merge(&mut self, patch: &AccountPatch) {
        if let Some(name) = &patch.name {
            self.name = name.clone();
        }
        if let Some(category) = &patch.category {
            self.category = category.clone();
        }
        if let Some(adapter) = &patch.adapter {
            self.adapter = adapter.clone();
        }
        if let Some(off_budget) = patch.off_budget {
            self.off_budget = off_budget;
        }
    }

    fn to_patch(&self) -> AccountPatch {
        AccountPatch {
            name: Some(self.name.clone()),
            category: Some(self.category.clone()),
            adapter: Some(self.adapter.clone()),
            off_budget: Some(self.off_budget),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Transaction {
    pub id: Uuid,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub account_id: Option<Uuid>,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub payee_id: Option<Uuid>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub payee_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category_id: Option<Uuid>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category_name: Option<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub credit: f64,
    #[serde(default, deserialize_with = "null_as_default")]
    pub debit: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
    #[serde(default)]
    pub cleared_at: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<DateTime<Utc>>,
}

impl Transaction {
    pub fn is_cleared(&self) -> bool {
        self.cleared_at.is_some()
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewTransaction {
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub payee_id: Option<Uuid>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category_id: Option<Uuid>,
    pub credit: f64,
    pub debit: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

/// `Some(None)` on a nullable field serialises as `null` and clears it.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TransactionPatch {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub payee_id: Option<Option<Uuid>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category_id: Option<Option<Uuid>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub credit: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub debit: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cleared_at: Option<Option<DateTime<Utc>>>,
}

impl Entity for Transaction {
    type Patch = TransactionPatch;

    fn id(&self) -> Uuid {
        self.id
    }

    fn name(&self) -> &str {
        &self.name
    }

    fn merge(&mut self, patch: &TransactionPatch) {
        if let Some(name) = &patch.name {
            self.name = name.clone();
        }
        if let Some(payee_id) = patch.payee_id {
            self.payee_id = payee_id;
        }
        if let Some(category_id) = patch.category_id {
            self.category_id = category_id;
        }
        if let Some(credit) = patch.credit {
            self.credit = credit;
        }
        if let Some(debit) = patch.debit {
            self.debit = debit;
        }
        if let Some(notes) = &patch.notes {
            self.notes = Some(notes.clone());
        }
        if let Some(cleared_at) = patch.cleared_at {
            self.cleared_at = cleared_at;
        }
    }

    fn to_patch(&self) -> TransactionPatch {
        TransactionPatch {
            name: Some(self.name.clone()),
            payee_id: Some(self.payee_id),
            category_id: Some(self.category_id),
            credit: Some(self.credit),
            debit: Some(self.debit),
            notes: self.notes.clone(),
            cleared_at: Some(self.cleared_at),
        }
    }
}

/// One page of an account's transactions as reported by the server.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TransactionPage {
    pub transactions: Vec<Transaction>,
    pub total: u64,
}

/// Outcome of a file import, whatever shape the server answered with.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ImportResult {
    /// Rows the server found in the file.
    pub total: u64,
    pub imported_count: u64,
    /// Rows echoed back by the server, empty when it only reports counters.
    pub created: Vec<Transaction>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PayeeRules {
    #[serde(default, deserialize_with = "null_as_default", skip_serializing_if = "Vec::is_empty")]
    pub includes: Vec<String>,
    #[serde(default, deserialize_with = "null_as_default", skip_serializing_if = "Vec::is_empty")]
    pub excludes: Vec<String>,
    #[serde(default, deserialize_with = "null_as_default", skip_serializing_if = "Vec::is_empty")]
    pub starts_with: Vec<String>,
    #[serde(default, deserialize_with = "null_as_default", skip_serializing_if = "Vec::is_empty")]
    pub ends_with: Vec<String>,
}

impl PayeeRules {
    pub fn is_empty(&self) -> bool {
        self.includes.is_empty()
            && self.excludes.is_empty()
            && self.starts_with.is_empty()
            && self.ends_with.is_empty()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Payee {
    pub id: Uuid,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub auto_category_id: Option<Uuid>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rules: Option<PayeeRules>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewPayee {
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub auto_category_id: Option<Uuid>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rules: Option<PayeeRules>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PayeePatch {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub auto_category_id: Option<Option<Uuid>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rules: Option<PayeeRules>,
}

impl Entity for Payee {
    type Patch = PayeePatch;

    fn id(&self) -> Uuid {
        self.id
    }

    fn name(&self) -> &str {
        &self.name
    }

    fn merge(&mut self, patch: &PayeePatch) {
        if let Some(name) = &patch.name {
            self.name = name.clone();
        }
        if let Some(auto_category_id) = patch.auto_category_id {
            self.auto_category_id = auto_category_id;
        }
        if let Some(rules) = &patch.rules {
            self.rules = Some(rules.clone());
        }
    }

    fn to_patch(&self) -> PayeePatch {
        PayeePatch {
            name: Some(self.name.clone()),
            auto_category_id: Some(self.auto_category_id),
            rules: self.rules.clone(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Group {
    pub id: Uuid,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewGroup {
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GroupPatch {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

impl Entity for Group {
    type Patch = GroupPatch;

    fn id(&self) -> Uuid {
        self.id
    }

    fn name(&self) -> &str {
        &self.name
    }

    fn merge(&mut self, patch: &GroupPatch) {
        if let Some(name) = &patch.name {
            self.name = name.clone();
        }
        if let Some(notes) = &patch.notes {
            self.notes = Some(notes.clone());
        }
    }

    fn to_patch(&self) -> GroupPatch {
        GroupPatch {
            name: Some(self.name.clone()),
            notes: self.notes.clone(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Category {
    pub id: Uuid,
    pub group_id: Uuid,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewCategory {
    pub group_id: Uuid,
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CategoryPatch {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub group_id: Option<Uuid>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

impl Entity for Category {
    type Patch = CategoryPatch;

    fn id(&self) -> Uuid {
        self.id
    }

    fn name(&self) -> &str {
        &self.name
    }

    fn merge(&mut self, patch: &CategoryPatch) {
        if let Some(group_id) = patch.group_id {
            self.group_id = group_id;
        }
        if let Some(name) = &patch.name {
            self.name = name.clone();
        }
        if let Some(notes) = &patch.notes {
            self.notes = Some(notes.clone());
        }
    }

    fn to_patch(&self) -> CategoryPatch {
        CategoryPatch {
            group_id: Some(self.group_id),
            name: Some(self.name.clone()),
            notes: self.notes.clone(),
        }
    }
}

/// A month's allocation for one category, joined with its group and category names.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BudgetRow {
    #[serde(default, deserialize_with = "null_as_default")]
    pub budgeted: f64,
    #[serde(default, deserialize_with = "null_as_default")]
    pub spent: f64,
    pub year: u16,
    pub month: u8,
    #[serde(default)]
    pub category_id: Option<Uuid>,
    #[serde(default)]
    pub category_name: Option<String>,
    #[serde(default)]
    pub category_notes: Option<String>,
    pub group_id: Uuid,
    #[serde(default, deserialize_with = "null_as_default")]
    pub group_name: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub group_notes: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SetBudget {
    pub category_id: Uuid,
    pub year: u16,
    pub month: u8,
    pub budgeted: f64,
}

/// The stored allocation echoed back by `PUT /budgets`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Budget {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<Uuid>,
    pub category_id: Uuid,
    pub year: u16,
    pub month: u8,
    #[serde(default, deserialize_with = "null_as_default")]
    pub budgeted: f64,
}

/// Per-group totals for a budget month.
#[derive(Debug, Clone, PartialEq)]
pub struct BudgetGroupSummary {
    pub group_id: Uuid,
    pub group_name: String,
    pub budgeted: f64,
    pub spent: f64,
    pub rows: Vec<BudgetRow>,
}

/// A bank export format the server can import.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Adapter {
    pub name: String,
    pub category: String,
}
