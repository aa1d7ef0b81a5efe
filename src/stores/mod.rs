//! In-memory state for each collection the client works with.

mod collection;
pub mod adapters;
pub mod budgets;
pub mod debounce;
pub mod pagination;
pub mod resource;
pub mod transactions;

pub use adapters::AdaptersStore;
pub use budgets::BudgetsStore;
pub use collection::{Outcome, Snapshot};
pub use debounce::Debouncer;
pub use pagination::Pagination;
pub use resource::Store;
pub use transactions::{TransactionsSnapshot, TransactionsStore};
