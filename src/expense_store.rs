use std::collections::BTreeMap;

use async_trait::async_trait;
use parking_lot::RwLock;

use crate::{
    domain::expense::{Expense, ExpenseChanges, ExpenseItem},
    errors::AppError,
};

/// The four table primitives the dispatcher consumes. Each call is a single
/// round trip to the backing table.
#[async_trait]
pub trait ExpenseStore: Send + Sync {
    /// Every stored row, as stored. Rows are not checked against any shape.
    async fn scan_all(&self) -> Result<Vec<ExpenseItem>, AppError>;

    /// Inserts `expense`, replacing any record with the same `ExpenseID`.
    async fn put_item(&self, expense: &Expense) -> Result<(), AppError>;

    /// Sets `Name`, `Amount` and `Category` on an existing record. Fails when
    /// no record has that `ExpenseID`.
    async fn update_item(&self, changes: &ExpenseChanges) -> Result<(), AppError>;

    /// Removes the record if present. Absent keys are not an error.
    async fn delete_item(&self, expense_id: &str) -> Result<(), AppError>;
}

#[derive(Debug, Default)]
pub struct InMemoryExpenseStore {
    items: RwLock<BTreeMap<String, ExpenseItem>>,
}

impl InMemoryExpenseStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl ExpenseStore for InMemoryExpenseStore {
    async fn scan_all(&self) -> Result<Vec<ExpenseItem>, AppError> {
        Ok(self.items.read().values().cloned().collect())
    }

    async fn put_item(&self, expense: &Expense) -> Result<(), AppError> {
        self.items
            .write()
            .insert(expense.expense_id.clone(), expense.to_item());
        Ok(())
    }

    async fn update_item(&self, changes: &ExpenseChanges) -> Result<(), AppError> {
        let mut items = self.items.write();
        let stored = items
            .get_mut(&changes.expense_id)
            .ok_or_else(|| AppError::not_found(changes.expense_id.as_str()))?;
        changes.apply_to(stored);
        Ok(())
    }

    async fn delete_item(&self, expense_id: &str) -> Result<(), AppError> {
        self.items.write().remove(expense_id);
        Ok(())
    }
}
