//! Routes a request descriptor to one expense operation
//!
//! Every invocation runs exactly one operation, which makes exactly one store
//! call. Failures inside an operation never escape: they are logged and
//! answered with the opaque 500 envelope.

use std::sync::Arc;

use axum::http::StatusCode;
use serde::de::DeserializeOwned;
use tracing::error;

use crate::{
    domain::{
        expense::{Expense, ExpenseChanges, ExpenseKey},
        response::{
            build_response, ApiRequest, ApiResponse, EXPENSE_ADDED_MESSAGE,
            EXPENSE_DELETED_MESSAGE, EXPENSE_UPDATED_MESSAGE, INTERNAL_SERVER_ERROR_MESSAGE,
            METHOD_NOT_ALLOWED_MESSAGE,
        },
    },
    errors::AppError,
    expense_store::ExpenseStore,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operation {
    List,
    Create,
    Update,
    Delete,
}

impl Operation {
    /// Method tokens are matched exactly; `get` or `OPTIONS` are not routed.
    pub fn from_method(method: &str) -> Option<Self> {
        match method {
            "GET" => Some(Self::List),
            "POST" => Some(Self::Create),
            "PUT" => Some(Self::Update),
            "DELETE" => Some(Self::Delete),
            _ => None,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Self::List => "list",
            Self::Create => "create",
            Self::Update => "update",
            Self::Delete => "delete",
        }
    }
}

#[derive(Clone)]
pub struct ExpenseDispatcher {
    store: Arc<dyn ExpenseStore>,
}

impl ExpenseDispatcher {
    pub fn new(store: Arc<dyn ExpenseStore>) -> Self {
        Self { store }
    }

    pub async fn dispatch(&self, request: &ApiRequest) -> ApiResponse {
        let Some(operation) = Operation::from_method(&request.http_method) else {
            return build_response(StatusCode::METHOD_NOT_ALLOWED, METHOD_NOT_ALLOWED_MESSAGE);
        };

        match self.run(operation, request.body.as_deref()).await {
            Ok(response) => response,
            Err(err) => {
                error!(
                    operation = operation.name(),
                    error = %err,
                    "expense operation failed"
                );
                build_response(
                    StatusCode::INTERNAL_SERVER_ERROR,
                    INTERNAL_SERVER_ERROR_MESSAGE,
                )
            }
        }
    }

    async fn run(&self, operation: Operation, body: Option<&str>) -> Result<ApiResponse, AppError> {
        match operation {
            Operation::List => self.list_expenses().await,
            Operation::Create => self.add_expense(parse_body(body)?).await,
            Operation::Update => self.update_expense(parse_body(body)?).await,
            Operation::Delete => {
                let key: ExpenseKey = parse_body(body)?;
                self.delete_expense(&key.expense_id).await
            }
        }
    }

    pub async fn list_expenses(&self) -> Result<ApiResponse, AppError> {
        let expenses = self.store.scan_all().await?;
        Ok(build_response(StatusCode::OK, &expenses))
    }

    pub async fn add_expense(&self, expense: Expense) -> Result<ApiResponse, AppError> {
        self.store.put_item(&expense).await?;
        Ok(build_response(StatusCode::CREATED, EXPENSE_ADDED_MESSAGE))
    }

    pub async fn update_expense(&self, changes: ExpenseChanges) -> Result<ApiResponse, AppError> {
        self.store.update_item(&changes).await?;
        Ok(build_response(StatusCode::OK, EXPENSE_UPDATED_MESSAGE))
    }

    pub async fn delete_expense(&self, expense_id: &str) -> Result<ApiResponse, AppError> {
        self.store.delete_item(expense_id).await?;
        Ok(build_response(StatusCode::OK, EXPENSE_DELETED_MESSAGE))
    }
}

fn parse_body<T: DeserializeOwned>(body: Option<&str>) -> Result<T, AppError> {
    let body = body.ok_or(AppError::MissingBody)?;
    Ok(serde_json::from_str(body)?)
}
