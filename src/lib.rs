use std::sync::Arc;

use axum::{
    middleware,
    routing::{any, get, post},
    Router,
};

pub mod config;
pub mod domain;
pub mod dynamodb_client;
pub mod errors;
pub mod expense_store;
pub mod http;
pub mod logging;

use domain::dispatcher::ExpenseDispatcher;
use expense_store::ExpenseStore;

#[derive(Clone)]
pub struct AppState {
    pub dispatcher: ExpenseDispatcher,
}

impl AppState {
    pub fn new(store: Arc<dyn ExpenseStore>) -> Self {
        Self {
            dispatcher: ExpenseDispatcher::new(store),
        }
    }
}

pub fn build_app(state: AppState) -> Router {
    Router::new()
        .route("/health", get(http::handlers::health))
        .route("/.well-known/expenses", get(http::handlers::discovery))
        .route("/expenses", any(http::handlers::expenses))
        .route("/invoke", post(http::handlers::invoke))
        .layer(middleware::from_fn(logging::request_logging_middleware))
        .with_state(state)
}
