use std::sync::Arc;

use expense_tracker_api::{
    build_app,
    config::{Config, StoreBackend},
    dynamodb_client::DynamoExpenseStore,
    expense_store::{ExpenseStore, InMemoryExpenseStore},
    logging, AppState,
};
use tracing::info;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    logging::init_logging();

    let config = Config::from_env()?;

    let store: Arc<dyn ExpenseStore> = match config.store_backend {
        StoreBackend::DynamoDb => {
            let store = DynamoExpenseStore::from_config(&config).await;
            store.ensure_table_available().await?;
            info!(table = store.table_name(), "expense table is reachable");
            Arc::new(store)
        }
        StoreBackend::Memory => {
            info!("using in-memory expense store");
            Arc::new(InMemoryExpenseStore::new())
        }
    };

    let bind_socket = config.bind_socket()?;
    let app = build_app(AppState::new(store));
    let listener = tokio::net::TcpListener::bind(bind_socket).await?;

    info!(
        bind_addr = %config.bind_addr,
        bind_port = config.bind_port,
        "server starting"
    );

    axum::serve(listener, app.into_make_service()).await?;
    Ok(())
}
