//! Axum HTTP handlers for the web server
//!
//! Adapts real HTTP requests and gateway-style proxy events into request
//! descriptors for the expense dispatcher.

use axum::{
    body::Bytes,
    extract::State,
    http::Method,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;

use crate::{
    domain::{dispatcher::Operation, response::ApiRequest},
    errors::AppError,
    AppState,
};

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
}

#[derive(Debug, Serialize)]
pub struct DiscoveryResponse {
    pub name: &'static str,
    pub version: &'static str,
    pub expenses_endpoint: &'static str,
    pub invoke_endpoint: &'static str,
}

pub async fn health() -> Json<HealthResponse> {
    Json(HealthResponse { status: "ok" })
}

pub async fn discovery() -> Json<DiscoveryResponse> {
    Json(DiscoveryResponse {
        name: env!("CARGO_PKG_NAME"),
        version: env!("CARGO_PKG_VERSION"),
        expenses_endpoint: "/expenses",
        invoke_endpoint: "/invoke",
    })
}

/// Serves the expense table over plain HTTP: the method token comes from the
/// request line and the descriptor body from the raw request body.
pub async fn expenses(
    State(state): State<AppState>,
    method: Method,
    body: Bytes,
) -> Result<Response, AppError> {
    let body = if body.is_empty() {
        None
    } else {
        Some(String::from_utf8(body.to_vec())?)
    };

    let request = ApiRequest::new(method.as_str(), body);
    let response = state.dispatcher.dispatch(&request).await.into_response();
    Ok(tag_operation(response, &request))
}

/// Accepts a proxy-integration event and answers with the response
/// descriptor itself, as a function gateway would receive it.
pub async fn invoke(
    State(state): State<AppState>,
    body: Bytes,
) -> Result<Response, AppError> {
    let request: ApiRequest = serde_json::from_slice(&body)?;
    let response = Json(state.dispatcher.dispatch(&request).await).into_response();
    Ok(tag_operation(response, &request))
}

/// Records which operation served the request so the request summary can
/// report it.
fn tag_operation(mut response: Response, request: &ApiRequest) -> Response {
    if let Some(operation) = Operation::from_method(&request.http_method) {
        response.extensions_mut().insert(operation);
    }
    response
}
