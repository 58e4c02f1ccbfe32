//! Request and response descriptors exchanged with the hosting platform

use std::collections::BTreeMap;

use axum::{
    http::{HeaderName, HeaderValue, StatusCode},
    response::{IntoResponse, Response},
};
use serde::{Deserialize, Serialize};

pub const EXPENSE_ADDED_MESSAGE: &str = "Expense Added";
pub const EXPENSE_UPDATED_MESSAGE: &str = "Expense Updated";
pub const EXPENSE_DELETED_MESSAGE: &str = "Expense Deleted";
pub const METHOD_NOT_ALLOWED_MESSAGE: &str = "Method Not Allowed";
pub const INTERNAL_SERVER_ERROR_MESSAGE: &str = "Internal Server Error";

pub const RESPONSE_HEADERS: [(&str, &str); 4] = [
    ("Content-Type", "application/json"),
    ("Access-Control-Allow-Origin", "*"),
    (
        "Access-Control-Allow-Methods",
        "GET, POST, PUT, DELETE, OPTIONS",
    ),
    ("Access-Control-Allow-Headers", "Content-Type"),
];

/// Inbound proxy-style event. Fields other than the method and body are
/// accepted and ignored.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiRequest {
    pub http_method: String,
    #[serde(default)]
    pub body: Option<String>,
}

impl ApiRequest {
    pub fn new(http_method: impl Into<String>, body: Option<String>) -> Self {
        Self {
            http_method: http_method.into(),
            body,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiResponse {
    pub status_code: u16,
    pub headers: BTreeMap<String, String>,
    pub body: String,
}

/// Wraps `body` in the response envelope: fixed headers, JSON-encoded body.
pub fn build_response<T: Serialize + ?Sized>(status: StatusCode, body: &T) -> ApiResponse {
    let (status, body) = match serde_json::to_string(body) {
        Ok(encoded) => (status, encoded),
        Err(err) => {
            tracing::error!(error = %err, "failed to encode response body");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                format!("\"{INTERNAL_SERVER_ERROR_MESSAGE}\""),
            )
        }
    };

    ApiResponse {
        status_code: status.as_u16(),
        headers: RESPONSE_HEADERS
            .iter()
            .map(|(name, value)| (name.to_string(), value.to_string()))
            .collect(),
        body,
    }
}

impl IntoResponse for ApiResponse {
    fn into_response(self) -> Response {
        let status =
            StatusCode::from_u16(self.status_code).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
        let mut response = (status, self.body).into_response();

        let headers = response.headers_mut();
        for (name, value) in self.headers {
            match (HeaderName::try_from(name), HeaderValue::try_from(value)) {
                (Ok(name), Ok(value)) => {
                    headers.insert(name, value);
                }
                _ => tracing::warn!("dropping response header that is not valid http"),
            }
        }

        response
    }
}
