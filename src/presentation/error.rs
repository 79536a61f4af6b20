// HTTP error mapping
use crate::domain::error::DashboardError;
use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::json;

#[derive(Debug)]
pub enum ApiError {
    Domain(DashboardError),
    BadRequest(String),
    Internal(StatusCode),
}

impl From<DashboardError> for ApiError {
    fn from(e: DashboardError) -> Self {
        ApiError::Domain(e)
    }
}

impl ApiError {
    fn status(&self) -> StatusCode {
        match self {
            ApiError::Domain(DashboardError::UnknownLocation(_))
            | ApiError::Domain(DashboardError::UnknownPage(_)) => StatusCode::NOT_FOUND,
            ApiError::Domain(DashboardError::InvalidDays { .. }) | ApiError::BadRequest(_) => {
                StatusCode::BAD_REQUEST
            }
            ApiError::Internal(status) => *status,
        }
    }

    fn message(&self) -> String {
        match self {
            ApiError::Domain(e) => e.to_string(),
            ApiError::BadRequest(msg) => msg.clone(),
            ApiError::Internal(status) => status
                .canonical_reason()
                .unwrap_or("internal error")
                .to_string(),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        let message = self.message();
        if status.is_server_error() {
            tracing::error!("{}", message);
        } else {
            tracing::warn!("Rejected request: {}", message);
        }
        (status, Json(json!({ "error": message }))).into_response()
    }
}
