use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};
use thiserror::Error;
use tracing::{error, warn};

use crate::nutrition::NutritionError;

#[derive(Debug, Error)]
pub enum AppError {
    #[error("{0}")]
    Unauthorized(String),
    #[error("Please complete onboarding before accessing this resource.")]
    NotOnboarded,
    #[error("{0} not found")]
    NotFound(&'static str),
    #[error("{0}")]
    Conflict(String),
    #[error("{0}")]
    BadRequest(String),
    #[error("Invalid date '{0}', expected YYYY-MM-DD")]
    MalformedDateFilter(String),
    #[error(transparent)]
    Nutrition(#[from] NutritionError),
    #[error("AI planner not configured")]
    AiUnavailable,
    #[error("AI planner failed: {0}")]
    Upstream(String),
    #[error(transparent)]
    Internal(#[from] anyhow::Error),
}

impl AppError {
    pub fn status(&self) -> StatusCode {
        match self {
            AppError::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            AppError::NotOnboarded => StatusCode::FORBIDDEN,
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::Conflict(_) => StatusCode::CONFLICT,
            AppError::BadRequest(_) | AppError::MalformedDateFilter(_) => StatusCode::BAD_REQUEST,
            AppError::Nutrition(e) => match e {
                NutritionError::InvalidUnit { .. }
                | NutritionError::MissingEffortFields(_)
                | NutritionError::OutOfRange => StatusCode::BAD_REQUEST,
                NutritionError::UnsupportedUnitMode(_) | NutritionError::DataIntegrity(_) => {
                    StatusCode::INTERNAL_SERVER_ERROR
                }
            },
            AppError::AiUnavailable => StatusCode::SERVICE_UNAVAILABLE,
            AppError::Upstream(_) => StatusCode::BAD_GATEWAY,
            AppError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();
        let message = match &self {
            AppError::Internal(e) => {
                error!(error = ?e, "internal error");
                "Internal server error".to_string()
            }
            AppError::Unauthorized(msg) => {
                warn!(reason = %msg, "unauthorized");
                msg.clone()
            }
            other if status.is_server_error() => {
                error!(error = %other, %status, "request failed");
                other.to_string()
            }
            other => other.to_string(),
        };
        (status, message).into_response()
    }
}
