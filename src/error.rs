use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

use crate::types::IndicatorKind;

/// Scoring error types.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ScoreError {
    /// No reading for the requested indicator. Soft: evaluation skips it.
    #[error("No reading for indicator {0}")]
    MissingIndicator(IndicatorKind),

    /// Reading present but unusable. Soft: evaluation skips it.
    #[error("Invalid {indicator} reading: {reason}")]
    InvalidReading {
        indicator: IndicatorKind,
        reason: String,
    },

    /// Nothing left to score.
    #[error("No indicators available to score")]
    EmptyInput,
}

impl ScoreError {
    pub fn invalid(indicator: IndicatorKind, reason: impl Into<String>) -> Self {
        ScoreError::InvalidReading {
            indicator,
            reason: reason.into(),
        }
    }
}

/// Application error types.
#[derive(Error, Debug)]
pub enum AppError {
    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Bad request: {0}")]
    BadRequest(String),

    #[error("Unprocessable: {0}")]
    Unprocessable(String),

    #[error(transparent)]
    Score(#[from] ScoreError),
}

impl AppError {
    fn status(&self) -> StatusCode {
        match self {
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::BadRequest(_) => StatusCode::BAD_REQUEST,
            AppError::Unprocessable(_) => StatusCode::UNPROCESSABLE_ENTITY,
            AppError::Score(ScoreError::MissingIndicator(_)) => StatusCode::NOT_FOUND,
            AppError::Score(ScoreError::InvalidReading { .. }) => StatusCode::UNPROCESSABLE_ENTITY,
            AppError::Score(ScoreError::EmptyInput) => StatusCode::UNPROCESSABLE_ENTITY,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();
        let message = match &self {
            AppError::NotFound(msg)
            | AppError::BadRequest(msg)
            | AppError::Unprocessable(msg) => msg.clone(),
            other => other.to_string(),
        };

        let body = Json(json!({
            "error": message,
            "status": status.as_u16(),
        }));

        (status, body).into_response()
    }
}

pub type Result<T> = std::result::Result<T, AppError>;
