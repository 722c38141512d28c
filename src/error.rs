use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

use crate::domain::{round2, MacroCategory, MealSlot};

/// Client-facing error taxonomy. Upstream AI failures never appear here:
/// they are absorbed into the deterministic fallback path before a handler
/// returns.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("{field}: {message}")]
    Validation {
        field: &'static str,
        message: String,
    },

    /// Swap source slot lacks the requested amount. Both slots stay untouched.
    #[error("{slot} has {available_g} g of {category}, requested {requested_g} g")]
    InsufficientAmount {
        slot: MealSlot,
        category: MacroCategory,
        requested_g: f64,
        available_g: f64,
    },

    /// Neither the AI backend nor fallback synthesis can produce a meal
    /// inside the remaining budget.
    #[error("no suggestion fits the remaining budget")]
    InsufficientBudget,

    #[error("rate limit exceeded")]
    RateLimited,

    /// Lost a serialized swap race after bounded retries; safe to retry.
    #[error("concurrent update, retry")]
    Conflict,

    /// Post-swap conservation assertion failed. Engine bug: the transaction
    /// has been rolled back and nothing was persisted.
    #[error("daily macro totals diverged: {detail}")]
    Consistency { detail: String },

    #[error("not found")]
    NotFound,

    #[error(transparent)]
    Internal(#[from] anyhow::Error),
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::Validation { .. } => StatusCode::UNPROCESSABLE_ENTITY,
            ApiError::InsufficientAmount { .. }
            | ApiError::InsufficientBudget
            | ApiError::Conflict => StatusCode::CONFLICT,
            ApiError::RateLimited => StatusCode::TOO_MANY_REQUESTS,
            ApiError::NotFound => StatusCode::NOT_FOUND,
            ApiError::Consistency { .. } | ApiError::Internal(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        let body = match &self {
            ApiError::Validation { field, message } => json!({
                "error": "validation",
                "field": field,
                "message": message,
            }),
            ApiError::InsufficientAmount {
                slot,
                category,
                requested_g,
                available_g,
            } => json!({
                "error": "insufficient_amount",
                "slot": slot,
                "category": category,
                "requested_g": requested_g,
                "available_g": available_g,
                "shortfall_g": round2(requested_g - available_g),
            }),
            ApiError::InsufficientBudget => json!({
                "error": "insufficient_budget",
                "message": self.to_string(),
            }),
            ApiError::RateLimited => json!({
                "error": "rate_limited",
                "message": self.to_string(),
            }),
            ApiError::Conflict => json!({
                "error": "conflict",
                "message": "concurrent update, please retry",
            }),
            ApiError::NotFound => json!({
                "error": "not_found",
                "message": self.to_string(),
            }),
            ApiError::Consistency { detail } => {
                tracing::error!(%detail, "macro conservation violated after swap");
                json!({"error": "internal", "message": "internal server error"})
            }
            ApiError::Internal(e) => {
                tracing::error!(error = %e, "internal error");
                json!({"error": "internal", "message": "internal server error"})
            }
        };
        (status, Json(body)).into_response()
    }
}

impl From<sqlx::Error> for ApiError {
    fn from(e: sqlx::Error) -> Self {
        ApiError::Internal(e.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_mapping() {
        let v = ApiError::Validation {
            field: "date",
            message: "bad".into(),
        };
        assert_eq!(v.status(), StatusCode::UNPROCESSABLE_ENTITY);
        assert_eq!(ApiError::Conflict.status(), StatusCode::CONFLICT);
        assert_eq!(
            ApiError::RateLimited.status(),
            StatusCode::TOO_MANY_REQUESTS
        );
        assert_eq!(
            ApiError::Consistency {
                detail: "x".into()
            }
            .status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn insufficient_amount_reports_shortfall() {
        let e = ApiError::InsufficientAmount {
            slot: MealSlot::Lunch,
            category: MacroCategory::Protein,
            requested_g: 40.0,
            available_g: 25.5,
        };
        assert!(e.to_string().contains("25.5"));
        assert_eq!(e.status(), StatusCode::CONFLICT);
    }
}
