use axum::{
    async_trait,
    extract::{FromRequest, Request},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::de::DeserializeOwned;
use serde_json::json;
use tracing::error;

use crate::envelope::Envelope;
use crate::validate::FieldErrors;

/// API error taxonomy. Every variant renders exactly one envelope with the
/// matching status code.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error("validation failed")]
    Validation(FieldErrors),
    #[error("invalid request body")]
    BadRequest(String),
    #[error("{0}")]
    Unauthorized(String),
    #[error("{0}")]
    Forbidden(String),
    #[error("{0}")]
    NotFound(String),
    #[error("{0}")]
    Conflict(String),
    #[error("something went wrong")]
    Internal(#[from] anyhow::Error),
}

impl ApiError {
    pub fn unauthorized(message: impl Into<String>) -> Self {
        Self::Unauthorized(message.into())
    }

    pub fn not_found(what: &str) -> Self {
        Self::NotFound(format!("{what} not found"))
    }

    /// Translate a sqlx failure at the repo boundary. `what` names the
    /// resource for the client-facing message.
    pub fn from_sqlx(e: sqlx::Error, what: &str) -> Self {
        match &e {
            sqlx::Error::RowNotFound => Self::not_found(what),
            sqlx::Error::Database(db) if db.is_unique_violation() => {
                Self::Conflict(format!("{what} already exists"))
            }
            _ => {
                error!(error = %e, what, "database error");
                Self::Internal(e.into())
            }
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, envelope) = match self {
            ApiError::Validation(fields) => (
                StatusCode::BAD_REQUEST,
                Envelope::error("validation failed", Some(json!(fields))),
            ),
            ApiError::BadRequest(detail) => (
                StatusCode::BAD_REQUEST,
                Envelope::error("invalid request body", Some(json!(detail))),
            ),
            ApiError::Unauthorized(message) => {
                (StatusCode::UNAUTHORIZED, Envelope::error(message, None))
            }
            ApiError::Forbidden(message) => {
                (StatusCode::FORBIDDEN, Envelope::error(message, None))
            }
            ApiError::NotFound(message) => {
                (StatusCode::NOT_FOUND, Envelope::error(message, None))
            }
            ApiError::Conflict(message) => {
                (StatusCode::CONFLICT, Envelope::error(message, None))
            }
            ApiError::Internal(e) => {
                error!(error = %e, "internal error");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    Envelope::error("something went wrong", None),
                )
            }
        };
        (status, Json(envelope)).into_response()
    }
}

impl From<FieldErrors> for ApiError {
    fn from(errors: FieldErrors) -> Self {
        ApiError::Validation(errors)
    }
}

/// JSON body extractor whose rejection wears the envelope instead of
/// axum's plain-text default.
pub struct JsonBody<T>(pub T);

#[async_trait]
impl<S, T> FromRequest<S> for JsonBody<T>
where
    S: Send + Sync,
    T: DeserializeOwned,
{
    type Rejection = ApiError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        match Json::<T>::from_request(req, state).await {
            Ok(Json(value)) => Ok(JsonBody(value)),
            Err(rejection) => Err(ApiError::BadRequest(rejection.body_text())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn validation_error_maps_to_400() {
        let mut fields = FieldErrors::new();
        fields.push("email", "Invalid email");
        let response = ApiError::Validation(fields).into_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[test]
    fn conflict_maps_to_409() {
        let response = ApiError::Conflict("user already exists".into()).into_response();
        assert_eq!(response.status(), StatusCode::CONFLICT);
    }

    #[test]
    fn sqlx_row_not_found_translates_to_not_found() {
        let err = ApiError::from_sqlx(sqlx::Error::RowNotFound, "Job");
        assert!(matches!(err, ApiError::NotFound(ref m) if m == "Job not found"));
    }

    #[test]
    fn internal_hides_detail() {
        let response = ApiError::Internal(anyhow::anyhow!("secret db string")).into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }
}
