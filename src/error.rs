use axum::{
    extract::{FromRequest, Request},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;

#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error("{message}")]
    Validation { status: StatusCode, message: String },
    #[error("{0}")]
    BadRequest(String),
    #[error("{0} API key not configured")]
    MissingApiKey(&'static str),
    #[error("Upstream error: {0}")]
    Upstream(String),
    #[error("Failed to reach upstream service: {0}")]
    Network(#[from] reqwest::Error),
    #[error("Upstream model returned no text")]
    EmptyCompletion,
}

#[derive(Serialize)]
struct ErrorResponse {
    error: String,
    message: String,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = match &self {
            ApiError::Validation { status, .. } => *status,
            ApiError::BadRequest(_) => StatusCode::BAD_REQUEST,
            ApiError::MissingApiKey(_) => StatusCode::INTERNAL_SERVER_ERROR,
            ApiError::Upstream(_) | ApiError::Network(_) | ApiError::EmptyCompletion => {
                StatusCode::BAD_GATEWAY
            }
        };

        let body = Json(ErrorResponse {
            error: status.to_string(),
            message: self.to_string(),
        });

        (status, body).into_response()
    }
}

/// Json extractor that reports rejections in the same `{error, message}`
/// shape as every handler-produced error, instead of axum's plain-text body.
pub struct ApiJson<T>(pub T);

impl<S, T> FromRequest<S> for ApiJson<T>
where
    T: serde::de::DeserializeOwned,
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        match Json::<T>::from_request(req, state).await {
            Ok(Json(value)) => Ok(ApiJson(value)),
            Err(rejection) => Err(ApiError::Validation {
                status: rejection.status(),
                message: rejection.body_text(),
            }),
        }
    }
}
