use axum::extract::rejection::QueryRejection;
use axum::http::{header, HeaderValue, StatusCode};
use axum::response::{IntoResponse, Response};
use serde::Serialize;
use utoipa::ToSchema;

/// Standard failure envelope.
#[derive(Debug, Serialize, ToSchema)]
pub struct ErrorResponse {
    /// Always `false`
    pub success: bool,
    /// Human-readable error message
    pub error: String,
}

impl ErrorResponse {
    pub fn new(error: impl Into<String>) -> Self {
        Self {
            success: false,
            error: error.into(),
        }
    }
}

/// What went wrong on the wire when the provider could not be reached.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NetworkErrorKind {
    /// The per-call deadline elapsed before the provider answered.
    Timeout,
    /// DNS failure or refused connection.
    Connect,
    /// Anything else the transport reported (TLS, body read, decode).
    Other,
}

#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("{0}")]
    Validation(String),

    #[error("Upstream provider returned HTTP {status}: {message}")]
    Upstream { status: u16, message: String },

    #[error("Network error reaching upstream provider: {message}")]
    Network {
        kind: NetworkErrorKind,
        message: String,
    },

    #[error("Failed to fetch all weather data: {0}")]
    Aggregation(Box<AppError>),

    #[error("Too many requests, please try again later")]
    RateLimitExceeded { retry_after_secs: u64 },

    #[error("{0}")]
    NotFound(String),

    #[error("Internal error: {0}")]
    InternalError(String),
}

impl AppError {
    /// Wrap a failed composite sub-call.
    pub fn aggregation(inner: AppError) -> Self {
        AppError::Aggregation(Box::new(inner))
    }

    pub fn status_code(&self) -> StatusCode {
        match self {
            AppError::Validation(_) => StatusCode::BAD_REQUEST,
            AppError::Upstream { .. } => StatusCode::BAD_GATEWAY,
            AppError::Network {
                kind: NetworkErrorKind::Timeout,
                ..
            } => StatusCode::GATEWAY_TIMEOUT,
            AppError::Network { .. } => StatusCode::BAD_GATEWAY,
            AppError::Aggregation(inner) => inner.status_code(),
            AppError::RateLimitExceeded { .. } => StatusCode::TOO_MANY_REQUESTS,
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::InternalError(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl From<reqwest::Error> for AppError {
    /// Classify a transport failure. The URL is stripped first because it
    /// carries the provider credential in its query string.
    fn from(err: reqwest::Error) -> Self {
        let kind = if err.is_timeout() {
            NetworkErrorKind::Timeout
        } else if err.is_connect() {
            NetworkErrorKind::Connect
        } else {
            NetworkErrorKind::Other
        };
        AppError::Network {
            kind,
            message: err.without_url().to_string(),
        }
    }
}

impl From<QueryRejection> for AppError {
    /// Unparseable query strings (duplicate keys, bad percent-encoding) get
    /// the same envelope as any other bad input.
    fn from(rejection: QueryRejection) -> Self {
        AppError::Validation(rejection.body_text())
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status_code();

        match &self {
            AppError::Validation(msg) => tracing::debug!("Rejected request: {}", msg),
            AppError::RateLimitExceeded { .. } => tracing::debug!("Rate limit exceeded"),
            AppError::NotFound(_) => {}
            AppError::InternalError(_) => tracing::error!("{}", self),
            _ => tracing::warn!("{}", self),
        }

        let retry_after = match &self {
            AppError::RateLimitExceeded { retry_after_secs } => Some(*retry_after_secs),
            _ => None,
        };

        let mut response = (status, axum::Json(ErrorResponse::new(self.to_string()))).into_response();
        if let Some(secs) = retry_after {
            if let Ok(value) = HeaderValue::from_str(&secs.to_string()) {
                response.headers_mut().insert(header::RETRY_AFTER, value);
            }
        }
        response
    }
}
