// Authentication error types and HTTP response conversion

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use chrono::Utc;
use serde::Serialize;
use std::fmt;
use tracing::{debug, error, warn};

/// Authentication error taxonomy. Every variant is recoverable by the
/// caller; none aborts the process.
///
/// The token-verification variants (`MalformedToken`, `InvalidSignature`,
/// `ExpiredToken`) exist for internal logging. At the service boundary they
/// are collapsed into `Unauthorized` so a caller can never learn which
/// check rejected a presented token.
#[derive(Debug, Clone, PartialEq)]
pub enum AuthError {
    /// A required request field was empty or absent. Carries the field name.
    MissingField(String),
    /// Email does not match standard address syntax.
    InvalidEmail,
    /// Password shorter than the 8-character minimum.
    WeakPassword,
    /// Another account already uses this email. Authoritative signal is the
    /// storage layer's uniqueness constraint, not an application pre-check.
    DuplicateEmail,
    /// Unknown email or wrong password. Deliberately indistinguishable to
    /// prevent account enumeration.
    InvalidCredentials,
    /// No bearer token on a request that requires one.
    MissingToken,
    /// Token does not split into three non-empty segments, or a segment
    /// fails to decode.
    MalformedToken,
    /// Recomputed HMAC does not match the token's signature segment.
    InvalidSignature,
    /// Token signature is valid but `expiresAt` has passed.
    ExpiredToken,
    /// Generic outward form of any token-verification failure.
    Unauthorized,
    /// Token subject no longer exists in the store.
    UserNotFound,
    /// The credential store failed or timed out. Carries the underlying
    /// driver detail for logs; clients see a generic message.
    StoreUnavailable(String),
    /// Argon2 hashing or hash parsing failed.
    PasswordHashError,
    /// Claims serialization or MAC construction failed during issuance.
    TokenGenerationError(String),
}

impl fmt::Display for AuthError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AuthError::MissingField(field) => write!(f, "Field '{}' is required", field),
            AuthError::InvalidEmail => write!(f, "Invalid email format"),
            AuthError::WeakPassword => {
                write!(f, "Password must be at least 8 characters long")
            }
            AuthError::DuplicateEmail => write!(f, "Email already registered"),
            AuthError::InvalidCredentials => write!(f, "Invalid email or password"),
            AuthError::MissingToken => write!(f, "No token provided"),
            AuthError::MalformedToken => write!(f, "Malformed token"),
            AuthError::InvalidSignature => write!(f, "Invalid token signature"),
            AuthError::ExpiredToken => write!(f, "Token has expired"),
            AuthError::Unauthorized => write!(f, "Invalid token"),
            AuthError::UserNotFound => write!(f, "User not found"),
            AuthError::StoreUnavailable(msg) => write!(f, "Credential store unavailable: {}", msg),
            AuthError::PasswordHashError => write!(f, "Password hashing error"),
            AuthError::TokenGenerationError(msg) => write!(f, "Token generation error: {}", msg),
        }
    }
}

impl std::error::Error for AuthError {}

/// Consistent error response body: a stable machine-readable code plus a
/// human-readable message.
#[derive(Serialize)]
pub struct ErrorResponse {
    pub error_code: String,
    pub message: String,
    pub timestamp: String,
}

impl AuthError {
    /// Get the HTTP status code for this error
    pub fn status_code(&self) -> StatusCode {
        match self {
            AuthError::MissingField(_) => StatusCode::BAD_REQUEST,
            AuthError::InvalidEmail => StatusCode::BAD_REQUEST,
            AuthError::WeakPassword => StatusCode::BAD_REQUEST,
            AuthError::DuplicateEmail => StatusCode::CONFLICT,
            AuthError::InvalidCredentials => StatusCode::UNAUTHORIZED,
            AuthError::MissingToken => StatusCode::UNAUTHORIZED,
            AuthError::MalformedToken
            | AuthError::InvalidSignature
            | AuthError::ExpiredToken
            | AuthError::Unauthorized => StatusCode::UNAUTHORIZED,
            AuthError::UserNotFound => StatusCode::NOT_FOUND,
            AuthError::StoreUnavailable(_) => StatusCode::SERVICE_UNAVAILABLE,
            AuthError::PasswordHashError | AuthError::TokenGenerationError(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }

    /// Stable machine-readable code for this error.
    ///
    /// Token-verification variants share `UNAUTHORIZED`: the outward
    /// response must not reveal which verification step failed.
    pub fn error_code(&self) -> &'static str {
        match self {
            AuthError::MissingField(_) => "MISSING_FIELD",
            AuthError::InvalidEmail => "INVALID_EMAIL",
            AuthError::WeakPassword => "WEAK_PASSWORD",
            AuthError::DuplicateEmail => "DUPLICATE_EMAIL",
            AuthError::InvalidCredentials => "INVALID_CREDENTIALS",
            AuthError::MissingToken => "MISSING_TOKEN",
            AuthError::MalformedToken
            | AuthError::InvalidSignature
            | AuthError::ExpiredToken
            | AuthError::Unauthorized => "UNAUTHORIZED",
            AuthError::UserNotFound => "USER_NOT_FOUND",
            AuthError::StoreUnavailable(_) => "STORE_UNAVAILABLE",
            AuthError::PasswordHashError | AuthError::TokenGenerationError(_) => "INTERNAL_ERROR",
        }
    }

    /// Client-safe message for this error (no driver details, no hint of
    /// which token check failed).
    pub fn client_message(&self) -> String {
        match self {
            AuthError::StoreUnavailable(_) => "Service temporarily unavailable".to_string(),
            AuthError::PasswordHashError | AuthError::TokenGenerationError(_) => {
                "Internal server error".to_string()
            }
            AuthError::MalformedToken | AuthError::InvalidSignature | AuthError::ExpiredToken => {
                AuthError::Unauthorized.to_string()
            }
            other => other.to_string(),
        }
    }
}

impl IntoResponse for AuthError {
    fn into_response(self) -> Response {
        match &self {
            AuthError::MissingField(_)
            | AuthError::InvalidEmail
            | AuthError::WeakPassword
            | AuthError::UserNotFound => {
                debug!("Request rejected: {}", self);
            }
            AuthError::DuplicateEmail => {
                warn!("Registration attempt with duplicate email");
            }
            AuthError::InvalidCredentials => {
                warn!("Failed login attempt");
            }
            AuthError::MissingToken
            | AuthError::MalformedToken
            | AuthError::InvalidSignature
            | AuthError::ExpiredToken
            | AuthError::Unauthorized => {
                warn!("Token rejected: {}", self);
            }
            AuthError::StoreUnavailable(msg) => {
                error!("Credential store unavailable: {}", msg);
            }
            AuthError::PasswordHashError => {
                error!("Password hashing error");
            }
            AuthError::TokenGenerationError(msg) => {
                error!("Token generation error: {}", msg);
            }
        }

        let body = Json(ErrorResponse {
            error_code: self.error_code().to_string(),
            message: self.client_message(),
            timestamp: Utc::now().to_rfc3339(),
        });

        (self.status_code(), body).into_response()
    }
}
