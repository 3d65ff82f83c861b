use crate::helpers::JsonResponse;
use actix_web::{error::ResponseError, http::StatusCode, HttpResponse};
use thiserror::Error;

/// Why a credential could not be turned into claims.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum DecodeError {
    #[error("credential is malformed")]
    Malformed,
    #[error("credential signature does not verify")]
    BadSignature,
    #[error("credential has expired")]
    Expired,
}

impl From<jsonwebtoken::errors::Error> for DecodeError {
    fn from(err: jsonwebtoken::errors::Error) -> Self {
        use jsonwebtoken::errors::ErrorKind;

        match err.kind() {
            ErrorKind::ExpiredSignature => Self::Expired,
            ErrorKind::InvalidSignature => Self::BadSignature,
            _ => Self::Malformed,
        }
    }
}

#[derive(Debug, Error)]
pub enum IssueError {
    #[error("failed to sign credential: {0}")]
    Sign(#[from] jsonwebtoken::errors::Error),
    #[error("credential expiry is out of range")]
    ExpiryOutOfRange,
}

/// Request-level rejection produced by the auth gate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum AuthError {
    #[error("Authentication required")]
    Missing,
    #[error("Invalid session: {0}")]
    Invalid(DecodeError),
    #[error("Session was terminated by an administrator")]
    ForcedLogout,
    #[error("Admin privileges required")]
    NotPrivileged,
}

impl AuthError {
    /// Machine-readable code carried in the rejection body.
    pub fn code(&self) -> &'static str {
        match self {
            Self::Missing => "SESSION_EXPIRED",
            Self::Invalid(DecodeError::Expired) => "TOKEN_EXPIRED",
            Self::Invalid(_) => "INVALID_TOKEN",
            Self::ForcedLogout => "FORCE_LOGOUT",
            Self::NotPrivileged => "FORBIDDEN",
        }
    }

    /// Rejections after which the session cookie must be expired.
    pub fn clears_cookie(&self) -> bool {
        matches!(self, Self::ForcedLogout)
    }
}

impl From<DecodeError> for AuthError {
    fn from(err: DecodeError) -> Self {
        Self::Invalid(err)
    }
}

impl ResponseError for AuthError {
    fn status_code(&self) -> StatusCode {
        match self {
            Self::NotPrivileged => StatusCode::FORBIDDEN,
            _ => StatusCode::UNAUTHORIZED,
        }
    }

    fn error_response(&self) -> HttpResponse {
        JsonResponse::<()>::build()
            .set_code(self.code())
            .response(self.status_code(), self.to_string())
    }
}
