use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};
use tracing::error;

/// Failures of the account operations.
#[derive(Debug, thiserror::Error)]
pub enum AccountError {
    #[error("user already exist")]
    AlreadyExists,
    #[error("user not found")]
    UserNotFound,
    #[error("token does not exist")]
    TokenNotFound,
    #[error("store error: {0:#}")]
    Store(#[from] anyhow::Error),
}

impl AccountError {
    pub fn status(&self) -> StatusCode {
        match self {
            Self::AlreadyExists => StatusCode::CONFLICT,
            Self::UserNotFound | Self::TokenNotFound => StatusCode::NOT_FOUND,
            Self::Store(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for AccountError {
    fn into_response(self) -> Response {
        let status = self.status();
        let body = match &self {
            Self::Store(e) => {
                let detail = format!("{e:#}");
                error!(error = %detail, "store failure");
                "internal error".to_string()
            }
            other => other.to_string(),
        };
        (status, body).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn messages_match_the_wire_contract() {
        assert_eq!(AccountError::AlreadyExists.to_string(), "user already exist");
        assert_eq!(AccountError::UserNotFound.to_string(), "user not found");
        assert_eq!(AccountError::TokenNotFound.to_string(), "token does not exist");
    }

    #[test]
    fn store_error_keeps_context_chain() {
        let err: AccountError = anyhow::anyhow!("connection refused")
            .context("update name")
            .into();
        assert_eq!(err.to_string(), "store error: update name: connection refused");
        assert_eq!(err.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[test]
    fn status_codes() {
        assert_eq!(AccountError::AlreadyExists.status(), StatusCode::CONFLICT);
        assert_eq!(AccountError::UserNotFound.status(), StatusCode::NOT_FOUND);
        assert_eq!(AccountError::TokenNotFound.status(), StatusCode::NOT_FOUND);
    }
}
