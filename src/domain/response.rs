use std::fmt;

use crate::domain::value::{KnownErrorName, SendStatus};

/// Outcome of an API call that reached Mandrill: the decoded success payload,
/// or the structured error Mandrill reported.
pub type ApiResult<T> = Result<T, ApiError>;

#[derive(Debug, Clone, PartialEq, Eq)]
/// Sending result for one recipient.
pub struct RecipientResult {
    pub email: String,
    pub status: SendStatus,
    /// Why the recipient was rejected, when `status` is `rejected`.
    pub reject_reason: Option<String>,
    /// Mandrill message id (`_id`).
    pub id: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
/// Error object returned by Mandrill with a non-200 response.
pub struct ApiError {
    pub status: String,
    pub code: i32,
    pub name: String,
    pub message: String,
}

impl ApiError {
    /// Map [`ApiError::name`] to a known variant, if one exists.
    pub fn known_name(&self) -> Option<KnownErrorName> {
        KnownErrorName::from_name(&self.name)
    }

    pub fn is_retryable(&self) -> bool {
        matches!(self.known_name(), Some(kind) if kind.is_retryable())
    }

    pub fn is_auth_error(&self) -> bool {
        matches!(self.known_name(), Some(kind) if kind.is_auth_error())
    }
}

impl fmt::Display for ApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({}): {}", self.name, self.code, self.message)
    }
}

impl std::error::Error for ApiError {}
