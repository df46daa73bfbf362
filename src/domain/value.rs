use std::fmt;

use serde::{Deserialize, Serialize};

use crate::domain::validation::ValidationError;

#[derive(Clone, PartialEq, Eq, Hash)]
/// Mandrill API key (`key`).
///
/// Invariant: non-empty after trimming. The value is redacted from `Debug` output.
pub struct ApiKey(String);

impl ApiKey {
    /// JSON field name used by Mandrill (`key`).
    pub const FIELD: &'static str = "key";

    /// Create a validated [`ApiKey`].
    pub fn new(value: impl Into<String>) -> Result<Self, ValidationError> {
        let value = value.into();
        let trimmed = value.trim();
        if trimmed.is_empty() {
            return Err(ValidationError::Empty { field: Self::FIELD });
        }
        Ok(Self(trimmed.to_owned()))
    }

    /// Borrow the validated key.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for ApiKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("ApiKey(***)")
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
/// Name (slug) of a stored Mandrill template (`template_name`).
///
/// Invariant: non-empty after trimming.
pub struct TemplateName(String);

impl TemplateName {
    /// JSON field name used by Mandrill (`template_name`).
    pub const FIELD: &'static str = "template_name";

    /// Create a validated [`TemplateName`].
    pub fn new(value: impl Into<String>) -> Result<Self, ValidationError> {
        let value = value.into();
        let trimmed = value.trim();
        if trimmed.is_empty() {
            return Err(ValidationError::Empty { field: Self::FIELD });
        }
        Ok(Self(trimmed.to_owned()))
    }

    /// Borrow the validated template name.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
/// Header a recipient is addressed in.
pub enum RecipientType {
    #[default]
    To,
    Cc,
    Bcc,
}

impl RecipientType {
    /// Wire value (`to`, `cc` or `bcc`).
    pub fn as_str(self) -> &'static str {
        match self {
            Self::To => "to",
            Self::Cc => "cc",
            Self::Bcc => "bcc",
        }
    }
}

impl fmt::Display for RecipientType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
/// Scheduled delivery time (`send_at`), UTC, formatted as `YYYY-MM-DD HH:MM:SS`.
///
/// Invariant: the value has exactly that shape with in-range components. Calendar
/// validity (e.g. February 30th) is left to the API.
pub struct SendAt(String);

impl SendAt {
    /// JSON field name used by Mandrill (`send_at`).
    pub const FIELD: &'static str = "send_at";

    /// Create a validated [`SendAt`].
    pub fn new(value: impl Into<String>) -> Result<Self, ValidationError> {
        let value = value.into();
        let trimmed = value.trim();
        if !is_send_at_shape(trimmed) {
            return Err(ValidationError::InvalidSendAt { input: value });
        }
        Ok(Self(trimmed.to_owned()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

fn is_send_at_shape(value: &str) -> bool {
    let bytes = value.as_bytes();
    if bytes.len() != 19 {
        return false;
    }

    for (idx, byte) in bytes.iter().enumerate() {
        let ok = match idx {
            4 | 7 => *byte == b'-',
            10 => *byte == b' ',
            13 | 16 => *byte == b':',
            _ => byte.is_ascii_digit(),
        };
        if !ok {
            return false;
        }
    }

    let number = |range: std::ops::Range<usize>| -> u32 {
        value[range].parse().unwrap_or(u32::MAX)
    };

    (1..=12).contains(&number(5..7))
        && (1..=31).contains(&number(8..10))
        && number(11..13) < 24
        && number(14..16) < 60
        && number(17..19) < 60
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
/// Per-recipient sending status reported by `messages/send*`.
///
/// Unknown values are preserved as-is in [`SendStatus::Other`].
pub enum SendStatus {
    Sent,
    Queued,
    Scheduled,
    Rejected,
    Invalid,
    Other(String),
}

impl SendStatus {
    /// Map a wire status string to a [`SendStatus`].
    pub fn from_wire(value: impl Into<String>) -> Self {
        let value = value.into();
        match value.as_str() {
            "sent" => Self::Sent,
            "queued" => Self::Queued,
            "scheduled" => Self::Scheduled,
            "rejected" => Self::Rejected,
            "invalid" => Self::Invalid,
            _ => Self::Other(value),
        }
    }

    /// Get the status string as sent by Mandrill.
    pub fn as_str(&self) -> &str {
        match self {
            Self::Sent => "sent",
            Self::Queued => "queued",
            Self::Scheduled => "scheduled",
            Self::Rejected => "rejected",
            Self::Invalid => "invalid",
            Self::Other(value) => value,
        }
    }

    /// Returns `true` if the message was accepted for delivery (sent, queued or scheduled).
    pub fn is_accepted(&self) -> bool {
        matches!(self, Self::Sent | Self::Queued | Self::Scheduled)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
/// Error names documented for the `messages` API calls.
pub enum KnownErrorName {
    InvalidKey,
    PaymentRequired,
    UnknownSubaccount,
    ValidationError,
    GeneralError,
    UnknownTemplate,
    InvalidTemplate,
    UnknownMessage,
    UnknownPool,
    ServiceUnavailable,
}

impl KnownErrorName {
    /// Map an error `name` to a known variant, if one exists.
    pub fn from_name(name: &str) -> Option<Self> {
        let kind = match name {
            "Invalid_Key" => Self::InvalidKey,
            "PaymentRequired" => Self::PaymentRequired,
            "Unknown_Subaccount" => Self::UnknownSubaccount,
            "ValidationError" => Self::ValidationError,
            "GeneralError" => Self::GeneralError,
            "Unknown_Template" => Self::UnknownTemplate,
            "Invalid_Template" => Self::InvalidTemplate,
            "Unknown_Message" => Self::UnknownMessage,
            "Unknown_Pool" => Self::UnknownPool,
            "ServiceUnavailable" => Self::ServiceUnavailable,
            _ => return None,
        };
        Some(kind)
    }

    /// Returns `true` if the failure is temporary on Mandrill's side.
    ///
    /// The crate never retries on its own; this is a hint for callers.
    pub fn is_retryable(self) -> bool {
        matches!(self, Self::ServiceUnavailable)
    }

    /// Returns `true` if the API key was rejected.
    pub fn is_auth_error(self) -> bool {
        matches!(self, Self::InvalidKey)
    }
}
