use std::fmt;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    Empty { field: &'static str },
    InvalidBaseUrl { input: String },
    InvalidEndpoint { input: String },
    InvalidSendAt { input: String },
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Empty { field } => write!(f, "{field} must not be empty"),
            Self::InvalidBaseUrl { input } => write!(f, "invalid base url: {input}"),
            Self::InvalidEndpoint { input } => {
                write!(f, "endpoint does not resolve below the base url: {input}")
            }
            Self::InvalidSendAt { input } => {
                write!(f, "invalid send_at: {input} (expected YYYY-MM-DD HH:MM:SS)")
            }
        }
    }
}

impl std::error::Error for ValidationError {}
