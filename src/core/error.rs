use thiserror::Error;

/// AWS-style API errors. Every variant maps to the error code string that
/// appears in the response envelope.
#[derive(Error, Debug)]
pub enum ApiError {
    #[error("The request must contain the parameter {0}")]
    MissingParameter(String),

    #[error("{0}")]
    InvalidParameterValue(String),

    #[error("{0}")]
    InvalidParameterCombination(String),

    #[error("{message}")]
    NotFound { code: String, message: String },

    #[error("{message}")]
    Duplicate { code: String, message: String },

    #[error("{0}")]
    DependencyViolation(String),

    #[error("Request would have succeeded, but DryRun flag is set.")]
    DryRunOperation,

    #[error("{0}")]
    IncorrectState(String),

    #[error("{0}")]
    UnsupportedOperation(String),

    #[error("The token '{0}' is not valid")]
    InvalidNextToken(String),

    #[error("The action '{0}' is not valid for this web service")]
    InvalidAction(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl ApiError {
    /// Error code string surfaced in the response envelope.
    pub fn code(&self) -> &str {
        match self {
            Self::MissingParameter(_) => "MissingParameter",
            Self::InvalidParameterValue(_) => "InvalidParameterValue",
            Self::InvalidParameterCombination(_) => "InvalidParameterCombination",
            Self::NotFound { code, .. } => code,
            Self::Duplicate { code, .. } => code,
            Self::DependencyViolation(_) => "DependencyViolation",
            Self::DryRunOperation => "DryRunOperation",
            Self::IncorrectState(_) => "IncorrectState",
            Self::UnsupportedOperation(_) => "UnsupportedOperation",
            Self::InvalidNextToken(_) => "InvalidNextToken",
            Self::InvalidAction(_) => "InvalidAction",
            Self::Internal(_) => "InternalError",
        }
    }

    pub fn not_found(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self::NotFound {
            code: code.into(),
            message: message.into(),
        }
    }

    pub fn duplicate(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Duplicate {
            code: code.into(),
            message: message.into(),
        }
    }
}

pub type Result<T> = std::result::Result<T, ApiError>;

impl<T> From<std::sync::PoisonError<T>> for ApiError {
    fn from(err: std::sync::PoisonError<T>) -> Self {
        Self::Internal(err.to_string())
    }
}

impl From<serde_json::Error> for ApiError {
    fn from(err: serde_json::Error) -> Self {
        Self::Internal(err.to_string())
    }
}
