use thiserror::Error;

/// Errors raised while validating, keying or encoding a fiscal document.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum DfeError {
    /// The payload is malformed or incomplete.
    #[error("validation failed: {0}")]
    Validation(ValidationError),

    /// A value passed presence checks but is not a parseable number or date.
    #[error("format error: {0}")]
    Format(String),

    /// The XML writer failed.
    #[error("XML error: {0}")]
    Xml(String),
}

/// Coarse classification used by callers that map errors onto a transport.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorClass {
    /// The caller sent data that can never succeed as-is.
    BadInput,
    /// Something failed on our side.
    Internal,
}

impl DfeError {
    pub fn class(&self) -> ErrorClass {
        match self {
            Self::Validation(_) | Self::Format(_) => ErrorClass::BadInput,
            Self::Xml(_) => ErrorClass::Internal,
        }
    }

    /// HTTP-style status code for [`DfeError::class`].
    pub fn status_code(&self) -> u16 {
        match self.class() {
            ErrorClass::BadInput => 400,
            ErrorClass::Internal => 500,
        }
    }

    /// Field path of a validation failure, if this is one.
    pub fn field(&self) -> Option<&str> {
        match self {
            Self::Validation(e) => Some(&e.field),
            Self::Format(_) | Self::Xml(_) => None,
        }
    }
}

impl From<ValidationError> for DfeError {
    fn from(e: ValidationError) -> Self {
        Self::Validation(e)
    }
}

/// A single validation error with field path and message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationError {
    /// Dot-separated wire path to the invalid field (e.g. "emit.enderEmit.CEP").
    pub field: String,
    /// Human-readable error description.
    pub message: String,
}

impl std::fmt::Display for ValidationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.field, self.message)
    }
}

impl std::error::Error for ValidationError {}

impl ValidationError {
    pub fn new(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            message: message.into(),
        }
    }

    /// A required field or section is absent or empty.
    pub fn missing(field: impl Into<String>) -> Self {
        Self::new(field, "is required")
    }
}
