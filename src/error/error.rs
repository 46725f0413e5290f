// ============================================================================
// RegistryError — error type returned by every fallible registry operation.
//
// Mirrors the stable error-kind set the registry's callers expect to branch
// on (NotFound / InvalidArgument / AlreadyExists / Unimplemented / Unknown)
// plus a human-readable message that always names the offending key-type URL
// or primitive, so operators can diagnose a failure without reading source.
// ============================================================================

use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RegistryErrorKind {
    InvalidArgument,
    NotFound,
    AlreadyExists,
    Unimplemented,
    Unknown,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RegistryError {
    kind: RegistryErrorKind,
    message: String,
}

impl RegistryError {
    pub fn new(kind: RegistryErrorKind, message: impl Into<String>) -> Self {
        RegistryError { kind, message: message.into() }
    }

    pub fn invalid_argument(message: impl Into<String>) -> Self {
        Self::new(RegistryErrorKind::InvalidArgument, message)
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        Self::new(RegistryErrorKind::NotFound, message)
    }

    pub fn already_exists(message: impl Into<String>) -> Self {
        Self::new(RegistryErrorKind::AlreadyExists, message)
    }

    pub fn unimplemented(message: impl Into<String>) -> Self {
        Self::new(RegistryErrorKind::Unimplemented, message)
    }

    pub fn unknown(message: impl Into<String>) -> Self {
        Self::new(RegistryErrorKind::Unknown, message)
    }

    pub fn kind(&self) -> RegistryErrorKind {
        self.kind
    }

    pub fn message(&self) -> &str {
        &self.message
    }
}

impl fmt::Display for RegistryError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::error::Error for RegistryError {}

pub type Result<T> = std::result::Result<T, RegistryError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_forwards_message() {
        let err = RegistryError::not_found("no key manager for url \"x\"");
        assert_eq!(err.kind(), RegistryErrorKind::NotFound);
        assert_eq!(err.to_string(), "no key manager for url \"x\"");
    }
}
