//! API key parsing and validation: a canonical UUID (8-4-4-4-12, exactly 36
//! characters including hyphens).

use thiserror::Error;
use uuid::Uuid;

/// A validated API key. Construction is the only way to get one, so every
/// call site downstream of [`parse_api_key`] can assume the canonical shape.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiKey(String);

impl ApiKey {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for ApiKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error("API key must be a 36-character UUID (got {0} characters)")]
    WrongLength(usize),
    #[error("API key is not a valid UUID: {0}")]
    NotAUuid(String),
}

/// Parses and validates an API key. Strict: anything that
/// isn't a canonical 8-4-4-4-12 UUID (hyphens included, case-insensitive) is
/// rejected before it ever reaches the property store.
pub fn parse_api_key(raw: &str) -> Result<ApiKey, ValidationError> {
    if raw.len() != 36 {
        return Err(ValidationError::WrongLength(raw.len()));
    }

    match Uuid::parse_str(raw) {
        Ok(uuid) => Ok(ApiKey(uuid.hyphenated().to_string())),
        Err(_) => Err(ValidationError::NotAUuid(raw.to_string())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_canonical_lowercase_uuid() {
        let key = parse_api_key("550e8400-e29b-41d4-a716-446655440000").unwrap();
        assert_eq!(key.as_str(), "550e8400-e29b-41d4-a716-446655440000");
    }

    #[test]
    fn accepts_uppercase_uuid() {
        assert!(parse_api_key("550E8400-E29B-41D4-A716-446655440000").is_ok());
    }

    #[test]
    fn rejects_wrong_length() {
        let err = parse_api_key("not-a-uuid").unwrap_err();
        assert!(matches!(err, ValidationError::WrongLength(_)));
    }

    #[test]
    fn rejects_36_chars_that_are_not_a_uuid() {
        let err = parse_api_key("zzzzzzzz-zzzz-zzzz-zzzz-zzzzzzzzzzzz").unwrap_err();
        assert!(matches!(err, ValidationError::NotAUuid(_)));
    }

    #[test]
    fn rejects_uuid_missing_hyphens() {
        // 32 hex chars, no hyphens: fails the length gate before UUID parsing even runs.
        let err = parse_api_key("550e8400e29b41d4a716446655440000").unwrap_err();
        assert!(matches!(err, ValidationError::WrongLength(32)));
    }
}
