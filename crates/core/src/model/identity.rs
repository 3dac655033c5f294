use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum IdentityError {
    #[error("name is required")]
    EmptyName,

    #[error("email is required")]
    EmptyEmail,

    #[error("invalid email address: {0}")]
    InvalidEmail(String),
}

/// Self-declared participant name (trimmed, non-empty).
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct DisplayName(String);

impl DisplayName {
    /// # Errors
    ///
    /// Returns `IdentityError::EmptyName` if the name is empty after trimming.
    pub fn new(value: impl Into<String>) -> Result<Self, IdentityError> {
        let raw = value.into();
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return Err(IdentityError::EmptyName);
        }
        Ok(Self(trimmed.to_string()))
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl TryFrom<String> for DisplayName {
    type Error = IdentityError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<DisplayName> for String {
    fn from(value: DisplayName) -> Self {
        value.0
    }
}

impl std::fmt::Display for DisplayName {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Email address used as the participant's identity key.
///
/// Accepts the `local@domain.tld` shape: no whitespace, exactly one `@`, and a
/// dot inside the domain with text on both sides.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Email(String);

impl Email {
    /// # Errors
    ///
    /// Returns `IdentityError::EmptyEmail` for blank input and
    /// `IdentityError::InvalidEmail` when the address is malformed.
    pub fn new(value: impl Into<String>) -> Result<Self, IdentityError> {
        let raw = value.into();
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return Err(IdentityError::EmptyEmail);
        }
        if !is_email_shaped(trimmed) {
            return Err(IdentityError::InvalidEmail(trimmed.to_string()));
        }
        Ok(Self(trimmed.to_string()))
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

fn is_email_shaped(value: &str) -> bool {
    if value.chars().any(char::is_whitespace) {
        return false;
    }
    let Some((local, domain)) = value.split_once('@') else {
        return false;
    };
    if local.is_empty() || domain.contains('@') {
        return false;
    }
    // Some dot in the domain with text on both sides.
    domain
        .char_indices()
        .any(|(at, c)| c == '.' && at > 0 && at + 1 < domain.len())
}

impl TryFrom<String> for Email {
    type Error = IdentityError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<Email> for String {
    fn from(value: Email) -> Self {
        value.0
    }
}

impl std::fmt::Display for Email {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Who is taking the test. Passed explicitly into every session.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Identity {
    display_name: DisplayName,
    email: Email,
}

impl Identity {
    #[must_use]
    pub fn new(display_name: DisplayName, email: Email) -> Self {
        Self {
            display_name,
            email,
        }
    }

    /// Validate raw name/email input into an identity.
    ///
    /// # Errors
    ///
    /// Returns `IdentityError` when either field is missing or the email is malformed.
    pub fn parse(name: &str, email: &str) -> Result<Self, IdentityError> {
        Ok(Self::new(DisplayName::new(name)?, Email::new(email)?))
    }

    #[must_use]
    pub fn display_name(&self) -> &DisplayName {
        &self.display_name
    }

    #[must_use]
    pub fn email(&self) -> &Email {
        &self.email
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_trimmed_identity() {
        let id = Identity::parse("  Ada ", " ada@example.com ").unwrap();
        assert_eq!(id.display_name().as_str(), "Ada");
        assert_eq!(id.email().as_str(), "ada@example.com");
    }

    #[test]
    fn requires_both_fields() {
        assert_eq!(
            Identity::parse(" ", "a@b.co").unwrap_err(),
            IdentityError::EmptyName
        );
        assert_eq!(
            Identity::parse("Ada", "  ").unwrap_err(),
            IdentityError::EmptyEmail
        );
    }

    #[test]
    fn rejects_malformed_emails() {
        for bad in ["plain", "a@b", "@b.co", "a@.co", "a@b.", "a b@c.d", "a@b@c.d"] {
            assert!(
                matches!(Email::new(bad), Err(IdentityError::InvalidEmail(_))),
                "{bad} should be rejected"
            );
        }
    }

    #[test]
    fn accepts_subdomains() {
        assert!(Email::new("first.last@mail.example.org").is_ok());
    }

    #[test]
    fn any_inner_dot_in_domain_is_enough() {
        for good in ["a@b.c.", "a@b..c", "a@.b.c"] {
            assert!(Email::new(good).is_ok(), "{good} should be accepted");
        }
    }

    #[test]
    fn email_deserialization_validates() {
        let err = serde_json::from_str::<Email>("\"nope\"");
        assert!(err.is_err());
    }
}
