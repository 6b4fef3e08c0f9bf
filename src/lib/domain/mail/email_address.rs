//! Email Address

use std::fmt;

use lettre::message::Mailbox;
use thiserror::Error;

use EmailAddressError::*;

/// An error that can occur when creating an email address
#[derive(Debug, Error, PartialEq, Eq)]
pub enum EmailAddressError {
    /// The email address is empty
    #[error("email is empty")]
    EmptyEmailAddress,

    /// The email address is invalid
    #[error("email is invalid: {0}")]
    InvalidEmailAddress(String),
}

/// A single mailbox: a bare address such as `a@x.com`, or one with a display
/// name such as `Name <a@x.com>`
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct EmailAddress {
    raw: String,
    mailbox: Mailbox,
}

impl EmailAddress {
    /// Create a new email address
    pub fn new(raw: &str) -> Result<Self, EmailAddressError> {
        let trimmed = raw.trim();

        if trimmed.is_empty() {
            return Err(EmptyEmailAddress);
        }

        // One mailbox per value; lists are passed as separate addresses
        if trimmed.contains(',') {
            return Err(InvalidEmailAddress(trimmed.to_string()));
        }

        let mailbox = trimmed
            .parse::<Mailbox>()
            .map_err(|_| InvalidEmailAddress(trimmed.to_string()))?;

        Ok(Self {
            raw: trimmed.to_string(),
            mailbox,
        })
    }

    /// Parse a list of raw addresses, failing on the first invalid one
    pub fn parse_all<S: AsRef<str>>(raw: &[S]) -> Result<Vec<Self>, EmailAddressError> {
        raw.iter().map(|r| Self::new(r.as_ref())).collect()
    }

    /// The address as it was given
    pub fn as_str(&self) -> &str {
        &self.raw
    }

    /// The parsed mailbox, for message headers
    pub fn mailbox(&self) -> &Mailbox {
        &self.mailbox
    }

    /// The bare address, without any display name, for the SMTP envelope
    pub fn address(&self) -> String {
        self.mailbox.email.to_string()
    }
}

impl fmt::Display for EmailAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.raw)
    }
}

impl From<EmailAddress> for String {
    fn from(email: EmailAddress) -> Self {
        email.raw
    }
}

#[cfg(test)]
mod tests {
    use testresult::TestResult;

    use super::*;

    #[test]
    fn test_email_address_display() -> TestResult {
        let email = EmailAddress::new("email@example.com")?;

        assert_eq!(format!("{}", email), "email@example.com".to_string());

        Ok(())
    }

    #[test]
    fn test_email_address_is_trimmed() -> TestResult {
        let email = EmailAddress::new("  email@example.com \n")?;

        assert_eq!(email.as_str(), "email@example.com");

        Ok(())
    }

    #[test]
    fn test_display_name_is_accepted() -> TestResult {
        let email = EmailAddress::new("Jane Doe <jane@example.com>")?;

        assert_eq!(email.as_str(), "Jane Doe <jane@example.com>");
        assert_eq!(email.address(), "jane@example.com");
        assert_eq!(email.mailbox().name.as_deref(), Some("Jane Doe"));

        Ok(())
    }

    #[test]
    fn test_bare_address_has_no_display_name() -> TestResult {
        let email = EmailAddress::new("jane@example.com")?;

        assert_eq!(email.address(), "jane@example.com");
        assert_eq!(email.mailbox().name, None);

        Ok(())
    }

    #[test]
    fn test_empty_email_address_is_invalid() {
        let result = EmailAddress::new("   ");
        assert!(matches!(result, Err(EmptyEmailAddress)));
    }

    #[test]
    fn test_email_address_without_at_symbol_is_invalid() {
        let result = EmailAddress::new("email");
        assert!(matches!(result, Err(InvalidEmailAddress(_))));
    }

    #[test]
    fn test_email_address_with_comma_is_invalid() {
        let result = EmailAddress::new("a@x.com,b@x.com");
        assert!(matches!(result, Err(InvalidEmailAddress(_))));
    }

    #[test]
    fn test_parse_all_reports_first_invalid_address() {
        let result = EmailAddress::parse_all(&["a@x.com", "nope", "b@x.com"]);

        assert_eq!(result, Err(InvalidEmailAddress("nope".to_string())));
    }

    #[test]
    fn test_valid_email_to_string() -> TestResult {
        let email = EmailAddress::new("email@example.com")?;

        assert_eq!(String::from(email), "email@example.com".to_string());

        Ok(())
    }
}
