//! Sender identity

use std::fmt;

use thiserror::Error;

use super::email_address::{EmailAddress, EmailAddressError};

/// Sender identity error
#[derive(Debug, Error, PartialEq, Eq)]
pub enum IdentityError {
    /// The sender address is missing or malformed
    #[error("invalid sender address: {0}")]
    InvalidAddress(#[from] EmailAddressError),

    /// The credential is empty
    #[error("the sender credential is empty")]
    EmptyCredential,
}

/// A secret used to authenticate with the relay, such as an app password.
///
/// Never printed: both [`fmt::Display`] and [`fmt::Debug`] are obfuscated.
#[derive(Clone, PartialEq, Eq)]
pub struct Credential(String);

impl Credential {
    /// Create a new credential
    pub fn new(raw: &str) -> Result<Self, IdentityError> {
        if raw.is_empty() {
            return Err(IdentityError::EmptyCredential);
        }

        Ok(Self(raw.to_string()))
    }

    /// Expose the secret, for handing to the transport only
    pub fn expose(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Credential {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "********")
    }
}

impl fmt::Debug for Credential {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "********")
    }
}

/// The account a message is sent from, together with its credential.
///
/// Immutable once built and passed explicitly with every request.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SenderIdentity {
    address: EmailAddress,
    credential: Credential,
}

impl SenderIdentity {
    /// Create a new sender identity from a raw address and credential
    pub fn new(address: &str, credential: &str) -> Result<Self, IdentityError> {
        Ok(Self {
            address: EmailAddress::new(address)?,
            credential: Credential::new(credential)?,
        })
    }

    /// The sender's address
    pub fn address(&self) -> &EmailAddress {
        &self.address
    }

    /// The sender's credential
    pub fn credential(&self) -> &Credential {
        &self.credential
    }
}

#[cfg(test)]
mod tests {
    use testresult::TestResult;

    use super::*;

    #[test]
    fn test_credential_display_obfuscates() -> TestResult {
        let credential = Credential::new("abcd efgh ijkl mnop")?;
        assert_eq!(format!("{}", credential), "********");

        Ok(())
    }

    #[test]
    fn test_identity_debug_does_not_leak_credential() -> TestResult {
        let identity = SenderIdentity::new("me@gmail.com", "hunter2")?;
        let debug = format!("{:?}", identity);

        assert!(debug.contains("me@gmail.com"));
        assert!(!debug.contains("hunter2"));

        Ok(())
    }

    #[test]
    fn test_expose_credential() -> TestResult {
        let identity = SenderIdentity::new("me@gmail.com", "hunter2")?;
        assert_eq!(identity.credential().expose(), "hunter2");

        Ok(())
    }

    #[test]
    fn test_empty_credential_is_rejected() {
        let result = SenderIdentity::new("me@gmail.com", "");
        assert_eq!(result, Err(IdentityError::EmptyCredential));
    }

    #[test]
    fn test_empty_sender_address_is_rejected() {
        let result = SenderIdentity::new("", "hunter2");
        assert!(matches!(
            result,
            Err(IdentityError::InvalidAddress(
                EmailAddressError::EmptyEmailAddress
            ))
        ));
    }
}
