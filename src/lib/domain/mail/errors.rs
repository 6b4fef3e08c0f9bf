//! Error types for composing and delivering mail

use std::path::PathBuf;

use thiserror::Error;
use tracing::debug;

use super::{email_address::EmailAddressError, identity::IdentityError};

/// The closed set of failure categories callers can branch on
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum FailureKind {
    /// The relay rejected the sender's credentials
    AuthenticationFailure,

    /// The relay or the network failed during connect, TLS or transmit
    TransportFailure,

    /// An attachment could not be read; never fatal
    AttachmentUnavailable,

    /// Anything else
    UnclassifiedFailure,
}

/// Errors raised by a relay connection
#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum RelayError {
    /// The relay replied to AUTH with an error code
    #[error("authentication rejected: {0}")]
    Authentication(String),

    /// Connection, TLS, network or SMTP protocol error
    #[error("transport error: {0}")]
    Transport(String),

    /// An error inside the client itself
    #[error("client error: {0}")]
    Client(String),
}

/// Why a send failed
#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum DeliveryError {
    /// The relay rejected the sender's credentials
    #[error("authentication failed: {0}")]
    Authentication(String),

    /// The relay or the network failed
    #[error("SMTP error occurred: {0}")]
    Transport(String),

    /// Any other failure
    #[error("an error occurred: {0}")]
    Unclassified(String),
}

impl DeliveryError {
    /// The category of this error
    pub fn kind(&self) -> FailureKind {
        match self {
            Self::Authentication(_) => FailureKind::AuthenticationFailure,
            Self::Transport(_) => FailureKind::TransportFailure,
            Self::Unclassified(_) => FailureKind::UnclassifiedFailure,
        }
    }
}

impl From<RelayError> for DeliveryError {
    fn from(err: RelayError) -> Self {
        debug!("RelayError -> DeliveryError");

        match err {
            RelayError::Authentication(reason) => Self::Authentication(reason),
            RelayError::Transport(reason) => Self::Transport(reason),
            RelayError::Client(reason) => Self::Unclassified(reason),
        }
    }
}

impl From<lettre::error::Error> for DeliveryError {
    fn from(err: lettre::error::Error) -> Self {
        debug!("lettre::error::Error -> DeliveryError");

        Self::Unclassified(err.to_string())
    }
}

impl From<EmailAddressError> for DeliveryError {
    fn from(err: EmailAddressError) -> Self {
        debug!("EmailAddressError -> DeliveryError");

        Self::Unclassified(err.to_string())
    }
}

impl From<IdentityError> for DeliveryError {
    fn from(err: IdentityError) -> Self {
        debug!("IdentityError -> DeliveryError");

        Self::Unclassified(err.to_string())
    }
}

/// An attachment that was skipped while composing
#[derive(Clone, Debug, Error, PartialEq, Eq)]
#[error("could not attach {}: {reason}", .path.display())]
pub struct AttachmentWarning {
    /// The path that could not be read
    pub path: PathBuf,

    /// Why it could not be read
    pub reason: String,
}

impl AttachmentWarning {
    /// Always [`FailureKind::AttachmentUnavailable`]
    pub fn kind(&self) -> FailureKind {
        FailureKind::AttachmentUnavailable
    }
}
