//! Delivery outcome

use super::errors::{AttachmentWarning, DeliveryError, FailureKind};

/// The result of a single send
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DeliveryOutcome {
    recipient: String,
    result: Result<(), DeliveryError>,
    warnings: Vec<AttachmentWarning>,
}

impl DeliveryOutcome {
    /// A message that reached the relay
    pub fn delivered(recipient: impl Into<String>, warnings: Vec<AttachmentWarning>) -> Self {
        Self {
            recipient: recipient.into(),
            result: Ok(()),
            warnings,
        }
    }

    /// A message that did not reach the relay
    pub fn failed(
        recipient: impl Into<String>,
        error: DeliveryError,
        warnings: Vec<AttachmentWarning>,
    ) -> Self {
        Self {
            recipient: recipient.into(),
            result: Err(error),
            warnings,
        }
    }

    /// Whether the relay accepted the message
    pub fn is_success(&self) -> bool {
        self.result.is_ok()
    }

    /// The error, if the send failed
    pub fn error(&self) -> Option<&DeliveryError> {
        self.result.as_ref().err()
    }

    /// The failure category, if the send failed
    pub fn error_kind(&self) -> Option<FailureKind> {
        self.error().map(DeliveryError::kind)
    }

    /// Attachments that were left out of the message
    pub fn warnings(&self) -> &[AttachmentWarning] {
        &self.warnings
    }

    /// The primary recipient, as requested
    pub fn recipient(&self) -> &str {
        &self.recipient
    }

    /// A human readable summary for the user. Branch on [`Self::error_kind`]
    /// rather than on this text.
    pub fn status_message(&self) -> String {
        match &self.result {
            Ok(()) => format!("Email sent successfully to {}", self.recipient),
            Err(DeliveryError::Authentication(_)) => {
                "Authentication failed. Please check your email and App Password. \
                 Make sure you're using an App Password, not your regular Gmail password."
                    .to_string()
            }
            Err(DeliveryError::Transport(reason)) => format!("SMTP error occurred: {reason}"),
            Err(DeliveryError::Unclassified(reason)) => format!("An error occurred: {reason}"),
        }
    }
}

impl From<DeliveryOutcome> for Result<(), DeliveryError> {
    fn from(outcome: DeliveryOutcome) -> Self {
        outcome.result
    }
}
